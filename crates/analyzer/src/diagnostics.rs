//! Token dumps for eyeballing files the scanner could not classify.

use attrscan_lexer::{tokenize_file, TokenDump};
use attrscan_protocol::Report;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

/// Significant tokens of one source file as `{name, text, line}`
pub fn debug_file(path: impl AsRef<Path>, config: &AnalyzerConfig) -> Result<Vec<TokenDump>> {
    let path = path.as_ref();
    if !path.is_file() || !config.matches_extension(path) {
        return Err(AnalyzerError::invalid_path(format!(
            "{} is not a valid {} file",
            path.display(),
            config.extension
        )));
    }

    let dump = tokenize_file(path)?
        .iter()
        .filter(|token| !token.is_ignorable())
        .map(|token| token.dump())
        .collect();
    Ok(dump)
}

/// Token dumps for every suspect file in a report, keyed by file name
pub fn debug_suspect_files(
    report: &Report,
    config: &AnalyzerConfig,
) -> Result<BTreeMap<String, Vec<TokenDump>>> {
    let mut dumps = BTreeMap::new();
    for record in report.suspect_classes() {
        let dump = debug_file(&record.file_name, config)?;
        dumps.insert(record.file_name.clone(), dump);
    }
    Ok(dumps)
}
