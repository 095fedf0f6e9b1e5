use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalyzerError, Result};

pub const DEFAULT_EXTENSION: &str = "php";

/// What to do with a file that declares a namespace late or repeats a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralErrorPolicy {
    /// Fail the whole run
    #[default]
    Abort,
    /// Report the partial record as a suspect file
    Suspect,
}

impl std::str::FromStr for StructuralErrorPolicy {
    type Err = AnalyzerError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "suspect" => Ok(Self::Suspect),
            other => Err(AnalyzerError::invalid_config(format!(
                "unknown structural error policy `{other}` (expected abort or suspect)"
            ))),
        }
    }
}

/// Analyzer settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Source extension, matched case-insensitively
    pub extension: String,
    pub respect_gitignore: bool,
    pub follow_links: bool,
    /// Globs over root-relative paths
    pub exclude: Vec<String>,
    pub max_file_bytes: Option<u64>,
    pub structural_errors: StructuralErrorPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            respect_gitignore: false,
            follow_links: false,
            exclude: Vec::new(),
            max_file_bytes: None,
            structural_errors: StructuralErrorPolicy::Abort,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        log::debug!("Loading config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(AnalyzerError::invalid_config("extension must not be empty"));
        }
        if let Some(0) = self.max_file_bytes {
            return Err(AnalyzerError::invalid_config(
                "max_file_bytes must be greater than zero",
            ));
        }
        self.exclude_set()?;
        Ok(())
    }

    /// Compiled exclude globs
    pub fn exclude_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| {
                    AnalyzerError::invalid_config(format!("invalid exclude glob `{pattern}`: {e}"))
                })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| AnalyzerError::invalid_config(format!("invalid exclude globs: {e}")))
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        let wanted = self.extension.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }
}
