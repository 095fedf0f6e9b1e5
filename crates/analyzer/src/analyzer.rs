use attrscan_lexer::tokenize_file;
use attrscan_protocol::{
    AnalysisStats, DeclarationKind, DeclarationRecord, Report, ReportBuilder, SideRegistryEntry,
    ValidationOutcome,
};
use std::path::Path;
use std::time::Instant;

use crate::classify::{classify, Classification};
use crate::config::{AnalyzerConfig, StructuralErrorPolicy};
use crate::declarations::DeclarationScanner;
use crate::discovery::SourceFinder;
use crate::error::Result;
use crate::registry::TypeRegistry;
use crate::validator::Validator;

/// One scanned file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub record: DeclarationRecord,
    /// Significant tokens seen
    pub tokens: usize,
}

/// Independent per-file result, folded into the report afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Suspect(DeclarationRecord),
    Side {
        kind: DeclarationKind,
        entry: SideRegistryEntry,
    },
    Validated(ValidationOutcome),
}

/// Two-stage pipeline: declaration scan, then attribute validation
pub struct Analyzer<'r, R: ?Sized> {
    registry: &'r R,
    config: AnalyzerConfig,
}

impl<'r, R: TypeRegistry + ?Sized> Analyzer<'r, R> {
    pub fn new(registry: &'r R, config: AnalyzerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a directory tree or a single file
    pub fn analyze(&self, root: impl AsRef<Path>) -> Result<Report> {
        let root = root.as_ref();
        let start = Instant::now();
        log::info!("Analyzing {}", root.display());

        let discovery = SourceFinder::new(root, &self.config).find()?;
        let mut stats = AnalysisStats {
            files_discovered: discovery.files.len() + discovery.skipped,
            files_skipped: discovery.skipped,
            ..Default::default()
        };

        let mut outcomes = Vec::with_capacity(discovery.files.len());
        for path in &discovery.files {
            let scanned = self.scan_file(path)?;
            stats.files_scanned += 1;
            stats.tokens += scanned.tokens;
            outcomes.push(self.process(scanned.record));
        }

        #[allow(clippy::cast_possible_truncation)]
        {
            stats.time_ms = start.elapsed().as_millis() as u64;
        }
        let report = fold(outcomes, stats);
        log::info!("Analysis completed: {:?}", report.stats());
        Ok(report)
    }

    /// Tokenize and scan one file, applying the structural error policy
    pub fn scan_file(&self, path: &Path) -> Result<ScannedFile> {
        let file_name = path.to_string_lossy().into_owned();
        let tokens = tokenize_file(path)?;

        let mut scanner = DeclarationScanner::new(file_name.as_str());
        let mut significant = 0;
        for token in tokens.iter().filter(|token| !token.is_ignorable()) {
            significant += 1;
            if let Err(err) = scanner.step(token) {
                match self.config.structural_errors {
                    StructuralErrorPolicy::Abort => return Err(err.at(file_name)),
                    StructuralErrorPolicy::Suspect => {
                        log::warn!("{file_name}: {err}; reporting as suspect");
                        let mut record = scanner.finish();
                        record.parse_error = Some(err.to_string());
                        return Ok(ScannedFile {
                            record,
                            tokens: significant,
                        });
                    }
                }
            }
        }

        let record = scanner.finish();
        log::debug!(
            "{file_name}: {} declaration(s), namespace {:?}",
            record.total(),
            record.namespace
        );
        Ok(ScannedFile {
            record,
            tokens: significant,
        })
    }

    /// Route a scanned record and validate it when it is a lone class
    pub fn process(&self, record: DeclarationRecord) -> FileOutcome {
        // a record carrying a structural error is never trusted
        if record.parse_error.is_some() {
            return FileOutcome::Suspect(record);
        }

        match classify(record) {
            Classification::Suspect(record) => {
                log::debug!(
                    "{} is suspect ({} declarations)",
                    record.file_name,
                    record.total()
                );
                FileOutcome::Suspect(record)
            }
            Classification::Side { kind, entry } => FileOutcome::Side { kind, entry },
            Classification::Candidate {
                namespace,
                class_name,
                file_name,
            } => FileOutcome::Validated(Validator::new(self.registry).validate(
                namespace.as_deref(),
                &class_name,
                &file_name,
            )),
        }
    }
}

/// Fold per-file outcomes, in order, into an immutable report
pub fn fold(outcomes: impl IntoIterator<Item = FileOutcome>, stats: AnalysisStats) -> Report {
    let mut builder = ReportBuilder::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Suspect(record) => builder.add_suspect(record),
            FileOutcome::Side { kind, entry } => builder.add_side_entry(kind, entry),
            FileOutcome::Validated(outcome) => builder.add_outcome(outcome),
        }
    }
    builder.set_stats(stats);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use crate::registry::{ManifestRegistry, MemberDescriptor, TypeDescriptor};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scan_file_counts_significant_tokens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Foo.php");
        fs::write(&path, "<?php\n// hi\nclass Foo {}\n").unwrap();

        let registry = ManifestRegistry::new();
        let analyzer = Analyzer::new(&registry, AnalyzerConfig::default()).unwrap();
        let scanned = analyzer.scan_file(&path).unwrap();
        assert_eq!(scanned.record.classes, vec!["Foo"]);
        // class Foo { }
        assert_eq!(scanned.tokens, 4);
    }

    #[test]
    fn structural_error_aborts_by_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Late.php");
        fs::write(&path, "<?php class A {} namespace B;").unwrap();

        let registry = ManifestRegistry::new();
        let analyzer = Analyzer::new(&registry, AnalyzerConfig::default()).unwrap();
        let err = analyzer.analyze(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::DuplicateNamespace { .. }));
    }

    #[test]
    fn structural_error_can_route_to_suspects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Twice.php");
        fs::write(&path, "<?php class A {} class A {}").unwrap();

        let registry = ManifestRegistry::new();
        let config = AnalyzerConfig {
            structural_errors: StructuralErrorPolicy::Suspect,
            ..Default::default()
        };
        let report = Analyzer::new(&registry, config)
            .unwrap()
            .analyze(&path)
            .unwrap();
        let suspects = report.suspect_classes();
        assert_eq!(suspects.len(), 1);
        // the partial record holds exactly one class, yet stays suspect
        assert_eq!(suspects[0].classes, vec!["A"]);
        assert!(suspects[0].parse_error.is_some());
        assert!(report.not_found_classes().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let registry = ManifestRegistry::new();
        let config = AnalyzerConfig {
            extension: String::new(),
            ..Default::default()
        };
        assert!(Analyzer::new(&registry, config).is_err());
    }

    #[test]
    fn fold_keeps_later_outcomes() {
        let registry = ManifestRegistry::new().with_type(
            TypeDescriptor::new("App\\Foo")
                .property(MemberDescriptor::new("id").attribute("Ghost")),
        );
        let analyzer = Analyzer::new(&registry, AnalyzerConfig::default()).unwrap();

        let mut first = DeclarationRecord::new("a/Foo.php");
        first.namespace = Some("App".into());
        first.classes.push("Foo".into());
        let mut second = first.clone();
        second.file_name = "b/Foo.php".into();

        let report = fold(
            [analyzer.process(first), analyzer.process(second)],
            AnalysisStats::default(),
        );
        assert_eq!(report.classes_with_undeclared_attributes().len(), 1);
        assert_eq!(
            report.classes_with_undeclared_attributes()[0].file_name,
            "b/Foo.php"
        );
    }
}
