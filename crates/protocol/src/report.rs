use crate::declaration::{DeclarationKind, DeclarationRecord, DeclaredName, SideRegistryEntry};
use crate::findings::{AnomalousType, ValidationOutcome};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters collected while producing a [`Report`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Candidate files found under the root
    pub files_discovered: usize,

    /// Files tokenized and scanned
    pub files_scanned: usize,

    /// Files skipped (size limit, unreadable)
    pub files_skipped: usize,

    /// Significant tokens seen across all files
    pub tokens: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

/// Immutable result of one analysis run.
///
/// Built through [`ReportBuilder`]; read through the projection methods or
/// serialized via [`Report::snapshot`] / [`Report::validation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    anomalous: Vec<AnomalousType>,
    clean: BTreeMap<String, String>,
    suspects: Vec<DeclarationRecord>,
    not_found: BTreeMap<String, String>,
    traits: Vec<SideRegistryEntry>,
    interfaces: Vec<SideRegistryEntry>,
    abstracts: Vec<SideRegistryEntry>,
    stats: AnalysisStats,
}

impl Report {
    pub fn classes_with_undeclared_attributes(&self) -> &[AnomalousType] {
        &self.anomalous
    }

    /// fqcn → file name
    pub fn classes_without_undeclared_attributes(&self) -> &BTreeMap<String, String> {
        &self.clean
    }

    pub fn suspect_classes(&self) -> &[DeclarationRecord] {
        &self.suspects
    }

    /// fqcn → file name
    pub fn not_found_classes(&self) -> &BTreeMap<String, String> {
        &self.not_found
    }

    pub fn traits(&self) -> &[SideRegistryEntry] {
        &self.traits
    }

    pub fn interfaces(&self) -> &[SideRegistryEntry] {
        &self.interfaces
    }

    pub fn abstracts(&self) -> &[SideRegistryEntry] {
        &self.abstracts
    }

    pub fn trait_names(&self) -> Vec<DeclaredName> {
        flatten(&self.traits)
    }

    pub fn interface_names(&self) -> Vec<DeclaredName> {
        flatten(&self.interfaces)
    }

    pub fn abstract_names(&self) -> Vec<DeclaredName> {
        flatten(&self.abstracts)
    }

    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    /// True when the validation view would be empty
    pub fn is_clean(&self) -> bool {
        self.anomalous.is_empty() && self.suspects.is_empty() && self.not_found.is_empty()
    }

    /// Every category, including empty ones
    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            classes_with_undeclared_attributes: self.anomalous.clone(),
            classes_without_undeclared_attributes: self.clean.clone(),
            suspect_classes: self.suspects.clone(),
            not_found_classes: self.not_found.clone(),
            traits: self.traits.clone(),
            interfaces: self.interfaces.clone(),
            abstracts: self.abstracts.clone(),
        }
    }

    /// Only the problem categories, and only when non-empty
    pub fn validation(&self) -> ValidationView {
        ValidationView {
            classes_with_undeclared_attributes: self.anomalous.clone(),
            suspect_classes: self.suspects.clone(),
            not_found_classes: self.not_found.clone(),
        }
    }
}

fn flatten(entries: &[SideRegistryEntry]) -> Vec<DeclaredName> {
    entries
        .iter()
        .flat_map(|entry| {
            entry.names.iter().map(|name| DeclaredName {
                namespace: entry.namespace.clone(),
                file_name: entry.file_name.clone(),
                name: name.clone(),
            })
        })
        .collect()
}

/// Full serialized form of a [`Report`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub classes_with_undeclared_attributes: Vec<AnomalousType>,
    pub classes_without_undeclared_attributes: BTreeMap<String, String>,
    pub suspect_classes: Vec<DeclarationRecord>,
    pub not_found_classes: BTreeMap<String, String>,
    #[serde(rename = "trait")]
    pub traits: Vec<SideRegistryEntry>,
    #[serde(rename = "interface")]
    pub interfaces: Vec<SideRegistryEntry>,
    #[serde(rename = "abstract")]
    pub abstracts: Vec<SideRegistryEntry>,
}

/// Filtered form: empty categories are absent, not empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationView {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes_with_undeclared_attributes: Vec<AnomalousType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suspect_classes: Vec<DeclarationRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub not_found_classes: BTreeMap<String, String>,
}

impl ValidationView {
    pub fn is_empty(&self) -> bool {
        self.classes_with_undeclared_attributes.is_empty()
            && self.suspect_classes.is_empty()
            && self.not_found_classes.is_empty()
    }
}

/// Folds per-file results into a [`Report`].
///
/// Sequences keep insertion order. Clean and not-found classes are keyed by
/// fqcn, so a later file redefining the same fqcn replaces the earlier entry.
/// A resolved fqcn lives in exactly one of the anomalous/clean categories:
/// the latest outcome wins and evicts the other.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_suspect(&mut self, record: DeclarationRecord) {
        self.report.suspects.push(record);
    }

    /// Record a trait/interface/abstract entry; class entries are ignored
    pub fn add_side_entry(&mut self, kind: DeclarationKind, entry: SideRegistryEntry) {
        match kind {
            DeclarationKind::Trait => self.report.traits.push(entry),
            DeclarationKind::Interface => self.report.interfaces.push(entry),
            DeclarationKind::Abstract => self.report.abstracts.push(entry),
            DeclarationKind::Class => {}
        }
    }

    pub fn add_outcome(&mut self, outcome: ValidationOutcome) {
        match outcome {
            ValidationOutcome::NotFound(entry) => {
                self.report.not_found.insert(entry.fqcn, entry.file_name);
            }
            ValidationOutcome::Clean(entry) => {
                self.report.anomalous.retain(|a| a.fqcn != entry.fqcn);
                self.report.clean.insert(entry.fqcn, entry.file_name);
            }
            ValidationOutcome::Anomalous(entry) => {
                self.report.clean.remove(&entry.fqcn);
                match self
                    .report
                    .anomalous
                    .iter_mut()
                    .find(|existing| existing.fqcn == entry.fqcn)
                {
                    Some(existing) => *existing = entry,
                    None => self.report.anomalous.push(entry),
                }
            }
        }
    }

    pub fn set_stats(&mut self, stats: AnalysisStats) {
        self.report.stats = stats;
    }

    pub fn build(self) -> Report {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::{AttributeFindings, CleanType, NotFoundEntry};
    use pretty_assertions::assert_eq;

    fn anomalous(fqcn: &str, file: &str) -> AnomalousType {
        let mut findings = AttributeFindings::default();
        findings.class_attributes.push("Ghost".into());
        AnomalousType {
            fqcn: fqcn.into(),
            file_name: file.into(),
            findings,
        }
    }

    fn clean(fqcn: &str, file: &str) -> ValidationOutcome {
        ValidationOutcome::Clean(CleanType {
            fqcn: fqcn.into(),
            file_name: file.into(),
        })
    }

    #[test]
    fn validation_view_omits_empty_categories() {
        let mut builder = ReportBuilder::new();
        builder.add_outcome(ValidationOutcome::NotFound(NotFoundEntry {
            fqcn: "App\\Foo".into(),
            file_name: "Foo.php".into(),
        }));
        let report = builder.build();

        let value = serde_json::to_value(report.validation()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "notFoundClasses": { "App\\Foo": "Foo.php" } })
        );
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_report_serializes_every_snapshot_key() {
        let report = ReportBuilder::new().build();
        let value = serde_json::to_value(report.snapshot()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys.len(),
            7,
            "unexpected snapshot keys: {keys:?}"
        );
        for key in [
            "classesWithUndeclaredAttributes",
            "classesWithoutUndeclaredAttributes",
            "suspectClasses",
            "notFoundClasses",
            "trait",
            "interface",
            "abstract",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(report.validation().is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn later_outcome_wins_and_keeps_partition() {
        let mut builder = ReportBuilder::new();
        builder.add_outcome(ValidationOutcome::Anomalous(anomalous("A", "one.php")));
        builder.add_outcome(ValidationOutcome::Anomalous(anomalous("B", "two.php")));
        builder.add_outcome(clean("A", "three.php"));
        builder.add_outcome(ValidationOutcome::Anomalous(anomalous("B", "four.php")));
        let report = builder.build();

        assert_eq!(report.classes_with_undeclared_attributes().len(), 1);
        assert_eq!(
            report.classes_with_undeclared_attributes()[0].file_name,
            "four.php"
        );
        assert_eq!(
            report.classes_without_undeclared_attributes().get("A"),
            Some(&"three.php".to_string())
        );
    }

    #[test]
    fn side_entries_flatten_per_name() {
        let mut builder = ReportBuilder::new();
        builder.add_side_entry(
            DeclarationKind::Trait,
            SideRegistryEntry {
                namespace: Some("App".into()),
                file_name: "Loggable.php".into(),
                names: vec!["Loggable".into()],
            },
        );
        builder.add_side_entry(
            DeclarationKind::Class,
            SideRegistryEntry {
                namespace: None,
                file_name: "Ignored.php".into(),
                names: vec!["Ignored".into()],
            },
        );
        let report = builder.build();

        assert_eq!(report.traits().len(), 1);
        assert!(report.interfaces().is_empty());
        assert_eq!(
            report.trait_names(),
            vec![DeclaredName {
                namespace: Some("App".into()),
                file_name: "Loggable.php".into(),
                name: "Loggable".into(),
            }]
        );
    }

    #[test]
    fn interface_names_keep_namespace_and_file() {
        let mut builder = ReportBuilder::new();
        builder.add_side_entry(
            DeclarationKind::Interface,
            SideRegistryEntry {
                namespace: Some("App\\Contracts".into()),
                file_name: "Contracts.php".into(),
                names: vec!["Greets".into(), "Counts".into()],
            },
        );
        builder.add_side_entry(
            DeclarationKind::Interface,
            SideRegistryEntry {
                namespace: None,
                file_name: "Global.php".into(),
                names: vec!["Plain".into()],
            },
        );
        let report = builder.build();

        let names: Vec<_> = report
            .interface_names()
            .into_iter()
            .map(|d| (d.namespace, d.file_name, d.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (
                    Some("App\\Contracts".to_string()),
                    "Contracts.php".to_string(),
                    "Greets".to_string()
                ),
                (
                    Some("App\\Contracts".to_string()),
                    "Contracts.php".to_string(),
                    "Counts".to_string()
                ),
                (None, "Global.php".to_string(), "Plain".to_string()),
            ]
        );
        assert!(report.trait_names().is_empty());
        assert!(report.abstract_names().is_empty());
    }
}
