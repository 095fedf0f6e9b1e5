use anyhow::Result;
use attrscan_protocol::{serialize_json, Report};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Every category, empty ones included
    #[default]
    Full,
    /// Only non-empty problem categories
    Validation,
}

pub fn render_report(report: &Report, view: View, pretty: bool) -> Result<String> {
    match view {
        View::Full => serialize_json(&report.snapshot(), pretty),
        View::Validation => serialize_json(&report.validation(), pretty),
    }
}

pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    serialize_json(value, pretty)
}

/// One-line stderr summary
pub fn summary(report: &Report) -> String {
    let stats = report.stats();
    format!(
        "Scanned {} of {} files in {}ms: {} with undeclared attributes, {} clean, {} suspect, {} not found",
        stats.files_scanned,
        stats.files_discovered,
        stats.time_ms,
        report.classes_with_undeclared_attributes().len(),
        report.classes_without_undeclared_attributes().len(),
        report.suspect_classes().len(),
        report.not_found_classes().len()
    )
}
