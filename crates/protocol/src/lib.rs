//! Report model shared by the analyzer and the CLI.
//!
//! Everything here is plain data: declaration records, attribute findings,
//! the immutable [`Report`] and its serialized views.

use anyhow::Result;
use serde::Serialize;

mod declaration;
mod findings;
mod report;

pub use declaration::{
    qualify, DeclarationKind, DeclarationRecord, DeclaredName, SideRegistryEntry,
    NAMESPACE_SEPARATOR,
};
pub use findings::{
    AnomalousType, AttributeFindings, CleanType, MemberFindings, NotFoundEntry, ValidationOutcome,
};
pub use report::{AnalysisStats, Report, ReportBuilder, ReportSnapshot, ValidationView};

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let raw = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(raw)
}

/// JSON schema of the full report snapshot
pub fn snapshot_schema() -> schemars::Schema {
    schemars::schema_for!(ReportSnapshot)
}
