//! # attrscan analyzer
//!
//! Finds "ghost" attributes: PHP attributes whose defining class does not
//! resolve in the loaded type environment.
//!
//! ## Pipeline
//!
//! ```text
//! Root path
//!     │
//!     ├──> Source Finder (walkdir / ignore, exclude globs)
//!     │      └─> *.php files, sorted
//!     │
//!     ├──> Declaration Scanner (per file, single pass)
//!     │      └─> DeclarationRecord
//!     │
//!     ├──> Classifier
//!     │      ├─> suspect files
//!     │      ├─> trait / interface / abstract registries
//!     │      └─> lone class ──> Validator ──> TypeRegistry
//!     │
//!     └──> fold ──> Report
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use attrscan_analyzer::{Analyzer, AnalyzerConfig, ManifestRegistry};
//!
//! fn main() -> attrscan_analyzer::Result<()> {
//!     let registry = ManifestRegistry::from_json_file("registry.json")?;
//!     let analyzer = Analyzer::new(&registry, AnalyzerConfig::default())?;
//!     let report = analyzer.analyze("src")?;
//!
//!     for anomaly in report.classes_with_undeclared_attributes() {
//!         println!("{} ({})", anomaly.fqcn, anomaly.file_name);
//!     }
//!     Ok(())
//! }
//! ```

mod analyzer;
mod classify;
mod collector;
mod config;
mod declarations;
mod diagnostics;
mod discovery;
mod error;
mod registry;
mod validator;

use std::path::Path;

pub use analyzer::{fold, Analyzer, FileOutcome, ScannedFile};
pub use classify::{classify, Classification};
pub use collector::{Annotated, AnnotationCollector};
pub use config::{AnalyzerConfig, StructuralErrorPolicy, DEFAULT_EXTENSION};
pub use declarations::{scan_tokens, DeclarationScanner, ScanError, ScanState, TokenClass};
pub use diagnostics::{debug_file, debug_suspect_files};
pub use discovery::{discover, Discovery, SourceFinder};
pub use error::{AnalyzerError, Result};
pub use registry::{
    normalize_name, ManifestRegistry, MemberDescriptor, MethodDescriptor, RegistryError,
    TypeDescriptor, TypeRegistry,
};
pub use validator::Validator;

pub use attrscan_protocol::Report;

/// Analyze `root` with the default configuration
pub fn analyze<R: TypeRegistry + ?Sized>(root: impl AsRef<Path>, registry: &R) -> Result<Report> {
    Analyzer::new(registry, AnalyzerConfig::default())?.analyze(root)
}
