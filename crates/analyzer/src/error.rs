use attrscan_protocol::DeclarationKind;
use thiserror::Error;

use crate::registry::RegistryError;

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lexer error: {0}")]
    LexerError(#[from] attrscan_lexer::LexerError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Namespace must be defined first in {path} (found `{namespace}`)")]
    DuplicateNamespace { path: String, namespace: String },

    #[error("{kind} {name} has already been found in {path}")]
    DuplicateDeclaration {
        path: String,
        kind: DeclarationKind,
        name: String,
    },

    #[error("Registry error: {0}")]
    RegistryError(#[from] RegistryError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl AnalyzerError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
