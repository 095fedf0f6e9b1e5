//! Single forward pass over a file's tokens that records its namespace and
//! the names it declares as class, trait, interface or abstract class.
//!
//! This is a recognizer, not a grammar. Odd files are expected to come out
//! with zero or several declarations and get routed to the suspect bucket;
//! only a late namespace and a repeated declaration name are errors.

use attrscan_lexer::{Token, TokenKind};
use attrscan_protocol::{DeclarationKind, DeclarationRecord};
use thiserror::Error;

use crate::error::AnalyzerError;

/// Structural violation found while scanning one file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("namespace `{namespace}` is not the first construct of the file")]
    DuplicateNamespace { namespace: String },

    #[error("{kind} {name} is declared twice")]
    DuplicateDeclaration { kind: DeclarationKind, name: String },
}

impl ScanError {
    /// Attach the offending file
    pub fn at(self, path: impl Into<String>) -> AnalyzerError {
        let path = path.into();
        match self {
            ScanError::DuplicateNamespace { namespace } => {
                AnalyzerError::DuplicateNamespace { path, namespace }
            }
            ScanError::DuplicateDeclaration { kind, name } => {
                AnalyzerError::DuplicateDeclaration { path, kind, name }
            }
        }
    }
}

/// What a token means to the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Namespace,
    /// `extends`, `implements`, `use`: the next name is a reference
    Reference,
    Abstract,
    TypeKeyword(DeclarationKind),
    Name,
    Other,
}

impl TokenClass {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Namespace => TokenClass::Namespace,
            TokenKind::Extends | TokenKind::Implements | TokenKind::Use => TokenClass::Reference,
            TokenKind::Abstract => TokenClass::Abstract,
            TokenKind::Class => TokenClass::TypeKeyword(DeclarationKind::Class),
            TokenKind::Trait => TokenClass::TypeKeyword(DeclarationKind::Trait),
            TokenKind::Interface => TokenClass::TypeKeyword(DeclarationKind::Interface),
            TokenKind::Identifier | TokenKind::NameQualified => TokenClass::Name,
            _ => TokenClass::Other,
        }
    }
}

/// Pending expectations between tokens.
///
/// The flags are independent: a name token settles them in priority order
/// (namespace capture, then a skipped reference, then a declared name), so a
/// pending namespace wins even when a type keyword came in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    pub namespace_pending: bool,
    /// Swallow the next name (or the next type keyword)
    pub skip_next: bool,
    pub declaration_pending: Option<DeclarationKind>,
    /// Turns the next declared name into an abstract class
    pub abstract_pending: bool,
}

/// Explicit-state declaration scanner.
#[derive(Debug)]
pub struct DeclarationScanner {
    state: ScanState,
    record: DeclarationRecord,
}

impl DeclarationScanner {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            state: ScanState::default(),
            record: DeclarationRecord::new(file_name),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Feed one token. Ignorable tokens are skipped.
    pub fn step(&mut self, token: &Token) -> Result<(), ScanError> {
        if token.is_ignorable() {
            return Ok(());
        }

        match TokenClass::of(token.kind) {
            TokenClass::Namespace => self.state.namespace_pending = true,
            TokenClass::Reference => self.state.skip_next = true,
            TokenClass::Abstract => self.state.abstract_pending = true,
            TokenClass::TypeKeyword(_) if self.state.skip_next => self.state.skip_next = false,
            TokenClass::TypeKeyword(kind) => self.state.declaration_pending = Some(kind),
            TokenClass::Name => self.take_name(&token.text)?,
            // only an immediately following name is a declared name
            TokenClass::Other => self.state.declaration_pending = None,
        }
        Ok(())
    }

    fn take_name(&mut self, name: &str) -> Result<(), ScanError> {
        if std::mem::take(&mut self.state.namespace_pending) {
            self.capture_namespace(name)
        } else if std::mem::take(&mut self.state.skip_next) {
            Ok(())
        } else if let Some(kind) = self.state.declaration_pending.take() {
            self.capture_declaration(kind, name)
        } else {
            Ok(())
        }
    }

    fn capture_namespace(&mut self, name: &str) -> Result<(), ScanError> {
        if self.record.namespace.is_some() || self.record.has_declarations() {
            return Err(ScanError::DuplicateNamespace {
                namespace: name.to_string(),
            });
        }
        self.record.namespace = Some(name.to_string());
        Ok(())
    }

    fn capture_declaration(&mut self, kind: DeclarationKind, name: &str) -> Result<(), ScanError> {
        let kind = if std::mem::take(&mut self.state.abstract_pending) {
            DeclarationKind::Abstract
        } else {
            kind
        };
        let bucket = self.record.names_mut(kind);
        if bucket.iter().any(|existing| existing == name) {
            return Err(ScanError::DuplicateDeclaration {
                kind,
                name: name.to_string(),
            });
        }
        bucket.push(name.to_string());
        Ok(())
    }

    pub fn finish(self) -> DeclarationRecord {
        self.record
    }
}

/// Scan a complete token stream
pub fn scan_tokens(tokens: &[Token], file_name: &str) -> Result<DeclarationRecord, ScanError> {
    let mut scanner = DeclarationScanner::new(file_name);
    for token in tokens {
        scanner.step(token)?;
    }
    Ok(scanner.finish())
}
