//! # attrscan lexer
//!
//! Tokenizer for PHP 8 source that names tokens the way the PHP tokenizer
//! does (`T_STRING`, `T_NAME_QUALIFIED`, `T_CLASS`, ...).
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> tree-sitter-php parse
//!     │
//!     ├──> Leaf walk in source order
//!     │    ├─> Names, variables and strings kept whole
//!     │    ├─> Casts absorb their parentheses
//!     │    ├─> Keywords, operators, punctuation by spelling
//!     │    └─> Gaps between leaves as whitespace
//!     │
//!     └──> Token[] { kind, text, line }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use attrscan_lexer::{significant, tokenize, TokenKind};
//!
//! let tokens = significant(tokenize("<?php\nnamespace App;\nclass Foo {}")?);
//! assert_eq!(tokens[0].kind, TokenKind::Namespace);
//! assert_eq!(tokens[3].name(), "T_CLASS");
//! assert_eq!(tokens[4].text, "Foo");
//! # Ok::<(), attrscan_lexer::LexerError>(())
//! ```

mod error;
mod lexer;
mod token;

use std::path::Path;

pub use error::{LexerError, Result};
pub use lexer::{significant, tokenize, PhpLexer};
pub use token::{Token, TokenDump, TokenKind};

/// Read and tokenize a file. Invalid UTF-8 is decoded lossily.
pub fn tokenize_file(path: impl AsRef<Path>) -> Result<Vec<Token>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LexerError::NotAFile(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    let source = String::from_utf8_lossy(&bytes);
    let tokens = tokenize(&source)?;
    log::trace!("{}: {} tokens", path.display(), tokens.len());
    Ok(tokens)
}
