use crate::error::{LexerError, Result};
use crate::token::{Token, TokenKind};
use std::ops::Range;
use tree_sitter::{Language, Node, Parser};

/// Tokenize PHP source text with a fresh [`PhpLexer`].
///
/// Malformed input still tokenizes: error recovery leaves its leaves in the
/// tree and anything outside a leaf comes out as a gap token.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    PhpLexer::new()?.tokenize(source)
}

/// Drop whitespace, comments and the opening tag
pub fn significant(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| !t.is_ignorable()).collect()
}

/// PHP tokenizer on top of the tree-sitter PHP grammar.
///
/// Every leaf of the syntax tree becomes a token. Names, variables and
/// string literals are kept whole instead of being split into their leaves,
/// and a cast absorbs its parentheses the way `T_STRING_CAST` does. Text
/// between leaves is emitted too, so the token texts concatenate back to
/// the source.
pub struct PhpLexer {
    parser: Parser,
}

impl PhpLexer {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_php::LANGUAGE_PHP.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| LexerError::tree_sitter(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Token>> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| LexerError::parse("Failed to parse source code"))?;

        let mut collector = Collector::new(source);
        let mut cursor = tree.walk();
        loop {
            let descend = collector.visit(cursor.node());
            if descend && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return Ok(collector.finish());
                }
            }
        }
    }
}

/// Accumulates tokens in source order while the tree is walked
struct Collector<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Collector<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    /// Emit whatever `node` stands for; true when its children still need a visit
    fn visit(&mut self, node: Node) -> bool {
        let range = node.byte_range();
        // zero-width nodes are inserted by error recovery
        if range.is_empty() || range.end <= self.pos {
            return false;
        }

        if node.kind() == "cast_expression" {
            self.cast(node);
            return true;
        }
        if range.start < self.pos {
            return node.child_count() > 0;
        }

        let text = self.text(range.clone());
        if let Some(kind) = atom_kind(node, text) {
            self.emit(range, kind);
            return false;
        }
        if node.child_count() > 0 {
            return true;
        }
        let kind = leaf_kind(node, text);
        self.emit(range, kind);
        false
    }

    /// `(type)` becomes one token; the operand is visited as usual
    fn cast(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        let Some(type_node) = children.iter().find(|c| c.kind() == "cast_type") else {
            return;
        };
        let close = children
            .iter()
            .find(|c| c.kind() == ")" && c.start_byte() >= type_node.end_byte());
        let kind = TokenKind::cast(self.text(type_node.byte_range()));
        if let (Some(close), Some(kind)) = (close, kind) {
            self.emit(node.start_byte()..close.end_byte(), kind);
        }
    }

    fn text(&self, range: Range<usize>) -> &'a str {
        self.source.get(range).unwrap_or_default()
    }

    fn emit(&mut self, range: Range<usize>, kind: TokenKind) {
        if range.start > self.pos {
            self.gap(range.start);
        }
        let text = self.text(range.clone());
        self.push(kind, text);
        self.pos = range.end;
    }

    fn gap(&mut self, end: usize) {
        let text = self.text(self.pos..end);
        let kind = if text.chars().all(char::is_whitespace) {
            TokenKind::Whitespace
        } else {
            TokenKind::Char
        };
        self.push(kind, text);
        self.pos = end;
    }

    fn push(&mut self, kind: TokenKind, text: &str) {
        self.tokens.push(Token::new(kind, text, self.line));
        self.line += text.matches('\n').count();
    }

    fn finish(mut self) -> Vec<Token> {
        if self.pos < self.source.len() {
            self.gap(self.source.len());
        }
        self.tokens
    }
}

/// Subtrees that make up a single PHP token
fn atom_kind(node: Node, text: &str) -> Option<TokenKind> {
    if !node.is_named() {
        return None;
    }
    let kind = match node.kind() {
        "variable_name" => TokenKind::Variable,
        "qualified_name" | "namespace_name" => name_kind(text),
        "string" | "encapsed_string" | "heredoc" | "nowdoc" | "shell_command_expression" => {
            TokenKind::ConstantString
        }
        _ => return None,
    };
    Some(kind)
}

fn leaf_kind(node: Node, text: &str) -> TokenKind {
    match (node.is_named(), node.kind()) {
        (true, "comment") if is_doc_comment(text) => TokenKind::DocComment,
        (true, "comment") => TokenKind::Comment,
        (true, "php_tag") if text.starts_with("<?=") => TokenKind::OpenTagWithEcho,
        (true, "php_tag") => TokenKind::OpenTag,
        (true, "text") => TokenKind::InlineHtml,
        (true, "integer") => TokenKind::LNumber,
        (true, "float") => TokenKind::DNumber,
        (true, "name") => TokenKind::Identifier,
        (false, "?>") => TokenKind::CloseTag,
        (false, "#[") => TokenKind::Attribute,
        // keywords, modifiers, operators and punctuation
        _ => TokenKind::keyword(text)
            .or_else(|| TokenKind::operator(text))
            .unwrap_or_else(|| {
                if is_identifier(text) {
                    TokenKind::Identifier
                } else {
                    TokenKind::Char
                }
            }),
    }
}

/// Name token flavour from its spelling
fn name_kind(text: &str) -> TokenKind {
    let relative = text
        .get(..10)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("namespace\\"));
    if text.starts_with('\\') {
        TokenKind::NameFullyQualified
    } else if relative {
        TokenKind::NameRelative
    } else if text.contains('\\') {
        TokenKind::NameQualified
    } else {
        TokenKind::Identifier
    }
}

fn is_doc_comment(text: &str) -> bool {
    text.strip_prefix("/**")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic() || !c.is_ascii())
        && chars.all(|c| c == '_' || c.is_alphanumeric() || !c.is_ascii())
}
