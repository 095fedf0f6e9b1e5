use serde::{Deserialize, Serialize};

/// Classified PHP token kind.
///
/// Keywords the declaration scanner reacts to get their own variants; every
/// other reserved word is folded into [`TokenKind::Reserved`] carrying its
/// PHP token name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,

    /// `$name`
    Variable,
    /// Simple name, `T_STRING`
    Identifier,
    /// `Foo\Bar`
    NameQualified,
    /// `\Foo\Bar`
    NameFullyQualified,
    /// `namespace\Foo`
    NameRelative,

    LNumber,
    DNumber,
    /// Quoted string, heredoc, nowdoc or backtick command, as one token
    ConstantString,

    /// `#[`
    Attribute,

    Namespace,
    Use,
    Extends,
    Implements,
    Abstract,
    Class,
    Trait,
    Interface,
    Enum,

    /// Any other reserved word
    Reserved(&'static str),

    /// Multi-character operator
    Operator(&'static str),

    /// `(string)`, `(int)`, ... including the parentheses
    Cast(&'static str),

    /// Single-character token, named by its own text
    Char,
}

impl TokenKind {
    /// PHP token name, or `None` for single-character tokens
    pub fn token_name(self) -> Option<&'static str> {
        let name = match self {
            TokenKind::InlineHtml => "T_INLINE_HTML",
            TokenKind::OpenTag => "T_OPEN_TAG",
            TokenKind::OpenTagWithEcho => "T_OPEN_TAG_WITH_ECHO",
            TokenKind::CloseTag => "T_CLOSE_TAG",
            TokenKind::Whitespace => "T_WHITESPACE",
            TokenKind::Comment => "T_COMMENT",
            TokenKind::DocComment => "T_DOC_COMMENT",
            TokenKind::Variable => "T_VARIABLE",
            TokenKind::Identifier => "T_STRING",
            TokenKind::NameQualified => "T_NAME_QUALIFIED",
            TokenKind::NameFullyQualified => "T_NAME_FULLY_QUALIFIED",
            TokenKind::NameRelative => "T_NAME_RELATIVE",
            TokenKind::LNumber => "T_LNUMBER",
            TokenKind::DNumber => "T_DNUMBER",
            TokenKind::ConstantString => "T_CONSTANT_ENCAPSED_STRING",
            TokenKind::Attribute => "T_ATTRIBUTE",
            TokenKind::Namespace => "T_NAMESPACE",
            TokenKind::Use => "T_USE",
            TokenKind::Extends => "T_EXTENDS",
            TokenKind::Implements => "T_IMPLEMENTS",
            TokenKind::Abstract => "T_ABSTRACT",
            TokenKind::Class => "T_CLASS",
            TokenKind::Trait => "T_TRAIT",
            TokenKind::Interface => "T_INTERFACE",
            TokenKind::Enum => "T_ENUM",
            TokenKind::Reserved(name) | TokenKind::Operator(name) | TokenKind::Cast(name) => {
                name
            }
            TokenKind::Char => return None,
        };
        Some(name)
    }

    /// Whitespace, comments and the opening tag carry no syntax
    pub const fn is_ignorable(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::DocComment
                | TokenKind::OpenTag
        )
    }

    /// Look up a reserved word (case-insensitive)
    pub fn keyword(word: &str) -> Option<Self> {
        let lowered = word.to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "namespace" => TokenKind::Namespace,
            "use" => TokenKind::Use,
            "extends" => TokenKind::Extends,
            "implements" => TokenKind::Implements,
            "abstract" => TokenKind::Abstract,
            "class" => TokenKind::Class,
            "trait" => TokenKind::Trait,
            "interface" => TokenKind::Interface,
            "enum" => TokenKind::Enum,
            other => {
                return RESERVED_WORDS
                    .iter()
                    .find(|(text, _)| *text == other)
                    .map(|&(_, name)| TokenKind::Reserved(name))
            }
        };
        Some(kind)
    }

    /// Operator token by its exact text
    pub fn operator(text: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|(op, _)| *op == text)
            .map(|&(_, name)| TokenKind::Operator(name))
    }

    /// Cast token for the type written between the parentheses
    pub fn cast(type_name: &str) -> Option<Self> {
        let name = match type_name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => "T_INT_CAST",
            "bool" | "boolean" => "T_BOOL_CAST",
            "float" | "double" | "real" => "T_DOUBLE_CAST",
            "string" | "binary" => "T_STRING_CAST",
            "array" => "T_ARRAY_CAST",
            "object" => "T_OBJECT_CAST",
            "unset" => "T_UNSET_CAST",
            _ => return None,
        };
        Some(TokenKind::Cast(name))
    }
}

/// A single token with its source text and 1-indexed starting line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// PHP token name; single-character tokens are named by their text
    pub fn name(&self) -> &str {
        self.kind.token_name().unwrap_or(&self.text)
    }

    pub const fn is_ignorable(&self) -> bool {
        self.kind.is_ignorable()
    }

    /// Serializable `{name, text, line}` view
    pub fn dump(&self) -> TokenDump {
        TokenDump {
            name: self.name().to_string(),
            text: self.text.clone(),
            line: self.line,
        }
    }
}

/// Token as shown by the diagnostic dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDump {
    pub name: String,
    pub text: String,
    pub line: usize,
}

const RESERVED_WORDS: &[(&str, &str)] = &[
    ("and", "T_LOGICAL_AND"),
    ("array", "T_ARRAY"),
    ("as", "T_AS"),
    ("break", "T_BREAK"),
    ("callable", "T_CALLABLE"),
    ("case", "T_CASE"),
    ("catch", "T_CATCH"),
    ("clone", "T_CLONE"),
    ("const", "T_CONST"),
    ("continue", "T_CONTINUE"),
    ("declare", "T_DECLARE"),
    ("default", "T_DEFAULT"),
    ("die", "T_EXIT"),
    ("do", "T_DO"),
    ("echo", "T_ECHO"),
    ("else", "T_ELSE"),
    ("elseif", "T_ELSEIF"),
    ("empty", "T_EMPTY"),
    ("enddeclare", "T_ENDDECLARE"),
    ("endfor", "T_ENDFOR"),
    ("endforeach", "T_ENDFOREACH"),
    ("endif", "T_ENDIF"),
    ("endswitch", "T_ENDSWITCH"),
    ("endwhile", "T_ENDWHILE"),
    ("eval", "T_EVAL"),
    ("exit", "T_EXIT"),
    ("final", "T_FINAL"),
    ("finally", "T_FINALLY"),
    ("fn", "T_FN"),
    ("for", "T_FOR"),
    ("foreach", "T_FOREACH"),
    ("function", "T_FUNCTION"),
    ("global", "T_GLOBAL"),
    ("goto", "T_GOTO"),
    ("if", "T_IF"),
    ("include", "T_INCLUDE"),
    ("include_once", "T_INCLUDE_ONCE"),
    ("instanceof", "T_INSTANCEOF"),
    ("insteadof", "T_INSTEADOF"),
    ("isset", "T_ISSET"),
    ("list", "T_LIST"),
    ("match", "T_MATCH"),
    ("new", "T_NEW"),
    ("or", "T_LOGICAL_OR"),
    ("print", "T_PRINT"),
    ("private", "T_PRIVATE"),
    ("protected", "T_PROTECTED"),
    ("public", "T_PUBLIC"),
    ("readonly", "T_READONLY"),
    ("require", "T_REQUIRE"),
    ("require_once", "T_REQUIRE_ONCE"),
    ("return", "T_RETURN"),
    ("static", "T_STATIC"),
    ("switch", "T_SWITCH"),
    ("throw", "T_THROW"),
    ("try", "T_TRY"),
    ("unset", "T_UNSET"),
    ("var", "T_VAR"),
    ("while", "T_WHILE"),
    ("xor", "T_LOGICAL_XOR"),
    ("yield", "T_YIELD"),
    ("__class__", "T_CLASS_C"),
    ("__dir__", "T_DIR"),
    ("__file__", "T_FILE"),
    ("__function__", "T_FUNC_C"),
    ("__line__", "T_LINE"),
    ("__method__", "T_METHOD_C"),
    ("__namespace__", "T_NS_C"),
    ("__trait__", "T_TRAIT_C"),
    ("__halt_compiler", "T_HALT_COMPILER"),
];

const OPERATORS: &[(&str, &str)] = &[
    ("<<=", "T_SL_EQUAL"),
    (">>=", "T_SR_EQUAL"),
    ("**=", "T_POW_EQUAL"),
    ("??=", "T_COALESCE_EQUAL"),
    ("===", "T_IS_IDENTICAL"),
    ("!==", "T_IS_NOT_IDENTICAL"),
    ("<=>", "T_SPACESHIP"),
    ("...", "T_ELLIPSIS"),
    ("?->", "T_NULLSAFE_OBJECT_OPERATOR"),
    ("->", "T_OBJECT_OPERATOR"),
    ("=>", "T_DOUBLE_ARROW"),
    ("::", "T_DOUBLE_COLON"),
    ("++", "T_INC"),
    ("--", "T_DEC"),
    ("==", "T_IS_EQUAL"),
    ("!=", "T_IS_NOT_EQUAL"),
    ("<>", "T_IS_NOT_EQUAL"),
    ("<=", "T_IS_SMALLER_OR_EQUAL"),
    (">=", "T_IS_GREATER_OR_EQUAL"),
    ("+=", "T_PLUS_EQUAL"),
    ("-=", "T_MINUS_EQUAL"),
    ("*=", "T_MUL_EQUAL"),
    ("/=", "T_DIV_EQUAL"),
    (".=", "T_CONCAT_EQUAL"),
    ("%=", "T_MOD_EQUAL"),
    ("&=", "T_AND_EQUAL"),
    ("|=", "T_OR_EQUAL"),
    ("^=", "T_XOR_EQUAL"),
    ("&&", "T_BOOLEAN_AND"),
    ("||", "T_BOOLEAN_OR"),
    ("??", "T_COALESCE"),
    ("<<", "T_SL"),
    (">>", "T_SR"),
    ("**", "T_POW"),
    ("\\", "T_NS_SEPARATOR"),
];
