use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use unicode_general_category::{get_general_category, GeneralCategory};

/// A position in source text, tracking line and column for error reporting.
///
/// `start` and `end` are byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Token classification for flc source.
///
/// Single-character punctuation is carried as [`TokenKind::Delimiter`] with
/// the raw character; everything else has its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure
    Bad,
    Eof,

    // Punctuation (`(`, `:`, `+`, ...)
    Delimiter(char),

    // Literals
    ValueType,
    Name,
    Bool,
    Int,
    Float,
    String,

    // Keywords
    Type,
    Func,
    Let,
    Var,
    If,
    Then,
    Else,
    In,
    Where,

    // Two-character operators
    Shl,
    Shr,
    Decl,
    Concat,
    Block,
    Arrow,
    Eq,
    Ne,
    And,
    Or,
    Le,
    Ge,
}

impl TokenKind {
    /// Display name used when printing tokens.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Bad => "BAD",
            TokenKind::Eof => "EOF",
            TokenKind::Delimiter(_) => "DELIMITER",
            TokenKind::ValueType => "VALUE_TYPE",
            TokenKind::Name => "NAME",
            TokenKind::Bool => "BOOL",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Type => "TYPE",
            TokenKind::Func => "FUNC",
            TokenKind::Let => "LET",
            TokenKind::Var => "VAR",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::In => "IN",
            TokenKind::Where => "WHERE",
            TokenKind::Shl => "SHL",
            TokenKind::Shr => "SHR",
            TokenKind::Decl => "DECL",
            TokenKind::Concat => "CONCAT",
            TokenKind::Block => "BLOCK",
            TokenKind::Arrow => "ARROW",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Le => "LE",
            TokenKind::Ge => "GE",
        }
    }

    /// The raw code point of a single-character delimiter.
    pub fn code(self) -> Option<u32> {
        match self {
            TokenKind::Delimiter(c) => Some(c as u32),
            _ => None,
        }
    }
}

/// Reserved spellings: keywords, value-type names, booleans and the
/// two-character operators.
static RESERVED: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    HashMap::from([
        ("unit", TokenKind::ValueType),
        ("bool", TokenKind::ValueType),
        ("int", TokenKind::ValueType),
        ("float", TokenKind::ValueType),
        ("string", TokenKind::ValueType),
        ("true", TokenKind::Bool),
        ("false", TokenKind::Bool),
        ("type", TokenKind::Type),
        ("func", TokenKind::Func),
        ("let", TokenKind::Let),
        ("var", TokenKind::Var),
        ("if", TokenKind::If),
        ("then", TokenKind::Then),
        ("else", TokenKind::Else),
        ("in", TokenKind::In),
        ("where", TokenKind::Where),
        ("<<", TokenKind::Shl),
        (">>", TokenKind::Shr),
        (":=", TokenKind::Decl),
        ("++", TokenKind::Concat),
        ("::", TokenKind::Block),
        ("->", TokenKind::Arrow),
        ("=>", TokenKind::Arrow),
        ("==", TokenKind::Eq),
        ("!=", TokenKind::Ne),
        ("&&", TokenKind::And),
        ("||", TokenKind::Or),
        ("<=", TokenKind::Le),
        (">=", TokenKind::Ge),
    ])
});

/// Look up a spelling in the reserved table.
pub fn reserved(text: &str) -> Option<TokenKind> {
    RESERVED.get(text).copied()
}

/// A token produced by the flc scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = escape_str(&self.text);
        match self.kind {
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::String => write!(f, "STRING(\"{text}\")"),
            TokenKind::Bad => write!(f, "BAD('{text}')"),
            TokenKind::Delimiter(_) => write!(f, "'{text}'"),
            kind => write!(f, "{}('{text}')", kind.name()),
        }
    }
}

/// Render a character so it can be printed on one line.
///
/// Newline, carriage return, tab and both quotes get their backslash
/// spelling; other non-printable characters become `\<hex>`.
pub fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".into(),
        '\r' => "\\r".into(),
        '\t' => "\\t".into(),
        '\'' => "\\'".into(),
        '"' => "\\\"".into(),
        c if is_printable(c) => c.to_string(),
        c => format!("\\{:x}", c as u32),
    }
}

pub fn escape_str(text: &str) -> String {
    text.chars().map(escape_char).collect()
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
                | GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::new(0, text.len(), 1, 1))
    }

    #[test]
    fn test_reserved_keywords() {
        assert_eq!(reserved("let"), Some(TokenKind::Let));
        assert_eq!(reserved("where"), Some(TokenKind::Where));
        assert_eq!(reserved("unit"), Some(TokenKind::ValueType));
        assert_eq!(reserved("false"), Some(TokenKind::Bool));
        assert_eq!(reserved("lets"), None);
    }

    #[test]
    fn test_reserved_operators() {
        assert_eq!(reserved(":="), Some(TokenKind::Decl));
        assert_eq!(reserved("->"), Some(TokenKind::Arrow));
        assert_eq!(reserved("=>"), Some(TokenKind::Arrow));
        assert_eq!(reserved("<<"), Some(TokenKind::Shl));
        assert_eq!(reserved("+"), None);
    }

    #[test]
    fn test_delimiter_code_is_raw_char() {
        assert_eq!(TokenKind::Delimiter(':').code(), Some(':' as u32));
        assert_eq!(TokenKind::Name.code(), None);
    }

    #[test]
    fn test_display_eof() {
        assert_eq!(tok(TokenKind::Eof, "").to_string(), "EOF");
    }

    #[test]
    fn test_display_string_escapes_text() {
        assert_eq!(
            tok(TokenKind::String, "a\n\"b\"").to_string(),
            "STRING(\"a\\n\\\"b\\\"\")"
        );
    }

    #[test]
    fn test_display_bad() {
        assert_eq!(tok(TokenKind::Bad, "0x").to_string(), "BAD('0x')");
    }

    #[test]
    fn test_display_delimiter() {
        assert_eq!(tok(TokenKind::Delimiter('('), "(").to_string(), "'('");
    }

    #[test]
    fn test_display_named_kinds() {
        assert_eq!(tok(TokenKind::Name, "it's").to_string(), "NAME('it\\'s')");
        assert_eq!(tok(TokenKind::Decl, ":=").to_string(), "DECL(':=')");
        assert_eq!(tok(TokenKind::Float, "3.14").to_string(), "FLOAT('3.14')");
    }

    #[test]
    fn test_escape_non_printable_as_hex() {
        assert_eq!(escape_char('\u{1}'), "\\1");
        assert_eq!(escape_char('\u{7f}'), "\\7f");
        assert_eq!(escape_char('\u{200b}'), "\\200b");
        assert_eq!(escape_char('é'), "é");
        assert_eq!(escape_char(' '), " ");
    }

    #[test]
    fn test_escape_format_private_and_unassigned() {
        assert_eq!(escape_char('\u{2066}'), "\\2066");
        assert_eq!(escape_char('\u{2069}'), "\\2069");
        assert_eq!(escape_char('\u{61c}'), "\\61c");
        assert_eq!(escape_char('\u{fff9}'), "\\fff9");
        assert_eq!(escape_char('\u{e0001}'), "\\e0001");
        assert_eq!(escape_char('\u{e000}'), "\\e000");
        assert_eq!(escape_char('\u{378}'), "\\378");
    }

    #[test]
    fn test_escape_separators_other_than_ascii_space() {
        assert_eq!(escape_char('\u{a0}'), "\\a0");
        assert_eq!(escape_char('\u{2028}'), "\\2028");
        assert_eq!(escape_char('\u{2029}'), "\\2029");
    }

    #[test]
    fn test_display_string_escapes_bidi_isolate() {
        assert_eq!(
            tok(TokenKind::String, "a\u{2067}b").to_string(),
            "STRING(\"a\\2067b\")"
        );
    }
}
