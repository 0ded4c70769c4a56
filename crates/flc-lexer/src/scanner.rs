use std::path::Path;

use tracing::{debug, trace};

use crate::classify::{
    is_delimiter, is_digit, is_hex_digit, is_name_part, is_name_start, is_operator, is_space,
};
use crate::cursor::{CodePoint, Cursor};
use crate::token::{self, escape_char, Span, Token, TokenKind};
use crate::LexerError;

/// Start position and accumulated text of the token being scanned.
#[derive(Debug, Default)]
struct Draft {
    text: String,
    start: usize,
    line: usize,
    column: usize,
}

/// flc source scanner.
///
/// Produces one token per [`next_token`](Scanner::next_token) call. Defects
/// never stop the scanner; they are appended to
/// [`diagnostics`](Scanner::diagnostics) and scanning resumes, so a single
/// pass reports every independent problem in a file.
///
/// - The source gets a trailing newline so unterminated constructs at the
///   end of a file stop on a known character.
/// - Comments `(* ... *)` nest and never produce tokens.
/// - Once EOF has been returned, every later call returns EOF again.
pub struct Scanner {
    path: String,
    cursor: Cursor,
    draft: Draft,
    diagnostics: Vec<LexerError>,
}

impl Scanner {
    /// Create a scanner over the file at `path`.
    ///
    /// An unreadable file is recorded as a diagnostic and the scanner is
    /// left at EOF.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let label = path.display().to_string();

        match std::fs::read(path) {
            Ok(bytes) => {
                debug!(path = %label, bytes = bytes.len(), "loaded source");
                Self::from_bytes(label, bytes)
            }
            Err(err) => {
                debug!(path = %label, error = %err, "failed to read source");
                let mut scanner = Self::with_cursor(label.clone(), Cursor::exhausted());
                scanner.diagnostics.push(LexerError::Source {
                    path: label,
                    message: err.to_string(),
                });
                scanner
            }
        }
    }

    /// Create a scanner over in-memory source. `path` labels diagnostics.
    pub fn from_source(path: impl Into<String>, source: &str) -> Self {
        Self::from_bytes(path, source.as_bytes().to_vec())
    }

    /// Create a scanner over raw bytes, which need not be valid UTF-8.
    pub fn from_bytes(path: impl Into<String>, mut bytes: Vec<u8>) -> Self {
        bytes.push(b'\n');
        Self::with_cursor(path.into(), Cursor::new(bytes))
    }

    fn with_cursor(path: String, cursor: Cursor) -> Self {
        Self {
            path,
            cursor,
            draft: Draft::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize `source` in one go. The returned tokens end with EOF.
    pub fn tokenize(path: impl Into<String>, source: &str) -> (Vec<Token>, Vec<LexerError>) {
        let mut scanner = Scanner::from_source(path, source);
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, scanner.diagnostics)
    }

    /// Label used for this source in diagnostics.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Everything reported so far, in the order it was found.
    pub fn diagnostics(&self) -> &[LexerError] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Whether EOF has been reached.
    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.draft = Draft {
                text: String::new(),
                start: self.cursor.offset(),
                line: self.cursor.line(),
                column: self.cursor.column(),
            };

            if let Some(kind) = self.scan_token() {
                let draft = std::mem::take(&mut self.draft);
                let span = Span::new(
                    draft.start,
                    self.cursor.offset(),
                    draft.line,
                    draft.column,
                );
                trace!(kind = ?kind, line = span.line, column = span.column, "token");
                return Token::new(kind, draft.text, span);
            }
        }
    }

    /// Scan one lexeme. `None` means nothing was emitted (whitespace, a
    /// comment, or skipped bytes) and dispatch should start over.
    fn scan_token(&mut self) -> Option<TokenKind> {
        match self.cursor.peek() {
            CodePoint::Eof => {
                self.cursor.consume();
                Some(TokenKind::Eof)
            }
            CodePoint::Char(c) if is_space(c) => {
                self.cursor.consume();
                None
            }
            CodePoint::Char('(') => {
                self.cursor.consume();
                if self.cursor.eat('*') {
                    self.scan_block_comment();
                    return None;
                }
                Some(self.scan_delimiter('('))
            }
            CodePoint::Char(c) if is_delimiter(c) => {
                self.cursor.consume();
                Some(self.scan_delimiter(c))
            }
            CodePoint::Char('"') => {
                self.cursor.consume();
                Some(self.scan_string())
            }
            CodePoint::Char(c) if is_name_start(c) => {
                self.cursor.consume();
                Some(self.scan_name(c))
            }
            CodePoint::Char(c) if is_digit(c) => {
                self.cursor.consume();
                Some(self.scan_number(c))
            }
            CodePoint::Char(c) => {
                self.cursor.consume();
                self.error("unexpected UTF-8 character");
                self.draft.text.push(c);
                Some(TokenKind::Bad)
            }
            CodePoint::Malformed => {
                self.bump();
                None
            }
        }
    }

    // --- Scanners ---

    /// A delimiter, extended into a two-character operator when the next
    /// character completes one.
    fn scan_delimiter(&mut self, c: char) -> TokenKind {
        self.draft.text.push(c);

        if let CodePoint::Char(next) = self.cursor.peek() {
            if is_operator(&self.draft.text, next) {
                self.cursor.consume();
                self.draft.text.push(next);
                if let Some(kind) = token::reserved(&self.draft.text) {
                    return kind;
                }
            }
        }

        TokenKind::Delimiter(c)
    }

    /// Scan a decimal, float or `0x` hexadecimal literal.
    fn scan_number(&mut self, first: char) -> TokenKind {
        self.draft.text.push(first);

        if first == '0' && self.cursor.eat('x') {
            self.draft.text.push('x');
            while let Some(d) = self.cursor.eat_if(is_hex_digit) {
                self.draft.text.push(d);
            }
            if self.draft.text.len() == 2 {
                self.error("malformed hexadecimal literal");
                return TokenKind::Bad;
            }
            return TokenKind::Int;
        }

        while let Some(d) = self.cursor.eat_if(is_digit) {
            self.draft.text.push(d);
        }

        // `3.` is a float too.
        if self.cursor.eat('.') {
            self.draft.text.push('.');
            while let Some(d) = self.cursor.eat_if(is_digit) {
                self.draft.text.push(d);
            }
            return TokenKind::Float;
        }

        TokenKind::Int
    }

    /// Scan a string literal after its opening quote. The token text holds
    /// the decoded value.
    fn scan_string(&mut self) -> TokenKind {
        loop {
            match self.cursor.peek() {
                CodePoint::Eof => {
                    self.error("unclosed string literal");
                    break;
                }
                CodePoint::Char('\n') => {
                    self.cursor.consume();
                    self.error("unclosed string literal");
                    break;
                }
                CodePoint::Char('"') => {
                    self.cursor.consume();
                    break;
                }
                CodePoint::Char('\\') => {
                    self.cursor.consume();
                    self.scan_escape();
                }
                CodePoint::Char(c) if c.is_control() => {
                    self.cursor.consume();
                    self.error("illegal control character in string literal");
                }
                CodePoint::Char(c) => {
                    self.cursor.consume();
                    self.draft.text.push(c);
                }
                CodePoint::Malformed => {
                    self.bump();
                }
            }
        }
        TokenKind::String
    }

    /// Decode one escape sequence; the backslash is already consumed.
    ///
    /// A bad escape is reported and its raw text is kept in the token.
    fn scan_escape(&mut self) {
        let c = match self.cursor.peek() {
            CodePoint::Char(c) => {
                self.cursor.consume();
                c
            }
            CodePoint::Malformed => {
                self.bump();
                self.draft.text.push('\\');
                return;
            }
            CodePoint::Eof => {
                self.draft.text.push('\\');
                return;
            }
        };

        match c {
            'n' => self.draft.text.push('\n'),
            'r' => self.draft.text.push('\r'),
            't' => self.draft.text.push('\t'),
            '\\' | '\'' | '"' => self.draft.text.push(c),
            'u' => self.scan_unicode_escape(),
            c => self.scan_byte_escape(c),
        }
    }

    /// `\u{XXXX}`, after the `u`.
    fn scan_unicode_escape(&mut self) {
        if !self.cursor.eat('{') {
            self.error("missing opening '{' in unicode escape sequence");
            self.draft.text.push_str("\\u");
            return;
        }

        let mut digits = String::new();
        while let Some(d) = self.cursor.eat_if(is_hex_digit) {
            digits.push(d);
        }

        if digits.is_empty() {
            if self.cursor.eat('}') {
                self.error("empty unicode escape sequence");
                self.draft.text.push_str("\\u{}");
            } else {
                let next = self.lookahead_text();
                self.error(format!(
                    "unexpected character in unicode escape sequence '{next}'"
                ));
                self.draft.text.push_str("\\u{");
            }
            return;
        }

        if !self.cursor.eat('}') {
            self.error("missing closing '}' in unicode escape sequence");
            self.draft.text.push_str("\\u{");
            self.draft.text.push_str(&digits);
            return;
        }

        match u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32) {
            Some(c) => self.draft.text.push(c),
            None => {
                self.error(format!(
                    "invalid code point in unicode escape sequence '{digits}'"
                ));
                self.draft.text.push_str(&format!("\\u{{{digits}}}"));
            }
        }
    }

    /// `\HH`, a two-digit hex escape for U+0000..=U+00FF. `first` is the
    /// character right after the backslash.
    fn scan_byte_escape(&mut self, first: char) {
        if !is_hex_digit(first) {
            self.error(format!(
                "unexpected character in hexadecimal escape sequence '{}'",
                escape_char(first)
            ));
            self.draft.text.push('\\');
            self.draft.text.push(first);
            return;
        }

        let Some(second) = self.cursor.eat_if(is_hex_digit) else {
            let next = self.lookahead_text();
            self.error(format!(
                "unexpected character in hexadecimal escape sequence '{next}'"
            ));
            self.draft.text.push('\\');
            self.draft.text.push(first);
            return;
        };

        let value = first
            .to_digit(16)
            .zip(second.to_digit(16))
            .and_then(|(hi, lo)| char::from_u32((hi << 4) | lo));
        if let Some(c) = value {
            self.draft.text.push(c);
        }
    }

    /// Scan a name or reserved word.
    fn scan_name(&mut self, first: char) -> TokenKind {
        self.draft.text.push(first);
        while let Some(c) = self.cursor.eat_if(is_name_part) {
            self.draft.text.push(c);
        }
        token::reserved(&self.draft.text).unwrap_or(TokenKind::Name)
    }

    /// Skip a block comment after its opening `(*`. Comments nest.
    fn scan_block_comment(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            match self.cursor.peek() {
                CodePoint::Eof => {
                    self.error("unclosed block comment");
                    return;
                }
                CodePoint::Char('(') => {
                    self.cursor.consume();
                    if self.cursor.eat('*') {
                        depth += 1;
                    }
                }
                CodePoint::Char('*') => {
                    self.cursor.consume();
                    if self.cursor.eat(')') {
                        depth -= 1;
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    // --- Helpers ---

    /// Consume one code point, reporting it if the bytes were malformed.
    fn bump(&mut self) {
        if self.cursor.consume() == CodePoint::Malformed {
            self.error("malformed UTF-8 encoding");
        }
    }

    /// The lookahead, rendered for an error message.
    fn lookahead_text(&self) -> String {
        match self.cursor.peek() {
            CodePoint::Char(c) => escape_char(c),
            CodePoint::Malformed => escape_char(char::REPLACEMENT_CHARACTER),
            CodePoint::Eof => "EOF".into(),
        }
    }

    /// Record a diagnostic at the start of the current token.
    fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(
            line = self.draft.line,
            column = self.draft.column,
            message = %message,
            "lexical diagnostic"
        );
        self.diagnostics.push(LexerError::Lexical {
            path: self.path.clone(),
            line: self.draft.line,
            column: self.draft.column,
            message,
        });
    }
}

/// Yields tokens up to, but not including, EOF.
impl Iterator for Scanner {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (!token.is_eof()).then_some(token)
    }
}
