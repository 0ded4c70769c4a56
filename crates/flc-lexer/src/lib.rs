//! flc Lexer
//!
//! Tokenizes flc source files into a stream of tokens, one token per call.
//! Handles nested `(* ... *)` block comments, string escapes, decimal and
//! hexadecimal numbers, keywords and two-character operators.
//!
//! Scanning never aborts: every defect is recorded as a positioned
//! [`LexerError`] and the scanner keeps going until it reaches EOF.
//!
//! # Example
//!
//! ```
//! use flc_lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::from_source("demo.fl", "let x := 1");
//! assert_eq!(scanner.next_token().kind, TokenKind::Let);
//! assert_eq!(scanner.next_token().kind, TokenKind::Name);
//! assert_eq!(scanner.next_token().kind, TokenKind::Decl);
//! assert_eq!(scanner.next_token().kind, TokenKind::Int);
//! assert_eq!(scanner.next_token().kind, TokenKind::Eof);
//! assert!(scanner.diagnostics().is_empty());
//! ```

pub mod classify;
pub mod cursor;
pub mod scanner;
pub mod token;

pub use cursor::CodePoint;
pub use scanner::Scanner;
pub use token::{Span, Token, TokenKind};

/// Lexer diagnostic.
///
/// Positioned errors point at the start of the token being scanned when the
/// defect was found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("error: {path} ~ line {line}, column {column}\n  => {message}")]
    Lexical {
        path: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// The source could not be loaded at all.
    #[error("error: {path}\n  {message}")]
    Source { path: String, message: String },
}

impl LexerError {
    /// The bare description, without path or position.
    pub fn message(&self) -> &str {
        match self {
            LexerError::Lexical { message, .. } | LexerError::Source { message, .. } => message,
        }
    }

    /// `(line, column)` for lexical errors.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            LexerError::Lexical { line, column, .. } => Some((*line, *column)),
            LexerError::Source { .. } => None,
        }
    }
}
