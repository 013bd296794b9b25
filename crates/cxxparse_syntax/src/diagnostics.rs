//! Error types shared by the lexer, the token cursor and the parser.
//!
//! Two families live here:
//! - [`ParseError`] is the control signal grammar rules return: "this alternative did not match" or "the token stream
//!   ran out". It never reaches end users.
//! - [`SyntaxError`] and [`LexError`] are the recorded problems a caller can report with source context.

use crate::ast::Span;
use thiserror::Error;

/// Why a grammar rule did not produce a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not match this alternative; the cursor is back where the rule started.
    #[error("no grammar alternative matched")]
    Backtrack,
    /// Lookahead or consumption ran past the last token.
    #[error("unexpected end of input")]
    EndOfInput,
}

/// Result of a grammar rule.
pub type ParseResult<T> = Result<T, ParseError>;

/// A recoverable lexical problem. The lexer has already skipped the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A syntax problem recorded by the error recovery controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// A declaration that parsed but cannot be turned into nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("a function body may only follow a single declarator, found {0}")]
    BodyWithMultipleDeclarators(usize),
    #[error("a function body must follow a function declarator")]
    BodyWithoutFunctionDeclarator,
}
