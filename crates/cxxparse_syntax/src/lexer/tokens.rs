//! Token types for the C/C++ lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - [`TokenKind`] is `Copy`; the lexeme lives in [`Token::image`], so the parser can compare kinds freely and only
//!   touches text when it builds a node.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use crate::ast::Span;
use cxxparse_core::lang::keywords::KeywordId;
use cxxparse_core::lang::operators::OperatorId;
use cxxparse_core::lang::punctuation::PunctuationId;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident,
    Integer,
    Float,
    /// `'a'` or `L'a'`
    Char,
    /// `"abc"` or `L"abc"`
    String,
}

/// A token with its kind, lexeme and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub image: String,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, image: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            image: image.into(),
            span,
        }
    }
}
