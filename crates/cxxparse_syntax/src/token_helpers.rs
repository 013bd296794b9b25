//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy to work with ID-based
//! tokens.

use crate::lexer::{Token, TokenKind};
use cxxparse_core::lang::keywords::KeywordId;
use cxxparse_core::lang::operators::OperatorId;
use cxxparse_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for identifiers.
    pub fn is_ident(&self) -> bool {
        matches!(self, TokenKind::Ident)
    }

    /// Return `true` for `*` and `&`, the tokens that begin a pointer operator.
    pub fn is_pointer(&self) -> bool {
        matches!(self, TokenKind::Operator(OperatorId::Star | OperatorId::Amp))
    }

    /// Return `true` for tokens that may only begin an expression, never a parameter declaration.
    ///
    /// Used to tell `int x(5);` (a constructor-style initializer) from `int f(int);`.
    pub fn looks_like_expression(&self) -> bool {
        match self {
            TokenKind::Integer | TokenKind::Float | TokenKind::Char | TokenKind::String => true,
            TokenKind::Keyword(KeywordId::True | KeywordId::False | KeywordId::This) => true,
            TokenKind::Operator(
                OperatorId::Amp
                | OperatorId::Not
                | OperatorId::Minus
                | OperatorId::Plus
                | OperatorId::PlusPlus
                | OperatorId::MinusMinus,
            ) => true,
            _ => false,
        }
    }

    /// Return `true` for literal tokens (including `true`/`false`).
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Keyword(KeywordId::True | KeywordId::False)
        )
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }
}
