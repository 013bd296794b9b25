//! Token cursor with lookahead and rollback.
//!
//! The cursor pulls tokens lazily from a [`TokenSource`] and keeps every fetched token for the lifetime of the
//! parse, so a [`Mark`] taken anywhere stays valid and restoring one is O(1).
//!
//! ## Notes
//! - Lookahead is 1-based: `peek(1)` is the current token.
//! - Lexer errors never reach the grammar. They are logged, kept in [`TokenCursor::lexer_errors`], and the fetch is
//!   retried.

use crate::ast::{Name, Span};
use crate::diagnostics::{LexError, ParseError, ParseResult};
use crate::lexer::{Token, TokenKind};

/// A pull interface producing tokens one at a time.
pub trait TokenSource {
    /// Produce the next token.
    ///
    /// ## Returns
    /// - `Ok(Some(token))` for the next token, `Ok(None)` when exhausted.
    /// - `Err(LexError)` for a recoverable lexical problem; the next call continues after it.
    fn next_token(&mut self) -> Result<Option<Token>, LexError>;
}

/// A token source over an already lexed token vector.
#[derive(Debug, Clone)]
pub struct VecSource {
    tokens: std::vec::IntoIter<Token>,
}

impl From<Vec<Token>> for VecSource {
    fn from(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
        }
    }
}

impl TokenSource for VecSource {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Ok(self.tokens.next())
    }
}

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(usize);

impl Mark {
    /// Index of the token this mark points at.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lookahead/consume/rollback cursor over a [`TokenSource`].
pub struct TokenCursor<S> {
    source: S,
    tokens: Vec<Token>,
    pos: usize,
    exhausted: bool,
    furthest: usize,
    lexer_errors: Vec<LexError>,
}

impl<S: TokenSource> TokenCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            pos: 0,
            exhausted: false,
            furthest: 0,
            lexer_errors: Vec::new(),
        }
    }

    /// Make sure the token at `index` has been fetched. Returns `false` if the source ends first.
    fn fill(&mut self, index: usize) -> bool {
        while self.tokens.len() <= index {
            if self.exhausted {
                return false;
            }
            match self.source.next_token() {
                Ok(Some(token)) => self.tokens.push(token),
                Ok(None) => self.exhausted = true,
                Err(err) => {
                    tracing::debug!(start = err.span.start, error = %err, "skipping lexical error");
                    self.lexer_errors.push(err);
                }
            }
        }
        true
    }

    /// Return the token `n` positions ahead (1-based) without consuming it.
    ///
    /// ## Errors
    /// - [`ParseError::EndOfInput`] if the stream ends before position `n`.
    pub fn peek(&mut self, n: usize) -> ParseResult<&Token> {
        let index = self.pos + n.saturating_sub(1);
        if self.fill(index) {
            Ok(&self.tokens[index])
        } else {
            Err(ParseError::EndOfInput)
        }
    }

    /// Kind of the token `n` positions ahead, or `None` past the end of input.
    ///
    /// Pure lookahead helpers use this so that inspecting past the end is a non-match rather than an error.
    pub fn peek_kind(&mut self, n: usize) -> Option<TokenKind> {
        self.peek(n).ok().map(|t| t.kind)
    }

    /// Consume the current token and return it.
    ///
    /// ## Errors
    /// - [`ParseError::EndOfInput`] if no token remains.
    pub fn consume(&mut self) -> ParseResult<&Token> {
        if !self.fill(self.pos) {
            return Err(ParseError::EndOfInput);
        }
        self.pos += 1;
        self.furthest = self.furthest.max(self.pos);
        Ok(&self.tokens[self.pos - 1])
    }

    /// Consume the current token only if it has the given kind.
    ///
    /// ## Errors
    /// - [`ParseError::Backtrack`] on a kind mismatch; the cursor does not move.
    /// - [`ParseError::EndOfInput`] if no token remains.
    pub fn consume_expected(&mut self, kind: TokenKind) -> ParseResult<&Token> {
        if self.peek(1)?.kind == kind {
            self.consume()
        } else {
            Err(ParseError::Backtrack)
        }
    }

    /// Return `true` once every token has been consumed.
    pub fn is_at_end(&mut self) -> bool {
        !self.fill(self.pos)
    }

    /// The current position.
    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// Rewind (or fast-forward) to a previously taken mark.
    pub fn restore(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    /// The most recently consumed token, relative to the current position.
    pub fn last_consumed(&self) -> Option<&Token> {
        self.pos.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    /// End offset of the last consumed token, or 0 at the start of input.
    pub fn last_end(&self) -> usize {
        self.last_consumed().map_or(0, |t| t.span.end)
    }

    /// A fetched token by mark.
    pub fn token_at(&self, mark: Mark) -> Option<&Token> {
        self.tokens.get(mark.0)
    }

    /// The farthest position any consumption has reached.
    pub fn furthest(&self) -> Mark {
        Mark(self.furthest)
    }

    /// Reset the farthest-position tracker, e.g. at the start of a new top-level attempt.
    pub fn set_furthest(&mut self, mark: Mark) {
        self.furthest = mark.0;
    }

    /// Source span of the token at `mark`, or an empty span at the end of the last token when `mark` is past the
    /// end of input.
    pub fn span_at(&mut self, mark: Mark) -> Span {
        if self.fill(mark.0) {
            self.tokens[mark.0].span
        } else {
            let end = self.tokens.last().map_or(0, |t| t.span.end);
            Span::new(end, end)
        }
    }

    /// Reconstruct the tokens in `[from, to)` as a [`Name`].
    ///
    /// Images are joined with a single space wherever the source had a gap between two tokens.
    pub fn name_between(&self, from: Mark, to: Mark) -> Option<Name> {
        let tokens = self.tokens.get(from.0..to.0)?;
        let first = tokens.first()?;
        let last = tokens.last()?;
        let mut text = String::new();
        let mut prev_end = first.span.start;
        for token in tokens {
            if token.span.start > prev_end {
                text.push(' ');
            }
            text.push_str(&token.image);
            prev_end = token.span.end;
        }
        Some(Name {
            text,
            span: Span::new(first.span.start, last.span.end),
            token_count: tokens.len(),
        })
    }

    /// Lexical errors skipped so far.
    pub fn lexer_errors(&self) -> &[LexError] {
        &self.lexer_errors
    }

    pub fn take_lexer_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.lexer_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;
    use crate::lexer::Lexer;
    use cxxparse_core::lang::punctuation::PunctuationId;

    fn cursor(source: &str) -> TokenCursor<Lexer<'_>> {
        TokenCursor::new(Lexer::new(source, Language::Cpp))
    }

    #[test]
    fn test_peek_is_one_based_and_lazy() {
        let mut c = cursor("a b c");
        assert_eq!(c.peek(3).map(|t| t.image.clone()), Ok("c".to_string()));
        assert_eq!(c.peek(1).map(|t| t.image.clone()), Ok("a".to_string()));
        assert_eq!(c.peek(4).map(|t| t.image.clone()), Err(ParseError::EndOfInput));
        assert_eq!(c.peek_kind(4), None);
    }

    #[test]
    fn test_mark_and_restore() {
        let mut c = cursor("a b c");
        let start = c.mark();
        assert!(c.consume().is_ok());
        assert!(c.consume().is_ok());
        assert_eq!(c.last_consumed().map(|t| t.image.as_str()), Some("b"));
        c.restore(start);
        assert_eq!(c.peek(1).map(|t| t.image.clone()), Ok("a".to_string()));
        assert!(c.last_consumed().is_none());
        assert_eq!(c.furthest(), Mark(2));
    }

    #[test]
    fn test_consume_expected_does_not_advance_on_mismatch() {
        let mut c = cursor("a ;");
        let before = c.mark();
        assert_eq!(
            c.consume_expected(TokenKind::Punctuation(PunctuationId::Semi)).map(|_| ()),
            Err(ParseError::Backtrack)
        );
        assert_eq!(c.mark(), before);
        assert!(c.consume_expected(TokenKind::Ident).is_ok());
        assert!(c.consume_expected(TokenKind::Punctuation(PunctuationId::Semi)).is_ok());
        assert_eq!(c.consume().map(|_| ()), Err(ParseError::EndOfInput));
        assert!(c.is_at_end());
    }

    #[test]
    fn test_lexer_errors_are_skipped_and_recorded() {
        let mut c = cursor("a @ b");
        assert!(c.consume().is_ok());
        assert_eq!(c.peek(1).map(|t| t.image.clone()), Ok("b".to_string()));
        assert_eq!(c.lexer_errors().len(), 1);
    }

    #[test]
    fn test_name_between_preserves_spacing() {
        let mut c = cursor("unsigned  long std::vector<int> x");
        for _ in 0..8 {
            assert!(c.consume().is_ok());
        }
        let name = c.name_between(Mark(0), Mark(8));
        assert_eq!(name.map(|n| n.text), Some("unsigned long std::vector<int>".to_string()));
        assert_eq!(c.name_between(Mark(3), Mark(3)), None);
    }
}
