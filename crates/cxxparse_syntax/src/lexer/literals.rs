//! Number, character and string literal scanning.
//!
//! Literal text is kept verbatim in [`Token::image`](super::Token::image); the lexer only decides where a literal
//! ends and which [`TokenKind`] it is.

use super::{Lexer, TokenKind};
use crate::ast::Span;
use crate::diagnostics::LexError;

impl Lexer<'_> {
    /// Scan the rest of a numeric literal whose first character was `first` (a digit or `.`).
    pub(super) fn scan_number(&mut self, first: char) -> TokenKind {
        let mut is_float = first == '.';

        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            self.eat_while(|c| c.is_ascii_hexdigit());
            self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            return TokenKind::Integer;
        }

        self.eat_while(|c| c.is_ascii_digit());
        if !is_float && self.peek() == Some('.') && self.peek_next() != Some('.') {
            self.advance();
            is_float = true;
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign_or_digit = self.peek_next();
            if sign_or_digit.is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-') {
                self.advance();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.advance();
                }
                self.eat_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        if is_float {
            self.eat_while(|c| matches!(c, 'f' | 'F' | 'l' | 'L'));
            TokenKind::Float
        } else {
            self.eat_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            TokenKind::Integer
        }
    }

    /// Scan a character or string literal after its opening `quote`.
    ///
    /// ## Errors
    /// - A newline or end of input before the closing quote. The text up to the newline is consumed.
    pub(super) fn scan_quoted(&mut self, start: usize, quote: char) -> Result<TokenKind, LexError> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let what = if quote == '"' { "string" } else { "character" };
                    return Err(LexError::new(
                        format!("unterminated {what} literal"),
                        Span::new(start, self.current_pos),
                    ));
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some(c) => {
                    self.advance();
                    if c == quote {
                        break;
                    }
                }
            }
        }
        Ok(if quote == '"' { TokenKind::String } else { TokenKind::Char })
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }
}
