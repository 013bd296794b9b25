//! Reference lexer for preprocessed C and C++ source.
//!
//! Handles tokenization including:
//! - Keywords (dialect-aware: `class` is an identifier in C) and identifiers
//! - Integer, floating, character and string literals (with `L` prefixes)
//! - Operators and punctuation with maximal munch (`>>=`, `->*`, `...`)
//! - Comments and preprocessor directive lines, which are skipped
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `literals` - Number, character and string literal scanning
//!
//! ## Notes
//! - The lexer is **pull-based**: [`Lexer::next_token`] scans one token at a time, which is what the parser's token
//!   cursor consumes through [`TokenSource`].
//! - Errors are recoverable. The offending text is skipped before the error is returned, so the next pull resumes.

mod literals;
pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::ast::Span;
use crate::config::Language;
use crate::cursor::TokenSource;
use crate::diagnostics::LexError;
use cxxparse_core::lang::keywords;
use cxxparse_core::lang::operators::OperatorId;
use cxxparse_core::lang::punctuation::PunctuationId;

/// Lexer for C/C++ source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    language: Language,
    /// Only whitespace has been seen since the last newline; `#` starts a directive here.
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str, language: Language) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            language,
            at_line_start: true,
        }
    }

    /// Scan the next token.
    ///
    /// ## Returns
    /// - `Ok(Some(token))` for the next token.
    /// - `Ok(None)` once the source is exhausted.
    /// - `Err(LexError)` for a lexical problem; calling again continues after it.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;
        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return Ok(None);
        };
        self.at_line_start = false;

        let kind = match c {
            '+' => self.operator(OperatorId::Plus, &[('+', OperatorId::PlusPlus), ('=', OperatorId::PlusAssign)]),
            '-' => {
                if self.match_char('>') {
                    if self.match_char('*') {
                        TokenKind::Operator(OperatorId::ArrowStar)
                    } else {
                        TokenKind::Operator(OperatorId::Arrow)
                    }
                } else {
                    self.operator(OperatorId::Minus, &[('-', OperatorId::MinusMinus), ('=', OperatorId::MinusAssign)])
                }
            }
            '*' => self.operator(OperatorId::Star, &[('=', OperatorId::StarAssign)]),
            '/' => self.operator(OperatorId::Slash, &[('=', OperatorId::SlashAssign)]),
            '%' => self.operator(OperatorId::Percent, &[('=', OperatorId::PercentAssign)]),
            '^' => self.operator(OperatorId::Caret, &[('=', OperatorId::CaretAssign)]),
            '&' => self.operator(OperatorId::Amp, &[('&', OperatorId::AndAnd), ('=', OperatorId::AmpAssign)]),
            '|' => self.operator(OperatorId::Pipe, &[('|', OperatorId::OrOr), ('=', OperatorId::PipeAssign)]),
            '~' => TokenKind::Operator(OperatorId::Tilde),
            '!' => self.operator(OperatorId::Not, &[('=', OperatorId::NotEq)]),
            '=' => self.operator(OperatorId::Assign, &[('=', OperatorId::EqEq)]),
            '<' => {
                if self.match_char('<') {
                    self.operator(OperatorId::Shl, &[('=', OperatorId::ShlAssign)])
                } else {
                    self.operator(OperatorId::Lt, &[('=', OperatorId::LtEq)])
                }
            }
            '>' => {
                if self.match_char('>') {
                    self.operator(OperatorId::Shr, &[('=', OperatorId::ShrAssign)])
                } else {
                    self.operator(OperatorId::Gt, &[('=', OperatorId::GtEq)])
                }
            }
            '.' => {
                if self.peek().is_some_and(|d| d.is_ascii_digit()) {
                    self.scan_number(c)
                } else if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Punctuation(PunctuationId::Ellipsis)
                } else if self.match_char('*') {
                    TokenKind::Operator(OperatorId::DotStar)
                } else {
                    TokenKind::Punctuation(PunctuationId::Dot)
                }
            }
            ':' => {
                if self.match_char(':') {
                    TokenKind::Punctuation(PunctuationId::ColonColon)
                } else {
                    TokenKind::Punctuation(PunctuationId::Colon)
                }
            }
            ',' => TokenKind::Punctuation(PunctuationId::Comma),
            ';' => TokenKind::Punctuation(PunctuationId::Semi),
            '?' => TokenKind::Punctuation(PunctuationId::Question),
            '(' => TokenKind::Punctuation(PunctuationId::LParen),
            ')' => TokenKind::Punctuation(PunctuationId::RParen),
            '[' => TokenKind::Punctuation(PunctuationId::LBracket),
            ']' => TokenKind::Punctuation(PunctuationId::RBracket),
            '{' => TokenKind::Punctuation(PunctuationId::LBrace),
            '}' => TokenKind::Punctuation(PunctuationId::RBrace),

            // Literals
            '"' => self.scan_quoted(start, '"')?,
            '\'' => self.scan_quoted(start, '\'')?,
            'L' if matches!(self.peek(), Some('"') | Some('\'')) => {
                let quote = self.peek().unwrap_or('"');
                self.advance();
                self.scan_quoted(start, quote)?
            }
            '0'..='9' => self.scan_number(c),

            _ if is_ident_start(c) => self.scan_identifier(start),

            _ => {
                return Err(LexError::new(
                    format!("unexpected character '{}'", c),
                    Span::new(start, self.current_pos),
                ));
            }
        };

        Ok(Some(Token::new(
            kind,
            &self.source[start..self.current_pos],
            Span::new(start, self.current_pos),
        )))
    }

    /// Scan the whole source, collecting tokens and errors separately.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => break,
                Err(err) => errors.push(err),
            }
        }
        (tokens, errors)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Try to match a compound operator, falling back to `simple`.
    fn operator(&mut self, simple: OperatorId, compounds: &[(char, OperatorId)]) -> TokenKind {
        for (c, id) in compounds {
            if self.match_char(*c) {
                return TokenKind::Operator(*id);
            }
        }
        TokenKind::Operator(simple)
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skip whitespace, comments and preprocessor directive lines.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.advance();
                    self.at_line_start = true;
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment()?,
                '#' if self.at_line_start => {
                    let start = self.current_pos;
                    self.skip_line();
                    tracing::trace!(start, end = self.current_pos, "skipped preprocessor directive");
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip to the end of the line, following `\` line continuations. The newline itself is left for
    /// [`Self::skip_trivia`].
    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
            if c == '\\' && self.peek() == Some('\n') {
                self.advance();
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start = self.current_pos;
        self.advance();
        self.advance();
        while let Some(c) = self.advance() {
            if c == '*' && self.match_char('/') {
                return Ok(());
            }
        }
        Err(LexError::new(
            "unterminated block comment",
            Span::new(start, self.current_pos),
        ))
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];
        match keywords::from_str_in(spelling, self.language.dialect()) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident,
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        Lexer::next_token(self)
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Convenience function to lex a whole source string.
///
/// This is a shorthand for `Lexer::new(source, language).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str, language: Language) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source, language).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxparse_core::lang::keywords::KeywordId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = lex(source, Language::Cpp);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_maximal_munch_operators() {
        assert_eq!(
            kinds(">>= ->* .* ... :: <<"),
            vec![
                TokenKind::Operator(OperatorId::ShrAssign),
                TokenKind::Operator(OperatorId::ArrowStar),
                TokenKind::Operator(OperatorId::DotStar),
                TokenKind::Punctuation(PunctuationId::Ellipsis),
                TokenKind::Punctuation(PunctuationId::ColonColon),
                TokenKind::Operator(OperatorId::Shl),
            ]
        );
    }

    #[test]
    fn test_nested_template_close_is_shift_token() {
        let (tokens, _) = lex("A<B<C<int>>>", Language::Cpp);
        let images: Vec<&str> = tokens.iter().map(|t| t.image.as_str()).collect();
        assert_eq!(images, vec!["A", "<", "B", "<", "C", "<", "int", ">>", ">"]);
    }

    #[test]
    fn test_cpp_keywords_are_identifiers_in_c() {
        let (tokens, _) = lex("class new", Language::C);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[1].kind, TokenKind::Ident);
        let (tokens, _) = lex("class", Language::Cpp);
        assert_eq!(tokens[0].kind, TokenKind::Keyword(KeywordId::Class));
    }

    #[test]
    fn test_comments_and_directives_are_skipped() {
        let source = "#include <x.h>\n#define A \\\n  1\nint /* c */ a; // tail\n";
        let (tokens, errors) = lex(source, Language::Cpp);
        assert!(errors.is_empty());
        let images: Vec<&str> = tokens.iter().map(|t| t.image.as_str()).collect();
        assert_eq!(images, vec!["int", "a", ";"]);
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let (tokens, _) = lex("int  x;", Language::Cpp);
        assert_eq!(tokens[1].span, Span::new(5, 6));
        assert_eq!(tokens[2].span, Span::new(6, 7));
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 0x1Fu 3.5e-2f .5 'a' L'b' "s\"q" L"w""#),
            vec![
                TokenKind::Integer,
                TokenKind::Integer,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Char,
                TokenKind::Char,
                TokenKind::String,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn test_errors_are_recoverable() {
        let mut lexer = Lexer::new("int @ x", Language::Cpp);
        assert_eq!(lexer.next_token().map(|t| t.map(|t| t.kind)), Ok(Some(TokenKind::Keyword(KeywordId::Int))));
        assert!(lexer.next_token().is_err());
        let next = lexer.next_token().ok().flatten().map(|t| t.image);
        assert_eq!(next.as_deref(), Some("x"));
        assert_eq!(lexer.next_token(), Ok(None));
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex("\"abc\nint", Language::Cpp);
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.last().map(|t| t.image.as_str()), Some("int"));
    }
}
