/// Names, template argument lists and type-ids.
///
/// Names are recognized structurally and returned as source text ([`Name`]); nothing is looked up.
///
/// ## Notes
/// - Template argument lists are matched by bracket counting, not parsed. `>>` closes two levels.
/// - A template argument list is always optional: if it does not close cleanly the name simply ends before `<`.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Names
    // ========================================================================

    /// `[::] [~] id [<args>] { :: [template] [~] id [<args>] }`
    ///
    /// Refuses `A::operator ...` (the declarator rules handle it) and stops before `::*`.
    fn name(&mut self) -> ParseResult<Name> {
        self.attempt(|p| p.name_inner(true))
    }

    fn name_inner(&mut self, template_args: bool) -> ParseResult<Name> {
        let start = self.cursor.mark();
        self.eat_punct(PunctuationId::ColonColon);
        self.eat_op(OperatorId::Tilde);
        self.expect_ident()?;
        if template_args {
            self.optional_template_args()?;
        }

        while self.check_punct(PunctuationId::ColonColon) {
            match self.lt(2) {
                Some(TokenKind::Keyword(KeywordId::Operator)) => return Err(ParseError::Backtrack),
                Some(
                    TokenKind::Ident | TokenKind::Keyword(KeywordId::Template) | TokenKind::Operator(OperatorId::Tilde),
                ) => {}
                _ => break,
            }
            self.bump()?;
            self.eat_keyword(KeywordId::Template);
            self.eat_op(OperatorId::Tilde);
            self.expect_ident()?;
            if template_args {
                self.optional_template_args()?;
            }
        }

        self.name_from(start)
    }

    /// Consume a template argument list if one starts here and closes cleanly.
    fn optional_template_args(&mut self) -> ParseResult<bool> {
        if !self.check_op(OperatorId::Lt) {
            return Ok(false);
        }
        Ok(self.optional(|p| p.consume_template_parameters())?.is_some())
    }

    /// Skip `< ... >` by bracket matching.
    ///
    /// `(` and `[` nest; a closing `)` or `]` also closes any `<` opened inside it. `;`, `{` and `}` cannot appear
    /// in an argument list and end the attempt.
    fn consume_template_parameters(&mut self) -> ParseResult<()> {
        self.attempt(|p| {
            p.expect_op(OperatorId::Lt)?;
            let mut stack = vec![Nest::Angle];
            while let Some(&top) = stack.last() {
                match p.kind()? {
                    TokenKind::Operator(OperatorId::Lt) => stack.push(Nest::Angle),
                    TokenKind::Operator(OperatorId::Gt) => {
                        if top == Nest::Angle {
                            stack.pop();
                        }
                    }
                    TokenKind::Operator(OperatorId::Shr) => {
                        if top == Nest::Angle {
                            stack.pop();
                            if stack.last() != Some(&Nest::Angle) {
                                return Err(ParseError::Backtrack);
                            }
                            stack.pop();
                        }
                    }
                    TokenKind::Punctuation(PunctuationId::LParen) => stack.push(Nest::Paren),
                    TokenKind::Punctuation(PunctuationId::LBracket) => stack.push(Nest::Bracket),
                    TokenKind::Punctuation(PunctuationId::RParen) => close_nest(&mut stack, Nest::Paren)?,
                    TokenKind::Punctuation(PunctuationId::RBracket) => close_nest(&mut stack, Nest::Bracket)?,
                    TokenKind::Punctuation(PunctuationId::Semi | PunctuationId::LBrace | PunctuationId::RBrace) => {
                        return Err(ParseError::Backtrack);
                    }
                    _ => {}
                }
                p.bump()?;
            }
            Ok(())
        })
    }

    // ========================================================================
    // Type-ids
    // ========================================================================

    /// `[cv] type-keywords-or-name [cv] {* [cv] | &}`, e.g. `const char*` or `std::vector<int>&`.
    fn type_id(&mut self) -> ParseResult<TypeId> {
        self.attempt(|p| {
            let start = p.cursor.mark();
            let mut seen_type = false;
            while let Some(kind) = p.lt(1) {
                match kind {
                    TokenKind::Keyword(KeywordId::Const | KeywordId::Volatile) => {
                        p.bump()?;
                    }
                    TokenKind::Keyword(id) if simple_type(id).is_some() || is_size_keyword(id) => {
                        p.bump()?;
                        seen_type = true;
                    }
                    TokenKind::Keyword(
                        KeywordId::Typename | KeywordId::Struct | KeywordId::Class | KeywordId::Enum | KeywordId::Union,
                    ) if !seen_type => {
                        p.bump()?;
                        p.name()?;
                        seen_type = true;
                    }
                    TokenKind::Ident | TokenKind::Punctuation(PunctuationId::ColonColon) if !seen_type => {
                        p.name()?;
                        seen_type = true;
                    }
                    _ => break,
                }
            }
            if !seen_type {
                return Err(ParseError::Backtrack);
            }

            while let Some(TokenKind::Operator(OperatorId::Star | OperatorId::Amp)) = p.lt(1) {
                p.bump()?;
                p.cv_qualifiers();
            }
            p.name_from(start)
        })
    }
}

/// An open bracket while skipping a template argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nest {
    Angle,
    Paren,
    Bracket,
}

/// Pop up to and including the innermost `open`, discarding any `<` above it.
fn close_nest(stack: &mut Vec<Nest>, open: Nest) -> ParseResult<()> {
    while let Some(top) = stack.pop() {
        if top == open {
            return Ok(());
        }
        if top != Nest::Angle {
            return Err(ParseError::Backtrack);
        }
    }
    Err(ParseError::Backtrack)
}

fn is_size_keyword(id: KeywordId) -> bool {
    matches!(
        id,
        KeywordId::Signed | KeywordId::Unsigned | KeywordId::Short | KeywordId::Long
    )
}
