/// Declaration sequences and error recovery.
///
/// Every declaration sequence (the translation unit, namespace and linkage bodies, class member lists) runs through
/// `declaration_or_recover`: when a declaration cannot be parsed, the failure is recorded at the farthest token
/// the attempt reached and the sequence resynchronizes past the broken declaration.
///
/// ## Notes
/// - Resynchronization skips to the next `;` at brace depth 0 or the `}` closing a block opened while skipping.
///   Inside a braced body, an unmatched `}` ends the skip without being consumed so the body can close.
/// - Running out of input in the middle of a declaration is a failure, recorded once at the translation-unit level.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Declaration sequences
    // ========================================================================

    fn translation_unit(&mut self, sink: &mut dyn AstSink) {
        let ctx = DeclContext::default();
        while !self.cursor.is_at_end() {
            if let Err(ParseError::EndOfInput) = self.declaration_or_recover(&ctx, false) {
                let at = self.cursor.mark();
                self.fail_parse(at, "unexpected end of input");
                break;
            }
            self.journal.flush(sink);
        }
    }

    /// Parse declarations up to and including the closing `}` of a body whose `{` was consumed.
    fn declaration_body(&mut self, ctx: &DeclContext<'_>) -> ParseResult<()> {
        loop {
            if self.kind()?.is_punctuation(PunctuationId::RBrace) {
                self.bump()?;
                return Ok(());
            }
            self.declaration_or_recover(ctx, true)?;
        }
    }

    /// Parse one declaration of a sequence, recovering if it fails.
    ///
    /// Only [`ParseError::EndOfInput`] escapes.
    fn declaration_or_recover(&mut self, ctx: &DeclContext<'_>, braced: bool) -> ParseResult<()> {
        let start = self.cursor.mark();
        let outer_furthest = self.cursor.furthest();
        self.cursor.set_furthest(start);

        let result = self.declaration(ctx);

        let reached = self.cursor.furthest();
        self.cursor.set_furthest(outer_furthest.max(reached));

        match result {
            Ok(()) if self.cursor.mark() != start => Ok(()),
            Ok(()) => {
                self.fail_parse(start, "declaration consumed no input");
                self.error_handling(braced)
            }
            Err(ParseError::Backtrack) => {
                let at = if reached > start { reached } else { start };
                self.fail_parse(at, "expected a declaration");
                self.error_handling(braced)
            }
            Err(ParseError::EndOfInput) => Err(ParseError::EndOfInput),
        }
    }

    // ========================================================================
    // Resynchronization
    // ========================================================================

    /// Skip past a broken declaration.
    ///
    /// The first token is always consumed. If skipping exhausts the input the sequence simply ends.
    fn error_handling(&mut self, braced: bool) -> ParseResult<()> {
        let first = match self.cursor.consume() {
            Ok(token) => token.kind,
            Err(_) => return Ok(()),
        };
        let mut depth: usize = match first {
            TokenKind::Punctuation(PunctuationId::Semi | PunctuationId::RBrace) => return Ok(()),
            TokenKind::Punctuation(PunctuationId::LBrace) => 1,
            _ => 0,
        };

        while let Some(kind) = self.lt(1) {
            match kind {
                TokenKind::Punctuation(PunctuationId::Semi) if depth == 0 => {
                    self.bump()?;
                    return Ok(());
                }
                TokenKind::Punctuation(PunctuationId::RBrace) if depth == 0 => {
                    if !braced {
                        self.bump()?;
                    }
                    return Ok(());
                }
                TokenKind::Punctuation(PunctuationId::RBrace) if depth == 1 => {
                    self.bump()?;
                    return Ok(());
                }
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    depth -= 1;
                    self.bump()?;
                }
                TokenKind::Punctuation(PunctuationId::LBrace) => {
                    depth += 1;
                    self.bump()?;
                }
                _ => {
                    self.bump()?;
                }
            }
        }
        Ok(())
    }
}
