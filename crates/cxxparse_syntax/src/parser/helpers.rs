/// Token-stream helpers, speculation and error recording.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Lookahead (`lt`, `kind`) and consumption (`bump`, `expect_*`, `eat_*`)
/// - Checkpoints and speculative attempts (`checkpoint`, `restore`, `attempt`, `optional`)
/// - Sink event recording (`enter_scope`, `exit_scope`, `accept`)
/// - Failure recording (`fail_parse`)
///
/// ## Notes
/// - `lt` is pure lookahead: looking past the end of input yields `None`, never an error. Rules use it for optional
///   constructs. `kind` and the `expect_*` helpers are for tokens the grammar requires, and fail with
///   [`ParseError::EndOfInput`] when the input has run out.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Lookahead
    // ========================================================================

    /// Kind of the token `n` positions ahead (1-based), or `None` past the end of input.
    fn lt(&mut self, n: usize) -> Option<TokenKind> {
        self.cursor.peek_kind(n)
    }

    /// Kind of the current token.
    fn kind(&mut self) -> ParseResult<TokenKind> {
        Ok(self.cursor.peek(1)?.kind)
    }

    fn check_keyword(&mut self, id: KeywordId) -> bool {
        self.lt(1).is_some_and(|k| k.is_keyword(id))
    }

    fn check_punct(&mut self, id: PunctuationId) -> bool {
        self.lt(1).is_some_and(|k| k.is_punctuation(id))
    }

    fn check_op(&mut self, id: OperatorId) -> bool {
        self.lt(1).is_some_and(|k| k.is_operator(id))
    }

    fn check_ident(&mut self) -> bool {
        self.lt(1) == Some(TokenKind::Ident)
    }

    /// Return `true` if the token `n` ahead is an identifier spelled `text`.
    fn ident_at_is(&mut self, n: usize, text: &str) -> bool {
        self.cursor
            .peek(n)
            .is_ok_and(|t| t.kind == TokenKind::Ident && t.image == text)
    }

    /// Image of the token `n` ahead.
    fn image_at(&mut self, n: usize) -> Option<String> {
        self.cursor.peek(n).ok().map(|t| t.image.clone())
    }

    // ========================================================================
    // Consumption
    // ========================================================================

    /// Consume the current token and return its span.
    fn bump(&mut self) -> ParseResult<Span> {
        Ok(self.cursor.consume()?.span)
    }

    /// Consume the current token and return a copy of it.
    fn bump_token(&mut self) -> ParseResult<Token> {
        Ok(self.cursor.consume()?.clone())
    }

    fn expect_keyword(&mut self, id: KeywordId) -> ParseResult<Span> {
        Ok(self.cursor.consume_expected(TokenKind::Keyword(id))?.span)
    }

    fn expect_punct(&mut self, id: PunctuationId) -> ParseResult<Span> {
        Ok(self.cursor.consume_expected(TokenKind::Punctuation(id))?.span)
    }

    fn expect_op(&mut self, id: OperatorId) -> ParseResult<Span> {
        Ok(self.cursor.consume_expected(TokenKind::Operator(id))?.span)
    }

    fn expect_ident(&mut self) -> ParseResult<Token> {
        Ok(self.cursor.consume_expected(TokenKind::Ident)?.clone())
    }

    /// If the current token is the given keyword, consume it and return `true`.
    fn eat_keyword(&mut self, id: KeywordId) -> bool {
        self.check_keyword(id) && self.cursor.consume().is_ok()
    }

    fn eat_punct(&mut self, id: PunctuationId) -> bool {
        self.check_punct(id) && self.cursor.consume().is_ok()
    }

    fn eat_op(&mut self, id: OperatorId) -> bool {
        self.check_op(id) && self.cursor.consume().is_ok()
    }

    /// Consume `const`/`volatile` qualifiers, returning which were seen.
    fn cv_qualifiers(&mut self) -> (bool, bool) {
        let (mut is_const, mut is_volatile) = (false, false);
        loop {
            if self.eat_keyword(KeywordId::Const) {
                is_const = true;
            } else if self.eat_keyword(KeywordId::Volatile) {
                is_volatile = true;
            } else {
                return (is_const, is_volatile);
            }
        }
    }

    // ========================================================================
    // Offsets
    // ========================================================================

    /// Start offset of the current token, or the end of the last token at end of input.
    fn start_offset(&mut self) -> usize {
        match self.cursor.peek(1) {
            Ok(token) => token.span.start,
            Err(_) => self.cursor.last_end(),
        }
    }

    /// End offset of the last consumed token.
    fn end_offset(&self) -> usize {
        self.cursor.last_end()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.end_offset().max(start))
    }

    fn spanned<T>(&self, node: T, start: usize) -> Spanned<T> {
        Spanned::new(node, self.span_from(start))
    }

    /// The tokens consumed since `start` as a [`Name`].
    fn name_from(&self, start: Mark) -> ParseResult<Name> {
        self.cursor
            .name_between(start, self.cursor.mark())
            .ok_or(ParseError::Backtrack)
    }

    // ========================================================================
    // Speculation
    // ========================================================================

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            mark: self.cursor.mark(),
            events: self.journal.len(),
        }
    }

    /// Roll the cursor and the journal back to `checkpoint`.
    fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor.restore(checkpoint.mark);
        self.journal.truncate(checkpoint.events);
    }

    /// Run `rule`, rolling back everything it consumed and reported if it backtracks.
    ///
    /// [`ParseError::EndOfInput`] is passed through without rolling back: nothing later in the input can rescue a
    /// parse that ran out of tokens. Past [`MAX_NESTING_DEPTH`] nested attempts the rule is not run; the failure is
    /// recorded and the attempt backtracks.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            let at = self.cursor.mark();
            self.fail_parse(at, "nesting too deep");
            return Err(ParseError::Backtrack);
        }
        let checkpoint = self.checkpoint();
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        if let Err(ParseError::Backtrack) = result {
            self.restore(checkpoint);
        }
        result
    }

    /// Like [`Parser::attempt`], but a backtrack becomes `Ok(None)`.
    fn optional<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<Option<T>> {
        match self.attempt(rule) {
            Ok(value) => Ok(Some(value)),
            Err(ParseError::Backtrack) => Ok(None),
            Err(err) => Err(err),
        }
    }

    // ========================================================================
    // Sink events
    // ========================================================================

    fn enter_scope(&mut self, kind: ScopeKind, start: usize) {
        self.journal.push(SinkEvent::Enter(Scope {
            kind,
            span: Span::new(start, start),
        }));
    }

    fn exit_scope(&mut self, kind: ScopeKind, start: usize) {
        let span = self.span_from(start);
        self.journal.push(SinkEvent::Exit(Scope { kind, span }));
    }

    fn accept(&mut self, declaration: Declaration, span: Span) {
        self.journal.push(SinkEvent::Accept(Spanned::new(declaration, span)));
    }

    /// Report the declarations of a finished builder.
    ///
    /// A builder without declarators becomes one specifier-only declaration, unless it is empty (a stray `;`).
    fn accept_declarations(&mut self, builder: DeclarationBuilder, span: Span) {
        if builder.declarators.is_empty() {
            let empty = builder.specifiers == DeclSpecifiers::default();
            if !empty {
                self.accept(Declaration::TypeSpec(builder.finish_type_spec()), span);
            }
            return;
        }
        for declaration in builder.finish() {
            self.accept(Declaration::Simple(declaration), span);
        }
    }

    // ========================================================================
    // Failures
    // ========================================================================

    /// Record a syntax error at the token `at`.
    ///
    /// Marks the parse as failed and remembers the first failure offset. A second error at the same offset is
    /// dropped. Recorded errors are not rolled back with the journal.
    fn fail_parse(&mut self, at: Mark, message: impl Into<String>) {
        let span = self.cursor.span_at(at);
        self.passed = false;
        self.first_error_offset.get_or_insert(span.start);
        if self.errors.iter().any(|e| e.span.start == span.start) {
            return;
        }
        let mut error = SyntaxError::new(message, span);
        if let Some(image) = self.cursor.token_at(at).map(|t| t.image.clone()) {
            error = error.with_note(format!("found `{image}`"));
        }
        tracing::debug!(start = span.start, error = %error, "syntax error");
        self.errors.push(error);
    }
}
