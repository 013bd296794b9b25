/// Declarator parsing methods.
///
/// A declarator is the part of a declaration after the specifiers: pointer operators, the declared name (or a
/// parenthesized nested declarator), then any number of suffixes: parameter clauses, array bounds and a bit-field
/// width.
///
/// ## Notes
/// - Whether `(` opens a parameter clause depends on the [`DeclStrategy`]: never under `TryVariable`, and not when
///   the token after it can only start an expression.
/// - After a parameter clause the parser tries old-style parameter declarations (`int f(a) int a; { ... }`). A
///   trailing `const`/`volatile` is first tried as the start of those declarations and otherwise kept as a member
///   function qualifier.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Init-declarators
    // ========================================================================

    /// A declarator with an optional `= initializer` or `(args)` initializer.
    fn init_declarator(&mut self, strategy: DeclStrategy, ctx: &DeclContext<'_>) -> ParseResult<Declarator> {
        let start = self.start_offset();
        let mut declarator = self.declarator(strategy, ctx)?;

        if self.eat_op(OperatorId::Assign) {
            declarator.initializer = Some(Initializer::Assign(self.initializer_clause()?));
        } else if self.check_punct(PunctuationId::LParen) {
            self.bump()?;
            let args = self.required_expression()?;
            self.expect_punct(PunctuationId::RParen)?;
            declarator.initializer = Some(Initializer::Constructor(args));
        }

        declarator.span = self.span_from(start);
        Ok(declarator)
    }

    /// `assignment-expression` or `{ clause, ... }`
    fn initializer_clause(&mut self) -> ParseResult<InitializerClause> {
        if !self.eat_punct(PunctuationId::LBrace) {
            return Ok(InitializerClause::Expr(self.required_assignment_expression()?));
        }

        let mut clauses = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            clauses.push(self.initializer_clause()?);
            if !self.eat_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace)?;
        Ok(InitializerClause::List(clauses))
    }

    // ========================================================================
    // Declarators
    // ========================================================================

    fn declarator(&mut self, strategy: DeclStrategy, ctx: &DeclContext<'_>) -> ParseResult<Declarator> {
        self.attempt(|p| p.declarator_inner(strategy, ctx))
    }

    fn declarator_inner(&mut self, strategy: DeclStrategy, ctx: &DeclContext<'_>) -> ParseResult<Declarator> {
        let start = self.start_offset();
        let mut d = Declarator::default();

        loop {
            self.pointer_operators(&mut d)?;

            if self.check_punct(PunctuationId::LParen) {
                self.bump()?;
                let inner = self.declarator(strategy, ctx)?;
                self.expect_punct(PunctuationId::RParen)?;
                d.nested = Some(Box::new(inner));
            } else if self.check_keyword(KeywordId::Operator) {
                let mark = self.cursor.mark();
                self.operator_id(&mut d, mark)?;
            } else if let Some(name) = self.optional(|p| p.name())? {
                d.name = Some(name);
            } else if self.check_ident() || self.check_punct(PunctuationId::ColonColon) {
                self.qualified_operator_id(&mut d)?;
            }

            self.declarator_suffixes(&mut d, strategy, ctx)?;
            if !self.check_ident() {
                break;
            }
        }

        d.span = self.span_from(start);
        Ok(d)
    }

    /// Parse parameter clauses, array bounds and a bit-field width.
    fn declarator_suffixes(
        &mut self,
        d: &mut Declarator,
        strategy: DeclStrategy,
        ctx: &DeclContext<'_>,
    ) -> ParseResult<()> {
        loop {
            match self.lt(1) {
                Some(TokenKind::Punctuation(PunctuationId::LParen)) => {
                    let expression_ahead = self.lt(2).is_some_and(|k| k.looks_like_expression());
                    if strategy == DeclStrategy::TryVariable || expression_ahead {
                        return Ok(());
                    }
                    let function = self.function_suffix(ctx)?;
                    d.function = Some(function);
                }
                Some(TokenKind::Punctuation(PunctuationId::LBracket)) => {
                    self.bump()?;
                    let bound = if self.check_punct(PunctuationId::RBracket) {
                        None
                    } else {
                        Some(self.constant_expression()?)
                    };
                    self.expect_punct(PunctuationId::RBracket)?;
                    d.arrays.push(bound);
                }
                Some(TokenKind::Punctuation(PunctuationId::Colon)) if d.function.is_none() => {
                    self.bump()?;
                    d.bit_field = Some(self.constant_expression()?);
                }
                _ => return Ok(()),
            }
        }
    }

    /// `( parameters ) [cv] [throw(...)] [= 0] [K&R declarations]`
    fn function_suffix(&mut self, ctx: &DeclContext<'_>) -> ParseResult<FunctionDeclarator> {
        let mut function = FunctionDeclarator::default();
        self.parameter_clause(&mut function, ctx)?;
        if self.check_punct(PunctuationId::Colon) {
            return Ok(function);
        }

        let before_cv = self.checkpoint();
        let cv = match self.lt(1) {
            Some(TokenKind::Keyword(id @ (KeywordId::Const | KeywordId::Volatile))) => {
                self.bump()?;
                Some(id)
            }
            _ => None,
        };
        let mut after_cv = self.checkpoint();

        if self.eat_keyword(KeywordId::Throw) {
            function.exception_spec = Some(self.exception_specification()?);
        }
        let pure_marker = self.lt(2) == Some(TokenKind::Integer) && self.image_at(2).as_deref() == Some("0");
        if self.check_op(OperatorId::Assign) && pure_marker {
            self.bump()?;
            self.bump()?;
            function.pure_virtual = true;
        }

        let cxx_clauses = self.cursor.mark() != after_cv.mark;
        if cxx_clauses || self.check_punct(PunctuationId::Semi) {
            apply_cv(&mut function, cv);
            after_cv = self.checkpoint();
        } else if cv.is_some() {
            self.restore(before_cv);
        }

        if !self.check_punct(PunctuationId::Semi) {
            match self.attempt(|p| p.kr_parameter_declarations(ctx)) {
                Ok(declarations) => function.kr_parameters = declarations,
                Err(ParseError::Backtrack) => {
                    self.restore(after_cv);
                    if !cxx_clauses {
                        apply_cv(&mut function, cv);
                    }
                }
                Err(err) => return Err(err),
            }
        }
        Ok(function)
    }

    /// `( [param, ...] [...] )`
    fn parameter_clause(&mut self, function: &mut FunctionDeclarator, ctx: &DeclContext<'_>) -> ParseResult<()> {
        self.expect_punct(PunctuationId::LParen)?;
        let mut expecting_parameter = true;
        loop {
            match self.kind()? {
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    self.bump()?;
                    return Ok(());
                }
                TokenKind::Punctuation(PunctuationId::Ellipsis) => {
                    self.bump()?;
                    function.varargs = true;
                }
                TokenKind::Punctuation(PunctuationId::Comma) => {
                    self.bump()?;
                    expecting_parameter = true;
                }
                _ if expecting_parameter => {
                    function.parameters.push(self.parameter_declaration(ctx)?);
                    expecting_parameter = false;
                }
                _ => return Err(ParseError::Backtrack),
            }
        }
    }

    /// The type list of `throw ( ... )`, after `throw`.
    ///
    /// A malformed entry is recorded and skipped.
    fn exception_specification(&mut self) -> ParseResult<Vec<TypeId>> {
        self.expect_punct(PunctuationId::LParen)?;
        let mut types = Vec::new();
        loop {
            if self.eat_punct(PunctuationId::RParen) {
                return Ok(types);
            }
            if self.eat_punct(PunctuationId::Comma) {
                continue;
            }
            match self.optional(|p| p.type_id())? {
                Some(type_id) => types.push(type_id),
                None => {
                    let at = self.cursor.mark();
                    self.fail_parse(at, "malformed exception specification");
                    self.bump()?;
                }
            }
        }
    }

    /// Old-style parameter declarations, up to the `{` of the body.
    fn kr_parameter_declarations(&mut self, ctx: &DeclContext<'_>) -> ParseResult<Vec<SimpleDeclaration>> {
        let mut declarations = Vec::new();
        loop {
            declarations.extend(self.kr_declaration(ctx)?);
            if self.kind()?.is_punctuation(PunctuationId::LBrace) {
                return Ok(declarations);
            }
        }
    }

    // ========================================================================
    // Pointer operators
    // ========================================================================

    /// `*` cv, `&`, and `Class::*` cv, as many as appear.
    fn pointer_operators(&mut self, d: &mut Declarator) -> ParseResult<()> {
        loop {
            let kind = match self.lt(1) {
                Some(TokenKind::Operator(OperatorId::Amp)) => {
                    self.bump()?;
                    PointerKind::Reference
                }
                Some(TokenKind::Operator(OperatorId::Star)) => {
                    self.bump()?;
                    PointerKind::Pointer
                }
                Some(TokenKind::Ident | TokenKind::Punctuation(PunctuationId::ColonColon)) => {
                    let member = self.optional(|p| {
                        let class = p.name()?;
                        p.expect_punct(PunctuationId::ColonColon)?;
                        p.expect_op(OperatorId::Star)?;
                        Ok(class)
                    })?;
                    match member {
                        Some(class) => PointerKind::Member(class),
                        None => return Ok(()),
                    }
                }
                _ => return Ok(()),
            };
            let (is_const, is_volatile) = if kind == PointerKind::Reference {
                (false, false)
            } else {
                self.cv_qualifiers()
            };
            d.pointer_ops.push(PointerOp {
                kind,
                is_const,
                is_volatile,
            });
        }
    }

    // ========================================================================
    // Operator function names
    // ========================================================================

    /// `operator @`, `operator new[]`, `operator ()`, or a conversion `operator T*`. The name runs from `start`.
    fn operator_id(&mut self, d: &mut Declarator, start: Mark) -> ParseResult<()> {
        self.expect_keyword(KeywordId::Operator)?;
        match self.kind()? {
            TokenKind::Keyword(KeywordId::New | KeywordId::Delete) => {
                self.bump()?;
                if self.check_punct(PunctuationId::LBracket)
                    && self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::RBracket))
                {
                    self.bump()?;
                    self.bump()?;
                }
            }
            TokenKind::Punctuation(PunctuationId::LParen)
                if self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::RParen)) =>
            {
                self.bump()?;
                self.bump()?;
            }
            TokenKind::Punctuation(PunctuationId::LBracket)
                if self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::RBracket)) =>
            {
                self.bump()?;
                self.bump()?;
            }
            TokenKind::Operator(_) | TokenKind::Punctuation(PunctuationId::Comma) => {
                self.bump()?;
            }
            _ => {
                self.type_id()?;
            }
        }
        d.name = Some(self.name_from(start)?);
        Ok(())
    }

    /// `A::B<T>::operator @`, which `name` refuses.
    fn qualified_operator_id(&mut self, d: &mut Declarator) -> ParseResult<()> {
        let checkpoint = self.checkpoint();
        let start = self.cursor.mark();
        while let Some(kind) = self.lt(1) {
            match kind {
                TokenKind::Punctuation(PunctuationId::ColonColon) => {
                    self.bump()?;
                }
                TokenKind::Ident => {
                    self.bump()?;
                    self.optional_template_args()?;
                }
                _ => break,
            }
        }
        if self.check_keyword(KeywordId::Operator) {
            self.operator_id(d, start)
        } else {
            self.restore(checkpoint);
            Err(ParseError::Backtrack)
        }
    }
}

fn apply_cv(function: &mut FunctionDeclarator, cv: Option<KeywordId>) {
    match cv {
        Some(KeywordId::Const) => function.is_const = true,
        Some(KeywordId::Volatile) => function.is_volatile = true,
        _ => {}
    }
}
