/// Statement parsing methods.
///
/// Statements only appear inside function bodies, which are parsed in complete mode.
///
/// ## Notes
/// - A statement that does not start with a keyword is tried as an expression statement first and as a declaration
///   second.
/// - Block-scope declarations go through the same declaration rules as namespace-scope ones. Their sink events are
///   taken back out of the journal and kept in the statement tree instead.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Statements
    // ========================================================================

    /// `{ statement* }`
    fn compound_statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.start_offset();
        self.expect_punct(PunctuationId::LBrace)?;
        let mut statements = Vec::new();
        loop {
            if self.kind()?.is_punctuation(PunctuationId::RBrace) {
                self.bump()?;
                break;
            }
            statements.push(self.statement()?);
        }
        Ok(self.spanned(Stmt::Compound(statements), start))
    }

    fn statement(&mut self) -> ParseResult<Spanned<Stmt>> {
        self.attempt(|p| p.statement_inner())
    }

    fn statement_inner(&mut self) -> ParseResult<Spanned<Stmt>> {
        let start = self.start_offset();
        let stmt = match self.kind()? {
            TokenKind::Punctuation(PunctuationId::LBrace) => return self.compound_statement(),
            TokenKind::Punctuation(PunctuationId::Semi) => {
                self.bump()?;
                Stmt::Empty
            }
            TokenKind::Keyword(KeywordId::Case) => {
                self.bump()?;
                let value = self.constant_expression()?;
                self.expect_punct(PunctuationId::Colon)?;
                Stmt::Case(value, Box::new(self.statement()?))
            }
            TokenKind::Keyword(KeywordId::Default) => {
                self.bump()?;
                self.expect_punct(PunctuationId::Colon)?;
                Stmt::Default(Box::new(self.statement()?))
            }
            TokenKind::Keyword(KeywordId::If) => {
                self.bump()?;
                let condition = self.parenthesized_condition()?;
                let then_branch = Box::new(self.statement()?);
                let else_branch = if self.eat_keyword(KeywordId::Else) {
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                Stmt::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            TokenKind::Keyword(KeywordId::Switch) => {
                self.bump()?;
                let condition = self.parenthesized_condition()?;
                Stmt::Switch(condition, Box::new(self.statement()?))
            }
            TokenKind::Keyword(KeywordId::While) => {
                self.bump()?;
                let condition = self.parenthesized_condition()?;
                Stmt::While(condition, Box::new(self.statement()?))
            }
            TokenKind::Keyword(KeywordId::Do) => {
                self.bump()?;
                let body = Box::new(self.statement()?);
                self.expect_keyword(KeywordId::While)?;
                self.expect_punct(PunctuationId::LParen)?;
                let condition = self.required_expression()?;
                self.expect_punct(PunctuationId::RParen)?;
                self.expect_punct(PunctuationId::Semi)?;
                Stmt::DoWhile(body, condition)
            }
            TokenKind::Keyword(KeywordId::For) => self.for_statement()?,
            TokenKind::Keyword(KeywordId::Break) => {
                self.bump()?;
                self.expect_punct(PunctuationId::Semi)?;
                Stmt::Break
            }
            TokenKind::Keyword(KeywordId::Continue) => {
                self.bump()?;
                self.expect_punct(PunctuationId::Semi)?;
                Stmt::Continue
            }
            TokenKind::Keyword(KeywordId::Return) => {
                self.bump()?;
                let value = if self.check_punct(PunctuationId::Semi) {
                    None
                } else {
                    Some(self.required_expression()?)
                };
                self.expect_punct(PunctuationId::Semi)?;
                Stmt::Return(value)
            }
            TokenKind::Keyword(KeywordId::Goto) => {
                self.bump()?;
                let label = self.expect_ident()?.image;
                self.expect_punct(PunctuationId::Semi)?;
                Stmt::Goto(label)
            }
            TokenKind::Keyword(KeywordId::Try) => self.try_block()?,
            TokenKind::Ident if self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::Colon)) => {
                let label = self.bump_token()?.image;
                self.bump()?;
                Stmt::Labeled(label, Box::new(self.statement()?))
            }
            _ => self.expression_or_declaration()?,
        };
        Ok(self.spanned(stmt, start))
    }

    /// `expression ;`, or failing that a block-scope declaration.
    fn expression_or_declaration(&mut self) -> ParseResult<Stmt> {
        let expression = self.optional(|p| {
            let expr = p.required_expression()?;
            p.expect_punct(PunctuationId::Semi)?;
            Ok(expr)
        })?;
        match expression {
            Some(expr) => Ok(Stmt::Expr(expr)),
            None => Ok(Stmt::Declaration(self.block_declaration()?)),
        }
    }

    /// Parse a declaration and take its events back out of the journal as nodes.
    fn block_declaration(&mut self) -> ParseResult<Vec<Node>> {
        let events = self.journal.len();
        self.declaration(&DeclContext::default())?;
        Ok(TreeBuilder::from_events(self.journal.split_off(events)))
    }

    /// `for ( init ; [condition] ; [step] ) statement`
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(KeywordId::For)?;
        self.expect_punct(PunctuationId::LParen)?;

        let init_start = self.start_offset();
        let init = if self.eat_punct(PunctuationId::Semi) {
            Stmt::Empty
        } else {
            self.expression_or_declaration()?
        };
        let init = Box::new(self.spanned(init, init_start));

        let condition = if self.check_punct(PunctuationId::Semi) {
            None
        } else {
            Some(self.condition()?)
        };
        self.expect_punct(PunctuationId::Semi)?;
        let step = if self.check_punct(PunctuationId::RParen) {
            None
        } else {
            Some(self.required_expression()?)
        };
        self.expect_punct(PunctuationId::RParen)?;

        Ok(Stmt::For {
            init,
            condition,
            step,
            body: Box::new(self.statement()?),
        })
    }

    /// `try { ... } catch ( parameter | ... ) { ... } ...`
    fn try_block(&mut self) -> ParseResult<Stmt> {
        self.expect_keyword(KeywordId::Try)?;
        let body = Box::new(self.compound_statement()?);
        let mut handlers = Vec::new();
        while self.eat_keyword(KeywordId::Catch) {
            self.expect_punct(PunctuationId::LParen)?;
            let parameter = if self.eat_punct(PunctuationId::Ellipsis) {
                None
            } else {
                Some(self.parameter_declaration(&DeclContext::default())?)
            };
            self.expect_punct(PunctuationId::RParen)?;
            let body = self.compound_statement()?;
            handlers.push(CatchHandler { parameter, body });
        }
        if handlers.is_empty() {
            return Err(ParseError::Backtrack);
        }
        Ok(Stmt::Try { body, handlers })
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    fn parenthesized_condition(&mut self) -> ParseResult<Condition> {
        self.expect_punct(PunctuationId::LParen)?;
        let condition = self.condition()?;
        self.expect_punct(PunctuationId::RParen)?;
        Ok(condition)
    }

    /// An expression, or a declaration with an initializer: `if (Node* n = next())`.
    fn condition(&mut self) -> ParseResult<Condition> {
        let expression = self.optional(|p| {
            let expr = p.required_expression()?;
            match p.lt(1) {
                Some(TokenKind::Punctuation(PunctuationId::RParen | PunctuationId::Semi)) => Ok(expr),
                _ => Err(ParseError::Backtrack),
            }
        })?;
        if let Some(expr) = expression {
            return Ok(Condition::Expr(expr));
        }

        let events = self.journal.len();
        self.attempt(|p| p.condition_declaration())?;
        Ok(Condition::Declaration(TreeBuilder::from_events(self.journal.split_off(events))))
    }

    /// `type-specifier-seq declarator = assignment-expression`
    fn condition_declaration(&mut self) -> ParseResult<()> {
        let start = self.start_offset();
        let ctx = DeclContext::default();
        let mut builder = DeclarationBuilder::new(None);
        let specifiers = SpecifierContext {
            parm: false,
            for_kr: false,
            strategy: DeclStrategy::TryVariable,
            decl: ctx,
        };
        self.decl_specifier_seq(&mut builder, &specifiers)?;
        let mut declarator = self.declarator(DeclStrategy::TryVariable, &ctx)?;
        if declarator.declared_name().is_none() {
            return Err(ParseError::Backtrack);
        }
        self.expect_op(OperatorId::Assign)?;
        let value = self.required_assignment_expression()?;
        declarator.initializer = Some(Initializer::Assign(InitializerClause::Expr(value)));
        declarator.span = self.span_from(declarator.span.start);
        builder.add_declarator(declarator);
        self.accept_declarations(builder, self.span_from(start));
        Ok(())
    }
}
