/// Declaration parsing methods.
///
/// This chunk dispatches a declaration by its leading keyword (`asm`, `namespace`, `using`, `extern "..."`,
/// `template`) and otherwise parses a simple declaration, which covers variables, typedefs, function declarations
/// and function definitions.
///
/// ## Notes
/// - A simple declaration is tried under each [`DeclStrategy`] in turn; see `simple_declaration_strategy_union`.
/// - Function bodies are parsed into statements in complete mode and skipped by brace matching in quick mode.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Declarations
    // ========================================================================

    /// Parse one declaration and report it to the journal.
    fn declaration(&mut self, ctx: &DeclContext<'_>) -> ParseResult<()> {
        self.attempt(|p| match p.kind()? {
            TokenKind::Keyword(KeywordId::Asm) => p.asm_definition(),
            TokenKind::Keyword(KeywordId::Namespace) => p.namespace_definition(),
            TokenKind::Keyword(KeywordId::Using) => p.using_clause(),
            TokenKind::Keyword(KeywordId::Export | KeywordId::Template) => p.template_declaration(ctx),
            TokenKind::Keyword(KeywordId::Extern) if p.lt(2) == Some(TokenKind::String) => {
                p.linkage_specification(ctx)
            }
            _ => p.simple_declaration_strategy_union(ctx),
        })
    }

    /// `asm ( "text" ) ;`
    fn asm_definition(&mut self) -> ParseResult<()> {
        let start = self.start_offset();
        self.expect_keyword(KeywordId::Asm)?;
        self.expect_punct(PunctuationId::LParen)?;
        let text = self.cursor.consume_expected(TokenKind::String)?.image.clone();
        self.expect_punct(PunctuationId::RParen)?;
        self.expect_punct(PunctuationId::Semi)?;
        self.accept(Declaration::Asm(text), self.span_from(start));
        Ok(())
    }

    /// `namespace [name] { ... }` or `namespace alias = name ;`
    fn namespace_definition(&mut self) -> ParseResult<()> {
        let start = self.start_offset();
        self.expect_keyword(KeywordId::Namespace)?;
        let name = if self.check_ident() {
            Some(self.bump_token()?.image)
        } else {
            None
        };

        if self.eat_punct(PunctuationId::LBrace) {
            let kind = ScopeKind::Namespace(name);
            self.enter_scope(kind.clone(), start);
            self.declaration_body(&DeclContext::default())?;
            self.exit_scope(kind, start);
            return Ok(());
        }

        match name {
            Some(alias) if self.eat_op(OperatorId::Assign) => {
                let target = self.name()?;
                self.expect_punct(PunctuationId::Semi)?;
                self.accept(Declaration::NamespaceAlias { alias, target }, self.span_from(start));
                Ok(())
            }
            _ => Err(ParseError::Backtrack),
        }
    }

    /// `using namespace name ;` or `using [typename] name ;`
    fn using_clause(&mut self) -> ParseResult<()> {
        let start = self.start_offset();
        self.expect_keyword(KeywordId::Using)?;

        if self.eat_keyword(KeywordId::Namespace) {
            let name = self.name()?;
            self.expect_punct(PunctuationId::Semi)?;
            self.accept(Declaration::UsingDirective(name), self.span_from(start));
            return Ok(());
        }

        let typename = self.eat_keyword(KeywordId::Typename);
        let name = self.name()?;
        self.expect_punct(PunctuationId::Semi)?;
        self.accept(Declaration::UsingDeclaration { typename, name }, self.span_from(start));
        Ok(())
    }

    /// `extern "C" { ... }` or `extern "C" declaration`
    fn linkage_specification(&mut self, ctx: &DeclContext<'_>) -> ParseResult<()> {
        let start = self.start_offset();
        self.expect_keyword(KeywordId::Extern)?;
        let literal = self.cursor.consume_expected(TokenKind::String)?.image.clone();
        let kind = ScopeKind::Linkage(unquote(&literal).to_string());

        self.enter_scope(kind.clone(), start);
        if self.eat_punct(PunctuationId::LBrace) {
            self.declaration_body(&DeclContext::default())?;
        } else {
            self.declaration(ctx)?;
        }
        self.exit_scope(kind, start);
        Ok(())
    }

    // ========================================================================
    // Templates
    // ========================================================================

    /// `[export] template < params > declaration`, `template <> declaration` or `template declaration`.
    fn template_declaration(&mut self, ctx: &DeclContext<'_>) -> ParseResult<()> {
        let start = self.start_offset();
        let exported = self.eat_keyword(KeywordId::Export);
        self.expect_keyword(KeywordId::Template)?;

        let kind = if !self.check_op(OperatorId::Lt) {
            ScopeKind::TemplateInstantiation
        } else {
            self.bump()?;
            if self.eat_op(OperatorId::Gt) {
                ScopeKind::TemplateSpecialization
            } else {
                let parameters = self.template_parameter_list()?;
                self.expect_op(OperatorId::Gt)?;
                ScopeKind::Template { exported, parameters }
            }
        };

        self.enter_scope(kind.clone(), start);
        self.declaration(ctx)?;
        self.exit_scope(kind, start);
        Ok(())
    }

    /// Comma-separated template parameters, up to (not including) the closing `>`.
    fn template_parameter_list(&mut self) -> ParseResult<Vec<TemplateParameter>> {
        self.template_params += 1;
        let result = self.template_parameter_list_inner();
        self.template_params -= 1;
        result
    }

    fn template_parameter_list_inner(&mut self) -> ParseResult<Vec<TemplateParameter>> {
        let mut parameters = Vec::new();
        if self.check_op(OperatorId::Gt) {
            return Ok(parameters);
        }
        loop {
            parameters.push(self.template_parameter()?);
            if !self.eat_punct(PunctuationId::Comma) {
                return Ok(parameters);
            }
        }
    }

    fn template_parameter(&mut self) -> ParseResult<TemplateParameter> {
        let start = self.start_offset();
        let kind = match self.kind()? {
            TokenKind::Keyword(id @ (KeywordId::Class | KeywordId::Typename))
                if self.lt(3) != Some(TokenKind::Punctuation(PunctuationId::ColonColon)) =>
            {
                self.bump()?;
                if id == KeywordId::Class {
                    TemplateParameterKind::Class
                } else {
                    TemplateParameterKind::Typename
                }
            }
            TokenKind::Keyword(KeywordId::Template) => {
                self.bump()?;
                self.expect_op(OperatorId::Lt)?;
                let nested = self.template_parameter_list()?;
                self.expect_op(OperatorId::Gt)?;
                self.expect_keyword(KeywordId::Class)?;
                TemplateParameterKind::Template(nested)
            }
            _ => {
                let parameter = self.parameter_declaration(&DeclContext::default())?;
                return Ok(TemplateParameter {
                    kind: TemplateParameterKind::Value(parameter),
                    name: None,
                    default: None,
                    span: self.span_from(start),
                });
            }
        };

        let name = if self.check_ident() {
            Some(self.bump_token()?.image)
        } else {
            None
        };
        let default = if self.eat_op(OperatorId::Assign) {
            Some(if matches!(kind, TemplateParameterKind::Template(_)) {
                self.name()?
            } else {
                self.type_id()?
            })
        } else {
            None
        };

        Ok(TemplateParameter {
            kind,
            name,
            default,
            span: self.span_from(start),
        })
    }

    // ========================================================================
    // Simple declarations
    // ========================================================================

    /// Try a simple declaration under each strategy until one succeeds.
    fn simple_declaration_strategy_union(&mut self, ctx: &DeclContext<'_>) -> ParseResult<()> {
        for strategy in [
            DeclStrategy::TryConstructor,
            DeclStrategy::TryFunction,
            DeclStrategy::TryVariable,
        ] {
            match self.attempt(|p| p.simple_declaration(strategy, ctx)) {
                Err(ParseError::Backtrack) => continue,
                other => return other,
            }
        }
        Err(ParseError::Backtrack)
    }

    /// `decl-specifier-seq [init-declarator-list] ;` or a function definition.
    fn simple_declaration(&mut self, strategy: DeclStrategy, ctx: &DeclContext<'_>) -> ParseResult<()> {
        let start = self.start_offset();
        let mut builder = DeclarationBuilder::new(ctx.access);
        let specifiers = SpecifierContext {
            parm: false,
            for_kr: false,
            strategy,
            decl: *ctx,
        };
        self.decl_specifier_seq(&mut builder, &specifiers)?;
        if !self.check_punct(PunctuationId::Semi) {
            self.init_declarator_list(&mut builder, strategy, ctx)?;
        }

        match self.kind()? {
            TokenKind::Punctuation(PunctuationId::Semi) => {
                self.bump()?;
                self.accept_declarations(builder, self.span_from(start));
                Ok(())
            }
            TokenKind::Punctuation(PunctuationId::Colon | PunctuationId::LBrace) => {
                self.function_definition(builder, start)
            }
            _ => Err(ParseError::Backtrack),
        }
    }

    /// The declaration part of an old-style parameter list: `int a, b;`, returned instead of reported.
    fn kr_declaration(&mut self, ctx: &DeclContext<'_>) -> ParseResult<Vec<SimpleDeclaration>> {
        let mut builder = DeclarationBuilder::new(None);
        let specifiers = SpecifierContext {
            parm: false,
            for_kr: true,
            strategy: DeclStrategy::TryVariable,
            decl: *ctx,
        };
        self.decl_specifier_seq(&mut builder, &specifiers)?;
        if !self.check_punct(PunctuationId::Semi) {
            self.init_declarator_list(&mut builder, DeclStrategy::TryVariable, ctx)?;
        }
        self.expect_punct(PunctuationId::Semi)?;
        Ok(builder.finish())
    }

    fn init_declarator_list(
        &mut self,
        builder: &mut DeclarationBuilder,
        strategy: DeclStrategy,
        ctx: &DeclContext<'_>,
    ) -> ParseResult<()> {
        loop {
            let declarator = self.init_declarator(strategy, ctx)?;
            if declarator.declared_name().is_none() && declarator.bit_field.is_none() {
                return Err(ParseError::Backtrack);
            }
            builder.add_declarator(declarator);
            if !self.eat_punct(PunctuationId::Comma) {
                return Ok(());
            }
        }
    }

    // ========================================================================
    // Function definitions
    // ========================================================================

    /// `[: ctor-initializer] { body }` after the declarator of a function definition.
    fn function_definition(&mut self, builder: DeclarationBuilder, start: usize) -> ParseResult<()> {
        let member_initializers = if self.eat_punct(PunctuationId::Colon) {
            self.ctor_initializer()?
        } else {
            Vec::new()
        };
        if !self.check_punct(PunctuationId::LBrace) {
            return Err(ParseError::Backtrack);
        }

        let declaration = match builder.finish_definition() {
            Ok(declaration) => declaration,
            Err(err) => {
                let at = self.cursor.mark();
                self.fail_parse(at, err.to_string());
                return Err(ParseError::Backtrack);
            }
        };

        let mut definition = FunctionDefinition {
            declaration,
            member_initializers,
            body: FunctionBody::Pending,
        };
        self.enter_scope(ScopeKind::Function(Box::new(definition.clone())), start);
        definition.body = self.function_body()?;
        self.exit_scope(ScopeKind::Function(Box::new(definition)), start);
        Ok(())
    }

    /// `name ( [args] ) , ...`
    fn ctor_initializer(&mut self) -> ParseResult<Vec<MemberInitializer>> {
        let mut initializers = Vec::new();
        loop {
            let name = self.name()?;
            self.expect_punct(PunctuationId::LParen)?;
            let args = if self.check_punct(PunctuationId::RParen) {
                None
            } else {
                Some(self.required_expression()?)
            };
            self.expect_punct(PunctuationId::RParen)?;
            initializers.push(MemberInitializer { name, args });
            if !self.eat_punct(PunctuationId::Comma) {
                return Ok(initializers);
            }
        }
    }

    fn function_body(&mut self) -> ParseResult<FunctionBody> {
        match self.config.mode {
            ParseMode::Quick => {
                let start = self.start_offset();
                self.skip_balanced_braces()?;
                Ok(FunctionBody::Skipped(self.span_from(start)))
            }
            ParseMode::Complete => Ok(FunctionBody::Parsed(self.compound_statement()?)),
        }
    }

    /// Consume `{ ... }` without parsing what is inside.
    fn skip_balanced_braces(&mut self) -> ParseResult<()> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump_token()?.kind {
                TokenKind::Punctuation(PunctuationId::LBrace) => depth += 1,
                TokenKind::Punctuation(PunctuationId::RBrace) => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    /// A function parameter: specifiers plus an optional (possibly abstract) declarator.
    fn parameter_declaration(&mut self, ctx: &DeclContext<'_>) -> ParseResult<ParameterDeclaration> {
        self.attempt(|p| {
            let start = p.start_offset();
            let before = p.cursor.mark();
            let mut builder = DeclarationBuilder::new(None);
            let specifiers = SpecifierContext {
                parm: true,
                for_kr: false,
                strategy: DeclStrategy::TryFunction,
                decl: *ctx,
            };
            p.decl_specifier_seq(&mut builder, &specifiers)?;
            let declarator = p.init_declarator(DeclStrategy::TryFunction, ctx)?;
            if p.cursor.mark() == before {
                return Err(ParseError::Backtrack);
            }
            Ok(ParameterDeclaration {
                specifiers: builder.specifiers,
                declarator,
                span: p.span_from(start),
            })
        })
    }
}

/// Strip the quotes of a string literal image.
fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal)
}
