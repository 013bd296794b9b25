/// Declaration specifiers, class and enum specifiers.
///
/// ## Notes
/// - `decl_specifier_seq` decides where the specifiers end and the declarator begins. An identifier after a builtin
///   type, or after a type name in a parameter, always starts the declarator; otherwise two lookaheads decide
///   (`lookahead_for_constructor_or_conversion`, `lookahead_for_declarator`).
/// - Class and enum bodies are reported to the journal as they are parsed; the declaration keeps a
///   [`TypeSpecifier`] pointing at them.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Specifier sequence
    // ========================================================================

    fn decl_specifier_seq(&mut self, builder: &mut DeclarationBuilder, sc: &SpecifierContext<'_>) -> ParseResult<()> {
        loop {
            let Some(kind) = self.lt(1) else {
                return Ok(());
            };
            match kind {
                TokenKind::Keyword(id) => {
                    if let Some(flag) = specifier_flag(id) {
                        self.bump()?;
                        builder.add_flag(flag);
                    } else if let Some(simple) = simple_type(id) {
                        self.bump()?;
                        builder.set_simple_type(simple);
                    } else {
                        match id {
                            KeywordId::Typename => {
                                self.bump()?;
                                let name = self.name()?;
                                builder.add_flag(SpecifierFlags::TYPENAME);
                                builder.set_type_name(name);
                            }
                            KeywordId::Class | KeywordId::Struct | KeywordId::Union => {
                                if !sc.parm && !sc.for_kr {
                                    if let Some(spec) = self.memoized_class_specifier()? {
                                        builder.set_type_specifier(spec);
                                        continue;
                                    }
                                }
                                let elaborated = self.elaborated_type_specifier()?;
                                builder.set_type_specifier(TypeSpecifier::Elaborated(elaborated));
                            }
                            KeywordId::Enum => {
                                if let Some(spec) = self.optional(|p| p.enum_specifier())? {
                                    builder.set_type_specifier(spec);
                                    continue;
                                }
                                let elaborated = self.elaborated_type_specifier()?;
                                builder.set_type_specifier(TypeSpecifier::Elaborated(elaborated));
                            }
                            _ => return Ok(()),
                        }
                    }
                }
                TokenKind::Ident | TokenKind::Punctuation(PunctuationId::ColonColon) => {
                    if builder.has_raw_type() || (sc.parm && builder.has_type_name()) {
                        return Ok(());
                    }
                    if self.lookahead_for_constructor_or_conversion(sc) || self.lookahead_for_declarator(builder) {
                        return Ok(());
                    }
                    let name = self.name()?;
                    builder.set_type_name(name);
                }
                _ => return Ok(()),
            }
        }
    }

    /// Return `true` if the name ahead declares a constructor, destructor or conversion function rather than naming
    /// a type.
    fn lookahead_for_constructor_or_conversion(&mut self, sc: &SpecifierContext<'_>) -> bool {
        if sc.parm {
            return false;
        }
        if self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::LParen)) {
            if sc.strategy == DeclStrategy::TryConstructor {
                return true;
            }
            if let Some(class_name) = sc.decl.class_name {
                if self.ident_at_is(1, class_name) {
                    return true;
                }
            }
        }

        // Walk `[::] id [<...>] :: id [<...>] ...` and compare the last two identifiers.
        let mut pos = 1;
        if self.lt(pos) == Some(TokenKind::Punctuation(PunctuationId::ColonColon)) {
            pos += 1;
        }
        let mut identifiers: Vec<String> = Vec::new();
        loop {
            if self.lt(pos) != Some(TokenKind::Ident) {
                return false;
            }
            if let Some(image) = self.image_at(pos) {
                identifiers.push(image);
            }
            pos += 1;
            if self.lt(pos) == Some(TokenKind::Operator(OperatorId::Lt)) {
                match self.skip_template_args_ahead(pos) {
                    Some(next) => pos = next,
                    None => return false,
                }
            }
            if self.lt(pos) != Some(TokenKind::Punctuation(PunctuationId::ColonColon)) {
                break;
            }
            pos += 1;
            match self.lt(pos) {
                Some(TokenKind::Operator(OperatorId::Tilde)) | Some(TokenKind::Keyword(KeywordId::Operator)) => {
                    return true;
                }
                Some(TokenKind::Ident) => {}
                _ => return false,
            }
        }
        match identifiers.as_slice() {
            [.., outer, inner] => outer == inner,
            _ => false,
        }
    }

    /// Given `<` at lookahead position `pos`, return the position after its matching `>`.
    fn skip_template_args_ahead(&mut self, mut pos: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.lt(pos)? {
                TokenKind::Operator(OperatorId::Lt) => depth += 1,
                TokenKind::Operator(OperatorId::Gt) => depth -= 1,
                TokenKind::Operator(OperatorId::Shr) => depth = depth.checked_sub(2)?,
                TokenKind::Punctuation(PunctuationId::Semi | PunctuationId::LBrace | PunctuationId::RBrace) => {
                    return None;
                }
                _ => {}
            }
            pos += 1;
            if depth == 0 {
                return Some(pos);
            }
        }
    }

    /// Return `true` if, with a type name already seen, the identifier ahead starts the declarator.
    fn lookahead_for_declarator(&mut self, builder: &DeclarationBuilder) -> bool {
        if !builder.has_type_name() {
            return false;
        }
        let second = self.lt(2);
        let third = self.lt(3);
        let declarator_shaped = second != Some(TokenKind::Ident)
            || (third != Some(TokenKind::Punctuation(PunctuationId::LParen))
                && third != Some(TokenKind::Operator(OperatorId::Assign)));
        declarator_shaped && !second.is_some_and(|k| k.is_pointer())
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// `class-key [name] [: bases] { members }`
    ///
    /// Backtracks without a body so the caller can fall back to an elaborated specifier.
    /// A class specifier, parsed at most once per position.
    ///
    /// Every declaration strategy rereads the specifiers; a cached class is not parsed again. A hit replays the
    /// recorded events into the journal, and a cached failure fails again without consuming anything.
    fn memoized_class_specifier(&mut self) -> ParseResult<Option<TypeSpecifier>> {
        let start = self.checkpoint();
        if let Some(parsed) = self.classes.get(&start.mark).cloned() {
            return Ok(parsed.map(|parsed| {
                self.cursor.restore(parsed.end);
                for event in parsed.events {
                    self.journal.push(event);
                }
                parsed.specifier
            }));
        }

        let specifier = self.optional(|p| p.class_specifier())?;
        let parsed = specifier.clone().map(|specifier| ParsedClass {
            end: self.cursor.mark(),
            events: self.journal.events_since(start.events),
            specifier,
        });
        self.classes.insert(start.mark, parsed);
        Ok(specifier)
    }

    fn class_specifier(&mut self) -> ParseResult<TypeSpecifier> {
        let start = self.start_offset();
        let key = match self.kind()? {
            TokenKind::Keyword(KeywordId::Class) => ClassKey::Class,
            TokenKind::Keyword(KeywordId::Struct) => ClassKey::Struct,
            TokenKind::Keyword(KeywordId::Union) => ClassKey::Union,
            _ => return Err(ParseError::Backtrack),
        };
        self.bump()?;

        let name = if self.check_ident() || self.check_punct(PunctuationId::ColonColon) {
            Some(self.name()?)
        } else {
            None
        };
        if !self.check_punct(PunctuationId::Colon) && !self.check_punct(PunctuationId::LBrace) {
            return Err(ParseError::Backtrack);
        }
        let bases = if self.eat_punct(PunctuationId::Colon) {
            self.base_clause()?
        } else {
            Vec::new()
        };
        self.expect_punct(PunctuationId::LBrace)?;

        let kind = ScopeKind::Class(ClassSpecifier {
            key,
            name: name.clone(),
            bases,
        });
        self.enter_scope(kind.clone(), start);

        let class_name = name.as_ref().map(|n| unqualified_name(&n.text).to_string());
        let mut ctx = DeclContext {
            access: Some(key.default_access()),
            class_name: class_name.as_deref(),
        };
        loop {
            match self.kind()? {
                TokenKind::Punctuation(PunctuationId::RBrace) => {
                    self.bump()?;
                    break;
                }
                TokenKind::Keyword(id @ (KeywordId::Public | KeywordId::Protected | KeywordId::Private))
                    if self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::Colon)) =>
                {
                    self.bump()?;
                    self.bump()?;
                    ctx.access = Some(access_of(id));
                }
                _ => self.declaration_or_recover(&ctx, true)?,
            }
        }

        self.exit_scope(kind, start);
        Ok(TypeSpecifier::Class {
            key,
            name,
            span: self.span_from(start),
        })
    }

    /// `[virtual] [access] [virtual] name, ...`
    fn base_clause(&mut self) -> ParseResult<Vec<BaseSpecifier>> {
        let mut bases = Vec::new();
        loop {
            let mut is_virtual = false;
            let mut access = None;
            loop {
                match self.kind()? {
                    TokenKind::Keyword(KeywordId::Virtual) => {
                        self.bump()?;
                        is_virtual = true;
                    }
                    TokenKind::Keyword(id @ (KeywordId::Public | KeywordId::Protected | KeywordId::Private)) => {
                        self.bump()?;
                        access = Some(access_of(id));
                    }
                    TokenKind::Ident | TokenKind::Punctuation(PunctuationId::ColonColon) => break,
                    _ => return Err(ParseError::Backtrack),
                }
            }
            let name = self.name()?;
            bases.push(BaseSpecifier {
                name,
                is_virtual,
                access,
            });
            if !self.eat_punct(PunctuationId::Comma) {
                return Ok(bases);
            }
        }
    }

    // ========================================================================
    // Enumerations
    // ========================================================================

    /// `enum [name] { enumerator [= value], ... }`
    fn enum_specifier(&mut self) -> ParseResult<TypeSpecifier> {
        let start = self.start_offset();
        self.expect_keyword(KeywordId::Enum)?;
        let name = if self.check_ident() {
            let mark = self.cursor.mark();
            self.bump()?;
            Some(self.name_from(mark)?)
        } else {
            None
        };
        self.expect_punct(PunctuationId::LBrace)?;

        let mut enumerators = Vec::new();
        loop {
            if self.eat_punct(PunctuationId::RBrace) {
                break;
            }
            let enumerator_start = self.start_offset();
            let ident = self.expect_ident()?;
            let value = if self.eat_op(OperatorId::Assign) {
                Some(self.constant_expression()?)
            } else {
                None
            };
            enumerators.push(Enumerator {
                name: ident.image,
                value,
                span: self.span_from(enumerator_start),
            });
            if !self.check_punct(PunctuationId::RBrace) {
                self.expect_punct(PunctuationId::Comma)?;
            }
        }

        let span = self.span_from(start);
        self.accept(
            Declaration::Enumeration(EnumSpecifier {
                name: name.clone(),
                enumerators,
            }),
            span,
        );
        Ok(TypeSpecifier::Enum { name, span })
    }

    /// `class-key name` or `enum name` without a body.
    fn elaborated_type_specifier(&mut self) -> ParseResult<ElaboratedTypeSpecifier> {
        let kind = match self.kind()? {
            TokenKind::Keyword(KeywordId::Class) => ElaboratedKind::Class(ClassKey::Class),
            TokenKind::Keyword(KeywordId::Struct) => ElaboratedKind::Class(ClassKey::Struct),
            TokenKind::Keyword(KeywordId::Union) => ElaboratedKind::Class(ClassKey::Union),
            TokenKind::Keyword(KeywordId::Enum) => ElaboratedKind::Enum,
            _ => return Err(ParseError::Backtrack),
        };
        self.bump()?;
        let name = self.name()?;
        Ok(ElaboratedTypeSpecifier { kind, name })
    }
}

/// The specifier flag a keyword sets, if it is a flag keyword.
fn specifier_flag(id: KeywordId) -> Option<SpecifierFlags> {
    let flag = match id {
        KeywordId::Auto => SpecifierFlags::AUTO,
        KeywordId::Register => SpecifierFlags::REGISTER,
        KeywordId::Static => SpecifierFlags::STATIC,
        KeywordId::Extern => SpecifierFlags::EXTERN,
        KeywordId::Mutable => SpecifierFlags::MUTABLE,
        KeywordId::Typedef => SpecifierFlags::TYPEDEF,
        KeywordId::Friend => SpecifierFlags::FRIEND,
        KeywordId::Const => SpecifierFlags::CONST,
        KeywordId::Volatile => SpecifierFlags::VOLATILE,
        KeywordId::Inline => SpecifierFlags::INLINE,
        KeywordId::Virtual => SpecifierFlags::VIRTUAL,
        KeywordId::Explicit => SpecifierFlags::EXPLICIT,
        KeywordId::Short => SpecifierFlags::SHORT,
        KeywordId::Long => SpecifierFlags::LONG,
        KeywordId::Signed => SpecifierFlags::SIGNED,
        KeywordId::Unsigned => SpecifierFlags::UNSIGNED,
        _ => return None,
    };
    Some(flag)
}

/// The builtin type a keyword names, if it is a type keyword.
fn simple_type(id: KeywordId) -> Option<SimpleType> {
    let simple = match id {
        KeywordId::Char => SimpleType::Char,
        KeywordId::WcharT => SimpleType::WcharT,
        KeywordId::Bool => SimpleType::Bool,
        KeywordId::Int => SimpleType::Int,
        KeywordId::Float => SimpleType::Float,
        KeywordId::Double => SimpleType::Double,
        KeywordId::Void => SimpleType::Void,
        _ => return None,
    };
    Some(simple)
}

fn access_of(id: KeywordId) -> Access {
    match id {
        KeywordId::Public => Access::Public,
        KeywordId::Protected => Access::Protected,
        _ => Access::Private,
    }
}

/// The last component of a qualified name, without template arguments: `A<B::C>::D<int>` gives `D`.
fn unqualified_name(text: &str) -> &str {
    let mut depth = 0usize;
    let mut last_start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                last_start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    let last = &text[last_start..];
    let end = last.find('<').unwrap_or(last.len());
    last[..end].trim()
}
