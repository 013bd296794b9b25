/// Expression parsing methods.
///
/// This chunk implements the C++ expression grammar by precedence climbing, one method per level:
///
/// ```text
/// expression      = assignment ("," assignment)*
/// assignment      = throw | conditional [assign-op assignment]
/// conditional     = logical_or ["?" expression ":" assignment]
/// logical_or      = logical_and ("||" logical_and)*
/// logical_and     = bit_or ("&&" bit_or)*
/// bit_or          = bit_xor ("|" bit_xor)*
/// bit_xor         = bit_and ("^" bit_and)*
/// bit_and         = equality ("&" equality)*
/// equality        = relational (("==" | "!=") relational)*
/// relational      = shift (("<" | ">" | "<=" | ">=") shift)*
/// shift           = additive (("<<" | ">>") additive)*
/// additive        = multiplicative (("+" | "-") multiplicative)*
/// multiplicative  = pm (("*" | "/" | "%") pm)*
/// pm              = cast ((".*" | "->*") cast)*
/// cast            = "(" type-id ")" cast | unary
/// unary           = prefix-op cast | sizeof | new | delete | postfix
/// postfix         = primary ( "[" expr "]" | "(" [expr] ")" | "." name | "->" name | "++" | "--" )*
/// ```
///
/// ## Notes
/// - A primary that finds nothing it recognizes returns [`Expr::Empty`] without consuming anything. Positions
///   that need an operand (operator right-hand sides, initializers) reject an empty one.
/// - A relational operator with nothing after it is given back: in `a < ` the `<` is left unconsumed.
/// - `name<...>` keeps its template arguments only when the token after `>` cannot continue an expression
///   operand, or is `(`; otherwise `<` is read as less-than.
/// - Inside a template parameter list a bare `>` ends the list, but within `( )` and `[ ]` it compares again.
impl<S: TokenSource> Parser<S> {
    // ========================================================================
    // Entry points
    // ========================================================================

    fn expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| {
            let start = p.start_offset();
            let mut lhs = p.assignment_expression()?;
            while !is_empty(&lhs) && p.check_punct(PunctuationId::Comma) {
                p.bump()?;
                let rhs = p.operand(Self::assignment_expression)?;
                lhs = p.spanned(Expr::Binary(Box::new(lhs), BinaryOp::Comma, rhs), start);
            }
            Ok(lhs)
        })
    }

    /// An expression that must not be empty.
    fn required_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| p.operand(Self::expression).map(|e| *e))
    }

    fn required_assignment_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| p.operand(Self::assignment_expression).map(|e| *e))
    }

    /// A conditional expression that must not be empty, as used for array bounds, enumerator values and case
    /// labels.
    fn constant_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| p.operand(Self::conditional_expression).map(|e| *e))
    }

    /// Run `rule` and reject an empty result.
    fn operand(&mut self, rule: fn(&mut Self) -> ParseResult<Spanned<Expr>>) -> ParseResult<Box<Spanned<Expr>>> {
        let expr = rule(self)?;
        if is_empty(&expr) {
            return Err(ParseError::Backtrack);
        }
        Ok(Box::new(expr))
    }

    // ========================================================================
    // Assignment and conditional
    // ========================================================================

    fn assignment_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| {
            let start = p.start_offset();
            if p.eat_keyword(KeywordId::Throw) {
                let operand = p.expression()?;
                let operand = (!is_empty(&operand)).then(|| Box::new(operand));
                return Ok(p.spanned(Expr::Throw(operand), start));
            }

            let lhs = p.conditional_expression()?;
            if is_empty(&lhs) {
                return Ok(lhs);
            }
            let Some(op) = p.lt(1).and_then(assign_op) else {
                return Ok(lhs);
            };
            p.bump()?;
            let rhs = p.operand(Self::assignment_expression)?;
            Ok(p.spanned(Expr::Assign(Box::new(lhs), op, rhs), start))
        })
    }

    fn conditional_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.attempt(|p| {
            let start = p.start_offset();
            let condition = p.logical_or_expression()?;
            if is_empty(&condition) || !p.check_punct(PunctuationId::Question) {
                return Ok(condition);
            }
            p.bump()?;
            let then_branch = p.operand(Self::expression)?;
            p.expect_punct(PunctuationId::Colon)?;
            let else_branch = p.operand(Self::assignment_expression)?;
            Ok(p.spanned(Expr::Conditional(Box::new(condition), then_branch, else_branch), start))
        })
    }

    // ========================================================================
    // Binary levels
    // ========================================================================

    /// One left-associative binary level: `next (op next)*`.
    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> ParseResult<Spanned<Expr>>,
        op_of: fn(TokenKind) -> Option<BinaryOp>,
    ) -> ParseResult<Spanned<Expr>> {
        let start = self.start_offset();
        let mut lhs = next(self)?;
        while !is_empty(&lhs) {
            let Some(op) = self.lt(1).and_then(op_of) else {
                break;
            };
            self.bump()?;
            let rhs = self.operand(next)?;
            lhs = self.spanned(Expr::Binary(Box::new(lhs), op, rhs), start);
        }
        Ok(lhs)
    }

    fn logical_or_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::logical_and_expression, |k| {
            k.is_operator(OperatorId::OrOr).then_some(BinaryOp::OrOr)
        })
    }

    fn logical_and_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::inclusive_or_expression, |k| {
            k.is_operator(OperatorId::AndAnd).then_some(BinaryOp::AndAnd)
        })
    }

    fn inclusive_or_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::exclusive_or_expression, |k| {
            k.is_operator(OperatorId::Pipe).then_some(BinaryOp::BitOr)
        })
    }

    fn exclusive_or_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::and_expression, |k| {
            k.is_operator(OperatorId::Caret).then_some(BinaryOp::BitXor)
        })
    }

    fn and_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::equality_expression, |k| {
            k.is_operator(OperatorId::Amp).then_some(BinaryOp::BitAnd)
        })
    }

    fn equality_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::relational_expression, |k| match k.operator_id()? {
            OperatorId::EqEq => Some(BinaryOp::Eq),
            OperatorId::NotEq => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    /// Like `binary_level`, but an operator with no operand after it is given back unconsumed.
    fn relational_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.start_offset();
        let mut lhs = self.shift_expression()?;
        while !is_empty(&lhs) {
            let op = match self.lt(1).and_then(|k| k.operator_id()) {
                Some(OperatorId::Lt) => BinaryOp::Lt,
                Some(OperatorId::Gt) if self.template_params == 0 => BinaryOp::Gt,
                Some(OperatorId::LtEq) => BinaryOp::Le,
                Some(OperatorId::GtEq) => BinaryOp::Ge,
                _ => break,
            };
            let before_op = self.checkpoint();
            self.bump()?;
            let rhs = self.shift_expression()?;
            if is_empty(&rhs) {
                self.restore(before_op);
                break;
            }
            lhs = self.spanned(Expr::Binary(Box::new(lhs), op, Box::new(rhs)), start);
        }
        Ok(lhs)
    }

    fn shift_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        if self.template_params > 0 {
            return self.binary_level(Self::additive_expression, |k| {
                k.is_operator(OperatorId::Shl).then_some(BinaryOp::Shl)
            });
        }
        self.binary_level(Self::additive_expression, |k| match k.operator_id()? {
            OperatorId::Shl => Some(BinaryOp::Shl),
            OperatorId::Shr => Some(BinaryOp::Shr),
            _ => None,
        })
    }

    fn additive_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::multiplicative_expression, |k| match k.operator_id()? {
            OperatorId::Plus => Some(BinaryOp::Add),
            OperatorId::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn multiplicative_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::pm_expression, |k| match k.operator_id()? {
            OperatorId::Star => Some(BinaryOp::Mul),
            OperatorId::Slash => Some(BinaryOp::Div),
            OperatorId::Percent => Some(BinaryOp::Rem),
            _ => None,
        })
    }

    fn pm_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        self.binary_level(Self::cast_expression, |k| match k.operator_id()? {
            OperatorId::DotStar => Some(BinaryOp::DotStar),
            OperatorId::ArrowStar => Some(BinaryOp::ArrowStar),
            _ => None,
        })
    }

    // ========================================================================
    // Cast and unary
    // ========================================================================

    /// `( type-id ) cast-expression`, or a unary expression.
    fn cast_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        if self.check_punct(PunctuationId::LParen) {
            let start = self.start_offset();
            let cast = self.optional(|p| {
                p.bump()?;
                let type_id = p.type_id()?;
                p.expect_punct(PunctuationId::RParen)?;
                let operand = p.operand(Self::cast_expression)?;
                Ok(Expr::Cast(type_id, operand))
            })?;
            if let Some(cast) = cast {
                return Ok(self.spanned(cast, start));
            }
        }
        self.unary_expression()
    }

    fn unary_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.start_offset();
        let Some(kind) = self.lt(1) else {
            return self.postfix_expression();
        };

        if let Some(op) = kind.operator_id().and_then(prefix_op) {
            self.bump()?;
            let operand = self.operand(Self::cast_expression)?;
            return Ok(self.spanned(Expr::Unary(op, operand), start));
        }

        let expr = match kind {
            TokenKind::Keyword(KeywordId::Sizeof) => {
                self.bump()?;
                let type_operand = if self.check_punct(PunctuationId::LParen) {
                    self.optional(|p| {
                        p.bump()?;
                        let type_id = p.type_id()?;
                        p.expect_punct(PunctuationId::RParen)?;
                        Ok(type_id)
                    })?
                } else {
                    None
                };
                match type_operand {
                    Some(type_id) => Expr::SizeofType(type_id),
                    None => Expr::SizeofExpr(self.operand(Self::unary_expression)?),
                }
            }
            TokenKind::Keyword(KeywordId::New) => self.new_expression(false)?,
            TokenKind::Keyword(KeywordId::Delete) => self.delete_expression(false)?,
            TokenKind::Punctuation(PunctuationId::ColonColon)
                if matches!(self.lt(2), Some(TokenKind::Keyword(KeywordId::New | KeywordId::Delete))) =>
            {
                self.bump()?;
                if self.check_keyword(KeywordId::New) {
                    self.new_expression(true)?
                } else {
                    self.delete_expression(true)?
                }
            }
            _ => return self.postfix_expression(),
        };
        Ok(self.spanned(expr, start))
    }

    /// `new [(placement)] type-id [[dims]] [(init)]` or `new [(placement)] (type-id) ...`
    fn new_expression(&mut self, global: bool) -> ParseResult<Expr> {
        self.expect_keyword(KeywordId::New)?;
        let mut placement = None;
        let mut parenthesized_type = false;

        let type_id = if self.check_punct(PunctuationId::LParen) {
            let at_paren = self.checkpoint();
            let args = self.optional(|p| {
                p.bump()?;
                let args = p.required_expression()?;
                p.expect_punct(PunctuationId::RParen)?;
                Ok(args)
            })?;
            match args {
                Some(args) if self.check_punct(PunctuationId::LParen) => {
                    placement = Some(args);
                    parenthesized_type = true;
                    self.parenthesized_type_id()?
                }
                Some(args) => match self.optional(|p| p.type_id())? {
                    Some(type_id) => {
                        placement = Some(args);
                        type_id
                    }
                    None => {
                        // The parenthesized "placement" was the type.
                        self.restore(at_paren);
                        parenthesized_type = true;
                        self.parenthesized_type_id()?
                    }
                },
                None => {
                    parenthesized_type = true;
                    self.parenthesized_type_id()?
                }
            }
        } else {
            self.type_id()?
        };

        let mut array_sizes = Vec::new();
        while self.eat_punct(PunctuationId::LBracket) {
            array_sizes.push(self.required_expression()?);
            self.expect_punct(PunctuationId::RBracket)?;
        }

        let initializer = if self.eat_punct(PunctuationId::LParen) {
            let args = if self.check_punct(PunctuationId::RParen) {
                None
            } else {
                Some(self.required_expression()?)
            };
            self.expect_punct(PunctuationId::RParen)?;
            Some(args)
        } else {
            None
        };

        Ok(Expr::New(Box::new(NewExpr {
            global,
            placement,
            parenthesized_type,
            type_id,
            array_sizes,
            initializer,
        })))
    }

    fn parenthesized_type_id(&mut self) -> ParseResult<TypeId> {
        self.expect_punct(PunctuationId::LParen)?;
        let type_id = self.type_id()?;
        self.expect_punct(PunctuationId::RParen)?;
        Ok(type_id)
    }

    /// `delete [[]] cast-expression`
    fn delete_expression(&mut self, global: bool) -> ParseResult<Expr> {
        self.expect_keyword(KeywordId::Delete)?;
        let array = self.check_punct(PunctuationId::LBracket)
            && self.lt(2) == Some(TokenKind::Punctuation(PunctuationId::RBracket));
        if array {
            self.bump()?;
            self.bump()?;
        }
        let operand = self.operand(Self::cast_expression)?;
        Ok(Expr::Delete {
            global,
            array,
            operand,
        })
    }

    // ========================================================================
    // Postfix and primary
    // ========================================================================

    fn postfix_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.start_offset();
        let mut expr = match self.lt(1) {
            Some(TokenKind::Keyword(id)) if simple_type(id).is_some() || is_size_keyword(id) => {
                let type_mark = self.cursor.mark();
                self.bump()?;
                let type_id = self.name_from(type_mark)?;
                let args = self.call_arguments()?;
                self.spanned(Expr::TypeConstruct { type_id, args }, start)
            }
            Some(TokenKind::Keyword(KeywordId::Typename)) => {
                let type_mark = self.cursor.mark();
                self.bump()?;
                self.name()?;
                let type_id = self.name_from(type_mark)?;
                let args = self.call_arguments()?;
                self.spanned(Expr::TypeConstruct { type_id, args }, start)
            }
            Some(TokenKind::Keyword(id)) if named_cast(id).is_some() => {
                let kind = named_cast(id).ok_or(ParseError::Backtrack)?;
                self.bump()?;
                self.expect_op(OperatorId::Lt)?;
                let type_id = self.type_id()?;
                self.expect_op(OperatorId::Gt)?;
                self.expect_punct(PunctuationId::LParen)?;
                let operand = Box::new(self.required_expression()?);
                self.expect_punct(PunctuationId::RParen)?;
                self.spanned(
                    Expr::NamedCast {
                        kind,
                        type_id,
                        operand,
                    },
                    start,
                )
            }
            Some(TokenKind::Keyword(KeywordId::Typeid)) => {
                self.bump()?;
                self.expect_punct(PunctuationId::LParen)?;
                let expr = match self.optional(|p| {
                    let type_id = p.type_id()?;
                    p.expect_punct(PunctuationId::RParen)?;
                    Ok(type_id)
                })? {
                    Some(type_id) => Expr::TypeidType(type_id),
                    None => {
                        let operand = Box::new(self.required_expression()?);
                        self.expect_punct(PunctuationId::RParen)?;
                        Expr::TypeidExpr(operand)
                    }
                };
                self.spanned(expr, start)
            }
            _ => self.primary_expression()?,
        };
        if is_empty(&expr) {
            return Ok(expr);
        }

        loop {
            let node = match self.lt(1) {
                Some(TokenKind::Punctuation(PunctuationId::LBracket)) => {
                    self.bump()?;
                    let index = Box::new(self.outside_template_params(Self::required_expression)?);
                    self.expect_punct(PunctuationId::RBracket)?;
                    Expr::Subscript(Box::new(expr), index)
                }
                Some(TokenKind::Punctuation(PunctuationId::LParen)) => {
                    let args = self.call_arguments()?;
                    Expr::Call(Box::new(expr), args)
                }
                Some(TokenKind::Operator(OperatorId::PlusPlus)) => {
                    self.bump()?;
                    Expr::Postfix(Box::new(expr), PostfixOp::Inc)
                }
                Some(TokenKind::Operator(OperatorId::MinusMinus)) => {
                    self.bump()?;
                    Expr::Postfix(Box::new(expr), PostfixOp::Dec)
                }
                Some(TokenKind::Punctuation(PunctuationId::Dot)) | Some(TokenKind::Operator(OperatorId::Arrow)) => {
                    let arrow = self.bump_token()?.kind.is_operator(OperatorId::Arrow);
                    let template = self.eat_keyword(KeywordId::Template);
                    let member = self.name()?;
                    Expr::Member {
                        base: Box::new(expr),
                        arrow,
                        template,
                        member,
                    }
                }
                _ => return Ok(expr),
            };
            expr = self.spanned(node, start);
        }
    }

    /// `( [expression] )`
    fn call_arguments(&mut self) -> ParseResult<Option<Box<Spanned<Expr>>>> {
        self.expect_punct(PunctuationId::LParen)?;
        if self.eat_punct(PunctuationId::RParen) {
            return Ok(None);
        }
        let args = self.outside_template_params(Self::required_expression)?;
        self.expect_punct(PunctuationId::RParen)?;
        Ok(Some(Box::new(args)))
    }

    /// Run `rule` with `>` and `>>` read as operators again, as inside brackets nested in a template parameter list.
    fn outside_template_params<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = std::mem::take(&mut self.template_params);
        let result = rule(self);
        self.template_params = saved;
        result
    }

    fn primary_expression(&mut self) -> ParseResult<Spanned<Expr>> {
        let start = self.start_offset();
        let Some(kind) = self.lt(1) else {
            return Ok(self.spanned(Expr::Empty, start));
        };

        let expr = match kind {
            TokenKind::Integer | TokenKind::Float | TokenKind::Char => {
                let image = self.bump_token()?.image;
                Expr::Literal {
                    kind: literal_kind(kind),
                    image,
                }
            }
            TokenKind::String => {
                // Adjacent string literals form one literal.
                let literal_mark = self.cursor.mark();
                while self.lt(1) == Some(TokenKind::String) {
                    self.bump()?;
                }
                Expr::Literal {
                    kind: LiteralKind::String,
                    image: self.name_from(literal_mark)?.text,
                }
            }
            TokenKind::Keyword(KeywordId::True | KeywordId::False) => Expr::Literal {
                kind: LiteralKind::Bool,
                image: self.bump_token()?.image,
            },
            TokenKind::Keyword(KeywordId::This) => {
                self.bump()?;
                Expr::This
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.bump()?;
                let inner = Box::new(self.outside_template_params(Self::required_expression)?);
                self.expect_punct(PunctuationId::RParen)?;
                Expr::Paren(inner)
            }
            TokenKind::Ident | TokenKind::Punctuation(PunctuationId::ColonColon) => Expr::Id(self.id_expression()?),
            TokenKind::Keyword(KeywordId::Operator) => {
                let mut d = Declarator::default();
                let mark = self.cursor.mark();
                self.operator_id(&mut d, mark)?;
                Expr::Id(d.name.ok_or(ParseError::Backtrack)?)
            }
            _ => Expr::Empty,
        };
        Ok(self.spanned(expr, start))
    }

    /// A name in expression position, deciding whether a following `<` opens template arguments.
    fn id_expression(&mut self) -> ParseResult<Name> {
        let checkpoint = self.checkpoint();
        let name = self.name()?;
        let ends_with_template_args = self
            .cursor
            .last_consumed()
            .is_some_and(|t| t.kind.is_operator(OperatorId::Gt) || t.kind.is_operator(OperatorId::Shr));
        if !ends_with_template_args || self.template_id_follows() {
            return Ok(name);
        }
        self.restore(checkpoint);
        self.attempt(|p| p.name_inner(false))
    }

    /// Whether the token after a `name<...>` keeps it a template-id.
    fn template_id_follows(&mut self) -> bool {
        match self.lt(1) {
            None => true,
            Some(TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::ColonColon)) => true,
            Some(kind) => !begins_operand(kind),
        }
    }
}

fn is_empty(expr: &Spanned<Expr>) -> bool {
    matches!(expr.node, Expr::Empty)
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    let op = match kind.operator_id()? {
        OperatorId::Assign => AssignOp::Assign,
        OperatorId::StarAssign => AssignOp::Mul,
        OperatorId::SlashAssign => AssignOp::Div,
        OperatorId::PercentAssign => AssignOp::Rem,
        OperatorId::PlusAssign => AssignOp::Add,
        OperatorId::MinusAssign => AssignOp::Sub,
        OperatorId::ShrAssign => AssignOp::Shr,
        OperatorId::ShlAssign => AssignOp::Shl,
        OperatorId::AmpAssign => AssignOp::And,
        OperatorId::CaretAssign => AssignOp::Xor,
        OperatorId::PipeAssign => AssignOp::Or,
        _ => return None,
    };
    Some(op)
}

fn prefix_op(id: OperatorId) -> Option<UnaryOp> {
    let op = match id {
        OperatorId::Star => UnaryOp::Deref,
        OperatorId::Amp => UnaryOp::AddrOf,
        OperatorId::Plus => UnaryOp::Plus,
        OperatorId::Minus => UnaryOp::Minus,
        OperatorId::Not => UnaryOp::Not,
        OperatorId::Tilde => UnaryOp::BitNot,
        OperatorId::PlusPlus => UnaryOp::PreInc,
        OperatorId::MinusMinus => UnaryOp::PreDec,
        _ => return None,
    };
    Some(op)
}

fn named_cast(id: KeywordId) -> Option<CastKind> {
    match id {
        KeywordId::DynamicCast => Some(CastKind::Dynamic),
        KeywordId::StaticCast => Some(CastKind::Static),
        KeywordId::ReinterpretCast => Some(CastKind::Reinterpret),
        KeywordId::ConstCast => Some(CastKind::Const),
        _ => None,
    }
}

fn literal_kind(kind: TokenKind) -> LiteralKind {
    match kind {
        TokenKind::Float => LiteralKind::Float,
        TokenKind::Char => LiteralKind::Char,
        TokenKind::String => LiteralKind::String,
        _ => LiteralKind::Integer,
    }
}

/// Return `true` if `kind` can start a cast-expression operand.
fn begins_operand(kind: TokenKind) -> bool {
    match kind {
        TokenKind::Ident | TokenKind::Integer | TokenKind::Float | TokenKind::Char | TokenKind::String => true,
        TokenKind::Punctuation(PunctuationId::LParen | PunctuationId::ColonColon) => true,
        TokenKind::Operator(id) => prefix_op(id).is_some(),
        TokenKind::Keyword(id) => {
            simple_type(id).is_some()
                || is_size_keyword(id)
                || named_cast(id).is_some()
                || matches!(
                    id,
                    KeywordId::This
                        | KeywordId::True
                        | KeywordId::False
                        | KeywordId::New
                        | KeywordId::Delete
                        | KeywordId::Sizeof
                        | KeywordId::Typeid
                        | KeywordId::Typename
                        | KeywordId::Operator
                        | KeywordId::Throw
                )
        }
        _ => false,
    }
}
