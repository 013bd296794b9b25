//! Token-level printer for expressions.
//!
//! Renders an [`Expr`] back to source text with a single space between tokens. The output is not pretty, but lexing
//! it again yields the tokens the expression was parsed from, which makes it useful for comparing parses and for
//! showing initializers in outlines.

use crate::ast::{Expr, Initializer, InitializerClause, NewExpr, PostfixOp, Spanned};

/// Writer that joins tokens with single spaces.
#[derive(Debug, Default)]
struct TokenWriter {
    output: String,
}

impl TokenWriter {
    /// Write one token (or a run of tokens kept as source text).
    fn token(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        if !self.output.is_empty() {
            self.output.push(' ');
        }
        self.output.push_str(s);
    }

    fn finish(self) -> String {
        self.output
    }

    fn expr(&mut self, expr: &Spanned<Expr>) {
        self.node(&expr.node);
    }

    fn node(&mut self, expr: &Expr) {
        match expr {
            Expr::Empty => {}
            Expr::Literal { image, .. } => self.token(image),
            Expr::This => self.token("this"),
            Expr::Id(name) => self.token(&name.text),
            Expr::Paren(inner) => {
                self.token("(");
                self.expr(inner);
                self.token(")");
            }
            Expr::Unary(op, operand) => {
                self.token(op.as_str());
                self.expr(operand);
            }
            Expr::Postfix(operand, op) => {
                self.expr(operand);
                self.token(match op {
                    PostfixOp::Inc => "++",
                    PostfixOp::Dec => "--",
                });
            }
            Expr::Binary(lhs, op, rhs) => {
                self.expr(lhs);
                self.token(op.as_str());
                self.expr(rhs);
            }
            Expr::Assign(lhs, op, rhs) => {
                self.expr(lhs);
                self.token(op.as_str());
                self.expr(rhs);
            }
            Expr::Conditional(condition, then_branch, else_branch) => {
                self.expr(condition);
                self.token("?");
                self.expr(then_branch);
                self.token(":");
                self.expr(else_branch);
            }
            Expr::Cast(type_id, operand) => {
                self.token("(");
                self.token(&type_id.text);
                self.token(")");
                self.expr(operand);
            }
            Expr::SizeofType(type_id) => {
                self.token("sizeof");
                self.token("(");
                self.token(&type_id.text);
                self.token(")");
            }
            Expr::SizeofExpr(operand) => {
                self.token("sizeof");
                self.expr(operand);
            }
            Expr::New(new) => self.new_expr(new),
            Expr::Delete { global, array, operand } => {
                if *global {
                    self.token("::");
                }
                self.token("delete");
                if *array {
                    self.token("[");
                    self.token("]");
                }
                self.expr(operand);
            }
            Expr::Throw(operand) => {
                self.token("throw");
                if let Some(operand) = operand {
                    self.expr(operand);
                }
            }
            Expr::Call(callee, args) => {
                self.expr(callee);
                self.args(args.as_deref());
            }
            Expr::Subscript(base, index) => {
                self.expr(base);
                self.token("[");
                self.expr(index);
                self.token("]");
            }
            Expr::Member {
                base,
                arrow,
                template,
                member,
            } => {
                self.expr(base);
                self.token(if *arrow { "->" } else { "." });
                if *template {
                    self.token("template");
                }
                self.token(&member.text);
            }
            Expr::TypeConstruct { type_id, args } => {
                self.token(&type_id.text);
                self.args(args.as_deref());
            }
            Expr::NamedCast {
                kind,
                type_id,
                operand,
            } => {
                self.token(kind.as_str());
                self.token("<");
                self.token(&type_id.text);
                self.token(">");
                self.token("(");
                self.expr(operand);
                self.token(")");
            }
            Expr::TypeidType(type_id) => {
                self.token("typeid");
                self.token("(");
                self.token(&type_id.text);
                self.token(")");
            }
            Expr::TypeidExpr(operand) => {
                self.token("typeid");
                self.token("(");
                self.expr(operand);
                self.token(")");
            }
        }
    }

    fn new_expr(&mut self, new: &NewExpr) {
        if new.global {
            self.token("::");
        }
        self.token("new");
        if let Some(placement) = &new.placement {
            self.token("(");
            self.expr(placement);
            self.token(")");
        }
        if new.parenthesized_type {
            self.token("(");
            self.token(&new.type_id.text);
            self.token(")");
        } else {
            self.token(&new.type_id.text);
        }
        for size in &new.array_sizes {
            self.token("[");
            self.expr(size);
            self.token("]");
        }
        if let Some(args) = &new.initializer {
            self.args(args.as_ref());
        }
    }

    fn args(&mut self, args: Option<&Spanned<Expr>>) {
        self.token("(");
        if let Some(args) = args {
            self.expr(args);
        }
        self.token(")");
    }

    fn clause(&mut self, clause: &InitializerClause) {
        match clause {
            InitializerClause::Expr(expr) => self.expr(expr),
            InitializerClause::List(items) => {
                self.token("{");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.token(",");
                    }
                    self.clause(item);
                }
                self.token("}");
            }
        }
    }
}

/// Print an expression as space-separated tokens.
pub fn print_expression(expr: &Expr) -> String {
    let mut writer = TokenWriter::default();
    writer.node(expr);
    writer.finish()
}

/// Print an initializer, including its leading `=` or parentheses.
pub fn print_initializer(initializer: &Initializer) -> String {
    let mut writer = TokenWriter::default();
    match initializer {
        Initializer::Assign(clause) => {
            writer.token("=");
            writer.clause(clause);
        }
        Initializer::Constructor(args) => writer.args(Some(args)),
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, LiteralKind, Name, Span};

    fn id(text: &str) -> Spanned<Expr> {
        let name = Name {
            text: text.to_string(),
            span: Span::default(),
            token_count: 1,
        };
        Spanned::new(Expr::Id(name), Span::default())
    }

    #[test]
    fn test_binary_is_space_separated() {
        let expr = Expr::Binary(
            Box::new(id("a")),
            BinaryOp::Shl,
            Box::new(Spanned::new(
                Expr::Literal {
                    kind: LiteralKind::Integer,
                    image: "2".to_string(),
                },
                Span::default(),
            )),
        );
        assert_eq!(print_expression(&expr), "a << 2");
    }

    #[test]
    fn test_empty_call_and_initializer_list() {
        let call = Expr::Call(Box::new(id("f")), None);
        assert_eq!(print_expression(&call), "f ( )");

        let list = Initializer::Assign(InitializerClause::List(vec![
            InitializerClause::Expr(id("x")),
            InitializerClause::List(vec![]),
        ]));
        assert_eq!(print_initializer(&list), "= { x , { } }");
    }
}
