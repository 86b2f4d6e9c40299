//! Expression type checking

use super::SemanticAnalyzer;
use crate::frontend::ast::{Expr, ExprKind};
use crate::types::{binary_result, unary_result, Checked, Type};
use crate::utils::{Error, Result, Span};

impl SemanticAnalyzer {
    /// Type check an expression and annotate it.
    ///
    /// Subexpressions are checked left to right before the node's own rule.
    pub(super) fn check_expr(&mut self, expr: &mut Expr) -> Result<Checked> {
        let span = expr.span;
        let checked = match &mut expr.kind {
            ExprKind::Literal(lit) => Checked::Resolved(lit.ty()),

            ExprKind::Empty => Checked::Resolved(Type::Void),

            ExprKind::Ident(name) => match self.scopes.resolve(name) {
                Some(ty) => Checked::Resolved(ty),
                None => {
                    self.report(Error::UndefinedVariable {
                        name: name.clone(),
                        span,
                    });
                    Checked::Failed
                }
            },

            ExprKind::Assign { target, value } => {
                let found = self.check_expr(value)?;
                self.check_assign(target, found, span)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.check_expr(lhs)?;
                let rhs = self.check_expr(rhs)?;
                match binary_result(*op, lhs, rhs) {
                    Some(ty) => Checked::Resolved(ty),
                    None => {
                        self.report(Error::BinaryMismatch {
                            op: *op,
                            lhs,
                            rhs,
                            span,
                        });
                        Checked::Failed
                    }
                }
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.check_expr(operand)?;
                match unary_result(*op, operand) {
                    Some(ty) => Checked::Resolved(ty),
                    None => {
                        self.report(Error::UnaryMismatch {
                            op: *op,
                            operand,
                            span,
                        });
                        Checked::Failed
                    }
                }
            }

            ExprKind::Call { name, args } => self.check_call(name, args, span)?,
        };
        Ok(self.annotate(expr, checked))
    }

    /// An assignment takes the target's declared type even when the value
    /// does not fit; only an undeclared target fails the node.
    fn check_assign(&mut self, target: &str, found: Checked, span: Span) -> Checked {
        let Some(expected) = self.scopes.resolve(target) else {
            self.report(Error::UndefinedVariable {
                name: target.to_string(),
                span,
            });
            return Checked::Failed;
        };
        if !expected.accepts(found) {
            self.report(Error::AssignMismatch {
                name: target.to_string(),
                expected,
                found,
                span,
            });
        }
        Checked::Resolved(expected)
    }
}
