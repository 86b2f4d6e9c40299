//! Statement and block checking

use super::SemanticAnalyzer;
use crate::frontend::ast::{Block, Stmt, VarDecl};
use crate::types::Type;
use crate::utils::{Error, Result};

impl SemanticAnalyzer {
    /// Type check a block in its own scope. `expected` is the enclosing
    /// function's return type.
    pub(super) fn check_block(&mut self, block: &mut Block, expected: Type) -> Result<()> {
        self.scopes.enter();
        for var in &block.vars {
            self.declare_local(var)?;
        }
        for stmt in &mut block.stmts {
            self.check_stmt(stmt, expected)?;
        }
        self.scopes.exit()
    }

    /// A broken declaration is reported but not bound, so later uses report
    /// "not declared" rather than a chain of follow-up errors.
    fn declare_local(&mut self, var: &VarDecl) -> Result<()> {
        let fresh = self.scopes.probe_current(&var.name).is_none();
        if !fresh {
            self.report(Error::DuplicateVariable {
                name: var.name.clone(),
                span: var.span,
            });
        }
        let valid = var.ty.is_valid_decl();
        if !valid {
            self.report(Error::InvalidVariableType {
                name: var.name.clone(),
                span: var.span,
            });
        }
        if fresh && valid {
            self.scopes.bind(var.name.clone(), var.ty)?;
        }
        Ok(())
    }

    /// Type check a statement
    fn check_stmt(&mut self, stmt: &mut Stmt, expected: Type) -> Result<()> {
        match stmt {
            Stmt::Block(block) => self.check_block(block, expected)?,

            Stmt::If {
                cond,
                then_branch,
                else_branch,
                span,
            } => {
                let found = self.check_expr(cond)?;
                if !found.is(Type::Bool) {
                    self.report(Error::ConditionNotBool {
                        construct: "if",
                        found,
                        span: *span,
                    });
                }
                self.check_block(then_branch, expected)?;
                self.check_block(else_branch, expected)?;
            }

            Stmt::While { cond, body, span } => {
                let found = self.check_expr(cond)?;
                if !found.is(Type::Bool) {
                    self.report(Error::ConditionNotBool {
                        construct: "while",
                        found,
                        span: *span,
                    });
                }
                self.check_loop_body(body, expected)?;
            }

            Stmt::For {
                init,
                cond,
                step,
                body,
                ..
            } => {
                for clause in [init, cond, step] {
                    if !clause.is_empty() {
                        self.check_expr(clause)?;
                    }
                }
                self.check_loop_body(body, expected)?;
            }

            Stmt::Return { value, span } => {
                let found = self.check_expr(value)?;
                if !expected.accepts_exact(found) {
                    self.report(Error::ReturnMismatch {
                        expected,
                        found,
                        span: *span,
                    });
                }
            }

            Stmt::Break { span } => {
                if self.loop_depth == 0 {
                    self.report(Error::BreakOutsideLoop { span: *span });
                }
            }

            Stmt::Continue { span } => {
                if self.loop_depth == 0 {
                    self.report(Error::ContinueOutsideLoop { span: *span });
                }
            }

            Stmt::Expr(expr) => {
                self.check_expr(expr)?;
            }
        }
        Ok(())
    }

    fn check_loop_body(&mut self, body: &mut Block, expected: Type) -> Result<()> {
        self.loop_depth += 1;
        let result = self.check_block(body, expected);
        self.loop_depth -= 1;
        result
    }
}
