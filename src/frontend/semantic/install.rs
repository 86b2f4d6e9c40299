//! Two-pass installation of top-level declarations

use log::debug;

use super::registry::Signature;
use super::SemanticAnalyzer;
use crate::frontend::ast::Program;
use crate::types::Type;
use crate::utils::{Error, Result};

impl SemanticAnalyzer {
    /// Pass 1: register every function signature so bodies may call
    /// functions declared after them.
    pub(super) fn install_functions(&mut self, program: &Program) {
        for func in program.functions() {
            if func.name == self.options.print_name {
                self.report(Error::ReservedFunctionName {
                    name: func.name.clone(),
                    span: func.span,
                });
            } else if func.name == self.options.entry_name {
                // Repeated entry definitions are not reported here; the first
                // one stays registered and later bodies are checked against it.
                self.calls.register(Signature::from(func));
            } else if !self.calls.register(Signature::from(func)) {
                self.report(Error::DuplicateFunction {
                    name: func.name.clone(),
                    span: func.span,
                });
            }
        }
        debug!("{} functions registered", self.calls.len());
    }

    /// The entry function must exist, return Void and take no parameters
    pub(super) fn check_entry(&mut self) {
        let entry = self.options.entry_name.clone();
        let Some(sig) = self.calls.get(&entry) else {
            self.report(Error::MissingEntry { name: entry });
            return;
        };

        let mut errors = Vec::new();
        if sig.ret != Type::Void {
            errors.push(Error::EntryReturnType {
                name: sig.name.clone(),
                found: sig.ret,
                span: sig.span,
            });
        }
        if !sig.params.is_empty() {
            errors.push(Error::EntryHasParams {
                name: sig.name.clone(),
                count: sig.params.len(),
                span: sig.span,
            });
        }
        for error in errors {
            self.report(error);
        }
    }

    /// Pass 2: bind global variables into the base scope
    pub(super) fn install_globals(&mut self, program: &Program) -> Result<()> {
        for var in program.globals() {
            if !var.ty.is_valid_decl() {
                self.report(Error::InvalidVariableType {
                    name: var.name.clone(),
                    span: var.span,
                });
            } else if self.scopes.probe_current(&var.name).is_some() {
                self.report(Error::DuplicateVariable {
                    name: var.name.clone(),
                    span: var.span,
                });
            } else {
                self.scopes.bind(var.name.clone(), var.ty)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::frontend::ast::{Block, Decl, Expr, FunctionDecl, Param, Program, Stmt, VarDecl};
    use crate::types::Type;
    use crate::utils::{Error, Span};
    use pretty_assertions::assert_eq;

    fn function(name: &str, ret: Type, params: Vec<Param>) -> Decl {
        let value = match ret {
            Type::Void => Expr::empty(),
            Type::Int => Expr::int(0),
            Type::Float => Expr::float(0.0),
            Type::String => Expr::string(""),
            Type::Bool => Expr::bool(false),
        };
        Decl::Function(FunctionDecl::new(name, ret, params, Block::of(vec![Stmt::ret(value)])))
    }

    #[test]
    fn test_entry_return_type_and_params_both_reported() {
        let program = Program::new(vec![function(
            "main",
            Type::Int,
            vec![Param::new("argc", Type::Int)],
        )]);
        let (_, errors, _) = check(program);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], Error::EntryReturnType { found: Type::Int, .. }));
        assert!(matches!(errors[1], Error::EntryHasParams { count: 1, .. }));
    }

    #[test]
    fn test_duplicate_function() {
        let program = Program::new(vec![
            main_with(vec![], vec![]),
            function("f", Type::Int, vec![]),
            function("f", Type::Int, vec![]),
        ]);
        let (_, errors, _) = check(program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], Error::DuplicateFunction { name, .. } if name == "f"));
    }

    #[test]
    fn test_print_name_is_reserved() {
        let program = Program::new(vec![
            main_with(vec![], vec![]),
            function("printf", Type::Void, vec![Param::new("s", Type::String)]),
        ]);
        let (_, errors, _) = check(program);
        assert!(matches!(&errors[0], Error::ReservedFunctionName { name, .. } if name == "printf"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_repeated_entry_is_not_a_duplicate() {
        let program = Program::new(vec![main_with(vec![], vec![]), main_with(vec![], vec![])]);
        let (analysis, errors, _) = check(program);
        assert_eq!(errors, Vec::<Error>::new());
        assert_eq!(analysis.functions, 1);
    }

    #[test]
    fn test_repeated_entry_checked_against_first_signature() {
        let program = Program::new(vec![main_with(vec![], vec![]), function("main", Type::Int, vec![])]);
        let (_, errors, _) = check(program);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            Error::SignatureMismatch { declared: Type::Void, found: Type::Int, .. }
        ));
    }

    #[test]
    fn test_globals() {
        let program = Program::new(vec![
            Decl::Variable(VarDecl::new("count", Type::Int).at(1)),
            Decl::Variable(VarDecl::new("count", Type::Float).at(2)),
            Decl::Variable(VarDecl::new("nothing", Type::Void).at(3)),
            main_with(
                vec![],
                vec![Stmt::Expr(Expr::assign("count", Expr::int(1)))],
            ),
        ]);
        let (analysis, errors, _) = check(program);
        assert_eq!(
            errors,
            vec![
                Error::DuplicateVariable { name: "count".into(), span: Span::new(2) },
                Error::InvalidVariableType { name: "nothing".into(), span: Span::new(3) },
            ]
        );
        assert_eq!(analysis.globals, 3);
    }

    #[test]
    fn test_global_visible_in_function_body() {
        let program = Program::new(vec![
            Decl::Variable(VarDecl::new("greeting", Type::String)),
            main_with(
                vec![],
                vec![Stmt::Expr(Expr::call("printf", vec![Expr::ident("greeting")]))],
            ),
        ]);
        let (_, errors, _) = check(program);
        assert_eq!(errors, Vec::<Error>::new());
    }
}
