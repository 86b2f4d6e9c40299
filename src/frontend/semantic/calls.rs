//! Call-site signature checks and function body validation

use log::debug;

use super::SemanticAnalyzer;
use crate::frontend::ast::{Expr, FunctionDecl};
use crate::types::{Checked, Type};
use crate::utils::{Error, Result, Span};

impl SemanticAnalyzer {
    /// Check a call against the registered signature of `name`
    pub(super) fn check_call(&mut self, name: &str, args: &mut [Expr], span: Span) -> Result<Checked> {
        if name == self.options.print_name {
            return self.check_print_call(name, args, span);
        }

        let Some(sig) = self.calls.get(name).cloned() else {
            self.report(Error::UndefinedFunction {
                name: name.to_string(),
                span,
            });
            return Ok(Checked::Failed);
        };

        // Only the first mismatching argument is reported.
        for (index, (param, arg)) in sig.params.iter().zip(args.iter_mut()).enumerate() {
            let found = self.check_expr(arg)?;
            if !param.ty.accepts(found) {
                self.report(Error::ArgTypeMismatch {
                    function: sig.name.clone(),
                    position: index + 1,
                    expected: param.ty,
                    found,
                    span,
                });
                return Ok(Checked::Resolved(sig.ret));
            }
        }

        if args.len() != sig.params.len() {
            for extra in args.iter_mut().skip(sig.params.len()) {
                self.check_expr(extra)?;
            }
            self.report(Error::ArgCountMismatch {
                function: sig.name.clone(),
                expected: sig.params.len(),
                got: args.len(),
                span,
            });
        }
        Ok(Checked::Resolved(sig.ret))
    }

    /// The print call takes exactly one String. Every argument is checked
    /// regardless, so mistakes inside them still surface.
    fn check_print_call(&mut self, name: &str, args: &mut [Expr], span: Span) -> Result<Checked> {
        let mut found = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            found.push(self.check_expr(arg)?);
        }

        if found.len() != 1 {
            self.report(Error::PrintArity {
                name: name.to_string(),
                got: found.len(),
                span,
            });
        }
        if let Some(&first) = found.first() {
            if !first.is(Type::String) {
                self.report(Error::PrintArgType {
                    name: name.to_string(),
                    found: first,
                    span,
                });
            }
        }
        Ok(Checked::Resolved(Type::Void))
    }

    /// Type check a function body against its registered signature
    pub(super) fn check_function(&mut self, func: &mut FunctionDecl) -> Result<()> {
        debug!("checking function '{}'", func.name);
        self.scopes.enter();

        if let Some(sig) = self.calls.get(&func.name) {
            if sig.ret != func.ret {
                let error = Error::SignatureMismatch {
                    name: func.name.clone(),
                    declared: sig.ret,
                    found: func.ret,
                    span: func.span,
                };
                self.report(error);
            }
        }

        if func.params.len() > self.options.max_params {
            self.report(Error::TooManyParams {
                name: func.name.clone(),
                count: func.params.len(),
                max: self.options.max_params,
                span: func.span,
            });
        }

        for param in &func.params {
            if param.ty.is_valid_decl() {
                self.scopes.bind(param.name.clone(), param.ty)?;
            } else {
                self.report(Error::InvalidParamType {
                    function: func.name.clone(),
                    name: param.name.clone(),
                    span: func.span,
                });
            }
        }

        self.check_block(&mut func.body, func.ret)?;

        // Only the top level of the body counts.
        if !func.body.stmts.iter().any(|stmt| stmt.is_return()) {
            self.report(Error::MissingReturn {
                name: func.name.clone(),
                span: func.span,
            });
        }

        self.scopes.exit()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::frontend::ast::{Block, Decl, Expr, FunctionDecl, Param, Program, Stmt, VarDecl};
    use crate::types::{Checked, Type};
    use crate::utils::Error;
    use pretty_assertions::assert_eq;

    /// f(Int, Float) -> Int
    fn f_decl() -> Decl {
        Decl::Function(FunctionDecl::new(
            "f",
            Type::Int,
            vec![Param::new("a", Type::Int), Param::new("b", Type::Float)],
            Block::of(vec![Stmt::ret(Expr::ident("a"))]),
        ))
    }

    fn call_in_main(call: Expr) -> (Vec<Error>, Option<Checked>) {
        let (_, errors, program) = check(Program::new(vec![
            main_with(vec![], vec![Stmt::Expr(call)]),
            f_decl(),
        ]));
        let Decl::Function(main) = &program.decls[0] else {
            panic!("expected main");
        };
        let Stmt::Expr(call) = &main.body.stmts[0] else {
            panic!("expected call");
        };
        (errors, call.ty)
    }

    #[test]
    fn test_valid_call_with_promotion() {
        let (errors, ty) = call_in_main(Expr::call("f", vec![Expr::float(1.0), Expr::int(2)]));
        assert_eq!(errors, Vec::<Error>::new());
        assert_eq!(ty, Some(Checked::Resolved(Type::Int)));
    }

    #[test]
    fn test_argument_mismatch_without_arity_error() {
        let (errors, ty) = call_in_main(Expr::call("f", vec![Expr::int(3), Expr::string("x")]));
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            Error::ArgTypeMismatch { position: 2, expected: Type::Float, found: Checked::Resolved(Type::String), .. }
        ));
        assert_eq!(ty, Some(Checked::Resolved(Type::Int)));
    }

    #[test]
    fn test_only_first_mismatch_reported() {
        let call = Expr::call("f", vec![Expr::bool(true), Expr::string("x"), Expr::int(1)]);
        let (errors, _) = call_in_main(call);
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], Error::ArgTypeMismatch { position: 1, .. }));
    }

    #[test]
    fn test_arity_mismatch() {
        let (errors, _) = call_in_main(Expr::call("f", vec![Expr::int(1)]));
        assert!(matches!(
            &errors[..],
            [Error::ArgCountMismatch { expected: 2, got: 1, .. }]
        ));

        let extra = Expr::call("f", vec![Expr::int(1), Expr::int(2), Expr::ident("ghost")]);
        let (errors, _) = call_in_main(extra);
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], Error::UndefinedVariable { name, .. } if name == "ghost"));
        assert!(matches!(&errors[1], Error::ArgCountMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn test_undeclared_function_does_not_stop_checking() {
        let errors = check_main(
            vec![],
            vec![
                Stmt::Expr(Expr::call("nowhere", vec![])),
                Stmt::Expr(Expr::ident("ghost")),
            ],
        );
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], Error::UndefinedFunction { name, .. } if name == "nowhere"));
        assert!(matches!(&errors[1], Error::UndefinedVariable { .. }));
    }

    #[test]
    fn test_undeclared_call_fails_node() {
        let (_, ty) = call_in_main(Expr::call("g", vec![]));
        assert_eq!(ty, Some(Checked::Failed));
    }

    #[test]
    fn test_print_arity_and_type_reported_independently() {
        let errors = check_main(vec![], vec![Stmt::Expr(Expr::call("printf", vec![]))]);
        assert!(matches!(&errors[..], [Error::PrintArity { got: 0, .. }]));

        let errors = check_main(
            vec![],
            vec![Stmt::Expr(Expr::call("printf", vec![Expr::int(1), Expr::string("x")]))],
        );
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], Error::PrintArity { got: 2, .. }));
        assert!(matches!(errors[1], Error::PrintArgType { found: Checked::Resolved(Type::Int), .. }));
    }

    #[test]
    fn test_print_checks_every_argument() {
        let errors = check_main(
            vec![VarDecl::new("s", Type::String)],
            vec![Stmt::Expr(Expr::call("printf", vec![Expr::ident("s"), Expr::ident("ghost")]))],
        );
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], Error::UndefinedVariable { name, .. } if name == "ghost"));
        assert!(matches!(errors[1], Error::PrintArity { got: 2, .. }));
    }

    #[test]
    fn test_too_many_params_reported_once() {
        let params = (0..8).map(|i| Param::new(format!("p{i}"), Type::Int)).collect();
        let wide = FunctionDecl::new(
            "wide",
            Type::Int,
            params,
            Block::of(vec![
                Stmt::Expr(Expr::ident("ghost")),
                Stmt::ret(Expr::ident("p7")),
            ]),
        );
        let (_, errors, _) = check(Program::new(vec![main_with(vec![], vec![]), Decl::Function(wide)]));
        let arity = errors
            .iter()
            .filter(|e| matches!(e, Error::TooManyParams { count: 8, max: 6, .. }))
            .count();
        assert_eq!(arity, 1);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_void_parameter() {
        let func = FunctionDecl::new(
            "f",
            Type::Void,
            vec![Param::new("v", Type::Void)],
            Block::of(vec![Stmt::Expr(Expr::ident("v")), Stmt::ret(Expr::empty())]),
        );
        let (_, errors, _) = check(Program::new(vec![main_with(vec![], vec![]), Decl::Function(func)]));
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], Error::InvalidParamType { name, .. } if name == "v"));
        assert!(matches!(&errors[1], Error::UndefinedVariable { name, .. } if name == "v"));
    }

    #[test]
    fn test_failed_argument_to_void_parameter() {
        let sink = FunctionDecl::new(
            "sink",
            Type::Void,
            vec![Param::new("v", Type::Void)],
            Block::of(vec![Stmt::ret(Expr::empty())]),
        );
        let program = Program::new(vec![
            main_with(vec![], vec![Stmt::Expr(Expr::call("sink", vec![Expr::ident("ghost")]))]),
            Decl::Function(sink),
        ]);
        let (_, errors, _) = check(program);
        // no argument mismatch on top of the undeclared name
        assert_eq!(errors.len(), 2);
        assert!(matches!(&errors[0], Error::UndefinedVariable { name, .. } if name == "ghost"));
        assert!(matches!(&errors[1], Error::InvalidParamType { name, .. } if name == "v"));
    }

    #[test]
    fn test_return_only_counted_at_top_level() {
        let func = FunctionDecl::new(
            "f",
            Type::Int,
            vec![],
            Block::of(vec![Stmt::Block(Block::of(vec![Stmt::ret(Expr::int(1))]))]),
        );
        let (_, errors, _) = check(Program::new(vec![main_with(vec![], vec![]), Decl::Function(func)]));
        assert!(matches!(&errors[..], [Error::MissingReturn { name, .. }] if name == "f"));
    }

    #[test]
    fn test_parameters_can_be_shadowed_by_locals() {
        let func = FunctionDecl::new(
            "f",
            Type::String,
            vec![Param::new("x", Type::Int)],
            Block::new(vec![VarDecl::new("x", Type::String)], vec![Stmt::ret(Expr::ident("x"))]),
        );
        let (_, errors, _) = check(Program::new(vec![main_with(vec![], vec![]), Decl::Function(func)]));
        assert_eq!(errors, Vec::<Error>::new());
    }
}
