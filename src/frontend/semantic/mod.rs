//! Semantic Analysis
//!
//! Performs:
//! - Two-pass installation of function signatures and globals
//! - Entry function validation
//! - Scope management (nested blocks, shadowing)
//! - Type checking of every function body, annotating each expression
//!
//! User-facing errors are accumulated in [`Diagnostics`] and never stop the
//! run. Internal errors are returned as `Err` and abort it.

mod calls;
mod expr;
mod install;
pub mod registry;
pub mod scope;
mod stmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::frontend::ast::{Expr, Program};
use crate::types::Checked;
use crate::utils::{Error, Result};

use registry::CallRegistry;
use scope::ScopeStack;

/// Reserved names and limits of the checked language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    /// Function every program must define
    pub entry_name: String,
    /// Built-in output call, not definable by user code
    pub print_name: String,
    /// Maximum parameter count of a function
    pub max_params: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            entry_name: "main".to_string(),
            print_name: "printf".to_string(),
            max_params: 6,
        }
    }
}

/// Summary of one completed analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub error_count: usize,
    pub functions: usize,
    pub globals: usize,
    pub annotated_exprs: usize,
}

impl Analysis {
    /// Whether later stages may assume the program is well-formed
    pub fn is_success(&self) -> bool {
        self.error_count == 0
    }
}

/// Semantic analyzer.
///
/// Holds all state of one run; a fresh analyzer (or a new call to
/// [`SemanticAnalyzer::analyze`]) starts from scratch.
pub struct SemanticAnalyzer {
    options: AnalyzerOptions,
    scopes: ScopeStack,
    calls: CallRegistry,
    loop_depth: u32,
    diagnostics: Diagnostics,
    annotated: usize,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            options,
            scopes: ScopeStack::new(),
            calls: CallRegistry::new(),
            loop_depth: 0,
            diagnostics: Diagnostics::new(),
            annotated: 0,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Analyze a program, annotating its expressions in place.
    ///
    /// Returns `Err` only for internal errors; program errors are counted in
    /// the returned [`Analysis`] and listed in [`Self::diagnostics`].
    pub fn analyze(&mut self, program: &mut Program) -> Result<Analysis> {
        *self = Self::with_options(self.options.clone());
        let outcome = self.run(program);
        self.finish(outcome, program)
    }

    /// Close a run: an internal error goes to the fatal channel and is
    /// passed on, anything else is summarized.
    fn finish(&mut self, outcome: Result<()>, program: &Program) -> Result<Analysis> {
        if let Err(err) = outcome {
            self.diagnostics.report(err.clone());
            return Err(err);
        }

        let analysis = Analysis {
            error_count: self.diagnostics.error_count(),
            functions: self.calls.len(),
            globals: program.globals().count(),
            annotated_exprs: self.annotated,
        };
        debug!(
            "analysis finished: {} errors, {} expressions annotated",
            analysis.error_count, analysis.annotated_exprs
        );
        Ok(analysis)
    }

    fn run(&mut self, program: &mut Program) -> Result<()> {
        self.scopes.enter();

        debug!("pass 1: installing function signatures");
        self.install_functions(program);
        self.check_entry();

        debug!("pass 2: installing globals");
        self.install_globals(program)?;

        debug!("checking function bodies");
        for func in program.functions_mut() {
            self.check_function(func)?;
        }

        self.scopes.exit()?;
        if self.scopes.depth() != 0 || self.loop_depth != 0 {
            return Err(Error::Internal(format!(
                "unbalanced analyzer state: scope depth {}, loop depth {}",
                self.scopes.depth(),
                self.loop_depth
            )));
        }
        Ok(())
    }

    /// Record a user-facing error and keep going
    fn report(&mut self, error: Error) {
        self.diagnostics.report(error);
    }

    /// Store the checked type on a node
    fn annotate(&mut self, expr: &mut Expr, checked: Checked) -> Checked {
        expr.ty = Some(checked);
        self.annotated += 1;
        checked
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze a program with the default options
pub fn analyze(program: &mut Program) -> Result<(Analysis, Diagnostics)> {
    let mut analyzer = SemanticAnalyzer::new();
    let analysis = analyzer.analyze(program)?;
    Ok((analysis, analyzer.diagnostics))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::frontend::ast::{Block, Decl, FunctionDecl, Stmt, VarDecl};
    use crate::types::Type;

    /// `main` with the given locals and statements, ending in a bare return
    pub fn main_with(vars: Vec<VarDecl>, mut stmts: Vec<Stmt>) -> Decl {
        stmts.push(Stmt::ret(Expr::empty()));
        Decl::Function(FunctionDecl::new("main", Type::Void, vec![], Block::new(vars, stmts)))
    }

    /// Run the analyzer and collect the user-facing errors
    pub fn check(mut program: Program) -> (Analysis, Vec<Error>, Program) {
        let mut analyzer = SemanticAnalyzer::new();
        let analysis = analyzer.analyze(&mut program).expect("no internal error");
        let errors = analyzer.diagnostics().errors().cloned().collect();
        (analysis, errors, program)
    }

    /// Errors of a program that is only `main` with the given body
    pub fn check_main(vars: Vec<VarDecl>, stmts: Vec<Stmt>) -> Vec<Error> {
        check(Program::new(vec![main_with(vars, stmts)])).1
    }
}
