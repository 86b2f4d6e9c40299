//! Abstract Syntax Tree definitions
//!
//! The tree is built by the parser and handed to the analyzer as-is. The
//! analyzer never changes its shape; it only fills in the `ty` slot of every
//! expression it checks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Checked, Type};
use crate::utils::Span;

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }

    /// Top-level function declarations, in source order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Function(func) => Some(func),
            Decl::Variable(_) => None,
        })
    }

    pub fn functions_mut(&mut self) -> impl Iterator<Item = &mut FunctionDecl> {
        self.decls.iter_mut().filter_map(|decl| match decl {
            Decl::Function(func) => Some(func),
            Decl::Variable(_) => None,
        })
    }

    /// Top-level variable declarations, in source order
    pub fn globals(&self) -> impl Iterator<Item = &VarDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Variable(var) => Some(var),
            Decl::Function(_) => None,
        })
    }
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decl {
    Function(FunctionDecl),
    Variable(VarDecl),
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub ret: Type,
    pub params: Vec<Param>,
    pub body: Block,
    #[serde(default)]
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, ret: Type, params: Vec<Param>, body: Block) -> Self {
        Self {
            name: name.into(),
            ret,
            params,
            body,
            span: Span::dummy(),
        }
    }

    pub fn at(mut self, line: u32) -> Self {
        self.span = Span::new(line);
        self
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Variable declaration, global or block-local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    #[serde(default)]
    pub span: Span,
}

impl VarDecl {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            span: Span::dummy(),
        }
    }

    pub fn at(mut self, line: u32) -> Self {
        self.span = Span::new(line);
        self
    }
}

/// Code block: local declarations first, then statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub vars: Vec<VarDecl>,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl Block {
    pub fn new(vars: Vec<VarDecl>, stmts: Vec<Stmt>) -> Self {
        Self {
            vars,
            stmts,
            span: Span::dummy(),
        }
    }

    /// A block with statements only
    pub fn of(stmts: Vec<Stmt>) -> Self {
        Self::new(Vec::new(), stmts)
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Nested block
    Block(Block),
    /// if (cond) then_branch else else_branch
    If {
        cond: Expr,
        then_branch: Block,
        #[serde(default)]
        else_branch: Block,
        #[serde(default)]
        span: Span,
    },
    /// while (cond) body
    While {
        cond: Expr,
        body: Block,
        #[serde(default)]
        span: Span,
    },
    /// for (init; cond; step) body, any clause may be `Expr::empty()`
    For {
        init: Expr,
        cond: Expr,
        step: Expr,
        body: Block,
        #[serde(default)]
        span: Span,
    },
    /// return [expr]; a bare return carries `Expr::empty()`
    Return {
        value: Expr,
        #[serde(default)]
        span: Span,
    },
    /// break
    Break {
        #[serde(default)]
        span: Span,
    },
    /// continue
    Continue {
        #[serde(default)]
        span: Span,
    },
    /// Expression statement
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(block) => block.span,
            Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Break { span }
            | Stmt::Continue { span } => *span,
            Stmt::Expr(expr) => expr.span,
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Stmt::Return { .. })
    }

    pub fn ret(value: Expr) -> Self {
        let span = value.span;
        Stmt::Return { value, span }
    }

    pub fn if_else(cond: Expr, then_branch: Block, else_branch: Block) -> Self {
        let span = cond.span;
        Stmt::If {
            cond,
            then_branch,
            else_branch,
            span,
        }
    }

    pub fn while_loop(cond: Expr, body: Block) -> Self {
        let span = cond.span;
        Stmt::While { cond, body, span }
    }

    pub fn for_loop(init: Expr, cond: Expr, step: Expr, body: Block) -> Self {
        let span = init.span;
        Stmt::For {
            init,
            cond,
            step,
            body,
            span,
        }
    }
}

/// Expression node.
///
/// `ty` is empty as parsed and set by the analyzer once the node is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<Checked>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// Literal value
    Literal(Literal),
    /// Identifier reference
    Ident(String),
    /// target = value
    Assign { target: String, value: Box<Expr> },
    /// Binary operation
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Function call
    Call { name: String, args: Vec<Expr> },
    /// Omitted expression (for-loop clause, bare return)
    Empty,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
            ty: None,
        }
    }

    pub fn at(mut self, line: u32) -> Self {
        self.span = Span::new(line);
        self
    }

    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ExprKind::Literal(Literal::Float(value)))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(Literal::String(value.into())))
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident(name.into()))
    }

    pub fn assign(target: impl Into<String>, value: Expr) -> Self {
        Self::new(ExprKind::Assign {
            target: target.into(),
            value: Box::new(value),
        })
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            name: name.into(),
            args,
        })
    }

    pub fn empty() -> Self {
        Self::new(ExprKind::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ExprKind::Empty)
    }
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Int(_) => Type::Int,
            Literal::Float(_) => Type::Float,
            Literal::String(_) => Type::String,
            Literal::Bool(_) => Type::Bool,
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    Xor,
    // Bitwise
    BitAnd,
    BitOr,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical not
    Not,
    /// Bitwise not (~)
    BitNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
            UnaryOp::BitNot => "~",
        })
    }
}
