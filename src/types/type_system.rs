//! Type System for the checked language

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::frontend::ast::{BinOp, UnaryOp};

/// Primitive types. The set is closed: there are no user-defined types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Void,
}

impl Type {
    /// Check if this is Int or Float
    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Variables and parameters may have any type except Void
    pub fn is_valid_decl(self) -> bool {
        self != Type::Void
    }

    /// Whether a value of type `found` may flow into a slot of this type.
    ///
    /// Exact match, or the Int/Float promotion pair in either direction.
    pub fn accepts(self, found: Checked) -> bool {
        match found {
            Checked::Resolved(found) => {
                self == found || (self.is_numeric() && found.is_numeric())
            }
            Checked::Failed => self.admits_failed(),
        }
    }

    /// Like [`Type::accepts`], without the Int/Float promotion
    pub fn accepts_exact(self, found: Checked) -> bool {
        found.is(self) || (found.is_failed() && self.admits_failed())
    }

    /// A failed expression already has its error. Only a Void slot takes it
    /// without a second one.
    fn admits_failed(self) -> bool {
        self == Type::Void
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "Int",
            Type::Float => "Float",
            Type::String => "String",
            Type::Bool => "Bool",
            Type::Void => "Void",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of checking one expression.
///
/// `Failed` marks an expression whose own rule was violated (or which
/// referenced something undeclared). It matches no operand rule, so the
/// enclosing node reports its own single error instead of inheriting a
/// misleading type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Checked {
    Resolved(Type),
    Failed,
}

impl Checked {
    /// The resolved type, if checking succeeded
    pub fn ty(self) -> Option<Type> {
        match self {
            Checked::Resolved(ty) => Some(ty),
            Checked::Failed => None,
        }
    }

    /// Check for an exact resolved type
    pub fn is(self, ty: Type) -> bool {
        self == Checked::Resolved(ty)
    }

    pub fn is_failed(self) -> bool {
        self == Checked::Failed
    }
}

impl From<Type> for Checked {
    fn from(ty: Type) -> Self {
        Checked::Resolved(ty)
    }
}

impl fmt::Display for Checked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checked::Resolved(ty) => ty.fmt(f),
            Checked::Failed => f.write_str("<error>"),
        }
    }
}

// ==================== Operator Rules ====================

/// Result type of a binary operator, or `None` when the operands fall
/// outside every rule for that operator.
pub fn binary_result(op: BinOp, lhs: Checked, rhs: Checked) -> Option<Type> {
    use Type::*;

    let (lhs, rhs) = (lhs.ty()?, rhs.ty()?);
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div => match (lhs, rhs) {
            (Int, Int) => Some(Int),
            (Int, Float) | (Float, Int) | (Float, Float) => Some(Float),
            _ => None,
        },
        BinOp::Mod | BinOp::BitAnd | BinOp::BitOr => match (lhs, rhs) {
            (Int, Int) => Some(Int),
            _ => None,
        },
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            (lhs.is_numeric() && rhs.is_numeric()).then_some(Bool)
        }
        BinOp::Eq | BinOp::Ne => {
            let numeric = lhs.is_numeric() && rhs.is_numeric();
            (numeric || (lhs, rhs) == (Bool, Bool)).then_some(Bool)
        }
        BinOp::And | BinOp::Or | BinOp::Xor => ((lhs, rhs) == (Bool, Bool)).then_some(Bool),
    }
}

/// Result type of a unary operator, or `None` for an invalid operand
pub fn unary_result(op: UnaryOp, operand: Checked) -> Option<Type> {
    let operand = operand.ty()?;
    match op {
        UnaryOp::Neg => operand.is_numeric().then_some(operand),
        UnaryOp::Not => (operand == Type::Bool).then_some(Type::Bool),
        UnaryOp::BitNot => (operand == Type::Int).then_some(Type::Int),
    }
}
