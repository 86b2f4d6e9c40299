//! Error handling for the semantic analyzer

use crate::frontend::ast::{BinOp, UnaryOp};
use crate::types::{Checked, Type};
use crate::utils::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Analyzer error.
///
/// Everything except the internal group is a user-facing diagnostic that is
/// accumulated while checking continues. Internal errors abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ==================== Declaration Errors ====================

    #[error("'{name}' is reserved and cannot name a function")]
    ReservedFunctionName { name: String, span: Span },

    #[error("function '{name}' has already been defined")]
    DuplicateFunction { name: String, span: Span },

    #[error("variable '{name}' has already been defined in this scope")]
    DuplicateVariable { name: String, span: Span },

    #[error("variable '{name}' cannot have type Void")]
    InvalidVariableType { name: String, span: Span },

    #[error("parameter '{name}' of function '{function}' cannot have type Void")]
    InvalidParamType {
        function: String,
        name: String,
        span: Span,
    },

    #[error("function '{name}' has {count} parameters, at most {max} are allowed")]
    TooManyParams {
        name: String,
        count: usize,
        max: usize,
        span: Span,
    },

    #[error("function '{name}' returns {found}, but it was declared to return {declared}")]
    SignatureMismatch {
        name: String,
        declared: Type,
        found: Type,
        span: Span,
    },

    #[error("function '{name}' must contain a return statement")]
    MissingReturn { name: String, span: Span },

    // ==================== Entry Function Errors ====================

    #[error("the entry function '{name}' does not exist")]
    MissingEntry { name: String },

    #[error("entry function '{name}' must return Void, not {found}")]
    EntryReturnType { name: String, found: Type, span: Span },

    #[error("entry function '{name}' must not take parameters, found {count}")]
    EntryHasParams { name: String, count: usize, span: Span },

    // ==================== Expression Errors ====================

    #[error("'{name}' has not been declared")]
    UndefinedVariable { name: String, span: Span },

    #[error("function '{name}' has not been declared")]
    UndefinedFunction { name: String, span: Span },

    #[error("cannot assign {found} to '{name}' of type {expected}")]
    AssignMismatch {
        name: String,
        expected: Type,
        found: Checked,
        span: Span,
    },

    #[error("operator '{op}' cannot be applied to {lhs} and {rhs}")]
    BinaryMismatch {
        op: BinOp,
        lhs: Checked,
        rhs: Checked,
        span: Span,
    },

    #[error("operator '{op}' cannot be applied to {operand}")]
    UnaryMismatch {
        op: UnaryOp,
        operand: Checked,
        span: Span,
    },

    #[error("argument {position} of '{function}' should be {expected}, but a {found} was provided")]
    ArgTypeMismatch {
        function: String,
        position: usize,
        expected: Type,
        found: Checked,
        span: Span,
    },

    #[error("'{function}' expects {expected} arguments, got {got}")]
    ArgCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("'{name}' takes exactly one String argument, got {got} arguments")]
    PrintArity { name: String, got: usize, span: Span },

    #[error("the argument of '{name}' must be String, not {found}")]
    PrintArgType {
        name: String,
        found: Checked,
        span: Span,
    },

    // ==================== Statement Errors ====================

    #[error("the condition of this '{construct}' statement must be Bool, not {found}")]
    ConditionNotBool {
        construct: &'static str,
        found: Checked,
        span: Span,
    },

    #[error("returns {found}, but {expected} is required")]
    ReturnMismatch {
        expected: Type,
        found: Checked,
        span: Span,
    },

    #[error("'break' is not inside a loop")]
    BreakOutsideLoop { span: Span },

    #[error("'continue' is not inside a loop")]
    ContinueOutsideLoop { span: Span },

    // ==================== Internal Errors ====================

    #[error("scope stack underflow")]
    ScopeUnderflow,

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the span associated with this error
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::ReservedFunctionName { span, .. }
            | Self::DuplicateFunction { span, .. }
            | Self::DuplicateVariable { span, .. }
            | Self::InvalidVariableType { span, .. }
            | Self::InvalidParamType { span, .. }
            | Self::TooManyParams { span, .. }
            | Self::SignatureMismatch { span, .. }
            | Self::MissingReturn { span, .. }
            | Self::EntryReturnType { span, .. }
            | Self::EntryHasParams { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::AssignMismatch { span, .. }
            | Self::BinaryMismatch { span, .. }
            | Self::UnaryMismatch { span, .. }
            | Self::ArgTypeMismatch { span, .. }
            | Self::ArgCountMismatch { span, .. }
            | Self::PrintArity { span, .. }
            | Self::PrintArgType { span, .. }
            | Self::ConditionNotBool { span, .. }
            | Self::ReturnMismatch { span, .. }
            | Self::BreakOutsideLoop { span }
            | Self::ContinueOutsideLoop { span } => Some(*span),
            Self::MissingEntry { .. } | Self::ScopeUnderflow | Self::Internal(_) => None,
        }
    }

    /// Internal invariant violations, as opposed to errors in the program
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ScopeUnderflow | Self::Internal(_))
    }

    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ReservedFunctionName { .. } => "E0001",
            Self::DuplicateFunction { .. } => "E0002",
            Self::DuplicateVariable { .. } => "E0003",
            Self::InvalidVariableType { .. } => "E0004",
            Self::InvalidParamType { .. } => "E0005",
            Self::TooManyParams { .. } => "E0006",
            Self::SignatureMismatch { .. } => "E0007",
            Self::MissingReturn { .. } => "E0008",
            Self::MissingEntry { .. } => "E0009",
            Self::EntryReturnType { .. } => "E0010",
            Self::EntryHasParams { .. } => "E0011",
            Self::UndefinedVariable { .. } => "E0012",
            Self::UndefinedFunction { .. } => "E0013",
            Self::AssignMismatch { .. } => "E0014",
            Self::BinaryMismatch { .. } => "E0015",
            Self::UnaryMismatch { .. } => "E0016",
            Self::ArgTypeMismatch { .. } => "E0017",
            Self::ArgCountMismatch { .. } => "E0018",
            Self::PrintArity { .. } => "E0019",
            Self::PrintArgType { .. } => "E0020",
            Self::ConditionNotBool { .. } => "E0021",
            Self::ReturnMismatch { .. } => "E0022",
            Self::BreakOutsideLoop { .. } => "E0023",
            Self::ContinueOutsideLoop { .. } => "E0024",
            Self::ScopeUnderflow => "F0001",
            Self::Internal(_) => "F0002",
        }
    }
}
