//! Frontend module - AST and Semantic Analysis

pub mod ast;
pub mod semantic;
