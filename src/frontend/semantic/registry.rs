//! Function signatures known to call sites

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::frontend::ast::{FunctionDecl, Param};
use crate::types::Type;
use crate::utils::Span;

/// The callable part of a function declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub ret: Type,
    pub params: Vec<Param>,
    pub span: Span,
}

impl From<&FunctionDecl> for Signature {
    fn from(func: &FunctionDecl) -> Self {
        Self {
            name: func.name.clone(),
            ret: func.ret,
            params: func.params.clone(),
            span: func.span,
        }
    }
}

/// Flat name → signature map, filled before any body is checked
#[derive(Debug, Default)]
pub struct CallRegistry {
    functions: HashMap<String, Signature>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signature. The first registration of a name wins; returns
    /// `false` if the name was already taken.
    pub fn register(&mut self, signature: Signature) -> bool {
        match self.functions.entry(signature.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(signature);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
