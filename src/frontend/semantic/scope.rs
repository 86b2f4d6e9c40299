//! Nested name → type scopes

use std::collections::HashMap;

use log::trace;

use crate::types::Type;
use crate::utils::{Error, Result};

/// Stack of scope frames, innermost last.
///
/// Frames are pushed on entering a function body or a block and popped on
/// leaving it, so the depth always equals the current lexical nesting.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, Type>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
        trace!("enter scope (depth {})", self.frames.len());
    }

    /// Exit the current scope
    pub fn exit(&mut self) -> Result<()> {
        trace!("exit scope (depth {})", self.frames.len());
        self.frames.pop().map(|_| ()).ok_or(Error::ScopeUnderflow)
    }

    /// Bind a name in the innermost scope, shadowing outer bindings
    pub fn bind(&mut self, name: impl Into<String>, ty: Type) -> Result<()> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| Error::Internal("binding a name outside of any scope".into()))?;
        frame.insert(name.into(), ty);
        Ok(())
    }

    /// Look up a name only in the innermost scope
    pub fn probe_current(&self, name: &str) -> Option<Type> {
        self.frames.last().and_then(|frame| frame.get(name)).copied()
    }

    /// Look up a name, searching from the innermost scope outward
    pub fn resolve(&self, name: &str) -> Option<Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .copied()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outer_binding_visible_from_inner_scope() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.bind("x", Type::Int).unwrap();
        scopes.enter();
        assert_eq!(scopes.resolve("x"), Some(Type::Int));
        assert_eq!(scopes.probe_current("x"), None);
    }

    #[test]
    fn test_shadowing_and_restore() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        scopes.bind("x", Type::Int).unwrap();
        scopes.enter();
        scopes.bind("x", Type::String).unwrap();
        assert_eq!(scopes.resolve("x"), Some(Type::String));
        assert_eq!(scopes.probe_current("x"), Some(Type::String));
        scopes.exit().unwrap();
        assert_eq!(scopes.resolve("x"), Some(Type::Int));
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_unknown_name() {
        let mut scopes = ScopeStack::new();
        scopes.enter();
        assert_eq!(scopes.resolve("missing"), None);
    }

    #[test]
    fn test_underflow_is_fatal() {
        let mut scopes = ScopeStack::new();
        let err = scopes.exit().unwrap_err();
        assert_eq!(err, Error::ScopeUnderflow);
        assert!(err.is_fatal());
        assert!(scopes.bind("x", Type::Int).unwrap_err().is_fatal());
    }
}
