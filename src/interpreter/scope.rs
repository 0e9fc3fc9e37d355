use crate::value::Value;
use compact_str::CompactString;
use std::collections::HashMap;
use tracing::trace;

/// A single level of variable bindings.
#[derive(Debug, Default)]
pub struct Scope {
    variables: HashMap<CompactString, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, value: Value) {
        self.variables.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.variables.get_mut(name)
    }
}

/// The scopes visible at a point in execution, outermost first.
///
/// Never empty: the base scope lives as long as the chain.
#[derive(Debug)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::from_scope(Scope::new())
    }

    pub fn from_scope(scope: Scope) -> Self {
        Self {
            scopes: vec![scope],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push(&mut self) {
        self.scopes.push(Scope::new());
        trace!(depth = self.depth(), "entered scope");
    }

    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!(depth = self.depth(), "left scope");
    }

    /// Finds the innermost binding of `name`.
    pub fn resolve_read(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn resolve_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
    }

    /// Overwrites the innermost binding of `name`, declaring it in the current scope if there is none.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.resolve_mut(name) {
            *slot = value;
            return;
        }
        self.scopes
            .last_mut()
            .expect("A scope chain always holds its base scope.")
            .declare(name, value);
    }
}
