use super::statement::{Function, Statement};
use compact_str::CompactString;
use std::collections::HashMap;

/// A parsed source file: the top-level statements in order plus every function definition.
#[derive(Debug, Default)]
pub struct Program {
    statements: Vec<Statement>,
    functions: HashMap<CompactString, Function>,
}

impl Program {
    pub(super) fn new(statements: Vec<Statement>, functions: HashMap<CompactString, Function>) -> Self {
        Self {
            statements,
            functions,
        }
    }

    pub fn get_statement(&self, index: usize) -> Option<&Statement> {
        self.statements.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
