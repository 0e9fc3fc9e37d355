pub mod context;
pub mod native;
pub mod scope;
mod tree;

use crate::value::Value;
pub use tree::TreeWalkInterpreter;

/// How a statement finished, consumed by whatever contains it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramState {
    Normal,
    Return(Value),
    Break,
    Continue,
}

pub trait SystemContext {
    /// Emits text exactly as given.
    fn write(&mut self, text: &str) -> std::io::Result<()>;
    /// Reads the next whitespace delimited token, `None` once input is exhausted.
    fn read_token(&mut self) -> Option<String>;
}
