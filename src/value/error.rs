use super::ValueKind;
use crate::lexer::Span;
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("unexpected arguments of operator {operator}: {lhs} and {rhs}")]
    InvalidOperands {
        operator: &'static str,
        lhs: ValueKind,
        rhs: ValueKind,
    },
    #[error("unexpected argument of unary operator {operator}: {operand}")]
    InvalidOperand {
        operator: &'static str,
        operand: ValueKind,
    },
    #[error("character code {0} is not a valid character")]
    InvalidCharacter(i64),
    #[error("condition must be bool but got {0}")]
    NonBoolCondition(ValueKind),
    #[error("array index must be int but got {0}")]
    NonIntegerIndex(ValueKind),
    #[error("{name} is {kind}, not an array")]
    NonArray { name: CompactString, kind: ValueKind },
    #[error("unexpected argument of {function}: {kind}")]
    InvalidArgument {
        function: CompactString,
        kind: ValueKind,
    },
    #[error("undefined variable {0}")]
    UndefinedVariable(CompactString),
    #[error("undefined function {0}")]
    UndefinedFunction(CompactString),
    #[error("division by zero")]
    DivisionByZero,
    #[error("index {index} out of range for array of length {length}")]
    IndexOutOfRange { index: i64, length: usize },
    #[error("{function} expects {expected} arguments but got {actual}")]
    InvalidArgumentCount {
        function: CompactString,
        actual: usize,
        expected: usize,
    },
    #[error("repeating a value of length {length} {count} times exceeds the maximum length")]
    RepeatTooLarge { length: usize, count: i64 },
    #[error("failed to write output: {0}")]
    OutputFailed(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::InvalidOperands { .. } => "RT001",
            RuntimeErrorKind::InvalidOperand { .. } => "RT002",
            RuntimeErrorKind::InvalidCharacter(_) => "RT003",
            RuntimeErrorKind::NonBoolCondition(_) => "RT004",
            RuntimeErrorKind::NonIntegerIndex(_) => "RT005",
            RuntimeErrorKind::NonArray { .. } => "RT006",
            RuntimeErrorKind::InvalidArgument { .. } => "RT007",
            RuntimeErrorKind::UndefinedVariable(_) => "RT008",
            RuntimeErrorKind::UndefinedFunction(_) => "RT009",
            RuntimeErrorKind::DivisionByZero => "RT010",
            RuntimeErrorKind::IndexOutOfRange { .. } => "RT011",
            RuntimeErrorKind::InvalidArgumentCount { .. } => "RT012",
            RuntimeErrorKind::RepeatTooLarge { .. } => "RT013",
            RuntimeErrorKind::OutputFailed(_) => "RT014",
        }
    }

    /// The user facing error class this error is reported under.
    pub fn category(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::InvalidOperands { .. }
            | RuntimeErrorKind::InvalidOperand { .. }
            | RuntimeErrorKind::InvalidCharacter(_)
            | RuntimeErrorKind::NonBoolCondition(_)
            | RuntimeErrorKind::NonIntegerIndex(_)
            | RuntimeErrorKind::NonArray { .. }
            | RuntimeErrorKind::InvalidArgument { .. } => "TypeError",
            RuntimeErrorKind::UndefinedVariable(_)
            | RuntimeErrorKind::UndefinedFunction(_)
            | RuntimeErrorKind::DivisionByZero
            | RuntimeErrorKind::RepeatTooLarge { .. }
            | RuntimeErrorKind::OutputFailed(_) => "RuntimeError",
            RuntimeErrorKind::IndexOutOfRange { .. } => "IndexError",
            RuntimeErrorKind::InvalidArgumentCount { .. } => "ArgumentError",
        }
    }
}
