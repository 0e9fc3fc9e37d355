use crate::lexer::{LexicalError, Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected an expression but got token {0}.")]
    NonExpression(TokenKind),
    #[error("Expected a non-EOF token.")]
    UnexpectedEof,
    #[error("can not assign to this expression.")]
    InvalidAssignmentTarget,
    #[error("Functions can only be defined at the top level.")]
    NestedFunction,
    #[error("Function {0} is already defined.")]
    DuplicateFunction(CompactString),
    #[error("Parameter {0} is declared more than once.")]
    DuplicateParameter(CompactString),
    #[error("{0} is only allowed inside a while loop.")]
    OutsideLoop(TokenKind),
    #[error("{0}")]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::NonExpression(_) => "PA002",
            ParserErrorKind::UnexpectedEof => "PA003",
            ParserErrorKind::InvalidAssignmentTarget => "PA004",
            ParserErrorKind::NestedFunction => "PA005",
            ParserErrorKind::DuplicateFunction(_) => "PA006",
            ParserErrorKind::DuplicateParameter(_) => "PA007",
            ParserErrorKind::OutsideLoop(_) => "PA008",
            ParserErrorKind::LexicalError(ref error) => error.code(),
        }
    }

    /// Every parser error is a syntax error except those raised by the lexer.
    pub fn category(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::LexicalError(_) => "LexicalError",
            _ => "SyntaxError",
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(error: LexicalError) -> Self {
        Self {
            span: error.span,
            kind: ParserErrorKind::LexicalError(error),
        }
    }
}
