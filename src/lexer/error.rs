use super::token::Span;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unrecognized character {0}")]
    Unrecognized(char),
    #[error("Unterminated string literal")]
    UnclosedString,
    #[error("Unterminated character literal")]
    UnclosedChar,
    #[error("Character literal must hold exactly one character")]
    InvalidChar,
    #[error("Unknown escape sequence \\{0}")]
    UnknownEscape(char),
    #[error("Integer literal does not fit in 64 bits")]
    IntegerOverflow,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub span: Span,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            LexicalErrorKind::Unrecognized(_) => "LX001",
            LexicalErrorKind::UnclosedString => "LX002",
            LexicalErrorKind::UnclosedChar => "LX003",
            LexicalErrorKind::InvalidChar => "LX004",
            LexicalErrorKind::UnknownEscape(_) => "LX005",
            LexicalErrorKind::IntegerOverflow => "LX006",
        }
    }
}
