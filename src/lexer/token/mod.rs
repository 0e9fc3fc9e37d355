mod span;

pub use span::{SpanIndex, SpanLength};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("break", TokenKind::KeywordBreak);
    map.insert("continue", TokenKind::KeywordContinue);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("false", TokenKind::KeywordFalse);
    map.insert("func", TokenKind::KeywordFunc);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("null", TokenKind::KeywordNull);
    map.insert("return", TokenKind::KeywordReturn);
    map.insert("true", TokenKind::KeywordTrue);
    map.insert("while", TokenKind::KeywordWhile);
    map
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// The byte position of the start of the token.
    pub start: SpanIndex,
    /// The length of the token in bytes.
    pub length: SpanLength,
}

impl Span {
    pub fn new(start: SpanIndex, end: SpanIndex) -> Self {
        Self {
            start,
            length: end - start,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start.into()..(self.start + self.length).into()
    }

    pub fn end(&self) -> SpanIndex {
        self.start + self.length
    }

    pub fn merge(&self, other: &Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        let length = end - start;
        Span { start, length }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Brackets
    LeftBracket,
    RightBracket,
    // Miscellaneous
    Comma,
    Semicolon,
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // Logical and bitwise
    Bang,
    Tilde,
    Ampersand,
    Pipe,
    AmpersandAmpersand,
    PipePipe,
    // Comparison
    EqualEqual,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    // Assignment
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,

    // Literals
    IntegerLiteral,
    DoubleLiteral,
    StringLiteral,
    CharLiteral,
    Ident,

    // Keywords
    KeywordBreak,
    KeywordContinue,
    KeywordElse,
    KeywordFalse,
    KeywordFunc,
    KeywordIf,
    KeywordNull,
    KeywordReturn,
    KeywordTrue,
    KeywordWhile,

    // End of file.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LEFT_PAREN"),
            TokenKind::RightParenthesis => write!(f, "RIGHT_PAREN"),
            TokenKind::LeftBrace => write!(f, "LEFT_BRACE"),
            TokenKind::RightBrace => write!(f, "RIGHT_BRACE"),
            TokenKind::LeftBracket => write!(f, "LEFT_BRACKET"),
            TokenKind::RightBracket => write!(f, "RIGHT_BRACKET"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Star => write!(f, "STAR"),
            TokenKind::Slash => write!(f, "SLASH"),
            TokenKind::Percent => write!(f, "PERCENT"),
            TokenKind::Bang => write!(f, "BANG"),
            TokenKind::Tilde => write!(f, "TILDE"),
            TokenKind::Ampersand => write!(f, "AMPERSAND"),
            TokenKind::Pipe => write!(f, "PIPE"),
            TokenKind::AmpersandAmpersand => write!(f, "AMPERSAND_AMPERSAND"),
            TokenKind::PipePipe => write!(f, "PIPE_PIPE"),
            TokenKind::EqualEqual => write!(f, "EQUAL_EQUAL"),
            TokenKind::BangEqual => write!(f, "BANG_EQUAL"),
            TokenKind::LessThan => write!(f, "LESS"),
            TokenKind::LessThanEqual => write!(f, "LESS_EQUAL"),
            TokenKind::GreaterThan => write!(f, "GREATER"),
            TokenKind::GreaterThanEqual => write!(f, "GREATER_EQUAL"),
            TokenKind::Equal => write!(f, "EQUAL"),
            TokenKind::PlusEqual => write!(f, "PLUS_EQUAL"),
            TokenKind::MinusEqual => write!(f, "MINUS_EQUAL"),
            TokenKind::StarEqual => write!(f, "STAR_EQUAL"),
            TokenKind::SlashEqual => write!(f, "SLASH_EQUAL"),
            TokenKind::PercentEqual => write!(f, "PERCENT_EQUAL"),
            TokenKind::IntegerLiteral => write!(f, "INT"),
            TokenKind::DoubleLiteral => write!(f, "DOUBLE"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::CharLiteral => write!(f, "CHAR"),
            TokenKind::Ident => write!(f, "IDENTIFIER"),
            TokenKind::KeywordBreak => write!(f, "BREAK"),
            TokenKind::KeywordContinue => write!(f, "CONTINUE"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordFalse => write!(f, "FALSE"),
            TokenKind::KeywordFunc => write!(f, "FUNC"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordNull => write!(f, "NULL"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
            TokenKind::KeywordTrue => write!(f, "TRUE"),
            TokenKind::KeywordWhile => write!(f, "WHILE"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
