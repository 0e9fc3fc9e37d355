use super::{
    decode_escapes,
    token::{Token, TokenKind},
    LineBreaks,
};
use crate::lexer::{Lexer, LexicalError, LexicalErrorKind};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

/// The fixed lexeme of a token kind, empty for literals and identifiers.
pub fn fixed_lexeme(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::LeftParenthesis => "(",
        TokenKind::RightParenthesis => ")",
        TokenKind::LeftBrace => "{",
        TokenKind::RightBrace => "}",
        TokenKind::LeftBracket => "[",
        TokenKind::RightBracket => "]",
        TokenKind::Comma => ",",
        TokenKind::Semicolon => ";",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Bang => "!",
        TokenKind::Tilde => "~",
        TokenKind::Ampersand => "&",
        TokenKind::Pipe => "|",
        TokenKind::AmpersandAmpersand => "&&",
        TokenKind::PipePipe => "||",
        TokenKind::EqualEqual => "==",
        TokenKind::BangEqual => "!=",
        TokenKind::LessThan => "<",
        TokenKind::LessThanEqual => "<=",
        TokenKind::GreaterThan => ">",
        TokenKind::GreaterThanEqual => ">=",
        TokenKind::Equal => "=",
        TokenKind::PlusEqual => "+=",
        TokenKind::MinusEqual => "-=",
        TokenKind::StarEqual => "*=",
        TokenKind::SlashEqual => "/=",
        TokenKind::PercentEqual => "%=",
        TokenKind::KeywordBreak => "break",
        TokenKind::KeywordContinue => "continue",
        TokenKind::KeywordElse => "else",
        TokenKind::KeywordFalse => "false",
        TokenKind::KeywordFunc => "func",
        TokenKind::KeywordIf => "if",
        TokenKind::KeywordNull => "null",
        TokenKind::KeywordReturn => "return",
        TokenKind::KeywordTrue => "true",
        TokenKind::KeywordWhile => "while",
        TokenKind::IntegerLiteral
        | TokenKind::DoubleLiteral
        | TokenKind::StringLiteral
        | TokenKind::CharLiteral
        | TokenKind::Ident
        | TokenKind::Eof => "",
    }
}

pub struct BasicFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
            line_breaks: self.get_line_breaks(),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let lexeme = &self.text[token.span.range()];
        match token.kind {
            TokenKind::IntegerLiteral => format!("{} {lexeme} {lexeme}", token.kind),
            TokenKind::DoubleLiteral => {
                let value: f64 = lexeme
                    .parse()
                    .expect("Double literals are guaranteed to be parseable into f64.");
                format!("{} {lexeme} {value:.6}", token.kind)
            }
            TokenKind::StringLiteral | TokenKind::CharLiteral => {
                let value = decode_escapes(&lexeme[1..lexeme.len() - 1])
                    .expect("Escapes inside emitted literals were validated by the lexer.");
                format!("{} {lexeme} {value}", token.kind)
            }
            TokenKind::Ident => format!("{} {lexeme} null", token.kind),
            kind => format!("{kind} {} null", fixed_lexeme(kind)),
        }
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("[line {line}] Error: Unexpected character: {c}")
            }
            LexicalErrorKind::UnclosedString => {
                format!("[line {line}] Error: Unterminated string.")
            }
            LexicalErrorKind::UnclosedChar => {
                format!("[line {line}] Error: Unterminated character.")
            }
            LexicalErrorKind::InvalidChar => {
                format!("[line {line}] Error: Invalid character literal.")
            }
            LexicalErrorKind::UnknownEscape(c) => {
                format!("[line {line}] Error: Unknown escape: \\{c}")
            }
            LexicalErrorKind::IntegerOverflow => {
                format!("[line {line}] Error: Integer literal overflows.")
            }
        }
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    pub fn get_text(&self) -> &'src str {
        self.text
    }

    pub fn get_path(&self) -> &'src Path {
        self.path
    }
}

impl<'src> TokenFormatter for PrettyFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let (line, column) = LineBreaks::new(self.text).get_position_from_span(token.span);
        format!("({line}:{column}) {} {}", token.kind, &self.text[token.span.range()])
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let path = &self.path.to_string_lossy();
        let span = error.span;
        let (message, label) = match error.kind {
            LexicalErrorKind::Unrecognized(c) => (
                "Encountered an unexpected character".to_string(),
                format!("{} is not part of the language", c.fg(Color::BrightRed)),
            ),
            LexicalErrorKind::UnclosedString => (
                "Unterminated string literal".to_string(),
                "The string starting here never closes".to_string(),
            ),
            LexicalErrorKind::UnclosedChar => (
                "Unterminated character literal".to_string(),
                "The character starting here never closes".to_string(),
            ),
            LexicalErrorKind::InvalidChar => (
                "Invalid character literal".to_string(),
                "Character literals hold exactly one character".to_string(),
            ),
            LexicalErrorKind::UnknownEscape(c) => (
                "Unknown escape sequence".to_string(),
                format!("\\{} is not a valid escape", c.fg(Color::BrightRed)),
            ),
            LexicalErrorKind::IntegerOverflow => (
                "Integer literal out of range".to_string(),
                "This does not fit in a 64-bit signed integer".to_string(),
            ),
        };
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(message)
            .with_label(
                Label::new((path, span.range()))
                    .with_message(label)
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
