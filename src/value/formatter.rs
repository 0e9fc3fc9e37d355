use super::error::{RuntimeError, RuntimeErrorKind};
use super::Value;
use crate::lexer::LineBreaks;
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &Value) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

/// Renders errors on a single line as `(line:column) Category: message`.
pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        let line_breaks = LineBreaks::new(text);
        Self { line_breaks }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let (line, column) = self.line_breaks.get_position_from_span(error.span);
        format!("({line}:{column}) {}: {}", error.category(), error.kind)
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
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &Value) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let label = match &error.kind {
            RuntimeErrorKind::InvalidOperands { operator, lhs, rhs } => format!(
                "{} can not be applied to {} and {}",
                operator.fg(Color::BrightRed),
                lhs.fg(Color::Cyan),
                rhs.fg(Color::Cyan)
            ),
            RuntimeErrorKind::InvalidOperand { operator, operand } => format!(
                "{} can not be applied to {}",
                operator.fg(Color::BrightRed),
                operand.fg(Color::Cyan)
            ),
            RuntimeErrorKind::InvalidCharacter(code) => {
                format!("{} is not a character code", code.fg(Color::BrightRed))
            }
            RuntimeErrorKind::NonBoolCondition(kind) => {
                format!("This evaluates to {}", kind.fg(Color::Cyan))
            }
            RuntimeErrorKind::NonIntegerIndex(kind) => {
                format!("This index is {}", kind.fg(Color::Cyan))
            }
            RuntimeErrorKind::NonArray { name, kind } => {
                format!("{} holds {}", name.fg(Color::BrightRed), kind.fg(Color::Cyan))
            }
            RuntimeErrorKind::InvalidArgument { function, kind } => format!(
                "{} does not accept {}",
                function.fg(Color::BrightRed),
                kind.fg(Color::Cyan)
            ),
            RuntimeErrorKind::UndefinedVariable(name) => {
                format!("{} is not defined in this scope", name.fg(Color::BrightRed))
            }
            RuntimeErrorKind::UndefinedFunction(name) => {
                format!("{} is not a function", name.fg(Color::BrightRed))
            }
            RuntimeErrorKind::DivisionByZero => "The divisor is zero".to_string(),
            RuntimeErrorKind::IndexOutOfRange { index, length } => format!(
                "Index {} is outside 0..{}",
                index.fg(Color::BrightRed),
                length
            ),
            RuntimeErrorKind::InvalidArgumentCount {
                function,
                actual,
                expected,
            } => format!(
                "{} expects {} arguments but got {}",
                function,
                expected.fg(Color::Green),
                actual.fg(Color::BrightRed)
            ),
            RuntimeErrorKind::RepeatTooLarge { count, .. } => {
                format!("Repeating {} times is too large", count.fg(Color::BrightRed))
            }
            RuntimeErrorKind::OutputFailed(_) => "Output could not be written here".to_string(),
        };

        let path = &self.path.to_string_lossy();
        let span = error.span;
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(format!("{}: {}", error.category(), error.kind))
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
