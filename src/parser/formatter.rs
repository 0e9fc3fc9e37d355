use super::{
    expression::{
        AssignmentTarget, Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode,
        ExpressionNodeRef,
    },
    ParserError, ParserErrorKind,
};
use crate::lexer::{
    formatter::{PrettyFormatter as PrettyTokenFormatter, TokenFormatter},
    LineBreaks,
};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ExpressionFormatter {
    fn format(&self, tree: &Expression) -> String;
}

/// Renders expressions as fully parenthesised prefix notation, e.g. `(+ 1 (* 2 3))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_atom(atom: &ExpressionAtom) -> String {
        match atom.kind {
            ExpressionAtomKind::Null => "null".into(),
            ExpressionAtomKind::Bool(v) => format!("{v}"),
            ExpressionAtomKind::Char(v) => format!("{v:?}"),
            ExpressionAtomKind::Integer(v) => format!("{v}"),
            ExpressionAtomKind::Double(v) => format!("{v:?}"),
            ExpressionAtomKind::StringLiteral(ref v) => format!("{v:?}"),
            ExpressionAtomKind::Identifier(ref name) => name.to_string(),
        }
    }

    fn format_list(tree: &Expression, head: &str, elements: &[ExpressionNodeRef]) -> String {
        let mut buffer = format!("({head}");
        for element in elements.iter() {
            buffer.push(' ');
            buffer.push_str(&Self::format_node(tree, *element));
        }
        buffer.push(')');
        buffer
    }

    fn format_node(tree: &Expression, node: ExpressionNodeRef) -> String {
        let current_node = tree
            .get_node(node)
            .expect("Caller should make sure the ref is valid.");

        match current_node {
            ExpressionNode::Atom(atom) => Self::format_atom(atom),
            ExpressionNode::Array { elements } => Self::format_list(tree, "array", elements),
            ExpressionNode::Group { inner } => {
                format!("(group {})", Self::format_node(tree, *inner))
            }
            ExpressionNode::Prefix { operator, rhs } => {
                format!("({operator} {})", Self::format_node(tree, *rhs))
            }
            ExpressionNode::Infix { operator, lhs, rhs } => format!(
                "({operator} {} {})",
                Self::format_node(tree, *lhs),
                Self::format_node(tree, *rhs),
            ),
            ExpressionNode::Assignment {
                operator,
                target,
                rhs,
            } => {
                let target = match target {
                    AssignmentTarget::Identifier(ident) => format!("{ident}"),
                    AssignmentTarget::Index { target, index } => {
                        format!("(index {target} {})", Self::format_node(tree, *index))
                    }
                };
                format!("({operator} {target} {})", Self::format_node(tree, *rhs))
            }
            ExpressionNode::Index { target, index } => {
                format!("(index {target} {})", Self::format_node(tree, *index))
            }
            ExpressionNode::Call { callee, arguments } => {
                Self::format_list(tree, &format!("call {callee}"), arguments)
            }
        }
    }
}

impl ExpressionFormatter for SExpressionFormatter {
    fn format(&self, tree: &Expression) -> String {
        Self::format_node(tree, tree.get_root_ref())
    }
}

pub trait ParserFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

/// Single line error rendering of the form `(line:column) Category: message`.
pub struct BasicParserFormatter {
    line_breaks: LineBreaks,
}

impl BasicParserFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ParserFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        let (line, column) = self.line_breaks.get_position_from_span(error.span);
        format!("({line}:{column}) {}: {}", error.category(), error.kind)
    }
}

pub struct PrettyParserFormatter<'src> {
    token_formatter: PrettyTokenFormatter<'src>,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self {
            token_formatter: PrettyTokenFormatter::new(text, path),
        }
    }
}

impl<'src> ParserFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let (message, label) = match error.kind {
            ParserErrorKind::LexicalError(ref inner) => {
                return self.token_formatter.format_lexical_error(inner)
            }
            ParserErrorKind::UnexpectedToken { actual, expected } => (
                "Expected a different token".to_string(),
                format!(
                    "Expected {} but got {}",
                    expected.fg(Color::Green),
                    actual.fg(Color::BrightRed)
                ),
            ),
            ParserErrorKind::NonExpression(kind) => (
                "Expected a valid expression operator or atom token".to_string(),
                format!("Not an expression token {}", kind.fg(Color::BrightRed)),
            ),
            ParserErrorKind::UnexpectedEof => (
                "Unexpected EOF".to_string(),
                "File ends here...".to_string(),
            ),
            ParserErrorKind::InvalidAssignmentTarget => (
                "Invalid assignment target".to_string(),
                "can not assign to this expression".to_string(),
            ),
            ParserErrorKind::NestedFunction => (
                "Nested function definition".to_string(),
                "Functions can only be defined at the top level".to_string(),
            ),
            ParserErrorKind::DuplicateFunction(ref name) => (
                "Duplicate function definition".to_string(),
                format!("{} is already defined", name.fg(Color::BrightRed)),
            ),
            ParserErrorKind::DuplicateParameter(ref name) => (
                "Duplicate parameter".to_string(),
                format!("{} is already a parameter", name.fg(Color::BrightRed)),
            ),
            ParserErrorKind::OutsideLoop(kind) => (
                "Loop control outside of a loop".to_string(),
                format!("{} must be inside a while body", kind.fg(Color::BrightRed)),
            ),
        };

        let text = self.token_formatter.get_text();
        let path = &self.token_formatter.get_path().to_string_lossy();
        let span = error.span;
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
            .write((path, Source::from(text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
