use super::expression::Expression;
use crate::{lexer::Span, string::Ident};

#[derive(Debug, Clone)]
pub enum Statement {
    Expression(ExpressionStatement),
    If(IfStatement),
    While(WhileStatement),
    Return(ReturnStatement),
    Break(Span),
    Continue(Span),
}

impl Statement {
    pub fn get_span(&self) -> Span {
        match self {
            Statement::Expression(ExpressionStatement { span, .. })
            | Statement::If(IfStatement { span, .. })
            | Statement::While(WhileStatement { span, .. })
            | Statement::Return(ReturnStatement { span, .. })
            | Statement::Break(span)
            | Statement::Continue(span) => *span,
        }
    }
}

/// A braced sequence of statements.
#[derive(Debug, Clone)]
pub struct Block {
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Expression,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub condition: Expression,
    pub success: Block,
    /// `else if` chains are stored as a block holding a single nested `if`.
    pub failure: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Ident,
    pub parameters: Vec<Ident>,
    pub body: Block,
}

impl Function {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}
