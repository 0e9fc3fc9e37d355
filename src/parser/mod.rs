mod error;
pub mod expression;
pub mod formatter;
mod program;
pub mod statement;

pub use error::{ParserError, ParserErrorKind};
use expression::{
    AssignmentOperator, Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode,
    ExpressionNodeRef, IncompleteExpression, InfixOperator, PrefixOperator,
};
pub use program::Program;
use statement::{
    Block, ExpressionStatement, Function, IfStatement, ReturnStatement, Statement, WhileStatement,
};

use crate::{
    lexer::{decode_escapes, Lexer, Span, Token, TokenKind},
    string::Ident,
};
use std::collections::HashMap;
use tracing::debug;

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Result<Token, ParserError>>,
    loop_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
            loop_depth: 0,
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => Ok(self.lexer.next_token()?),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    actual: next_token.kind,
                    expected,
                },
                span: next_token.span,
            })
        } else {
            Ok(next_token)
        }
    }

    fn expect_ident(&mut self) -> Result<Ident, ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(Ident {
            name: self.get_lexeme(&token).into(),
            span: token.span,
        })
    }

    fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != next {
            Ok(None)
        } else {
            self.next_token()?;
            Ok(Some(next_token))
        }
    }

    fn get_lexeme(&self, token: &Token) -> &'src str {
        self.lexer
            .get_lexeme(&token.span)
            .expect("Lexed token has a valid span")
    }
}

// Pratt parser for expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let mut tree = IncompleteExpression::new();
        let root = self.parse_expression_pratt(0, &mut tree)?;

        Ok(Expression::new(tree, root)
            .expect("Root was obtained from the tree itself so it must be valid."))
    }

    fn peek_infix_operator(&mut self) -> Result<Option<InfixOperator>, ParserError> {
        let operator = match self.peek()?.kind {
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Subtract,
            TokenKind::Star => InfixOperator::Multiply,
            TokenKind::Slash => InfixOperator::Divide,
            TokenKind::Percent => InfixOperator::Modulo,
            TokenKind::AmpersandAmpersand => InfixOperator::LogicalAnd,
            TokenKind::PipePipe => InfixOperator::LogicalOr,
            TokenKind::EqualEqual => InfixOperator::EqualEqual,
            TokenKind::BangEqual => InfixOperator::BangEqual,
            TokenKind::GreaterThan => InfixOperator::GreaterThan,
            TokenKind::GreaterThanEqual => InfixOperator::GreaterThanEqual,
            TokenKind::LessThan => InfixOperator::LessThan,
            TokenKind::LessThanEqual => InfixOperator::LessThanEqual,
            TokenKind::Ampersand => InfixOperator::BitAnd,
            TokenKind::Pipe => InfixOperator::BitOr,
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    fn peek_assignment_operator(&mut self) -> Result<Option<AssignmentOperator>, ParserError> {
        let operator = match self.peek()?.kind {
            TokenKind::Equal => AssignmentOperator::Assign,
            TokenKind::PlusEqual => AssignmentOperator::AddAssign,
            TokenKind::MinusEqual => AssignmentOperator::SubtractAssign,
            TokenKind::StarEqual => AssignmentOperator::MultiplyAssign,
            TokenKind::SlashEqual => AssignmentOperator::DivideAssign,
            TokenKind::PercentEqual => AssignmentOperator::ModuloAssign,
            _ => return Ok(None),
        };
        Ok(Some(operator))
    }

    fn expect_left_expression(
        &mut self,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let token = self.next_token()?;
        let span = token.span;
        let lexeme = self.get_lexeme(&token);

        let atom = |kind: ExpressionAtomKind| ExpressionNode::Atom(ExpressionAtom { kind, span });

        let node = match token.kind {
            TokenKind::IntegerLiteral => {
                let value = lexeme
                    .parse()
                    .expect("Integer literal tokens are valid `i64`");
                tree.push(atom(ExpressionAtomKind::Integer(value)), span)
            }
            TokenKind::DoubleLiteral => {
                let value = lexeme
                    .parse()
                    .expect("Double literal tokens are valid `f64`");
                tree.push(atom(ExpressionAtomKind::Double(value)), span)
            }
            TokenKind::StringLiteral => {
                let value = decode_escapes(&lexeme[1..lexeme.len() - 1])
                    .expect("String literal escapes were validated by the lexer.");
                tree.push(atom(ExpressionAtomKind::StringLiteral(value.into())), span)
            }
            TokenKind::CharLiteral => {
                let value = decode_escapes(&lexeme[1..lexeme.len() - 1])
                    .ok()
                    .and_then(|decoded| decoded.chars().next())
                    .expect("Char literal tokens decode to exactly one character.");
                tree.push(atom(ExpressionAtomKind::Char(value)), span)
            }
            TokenKind::KeywordNull => tree.push(atom(ExpressionAtomKind::Null), span),
            TokenKind::KeywordTrue => tree.push(atom(ExpressionAtomKind::Bool(true)), span),
            TokenKind::KeywordFalse => tree.push(atom(ExpressionAtomKind::Bool(false)), span),
            TokenKind::Ident => {
                let ident = Ident {
                    name: lexeme.into(),
                    span,
                };
                match self.peek()?.kind {
                    TokenKind::LeftParenthesis => self.parse_call(ident, tree)?,
                    TokenKind::LeftBracket => self.parse_index(ident, tree)?,
                    _ => tree.push(atom(ExpressionAtomKind::Identifier(ident.name)), span),
                }
            }
            // Prefix operators
            TokenKind::Minus => self.parse_prefix(PrefixOperator::Minus, span, tree)?,
            TokenKind::Bang => self.parse_prefix(PrefixOperator::Bang, span, tree)?,
            TokenKind::Tilde => self.parse_prefix(PrefixOperator::Tilde, span, tree)?,
            // Bracketed expression
            TokenKind::LeftParenthesis => {
                let inner = self.parse_expression_pratt(0, tree)?;
                let close = self.expect(TokenKind::RightParenthesis)?;
                tree.push(ExpressionNode::Group { inner }, span.merge(&close.span))
            }
            // Array literal
            TokenKind::LeftBracket => {
                let (elements, close) = self.parse_list(TokenKind::RightBracket, tree)?;
                tree.push(ExpressionNode::Array { elements }, span.merge(&close))
            }
            TokenKind::Eof => {
                return Err(ParserError {
                    kind: ParserErrorKind::UnexpectedEof,
                    span,
                })
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression(kind),
                    span,
                })
            }
        };
        Ok(node)
    }

    fn parse_prefix(
        &mut self,
        operator: PrefixOperator,
        span: Span,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let rbp = operator.get_binding_power();
        let rhs = self.parse_expression_pratt(rbp, tree)?;
        let span = span.merge(&Self::span_of(tree, rhs));
        Ok(tree.push(ExpressionNode::Prefix { operator, rhs }, span))
    }

    fn parse_call(
        &mut self,
        callee: Ident,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let (arguments, close) = self.parse_list(TokenKind::RightParenthesis, tree)?;
        let span = callee.span.merge(&close);
        Ok(tree.push(ExpressionNode::Call { callee, arguments }, span))
    }

    fn parse_index(
        &mut self,
        target: Ident,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        self.expect(TokenKind::LeftBracket)?;
        let index = self.parse_expression_pratt(0, tree)?;
        let close = self.expect(TokenKind::RightBracket)?;
        let span = target.span.merge(&close.span);
        Ok(tree.push(ExpressionNode::Index { target, index }, span))
    }

    /// Parses comma separated expressions up to and including the closing token.
    fn parse_list(
        &mut self,
        closing: TokenKind,
        tree: &mut IncompleteExpression,
    ) -> Result<(Vec<ExpressionNodeRef>, Span), ParserError> {
        let mut elements = Vec::new();
        if let Some(close) = self.eat_if(closing)? {
            return Ok((elements, close.span));
        }
        loop {
            elements.push(self.parse_expression_pratt(0, tree)?);
            if self.eat_if(TokenKind::Comma)?.is_none() {
                let close = self.expect(closing)?;
                return Ok((elements, close.span));
            }
        }
    }

    fn parse_expression_pratt(
        &mut self,
        min_bp: u8,
        tree: &mut IncompleteExpression,
    ) -> Result<ExpressionNodeRef, ParserError> {
        let mut lhs = self.expect_left_expression(tree)?;

        loop {
            if let Some(operator) = self.peek_infix_operator()? {
                let (lbp, rbp) = operator.get_binding_power();
                if lbp < min_bp {
                    break;
                }
                self.next_token()?;

                let rhs = self.parse_expression_pratt(rbp, tree)?;
                let span = Self::span_of(tree, lhs).merge(&Self::span_of(tree, rhs));
                lhs = tree.push(ExpressionNode::Infix { operator, lhs, rhs }, span);
                continue;
            }
            if let Some(operator) = self.peek_assignment_operator()? {
                let (lbp, rbp) = operator.get_binding_power();
                if lbp < min_bp {
                    break;
                }
                self.next_token()?;

                let lhs_span = Self::span_of(tree, lhs);
                let target = tree
                    .get_node(lhs)
                    .and_then(ExpressionNode::get_l_value)
                    .ok_or(ParserError {
                        kind: ParserErrorKind::InvalidAssignmentTarget,
                        span: lhs_span,
                    })?;
                let rhs = self.parse_expression_pratt(rbp, tree)?;
                let span = lhs_span.merge(&Self::span_of(tree, rhs));
                lhs = tree.push(
                    ExpressionNode::Assignment {
                        operator,
                        target,
                        rhs,
                    },
                    span,
                );
                continue;
            }
            break;
        }
        Ok(lhs)
    }

    fn span_of(tree: &IncompleteExpression, node: ExpressionNodeRef) -> Span {
        tree.get_span(node)
            .expect("Node refs handed out by the tree are valid.")
    }
}

// Parse program/statements
impl<'src> Parser<'src> {
    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let mut statements = Vec::new();
        let mut functions: HashMap<_, Function> = HashMap::new();

        loop {
            let next = self.peek()?;
            match next.kind {
                TokenKind::Eof => break,
                TokenKind::KeywordFunc => {
                    let function = self.parse_function()?;
                    if functions.contains_key(&function.name.name) {
                        return Err(ParserError {
                            kind: ParserErrorKind::DuplicateFunction(function.name.name.clone()),
                            span: function.name.span,
                        });
                    }
                    functions.insert(function.name.name.clone(), function);
                }
                _ => statements.push(self.parse_statement()?),
            }
        }

        Ok(Program::new(statements, functions))
    }

    fn parse_function(&mut self) -> Result<Function, ParserError> {
        self.expect(TokenKind::KeywordFunc)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftParenthesis)?;

        let mut parameters: Vec<Ident> = Vec::new();
        if self.eat_if(TokenKind::RightParenthesis)?.is_none() {
            loop {
                let parameter = self.expect_ident()?;
                if parameters.iter().any(|p| p.name == parameter.name) {
                    return Err(ParserError {
                        kind: ParserErrorKind::DuplicateParameter(parameter.name),
                        span: parameter.span,
                    });
                }
                parameters.push(parameter);
                if self.eat_if(TokenKind::Comma)?.is_none() {
                    self.expect(TokenKind::RightParenthesis)?;
                    break;
                }
            }
        }

        let body = self.parse_block()?;
        debug!(name = %name, arity = parameters.len(), "parsed function definition");
        Ok(Function {
            name,
            parameters,
            body,
        })
    }

    fn parse_block(&mut self) -> Result<Block, ParserError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();

        loop {
            let next = self.peek()?;
            match next.kind {
                TokenKind::RightBrace => {
                    self.next_token()?;
                    return Ok(Block {
                        body,
                        span: open.span.merge(&next.span),
                    });
                }
                TokenKind::Eof => {
                    return Err(ParserError {
                        kind: ParserErrorKind::UnexpectedEof,
                        span: next.span,
                    })
                }
                _ => body.push(self.parse_statement()?),
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.peek()?;
        match first.kind {
            TokenKind::KeywordIf => Ok(Statement::If(self.parse_if()?)),
            TokenKind::KeywordWhile => {
                self.next_token()?;
                let condition = self.parse_expression()?;
                self.loop_depth += 1;
                let body = self.parse_block()?;
                self.loop_depth -= 1;
                let span = first.span.merge(&body.span);
                Ok(Statement::While(WhileStatement {
                    condition,
                    body,
                    span,
                }))
            }
            TokenKind::KeywordReturn => {
                self.next_token()?;
                let value = match self.peek()?.kind {
                    TokenKind::Semicolon => None,
                    _ => Some(self.parse_expression()?),
                };
                let end = self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Return(ReturnStatement {
                    value,
                    span: first.span.merge(&end.span),
                }))
            }
            TokenKind::KeywordBreak | TokenKind::KeywordContinue => {
                self.next_token()?;
                if self.loop_depth == 0 {
                    return Err(ParserError {
                        kind: ParserErrorKind::OutsideLoop(first.kind),
                        span: first.span,
                    });
                }
                let end = self.expect(TokenKind::Semicolon)?;
                let span = first.span.merge(&end.span);
                if first.kind == TokenKind::KeywordBreak {
                    Ok(Statement::Break(span))
                } else {
                    Ok(Statement::Continue(span))
                }
            }
            TokenKind::KeywordFunc => Err(ParserError {
                kind: ParserErrorKind::NestedFunction,
                span: first.span,
            }),
            _ => {
                let expr = self.parse_expression()?;
                let end = self.expect(TokenKind::Semicolon)?;
                let span = expr.get_root_span().merge(&end.span);
                Ok(Statement::Expression(ExpressionStatement { expr, span }))
            }
        }
    }

    fn parse_if(&mut self) -> Result<IfStatement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordIf)?;
        let condition = self.parse_expression()?;
        let success = self.parse_block()?;

        let failure = if self.eat_if(TokenKind::KeywordElse)?.is_some() {
            if self.peek()?.kind == TokenKind::KeywordIf {
                let nested = self.parse_if()?;
                let span = nested.span;
                Some(Block {
                    body: vec![Statement::If(nested)],
                    span,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };

        let end = failure.as_ref().map_or(success.span, |block| block.span);
        Ok(IfStatement {
            condition,
            success,
            failure,
            span: keyword.span.merge(&end),
        })
    }
}
