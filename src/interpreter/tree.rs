use super::{
    native::Builtins,
    scope::{Scope, ScopeChain},
    ProgramState, SystemContext,
};
use crate::{
    lexer::Span,
    parser::{
        expression::{
            AssignmentOperator, AssignmentTarget, Expression, ExpressionAtom, ExpressionAtomKind,
            ExpressionNode, ExpressionNodeRef, InfixOperator, PrefixOperator,
        },
        statement::{Function, IfStatement, Statement, WhileStatement},
        Program,
    },
    string::Ident,
    value::{
        error::{RuntimeError, RuntimeErrorKind},
        Value,
    },
};
use tracing::{debug, trace};

pub struct TreeWalkInterpreter<C: SystemContext> {
    builtins: Builtins,
    context: C,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            builtins: Builtins::new(),
            context,
        }
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Runs the top-level statements in order.
    pub fn run(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let mut scopes = ScopeChain::new();
        for statement in program.iter() {
            if let ProgramState::Return(value) =
                self.interpret_statement(program, &mut scopes, statement)?
            {
                debug!(%value, "program returned at top level");
                break;
            }
        }
        Ok(())
    }

    pub fn evaluate(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        expr: &Expression,
    ) -> Result<Value, RuntimeError> {
        self.evaluate_node(program, scopes, expr, expr.get_root_ref())
    }
}

// Statement interpreter
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn interpret_statement(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::Expression(stmt) => {
                self.evaluate(program, scopes, &stmt.expr)?;
                Ok(ProgramState::Normal)
            }
            Statement::If(stmt) => self.interpret_if_statement(program, scopes, stmt),
            Statement::While(stmt) => self.interpret_while_statement(program, scopes, stmt),
            Statement::Return(stmt) => {
                let value = match stmt.value {
                    Some(ref expr) => self.evaluate(program, scopes, expr)?,
                    None => Value::Null,
                };
                Ok(ProgramState::Return(value))
            }
            Statement::Break(_) => Ok(ProgramState::Break),
            Statement::Continue(_) => Ok(ProgramState::Continue),
        }
    }

    /// Runs statements in order in the current scope, stopping at the first one that does not
    /// finish normally.
    fn interpret_statements(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        statements: &[Statement],
    ) -> Result<ProgramState, RuntimeError> {
        for statement in statements.iter() {
            match self.interpret_statement(program, scopes, statement)? {
                ProgramState::Normal => {}
                state => return Ok(state),
            }
        }
        Ok(ProgramState::Normal)
    }

    fn interpret_if_statement(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        stmt: &IfStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let block = if self.evaluate_condition(program, scopes, &stmt.condition)? {
            &stmt.success
        } else {
            match stmt.failure {
                Some(ref failure) => failure,
                None => return Ok(ProgramState::Normal),
            }
        };

        scopes.push();
        let state = self.interpret_statements(program, scopes, &block.body);
        scopes.pop();
        state
    }

    fn interpret_while_statement(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        stmt: &WhileStatement,
    ) -> Result<ProgramState, RuntimeError> {
        if !self.evaluate_condition(program, scopes, &stmt.condition)? {
            return Ok(ProgramState::Normal);
        }

        // Every iteration shares this one scope.
        scopes.push();
        let state = self.interpret_loop(program, scopes, stmt);
        scopes.pop();
        state
    }

    fn interpret_loop(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        stmt: &WhileStatement,
    ) -> Result<ProgramState, RuntimeError> {
        loop {
            match self.interpret_statements(program, scopes, &stmt.body.body)? {
                state @ ProgramState::Return(_) => return Ok(state),
                ProgramState::Break => return Ok(ProgramState::Normal),
                ProgramState::Normal | ProgramState::Continue => {}
            }
            if !self.evaluate_condition(program, scopes, &stmt.condition)? {
                return Ok(ProgramState::Normal);
            }
        }
    }

    fn evaluate_condition(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        condition: &Expression,
    ) -> Result<bool, RuntimeError> {
        match self.evaluate(program, scopes, condition)? {
            Value::Bool(flag) => Ok(flag),
            other => Err(RuntimeError {
                kind: RuntimeErrorKind::NonBoolCondition(other.kind()),
                span: condition.get_root_span(),
            }),
        }
    }
}

// Expression evaluator
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn evaluate_node(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        expr: &Expression,
        node: ExpressionNodeRef,
    ) -> Result<Value, RuntimeError> {
        let current_node = expr
            .get_node(node)
            .expect("Node ref came from the tree so it must exist.");
        let span = expr
            .get_span(node)
            .expect("Every node in the tree has a span.");

        let result = match current_node {
            ExpressionNode::Atom(atom) => Self::evaluate_atom(scopes, atom)?,
            ExpressionNode::Array { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements.iter() {
                    values.push(self.evaluate_node(program, scopes, expr, *element)?);
                }
                Value::Array(values)
            }
            ExpressionNode::Group { inner } => self.evaluate_node(program, scopes, expr, *inner)?,
            ExpressionNode::Prefix { operator, rhs } => {
                let rhs = self.evaluate_node(program, scopes, expr, *rhs)?;
                Self::evaluate_prefix(*operator, &rhs).map_err(|kind| RuntimeError { kind, span })?
            }
            ExpressionNode::Infix { operator, lhs, rhs } => {
                let lhs = self.evaluate_node(program, scopes, expr, *lhs)?;
                let rhs = self.evaluate_node(program, scopes, expr, *rhs)?;
                Self::evaluate_infix(*operator, &lhs, &rhs)
                    .map_err(|kind| RuntimeError { kind, span })?
            }
            ExpressionNode::Assignment {
                operator,
                target,
                rhs,
            } => self.evaluate_assignment(program, scopes, expr, *operator, target, *rhs, span)?,
            ExpressionNode::Index { target, index } => {
                Self::ensure_defined(scopes, target)?;
                let index = self.evaluate_index(program, scopes, expr, *index)?;
                Self::read_element(scopes, target, index, span)?
            }
            ExpressionNode::Call { callee, arguments } => {
                self.evaluate_call(program, scopes, expr, callee, arguments, span)?
            }
        };
        Ok(result)
    }

    fn evaluate_atom(scopes: &ScopeChain, atom: &ExpressionAtom) -> Result<Value, RuntimeError> {
        let value = match atom.kind {
            ExpressionAtomKind::Null => Value::Null,
            ExpressionAtomKind::Bool(v) => Value::Bool(v),
            ExpressionAtomKind::Char(v) => Value::Char(v),
            ExpressionAtomKind::Integer(v) => Value::Int(v),
            ExpressionAtomKind::Double(v) => Value::Double(v),
            ExpressionAtomKind::StringLiteral(ref v) => Value::String(v.clone()),
            ExpressionAtomKind::Identifier(ref name) => {
                scopes.resolve_read(name).cloned().ok_or_else(|| RuntimeError {
                    kind: RuntimeErrorKind::UndefinedVariable(name.clone()),
                    span: atom.span,
                })?
            }
        };
        Ok(value)
    }

    fn evaluate_prefix(operator: PrefixOperator, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        match operator {
            PrefixOperator::Minus => rhs.negate(),
            PrefixOperator::Bang => rhs.logical_not(),
            PrefixOperator::Tilde => rhs.bit_not(),
        }
    }

    /// Applies a binary operator, switching to its unary form when only the left operand is
    /// present.
    fn evaluate_infix(
        operator: InfixOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeErrorKind> {
        if !lhs.is_null() && rhs.is_null() {
            // Operators without a unary form reject the left operand instead of passing it
            // through unchanged.
            return match operator.as_prefix() {
                Some(prefix) => Self::evaluate_prefix(prefix, lhs),
                None => Err(RuntimeErrorKind::InvalidOperand {
                    operator: operator.symbol(),
                    operand: lhs.kind(),
                }),
            };
        }

        Self::apply_binary(operator, lhs, rhs)
    }

    fn apply_binary(
        operator: InfixOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeErrorKind> {
        match operator {
            InfixOperator::Add => lhs.add(rhs),
            InfixOperator::Subtract => lhs.subtract(rhs),
            InfixOperator::Multiply => lhs.multiply(rhs),
            InfixOperator::Divide => lhs.divide(rhs),
            InfixOperator::Modulo => lhs.modulo(rhs),
            InfixOperator::LogicalAnd => lhs.logical_and(rhs),
            InfixOperator::LogicalOr => lhs.logical_or(rhs),
            InfixOperator::EqualEqual => lhs.is_equal(rhs),
            InfixOperator::BangEqual => lhs.is_not_equal(rhs),
            InfixOperator::GreaterThan => lhs.greater_than(rhs),
            InfixOperator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            InfixOperator::LessThan => lhs.less_than(rhs),
            InfixOperator::LessThanEqual => lhs.less_than_or_equal(rhs),
            InfixOperator::BitAnd => lhs.bit_and(rhs),
            InfixOperator::BitOr => lhs.bit_or(rhs),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_assignment(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        expr: &Expression,
        operator: AssignmentOperator,
        target: &AssignmentTarget,
        rhs: ExpressionNodeRef,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let rhs = self.evaluate_node(program, scopes, expr, rhs)?;

        match target {
            AssignmentTarget::Identifier(ident) => match operator.as_infix() {
                None => scopes.assign(&ident.name, rhs.clone()),
                Some(infix) => {
                    let slot = scopes
                        .resolve_mut(&ident.name)
                        .ok_or_else(|| Self::undefined_variable(ident))?;
                    *slot = Self::apply_binary(infix, slot, &rhs)
                        .map_err(|kind| RuntimeError { kind, span })?;
                }
            },
            AssignmentTarget::Index { target, index } => {
                Self::ensure_defined(scopes, target)?;
                let index = self.evaluate_index(program, scopes, expr, *index)?;
                let slot = Self::element_mut(scopes, target, index, span)?;
                *slot = match operator.as_infix() {
                    None => rhs.clone(),
                    Some(infix) => Self::apply_binary(infix, slot, &rhs)
                        .map_err(|kind| RuntimeError { kind, span })?,
                };
            }
        }

        Ok(rhs)
    }

    fn undefined_variable(target: &Ident) -> RuntimeError {
        RuntimeError {
            kind: RuntimeErrorKind::UndefinedVariable(target.name.clone()),
            span: target.span,
        }
    }

    fn non_array(target: &Ident, value: &Value) -> RuntimeError {
        RuntimeError {
            kind: RuntimeErrorKind::NonArray {
                name: target.name.clone(),
                kind: value.kind(),
            },
            span: target.span,
        }
    }

    fn ensure_defined(scopes: &ScopeChain, target: &Ident) -> Result<(), RuntimeError> {
        match scopes.resolve_read(&target.name) {
            Some(_) => Ok(()),
            None => Err(Self::undefined_variable(target)),
        }
    }

    fn evaluate_index(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        expr: &Expression,
        index: ExpressionNodeRef,
    ) -> Result<i64, RuntimeError> {
        match self.evaluate_node(program, scopes, expr, index)? {
            Value::Int(index) => Ok(index),
            other => Err(RuntimeError {
                kind: RuntimeErrorKind::NonIntegerIndex(other.kind()),
                span: expr
                    .get_span(index)
                    .expect("Every node in the tree has a span."),
            }),
        }
    }

    fn read_element(
        scopes: &ScopeChain,
        target: &Ident,
        index: i64,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let elements = match scopes.resolve_read(&target.name) {
            Some(Value::Array(elements)) => elements,
            Some(other) => return Err(Self::non_array(target, other)),
            None => return Err(Self::undefined_variable(target)),
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .ok_or(RuntimeError {
                kind: RuntimeErrorKind::IndexOutOfRange {
                    index,
                    length: elements.len(),
                },
                span,
            })
    }

    fn element_mut<'a>(
        scopes: &'a mut ScopeChain,
        target: &Ident,
        index: i64,
        span: Span,
    ) -> Result<&'a mut Value, RuntimeError> {
        let elements = match scopes.resolve_mut(&target.name) {
            Some(Value::Array(elements)) => elements,
            Some(other) => return Err(Self::non_array(target, other)),
            None => return Err(Self::undefined_variable(target)),
        };
        let length = elements.len();
        usize::try_from(index)
            .ok()
            .and_then(|i| elements.get_mut(i))
            .ok_or(RuntimeError {
                kind: RuntimeErrorKind::IndexOutOfRange { index, length },
                span,
            })
    }

    fn evaluate_call(
        &mut self,
        program: &Program,
        scopes: &mut ScopeChain,
        expr: &Expression,
        callee: &Ident,
        arguments: &[ExpressionNodeRef],
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments.iter() {
            values.push(self.evaluate_node(program, scopes, expr, *argument)?);
        }

        if let Some(native) = self.builtins.get(&callee.name) {
            trace!(name = %callee, arguments = values.len(), "dispatching builtin");
            return native
                .call(&mut self.context, scopes, values)
                .map_err(|kind| RuntimeError { kind, span });
        }

        let function = program.get_function(&callee.name).ok_or(RuntimeError {
            kind: RuntimeErrorKind::UndefinedFunction(callee.name.clone()),
            span: callee.span,
        })?;
        self.call_function(program, function, values, span)
    }

    /// Runs a user function in a chain holding only its parameters.
    fn call_function(
        &mut self,
        program: &Program,
        function: &Function,
        arguments: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        if arguments.len() != function.arity() {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::InvalidArgumentCount {
                    function: function.name.name.clone(),
                    actual: arguments.len(),
                    expected: function.arity(),
                },
                span,
            });
        }

        let mut scope = Scope::new();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            scope.declare(&parameter.name, argument);
        }
        let mut scopes = ScopeChain::from_scope(scope);

        debug!(name = %function.name, arity = function.arity(), "calling function");
        let value = match self.interpret_statements(program, &mut scopes, &function.body.body)? {
            ProgramState::Return(value) => value,
            _ => Value::Null,
        };
        debug!(name = %function.name, %value, "function returned");
        Ok(value)
    }
}
