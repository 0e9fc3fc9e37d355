mod operator;
mod tree;

pub use operator::{AssignmentOperator, InfixOperator, PrefixOperator};
pub use tree::{
    AssignmentTarget, Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode,
    ExpressionNodeRef, IncompleteExpression,
};
