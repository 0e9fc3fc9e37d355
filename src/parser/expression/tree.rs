use super::{AssignmentOperator, InfixOperator, PrefixOperator};
use crate::{lexer::Span, string::Ident};
use compact_str::CompactString;

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtomKind {
    Null,
    Bool(bool),
    Char(char),
    Integer(i64),
    Double(f64),
    StringLiteral(CompactString),
    Identifier(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionAtom {
    pub kind: ExpressionAtomKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpressionNodeRef(pub u32);

/// Where an assignment stores its value.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentTarget {
    Identifier(Ident),
    Index {
        target: Ident,
        index: ExpressionNodeRef,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionNode {
    Atom(ExpressionAtom),
    Array {
        elements: Vec<ExpressionNodeRef>,
    },
    Group {
        inner: ExpressionNodeRef,
    },
    Prefix {
        operator: PrefixOperator,
        rhs: ExpressionNodeRef,
    },
    Infix {
        operator: InfixOperator,
        lhs: ExpressionNodeRef,
        rhs: ExpressionNodeRef,
    },
    Assignment {
        operator: AssignmentOperator,
        target: AssignmentTarget,
        rhs: ExpressionNodeRef,
    },
    Index {
        target: Ident,
        index: ExpressionNodeRef,
    },
    Call {
        callee: Ident,
        arguments: Vec<ExpressionNodeRef>,
    },
}

impl ExpressionNode {
    /// Converts the node into an assignment target if it names a storage location.
    pub fn get_l_value(&self) -> Option<AssignmentTarget> {
        match self {
            ExpressionNode::Atom(ExpressionAtom {
                kind: ExpressionAtomKind::Identifier(name),
                span,
            }) => Some(AssignmentTarget::Identifier(Ident {
                name: name.clone(),
                span: *span,
            })),
            ExpressionNode::Index { target, index } => Some(AssignmentTarget::Index {
                target: target.clone(),
                index: *index,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IncompleteExpression {
    nodes: Vec<ExpressionNode>,
    spans: Vec<Span>,
}

#[derive(Debug, Clone)]
pub struct Expression {
    nodes: Vec<ExpressionNode>,
    spans: Vec<Span>,
    root: ExpressionNodeRef,
}

impl IncompleteExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ExpressionNode, span: Span) -> ExpressionNodeRef {
        self.nodes.push(node);
        self.spans.push(span);
        ExpressionNodeRef(self.nodes.len() as u32 - 1)
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }

    pub fn get_span(&self, node: ExpressionNodeRef) -> Option<Span> {
        self.spans.get(node.0 as usize).copied()
    }
}

impl Expression {
    pub fn new(tree: IncompleteExpression, root: ExpressionNodeRef) -> Option<Self> {
        if !(0..tree.nodes.len()).contains(&(root.0 as usize)) {
            None
        } else {
            Some(Self {
                nodes: tree.nodes,
                spans: tree.spans,
                root,
            })
        }
    }

    pub fn get_root_ref(&self) -> ExpressionNodeRef {
        self.root
    }

    pub fn get_node(&self, node: ExpressionNodeRef) -> Option<&ExpressionNode> {
        self.nodes.get(node.0 as usize)
    }

    pub fn get_span(&self, node: ExpressionNodeRef) -> Option<Span> {
        self.spans.get(node.0 as usize).copied()
    }

    /// The span covering the whole expression.
    pub fn get_root_span(&self) -> Span {
        self.spans[self.root.0 as usize]
    }
}
