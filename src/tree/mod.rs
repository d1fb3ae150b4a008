//! The read-only expression tree judged by the evaluator.
use serde::{Deserialize, Serialize};

/// A node of a candidate formula. Operator ids index into an
/// [`OperatorSet`](crate::operators::OperatorSet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A free constant.
    Constant(f64),
    /// A dataset feature, by column index.
    Feature(usize),
    Unary { op: usize, child: Box<Node> },
    Binary { op: usize, left: Box<Node>, right: Box<Node> },
}

impl Node {
    pub fn constant(value: f64) -> Self {
        Node::Constant(value)
    }

    pub fn feature(index: usize) -> Self {
        Node::Feature(index)
    }

    pub fn unary(op: usize, child: Node) -> Self {
        Node::Unary { op, child: Box::new(child) }
    }

    pub fn binary(op: usize, left: Node, right: Node) -> Self {
        Node::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Node::Constant(_) | Node::Feature(_) => 1,
            Node::Unary { child, .. } => 1 + child.node_count(),
            Node::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
