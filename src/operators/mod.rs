//! The operator table consulted by the tree evaluator.
//!
//! Every operator has a bare-magnitude form (`eval`) and, optionally, a
//! dimensioned form (`eval_quantity`). Whether the dimensioned form exists
//! for a given argument shape is decided once, when the `OperatorSet` is
//! built, and recorded in its [`CapabilityTable`].
pub mod builtin;
mod error;

pub use self::error::{DimensionError, OperatorError};

use crate::capability::{ArgShape, CapabilityTable};
use crate::error::Error;
use crate::quantity::Quantity;
use std::fmt;
use std::sync::Arc;

/// Operators the wildcard algebra implements natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arithmetic {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// One argument of a binary dimensioned form: either a full quantity or a
/// wildcard stripped to its bare magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Quantity(Quantity),
    Scalar(f64),
}

impl Operand {
    pub fn value(&self) -> f64 {
        match self {
            Operand::Quantity(q) => q.value,
            Operand::Scalar(v) => *v,
        }
    }

    /// Shape of a `(left, right)` pair; `None` if neither side is dimensioned.
    pub fn shape_of(left: &Operand, right: &Operand) -> Option<ArgShape> {
        match (left, right) {
            (Operand::Quantity(_), Operand::Quantity(_)) => Some(ArgShape::QuantityQuantity),
            (Operand::Scalar(_), Operand::Quantity(_)) => Some(ArgShape::ScalarQuantity),
            (Operand::Quantity(_), Operand::Scalar(_)) => Some(ArgShape::QuantityScalar),
            (Operand::Scalar(_), Operand::Scalar(_)) => None,
        }
    }
}

pub trait UnaryOperator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn eval(&self, x: f64) -> f64;

    fn eval_quantity(&self, _x: &Quantity) -> Result<Quantity, OperatorError> {
        Err(OperatorError::undefined(self.name(), ArgShape::Quantity))
    }
}

pub trait BinaryOperator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn eval(&self, l: f64, r: f64) -> f64;

    fn eval_quantity(&self, l: Operand, r: Operand) -> Result<Quantity, OperatorError> {
        let shape = Operand::shape_of(&l, &r).unwrap_or(ArgShape::QuantityQuantity);
        Err(OperatorError::undefined(self.name(), shape))
    }

    /// `Some` for + − × ÷ ^, which bypass the capability table.
    fn arithmetic(&self) -> Option<Arithmetic> {
        None
    }
}

/// A user operator known only by its magnitude function.
#[derive(Debug, Clone, Copy)]
pub struct ScalarUnary {
    pub name: &'static str,
    pub f: fn(f64) -> f64,
}

impl UnaryOperator for ScalarUnary {
    fn name(&self) -> &str {
        self.name
    }
    fn eval(&self, x: f64) -> f64 {
        (self.f)(x)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScalarBinary {
    pub name: &'static str,
    pub f: fn(f64, f64) -> f64,
}

impl BinaryOperator for ScalarBinary {
    fn name(&self) -> &str {
        self.name
    }
    fn eval(&self, l: f64, r: f64) -> f64 {
        (self.f)(l, r)
    }
}

/// Operators indexed by the ids stored in expression tree nodes, together
/// with their capability classification.
#[derive(Debug, Clone)]
pub struct OperatorSet {
    unary: Vec<Arc<dyn UnaryOperator>>,
    binary: Vec<Arc<dyn BinaryOperator>>,
    capabilities: CapabilityTable,
}

impl OperatorSet {
    /// Builds the set and probes every operator once. Only an `Internal`
    /// failure during probing is returned.
    pub fn new(
        unary: Vec<Arc<dyn UnaryOperator>>,
        binary: Vec<Arc<dyn BinaryOperator>>,
    ) -> Result<Self, OperatorError> {
        let capabilities = CapabilityTable::probe(&unary, &binary)?;
        Ok(Self { unary, binary, capabilities })
    }

    /// Builds a set from built-in operator names, e.g. `(&["sqrt"], &["+", "*"])`.
    pub fn from_names(unary: &[&str], binary: &[&str]) -> Result<Self, Error> {
        let unary = unary
            .iter()
            .map(|n| builtin::unary(n).ok_or_else(|| Error::UnknownOperatorName(n.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        let binary = binary
            .iter()
            .map(|n| builtin::binary(n).ok_or_else(|| Error::UnknownOperatorName(n.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(unary, binary)?)
    }

    #[inline(always)]
    pub fn unary(&self, index: usize) -> Option<&dyn UnaryOperator> {
        self.unary.get(index).map(|op| op.as_ref())
    }

    #[inline(always)]
    pub fn binary(&self, index: usize) -> Option<&dyn BinaryOperator> {
        self.binary.get(index).map(|op| op.as_ref())
    }

    pub fn unary_count(&self) -> usize {
        self.unary.len()
    }

    pub fn binary_count(&self) -> usize {
        self.binary.len()
    }

    pub fn unary_index(&self, name: &str) -> Option<usize> {
        self.unary.iter().position(|op| op.name() == name)
    }

    pub fn binary_index(&self, name: &str) -> Option<usize> {
        self.binary.iter().position(|op| op.name() == name)
    }

    pub fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }
}
