//! Per-operator capability classification.
//!
//! Each (operator, argument shape) pair is classified `Good` if the operator
//! has a dimensioned form for that shape and `Bad` otherwise. The table is
//! filled once, when an `OperatorSet` is built, by invoking every form with
//! dimensionless probe values. After that it is immutable and shared by
//! reference across all concurrent evaluations.
//!
//! A classification only decides which of the algebra's paths is tried
//! first. `Good` entries whose dimensioned form later rejects a particular
//! dimension fall through to the same fallbacks as `Bad` entries.
use crate::operators::{BinaryOperator, Operand, OperatorError, UnaryOperator};
use crate::quantity::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgShape {
    /// Unary: one dimensioned value.
    Quantity,
    QuantityQuantity,
    /// Left side stripped to its bare magnitude.
    ScalarQuantity,
    /// Right side stripped to its bare magnitude.
    QuantityScalar,
}

impl ArgShape {
    pub const BINARY: [ArgShape; 3] = [ArgShape::QuantityQuantity, ArgShape::ScalarQuantity, ArgShape::QuantityScalar];

    fn binary_slot(self) -> Option<usize> {
        match self {
            ArgShape::Quantity => None,
            ArgShape::QuantityQuantity => Some(0),
            ArgShape::ScalarQuantity => Some(1),
            ArgShape::QuantityScalar => Some(2),
        }
    }

    fn probe_operands(self) -> (Operand, Operand) {
        let q = Operand::Quantity(Quantity::dimensionless(1.0));
        let s = Operand::Scalar(1.0);
        match self {
            ArgShape::QuantityQuantity | ArgShape::Quantity => (q, q),
            ArgShape::ScalarQuantity => (s, q),
            ArgShape::QuantityScalar => (q, s),
        }
    }
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArgShape::Quantity => "(quantity)",
            ArgShape::QuantityQuantity => "(quantity, quantity)",
            ArgShape::ScalarQuantity => "(scalar, quantity)",
            ArgShape::QuantityScalar => "(quantity, scalar)",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Good,
    Bad,
}

/// Identifies an operator within an `OperatorSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorRef {
    Unary(usize),
    Binary(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    unary: Vec<Capability>,
    binary: Vec<[Capability; 3]>,
}

/// Classifies the outcome of one probe. Only the "not defined" class maps to
/// `Bad`; genuine failures are returned to the caller.
fn classify_attempt(attempt: Result<Quantity, OperatorError>) -> Result<Capability, OperatorError> {
    match attempt {
        Ok(_) | Err(OperatorError::Dimension(_)) => Ok(Capability::Good),
        Err(OperatorError::Undefined { .. }) => Ok(Capability::Bad),
        Err(e @ OperatorError::Internal { .. }) => Err(e),
    }
}

impl CapabilityTable {
    pub fn probe(
        unary: &[Arc<dyn UnaryOperator>],
        binary: &[Arc<dyn BinaryOperator>],
    ) -> Result<Self, OperatorError> {
        let probe = Quantity::dimensionless(1.0);
        let unary_caps = unary
            .iter()
            .map(|op| classify_attempt(op.eval_quantity(&probe)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut binary_caps = Vec::with_capacity(binary.len());
        for op in binary {
            let mut slots = [Capability::Bad; 3];
            for (slot, shape) in slots.iter_mut().zip(ArgShape::BINARY) {
                let (l, r) = shape.probe_operands();
                *slot = classify_attempt(op.eval_quantity(l, r))?;
            }
            binary_caps.push(slots);
        }

        let table = Self { unary: unary_caps, binary: binary_caps };
        debug!(
            unary = table.unary.len(),
            binary = table.binary.len(),
            bad = table.bad_count(),
            "built operator capability table"
        );
        Ok(table)
    }

    /// `None` when the operator index is out of range or the shape does not
    /// fit the operator's arity.
    pub fn classify(&self, op: OperatorRef, shape: ArgShape) -> Option<Capability> {
        match (op, shape) {
            (OperatorRef::Unary(i), ArgShape::Quantity) => self.unary.get(i).copied(),
            (OperatorRef::Unary(_), _) => None,
            (OperatorRef::Binary(i), shape) => {
                let slot = shape.binary_slot()?;
                self.binary.get(i).map(|slots| slots[slot])
            }
        }
    }

    pub fn classify_unary(&self, index: usize) -> Option<Capability> {
        self.classify(OperatorRef::Unary(index), ArgShape::Quantity)
    }

    pub fn classify_binary(&self, index: usize, shape: ArgShape) -> Option<Capability> {
        self.classify(OperatorRef::Binary(index), shape)
    }

    fn bad_count(&self) -> usize {
        let unary = self.unary.iter().filter(|c| **c == Capability::Bad).count();
        let binary = self.binary.iter().flatten().filter(|c| **c == Capability::Bad).count();
        unary + binary
    }

    /// Applies the dimensioned form if the operator is classified `Good`.
    /// Returns `(default, false)` when it is not, or when the form rejects
    /// these particular dimensions.
    pub fn invoke_unary_if_good(
        &self,
        index: usize,
        op: &dyn UnaryOperator,
        arg: &Quantity,
        default: Quantity,
    ) -> Result<(Quantity, bool), OperatorError> {
        if self.classify_unary(index) != Some(Capability::Good) {
            return Ok((default, false));
        }
        absorb(op.eval_quantity(arg), default)
    }

    pub fn invoke_binary_if_good(
        &self,
        index: usize,
        op: &dyn BinaryOperator,
        l: Operand,
        r: Operand,
        default: Quantity,
    ) -> Result<(Quantity, bool), OperatorError> {
        let good = Operand::shape_of(&l, &r)
            .and_then(|shape| self.classify_binary(index, shape))
            .map_or(false, |c| c == Capability::Good);
        if !good {
            return Ok((default, false));
        }
        absorb(op.eval_quantity(l, r), default)
    }
}

fn absorb(attempt: Result<Quantity, OperatorError>, default: Quantity) -> Result<(Quantity, bool), OperatorError> {
    match attempt {
        Ok(q) => Ok((q, true)),
        Err(OperatorError::Dimension(_)) | Err(OperatorError::Undefined { .. }) => Ok((default, false)),
        Err(e) => Err(e),
    }
}
