//! Defines the error types raised by operator implementations.
use crate::capability::ArgShape;
use crate::units::Dimensions;
use thiserror::Error;

/// The dimensioned form of an operator exists but rejects these dimensions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DimensionError {
    #[error("'{op}' requires a dimensionless argument, got {found}")]
    NotDimensionless { op: String, found: Dimensions },
    #[error("'{op}' requires matching dimensions, got {left} and {right}")]
    Mismatch { op: String, left: Dimensions, right: Dimensions },
    #[error("'{op}' produced an unrepresentable dimension from {found}")]
    Unrepresentable { op: String, found: Dimensions },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    /// No dimensioned form exists for this argument shape. Expected and
    /// recoverable; the capability table absorbs it.
    #[error("'{op}' is not defined for {shape} arguments")]
    Undefined { op: String, shape: ArgShape },
    /// Absorbed by the algebra's fallback tiers.
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    /// A genuine failure. Never absorbed.
    #[error("'{op}' failed: {message}")]
    Internal { op: String, message: String },
}

impl OperatorError {
    pub fn undefined(op: &str, shape: ArgShape) -> Self {
        OperatorError::Undefined { op: op.to_string(), shape }
    }
}
