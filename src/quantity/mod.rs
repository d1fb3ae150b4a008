//! Dimensioned values and their wildcard-carrying wrapper.
//!
//! A `WildcardQuantity` is what the tree evaluator passes between nodes. It
//! is in exactly one of four states, {fixed, wildcard} × {violating, not}:
//!
//! - constant leaves start as dimensionless **wildcards** (free to adopt any
//!   dimension the surrounding expression needs),
//! - feature leaves start **fixed** at the feature's dimension,
//! - `violates` is absorbing: once set, magnitude and dimension are
//!   meaningless and every consumer returns the violating value unchanged.
//!
//! The operator rules live in [`algebra`].
pub mod algebra;

use crate::units::Dimensions;

/// A magnitude with its physical dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub dims: Dimensions,
}

impl Quantity {
    pub fn new(value: f64, dims: Dimensions) -> Self {
        Self { value, dims }
    }

    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, Dimensions::DIMENSIONLESS)
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WildcardQuantity {
    pub quantity: Quantity,
    /// The dimension is still free to crystallize.
    pub wildcard: bool,
    /// A dimensional inconsistency was detected in this subtree.
    pub violates: bool,
}

impl WildcardQuantity {
    /// A constant leaf. With `allow_wildcard == false` constants are treated
    /// as fixed dimensionless numbers.
    pub fn constant(value: f64, allow_wildcard: bool) -> Self {
        Self {
            quantity: Quantity::dimensionless(value),
            wildcard: allow_wildcard,
            violates: false,
        }
    }

    /// A feature leaf with its fixed dimension.
    pub fn feature(value: f64, dims: Dimensions) -> Self {
        Self::fixed(Quantity::new(value, dims))
    }

    pub fn fixed(quantity: Quantity) -> Self {
        Self { quantity, wildcard: false, violates: false }
    }

    /// The canonical violating value: dimensionless one, not a wildcard.
    pub fn violation() -> Self {
        Self {
            quantity: Quantity::dimensionless(1.0),
            wildcard: false,
            violates: true,
        }
    }

    pub fn value(&self) -> f64 {
        self.quantity.value
    }

    pub fn dims(&self) -> &Dimensions {
        &self.quantity.dims
    }

    pub fn is_finite(&self) -> bool {
        self.quantity.is_finite()
    }
}
