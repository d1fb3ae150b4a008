//! Dimensional-consistency checking for symbolic-regression candidates.
//!
//! A candidate formula is a tree of operators over dataset features and
//! free constants. Features carry fixed physical dimensions; constants are
//! wildcards that may take whatever dimension keeps an expression
//! consistent. [`violates_dimensional_constraints`] answers one question
//! per (tree, row): does this formula mix incompatible quantities?
//!
//! ```
//! use dimensional_core::{resolve_dimensions, violates_dimensional_constraints, Node, OperatorSet, UnitAnnotation};
//!
//! let ops = OperatorSet::from_names(&[], &["+", "*"]).unwrap();
//! let dims = resolve_dimensions(&[UnitAnnotation::from("m"), UnitAnnotation::from("s")]);
//! let row = [3.0, 2.0];
//!
//! let length_plus_time = Node::binary(0, Node::feature(0), Node::feature(1));
//! assert!(violates_dimensional_constraints(&length_plus_time, &dims, &row, &ops).unwrap());
//!
//! let constant_plus_length = Node::binary(0, Node::constant(2.5), Node::feature(0));
//! assert!(!violates_dimensional_constraints(&constant_plus_length, &dims, &row, &ops).unwrap());
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod operators;
pub mod quantity;
pub mod tree;
pub mod units;

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use capability::{ArgShape, Capability, CapabilityTable};
pub use config::CheckOptions;
pub use error::Error;
pub use evaluator::DimensionalChecker;
pub use operators::{BinaryOperator, OperatorSet, UnaryOperator};
pub use quantity::{Quantity, WildcardQuantity};
pub use tree::Node;
pub use units::{Dimensions, UnitAnnotation};

/// Dataset preprocessing: one `Dimensions` per feature annotation.
pub fn resolve_dimensions(annotations: &[UnitAnnotation]) -> Vec<Dimensions> {
    units::resolve(annotations)
}

/// The fitness-function entry point, with default options.
pub fn violates_dimensional_constraints(
    tree: &Node,
    dims: &[Dimensions],
    row: &[f64],
    operators: &OperatorSet,
) -> Result<bool, Error> {
    DimensionalChecker::new(operators, dims).violates(tree, row)
}
