//! Physical dimensions and the per-dataset Dimension Resolver.
pub mod dimensions;
pub mod exponent;
pub mod parser;
pub mod resolver;

pub use dimensions::{BaseDimension, Dimensions};
pub use exponent::Exponent;
pub use parser::{parse_unit, UnitParseError};
pub use resolver::{resolve, UnitAnnotation};
