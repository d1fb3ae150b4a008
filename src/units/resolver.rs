//! Turns per-feature unit annotations into one `Dimensions` per feature.
//!
//! Unit metadata is optional: anything that does not parse, and any bare
//! number, resolves to dimensionless rather than failing the dataset.
use super::dimensions::Dimensions;
use super::parser::parse_unit;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A feature's unit as supplied with the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitAnnotation {
    /// A unit string such as "m/s^2".
    Text(String),
    /// A bare number carries no dimension.
    Number(f64),
    /// Already-structured dimensions.
    Structured(Dimensions),
}

impl UnitAnnotation {
    pub fn resolve(&self) -> Dimensions {
        match self {
            UnitAnnotation::Text(s) => match parse_unit(s) {
                Ok(dims) => dims,
                Err(e) => {
                    debug!(unit = %s, error = %e, "unparseable unit annotation, treating as dimensionless");
                    Dimensions::DIMENSIONLESS
                }
            },
            UnitAnnotation::Number(_) => Dimensions::DIMENSIONLESS,
            UnitAnnotation::Structured(dims) => *dims,
        }
    }
}

impl From<&str> for UnitAnnotation {
    fn from(s: &str) -> Self {
        UnitAnnotation::Text(s.to_string())
    }
}

impl From<String> for UnitAnnotation {
    fn from(s: String) -> Self {
        UnitAnnotation::Text(s)
    }
}

impl From<f64> for UnitAnnotation {
    fn from(x: f64) -> Self {
        UnitAnnotation::Number(x)
    }
}

impl From<Dimensions> for UnitAnnotation {
    fn from(d: Dimensions) -> Self {
        UnitAnnotation::Structured(d)
    }
}

/// Resolves every annotation, preserving order.
pub fn resolve(annotations: &[UnitAnnotation]) -> Vec<Dimensions> {
    annotations.iter().map(UnitAnnotation::resolve).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::BaseDimension;

    #[test]
    fn test_resolve_preserves_order_and_falls_back() {
        let annotations = vec![
            UnitAnnotation::from("m"),
            UnitAnnotation::from(3.0),
            UnitAnnotation::from("not a unit"),
            UnitAnnotation::from(Dimensions::base(BaseDimension::Time)),
            UnitAnnotation::from(""),
        ];
        let dims = resolve(&annotations);

        assert_eq!(dims.len(), 5);
        assert_eq!(dims[0], Dimensions::base(BaseDimension::Length));
        assert!(dims[1].is_dimensionless());
        assert!(dims[2].is_dimensionless());
        assert_eq!(dims[3], Dimensions::base(BaseDimension::Time));
        assert!(dims[4].is_dimensionless());
    }

    #[test]
    fn test_annotations_deserialize_untagged() {
        let annotations: Vec<UnitAnnotation> =
            serde_json::from_str(r#"["kg", 1.5, {"length": 1, "time": -1}]"#).unwrap();
        assert_eq!(annotations[0], UnitAnnotation::Text("kg".into()));
        assert_eq!(annotations[1], UnitAnnotation::Number(1.5));
        assert_eq!(
            annotations[2].resolve(),
            Dimensions::base(BaseDimension::Length).with(BaseDimension::Time, -1)
        );
    }
}
