//! Options for a dimensional check.
use crate::error::Error;
use crate::units::{Dimensions, UnitAnnotation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Treat constants as fixed dimensionless numbers instead of wildcards.
    pub dimensionless_constants_only: bool,
    /// If set, a fixed-dimension result must also match this unit.
    pub target_unit: Option<UnitAnnotation>,
}

impl CheckOptions {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn target_dimensions(&self) -> Option<Dimensions> {
        self.target_unit.as_ref().map(UnitAnnotation::resolve)
    }
}
