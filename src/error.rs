//! Crate-level errors. A dimensional violation is not an error; these are
//! malformed inputs and genuine operator failures.
use crate::operators::OperatorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("row has {actual} values but {expected} feature dimensions were resolved")]
    RowLengthMismatch { expected: usize, actual: usize },
    #[error("feature index {feature} is out of range for {n_features} features")]
    FeatureOutOfRange { feature: usize, n_features: usize },
    #[error("no operator of arity {arity} at index {index} ({available} available)")]
    UnknownOperator { arity: u8, index: usize, available: usize },
    #[error("unknown operator name '{0}'")]
    UnknownOperatorName(String),
    #[error(transparent)]
    Operator(#[from] OperatorError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
