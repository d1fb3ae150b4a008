// FFI Facade: the `_core` Python module.
// Trees cross the boundary as JSON in the `Node` serde shape, units as strings.

use crate::{CheckOptions, DimensionalChecker, Dimensions, Error, Node, OperatorSet, UnitAnnotation};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(e: Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn annotations(units: Vec<String>) -> Vec<UnitAnnotation> {
    units.into_iter().map(UnitAnnotation::Text).collect()
}

/// Resolves unit strings to canonical dimension strings, e.g. "N" -> "m·kg·s^-2".
#[pyfunction]
fn resolve_dimensions(units: Vec<String>) -> Vec<String> {
    crate::resolve_dimensions(&annotations(units)).iter().map(|d| d.to_string()).collect()
}

#[pyclass(name = "_DimensionalChecker")]
#[derive(Debug)]
pub struct PyDimensionalChecker {
    operators: OperatorSet,
    dims: Vec<Dimensions>,
    options: CheckOptions,
}

impl PyDimensionalChecker {
    fn checker(&self) -> DimensionalChecker<'_> {
        DimensionalChecker::with_options(&self.operators, &self.dims, &self.options)
    }
}

#[pymethods]
impl PyDimensionalChecker {
    #[new]
    #[pyo3(signature = (units, unary, binary, options_json=None))]
    pub fn new(
        units: Vec<String>,
        unary: Vec<String>,
        binary: Vec<String>,
        options_json: Option<String>,
    ) -> PyResult<Self> {
        let unary: Vec<&str> = unary.iter().map(String::as_str).collect();
        let binary: Vec<&str> = binary.iter().map(String::as_str).collect();
        let operators = OperatorSet::from_names(&unary, &binary).map_err(to_py_err)?;
        let options = match options_json {
            Some(json) => CheckOptions::from_json(&json).map_err(to_py_err)?,
            None => CheckOptions::default(),
        };
        Ok(Self { operators, dims: crate::resolve_dimensions(&annotations(units)), options })
    }

    pub fn violates(&self, tree_json: &str, row: Vec<f64>) -> PyResult<bool> {
        let tree = Node::from_json(tree_json).map_err(|e| to_py_err(e.into()))?;
        self.checker().violates(&tree, &row).map_err(to_py_err)
    }

    pub fn violations_per_row(&self, tree_json: &str, rows: Vec<Vec<f64>>) -> PyResult<Vec<bool>> {
        let tree = Node::from_json(tree_json).map_err(|e| to_py_err(e.into()))?;
        self.checker().violations_per_row(&tree, &rows).map_err(to_py_err)
    }

    pub fn feature_count(&self) -> usize {
        self.dims.len()
    }
}

/// This function defines the `_core` Python module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(resolve_dimensions, m)?)?;
    m.add_class::<PyDimensionalChecker>()?;
    Ok(())
}
