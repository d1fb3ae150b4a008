//! Built-in operators with dimensioned forms.
use super::{Arithmetic, BinaryOperator, DimensionError, Operand, OperatorError, UnaryOperator};
use crate::quantity::Quantity;
use crate::units::Dimensions;
use std::sync::Arc;

/// How a unary operator transforms its argument's dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryRule {
    /// neg, abs
    Preserve,
    /// sqrt (1/2), square (2), inv (-1), ...
    Power(f64),
    /// Transcendental functions: argument must be dimensionless.
    Dimensionless,
}

#[derive(Debug, Clone, Copy)]
pub struct Unary {
    pub name: &'static str,
    pub f: fn(f64) -> f64,
    pub rule: UnaryRule,
}

impl UnaryOperator for Unary {
    fn name(&self) -> &str {
        self.name
    }

    fn eval(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    fn eval_quantity(&self, x: &Quantity) -> Result<Quantity, OperatorError> {
        let dims = match self.rule {
            UnaryRule::Preserve => x.dims,
            UnaryRule::Power(p) => x.dims.pow(p).ok_or_else(|| DimensionError::Unrepresentable {
                op: self.name.to_string(),
                found: x.dims,
            })?,
            UnaryRule::Dimensionless => {
                if !x.dims.is_dimensionless() {
                    return Err(DimensionError::NotDimensionless { op: self.name.to_string(), found: x.dims }.into());
                }
                x.dims
            }
        };
        Ok(Quantity::new((self.f)(x.value), dims))
    }
}

/// How a binary operator combines its arguments' dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryRule {
    /// +, −, max, min: both sides share one dimension, which the result keeps.
    Same,
    /// atan2, greater: both sides share one dimension, the result is dimensionless.
    SameToDimensionless,
    Product,
    Quotient,
    /// Exponent must be dimensionless.
    Power,
}

#[derive(Debug, Clone, Copy)]
pub struct Binary {
    pub name: &'static str,
    pub f: fn(f64, f64) -> f64,
    pub rule: BinaryRule,
    pub arithmetic: Option<Arithmetic>,
}

impl Binary {
    /// Aligns the two sides onto one dimension. A bare scalar adopts the
    /// other side's dimension.
    fn aligned(&self, l: Operand, r: Operand) -> Result<Dimensions, DimensionError> {
        match (l, r) {
            (Operand::Quantity(a), Operand::Quantity(b)) => {
                if a.dims == b.dims {
                    Ok(a.dims)
                } else {
                    Err(DimensionError::Mismatch { op: self.name.to_string(), left: a.dims, right: b.dims })
                }
            }
            (Operand::Scalar(_), Operand::Quantity(q)) | (Operand::Quantity(q), Operand::Scalar(_)) => Ok(q.dims),
            (Operand::Scalar(_), Operand::Scalar(_)) => Ok(Dimensions::DIMENSIONLESS),
        }
    }
}

fn dims_of(x: &Operand) -> Dimensions {
    match x {
        Operand::Quantity(q) => q.dims,
        Operand::Scalar(_) => Dimensions::DIMENSIONLESS,
    }
}

impl BinaryOperator for Binary {
    fn name(&self) -> &str {
        self.name
    }

    fn eval(&self, l: f64, r: f64) -> f64 {
        (self.f)(l, r)
    }

    fn eval_quantity(&self, l: Operand, r: Operand) -> Result<Quantity, OperatorError> {
        let dims = match self.rule {
            BinaryRule::Same => self.aligned(l, r)?,
            BinaryRule::SameToDimensionless => {
                self.aligned(l, r)?;
                Dimensions::DIMENSIONLESS
            }
            BinaryRule::Product => dims_of(&l)
                .multiply(&dims_of(&r))
                .ok_or_else(|| DimensionError::Unrepresentable { op: self.name.to_string(), found: dims_of(&l) })?,
            BinaryRule::Quotient => dims_of(&l)
                .divide(&dims_of(&r))
                .ok_or_else(|| DimensionError::Unrepresentable { op: self.name.to_string(), found: dims_of(&l) })?,
            BinaryRule::Power => {
                let exponent = dims_of(&r);
                if !exponent.is_dimensionless() {
                    return Err(DimensionError::NotDimensionless { op: self.name.to_string(), found: exponent }.into());
                }
                let base = dims_of(&l);
                base.pow(r.value())
                    .ok_or_else(|| DimensionError::Unrepresentable { op: self.name.to_string(), found: base })?
            }
        };
        Ok(Quantity::new((self.f)(l.value(), r.value()), dims))
    }

    fn arithmetic(&self) -> Option<Arithmetic> {
        self.arithmetic
    }
}

const fn unary_op(name: &'static str, f: fn(f64) -> f64, rule: UnaryRule) -> Unary {
    Unary { name, f, rule }
}

const fn binary_op(name: &'static str, f: fn(f64, f64) -> f64, rule: BinaryRule, arithmetic: Option<Arithmetic>) -> Binary {
    Binary { name, f, rule, arithmetic }
}

use BinaryRule as B;
use UnaryRule as U;

pub const UNARY: &[Unary] = &[
    unary_op("neg", |x| -x, U::Preserve),
    unary_op("abs", f64::abs, U::Preserve),
    unary_op("sqrt", f64::sqrt, U::Power(0.5)),
    unary_op("cbrt", f64::cbrt, U::Power(1.0 / 3.0)),
    unary_op("square", |x| x * x, U::Power(2.0)),
    unary_op("cube", |x| x * x * x, U::Power(3.0)),
    unary_op("inv", |x| 1.0 / x, U::Power(-1.0)),
    unary_op("exp", f64::exp, U::Dimensionless),
    unary_op("log", f64::ln, U::Dimensionless),
    unary_op("log2", f64::log2, U::Dimensionless),
    unary_op("log10", f64::log10, U::Dimensionless),
    unary_op("log1p", f64::ln_1p, U::Dimensionless),
    unary_op("sin", f64::sin, U::Dimensionless),
    unary_op("cos", f64::cos, U::Dimensionless),
    unary_op("tan", f64::tan, U::Dimensionless),
    unary_op("sinh", f64::sinh, U::Dimensionless),
    unary_op("cosh", f64::cosh, U::Dimensionless),
    unary_op("tanh", f64::tanh, U::Dimensionless),
    unary_op("asin", f64::asin, U::Dimensionless),
    unary_op("acos", f64::acos, U::Dimensionless),
    unary_op("atan", f64::atan, U::Dimensionless),
];

pub const BINARY: &[Binary] = &[
    binary_op("+", |a, b| a + b, B::Same, Some(Arithmetic::Add)),
    binary_op("-", |a, b| a - b, B::Same, Some(Arithmetic::Sub)),
    binary_op("*", |a, b| a * b, B::Product, Some(Arithmetic::Mul)),
    binary_op("/", |a, b| a / b, B::Quotient, Some(Arithmetic::Div)),
    binary_op("^", f64::powf, B::Power, Some(Arithmetic::Pow)),
    binary_op("max", f64::max, B::Same, None),
    binary_op("min", f64::min, B::Same, None),
    binary_op("atan2", f64::atan2, B::SameToDimensionless, None),
    binary_op("greater", |a, b| if a > b { 1.0 } else { 0.0 }, B::SameToDimensionless, None),
];

/// Looks up a built-in unary operator by name.
pub fn unary(name: &str) -> Option<Arc<dyn UnaryOperator>> {
    UNARY
        .iter()
        .find(|op| op.name == name)
        .map(|op| Arc::new(*op) as Arc<dyn UnaryOperator>)
}

/// Looks up a built-in binary operator by name. Word aliases are accepted
/// for the arithmetic symbols.
pub fn binary(name: &str) -> Option<Arc<dyn BinaryOperator>> {
    let symbol = match name {
        "add" | "plus" => "+",
        "sub" | "minus" => "-",
        "mul" | "mult" | "times" => "*",
        "div" => "/",
        "pow" => "^",
        other => other,
    };
    BINARY
        .iter()
        .find(|op| op.name == symbol)
        .map(|op| Arc::new(*op) as Arc<dyn BinaryOperator>)
}
