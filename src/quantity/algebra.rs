//! Operator semantics for `WildcardQuantity`.
//!
//! Every rule starts the same way: a violating operand is returned
//! unchanged, and a non-finite operand turns into a violation. What follows
//! depends on the operator:
//!
//! | Operator | Rule |
//! |----------|------|
//! | `×`, `÷` | dimensions add/subtract, wildcard = OR; never violates |
//! | `+`, `−` | equal dims, else both wildcards, else the wildcard side crystallizes, else violation |
//! | `^` | exponent must be dimensionless or a wildcard |
//! | unary | dimensioned form, else bare magnitude for wildcards, else violation |
//! | other binary | (q, q) form, else a stripped wildcard side, else bare magnitudes of two wildcards, else violation |
use super::{Quantity, WildcardQuantity};
use crate::capability::CapabilityTable;
use crate::operators::{Arithmetic, BinaryOperator, Operand, OperatorError, UnaryOperator};
use crate::units::Dimensions;
use std::ops::{Add, Div, Mul, Sub};

impl WildcardQuantity {
    /// A fresh dimensionless wildcard, the result of operating on bare
    /// magnitudes.
    fn free(value: f64) -> Self {
        Self::constant(value, true)
    }

    /// Violation propagation and the non-finite guard shared by every
    /// binary rule.
    #[inline]
    fn guard(l: &Self, r: &Self) -> Option<Self> {
        if l.violates {
            Some(*l)
        } else if r.violates {
            Some(*r)
        } else if !l.is_finite() || !r.is_finite() {
            Some(Self::violation())
        } else {
            None
        }
    }

    /// Applies one of the natively handled operators, combining magnitudes
    /// with `f`.
    pub fn arithmetic(self, r: Self, kind: Arithmetic, f: impl Fn(f64, f64) -> f64) -> Self {
        if let Some(early) = Self::guard(&self, &r) {
            return early;
        }
        match kind {
            Arithmetic::Add | Arithmetic::Sub => self.additive(r, f),
            Arithmetic::Mul => self.multiplicative(r, self.dims().multiply(r.dims()), f),
            Arithmetic::Div => self.multiplicative(r, self.dims().divide(r.dims()), f),
            Arithmetic::Pow => self.power(r, f),
        }
    }

    fn additive(self, r: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let (dims, wildcard) = if self.dims() == r.dims() {
            (*self.dims(), self.wildcard && r.wildcard)
        } else if self.wildcard && r.wildcard {
            (Dimensions::DIMENSIONLESS, true)
        } else if self.wildcard {
            (*r.dims(), false)
        } else if r.wildcard {
            (*self.dims(), false)
        } else {
            return Self::violation();
        };
        Self {
            quantity: Quantity::new(f(self.value(), r.value()), dims),
            wildcard,
            violates: false,
        }
    }

    /// `dims` is `None` when an exponent overflowed; that is a violation,
    /// never a clamp.
    fn multiplicative(self, r: Self, dims: Option<Dimensions>, f: impl Fn(f64, f64) -> f64) -> Self {
        match dims {
            Some(dims) => Self {
                quantity: Quantity::new(f(self.value(), r.value()), dims),
                wildcard: self.wildcard || r.wildcard,
                violates: false,
            },
            None => Self::violation(),
        }
    }

    fn power(self, r: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        if !(r.wildcard || r.dims().is_dimensionless()) {
            return Self::violation();
        }
        match self.dims().pow(r.value()) {
            Some(dims) => Self {
                quantity: Quantity::new(f(self.value(), r.value()), dims),
                wildcard: self.wildcard,
                violates: false,
            },
            None => Self::violation(),
        }
    }

    pub fn powf(self, r: Self) -> Self {
        self.arithmetic(r, Arithmetic::Pow, f64::powf)
    }

    /// Applies a unary operator. Only an `Internal` operator failure is
    /// returned as an error.
    pub fn apply_unary(
        self,
        index: usize,
        op: &dyn UnaryOperator,
        capabilities: &CapabilityTable,
    ) -> Result<Self, OperatorError> {
        if self.violates {
            return Ok(self);
        }
        if !self.is_finite() {
            return Ok(Self::violation());
        }

        let fallback = Self::violation().quantity;
        let (quantity, ok) = capabilities.invoke_unary_if_good(index, op, &self.quantity, fallback)?;
        if ok {
            return Ok(Self { quantity, wildcard: self.wildcard, violates: false });
        }
        if self.wildcard {
            return Ok(Self::free(op.eval(self.value())));
        }
        Ok(Self::violation())
    }

    /// Applies a binary operator: natively for arithmetic, otherwise through
    /// the capability table with wildcard fallbacks.
    pub fn apply_binary(
        self,
        r: Self,
        index: usize,
        op: &dyn BinaryOperator,
        capabilities: &CapabilityTable,
    ) -> Result<Self, OperatorError> {
        if let Some(kind) = op.arithmetic() {
            return Ok(self.arithmetic(r, kind, |a, b| op.eval(a, b)));
        }
        if let Some(early) = Self::guard(&self, &r) {
            return Ok(early);
        }

        let fallback = Self::violation().quantity;
        let (quantity, ok) = capabilities.invoke_binary_if_good(
            index,
            op,
            Operand::Quantity(self.quantity),
            Operand::Quantity(r.quantity),
            fallback,
        )?;
        if ok {
            return Ok(Self { quantity, wildcard: self.wildcard && r.wildcard, violates: false });
        }

        // A stripped side defers to whatever dimension the other side holds,
        // so the result stays free only if that side was free.
        if self.wildcard {
            let (quantity, ok) = capabilities.invoke_binary_if_good(
                index,
                op,
                Operand::Scalar(self.value()),
                Operand::Quantity(r.quantity),
                fallback,
            )?;
            if ok {
                return Ok(Self { quantity, wildcard: r.wildcard, violates: false });
            }
        }
        if r.wildcard {
            let (quantity, ok) = capabilities.invoke_binary_if_good(
                index,
                op,
                Operand::Quantity(self.quantity),
                Operand::Scalar(r.value()),
                fallback,
            )?;
            if ok {
                return Ok(Self { quantity, wildcard: self.wildcard, violates: false });
            }
        }
        if self.wildcard && r.wildcard {
            return Ok(Self::free(op.eval(self.value(), r.value())));
        }
        Ok(Self::violation())
    }
}

impl Add for WildcardQuantity {
    type Output = WildcardQuantity;
    fn add(self, rhs: WildcardQuantity) -> WildcardQuantity {
        self.arithmetic(rhs, Arithmetic::Add, |a, b| a + b)
    }
}

impl Sub for WildcardQuantity {
    type Output = WildcardQuantity;
    fn sub(self, rhs: WildcardQuantity) -> WildcardQuantity {
        self.arithmetic(rhs, Arithmetic::Sub, |a, b| a - b)
    }
}

impl Mul for WildcardQuantity {
    type Output = WildcardQuantity;
    fn mul(self, rhs: WildcardQuantity) -> WildcardQuantity {
        self.arithmetic(rhs, Arithmetic::Mul, |a, b| a * b)
    }
}

impl Div for WildcardQuantity {
    type Output = WildcardQuantity;
    fn div(self, rhs: WildcardQuantity) -> WildcardQuantity {
        self.arithmetic(rhs, Arithmetic::Div, |a, b| a / b)
    }
}
