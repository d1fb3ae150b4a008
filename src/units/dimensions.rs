//! Physical dimensions as exponent vectors over the SI base dimensions.
use super::exponent::Exponent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The SI base dimensions, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseDimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Luminosity,
    Amount,
}

impl BaseDimension {
    pub const ALL: [BaseDimension; 7] = [
        BaseDimension::Length,
        BaseDimension::Mass,
        BaseDimension::Time,
        BaseDimension::Current,
        BaseDimension::Temperature,
        BaseDimension::Luminosity,
        BaseDimension::Amount,
    ];

    /// Symbol of the coherent SI unit.
    pub fn symbol(self) -> &'static str {
        match self {
            BaseDimension::Length => "m",
            BaseDimension::Mass => "kg",
            BaseDimension::Time => "s",
            BaseDimension::Current => "A",
            BaseDimension::Temperature => "K",
            BaseDimension::Luminosity => "cd",
            BaseDimension::Amount => "mol",
        }
    }

    #[inline(always)]
    fn index(self) -> usize {
        self as usize
    }
}

/// An immutable exponent vector. Two quantities are addable only if their
/// `Dimensions` compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DimensionsRepr", into = "DimensionsRepr")]
pub struct Dimensions {
    exponents: [Exponent; 7],
}

impl Dimensions {
    pub const DIMENSIONLESS: Dimensions = Dimensions { exponents: [Exponent::ZERO; 7] };

    /// One unit of a single base dimension, e.g. `base(Length)` is `m`.
    pub fn base(dim: BaseDimension) -> Self {
        Self::DIMENSIONLESS.with(dim, 1)
    }

    /// Returns a copy with `dim` set to the integer exponent `power`.
    pub fn with(mut self, dim: BaseDimension, power: i32) -> Self {
        self.exponents[dim.index()] = Exponent::from_int(power);
        self
    }

    pub fn exponent(&self, dim: BaseDimension) -> Exponent {
        self.exponents[dim.index()]
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|e| e.is_zero())
    }

    /// Product of two quantities: exponents add. `None` if an exponent
    /// leaves the representable range.
    pub fn multiply(&self, other: &Self) -> Option<Self> {
        self.zip_with(other, Exponent::checked_add)
    }

    /// Quotient of two quantities: exponents subtract.
    pub fn divide(&self, other: &Self) -> Option<Self> {
        self.zip_with(other, Exponent::checked_sub)
    }

    /// Raises to a real power. Dimensionless stays dimensionless for every
    /// exponent; otherwise `None` if a scaled exponent is not representable.
    pub fn pow(&self, power: f64) -> Option<Self> {
        if self.is_dimensionless() {
            return Some(*self);
        }
        let mut exponents = [Exponent::ZERO; 7];
        for (out, e) in exponents.iter_mut().zip(self.exponents.iter()) {
            *out = e.scale(power)?;
        }
        Some(Self { exponents })
    }

    fn zip_with(&self, other: &Self, f: impl Fn(Exponent, Exponent) -> Option<Exponent>) -> Option<Self> {
        let mut exponents = self.exponents;
        for (out, &e) in exponents.iter_mut().zip(other.exponents.iter()) {
            *out = f(*out, e)?;
        }
        Some(Self { exponents })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        let parts: Vec<String> = BaseDimension::ALL
            .iter()
            .filter(|d| !self.exponent(**d).is_zero())
            .map(|d| {
                let e = self.exponent(*d);
                if e == Exponent::ONE {
                    d.symbol().to_string()
                } else {
                    format!("{}^{}", d.symbol(), e)
                }
            })
            .collect();
        write!(f, "{}", parts.join("·"))
    }
}

/// Wire form: a map of named exponents, absent entries are zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct DimensionsRepr {
    length: f64,
    mass: f64,
    time: f64,
    current: f64,
    temperature: f64,
    luminosity: f64,
    amount: f64,
}

impl TryFrom<DimensionsRepr> for Dimensions {
    type Error = String;

    fn try_from(r: DimensionsRepr) -> Result<Self, Self::Error> {
        let values = [r.length, r.mass, r.time, r.current, r.temperature, r.luminosity, r.amount];
        let mut exponents = [Exponent::ZERO; 7];
        for ((out, v), dim) in exponents.iter_mut().zip(values).zip(BaseDimension::ALL) {
            *out = Exponent::from_f64(v)
                .ok_or_else(|| format!("exponent {} for '{}' is out of range", v, dim.symbol()))?;
        }
        Ok(Self { exponents })
    }
}

impl From<Dimensions> for DimensionsRepr {
    fn from(d: Dimensions) -> Self {
        let e = |dim| d.exponent(dim).to_f64();
        Self {
            length: e(BaseDimension::Length),
            mass: e(BaseDimension::Mass),
            time: e(BaseDimension::Time),
            current: e(BaseDimension::Current),
            temperature: e(BaseDimension::Temperature),
            luminosity: e(BaseDimension::Luminosity),
            amount: e(BaseDimension::Amount),
        }
    }
}
