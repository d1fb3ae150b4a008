// src/units/parser.rs
//! A deliberately small unit-string parser: products and one quotient of
//! symbols with optional exponents, e.g. "kg*m/s^2", "m^0.5", "1/s".

use super::dimensions::{BaseDimension, Dimensions};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitParseError {
    #[error("empty unit string")]
    Empty,
    #[error("more than one '/' in unit string")]
    MultipleDivisions,
    #[error("empty factor in unit string")]
    EmptyFactor,
    #[error("invalid exponent '{0}'")]
    InvalidExponent(String),
    #[error("unknown unit symbol '{0}'")]
    UnknownSymbol(String),
    #[error("exponent out of range in '{0}'")]
    ExponentOverflow(String),
}

/// Parses a unit string into its dimensions. Scale prefixes (km, ms, ...)
/// are accepted but only the dimension is kept.
pub fn parse_unit(s: &str) -> Result<Dimensions, UnitParseError> {
    if s.trim().is_empty() {
        return Err(UnitParseError::Empty);
    }

    let mut dims = Dimensions::DIMENSIONLESS;
    let mut parts = s.split('/');

    if let Some(num) = parts.next() {
        dims = parse_product(num)?;
    }
    if let Some(den) = parts.next() {
        dims = dims.divide(&parse_product(den)?).ok_or_else(|| UnitParseError::ExponentOverflow(s.to_string()))?;
    }
    if parts.next().is_some() {
        return Err(UnitParseError::MultipleDivisions);
    }

    Ok(dims)
}

fn parse_product(s: &str) -> Result<Dimensions, UnitParseError> {
    let s = s.trim();
    if s == "1" {
        return Ok(Dimensions::DIMENSIONLESS);
    }
    if s.is_empty() {
        return Err(UnitParseError::EmptyFactor);
    }

    let mut dims = Dimensions::DIMENSIONLESS;
    for factor in s.split('*') {
        let mut pieces = factor.splitn(2, '^');
        let base = pieces.next().unwrap_or("").trim();
        if base.is_empty() {
            return Err(UnitParseError::EmptyFactor);
        }

        let power = match pieces.next() {
            Some(exp) => {
                let exp = exp.trim().trim_start_matches('(').trim_end_matches(')');
                exp.parse::<f64>().map_err(|_| UnitParseError::InvalidExponent(exp.to_string()))?
            }
            None => 1.0,
        };

        let symbol = lookup_symbol(base).ok_or_else(|| UnitParseError::UnknownSymbol(base.to_string()))?;
        let raised = symbol.pow(power).ok_or_else(|| UnitParseError::InvalidExponent(power.to_string()))?;
        dims = dims.multiply(&raised).ok_or_else(|| UnitParseError::ExponentOverflow(s.to_string()))?;
    }
    Ok(dims)
}

fn lookup_symbol(symbol: &str) -> Option<Dimensions> {
    use BaseDimension::*;
    let d = Dimensions::DIMENSIONLESS;

    let dims = match symbol {
        "1" => d,
        // Base units and common scaled forms
        "m" | "km" | "cm" | "mm" | "um" | "nm" | "pm" | "au" | "pc" | "ly" => d.with(Length, 1),
        "kg" | "g" | "mg" | "ug" | "t" => d.with(Mass, 1),
        "s" | "ms" | "us" | "ns" | "min" | "h" | "hr" | "day" | "d" | "yr" => d.with(Time, 1),
        "A" | "mA" => d.with(Current, 1),
        "K" => d.with(Temperature, 1),
        "cd" => d.with(Luminosity, 1),
        "mol" | "mmol" => d.with(Amount, 1),
        // Derived units
        "Hz" | "kHz" | "MHz" => d.with(Time, -1),
        "N" | "kN" => d.with(Mass, 1).with(Length, 1).with(Time, -2),
        "J" | "kJ" | "eV" => d.with(Mass, 1).with(Length, 2).with(Time, -2),
        "W" | "kW" | "MW" => d.with(Mass, 1).with(Length, 2).with(Time, -3),
        "Pa" | "kPa" | "bar" => d.with(Mass, 1).with(Length, -1).with(Time, -2),
        "C" => d.with(Current, 1).with(Time, 1),
        "V" => d.with(Mass, 1).with(Length, 2).with(Time, -3).with(Current, -1),
        "Ohm" | "Ω" => d.with(Mass, 1).with(Length, 2).with(Time, -3).with(Current, -2),
        "F" => d.with(Mass, -1).with(Length, -2).with(Time, 4).with(Current, 2),
        "T" => d.with(Mass, 1).with(Time, -2).with(Current, -1),
        "L" | "mL" => d.with(Length, 3),
        _ => return None,
    };
    Some(dims)
}
