// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::float_cmp, clippy::as_conversions)]

use core::cmp::Ordering;
use core::fmt::{Debug, Display, Formatter};
use core::str::FromStr;

use anyhow::{bail, Result};

use crate::compare::CompareOp;

/// Transient numeric view used by comparisons and numeric coercions.
///
/// A `NaN` double is never stored as `Double`; it is normalized to `NaN` so
/// that comparisons only have to check one variant.
#[derive(Clone, Copy)]
pub enum GenericNumber {
    Integer(i64),
    Double(f64),
    NaN,
}

impl GenericNumber {
    pub fn nan() -> Self {
        GenericNumber::NaN
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, GenericNumber::NaN)
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            GenericNumber::Integer(i) => *i as f64,
            GenericNumber::Double(d) => *d,
            GenericNumber::NaN => f64::NAN,
        }
    }

    /// Integer view of the number. Doubles saturate at the i64 bounds.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GenericNumber::Integer(i) => Some(*i),
            GenericNumber::Double(d) => Some(*d as i64),
            GenericNumber::NaN => None,
        }
    }

    /// Parse a textual number. Integers are tried first so that "10" stays
    /// exact, then doubles. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Some(GenericNumber::Integer(i));
        }
        s.parse::<f64>().ok().map(GenericNumber::from)
    }

    /// Total ordering used by the comparison engine. `None` means at least
    /// one side is NaN.
    pub fn partial_order(&self, rhs: &GenericNumber) -> Option<Ordering> {
        match (self, rhs) {
            (GenericNumber::NaN, _) | (_, GenericNumber::NaN) => None,
            (GenericNumber::Integer(l), GenericNumber::Integer(r)) => Some(l.cmp(r)),
            (l, r) => {
                let (l, r) = (l.as_f64(), r.as_f64());
                if (l - r).abs() < f64::EPSILON || l == r {
                    Some(Ordering::Equal)
                } else if l < r {
                    Some(Ordering::Less)
                } else {
                    Some(Ordering::Greater)
                }
            }
        }
    }

    pub fn compare(&self, rhs: &GenericNumber, op: CompareOp) -> bool {
        match self.partial_order(rhs) {
            Some(ordering) => op.matches(ordering),
            None => op == CompareOp::NE,
        }
    }
}

impl From<i64> for GenericNumber {
    fn from(i: i64) -> Self {
        GenericNumber::Integer(i)
    }
}

impl From<f64> for GenericNumber {
    fn from(d: f64) -> Self {
        if d.is_nan() {
            GenericNumber::NaN
        } else {
            GenericNumber::Double(d)
        }
    }
}

impl From<bool> for GenericNumber {
    fn from(b: bool) -> Self {
        GenericNumber::Integer(i64::from(b))
    }
}

impl FromStr for GenericNumber {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match GenericNumber::parse(s) {
            Some(n) => Ok(n),
            None => bail!("`{s}` is not a number"),
        }
    }
}

impl PartialEq for GenericNumber {
    fn eq(&self, other: &Self) -> bool {
        self.partial_order(other) == Some(Ordering::Equal)
    }
}

impl Debug for GenericNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GenericNumber::Integer(i) => write!(f, "Integer({i})"),
            GenericNumber::Double(d) => write!(f, "Double({d})"),
            GenericNumber::NaN => f.write_str("NaN"),
        }
    }
}

impl Display for GenericNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            GenericNumber::Integer(i) => write!(f, "{i}"),
            GenericNumber::Double(d) => f.write_str(&format_double(*d)),
            GenericNumber::NaN => f.write_str("nan"),
        }
    }
}

/// Shortest round-trip rendering of a double, keeping a trailing `.0` for
/// integral values so that doubles stay distinguishable from integers.
pub fn format_double(d: f64) -> String {
    if d.is_nan() {
        return "nan".to_string();
    }
    if d.is_infinite() {
        return if d > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let s = format!("{d}");
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}
