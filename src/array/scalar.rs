//! Scalar values and element types
//!
//! Arrays hold one of three element types. Mixed inputs are promoted along
//! `Bool < Int < Float`, so a list of ints with a single float becomes a
//! float array.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Element type of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int,
    Float,
}

impl DType {
    /// Smallest type that can represent both operands
    pub fn promote(self, other: DType) -> DType {
        self.max(other)
    }

    /// Type produced by add/sub/mul/pow (booleans count as integers)
    pub fn arithmetic(self, other: DType) -> DType {
        match self.promote(other) {
            DType::Bool => DType::Int,
            dtype => dtype,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int => "int64",
            DType::Float => "float64",
        }
    }

    /// Bytes per element, used for buffer size reporting
    pub fn item_size(&self) -> usize {
        match self {
            DType::Bool => 1,
            DType::Int | DType::Float => 8,
        }
    }

    /// Additive identity of this type
    pub fn zero(&self) -> Scalar {
        match self {
            DType::Bool => Scalar::Bool(false),
            DType::Int => Scalar::Int(0),
            DType::Float => Scalar::Float(0.0),
        }
    }
}

/// A single array element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::Int(_) => DType::Int,
            Scalar::Float(_) => DType::Float,
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Int(i) => i as f64,
            Scalar::Float(v) => v,
        }
    }

    /// Integer view; floats truncate toward zero
    pub fn to_i64(self) -> i64 {
        match self {
            Scalar::Bool(b) => b as i64,
            Scalar::Int(i) => i,
            Scalar::Float(v) => v as i64,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i != 0,
            Scalar::Float(v) => v != 0.0,
        }
    }

    /// Convert to another element type
    pub fn cast(self, dtype: DType) -> Scalar {
        match dtype {
            DType::Bool => Scalar::Bool(self.is_truthy()),
            DType::Int => Scalar::Int(self.to_i64()),
            DType::Float => Scalar::Float(self.to_f64()),
        }
    }

    /// Ordering used by min/max/median. Integers compare exactly; anything
    /// involving a float compares as f64 with NaN sorting last.
    pub fn total_cmp(&self, other: &Scalar) -> Ordering {
        match (self.dtype(), other.dtype()) {
            (DType::Float, _) | (_, DType::Float) => self.to_f64().total_cmp(&other.to_f64()),
            _ => self.to_i64().cmp(&other.to_i64()),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

/// Render a float the way an interactive numeric shell does: integral values
/// keep a trailing `.0`, very large or small magnitudes use exponent form.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", v);
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An explicit precision formats every type as a fixed-point number
        if let Some(precision) = f.precision() {
            let v = self.to_f64();
            if !v.is_finite() {
                return write!(f, "{}", format_float(v));
            }
            return write!(f, "{:.*}", precision, v);
        }
        match self {
            Scalar::Bool(true) => write!(f, "True"),
            Scalar::Bool(false) => write!(f, "False"),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", format_float(*v)),
        }
    }
}
