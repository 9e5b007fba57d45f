//! Dynamically-typed scalar values: the unit a literal expression carries,
//! the element a column yields, and the key a group-by partitions on.

use std::fmt;

use chrono::NaiveDateTime;

use crate::core::dtype::DType;

/// A single dynamically-typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Int64(i64),
    Float64(f64),
    Boolean(bool),
    Utf8(String),
    Datetime(NaiveDateTime),
}

impl Scalar {
    /// The dtype this scalar materializes as; `Null` has no dtype
    pub fn dtype(&self) -> Option<DType> {
        match self {
            Scalar::Null => None,
            Scalar::Int64(_) => Some(DType::Int64),
            Scalar::Float64(_) => Some(DType::Float64),
            Scalar::Boolean(_) => Some(DType::Boolean),
            Scalar::Utf8(_) => Some(DType::Utf8),
            Scalar::Datetime(_) => Some(DType::Datetime),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view as f64, when the scalar is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// A hashable key for grouping and join matching. Floats key on their
    /// bit pattern so that identical values land in the same bucket.
    pub fn key(&self) -> ScalarKey {
        match self {
            Scalar::Null => ScalarKey::Null,
            Scalar::Int64(v) => ScalarKey::Int64(*v),
            Scalar::Float64(v) => ScalarKey::FloatBits(v.to_bits()),
            Scalar::Boolean(v) => ScalarKey::Boolean(*v),
            Scalar::Utf8(v) => ScalarKey::Utf8(v.clone()),
            Scalar::Datetime(v) => ScalarKey::Datetime(v.and_utc().timestamp_micros()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Int64(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::Boolean(v) => write!(f, "{}", v),
            Scalar::Utf8(v) => write!(f, "\"{}\"", v),
            Scalar::Datetime(v) => write!(f, "{}", v),
        }
    }
}

/// Hashable, equality-comparable form of a scalar
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarKey {
    Null,
    Int64(i64),
    FloatBits(u64),
    Boolean(bool),
    Utf8(String),
    Datetime(i64),
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int64(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float64(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Boolean(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Utf8(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Utf8(v)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(v: NaiveDateTime) -> Self {
        Scalar::Datetime(v)
    }
}
