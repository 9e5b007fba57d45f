//! Logical dtype model and the numeric coercion rules used to decide the
//! result dtype of a binary operation.

use std::fmt;

use crate::core::error::{Error, Result};

/// Enum identifying the logical type of a column or scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    Utf8,
    Datetime,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int32 => "Int32",
            DType::Int64 => "Int64",
            DType::Float32 => "Float32",
            DType::Float64 => "Float64",
            DType::Boolean => "Boolean",
            DType::Utf8 => "Utf8",
            DType::Datetime => "Datetime",
        };
        write!(f, "{}", name)
    }
}

impl DType {
    /// Whether this dtype takes part in arithmetic coercion
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DType::Int32 | DType::Int64 | DType::Float32 | DType::Float64
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, DType::Int32 | DType::Int64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// The 64-bit lane this dtype is computed in. Narrow numeric inputs are
    /// upcast on entry to a kernel; integer widths never mix inside one.
    pub fn compute_lane(&self) -> DType {
        match self {
            DType::Int32 | DType::Int64 => DType::Int64,
            DType::Float32 | DType::Float64 => DType::Float64,
            other => *other,
        }
    }

    /// Result dtype of an additive/multiplicative operation between two
    /// numeric dtypes. Commutative by construction: integer with float
    /// promotes to float, a narrower width promotes to the wider one.
    pub fn coerce_numeric(left: DType, right: DType) -> Result<DType> {
        if !left.is_numeric() || !right.is_numeric() {
            return Err(Error::UnsupportedOperation {
                op: "arithmetic".to_string(),
                left: left.to_string(),
                right: right.to_string(),
            });
        }
        if left.is_float() || right.is_float() {
            Ok(DType::Float64.min_width_with(left, right))
        } else {
            // Both integers: wider width wins
            if left == DType::Int64 || right == DType::Int64 {
                Ok(DType::Int64)
            } else {
                Ok(DType::Int32)
            }
        }
    }

    fn min_width_with(self, left: DType, right: DType) -> DType {
        // Float32 is only preserved when no 64-bit operand is involved
        if left == DType::Float32 && right == DType::Float32 {
            DType::Float32
        } else {
            DType::Float64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_is_commutative() {
        let pairs = [
            (DType::Int32, DType::Int64),
            (DType::Int64, DType::Float64),
            (DType::Int32, DType::Float32),
            (DType::Float32, DType::Float64),
        ];
        for (a, b) in pairs {
            assert_eq!(
                DType::coerce_numeric(a, b).unwrap(),
                DType::coerce_numeric(b, a).unwrap()
            );
        }
    }

    #[test]
    fn integer_widths_widen() {
        assert_eq!(
            DType::coerce_numeric(DType::Int32, DType::Int64).unwrap(),
            DType::Int64
        );
        assert_eq!(
            DType::coerce_numeric(DType::Int32, DType::Int32).unwrap(),
            DType::Int32
        );
    }

    #[test]
    fn float_always_wins() {
        assert_eq!(
            DType::coerce_numeric(DType::Int64, DType::Float32).unwrap(),
            DType::Float64
        );
        assert_eq!(
            DType::coerce_numeric(DType::Float32, DType::Float32).unwrap(),
            DType::Float32
        );
    }

    #[test]
    fn strings_do_not_coerce() {
        assert!(DType::coerce_numeric(DType::Utf8, DType::Int64).is_err());
    }
}
