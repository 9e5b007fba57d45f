//! Backend-neutral compute kernels. Both eager adapters (and the lazy plan
//! replay) dispatch every elementwise and aggregate primitive through this
//! module, so the three engines cannot diverge numerically.
//!
//! Numeric lanes: narrow inputs (Int32, Float32) are upcast to the 64-bit
//! lane on entry, so kernels only exist for Int64, Float64, Boolean, Utf8
//! and Datetime.

pub mod rows;

use rayon::prelude::*;

use crate::column::{BooleanColumn, Column, Float64Column, Int64Column};
use crate::config::EngineConfig;
use crate::core::dtype::DType;
use crate::core::error::{Error, Result};
use crate::core::scalar::Scalar;
use crate::expr::ops::{AggKind, BinOp, UnaryOp};

/// Floor-toward-negative-infinity integer division: `-7 // 2 == -4`.
/// Rust's native `/` truncates toward zero, so the quotient is corrected
/// whenever the remainder is nonzero and the signs differ.
pub fn floor_div_i64(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let q = a.wrapping_div(b);
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Modulo paired with floor division: `-7 % 2 == 1`
pub fn floor_mod_i64(a: i64, b: i64) -> Option<i64> {
    floor_div_i64(a, b).map(|q| a.wrapping_sub(q.wrapping_mul(b)))
}

fn floor_div_f64(a: f64, b: f64) -> f64 {
    (a / b).floor()
}

fn floor_mod_f64(a: f64, b: f64) -> f64 {
    a - (a / b).floor() * b
}

/// Cast a column to a target dtype. Only the upcasts the coercion rules
/// produce are supported.
pub fn cast_column(col: &Column, to: DType) -> Result<Column> {
    if col.dtype() == to {
        return Ok(col.clone());
    }
    match (col, to) {
        (Column::Int32(c), DType::Int64) => Ok(Column::Int64(Int64Column::from_options(
            c.to_i64_options(),
        ))),
        (_, DType::Float64) if col.dtype().is_numeric() => Ok(Column::Float64(
            Float64Column::from_options(to_f64_opts(col)?),
        )),
        (_, DType::Int64) if col.dtype().is_integer() => Ok(Column::Int64(
            Int64Column::from_options(to_i64_opts(col)?),
        )),
        _ => Err(Error::Cast {
            from: col.dtype().to_string(),
            to: to.to_string(),
        }),
    }
}

fn to_i64_opts(col: &Column) -> Result<Vec<Option<i64>>> {
    match col {
        Column::Int32(c) => Ok(c.to_i64_options()),
        Column::Int64(c) => Ok(c.to_options()),
        _ => Err(Error::Cast {
            from: col.dtype().to_string(),
            to: DType::Int64.to_string(),
        }),
    }
}

fn to_f64_opts(col: &Column) -> Result<Vec<Option<f64>>> {
    match col {
        Column::Int32(c) => Ok(c
            .to_i64_options()
            .into_iter()
            .map(|v| v.map(|x| x as f64))
            .collect()),
        Column::Int64(c) => Ok(c
            .to_options()
            .into_iter()
            .map(|v| v.map(|x| x as f64))
            .collect()),
        Column::Float32(c) => Ok(c.to_f64_options()),
        Column::Float64(c) => Ok(c.to_options()),
        _ => Err(Error::Cast {
            from: col.dtype().to_string(),
            to: DType::Float64.to_string(),
        }),
    }
}

/// Elementwise zip over two optional-value slices; a null on either side
/// yields a null, and the kernel itself may produce one (division by zero)
fn zip_opts<T, U, F>(lhs: &[Option<T>], rhs: &[Option<T>], f: F) -> Vec<Option<U>>
where
    T: Copy + Send + Sync,
    U: Send,
    F: Fn(T, T) -> Option<U> + Sync,
{
    lhs.par_iter()
        .zip(rhs.par_iter())
        .map(|(a, b)| match (a, b) {
            (Some(x), Some(y)) => f(*x, *y),
            _ => None,
        })
        .collect()
}

fn unsupported(op: impl ToString, left: DType, right: DType) -> Error {
    Error::UnsupportedOperation {
        op: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

/// Apply one binary operator elementwise to two equal-length columns,
/// after dtype coercion. Shape and alignment validation happen before this
/// is called; only dtype errors originate here.
pub fn binary_column(op: BinOp, lhs: &Column, rhs: &Column, cfg: &EngineConfig) -> Result<Column> {
    let (lt, rt) = (lhs.dtype(), rhs.dtype());
    debug_assert_eq!(lhs.len(), rhs.len());

    if op.is_logical() {
        if lt != DType::Boolean || rt != DType::Boolean {
            return Err(unsupported(op, lt, rt));
        }
        let l = lhs.as_boolean().map(|c| c.to_options()).unwrap_or_default();
        let r = rhs.as_boolean().map(|c| c.to_options()).unwrap_or_default();
        let out = match op {
            BinOp::And => zip_opts(&l, &r, |a, b| Some(a && b)),
            _ => zip_opts(&l, &r, |a, b| Some(a || b)),
        };
        return Ok(Column::Boolean(BooleanColumn::from_options(out)));
    }

    if op.is_comparison() {
        return compare_columns(op, lhs, rhs);
    }

    // Elementwise extrema are defined wherever comparisons are
    if matches!(op, BinOp::Minimum | BinOp::Maximum) && !lt.is_numeric() {
        return minmax_non_numeric(op, lhs, rhs);
    }

    if !lt.is_numeric() || !rt.is_numeric() {
        return Err(unsupported(op, lt, rt));
    }

    let coerced = DType::coerce_numeric(lt, rt)?.compute_lane();
    let lane = match op {
        // True division always promotes
        BinOp::Div => DType::Float64,
        _ => coerced,
    };

    if lane == DType::Int64 {
        let l = to_i64_opts(lhs)?;
        let r = to_i64_opts(rhs)?;
        let out: Vec<Option<i64>> = match op {
            BinOp::Add => zip_opts(&l, &r, |a, b| Some(a.wrapping_add(b))),
            BinOp::Sub => zip_opts(&l, &r, |a, b| Some(a.wrapping_sub(b))),
            BinOp::Mul => zip_opts(&l, &r, |a, b| Some(a.wrapping_mul(b))),
            BinOp::FloorDiv => zip_opts(&l, &r, floor_div_i64),
            BinOp::Mod => zip_opts(&l, &r, floor_mod_i64),
            BinOp::Minimum => zip_opts(&l, &r, |a, b| Some(a.min(b))),
            BinOp::Maximum => zip_opts(&l, &r, |a, b| Some(a.max(b))),
            BinOp::Pow => return integer_pow(&l, &r, cfg),
            _ => return Err(unsupported(op, lt, rt)),
        };
        return Ok(Column::Int64(Int64Column::from_options(out)));
    }

    let l = to_f64_opts(lhs)?;
    let r = to_f64_opts(rhs)?;
    let out: Vec<Option<f64>> = match op {
        BinOp::Add => zip_opts(&l, &r, |a, b| Some(a + b)),
        BinOp::Sub => zip_opts(&l, &r, |a, b| Some(a - b)),
        BinOp::Mul => zip_opts(&l, &r, |a, b| Some(a * b)),
        BinOp::Div => zip_opts(&l, &r, |a, b| Some(a / b)),
        BinOp::FloorDiv => zip_opts(&l, &r, |a, b| Some(floor_div_f64(a, b))),
        BinOp::Mod => zip_opts(&l, &r, |a, b| Some(floor_mod_f64(a, b))),
        BinOp::Pow => zip_opts(&l, &r, |a, b| Some(a.powf(b))),
        BinOp::Minimum => zip_opts(&l, &r, |a, b| Some(a.min(b))),
        BinOp::Maximum => zip_opts(&l, &r, |a, b| Some(a.max(b))),
        _ => return Err(unsupported(op, lt, rt)),
    };
    Ok(Column::Float64(Float64Column::from_options(out)))
}

/// Integer power. A negative exponent cannot stay integer-typed: from API
/// version 1.0 the whole result promotes to Float64, before 1.0 it is an
/// unsupported operation (the one version-gated behavior revision).
fn integer_pow(l: &[Option<i64>], r: &[Option<i64>], cfg: &EngineConfig) -> Result<Column> {
    let has_negative = r.iter().any(|v| matches!(v, Some(x) if *x < 0));
    if has_negative {
        if !cfg.api_version.negative_int_pow_promotes() {
            return Err(Error::UnsupportedOperation {
                op: "** with negative exponent".to_string(),
                left: DType::Int64.to_string(),
                right: DType::Int64.to_string(),
            });
        }
        let out = zip_opts(l, r, |a, b| Some((a as f64).powf(b as f64)));
        return Ok(Column::Float64(Float64Column::from_options(out)));
    }
    let out = zip_opts(l, r, |a, b| {
        u32::try_from(b).ok().and_then(|e| a.checked_pow(e))
    });
    Ok(Column::Int64(Int64Column::from_options(out)))
}

fn compare_columns(op: BinOp, lhs: &Column, rhs: &Column) -> Result<Column> {
    let (lt, rt) = (lhs.dtype(), rhs.dtype());

    let out: Vec<Option<bool>> = if lt.is_numeric() && rt.is_numeric() {
        let lane = DType::coerce_numeric(lt, rt)?.compute_lane();
        if lane == DType::Int64 {
            let l = to_i64_opts(lhs)?;
            let r = to_i64_opts(rhs)?;
            zip_opts(&l, &r, |a, b| Some(apply_cmp(op, a.cmp(&b))))
        } else {
            let l = to_f64_opts(lhs)?;
            let r = to_f64_opts(rhs)?;
            zip_opts(&l, &r, |a, b| {
                a.partial_cmp(&b).map(|ord| apply_cmp(op, ord))
            })
        }
    } else {
        match (lhs, rhs) {
            (Column::String(l), Column::String(r)) => {
                let l = l.to_options();
                let r = r.to_options();
                l.iter()
                    .zip(r.iter())
                    .map(|(a, b)| match (a, b) {
                        (Some(x), Some(y)) => Some(apply_cmp(op, x.cmp(y))),
                        _ => None,
                    })
                    .collect()
            }
            (Column::Boolean(l), Column::Boolean(r)) => {
                let l = l.to_options();
                let r = r.to_options();
                zip_opts(&l, &r, |a, b| Some(apply_cmp(op, a.cmp(&b))))
            }
            (Column::Datetime(l), Column::Datetime(r)) => {
                let l = l.to_options();
                let r = r.to_options();
                zip_opts(&l, &r, |a, b| Some(apply_cmp(op, a.cmp(&b))))
            }
            _ => return Err(unsupported(op, lt, rt)),
        }
    };
    Ok(Column::Boolean(BooleanColumn::from_options(out)))
}

fn apply_cmp(op: BinOp, ord: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinOp::Eq => ord == Equal,
        BinOp::NotEq => ord != Equal,
        BinOp::Lt => ord == Less,
        BinOp::LtEq => ord != Greater,
        BinOp::Gt => ord == Greater,
        BinOp::GtEq => ord != Less,
        _ => unreachable!("apply_cmp called with non-comparison operator"),
    }
}

fn minmax_non_numeric(op: BinOp, lhs: &Column, rhs: &Column) -> Result<Column> {
    match (lhs, rhs) {
        (Column::String(l), Column::String(r)) => {
            let l = l.to_options();
            let r = r.to_options();
            let out: Vec<Option<String>> = l
                .into_iter()
                .zip(r)
                .map(|(a, b)| match (a, b) {
                    (Some(x), Some(y)) => Some(if matches!(op, BinOp::Minimum) {
                        x.min(y)
                    } else {
                        x.max(y)
                    }),
                    _ => None,
                })
                .collect();
            Ok(Column::String(crate::column::StringColumn::from_options(
                out,
            )))
        }
        (Column::Datetime(l), Column::Datetime(r)) => {
            let l = l.to_options();
            let r = r.to_options();
            let out = zip_opts(&l, &r, |a, b| {
                Some(if matches!(op, BinOp::Minimum) {
                    a.min(b)
                } else {
                    a.max(b)
                })
            });
            Ok(Column::Datetime(
                crate::column::DatetimeColumn::from_options(out),
            ))
        }
        _ => Err(unsupported(op, lhs.dtype(), rhs.dtype())),
    }
}

/// Apply one unary operator elementwise
pub fn unary_column(op: UnaryOp, operand: &Column) -> Result<Column> {
    match op {
        UnaryOp::Neg => match operand.dtype() {
            d if d.is_integer() => {
                let vals = to_i64_opts(operand)?;
                let out: Vec<Option<i64>> =
                    vals.into_iter().map(|v| v.map(i64::wrapping_neg)).collect();
                Ok(Column::Int64(Int64Column::from_options(out)))
            }
            d if d.is_float() => {
                let vals = to_f64_opts(operand)?;
                let out: Vec<Option<f64>> = vals.into_iter().map(|v| v.map(|x| -x)).collect();
                Ok(Column::Float64(Float64Column::from_options(out)))
            }
            other => Err(unsupported("-", other, other)),
        },
        UnaryOp::Not => match operand {
            Column::Boolean(c) => {
                let out: Vec<Option<bool>> =
                    c.to_options().into_iter().map(|v| v.map(|x| !x)).collect();
                Ok(Column::Boolean(BooleanColumn::from_options(out)))
            }
            _ => Err(unsupported("!", operand.dtype(), operand.dtype())),
        },
    }
}

/// Aggregate a column to a length-1 column. NULL elements are skipped;
/// `sum` of an empty or all-null column is zero, the other aggregates
/// produce a NULL.
pub fn aggregate_column(kind: AggKind, operand: &Column) -> Result<Column> {
    let dtype = operand.dtype();
    let scalar = match kind {
        AggKind::Count => {
            let non_null = (0..operand.len())
                .map(|i| operand.get_scalar(i))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .filter(|s| !s.is_null())
                .count();
            Scalar::Int64(non_null as i64)
        }
        AggKind::Sum => match dtype.compute_lane() {
            DType::Int64 => {
                let vals = to_i64_opts(operand)?;
                Scalar::Int64(vals.into_iter().flatten().sum())
            }
            DType::Float64 => {
                let vals = to_f64_opts(operand)?;
                Scalar::Float64(vals.into_iter().flatten().sum())
            }
            _ => return Err(unsupported("sum", dtype, dtype)),
        },
        AggKind::Mean => {
            if !dtype.is_numeric() {
                return Err(unsupported("mean", dtype, dtype));
            }
            let vals: Vec<f64> = to_f64_opts(operand)?.into_iter().flatten().collect();
            if vals.is_empty() {
                Scalar::Null
            } else {
                Scalar::Float64(vals.iter().sum::<f64>() / vals.len() as f64)
            }
        }
        AggKind::Min | AggKind::Max => aggregate_extremum(kind, operand)?,
    };
    Ok(Column::from_scalar(&scalar))
}

fn aggregate_extremum(kind: AggKind, operand: &Column) -> Result<Scalar> {
    let dtype = operand.dtype();
    let want_min = matches!(kind, AggKind::Min);
    Ok(match dtype.compute_lane() {
        DType::Int64 => {
            let it = to_i64_opts(operand)?.into_iter().flatten();
            let found = if want_min { it.min() } else { it.max() };
            found.map(Scalar::Int64).unwrap_or(Scalar::Null)
        }
        DType::Float64 => {
            let vals: Vec<f64> = to_f64_opts(operand)?.into_iter().flatten().collect();
            if vals.is_empty() {
                Scalar::Null
            } else {
                let init = vals[0];
                let folded = vals.into_iter().fold(init, |acc, v| {
                    if want_min {
                        acc.min(v)
                    } else {
                        acc.max(v)
                    }
                });
                Scalar::Float64(folded)
            }
        }
        DType::Utf8 => {
            let it = operand
                .as_string()
                .map(|c| c.to_options())
                .unwrap_or_default()
                .into_iter()
                .flatten();
            let found = if want_min { it.min() } else { it.max() };
            found.map(Scalar::Utf8).unwrap_or(Scalar::Null)
        }
        DType::Datetime => {
            let it = operand
                .as_datetime()
                .map(|c| c.to_options())
                .unwrap_or_default()
                .into_iter()
                .flatten();
            let found = if want_min { it.min() } else { it.max() };
            found.map(Scalar::Datetime).unwrap_or(Scalar::Null)
        }
        _ => return Err(unsupported(kind, dtype, dtype)),
    })
}

/// Broadcast a length-1 column to `len` rows by repeating its value
pub fn repeat_column(col: &Column, len: usize) -> Result<Column> {
    if col.len() != 1 {
        return Err(Error::InvalidOperation(format!(
            "broadcast source must have length 1, found {}",
            col.len()
        )));
    }
    let value = col.get_scalar(0)?;
    Column::from_scalars(vec![value; len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        assert_eq!(floor_div_i64(-7, 2), Some(-4));
        assert_eq!(floor_div_i64(7, -2), Some(-4));
        assert_eq!(floor_div_i64(-7, -2), Some(3));
        assert_eq!(floor_div_i64(7, 2), Some(3));
        assert_eq!(floor_div_i64(7, 0), None);
    }

    #[test]
    fn floor_modulo_matches_floor_division() {
        assert_eq!(floor_mod_i64(-7, 2), Some(1));
        assert_eq!(floor_mod_i64(7, -2), Some(-1));
        assert_eq!(floor_mod_i64(-7, -2), Some(-1));
        assert_eq!(floor_mod_i64(7, 2), Some(1));
        // identity a == (a // b) * b + (a % b)
        for a in -25i64..=25 {
            for b in [-7i64, -3, -1, 1, 2, 5] {
                let q = floor_div_i64(a, b).unwrap();
                let r = floor_mod_i64(a, b).unwrap();
                assert_eq!(q * b + r, a, "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn true_division_promotes_to_float() {
        let cfg = EngineConfig::default();
        let l = Column::Int64(Int64Column::new(vec![1, 2, 3]));
        let r = Column::Int64(Int64Column::new(vec![2, 2, 2]));
        let out = binary_column(BinOp::Div, &l, &r, &cfg).unwrap();
        assert_eq!(out.dtype(), DType::Float64);
        assert_eq!(out.as_float64().unwrap().values(), &[0.5, 1.0, 1.5]);
    }

    #[test]
    fn integer_division_by_zero_is_null() {
        let cfg = EngineConfig::default();
        let l = Column::Int64(Int64Column::new(vec![4, 5]));
        let r = Column::Int64(Int64Column::new(vec![2, 0]));
        let out = binary_column(BinOp::FloorDiv, &l, &r, &cfg).unwrap();
        let col = out.as_int64().unwrap();
        assert_eq!(col.get(0).unwrap(), Some(2));
        assert_eq!(col.get(1).unwrap(), None);
    }

    #[test]
    fn modulo_on_strings_is_unsupported() {
        let cfg = EngineConfig::default();
        let l = Column::String(crate::column::StringColumn::from_strs(&["a", "b"]));
        let r = Column::Int64(Int64Column::new(vec![2, 2]));
        assert!(matches!(
            binary_column(BinOp::Mod, &l, &r, &cfg),
            Err(Error::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn sum_skips_nulls_and_mean_promotes() {
        let col = Column::Int64(Int64Column::from_options(vec![Some(1), None, Some(5)]));
        let sum = aggregate_column(AggKind::Sum, &col).unwrap();
        assert_eq!(sum.get_scalar(0).unwrap(), Scalar::Int64(6));
        let mean = aggregate_column(AggKind::Mean, &col).unwrap();
        assert_eq!(mean.get_scalar(0).unwrap(), Scalar::Float64(3.0));
        let count = aggregate_column(AggKind::Count, &col).unwrap();
        assert_eq!(count.get_scalar(0).unwrap(), Scalar::Int64(2));
    }
}
