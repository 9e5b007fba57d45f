//! Shape and alignment rules for binary operands. These run before any
//! kernel is dispatched, so every engine rejects the same inputs with the
//! same errors.

use crate::backend::Backend;
use crate::core::error::{Error, Result};

/// Which operand (if any) must be broadcast before the kernel runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastSide {
    None,
    Left,
    Right,
}

/// Validate one binary operand pair.
///
/// Rules:
/// - a length-1 operand broadcasts against any length (this covers both
///   literals and aggregate results used elementwise);
/// - equal lengths above 1 must also agree on alignment labels when the
///   engine tracks them, label difference is a hard error rather than a
///   silent realignment;
/// - unequal lengths with neither side length-1 are a shape error;
/// - an unknown length (deferred engine) postpones all checks to collect.
pub fn validate_binary<B: Backend>(backend: &B, lhs: &B::Col, rhs: &B::Col) -> Result<BroadcastSide> {
    let (left_len, right_len) = (backend.col_len(lhs), backend.col_len(rhs));
    let (left_len, right_len) = match (left_len, right_len) {
        (Some(l), Some(r)) => (l, r),
        _ => return Ok(BroadcastSide::None),
    };

    if left_len == right_len {
        if left_len > 1 {
            check_alignment(backend, lhs, rhs)?;
        }
        return Ok(BroadcastSide::None);
    }
    if left_len == 1 {
        return Ok(BroadcastSide::Left);
    }
    if right_len == 1 {
        return Ok(BroadcastSide::Right);
    }
    Err(Error::ShapeMismatch {
        left: left_len,
        right: right_len,
    })
}

fn check_alignment<B: Backend>(backend: &B, lhs: &B::Col, rhs: &B::Col) -> Result<()> {
    let (left, right) = match (backend.alignment(lhs), backend.alignment(rhs)) {
        (Some(l), Some(r)) => (l, r),
        _ => return Ok(()),
    };
    if left == right {
        return Ok(());
    }
    let first_diff = left
        .iter()
        .zip(right.iter())
        .position(|(a, b)| a != b)
        .map(|pos| format!("first difference at row {}", pos))
        .unwrap_or_else(|| "label sets differ".to_string());
    Err(Error::AlignmentMismatch(format!(
        "operands carry different row labels ({})",
        first_diff
    )))
}
