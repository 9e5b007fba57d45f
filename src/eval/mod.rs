//! The expression evaluator: walks an expression tree against one frame of
//! one backend, validating shapes and broadcasting as it goes. Both eager
//! facades and the lazy plan replay run through this single code path.

pub mod validate;

use crate::backend::Backend;
use crate::core::error::{Error, Result};
use crate::expr::node::Expr;

pub use validate::{validate_binary, BroadcastSide};

/// Whether a projection replaces the frame or extends it. Extension pins
/// the output length to the frame height; replacement derives it from the
/// expressions themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectTarget {
    Select,
    WithColumns,
}

/// Evaluate one expression against a frame, producing a backend operand.
/// `AllColumns` must have been expanded before this point.
pub fn evaluate<B: Backend>(backend: &B, frame: &B::Frame, expr: &Expr) -> Result<B::Col> {
    match expr {
        Expr::ColumnRef(name) => backend.get_column(frame, name),
        Expr::Literal(value) => backend.literal(value),
        Expr::AllColumns => Err(Error::InvalidOperation(
            "all() is only valid at the top level of select, with_columns or agg".to_string(),
        )),
        Expr::BinaryOp { op, left, right } => {
            let lhs = evaluate(backend, frame, left)?;
            let rhs = evaluate(backend, frame, right)?;
            apply_binary(backend, *op, lhs, rhs)
        }
        Expr::UnaryOp { op, operand } => {
            let col = evaluate(backend, frame, operand)?;
            backend.unary(*op, &col)
        }
        Expr::Aggregate { kind, operand } => {
            let col = evaluate(backend, frame, operand)?;
            backend.aggregate(*kind, &col)
        }
        Expr::HorizontalReduce { kind, operands } => {
            if operands.is_empty() {
                return Err(Error::InvalidOperation(format!(
                    "{} needs at least one operand",
                    kind
                )));
            }
            let op = kind.fold_op();
            let mut acc = evaluate(backend, frame, &operands[0])?;
            for operand in &operands[1..] {
                let next = evaluate(backend, frame, operand)?;
                acc = apply_binary(backend, op, acc, next)?;
            }
            Ok(acc)
        }
        Expr::Alias { inner, name } => {
            let col = evaluate(backend, frame, inner)?;
            Ok(backend.rename(&col, name))
        }
    }
}

pub(crate) fn apply_binary<B: Backend>(
    backend: &B,
    op: crate::expr::ops::BinOp,
    lhs: B::Col,
    rhs: B::Col,
) -> Result<B::Col> {
    let (lhs, rhs) = match validate_binary(backend, &lhs, &rhs)? {
        BroadcastSide::None => (lhs, rhs),
        BroadcastSide::Left => (backend.broadcast_like(&lhs, &rhs)?, rhs),
        BroadcastSide::Right => {
            let broadcast = backend.broadcast_like(&rhs, &lhs)?;
            (lhs, broadcast)
        }
    };
    backend.binary(op, &lhs, &rhs)
}

/// Expand `all()`, derive output names, and evaluate a projection list
pub fn project<B: Backend>(
    backend: &B,
    frame: &B::Frame,
    exprs: &[Expr],
    target: ProjectTarget,
) -> Result<B::Frame> {
    let names = backend.column_names(frame);
    let mut named = Vec::new();
    for expr in exprs {
        for expanded in expr.expand(&names) {
            let name = expanded.output_name().ok_or_else(|| {
                Error::InvalidOperation(format!(
                    "cannot derive an output name for {}, use .alias()",
                    expanded
                ))
            })?;
            named.push((name, expanded));
        }
    }
    project_named(backend, frame, &named, target)
}

/// Evaluate an already-named projection list and build the output frame.
/// Length-1 results broadcast to the common output length; conflicting
/// lengths are rejected before any column lands in the output.
pub fn project_named<B: Backend>(
    backend: &B,
    frame: &B::Frame,
    named: &[(String, Expr)],
    target: ProjectTarget,
) -> Result<B::Frame> {
    let mut cols = Vec::with_capacity(named.len());
    for (name, expr) in named {
        let col = evaluate(backend, frame, expr)?;
        cols.push((name.clone(), col));
    }

    // Output length: the frame height for with_columns, otherwise the
    // common non-1 length of the results (all length-1 stays at 1)
    let output_len = match target {
        ProjectTarget::WithColumns => backend.height(frame),
        ProjectTarget::Select => {
            let mut found: Option<usize> = None;
            for (_, col) in &cols {
                match backend.col_len(col) {
                    Some(len) if len != 1 => match found {
                        Some(existing) if existing != len => {
                            return Err(Error::ShapeMismatch {
                                left: existing,
                                right: len,
                            })
                        }
                        _ => found = Some(len),
                    },
                    _ => {}
                }
            }
            found.or(Some(1))
        }
    };

    let cols = match output_len {
        None => cols,
        Some(output_len) => {
            let mut out = Vec::with_capacity(cols.len());
            for (name, col) in cols {
                let col = match backend.col_len(&col) {
                    Some(1) if output_len != 1 => backend.broadcast_to(frame, &col, output_len)?,
                    Some(len) if len != output_len => {
                        return Err(Error::ShapeMismatch {
                            left: output_len,
                            right: len,
                        })
                    }
                    _ => col,
                };
                out.push((name, col));
            }
            out
        }
    };

    match target {
        ProjectTarget::Select => backend.select(frame, cols),
        ProjectTarget::WithColumns => backend.with_columns(frame, cols),
    }
}
