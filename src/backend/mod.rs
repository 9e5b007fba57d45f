//! Engine adapters. Every engine exposes the same small primitive surface
//! through the [`Backend`] trait; the expression evaluator and the frame
//! facade are written once against it.

pub mod columnar;
pub mod indexed;
pub mod lazy;

use std::fmt;

use crate::column::Column;
use crate::config::EngineConfig;
use crate::core::error::Result;
use crate::core::scalar::Scalar;
use crate::expr::node::Expr;
use crate::expr::ops::{AggKind, BinOp, UnaryOp};

pub use columnar::{ColumnarBackend, ColumnarFrame};
pub use indexed::{IndexedBackend, IndexedFrame, RowIndex};
pub use lazy::{LazyBackend, LazyFrame};

/// Execution style of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Eager engine whose frames carry row alignment labels
    EagerIndexed,
    /// Eager engine with positional columnar storage
    EagerColumnar,
    /// Deferred engine that queues a plan and computes on collect
    Lazy,
}

impl EngineKind {
    pub fn is_lazy(&self) -> bool {
        matches!(self, EngineKind::Lazy)
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::EagerIndexed => "eager-indexed",
            EngineKind::EagerColumnar => "eager-columnar",
            EngineKind::Lazy => "lazy",
        };
        write!(f, "{}", name)
    }
}

/// How join rows are matched and which unmatched rows survive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        };
        write!(f, "{}", name)
    }
}

/// The primitive surface an engine must provide. Everything the public API
/// does reduces to these calls, so engines cannot diverge on semantics that
/// live above this trait.
pub trait Backend {
    /// A materialized (or, for the lazy engine, planned) table
    type Frame: Clone + fmt::Debug;
    /// A single evaluated (or planned) column
    type Col: Clone + fmt::Debug;

    fn kind(&self) -> EngineKind;
    fn config(&self) -> &EngineConfig;

    /// Row count of a frame; `None` when the engine has not computed yet
    fn height(&self, frame: &Self::Frame) -> Option<usize>;
    fn column_names(&self, frame: &Self::Frame) -> Vec<String>;
    fn get_column(&self, frame: &Self::Frame, name: &str) -> Result<Self::Col>;
    /// A length-1 column holding a literal
    fn literal(&self, value: &Scalar) -> Result<Self::Col>;

    /// Elementwise binary operator over two equal-length operands. Shape
    /// and alignment validation happen in the evaluator before this call.
    fn binary(&self, op: BinOp, lhs: &Self::Col, rhs: &Self::Col) -> Result<Self::Col>;
    fn unary(&self, op: UnaryOp, operand: &Self::Col) -> Result<Self::Col>;
    /// Reduce a column to a length-1 column
    fn aggregate(&self, kind: AggKind, operand: &Self::Col) -> Result<Self::Col>;

    /// Length of an operand; `None` defers shape validation to collect
    fn col_len(&self, col: &Self::Col) -> Option<usize>;
    /// Row alignment labels, when the engine tracks them
    fn alignment<'a>(&self, col: &'a Self::Col) -> Option<&'a [String]>;
    /// Broadcast a length-1 operand to the shape (and alignment) of `like`
    fn broadcast_like(&self, col: &Self::Col, like: &Self::Col) -> Result<Self::Col>;
    /// Broadcast a length-1 operand to `len` rows in the frame's alignment
    fn broadcast_to(&self, frame: &Self::Frame, col: &Self::Col, len: usize) -> Result<Self::Col>;
    fn rename(&self, col: &Self::Col, name: &str) -> Self::Col;
    /// Extract the concrete values of an operand. Deferred engines cannot
    /// and report a capability error.
    fn materialize(&self, col: &Self::Col) -> Result<Column>;

    /// Replace the frame with exactly the given named columns
    fn select(&self, frame: &Self::Frame, cols: Vec<(String, Self::Col)>) -> Result<Self::Frame>;
    /// Add or overwrite named columns, keeping the rest of the frame
    fn with_columns(
        &self,
        frame: &Self::Frame,
        cols: Vec<(String, Self::Col)>,
    ) -> Result<Self::Frame>;
    /// Keep the rows where the boolean mask is true
    fn filter(&self, frame: &Self::Frame, mask: &Self::Col) -> Result<Self::Frame>;
    /// Group on key columns and evaluate one aggregation expression list
    /// per group, keys first in first-seen order
    fn group_by_agg(
        &self,
        frame: &Self::Frame,
        keys: &[String],
        aggs: &[Expr],
    ) -> Result<Self::Frame>;
    fn join(
        &self,
        left: &Self::Frame,
        right: &Self::Frame,
        left_on: &[String],
        right_on: &[String],
        how: JoinKind,
    ) -> Result<Self::Frame>;
    fn sort(&self, frame: &Self::Frame, by: &[String], descending: &[bool])
        -> Result<Self::Frame>;
    fn limit(&self, frame: &Self::Frame, n: usize) -> Result<Self::Frame>;
    /// Force computation. Identity for the eager engines.
    fn collect(&self, frame: Self::Frame) -> Result<Self::Frame>;
}
