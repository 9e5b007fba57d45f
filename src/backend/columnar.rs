//! Eager columnar engine: positional storage, no row labels. This is also
//! the engine the lazy plan replays on.

use std::collections::HashMap;

use crate::backend::{Backend, EngineKind, JoinKind};
use crate::column::Column;
use crate::compute;
use crate::compute::rows;
use crate::config::EngineConfig;
use crate::core::error::{Error, Result};
use crate::core::scalar::Scalar;
use crate::eval::{self, ProjectTarget};
use crate::expr::node::Expr;
use crate::expr::ops::{AggKind, BinOp, UnaryOp};

/// Column-oriented table: typed columns plus a name index
#[derive(Debug, Clone, Default)]
pub struct ColumnarFrame {
    columns: Vec<Column>,
    column_indices: HashMap<String, usize>,
    column_names: Vec<String>,
    row_count: usize,
}

impl ColumnarFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame from named columns in order
    pub fn from_columns(cols: Vec<(String, Column)>) -> Result<Self> {
        let mut frame = Self::new();
        for (name, col) in cols {
            frame.add_column(name, col)?;
        }
        Ok(frame)
    }

    /// Append a column. The first column fixes the row count; later ones
    /// must match it, and names must be unique.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.column_indices.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        }
        self.column_indices.insert(name.clone(), self.columns.len());
        self.column_names.push(name.clone());
        self.columns.push(column.renamed(name));
        Ok(())
    }

    /// Replace an existing column in place, keeping its position
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        let idx = *self
            .column_indices
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        if column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }
        self.columns[idx] = column.renamed(name);
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.column_names
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_indices
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Gather rows into a new frame; `None` indices become NULL rows
    pub(crate) fn take_rows(&self, indices: &[Option<usize>]) -> Result<Self> {
        let mut out = Self::new();
        for name in &self.column_names {
            let taken = rows::take_column_opt(self.column(name)?, indices)?;
            out.add_column(name.clone(), taken)?;
        }
        if self.columns.is_empty() {
            out.row_count = 0;
        }
        Ok(out)
    }
}

/// The eager columnar engine
#[derive(Debug, Clone, Default)]
pub struct ColumnarBackend {
    config: EngineConfig,
}

impl ColumnarBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl Backend for ColumnarBackend {
    type Frame = ColumnarFrame;
    type Col = Column;

    fn kind(&self) -> EngineKind {
        EngineKind::EagerColumnar
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn height(&self, frame: &Self::Frame) -> Option<usize> {
        Some(frame.row_count)
    }

    fn column_names(&self, frame: &Self::Frame) -> Vec<String> {
        frame.column_names.clone()
    }

    fn get_column(&self, frame: &Self::Frame, name: &str) -> Result<Self::Col> {
        frame.column(name).cloned()
    }

    fn literal(&self, value: &Scalar) -> Result<Self::Col> {
        Ok(Column::from_scalar(value))
    }

    fn binary(&self, op: BinOp, lhs: &Self::Col, rhs: &Self::Col) -> Result<Self::Col> {
        compute::binary_column(op, lhs, rhs, &self.config)
    }

    fn unary(&self, op: UnaryOp, operand: &Self::Col) -> Result<Self::Col> {
        compute::unary_column(op, operand)
    }

    fn aggregate(&self, kind: AggKind, operand: &Self::Col) -> Result<Self::Col> {
        compute::aggregate_column(kind, operand)
    }

    fn col_len(&self, col: &Self::Col) -> Option<usize> {
        Some(col.len())
    }

    fn alignment<'a>(&self, _col: &'a Self::Col) -> Option<&'a [String]> {
        None
    }

    fn broadcast_like(&self, col: &Self::Col, like: &Self::Col) -> Result<Self::Col> {
        compute::repeat_column(col, like.len())
    }

    fn broadcast_to(&self, _frame: &Self::Frame, col: &Self::Col, len: usize) -> Result<Self::Col> {
        compute::repeat_column(col, len)
    }

    fn rename(&self, col: &Self::Col, name: &str) -> Self::Col {
        col.renamed(name)
    }

    fn materialize(&self, col: &Self::Col) -> Result<Column> {
        Ok(col.clone())
    }

    fn select(&self, _frame: &Self::Frame, cols: Vec<(String, Self::Col)>) -> Result<Self::Frame> {
        ColumnarFrame::from_columns(cols)
    }

    fn with_columns(
        &self,
        frame: &Self::Frame,
        cols: Vec<(String, Self::Col)>,
    ) -> Result<Self::Frame> {
        let mut out = frame.clone();
        for (name, col) in cols {
            if out.contains_column(&name) {
                out.replace_column(&name, col)?;
            } else {
                out.add_column(name, col)?;
            }
        }
        Ok(out)
    }

    fn filter(&self, frame: &Self::Frame, mask: &Self::Col) -> Result<Self::Frame> {
        let mask = mask.as_boolean().ok_or_else(|| {
            Error::InvalidOperation(format!(
                "filter mask must be Boolean, found {}",
                mask.dtype()
            ))
        })?;
        if mask.len() != frame.row_count {
            return Err(Error::ShapeMismatch {
                left: frame.row_count,
                right: mask.len(),
            });
        }
        let keep: Vec<Option<usize>> = rows::filter_indices(mask)
            .into_iter()
            .map(Some)
            .collect();
        frame.take_rows(&keep)
    }

    fn group_by_agg(
        &self,
        frame: &Self::Frame,
        keys: &[String],
        aggs: &[Expr],
    ) -> Result<Self::Frame> {
        group_by_agg_columnar(self, frame, keys, aggs)
    }

    fn join(
        &self,
        left: &Self::Frame,
        right: &Self::Frame,
        left_on: &[String],
        right_on: &[String],
        how: JoinKind,
    ) -> Result<Self::Frame> {
        join_columnar(left, right, left_on, right_on, how)
    }

    fn sort(
        &self,
        frame: &Self::Frame,
        by: &[String],
        descending: &[bool],
    ) -> Result<Self::Frame> {
        let keys = by
            .iter()
            .map(|name| frame.column(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        let order = rows::sort_indices(&keys, descending, frame.row_count)?;
        let order: Vec<Option<usize>> = order.into_iter().map(Some).collect();
        frame.take_rows(&order)
    }

    fn limit(&self, frame: &Self::Frame, n: usize) -> Result<Self::Frame> {
        let keep: Vec<Option<usize>> = (0..frame.row_count.min(n)).map(Some).collect();
        frame.take_rows(&keep)
    }

    fn collect(&self, frame: Self::Frame) -> Result<Self::Frame> {
        Ok(frame)
    }
}

/// Group-by shared with the indexed engine (which delegates after dropping
/// its labels): partition rows, evaluate the aggregation list per group,
/// stitch key values and length-1 results into the output.
pub(crate) fn group_by_agg_columnar(
    backend: &ColumnarBackend,
    frame: &ColumnarFrame,
    keys: &[String],
    aggs: &[Expr],
) -> Result<ColumnarFrame> {
    let key_cols = keys
        .iter()
        .map(|name| frame.column(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    let groups = rows::group_rows(&key_cols)?;
    log::debug!("group_by over {:?}: {} groups", keys, groups.len());

    let named = expand_agg_exprs(frame.names(), keys, aggs)?;

    // Key values, first row of each group
    let mut key_values: Vec<Vec<Scalar>> = vec![Vec::with_capacity(groups.len()); keys.len()];
    let mut agg_frames: Vec<ColumnarFrame> = Vec::with_capacity(groups.len());
    for group in &groups {
        for (slot, col) in key_cols.iter().enumerate() {
            key_values[slot].push(col.get_scalar(group[0])?);
        }
        let picked: Vec<Option<usize>> = group.iter().map(|&i| Some(i)).collect();
        let sub = frame.take_rows(&picked)?;
        let agg = eval::project_named(backend, &sub, &named, ProjectTarget::Select)?;
        if agg.row_count() != 1 {
            return Err(Error::InvalidOperation(format!(
                "aggregation must reduce each group to one row, produced {}",
                agg.row_count()
            )));
        }
        agg_frames.push(agg);
    }

    let mut out = ColumnarFrame::new();
    for (name, values) in keys.iter().zip(key_values) {
        out.add_column(name.clone(), Column::from_scalars(values)?)?;
    }
    // Zero groups still produce every aggregate column, empty
    for (name, _) in &named {
        let mut values = Vec::with_capacity(agg_frames.len());
        for agg in &agg_frames {
            values.push(agg.column(name)?.get_scalar(0)?);
        }
        out.add_column(name.clone(), Column::from_scalars(values)?)?;
    }
    Ok(out)
}

/// Expand and name an aggregation list. `all()` inside an aggregation
/// covers the non-key columns, so keys never collide with themselves.
pub(crate) fn expand_agg_exprs(
    column_names: &[String],
    keys: &[String],
    aggs: &[Expr],
) -> Result<Vec<(String, Expr)>> {
    let non_key: Vec<String> = column_names
        .iter()
        .filter(|name| !keys.contains(name))
        .cloned()
        .collect();
    let mut named = Vec::new();
    for expr in aggs {
        for expanded in expr.expand(&non_key) {
            let name = expanded.output_name().ok_or_else(|| {
                Error::InvalidOperation(format!(
                    "cannot derive an output name for {}, use .alias()",
                    expanded
                ))
            })?;
            named.push((name, expanded));
        }
    }
    Ok(named)
}

/// Join shared with the indexed engine. Right join keys are dropped from
/// the output; remaining right columns that collide get a `_right` suffix.
pub(crate) fn join_columnar(
    left: &ColumnarFrame,
    right: &ColumnarFrame,
    left_on: &[String],
    right_on: &[String],
    how: JoinKind,
) -> Result<ColumnarFrame> {
    let left_keys = left_on
        .iter()
        .map(|name| left.column(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    let right_keys = right_on
        .iter()
        .map(|name| right.column(name).cloned())
        .collect::<Result<Vec<_>>>()?;
    let pairs = rows::join_indices(&left_keys, &right_keys, how)?;
    log::debug!(
        "{} join on {:?}/{:?}: {} output rows",
        how,
        left_on,
        right_on,
        pairs.len()
    );

    let left_idx: Vec<Option<usize>> = pairs.iter().map(|&(l, _)| l).collect();
    let right_idx: Vec<Option<usize>> = pairs.iter().map(|&(_, r)| r).collect();

    // Right and outer joins fill unmatched key slots from the right side
    let coalesce = matches!(how, JoinKind::Right | JoinKind::Outer);
    let mut out = ColumnarFrame::new();
    for name in left.names().to_vec() {
        let mut taken = rows::take_column_opt(left.column(&name)?, &left_idx)?;
        if coalesce {
            if let Some(slot) = left_on.iter().position(|key| key == &name) {
                taken = rows::coalesce_key_column(
                    &taken,
                    right.column(&right_on[slot])?,
                    &left_idx,
                    &right_idx,
                )?;
            }
        }
        out.add_column(name.clone(), taken)?;
    }
    let right_names: Vec<String> = right.names().to_vec();
    let left_names: Vec<String> = left.names().to_vec();
    for (source, output) in rows::join_output_names(&left_names, &right_names, right_on) {
        out.add_column(
            output,
            rows::take_column_opt(right.column(&source)?, &right_idx)?,
        )?;
    }
    out.row_count = pairs.len();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Int64Column;

    fn frame(cols: Vec<(&str, Vec<i64>)>) -> ColumnarFrame {
        ColumnarFrame::from_columns(
            cols.into_iter()
                .map(|(name, values)| (name.to_string(), Column::Int64(Int64Column::new(values))))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn mismatched_column_lengths_are_rejected() {
        let mut f = ColumnarFrame::new();
        f.add_column("a", Column::Int64(Int64Column::new(vec![1, 2]))).unwrap();
        let err = f.add_column("b", Column::Int64(Int64Column::new(vec![1])));
        assert!(matches!(err, Err(Error::InconsistentRowCount { .. })));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut f = ColumnarFrame::new();
        f.add_column("a", Column::Int64(Int64Column::new(vec![1]))).unwrap();
        assert!(matches!(
            f.add_column("a", Column::Int64(Int64Column::new(vec![2]))),
            Err(Error::DuplicateColumnName(_))
        ));
    }

    #[test]
    fn join_suffixes_colliding_right_columns() {
        let left = frame(vec![("k", vec![1, 2]), ("v", vec![10, 20])]);
        let right = frame(vec![("k", vec![2, 1]), ("v", vec![200, 100])]);
        let out = join_columnar(&left, &right, &["k".into()], &["k".into()], JoinKind::Inner)
            .unwrap();
        assert_eq!(out.names(), &["k", "v", "v_right"]);
        assert_eq!(
            out.column("v_right").unwrap().get_scalar(0).unwrap(),
            Scalar::Int64(100)
        );
    }
}
