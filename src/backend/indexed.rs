//! Eager row-indexed engine: every frame and every evaluated operand
//! carries row alignment labels, and elementwise operations require the
//! labels to agree.

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::columnar::{group_by_agg_columnar, join_columnar, ColumnarBackend, ColumnarFrame};
use crate::backend::{Backend, EngineKind, JoinKind};
use crate::column::Column;
use crate::compute;
use crate::compute::rows;
use crate::config::EngineConfig;
use crate::core::error::{Error, Result};
use crate::core::scalar::Scalar;
use crate::expr::node::Expr;
use crate::expr::ops::{AggKind, BinOp, UnaryOp};

/// Row alignment labels: an ordered label list with a reverse lookup map.
/// Labels must be unique within one index.
#[derive(Debug, Clone)]
pub struct RowIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
    name: Option<String>,
}

impl RowIndex {
    pub fn new(labels: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(labels.len());
        for (pos, label) in labels.iter().enumerate() {
            if positions.insert(label.clone(), pos).is_some() {
                return Err(Error::DuplicateIndexLabel(label.clone()));
            }
        }
        Ok(Self {
            labels,
            positions,
            name: None,
        })
    }

    /// The default positional index: labels `"0"` through `"n-1"`
    pub fn default_range(len: usize) -> Self {
        let labels: Vec<String> = (0..len).map(|i| i.to_string()).collect();
        let positions = labels
            .iter()
            .enumerate()
            .map(|(pos, label)| (label.clone(), pos))
            .collect();
        Self {
            labels,
            positions,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Keep labels at the given positions, preserving order
    fn take(&self, indices: &[usize]) -> Result<Self> {
        let labels = indices
            .iter()
            .map(|&i| {
                self.labels.get(i).cloned().ok_or(Error::IndexOutOfBounds {
                    index: i,
                    size: self.labels.len(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let taken = Self::new(labels)?;
        Ok(match &self.name {
            Some(name) => taken.with_name(name.clone()),
            None => taken,
        })
    }
}

/// Label-aligned table
#[derive(Debug, Clone)]
pub struct IndexedFrame {
    columns: HashMap<String, Column>,
    order: Vec<String>,
    index: Arc<RowIndex>,
}

impl IndexedFrame {
    /// Build a frame with the default positional index
    pub fn from_columns(cols: Vec<(String, Column)>) -> Result<Self> {
        let height = cols.first().map(|(_, c)| c.len()).unwrap_or(0);
        Self::with_index(cols, RowIndex::default_range(height))
    }

    /// Build a frame aligned to explicit labels
    pub fn with_index(cols: Vec<(String, Column)>, index: RowIndex) -> Result<Self> {
        let index = Arc::new(index);
        let mut columns = HashMap::with_capacity(cols.len());
        let mut order = Vec::with_capacity(cols.len());
        for (name, col) in cols {
            if columns.contains_key(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            if col.len() != index.len() {
                return Err(Error::InconsistentRowCount {
                    expected: index.len(),
                    found: col.len(),
                });
            }
            order.push(name.clone());
            columns.insert(name.clone(), col.renamed(name));
        }
        Ok(Self {
            columns,
            order,
            index,
        })
    }

    pub fn height(&self) -> usize {
        self.index.len()
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Drop the labels and view the data positionally
    pub fn to_columnar(&self) -> Result<ColumnarFrame> {
        let cols = self
            .order
            .iter()
            .map(|name| self.column(name).map(|c| (name.clone(), c.clone())))
            .collect::<Result<Vec<_>>>()?;
        ColumnarFrame::from_columns(cols)
    }

    /// Adopt positional data under a fresh default index
    pub fn from_columnar(frame: &ColumnarFrame) -> Result<Self> {
        let cols = frame
            .names()
            .iter()
            .map(|name| frame.column(name).map(|c| (name.clone(), c.clone())))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(cols)
    }

    fn take_rows(&self, indices: &[usize]) -> Result<Self> {
        let index = self.index.take(indices)?;
        let cols = self
            .order
            .iter()
            .map(|name| {
                self.column(name)
                    .and_then(|c| rows::take_column(c, indices))
                    .map(|c| (name.clone(), c))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_index(cols, index)
    }
}

/// An operand evaluated on the indexed engine: values plus the labels they
/// are aligned to
#[derive(Debug, Clone)]
pub struct IndexedCol {
    pub(crate) values: Column,
    pub(crate) index: Arc<RowIndex>,
}

/// The eager indexed engine
#[derive(Debug, Clone, Default)]
pub struct IndexedBackend {
    config: EngineConfig,
}

impl IndexedBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    fn columnar(&self) -> ColumnarBackend {
        ColumnarBackend::new(self.config.clone())
    }
}

impl Backend for IndexedBackend {
    type Frame = IndexedFrame;
    type Col = IndexedCol;

    fn kind(&self) -> EngineKind {
        EngineKind::EagerIndexed
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn height(&self, frame: &Self::Frame) -> Option<usize> {
        Some(frame.height())
    }

    fn column_names(&self, frame: &Self::Frame) -> Vec<String> {
        frame.order.clone()
    }

    fn get_column(&self, frame: &Self::Frame, name: &str) -> Result<Self::Col> {
        Ok(IndexedCol {
            values: frame.column(name)?.clone(),
            index: frame.index.clone(),
        })
    }

    fn literal(&self, value: &Scalar) -> Result<Self::Col> {
        Ok(IndexedCol {
            values: Column::from_scalar(value),
            index: Arc::new(RowIndex::default_range(1)),
        })
    }

    fn binary(&self, op: BinOp, lhs: &Self::Col, rhs: &Self::Col) -> Result<Self::Col> {
        // Label equality was checked by the validator; the result stays in
        // the left operand's alignment space
        Ok(IndexedCol {
            values: compute::binary_column(op, &lhs.values, &rhs.values, &self.config)?,
            index: lhs.index.clone(),
        })
    }

    fn unary(&self, op: UnaryOp, operand: &Self::Col) -> Result<Self::Col> {
        Ok(IndexedCol {
            values: compute::unary_column(op, &operand.values)?,
            index: operand.index.clone(),
        })
    }

    fn aggregate(&self, kind: AggKind, operand: &Self::Col) -> Result<Self::Col> {
        Ok(IndexedCol {
            values: compute::aggregate_column(kind, &operand.values)?,
            index: Arc::new(RowIndex::default_range(1)),
        })
    }

    fn col_len(&self, col: &Self::Col) -> Option<usize> {
        Some(col.values.len())
    }

    fn alignment<'a>(&self, col: &'a Self::Col) -> Option<&'a [String]> {
        Some(col.index.labels())
    }

    fn broadcast_like(&self, col: &Self::Col, like: &Self::Col) -> Result<Self::Col> {
        Ok(IndexedCol {
            values: compute::repeat_column(&col.values, like.values.len())?,
            index: like.index.clone(),
        })
    }

    fn broadcast_to(&self, frame: &Self::Frame, col: &Self::Col, len: usize) -> Result<Self::Col> {
        let index = if frame.index.len() == len {
            frame.index.clone()
        } else {
            Arc::new(RowIndex::default_range(len))
        };
        Ok(IndexedCol {
            values: compute::repeat_column(&col.values, len)?,
            index,
        })
    }

    fn rename(&self, col: &Self::Col, name: &str) -> Self::Col {
        IndexedCol {
            values: col.values.renamed(name),
            index: col.index.clone(),
        }
    }

    fn materialize(&self, col: &Self::Col) -> Result<Column> {
        Ok(col.values.clone())
    }

    fn select(&self, frame: &Self::Frame, cols: Vec<(String, Self::Col)>) -> Result<Self::Frame> {
        let height = cols.first().map(|(_, c)| c.values.len()).unwrap_or(0);
        // Selecting at the frame height keeps the labels; a reduced result
        // starts over with a default index
        let index = if height == frame.height() {
            frame.index.as_ref().clone()
        } else {
            RowIndex::default_range(height)
        };
        let cols = cols
            .into_iter()
            .map(|(name, col)| (name, col.values))
            .collect();
        IndexedFrame::with_index(cols, index)
    }

    fn with_columns(
        &self,
        frame: &Self::Frame,
        cols: Vec<(String, Self::Col)>,
    ) -> Result<Self::Frame> {
        let mut out = frame.clone();
        for (name, col) in cols {
            if col.values.len() != out.height() {
                return Err(Error::InconsistentRowCount {
                    expected: out.height(),
                    found: col.values.len(),
                });
            }
            if !out.columns.contains_key(&name) {
                out.order.push(name.clone());
            }
            out.columns.insert(name.clone(), col.values.renamed(name));
        }
        Ok(out)
    }

    fn filter(&self, frame: &Self::Frame, mask: &Self::Col) -> Result<Self::Frame> {
        let mask = mask.values.as_boolean().ok_or_else(|| {
            Error::InvalidOperation(format!(
                "filter mask must be Boolean, found {}",
                mask.values.dtype()
            ))
        })?;
        if mask.len() != frame.height() {
            return Err(Error::ShapeMismatch {
                left: frame.height(),
                right: mask.len(),
            });
        }
        frame.take_rows(&rows::filter_indices(mask))
    }

    fn group_by_agg(
        &self,
        frame: &Self::Frame,
        keys: &[String],
        aggs: &[Expr],
    ) -> Result<Self::Frame> {
        let out = group_by_agg_columnar(&self.columnar(), &frame.to_columnar()?, keys, aggs)?;
        IndexedFrame::from_columnar(&out)
    }

    fn join(
        &self,
        left: &Self::Frame,
        right: &Self::Frame,
        left_on: &[String],
        right_on: &[String],
        how: JoinKind,
    ) -> Result<Self::Frame> {
        let out = join_columnar(
            &left.to_columnar()?,
            &right.to_columnar()?,
            left_on,
            right_on,
            how,
        )?;
        IndexedFrame::from_columnar(&out)
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
        frame.take_rows(&rows::sort_indices(&keys, descending, frame.height())?)
    }

    fn limit(&self, frame: &Self::Frame, n: usize) -> Result<Self::Frame> {
        let keep: Vec<usize> = (0..frame.height().min(n)).collect();
        frame.take_rows(&keep)
    }

    fn collect(&self, frame: Self::Frame) -> Result<Self::Frame> {
        Ok(frame)
    }
}
