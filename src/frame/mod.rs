//! The user-facing facade: one `DataFrame` type generic over the engine
//! behind it. Code written against this surface runs unchanged on the
//! indexed, columnar and lazy engines.

pub mod groupby;
pub mod series;

pub use groupby::GroupBy;
pub use series::{Operand, Series};

use crate::backend::{
    Backend, ColumnarBackend, ColumnarFrame, EngineKind, IndexedBackend, IndexedFrame, JoinKind,
    LazyBackend, LazyFrame,
};
use crate::config::EngineConfig;
use crate::core::error::{Error, Result};
use crate::eval::{self, ProjectTarget};
use crate::expr::node::Expr;

/// A table handle bound to one engine
#[derive(Debug, Clone)]
pub struct DataFrame<B: Backend> {
    backend: B,
    frame: B::Frame,
}

impl<B: Backend> DataFrame<B> {
    pub fn from_native(backend: B, frame: B::Frame) -> Self {
        Self { backend, frame }
    }

    pub fn native(&self) -> &B::Frame {
        &self.frame
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_native(self) -> B::Frame {
        self.frame
    }

    pub fn engine_kind(&self) -> EngineKind {
        self.backend.kind()
    }

    pub fn config(&self) -> &EngineConfig {
        self.backend.config()
    }

    /// Row count, unknown for a deferred frame
    pub fn height(&self) -> Option<usize> {
        self.backend.height(&self.frame)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.backend.column_names(&self.frame)
    }

    fn wrap(&self, frame: B::Frame) -> Self
    where
        B: Clone,
    {
        Self {
            backend: self.backend.clone(),
            frame,
        }
    }
}

impl<B: Backend + Clone> DataFrame<B> {
    /// Evaluate expressions and keep exactly their outputs as the new frame
    pub fn select(&self, exprs: &[Expr]) -> Result<Self> {
        let out = eval::project(&self.backend, &self.frame, exprs, ProjectTarget::Select)?;
        Ok(self.wrap(out))
    }

    /// Evaluate expressions and add (or overwrite) their outputs, keeping
    /// every existing column
    pub fn with_columns(&self, exprs: &[Expr]) -> Result<Self> {
        let out = eval::project(&self.backend, &self.frame, exprs, ProjectTarget::WithColumns)?;
        Ok(self.wrap(out))
    }

    /// Keep the rows where the predicate is true
    pub fn filter(&self, predicate: Expr) -> Result<Self> {
        let mask = eval::evaluate(&self.backend, &self.frame, &predicate)?;
        // A length-1 predicate result applies to every row
        let mask = match (self.backend.col_len(&mask), self.height()) {
            (Some(1), Some(height)) if height != 1 => {
                self.backend.broadcast_to(&self.frame, &mask, height)?
            }
            _ => mask,
        };
        let out = self.backend.filter(&self.frame, &mask)?;
        Ok(self.wrap(out))
    }

    /// Start a grouped aggregation on the given key columns
    pub fn group_by(&self, keys: &[&str]) -> GroupBy<'_, B> {
        GroupBy::new(self, keys.iter().map(|k| k.to_string()).collect())
    }

    pub fn join(
        &self,
        other: &Self,
        left_on: &[&str],
        right_on: &[&str],
        how: JoinKind,
    ) -> Result<Self> {
        if left_on.len() != right_on.len() {
            return Err(Error::InvalidOperation(format!(
                "join key count mismatch: {} left vs {} right",
                left_on.len(),
                right_on.len()
            )));
        }
        let left_on: Vec<String> = left_on.iter().map(|k| k.to_string()).collect();
        let right_on: Vec<String> = right_on.iter().map(|k| k.to_string()).collect();
        let out = self
            .backend
            .join(&self.frame, &other.frame, &left_on, &right_on, how)?;
        Ok(self.wrap(out))
    }

    /// Stable multi-key sort. An empty `descending` means ascending on
    /// every key; otherwise one flag per key.
    pub fn sort(&self, by: &[&str], descending: &[bool]) -> Result<Self> {
        let descending: Vec<bool> = if descending.is_empty() {
            vec![false; by.len()]
        } else if descending.len() == by.len() {
            descending.to_vec()
        } else {
            return Err(Error::InvalidOperation(format!(
                "sort got {} keys but {} direction flags",
                by.len(),
                descending.len()
            )));
        };
        let by: Vec<String> = by.iter().map(|k| k.to_string()).collect();
        let out = self.backend.sort(&self.frame, &by, &descending)?;
        Ok(self.wrap(out))
    }

    /// Keep at most the first `n` rows
    pub fn limit(&self, n: usize) -> Result<Self> {
        let out = self.backend.limit(&self.frame, n)?;
        Ok(self.wrap(out))
    }

    /// Force computation. The eager engines return the frame unchanged;
    /// the lazy engine replays its plan.
    pub fn collect(self) -> Result<Self> {
        let backend = self.backend.clone();
        let out = backend.collect(self.frame)?;
        Ok(Self {
            backend,
            frame: out,
        })
    }

    /// Extract one column as a standalone series
    pub fn get_column(&self, name: &str) -> Result<Series<B>> {
        let col = self.backend.get_column(&self.frame, name)?;
        Ok(Series::new(self.backend.clone(), col))
    }
}

impl DataFrame<IndexedBackend> {
    pub fn from_indexed(frame: IndexedFrame, config: EngineConfig) -> Self {
        Self::from_native(IndexedBackend::new(config), frame)
    }
}

impl DataFrame<ColumnarBackend> {
    pub fn from_columnar(frame: ColumnarFrame, config: EngineConfig) -> Self {
        Self::from_native(ColumnarBackend::new(config), frame)
    }
}

impl DataFrame<LazyBackend> {
    /// Start a deferred plan over materialized columnar data
    pub fn scan(source: ColumnarFrame, config: EngineConfig) -> Self {
        Self::from_native(LazyBackend::new(config), LazyFrame::scan(source))
    }

    /// Replay the queued plan into an eager columnar frame
    pub fn collect_eager(&self) -> Result<DataFrame<ColumnarBackend>> {
        let out = self.frame.execute(self.backend.config())?;
        Ok(DataFrame::from_columnar(out, self.backend.config().clone()))
    }

    pub fn explain(&self) -> String {
        self.frame.explain()
    }
}
