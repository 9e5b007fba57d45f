//! Grouped aggregation builder.

use crate::backend::Backend;
use crate::core::error::Result;
use crate::expr::node::Expr;
use crate::frame::DataFrame;

/// A pending group-by: holds the source frame and the key columns until
/// `agg` names what to compute per group
#[derive(Debug)]
pub struct GroupBy<'a, B: Backend> {
    source: &'a DataFrame<B>,
    keys: Vec<String>,
}

impl<'a, B: Backend + Clone> GroupBy<'a, B> {
    pub(crate) fn new(source: &'a DataFrame<B>, keys: Vec<String>) -> Self {
        Self { source, keys }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Evaluate one aggregation list per group. Output rows follow
    /// first-seen key order, key columns first.
    pub fn agg(&self, aggs: &[Expr]) -> Result<DataFrame<B>> {
        let backend = self.source_backend();
        let out = backend.group_by_agg(self.source.native(), &self.keys, aggs)?;
        Ok(DataFrame::from_native(backend.clone(), out))
    }

    fn source_backend(&self) -> &B {
        self.source.backend()
    }
}
