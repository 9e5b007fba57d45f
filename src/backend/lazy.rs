//! Lazy engine: frame operations append to a plan instead of computing.
//! The plan replays on the columnar engine at collect time, through the
//! same evaluator the eager engines use, so deferred results match eager
//! ones operation for operation.

use std::fmt;
use std::sync::Arc;

use crate::backend::columnar::{expand_agg_exprs, ColumnarBackend, ColumnarFrame};
use crate::backend::{Backend, EngineKind, JoinKind};
use crate::column::Column;
use crate::compute;
use crate::config::EngineConfig;
use crate::core::error::{Error, Result};
use crate::core::scalar::Scalar;
use crate::eval::{self, ProjectTarget};
use crate::expr::node::Expr;
use crate::expr::ops::{AggKind, BinOp, UnaryOp};

/// One deferred frame operation
#[derive(Debug, Clone)]
pub enum Operation {
    Select(Vec<(String, Expr)>),
    WithColumns(Vec<(String, Expr)>),
    Filter(Expr),
    GroupByAgg {
        keys: Vec<String>,
        aggs: Vec<Expr>,
    },
    Join {
        right: Box<LazyFrame>,
        left_on: Vec<String>,
        right_on: Vec<String>,
        how: JoinKind,
    },
    Sort {
        by: Vec<String>,
        descending: Vec<bool>,
    },
    Limit(usize),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Select(cols) => {
                write!(f, "SELECT ")?;
                write_named(f, cols)
            }
            Operation::WithColumns(cols) => {
                write!(f, "WITH_COLUMNS ")?;
                write_named(f, cols)
            }
            Operation::Filter(expr) => write!(f, "FILTER {}", expr),
            Operation::GroupByAgg { keys, aggs } => {
                write!(f, "GROUP_BY {:?} AGG [", keys)?;
                for (i, expr) in aggs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", expr)?;
                }
                write!(f, "]")
            }
            Operation::Join {
                left_on,
                right_on,
                how,
                ..
            } => write!(f, "JOIN {} ON {:?} = {:?}", how, left_on, right_on),
            Operation::Sort { by, descending } => write!(f, "SORT {:?} DESC {:?}", by, descending),
            Operation::Limit(n) => write!(f, "LIMIT {}", n),
        }
    }
}

fn write_named(f: &mut fmt::Formatter<'_>, cols: &[(String, Expr)]) -> fmt::Result {
    write!(f, "[")?;
    for (i, (name, expr)) in cols.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{} = {}", name, expr)?;
    }
    write!(f, "]")
}

/// A deferred frame: its source data plus the queued plan. The output
/// schema is tracked eagerly so name errors surface at build time.
#[derive(Debug, Clone)]
pub struct LazyFrame {
    source: Arc<ColumnarFrame>,
    operations: Vec<Operation>,
    schema: Vec<String>,
}

impl LazyFrame {
    /// Start a plan over materialized data
    pub fn scan(source: ColumnarFrame) -> Self {
        let schema = source.names().to_vec();
        Self {
            source: Arc::new(source),
            operations: vec![],
            schema,
        }
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    fn push(&self, op: Operation, schema: Vec<String>) -> Self {
        log::debug!("plan += {}", op);
        let mut operations = self.operations.clone();
        operations.push(op);
        Self {
            source: self.source.clone(),
            operations,
            schema,
        }
    }

    /// Replay the plan on the columnar engine
    pub fn execute(&self, config: &EngineConfig) -> Result<ColumnarFrame> {
        let backend = ColumnarBackend::new(config.clone());
        let mut frame = self.source.as_ref().clone();
        for op in &self.operations {
            log::debug!("replay {}", op);
            frame = match op {
                Operation::Select(cols) => {
                    eval::project_named(&backend, &frame, cols, ProjectTarget::Select)?
                }
                Operation::WithColumns(cols) => {
                    eval::project_named(&backend, &frame, cols, ProjectTarget::WithColumns)?
                }
                Operation::Filter(expr) => {
                    let mask = eval::evaluate(&backend, &frame, expr)?;
                    let mask = if mask.len() == 1 && frame.row_count() != 1 {
                        compute::repeat_column(&mask, frame.row_count())?
                    } else {
                        mask
                    };
                    backend.filter(&frame, &mask)?
                }
                Operation::GroupByAgg { keys, aggs } => backend.group_by_agg(&frame, keys, aggs)?,
                Operation::Join {
                    right,
                    left_on,
                    right_on,
                    how,
                } => {
                    let right = right.execute(config)?;
                    backend.join(&frame, &right, left_on, right_on, *how)?
                }
                Operation::Sort { by, descending } => backend.sort(&frame, by, descending)?,
                Operation::Limit(n) => backend.limit(&frame, *n)?,
            };
        }
        Ok(frame)
    }

    /// Human-readable plan listing, top operation last
    pub fn explain(&self) -> String {
        let mut out = format!(
            "SCAN {} columns x {} rows",
            self.source.column_count(),
            self.source.row_count()
        );
        for op in &self.operations {
            out.push('\n');
            out.push_str(&op.to_string());
        }
        out
    }
}

/// A planned operand: the expression that will produce it, plus its
/// output name
#[derive(Debug, Clone)]
pub struct LazyCol {
    pub(crate) name: String,
    pub(crate) expr: Expr,
}

fn planned(expr: Expr) -> LazyCol {
    let name = expr.output_name().unwrap_or_else(|| "literal".to_string());
    LazyCol { name, expr }
}

/// The deferred engine
#[derive(Debug, Clone, Default)]
pub struct LazyBackend {
    config: EngineConfig,
}

impl LazyBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl Backend for LazyBackend {
    type Frame = LazyFrame;
    type Col = LazyCol;

    fn kind(&self) -> EngineKind {
        EngineKind::Lazy
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn height(&self, _frame: &Self::Frame) -> Option<usize> {
        None
    }

    fn column_names(&self, frame: &Self::Frame) -> Vec<String> {
        frame.schema.clone()
    }

    fn get_column(&self, frame: &Self::Frame, name: &str) -> Result<Self::Col> {
        if !frame.schema.iter().any(|n| n == name) {
            return Err(Error::ColumnNotFound(name.to_string()));
        }
        Ok(LazyCol {
            name: name.to_string(),
            expr: Expr::ColumnRef(name.to_string()),
        })
    }

    fn literal(&self, value: &Scalar) -> Result<Self::Col> {
        Ok(planned(Expr::Literal(value.clone())))
    }

    fn binary(&self, op: BinOp, lhs: &Self::Col, rhs: &Self::Col) -> Result<Self::Col> {
        Ok(planned(Expr::binary(op, lhs.expr.clone(), rhs.expr.clone())))
    }

    fn unary(&self, op: UnaryOp, operand: &Self::Col) -> Result<Self::Col> {
        Ok(planned(Expr::unary(op, operand.expr.clone())))
    }

    fn aggregate(&self, kind: AggKind, operand: &Self::Col) -> Result<Self::Col> {
        Ok(planned(Expr::Aggregate {
            kind,
            operand: Box::new(operand.expr.clone()),
        }))
    }

    fn col_len(&self, _col: &Self::Col) -> Option<usize> {
        // Shape validation defers to collect
        None
    }

    fn alignment<'a>(&self, _col: &'a Self::Col) -> Option<&'a [String]> {
        None
    }

    fn broadcast_like(&self, col: &Self::Col, _like: &Self::Col) -> Result<Self::Col> {
        Ok(col.clone())
    }

    fn broadcast_to(&self, _frame: &Self::Frame, col: &Self::Col, _len: usize) -> Result<Self::Col> {
        Ok(col.clone())
    }

    fn rename(&self, col: &Self::Col, name: &str) -> Self::Col {
        LazyCol {
            name: name.to_string(),
            expr: col.expr.clone().alias(name),
        }
    }

    fn materialize(&self, _col: &Self::Col) -> Result<Column> {
        Err(Error::BackendCapability(
            "a deferred operand has no values until collect".to_string(),
        ))
    }

    fn select(&self, frame: &Self::Frame, cols: Vec<(String, Self::Col)>) -> Result<Self::Frame> {
        let named: Vec<(String, Expr)> = cols
            .into_iter()
            .map(|(name, col)| (name, col.expr))
            .collect();
        let schema = named.iter().map(|(name, _)| name.clone()).collect();
        Ok(frame.push(Operation::Select(named), schema))
    }

    fn with_columns(
        &self,
        frame: &Self::Frame,
        cols: Vec<(String, Self::Col)>,
    ) -> Result<Self::Frame> {
        let named: Vec<(String, Expr)> = cols
            .into_iter()
            .map(|(name, col)| (name, col.expr))
            .collect();
        let mut schema = frame.schema.clone();
        for (name, _) in &named {
            if !schema.iter().any(|n| n == name) {
                schema.push(name.clone());
            }
        }
        Ok(frame.push(Operation::WithColumns(named), schema))
    }

    fn filter(&self, frame: &Self::Frame, mask: &Self::Col) -> Result<Self::Frame> {
        let schema = frame.schema.clone();
        Ok(frame.push(Operation::Filter(mask.expr.clone()), schema))
    }

    fn group_by_agg(
        &self,
        frame: &Self::Frame,
        keys: &[String],
        aggs: &[Expr],
    ) -> Result<Self::Frame> {
        for key in keys {
            if !frame.schema.iter().any(|n| n == key) {
                return Err(Error::ColumnNotFound(key.clone()));
            }
        }
        let mut schema: Vec<String> = keys.to_vec();
        for (name, _) in expand_agg_exprs(&frame.schema, keys, aggs)? {
            schema.push(name);
        }
        Ok(frame.push(
            Operation::GroupByAgg {
                keys: keys.to_vec(),
                aggs: aggs.to_vec(),
            },
            schema,
        ))
    }

    fn join(
        &self,
        left: &Self::Frame,
        right: &Self::Frame,
        left_on: &[String],
        right_on: &[String],
        how: JoinKind,
    ) -> Result<Self::Frame> {
        let mut schema = left.schema.clone();
        for (_, output) in
            crate::compute::rows::join_output_names(&left.schema, &right.schema, right_on)
        {
            schema.push(output);
        }
        Ok(left.push(
            Operation::Join {
                right: Box::new(right.clone()),
                left_on: left_on.to_vec(),
                right_on: right_on.to_vec(),
                how,
            },
            schema,
        ))
    }

    fn sort(
        &self,
        frame: &Self::Frame,
        by: &[String],
        descending: &[bool],
    ) -> Result<Self::Frame> {
        let schema = frame.schema.clone();
        Ok(frame.push(
            Operation::Sort {
                by: by.to_vec(),
                descending: descending.to_vec(),
            },
            schema,
        ))
    }

    fn limit(&self, frame: &Self::Frame, n: usize) -> Result<Self::Frame> {
        let schema = frame.schema.clone();
        Ok(frame.push(Operation::Limit(n), schema))
    }

    fn collect(&self, frame: Self::Frame) -> Result<Self::Frame> {
        let computed = frame.execute(&self.config)?;
        Ok(LazyFrame::scan(computed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Int64Column;
    use crate::expr::{col, lit};

    fn source() -> ColumnarFrame {
        ColumnarFrame::from_columns(vec![(
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 3])),
        )])
        .unwrap()
    }

    #[test]
    fn operations_queue_without_computing() {
        let backend = LazyBackend::default();
        let frame = LazyFrame::scan(source());
        let mask = LazyCol {
            name: "a".to_string(),
            expr: col("a").gt(lit(1)),
        };
        let filtered = backend.filter(&frame, &mask).unwrap();
        assert_eq!(filtered.operation_count(), 1);
        assert_eq!(frame.operation_count(), 0);
    }

    #[test]
    fn explain_lists_the_plan() {
        let backend = LazyBackend::default();
        let frame = LazyFrame::scan(source());
        let frame = backend.limit(&frame, 2).unwrap();
        let plan = frame.explain();
        assert!(plan.starts_with("SCAN 1 columns x 3 rows"));
        assert!(plan.ends_with("LIMIT 2"));
    }
}
