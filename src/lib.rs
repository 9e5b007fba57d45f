// Core module with fundamental types: errors, dtypes, scalar values
pub mod core;

// Typed column storage with null bitmasks
pub mod column;

// Backend-neutral compute kernels (elementwise, aggregate, row helpers)
pub mod compute;

// Expression intermediate representation and builder API
pub mod expr;

// Evaluation engine and validator/broadcaster
pub mod eval;

// Backend adapters: eager indexed, eager columnar, lazy
pub mod backend;

// Configuration and API versioning
pub mod config;

// User-facing frame facade
pub mod frame;

// Re-export core types
pub use crate::core::dtype::DType;
pub use crate::core::error::{Error, Result};
pub use crate::core::scalar::Scalar;

pub use crate::column::{
    BooleanColumn, Column, DatetimeColumn, Float32Column, Float64Column, Int32Column, Int64Column,
    StringColumn,
};

pub use crate::expr::ops::{AggKind, BinOp, HorizontalKind, UnaryOp};
pub use crate::expr::{all, col, lit, max_horizontal, min_horizontal, sum_horizontal, Expr};

pub use crate::backend::columnar::{ColumnarBackend, ColumnarFrame};
pub use crate::backend::indexed::{IndexedBackend, IndexedFrame, RowIndex};
pub use crate::backend::lazy::{LazyBackend, LazyFrame};
pub use crate::backend::{Backend, EngineKind, JoinKind};

pub use crate::config::{ApiVersion, EngineConfig};
pub use crate::frame::{DataFrame, GroupBy, Series};
