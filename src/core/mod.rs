//! Fundamental types shared by every layer: error taxonomy, logical dtypes,
//! and dynamically-typed scalar values.

pub mod dtype;
pub mod error;
pub mod scalar;

pub use dtype::DType;
pub use error::{Error, Result};
pub use scalar::Scalar;
