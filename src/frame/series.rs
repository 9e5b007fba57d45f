//! A standalone evaluated column bound to its engine. Arithmetic between
//! series (or against scalars) goes through the same validator and kernels
//! as frame expressions.

use crate::backend::Backend;
use crate::column::Column;
use crate::compute;
use crate::core::dtype::DType;
use crate::core::error::Result;
use crate::core::scalar::Scalar;
use crate::eval;
use crate::expr::ops::{BinOp, UnaryOp};

/// One column extracted from a frame
#[derive(Debug, Clone)]
pub struct Series<B: Backend> {
    backend: B,
    col: B::Col,
}

/// The right-hand side of a series operation: another series or a scalar
pub enum Operand<'a, B: Backend> {
    Series(&'a Series<B>),
    Scalar(Scalar),
}

impl<'a, B: Backend> From<&'a Series<B>> for Operand<'a, B> {
    fn from(series: &'a Series<B>) -> Self {
        Operand::Series(series)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl<'a, B: Backend> From<$ty> for Operand<'a, B> {
                fn from(value: $ty) -> Self {
                    Operand::Scalar(value.into())
                }
            }
        )*
    };
}

impl_operand_from_scalar!(i64, i32, f64, bool, &str);

impl<B: Backend + Clone> Series<B> {
    pub(crate) fn new(backend: B, col: B::Col) -> Self {
        Self { backend, col }
    }

    /// Length, unknown on the deferred engine
    pub fn len(&self) -> Option<usize> {
        self.backend.col_len(&self.col)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn rename(&self, name: &str) -> Self {
        Self {
            backend: self.backend.clone(),
            col: self.backend.rename(&self.col, name),
        }
    }

    /// Concrete values; a capability error on the deferred engine
    pub fn to_column(&self) -> Result<Column> {
        self.backend.materialize(&self.col)
    }

    pub fn to_scalars(&self) -> Result<Vec<Scalar>> {
        self.to_column()?.to_scalars()
    }

    /// Numeric view as optional f64 values
    pub fn to_f64_vec(&self) -> Result<Vec<Option<f64>>> {
        let col = compute::cast_column(&self.to_column()?, DType::Float64)?;
        Ok(col
            .as_float64()
            .map(|c| c.to_options())
            .unwrap_or_default())
    }

    pub fn get(&self, index: usize) -> Result<Scalar> {
        self.to_column()?.get_scalar(index)
    }

    fn binary<'a>(&self, op: BinOp, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        let rhs = match other.into() {
            Operand::Series(series) => series.col.clone(),
            Operand::Scalar(value) => self.backend.literal(&value)?,
        };
        let out = eval::apply_binary(&self.backend, op, self.col.clone(), rhs)?;
        Ok(Self {
            backend: self.backend.clone(),
            col: out,
        })
    }

    fn rbinary<'a>(&self, op: BinOp, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        let lhs = match other.into() {
            Operand::Series(series) => series.col.clone(),
            Operand::Scalar(value) => self.backend.literal(&value)?,
        };
        let out = eval::apply_binary(&self.backend, op, lhs, self.col.clone())?;
        Ok(Self {
            backend: self.backend.clone(),
            col: out,
        })
    }

    pub fn add<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Add, other)
    }

    pub fn sub<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Sub, other)
    }

    pub fn mul<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Mul, other)
    }

    /// True division, always Float64
    pub fn div<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Div, other)
    }

    /// Floor division, rounding toward negative infinity
    pub fn floor_div<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::FloorDiv, other)
    }

    pub fn rem<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Mod, other)
    }

    pub fn pow<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.binary(BinOp::Pow, other)
    }

    // Swapped-operand family, mirroring the expression builder

    pub fn radd<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Add, other)
    }

    pub fn rsub<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Sub, other)
    }

    pub fn rmul<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Mul, other)
    }

    pub fn rtruediv<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Div, other)
    }

    pub fn rfloordiv<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::FloorDiv, other)
    }

    pub fn rmod<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Mod, other)
    }

    pub fn rpow<'a>(&self, other: impl Into<Operand<'a, B>>) -> Result<Self>
    where
        B: 'a,
    {
        self.rbinary(BinOp::Pow, other)
    }

    pub fn neg(&self) -> Result<Self> {
        let out = self.backend.unary(UnaryOp::Neg, &self.col)?;
        Ok(Self {
            backend: self.backend.clone(),
            col: out,
        })
    }

    pub fn not(&self) -> Result<Self> {
        let out = self.backend.unary(UnaryOp::Not, &self.col)?;
        Ok(Self {
            backend: self.backend.clone(),
            col: out,
        })
    }
}
