//! Typed column storage. One implementation per physical type, each holding
//! immutable `Arc` data plus an optional null bitmask, with a `Column` enum
//! dispatching over them.

pub mod boolean_column;
pub mod common;
pub mod datetime_column;
pub mod float32_column;
pub mod float64_column;
pub mod int32_column;
pub mod int64_column;
pub mod string_column;

pub use boolean_column::BooleanColumn;
pub use datetime_column::DatetimeColumn;
pub use float32_column::Float32Column;
pub use float64_column::Float64Column;
pub use int32_column::Int32Column;
pub use int64_column::Int64Column;
pub use string_column::StringColumn;

use crate::core::dtype::DType;
use crate::core::error::{Error, Result};
use crate::core::scalar::Scalar;

/// Enum representing a column of any supported dtype
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int32(Int32Column),
    Int64(Int64Column),
    Float32(Float32Column),
    Float64(Float64Column),
    Boolean(BooleanColumn),
    String(StringColumn),
    Datetime(DatetimeColumn),
}

impl Column {
    /// Returns the length of the column
    pub fn len(&self) -> usize {
        match self {
            Column::Int32(col) => col.len(),
            Column::Int64(col) => col.len(),
            Column::Float32(col) => col.len(),
            Column::Float64(col) => col.len(),
            Column::Boolean(col) => col.len(),
            Column::String(col) => col.len(),
            Column::Datetime(col) => col.len(),
        }
    }

    /// Returns whether the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the logical dtype of the column
    pub fn dtype(&self) -> DType {
        match self {
            Column::Int32(_) => DType::Int32,
            Column::Int64(_) => DType::Int64,
            Column::Float32(_) => DType::Float32,
            Column::Float64(_) => DType::Float64,
            Column::Boolean(_) => DType::Boolean,
            Column::String(_) => DType::Utf8,
            Column::Datetime(_) => DType::Datetime,
        }
    }

    /// Returns the name of the column
    pub fn name(&self) -> Option<&str> {
        match self {
            Column::Int32(col) => col.name.as_deref(),
            Column::Int64(col) => col.name.as_deref(),
            Column::Float32(col) => col.name.as_deref(),
            Column::Float64(col) => col.name.as_deref(),
            Column::Boolean(col) => col.name.as_deref(),
            Column::String(col) => col.name.as_deref(),
            Column::Datetime(col) => col.name.as_deref(),
        }
    }

    /// Set the name in place
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Column::Int32(col) => col.name = Some(name),
            Column::Int64(col) => col.name = Some(name),
            Column::Float32(col) => col.name = Some(name),
            Column::Float64(col) => col.name = Some(name),
            Column::Boolean(col) => col.name = Some(name),
            Column::String(col) => col.name = Some(name),
            Column::Datetime(col) => col.name = Some(name),
        }
    }

    /// Return a renamed copy
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.set_name(name);
        out
    }

    /// Get the element at `index` as a scalar, `Scalar::Null` for NULL
    pub fn get_scalar(&self, index: usize) -> Result<Scalar> {
        Ok(match self {
            Column::Int32(col) => col
                .get(index)?
                .map(|v| Scalar::Int64(v as i64))
                .unwrap_or(Scalar::Null),
            Column::Int64(col) => col
                .get(index)?
                .map(Scalar::Int64)
                .unwrap_or(Scalar::Null),
            Column::Float32(col) => col
                .get(index)?
                .map(|v| Scalar::Float64(v as f64))
                .unwrap_or(Scalar::Null),
            Column::Float64(col) => col
                .get(index)?
                .map(Scalar::Float64)
                .unwrap_or(Scalar::Null),
            Column::Boolean(col) => col
                .get(index)?
                .map(Scalar::Boolean)
                .unwrap_or(Scalar::Null),
            Column::String(col) => col
                .get(index)?
                .map(|v| Scalar::Utf8(v.to_string()))
                .unwrap_or(Scalar::Null),
            Column::Datetime(col) => col
                .get(index)?
                .map(Scalar::Datetime)
                .unwrap_or(Scalar::Null),
        })
    }

    /// Expand the full column to scalars
    pub fn to_scalars(&self) -> Result<Vec<Scalar>> {
        (0..self.len()).map(|i| self.get_scalar(i)).collect()
    }

    /// Build a length-1 column from a scalar. A `Null` scalar materializes
    /// as a NULL Int64 element (the dtype is refined on first coercion).
    pub fn from_scalar(value: &Scalar) -> Self {
        match value {
            Scalar::Null => Column::Int64(Int64Column::from_options(vec![None])),
            Scalar::Int64(v) => Column::Int64(Int64Column::new(vec![*v])),
            Scalar::Float64(v) => Column::Float64(Float64Column::new(vec![*v])),
            Scalar::Boolean(v) => Column::Boolean(BooleanColumn::new(vec![*v])),
            Scalar::Utf8(v) => Column::String(StringColumn::new(vec![v.clone()])),
            Scalar::Datetime(v) => Column::Datetime(DatetimeColumn::new(vec![*v])),
        }
    }

    /// Build a column from scalars. The dtype comes from the first non-null
    /// value; every other non-null value must agree with it.
    pub fn from_scalars(values: Vec<Scalar>) -> Result<Self> {
        let dtype = values.iter().find_map(|v| v.dtype());
        let column = match dtype {
            None => Column::Int64(Int64Column::from_options(vec![None; values.len()])),
            Some(DType::Int64) => {
                let opts = values
                    .iter()
                    .map(|v| match v {
                        Scalar::Null => Ok(None),
                        Scalar::Int64(x) => Ok(Some(*x)),
                        other => Err(mixed_dtype_error(DType::Int64, other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Int64(Int64Column::from_options(opts))
            }
            Some(DType::Float64) => {
                let opts = values
                    .iter()
                    .map(|v| match v {
                        Scalar::Null => Ok(None),
                        Scalar::Float64(x) => Ok(Some(*x)),
                        Scalar::Int64(x) => Ok(Some(*x as f64)),
                        other => Err(mixed_dtype_error(DType::Float64, other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Float64(Float64Column::from_options(opts))
            }
            Some(DType::Boolean) => {
                let opts = values
                    .iter()
                    .map(|v| match v {
                        Scalar::Null => Ok(None),
                        Scalar::Boolean(x) => Ok(Some(*x)),
                        other => Err(mixed_dtype_error(DType::Boolean, other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Boolean(BooleanColumn::from_options(opts))
            }
            Some(DType::Utf8) => {
                let opts = values
                    .iter()
                    .map(|v| match v {
                        Scalar::Null => Ok(None),
                        Scalar::Utf8(x) => Ok(Some(x.clone())),
                        other => Err(mixed_dtype_error(DType::Utf8, other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::String(StringColumn::from_options(opts))
            }
            Some(DType::Datetime) => {
                let opts = values
                    .iter()
                    .map(|v| match v {
                        Scalar::Null => Ok(None),
                        Scalar::Datetime(x) => Ok(Some(*x)),
                        other => Err(mixed_dtype_error(DType::Datetime, other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Column::Datetime(DatetimeColumn::from_options(opts))
            }
            Some(other) => {
                return Err(Error::InvalidOperation(format!(
                    "cannot build a column of dtype {} from scalars",
                    other
                )))
            }
        };
        Ok(column)
    }

    /// Casts to Int64Column
    pub fn as_int64(&self) -> Option<&Int64Column> {
        match self {
            Column::Int64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to Float64Column
    pub fn as_float64(&self) -> Option<&Float64Column> {
        match self {
            Column::Float64(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to StringColumn
    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to BooleanColumn
    pub fn as_boolean(&self) -> Option<&BooleanColumn> {
        match self {
            Column::Boolean(col) => Some(col),
            _ => None,
        }
    }

    /// Casts to DatetimeColumn
    pub fn as_datetime(&self) -> Option<&DatetimeColumn> {
        match self {
            Column::Datetime(col) => Some(col),
            _ => None,
        }
    }
}

fn mixed_dtype_error(expected: DType, found: &Scalar) -> Error {
    Error::InvalidOperation(format!(
        "mixed dtypes while building a column: expected {}, found {}",
        expected, found
    ))
}

impl From<Int32Column> for Column {
    fn from(col: Int32Column) -> Self {
        Column::Int32(col)
    }
}

impl From<Int64Column> for Column {
    fn from(col: Int64Column) -> Self {
        Column::Int64(col)
    }
}

impl From<Float32Column> for Column {
    fn from(col: Float32Column) -> Self {
        Column::Float32(col)
    }
}

impl From<Float64Column> for Column {
    fn from(col: Float64Column) -> Self {
        Column::Float64(col)
    }
}

impl From<BooleanColumn> for Column {
    fn from(col: BooleanColumn) -> Self {
        Column::Boolean(col)
    }
}

impl From<StringColumn> for Column {
    fn from(col: StringColumn) -> Self {
        Column::String(col)
    }
}

impl From<DatetimeColumn> for Column {
    fn from(col: DatetimeColumn) -> Self {
        Column::Datetime(col)
    }
}
