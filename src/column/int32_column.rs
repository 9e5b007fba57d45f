use std::sync::Arc;

use crate::column::common;
use crate::core::error::{Error, Result};

/// Structure representing an Int32 column.
///
/// A narrow-width entry point: kernels upcast Int32 operands to the Int64
/// compute lane, so this type only needs storage and element access.
#[derive(Debug, Clone, PartialEq)]
pub struct Int32Column {
    pub(crate) data: Arc<[i32]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Int32Column {
    pub fn new(data: Vec<i32>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    pub fn with_name(data: Vec<i32>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    pub fn with_nulls(data: Vec<i32>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: common::optional_bitmask(&nulls),
            name: None,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn get(&self, index: usize) -> Result<Option<i32>> {
        if index >= self.data.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                size: self.data.len(),
            });
        }

        if let Some(ref mask) = self.null_mask {
            if common::bit_is_set(mask, index) {
                return Ok(None);
            }
        }

        Ok(Some(self.data[index]))
    }

    pub fn from_options(values: Vec<Option<i32>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(|v| v.is_none()).collect();
        let data: Vec<i32> = values.into_iter().map(|v| v.unwrap_or(0)).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn to_options(&self) -> Vec<Option<i32>> {
        let nulls: Vec<bool> = match &self.null_mask {
            None => vec![false; self.data.len()],
            Some(mask) => common::bitmask_to_bools(mask, self.data.len()),
        };
        self.data
            .iter()
            .zip(nulls)
            .map(|(&v, is_null)| if is_null { None } else { Some(v) })
            .collect()
    }

    /// Widen to optional i64 values for the compute lane
    pub fn to_i64_options(&self) -> Vec<Option<i64>> {
        let nulls: Vec<bool> = match &self.null_mask {
            None => vec![false; self.data.len()],
            Some(mask) => common::bitmask_to_bools(mask, self.data.len()),
        };
        self.data
            .iter()
            .zip(nulls)
            .map(|(&v, is_null)| if is_null { None } else { Some(v as i64) })
            .collect()
    }
}
