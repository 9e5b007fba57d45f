use std::sync::Arc;

use crate::column::common;
use crate::core::error::{Error, Result};

/// Structure representing a Float32 column.
///
/// Like `Int32Column`, a narrow entry point upcast to the Float64 compute
/// lane by the kernels.
#[derive(Debug, Clone, PartialEq)]
pub struct Float32Column {
    pub(crate) data: Arc<[f32]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Float32Column {
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    pub fn with_name(data: Vec<f32>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    pub fn with_nulls(data: Vec<f32>, nulls: Vec<bool>) -> Self {
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

    pub fn get(&self, index: usize) -> Result<Option<f32>> {
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

    pub fn from_options(values: Vec<Option<f32>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(|v| v.is_none()).collect();
        let data: Vec<f32> = values.into_iter().map(|v| v.unwrap_or(0.0)).collect();
        Self::with_nulls(data, nulls)
    }

    pub fn to_options(&self) -> Vec<Option<f32>> {
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

    /// Widen to optional f64 values for the compute lane
    pub fn to_f64_options(&self) -> Vec<Option<f64>> {
        let nulls: Vec<bool> = match &self.null_mask {
            None => vec![false; self.data.len()],
            Some(mask) => common::bitmask_to_bools(mask, self.data.len()),
        };
        self.data
            .iter()
            .zip(nulls)
            .map(|(&v, is_null)| if is_null { None } else { Some(v as f64) })
            .collect()
    }
}
