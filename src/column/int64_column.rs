use std::sync::Arc;

use crate::column::common;
use crate::core::error::{Error, Result};

/// Structure representing an Int64 column
#[derive(Debug, Clone, PartialEq)]
pub struct Int64Column {
    pub(crate) data: Arc<[i64]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl Int64Column {
    /// Create a new Int64Column
    pub fn new(data: Vec<i64>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    /// Create an Int64Column with a name
    pub fn with_name(data: Vec<i64>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    /// Create an Int64Column with NULL values
    pub fn with_nulls(data: Vec<i64>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: common::optional_bitmask(&nulls),
            name: None,
        }
    }

    /// Build from optional values; `None` becomes a NULL element
    pub fn from_options(values: Vec<Option<i64>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(|v| v.is_none()).collect();
        let data: Vec<i64> = values.into_iter().map(|v| v.unwrap_or(0)).collect();
        Self::with_nulls(data, nulls)
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

    /// Get data at the specified index, `None` for NULL
    pub fn get(&self, index: usize) -> Result<Option<i64>> {
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

    /// Expand to a vector of optional values
    pub fn to_options(&self) -> Vec<Option<i64>> {
        match &self.null_mask {
            None => self.data.iter().map(|&v| Some(v)).collect(),
            Some(mask) => {
                let nulls = common::bitmask_to_bools(mask, self.data.len());
                self.data
                    .iter()
                    .zip(nulls)
                    .map(|(&v, is_null)| if is_null { None } else { Some(v) })
                    .collect()
            }
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.data
    }
}
