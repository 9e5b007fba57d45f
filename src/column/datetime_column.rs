use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::column::common;
use crate::core::error::{Error, Result};

/// Structure representing a Datetime column (naive, microsecond precision)
#[derive(Debug, Clone, PartialEq)]
pub struct DatetimeColumn {
    pub(crate) data: Arc<[NaiveDateTime]>,
    pub(crate) null_mask: Option<Arc<[u8]>>,
    pub(crate) name: Option<String>,
}

impl DatetimeColumn {
    /// Create a new DatetimeColumn
    pub fn new(data: Vec<NaiveDateTime>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: None,
        }
    }

    pub fn with_name(data: Vec<NaiveDateTime>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            null_mask: None,
            name: Some(name.into()),
        }
    }

    pub fn with_nulls(data: Vec<NaiveDateTime>, nulls: Vec<bool>) -> Self {
        Self {
            data: data.into(),
            null_mask: common::optional_bitmask(&nulls),
            name: None,
        }
    }

    /// Build from optional values; `None` becomes a NULL element
    pub fn from_options(values: Vec<Option<NaiveDateTime>>) -> Self {
        let nulls: Vec<bool> = values.iter().map(|v| v.is_none()).collect();
        let data: Vec<NaiveDateTime> = values
            .into_iter()
            .map(|v| v.unwrap_or(NaiveDateTime::MIN))
            .collect();
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
    pub fn get(&self, index: usize) -> Result<Option<NaiveDateTime>> {
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
    pub fn to_options(&self) -> Vec<Option<NaiveDateTime>> {
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

    pub fn values(&self) -> &[NaiveDateTime] {
        &self.data
    }
}
