//! Shared null-bitmask helpers for the typed column implementations.

use std::sync::Arc;

/// Creates a bitmask from a vector of boolean values (bit set = null)
pub fn create_bitmask(nulls: &[bool]) -> Arc<[u8]> {
    let length = nulls.len();
    let bytes_needed = (length + 7) / 8;
    let mut data = vec![0u8; bytes_needed];

    for (i, &is_null) in nulls.iter().enumerate() {
        if is_null {
            let byte_idx = i / 8;
            let bit_idx = i % 8;
            data[byte_idx] |= 1 << bit_idx;
        }
    }

    data.into()
}

/// Converts a bitmask to a vector of boolean values
pub fn bitmask_to_bools(mask: &[u8], len: usize) -> Vec<bool> {
    let mut result = Vec::with_capacity(len);

    for i in 0..len {
        let byte_idx = i / 8;
        let bit_idx = i % 8;
        let is_set = (mask[byte_idx] & (1 << bit_idx)) != 0;
        result.push(is_set);
    }

    result
}

/// Checks one bit without expanding the whole mask
pub fn bit_is_set(mask: &[u8], index: usize) -> bool {
    let byte_idx = index / 8;
    let bit_idx = index % 8;
    byte_idx < mask.len() && (mask[byte_idx] & (1 << bit_idx)) != 0
}

/// Builds the optional mask a column stores: present only when at least one
/// element is null
pub fn optional_bitmask(nulls: &[bool]) -> Option<Arc<[u8]>> {
    if nulls.iter().any(|&is_null| is_null) {
        Some(create_bitmask(nulls))
    } else {
        None
    }
}
