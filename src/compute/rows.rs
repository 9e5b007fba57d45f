//! Row-level helpers shared by the eager frame operations: row gathering,
//! group partitioning, stable multi-key sorting, join matching, and mask
//! filtering. Operating on materialized `Column`s keeps these identical
//! across backends.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::backend::JoinKind;
use crate::column::{
    BooleanColumn, Column, DatetimeColumn, Float32Column, Float64Column, Int32Column, Int64Column,
    StringColumn,
};
use crate::compute::cast_column;
use crate::core::dtype::DType;
use crate::core::error::{Error, Result};
use crate::core::scalar::{Scalar, ScalarKey};

/// Gather rows of a column by index
pub fn take_column(col: &Column, indices: &[usize]) -> Result<Column> {
    let picked: Vec<Option<usize>> = indices.iter().map(|&i| Some(i)).collect();
    take_column_opt(col, &picked)
}

macro_rules! take_typed {
    ($col:expr, $indices:expr, $ctor:path, $variant:path) => {{
        let opts = $col.to_options();
        let mut out = Vec::with_capacity($indices.len());
        for idx in $indices {
            match idx {
                Some(i) => {
                    let v = opts.get(*i).ok_or(Error::IndexOutOfBounds {
                        index: *i,
                        size: opts.len(),
                    })?;
                    out.push(v.clone());
                }
                None => out.push(None),
            }
        }
        Ok($variant($ctor(out)))
    }};
}

/// Gather rows of a column; a `None` index produces a NULL element
/// (unmatched side of an outer join)
pub fn take_column_opt(col: &Column, indices: &[Option<usize>]) -> Result<Column> {
    let taken: Column = match col {
        Column::Int32(c) => take_typed!(c, indices, Int32Column::from_options, Column::Int32)?,
        Column::Int64(c) => take_typed!(c, indices, Int64Column::from_options, Column::Int64)?,
        Column::Float32(c) => {
            take_typed!(c, indices, Float32Column::from_options, Column::Float32)?
        }
        Column::Float64(c) => {
            take_typed!(c, indices, Float64Column::from_options, Column::Float64)?
        }
        Column::Boolean(c) => {
            take_typed!(c, indices, BooleanColumn::from_options, Column::Boolean)?
        }
        Column::String(c) => take_typed!(c, indices, StringColumn::from_options, Column::String)?,
        Column::Datetime(c) => {
            take_typed!(c, indices, DatetimeColumn::from_options, Column::Datetime)?
        }
    };
    Ok(match col.name() {
        Some(name) => taken.renamed(name),
        None => taken,
    })
}

/// Row indices surviving a boolean filter mask; NULL mask elements drop
pub fn filter_indices(mask: &BooleanColumn) -> Vec<usize> {
    mask.to_options()
        .into_iter()
        .enumerate()
        .filter_map(|(i, keep)| if keep == Some(true) { Some(i) } else { None })
        .collect()
}

fn row_key(cols: &[Column], row: usize) -> Result<Vec<ScalarKey>> {
    cols.iter()
        .map(|c| c.get_scalar(row).map(|s| s.key()))
        .collect()
}

/// Partition rows by key-column equality. Groups come back in first-seen
/// key order, each as the row indices belonging to it.
pub fn group_rows(keys: &[Column]) -> Result<Vec<Vec<usize>>> {
    let height = keys.first().map(|c| c.len()).unwrap_or(0);
    let mut slots: HashMap<Vec<ScalarKey>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for row in 0..height {
        let key = row_key(keys, row)?;
        match slots.get(&key) {
            Some(&slot) => groups[slot].push(row),
            None => {
                slots.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }
    Ok(groups)
}

/// Compare two scalars for sorting. NULL sorts after every value regardless
/// of direction; mixed numeric dtypes compare in the float lane.
pub fn scalar_cmp(a: &Scalar, b: &Scalar) -> Result<Ordering> {
    let ord = match (a, b) {
        (Scalar::Null, Scalar::Null) => Ordering::Equal,
        (Scalar::Null, _) => Ordering::Greater,
        (_, Scalar::Null) => Ordering::Less,
        (Scalar::Int64(x), Scalar::Int64(y)) => x.cmp(y),
        (Scalar::Utf8(x), Scalar::Utf8(y)) => x.cmp(y),
        (Scalar::Boolean(x), Scalar::Boolean(y)) => x.cmp(y),
        (Scalar::Datetime(x), Scalar::Datetime(y)) => x.cmp(y),
        _ => {
            let (x, y) = match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(Error::UnsupportedOperation {
                        op: "sort".to_string(),
                        left: a.dtype().map(|d| d.to_string()).unwrap_or_default(),
                        right: b.dtype().map(|d| d.to_string()).unwrap_or_default(),
                    })
                }
            };
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    };
    Ok(ord)
}

/// Stable multi-key sort: returns the row permutation. `descending` holds
/// one flag per key; NULLs go last either way. Zero keys leave the rows in
/// their incoming order.
pub fn sort_indices(keys: &[Column], descending: &[bool], height: usize) -> Result<Vec<usize>> {
    let mut rows: Vec<Vec<Scalar>> = Vec::with_capacity(height);
    for row in 0..height {
        rows.push(
            keys.iter()
                .map(|c| c.get_scalar(row))
                .collect::<Result<Vec<_>>>()?,
        );
    }

    let mut indices: Vec<usize> = (0..height).collect();
    let mut cmp_error = None;
    indices.sort_by(|&ia, &ib| {
        for (k, desc) in descending.iter().enumerate() {
            let (a, b) = (&rows[ia][k], &rows[ib][k]);
            let ord = match scalar_cmp(a, b) {
                Ok(ord) => ord,
                Err(e) => {
                    cmp_error.get_or_insert(e);
                    return Ordering::Equal;
                }
            };
            // Reverse value ordering only; NULL stays last
            let ord = if *desc && !a.is_null() && !b.is_null() {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    match cmp_error {
        Some(e) => Err(e),
        None => Ok(indices),
    }
}

/// Upcast both sides of one join-key pair to a common dtype so that key
/// hashing agrees across engines
fn normalize_key_pair(left: &Column, right: &Column) -> Result<(Column, Column)> {
    let (lt, rt) = (left.dtype(), right.dtype());
    if lt == rt {
        return Ok((left.clone(), right.clone()));
    }
    if lt.is_numeric() && rt.is_numeric() {
        let lane = DType::coerce_numeric(lt, rt)?.compute_lane();
        return Ok((cast_column(left, lane)?, cast_column(right, lane)?));
    }
    Err(Error::UnsupportedOperation {
        op: "join".to_string(),
        left: lt.to_string(),
        right: rt.to_string(),
    })
}

/// Match rows of two key sets. Returns `(left_row, right_row)` pairs in a
/// stable order: left-row-major for inner/left, right-row-major for right,
/// left pass then unmatched right rows for outer. NULL keys never match.
pub fn join_indices(
    left_keys: &[Column],
    right_keys: &[Column],
    how: JoinKind,
) -> Result<Vec<(Option<usize>, Option<usize>)>> {
    if left_keys.len() != right_keys.len() {
        return Err(Error::InvalidOperation(format!(
            "join key count mismatch: {} left vs {} right",
            left_keys.len(),
            right_keys.len()
        )));
    }
    let mut lk = Vec::with_capacity(left_keys.len());
    let mut rk = Vec::with_capacity(right_keys.len());
    for (l, r) in left_keys.iter().zip(right_keys.iter()) {
        let (l, r) = normalize_key_pair(l, r)?;
        lk.push(l);
        rk.push(r);
    }

    let left_height = lk.first().map(|c| c.len()).unwrap_or(0);
    let right_height = rk.first().map(|c| c.len()).unwrap_or(0);

    let mut right_map: HashMap<Vec<ScalarKey>, Vec<usize>> = HashMap::new();
    for row in 0..right_height {
        let key = row_key(&rk, row)?;
        if key.iter().any(|k| matches!(k, ScalarKey::Null)) {
            continue;
        }
        right_map.entry(key).or_default().push(row);
    }

    let mut pairs = Vec::new();
    match how {
        JoinKind::Inner | JoinKind::Left | JoinKind::Outer => {
            let mut matched_right = vec![false; right_height];
            for row in 0..left_height {
                let key = row_key(&lk, row)?;
                let matches = if key.iter().any(|k| matches!(k, ScalarKey::Null)) {
                    None
                } else {
                    right_map.get(&key)
                };
                match matches {
                    Some(found) => {
                        for &j in found {
                            matched_right[j] = true;
                            pairs.push((Some(row), Some(j)));
                        }
                    }
                    None => {
                        if !matches!(how, JoinKind::Inner) {
                            pairs.push((Some(row), None));
                        }
                    }
                }
            }
            if matches!(how, JoinKind::Outer) {
                for (j, seen) in matched_right.iter().enumerate() {
                    if !seen {
                        pairs.push((None, Some(j)));
                    }
                }
            }
        }
        JoinKind::Right => {
            let mut left_map: HashMap<Vec<ScalarKey>, Vec<usize>> = HashMap::new();
            for row in 0..left_height {
                let key = row_key(&lk, row)?;
                if key.iter().any(|k| matches!(k, ScalarKey::Null)) {
                    continue;
                }
                left_map.entry(key).or_default().push(row);
            }
            for row in 0..right_height {
                let key = row_key(&rk, row)?;
                let matches = if key.iter().any(|k| matches!(k, ScalarKey::Null)) {
                    None
                } else {
                    left_map.get(&key)
                };
                match matches {
                    Some(found) => {
                        for &i in found {
                            pairs.push((Some(i), Some(row)));
                        }
                    }
                    None => pairs.push((None, Some(row))),
                }
            }
        }
    }
    Ok(pairs)
}

/// Fill unmatched-left rows of a joined key column from the right-side key,
/// so right and outer joins keep a complete key column
pub fn coalesce_key_column(
    left_taken: &Column,
    right_key: &Column,
    left_idx: &[Option<usize>],
    right_idx: &[Option<usize>],
) -> Result<Column> {
    if left_idx.iter().all(|l| l.is_some()) {
        return Ok(left_taken.clone());
    }
    let mut values = Vec::with_capacity(left_idx.len());
    for (row, l) in left_idx.iter().enumerate() {
        match (l, right_idx[row]) {
            (None, Some(j)) => values.push(right_key.get_scalar(j)?),
            _ => values.push(left_taken.get_scalar(row)?),
        }
    }
    let out = Column::from_scalars(values)?;
    Ok(match left_taken.name() {
        Some(name) => out.renamed(name),
        None => out,
    })
}

/// Output column names of a join: every left column, then every right
/// column except the right join keys; collisions get a `_right` suffix
pub fn join_output_names(
    left_names: &[String],
    right_names: &[String],
    right_on: &[String],
) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for name in right_names {
        if right_on.contains(name) {
            continue;
        }
        let output = if left_names.contains(name) {
            format!("{}_right", name)
        } else {
            name.clone()
        };
        out.push((name.clone(), output));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_keep_first_seen_order() {
        let keys = vec![Column::String(StringColumn::from_strs(&[
            "b", "a", "b", "c", "a",
        ]))];
        let groups = group_rows(&keys).unwrap();
        assert_eq!(groups, vec![vec![0, 2], vec![1, 4], vec![3]]);
    }

    #[test]
    fn sort_is_stable_and_nulls_go_last() {
        let keys = vec![Column::Int64(Int64Column::from_options(vec![
            Some(2),
            None,
            Some(1),
            Some(2),
        ]))];
        let asc = sort_indices(&keys, &[false], 4).unwrap();
        assert_eq!(asc, vec![2, 0, 3, 1]);
        let desc = sort_indices(&keys, &[true], 4).unwrap();
        assert_eq!(desc, vec![0, 3, 2, 1]);
    }

    #[test]
    fn sorting_by_no_keys_is_the_identity() {
        let order = sort_indices(&[], &[], 3).unwrap();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn inner_join_matches_in_left_order() {
        let left = vec![Column::Int64(Int64Column::new(vec![1, 2, 3]))];
        let right = vec![Column::Int64(Int64Column::new(vec![3, 1]))];
        let pairs = join_indices(&left, &right, JoinKind::Inner).unwrap();
        assert_eq!(pairs, vec![(Some(0), Some(1)), (Some(2), Some(0))]);
    }

    #[test]
    fn null_keys_never_match() {
        let left = vec![Column::Int64(Int64Column::from_options(vec![
            Some(1),
            None,
        ]))];
        let right = vec![Column::Int64(Int64Column::from_options(vec![
            None,
            Some(1),
        ]))];
        let pairs = join_indices(&left, &right, JoinKind::Inner).unwrap();
        assert_eq!(pairs, vec![(Some(0), Some(1))]);
    }
}
