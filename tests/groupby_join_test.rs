use dfbridge::{
    all, col, Column, ColumnarFrame, DataFrame, EngineConfig, Int64Column, JoinKind, Scalar,
    StringColumn,
};

fn sales() -> ColumnarFrame {
    ColumnarFrame::from_columns(vec![
        (
            "region".to_string(),
            Column::String(StringColumn::from_strs(&["b", "a", "b", "c", "a"])),
        ),
        (
            "units".to_string(),
            Column::Int64(Int64Column::new(vec![10, 20, 30, 40, 50])),
        ),
    ])
    .unwrap()
}

fn df(frame: ColumnarFrame) -> DataFrame<dfbridge::ColumnarBackend> {
    DataFrame::from_columnar(frame, EngineConfig::default())
}

fn strings(values: &[&str]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Utf8(v.to_string())).collect()
}

fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Int64(v)).collect()
}

#[test]
fn groups_come_back_in_first_seen_order() {
    let out = df(sales())
        .group_by(&["region"])
        .agg(&[col("units").sum()])
        .unwrap();
    assert_eq!(out.column_names(), vec!["region", "units"]);
    assert_eq!(
        out.get_column("region").unwrap().to_scalars().unwrap(),
        strings(&["b", "a", "c"])
    );
    assert_eq!(
        out.get_column("units").unwrap().to_scalars().unwrap(),
        ints(&[40, 70, 40])
    );
}

#[test]
fn multiple_aggregates_per_group() {
    let out = df(sales())
        .group_by(&["region"])
        .agg(&[
            col("units").sum().alias("total"),
            col("units").mean().alias("avg"),
            col("units").count().alias("n"),
        ])
        .unwrap();
    assert_eq!(out.column_names(), vec!["region", "total", "avg", "n"]);
    assert_eq!(
        out.get_column("avg").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Float64(20.0),
            Scalar::Float64(35.0),
            Scalar::Float64(40.0)
        ]
    );
    assert_eq!(
        out.get_column("n").unwrap().to_scalars().unwrap(),
        ints(&[2, 2, 1])
    );
}

#[test]
fn all_inside_agg_covers_non_key_columns() {
    let out = df(sales()).group_by(&["region"]).agg(&[all().max()]).unwrap();
    assert_eq!(out.column_names(), vec!["region", "units"]);
    assert_eq!(
        out.get_column("units").unwrap().to_scalars().unwrap(),
        ints(&[30, 50, 40])
    );
}

#[test]
fn multi_key_grouping() {
    let frame = ColumnarFrame::from_columns(vec![
        (
            "k1".to_string(),
            Column::Int64(Int64Column::new(vec![1, 1, 2, 1])),
        ),
        (
            "k2".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 1, 1])),
        ),
        (
            "v".to_string(),
            Column::Int64(Int64Column::new(vec![10, 20, 30, 40])),
        ),
    ])
    .unwrap();
    let out = df(frame)
        .group_by(&["k1", "k2"])
        .agg(&[col("v").sum()])
        .unwrap();
    assert_eq!(out.height(), Some(3));
    assert_eq!(
        out.get_column("v").unwrap().to_scalars().unwrap(),
        ints(&[50, 20, 30])
    );
}

fn left_frame() -> ColumnarFrame {
    ColumnarFrame::from_columns(vec![
        (
            "k".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 3])),
        ),
        (
            "lv".to_string(),
            Column::Int64(Int64Column::new(vec![10, 20, 30])),
        ),
    ])
    .unwrap()
}

fn right_frame() -> ColumnarFrame {
    ColumnarFrame::from_columns(vec![
        (
            "k".to_string(),
            Column::Int64(Int64Column::new(vec![2, 3, 4])),
        ),
        (
            "rv".to_string(),
            Column::Int64(Int64Column::new(vec![200, 300, 400])),
        ),
    ])
    .unwrap()
}

#[test]
fn inner_join_drops_unmatched_rows() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Inner)
        .unwrap();
    assert_eq!(out.column_names(), vec!["k", "lv", "rv"]);
    assert_eq!(
        out.get_column("k").unwrap().to_scalars().unwrap(),
        ints(&[2, 3])
    );
    assert_eq!(
        out.get_column("rv").unwrap().to_scalars().unwrap(),
        ints(&[200, 300])
    );
}

#[test]
fn left_join_nulls_the_unmatched_side() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Left)
        .unwrap();
    assert_eq!(
        out.get_column("rv").unwrap().to_scalars().unwrap(),
        vec![Scalar::Null, Scalar::Int64(200), Scalar::Int64(300)]
    );
}

#[test]
fn right_join_keeps_every_right_row() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Right)
        .unwrap();
    assert_eq!(
        out.get_column("lv").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(20), Scalar::Int64(30), Scalar::Null]
    );
    assert_eq!(
        out.get_column("rv").unwrap().to_scalars().unwrap(),
        ints(&[200, 300, 400])
    );
}

#[test]
fn outer_join_keeps_both_sides() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Outer)
        .unwrap();
    assert_eq!(out.height(), Some(4));
    assert_eq!(
        out.get_column("lv").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Int64(10),
            Scalar::Int64(20),
            Scalar::Int64(30),
            Scalar::Null
        ]
    );
}

#[test]
fn multi_key_join_matches_on_every_key() {
    let left = ColumnarFrame::from_columns(vec![
        (
            "k1".to_string(),
            Column::Int64(Int64Column::new(vec![1, 1, 2])),
        ),
        (
            "k2".to_string(),
            Column::String(StringColumn::from_strs(&["x", "y", "x"])),
        ),
        (
            "v".to_string(),
            Column::Int64(Int64Column::new(vec![10, 20, 30])),
        ),
    ])
    .unwrap();
    let right = ColumnarFrame::from_columns(vec![
        (
            "k1".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2])),
        ),
        (
            "k2".to_string(),
            Column::String(StringColumn::from_strs(&["y", "x"])),
        ),
        (
            "w".to_string(),
            Column::Int64(Int64Column::new(vec![100, 200])),
        ),
    ])
    .unwrap();
    let out = df(left)
        .join(&df(right), &["k1", "k2"], &["k1", "k2"], JoinKind::Inner)
        .unwrap();
    assert_eq!(
        out.get_column("v").unwrap().to_scalars().unwrap(),
        ints(&[20, 30])
    );
    assert_eq!(
        out.get_column("w").unwrap().to_scalars().unwrap(),
        ints(&[100, 200])
    );
}

#[test]
fn empty_frame_group_by_keeps_aggregate_columns() {
    let empty = ColumnarFrame::from_columns(vec![
        ("g".to_string(), Column::Int64(Int64Column::new(vec![]))),
        ("v".to_string(), Column::Int64(Int64Column::new(vec![]))),
    ])
    .unwrap();
    let aggs = [col("v").sum().alias("total")];

    let out = df(empty.clone()).group_by(&["g"]).agg(&aggs).unwrap();
    assert_eq!(out.column_names(), vec!["g", "total"]);
    assert_eq!(out.height(), Some(0));

    // The collected frame agrees with the schema the plan tracked
    let planned = DataFrame::scan(empty, EngineConfig::default())
        .group_by(&["g"])
        .agg(&aggs)
        .unwrap();
    assert_eq!(planned.column_names(), vec!["g", "total"]);
    let collected = planned.collect_eager().unwrap();
    assert_eq!(collected.column_names(), vec!["g", "total"]);
    assert_eq!(collected.height(), Some(0));
}

#[test]
fn right_join_fills_the_key_from_the_right_side() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Right)
        .unwrap();
    assert_eq!(
        out.get_column("k").unwrap().to_scalars().unwrap(),
        ints(&[2, 3, 4])
    );
}

#[test]
fn outer_join_fills_the_key_from_the_right_side() {
    let out = df(left_frame())
        .join(&df(right_frame()), &["k"], &["k"], JoinKind::Outer)
        .unwrap();
    assert_eq!(
        out.get_column("k").unwrap().to_scalars().unwrap(),
        ints(&[1, 2, 3, 4])
    );
}

#[test]
fn sort_orders_rows_with_nulls_last() {
    let frame = ColumnarFrame::from_columns(vec![(
        "a".to_string(),
        Column::Int64(Int64Column::from_options(vec![
            Some(3),
            None,
            Some(1),
            Some(2),
        ])),
    )])
    .unwrap();
    let asc = df(frame.clone()).sort(&["a"], &[]).unwrap();
    assert_eq!(
        asc.get_column("a").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Int64(1),
            Scalar::Int64(2),
            Scalar::Int64(3),
            Scalar::Null
        ]
    );
    let desc = df(frame).sort(&["a"], &[true]).unwrap();
    assert_eq!(
        desc.get_column("a").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Int64(3),
            Scalar::Int64(2),
            Scalar::Int64(1),
            Scalar::Null
        ]
    );
}

#[test]
fn sort_with_no_keys_preserves_every_row() {
    let out = df(sales()).sort(&[], &[]).unwrap();
    assert_eq!(out.height(), Some(5));
    assert_eq!(
        out.get_column("units").unwrap().to_scalars().unwrap(),
        ints(&[10, 20, 30, 40, 50])
    );
}

#[test]
fn multi_key_sort_is_stable() {
    let frame = ColumnarFrame::from_columns(vec![
        (
            "g".to_string(),
            Column::String(StringColumn::from_strs(&["b", "a", "b", "a"])),
        ),
        (
            "v".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 3, 4])),
        ),
    ])
    .unwrap();
    let out = df(frame).sort(&["g", "v"], &[false, true]).unwrap();
    assert_eq!(
        out.get_column("v").unwrap().to_scalars().unwrap(),
        ints(&[4, 2, 3, 1])
    );
}
