use dfbridge::{
    col, lit, Column, ColumnarFrame, DataFrame, EngineConfig, Error, IndexedFrame, Int64Column,
    RowIndex, StringColumn,
};

fn labels(names: &[&str]) -> RowIndex {
    RowIndex::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
}

#[test]
fn series_length_mismatch_is_a_shape_error() {
    let config = EngineConfig::default();
    let short = DataFrame::from_columnar(
        ColumnarFrame::from_columns(vec![(
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2])),
        )])
        .unwrap(),
        config.clone(),
    );
    let long = DataFrame::from_columnar(
        ColumnarFrame::from_columns(vec![(
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 3])),
        )])
        .unwrap(),
        config,
    );
    let lhs = short.get_column("a").unwrap();
    let rhs = long.get_column("a").unwrap();
    assert!(matches!(
        lhs.add(&rhs),
        Err(Error::ShapeMismatch { left: 2, right: 3 })
    ));
}

#[test]
fn aligned_frames_operate_elementwise() {
    let config = EngineConfig::default();
    let frame = IndexedFrame::with_index(
        vec![
            (
                "a".to_string(),
                Column::Int64(Int64Column::new(vec![1, 2, 3])),
            ),
            (
                "b".to_string(),
                Column::Int64(Int64Column::new(vec![10, 20, 30])),
            ),
        ],
        labels(&["x", "y", "z"]),
    )
    .unwrap();
    let df = DataFrame::from_indexed(frame, config);
    let out = df.with_columns(&[(col("a") + col("b")).alias("c")]).unwrap();
    assert_eq!(out.native().index().labels(), &["x", "y", "z"]);
}

#[test]
fn label_mismatch_is_a_hard_error_not_a_realignment() {
    let config = EngineConfig::default();
    let left = DataFrame::from_indexed(
        IndexedFrame::with_index(
            vec![(
                "a".to_string(),
                Column::Int64(Int64Column::new(vec![1, 2, 3])),
            )],
            labels(&["x", "y", "z"]),
        )
        .unwrap(),
        config.clone(),
    );
    let right = DataFrame::from_indexed(
        IndexedFrame::with_index(
            vec![(
                "a".to_string(),
                Column::Int64(Int64Column::new(vec![1, 2, 3])),
            )],
            labels(&["z", "y", "x"]),
        )
        .unwrap(),
        config,
    );
    let lhs = left.get_column("a").unwrap();
    let rhs = right.get_column("a").unwrap();
    assert!(matches!(lhs.add(&rhs), Err(Error::AlignmentMismatch(_))));
}

#[test]
fn length_one_broadcasts_regardless_of_labels() {
    let config = EngineConfig::default();
    let df = DataFrame::from_indexed(
        IndexedFrame::with_index(
            vec![(
                "a".to_string(),
                Column::Int64(Int64Column::new(vec![1, 2, 3])),
            )],
            labels(&["x", "y", "z"]),
        )
        .unwrap(),
        config,
    );
    // The aggregate result has length 1 and its own default index, yet
    // still combines with the labeled column
    let out = df
        .with_columns(&[(col("a") - col("a").min()).alias("shifted")])
        .unwrap();
    assert_eq!(
        out.get_column("shifted").unwrap().to_scalars().unwrap(),
        vec![
            dfbridge::Scalar::Int64(0),
            dfbridge::Scalar::Int64(1),
            dfbridge::Scalar::Int64(2)
        ]
    );
}

#[test]
fn string_arithmetic_is_unsupported() {
    let config = EngineConfig::default();
    let df = DataFrame::from_columnar(
        ColumnarFrame::from_columns(vec![(
            "s".to_string(),
            Column::String(StringColumn::from_strs(&["a", "b"])),
        )])
        .unwrap(),
        config,
    );
    assert!(matches!(
        df.with_columns(&[(col("s") + lit(1)).alias("out")]),
        Err(Error::UnsupportedOperation { .. })
    ));
}

#[test]
fn missing_column_is_reported_by_name() {
    let config = EngineConfig::default();
    let df = DataFrame::from_columnar(
        ColumnarFrame::from_columns(vec![(
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1])),
        )])
        .unwrap(),
        config,
    );
    match df.select(&[col("nope")]) {
        Err(Error::ColumnNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected ColumnNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn deferred_series_cannot_materialize() {
    let config = EngineConfig::default();
    let df = DataFrame::scan(
        ColumnarFrame::from_columns(vec![(
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2])),
        )])
        .unwrap(),
        config,
    );
    let series = df.get_column("a").unwrap();
    assert!(matches!(
        series.to_column(),
        Err(Error::BackendCapability(_))
    ));
    // Shape checks defer too: nothing fails until collect
    assert_eq!(series.len(), None);
}

#[test]
fn deferred_shape_error_surfaces_at_collect() {
    let config = EngineConfig::default();
    let df = DataFrame::scan(
        ColumnarFrame::from_columns(vec![(
            "s".to_string(),
            Column::String(StringColumn::from_strs(&["a", "b"])),
        )])
        .unwrap(),
        config,
    );
    // Plan construction succeeds, the dtype error appears on replay
    let planned = df.with_columns(&[(col("s") + lit(1)).alias("out")]).unwrap();
    assert!(matches!(
        planned.collect_eager(),
        Err(Error::UnsupportedOperation { .. })
    ));
}
