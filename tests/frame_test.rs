use dfbridge::{
    all, col, lit, sum_horizontal, Column, ColumnarFrame, DataFrame, EngineConfig, Float64Column,
    Int64Column, Scalar,
};

fn source() -> ColumnarFrame {
    ColumnarFrame::from_columns(vec![
        (
            "a".to_string(),
            Column::Int64(Int64Column::new(vec![1, 2, 3])),
        ),
        (
            "b".to_string(),
            Column::Int64(Int64Column::new(vec![4, 5, 6])),
        ),
        (
            "z".to_string(),
            Column::Float64(Float64Column::new(vec![7.0, 8.0, 9.0])),
        ),
    ])
    .unwrap()
}

fn df() -> DataFrame<dfbridge::ColumnarBackend> {
    DataFrame::from_columnar(source(), EngineConfig::default())
}

#[test]
fn with_columns_adds_derived_columns() {
    let out = df()
        .with_columns(&[
            (col("a") + col("b")).alias("c"),
            (col("a") - col("a").mean()).alias("d"),
        ])
        .unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "z", "c", "d"]);
    assert_eq!(
        out.get_column("c").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(5), Scalar::Int64(7), Scalar::Int64(9)]
    );
    // a.mean() == 2.0 broadcasts against the full column
    assert_eq!(
        out.get_column("d").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Float64(-1.0),
            Scalar::Float64(0.0),
            Scalar::Float64(1.0)
        ]
    );
}

#[test]
fn with_columns_overwrites_existing_names() {
    let out = df().with_columns(&[(col("a") * 10).alias("a")]).unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "z"]);
    assert_eq!(
        out.get_column("a").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(10), Scalar::Int64(20), Scalar::Int64(30)]
    );
}

#[test]
fn all_expands_per_column_keeping_names() {
    let out = df().select(&[all() * 2]).unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "z"]);
    assert_eq!(
        out.get_column("b").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(8), Scalar::Int64(10), Scalar::Int64(12)]
    );
    assert_eq!(
        out.get_column("z").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Float64(14.0),
            Scalar::Float64(16.0),
            Scalar::Float64(18.0)
        ]
    );
}

#[test]
fn all_with_an_aggregate_reduces_every_column() {
    let out = df().select(&[all().sum()]).unwrap();
    assert_eq!(out.height(), Some(1));
    assert_eq!(out.column_names(), vec!["a", "b", "z"]);
    assert_eq!(
        out.get_column("a").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(6)]
    );
    assert_eq!(
        out.get_column("b").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(15)]
    );
    assert_eq!(
        out.get_column("z").unwrap().to_scalars().unwrap(),
        vec![Scalar::Float64(24.0)]
    );
}

#[test]
fn all_through_with_columns_overwrites_in_place() {
    let out = df().with_columns(&[all() * 2]).unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "z"]);
    assert_eq!(out.height(), Some(3));
    assert_eq!(
        out.get_column("a").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(2), Scalar::Int64(4), Scalar::Int64(6)]
    );
    assert_eq!(
        out.get_column("z").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Float64(14.0),
            Scalar::Float64(16.0),
            Scalar::Float64(18.0)
        ]
    );
}

#[test]
fn select_of_aggregates_yields_one_row() {
    let out = df().select(&[col("a").sum(), col("b").sum()]).unwrap();
    assert_eq!(out.height(), Some(1));
    assert_eq!(
        out.get_column("a").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(6)]
    );
    assert_eq!(
        out.get_column("b").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(15)]
    );
}

#[test]
fn horizontal_sum_folds_across_columns() {
    let out = df()
        .select(&[sum_horizontal(vec![col("a"), col("b")]).alias("total")])
        .unwrap();
    assert_eq!(
        out.get_column("total").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(5), Scalar::Int64(7), Scalar::Int64(9)]
    );
}

#[test]
fn unnamed_output_defaults_to_leftmost_column() {
    let out = df().select(&[col("a") + 1]).unwrap();
    assert_eq!(out.column_names(), vec!["a"]);
    let out = df().select(&[lit(5)]).unwrap();
    assert_eq!(out.column_names(), vec!["literal"]);
}

#[test]
fn filter_keeps_matching_rows() {
    let out = df().filter(col("a").gt(lit(1))).unwrap();
    assert_eq!(out.height(), Some(2));
    assert_eq!(
        out.get_column("b").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(5), Scalar::Int64(6)]
    );
}

#[test]
fn failed_projection_leaves_no_partial_result() {
    let original = df();
    let err = original.with_columns(&[
        (col("a") + 1).alias("ok"),
        (col("missing") + 1).alias("bad"),
    ]);
    assert!(err.is_err());
    // The source frame is untouched
    assert_eq!(original.column_names(), vec!["a", "b", "z"]);
    assert!(original.get_column("ok").is_err());
}

#[test]
fn limit_truncates_and_is_saturating() {
    let out = df().limit(2).unwrap();
    assert_eq!(out.height(), Some(2));
    let out = df().limit(99).unwrap();
    assert_eq!(out.height(), Some(3));
}

#[test]
fn collect_on_an_eager_frame_is_identity() {
    let out = df().collect().unwrap();
    assert_eq!(out.column_names(), vec!["a", "b", "z"]);
    assert_eq!(out.height(), Some(3));
}

#[test]
fn series_arithmetic_matches_expressions() {
    let frame = df();
    let a = frame.get_column("a").unwrap();
    let b = frame.get_column("b").unwrap();
    let sum = a.add(&b).unwrap();
    assert_eq!(
        sum.to_scalars().unwrap(),
        vec![Scalar::Int64(5), Scalar::Int64(7), Scalar::Int64(9)]
    );
    let halved = a.div(2).unwrap();
    assert_eq!(
        halved.to_scalars().unwrap(),
        vec![
            Scalar::Float64(0.5),
            Scalar::Float64(1.0),
            Scalar::Float64(1.5)
        ]
    );
    let swapped = a.rsub(10).unwrap();
    assert_eq!(
        swapped.to_scalars().unwrap(),
        vec![Scalar::Int64(9), Scalar::Int64(8), Scalar::Int64(7)]
    );
    // x.rtruediv(k) is the reciprocal direction of x.div(k)
    let reciprocal = a.rtruediv(6).unwrap();
    assert_eq!(
        reciprocal.to_f64_vec().unwrap(),
        vec![Some(6.0), Some(3.0), Some(2.0)]
    );
}

#[test]
fn wrapping_a_native_frame_round_trips() {
    let wrapped = DataFrame::from_columnar(source(), EngineConfig::default());
    assert_eq!(wrapped.height(), Some(3));
    let unwrapped = wrapped.into_native();
    assert_eq!(unwrapped.names(), source().names());
    assert_eq!(
        unwrapped.column("a").unwrap().to_scalars().unwrap(),
        source().column("a").unwrap().to_scalars().unwrap()
    );
}
