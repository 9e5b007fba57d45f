use dfbridge::{
    col, lit, max_horizontal, min_horizontal, ApiVersion, Column, ColumnarFrame, DataFrame,
    EngineConfig, Error, Expr, Int64Column, Scalar,
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
    ])
    .unwrap()
}

/// Evaluate one expression as a new column `out` on all three engines and
/// check they agree on the result
fn check_on_all_engines(expr: Expr, expected: Vec<Scalar>) {
    let config = EngineConfig::default();
    let exprs = [expr.alias("out")];

    let columnar = DataFrame::from_columnar(source(), config.clone());
    let out = columnar.with_columns(&exprs).unwrap();
    assert_eq!(
        out.get_column("out").unwrap().to_scalars().unwrap(),
        expected,
        "columnar"
    );

    let indexed = DataFrame::from_indexed(
        dfbridge::IndexedFrame::from_columnar(&source()).unwrap(),
        config.clone(),
    );
    let out = indexed.with_columns(&exprs).unwrap();
    assert_eq!(
        out.get_column("out").unwrap().to_scalars().unwrap(),
        expected,
        "indexed"
    );

    let lazy = DataFrame::scan(source(), config);
    let out = lazy.with_columns(&exprs).unwrap().collect_eager().unwrap();
    assert_eq!(
        out.get_column("out").unwrap().to_scalars().unwrap(),
        expected,
        "lazy"
    );
}

fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Int64(v)).collect()
}

fn floats(values: &[f64]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Float64(v)).collect()
}

#[test]
fn column_plus_scalar() {
    check_on_all_engines(col("a") + 2, ints(&[3, 4, 5]));
}

#[test]
fn scalar_plus_column() {
    check_on_all_engines(2i64 + col("a"), ints(&[3, 4, 5]));
}

#[test]
fn column_pairwise_arithmetic() {
    check_on_all_engines(col("a") + col("b"), ints(&[5, 7, 9]));
    check_on_all_engines(col("b") - col("a"), ints(&[3, 3, 3]));
    check_on_all_engines(col("a") * col("b"), ints(&[4, 10, 18]));
}

#[test]
fn swapped_operand_family_mirrors_the_direct_one() {
    // x.rsub(y) must equal y - x
    check_on_all_engines(col("a").rsub(10), ints(&[9, 8, 7]));
    check_on_all_engines(col("a").radd(10), ints(&[11, 12, 13]));
    check_on_all_engines(col("a").rmul(3), ints(&[3, 6, 9]));
    check_on_all_engines(col("a").rtruediv(6), floats(&[6.0, 3.0, 2.0]));
    check_on_all_engines(col("a").rfloordiv(7), ints(&[7, 3, 2]));
    check_on_all_engines(col("a").rmod(7), ints(&[0, 1, 1]));
    check_on_all_engines(col("a").rpow(2), ints(&[2, 4, 8]));
}

#[test]
fn true_division_always_yields_float() {
    check_on_all_engines(col("b") / col("a"), floats(&[4.0, 2.5, 2.0]));
    check_on_all_engines(col("a") / 2, floats(&[0.5, 1.0, 1.5]));
}

#[test]
fn floor_division_rounds_toward_negative_infinity() {
    check_on_all_engines((-7i64 + col("a") - col("a")).floor_div(2), ints(&[-4, -4, -4]));
    check_on_all_engines(col("a").floor_div(2), ints(&[0, 1, 1]));
    check_on_all_engines((col("a") - 5).floor_div(2), ints(&[-2, -2, -1]));
    check_on_all_engines((col("a") - 5) % 3, ints(&[2, 0, 1]));
}

#[test]
fn float_floor_division_and_modulo() {
    check_on_all_engines((col("a") * 1.0 - 5.0).floor_div(2), floats(&[-2.0, -2.0, -1.0]));
    check_on_all_engines((col("a") * 1.0 - 5.0) % 3, floats(&[2.0, 0.0, 1.0]));
}

#[test]
fn integer_division_by_zero_becomes_null() {
    check_on_all_engines(
        col("a").floor_div(col("a") - 2),
        vec![Scalar::Int64(-1), Scalar::Null, Scalar::Int64(3)],
    );
    check_on_all_engines(
        col("a") % (col("a") - 2),
        vec![Scalar::Int64(0), Scalar::Null, Scalar::Int64(0)],
    );
}

#[test]
fn unary_negation() {
    check_on_all_engines(-col("a"), ints(&[-1, -2, -3]));
}

#[test]
fn integer_pow_stays_integer_for_non_negative_exponents() {
    check_on_all_engines(col("a").pow(2), ints(&[1, 4, 9]));
}

#[test]
fn negative_integer_exponent_promotes_on_current_api() {
    check_on_all_engines(lit(2).pow(-col("a")), floats(&[0.5, 0.25, 0.125]));
}

#[test]
fn negative_integer_exponent_is_rejected_on_old_api() {
    let config = EngineConfig::with_api_version(ApiVersion::new(0, 20));
    let df = DataFrame::from_columnar(source(), config);
    let err = df.with_columns(&[lit(2).pow(-col("a")).alias("out")]);
    assert!(matches!(err, Err(Error::UnsupportedOperation { .. })));
}

#[test]
fn horizontal_min_picks_the_rowwise_smaller_value() {
    // min(4, 3), min(5, 6), min(6, 9)
    check_on_all_engines(
        min_horizontal(vec![col("b"), col("a") * 3]),
        ints(&[3, 5, 6]),
    );
}

#[test]
fn horizontal_max_picks_the_rowwise_larger_value() {
    check_on_all_engines(
        max_horizontal(vec![col("a"), col("b") - 4]),
        ints(&[1, 2, 3]),
    );
}

#[test]
fn comparisons_produce_boolean_columns() {
    let config = EngineConfig::default();
    let df = DataFrame::from_columnar(source(), config);
    let out = df
        .with_columns(&[col("a").gt_eq(lit(2)).alias("big")])
        .unwrap();
    assert_eq!(
        out.get_column("big").unwrap().to_scalars().unwrap(),
        vec![
            Scalar::Boolean(false),
            Scalar::Boolean(true),
            Scalar::Boolean(true)
        ]
    );
}

#[test]
fn null_propagates_through_arithmetic() {
    let frame = ColumnarFrame::from_columns(vec![(
        "a".to_string(),
        Column::Int64(Int64Column::from_options(vec![Some(1), None, Some(3)])),
    )])
    .unwrap();
    let df = DataFrame::from_columnar(frame, EngineConfig::default());
    let out = df.with_columns(&[(col("a") + 1).alias("out")]).unwrap();
    assert_eq!(
        out.get_column("out").unwrap().to_scalars().unwrap(),
        vec![Scalar::Int64(2), Scalar::Null, Scalar::Int64(4)]
    );
}
