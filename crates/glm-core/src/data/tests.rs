//! Tests for data module

use super::*;

#[test]
fn test_series_creation() {
    let float_series = Series::float(vec![1.0, 2.0, 3.0]);
    assert_eq!(float_series.len(), 3);
    assert_eq!(float_series.dtype(), "float64");

    let int_series = Series::int(vec![1, 2, 3]);
    assert_eq!(int_series.dtype(), "int64");

    let bool_series = Series::bool(vec![true, false, true]);
    assert_eq!(bool_series.dtype(), "bool");

    let string_series = Series::string(&["a", "b"]);
    assert_eq!(string_series.len(), 2);
    assert_eq!(string_series.dtype(), "string");

    let cat_series = Series::categorical(&["A", "B", "A", "C"]);
    assert_eq!(cat_series.len(), 4);
    assert_eq!(cat_series.dtype(), "categorical");
    assert!(cat_series.is_categorical());
}

#[test]
fn test_series_to_float() {
    assert_eq!(
        Series::int(vec![1, 2]).to_float().unwrap(),
        FloatArray::from(vec![1.0, 2.0])
    );
    assert_eq!(
        Series::bool(vec![true, false]).to_float().unwrap(),
        FloatArray::from(vec![1.0, 0.0])
    );
    assert_eq!(
        Series::string(&["a"]).to_float(),
        Err(DataError::NonNumericData("string"))
    );
    assert_eq!(
        Series::categorical(&["a"]).to_float(),
        Err(DataError::NonNumericData("categorical"))
    );
}

#[test]
fn test_factor_sorted_levels_and_codes() {
    let factor = Factor::new(&["yes", "no", "no", "yes", "maybe"]);
    assert_eq!(factor.levels(), &["maybe", "no", "yes"]);
    assert_eq!(factor.codes().to_vec(), vec![2, 1, 1, 2, 0]);
    assert_eq!(factor.base_level(), Some("maybe"));
    assert_eq!(
        factor.labels().collect::<Vec<_>>(),
        vec!["yes", "no", "no", "yes", "maybe"]
    );

    let empty = Factor::new::<&str>(&[]);
    assert!(empty.levels().is_empty());
    assert_eq!(empty.base_level(), None);
    assert!(empty.coded_levels(false).is_empty());
}

#[test]
fn test_factor_explicit_levels_and_base() {
    let levels = vec!["yes".to_string(), "no".to_string()];
    let factor = Factor::with_levels(&["no", "yes", "no"], levels)
        .unwrap()
        .with_base("no")
        .unwrap();

    assert_eq!(factor.codes().to_vec(), vec![1, 0, 1]);
    assert_eq!(factor.base(), 1);
    assert_eq!(factor.coded_levels(true), vec![0, 1]);
    assert_eq!(factor.coded_levels(false), vec![0]);
    assert_eq!(factor.indicator(0).to_vec(), vec![0.0, 1.0, 0.0]);

    assert!(matches!(
        factor.clone().with_base("perhaps"),
        Err(DataError::UnknownLevel { .. })
    ));
}

#[test]
fn test_factor_recode_keeps_levels() {
    let factor = Factor::new(&["a", "b", "c"]).with_base("b").unwrap();
    let recoded = factor.recode(&["c", "c"]).unwrap();

    assert_eq!(recoded.levels(), factor.levels());
    assert_eq!(recoded.base(), 1);
    assert_eq!(recoded.codes().to_vec(), vec![2, 2]);

    assert_eq!(
        factor.recode(&["d"]),
        Err(DataError::UnknownLevel {
            column: String::new(),
            level: "d".to_string()
        })
    );
}

#[test]
fn test_dataframe_creation() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::int(vec![4, 5, 6])),
    ])
    .unwrap();

    assert_eq!(df.shape(), (3, 2));
    assert_eq!(df.column_names(), vec!["x", "y"]);
    assert_eq!(df.to_string(), "DataFrame(3 rows × 2 cols)");
}

#[test]
fn test_builder_rejects_ragged_columns() {
    let result = DataFrameBuilder::new()
        .with_floats("a", &[1.0, 2.0])
        .unwrap()
        .with_floats("b", &[1.0, 2.0, 3.0]);

    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_builder_rejects_duplicates() {
    let result = DataFrameBuilder::new()
        .with_floats("a", &[1.0])
        .unwrap()
        .with_floats("a", &[2.0]);

    assert_eq!(result.unwrap_err(), DataError::DuplicateColumn("a".into()));
}

#[test]
fn test_dataframe_select_and_drop() {
    let df = DataFrame::from_columns(vec![
        ("a", Series::float(vec![1.0, 2.0, 3.0])),
        ("b", Series::float(vec![4.0, 5.0, 6.0])),
        ("c", Series::float(vec![7.0, 8.0, 9.0])),
    ])
    .unwrap();

    let selected = df.select(["a", "c"]).unwrap();
    assert_eq!(selected.column_names(), vec!["a", "c"]);

    let dropped = df.clone().drop(&["b"]).unwrap();
    assert_eq!(dropped.column_names(), vec!["a", "c"]);

    assert_eq!(
        df.select(["z"]).unwrap_err(),
        DataError::ColumnNotFound("z".into())
    );
}

#[test]
fn test_to_categorical_and_set_base() {
    let df = DataFrameBuilder::new()
        .with_column("g", Series::string(&["m", "f", "m"]))
        .unwrap()
        .with_column("k", Series::int(vec![2, 1, 2]))
        .unwrap()
        .with_floats("x", &[0.1, 0.2, 0.3])
        .unwrap()
        .build()
        .unwrap()
        .to_categorical(&["g", "k"])
        .unwrap()
        .set_base("g", "m")
        .unwrap();

    assert!(df.is_categorical("g"));
    assert!(df.is_categorical("k"));
    assert!(!df.is_categorical("x"));
    assert!(!df.is_categorical("missing"));

    let g = df.column("g").unwrap().as_factor().unwrap();
    assert_eq!(g.levels(), &["f", "m"]);
    assert_eq!(g.base_level(), Some("m"));

    let k = df.column("k").unwrap().as_factor().unwrap();
    assert_eq!(k.levels(), &["1", "2"]);

    assert!(matches!(
        df.clone().to_categorical(&["x"]),
        Err(DataError::TypeMismatch { .. })
    ));
    assert!(matches!(
        df.set_base("x", "0.1"),
        Err(DataError::TypeMismatch { .. })
    ));
}

#[test]
fn test_recode_column_names_the_column() {
    let train = Factor::new(&["no", "yes"]);
    let new_data = DataFrameBuilder::new()
        .with_column("c", Series::string(&["yes", "later"]))
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(
        new_data.recode_column("c", &train).unwrap_err(),
        DataError::UnknownLevel {
            column: "c".to_string(),
            level: "later".to_string()
        }
    );
}
