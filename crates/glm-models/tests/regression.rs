//! Formula-driven fits through `Regression`

use approx::assert_abs_diff_eq;
use glm_core::data::{DataFrame, DataFrameBuilder, Series};
use glm_models::glm::{self, Algorithm, Family, GlmConfig, ModelSnapshot, Regression};
use glm_models::{ErrorKind, ModelError, StatisticalModel};

fn grouped_data() -> DataFrame {
    // "no": 3 of 9 positive, "yes": 4 of 5 positive
    let c = [
        "no", "yes", "no", "no", "yes", "no", "no", "yes", "no", "no", "yes", "no", "yes", "no",
    ];
    let y = [
        1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0,
    ];
    let x = [
        0.3, -0.2, 1.1, 0.4, -0.8, 0.9, -1.4, 0.2, 0.6, -0.5, 1.3, -0.1, 0.7, -0.9,
    ];

    DataFrameBuilder::new()
        .with_categorical("c", &c)
        .unwrap()
        .with_floats("x", &x)
        .unwrap()
        .with_floats("y", &y)
        .unwrap()
        .build()
        .unwrap()
}

fn numeric_data() -> DataFrame {
    DataFrameBuilder::new()
        .with_floats(
            "x1",
            &[
                0.5, -1.2, 0.3, 1.8, -0.7, 2.2, -1.5, 0.9, 0.1, -0.4, 1.3, -2.0, 0.8, -0.9, 1.6,
                0.0, -0.3, 1.1, -1.1, 0.6,
            ],
        )
        .unwrap()
        .with_floats(
            "x2",
            &[
                1.0, 0.2, -0.5, 0.7, 1.4, -0.8, 0.3, -1.2, 0.9, -0.1, 0.5, 1.1, -0.6, 0.4, -1.0,
                1.5, -0.2, 0.8, -1.3, 0.1,
            ],
        )
        .unwrap()
        .with_floats(
            "y",
            &[
                1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
                1.0, 1.0, 0.0, 0.0,
            ],
        )
        .unwrap()
        .build()
        .unwrap()
}

fn labels(values: &[&str]) -> DataFrame {
    DataFrameBuilder::new()
        .with_categorical("c", values)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_formula_matches_data_frame_fit() {
    let data = numeric_data();
    let regression =
        glm::regression("y ~ x1 + x2", &data, Family::Logistic, GlmConfig::default()).unwrap();
    let direct = glm::fit(&data, "y", Family::Logistic, &GlmConfig::default()).unwrap();

    let model = regression.model().unwrap();
    assert_eq!(model.names(), direct.names());
    for (a, b) in model.coefficients().iter().zip(direct.coefficients()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(model.coefficients()[0], 2.150766051935976, epsilon = 1e-6);
}

#[test]
fn test_interaction_columns() {
    let regression = Regression::new(
        "y ~ x1*x2",
        &numeric_data(),
        Family::Logistic,
        GlmConfig::default(),
    )
    .unwrap();

    let design = regression.design_data().unwrap();
    assert_eq!(design.names(), &["x1", "x2", "x1:x2", "constant"]);
    assert_eq!(regression.formula().to_string(), "y~1+x1+x2+x1:x2");
}

#[test]
fn test_saturated_categorical_without_intercept() {
    let regression =
        glm::regression("y ~ 0 + c", &grouped_data(), Family::Logistic, GlmConfig::default())
            .unwrap();
    let model = regression.model().unwrap();

    assert_eq!(model.names(), &["c_no", "c_yes"]);
    assert_abs_diff_eq!(model.coefficients_map()["c_no"], 0.5_f64.ln(), epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficients_map()["c_yes"], 4.0_f64.ln(), epsilon = 1e-6);

    let predictions = regression.predict(&labels(&["no", "yes"])).unwrap();
    assert_abs_diff_eq!(predictions[0], 1.0 / 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(predictions[1], 0.8, epsilon = 1e-6);
}

#[test]
fn test_reference_level_coding() {
    let data = grouped_data();
    let regression =
        glm::regression("y ~ c", &data, Family::Logistic, GlmConfig::default()).unwrap();
    let model = regression.model().unwrap();

    assert_eq!(model.names(), &["c_yes", "constant"]);
    assert_abs_diff_eq!(model.coefficients()[0], 8.0_f64.ln(), epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficients()[1], 0.5_f64.ln(), epsilon = 1e-6);

    let rebased = data.set_base("c", "yes").unwrap();
    let regression =
        glm::regression("y ~ c", &rebased, Family::Logistic, GlmConfig::default()).unwrap();
    let model = regression.model().unwrap();

    assert_eq!(model.names(), &["c_no", "constant"]);
    assert_abs_diff_eq!(model.coefficients()[0], -(8.0_f64.ln()), epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficients()[1], 4.0_f64.ln(), epsilon = 1e-6);
}

#[test]
fn test_prediction_uses_training_levels() {
    let regression =
        glm::regression("y ~ c + x", &grouped_data(), Family::Logistic, GlmConfig::default())
            .unwrap();

    // only one level present in the new data
    let new_data = DataFrameBuilder::new()
        .with_categorical("c", &["yes", "yes"])
        .unwrap()
        .with_floats("x", &[0.0, 1.0])
        .unwrap()
        .build()
        .unwrap();
    let design = regression.prediction_design(&new_data).unwrap();
    assert_eq!(design.names(), &["c_yes", "x", "constant"]);
    assert_eq!(design.column("c_yes").unwrap().to_vec(), vec![1.0, 1.0]);

    let model = regression.model().unwrap();
    let predictions = regression.predict(&new_data).unwrap();
    let b = model.coefficients();
    let expected = 1.0 / (1.0 + (-(b[0] + b[1] + b[2])).exp());
    assert_abs_diff_eq!(predictions[1], expected, epsilon = 1e-12);

    let unknown = DataFrameBuilder::new()
        .with_categorical("c", &["maybe"])
        .unwrap()
        .with_floats("x", &[0.0])
        .unwrap()
        .build()
        .unwrap();
    let err = regression.predict(&unknown).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_predict_on_training_data_matches_fitted_values() {
    let data = grouped_data();
    let regression =
        glm::regression("y ~ c*x", &data, Family::Logistic, GlmConfig::default()).unwrap();

    let predictions = regression.predict(&data).unwrap();
    let fitted = regression.model().unwrap().fitted_values();
    for (p, f) in predictions.iter().zip(fitted) {
        assert_abs_diff_eq!(*p, *f, epsilon = 1e-12);
    }
}

#[test]
fn test_saturated_poisson() {
    let data = DataFrameBuilder::new()
        .with_categorical("g", &["a", "b", "a", "b", "a", "b"])
        .unwrap()
        .with_column("y", Series::int(vec![1, 4, 2, 6, 3, 5]))
        .unwrap()
        .build()
        .unwrap();

    let regression =
        glm::regression("y ~ 0 + g", &data, Family::Poisson, GlmConfig::default()).unwrap();
    let coefficients = regression.model().unwrap().coefficients_map();

    assert_abs_diff_eq!(coefficients["g_a"], 2.0_f64.ln(), epsilon = 1e-6);
    assert_abs_diff_eq!(coefficients["g_b"], 5.0_f64.ln(), epsilon = 1e-6);
}

#[test]
fn test_probit_and_normal_through_formulas() {
    let config = GlmConfig::default().with_algorithm(Algorithm::Mle);

    let probit = glm::regression("y ~ x1 + x2", &numeric_data(), Family::Probit, config.clone())
        .unwrap();
    assert_abs_diff_eq!(
        probit.model().unwrap().coefficients()[1],
        1.747838380413067,
        epsilon = 1e-6
    );

    let normal = glm::regression("x1 ~ x2", &numeric_data(), Family::Normal, config).unwrap();
    let model = normal.model().unwrap();
    assert_eq!(model.names(), &["x2", "constant"]);
    assert!(model.converged());
    assert!(model.log_likelihood().is_some());
}

#[test]
fn test_normal_formula_without_intercept_keeps_constant() {
    let config = GlmConfig::default()
        .with_algorithm(Algorithm::Mle)
        .no_constant();
    let data = numeric_data().drop(&["y"]).unwrap();

    let regression = glm::regression("x1 ~ 0 + x2", &data, Family::Normal, config.clone()).unwrap();
    let direct = glm::fit(&data, "x1", Family::Normal, &config).unwrap();

    let model = regression.model().unwrap();
    assert_eq!(model.names(), &["x2", "constant"]);
    assert_eq!(model.names(), direct.names());
    for (a, b) in model.coefficients().iter().zip(direct.coefficients()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
    }

    let new_data = DataFrameBuilder::new()
        .with_floats("x2", &[0.0, 1.0])
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        regression.prediction_design(&new_data).unwrap().names(),
        &["x2", "constant"]
    );
    let predicted = regression.predict(&new_data).unwrap();
    assert_abs_diff_eq!(predicted[0], model.coefficients()[1], epsilon = 1e-12);
    assert_abs_diff_eq!(
        predicted[1],
        model.coefficients()[0] + model.coefficients()[1],
        epsilon = 1e-12
    );

    let restored = Regression::from_snapshot(
        "x1 ~ 0 + x2",
        &data,
        Family::Normal,
        config,
        &regression.snapshot().unwrap(),
    )
    .unwrap();
    assert_eq!(restored.model().unwrap().constant(), Some(1.0));
}

#[test]
fn test_unfitted_and_error_kinds() {
    let data = grouped_data();

    let unfitted = Regression::new("y ~ c", &data, Family::Logistic, GlmConfig::default()).unwrap();
    assert!(!unfitted.is_fitted());
    assert!(matches!(unfitted.model(), Err(ModelError::NotFitted)));
    assert!(matches!(unfitted.snapshot(), Err(ModelError::NotFitted)));

    let parse = Regression::new("y ~ (c", &data, Family::Logistic, GlmConfig::default());
    assert_eq!(parse.unwrap_err().kind(), ErrorKind::Parse);

    let schema = Regression::new("y ~ z", &data, Family::Logistic, GlmConfig::default());
    assert_eq!(schema.unwrap_err().kind(), ErrorKind::Schema);

    // configuration is checked before the formula
    let config = Regression::new("y ~ (c", &data, Family::Probit, GlmConfig::default());
    assert_eq!(config.unwrap_err().kind(), ErrorKind::Config);

    let categorical_response =
        glm::regression("c ~ x", &data, Family::Logistic, GlmConfig::default());
    assert_eq!(categorical_response.unwrap_err().kind(), ErrorKind::Schema);
}

#[test]
fn test_three_way_categorical_interaction_is_rejected() {
    let data = DataFrameBuilder::new()
        .with_categorical("a", &["p", "q", "p", "q"])
        .unwrap()
        .with_categorical("b", &["r", "r", "s", "s"])
        .unwrap()
        .with_categorical("d", &["t", "u", "u", "t"])
        .unwrap()
        .with_floats("y", &[0.0, 1.0, 1.0, 0.0])
        .unwrap()
        .build()
        .unwrap();

    let err = Regression::new("y ~ a*b*d", &data, Family::Logistic, GlmConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn test_snapshot_restores_predictions() {
    let data = grouped_data();
    let fitted =
        glm::regression("y ~ c + x", &data, Family::Logistic, GlmConfig::default()).unwrap();

    let json = serde_json::to_string(&fitted.snapshot().unwrap()).unwrap();
    let snapshot: ModelSnapshot = serde_json::from_str(&json).unwrap();
    let restored = Regression::from_snapshot(
        "y ~ c + x",
        &data,
        Family::Logistic,
        GlmConfig::default(),
        &snapshot,
    )
    .unwrap();

    let new_data = labels(&["no", "yes"])
        .with_column("x", Series::float(vec![0.5, -0.5]))
        .unwrap();
    let expected = fitted.predict(&new_data).unwrap();
    let actual = restored.predict(&new_data).unwrap();
    for (a, e) in actual.iter().zip(&expected) {
        assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
    }

    let mismatched = Regression::from_snapshot(
        "y ~ x",
        &data,
        Family::Logistic,
        GlmConfig::default(),
        &snapshot,
    );
    assert!(mismatched.is_err());
}

#[test]
fn test_summary_through_trait() {
    let regression =
        glm::regression("y ~ c + x", &grouped_data(), Family::Logistic, GlmConfig::default())
            .unwrap();
    let summary = regression.summary().unwrap();

    assert_eq!(summary.formula, "y~1+c+x");
    assert_eq!(summary.coefficients.len(), 3);
    assert_eq!(summary.model_statistics.log_likelihood, None);
    assert!(summary.to_string().contains("Method: IRLS"));
}
