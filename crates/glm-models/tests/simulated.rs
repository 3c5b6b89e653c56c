//! Fits on seeded synthetic data

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};

use glm_core::data::{DataFrame, DataFrameBuilder};
use glm_models::glm::{self, Algorithm, Family, GlmConfig, StopCriterion};

fn logistic_sample(seed: u64, n: usize, beta: [f64; 3]) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();

    let x1: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    let x2: Vec<f64> = (0..n).map(|_| normal.sample(&mut rng)).collect();
    let y: Vec<f64> = x1
        .iter()
        .zip(&x2)
        .map(|(a, b)| {
            let p = 1.0 / (1.0 + (-(beta[0] * a + beta[1] * b + beta[2])).exp());
            if rng.random::<f64>() < p { 1.0 } else { 0.0 }
        })
        .collect();

    DataFrameBuilder::new()
        .with_floats("x1", &x1)
        .unwrap()
        .with_floats("x2", &x2)
        .unwrap()
        .with_floats("y", &y)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_logistic_engines_agree() {
    let beta = [1.0, -0.8, 0.5];
    let data = logistic_sample(7, 400, beta);

    let irls = glm::fit(&data, "y", Family::Logistic, &GlmConfig::default()).unwrap();
    let config = GlmConfig::default()
        .with_algorithm(Algorithm::Mle)
        .with_stop_criterion(StopCriterion::LogLikelihood);
    let mle = glm::fit(&data, "y", Family::Logistic, &config).unwrap();

    assert!(irls.converged() && mle.converged());
    for ((a, b), truth) in irls.coefficients().iter().zip(mle.coefficients()).zip(beta) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-5);
        assert_abs_diff_eq!(*a, truth, epsilon = 0.5);
    }
    for (a, b) in irls.standard_errors().iter().zip(mle.standard_errors()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-4);
    }
}

#[test]
fn test_poisson_recovers_rate() {
    let mut rng = StdRng::seed_from_u64(11);
    let normal = Normal::new(0.0, 1.0).unwrap();

    let x: Vec<f64> = (0..300).map(|_| normal.sample(&mut rng)).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|xi| Poisson::new((0.3 + 0.5 * xi).exp()).unwrap().sample(&mut rng))
        .collect();

    let data = DataFrameBuilder::new()
        .with_floats("x", &x)
        .unwrap()
        .with_floats("y", &y)
        .unwrap()
        .build()
        .unwrap();

    let model = glm::fit(&data, "y", Family::Poisson, &GlmConfig::default()).unwrap();
    assert!(model.converged());
    assert_abs_diff_eq!(model.coefficients()[0], 0.5, epsilon = 0.25);
    assert_abs_diff_eq!(model.coefficients()[1], 0.3, epsilon = 0.25);
}

#[test]
fn test_normal_matches_least_squares_on_noisy_data() {
    let mut rng = StdRng::seed_from_u64(3);
    let noise = Normal::new(0.0, 0.5).unwrap();

    let x: Vec<f64> = (0..60).map(|i| i as f64 / 10.0).collect();
    let y: Vec<f64> = x.iter().map(|xi| 2.0 - 1.5 * xi + noise.sample(&mut rng)).collect();

    let data = DataFrameBuilder::new()
        .with_floats("x", &x)
        .unwrap()
        .with_floats("y", &y)
        .unwrap()
        .build()
        .unwrap();

    let config = GlmConfig::default()
        .with_algorithm(Algorithm::Mle)
        .with_stop_criterion(StopCriterion::LogLikelihood);
    let model = glm::fit(&data, "y", Family::Normal, &config).unwrap();

    // closed-form simple regression
    let n = x.len() as f64;
    let (mean_x, mean_y) = (x.iter().sum::<f64>() / n, y.iter().sum::<f64>() / n);
    let sxy: f64 = x.iter().zip(&y).map(|(a, b)| (a - mean_x) * (b - mean_y)).sum();
    let sxx: f64 = x.iter().map(|a| (a - mean_x).powi(2)).sum();
    let slope = sxy / sxx;

    assert_abs_diff_eq!(model.coefficients()[0], slope, epsilon = 1e-5);
    assert_abs_diff_eq!(
        model.coefficients()[1],
        mean_y - slope * mean_x,
        epsilon = 1e-5
    );
}
