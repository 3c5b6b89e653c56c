//! Fitted generalized linear model

use indexmap::IndexMap;

use glm_core::data::{DataError, DataFrame};
use glm_core::formula::CONSTANT_COLUMN;

use super::{Estimator, Family, GlmConfig, GlmFit, Matrix, ModelSnapshot, Vector};
use crate::base::{
    Coefficient, ModelError, ModelStatistics, ModelSummary, Result, StatisticalModel,
};

/// A fitted model: estimator, design column names and the fit itself
#[derive(Debug, Clone, PartialEq)]
pub struct GlmModel {
    estimator: Estimator,
    names: Vec<String>,
    /// Value of the constant column, when the design has one
    constant: Option<f64>,
    /// Formula, or response name for data-frame fits
    formula: String,
    fit: GlmFit,
}

impl GlmModel {
    /// Fit a design matrix used as given, with columns named `names`
    pub fn fit_matrix(
        x: &Matrix,
        y: &Vector,
        names: Vec<String>,
        family: Family,
        config: &GlmConfig,
    ) -> Result<Self> {
        let estimator = config.resolve(family)?;
        let constant = names
            .iter()
            .any(|name| name == CONSTANT_COLUMN)
            .then(|| config.constant_for(family))
            .flatten();
        Self::estimate(x, y, names, estimator, config, constant, "y")
    }

    pub(crate) fn estimate(
        x: &Matrix,
        y: &Vector,
        names: Vec<String>,
        estimator: Estimator,
        config: &GlmConfig,
        constant: Option<f64>,
        formula: &str,
    ) -> Result<Self> {
        let (n, k) = x.dim();

        if names.len() != k {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} column names", k),
                actual: names.len().to_string(),
            }
            .into());
        }
        if y.len() != n {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} response values", n),
                actual: y.len().to_string(),
            }
            .into());
        }
        if n == 0 || k == 0 || n < k {
            return Err(ModelError::InsufficientData {
                n_samples: n,
                n_predictors: k,
            });
        }
        if let Some(position) = y.iter().position(|v| !v.is_finite()) {
            return Err(DataError::InvalidParameter(format!(
                "non-finite response at row {}",
                position
            ))
            .into());
        }
        if let Some(j) = (0..k).find(|&j| x.column(j).iter().any(|v| !v.is_finite())) {
            return Err(DataError::InvalidParameter(format!(
                "non-finite value in column '{}'",
                names[j]
            ))
            .into());
        }

        log::debug!(
            "fitting {} by {}: {} rows, columns [{}]",
            estimator.family(),
            estimator.method_name(),
            n,
            names.join(", ")
        );

        let fit = estimator.fit(x, y, config)?;

        Ok(Self {
            estimator,
            names,
            constant,
            formula: formula.to_string(),
            fit,
        })
    }

    /// Rebuild a model from a snapshot without refitting
    ///
    /// Snapshots written without column names get `x0`, `x1`, ...; such a
    /// model predicts only through [`GlmModel::predict_matrix`].
    pub fn from_snapshot(snapshot: &ModelSnapshot, family: Family, config: &GlmConfig) -> Result<Self> {
        let names = if snapshot.column_names.is_empty() {
            (0..snapshot.coefficients.len())
                .map(|j| format!("x{}", j))
                .collect()
        } else {
            snapshot.column_names.clone()
        };
        let constant = names
            .iter()
            .any(|name| name == CONSTANT_COLUMN)
            .then(|| config.constant_for(family))
            .flatten();

        Self::restore(snapshot, names, config.resolve(family)?, constant, "y")
    }

    pub(crate) fn restore(
        snapshot: &ModelSnapshot,
        names: Vec<String>,
        estimator: Estimator,
        constant: Option<f64>,
        formula: &str,
    ) -> Result<Self> {
        let fit = GlmFit::from_snapshot(snapshot)?;
        if names.len() != fit.coefficients.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} coefficients", names.len()),
                actual: fit.coefficients.len().to_string(),
            }
            .into());
        }

        Ok(Self {
            estimator,
            names,
            constant,
            formula: formula.to_string(),
            fit,
        })
    }

    pub fn estimator(&self) -> Estimator {
        self.estimator
    }

    pub fn family(&self) -> Family {
        self.estimator.family()
    }

    /// Design column names, in coefficient order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn constant(&self) -> Option<f64> {
        self.constant
    }

    pub fn fit(&self) -> &GlmFit {
        &self.fit
    }

    pub fn coefficients(&self) -> &Vector {
        &self.fit.coefficients
    }

    pub fn coefficients_vec(&self) -> Vec<f64> {
        self.fit.coefficients.to_vec()
    }

    /// Coefficients keyed by design column name
    pub fn coefficients_map(&self) -> IndexMap<String, f64> {
        self.named(&self.fit.coefficients)
    }

    pub fn standard_errors(&self) -> &Vector {
        &self.fit.standard_errors
    }

    pub fn standard_errors_vec(&self) -> Vec<f64> {
        self.fit.standard_errors.to_vec()
    }

    pub fn standard_errors_map(&self) -> IndexMap<String, f64> {
        self.named(&self.fit.standard_errors)
    }

    pub fn iterations(&self) -> usize {
        self.fit.iterations
    }

    pub fn converged(&self) -> bool {
        self.fit.converged
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.fit.log_likelihood
    }

    pub fn fitted_values(&self) -> &Vector {
        &self.fit.fitted_values
    }

    pub fn residuals(&self) -> &Vector {
        &self.fit.residuals
    }

    pub fn degrees_of_freedom(&self) -> usize {
        self.fit.df_residual
    }

    fn named(&self, values: &Vector) -> IndexMap<String, f64> {
        self.names.iter().cloned().zip(values.iter().copied()).collect()
    }

    /// Mean response for a design matrix laid out like the training one
    pub fn predict_matrix(&self, x: &Matrix) -> Result<Vector> {
        if x.ncols() != self.names.len() {
            return Err(ModelError::prediction(format!(
                "expected {} design columns, got {}",
                self.names.len(),
                x.ncols()
            )));
        }
        Ok(self.family().measurement(x, &self.fit.coefficients))
    }

    /// Mean response for the named columns of `data`, with the fitted constant
    pub fn predict(&self, data: &DataFrame) -> Result<Vector> {
        let x = predictor_matrix(data, &self.names, self.constant)?;
        self.predict_matrix(&x)
    }

    pub fn summary(&self) -> ModelSummary {
        let n_obs = self.fit.fitted_values.len();
        let k = self.names.len();

        let coefficients = self
            .names
            .iter()
            .zip(self.fit.coefficients.iter().zip(&self.fit.standard_errors))
            .map(|(name, (&estimate, &se))| {
                let coefficient = Coefficient::new(name.clone(), estimate).with_wald_inference(se);
                if name == CONSTANT_COLUMN {
                    coefficient.as_intercept()
                } else {
                    coefficient
                }
            })
            .collect();

        let mut model_statistics = ModelStatistics {
            log_likelihood: self.fit.log_likelihood,
            df_residual: Some(self.fit.df_residual),
            df_model: Some(k.saturating_sub(usize::from(self.constant.is_some()))),
            iterations: Some(self.fit.iterations),
            converged: Some(self.fit.converged),
            ..ModelStatistics::default()
        };
        if let Some(ll) = self.fit.log_likelihood {
            let n_params = k + self.family().extra_parameters();
            let (aic, bic) = ModelStatistics::information_criteria(ll, n_obs, n_params);
            model_statistics.aic = Some(aic);
            model_statistics.bic = Some(bic);
        }

        ModelSummary {
            model_type: self.family().model_type(),
            method: self.estimator.method_name().to_string(),
            formula: self.formula.clone(),
            n_obs,
            n_predictors: k,
            coefficients,
            model_statistics,
        }
    }

    pub fn snapshot(&self) -> ModelSnapshot {
        self.fit.snapshot(&self.names)
    }
}

impl StatisticalModel for GlmModel {
    fn predict(&self, data: &DataFrame) -> Result<Vector> {
        GlmModel::predict(self, data)
    }

    fn summary(&self) -> Result<ModelSummary> {
        Ok(GlmModel::summary(self))
    }

    fn is_fitted(&self) -> bool {
        true
    }
}

/// Columns `names` of `data` as a matrix, the constant column filled with `constant`
pub(crate) fn predictor_matrix(
    data: &DataFrame,
    names: &[String],
    constant: Option<f64>,
) -> Result<Matrix> {
    let mut x = Matrix::zeros((data.nrows(), names.len()));

    for (j, name) in names.iter().enumerate() {
        match constant {
            Some(value) if name == CONSTANT_COLUMN => x.column_mut(j).fill(value),
            _ => x.column_mut(j).assign(&data.float_column(name)?),
        }
    }

    Ok(x)
}
