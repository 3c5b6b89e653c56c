//! Coefficient definition

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Coefficient estimate with Wald statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// Design column name
    pub name: String,
    /// Coefficient estimate
    pub estimate: f64,
    /// Standard error
    pub std_error: Option<f64>,
    /// z-statistic
    pub z_stat: Option<f64>,
    /// Two-sided p-value
    pub p_value: Option<f64>,
    /// Lower bound of the 95% confidence interval
    pub ci_lower: Option<f64>,
    /// Upper bound of the 95% confidence interval
    pub ci_upper: Option<f64>,
    /// Is this the constant column?
    pub is_intercept: bool,
}

impl Coefficient {
    /// Create a new coefficient
    pub fn new(name: impl Into<String>, estimate: f64) -> Self {
        Self {
            name: name.into(),
            estimate,
            std_error: None,
            z_stat: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            is_intercept: false,
        }
    }

    /// Set standard error
    pub fn with_std_error(mut self, se: f64) -> Self {
        self.std_error = Some(se);
        self
    }

    /// Set z-statistic
    pub fn with_z_stat(mut self, z: f64) -> Self {
        self.z_stat = Some(z);
        self
    }

    /// Set p-value
    pub fn with_p_value(mut self, p: f64) -> Self {
        self.p_value = Some(p);
        self
    }

    /// Set confidence interval
    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }

    /// Standard error plus the normal-theory z test and 95% interval
    pub fn with_wald_inference(self, se: f64) -> Self {
        let normal = Normal::standard();
        let z = self.estimate / se;
        let p = 2.0 * normal.sf(z.abs());
        let margin = normal.inverse_cdf(0.975) * se;
        let (lower, upper) = (self.estimate - margin, self.estimate + margin);

        self.with_std_error(se)
            .with_z_stat(z)
            .with_p_value(p)
            .with_ci(lower, upper)
    }

    /// Mark as intercept
    pub fn as_intercept(mut self) -> Self {
        self.is_intercept = true;
        self
    }
}
