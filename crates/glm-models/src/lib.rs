//! Generalized linear models fitted by IRLS or Newton-Raphson
//!
//! Two entry points share one fitted-model type:
//!
//! - [`glm::fit`] fits a numeric [`DataFrame`](glm_core::data::DataFrame),
//!   every non-response column being a predictor;
//! - [`glm::Regression`] fits a Wilkinson formula, expanding categorical
//!   factors into indicator columns.
//!
//! ```no_run
//! use glm_core::data::{DataFrameBuilder, Series};
//! use glm_models::glm::{Family, GlmConfig, Regression};
//!
//! let df = DataFrameBuilder::new()
//!     .with_column("y", Series::float(vec![0.0, 1.0, 1.0, 0.0, 1.0]))?
//!     .with_column("x", Series::float(vec![-1.0, 0.5, 1.5, 0.2, -0.3]))?
//!     .build()?;
//!
//! let regression = Regression::new("y ~ x", &df, Family::Logistic, GlmConfig::default())?.fit()?;
//! println!("{}", regression.model()?.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod base;
pub mod error;
pub mod glm;

pub use base::{Coefficient, ModelStatistics, ModelSummary, Result, StatisticalModel};
pub use error::{ErrorKind, ModelError};
