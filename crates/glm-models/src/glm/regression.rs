//! Formula interface
//!
//! [`Regression`] binds a formula to a training [`DataFrame`]. The
//! categorical levels and reference levels of the training data are kept, so
//! new data is encoded into the same design columns at prediction time.
//!
//! The normal family always carries a constant column; for the other
//! families the formula decides (`0` removes it).

use indexmap::IndexMap;

use glm_core::data::{DataError, DataFrame, Factor};
use glm_core::formula::{DesignMatrix, DesignMatrixBuilder, Formula};

use super::{Estimator, Family, GlmConfig, GlmModel, ModelSnapshot, Vector};
use crate::base::{ModelError, ModelSummary, Result, StatisticalModel};

/// GLM specified by a Wilkinson formula
#[derive(Debug, Clone)]
pub struct Regression {
    formula: Formula,
    data: DataFrame,
    family: Family,
    config: GlmConfig,
    estimator: Estimator,
    /// Training encoding of every categorical factor in the formula
    levels: IndexMap<String, Factor>,
    model: Option<GlmModel>,
}

impl Regression {
    /// Parse `formula` against `data`; the configuration is checked first
    pub fn new(formula: &str, data: &DataFrame, family: Family, config: GlmConfig) -> Result<Self> {
        let estimator = config.resolve(family)?;
        let formula = Formula::parse(formula, data)?;
        let levels = formula.categorical_levels(data);

        Ok(Self {
            formula,
            data: data.clone(),
            family,
            config,
            estimator,
            levels,
            model: None,
        })
    }

    /// Fit the model on the training data
    pub fn fit(mut self) -> Result<Self> {
        let design = self.design_data()?;
        let y = self.data.float_column(self.formula.response())?;
        let constant = self.has_constant().then_some(1.0);
        let (names, x) = design.into_parts();

        let model = GlmModel::estimate(
            &x,
            &y,
            names,
            self.estimator,
            &self.config,
            constant,
            &self.formula.to_string(),
        )?;
        self.model = Some(model);
        Ok(self)
    }

    /// Attach a previously fitted model; its coefficients must match the design columns
    pub fn from_snapshot(
        formula: &str,
        data: &DataFrame,
        family: Family,
        config: GlmConfig,
        snapshot: &ModelSnapshot,
    ) -> Result<Self> {
        let mut regression = Self::new(formula, data, family, config)?;
        let names = regression.design_data()?.names().to_vec();

        if !snapshot.column_names.is_empty() && snapshot.column_names != names {
            return Err(DataError::DimensionMismatch {
                expected: format!("columns [{}]", names.join(", ")),
                actual: format!("[{}]", snapshot.column_names.join(", ")),
            }
            .into());
        }

        let constant = regression.has_constant().then_some(1.0);
        let model = GlmModel::restore(
            snapshot,
            names,
            regression.estimator,
            constant,
            &regression.formula.to_string(),
        )?;
        regression.model = Some(model);
        Ok(regression)
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn config(&self) -> &GlmConfig {
        &self.config
    }

    /// Categorical encodings taken from the training data
    pub fn levels(&self) -> &IndexMap<String, Factor> {
        &self.levels
    }

    pub fn model(&self) -> Result<&GlmModel> {
        self.model.as_ref().ok_or(ModelError::NotFitted)
    }

    /// Design matrix of the training data
    pub fn design_data(&self) -> Result<DesignMatrix> {
        Ok(self.design_builder().build(&self.data)?)
    }

    /// Design matrix of `data` encoded with the training levels
    pub fn prediction_design(&self, data: &DataFrame) -> Result<DesignMatrix> {
        let design = self
            .design_builder()
            .with_levels(self.levels.clone())
            .build(data)?;
        Ok(design)
    }

    fn has_constant(&self) -> bool {
        self.formula.has_intercept() || self.family == Family::Normal
    }

    fn design_builder(&self) -> DesignMatrixBuilder {
        let builder = DesignMatrixBuilder::new(self.formula.canonical_terms());
        if self.has_constant() {
            builder.with_constant()
        } else {
            builder
        }
    }

    /// Mean response for `data`
    pub fn predict(&self, data: &DataFrame) -> Result<Vector> {
        let model = self.model()?;
        let design = self.prediction_design(data)?;

        if design.names() != model.names() {
            return Err(ModelError::prediction(format!(
                "design columns [{}] differ from the fitted columns [{}]",
                design.names().join(", "),
                model.names().join(", ")
            )));
        }

        model.predict_matrix(design.matrix())
    }

    pub fn snapshot(&self) -> Result<ModelSnapshot> {
        Ok(self.model()?.snapshot())
    }
}

impl StatisticalModel for Regression {
    fn predict(&self, data: &DataFrame) -> Result<Vector> {
        Regression::predict(self, data)
    }

    fn summary(&self) -> Result<ModelSummary> {
        Ok(self.model()?.summary())
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}
