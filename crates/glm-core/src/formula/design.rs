//! Design matrix construction
//!
//! Every canonical term becomes the cartesian product of its factors'
//! encodings, multiplied elementwise:
//!
//! - numeric factor: its own column, named after the factor
//! - categorical factor, full rank: one indicator per level, `name_level`
//! - categorical factor, reduced rank: one indicator per non-reference level
//!
//! Interaction columns join the factor column names with `:` in factor order
//! (`c_yes:e_B`, `e_A:a`). The intercept becomes the [`CONSTANT_COLUMN`],
//! placed after every term column. [`DesignMatrixBuilder::with_constant`]
//! adds that column even when the terms carry no intercept.

use indexmap::IndexMap;
use ndarray::{Array1, ArrayView1};

use super::{FormulaError, FormulaResult, Term};
use crate::data::{DataFrame, Factor, FloatArray, Matrix, Series};

/// Name of the column produced by the intercept term
pub const CONSTANT_COLUMN: &str = "constant";

/// Named numeric design columns
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    names: Vec<String>,
    matrix: Matrix,
}

impl DesignMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Column by name
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|j| self.matrix.column(j))
    }

    pub fn into_parts(self) -> (Vec<String>, Matrix) {
        (self.names, self.matrix)
    }
}

/// Expands canonical terms against a [`DataFrame`]
///
/// Without explicit levels the categorical columns of the data are used as
/// they are. With [`DesignMatrixBuilder::with_levels`], the named columns are
/// re-encoded against the given factors, so new data gets the columns of the
/// data the levels were taken from.
#[derive(Debug, Clone)]
pub struct DesignMatrixBuilder {
    terms: Vec<Term>,
    levels: Option<IndexMap<String, Factor>>,
    constant: bool,
}

impl DesignMatrixBuilder {
    pub fn new(terms: &[Term]) -> Self {
        Self {
            terms: terms.to_vec(),
            levels: None,
            constant: false,
        }
    }

    /// Encode these categorical factors with fixed levels and reference levels
    pub fn with_levels(mut self, levels: IndexMap<String, Factor>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Always end with the constant column
    pub fn with_constant(mut self) -> Self {
        self.constant = true;
        self
    }

    pub fn build(&self, df: &DataFrame) -> FormulaResult<DesignMatrix> {
        let nrows = df.nrows();
        let mut columns: IndexMap<String, FloatArray> = IndexMap::new();
        let mut has_constant = self.constant;

        for term in &self.terms {
            if term.is_intercept() {
                has_constant = true;
                continue;
            }
            // a repeated name keeps its first position, with the later values
            for (name, values) in self.term_columns(term, df)? {
                columns.insert(name, values);
            }
        }

        if has_constant {
            columns.insert(CONSTANT_COLUMN.to_string(), Array1::ones(nrows));
        }

        let (names, values): (Vec<String>, Vec<FloatArray>) = columns.into_iter().unzip();
        let matrix = Matrix::from_shape_fn((nrows, values.len()), |(i, j)| values[j][i]);

        log::debug!(
            "design matrix: {} rows x {} columns [{}]",
            nrows,
            names.len(),
            names.join(", ")
        );

        Ok(DesignMatrix { names, matrix })
    }

    fn term_columns(&self, term: &Term, df: &DataFrame) -> FormulaResult<Vec<(String, FloatArray)>> {
        let mut product = vec![(String::new(), Array1::ones(df.nrows()))];

        for (factor, &full) in term.factors().iter().zip(term.full()) {
            let encoded = self.factor_columns(factor, full, df)?;
            product = product
                .iter()
                .flat_map(|(left_name, left)| {
                    encoded.iter().map(move |(right_name, right)| {
                        let name = if left_name.is_empty() {
                            right_name.clone()
                        } else {
                            format!("{}:{}", left_name, right_name)
                        };
                        (name, left * right)
                    })
                })
                .collect();
        }

        Ok(product)
    }

    fn factor_columns(
        &self,
        name: &str,
        full: bool,
        df: &DataFrame,
    ) -> FormulaResult<Vec<(String, FloatArray)>> {
        let series = df
            .get_column(name)
            .ok_or_else(|| FormulaError::variable_not_found(name, &df.column_names()))?;

        let fixed = self.levels.as_ref().and_then(|levels| levels.get(name));
        let recoded;
        let factor = match (fixed, series) {
            (Some(training), _) => {
                recoded = df.recode_column(name, training)?;
                Some(&recoded)
            }
            (None, Series::Categorical(factor)) => Some(factor),
            (None, _) => None,
        };

        match factor {
            Some(factor) => Ok(factor
                .coded_levels(full)
                .into_iter()
                .map(|level| {
                    (
                        format!("{}_{}", name, factor.levels()[level]),
                        factor.indicator(level),
                    )
                })
                .collect()),
            None => {
                let values = series.to_float().map_err(|_| FormulaError::TypeMismatch {
                    variable: name.to_string(),
                    expected_type: "numeric",
                    actual_type: series.dtype().to_string(),
                })?;
                Ok(vec![(name.to_string(), values)])
            }
        }
    }
}
