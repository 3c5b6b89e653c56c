//! DataFrame implementation for tabular data
//!
//! A DataFrame is a 2-dimensional labeled data structure with columns of
//! potentially different types. Column order is insertion order.

use super::*;

use indexmap::IndexMap;

/// Main DataFrame structure
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFrame {
    pub(crate) columns: IndexMap<String, Series>,
    pub(crate) nrows: usize,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self::default()
    }

    /// Create DataFrame from columns
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut builder = DataFrameBuilder::new();

        for (name, series) in columns.into_iter() {
            builder = builder.with_column(name, series)?;
        }

        builder.build()
    }

    /// Get the shape of the DataFrame (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Get the number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Get the number of columns
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a reference to a column
    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Like [`DataFrame::get_column`], failing with `ColumnNotFound`
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.columns
            .get(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Check if column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Whether `name` exists and holds categorical data
    pub fn is_categorical(&self, name: &str) -> bool {
        self.columns
            .get(name)
            .is_some_and(|series| series.is_categorical())
    }

    /// Numeric column as `f64`
    pub fn float_column(&self, name: &str) -> Result<FloatArray> {
        self.column(name)?.to_float()
    }

    /// Select specific columns
    pub fn select<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = DataFrameBuilder::new();

        for name in names.into_iter() {
            let name = name.as_ref();
            builder = builder.with_column(name, self.column(name)?.clone())?;
        }

        builder.build()
    }

    /// Add a new column
    pub fn with_column<S: Into<String>>(mut self, name: S, series: Series) -> Result<Self> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(DataError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && series.len() != self.nrows {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} rows", self.nrows),
                actual: format!("{} rows", series.len()),
            });
        }

        if self.columns.is_empty() {
            self.nrows = series.len();
        }

        self.columns.insert(name, series);
        Ok(self)
    }

    /// Drop columns
    pub fn drop<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            let name = name.as_ref();
            if self.columns.shift_remove(name).is_none() {
                return Err(DataError::ColumnNotFound(name.to_string()));
            }
        }

        if self.columns.is_empty() {
            self.nrows = 0;
        }

        Ok(self)
    }

    /// Convert the named columns to categorical, in place of the originals
    pub fn to_categorical<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        for name in names {
            let name = name.as_ref();
            let series = self
                .columns
                .get_mut(name)
                .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))?;
            *series = series.to_categorical()?;
        }

        Ok(self)
    }

    /// Change the reference level of a categorical column
    pub fn set_base(mut self, name: &str, level: &str) -> Result<Self> {
        let series = self
            .columns
            .get_mut(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))?;

        match series {
            Series::Categorical(factor) => {
                *factor = factor
                    .clone()
                    .with_base(level)
                    .map_err(|e| e.in_column(name))?;
                Ok(self)
            }
            other => Err(DataError::TypeMismatch {
                expected: "categorical",
                actual: other.dtype(),
            }),
        }
    }

    /// Re-encode a column of new data with the levels of `factor`
    ///
    /// String, integer, boolean and categorical columns are accepted; a label
    /// outside the known levels is an `UnknownLevel` error.
    pub fn recode_column(&self, name: &str, factor: &Factor) -> Result<Factor> {
        let labels = self.column(name)?.labels()?;
        factor.recode(&labels).map_err(|e| e.in_column(name))
    }
}

impl std::fmt::Display for DataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataFrame({} rows × {} cols)", self.nrows, self.ncols())
    }
}
