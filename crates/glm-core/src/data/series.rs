//! Series data structure for holding homogeneous data
//!
//! A Series is a one-dimensional array that can hold data of a specific type.
//! It's the building block of DataFrames.

use super::*;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

/// A Series is a typed, one-dimensional array of data
#[derive(Clone, Debug, PartialEq)]
pub enum Series {
    /// Floating point numbers (f64)
    Float(FloatArray),
    /// Integer numbers (i64)
    Int(IntArray),
    /// Boolean values
    Bool(BoolArray),
    /// String values
    String(StringArray),
    /// Categorical data
    Categorical(Factor),
}

impl Series {
    /// Create a new Float series
    pub fn float(data: impl Into<FloatArray>) -> Self {
        Series::Float(data.into())
    }

    /// Create a new Int series
    pub fn int(data: impl Into<IntArray>) -> Self {
        Series::Int(data.into())
    }

    /// Create a new Bool series
    pub fn bool(data: impl Into<BoolArray>) -> Self {
        Series::Bool(data.into())
    }

    /// Create a new String series
    pub fn string<T: AsRef<str>>(data: &[T]) -> Self {
        Series::String(data.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Create a new Categorical series with sorted levels, the first one as reference
    pub fn categorical<T: AsRef<str>>(data: &[T]) -> Self {
        Series::Categorical(Factor::new(data))
    }

    /// Get the length of the series
    pub fn len(&self) -> usize {
        match self {
            Series::Float(arr) => arr.len(),
            Series::Int(arr) => arr.len(),
            Series::Bool(arr) => arr.len(),
            Series::String(arr) => arr.len(),
            Series::Categorical(factor) => factor.len(),
        }
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name of the series
    pub fn dtype(&self) -> &'static str {
        match self {
            Series::Float(_) => "float64",
            Series::Int(_) => "int64",
            Series::Bool(_) => "bool",
            Series::String(_) => "string",
            Series::Categorical(_) => "categorical",
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Series::Categorical(_))
    }

    /// Borrow the factor of a categorical series
    pub fn as_factor(&self) -> Option<&Factor> {
        match self {
            Series::Categorical(factor) => Some(factor),
            _ => None,
        }
    }

    /// Numeric values as `f64`; booleans map to 0/1
    pub fn to_float(&self) -> Result<FloatArray> {
        match self {
            Series::Float(arr) => Ok(arr.clone()),
            Series::Int(arr) => Ok(arr.mapv(|v| v as f64)),
            Series::Bool(arr) => Ok(arr.mapv(|v| if v { 1.0 } else { 0.0 })),
            Series::String(_) => Err(DataError::NonNumericData("string")),
            Series::Categorical(_) => Err(DataError::NonNumericData("categorical")),
        }
    }

    /// Row labels as strings, used when converting to a categorical column
    pub fn labels(&self) -> Result<Vec<String>> {
        match self {
            Series::Int(arr) => Ok(arr.iter().map(|v| v.to_string()).collect()),
            Series::Bool(arr) => Ok(arr.iter().map(|v| v.to_string()).collect()),
            Series::String(arr) => Ok(arr.clone()),
            Series::Categorical(factor) => Ok(factor.labels().map(str::to_string).collect()),
            Series::Float(_) => Err(DataError::TypeMismatch {
                expected: "string, int, bool or categorical",
                actual: "float64",
            }),
        }
    }

    /// Convert to a categorical series; categorical input is returned unchanged
    pub fn to_categorical(&self) -> Result<Series> {
        match self {
            Series::Categorical(_) => Ok(self.clone()),
            other => Ok(Series::Categorical(Factor::new(&other.labels()?))),
        }
    }
}

/// Categorical column: per-row level codes over an ordered level set
///
/// The reference (base) level is the one dropped by reduced-rank coding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    codes: Array1<u32>,
    levels: Vec<String>,
    base: usize,
}

impl Factor {
    /// Encode labels over their sorted unique values; the first level is the reference
    pub fn new<T: AsRef<str>>(data: &[T]) -> Self {
        let mut levels: Vec<String> = data.iter().map(|s| s.as_ref().to_string()).collect();
        levels.sort();
        levels.dedup();

        let lookup: HashMap<&str, u32> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.as_str(), i as u32))
            .collect();

        // every label is a key by construction
        let codes = data
            .iter()
            .map(|s| lookup.get(s.as_ref()).copied().unwrap_or_default())
            .collect();

        Self {
            codes,
            levels,
            base: 0,
        }
    }

    /// Encode labels against an explicit level order
    pub fn with_levels<T: AsRef<str>>(data: &[T], levels: Vec<String>) -> Result<Self> {
        let lookup: HashMap<&str, u32> = levels
            .iter()
            .enumerate()
            .map(|(i, level)| (level.as_str(), i as u32))
            .collect();

        let codes = data
            .iter()
            .map(|s| {
                lookup
                    .get(s.as_ref())
                    .copied()
                    .ok_or_else(|| DataError::UnknownLevel {
                        column: String::new(),
                        level: s.as_ref().to_string(),
                    })
            })
            .collect::<Result<Array1<u32>>>()?;

        Ok(Self {
            codes,
            levels,
            base: 0,
        })
    }

    /// Choose the reference level by label
    pub fn with_base(mut self, level: &str) -> Result<Self> {
        self.base = self
            .levels
            .iter()
            .position(|l| l == level)
            .ok_or_else(|| DataError::UnknownLevel {
                column: String::new(),
                level: level.to_string(),
            })?;
        Ok(self)
    }

    /// Encode new labels with this factor's levels and reference level
    pub fn recode<T: AsRef<str>>(&self, data: &[T]) -> Result<Self> {
        let mut factor = Self::with_levels(data, self.levels.clone())?;
        factor.base = self.base;
        Ok(factor)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &Array1<u32> {
        &self.codes
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Index of the reference level
    pub fn base(&self) -> usize {
        self.base
    }

    /// Reference level, `None` for a factor without levels
    pub fn base_level(&self) -> Option<&str> {
        self.levels.get(self.base).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(|&c| self.levels[c as usize].as_str())
    }

    /// Level indices that get a dummy column: all of them when `full`,
    /// every level but the reference otherwise
    pub fn coded_levels(&self, full: bool) -> Vec<usize> {
        (0..self.levels.len())
            .filter(|&i| full || i != self.base)
            .collect()
    }

    /// 0/1 indicator column for one level
    pub fn indicator(&self, level: usize) -> FloatArray {
        self.codes
            .mapv(|c| if c as usize == level { 1.0 } else { 0.0 })
    }
}
