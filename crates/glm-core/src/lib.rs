//! Core building blocks for formula-driven generalized linear models
//!
//! - [`data`]: typed columns, categorical factors and the [`data::DataFrame`] they live in
//! - [`formula`]: Wilkinson formula parsing, term algebra and design matrices

pub mod data;
pub mod formula;
