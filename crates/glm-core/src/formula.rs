//! Wilkinson formula parsing and design matrix construction
//!
//! A formula such as `"y ~ a + b:c"` is reduced in three stages:
//!
//! 1. the right-hand side is expanded into raw interaction terms
//!    ([`FormulaParser`]), deduplicated and ordered by size, with the
//!    intercept added unless `0` or `1` is given;
//! 2. terms are grouped by the numeric (non-categorical) factors they
//!    contain, and the categorical residue of each group is made
//!    non-redundant by [`canonicalize`];
//! 3. the numeric factors are re-attached and the result is expanded into
//!    named columns by [`DesignMatrixBuilder`].

use indexmap::IndexMap;
use std::fmt;

use crate::data::{DataFrame, Factor};

pub mod algebra;
pub mod design;
pub mod error;
mod parser;
mod term;


pub use algebra::canonicalize;
pub use design::{CONSTANT_COLUMN, DesignMatrix, DesignMatrixBuilder};
pub use error::{FormulaError, FormulaResult};
pub use parser::FormulaParser;
pub use term::Term;

pub type Result<T> = std::result::Result<T, FormulaError>;

/// A parsed formula bound to the categorical layout of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    /// Response variable (left-hand side)
    response: String,
    /// Raw terms after shortcut expansion and intercept handling
    terms: Vec<Term>,
    /// Non-redundant terms, in design-matrix order
    canonical: Vec<Term>,
}

impl Formula {
    /// Parse `formula` against `df`, which decides which factors are categorical
    pub fn parse(formula: &str, df: &DataFrame) -> Result<Self> {
        let formula: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
        let (response, rhs) = split_sides(&formula)?;

        let terms = Self::raw_terms(rhs)?;

        for name in std::iter::once(response).chain(
            terms
                .iter()
                .flat_map(|t| t.factors().iter().map(String::as_str)),
        ) {
            if !df.has_column(name) {
                return Err(FormulaError::variable_not_found(name, &df.column_names()));
            }
        }

        let canonical = Self::non_redundant_terms(&terms, df)?;

        let parsed = Self {
            response: response.to_string(),
            terms,
            canonical,
        };
        log::debug!(
            "formula {} reduced to {} with canonical terms {}",
            formula,
            parsed.reduced_string(),
            parsed.canonical_string()
        );

        Ok(parsed)
    }

    /// Deduplicated raw terms ordered by size, with `0`/`1` resolved
    ///
    /// `0` drops the implicit intercept only; an explicit `1` next to it
    /// keeps the intercept, so `y ~ 0 + 1 + a` reduces to `y~1+a`.
    fn raw_terms(rhs: &str) -> Result<Vec<Term>> {
        let names = FormulaParser::reduce(rhs)?;

        let has_zero = names.iter().any(|n| n == "0");
        let has_one = names.iter().any(|n| n == "1");

        let mut terms: Vec<Term> = Vec::new();
        for term in names.iter().filter(|n| *n != "0").map(|n| Term::parse(n)) {
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms.sort_by_key(Term::size);

        if !has_zero && !has_one {
            terms.insert(0, Term::intercept());
        }

        Ok(terms)
    }

    /// Canonicalize the categorical residue of each numeric-factor group
    fn non_redundant_terms(terms: &[Term], df: &DataFrame) -> Result<Vec<Term>> {
        let mut groups: IndexMap<Vec<String>, Vec<Term>> = IndexMap::new();

        for term in terms {
            let numeric: Vec<String> = term
                .factors()
                .iter()
                .filter(|f| !df.is_categorical(f))
                .cloned()
                .collect();
            let residue = Term::new(
                term.factors()
                    .iter()
                    .filter(|f| !numeric.contains(f))
                    .cloned(),
            );
            groups.entry(numeric).or_default().push(residue);
        }

        let mut canonical = Vec::new();
        for (numeric, residues) in &groups {
            for term in canonicalize(residues)? {
                let factors = term.factors().iter().chain(numeric).cloned();
                canonical.push(Term::with_full(factors, term.full().to_vec()));
            }
        }

        Ok(canonical)
    }

    pub fn response(&self) -> &str {
        &self.response
    }

    /// Raw terms, all full rank, as written after shortcut expansion
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn canonical_terms(&self) -> &[Term] {
        &self.canonical
    }

    pub fn has_intercept(&self) -> bool {
        self.canonical.iter().any(Term::is_intercept)
    }

    /// `y~1+a+b+a:b` for `y ~ a*b`
    pub fn reduced_string(&self) -> String {
        format!("{}~{}", self.response, join_terms(&self.terms))
    }

    /// Canonical terms with rank markers, e.g. `1+c(-)+d(-):c+a`
    pub fn canonical_string(&self) -> String {
        join_terms(&self.canonical)
    }

    pub fn canonical(&self) -> CanonicalFormula {
        CanonicalFormula {
            response: self.response.clone(),
            terms: self.canonical.clone(),
        }
    }

    /// Categorical factors used by the canonical terms, in first-use order
    pub fn categorical_levels(&self, df: &DataFrame) -> IndexMap<String, Factor> {
        self.canonical
            .iter()
            .flat_map(|t| t.factors())
            .filter_map(|name| {
                df.get_column(name)
                    .and_then(|s| s.as_factor())
                    .map(|factor| (name.clone(), factor.clone()))
            })
            .collect()
    }

    /// Design matrix of `df` for the canonical terms
    pub fn design_matrix(&self, df: &DataFrame) -> Result<DesignMatrix> {
        DesignMatrixBuilder::new(&self.canonical).build(df)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reduced_string())
    }
}

/// Response plus the ordered non-redundant terms
///
/// Displays as a formula that parses back to the same canonical terms,
/// e.g. `y~1+e+a`, or `y~0+a+e:a+e` without an intercept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalFormula {
    pub response: String,
    pub terms: Vec<Term>,
}

impl fmt::Display for CanonicalFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.terms.iter().map(Term::name).collect();
        if !self.terms.iter().any(Term::is_intercept) {
            names.insert(0, "0".to_string());
        }
        write!(f, "{}~{}", self.response, names.join("+"))
    }
}

fn join_terms(terms: &[Term]) -> String {
    terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("+")
}

fn split_sides(formula: &str) -> Result<(&str, &str)> {
    let mut sides = formula.split('~');
    match (sides.next(), sides.next(), sides.next()) {
        (Some(lhs), Some(rhs), None) => {
            if lhs.is_empty() {
                return Err(FormulaError::syntax(0, "Missing response before '~'"));
            }
            if !lhs.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') {
                return Err(FormulaError::syntax(0, format!("Invalid response '{}'", lhs)));
            }
            Ok((lhs, rhs))
        }
        (_, None, _) => Err(FormulaError::syntax(formula.len(), "Expected '~'")),
        _ => {
            let position = formula.rfind('~').unwrap_or_default();
            Err(FormulaError::syntax(position, "More than one '~'"))
        }
    }
}
