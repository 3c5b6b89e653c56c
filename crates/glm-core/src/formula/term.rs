//! Model terms
//!
//! A [`Term`] is one additive unit of a formula: the intercept, a single
//! factor or an interaction of factors. Each factor carries a `full` flag:
//! `true` for full-rank coding (a column per level), `false` for reduced-rank
//! coding (the reference level dropped). Numeric factors ignore the flag.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FormulaError, FormulaResult};

/// One main effect or interaction, with a rank flag per factor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    factors: Vec<String>,
    full: Vec<bool>,
}

impl Term {
    /// The intercept term "1"
    pub fn intercept() -> Self {
        Self {
            factors: Vec::new(),
            full: Vec::new(),
        }
    }

    /// A full-rank term over `factors`; no factors, or the lone factor "1", is the intercept
    pub fn new<S: Into<String>>(factors: impl IntoIterator<Item = S>) -> Self {
        Self::with_full(factors, Vec::new())
    }

    /// A term with explicit rank flags; missing trailing flags default to full rank
    pub fn with_full<S: Into<String>>(factors: impl IntoIterator<Item = S>, full: Vec<bool>) -> Self {
        let factors: Vec<String> = factors.into_iter().map(Into::into).collect();
        if factors.is_empty() || (factors.len() == 1 && factors[0] == "1") {
            return Self::intercept();
        }

        let mut full = full;
        full.resize(factors.len(), true);
        Self { factors, full }
    }

    /// A single factor in reduced-rank form
    pub fn reduced(factor: impl Into<String>) -> Self {
        Self::with_full([factor.into()], vec![false])
    }

    /// Parse `"a"`, `"a:b"` or `"1"` into a full-rank term
    pub fn parse(value: &str) -> Self {
        Self::new(value.split(':'))
    }

    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    pub fn full(&self) -> &[bool] {
        &self.full
    }

    /// Number of factors, 0 for the intercept
    pub fn size(&self) -> usize {
        self.factors.len()
    }

    pub fn is_intercept(&self) -> bool {
        self.factors.is_empty()
    }

    /// Factor names joined by `:`, without rank markers
    pub fn name(&self) -> String {
        if self.is_intercept() {
            "1".to_string()
        } else {
            self.factors.join(":")
        }
    }

    /// The strictly lower-order pieces this term implies, all in reduced rank
    ///
    /// `a:b` expands to `1, a(-), b(-), a(-):b(-)`; `a` to `1, a(-)`; the
    /// intercept to itself.
    pub fn expand(&self) -> FormulaResult<Vec<Term>> {
        match self.factors.as_slice() {
            [] => Ok(vec![self.clone()]),
            [a] => Ok(vec![Term::intercept(), Term::reduced(a.clone())]),
            [a, b] => Ok(vec![
                Term::intercept(),
                Term::reduced(a.clone()),
                Term::reduced(b.clone()),
                Term::with_full([a.clone(), b.clone()], vec![false, false]),
            ]),
            _ => Err(FormulaError::UnsupportedInteraction { term: self.name() }),
        }
    }

    /// Merge two mutually redundant terms into one, if a rule applies
    ///
    /// - `b + a(-):b` is `a:b` with `a` promoted to full rank
    /// - `a + a:b(-)` is `a:b` with `b` promoted to full rank
    /// - `1 + a(-)` is `a`
    pub fn add(&self, other: &Term) -> Option<Term> {
        if self.size() > other.size() {
            return other.add(self);
        }

        if self.is_intercept() {
            return (other.size() == 1).then(|| Term::new(other.factors.clone()));
        }

        if self.size() != 1 || other.size() != 2 {
            return None;
        }

        let value = &self.factors[0];
        let flag = self.full[0];
        let (first, last) = (&other.factors[0], &other.factors[1]);
        let (first_full, last_full) = (other.full[0], other.full[1]);

        if last == value && last_full == flag && !first_full {
            Some(Term::with_full(
                [first.clone(), value.clone()],
                vec![true, last_full],
            ))
        } else if first == value && first_full == flag && !last_full {
            Some(Term::with_full(
                [value.clone(), last.clone()],
                vec![first_full, true],
            ))
        } else {
            None
        }
    }
}

/// Annotated form: reduced-rank factors carry a `(-)` suffix, e.g. `a(-):b`
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_intercept() {
            return write!(f, "1");
        }

        let parts: Vec<String> = self
            .factors
            .iter()
            .zip(&self.full)
            .map(|(factor, &full)| {
                if full {
                    factor.clone()
                } else {
                    format!("{}(-)", factor)
                }
            })
            .collect();
        write!(f, "{}", parts.join(":"))
    }
}
