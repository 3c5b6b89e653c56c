//! Redundancy elimination over categorical terms
//!
//! [`canonicalize`] walks the terms left to right. Each term contributes only
//! the pieces of its expansion that the terms before it do not already imply,
//! and those pieces are merged pairwise (see [`Term::add`]) until no pair
//! merges. The result codes every categorical interaction with exactly the
//! columns it adds over the lower-order terms already in the model.

use itertools::Itertools;

use super::{FormulaResult, Term};

/// Reduce `terms` to the minimal non-redundant set, in model order
pub fn canonicalize(terms: &[Term]) -> FormulaResult<Vec<Term>> {
    terms.iter().try_fold(Vec::new(), |accumulated, term| {
        let added = non_redundant_pieces(term, &accumulated)?;
        Ok([accumulated, added].concat())
    })
}

/// Pieces of `term` not already implied by `so_far`, contracted
fn non_redundant_pieces(term: &Term, so_far: &[Term]) -> FormulaResult<Vec<Term>> {
    if term.is_intercept() {
        return Ok(vec![term.clone()]);
    }

    let mut present = Vec::new();
    for previous in so_far {
        present.extend(previous.expand()?);
    }

    let pieces = term
        .expand()?
        .into_iter()
        .filter(|piece| !present.contains(piece))
        .collect();

    Ok(contract(pieces))
}

/// Merge pairs until a fixed point, then order by size
///
/// Pairs are tried in combination order; after each merge the scan restarts
/// on the new set, with the merged term appended at the end.
pub fn contract(pieces: Vec<Term>) -> Vec<Term> {
    let mut current = pieces;

    while let Some((a, b, merged)) = first_merge(&current) {
        current = current
            .into_iter()
            .filter(|t| *t != a && *t != b)
            .chain(std::iter::once(merged))
            .collect();
    }

    current.sort_by_key(Term::size);
    current
}

fn first_merge(terms: &[Term]) -> Option<(Term, Term, Term)> {
    terms
        .iter()
        .tuple_combinations()
        .find_map(|(a, b)| a.add(b).map(|merged| (a.clone(), b.clone(), merged)))
}
