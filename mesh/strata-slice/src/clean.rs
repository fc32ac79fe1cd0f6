//! Loop cleaner: removes duplicate and subsumed candidates.

use std::cmp::Reverse;

use hashbrown::HashSet;

use crate::assemble::Candidate;
use crate::geometry::PointKey;

/// Keep each candidate that owns at least one point found in no candidate
/// after it.
fn containment_pass(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut later: HashSet<PointKey> = HashSet::new();
    let mut keep = vec![false; candidates.len()];
    for (i, candidate) in candidates.iter().enumerate().rev() {
        keep[i] = candidate.points.iter().any(|p| !later.contains(p));
        later.extend(candidate.points.iter().copied());
    }
    candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}

/// Two-pass containment filter over a layer's candidates.
///
/// 1. Stable sort by descending point count, then drop every candidate all
///    of whose points appear in the candidates after it.
/// 2. Stable sort of the survivors by ascending point count, same filter.
///
/// The first pass removes large traces stitched together from smaller
/// loops, the second removes small traces lying inside larger ones. Among
/// equal-length candidates discovery order decides which copy survives. The
/// result is ordered by ascending length and `clean(clean(x)) == clean(x)`.
///
/// # Example
///
/// ```
/// use strata_slice::{Candidate, PointKey, clean};
///
/// let square = Candidate {
///     points: vec![PointKey(0, 0), PointKey(1, 0), PointKey(1, 1), PointKey(0, 1)],
///     closed: true,
/// };
/// let mut reversed = square.clone();
/// reversed.points.reverse();
///
/// let cleaned = clean(vec![square.clone(), reversed]);
/// assert_eq!(cleaned.len(), 1);
/// ```
#[must_use]
pub fn clean(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| Reverse(c.points.len()));
    let mut survivors = containment_pass(candidates);
    survivors.sort_by_key(|c| c.points.len());
    containment_pass(survivors)
}
