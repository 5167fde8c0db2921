//! Uniform random reviewer selection.
//!
//! Pure function over a candidate pool; the randomness source is an explicit
//! parameter so callers can pass a seeded generator and get deterministic
//! picks in tests.

use rand::seq::SliceRandom;
use rand::Rng;

/// Pick up to `count` reviewers from `candidates`, uniformly at random and
/// without replacement.
///
/// Returns `min(count, candidates.len())` distinct ids. No ordering among
/// the returned ids is guaranteed.
pub fn pick_reviewers<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[String],
    count: usize,
) -> Vec<String> {
    candidates.choose_multiple(rng, count).cloned().collect()
}
