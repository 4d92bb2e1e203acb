use rand::{CryptoRng, Rng};

use crate::comment::comment_model::{Participant, Winner};

// ============================================================================
// Unbiased selection without replacement
// ============================================================================

/// Draw up to `count` winners using the thread-local CSPRNG.
pub fn select(participants: &[Participant], count: usize) -> Vec<Winner> {
    select_with(participants, count, &mut rand::rng())
}

/// Draw up to `count` winners from `participants`.
///
/// `count` is clamped to the number of participants; a request for more
/// winners than entrants returns everyone in random order. An empty slice
/// or `count == 0` yields an empty draw. Only cryptographically secure
/// generators are accepted.
pub fn select_with<R: CryptoRng>(
    participants: &[Participant],
    count: usize,
    rng: &mut R,
) -> Vec<Winner> {
    let count = count.min(participants.len());

    let mut order: Vec<usize> = (0..participants.len()).collect();
    fisher_yates(&mut order, rng);

    order
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, idx)| Winner {
            rank: i + 1,
            entry: idx + 1,
            participant: participants[idx].clone(),
        })
        .collect()
}

/// In-place Fisher-Yates shuffle.
///
/// `random_range` samples `[0, i]` without modulo bias, so every
/// permutation is equally likely.
pub fn fisher_yates<T, R: CryptoRng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
