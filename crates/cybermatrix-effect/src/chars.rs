//! Glyph selection for particles and rain.

use rand::{Rng, seq::SliceRandom};

/// Glyph drawn when an alphabet is configured empty.
pub const BLANK: char = ' ';

/// Pick a uniformly random glyph from `alphabet`.
pub fn pick<R: Rng + ?Sized>(alphabet: &[char], rng: &mut R) -> char {
    alphabet.choose(rng).copied().unwrap_or(BLANK)
}
