// src/core/types.rs
use serde::{Deserialize, Serialize};

/// The sorted-letter form of a word; the anagram-equivalence key.
pub type Fingerprint = String;

/// Returns the fingerprint of a word: its characters sorted by code point.
///
/// Two words share a fingerprint iff they are letter-permutations of each
/// other. Sorting is case-sensitive, so "Die" and "die" fingerprint
/// differently.
pub fn fingerprint(word: &str) -> Fingerprint {
    let mut chars: Vec<char> = word.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Counters accumulated while building a dictionary from a frequency corpus.
///
/// `duplicates` is a subset of `ignored`: every fingerprint collision that
/// loses to a more frequent word counts in both.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BuildStats {
    pub lines: u64,
    pub ignored: u64,
    pub duplicates: u64,
}

/// Per-translation token counters, accumulated over one call to
/// [`translate`](crate::core::engine::Translator::translate).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub tokens_processed: u64,
    pub tokens_translated: u64,
    pub tokens_not_translated: u64,
    pub tokens_not_words: u64,
}

impl SessionStats {
    /// Share of attempted tokens that resolved, in percent, rounded to one
    /// decimal. 0.0 when nothing was attempted (delimiter-only input).
    pub fn percent_translated(&self) -> f64 {
        let attempted = self.tokens_translated + self.tokens_not_translated;
        if attempted == 0 {
            return 0.0;
        }
        (self.tokens_translated as f64 / attempted as f64 * 1000.0).round() / 10.0
    }
}
