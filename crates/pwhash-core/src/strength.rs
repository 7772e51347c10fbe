//! Password strength rules.
//!
//! `check` is a pure predicate over any string. Lengths are counted in Unicode
//! code points, not bytes. Letter case is Unicode-aware; digits are the ASCII
//! decimal digits `0`-`9` only.

use serde::{Deserialize, Serialize};

/// Characters counted towards `min_special`.
pub const SPECIAL_CHARS: &str = "~!@#$%^&*()_+-=";

/// Thresholds a secret must meet before a task is admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthRules {
    pub min_lower_case: u32,
    pub min_upper_case: u32,
    /// Counted from [`SPECIAL_CHARS`].
    pub min_special: u32,
    pub min_digits: u32,
    pub min_length: u32,
    /// Upper bound to keep very large secrets out of the queue.
    pub max_length: u32,
}

impl Default for StrengthRules {
    fn default() -> Self {
        Self {
            min_lower_case: 1,
            min_upper_case: 1,
            min_special: 1,
            min_digits: 1,
            min_length: 8,
            max_length: 50,
        }
    }
}

impl StrengthRules {
    /// Rules that only bound the length.
    pub fn length_only(min_length: u32, max_length: u32) -> Self {
        Self {
            min_lower_case: 0,
            min_upper_case: 0,
            min_special: 0,
            min_digits: 0,
            min_length,
            max_length,
        }
    }

    pub fn passes(&self, secret: &str) -> bool {
        check(self, secret)
    }
}

#[derive(Debug, Default)]
struct CharCounts {
    lower: u32,
    upper: u32,
    digits: u32,
    special: u32,
    length: u32,
}

fn count(secret: &str) -> CharCounts {
    let mut counts = CharCounts::default();
    for c in secret.chars() {
        counts.length += 1;
        if c.is_lowercase() {
            counts.lower += 1;
        }
        if c.is_uppercase() {
            counts.upper += 1;
        }
        if c.is_ascii_digit() {
            counts.digits += 1;
        }
        if SPECIAL_CHARS.contains(c) {
            counts.special += 1;
        }
    }
    counts
}

/// Returns true if `secret` meets every rule.
pub fn check(rules: &StrengthRules, secret: &str) -> bool {
    let counts = count(secret);
    counts.lower >= rules.min_lower_case
        && counts.upper >= rules.min_upper_case
        && counts.digits >= rules.min_digits
        && counts.special >= rules.min_special
        && counts.length >= rules.min_length
        && counts.length <= rules.max_length
}
