//! Damerau-Levenshtein edit distance for "did you mean" suggestions.
//!
//! Insertions, deletions, substitutions and transpositions of adjacent
//! units each cost 1. Transpositions may be separated by further edits
//! (the unrestricted variant), which keeps suggestions sensible for
//! misspellings like `updaet` → `update`.
//!
//! # Examples
//!
//! ```
//! use argdecl_core::distance;
//!
//! assert_eq!(distance::chars("cat", "cats"), 1);
//! assert_eq!(distance::chars("updaet", "update"), 1);
//! // Multi-byte text differs between the two unit choices.
//! assert_eq!(distance::chars("héllo", "hello"), 1);
//! assert_eq!(distance::bytes("héllo", "hello"), 2);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// Computes the distance between two sequences of comparable units.
///
/// Runs in `O(|a| * |b|)` time and space. The first row and column of the
/// table hold an "infinite" sentinel so transpositions involving a unit
/// that has not been seen yet can never win.
pub fn damerau_levenshtein<T>(a: &[T], b: &[T]) -> usize
where
    T: Eq + Hash,
{
    let infinity = a.len() + b.len();
    let width = b.len() + 2;
    let mut table = vec![0usize; (a.len() + 2) * width];
    let at = |i: usize, j: usize| i * width + j;

    table[at(0, 0)] = infinity;
    for i in 0..=a.len() {
        table[at(i + 1, 0)] = infinity;
        table[at(i + 1, 1)] = i;
    }
    for j in 0..=b.len() {
        table[at(0, j + 1)] = infinity;
        table[at(1, j + 1)] = j;
    }

    // Last row in which each unit of `a` was seen.
    let mut last_row: HashMap<&T, usize> = HashMap::new();

    for i in 1..=a.len() {
        let mut last_match_col = 0;
        for j in 1..=b.len() {
            let prev_row = last_row.get(&b[j - 1]).copied().unwrap_or(0);
            let prev_col = last_match_col;
            let cost = if a[i - 1] == b[j - 1] {
                last_match_col = j;
                0
            } else {
                1
            };

            let substitution = table[at(i, j)] + cost;
            let insertion = table[at(i + 1, j)] + 1;
            let deletion = table[at(i, j + 1)] + 1;
            let transposition =
                table[at(prev_row, prev_col)] + (i - prev_row - 1) + 1 + (j - prev_col - 1);

            table[at(i + 1, j + 1)] = substitution
                .min(insertion)
                .min(deletion)
                .min(transposition);
        }
        last_row.insert(&a[i - 1], i);
    }

    table[at(a.len() + 1, b.len() + 1)]
}

/// Distance between two strings compared byte by byte.
pub fn bytes(a: &str, b: &str) -> usize {
    damerau_levenshtein(a.as_bytes(), b.as_bytes())
}

/// Distance between two strings compared by Unicode scalar value.
pub fn chars(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    damerau_levenshtein(&a, &b)
}

/// Returns the candidate closest to `input`, with its distance.
///
/// Ties keep the earliest candidate.
pub fn closest<'a, I>(input: &str, candidates: I) -> Option<(usize, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, &'a str)> = None;
    for candidate in candidates {
        let d = chars(input, candidate);
        if best.is_none_or(|(best_distance, _)| d < best_distance) {
            best = Some((d, candidate));
        }
    }
    best
}
