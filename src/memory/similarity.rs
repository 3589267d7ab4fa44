// Text similarity for fuzzy translation memory hits
// Author: kelexine (https://github.com/kelexine)

use std::collections::HashMap;

/// Word-overlap ratio between two texts, in `[0, 1]`.
///
/// Words are whitespace-separated and compared case-insensitively. Shared
/// words are counted as a multiset intersection (a word repeated twice on one
/// side only matches as often as it appears on the other), then divided by the
/// larger word count. Two texts without any words score `0.0`.
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let left = word_counts(a);
    let right = word_counts(b);

    let left_total: usize = left.values().sum();
    let right_total: usize = right.values().sum();
    let longest = left_total.max(right_total);
    if longest == 0 {
        return 0.0;
    }

    let shared: usize = left
        .iter()
        .map(|(word, count)| right.get(word).map_or(0, |other| (*count).min(*other)))
        .sum();

    shared as f64 / longest as f64
}

fn word_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}
