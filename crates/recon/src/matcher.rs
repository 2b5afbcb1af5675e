use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Exact set comparison
// ---------------------------------------------------------------------------

/// Outcome of comparing two normalized value lists as sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListComparison {
    pub matches: BTreeSet<String>,
    /// In the first list, absent from the second.
    pub missing_in_second: BTreeSet<String>,
    /// In the second list, absent from the first.
    pub missing_in_first: BTreeSet<String>,
    pub match_count: usize,
    pub total_unique_first: usize,
    pub total_unique_second: usize,
    pub match_percentage: f64,
}

impl ListComparison {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Compare two already-normalized lists. Duplicates collapse and order is
/// irrelevant. Two empty lists are a 100% match.
pub fn compare<A, B>(first: &[A], second: &[B]) -> ListComparison
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let first: BTreeSet<String> = first.iter().map(|s| s.as_ref().to_string()).collect();
    let second: BTreeSet<String> = second.iter().map(|s| s.as_ref().to_string()).collect();

    let matches: BTreeSet<String> = first.intersection(&second).cloned().collect();
    let missing_in_second: BTreeSet<String> = first.difference(&second).cloned().collect();
    let missing_in_first: BTreeSet<String> = second.difference(&first).cloned().collect();

    let denominator = first.len().max(second.len());
    let match_percentage = if denominator == 0 {
        100.0
    } else {
        matches.len() as f64 / denominator as f64 * 100.0
    };

    ListComparison {
        match_count: matches.len(),
        total_unique_first: first.len(),
        total_unique_second: second.len(),
        matches,
        missing_in_second,
        missing_in_first,
        match_percentage,
    }
}

// ---------------------------------------------------------------------------
// Fuzzy matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    pub item: String,
    pub candidate: String,
    pub score: f64,
}

/// For each item, the highest-scoring candidate at or above `threshold`.
///
/// Greedy per item: one candidate may be claimed by several items. Callers
/// that need a one-to-one pairing must filter the result themselves.
pub fn best_matches<A, B>(items: &[A], candidates: &[B], threshold: f64) -> Vec<FuzzyMatch>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut matches = Vec::new();

    for item in items {
        let item = item.as_ref();
        let mut best: Option<(&str, f64)> = None;

        for candidate in candidates {
            let candidate = candidate.as_ref();
            let score = similarity(item, candidate);
            if score < threshold {
                continue;
            }
            // Ties keep the earliest candidate.
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        if let Some((candidate, score)) = best {
            matches.push(FuzzyMatch {
                item: item.to_string(),
                candidate: candidate.to_string(),
                score,
            });
        }
    }

    matches
}

/// Case-insensitive Ratcliff/Obershelp similarity in `0.0..=1.0`:
/// twice the number of matching characters over the total length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Longest common contiguous block as `(start_in_a, start_in_b, len)`.
/// The earliest block in `a` wins ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut cur = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                cur[j + 1] = prev[j] + 1;
                let len = cur[j + 1];
                let start = i + 1 - len;
                if len > best.2 || (len == best.2 && start < best.0) {
                    best = (start, j + 1 - len, len);
                }
            }
        }
        prev = cur;
    }

    best
}
