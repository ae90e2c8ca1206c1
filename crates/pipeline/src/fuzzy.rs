//! String-similarity scores for matching free text against titles.
//!
//! All scores are on a 0-100 scale. The building block is an indel ratio,
//! `2 * LCS / (len_a + len_b)`, computed over normalised text (lower-case,
//! punctuation folded to spaces, whitespace collapsed).

/// Lower-case, replace non-alphanumerics with spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length of the longest common subsequence of two char slices
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn char_ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Similarity of two already-normalised strings
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    char_ratio(&a, &b)
}

/// Best ratio of the shorter string against every equally long window of the longer
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }

    let mut best = 0.0f64;
    for window in long.windows(short.len()) {
        best = best.max(char_ratio(&short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn sorted_tokens(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens
}

/// Ratio after sorting the words of both strings
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a).join(" "), &sorted_tokens(b).join(" "))
}

/// Ratio that ignores words present in only one string, when that helps
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = sorted_tokens(a);
    let tokens_b = sorted_tokens(b);

    let common: Vec<&str> = tokens_a
        .iter()
        .filter(|t| tokens_b.contains(t))
        .copied()
        .collect();
    let only_a: Vec<&str> = tokens_a
        .iter()
        .filter(|t| !tokens_b.contains(t))
        .copied()
        .collect();
    let only_b: Vec<&str> = tokens_b
        .iter()
        .filter(|t| !tokens_a.contains(t))
        .copied()
        .collect();

    let base = common.join(" ");
    let with_a = format!("{} {}", base, only_a.join(" ")).trim().to_string();
    let with_b = format!("{} {}", base, only_b.join(" ")).trim().to_string();

    let mut best = ratio(&with_a, &with_b);
    if !base.is_empty() {
        best = best.max(ratio(&base, &with_a)).max(ratio(&base, &with_b));
    }
    best
}

/// Weighted combination used to pick the best title for a query.
///
/// Strings of similar length are compared whole (plus word-order and
/// word-subset variants, discounted to 95%). When one string is much longer,
/// substring matches count too, scaled by 0.9 (or 0.6 past an 8x length gap).
pub fn weighted_ratio(query: &str, choice: &str) -> u8 {
    let a = normalize(query);
    let b = normalize(choice);
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let base = ratio(&a, &b);
    let token_score = token_sort_ratio(&a, &b).max(token_set_ratio(&a, &b)) * 0.95;

    let score = if len_ratio < 1.5 {
        base.max(token_score)
    } else {
        let scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
        base.max(partial_ratio(&a, &b) * scale)
            .max(token_score * scale)
    };

    score.round().clamp(0.0, 100.0) as u8
}
