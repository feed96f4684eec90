use std::collections::HashSet;

fn tokens(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard index of the lower-cased whitespace tokens of `a` and `b`.
///
/// Returns 0.0 when either side has no tokens.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = tokens(a);
    let right = tokens(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    shared as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_token_sets() {
        assert_eq!(similarity("Fresh Mart", "fresh   MART"), 1.0);
        assert_eq!(similarity("mart fresh", "Fresh Mart"), 1.0);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        assert_eq!(similarity("", "Fresh Mart"), 0.0);
        assert_eq!(similarity("Fresh Mart", "   "), 0.0);
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let sim = similarity(
            "Fresh Mart Mississauga",
            "Fresh Mart Mississauga - Too Good To Go",
        );
        assert!((sim - 3.0 / 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_and_bounded() {
        let pairs = [
            ("Fresh Mart", "Mart"),
            ("a b c", "c d e f"),
            ("Bakery on Main", "main street bakery"),
            ("x", "y"),
        ];
        for (a, b) in pairs {
            let ab = similarity(a, b);
            assert_eq!(ab, similarity(b, a));
            assert!((0.0..=1.0).contains(&ab));
        }
        assert_eq!(similarity("x", "y"), 0.0);
    }

    #[test]
    fn test_duplicate_tokens_count_once() {
        assert_eq!(similarity("mart mart mart", "mart"), 1.0);
    }
}
