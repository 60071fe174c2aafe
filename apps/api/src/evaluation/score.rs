//! Score extraction.
//!
//! Two accepted forms, tried in order: a `Score` label followed by a number
//! (`Score: 4.5`, `**Score:** 4`), then a bare fraction out of five (`3/5`).
//! No range check is applied; a missing score reads as 0.

use std::sync::LazyLock;

use regex::Regex;

static LABELED_SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // After a colon the number may sit on the next line (`**Score:**\n4`).
    Regex::new(
        r"(?i)\bscore\b[ \t]*(?:\*\*|__)?[ \t]*(?::[ \t]*(?:\*\*|__)?\s*|(?:\*\*|__)?[ \t]*)(\d+(?:\.\d+)?)",
    )
    .expect("valid regex")
});

static FRACTION_SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)/5\b").expect("valid regex"));

pub fn extract_score(text: &str) -> f64 {
    [&*LABELED_SCORE_RE, &*FRACTION_SCORE_RE]
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_decimal() {
        assert_eq!(extract_score("Score: 4.5\nStrengths: good"), 4.5);
    }

    #[test]
    fn test_labeled_without_colon() {
        assert_eq!(extract_score("score 3"), 3.0);
    }

    #[test]
    fn test_fraction_without_label() {
        assert_eq!(extract_score("Overall I'd give this 3/5."), 3.0);
    }

    #[test]
    fn test_label_takes_precedence_over_fraction() {
        assert_eq!(extract_score("Score: 4/5"), 4.0);
        assert_eq!(extract_score("2/5 at first glance. Final Score: 3.5"), 3.5);
    }

    #[test]
    fn test_bold_label() {
        assert_eq!(extract_score("**Score:** 2"), 2.0);
        assert_eq!(extract_score("**Score**: 5"), 5.0);
    }

    #[test]
    fn test_number_on_line_after_bold_label() {
        assert_eq!(extract_score("**Score:**\n4\nStrengths: ok"), 4.0);
        assert_eq!(extract_score("Score:\n\n3.5"), 3.5);
    }

    #[test]
    fn test_unlabeled_number_on_next_line_needs_colon() {
        assert_eq!(extract_score("Your score\n1. Strengths"), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_score("SCORE: 1"), 1.0);
    }

    #[test]
    fn test_missing_score_defaults_to_zero() {
        assert_eq!(extract_score(""), 0.0);
        assert_eq!(extract_score("Strengths: clear structure"), 0.0);
    }

    #[test]
    fn test_plural_scores_is_not_a_label() {
        assert_eq!(extract_score("Scores 7 are rare"), 0.0);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        assert_eq!(extract_score("Score: 9"), 9.0);
    }

    #[test]
    fn test_fraction_out_of_fifty_is_ignored() {
        assert_eq!(extract_score("30/50 questions"), 0.0);
    }
}
