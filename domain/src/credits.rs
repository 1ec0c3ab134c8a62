//! Credit-exhaustion detection.
//!
//! The analysis service has no structured "out of credits" error code; it only
//! reports a message. This module holds the one place where that message is
//! matched by text. The check is heuristic and will miss rewordings upstream.

/// Phrases that, next to the word "credit", signal an exhausted balance.
const EXHAUSTION_MARKERS: &[&str] = &[
    "insufficient",
    "not enough",
    "out of",
    "exhausted",
    "no credits",
    "no remaining",
    "run out",
    "ran out",
    "0 credits",
];

/// Returns true if a service error message reads like a credit-balance rejection.
pub fn looks_like_credit_exhaustion(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("credit") && EXHAUSTION_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_common_phrasings() {
        assert!(looks_like_credit_exhaustion("Insufficient credits"));
        assert!(looks_like_credit_exhaustion("You have run out of credits."));
        assert!(looks_like_credit_exhaustion("Account has no credits left"));
        assert!(looks_like_credit_exhaustion("Not enough credits for this request"));
    }

    #[test]
    fn test_ignores_unrelated_errors() {
        assert!(!looks_like_credit_exhaustion("Access denied."));
        assert!(!looks_like_credit_exhaustion("Image is out of bounds"));
        assert!(!looks_like_credit_exhaustion("credit card expired? contact support"));
    }
}
