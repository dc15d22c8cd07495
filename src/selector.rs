//! Best guess selection over the plate candidates of one image.
//!
//! Rules are tried in priority order. Each rule scans every candidate before the
//! next, lower priority rule is consulted, so a plate-shaped candidate from the
//! last region still beats a loosely matching one from the first.

use once_cell::sync::Lazy;
use regex::Regex;

static LETTERS_THEN_FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z]{3}[0-9]{4}$"));
static LETTERS_THEN_THREE_DIGITS: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z]{3}[0-9]{3}$"));
static DIGITS_THEN_LETTERS: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{3}[A-Z]{3}$"));

const FALLBACK_MIN_LEN: usize = 4;
const FALLBACK_MAX_LEN: usize = 8;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("Failed to compile regex pattern: {}", e))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlateRule {
    /// `ABC1234`
    LettersThenFourDigits,
    /// `ABC123`
    LettersThenThreeDigits,
    /// `123ABC`
    DigitsThenLetters,
    /// anything 4 to 8 characters long
    Fallback,
}

impl PlateRule {
    pub const CASCADE: [PlateRule; 4] = [
        PlateRule::LettersThenFourDigits,
        PlateRule::LettersThenThreeDigits,
        PlateRule::DigitsThenLetters,
        PlateRule::Fallback,
    ];

    pub fn matches(self, candidate: &str) -> bool {
        match self {
            PlateRule::LettersThenFourDigits => LETTERS_THEN_FOUR_DIGITS.is_match(candidate),
            PlateRule::LettersThenThreeDigits => LETTERS_THEN_THREE_DIGITS.is_match(candidate),
            PlateRule::DigitsThenLetters => DIGITS_THEN_LETTERS.is_match(candidate),
            PlateRule::Fallback => {
                let len = candidate.chars().count();
                (FALLBACK_MIN_LEN..=FALLBACK_MAX_LEN).contains(&len)
            }
        }
    }
}

/// Returns the winning candidate together with the rule it satisfied.
pub fn select_with_rule<S: AsRef<str>>(candidates: &[S]) -> Option<(&str, PlateRule)> {
    PlateRule::CASCADE.iter().find_map(|rule| {
        candidates
            .iter()
            .map(|candidate| AsRef::<str>::as_ref(candidate))
            .find(|candidate| rule.matches(candidate))
            .map(|candidate| (candidate, *rule))
    })
}

/// The best plate guess, or an empty string when nothing qualifies.
pub fn select_best<S: AsRef<str>>(candidates: &[S]) -> String {
    select_with_rule(candidates)
        .map(|(candidate, _)| candidate.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::{compile, select_best, select_with_rule, PlateRule};

    #[test]
    fn higher_rule_wins_over_earlier_candidate() {
        assert_eq!(select_best(&["123ABC", "XYZ1234"]), "XYZ1234");
        assert_eq!(select_best(&["XYZ1234", "123ABC"]), "XYZ1234");
    }

    #[test]
    fn first_match_within_a_rule_wins() {
        assert_eq!(select_best(&["NOPE", "AAA111", "BBB222"]), "AAA111");
    }

    #[test]
    fn cascade_reports_the_rule() {
        assert_eq!(
            select_with_rule(&["12", "ABC123", "999ZZZ"]),
            Some(("ABC123", PlateRule::LettersThenThreeDigits))
        );
        assert_eq!(
            select_with_rule(&["HELLO", "999ZZZ"]),
            Some(("999ZZZ", PlateRule::DigitsThenLetters))
        );
    }

    #[test]
    fn fallback_takes_any_reasonable_length() {
        assert_eq!(select_best(&["12345"]), "12345");
        assert_eq!(select_best(&["ABC", "ABCD"]), "ABCD");
        assert_eq!(select_best(&["12345678"]), "12345678");
    }

    #[test]
    fn nothing_selected() {
        assert_eq!(select_best(&["AB", "TOOLONGSTRING"]), "");
        assert_eq!(select_best::<&str>(&[]), "");
    }

    #[test]
    fn patterns_are_anchored() {
        assert!(!PlateRule::LettersThenFourDigits.matches("ABC12345"));
        assert!(!PlateRule::LettersThenThreeDigits.matches("XABC123"));
        assert!(!PlateRule::DigitsThenLetters.matches("123abc"));
    }

    #[test]
    #[should_panic(expected = "Failed to compile regex pattern: regex parse error")]
    fn broken_pattern_reports_the_regex_error() {
        compile("[A-Z");
    }

    #[test]
    fn selection_is_repeatable() {
        let candidates = vec!["WORD".to_string(), "777QQQ".to_string(), "ABC123".to_string()];
        let first = select_best(&candidates);
        assert_eq!(first, "ABC123");
        assert_eq!(select_best(&candidates), first);
    }
}
