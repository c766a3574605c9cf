//! Lead extraction
//!
//! Scans the user turns of a conversation for an Indian mobile number and a
//! self-introduced name. Only the first match for each field counts; later
//! turns never overwrite an earlier find.

use once_cell::sync::Lazy;
use regex::Regex;

use farm_chat_core::{LeadInfo, Turn};

/// Optional +91 / 91 prefix, then ten digits starting 6-9
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+?91[-\s]?)?[6-9]\d{9}").expect("Invalid regex"));

/// First tokens that introduce a name
const NAME_CUES: &[&str] = &["my", "name", "i'm", "i", "am"];

/// Tokens after the cue kept as the candidate name
const MAX_NAME_TOKENS: usize = 3;

/// Heuristic name and phone extractor
#[derive(Debug, Clone, Default)]
pub struct LeadExtractor;

impl LeadExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract lead details from the full conversation
    pub fn extract(&self, turns: &[Turn]) -> LeadInfo {
        let mut info = LeadInfo::default();

        for turn in turns.iter().filter(|t| t.is_user()) {
            if info.phone.is_none() {
                info.phone = self.extract_phone(&turn.content);
            }
            if info.name.is_none() {
                info.name = self.extract_name(&turn.content);
            }
            if info.phone.is_some() && info.name.is_some() {
                break;
            }
        }

        info
    }

    /// First phone-shaped substring, verbatim
    pub fn extract_phone(&self, text: &str) -> Option<String> {
        PHONE_PATTERN.find(text).map(|m| m.as_str().to_string())
    }

    /// Name candidate from a message that opens with a cue word.
    ///
    /// The candidate is taken as-is, cue filler included: "My name is Ravi
    /// Kumar" yields "name is Ravi".
    pub fn extract_name(&self, text: &str) -> Option<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }

        let cue = words[0].to_lowercase();
        if !NAME_CUES.contains(&cue.as_str()) {
            return None;
        }

        let end = words.len().min(1 + MAX_NAME_TOKENS);
        let candidate = words[1..end].join(" ");

        if candidate.chars().count() <= 2 || candidate.chars().any(is_digit) {
            return None;
        }

        let name = candidate.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'));
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }
}

/// Digit-valued characters. Fractions and letter-like numerals such as
/// "½" or "Ⅻ" carry a numeric value but are not digits.
fn is_digit(c: char) -> bool {
    c.is_numeric()
        && !matches!(
            c,
            '\u{00BC}'..='\u{00BE}'
                | '\u{2150}'..='\u{218F}'
                | '\u{3007}'
                | '\u{3021}'..='\u{3029}'
                | '\u{3038}'..='\u{303A}'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(messages: &[&str]) -> LeadInfo {
        let turns: Vec<Turn> = messages.iter().map(|m| Turn::user(*m)).collect();
        LeadExtractor::new().extract(&turns)
    }

    #[test]
    fn test_phone_and_name_in_one_message() {
        let info = extract(&["My name is Ravi Kumar, call me at 9876543210"]);
        assert_eq!(info.phone.as_deref(), Some("9876543210"));
        assert_eq!(info.name.as_deref(), Some("name is Ravi"));
        assert!(info.is_captured());
    }

    #[test]
    fn test_name_cue_with_trailing_comma() {
        let info = extract(&["I am John Doe, my number is 9123456789"]);
        assert_eq!(info.name.as_deref(), Some("am John Doe"));
        assert_eq!(info.phone.as_deref(), Some("9123456789"));
    }

    #[test]
    fn test_phone_prefixes_kept_verbatim() {
        let extractor = LeadExtractor::new();
        assert_eq!(
            extractor.extract_phone("reach me on +91 9876543210 today").as_deref(),
            Some("+91 9876543210")
        );
        assert_eq!(
            extractor.extract_phone("91-8123456789").as_deref(),
            Some("91-8123456789")
        );
        assert_eq!(extractor.extract_phone("5123456789"), None);
        assert_eq!(extractor.extract_phone("98765"), None);
    }

    #[test]
    fn test_first_phone_wins_across_turns() {
        let info = extract(&["call 9876543210", "actually use 9123456789"]);
        assert_eq!(info.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_assistant_turns_ignored() {
        let turns = vec![
            Turn::assistant("My name is Bot, dial 9876543210"),
            Turn::user("hello"),
        ];
        let info = LeadExtractor::new().extract(&turns);
        assert_eq!(info, LeadInfo::default());
    }

    #[test]
    fn test_name_requires_cue_first() {
        let extractor = LeadExtractor::new();
        assert_eq!(extractor.extract_name("Hello my name is Asha"), None);
        assert_eq!(extractor.extract_name("my"), None);
        assert_eq!(extractor.extract_name("MY Asha."), Some("Asha".to_string()));
    }

    #[test]
    fn test_name_rejects_short_or_numeric() {
        let extractor = LeadExtractor::new();
        assert_eq!(extractor.extract_name("i am"), None);
        assert_eq!(extractor.extract_name("I'm 42 years old"), None);
        assert_eq!(extractor.extract_name("i ok"), None);
        assert_eq!(extractor.extract_name("Am Raj!!"), Some("Raj".to_string()));
    }

    #[test]
    fn test_name_strips_punctuation_at_both_ends() {
        let extractor = LeadExtractor::new();
        assert_eq!(extractor.extract_name("I ...Ravi"), Some("Ravi".to_string()));
        assert_eq!(extractor.extract_name("i ...!?"), None);
    }

    #[test]
    fn test_punctuation_only_name_does_not_block_later_turn() {
        let info = extract(&["I ...", "my name is Ravi"]);
        assert_eq!(info.name.as_deref(), Some("name is Ravi"));
    }

    #[test]
    fn test_fractions_and_numerals_are_not_digits() {
        let extractor = LeadExtractor::new();
        assert_eq!(extractor.extract_name("i am ½ done"), Some("am ½ done".to_string()));
        assert_eq!(extractor.extract_name("I'm Louis Ⅻ"), Some("Louis Ⅻ".to_string()));
        assert_eq!(extractor.extract_name("I'm agent ٣"), None);
        assert_eq!(extractor.extract_name("my room ²B"), None);
    }

    #[test]
    fn test_name_from_later_turn() {
        let info = extract(&["what is the price?", "I'm Meera Nair from Pune"]);
        assert_eq!(info.name.as_deref(), Some("Meera Nair from"));
        assert!(!info.is_captured());
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(LeadExtractor::new().extract(&[]), LeadInfo::default());
    }
}
