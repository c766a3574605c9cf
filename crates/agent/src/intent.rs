//! Intent Classification
//!
//! Maps free text to one label by ordered substring matching. Labels are
//! tried in declaration order and each label's phrases in their own order;
//! the first label with any phrase contained in the lower-cased message
//! wins. Overlaps between labels are resolved by that order alone, so a
//! short phrase early in the table (e.g. "hi") shadows longer, more
//! specific phrases further down.

use farm_chat_core::IntentLabel;

/// Default keyword table in tie-break order
const DEFAULT_PATTERNS: &[(IntentLabel, &[&str])] = &[
    (
        IntentLabel::Greeting,
        &["hello", "hi", "hey", "good morning", "good evening", "namaste"],
    ),
    (
        IntentLabel::AboutNeralu,
        &[
            "who are you",
            "about neralu",
            "tell me about",
            "what is neralu",
            "about company",
        ],
    ),
    (
        IntentLabel::ManagedFarmland,
        &[
            "managed farmland",
            "what is managed",
            "how does it work",
            "ownership model",
        ],
    ),
    (
        IntentLabel::Plantations,
        &[
            "plantation",
            "mango",
            "coconut",
            "timber",
            "sandalwood",
            "crops",
            "what can i grow",
        ],
    ),
    (
        IntentLabel::Projects,
        &["projects", "locations", "where", "korlaparti", "sandal valley"],
    ),
    (
        IntentLabel::Benefits,
        &["benefits", "why invest", "returns", "advantages", "profit"],
    ),
    (
        IntentLabel::Amenities,
        &["amenities", "facilities", "infrastructure", "clubhouse"],
    ),
    (
        IntentLabel::Pricing,
        &["price", "cost", "how much", "rates", "payment"],
    ),
    (
        IntentLabel::SiteVisit,
        &["visit", "site visit", "can i visit", "show me", "tour"],
    ),
    (
        IntentLabel::Booking,
        &["book", "buy", "purchase", "interested", "want to invest"],
    ),
    (
        IntentLabel::Legal,
        &["legal", "documents", "title", "rera", "registration"],
    ),
    (
        IntentLabel::Contact,
        &["contact", "phone", "email", "reach you", "talk to someone"],
    ),
];

/// Keyword phrases associated with one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentPattern {
    pub label: IntentLabel,
    /// Lower-cased phrases, in match order
    pub phrases: Vec<String>,
}

impl IntentPattern {
    pub fn new<S: AsRef<str>>(label: IntentLabel, phrases: &[S]) -> Self {
        Self {
            label,
            phrases: phrases
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .collect(),
        }
    }

    fn first_match(&self, text: &str) -> Option<&str> {
        self.phrases
            .iter()
            .find(|p| text.contains(p.as_str()))
            .map(String::as_str)
    }
}

/// Classification result with the phrase that decided it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: IntentLabel,
    /// None when falling back to `General`
    pub matched_phrase: Option<String>,
}

/// Ordered keyword intent classifier
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    patterns: Vec<IntentPattern>,
}

impl IntentClassifier {
    /// Create a classifier with the default keyword table
    pub fn new() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .map(|(label, phrases)| IntentPattern::new(*label, *phrases))
                .collect(),
        }
    }

    /// Create a classifier with a custom ordered table
    pub fn with_patterns(patterns: Vec<IntentPattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[IntentPattern] {
        &self.patterns
    }

    /// Classify a message, reporting the matched phrase
    pub fn classify_detailed(&self, message: &str) -> Classification {
        let text = message.to_lowercase();

        for pattern in &self.patterns {
            if let Some(phrase) = pattern.first_match(&text) {
                return Classification {
                    label: pattern.label,
                    matched_phrase: Some(phrase.to_string()),
                };
            }
        }

        Classification {
            label: IntentLabel::General,
            matched_phrase: None,
        }
    }

    /// Classify a message; total over all inputs
    pub fn classify(&self, message: &str) -> IntentLabel {
        self.classify_detailed(message).label
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
