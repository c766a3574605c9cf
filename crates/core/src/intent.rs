//! Intent labels

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Classified purpose of a visitor message.
///
/// The label set is fixed. `General` is the sentinel returned when no
/// keyword matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    Greeting,
    AboutNeralu,
    ManagedFarmland,
    Plantations,
    Projects,
    Benefits,
    Amenities,
    Pricing,
    SiteVisit,
    Booking,
    Legal,
    Contact,
    #[default]
    General,
}

impl IntentLabel {
    /// Every label in declaration order, sentinel last
    pub const ALL: [IntentLabel; 13] = [
        IntentLabel::Greeting,
        IntentLabel::AboutNeralu,
        IntentLabel::ManagedFarmland,
        IntentLabel::Plantations,
        IntentLabel::Projects,
        IntentLabel::Benefits,
        IntentLabel::Amenities,
        IntentLabel::Pricing,
        IntentLabel::SiteVisit,
        IntentLabel::Booking,
        IntentLabel::Legal,
        IntentLabel::Contact,
        IntentLabel::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Greeting => "greeting",
            IntentLabel::AboutNeralu => "about_neralu",
            IntentLabel::ManagedFarmland => "managed_farmland",
            IntentLabel::Plantations => "plantations",
            IntentLabel::Projects => "projects",
            IntentLabel::Benefits => "benefits",
            IntentLabel::Amenities => "amenities",
            IntentLabel::Pricing => "pricing",
            IntentLabel::SiteVisit => "site_visit",
            IntentLabel::Booking => "booking",
            IntentLabel::Legal => "legal",
            IntentLabel::Contact => "contact",
            IntentLabel::General => "general",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, IntentLabel::General)
    }
}

impl std::fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown intent label: {0}")]
pub struct ParseIntentError(pub String);

impl FromStr for IntentLabel {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        IntentLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == needle)
            .ok_or_else(|| ParseIntentError(s.to_string()))
    }
}
