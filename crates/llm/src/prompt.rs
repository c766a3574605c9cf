//! Prompt Building
//!
//! Builds the system prompt for the external model from the knowledge base
//! and converts session turns into chat messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

use farm_chat_config::KnowledgeBase;
use farm_chat_core::{Turn, TurnRole};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Assistant => Role::Assistant,
        };
        Self {
            role,
            content: turn.content.clone(),
        }
    }
}

/// Builds model prompts for the sales assistant persona
pub struct PromptBuilder<'a> {
    kb: &'a KnowledgeBase,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(kb: &'a KnowledgeBase) -> Self {
        Self { kb }
    }

    /// System prompt describing the brand, offering and rules
    pub fn system_prompt(&self) -> String {
        let kb = self.kb;
        let brand = &kb.brand_info;
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "You are an AI assistant for {}, a premium managed farmland company.\n",
            brand.name
        );

        prompt.push_str("BRAND IDENTITY:\n");
        let _ = writeln!(prompt, "- {}", brand.tagline);
        let _ = writeln!(prompt, "- Values: {}", brand.values.join(", "));
        let _ = writeln!(prompt, "- Projects: {}", kb.project_short_names().join(" and "));
        let _ = writeln!(prompt, "- Plantations: {}\n", kb.plantation_names().join(", "));

        prompt.push_str(
            "YOUR RESPONSIBILITIES:\n\
             1. Provide accurate information about the company only\n\
             2. Help users understand the managed farmland concept\n\
             3. Guide prospects through the site visit booking process\n\
             4. Capture leads (name and phone number) naturally in conversation\n\
             5. Be warm, professional, and helpful\n\n\
             COMMUNICATION STYLE:\n\
             - Friendly but professional tone\n\
             - Short, clear responses (3-5 sentences preferred)\n\
             - Focus on benefits and lifestyle, not just features\n\
             - Ask clarifying questions when needed\n\n",
        );

        prompt.push_str("KEY INFORMATION:\n\nManaged Farmland Concept:\n");
        let _ = writeln!(prompt, "- {}", kb.concept.managed_farmland);
        let _ = writeln!(prompt, "- {}", kb.concept.ownership_model);
        for benefit in &kb.concept.benefits {
            let _ = writeln!(prompt, "- {}", benefit);
        }

        prompt.push_str("\nProjects:\n");
        for (i, project) in kb.projects.iter().enumerate() {
            let _ = writeln!(
                prompt,
                "{}. {}: {} ({})",
                i + 1,
                project.name,
                project.location,
                project.features.join(", ")
            );
        }

        prompt.push_str("\nPlantations:\n");
        for plantation in &kb.plantations {
            let _ = writeln!(prompt, "- {}: {}", plantation.name, plantation.description);
        }

        prompt.push_str("\nAmenities:\n");
        let _ = writeln!(prompt, "- {}", kb.amenities.infrastructure.join(", "));
        let _ = writeln!(prompt, "- {}", kb.amenities.lifestyle.join(", "));

        prompt.push_str("\nInvestment and Legal:\n");
        let _ = writeln!(prompt, "- {}", kb.investment.returns);
        let _ = writeln!(prompt, "- {}", kb.investment.timeline);
        let _ = writeln!(prompt, "- {}", kb.investment.legal);
        let _ = writeln!(prompt, "- {}\n", kb.investment.payment);

        prompt.push_str(
            "LEAD CAPTURE:\n\
             - Naturally ask for name and phone during conversation\n\
             - Good moment: when the user shows interest in a site visit or booking\n\n\
             RESTRICTIONS:\n\
             - Don't discuss competitors or compare with other brands\n\
             - Don't provide specific pricing (varies by project/size/time)\n\
             - Don't guarantee specific returns or appreciation rates\n\
             - Don't give investment advice (encourage consultation)\n\
             - Never fabricate information; offer to connect the user with the team instead",
        );

        prompt
    }

    /// System prompt followed by the last `window` turns of history
    pub fn build_messages(&self, history: &[Turn], window: usize) -> Vec<Message> {
        let start = history.len().saturating_sub(window);
        let mut messages = Vec::with_capacity(history.len() - start + 1);
        messages.push(Message::system(self.system_prompt()));
        messages.extend(history[start..].iter().map(Message::from));
        messages
    }
}
