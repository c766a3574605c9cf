//! Reply templates
//!
//! One canned reply per intent label. Facts come from the knowledge base;
//! nothing depends on the message text or the session history, so the same
//! label always renders the same string for a given knowledge base.

use std::fmt::Write as _;

use farm_chat_config::KnowledgeBase;
use farm_chat_core::IntentLabel;

/// Render the reply for an intent
pub fn render(intent: IntentLabel, kb: &KnowledgeBase) -> String {
    match intent {
        IntentLabel::Greeting => greeting(),
        IntentLabel::AboutNeralu => about(kb),
        IntentLabel::ManagedFarmland => managed_farmland(kb),
        IntentLabel::Plantations => plantations(kb),
        IntentLabel::Projects => projects(kb),
        IntentLabel::Benefits => benefits(kb),
        IntentLabel::Amenities => amenities(kb),
        IntentLabel::Pricing => pricing(kb),
        IntentLabel::SiteVisit => site_visit(kb),
        IntentLabel::Booking => booking(),
        IntentLabel::Legal => legal(kb),
        IntentLabel::Contact => contact(),
        IntentLabel::General => general(kb),
    }
}

fn bullets(items: &[String], marker: &str) -> String {
    items
        .iter()
        .map(|item| format!("{} {}", marker, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn greeting() -> String {
    "Hello! 🌿 Welcome to Neralu Farms. I'm here to help you explore our managed farmland opportunities. \n\n\
     How can I assist you today? You can ask me about:\n\
     • Our managed farmland concept\n\
     • Available projects and plantations\n\
     • Investment benefits and returns\n\
     • Booking a site visit\n\n\
     What interests you most?"
        .to_string()
}

fn about(kb: &KnowledgeBase) -> String {
    format!(
        "Neralu Farms (also called Neralu Managed Farms) offers premium managed farmland where you own beautiful agricultural land while we handle everything else! 🌳\n\n\
         **Our Mission:** {}\n\n\
         **What makes us special:**\n\
         • You own the land with clear legal titles\n\
         • We manage plantation, maintenance & harvesting\n\
         • Enjoy lifestyle amenities + long-term returns\n\
         • Sustainable, nature-focused investment\n\n\
         Would you like to know more about our projects or how managed farmland works?",
        kb.brand_info.mission
    )
}

fn managed_farmland(kb: &KnowledgeBase) -> String {
    format!(
        "Great question! Let me explain how Neralu's managed farmland works: 🌾\n\n\
         **The Concept:**\n{}\n\n\
         **Ownership Model:**\n{}\n\n\
         **Key Benefits:**\n{}\n\n\
         It's perfect for those who want farmland ownership without the hassle of daily management!\n\n\
         Would you like to know about our plantation options or current projects?",
        kb.concept.managed_farmland,
        kb.concept.ownership_model,
        bullets(&kb.concept.benefits, "✓")
    )
}

fn plantations(kb: &KnowledgeBase) -> String {
    let mut out = String::from("We offer diverse plantation options at Neralu Farms! 🌱\n\n**Available Plantations:**\n\n");
    for plantation in &kb.plantations {
        let _ = write!(
            out,
            "{} **{}:** {}\n\n",
            plantation.emoji, plantation.name, plantation.description
        );
    }
    out.push_str(
        "Each plantation is professionally managed with optimal care for maximum yields. \
         Which plantation interests you most?",
    );
    out
}

fn projects(kb: &KnowledgeBase) -> String {
    let count = match kb.projects.len() {
        1 => "one exciting project".to_string(),
        2 => "two exciting projects".to_string(),
        n => format!("{} exciting projects", n),
    };

    let mut out = format!("We have {} available! 🏞️\n\n", count);
    for (i, project) in kb.projects.iter().enumerate() {
        let _ = write!(
            out,
            "**{}. {}**\nLocation: {}\nHighlights: {}\n\n",
            i + 1,
            project.name,
            project.location,
            project.features.join(", ")
        );
    }

    let closing = if kb.projects.len() == 2 {
        "Both projects are"
    } else {
        "Our projects are"
    };
    let _ = write!(
        out,
        "{} thoughtfully planned with excellent connectivity and premium amenities. \
         Would you like detailed information about either project?",
        closing
    );
    out
}

fn benefits(kb: &KnowledgeBase) -> String {
    format!(
        "Investing in Neralu Farms offers multiple advantages! 💰🌿\n\n\
         **Financial Benefits:**\n\
         • Passive income from plantation yields\n\
         • Land appreciation over 5-15 years\n\
         • Tax benefits on agricultural land\n\
         • Diversification of investment portfolio\n\n\
         **Lifestyle Benefits:**\n\
         • Your own weekend farmhouse getaway\n\
         • Fresh organic produce\n\
         • Connect with nature\n\
         • Community of like-minded investors\n\n\
         **Peace of Mind:**\n\
         • Professional management included\n\
         • Clear legal documentation\n\
         • Sustainable & eco-friendly\n\
         • Long-term wealth creation\n\n\
         {}\n\n\
         Would you like to discuss investment timelines or book a site visit?",
        kb.investment.returns
    )
}

fn amenities(kb: &KnowledgeBase) -> String {
    format!(
        "Neralu Farms comes with excellent infrastructure and lifestyle amenities! 🏡\n\n\
         **Infrastructure:**\n{}\n\n\
         **Lifestyle Amenities:**\n{}\n\n\
         **Maintenance:**\n{}\n\n\
         Everything is designed for your convenience and comfort. Would you like to see this in person with a site visit?",
        bullets(&kb.amenities.infrastructure, "✓"),
        bullets(&kb.amenities.lifestyle, "✓"),
        kb.amenities.maintenance
    )
}

fn pricing(kb: &KnowledgeBase) -> String {
    format!(
        "I'd be happy to discuss pricing with you! 💼\n\n\
         Our farmland pricing varies based on:\n\
         • Project location ({})\n\
         • Plot size and layout\n\
         • Plantation type chosen\n\
         • Current offers and payment plans\n\n\
         For the most accurate and up-to-date pricing, I recommend:\n\
         1. **Booking a site visit** - See the property and get detailed pricing\n\
         2. **Speaking with our sales team** - They can share current rates and special offers\n\n\
         We also offer flexible payment plans to make your investment easier.\n\n\
         Would you like me to help you schedule a site visit or connect you with our team?",
        kb.project_short_names().join(" or ")
    )
}

fn site_visit(kb: &KnowledgeBase) -> String {
    let mut choices = kb.project_short_names();
    if choices.len() > 1 {
        choices.push("Both");
    }

    format!(
        "Wonderful! A site visit is the best way to experience Neralu Farms! 🚗\n\n\
         During your visit, you'll:\n\
         ✓ Tour the actual farmland\n\
         ✓ See infrastructure and amenities\n\
         ✓ Meet our farm management team\n\
         ✓ Understand plantation options\n\
         ✓ Get detailed pricing and documentation\n\
         ✓ See sample farmhouses (if available)\n\n\
         **To book your site visit, I'll need:**\n\
         • Your name\n\
         • Phone number\n\
         • Preferred project ({})\n\
         • Preferred date/time\n\n\
         Would you like to share these details now so I can arrange your visit?",
        choices.join(" / ")
    )
}

fn booking() -> String {
    "That's exciting! Thank you for your interest in Neralu Farms! 🎉\n\n\
     Here's how the booking process works:\n\n\
     **Step 1:** Site Visit (if not done already)\n\
     **Step 2:** Select your preferred project and plot\n\
     **Step 3:** Documentation and verification\n\
     **Step 4:** Payment plan discussion\n\
     **Step 5:** Agreement signing and registration\n\
     **Step 6:** Plantation begins!\n\n\
     To get started, I can:\n\
     1. Schedule a site visit for you\n\
     2. Connect you with our sales team\n\
     3. Share project brochures and details\n\n\
     May I have your name and phone number to help you proceed?"
        .to_string()
}

fn legal(kb: &KnowledgeBase) -> String {
    format!(
        "Legal clarity is a priority at Neralu! 📄\n\n\
         **Legal Aspects:**\n{}\n\n\
         **What you get:**\n\
         ✓ Clear and marketable title\n\
         ✓ Sale deed in your name\n\
         ✓ All necessary government approvals\n\
         ✓ Transparent documentation\n\
         ✓ Legal due diligence support\n\n\
         We believe in complete transparency and legal compliance. \
         Our team can walk you through all documentation during your site visit.\n\n\
         Would you like to schedule a visit or speak with our legal team?",
        kb.investment.legal
    )
}

fn contact() -> String {
    "I'm here to help, but for detailed assistance, here's how you can reach Neralu Farms: 📞\n\n\
     **Contact Options:**\n\
     • I can collect your details and have our team call you\n\
     • You can request a site visit and meet the team in person\n\
     • For immediate queries, share your question and I'll do my best to help\n\n\
     Would you like me to have our team contact you? If yes, please share:\n\
     • Your name\n\
     • Phone number\n\
     • Best time to call"
        .to_string()
}

fn general(kb: &KnowledgeBase) -> String {
    format!(
        "I'm here to help you with information about Neralu Farms! 🌿\n\n\
         I can assist you with:\n\
         • Understanding managed farmland concept\n\
         • Details about our projects ({})\n\
         • Plantation options ({})\n\
         • Investment benefits and returns\n\
         • Amenities and infrastructure\n\
         • Booking site visits\n\
         • Legal and documentation info\n\n\
         What would you like to know more about?",
        kb.project_short_names().join(" & "),
        kb.plantation_names().join(", ")
    )
}
