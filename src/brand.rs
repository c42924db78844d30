//! The PROPER MARKET brand book and the prompt builders that merge it with
//! operator input. This is the single source of truth for guideline text;
//! every completion request is constructed here.

/// One target customer persona the operator can role-play against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed brand-standards document.
#[derive(Debug)]
pub struct BrandBook {
    pub brand_name: &'static str,
    pub slogan: &'static str,
    pub core_concept: &'static str,
    pub tone_and_manner: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub forbidden: &'static [&'static str],
    pub personas: &'static [Persona],
}

pub const BRAND_BOOK: BrandBook = BrandBook {
    brand_name: "PROPER MARKET",
    slogan: "Wellness for all",
    core_concept: "Online brand retail: an online Trader Joe's / ALDI",
    tone_and_manner: &[
        "Neo & modern",
        "Minimal",
        "Slight wit",
        "Not pushy",
        "Life-friendly",
    ],
    keywords: &[
        "PROPER made",
        "PROPER tasty",
        "PROPER club",
        "Routine",
        "Curation",
        "Trust",
    ],
    forbidden: &[
        "Price-driven discount messaging",
        "Too mass-market or childish",
        "Overbearing luxury",
        "Stock-photo feel",
    ],
    personas: &[
        Persona {
            name: "Working mom in her 30s",
            description: "Rational and exacting; short on time, wants curation done for her.",
        },
        Persona {
            name: "Self-care professional",
            description: "Health, beauty and confidence matter; prefers an Erewhon feel.",
        },
        Persona {
            name: "3pm office worker",
            description: "Looks for a guilt-free snack when the afternoon slump hits.",
        },
    ],
};

/// Look up a persona from the brand book by name.
pub fn find_persona(name: &str) -> Option<&'static Persona> {
    BRAND_BOOK.personas.iter().find(|p| p.name == name)
}

/// Build the copy-validation prompt: brand guidelines, the text under
/// review, and the three standing asks.
pub fn copy_check_prompt(subject: &str) -> String {
    format!(
        "You are the BX Guardian for '{brand}'.\n\
         We aim to be the online Trader Joe's, with the slogan '{slogan}'.\n\
         \n\
         [BX guidelines]\n\
         - Tone and manner: neo, modern, minimal, slight wit, never pushy.\n\
         - Never: too mass-market (childish), too luxury (alienating), or discount-driven.\n\
         - Core values: standards for everyday life, routine, curation, \"we picked it for you\".\n\
         \n\
         [Text to analyze]\n\
         \"{subject}\"\n\
         \n\
         [Asks]\n\
         1. Judge whether this text fits the PROPER MARKET tone and manner, \
         especially 'slight wit' and 'never pushy'.\n\
         2. Call it out if it reads like big-CPG corporate copy or like an \
         overly earnest co-op.\n\
         3. Suggest two improved versions in the 'PROPER made' style \
         (concise, emoji welcome).",
        brand = BRAND_BOOK.brand_name,
        slogan = BRAND_BOOK.slogan,
    )
}

/// Build the persona role-play prompt for a proposal.
pub fn persona_prompt(persona: &Persona, subject: &str) -> String {
    format!(
        "[Roleplay]\n\
         You are '{name}', a target customer of {brand}.\n\
         Your disposition: {description}\n\
         \n\
         We are '{brand}', an online Trader Joe's of sorts.\n\
         Someone on the team proposed the following idea, product, or copy. \
         Give your honest feedback from your own point of view.\n\
         \n\
         [Proposal]\n\
         \"{subject}\"\n\
         \n\
         Feedback guide:\n\
         1. Does it fit your lifestyle (your routine)?\n\
         2. Does it look too expensive, or too cheap?\n\
         3. Would you buy it?\n\
         \n\
         Answer naturally, in the voice of this persona.",
        name = persona.name,
        description = persona.description,
        brand = BRAND_BOOK.brand_name,
    )
}
