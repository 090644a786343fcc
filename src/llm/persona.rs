//! Interview categories and the persona each one runs.
//!
//! [`InterviewType`] is the closed set of categories offered by the CLI plus
//! a `General` fallback.  `persona()` is a total `match`, so adding a
//! category without a persona fails to compile.

use std::fmt;

/// Rules appended to every persona.
const COMMON_INSTRUCTIONS: &str = "\
IMPORTANT INSTRUCTIONS:
- Keep your responses spoken-friendly and concise (under 3 sentences usually).
- Ask ONE question at a time.
- Start with an approachable warm-up question, then raise the difficulty step by step as the candidate shows competence.
- Start by introducing yourself and simulating the interview start.";

const GENERAL: &str = "You are a professional mock interviewer.";

const PRODUCT_DESIGN: &str = "\
You are an expert Product Manager Interviewer at a top tech company (like Google, Meta).
You are conducting a 'Product Design' mock interview.

Your Goal:
1. Ask a relevant Product Design case study question (e.g., \"Design X for Y\").
2. Simulate a real conversation. Do NOT dump a long list of follow-ups at once.
3. Ask ONE conceptual or clarifying question at a time.
4. Be encouraging but professional.";

const ENGINEERING: &str = "\
You are a Senior Staff Engineer at a top tech company.
You are conducting a technical 'Engineering' interview.

Your Goal:
1. Ask a coding or algorithmic conceptual question (verbal only, e.g., \"How would you design a rate limiter?\" or \"Explain the trade-offs of using a Linked List vs Array\").
2. Focus on data structures, algorithms, and trade-offs.
3. Probe the candidate on edge cases and complexity (Big O).
4. Keep responses concise.";

const SYSTEM_DESIGN: &str = "\
You are a Principal Architect.
You are conducting a 'System Design' interview.

Your Goal:
1. Ask a system design question (e.g., \"Design Twitter\" or \"Design a URL shortener\").
2. Focus on scalability, availability, reliability, and technology choices.
3. Drive the conversation from high-level requirements to low-level details.";

const BEHAVIORAL: &str = "\
You are a Hiring Manager.
You are conducting a 'Behavioral' interview.

Your Goal:
1. Ask standard behavioral questions using the STAR method (e.g., \"Tell me about a time you failed\").
2. Dig into specific actions and results.
3. Evaluate culture fit and soft skills.";

const STRATEGY: &str = "\
You are a Strategy Lead.
You are conducting a 'Product Strategy' interview.

Your Goal:
1. Ask a strategy question (e.g., \"Should Google enter the ride-sharing market?\").
2. Focus on market sizing, competition, and business viability.";

// ---------------------------------------------------------------------------
// InterviewType
// ---------------------------------------------------------------------------

/// Interview category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterviewType {
    ProductDesign,
    Engineering,
    SystemDesign,
    Behavioral,
    Strategy,
    /// Anything not in the list above.
    #[default]
    General,
}

impl InterviewType {
    /// Categories offered in the interactive menu, in display order.
    pub const CHOICES: [InterviewType; 5] = [
        InterviewType::ProductDesign,
        InterviewType::Engineering,
        InterviewType::SystemDesign,
        InterviewType::Behavioral,
        InterviewType::Strategy,
    ];

    /// Parse a user-supplied label.  Case, spaces, `-` and `_` are ignored;
    /// anything unrecognized maps to [`InterviewType::General`].
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "productdesign" | "product" => InterviewType::ProductDesign,
            "engineering" | "coding" => InterviewType::Engineering,
            "systemdesign" | "system" => InterviewType::SystemDesign,
            "behavioral" | "behavioural" => InterviewType::Behavioral,
            "strategy" | "productstrategy" => InterviewType::Strategy,
            _ => InterviewType::General,
        }
    }

    /// Human-readable name, also stored as the transcript `type`.
    pub fn label(&self) -> &'static str {
        match self {
            InterviewType::ProductDesign => "Product Design",
            InterviewType::Engineering => "Engineering",
            InterviewType::SystemDesign => "System Design",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Strategy => "Strategy",
            InterviewType::General => "General",
        }
    }

    /// File-name friendly form of [`label`](Self::label).
    pub fn slug(&self) -> &'static str {
        match self {
            InterviewType::ProductDesign => "product_design",
            InterviewType::Engineering => "engineering",
            InterviewType::SystemDesign => "system_design",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Strategy => "strategy",
            InterviewType::General => "general",
        }
    }

    /// Category-specific persona text.
    pub fn persona(&self) -> &'static str {
        match self {
            InterviewType::ProductDesign => PRODUCT_DESIGN,
            InterviewType::Engineering => ENGINEERING,
            InterviewType::SystemDesign => SYSTEM_DESIGN,
            InterviewType::Behavioral => BEHAVIORAL,
            InterviewType::Strategy => STRATEGY,
            InterviewType::General => GENERAL,
        }
    }

    /// Full hidden instruction: persona followed by the shared rules.
    pub fn system_prompt(&self) -> String {
        format!("{}\n\n{COMMON_INSTRUCTIONS}", self.persona())
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_label() {
        for kind in InterviewType::CHOICES {
            assert_eq!(InterviewType::from_label(kind.label()), kind);
            assert_eq!(InterviewType::from_label(kind.slug()), kind);
        }
    }

    #[test]
    fn from_label_is_lenient() {
        assert_eq!(
            InterviewType::from_label("system-design"),
            InterviewType::SystemDesign
        );
        assert_eq!(
            InterviewType::from_label("PRODUCT DESIGN"),
            InterviewType::ProductDesign
        );
        assert_eq!(
            InterviewType::from_label("behavioural"),
            InterviewType::Behavioral
        );
    }

    #[test]
    fn unknown_label_falls_back_to_general() {
        assert_eq!(InterviewType::from_label("Sales"), InterviewType::General);
        assert_eq!(InterviewType::from_label(""), InterviewType::General);
        assert_eq!(InterviewType::default(), InterviewType::General);
    }

    #[test]
    fn general_is_not_offered_in_menu() {
        assert!(!InterviewType::CHOICES.contains(&InterviewType::General));
    }

    #[test]
    fn every_system_prompt_carries_shared_rules() {
        for kind in InterviewType::CHOICES
            .into_iter()
            .chain([InterviewType::General])
        {
            let prompt = kind.system_prompt();
            assert!(prompt.starts_with(kind.persona()));
            assert!(prompt.contains("Ask ONE question at a time."));
            assert!(prompt.contains("raise the difficulty"));
        }
    }

    #[test]
    fn personas_are_category_specific() {
        assert!(InterviewType::SystemDesign
            .persona()
            .contains("Principal Architect"));
        assert!(InterviewType::Behavioral.persona().contains("STAR"));
        assert_eq!(
            InterviewType::General.persona(),
            "You are a professional mock interviewer."
        );
    }

    #[test]
    fn slugs_are_file_name_safe() {
        for kind in InterviewType::CHOICES {
            assert!(kind
                .slug()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
