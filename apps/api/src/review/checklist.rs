//! Presence Checklist: local, deterministic section heuristics over résumé text.
//!
//! No LLM call. Each rule is evaluated independently against a lowercased copy
//! of the text, and the output order is fixed by `RULES`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub label: String,
    pub present: bool,
}

/// Ten consecutive ASCII digits, i.e. a bare phone number.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{10}").unwrap());

enum Matcher {
    AnyOf(&'static [&'static str]),
    Contact,
}

struct Rule {
    label: &'static str,
    matcher: Matcher,
}

const RULES: &[Rule] = &[
    Rule {
        label: "Contact Info",
        matcher: Matcher::Contact,
    },
    Rule {
        label: "LinkedIn",
        matcher: Matcher::AnyOf(&["linkedin.com"]),
    },
    Rule {
        label: "Education",
        matcher: Matcher::AnyOf(&["education", "university", "college"]),
    },
    Rule {
        label: "Experience",
        matcher: Matcher::AnyOf(&["experience", "employment", "work history"]),
    },
    Rule {
        label: "Skills",
        matcher: Matcher::AnyOf(&["skills", "technologies"]),
    },
];

impl Matcher {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Matcher::AnyOf(needles) => needles.iter().any(|n| lower.contains(n)),
            Matcher::Contact => lower.contains('@') || PHONE_RE.is_match(lower),
        }
    }
}

/// Evaluates every rule against `text` and returns one item per rule, in rule order.
pub fn build_presence_checklist(text: &str) -> Vec<ChecklistItem> {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .map(|rule| ChecklistItem {
            label: rule.label.to_string(),
            present: rule.matcher.matches(&lower),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [&str; 5] = ["Contact Info", "LinkedIn", "Education", "Experience", "Skills"];

    fn present(text: &str, label: &str) -> bool {
        build_presence_checklist(text)
            .into_iter()
            .find(|i| i.label == label)
            .map(|i| i.present)
            .unwrap()
    }

    #[test]
    fn test_fixed_order_and_labels_for_empty_text() {
        let items = build_presence_checklist("");
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, LABELS);
        assert!(items.iter().all(|i| !i.present));
    }

    #[test]
    fn test_fixed_order_for_full_resume() {
        let text = "Jane Doe | jane@example.com | linkedin.com/in/jane\n\
                    EXPERIENCE\nAcme Corp\nEDUCATION\nState University\nSKILLS\nRust";
        let items = build_presence_checklist(text);
        let labels: Vec<_> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, LABELS);
        assert!(items.iter().all(|i| i.present));
    }

    #[test]
    fn test_contact_via_at_sign() {
        assert!(present("reach me @ home", "Contact Info"));
    }

    #[test]
    fn test_contact_via_ten_digits() {
        assert!(present("Phone: 5551234567", "Contact Info"));
        assert!(present("id 123456789012", "Contact Info"));
    }

    #[test]
    fn test_contact_absent_for_short_or_split_numbers() {
        assert!(!present("Phone: 555-123-4567", "Contact Info"));
        assert!(!present("123456789", "Contact Info"));
    }

    #[test]
    fn test_contact_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not a phone number for this heuristic.
        assert!(!present("٠١٢٣٤٥٦٧٨٩", "Contact Info"));
    }

    #[test]
    fn test_linkedin_case_insensitive() {
        assert!(present("LINKEDIN.COM/in/jane", "LinkedIn"));
        assert_eq!(
            present("LINKEDIN.COM", "LinkedIn"),
            present("linkedin.com", "LinkedIn")
        );
        assert!(!present("LinkedIn profile available", "LinkedIn"));
    }

    #[test]
    fn test_education_keywords() {
        assert!(present("Community College of Denver", "Education"));
        assert!(present("University of Somewhere", "Education"));
        assert!(!present("Self-taught", "Education"));
    }

    #[test]
    fn test_experience_keywords() {
        assert!(present("Employment: Acme", "Experience"));
        assert!(present("WORK HISTORY", "Experience"));
        assert!(!present("work\nhistory", "Experience"));
    }

    #[test]
    fn test_skills_keywords() {
        assert!(present("Technologies: Rust, Go", "Skills"));
        assert!(!present("Skill: Rust", "Skills"));
    }

    #[test]
    fn test_rules_are_independent() {
        let items = build_presence_checklist("skills only");
        let flags: Vec<_> = items.iter().map(|i| i.present).collect();
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let text = String::from("LinkedIn.com EDUCATION");
        let _ = build_presence_checklist(&text);
        assert_eq!(text, "LinkedIn.com EDUCATION");
    }
}
