//! Action classification.
//!
//! An ordered list of cue sets; the first rule with any cue present in the
//! text decides the category. Rule order matters: `"favor, entregar informe"`
//! is `RespondNow` because rule 1 is checked before rule 4.

use crate::domain::ActionCategory;

/// One classification rule: any cue present selects `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub cues: &'static [&'static str],
    pub category: ActionCategory,
}

impl ActionRule {
    pub fn matches(&self, text: &str) -> bool {
        self.cues.iter().any(|cue| text.contains(*cue))
    }
}

/// Category used when no rule matches.
pub const DEFAULT_ACTION: ActionCategory = ActionCategory::CanWait;

/// Rules in evaluation order.
pub const ACTION_RULES: [ActionRule; 4] = [
    ActionRule {
        cues: &["urgente", "favor", "responder", "pendiente"],
        category: ActionCategory::RespondNow,
    },
    ActionRule {
        cues: &["delegar", "avisar a", "encargarse"],
        category: ActionCategory::Delegate,
    },
    ActionRule {
        cues: &["solo informar", "fyi", "adjunto informe", "revisión"],
        category: ActionCategory::CanWait,
    },
    ActionRule {
        cues: &["entregar informe", "realizar", "subir a plataforma"],
        category: ActionCategory::OwnTask,
    },
];

/// Classifies lower-cased text; total over all inputs.
pub fn classify_action(text: &str) -> ActionCategory {
    let text = text.to_lowercase();
    ACTION_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_ACTION)
}
