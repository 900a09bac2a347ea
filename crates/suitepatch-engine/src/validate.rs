//! Plan validation and the cosmetic-equivalence filter.
//!
//! Policy is pre-validate-then-apply: the entire plan is checked before any
//! mutation, so a plan mixing valid and invalid changes applies nothing.
//! (The alternative, failing fast during apply, would have applied the
//! valid prefix; the two are observably different and this choice is the
//! documented one.)

use crate::plan::{ChangeAction, UpdatePlan};

/// Errors that abort plan application before any mutation.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The plan JSON did not match the wire format: unknown action,
    /// missing required field, or mistyped value.
    #[error("malformed update plan: {0}")]
    Malformed(String),

    /// A required field was present but blank.
    #[error("{action}: field `{field}` must not be blank")]
    BlankField {
        action: &'static str,
        field: &'static str,
    },
}

/// Check every change in the plan before any of them is applied.
pub fn validate_plan(plan: &UpdatePlan) -> Result<(), ValidationError> {
    for change in &plan.changes {
        validate_change(change)?;
    }
    Ok(())
}

fn validate_change(change: &ChangeAction) -> Result<(), ValidationError> {
    let action = change.action_name();
    require(action, "screen", change.screen())?;
    require(action, "feature", change.feature())?;

    match change {
        ChangeAction::CreateFeature { .. } | ChangeAction::DeleteFeature { .. } => Ok(()),
        ChangeAction::CreateScenario { scenario, .. }
        | ChangeAction::DeleteScenario { scenario, .. } => require(action, "scenario", scenario),
        ChangeAction::UpdateStep {
            scenario,
            old_value,
            new_value,
            ..
        } => {
            require(action, "scenario", scenario)?;
            require(action, "old_value", old_value)?;
            require(action, "new_value", new_value)
        }
    }
}

fn require(
    action: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { action, field });
    }
    Ok(())
}

/// Word groups treated as interchangeable when comparing step text.
const SYNONYMS: &[&[&str]] = &[&["should", "must", "shall"], &["can", "may"]];

const TRAILING_PUNCTUATION: &[char] = &['.', '!', '?', ',', ';'];

/// Whether an update rewrites a step without changing its meaning.
///
/// Plan producers frequently paraphrase (case shifts, trailing
/// punctuation, modal synonyms) without semantic change. Such updates are
/// deliberate no-ops so they never generate zero-value diffs.
pub fn cosmetic_noop(old_value: &str, new_value: &str) -> bool {
    canonical_tokens(old_value) == canonical_tokens(new_value)
}

fn canonical_tokens(text: &str) -> Vec<String> {
    text.trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .split_whitespace()
        .map(|token| canonical_word(&token.to_lowercase()))
        .collect()
}

fn canonical_word(word: &str) -> String {
    for group in SYNONYMS {
        if group.contains(&word) {
            return group[0].to_string();
        }
    }
    word.to_string()
}
