//! Update plans: ordered structural change requests against the suite.
//!
//! The wire format is a flat record per change, discriminated by `action`.
//! Fields a variant does not use are accepted and ignored on input, so a
//! producer may emit the full record with nulls in the unused slots.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// One structural change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChangeAction {
    /// Create an empty document; no-op if it already exists.
    CreateFeature { screen: String, feature: String },

    /// Remove the document (backed up first in commit mode).
    DeleteFeature { screen: String, feature: String },

    /// Append a scenario to an existing document. `new_value` may carry a
    /// step body, one clause per line; unrecognized lines are dropped.
    CreateScenario {
        screen: String,
        feature: String,
        scenario: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_value: Option<String>,
    },

    /// Remove the named scenario and its steps.
    DeleteScenario {
        screen: String,
        feature: String,
        scenario: String,
    },

    /// Replace one step's text. `step_index` is zero-based within the
    /// named scenario's step list; when absent or out of range the engine
    /// falls back to the first step containing `old_value`.
    UpdateStep {
        screen: String,
        feature: String,
        scenario: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step_index: Option<usize>,
        old_value: String,
        new_value: String,
    },
}

impl ChangeAction {
    /// Wire name of the variant.
    pub fn action_name(&self) -> &'static str {
        match self {
            ChangeAction::CreateFeature { .. } => "create_feature",
            ChangeAction::DeleteFeature { .. } => "delete_feature",
            ChangeAction::CreateScenario { .. } => "create_scenario",
            ChangeAction::DeleteScenario { .. } => "delete_scenario",
            ChangeAction::UpdateStep { .. } => "update_step",
        }
    }

    pub fn screen(&self) -> &str {
        match self {
            ChangeAction::CreateFeature { screen, .. }
            | ChangeAction::DeleteFeature { screen, .. }
            | ChangeAction::CreateScenario { screen, .. }
            | ChangeAction::DeleteScenario { screen, .. }
            | ChangeAction::UpdateStep { screen, .. } => screen,
        }
    }

    pub fn feature(&self) -> &str {
        match self {
            ChangeAction::CreateFeature { feature, .. }
            | ChangeAction::DeleteFeature { feature, .. }
            | ChangeAction::CreateScenario { feature, .. }
            | ChangeAction::DeleteScenario { feature, .. }
            | ChangeAction::UpdateStep { feature, .. } => feature,
        }
    }
}

/// An ordered sequence of change actions. Order matters: a plan may create
/// a feature and then populate it in the same pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub changes: Vec<ChangeAction>,
}

impl UpdatePlan {
    /// Parse a plan from its JSON wire format.
    ///
    /// Unknown actions and missing or mistyped required fields are
    /// malformed-plan errors, surfaced before any mutation.
    pub fn from_json(text: &str) -> Result<UpdatePlan, ValidationError> {
        serde_json::from_str(text).map_err(|error| ValidationError::Malformed(error.to_string()))
    }

    /// Parse a plan from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<UpdatePlan, ValidationError> {
        serde_json::from_value(value).map_err(|error| ValidationError::Malformed(error.to_string()))
    }
}
