//! Plan application: load, mutate in memory, then simulate or commit.
//!
//! One application runs `LOADED → MUTATING → {SIMULATED | COMMITTED}`.
//! There is no partial-commit state: commit reports the first filesystem
//! failure and leaves already-written files in their new state (each file
//! write is individually atomic, but there is no cross-file rollback).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use suitepatch_model::{FeatureDocument, Scenario, Step, feature_path, relative_path};

use crate::backup::{BackupError, snapshot_file};
use crate::diff::diff_report;
use crate::fsio::{FsError, write_text_atomic};
use crate::loader::load_documents;
use crate::lock::{DirLockGuard, LockError};
use crate::plan::{ChangeAction, UpdatePlan};
use crate::validate::{ValidationError, cosmetic_noop, validate_plan};

/// Whether a plan application previews or persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    Simulate,
    Commit,
}

impl ApplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyMode::Simulate => "simulate",
            ApplyMode::Commit => "commit",
        }
    }
}

/// Why one change in a plan was skipped instead of applied.
///
/// Resolution misses are never hard failures: a plan with some stale
/// references still applies its valid parts, and the skips are reported
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// No document exists at the canonical path for `(screen, feature)`.
    FeatureNotFound {
        action: String,
        screen: String,
        feature: String,
    },

    /// The document exists but has no scenario with this name.
    ScenarioNotFound {
        screen: String,
        feature: String,
        scenario: String,
    },

    /// `create_scenario` refused: the name is already taken in this
    /// document, and duplicates would make step addressing ambiguous.
    DuplicateScenario {
        screen: String,
        feature: String,
        scenario: String,
    },

    /// Neither the index nor the `old_value` substring located a step.
    StepUnresolved {
        screen: String,
        feature: String,
        scenario: String,
        step_index: Option<usize>,
        old_value: String,
    },

    /// The update only paraphrases the step; skipped as a deliberate no-op.
    CosmeticNoOp {
        screen: String,
        feature: String,
        scenario: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::FeatureNotFound {
                action,
                screen,
                feature,
            } => write!(f, "{action}: no document for {screen}/{feature}"),
            Diagnostic::ScenarioNotFound {
                screen,
                feature,
                scenario,
            } => write!(f, "scenario `{scenario}` not found in {screen}/{feature}"),
            Diagnostic::DuplicateScenario {
                screen,
                feature,
                scenario,
            } => write!(f, "scenario `{scenario}` already exists in {screen}/{feature}"),
            Diagnostic::StepUnresolved {
                screen,
                feature,
                scenario,
                step_index,
                old_value,
            } => match step_index {
                Some(index) => write!(
                    f,
                    "step {index} out of range and `{old_value}` not found in {screen}/{feature} scenario `{scenario}`"
                ),
                None => write!(
                    f,
                    "`{old_value}` not found in {screen}/{feature} scenario `{scenario}`"
                ),
            },
            Diagnostic::CosmeticNoOp {
                screen,
                feature,
                scenario,
            } => write!(
                f,
                "cosmetic rewrite skipped for {screen}/{feature} scenario `{scenario}`"
            ),
        }
    }
}

/// Outcome of one plan application.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub mode: ApplyMode,
    /// Post-state document text keyed by base-relative path.
    pub files: BTreeMap<String, String>,
    /// Unified diff lines per changed file, keyed by base-relative path.
    pub diffs: BTreeMap<String, Vec<String>>,
    /// Changes skipped with a reason, in plan order.
    pub diagnostics: Vec<Diagnostic>,
    /// Commit mode: base-relative paths written.
    pub written: Vec<String>,
    /// Commit mode: base-relative paths removed.
    pub removed: Vec<String>,
    /// Commit mode: base-relative backup paths taken before mutation.
    pub backups: Vec<String>,
}

/// Errors fatal to a whole plan application.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },
}

/// One plan application's in-memory view of the document tree.
struct WorkingSet {
    /// Content as loaded from disk, keyed by canonical path.
    pre: BTreeMap<PathBuf, String>,
    /// Mutable documents; a key removed here is a deleted document.
    docs: BTreeMap<PathBuf, FeatureDocument>,
}

impl WorkingSet {
    fn load(base_dir: &Path) -> Result<Self, FsError> {
        let mut pre = BTreeMap::new();
        let mut docs = BTreeMap::new();
        for loaded in load_documents(base_dir)? {
            pre.insert(loaded.path.clone(), loaded.text);
            docs.insert(loaded.path, loaded.document);
        }
        Ok(Self { pre, docs })
    }
}

/// Applies update plans against one base directory.
///
/// The base directory is an explicit value threaded into every call;
/// there is no process-wide current-directory state. Documents are loaded
/// fresh for each application.
#[derive(Debug, Clone)]
pub struct PatchEngine {
    base_dir: PathBuf,
}

impl PatchEngine {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Apply the plan in memory only and report what would change.
    pub fn simulate(&self, plan: &UpdatePlan) -> Result<ApplyReport, PatchError> {
        self.apply(plan, ApplyMode::Simulate)
    }

    /// Apply the plan and persist the result under the directory lock.
    pub fn commit(&self, plan: &UpdatePlan) -> Result<ApplyReport, PatchError> {
        self.apply(plan, ApplyMode::Commit)
    }

    pub fn apply(&self, plan: &UpdatePlan, mode: ApplyMode) -> Result<ApplyReport, PatchError> {
        validate_plan(plan)?;

        let mut set = WorkingSet::load(&self.base_dir)?;
        let mut diagnostics = Vec::new();
        for change in &plan.changes {
            self.apply_change(&mut set, change, &mut diagnostics);
        }

        let files: BTreeMap<String, String> = set
            .docs
            .iter()
            .map(|(path, doc)| (relative_path(&self.base_dir, path), doc.to_text()))
            .collect();
        let pre_relative: BTreeMap<String, String> = set
            .pre
            .iter()
            .map(|(path, text)| (relative_path(&self.base_dir, path), text.clone()))
            .collect();

        let mut report = ApplyReport {
            mode,
            diffs: diff_report(&pre_relative, &files),
            files,
            diagnostics,
            written: Vec::new(),
            removed: Vec::new(),
            backups: Vec::new(),
        };

        if mode == ApplyMode::Commit {
            self.persist(&set, &mut report)?;
        }
        Ok(report)
    }

    fn apply_change(
        &self,
        set: &mut WorkingSet,
        change: &ChangeAction,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let path = feature_path(&self.base_dir, change.screen(), change.feature());

        match change {
            ChangeAction::CreateFeature { feature, .. } => {
                set.docs
                    .entry(path)
                    .or_insert_with(|| FeatureDocument::new(feature.clone()));
            }

            ChangeAction::DeleteFeature { screen, feature } => {
                if set.docs.remove(&path).is_none() {
                    diagnostics.push(Diagnostic::FeatureNotFound {
                        action: change.action_name().to_string(),
                        screen: screen.clone(),
                        feature: feature.clone(),
                    });
                }
            }

            ChangeAction::CreateScenario {
                screen,
                feature,
                scenario,
                new_value,
            } => {
                let Some(doc) = set.docs.get_mut(&path) else {
                    diagnostics.push(Diagnostic::FeatureNotFound {
                        action: change.action_name().to_string(),
                        screen: screen.clone(),
                        feature: feature.clone(),
                    });
                    return;
                };
                if doc.scenario(scenario).is_some() {
                    diagnostics.push(Diagnostic::DuplicateScenario {
                        screen: screen.clone(),
                        feature: feature.clone(),
                        scenario: scenario.clone(),
                    });
                    return;
                }
                let steps = new_value.as_deref().map(steps_from_body).unwrap_or_default();
                doc.scenarios.push(Scenario {
                    name: scenario.clone(),
                    steps,
                });
            }

            ChangeAction::DeleteScenario {
                screen,
                feature,
                scenario,
            } => {
                let Some(doc) = set.docs.get_mut(&path) else {
                    diagnostics.push(Diagnostic::FeatureNotFound {
                        action: change.action_name().to_string(),
                        screen: screen.clone(),
                        feature: feature.clone(),
                    });
                    return;
                };
                let before = doc.scenarios.len();
                doc.scenarios.retain(|candidate| candidate.name != *scenario);
                if doc.scenarios.len() == before {
                    diagnostics.push(Diagnostic::ScenarioNotFound {
                        screen: screen.clone(),
                        feature: feature.clone(),
                        scenario: scenario.clone(),
                    });
                }
            }

            ChangeAction::UpdateStep {
                screen,
                feature,
                scenario,
                step_index,
                old_value,
                new_value,
            } => {
                if cosmetic_noop(old_value, new_value) {
                    diagnostics.push(Diagnostic::CosmeticNoOp {
                        screen: screen.clone(),
                        feature: feature.clone(),
                        scenario: scenario.clone(),
                    });
                    return;
                }
                let Some(doc) = set.docs.get_mut(&path) else {
                    diagnostics.push(Diagnostic::FeatureNotFound {
                        action: change.action_name().to_string(),
                        screen: screen.clone(),
                        feature: feature.clone(),
                    });
                    return;
                };
                let Some(target) = doc.scenario_mut(scenario) else {
                    diagnostics.push(Diagnostic::ScenarioNotFound {
                        screen: screen.clone(),
                        feature: feature.clone(),
                        scenario: scenario.clone(),
                    });
                    return;
                };
                match resolve_step(target, *step_index, old_value) {
                    Some(position) => {
                        target.steps[position] = Step {
                            text: new_value.trim().to_string(),
                        };
                    }
                    None => diagnostics.push(Diagnostic::StepUnresolved {
                        screen: screen.clone(),
                        feature: feature.clone(),
                        scenario: scenario.clone(),
                        step_index: *step_index,
                        old_value: old_value.clone(),
                    }),
                }
            }
        }
    }

    fn persist(&self, set: &WorkingSet, report: &mut ApplyReport) -> Result<(), PatchError> {
        let _guard = DirLockGuard::acquire(&self.base_dir)?;

        for (path, doc) in &set.docs {
            let text = doc.to_text();
            if set.pre.get(path) == Some(&text) {
                continue;
            }
            // snapshot_file checks the disk, not the pre map, so a file
            // that exists but failed to parse is still backed up before
            // being replaced.
            if let Some(backup_path) = snapshot_file(path)? {
                report
                    .backups
                    .push(relative_path(&self.base_dir, &backup_path));
            }
            write_text_atomic(path, &text)?;
            report.written.push(relative_path(&self.base_dir, path));
        }

        for path in set.pre.keys() {
            if set.docs.contains_key(path) {
                continue;
            }
            if let Some(backup_path) = snapshot_file(path)? {
                report
                    .backups
                    .push(relative_path(&self.base_dir, &backup_path));
            }
            fs::remove_file(path).map_err(|e| PatchError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            report.removed.push(relative_path(&self.base_dir, path));
        }

        Ok(())
    }
}

/// Two-stage step resolution: trust a valid scenario-relative index first,
/// otherwise fall back to the first step containing `old_value` as a
/// substring. Both the producer's index and its remembered text can be
/// individually unreliable; requiring at least one to land is deliberate.
fn resolve_step(scenario: &Scenario, step_index: Option<usize>, old_value: &str) -> Option<usize> {
    if let Some(index) = step_index
        && index < scenario.steps.len()
    {
        return Some(index);
    }
    scenario
        .steps
        .iter()
        .position(|step| step.text.contains(old_value))
}

/// Step lines recognized inside a `create_scenario` body; anything else
/// is dropped.
fn steps_from_body(body: &str) -> Vec<Step> {
    body.lines().filter_map(Step::parse).collect()
}
