//! # suitepatch-engine
//!
//! The update-plan engine over a directory tree of feature documents.
//!
//! This crate provides:
//! - `UpdatePlan` / `ChangeAction` (the tagged wire format a plan producer
//!   emits)
//! - plan validation, including the cosmetic-equivalence filter
//! - `PatchEngine`: load every document fresh, apply the plan in memory,
//!   then either simulate (per-file content + unified diffs, storage
//!   untouched) or commit (directory lock, snapshot-before-mutate backups,
//!   atomic writes)
//! - suite structure listing and suite seeding
//!
//! Plan production (deciding *what* to change) is an external collaborator;
//! this crate only consumes its output.
//!
//! ## Flow
//!
//! ```text
//! base_dir + UpdatePlan
//!     → load (fresh, per application)
//!     → validate whole plan, then mutate in memory
//!     → simulate: {path → content}, {path → diff lines}, diagnostics
//!     → commit:   lock, backup each file, write atomically
//! ```

pub mod backup;
pub mod diff;
pub mod engine;
pub mod fsio;
pub mod loader;
pub mod lock;
pub mod plan;
pub mod seed;
pub mod structure;
pub mod validate;

pub use backup::{BackupError, HISTORY_DIR, snapshot_file, snapshot_file_at};
pub use diff::{diff_report, unified_diff_lines};
pub use engine::{ApplyMode, ApplyReport, Diagnostic, PatchEngine, PatchError};
pub use fsio::{FsError, read_text, write_text_atomic};
pub use loader::{LoadedDocument, load_documents};
pub use lock::{DirLockGuard, LockError};
pub use plan::{ChangeAction, UpdatePlan};
pub use seed::{GeneratedFeature, GeneratedScenario, GeneratedSuite, SeedReport, write_suite};
pub use structure::{FeatureSummary, suite_structure};
pub use validate::{ValidationError, cosmetic_noop, validate_plan};
