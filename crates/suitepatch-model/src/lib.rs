//! # suitepatch-model
//!
//! Structured model of a behavioral-test suite on disk.
//!
//! This crate provides:
//! - `FeatureDocument`, `Scenario`, `Step` (the document model)
//! - line-based `parse` / canonical `serialize` with a structural
//!   round-trip guarantee
//! - the canonical `(base_dir, screen, feature)` → path mapping
//!
//! It intentionally knows nothing about update plans, backups, or
//! persistence. Those concerns live in `suitepatch-engine`.
//!
//! ## Data model
//!
//! ```text
//! *.feature (on disk, one file per screen/feature pair)
//!     ↕  parse / serialize
//! FeatureDocument (ordered scenarios, scenario-relative step addressing)
//! ```

pub mod document;
pub mod path;

pub use document::{FeatureDocument, Scenario, Step, StepKeyword};
pub use path::{FEATURE_EXTENSION, feature_path, normalize, relative_path, screen_dir};
