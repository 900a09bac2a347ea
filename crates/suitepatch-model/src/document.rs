//! Feature documents: the parsed form of one `*.feature` file.
//!
//! Parsing is a line scan. `Feature:` sets the title, `Scenario:` opens a
//! new scenario, step-keyword lines attach to the open scenario, and
//! non-blank lines between the header and the first scenario are kept as
//! description text. Everything else is formatting and is not modelled.
//!
//! Serialization is canonical, not byte-preserving: re-parsing serialized
//! output reproduces the same structural model (feature title, description,
//! scenario names and step text, all in order).

use serde::{Deserialize, Serialize};

/// Line prefix that names the feature.
pub const FEATURE_PREFIX: &str = "Feature:";

/// Line prefix that opens a scenario.
pub const SCENARIO_PREFIX: &str = "Scenario:";

/// The five keywords a step clause may open with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub const ALL: [StepKeyword; 5] = [
        StepKeyword::Given,
        StepKeyword::When,
        StepKeyword::Then,
        StepKeyword::And,
        StepKeyword::But,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKeyword::Given => "Given",
            StepKeyword::When => "When",
            StepKeyword::Then => "Then",
            StepKeyword::And => "And",
            StepKeyword::But => "But",
        }
    }

    /// Keyword opening `line`, if the line reads as a step clause.
    ///
    /// The keyword must be followed by whitespace, so `Andover the bridge`
    /// is not a step.
    pub fn leading(line: &str) -> Option<StepKeyword> {
        let trimmed = line.trim_start();
        for keyword in StepKeyword::ALL {
            if let Some(rest) = trimmed.strip_prefix(keyword.as_str())
                && rest.starts_with(char::is_whitespace)
            {
                return Some(keyword);
            }
        }
        None
    }
}

/// One Given/When/Then/And/But clause, stored as the full trimmed line.
///
/// Steps are addressed by their zero-based position within the owning
/// scenario's step list, never by file line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Step {
    pub text: String,
}

impl Step {
    /// Parse a line into a step, `None` unless it opens with a keyword.
    pub fn parse(line: &str) -> Option<Step> {
        StepKeyword::leading(line).map(|_| Step {
            text: line.trim().to_string(),
        })
    }

    /// The keyword this step opens with.
    pub fn keyword(&self) -> Option<StepKeyword> {
        StepKeyword::leading(&self.text)
    }
}

/// A named ordered sequence of steps describing one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

/// One feature document: a title, free-form description lines, and an
/// ordered sequence of scenarios.
///
/// Scenario names are expected to be unique within a document; lookup
/// takes the first match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDocument {
    pub feature: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl FeatureDocument {
    /// An empty document carrying only the feature title.
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            description: Vec::new(),
            scenarios: Vec::new(),
        }
    }

    /// Parse document text. `None` when no `Feature:` line is present;
    /// such a file is treated as not present for matching purposes.
    pub fn parse(text: &str) -> Option<FeatureDocument> {
        let mut feature: Option<String> = None;
        let mut description: Vec<String> = Vec::new();
        let mut scenarios: Vec<Scenario> = Vec::new();
        let mut current: Option<Scenario> = None;

        for line in text.lines() {
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix(FEATURE_PREFIX) {
                if feature.is_none() {
                    feature = Some(rest.trim().to_string());
                }
            } else if let Some(rest) = trimmed.strip_prefix(SCENARIO_PREFIX) {
                if let Some(done) = current.take() {
                    scenarios.push(done);
                }
                current = Some(Scenario::new(rest.trim()));
            } else if let Some(step) = Step::parse(trimmed) {
                // Steps outside any scenario have no address and are dropped.
                if let Some(scenario) = current.as_mut() {
                    scenario.steps.push(step);
                }
            } else if !trimmed.is_empty()
                && feature.is_some()
                && current.is_none()
                && scenarios.is_empty()
            {
                description.push(trimmed.to_string());
            }
        }

        if let Some(done) = current.take() {
            scenarios.push(done);
        }

        feature.map(|feature| FeatureDocument {
            feature,
            description,
            scenarios,
        })
    }

    /// Emit canonical document text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(FEATURE_PREFIX);
        out.push(' ');
        out.push_str(&self.feature);
        out.push('\n');
        for line in &self.description {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        for scenario in &self.scenarios {
            out.push_str("  ");
            out.push_str(SCENARIO_PREFIX);
            out.push(' ');
            out.push_str(&scenario.name);
            out.push('\n');
            for step in &scenario.steps {
                out.push_str("    ");
                out.push_str(&step.text);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// First scenario with this exact name.
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }

    /// First scenario with this exact name (mutable).
    pub fn scenario_mut(&mut self, name: &str) -> Option<&mut Scenario> {
        self.scenarios
            .iter_mut()
            .find(|scenario| scenario.name == name)
    }
}
