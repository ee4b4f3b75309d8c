//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations over the catalog and the produced
//! files. The pipeline decides what a violation means for the run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::Catalog;
use crate::naming::FilenamePolicy;
use crate::pipeline::{EntryOutcome, EntryStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        Self { valid, violations }
    }

    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

/// Everything a rule may look at
pub struct ValidationInput<'a> {
    pub catalog: &'a Catalog,
    pub filenames: FilenamePolicy,
    pub output_dir: &'a Path,
    /// Empty before any rasterization has run
    pub outcomes: &'a [EntryOutcome],
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &ValidationInput<'_>) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Several catalog rows resolve to one output file
pub struct FilenameCollisionRule;

impl ValidationRule for FilenameCollisionRule {
    fn name(&self) -> &'static str { "filename_collision" }

    fn validate(&self, input: &ValidationInput<'_>) -> Vec<ValidationViolation> {
        let mut rows: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for spec in input.catalog {
            rows.entry(input.filenames.filename(spec))
                .or_default()
                .push(format!("{} {}", spec.idiom, spec.descriptor));
        }

        rows.into_iter()
            .filter(|(_, users)| users.len() > 1)
            .map(|(filename, users)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("{} is shared by {} manifest entries", filename, users.len()),
                expected: Some("one file per entry".to_string()),
                actual: Some(users.join(", ")),
                remediation: vec!["Use the disambiguated filename policy".to_string()],
            })
            .collect()
    }
}

/// A backend reported success but the file is not there
pub struct OutputPresentRule;

impl ValidationRule for OutputPresentRule {
    fn name(&self) -> &'static str { "output_present" }

    fn validate(&self, input: &ValidationInput<'_>) -> Vec<ValidationViolation> {
        input.outcomes.iter()
            .filter(|o| o.status == EntryStatus::Written)
            .filter(|o| !input.output_dir.join(&o.filename).is_file())
            .map(|o| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("{} is missing from the output directory", o.filename),
                expected: Some(input.output_dir.join(&o.filename).display().to_string()),
                actual: None,
                remediation: vec!["Re-run generation".to_string()],
            })
            .collect()
    }
}

/// Written PNGs must be exactly dimension x dimension
pub struct OutputDimensionsRule;

impl ValidationRule for OutputDimensionsRule {
    fn name(&self) -> &'static str { "output_dimensions" }

    fn validate(&self, input: &ValidationInput<'_>) -> Vec<ValidationViolation> {
        let mut violations = vec![];

        for outcome in input.outcomes.iter().filter(|o| o.status == EntryStatus::Written) {
            let path = input.output_dir.join(&outcome.filename);
            if !path.is_file() {
                // reported by OutputPresentRule
                continue;
            }

            let expected = format!("{0}x{0}", outcome.dimension);
            match image::image_dimensions(&path) {
                Ok((w, h)) if w == outcome.dimension && h == outcome.dimension => {}
                Ok((w, h)) => violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("{} has the wrong pixel size", outcome.filename),
                    expected: Some(expected),
                    actual: Some(format!("{}x{}", w, h)),
                    remediation: vec!["Check that the source SVG has a square viewBox".to_string()],
                }),
                Err(e) => violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("{} is not a readable PNG", outcome.filename),
                    expected: Some(expected),
                    actual: Some(e.to_string()),
                    remediation: vec!["Try another rasterizer backend".to_string()],
                }),
            }
        }

        violations
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    /// Catalog and output checks
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(FilenameCollisionRule),
                Box::new(OutputPresentRule),
                Box::new(OutputDimensionsRule),
            ],
        }
    }

    /// Checks that need no produced files
    pub fn catalog_only() -> Self {
        Self {
            rules: vec![Box::new(FilenameCollisionRule)],
        }
    }

    pub fn validate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let violations = self.rules.iter()
            .flat_map(|rule| rule.validate(input))
            .collect();
        ValidationResult::from_violations(violations)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
