use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn is_blocking(self) -> bool {
        matches!(self, Severity::Critical | Severity::Major)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub span: Option<(usize, usize)>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "validation issues carry a message");
        Self {
            severity,
            code: code.into(),
            message,
            span: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }
}

/// Outcome for a single citation-like span or flagged phrase.
///
/// `is_valid` is derived from the attached issues at construction time:
/// a result is valid iff it carries no Critical or Major issue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub original_text: String,
    pub is_valid: bool,
    pub matched_instrument: Option<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new(
        original_text: impl Into<String>,
        matched_instrument: Option<String>,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        let is_valid = !issues.iter().any(|i| i.severity.is_blocking());
        Self {
            original_text: original_text.into(),
            is_valid,
            matched_instrument,
            issues,
        }
    }

    pub fn span(&self) -> Option<(usize, usize)> {
        self.issues.iter().find_map(|i| i.span)
    }

    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.severity).max()
    }
}

/// Result of one sub-check (schema, legal, trauma) over a scenario record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl SectionResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScenarioValidationReport {
    pub scenario_id: String,
    pub schema_validation: SectionResult,
    pub legal_validation: SectionResult,
    pub trauma_validation: SectionResult,
    pub overall_valid: bool,
}

impl ScenarioValidationReport {
    /// Schema validity gates the overall result: semantic sections are still
    /// reported for diagnostics, but `overall_valid` is the AND of all three.
    pub fn new(
        scenario_id: impl Into<String>,
        schema_validation: SectionResult,
        legal_validation: SectionResult,
        trauma_validation: SectionResult,
    ) -> Self {
        let overall_valid = schema_validation.is_valid
            && legal_validation.is_valid
            && trauma_validation.is_valid;
        Self {
            scenario_id: scenario_id.into(),
            schema_validation,
            legal_validation,
            trauma_validation,
            overall_valid,
        }
    }

    pub fn all_errors(&self) -> Vec<String> {
        self.schema_validation
            .errors
            .iter()
            .chain(self.legal_validation.errors.iter())
            .chain(self.trauma_validation.errors.iter())
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchValidationSummary {
    pub valid: bool,
    pub scenarios_processed: u64,
    pub scenarios_with_errors: u64,
    pub total_errors: u64,
    pub scenario_errors: BTreeMap<String, Vec<String>>,
}

/// One composable sub-check over a raw scenario record.
///
/// Validators operate on the wire-shape `Value` rather than the typed
/// [`crate::domain::Scenario`] so that diagnostics still run on records the
/// typed model would reject.
pub trait SectionValidator: Send + Sync {
    fn id(&self) -> &str;
    fn validate(&self, record: &Value) -> SectionResult;
}
