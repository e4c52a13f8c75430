use crate::citations::LegalCitationValidator;
use crate::domain::Scenario;
use crate::rules::{CompiledPhrase, RuleSet};
use crate::schema::SchemaValidator;
use crate::validation::{ScenarioValidationReport, SectionResult, SectionValidator};
use serde_json::Value;

impl SectionValidator for SchemaValidator {
    fn id(&self) -> &str {
        "schema"
    }

    fn validate(&self, record: &Value) -> SectionResult {
        let (_, errors) = self.validate_value(record);
        SectionResult::from_errors(errors)
    }
}

/// Legal-content check: a federal citation must be present in
/// `legal_basis.federal`, and no legally-relevant text field may carry an
/// invalid or vague citation.
pub struct LegalContentValidator {
    citations: LegalCitationValidator,
}

impl LegalContentValidator {
    pub fn new(citations: LegalCitationValidator) -> Self {
        Self { citations }
    }
}

impl SectionValidator for LegalContentValidator {
    fn id(&self) -> &str {
        "legal"
    }

    fn validate(&self, record: &Value) -> SectionResult {
        let mut errors = Vec::new();

        let has_federal = record
            .pointer("/legal_basis/federal")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .any(|e| e.as_str().is_some_and(|s| !s.trim().is_empty()))
            })
            .unwrap_or(false);
        if !has_federal {
            errors.push(
                "field='legal_basis.federal': no federal legal citation present".to_string(),
            );
        }

        for (path, text) in legal_text_fields(record) {
            for result in self.citations.validate_text(&text) {
                if result.is_valid {
                    continue;
                }
                for issue in &result.issues {
                    errors.push(format!("field='{path}': {}", issue.message));
                }
            }
        }

        SectionResult::from_errors(errors)
    }
}

/// Trauma-informed-language check: a lexical blocklist scan for coercive or
/// invalidating phrasing in the prescribed communication fields.
pub struct TraumaLanguageValidator {
    invalidating: Vec<CompiledPhrase>,
}

impl TraumaLanguageValidator {
    pub fn new(invalidating: Vec<CompiledPhrase>) -> Self {
        Self { invalidating }
    }
}

impl SectionValidator for TraumaLanguageValidator {
    fn id(&self) -> &str {
        "trauma"
    }

    fn validate(&self, record: &Value) -> SectionResult {
        let mut errors = Vec::new();
        for (path, text) in trauma_text_fields(record) {
            for rule in &self.invalidating {
                if rule.matcher.is_match(&text) {
                    errors.push(format!(
                        "field='{path}': contains \"{}\"; rephrase to avoid using potentially invalidating language",
                        rule.phrase
                    ));
                }
            }
        }
        SectionResult::from_errors(errors)
    }
}

/// Composes the schema, legal, and trauma checks into one holistic report
/// per scenario. Semantic sections still run when the schema check fails,
/// for diagnostic value; schema validity gates `overall_valid` regardless.
pub struct ScenarioValidator {
    schema: SchemaValidator,
    legal: LegalContentValidator,
    trauma: TraumaLanguageValidator,
}

impl ScenarioValidator {
    pub fn new() -> Self {
        Self::with_rules(&RuleSet::builtin()).expect("built-in rules compile")
    }

    pub fn with_rules(rules: &RuleSet) -> Result<Self, regex::Error> {
        Self::with_parts(SchemaValidator::new(), rules)
    }

    pub fn with_parts(schema: SchemaValidator, rules: &RuleSet) -> Result<Self, regex::Error> {
        let compiled = rules.compile()?;
        Ok(Self {
            schema,
            legal: LegalContentValidator::new(LegalCitationValidator::with_rules(rules)?),
            trauma: TraumaLanguageValidator::new(compiled.invalidating),
        })
    }

    pub fn validate(&self, record: &Value) -> ScenarioValidationReport {
        let scenario_id = record
            .get("scenario_id")
            .and_then(Value::as_str)
            .unwrap_or_default();
        ScenarioValidationReport::new(
            scenario_id,
            SectionValidator::validate(&self.schema, record),
            self.legal.validate(record),
            self.trauma.validate(record),
        )
    }

    /// Validate an already-typed scenario.
    pub fn validate_scenario(
        &self,
        scenario: &Scenario,
    ) -> Result<ScenarioValidationReport, serde_json::Error> {
        Ok(self.validate(&scenario.to_value()?))
    }
}

impl Default for ScenarioValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn push_text(out: &mut Vec<(String, String)>, path: String, value: Option<&Value>) {
    if let Some(s) = value.and_then(Value::as_str) {
        if !s.is_empty() {
            out.push((path, s.to_string()));
        }
    }
}

fn push_array(out: &mut Vec<(String, String)>, base: &str, value: Option<&Value>) {
    if let Some(items) = value.and_then(Value::as_array) {
        for (i, item) in items.iter().enumerate() {
            push_text(out, format!("{base}[{i}]"), Some(item));
        }
    }
}

/// The legally-relevant text fields of a record, with their dotted paths.
fn legal_text_fields(record: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for level in ["federal", "state", "local"] {
        push_array(
            &mut out,
            &format!("legal_basis.{level}"),
            record.pointer(&format!("/legal_basis/{level}")),
        );
    }
    push_text(
        &mut out,
        "golden_ratio_structure.proof_statement".to_string(),
        record.pointer("/golden_ratio_structure/proof_statement"),
    );
    for script in ["professional", "empathetic", "legal"] {
        push_text(
            &mut out,
            format!("conflict_resolution.response_scripts.{script}"),
            record.pointer(&format!("/conflict_resolution/response_scripts/{script}")),
        );
    }
    push_array(
        &mut out,
        "conflict_resolution.denial_grounds",
        record.pointer("/conflict_resolution/denial_grounds"),
    );
    out
}

/// The emotional/communication text fields subject to the trauma check.
fn trauma_text_fields(record: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for field in [
        "emotional_validation",
        "concrete_action",
        "accountability_mechanism",
        "realistic_boundary",
        "closing_statement",
    ] {
        push_text(
            &mut out,
            format!("golden_ratio_structure.{field}"),
            record.pointer(&format!("/golden_ratio_structure/{field}")),
        );
    }
    push_array(
        &mut out,
        "golden_ratio_structure.closure_variants",
        record.pointer("/golden_ratio_structure/closure_variants"),
    );
    for script in ["professional", "empathetic", "legal"] {
        push_text(
            &mut out,
            format!("conflict_resolution.response_scripts.{script}"),
            record.pointer(&format!("/conflict_resolution/response_scripts/{script}")),
        );
    }
    push_array(
        &mut out,
        "trauma_informed_care.communication_style",
        record.pointer("/trauma_informed_care/communication_style"),
    );
    if let Some(messages) = record.get("messages").and_then(Value::as_array) {
        for (i, msg) in messages.iter().enumerate() {
            push_text(&mut out, format!("messages[{i}].content"), msg.get("content"));
        }
    }
    out
}
