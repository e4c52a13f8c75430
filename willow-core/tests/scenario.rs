use serde_json::json;
use willow_core::domain::{Scenario, UrgencyLevel};
use willow_core::rules::RuleSet;
use willow_core::scenario::ScenarioValidator;

fn valid_scenario() -> serde_json::Value {
    json!({
        "scenario_id": "TEST_001",
        "title": "Ramp installation request",
        "description": "A mobility-impaired tenant requests a ramp at the main entrance",
        "vulnerabilities": ["mobility_impairment"],
        "vulnerability_context": {
            "primary": "mobility_impairment",
            "intersectional": ["elderly"],
            "trauma_history": "None reported"
        },
        "urgency_level": "Medium",
        "legal_basis": {
            "federal": [
                "42 U.S.C. § 3601 et seq. (Fair Housing Act)",
                "42 U.S.C. § 12101 (ADA)"
            ],
            "state": [],
            "local": []
        },
        "golden_ratio_structure": {
            "emotional_validation": "We understand this is important for your mobility and independence.",
            "concrete_action": "We'll install a ramp at the main entrance within 7 business days.",
            "accountability_mechanism": "The maintenance supervisor will confirm completion.",
            "proof_statement": "42 U.S.C. § 3604 requires reasonable accommodations for tenants with disabilities.",
            "realistic_boundary": "If structural limitations prevent a permanent ramp, we'll provide a temporary solution within 48 hours.",
            "closing_statement": "Your comfort and safety are our priority.",
            "closure_variants": [
                "Thank you for bringing this to our attention.",
                "We're here to help with any other needs."
            ]
        },
        "conflict_resolution": {
            "common_objections": ["Cost is prohibitive"],
            "response_scripts": {
                "professional": "The Fair Housing Act, 42 U.S.C. § 3604, requires reasonable accommodations.",
                "empathetic": "I understand your concern. Let's find a solution together.",
                "legal": "24 C.F.R. § 100.204 sets out the reasonable accommodation standard."
            },
            "escalation_path": ["Property Manager"],
            "denial_grounds": ["Undue financial burden"],
            "appeal_process": "Request review in writing within 10 business days"
        },
        "trauma_informed_care": {
            "triggers_to_avoid": ["Delaying response"],
            "communication_style": ["Written", "Verbal"],
            "safety_considerations": ["Private meeting space"]
        },
        "tenant_rights": {
            "right_to_modify": true,
            "right_to_accommodation": true,
            "right_to_privacy": true,
            "right_to_nondiscrimination": true
        },
        "messages": [
            {"role": "tenant", "content": "The entrance steps keep me from getting my chair inside."},
            {"role": "manager", "content": "We hear you, and we will respond within one business day."}
        ],
        "metadata": {
            "created_at": "2025-04-02T10:30:00Z",
            "last_updated": "2025-04-03T08:00:00Z",
            "validation_status": "pending"
        },
        "tags": ["mobility", "accessibility"],
        "version": "1.0.0"
    })
}

#[test]
fn fully_valid_scenario_passes_all_sections() {
    let validator = ScenarioValidator::new();
    let report = validator.validate(&valid_scenario());

    assert!(report.schema_validation.is_valid, "{:?}", report.schema_validation.errors);
    assert!(report.legal_validation.is_valid, "{:?}", report.legal_validation.errors);
    assert!(report.trauma_validation.is_valid, "{:?}", report.trauma_validation.errors);
    assert!(report.overall_valid);
    assert_eq!(report.scenario_id, "TEST_001");
    assert!(report.all_errors().is_empty());
}

#[test]
fn empty_federal_basis_fails_legal_validation() {
    let mut scenario = valid_scenario();
    scenario["legal_basis"]["federal"] = json!([]);

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.legal_validation.is_valid);
    assert!(report
        .legal_validation
        .errors
        .iter()
        .any(|e| e.contains("federal")));
    assert!(!report.overall_valid);
}

#[test]
fn vague_citation_in_legal_text_fails_legal_validation() {
    let mut scenario = valid_scenario();
    scenario["golden_ratio_structure"]["proof_statement"] =
        json!("This is required under fair housing laws.");

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.legal_validation.is_valid);
    assert!(report
        .legal_validation
        .errors
        .iter()
        .any(|e| e.contains("golden_ratio_structure.proof_statement")));
}

#[test]
fn invalidating_language_fails_trauma_validation() {
    let mut scenario = valid_scenario();
    scenario["golden_ratio_structure"]["emotional_validation"] =
        json!("You must understand that repairs take time.");

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.trauma_validation.is_valid);
    assert!(report
        .trauma_validation
        .errors
        .iter()
        .any(|e| e.to_lowercase().contains("avoid using potentially invalidating language")));
    assert!(!report.overall_valid);
}

#[test]
fn invalidating_language_in_messages_is_caught() {
    let mut scenario = valid_scenario();
    scenario["messages"][1]["content"] = json!("Calm down, maintenance will get to it.");

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.trauma_validation.is_valid);
    assert!(report
        .trauma_validation
        .errors
        .iter()
        .any(|e| e.contains("messages[1].content")));
}

#[test]
fn schema_failure_gates_overall_validity() {
    let mut scenario = valid_scenario();
    scenario.as_object_mut().unwrap().remove("description");

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.schema_validation.is_valid);
    // Semantic sections still ran and passed, but the overall result
    // reflects the schema gate.
    assert!(report.legal_validation.is_valid);
    assert!(report.trauma_validation.is_valid);
    assert!(!report.overall_valid);
}

#[test]
fn semantic_sections_still_report_on_schema_failing_records() {
    let scenario = json!({
        "title": "Fragment",
        "legal_basis": { "federal": [] },
        "golden_ratio_structure": {
            "proof_statement": "Covered by tenant rights in general."
        }
    });

    let validator = ScenarioValidator::new();
    let report = validator.validate(&scenario);

    assert!(!report.schema_validation.is_valid);
    assert!(!report.legal_validation.is_valid);
    assert!(report.legal_validation.errors.len() >= 2);
}

#[test]
fn custom_rules_drive_both_scans() {
    let mut rules = RuleSet::builtin();
    rules.invalidating.push("unacceptable attitude".to_string());

    let mut scenario = valid_scenario();
    scenario["conflict_resolution"]["response_scripts"]["professional"] =
        json!("Your unacceptable attitude is noted.");

    let validator = ScenarioValidator::with_rules(&rules).expect("rules compile");
    let report = validator.validate(&scenario);

    assert!(!report.trauma_validation.is_valid);
    assert!(report
        .trauma_validation
        .errors
        .iter()
        .any(|e| e.contains("unacceptable attitude")));
}

#[test]
fn typed_scenario_round_trips_through_validation() {
    let value = valid_scenario();
    let scenario = Scenario::from_value(&value).expect("typed parse");
    assert_eq!(scenario.scenario_id, "TEST_001");
    assert_eq!(scenario.urgency_level, Some(UrgencyLevel::Medium));
    assert_eq!(
        scenario.legal_basis.as_ref().map(|l| l.federal.len()),
        Some(2)
    );

    let validator = ScenarioValidator::new();
    let report = validator
        .validate_scenario(&scenario)
        .expect("serializes back");
    assert!(report.overall_valid, "{:?}", report.all_errors());
}

#[test]
fn typed_scenario_rejects_unknown_urgency() {
    let mut value = valid_scenario();
    value["urgency_level"] = json!("Whenever");
    assert!(Scenario::from_value(&value).is_err());
}
