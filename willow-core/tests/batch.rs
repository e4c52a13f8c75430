use serde_json::json;
use std::sync::Arc;
use willow_core::batch::{BatchValidator, DatasetError};
use willow_core::logging::{BufferedFileEventLogger, EventLogger, LogEvent, LogLevel};
use willow_core::metrics::{InMemoryMetrics, Metrics};
use willow_core::report::{render_batch_summary, save_json_report};
use willow_core::scenario::ScenarioValidator;

fn valid_record(id: &str) -> serde_json::Value {
    json!({
        "scenario_id": id,
        "title": "Test Scenario",
        "description": "A test scenario for validation",
        "vulnerabilities": ["hearing_impairment"],
        "legal_basis": {
            "federal": ["42 U.S.C. § 3601 et seq."],
            "state": [],
            "local": []
        },
        "metadata": {
            "created_at": "2025-04-02T10:30:00Z",
            "last_updated": "2025-04-03T08:00:00Z",
            "validation_status": "pending"
        }
    })
}

fn broken_record(id: &str) -> serde_json::Value {
    json!({
        "scenario_id": id,
        "title": "Broken Scenario"
        // description, vulnerabilities, metadata all missing
    })
}

fn instrumented_validator() -> (BatchValidator, Arc<InMemoryMetrics>, Arc<BufferedFileEventLogger>) {
    let metrics = Arc::new(InMemoryMetrics::new());
    let logger = Arc::new(BufferedFileEventLogger::new(256, None));
    let validator = BatchValidator::new(
        Arc::new(ScenarioValidator::new()),
        metrics.clone(),
        logger.clone(),
        Some(4),
    );
    (validator, metrics, logger)
}

#[test]
fn batch_counts_errored_scenarios() {
    let dataset = json!([
        valid_record("S_001"),
        broken_record("S_002"),
        valid_record("S_003"),
    ]);

    let validator = BatchValidator::default();
    let summary = validator.validate_dataset(&dataset).expect("array input");

    assert!(!summary.valid);
    assert_eq!(summary.scenarios_processed, 3);
    assert_eq!(summary.scenarios_with_errors, 1);
    assert!(summary.total_errors >= 3);
    assert!(summary.scenario_errors.contains_key("S_002"));
    assert!(!summary.scenario_errors.contains_key("S_001"));
}

#[test]
fn all_valid_batch_is_valid() {
    let dataset = json!([valid_record("S_001"), valid_record("S_002")]);
    let validator = BatchValidator::default();
    let summary = validator.validate_dataset(&dataset).expect("array input");

    assert!(summary.valid);
    assert_eq!(summary.scenarios_with_errors, 0);
    assert!(summary.scenario_errors.is_empty());
}

#[test]
fn missing_scenario_id_falls_back_to_positional_placeholder() {
    let mut anonymous = broken_record("ignored");
    anonymous.as_object_mut().unwrap().remove("scenario_id");
    let dataset = json!([valid_record("S_001"), anonymous]);

    let validator = BatchValidator::default();
    let summary = validator.validate_dataset(&dataset).expect("array input");

    assert!(summary.scenario_errors.contains_key("scenario_1"));
}

#[test]
fn non_object_records_are_recorded_not_skipped() {
    let dataset = json!([valid_record("S_001"), "just a string", 42]);

    let validator = BatchValidator::default();
    let summary = validator.validate_dataset(&dataset).expect("array input");

    assert_eq!(summary.scenarios_processed, 3);
    assert_eq!(summary.scenarios_with_errors, 2);
    assert!(summary.scenario_errors["scenario_1"]
        .iter()
        .any(|e| e.contains("not a JSON object")));
}

#[test]
fn top_level_type_mismatch_fails_fast() {
    let validator = BatchValidator::default();
    let err = validator
        .validate_dataset(&json!({"not": "an array"}))
        .unwrap_err();
    assert!(matches!(err, DatasetError::NotAnArray));
}

#[tokio::test]
async fn parallel_driver_matches_sequential_results() {
    let mut records = Vec::new();
    for i in 0..12 {
        if i % 3 == 0 {
            records.push(broken_record(&format!("S_{i:03}")));
        } else {
            records.push(valid_record(&format!("S_{i:03}")));
        }
    }
    let dataset = serde_json::Value::Array(records);

    let validator = BatchValidator::default();
    let sequential = validator.validate_dataset(&dataset).expect("array input");
    let parallel = validator
        .validate_dataset_parallel(&dataset)
        .await
        .expect("array input");

    assert_eq!(sequential, parallel);
    assert_eq!(parallel.scenarios_processed, 12);
    assert_eq!(parallel.scenarios_with_errors, 4);
}

#[test]
fn metrics_and_events_track_a_batch_run() {
    let (validator, metrics, logger) = instrumented_validator();
    let dataset = json!([valid_record("S_001"), broken_record("S_002")]);

    validator.validate_dataset(&dataset).expect("array input");

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.scenarios_processed, 2);
    assert_eq!(snapshot.scenarios_rejected, 1);
    assert_eq!(snapshot.schema_failures, 1);
    assert_eq!(snapshot.legal_failures, 1);

    let (_, events) = logger.events_since(0);
    assert!(events.iter().any(|e| e.message == "batch.start"));
    assert!(events.iter().any(|e| e.message == "scenario.invalid"
        && e.scenario_id.as_deref() == Some("S_002")));
    assert!(events.iter().any(|e| e.message == "batch.complete"));
}

#[test]
fn validate_scenario_file_accepts_array_and_single_object() {
    let dir = std::env::temp_dir().join(format!(
        "willow_batch_{}_{}",
        std::process::id(),
        line!()
    ));
    std::fs::create_dir_all(&dir).unwrap();

    let array_path = dir.join("dataset.json");
    std::fs::write(
        &array_path,
        serde_json::to_string(&json!([valid_record("S_001")])).unwrap(),
    )
    .unwrap();

    let single_path = dir.join("single.json");
    std::fs::write(
        &single_path,
        serde_json::to_string(&valid_record("S_002")).unwrap(),
    )
    .unwrap();

    let (validator, metrics, _) = instrumented_validator();

    let report = validator.validate_scenario_file(&array_path).expect("loads");
    assert!(report.valid);
    assert_eq!(report.summary.scenarios_processed, 1);

    let report = validator.validate_scenario_file(&single_path).expect("loads");
    assert!(report.valid);
    assert_eq!(report.summary.scenarios_processed, 1);

    assert_eq!(metrics.snapshot().files_validated, 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn missing_file_and_bad_json_are_distinct_errors() {
    let dir = std::env::temp_dir().join(format!(
        "willow_batch_{}_{}",
        std::process::id(),
        line!()
    ));
    std::fs::create_dir_all(&dir).unwrap();

    let validator = BatchValidator::default();

    let err = validator
        .validate_scenario_file(&dir.join("nope.json"))
        .unwrap_err();
    assert!(matches!(err, DatasetError::FileNotFound { .. }));

    let bad = dir.join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    let err = validator.validate_scenario_file(&bad).unwrap_err();
    assert!(matches!(err, DatasetError::InvalidJson { .. }));

    let scalar = dir.join("scalar.json");
    std::fs::write(&scalar, "42").unwrap();
    let err = validator.validate_scenario_file(&scalar).unwrap_err();
    assert!(matches!(err, DatasetError::NotAnArray));

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn parallel_file_validation_writes_report() {
    let dir = std::env::temp_dir().join(format!(
        "willow_batch_{}_{}",
        std::process::id(),
        line!()
    ));
    std::fs::create_dir_all(&dir).unwrap();

    let dataset_path = dir.join("dataset.json");
    std::fs::write(
        &dataset_path,
        serde_json::to_string(&json!([valid_record("S_001"), broken_record("S_002")])).unwrap(),
    )
    .unwrap();

    let validator = BatchValidator::default();
    let report = validator
        .validate_scenario_file_parallel(&dataset_path)
        .await
        .expect("loads");
    assert!(!report.valid);

    let report_path = dir.join("reports").join("out.json");
    save_json_report(&report, &report_path).expect("writes");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(written["valid"], json!(false));
    assert_eq!(written["summary"]["scenarios_with_errors"], json!(1));

    let rendered = render_batch_summary(&report.summary);
    assert!(rendered.contains("Scenarios with errors: 1"));
    assert!(rendered.contains("S_002"));

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn event_log_file_is_appended_when_log_dir_set() {
    let dir = std::env::temp_dir().join(format!(
        "willow_batch_{}_{}",
        std::process::id(),
        line!()
    ));
    std::fs::create_dir_all(&dir).unwrap();

    let logger = BufferedFileEventLogger::new(16, Some(dir.clone()));
    logger.log(
        LogEvent::new(LogLevel::Info, "file.validated")
            .with_source("datasets/enhanced.json")
            .with_field("valid", "true".to_string()),
    );

    let log_path = dir.join("enhanced.events.jsonl");
    let contents = std::fs::read_to_string(&log_path).expect("event log written");
    let line: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(line["message"], json!("file.validated"));

    let _ = std::fs::remove_dir_all(dir);
}
