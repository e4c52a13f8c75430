use crate::logging::{LogEvent, LogLevel, NoopEventLogger, SharedEventLogger};
use crate::metrics::{Metrics, NoopMetrics};
use crate::scenario::ScenarioValidator;
use crate::validation::BatchValidationSummary;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Input-shape and I/O failures. Validation findings are never errors; they
/// come back inside [`BatchValidationSummary`] so a batch can keep going.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset must be a JSON array of scenario records, or a single record object")]
    NotAnArray,
}

/// The aggregate report written for a whole dataset file.
#[derive(Clone, Debug, Serialize)]
pub struct FileValidationReport {
    pub valid: bool,
    pub source: String,
    pub summary: BatchValidationSummary,
}

struct RecordOutcome {
    scenario_id: String,
    errors: Vec<String>,
    schema_failed: bool,
    legal_failed: bool,
    trauma_failed: bool,
}

/// Drives [`ScenarioValidator`] over whole datasets and files.
///
/// Every record is visited regardless of prior failures; a single record's
/// unexpected internal failure is recorded as that scenario's error entry
/// rather than propagated.
pub struct BatchValidator {
    scenario: Arc<ScenarioValidator>,
    metrics: Arc<dyn Metrics>,
    logger: SharedEventLogger,
    concurrency: usize,
}

impl BatchValidator {
    pub fn new(
        scenario: Arc<ScenarioValidator>,
        metrics: Arc<dyn Metrics>,
        logger: SharedEventLogger,
        concurrency: Option<usize>,
    ) -> Self {
        let concurrency = concurrency
            .or_else(|| std::thread::available_parallelism().ok().map(usize::from))
            .unwrap_or(4)
            .max(1);
        Self {
            scenario,
            metrics,
            logger,
            concurrency,
        }
    }

    /// Validate a top-level dataset value. Fails fast only on the
    /// input-shape precondition: the top level must be an array.
    pub fn validate_dataset(&self, dataset: &Value) -> Result<BatchValidationSummary, DatasetError> {
        let records = dataset.as_array().ok_or(DatasetError::NotAnArray)?;
        Ok(self.validate_records(records))
    }

    /// Sequential per-record loop; no short-circuit between records.
    pub fn validate_records(&self, records: &[Value]) -> BatchValidationSummary {
        self.logger.log(
            LogEvent::new(LogLevel::Info, "batch.start")
                .with_field("records", records.len().to_string()),
        );
        let outcomes = records
            .iter()
            .enumerate()
            .map(|(index, record)| validate_one(&self.scenario, index, record))
            .collect();
        self.aggregate(outcomes)
    }

    /// Fan the per-record loop out across blocking workers. Aggregation
    /// happens in a single owner once every result has been collected, so
    /// no counters are shared between in-flight records.
    pub async fn validate_dataset_parallel(
        &self,
        dataset: &Value,
    ) -> Result<BatchValidationSummary, DatasetError> {
        let records = dataset.as_array().ok_or(DatasetError::NotAnArray)?;
        self.logger.log(
            LogEvent::new(LogLevel::Info, "batch.start")
                .with_field("records", records.len().to_string())
                .with_field("concurrency", self.concurrency.to_string()),
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(records.len());
        for (index, record) in records.iter().cloned().enumerate() {
            let validator = Arc::clone(&self.scenario);
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("semaphore never closed");
            handles.push((
                index,
                record.get("scenario_id").and_then(Value::as_str).map(String::from),
                tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    validate_one(&validator, index, &record)
                }),
            ));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, scenario_id, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                // A worker that died is a per-record failure, not a batch one.
                Err(join_err) => outcomes.push(RecordOutcome {
                    scenario_id: scenario_id.unwrap_or_else(|| format!("scenario_{index}")),
                    errors: vec![format!("internal validation failure: {join_err}")],
                    schema_failed: false,
                    legal_failed: false,
                    trauma_failed: false,
                }),
            }
        }
        Ok(self.aggregate(outcomes))
    }

    /// Load a JSON file and validate its records. A missing file and
    /// unparseable JSON surface as distinct error kinds; a single record
    /// object is accepted alongside the usual array shape.
    pub fn validate_scenario_file(&self, path: &Path) -> Result<FileValidationReport, DatasetError> {
        let records = load_records(path)?;
        let summary = self.validate_records(&records);
        self.finish_file(path, summary)
    }

    pub async fn validate_scenario_file_parallel(
        &self,
        path: &Path,
    ) -> Result<FileValidationReport, DatasetError> {
        let records = load_records(path)?;
        let summary = self
            .validate_dataset_parallel(&Value::Array(records))
            .await?;
        self.finish_file(path, summary)
    }

    fn finish_file(
        &self,
        path: &Path,
        summary: BatchValidationSummary,
    ) -> Result<FileValidationReport, DatasetError> {
        self.metrics.inc_files_validated();
        self.logger.log(
            LogEvent::new(LogLevel::Info, "file.validated")
                .with_source(path.display().to_string())
                .with_field("valid", summary.valid.to_string()),
        );
        Ok(FileValidationReport {
            valid: summary.valid,
            source: path.display().to_string(),
            summary,
        })
    }

    fn aggregate(&self, outcomes: Vec<RecordOutcome>) -> BatchValidationSummary {
        let mut scenario_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut scenarios_with_errors = 0u64;
        let mut total_errors = 0u64;

        for outcome in &outcomes {
            self.metrics.inc_scenarios_processed();
            if outcome.schema_failed {
                self.metrics.inc_schema_failures();
            }
            if outcome.legal_failed {
                self.metrics.inc_legal_failures();
            }
            if outcome.trauma_failed {
                self.metrics.inc_trauma_failures();
            }
            if outcome.errors.is_empty() {
                continue;
            }
            self.metrics.inc_scenarios_rejected();
            self.logger.log(
                LogEvent::new(LogLevel::Warn, "scenario.invalid")
                    .with_scenario(outcome.scenario_id.clone())
                    .with_field("errors", outcome.errors.len().to_string()),
            );
            scenarios_with_errors += 1;
            total_errors += outcome.errors.len() as u64;
            scenario_errors.insert(outcome.scenario_id.clone(), outcome.errors.clone());
        }

        let summary = BatchValidationSummary {
            valid: scenarios_with_errors == 0,
            scenarios_processed: outcomes.len() as u64,
            scenarios_with_errors,
            total_errors,
            scenario_errors,
        };
        self.logger.log(
            LogEvent::new(LogLevel::Info, "batch.complete")
                .with_field("processed", summary.scenarios_processed.to_string())
                .with_field("rejected", summary.scenarios_with_errors.to_string()),
        );
        summary
    }
}

impl Default for BatchValidator {
    fn default() -> Self {
        Self::new(
            Arc::new(ScenarioValidator::new()),
            Arc::new(NoopMetrics),
            Arc::new(NoopEventLogger),
            None,
        )
    }
}

fn validate_one(validator: &ScenarioValidator, index: usize, record: &Value) -> RecordOutcome {
    let fallback_id = record
        .get("scenario_id")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| format!("scenario_{index}"));

    match catch_unwind(AssertUnwindSafe(|| validator.validate(record))) {
        Ok(report) => {
            let scenario_id = if report.scenario_id.is_empty() {
                fallback_id
            } else {
                report.scenario_id.clone()
            };
            RecordOutcome {
                scenario_id,
                errors: report.all_errors(),
                schema_failed: !report.schema_validation.is_valid,
                legal_failed: !report.legal_validation.is_valid,
                trauma_failed: !report.trauma_validation.is_valid,
            }
        }
        Err(panic) => RecordOutcome {
            scenario_id: fallback_id,
            errors: vec![format!(
                "internal validation failure: {}",
                panic_message(&*panic)
            )],
            schema_failed: false,
            legal_failed: false,
            trauma_failed: false,
        },
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Read and parse a dataset file into its record list.
pub fn load_records(path: &Path) -> Result<Vec<Value>, DatasetError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DatasetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|source| DatasetError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
    match value {
        Value::Array(items) => Ok(items),
        record @ Value::Object(_) => Ok(vec![record]),
        _ => Err(DatasetError::NotAnArray),
    }
}
