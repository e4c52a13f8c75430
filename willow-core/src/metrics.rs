use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub files_validated: u64,
    pub scenarios_processed: u64,
    pub scenarios_rejected: u64,
    pub schema_failures: u64,
    pub legal_failures: u64,
    pub trauma_failures: u64,
}

pub trait Metrics: Send + Sync {
    fn inc_files_validated(&self);
    fn inc_scenarios_processed(&self);
    fn inc_scenarios_rejected(&self);
    fn inc_schema_failures(&self);
    fn inc_legal_failures(&self);
    fn inc_trauma_failures(&self);
    fn snapshot(&self) -> MetricsSnapshot;
}

pub struct InMemoryMetrics {
    files_validated: AtomicU64,
    scenarios_processed: AtomicU64,
    scenarios_rejected: AtomicU64,
    schema_failures: AtomicU64,
    legal_failures: AtomicU64,
    trauma_failures: AtomicU64,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self {
            files_validated: AtomicU64::new(0),
            scenarios_processed: AtomicU64::new(0),
            scenarios_rejected: AtomicU64::new(0),
            schema_failures: AtomicU64::new(0),
            legal_failures: AtomicU64::new(0),
            trauma_failures: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics for InMemoryMetrics {
    fn inc_files_validated(&self) {
        self.files_validated.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_scenarios_processed(&self) {
        self.scenarios_processed.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_scenarios_rejected(&self) {
        self.scenarios_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_schema_failures(&self) {
        self.schema_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_legal_failures(&self) {
        self.legal_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_trauma_failures(&self) {
        self.trauma_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_validated: self.files_validated.load(Ordering::Relaxed),
            scenarios_processed: self.scenarios_processed.load(Ordering::Relaxed),
            scenarios_rejected: self.scenarios_rejected.load(Ordering::Relaxed),
            schema_failures: self.schema_failures.load(Ordering::Relaxed),
            legal_failures: self.legal_failures.load(Ordering::Relaxed),
            trauma_failures: self.trauma_failures.load(Ordering::Relaxed),
        }
    }
}

pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn inc_files_validated(&self) {}
    fn inc_scenarios_processed(&self) {}
    fn inc_scenarios_rejected(&self) {}
    fn inc_schema_failures(&self) {}
    fn inc_legal_failures(&self) {}
    fn inc_trauma_failures(&self) {}
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_validated: 0,
            scenarios_processed: 0,
            scenarios_rejected: 0,
            schema_failures: 0,
            legal_failures: 0,
            trauma_failures: 0,
        }
    }
}
