use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogEvent {
    pub ts: DateTime<Utc>,
    pub level: LogLevel,
    pub scenario_id: Option<String>,
    pub source: Option<String>,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            level,
            scenario_id: None,
            source: None,
            message: message.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_scenario(mut self, scenario_id: impl Into<String>) -> Self {
        self.scenario_id = Some(scenario_id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_field(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.fields.insert(k.into(), v.into());
        self
    }
}

pub trait EventLogger: Send + Sync {
    fn log(&self, event: LogEvent);
}

#[derive(Default)]
pub struct NoopEventLogger;

impl EventLogger for NoopEventLogger {
    fn log(&self, _event: LogEvent) {}
}

pub type SharedEventLogger = Arc<dyn EventLogger>;

/// Keeps a bounded in-memory tail of events and, when a log directory is
/// configured, appends every event to a JSONL file per source dataset.
pub struct BufferedFileEventLogger {
    seq: AtomicU64,
    max_events: usize,
    log_dir: Option<PathBuf>,
    events: Mutex<VecDeque<(u64, LogEvent)>>,
}

impl BufferedFileEventLogger {
    pub fn new(max_events: usize, log_dir: Option<PathBuf>) -> Self {
        Self {
            seq: AtomicU64::new(0),
            max_events: max_events.max(1),
            log_dir,
            events: Mutex::new(VecDeque::new()),
        }
    }

    /// Events logged after `last_seq`, plus the new high-water mark.
    pub fn events_since(&self, last_seq: u64) -> (u64, Vec<LogEvent>) {
        let events = self.events.lock().unwrap();
        let mut out = Vec::new();
        let mut new_last = last_seq;
        for (seq, ev) in events.iter() {
            if *seq > last_seq {
                out.push(ev.clone());
                new_last = new_last.max(*seq);
            }
        }
        (new_last, out)
    }

    fn event_path(&self, event: &LogEvent) -> Option<PathBuf> {
        let dir = self.log_dir.as_ref()?;
        let stem = event
            .source
            .as_deref()
            .map(|s| {
                Path::new(s)
                    .file_stem()
                    .and_then(|v| v.to_str())
                    .unwrap_or("validation")
                    .to_string()
            })
            .unwrap_or_else(|| "validation".to_string());
        Some(dir.join(format!("{stem}.events.jsonl")))
    }

    fn write_to_file(&self, event: &LogEvent) {
        let Some(path) = self.event_path(event) else {
            return;
        };
        let Some(parent) = path.parent() else {
            return;
        };
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let line = line + "\n";
        let Ok(mut f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        else {
            return;
        };
        let _ = std::io::Write::write_all(&mut f, line.as_bytes());
    }
}

impl EventLogger for BufferedFileEventLogger {
    fn log(&self, event: LogEvent) {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;

        self.write_to_file(&event);

        let mut events = self.events.lock().unwrap();
        events.push_back((seq, event));
        while events.len() > self.max_events {
            events.pop_front();
        }
    }
}
