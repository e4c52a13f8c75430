use crate::validation::{BatchValidationSummary, Severity, ValidationResult};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Human-readable summary of a citation scan: counts by severity and every
/// flagged span with surrounding context. Pure formatting over the scan
/// results; `text` must be the string that was scanned.
pub fn render_citation_report(text: &str, results: &[ValidationResult]) -> String {
    let valid = results.iter().filter(|r| r.is_valid).count();
    let flagged = results.len() - valid;

    let mut counts = [0usize; 4];
    for issue in results.iter().flat_map(|r| r.issues.iter()) {
        let slot = match issue.severity {
            Severity::Critical => 0,
            Severity::Major => 1,
            Severity::Minor => 2,
            Severity::Info => 3,
        };
        counts[slot] += 1;
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Legal citation report: {} span(s), {valid} valid, {flagged} flagged",
        results.len()
    );
    let _ = writeln!(
        out,
        "Issues by severity: critical={} major={} minor={} info={}",
        counts[0], counts[1], counts[2], counts[3]
    );

    for (i, result) in results.iter().enumerate() {
        if result.is_valid {
            let instrument = result.matched_instrument.as_deref().unwrap_or("unknown");
            let _ = writeln!(
                out,
                "{:>3}. VALID    {instrument}  \"{}\"",
                i + 1,
                result.original_text
            );
        } else {
            let severity = result
                .worst_severity()
                .map(|s| format!("{s:?}"))
                .unwrap_or_else(|| "Unknown".to_string());
            let _ = writeln!(
                out,
                "{:>3}. FLAGGED  [{severity}]  \"{}\"",
                i + 1,
                result.original_text
            );
            for issue in &result.issues {
                let _ = writeln!(out, "       {}", issue.message);
                if let Some((start, end)) = issue.span {
                    let _ = writeln!(out, "       context: \"{}\"", context(text, start, end));
                }
            }
        }
    }
    out
}

pub fn render_batch_summary(summary: &BatchValidationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Validation complete. Processed {} scenario(s).",
        summary.scenarios_processed
    );
    let _ = writeln!(
        out,
        "Scenarios with errors: {}",
        summary.scenarios_with_errors
    );
    let _ = writeln!(out, "Total errors found: {}", summary.total_errors);
    for (scenario_id, errors) in &summary.scenario_errors {
        let _ = writeln!(out, "  {scenario_id}:");
        for error in errors {
            let _ = writeln!(out, "    - {error}");
        }
    }
    out
}

/// Write any serializable report as pretty-printed JSON, creating parent
/// directories as needed.
pub fn save_json_report<T: Serialize>(report: &T, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

const CONTEXT_WINDOW: usize = 30;

fn context(text: &str, start: usize, end: usize) -> String {
    let from = clamp_boundary(text, start.saturating_sub(CONTEXT_WINDOW), false);
    let to = clamp_boundary(text, (end + CONTEXT_WINDOW).min(text.len()), true);
    let mut snippet = text[from..to].replace(['\n', '\r'], " ");
    if from > 0 {
        snippet = format!("...{snippet}");
    }
    if to < text.len() {
        snippet = format!("{snippet}...");
    }
    snippet
}

fn clamp_boundary(text: &str, mut index: usize, forward: bool) -> usize {
    while index > 0 && index < text.len() && !text.is_char_boundary(index) {
        if forward {
            index += 1;
        } else {
            index -= 1;
        }
    }
    index.min(text.len())
}
