use crate::catalog::CitationCatalog;
use crate::rules::{CompiledRules, RuleSet};
use crate::validation::{Severity, ValidationIssue, ValidationResult};

/// Scans free text for statutory citations and vague legal references.
///
/// Recognition is purely lexical: the validator checks citation form and
/// presence against the catalog, not legal correctness.
pub struct LegalCitationValidator {
    catalog: &'static CitationCatalog,
    rules: CompiledRules,
}

struct SpanMatch {
    start: usize,
    end: usize,
    instrument: &'static str,
    canonical_label: &'static str,
    preferred_form: bool,
}

impl LegalCitationValidator {
    pub fn new() -> Self {
        Self::with_rules(&RuleSet::builtin()).expect("built-in rules compile")
    }

    pub fn with_rules(rules: &RuleSet) -> Result<Self, regex::Error> {
        Ok(Self {
            catalog: CitationCatalog::builtin(),
            rules: rules.compile()?,
        })
    }

    /// Find every citation-like span and vague phrase in `text`, in source
    /// order. Zero citation-like content yields an empty vector; the scan
    /// never fails for any input string.
    pub fn validate_text(&self, text: &str) -> Vec<ValidationResult> {
        let citations = self.citation_spans(text);

        let mut results: Vec<((usize, usize), ValidationResult)> = citations
            .iter()
            .map(|m| {
                let mut issues = Vec::new();
                if !m.preferred_form {
                    issues.push(
                        ValidationIssue::new(
                            Severity::Info,
                            "citation.nonpreferred_form",
                            format!(
                                "acceptable but non-preferred citation form; prefer \"{}\"",
                                m.canonical_label
                            ),
                        )
                        .with_span(m.start, m.end),
                    );
                }
                (
                    (m.start, m.end),
                    ValidationResult::new(
                        &text[m.start..m.end],
                        Some(m.instrument.to_string()),
                        issues,
                    ),
                )
            })
            .collect();

        // Vague-phrase scan runs independently, but a span that already
        // matched a valid citation is never also flagged as vague.
        for rule in &self.rules.vague {
            for found in rule.matcher.find_iter(text) {
                let overlaps = citations
                    .iter()
                    .any(|m| found.start() < m.end && m.start < found.end());
                if overlaps {
                    continue;
                }
                let message = match rule.severity {
                    Severity::Critical => format!(
                        "\"{}\" names a legal protection without a statutory citation; cite the specific statute or regulation",
                        rule.phrase
                    ),
                    _ => format!(
                        "\"{}\" is a generic legal reference; cite the specific statute or regulation",
                        rule.phrase
                    ),
                };
                let issue = ValidationIssue::new(rule.severity, "citation.vague", message)
                    .with_span(found.start(), found.end());
                results.push((
                    (found.start(), found.end()),
                    ValidationResult::new(found.as_str(), None, vec![issue]),
                ));
            }
        }

        results.sort_by_key(|(span, _)| *span);
        results.into_iter().map(|(_, r)| r).collect()
    }

    /// Non-overlapping catalog matches, earliest-then-longest wins. A span
    /// matched by both the preferred and a variant form is reported once,
    /// as the preferred form.
    fn citation_spans(&self, text: &str) -> Vec<SpanMatch> {
        let mut candidates: Vec<SpanMatch> = Vec::new();
        for pattern in self.catalog.patterns() {
            for (idx, matcher) in pattern.recognized_forms.iter().enumerate() {
                for found in matcher.find_iter(text) {
                    candidates.push(SpanMatch {
                        start: found.start(),
                        end: found.end(),
                        instrument: pattern.instrument,
                        canonical_label: pattern.canonical_label,
                        preferred_form: idx == 0,
                    });
                }
            }
        }

        candidates.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then(b.end.cmp(&a.end))
                .then(b.preferred_form.cmp(&a.preferred_form))
        });

        let mut kept: Vec<SpanMatch> = Vec::new();
        for candidate in candidates {
            let overlaps = kept
                .iter()
                .any(|m| candidate.start < m.end && m.start < candidate.end);
            if !overlaps {
                kept.push(candidate);
            }
        }
        kept
    }
}

impl Default for LegalCitationValidator {
    fn default() -> Self {
        Self::new()
    }
}
