use crate::validation::Severity;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// A vague legal reference to flag, with the severity it carries.
///
/// Critical is reserved for phrases that name a specific-sounding statute
/// without any numeric backing; Major covers generic category references.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VagueRule {
    pub phrase: String,
    pub severity: Severity,
}

/// Externally configurable phrase lists driving the heuristic scans.
///
/// The lists are data, not control flow: new phrases can be added through a
/// rules file without code changes. [`RuleSet::builtin`] is the shipped
/// default.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_vague_rules")]
    pub vague: Vec<VagueRule>,
    #[serde(default = "default_invalidating_phrases")]
    pub invalidating: Vec<String>,
}

impl RuleSet {
    pub fn builtin() -> Self {
        Self {
            vague: default_vague_rules(),
            invalidating: default_invalidating_phrases(),
        }
    }

    /// Compile every phrase into a case-insensitive, word-bounded matcher.
    /// Compilation happens once per rule set, not per scanned text.
    pub fn compile(&self) -> Result<CompiledRules, regex::Error> {
        let vague = self
            .vague
            .iter()
            .map(|rule| {
                Ok(CompiledVagueRule {
                    phrase: rule.phrase.clone(),
                    severity: rule.severity,
                    matcher: compile_phrase(&rule.phrase)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        let invalidating = self
            .invalidating
            .iter()
            .map(|phrase| {
                Ok(CompiledPhrase {
                    phrase: phrase.clone(),
                    matcher: compile_phrase(phrase)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(CompiledRules {
            vague,
            invalidating,
        })
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Clone, Debug)]
pub struct CompiledVagueRule {
    pub phrase: String,
    pub severity: Severity,
    pub matcher: Regex,
}

#[derive(Clone, Debug)]
pub struct CompiledPhrase {
    pub phrase: String,
    pub matcher: Regex,
}

#[derive(Clone, Debug)]
pub struct CompiledRules {
    pub vague: Vec<CompiledVagueRule>,
    pub invalidating: Vec<CompiledPhrase>,
}

fn compile_phrase(phrase: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
        .case_insensitive(true)
        .build()
}

fn default_vague_rules() -> Vec<VagueRule> {
    let critical = [
        // Names a statute, cites nothing.
        "ADA requirements",
        "VAWA protections",
        "Section 504",
    ];
    let major = [
        "fair housing laws",
        "state housing laws",
        "housing discrimination laws",
        "tenant rights",
        "disability accommodations",
    ];
    critical
        .iter()
        .map(|p| VagueRule {
            phrase: (*p).to_string(),
            severity: Severity::Critical,
        })
        .chain(major.iter().map(|p| VagueRule {
            phrase: (*p).to_string(),
            severity: Severity::Major,
        }))
        .collect()
}

fn default_invalidating_phrases() -> Vec<String> {
    [
        "you must understand",
        "calm down",
        "you need to",
        "you have to realize",
        "you should have",
        "stop overreacting",
        "it's not a big deal",
        "you're being unreasonable",
    ]
    .iter()
    .map(|p| (*p).to_string())
    .collect()
}
