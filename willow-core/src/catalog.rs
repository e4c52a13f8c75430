use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Recognition patterns for one legal instrument.
///
/// `recognized_forms` is ordered preferred-first: index 0 is the canonical
/// citation style, later entries are acceptable variants ("USC" for
/// "U.S.C.", missing section sign) that still resolve to the instrument.
pub struct CitationPattern {
    pub instrument: &'static str,
    pub canonical_label: &'static str,
    pub recognized_forms: Vec<Regex>,
}

/// Process-lifetime table of recognized legal instruments.
pub struct CitationCatalog {
    patterns: Vec<CitationPattern>,
}

impl CitationCatalog {
    /// The built-in catalog, compiled once on first use.
    pub fn builtin() -> &'static CitationCatalog {
        LazyLock::force(&BUILTIN)
    }

    pub fn lookup(&self, instrument: &str) -> Option<&CitationPattern> {
        self.patterns.iter().find(|p| p.instrument == instrument)
    }

    pub fn patterns(&self) -> &[CitationPattern] {
        &self.patterns
    }
}

fn form(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("static citation pattern")
}

fn usc(title: u16, section: &str) -> Vec<Regex> {
    vec![
        form(&format!(
            r"\b{title}\s+U\.?\s?S\.?\s?C\.?\s*§\s*{section}(?:\s+et\s+seq\.?)?"
        )),
        form(&format!(
            r"\b{title}\s+U\.?\s?S\.?\s?C\.?\s+{section}(?:\s+et\s+seq\.?)?"
        )),
    ]
}

static BUILTIN: LazyLock<CitationCatalog> = LazyLock::new(|| CitationCatalog {
    patterns: vec![
        CitationPattern {
            instrument: "fair_housing_act",
            canonical_label: "Fair Housing Act, 42 U.S.C. § 3601 et seq.",
            recognized_forms: usc(42, "3601"),
        },
        CitationPattern {
            instrument: "americans_with_disabilities_act",
            canonical_label: "Americans with Disabilities Act, 42 U.S.C. § 12101 et seq.",
            recognized_forms: usc(42, "12101"),
        },
        CitationPattern {
            instrument: "rehabilitation_act_section_504",
            canonical_label: "Rehabilitation Act § 504, 29 U.S.C. § 794",
            recognized_forms: usc(29, "794"),
        },
        CitationPattern {
            instrument: "violence_against_women_act",
            canonical_label: "Violence Against Women Act, 34 U.S.C. § 12491",
            recognized_forms: usc(34, "12491"),
        },
        CitationPattern {
            instrument: "title_vi_civil_rights_act",
            canonical_label: "Title VI of the Civil Rights Act, 42 U.S.C. § 2000d et seq.",
            recognized_forms: usc(42, "2000d"),
        },
        CitationPattern {
            instrument: "california_feha",
            canonical_label: "California FEHA, Cal. Gov. Code § 12900 et seq.",
            recognized_forms: vec![
                form(r"\bCal(?:ifornia)?\.?\s+Gov(?:ernment)?\.?\s+Code\s*§\s*12900(?:\s+et\s+seq\.?)?"),
                form(r"\bCal(?:ifornia)?\.?\s+Gov(?:ernment)?\.?\s+Code\s+12900(?:\s+et\s+seq\.?)?"),
            ],
        },
        CitationPattern {
            instrument: "california_unruh_act",
            canonical_label: "California Unruh Civil Rights Act, Cal. Civ. Code § 51",
            recognized_forms: vec![
                form(r"\bCal(?:ifornia)?\.?\s+Civ(?:il)?\.?\s+Code\s*§\s*51\b(?:\s+et\s+seq\.?)?"),
                form(r"\bCal(?:ifornia)?\.?\s+Civ(?:il)?\.?\s+Code\s+51\b(?:\s+et\s+seq\.?)?"),
            ],
        },
        CitationPattern {
            instrument: "new_york_shrl",
            canonical_label: "New York State Human Rights Law, N.Y. Exec. Law § 290 et seq.",
            recognized_forms: vec![
                form(r"\b(?:N\.?\s?Y\.?|New\s+York)\s+Exec(?:utive)?\.?\s+Law\s*§\s*290(?:\s+et\s+seq\.?)?"),
                form(r"\b(?:N\.?\s?Y\.?|New\s+York)\s+Exec(?:utive)?\.?\s+Law\s+290(?:\s+et\s+seq\.?)?"),
            ],
        },
        CitationPattern {
            instrument: "illinois_hra",
            canonical_label: "Illinois Human Rights Act, 775 ILCS 5/1-101 et seq.",
            recognized_forms: vec![form(r"\b775\s+ILCS\s+5/1-101(?:\s+et\s+seq\.?)?")],
        },
        CitationPattern {
            instrument: "texas_fair_housing_act",
            canonical_label: "Texas Fair Housing Act, Tex. Prop. Code § 301.001 et seq.",
            recognized_forms: vec![
                form(r"\bTex(?:as)?\.?\s+Prop(?:erty)?\.?\s+Code\s*§\s*301\.001(?:\s+et\s+seq\.?)?"),
                form(r"\bTex(?:as)?\.?\s+Prop(?:erty)?\.?\s+Code\s+301\.001(?:\s+et\s+seq\.?)?"),
            ],
        },
        CitationPattern {
            instrument: "code_of_federal_regulations",
            canonical_label: "Code of Federal Regulations",
            recognized_forms: vec![
                form(r"\b\d{1,2}\s+C\.?\s?F\.?\s?R\.?\s*§\s*\d+(?:\.\d+)*"),
                form(r"\b\d{1,2}\s+C\.?\s?F\.?\s?R\.?\s+Part\s+\d+(?:,\s*Subpart\s+[A-Z])?"),
                form(r"\b\d{1,2}\s+C\.?\s?F\.?\s?R\.?\s+\d+\.\d+(?:\.\d+)*"),
            ],
        },
        CitationPattern {
            instrument: "public_law",
            canonical_label: "Public Law",
            recognized_forms: vec![
                form(r"\bPub\.\s?L\.\s?(?:No\.?\s?)?\d{1,3}-\d{1,4}"),
                form(r"\bPublic\s+Law\s+(?:No\.?\s+)?\d{1,3}[-\s]\d{1,4}"),
            ],
        },
    ],
});
