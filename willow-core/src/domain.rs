use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub type ScenarioId = String;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VulnerabilityContext {
    pub primary: Option<String>,
    #[serde(default)]
    pub intersectional: Vec<String>,
    pub trauma_history: Option<String>,
}

/// Statutory grounding per jurisdiction level, ordered as authored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LegalBasis {
    #[serde(default)]
    pub federal: Vec<String>,
    #[serde(default)]
    pub state: Vec<String>,
    #[serde(default)]
    pub local: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GoldenRatioStructure {
    pub emotional_validation: Option<String>,
    pub concrete_action: Option<String>,
    pub accountability_mechanism: Option<String>,
    pub proof_statement: Option<String>,
    pub realistic_boundary: Option<String>,
    pub closing_statement: Option<String>,
    #[serde(default)]
    pub closure_variants: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ResponseScripts {
    pub professional: Option<String>,
    pub empathetic: Option<String>,
    pub legal: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConflictResolution {
    #[serde(default)]
    pub common_objections: Vec<String>,
    #[serde(default)]
    pub response_scripts: ResponseScripts,
    #[serde(default)]
    pub escalation_path: Vec<String>,
    #[serde(default)]
    pub denial_grounds: Vec<String>,
    pub appeal_process: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TraumaInformedCare {
    #[serde(default)]
    pub triggers_to_avoid: Vec<String>,
    #[serde(default)]
    pub communication_style: Vec<String>,
    #[serde(default)]
    pub safety_considerations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccessibilityFeatures {
    #[serde(default)]
    pub communication: Vec<String>,
    #[serde(default)]
    pub physical: Vec<String>,
    #[serde(default)]
    pub technological: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TenantRights {
    #[serde(default)]
    pub right_to_modify: bool,
    #[serde(default)]
    pub right_to_accommodation: bool,
    #[serde(default)]
    pub right_to_privacy: bool,
    #[serde(default)]
    pub right_to_nondiscrimination: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    pub created_at: String,
    pub last_updated: String,
    pub validation_status: String,
}

/// One record of the dataset: a housing-conflict case with legal, emotional,
/// and procedural content. Sub-structures the dataset legitimately omits are
/// optional; unknown keys are preserved in `extra`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: ScenarioId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub vulnerabilities: Vec<String>,
    pub vulnerability_context: Option<VulnerabilityContext>,
    pub urgency_level: Option<UrgencyLevel>,
    pub legal_basis: Option<LegalBasis>,
    pub golden_ratio_structure: Option<GoldenRatioStructure>,
    pub conflict_resolution: Option<ConflictResolution>,
    pub trauma_informed_care: Option<TraumaInformedCare>,
    pub accessibility_features: Option<AccessibilityFeatures>,
    pub tenant_rights: Option<TenantRights>,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub metadata: Option<ScenarioMetadata>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Scenario {
    /// Parse the wire shape into the typed model. Structural gaps surface as
    /// a serde error; use [`crate::schema::SchemaValidator`] first when the
    /// full accumulated error list is wanted instead.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
