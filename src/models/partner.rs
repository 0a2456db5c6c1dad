use serde::{Deserialize, Serialize};

/// Outcome of normalizing one raw partner mention
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedPartner {
    pub raw: String,
    /// `None` when the mention was discarded as noise
    pub canonical: Option<String>,
}

/// POST body for the partner audit endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerAuditRequest {
    #[serde(default)]
    pub names: Vec<String>,
}

/// Data-quality summary over a batch of raw partner mentions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartnerAudit {
    pub results: Vec<NormalizedPartner>,
    pub kept: usize,
    pub discarded: usize,
    /// Distinct canonical names produced, sorted
    pub canonical_names: Vec<String>,
}
