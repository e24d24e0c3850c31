//! Forensic analysis result

use serde::{Deserialize, Serialize};

/// Result of one forensic analysis of a traffic log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyInsight {
    /// Explanation of why the record is considered anomalous.
    pub explanation: String,
    /// ModSecurity rule suggested to block similar traffic.
    pub suggested_rule: String,
    /// Confidence in [0, 1] for this analysis.
    pub confidence: f64,
    /// Short behavioral feature labels, decorative only.
    pub reasoning_vector: Vec<String>,
}
