//! WAF rule model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{AnomalyInsight, TrafficLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Pending,
    Approved,
    Deployed,
}

/// A WAF rule suggested by the forensic engine or created by an operator.
///
/// Rules are never pushed to a real WAF; `status` only tracks the review
/// workflow in the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRule {
    pub id: Uuid,
    /// Display id of the traffic log this rule was derived from.
    pub original_threat_id: String,
    pub name: String,
    pub description: String,
    pub rule_content: String,
    pub status: RuleStatus,
}

impl RecommendedRule {
    /// Build a pending rule from a forensic insight on the given log.
    pub fn from_insight(log: &TrafficLog, insight: &AnomalyInsight) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_threat_id: log.id.to_string(),
            name: format!("{} Mitigation (ML-Gen)", log.traffic_type),
            description: insight.explanation.clone(),
            rule_content: insight.suggested_rule.clone(),
            status: RuleStatus::Pending,
        }
    }
}

/// Body of `POST /api/rules`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub rule_content: String,
    #[serde(default)]
    pub original_threat_id: Option<String>,
}

/// Body of `PUT /api/rules/:id/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateRuleStatus {
    pub status: RuleStatus,
}
