//! Traffic log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification assigned to a simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficType {
    Legitimate,
    Anomaly,
    ZeroDay,
    Bot,
    ApiAbuse,
}

impl TrafficType {
    pub fn is_threat(&self) -> bool {
        !matches!(self, TrafficType::Legitimate)
    }
}

impl std::fmt::Display for TrafficType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TrafficType::Legitimate => "LEGITIMATE",
            TrafficType::Anomaly => "ANOMALY",
            TrafficType::ZeroDay => "ZERO_DAY",
            TrafficType::Bot => "BOT",
            TrafficType::ApiAbuse => "API_ABUSE",
        })
    }
}

/// Coarse human-facing priority tag, independent of the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// Reviewer verdict on a flagged record. Set at most once per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feedback {
    Confirmed,
    FalsePositive,
}

/// One simulated HTTP request record.
///
/// Immutable once created except for `feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub method: HttpMethod,
    pub path: String,
    pub user_agent: String,
    pub payload: String,
    /// Simulated server response time in milliseconds.
    pub response_time: u32,
    pub status: u16,
    #[serde(rename = "type")]
    pub traffic_type: TrafficType,
    pub severity: ThreatSeverity,
    /// Anomaly score in [0, 1]; its range is fixed by the traffic type.
    pub score: f64,
    pub is_encrypted: bool,
    /// Simulation of TLS termination time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decrypted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

/// Body of `PATCH /api/logs/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateFeedback {
    pub feedback: Feedback,
}

/// Query filters for `GET /api/logs`.
#[derive(Debug, Default, Deserialize)]
pub struct LogFilter {
    #[serde(rename = "type")]
    pub traffic_type: Option<TrafficType>,
    pub severity: Option<ThreatSeverity>,
    pub limit: Option<usize>,
}
