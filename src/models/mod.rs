//! Data models

pub mod insight;
pub mod metrics;
pub mod rule;
pub mod traffic;

pub use insight::AnomalyInsight;
pub use metrics::PerformanceMetrics;
pub use rule::{CreateRuleRequest, RecommendedRule, RuleStatus, UpdateRuleStatus};
pub use traffic::{
    Feedback, HttpMethod, LogFilter, ThreatSeverity, TrafficLog, TrafficType, UpdateFeedback,
};
