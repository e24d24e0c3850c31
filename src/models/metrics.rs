//! Dashboard performance metrics

use serde::{Deserialize, Serialize};

/// Aggregate benchmark numbers derived from the recent-history buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Fraction of reviewed threat records confirmed by a reviewer.
    pub detection_accuracy: f64,
    /// Fraction of reviewed threat records marked false positive.
    pub false_positive_rate: f64,
    /// Records per second across the buffered window.
    pub throughput: f64,
    /// Mean simulated response time in milliseconds.
    pub avg_latency: f64,
}
