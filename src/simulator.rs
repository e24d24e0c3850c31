//! Synthetic traffic generator
//!
//! Produces plausible-looking `TrafficLog` records for demo mode. This is a
//! cosmetic randomizer, not a model: fields are drawn independently and the
//! only invariant is that the anomaly score stays inside the sub-range fixed
//! by the assigned traffic type.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::models::{HttpMethod, ThreatSeverity, TrafficLog, TrafficType};

const IP_POOL: [&str; 5] = [
    "192.168.1.45",
    "10.0.0.12",
    "172.16.254.1",
    "203.0.113.5",
    "8.8.8.8",
];

const PATHS: [&str; 6] = [
    "/api/v1/user",
    "/login",
    "/products",
    "/search",
    "/checkout",
    "/admin/config",
];

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
    "PostmanRuntime/7.29.2",
    "python-requests/2.28.1",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X)",
];

const METHODS: [HttpMethod; 4] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
];

/// Probability that a generated record is marked as a threat.
const THREAT_PROBABILITY: f64 = 0.15;

/// Extra response latency applied to threat records, in milliseconds.
const THREAT_LATENCY_PENALTY_MS: u32 = 120;

/// Generate one synthetic traffic record.
pub fn generate() -> TrafficLog {
    let mut rng = rand::thread_rng();

    let is_threat = rng.gen::<f64>() < THREAT_PROBABILITY;

    let (traffic_type, severity, payload, score) = if is_threat {
        // Uniform over the four demo attack scenarios
        match rng.gen_range(0..4) {
            0 => (
                TrafficType::Anomaly,
                ThreatSeverity::High,
                "SELECT * FROM users WHERE id=1 OR 1=1;--".to_string(),
                0.82 + rng.gen::<f64>() * 0.15,
            ),
            1 => (
                TrafficType::ApiAbuse,
                ThreatSeverity::Medium,
                "Rate limit deviation: 500 req/sec".to_string(),
                0.65 + rng.gen::<f64>() * 0.10,
            ),
            2 => (
                TrafficType::Bot,
                ThreatSeverity::High,
                "Automated credential stuffing pattern".to_string(),
                0.75 + rng.gen::<f64>() * 0.15,
            ),
            _ => (
                TrafficType::ZeroDay,
                ThreatSeverity::Critical,
                "\\x41\\x41\\x41\\x41 buffer overflow pattern".to_string(),
                0.94 + rng.gen::<f64>() * 0.05,
            ),
        }
    } else {
        (
            TrafficType::Legitimate,
            ThreatSeverity::Low,
            String::new(),
            rng.gen::<f64>() * 0.25,
        )
    };

    let response_time = rng.gen_range(0..50)
        + if is_threat { THREAT_LATENCY_PENALTY_MS } else { 0 };

    // Most threats are blocked at the edge, some slip through as 200s
    let status = if is_threat && rng.gen::<f64>() < 0.7 { 403 } else { 200 };

    let now = Utc::now();

    TrafficLog {
        id: Uuid::new_v4(),
        timestamp: now,
        source_ip: IP_POOL[rng.gen_range(0..IP_POOL.len())].to_string(),
        method: METHODS[rng.gen_range(0..METHODS.len())],
        path: PATHS[rng.gen_range(0..PATHS.len())].to_string(),
        user_agent: USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())].to_string(),
        payload,
        response_time,
        status,
        traffic_type,
        severity,
        score,
        is_encrypted: true,
        decrypted_at: Some(now),
        feedback: None,
    }
}

/// Generate a batch of records, newest last.
pub fn generate_batch(count: usize) -> Vec<TrafficLog> {
    (0..count).map(|_| generate()).collect()
}
