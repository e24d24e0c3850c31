//! In-memory state
//!
//! Bounded recent-history buffer for traffic logs plus the WAF rule list.
//! Nothing here survives a restart; durable storage is out of scope for the
//! demo.

use std::collections::VecDeque;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{
    Feedback, LogFilter, PerformanceMetrics, RecommendedRule, RuleStatus, TrafficLog,
};

/// Why a feedback write was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackError {
    /// No record with that id in the buffer.
    NotFound,
    /// Feedback is set-once; the record already carries a verdict.
    AlreadySet,
}

pub struct Store {
    capacity: usize,
    logs: RwLock<VecDeque<TrafficLog>>,
    rules: RwLock<Vec<RecommendedRule>>,
}

impl Store {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            logs: RwLock::new(VecDeque::with_capacity(capacity)),
            rules: RwLock::new(seed_rules()),
        }
    }

    pub fn len(&self) -> usize {
        self.logs.read().len()
    }

    /// Push one record, newest first. Oldest records drop past capacity.
    pub fn push(&self, log: TrafficLog) {
        let mut logs = self.logs.write();
        logs.push_front(log);
        logs.truncate(self.capacity);
    }

    /// Bulk-add caller-supplied records. Returns how many were accepted.
    pub fn import(&self, batch: Vec<TrafficLog>) -> usize {
        let mut logs = self.logs.write();
        let count = batch.len().min(self.capacity);
        for log in batch {
            logs.push_front(log);
        }
        logs.truncate(self.capacity);
        count
    }

    /// List records newest first, applying optional type/severity filters.
    pub fn list(&self, filter: &LogFilter) -> Vec<TrafficLog> {
        let logs = self.logs.read();
        logs.iter()
            .filter(|l| filter.traffic_type.map_or(true, |t| l.traffic_type == t))
            .filter(|l| filter.severity.map_or(true, |s| l.severity == s))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: Uuid) -> Option<TrafficLog> {
        self.logs.read().iter().find(|l| l.id == id).cloned()
    }

    /// Attach a reviewer verdict to a record, exactly once.
    pub fn set_feedback(&self, id: Uuid, feedback: Feedback) -> Result<TrafficLog, FeedbackError> {
        let mut logs = self.logs.write();
        let log = logs
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(FeedbackError::NotFound)?;

        if log.feedback.is_some() {
            return Err(FeedbackError::AlreadySet);
        }

        log.feedback = Some(feedback);
        Ok(log.clone())
    }

    // Rule workflow

    pub fn list_rules(&self) -> Vec<RecommendedRule> {
        self.rules.read().clone()
    }

    pub fn add_rule(&self, rule: RecommendedRule) -> RecommendedRule {
        self.rules.write().push(rule.clone());
        rule
    }

    pub fn set_rule_status(&self, id: Uuid, status: RuleStatus) -> Option<RecommendedRule> {
        let mut rules = self.rules.write();
        let rule = rules.iter_mut().find(|r| r.id == id)?;
        rule.status = status;
        Some(rule.clone())
    }

    pub fn remove_rule(&self, id: Uuid) -> bool {
        let mut rules = self.rules.write();
        let before = rules.len();
        rules.retain(|r| r.id != id);
        rules.len() < before
    }

    /// Derive dashboard benchmarks from the buffered window.
    ///
    /// Accuracy and false-positive rate only count threat records a reviewer
    /// has ruled on; with no reviewed records both are zero.
    pub fn metrics(&self) -> PerformanceMetrics {
        let logs = self.logs.read();

        let mut reviewed = 0usize;
        let mut confirmed = 0usize;
        let mut total_latency = 0u64;

        for log in logs.iter() {
            total_latency += u64::from(log.response_time);
            if log.traffic_type.is_threat() {
                match log.feedback {
                    Some(Feedback::Confirmed) => {
                        reviewed += 1;
                        confirmed += 1;
                    }
                    Some(Feedback::FalsePositive) => reviewed += 1,
                    None => {}
                }
            }
        }

        let detection_accuracy = if reviewed > 0 {
            confirmed as f64 / reviewed as f64
        } else {
            0.0
        };

        let throughput = match (logs.front(), logs.back()) {
            (Some(newest), Some(oldest)) if logs.len() > 1 => {
                let span = (newest.timestamp - oldest.timestamp)
                    .num_milliseconds()
                    .max(1) as f64
                    / 1000.0;
                logs.len() as f64 / span
            }
            _ => 0.0,
        };

        let avg_latency = if logs.is_empty() {
            0.0
        } else {
            total_latency as f64 / logs.len() as f64
        };

        PerformanceMetrics {
            detection_accuracy,
            false_positive_rate: if reviewed > 0 {
                1.0 - detection_accuracy
            } else {
                0.0
            },
            throughput,
            avg_latency,
        }
    }
}

/// Illustrative rules present on first boot.
fn seed_rules() -> Vec<RecommendedRule> {
    vec![
        RecommendedRule {
            id: Uuid::new_v4(),
            original_threat_id: "TX-4452".to_string(),
            name: "SQL Injection Prevention (ML-Gen)".to_string(),
            description: "Automated rule preventing specific UNION SELECT pattern found in log TX-4452.".to_string(),
            rule_content: "SecRule REQUEST_COOKIES|!REQUEST_COOKIES:/__utm/|REQUEST_COOKIES_NAMES|REQUEST_HEADERS:User-Agent|REQUEST_HEADERS:Referer|ARGS_NAMES|ARGS|XML:/* \"@detectSQLi\" \"id:10001,phase:2,block,t:none,t:utf8toUnicode,t:urlDecodeUni,t:removeNulls,t:removeWhitespace,msg:'SQL Injection Attempt'\"".to_string(),
            status: RuleStatus::Deployed,
        },
        RecommendedRule {
            id: Uuid::new_v4(),
            original_threat_id: "TX-4458".to_string(),
            name: "XSS Filter (Baseline Deviation)".to_string(),
            description: "Blocked script tags in query parameters that deviated from standard JSON pattern.".to_string(),
            rule_content: "SecRule ARGS \"@rx <script\" \"id:10002,phase:2,deny,status:403\"".to_string(),
            status: RuleStatus::Approved,
        },
    ]
}
