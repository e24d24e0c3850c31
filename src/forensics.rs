//! Forensic analysis client
//!
//! Forwards one traffic log to the Gemini generateContent API with a fixed
//! prompt and a JSON response schema. Every failure path (missing key,
//! network, bad status, unparseable body) degrades to the same canned
//! fallback insight so the dashboard never blocks on the external service.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::models::{AnomalyInsight, TrafficLog};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Confidence reported when the external call fails.
const FALLBACK_CONFIDENCE: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum ForensicsError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Server(u16),
    #[error("empty response from model")]
    EmptyResponse,
    #[error("unparseable model output: {0}")]
    Parse(#[from] serde_json::Error),
}

// Wire types for generateContent

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

pub struct ForensicsClient {
    api_key: Option<String>,
    model: String,
    http_client: reqwest::Client,
}

impl ForensicsClient {
    pub fn new(config: &Config) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            http_client,
        }
    }

    /// Analyze one log. Never fails: external errors yield the fallback.
    pub async fn analyze(&self, log: &TrafficLog) -> AnomalyInsight {
        match self.request_insight(log).await {
            Ok(insight) => insight,
            Err(e) => {
                tracing::warn!("Forensic analysis failed for {}: {}", log.id, e);
                fallback_insight(log)
            }
        }
    }

    async fn request_insight(&self, log: &TrafficLog) -> Result<AnomalyInsight, ForensicsError> {
        let api_key = self.api_key.as_ref().ok_or(ForensicsError::MissingApiKey)?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, self.model, api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(log),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: insight_schema(),
            },
        };

        let response = self.http_client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ForensicsError::Server(response.status().as_u16()));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim())
            .filter(|t| !t.is_empty())
            .ok_or(ForensicsError::EmptyResponse)?;

        let insight: AnomalyInsight = serde_json::from_str(text)?;
        Ok(insight)
    }
}

/// Fixed prompt template for the forensic assessment.
fn build_prompt(log: &TrafficLog) -> String {
    format!(
        "Analyze this suspicious network traffic log and provide a security assessment.\n\n\
         LOG DATA:\n\
         Timestamp: {}\n\
         Source IP: {}\n\
         Method: {}\n\
         Path: {}\n\
         User-Agent: {}\n\
         Payload: {}\n\
         ML Anomaly Score: {}\n\n\
         Please provide:\n\
         1. A clear explanation of why this is considered an anomaly (Explainable AI).\n\
         2. A recommended ModSecurity WAF rule to block similar traffic.\n\
         3. A confidence score for this analysis.\n\
         4. A reasoning vector: a list of short descriptive strings representing behavioral features identified.",
        log.timestamp.to_rfc3339(),
        log.source_ip,
        log.method,
        log.path,
        log.user_agent,
        log.payload,
        log.score,
    )
}

/// JSON response schema the model is constrained to.
fn insight_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "explanation": {
                "type": "STRING",
                "description": "Detailed explanation of the anomaly behavior."
            },
            "suggestedRule": {
                "type": "STRING",
                "description": "WAF rule syntax for mitigation."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Probability score (0-1)."
            },
            "reasoningVector": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Key behavioral features triggered."
            }
        },
        "required": ["explanation", "suggestedRule", "confidence", "reasoningVector"]
    })
}

/// Canned insight returned when the external call is unavailable.
pub fn fallback_insight(log: &TrafficLog) -> AnomalyInsight {
    AnomalyInsight {
        explanation: "Failed to generate real-time insight. Behavior indicates potential injection or pattern mismatch.".to_string(),
        suggested_rule: format!(
            "SecRule REQUEST_URI \"@contains {}\" \"id:1001,phase:1,deny,status:403\"",
            log.path
        ),
        confidence: FALLBACK_CONFIDENCE,
        reasoning_vector: vec![
            "Fallback triggered".to_string(),
            "Analysis error".to_string(),
        ],
    }
}
