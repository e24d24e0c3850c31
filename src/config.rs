//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the built front end
    pub static_dir: String,

    /// Recent-history buffer capacity
    pub log_capacity: usize,

    /// Seconds between generated records
    pub tick_interval_secs: u64,

    /// Gemini API key; absent means forensics always falls back
    pub gemini_api_key: Option<String>,

    /// Gemini model used for forensic analysis
    pub gemini_model: String,

    /// Outbound request timeout in seconds
    pub gemini_timeout_secs: u64,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),

            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "dist".to_string()),

            log_capacity: env::var("LOG_CAPACITY")
                .ok()
                .and_then(|c| c.parse().ok())
                .unwrap_or(200),

            tick_interval_secs: env::var("TICK_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),

            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),

            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-3-pro-preview".to_string()),

            gemini_timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Fixed configuration for tests: no API key, small buffer, no disk I/O.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            port: 0,
            static_dir: "dist".to_string(),
            log_capacity: 50,
            tick_interval_secs: 3,
            gemini_api_key: None,
            gemini_model: "gemini-3-pro-preview".to_string(),
            gemini_timeout_secs: 5,
            environment: "test".to_string(),
        }
    }
}
