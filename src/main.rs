//! Sentinel SOC Demo Backend
//!
//! Single-binary server behind the Sentinel dashboard: generates simulated
//! web-traffic logs on a timer, keeps them in a bounded in-memory buffer,
//! exposes them over a REST API, forwards individual records to a
//! generative-language API for a mocked forensic explanation plus WAF rule
//! suggestion, and serves the built front end with SPA fallback.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    SENTINEL SERVER                      │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌──────────────────┐ │
//! │  │  API      │  │  Traffic     │  │  Forensics       │ │
//! │  │  Gateway  │  │  Engine      │  │  Client          │ │
//! │  │  (Axum)   │  │  (Timer)     │  │  (Gemini)        │ │
//! │  └─────┬─────┘  └──────┬───────┘  └────────┬─────────┘ │
//! │        └───────────────┼───────────────────┘            │
//! │                        ▼                                │
//! │               ┌──────────────────┐                     │
//! │               │  In-Memory Store │                     │
//! │               │  (bounded ring)  │                     │
//! │               └──────────────────┘                     │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod forensics;
mod handlers;
mod models;
mod simulator;
mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("Sentinel server starting...");
    tracing::info!(
        "Forensics: {}",
        if config.gemini_api_key.is_some() {
            "enabled"
        } else {
            "fallback only (no API key)"
        }
    );

    // Build application state
    let store = Arc::new(store::Store::new(config.log_capacity));
    let forensics = Arc::new(forensics::ForensicsClient::new(&config));
    let state = AppState {
        store: store.clone(),
        forensics,
        config: config.clone(),
    };

    // Warm the buffer so the dashboard has data on first paint
    store.import(simulator::generate_batch(5));

    // Background traffic engine
    spawn_traffic_engine(store, config.tick_interval_secs);

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::Store>,
    pub forensics: Arc<forensics::ForensicsClient>,
    pub config: config::Config,
}

/// Periodically push one generated record into the buffer.
fn spawn_traffic_engine(store: Arc<store::Store>, interval_secs: u64) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            tick.tick().await;
            let log = simulator::generate();
            tracing::debug!(
                "Generated {:?} traffic from {} ({:.2})",
                log.traffic_type,
                log.source_ip,
                log.score
            );
            store.push(log);
        }
    });
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        // Traffic logs
        .route("/api/logs", get(handlers::logs::list))
        .route("/api/logs/import", post(handlers::logs::import))
        .route("/api/logs/:id", get(handlers::logs::get))
        .route("/api/logs/:id", patch(handlers::logs::update_feedback))
        // Forensic analysis
        .route("/api/analyze/:id", post(handlers::analyze::run))
        // WAF rules
        .route("/api/rules", get(handlers::rules::list))
        .route("/api/rules", post(handlers::rules::create))
        .route("/api/rules/:id/status", put(handlers::rules::update_status))
        .route("/api/rules/:id", delete(handlers::rules::delete))
        // Metrics
        .route("/api/metrics", get(handlers::metrics::get));

    // Unmatched non-API routes fall through to the app shell
    let static_dir = PathBuf::from(&state.config.static_dir);
    let spa = ServeDir::new(&static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(api_routes)
        .fallback_service(spa)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::models::{Feedback, TrafficType};

    fn test_state() -> (AppState, Arc<store::Store>) {
        let config = config::Config::for_tests();
        let store = Arc::new(store::Store::new(config.log_capacity));
        let forensics = Arc::new(forensics::ForensicsClient::new(&config));
        let state = AppState {
            store: store.clone(),
            forensics,
            config,
        };
        (state, store)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_list_logs_newest_first() {
        let (state, store) = test_state();
        let older = simulator::generate();
        let newer = simulator::generate();
        let newer_id = newer.id;
        store.push(older);
        store.push(newer);

        let app = create_router(state);
        let response = app
            .oneshot(Request::get("/api/logs").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let logs = json.as_array().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0]["id"], newer_id.to_string());
    }

    #[tokio::test]
    async fn test_list_logs_type_filter() {
        let (state, store) = test_state();
        let mut threat = simulator::generate();
        threat.traffic_type = TrafficType::ZeroDay;
        store.push(threat);
        let mut legit = simulator::generate();
        legit.traffic_type = TrafficType::Legitimate;
        store.push(legit);

        let app = create_router(state);
        let response = app
            .oneshot(
                Request::get("/api/logs?type=ZERO_DAY")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(response).await;
        let logs = json.as_array().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0]["type"], "ZERO_DAY");
    }

    #[tokio::test]
    async fn test_patch_unknown_log_is_404() {
        let (state, _) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/logs/{}", uuid::Uuid::new_v4()),
                serde_json::json!({"feedback": "CONFIRMED"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_feedback_is_set_once() {
        let (state, store) = test_state();
        let log = simulator::generate();
        let id = log.id;
        store.push(log);

        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "PATCH",
                &format!("/api/logs/{}", id),
                serde_json::json!({"feedback": "FALSE_POSITIVE"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["feedback"], "FALSE_POSITIVE");
        assert_eq!(
            store.get(id).unwrap().feedback,
            Some(Feedback::FalsePositive)
        );

        // Second verdict on the same record is rejected
        let response = app
            .oneshot(json_request(
                "PATCH",
                &format!("/api/logs/{}", id),
                serde_json::json!({"feedback": "CONFIRMED"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_analyze_unknown_log_is_404() {
        let (state, _) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::post(format!("/api/analyze/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_analyze_without_key_returns_fallback() {
        let (state, store) = test_state();
        let log = simulator::generate();
        let id = log.id;
        let path = log.path.clone();
        store.push(log);

        let app = create_router(state);
        let response = app
            .oneshot(
                Request::post(format!("/api/analyze/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["confidence"], 0.5);
        assert!(json["suggestedRule"].as_str().unwrap().contains(&path));
        assert!(json["explanation"].as_str().is_some());
        assert_eq!(json["reasoningVector"].as_array().unwrap().len(), 2);

        // The suggestion lands in the rule list as pending
        let rules = store.list_rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[2].original_threat_id, id.to_string());
    }

    #[tokio::test]
    async fn test_rule_crud() {
        let (state, _) = test_state();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/rules",
                serde_json::json!({
                    "name": "Manual Block",
                    "ruleContent": "SecRule ARGS \"@rx curl\" \"id:10003,deny\""
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let created = body_json(response).await;
        assert_eq!(created["status"], "PENDING");
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/rules/{}/status", id),
                serde_json::json!({"status": "DEPLOYED"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "DEPLOYED");

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/rules/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::delete(format!("/api/rules/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rule_validation() {
        let (state, _) = test_state();
        let app = create_router(state);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/rules",
                serde_json::json!({"name": "", "ruleContent": "x"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_import_logs() {
        let (state, _) = test_state();
        let app = create_router(state);

        let batch = serde_json::to_value(simulator::generate_batch(3)).unwrap();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/logs/import", batch))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["imported"], 3);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/logs/import",
                serde_json::json!([]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let (state, store) = test_state();
        store.push(simulator::generate());

        let app = create_router(state);
        let response = app
            .oneshot(Request::get("/api/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        for field in [
            "detectionAccuracy",
            "falsePositiveRate",
            "throughput",
            "avgLatency",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
    }

    #[tokio::test]
    async fn test_spa_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>sentinel</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('ok')").unwrap();

        let (mut state, _) = test_state();
        state.config.static_dir = dir.path().to_string_lossy().to_string();
        let app = create_router(state);

        // Existing asset is served directly
        let response = app
            .clone()
            .oneshot(Request::get("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Unmatched non-API route returns the app shell
        let response = app
            .oneshot(
                Request::get("/anomalies/some/route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&bytes).contains("sentinel"));
    }
}
