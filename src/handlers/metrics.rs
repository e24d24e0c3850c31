//! Performance metrics handler

use axum::{extract::State, Json};

use crate::models::PerformanceMetrics;
use crate::AppState;

/// Benchmarks derived from the buffered window
pub async fn get(State(state): State<AppState>) -> Json<PerformanceMetrics> {
    Json(state.store.metrics())
}
