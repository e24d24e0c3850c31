//! Traffic log handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{LogFilter, TrafficLog, UpdateFeedback};
use crate::store::FeedbackError;
use crate::{AppError, AppResult, AppState};

/// Response for a bulk import
#[derive(Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub buffered: usize,
}

/// List buffered logs, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<LogFilter>,
) -> Json<Vec<TrafficLog>> {
    Json(state.store.list(&filter))
}

/// Get a single log
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TrafficLog>> {
    let log = state
        .store
        .get(id)
        .ok_or_else(|| AppError::NotFound("Log not found".to_string()))?;

    Ok(Json(log))
}

/// Bulk-import caller-supplied logs
pub async fn import(
    State(state): State<AppState>,
    Json(batch): Json<Vec<TrafficLog>>,
) -> AppResult<Json<ImportResponse>> {
    if batch.is_empty() {
        return Err(AppError::ValidationError("Empty log batch".to_string()));
    }

    let imported = state.store.import(batch);
    tracing::info!("Imported {} logs", imported);

    Ok(Json(ImportResponse {
        imported,
        buffered: state.store.len(),
    }))
}

/// Attach reviewer feedback to a log
pub async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFeedback>,
) -> AppResult<Json<TrafficLog>> {
    let log = state
        .store
        .set_feedback(id, req.feedback)
        .map_err(|e| match e {
            FeedbackError::NotFound => AppError::NotFound("Log not found".to_string()),
            FeedbackError::AlreadySet => {
                AppError::AlreadyExists("Feedback already recorded".to_string())
            }
        })?;

    tracing::info!("Feedback recorded for log {}: {:?}", id, req.feedback);

    Ok(Json(log))
}
