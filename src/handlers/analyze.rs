//! Forensic analysis handler

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::models::{AnomalyInsight, RecommendedRule};
use crate::{AppError, AppResult, AppState};

/// Run forensic analysis on one buffered log.
///
/// The external call never surfaces an error to the client; failures come
/// back as the canned fallback insight. The suggested rule is recorded as a
/// pending entry in the rule list for later review.
pub async fn run(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AnomalyInsight>> {
    let log = state
        .store
        .get(id)
        .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))?;

    let insight = state.forensics.analyze(&log).await;

    if !insight.suggested_rule.is_empty() {
        let rule = state
            .store
            .add_rule(RecommendedRule::from_insight(&log, &insight));
        tracing::info!("Recorded pending rule {} for log {}", rule.id, log.id);
    }

    Ok(Json(insight))
}
