//! WAF rule handlers

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateRuleRequest, RecommendedRule, RuleStatus, UpdateRuleStatus};
use crate::{AppError, AppResult, AppState};

/// List all rules
pub async fn list(State(state): State<AppState>) -> Json<Vec<RecommendedRule>> {
    Json(state.store.list_rules())
}

/// Create a manual rule
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRuleRequest>,
) -> AppResult<Json<RecommendedRule>> {
    req.validate()?;

    let rule = state.store.add_rule(RecommendedRule {
        id: Uuid::new_v4(),
        original_threat_id: req.original_threat_id.unwrap_or_else(|| "MANUAL".to_string()),
        name: req.name,
        description: req.description,
        rule_content: req.rule_content,
        status: RuleStatus::Pending,
    });

    tracing::info!("Rule created: {}", rule.id);

    Ok(Json(rule))
}

/// Update a rule's workflow status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRuleStatus>,
) -> AppResult<Json<RecommendedRule>> {
    let rule = state
        .store
        .set_rule_status(id, req.status)
        .ok_or_else(|| AppError::NotFound("Rule not found".to_string()))?;

    Ok(Json(rule))
}

/// Delete a rule
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !state.store.remove_rule(id) {
        return Err(AppError::NotFound("Rule not found".to_string()));
    }

    tracing::info!("Rule deleted: {}", id);

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Rule deleted"
    })))
}
