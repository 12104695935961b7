//! Audit Logs Admin API

use axum::extract::{State, Query, Path};
use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa::ToSchema;
use serde::Serialize;
use std::sync::Arc;

use super::entity::AuditLog;
use super::repository::AuditLogRepository;
use crate::shared::api_common::PaginationParams;
use crate::shared::error::GymError;

/// Audit log response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub operation: String,
    pub operation_json: Option<String>,
    pub principal_id: Option<String>,
    pub performed_at: String,
}

impl From<AuditLog> for AuditLogResponse {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            operation: log.operation,
            operation_json: log.operation_json,
            principal_id: log.principal_id,
            performed_at: log.performed_at.to_rfc3339(),
        }
    }
}

#[derive(Clone)]
pub struct AuditLogsState {
    pub audit_log_repo: Arc<AuditLogRepository>,
}

/// List recent audit logs
#[utoipa::path(
    get,
    path = "",
    tag = "audit-logs",
    params(PaginationParams),
    responses(
        (status = 200, description = "Recent audit logs", body = [AuditLogResponse])
    )
)]
pub async fn list_audit_logs(
    State(state): State<AuditLogsState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<Vec<AuditLogResponse>>, GymError> {
    let logs = state.audit_log_repo
        .find_recent(pagination.offset(), pagination.limit())
        .await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// List audit logs for one entity
#[utoipa::path(
    get,
    path = "/{entity_type}/{entity_id}",
    tag = "audit-logs",
    params(
        ("entity_type" = String, Path, description = "Entity type, e.g. Subscription"),
        ("entity_id" = String, Path, description = "Entity ID")
    ),
    responses(
        (status = 200, description = "Audit logs for the entity", body = [AuditLogResponse])
    )
)]
pub async fn list_entity_audit_logs(
    State(state): State<AuditLogsState>,
    Path((entity_type, entity_id)): Path<(String, String)>,
) -> Result<Json<Vec<AuditLogResponse>>, GymError> {
    let logs = state.audit_log_repo
        .find_by_entity(&entity_type, &entity_id)
        .await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// Create audit logs router
pub fn audit_logs_router(state: AuditLogsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_audit_logs))
        .routes(routes!(list_entity_audit_logs))
        .with_state(state)
}
