//! Access Evaluation API
//!
//! Dry-run access checks: reads current state, writes nothing.

use axum::extract::{State, Path, Query};
use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use chrono::NaiveDate;

use super::engine::AccessDecision;
use super::service::AccessService;
use crate::shared::error::GymError;

/// Access decision response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecisionResponse {
    pub client_id: String,
    pub result: String,
    pub granted: bool,
    pub denial_reason: Option<String>,
    pub subscription_id: Option<String>,
    pub evaluated_on: NaiveDate,
}

impl AccessDecisionResponse {
    fn new(client_id: String, decision: AccessDecision, on: NaiveDate) -> Self {
        Self {
            client_id,
            result: decision.result.as_str().to_string(),
            granted: decision.result.is_granted(),
            denial_reason: decision.denial_reason,
            subscription_id: decision.subscription_id,
            evaluated_on: on,
        }
    }
}

/// Query parameters for access evaluation
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AccessQuery {
    /// Evaluation date; defaults to today
    pub on: Option<NaiveDate>,
}

/// Access API state
#[derive(Clone)]
pub struct AccessState {
    pub access_service: Arc<AccessService>,
}

/// Evaluate a client's access (dry run)
#[utoipa::path(
    get,
    path = "/clients/{id}",
    tag = "access",
    params(
        ("id" = String, Path, description = "Client ID"),
        AccessQuery
    ),
    responses(
        (status = 200, description = "Access decision", body = AccessDecisionResponse),
        (status = 404, description = "Client not found")
    )
)]
pub async fn evaluate_client_access(
    State(state): State<AccessState>,
    Path(id): Path<String>,
    Query(query): Query<AccessQuery>,
) -> Result<Json<AccessDecisionResponse>, GymError> {
    let on = query.on.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let decision = state.access_service.evaluate(&id, on).await?;

    Ok(Json(AccessDecisionResponse::new(id, decision, on)))
}

/// Create access router
pub fn access_router(state: AccessState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(evaluate_client_access))
        .with_state(state)
}
