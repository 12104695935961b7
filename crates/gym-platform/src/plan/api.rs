//! Subscription Plans Admin API

use axum::{
    extract::{State, Path, Query},
    routing::{get, post},
    Json, Router,
};
use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::entity::SubscriptionPlan;
use super::operations::{
    CreatePlanUseCase, CreatePlanCommand,
    UpdatePlanUseCase, UpdatePlanCommand,
    ArchivePlanUseCase, ArchivePlanCommand,
};
use super::repository::SubscriptionPlanRepository;
use crate::shared::error::GymError;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseResult};

/// Create plan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub name: String,
    pub price: f64,
    pub duration_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update plan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    pub price: Option<f64>,
    pub duration_months: Option<u32>,
    pub description: Option<String>,
}

/// Plan response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_months: u32,
    pub price_per_month: f64,
    pub description: Option<String>,
    pub active: bool,
    pub display_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SubscriptionPlan> for PlanResponse {
    fn from(p: SubscriptionPlan) -> Self {
        Self {
            price_per_month: p.price_per_month(),
            display_name: p.display_name(),
            id: p.id,
            name: p.name,
            price: p.price,
            duration_months: p.duration_months,
            description: p.description,
            active: p.active,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Query parameters for plan listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlansQuery {
    /// Only plans currently on sale
    pub active: Option<bool>,
}

/// Plans API state
#[derive(Clone)]
pub struct PlansState<U: UnitOfWork + 'static> {
    pub plan_repo: Arc<SubscriptionPlanRepository>,
    pub create_use_case: Arc<CreatePlanUseCase<U>>,
    pub update_use_case: Arc<UpdatePlanUseCase<U>>,
    pub archive_use_case: Arc<ArchivePlanUseCase<U>>,
}

/// Create a new plan
#[utoipa::path(
    post,
    path = "",
    tag = "plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 200, description = "Plan created", body = PlanResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_plan<U: UnitOfWork>(
    State(state): State<PlansState<U>>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<PlanResponse>, GymError> {
    let command = CreatePlanCommand {
        name: req.name,
        price: req.price,
        duration_months: req.duration_months,
        description: req.description,
    };

    let ctx = ExecutionContext::create("admin");

    match state.create_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let plan = state.plan_repo.find_by_id(&event.plan_id).await?
                .ok_or_else(|| GymError::internal("Created plan not found"))?;
            Ok(Json(plan.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List plans
#[utoipa::path(
    get,
    path = "",
    tag = "plans",
    params(PlansQuery),
    responses(
        (status = 200, description = "List of plans", body = [PlanResponse])
    )
)]
pub async fn list_plans<U: UnitOfWork>(
    State(state): State<PlansState<U>>,
    Query(query): Query<PlansQuery>,
) -> Result<Json<Vec<PlanResponse>>, GymError> {
    let plans = if query.active == Some(true) {
        state.plan_repo.find_active().await?
    } else {
        state.plan_repo.find_all().await?
    };

    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// Get plan by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "plans",
    params(
        ("id" = String, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan found", body = PlanResponse),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn get_plan<U: UnitOfWork>(
    State(state): State<PlansState<U>>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, GymError> {
    let plan = state.plan_repo.find_by_id(&id).await?
        .ok_or_else(|| GymError::not_found("Plan", &id))?;

    Ok(Json(plan.into()))
}

/// Update plan
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "plans",
    params(
        ("id" = String, Path, description = "Plan ID")
    ),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = PlanResponse),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn update_plan<U: UnitOfWork>(
    State(state): State<PlansState<U>>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, GymError> {
    let command = UpdatePlanCommand {
        plan_id: id.clone(),
        price: req.price,
        duration_months: req.duration_months,
        description: req.description,
    };

    let ctx = ExecutionContext::create("admin");

    match state.update_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let plan = state.plan_repo.find_by_id(&event.plan_id).await?
                .ok_or_else(|| GymError::not_found("Plan", &id))?;
            Ok(Json(plan.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Archive plan (withdraw from sale)
#[utoipa::path(
    post,
    path = "/{id}/archive",
    tag = "plans",
    params(
        ("id" = String, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan archived", body = PlanResponse),
        (status = 404, description = "Plan not found"),
        (status = 409, description = "Already archived")
    )
)]
pub async fn archive_plan<U: UnitOfWork>(
    State(state): State<PlansState<U>>,
    Path(id): Path<String>,
) -> Result<Json<PlanResponse>, GymError> {
    let command = ArchivePlanCommand { plan_id: id.clone() };
    let ctx = ExecutionContext::create("admin");

    match state.archive_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let plan = state.plan_repo.find_by_id(&event.plan_id).await?
                .ok_or_else(|| GymError::not_found("Plan", &id))?;
            Ok(Json(plan.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Create plans router
pub fn plans_router<U: UnitOfWork + Clone>(state: PlansState<U>) -> Router {
    Router::new()
        .route("/", get(list_plans::<U>).post(create_plan::<U>))
        .route("/:id", get(get_plan::<U>).put(update_plan::<U>))
        .route("/:id/archive", post(archive_plan::<U>))
        .with_state(state)
}
