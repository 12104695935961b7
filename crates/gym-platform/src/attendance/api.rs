//! Attendance API
//!
//! Check-in recording and audit listings.

use axum::{
    extract::{State, Path, Query},
    routing::{get, post},
    Json, Router,
};
use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use chrono::NaiveDate;

use super::entity::Attendance;
use super::operations::{CheckInUseCase, CheckInCommand};
use super::repository::AttendanceRepository;
use crate::shared::api_common::PaginationParams;
use crate::shared::error::GymError;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseResult};

/// Check-in request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}

/// Attendance response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: String,
    pub client_id: String,
    pub subscription_id: Option<String>,
    pub date: NaiveDate,
    pub check_in_time: String,
    pub access_result: String,
    pub granted: bool,
    pub denial_reason: Option<String>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(a: Attendance) -> Self {
        Self {
            granted: a.is_granted(),
            access_result: a.access_result.as_str().to_string(),
            id: a.id,
            client_id: a.client_id,
            subscription_id: a.subscription_id,
            date: a.date,
            check_in_time: a.check_in_time.to_rfc3339(),
            denial_reason: a.denial_reason,
        }
    }
}

/// Per-client daily summary
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodaySummaryResponse {
    pub client_id: String,
    pub date: NaiveDate,
    pub checked_in: bool,
    pub granted_count: u64,
}

/// Query parameters for attendance listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Filter by client ID
    pub client_id: Option<String>,

    /// Filter by calendar day
    pub date: Option<NaiveDate>,
}

/// Attendance API state
#[derive(Clone)]
pub struct AttendanceState<U: UnitOfWork + 'static> {
    pub attendance_repo: Arc<AttendanceRepository>,
    pub check_in_use_case: Arc<CheckInUseCase<U>>,
}

/// Record a check-in attempt
#[utoipa::path(
    post,
    path = "/check-in",
    tag = "attendance",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Attendance recorded with the verdict", body = AttendanceResponse),
        (status = 400, description = "Neither clientId nor deviceToken given"),
        (status = 404, description = "Client not found")
    )
)]
pub async fn check_in<U: UnitOfWork>(
    State(state): State<AttendanceState<U>>,
    Json(req): Json<CheckInRequest>,
) -> Result<Json<AttendanceResponse>, GymError> {
    let command = CheckInCommand {
        client_id: req.client_id,
        device_token: req.device_token,
    };

    let ctx = ExecutionContext::create("gate-device");

    match state.check_in_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let attendance = state.attendance_repo.find_by_id(&event.attendance_id).await?
                .ok_or_else(|| GymError::internal("Recorded attendance not found"))?;
            Ok(Json(attendance.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List attendance records
#[utoipa::path(
    get,
    path = "",
    tag = "attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceResponse])
    )
)]
pub async fn list_attendance<U: UnitOfWork>(
    State(state): State<AttendanceState<U>>,
    Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceResponse>>, GymError> {
    let records = if let Some(ref client_id) = query.client_id {
        state.attendance_repo
            .find_by_client(client_id, query.pagination.offset(), query.pagination.limit())
            .await?
    } else if let Some(date) = query.date {
        state.attendance_repo.find_on(date).await?
    } else {
        state.attendance_repo
            .find_all(query.pagination.offset(), query.pagination.limit())
            .await?
    };

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// Per-client summary for today
///
/// Check-ins are recorded per attempt; consumers that want one-per-day
/// semantics read this instead of counting rows themselves.
#[utoipa::path(
    get,
    path = "/clients/{id}/today",
    tag = "attendance",
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Today's summary", body = TodaySummaryResponse)
    )
)]
pub async fn today_summary<U: UnitOfWork>(
    State(state): State<AttendanceState<U>>,
    Path(id): Path<String>,
) -> Result<Json<TodaySummaryResponse>, GymError> {
    let today = chrono::Utc::now().date_naive();

    let checked_in = state.attendance_repo.has_checked_in_on(&id, today).await?;
    let granted_count = state.attendance_repo.count_granted_on(&id, today).await?;

    Ok(Json(TodaySummaryResponse {
        client_id: id,
        date: today,
        checked_in,
        granted_count,
    }))
}

/// Create attendance router
pub fn attendance_router<U: UnitOfWork + Clone>(state: AttendanceState<U>) -> Router {
    Router::new()
        .route("/", get(list_attendance::<U>))
        .route("/check-in", post(check_in::<U>))
        .route("/clients/:id/today", get(today_summary::<U>))
        .with_state(state)
}
