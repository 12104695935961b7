//! Subscriptions Admin API

use axum::{
    extract::{State, Path, Query},
    routing::{get, post},
    Json, Router,
};
use utoipa::{ToSchema, IntoParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use chrono::NaiveDate;

use super::entity::{Payment, PaymentMethod, Subscription, SubscriptionStatus};
use super::operations::{
    CreateSubscriptionUseCase, CreateSubscriptionCommand,
    RenewSubscriptionUseCase, RenewSubscriptionCommand,
    UpdateSubscriptionStatusUseCase, UpdateSubscriptionStatusCommand,
    RecordPaymentUseCase, RecordPaymentCommand,
    ExpireSubscriptionsUseCase,
};
use super::repository::SubscriptionRepository;
use crate::shared::api_common::PaginationParams;
use crate::shared::error::GymError;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseResult};

/// Create subscription request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    pub client_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Target status: ACTIVE, EXPIRED, SUSPENDED or CANCELLED
    pub status: String,
}

/// Renewal request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewSubscriptionRequest {
    pub new_plan_id: String,
}

/// Record payment request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub amount: f64,
    /// Payment method: CASH, CHEQUE, CARD or TRANSFER
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
}

/// Payment response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub amount: f64,
    pub method: String,
    pub notes: Option<String>,
    pub recorded_by: Option<String>,
    pub payment_date: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(p: &Payment) -> Self {
        Self {
            id: p.id.clone(),
            amount: p.amount,
            method: format!("{:?}", p.method).to_uppercase(),
            notes: p.notes.clone(),
            recorded_by: p.recorded_by.clone(),
            payment_date: p.payment_date.to_rfc3339(),
        }
    }
}

/// Subscription response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: String,
    pub client_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub total_price: f64,
    pub amount_paid: f64,
    pub remaining_balance: f64,
    pub fully_paid: bool,
    pub payment_percentage: f64,
    pub payments: Vec<PaymentResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            fully_paid: s.is_fully_paid(),
            payment_percentage: s.payment_percentage(),
            payments: s.payments.iter().map(Into::into).collect(),
            id: s.id,
            client_id: s.client_id,
            plan_id: s.plan_id,
            start_date: s.start_date,
            end_date: s.end_date,
            status: format!("{:?}", s.status).to_uppercase(),
            total_price: s.total_price,
            amount_paid: s.amount_paid,
            remaining_balance: s.remaining_balance,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Subscription list response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
    pub total: usize,
}

/// Expiry sweep response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpirySweepResponse {
    pub as_of: NaiveDate,
    pub expired: u64,
}

/// Query parameters for subscription listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubscriptionsQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Filter by client ID
    pub client_id: Option<String>,
}

/// Query parameters for the expiry sweep
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpirySweepQuery {
    /// Sweep cutoff date; defaults to today
    pub as_of: Option<NaiveDate>,
}

fn parse_status(s: &str) -> Result<SubscriptionStatus, GymError> {
    match s.to_uppercase().as_str() {
        "ACTIVE" => Ok(SubscriptionStatus::Active),
        "EXPIRED" => Ok(SubscriptionStatus::Expired),
        "SUSPENDED" => Ok(SubscriptionStatus::Suspended),
        "CANCELLED" => Ok(SubscriptionStatus::Cancelled),
        _ => Err(GymError::validation(format!(
            "Invalid status: {}. Valid options: ACTIVE, EXPIRED, SUSPENDED, CANCELLED",
            s
        ))),
    }
}

fn parse_method(s: &str) -> Result<PaymentMethod, GymError> {
    match s.to_uppercase().as_str() {
        "CASH" => Ok(PaymentMethod::Cash),
        "CHEQUE" => Ok(PaymentMethod::Cheque),
        "CARD" => Ok(PaymentMethod::Card),
        "TRANSFER" => Ok(PaymentMethod::Transfer),
        _ => Err(GymError::validation(format!(
            "Invalid payment method: {}. Valid options: CASH, CHEQUE, CARD, TRANSFER",
            s
        ))),
    }
}

/// Subscriptions API state
#[derive(Clone)]
pub struct SubscriptionsState<U: UnitOfWork + 'static> {
    pub subscription_repo: Arc<SubscriptionRepository>,
    pub create_use_case: Arc<CreateSubscriptionUseCase<U>>,
    pub renew_use_case: Arc<RenewSubscriptionUseCase<U>>,
    pub update_status_use_case: Arc<UpdateSubscriptionStatusUseCase<U>>,
    pub record_payment_use_case: Arc<RecordPaymentUseCase<U>>,
    pub expire_use_case: Arc<ExpireSubscriptionsUseCase<U>>,
}

impl<U: UnitOfWork + 'static> SubscriptionsState<U> {
    async fn load(&self, id: &str) -> Result<Subscription, GymError> {
        self.subscription_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| GymError::not_found("Subscription", id))
    }
}

/// Create a new subscription
#[utoipa::path(
    post,
    path = "",
    tag = "subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription created", body = SubscriptionResponse),
        (status = 404, description = "Client or plan not found"),
        (status = 409, description = "Client already has an active subscription")
    )
)]
pub async fn create_subscription<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, GymError> {
    let command = CreateSubscriptionCommand {
        client_id: req.client_id,
        plan_id: req.plan_id,
        start_date: req.start_date,
    };

    let ctx = ExecutionContext::create("front-desk");

    match state.create_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let subscription = state.load(&event.subscription_id).await?;
            Ok(Json(subscription.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List subscriptions
#[utoipa::path(
    get,
    path = "",
    tag = "subscriptions",
    params(SubscriptionsQuery),
    responses(
        (status = 200, description = "List of subscriptions", body = SubscriptionListResponse)
    )
)]
pub async fn list_subscriptions<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<Json<SubscriptionListResponse>, GymError> {
    let subscriptions = if let Some(ref client_id) = query.client_id {
        state.subscription_repo.find_by_client(client_id).await?
    } else {
        state.subscription_repo
            .find_all(query.pagination.offset(), query.pagination.limit())
            .await?
    };

    let total = subscriptions.len();
    Ok(Json(SubscriptionListResponse {
        subscriptions: subscriptions.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get subscription by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "subscriptions",
    params(
        ("id" = String, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionResponse>, GymError> {
    let subscription = state.load(&id).await?;
    Ok(Json(subscription.into()))
}

/// Change subscription status
#[utoipa::path(
    post,
    path = "/{id}/status",
    tag = "subscriptions",
    params(
        ("id" = String, Path, description = "Subscription ID")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = SubscriptionResponse),
        (status = 404, description = "Subscription not found"),
        (status = 409, description = "Transition not permitted")
    )
)]
pub async fn update_subscription_status<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<SubscriptionResponse>, GymError> {
    let command = UpdateSubscriptionStatusCommand {
        subscription_id: id.clone(),
        status: parse_status(&req.status)?,
    };

    let ctx = ExecutionContext::create("admin");

    match state.update_status_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let subscription = state.load(&event.subscription_id).await?;
            Ok(Json(subscription.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Renew subscription
#[utoipa::path(
    post,
    path = "/{id}/renew",
    tag = "subscriptions",
    params(
        ("id" = String, Path, description = "Subscription ID to supersede")
    ),
    request_body = RenewSubscriptionRequest,
    responses(
        (status = 200, description = "Replacement subscription", body = SubscriptionResponse),
        (status = 404, description = "Subscription or plan not found")
    )
)]
pub async fn renew_subscription<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Path(id): Path<String>,
    Json(req): Json<RenewSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, GymError> {
    let command = RenewSubscriptionCommand {
        subscription_id: id,
        new_plan_id: req.new_plan_id,
    };

    let ctx = ExecutionContext::create("front-desk");

    match state.renew_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let subscription = state.load(&event.new_subscription_id).await?;
            Ok(Json(subscription.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/{id}/payments",
    tag = "subscriptions",
    params(
        ("id" = String, Path, description = "Subscription ID")
    ),
    request_body = RecordPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded", body = SubscriptionResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 404, description = "Subscription not found"),
        (status = 409, description = "Concurrent modification")
    )
)]
pub async fn record_payment<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Path(id): Path<String>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<SubscriptionResponse>, GymError> {
    let command = RecordPaymentCommand {
        subscription_id: id,
        amount: req.amount,
        method: parse_method(&req.method)?,
        notes: req.notes,
        recorded_by: req.recorded_by,
    };

    let ctx = ExecutionContext::create("front-desk");

    match state.record_payment_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let subscription = state.load(&event.subscription_id).await?;
            Ok(Json(subscription.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List a subscription's payments
#[utoipa::path(
    get,
    path = "/{id}/payments",
    tag = "subscriptions",
    params(
        ("id" = String, Path, description = "Subscription ID")
    ),
    responses(
        (status = 200, description = "Payment ledger", body = [PaymentResponse]),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn list_payments<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PaymentResponse>>, GymError> {
    let subscription = state.load(&id).await?;
    Ok(Json(subscription.payments.iter().map(Into::into).collect()))
}

/// Run the expiry sweep
#[utoipa::path(
    post,
    path = "/expire-sweep",
    tag = "subscriptions",
    params(ExpirySweepQuery),
    responses(
        (status = 200, description = "Sweep result", body = ExpirySweepResponse)
    )
)]
pub async fn expire_sweep<U: UnitOfWork>(
    State(state): State<SubscriptionsState<U>>,
    Query(query): Query<ExpirySweepQuery>,
) -> Result<Json<ExpirySweepResponse>, GymError> {
    let as_of = query.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let ctx = ExecutionContext::create("scheduler");

    let expired = state
        .expire_use_case
        .execute(as_of, ctx)
        .await
        .map_err(GymError::from)?;

    Ok(Json(ExpirySweepResponse { as_of, expired }))
}

/// Create subscriptions router
pub fn subscriptions_router<U: UnitOfWork + Clone>(state: SubscriptionsState<U>) -> Router {
    Router::new()
        .route("/", get(list_subscriptions::<U>).post(create_subscription::<U>))
        .route("/expire-sweep", post(expire_sweep::<U>))
        .route("/:id", get(get_subscription::<U>))
        .route("/:id/status", post(update_subscription_status::<U>))
        .route("/:id/renew", post(renew_subscription::<U>))
        .route("/:id/payments", get(list_payments::<U>).post(record_payment::<U>))
        .with_state(state)
}
