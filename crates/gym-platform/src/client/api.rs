//! Clients Admin API
//!
//! REST endpoints for member registration and management.

use axum::{
    extract::{State, Path, Query},
    routing::get,
    Json, Router,
};
use utoipa::ToSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use chrono::NaiveDate;

use super::entity::{Client, Gender};
use super::operations::{
    RegisterClientUseCase, RegisterClientCommand,
    UpdateClientUseCase, UpdateClientCommand,
};
use super::repository::ClientRepository;
use crate::attendance::repository::AttendanceRepository;
use crate::subscription::repository::SubscriptionRepository;
use crate::shared::api_common::{PaginationParams, SuccessResponse};
use crate::shared::error::GymError;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseResult};

/// Register client request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// MALE or FEMALE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint_data: Option<String>,
}

fn parse_gender(s: &str) -> Result<Gender, GymError> {
    match s.to_uppercase().as_str() {
        "MALE" => Ok(Gender::Male),
        "FEMALE" => Ok(Gender::Female),
        _ => Err(GymError::validation(format!(
            "Invalid gender: {}. Valid options: MALE, FEMALE",
            s
        ))),
    }
}

/// Update client request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// MALE or FEMALE
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub fingerprint_id: Option<String>,
    pub fingerprint_data: Option<String>,
}

/// Client response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub fingerprint_enrolled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(c: Client) -> Self {
        Self {
            id: c.id,
            full_name: c.full_name,
            phone: c.phone,
            email: c.email,
            gender: c.gender.map(|g| format!("{:?}", g).to_uppercase()),
            birth_date: c.birth_date,
            fingerprint_enrolled: c.fingerprint_id.is_some(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Client list response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientListResponse {
    pub clients: Vec<ClientResponse>,
    pub total: usize,
}

/// Clients API state
#[derive(Clone)]
pub struct ClientsState<U: UnitOfWork + 'static> {
    pub client_repo: Arc<ClientRepository>,
    pub subscription_repo: Arc<SubscriptionRepository>,
    pub attendance_repo: Arc<AttendanceRepository>,
    pub register_use_case: Arc<RegisterClientUseCase<U>>,
    pub update_use_case: Arc<UpdateClientUseCase<U>>,
}

/// Register a new client
#[utoipa::path(
    post,
    path = "",
    tag = "clients",
    request_body = RegisterClientRequest,
    responses(
        (status = 200, description = "Client registered", body = ClientResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate phone")
    )
)]
pub async fn register_client<U: UnitOfWork>(
    State(state): State<ClientsState<U>>,
    Json(req): Json<RegisterClientRequest>,
) -> Result<Json<ClientResponse>, GymError> {
    let gender = req.gender.as_deref().map(parse_gender).transpose()?;

    let command = RegisterClientCommand {
        full_name: req.full_name,
        phone: req.phone,
        email: req.email,
        gender,
        birth_date: req.birth_date,
        fingerprint_id: req.fingerprint_id,
        fingerprint_data: req.fingerprint_data,
    };

    let ctx = ExecutionContext::create("front-desk");

    match state.register_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let client = state.client_repo.find_by_id(&event.client_id).await?
                .ok_or_else(|| GymError::internal("Registered client not found"))?;
            Ok(Json(client.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// List clients
#[utoipa::path(
    get,
    path = "",
    tag = "clients",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of clients", body = ClientListResponse)
    )
)]
pub async fn list_clients<U: UnitOfWork>(
    State(state): State<ClientsState<U>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ClientListResponse>, GymError> {
    let clients = state.client_repo
        .find_all(pagination.offset(), pagination.limit())
        .await?;

    let total = clients.len();
    Ok(Json(ClientListResponse {
        clients: clients.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Get client by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "clients",
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client found", body = ClientResponse),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client<U: UnitOfWork>(
    State(state): State<ClientsState<U>>,
    Path(id): Path<String>,
) -> Result<Json<ClientResponse>, GymError> {
    let client = state.client_repo.find_by_id(&id).await?
        .ok_or_else(|| GymError::not_found("Client", &id))?;

    Ok(Json(client.into()))
}

/// Update client
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "clients",
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    request_body = UpdateClientRequest,
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Client not found")
    )
)]
pub async fn update_client<U: UnitOfWork>(
    State(state): State<ClientsState<U>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<ClientResponse>, GymError> {
    let gender = req.gender.as_deref().map(parse_gender).transpose()?;

    let command = UpdateClientCommand {
        client_id: id.clone(),
        full_name: req.full_name,
        phone: req.phone,
        email: req.email,
        gender,
        birth_date: req.birth_date,
        fingerprint_id: req.fingerprint_id,
        fingerprint_data: req.fingerprint_data,
    };

    let ctx = ExecutionContext::create("front-desk");

    match state.update_use_case.execute(command, ctx).await {
        UseCaseResult::Success(event) => {
            let client = state.client_repo.find_by_id(&event.client_id).await?
                .ok_or_else(|| GymError::not_found("Client", &id))?;
            Ok(Json(client.into()))
        }
        UseCaseResult::Failure(err) => Err(err.into()),
    }
}

/// Delete client
///
/// A client owns its subscriptions and attendance history, so deletion
/// cascades to both collections.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "clients",
    params(
        ("id" = String, Path, description = "Client ID")
    ),
    responses(
        (status = 200, description = "Client deleted", body = SuccessResponse),
        (status = 404, description = "Client not found")
    )
)]
pub async fn delete_client<U: UnitOfWork>(
    State(state): State<ClientsState<U>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, GymError> {
    if !state.client_repo.delete(&id).await? {
        return Err(GymError::not_found("Client", &id));
    }

    let subscriptions = state.subscription_repo.delete_by_client(&id).await?;
    let attendance = state.attendance_repo.delete_by_client(&id).await?;

    tracing::info!(
        client_id = %id,
        subscriptions_deleted = subscriptions,
        attendance_deleted = attendance,
        "Client deleted with cascade"
    );

    Ok(Json(SuccessResponse::ok()))
}

/// Create clients router
pub fn clients_router<U: UnitOfWork + Clone>(state: ClientsState<U>) -> Router {
    Router::new()
        .route("/", get(list_clients::<U>).post(register_client::<U>))
        .route(
            "/:id",
            get(get_client::<U>)
                .put(update_client::<U>)
                .delete(delete_client::<U>),
        )
        .with_state(state)
}
