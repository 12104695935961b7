//! Check-In Use Case
//!
//! The only write path that creates attendance rows: evaluates access, then
//! persists one immutable record carrying the verdict. Deliberately not
//! idempotent per day - each attempt is its own audit row; consumers that
//! want one-per-day semantics use the repository's query helpers.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::MemberCheckedIn;
use crate::access::service::AccessService;
use crate::attendance::entity::Attendance;
use crate::client::entity::Client;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for recording a check-in attempt.
///
/// Either `client_id` (front-desk path) or `device_token` (fingerprint
/// machine path) identifies the member; the token is stored on the row
/// either way when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}

/// Use case for recording a check-in.
pub struct CheckInUseCase<U: UnitOfWork> {
    access_service: Arc<AccessService>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CheckInUseCase<U> {
    pub fn new(access_service: Arc<AccessService>, unit_of_work: Arc<U>) -> Self {
        Self {
            access_service,
            unit_of_work,
        }
    }

    async fn resolve_client(&self, command: &CheckInCommand) -> Result<Client, UseCaseError> {
        if let Some(ref client_id) = command.client_id {
            return match self.access_service.client(client_id).await {
                Ok(Some(c)) => Ok(c),
                Ok(None) => Err(UseCaseError::not_found(
                    "CLIENT_NOT_FOUND",
                    format!("Client with ID '{}' not found", client_id),
                )),
                Err(e) => Err(UseCaseError::commit(format!("Failed to fetch client: {}", e))),
            };
        }

        if let Some(ref token) = command.device_token {
            return match self.access_service.resolve_device_token(token).await {
                Ok(Some(c)) => Ok(c),
                Ok(None) => Err(UseCaseError::not_found(
                    "UNKNOWN_DEVICE_TOKEN",
                    "No client is enrolled with this fingerprint token",
                )),
                Err(e) => Err(UseCaseError::commit(format!("Failed to resolve token: {}", e))),
            };
        }

        Err(UseCaseError::validation(
            "CLIENT_OR_TOKEN_REQUIRED",
            "Either clientId or deviceToken must be provided",
        ))
    }

    pub async fn execute(
        &self,
        command: CheckInCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<MemberCheckedIn> {
        let client = match self.resolve_client(&command).await {
            Ok(c) => c,
            Err(e) => return UseCaseResult::failure(e),
        };

        let today = chrono::Utc::now().date_naive();
        let decision = match self.access_service.evaluate_for(&client, today).await {
            Ok(d) => d,
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to evaluate access: {}",
                    e
                )));
            }
        };

        let mut attendance = Attendance::new(&client.id, decision.result);
        if let Some(subscription_id) = decision.subscription_id {
            attendance = attendance.with_subscription(subscription_id);
        }
        if let Some(reason) = decision.denial_reason {
            attendance = attendance.with_denial_reason(reason);
        }
        if let Some(ref token) = command.device_token {
            attendance = attendance.with_device_token(token);
        }

        let event = MemberCheckedIn::new(&ctx, &attendance);

        self.unit_of_work.commit(&attendance, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = CheckInCommand {
            client_id: Some("C1".to_string()),
            device_token: None,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("clientId"));
        assert!(!json.contains("deviceToken"));
    }

    #[test]
    fn device_only_command() {
        let cmd: CheckInCommand =
            serde_json::from_str(r#"{"deviceToken": "FP-0042"}"#).unwrap();
        assert!(cmd.client_id.is_none());
        assert_eq!(cmd.device_token.as_deref(), Some("FP-0042"));
    }
}
