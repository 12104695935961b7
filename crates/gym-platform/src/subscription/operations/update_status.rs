//! Update Subscription Status Use Case
//!
//! Administrative status changes go through an explicit transition table;
//! disallowed pairs (e.g. CANCELLED -> ACTIVE) are rejected instead of
//! silently overwriting state.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::SubscriptionStatusChanged;
use crate::subscription::entity::{Subscription, SubscriptionStatus};
use crate::subscription::repository::SubscriptionRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for changing a subscription's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionStatusCommand {
    pub subscription_id: String,
    pub status: SubscriptionStatus,
}

/// Use case for administrative status transitions.
pub struct UpdateSubscriptionStatusUseCase<U: UnitOfWork> {
    subscription_repo: Arc<SubscriptionRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdateSubscriptionStatusUseCase<U> {
    pub fn new(subscription_repo: Arc<SubscriptionRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            subscription_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdateSubscriptionStatusCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<SubscriptionStatusChanged> {
        let mut subscription = match self.subscription_repo.find_by_id(&command.subscription_id).await {
            Ok(Some(s)) => s,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "SUBSCRIPTION_NOT_FOUND",
                    format!("Subscription with ID '{}' not found", command.subscription_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch subscription: {}",
                    e
                )));
            }
        };

        let from = subscription.status;
        if !Subscription::can_transition(from, command.status) {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "TRANSITION_NOT_ALLOWED",
                format!(
                    "Status transition {:?} -> {:?} is not permitted",
                    from, command.status
                ),
            ));
        }

        let expected_version = subscription.version;
        subscription.transition_to(command.status);

        let event = SubscriptionStatusChanged::new(
            &ctx,
            &subscription.id,
            &format!("{:?}", from).to_uppercase(),
            &format!("{:?}", command.status).to_uppercase(),
        );

        self.unit_of_work
            .commit_versioned(&subscription, expected_version, event, &command)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = UpdateSubscriptionStatusCommand {
            subscription_id: "S1".to_string(),
            status: SubscriptionStatus::Suspended,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("subscriptionId"));
        assert!(json.contains("SUSPENDED"));
    }

    #[test]
    fn status_deserializes_from_screaming() {
        let cmd: UpdateSubscriptionStatusCommand =
            serde_json::from_str(r#"{"subscriptionId": "S1", "status": "CANCELLED"}"#).unwrap();
        assert_eq!(cmd.status, SubscriptionStatus::Cancelled);
    }
}
