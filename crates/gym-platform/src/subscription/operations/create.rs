//! Create Subscription Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use super::events::SubscriptionCreated;
use crate::client::repository::ClientRepository;
use crate::plan::repository::SubscriptionPlanRepository;
use crate::subscription::entity::Subscription;
use crate::subscription::repository::SubscriptionRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for selling a subscription to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionCommand {
    pub client_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
}

/// Use case for creating a new subscription.
///
/// A client can hold at most one ACTIVE, date-current subscription:
/// creating a second one is rejected rather than left to whichever record a
/// query happens to return first. Renewal is the supported way to replace a
/// running subscription.
pub struct CreateSubscriptionUseCase<U: UnitOfWork> {
    subscription_repo: Arc<SubscriptionRepository>,
    client_repo: Arc<ClientRepository>,
    plan_repo: Arc<SubscriptionPlanRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreateSubscriptionUseCase<U> {
    pub fn new(
        subscription_repo: Arc<SubscriptionRepository>,
        client_repo: Arc<ClientRepository>,
        plan_repo: Arc<SubscriptionPlanRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            subscription_repo,
            client_repo,
            plan_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreateSubscriptionCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<SubscriptionCreated> {
        let client = match self.client_repo.find_by_id(&command.client_id).await {
            Ok(Some(c)) => c,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "CLIENT_NOT_FOUND",
                    format!("Client with ID '{}' not found", command.client_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch client: {}",
                    e
                )));
            }
        };

        let plan = match self.plan_repo.find_by_id(&command.plan_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "PLAN_NOT_FOUND",
                    format!("Plan with ID '{}' not found", command.plan_id),
                ));
            }
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to fetch plan: {}",
                    e
                )));
            }
        };

        if !plan.is_available() {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "PLAN_ARCHIVED",
                format!("Plan '{}' is no longer on sale", plan.name),
            ));
        }

        // Business rule: one ACTIVE date-current subscription per client
        let today = chrono::Utc::now().date_naive();
        match self.subscription_repo.find_current_for_client(&client.id, today).await {
            Ok(Some(existing)) => {
                return UseCaseResult::failure(UseCaseError::business_rule(
                    "SUBSCRIPTION_ALREADY_ACTIVE",
                    format!(
                        "Client already has an active subscription '{}' until {}",
                        existing.id, existing.end_date
                    ),
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to check current subscription: {}",
                    e
                )));
            }
        }

        let end_date = match plan.calculate_end_date(command.start_date) {
            Some(d) => d,
            None => {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_START_DATE",
                    "End date computation overflowed the calendar",
                ));
            }
        };

        let mut subscription = Subscription::new(
            &client.id,
            &plan.id,
            command.start_date,
            end_date,
            plan.price,
        );
        subscription.created_by = Some(ctx.principal_id.clone());

        let event = SubscriptionCreated::new(&ctx, &subscription);

        self.unit_of_work.commit(&subscription, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = CreateSubscriptionCommand {
            client_id: "C1".to_string(),
            plan_id: "P1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("clientId"));
        assert!(json.contains("2024-03-01"));
    }
}
