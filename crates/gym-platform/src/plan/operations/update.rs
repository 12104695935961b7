//! Update Plan Use Case
//!
//! Administrator edits of price and duration. Existing subscriptions keep
//! their snapshotted price.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::PlanUpdated;
use crate::plan::repository::SubscriptionPlanRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for editing a plan. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanCommand {
    pub plan_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Use case for editing a subscription plan.
pub struct UpdatePlanUseCase<U: UnitOfWork> {
    plan_repo: Arc<SubscriptionPlanRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> UpdatePlanUseCase<U> {
    pub fn new(plan_repo: Arc<SubscriptionPlanRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            plan_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: UpdatePlanCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PlanUpdated> {
        let mut plan = match self.plan_repo.find_by_id(&command.plan_id).await {
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

        if let Some(price) = command.price {
            if price <= 0.0 {
                return UseCaseResult::failure(UseCaseError::validation(
                    "PRICE_NOT_POSITIVE",
                    "Plan price must be greater than zero",
                ));
            }
            plan.price = price;
        }

        if let Some(duration) = command.duration_months {
            if duration == 0 {
                return UseCaseResult::failure(UseCaseError::validation(
                    "DURATION_NOT_POSITIVE",
                    "Plan duration must be at least one month",
                ));
            }
            plan.duration_months = duration;
        }

        if let Some(ref description) = command.description {
            plan.description = Some(description.clone());
        }

        plan.updated_at = chrono::Utc::now();

        let event = PlanUpdated::new(&ctx, &plan.id, plan.price, plan.duration_months);

        self.unit_of_work.commit(&plan, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = UpdatePlanCommand {
            plan_id: "P1".to_string(),
            price: Some(600.0),
            duration_months: None,
            description: None,
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("planId"));
        assert!(!json.contains("durationMonths"));
    }
}
