//! Create Plan Use Case

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::PlanCreated;
use crate::plan::entity::SubscriptionPlan;
use crate::plan::repository::SubscriptionPlanRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for adding a plan to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanCommand {
    pub name: String,
    pub price: f64,
    pub duration_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Use case for creating a new subscription plan.
pub struct CreatePlanUseCase<U: UnitOfWork> {
    plan_repo: Arc<SubscriptionPlanRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> CreatePlanUseCase<U> {
    pub fn new(plan_repo: Arc<SubscriptionPlanRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            plan_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: CreatePlanCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PlanCreated> {
        let name = command.name.trim();
        if name.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Plan name is required",
            ));
        }

        if command.price <= 0.0 {
            return UseCaseResult::failure(UseCaseError::validation(
                "PRICE_NOT_POSITIVE",
                "Plan price must be greater than zero",
            ));
        }

        if command.duration_months == 0 {
            return UseCaseResult::failure(UseCaseError::validation(
                "DURATION_NOT_POSITIVE",
                "Plan duration must be at least one month",
            ));
        }

        // Business rule: catalog names are unique
        match self.plan_repo.find_by_name(name).await {
            Ok(Some(_)) => {
                return UseCaseResult::failure(UseCaseError::business_rule(
                    "PLAN_NAME_EXISTS",
                    format!("A plan named '{}' already exists", name),
                ));
            }
            Ok(None) => {}
            Err(e) => {
                return UseCaseResult::failure(UseCaseError::commit(format!(
                    "Failed to check plan name uniqueness: {}",
                    e
                )));
            }
        }

        let mut plan = SubscriptionPlan::new(name, command.price, command.duration_months);
        plan.description = command.description.clone();

        let event = PlanCreated::new(&ctx, &plan.id, &plan.name, plan.price, plan.duration_months);

        self.unit_of_work.commit(&plan, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = CreatePlanCommand {
            name: "Premium".to_string(),
            price: 1200.0,
            duration_months: 3,
            description: Some("Access to gym + classes".to_string()),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("durationMonths"));
        assert!(json.contains("1200"));
    }
}
