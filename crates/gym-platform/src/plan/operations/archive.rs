//! Archive Plan Use Case
//!
//! Plans are never deleted while subscriptions reference them; archiving
//! withdraws a plan from sale instead.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::PlanArchived;
use crate::plan::repository::SubscriptionPlanRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for archiving a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePlanCommand {
    pub plan_id: String,
}

/// Use case for archiving a subscription plan.
pub struct ArchivePlanUseCase<U: UnitOfWork> {
    plan_repo: Arc<SubscriptionPlanRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> ArchivePlanUseCase<U> {
    pub fn new(plan_repo: Arc<SubscriptionPlanRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            plan_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: ArchivePlanCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PlanArchived> {
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

        if !plan.active {
            return UseCaseResult::failure(UseCaseError::business_rule(
                "ALREADY_ARCHIVED",
                "Plan is already archived",
            ));
        }

        plan.archive();

        let event = PlanArchived::new(&ctx, &plan.id, &plan.name);

        self.unit_of_work.commit(&plan, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = ArchivePlanCommand {
            plan_id: "P1".to_string(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("planId"));
    }
}
