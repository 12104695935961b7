//! Renew Subscription Use Case
//!
//! Renewal supersedes the current subscription (marking it EXPIRED whatever
//! its prior status - the documented escape hatch from terminal states) and
//! creates a fresh subscription for the same client, both in one
//! transaction. The new coverage starts the day after the old coverage
//! ends, or today if the old subscription already lapsed.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use mongodb::bson::{to_document, Document};

use super::events::SubscriptionRenewed;
use crate::plan::repository::SubscriptionPlanRepository;
use crate::subscription::entity::Subscription;
use crate::subscription::repository::SubscriptionRepository;
use crate::usecase::unit_of_work::SerializableAggregate;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for renewing a subscription onto a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewSubscriptionCommand {
    pub subscription_id: String,
    pub new_plan_id: String,
}

/// Subscription write for the multi-aggregate commit; `expected_version`
/// guards the superseded subscription against concurrent mutation.
struct SubscriptionWrite {
    subscription: Subscription,
    expected_version: Option<i64>,
}

impl SerializableAggregate for SubscriptionWrite {
    fn id(&self) -> &str {
        &self.subscription.id
    }

    fn collection_name(&self) -> &str {
        "subscriptions"
    }

    fn expected_version(&self) -> Option<i64> {
        self.expected_version
    }

    fn to_document(&self) -> Result<Document, mongodb::bson::ser::Error> {
        to_document(&self.subscription)
    }
}

/// First day of the replacement coverage: the day after the superseded end
/// date, or today when the old subscription already lapsed. `None` only on
/// calendar overflow.
fn renewal_start(current_end: chrono::NaiveDate, today: chrono::NaiveDate) -> Option<chrono::NaiveDate> {
    current_end.succ_opt().map(|day_after| day_after.max(today))
}

/// Use case for renewing a subscription.
pub struct RenewSubscriptionUseCase<U: UnitOfWork> {
    subscription_repo: Arc<SubscriptionRepository>,
    plan_repo: Arc<SubscriptionPlanRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RenewSubscriptionUseCase<U> {
    pub fn new(
        subscription_repo: Arc<SubscriptionRepository>,
        plan_repo: Arc<SubscriptionPlanRepository>,
        unit_of_work: Arc<U>,
    ) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: RenewSubscriptionCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<SubscriptionRenewed> {
        let mut current = match self.subscription_repo.find_by_id(&command.subscription_id).await {
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

        let plan = match self.plan_repo.find_by_id(&command.new_plan_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return UseCaseResult::failure(UseCaseError::not_found(
                    "PLAN_NOT_FOUND",
                    format!("Plan with ID '{}' not found", command.new_plan_id),
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

        let today = chrono::Utc::now().date_naive();
        let new_start = match renewal_start(current.end_date, today) {
            Some(d) => d,
            None => {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_END_DATE",
                    "Current subscription end date overflowed the calendar",
                ));
            }
        };

        let new_end = match plan.calculate_end_date(new_start) {
            Some(d) => d,
            None => {
                return UseCaseResult::failure(UseCaseError::validation(
                    "INVALID_START_DATE",
                    "End date computation overflowed the calendar",
                ));
            }
        };

        let expected_version = current.version;
        current.mark_superseded();

        let mut replacement = Subscription::new(
            &current.client_id,
            &plan.id,
            new_start,
            new_end,
            plan.price,
        );
        replacement.created_by = Some(ctx.principal_id.clone());

        let event = SubscriptionRenewed::new(&ctx, &current.id, &replacement);

        let aggregates: Vec<Box<dyn SerializableAggregate>> = vec![
            Box::new(SubscriptionWrite {
                subscription: current,
                expected_version: Some(expected_version),
            }),
            Box::new(SubscriptionWrite {
                subscription: replacement,
                expected_version: None,
            }),
        ];

        self.unit_of_work.commit_all(aggregates, event, &command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renewal_continues_future_coverage() {
        // Current subscription still running: new coverage starts the day
        // after it ends
        assert_eq!(
            renewal_start(date(2024, 6, 30), date(2024, 6, 10)),
            Some(date(2024, 7, 1))
        );
    }

    #[test]
    fn renewal_of_lapsed_subscription_starts_today() {
        assert_eq!(
            renewal_start(date(2024, 6, 30), date(2024, 8, 10)),
            Some(date(2024, 8, 10))
        );
    }

    #[test]
    fn renewal_on_last_covered_day() {
        assert_eq!(
            renewal_start(date(2024, 6, 30), date(2024, 6, 30)),
            Some(date(2024, 7, 1))
        );
    }

    #[test]
    fn command_serialization() {
        let cmd = RenewSubscriptionCommand {
            subscription_id: "S1".to_string(),
            new_plan_id: "P2".to_string(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("newPlanId"));
    }

    #[test]
    fn subscription_write_serializes() {
        let sub = Subscription::new(
            "C1",
            "P1",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            500.0,
        );
        let write = SubscriptionWrite {
            subscription: sub,
            expected_version: Some(0),
        };

        assert_eq!(write.collection_name(), "subscriptions");
        assert_eq!(write.expected_version(), Some(0));
        let doc = write.to_document().unwrap();
        assert!(doc.contains_key("clientId"));
    }
}
