//! Expire Subscriptions Sweep
//!
//! Transitions ACTIVE subscriptions past their end date to EXPIRED. The
//! sweep is idempotent: it queries on status ACTIVE, so a second run with no
//! intervening state change finds nothing to do. SUSPENDED and CANCELLED
//! subscriptions are never touched.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use tracing::{info, warn};

use super::events::SubscriptionExpired;
use crate::subscription::repository::SubscriptionRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command recorded in the audit log for each expired subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpireSubscriptionsCommand {
    pub as_of: NaiveDate,
    pub subscription_id: String,
}

/// Use case for the periodic expiry sweep.
pub struct ExpireSubscriptionsUseCase<U: UnitOfWork> {
    subscription_repo: Arc<SubscriptionRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> ExpireSubscriptionsUseCase<U> {
    pub fn new(subscription_repo: Arc<SubscriptionRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            subscription_repo,
            unit_of_work,
        }
    }

    /// Run one sweep as of the given date. Returns the number of
    /// subscriptions transitioned.
    pub async fn execute(
        &self,
        as_of: NaiveDate,
        ctx: ExecutionContext,
    ) -> Result<u64, UseCaseError> {
        let expirable = self
            .subscription_repo
            .find_expirable(as_of)
            .await
            .map_err(|e| UseCaseError::commit(format!("Failed to query expirable subscriptions: {}", e)))?;

        let mut expired = 0u64;

        for mut subscription in expirable {
            let expected_version = subscription.version;
            if !subscription.expire() {
                continue;
            }

            let command = ExpireSubscriptionsCommand {
                as_of,
                subscription_id: subscription.id.clone(),
            };
            let event = SubscriptionExpired::new(
                &ctx,
                &subscription.id,
                &subscription.client_id,
                subscription.end_date,
            );

            match self
                .unit_of_work
                .commit_versioned(&subscription, expected_version, event, &command)
                .await
            {
                UseCaseResult::Success(_) => expired += 1,
                UseCaseResult::Failure(UseCaseError::ConcurrencyError { .. }) => {
                    // A concurrent writer got there first; the next sweep
                    // will pick this subscription up if it still qualifies.
                    warn!(
                        subscription_id = %subscription.id,
                        "Skipping concurrently modified subscription in expiry sweep"
                    );
                }
                UseCaseResult::Failure(err) => return Err(err),
            }
        }

        info!(as_of = %as_of, expired, "Expiry sweep finished");
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serialization() {
        let cmd = ExpireSubscriptionsCommand {
            as_of: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            subscription_id: "S1".to_string(),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("asOf"));
        assert!(json.contains("2024-02-01"));
    }
}
