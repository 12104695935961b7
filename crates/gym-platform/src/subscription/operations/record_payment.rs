//! Record Payment Use Case
//!
//! Appends an installment to a subscription's ledger. The aggregate write is
//! version-checked so two concurrent payments on the same subscription
//! cannot both read a stale `amount_paid` and lose an update.

use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::events::PaymentRecorded;
use crate::subscription::entity::{Payment, PaymentMethod};
use crate::subscription::repository::SubscriptionRepository;
use crate::usecase::{ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

/// Command for recording a payment against a subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentCommand {
    pub subscription_id: String,

    pub amount: f64,

    pub method: PaymentMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Staff member processing the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
}

/// Use case for recording a payment.
pub struct RecordPaymentUseCase<U: UnitOfWork> {
    subscription_repo: Arc<SubscriptionRepository>,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> RecordPaymentUseCase<U> {
    pub fn new(subscription_repo: Arc<SubscriptionRepository>, unit_of_work: Arc<U>) -> Self {
        Self {
            subscription_repo,
            unit_of_work,
        }
    }

    pub async fn execute(
        &self,
        command: RecordPaymentCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<PaymentRecorded> {
        if command.amount <= 0.0 {
            return UseCaseResult::failure(UseCaseError::validation(
                "AMOUNT_NOT_POSITIVE",
                "Payment amount must be greater than zero",
            ));
        }

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

        let mut payment = Payment::new(command.amount, command.method);
        if let Some(ref notes) = command.notes {
            payment = payment.with_notes(notes);
        }
        if let Some(ref staff_id) = command.recorded_by {
            payment = payment.with_recorded_by(staff_id);
        }
        let payment_id = payment.id.clone();

        // Overpayment is allowed: the balance goes negative and counts as
        // credit.
        let expected_version = subscription.version;
        subscription.record_payment(payment);

        let method = format!("{:?}", command.method).to_uppercase();
        let event = PaymentRecorded::new(&ctx, &subscription, &payment_id, command.amount, &method);

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
        let cmd = RecordPaymentCommand {
            subscription_id: "S1".to_string(),
            amount: 250.0,
            method: PaymentMethod::Cash,
            notes: Some("first installment".to_string()),
            recorded_by: Some("staff-3".to_string()),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("subscriptionId"));
        assert!(json.contains("CASH"));
        assert!(json.contains("recordedBy"));
    }
}
