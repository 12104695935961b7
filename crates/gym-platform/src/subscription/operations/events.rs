//! Subscription Domain Events

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::usecase::{ExecutionContext, EventMetadata};
use crate::impl_domain_event;

const SPEC_VERSION: &str = "1.0";
const SOURCE: &str = "gym:subscription";

/// Event emitted when a new subscription is sold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription_id: String,
    pub client_id: String,
    pub plan_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
}

impl_domain_event!(SubscriptionCreated);

impl SubscriptionCreated {
    const EVENT_TYPE: &'static str = "gym:subscription:created";

    pub fn new(ctx: &ExecutionContext, sub: &crate::subscription::entity::Subscription) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SPEC_VERSION,
                SOURCE,
                "subscription",
                &sub.id,
            ),
            subscription_id: sub.id.clone(),
            client_id: sub.client_id.clone(),
            plan_id: sub.plan_id.clone(),
            start_date: sub.start_date,
            end_date: sub.end_date,
            total_price: sub.total_price,
        }
    }
}

/// Event emitted when a subscription is renewed onto a (possibly different)
/// plan. Carries both the superseded and the replacement subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRenewed {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub previous_subscription_id: String,
    pub new_subscription_id: String,
    pub client_id: String,
    pub new_plan_id: String,
    pub new_start_date: NaiveDate,
    pub new_end_date: NaiveDate,
}

impl_domain_event!(SubscriptionRenewed);

impl SubscriptionRenewed {
    const EVENT_TYPE: &'static str = "gym:subscription:renewed";

    pub fn new(
        ctx: &ExecutionContext,
        previous_subscription_id: &str,
        new_sub: &crate::subscription::entity::Subscription,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SPEC_VERSION,
                SOURCE,
                "subscription",
                &new_sub.id,
            ),
            previous_subscription_id: previous_subscription_id.to_string(),
            new_subscription_id: new_sub.id.clone(),
            client_id: new_sub.client_id.clone(),
            new_plan_id: new_sub.plan_id.clone(),
            new_start_date: new_sub.start_date,
            new_end_date: new_sub.end_date,
        }
    }
}

/// Event emitted on an administrative status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatusChanged {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription_id: String,
    pub from_status: String,
    pub to_status: String,
}

impl_domain_event!(SubscriptionStatusChanged);

impl SubscriptionStatusChanged {
    const EVENT_TYPE: &'static str = "gym:subscription:status-changed";

    pub fn new(
        ctx: &ExecutionContext,
        subscription_id: &str,
        from_status: &str,
        to_status: &str,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SPEC_VERSION,
                SOURCE,
                "subscription",
                subscription_id,
            ),
            subscription_id: subscription_id.to_string(),
            from_status: from_status.to_string(),
            to_status: to_status.to_string(),
        }
    }
}

/// Event emitted when the sweep expires a subscription past its end date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionExpired {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription_id: String,
    pub client_id: String,
    pub end_date: NaiveDate,
}

impl_domain_event!(SubscriptionExpired);

impl SubscriptionExpired {
    const EVENT_TYPE: &'static str = "gym:subscription:expired";

    pub fn new(
        ctx: &ExecutionContext,
        subscription_id: &str,
        client_id: &str,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SPEC_VERSION,
                SOURCE,
                "subscription",
                subscription_id,
            ),
            subscription_id: subscription_id.to_string(),
            client_id: client_id.to_string(),
            end_date,
        }
    }
}

/// Event emitted when a payment lands on a subscription's ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecorded {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub subscription_id: String,
    pub payment_id: String,
    pub amount: f64,
    pub method: String,
    pub amount_paid: f64,
    pub remaining_balance: f64,
}

impl_domain_event!(PaymentRecorded);

impl PaymentRecorded {
    const EVENT_TYPE: &'static str = "gym:subscription:payment-recorded";

    pub fn new(
        ctx: &ExecutionContext,
        sub: &crate::subscription::entity::Subscription,
        payment_id: &str,
        amount: f64,
        method: &str,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                SPEC_VERSION,
                SOURCE,
                "subscription",
                &sub.id,
            ),
            subscription_id: sub.id.clone(),
            payment_id: payment_id.to_string(),
            amount,
            method: method.to_string(),
            amount_paid: sub.amount_paid,
            remaining_balance: sub.remaining_balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::entity::Subscription;
    use crate::usecase::DomainEvent;
    use chrono::NaiveDate;

    #[test]
    fn created_event_carries_snapshot() {
        let ctx = ExecutionContext::create("staff-1");
        let sub = Subscription::new(
            "C1",
            "P1",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            500.0,
        );
        let event = SubscriptionCreated::new(&ctx, &sub);

        assert_eq!(event.event_type(), "gym:subscription:created");
        assert_eq!(event.subject(), format!("gym.subscription.{}", sub.id));
        assert_eq!(event.total_price, 500.0);
    }

    #[test]
    fn status_changed_event() {
        let ctx = ExecutionContext::create("admin");
        let event = SubscriptionStatusChanged::new(&ctx, "S1", "ACTIVE", "SUSPENDED");

        assert_eq!(event.event_type(), "gym:subscription:status-changed");
        assert_eq!(event.from_status, "ACTIVE");
        assert_eq!(event.to_status, "SUSPENDED");
    }
}
