//! Access Authorization Engine
//!
//! Pure decision function: given a client's subscription history and an
//! evaluation date, produce one access verdict. No I/O happens here, so the
//! same inputs always yield the same decision - callable for dry-run checks
//! as well as real check-ins.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use tracing::warn;

use crate::subscription::entity::{Subscription, SubscriptionStatus};

/// Outcome of a gym-entry evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessResult {
    Granted,
    DeniedExpired,
    DeniedUnpaid,
    DeniedNoSubscription,
    DeniedSuspended,
    /// Unclassified denial. Reached through explicitly enumerated states
    /// (cancelled, not yet started, inconsistent expiry) that have no
    /// dedicated verdict; treated as a signal to investigate, not a normal
    /// outcome.
    DeniedFingerprintError,
}

impl AccessResult {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessResult::Granted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessResult::Granted => "GRANTED",
            AccessResult::DeniedExpired => "DENIED_EXPIRED",
            AccessResult::DeniedUnpaid => "DENIED_UNPAID",
            AccessResult::DeniedNoSubscription => "DENIED_NO_SUBSCRIPTION",
            AccessResult::DeniedSuspended => "DENIED_SUSPENDED",
            AccessResult::DeniedFingerprintError => "DENIED_FINGERPRINT_ERROR",
        }
    }
}

/// One evaluated verdict, with the subscription it was judged against.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub result: AccessResult,
    pub denial_reason: Option<String>,
    /// The subscription considered: the current one when access is granted,
    /// otherwise the diagnostic subscription explaining the denial.
    pub subscription_id: Option<String>,
}

impl AccessDecision {
    fn denied(result: AccessResult, reason: impl Into<String>, subscription_id: Option<String>) -> Self {
        Self {
            result,
            denial_reason: Some(reason.into()),
            subscription_id,
        }
    }
}

/// Where the evaluation date falls relative to a subscription's coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatePosition {
    BeforeStart,
    Within,
    AfterEnd,
}

fn position(sub: &Subscription, on: NaiveDate) -> DatePosition {
    if on > sub.end_date {
        DatePosition::AfterEnd
    } else if on < sub.start_date {
        DatePosition::BeforeStart
    } else {
        DatePosition::Within
    }
}

/// Evaluate one client's access for a given date.
///
/// Selection: the *current* subscription is one that is ACTIVE and whose
/// date range contains `on`. When none qualifies, the subscription with the
/// latest end date is picked as the *diagnostic* subscription so the denial
/// names a concrete record; the choice is deterministic.
///
/// Granting requires any positive payment, not full payment: a subscription
/// with an outstanding balance still admits the client as long as at least
/// one installment was ever recorded.
pub fn evaluate(subscriptions: &[Subscription], on: NaiveDate) -> AccessDecision {
    let sub = subscriptions
        .iter()
        .find(|s| s.is_current(on))
        .or_else(|| subscriptions.iter().max_by_key(|s| s.end_date));

    let sub = match sub {
        Some(s) => s,
        None => {
            return AccessDecision::denied(
                AccessResult::DeniedNoSubscription,
                "No active subscription found",
                None,
            );
        }
    };

    use DatePosition::*;
    use SubscriptionStatus::*;

    let decision = match (sub.status, position(sub, on)) {
        (_, AfterEnd) => AccessDecision::denied(
            AccessResult::DeniedExpired,
            format!("Subscription expired on {}", sub.end_date),
            Some(sub.id.clone()),
        ),

        (Active, Within) if sub.amount_paid <= 0.0 => AccessDecision::denied(
            AccessResult::DeniedUnpaid,
            "No payment made for subscription",
            Some(sub.id.clone()),
        ),

        (Suspended, BeforeStart | Within) => AccessDecision::denied(
            AccessResult::DeniedSuspended,
            "Subscription is suspended by admin",
            Some(sub.id.clone()),
        ),

        (Active, Within) => AccessDecision {
            result: AccessResult::Granted,
            denial_reason: None,
            subscription_id: Some(sub.id.clone()),
        },

        // Remaining states, enumerated rather than caught by a wildcard: a
        // cancelled subscription, an ACTIVE one that has not started yet,
        // and an EXPIRED status on a still-covering date range. None has a
        // dedicated verdict; each is an inconsistency worth investigating.
        (Cancelled, BeforeStart | Within)
        | (Active, BeforeStart)
        | (Expired, BeforeStart | Within) => {
            warn!(
                subscription_id = %sub.id,
                status = ?sub.status,
                on = %on,
                "Unclassified denial state during access evaluation"
            );
            AccessDecision::denied(
                AccessResult::DeniedFingerprintError,
                "Unknown error occurred",
                Some(sub.id.clone()),
            )
        }
    };

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::entity::{Payment, PaymentMethod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription() -> Subscription {
        Subscription::new("C1", "P1", date(2024, 1, 1), date(2024, 1, 31), 500.0)
    }

    fn paid_subscription(amount: f64) -> Subscription {
        let mut sub = subscription();
        sub.record_payment(Payment::new(amount, PaymentMethod::Cash));
        sub
    }

    #[test]
    fn no_subscriptions_at_all() {
        let decision = evaluate(&[], date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::DeniedNoSubscription);
        assert_eq!(decision.denial_reason.as_deref(), Some("No active subscription found"));
        assert!(decision.subscription_id.is_none());
    }

    #[test]
    fn active_unpaid_is_denied() {
        let subs = vec![subscription()];
        let decision = evaluate(&subs, date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::DeniedUnpaid);
        assert_eq!(
            decision.denial_reason.as_deref(),
            Some("No payment made for subscription")
        );
        assert_eq!(decision.subscription_id.as_deref(), Some(subs[0].id.as_str()));
    }

    #[test]
    fn partial_payment_grants_access() {
        let subs = vec![paid_subscription(250.0)];
        let decision = evaluate(&subs, date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::Granted);
        assert!(decision.result.is_granted());
        assert!(decision.denial_reason.is_none());
        assert!(!subs[0].is_fully_paid());
    }

    #[test]
    fn past_end_date_is_expired() {
        let subs = vec![paid_subscription(250.0)];
        let decision = evaluate(&subs, date(2024, 2, 1));

        assert_eq!(decision.result, AccessResult::DeniedExpired);
        assert_eq!(
            decision.denial_reason.as_deref(),
            Some("Subscription expired on 2024-01-31")
        );
    }

    #[test]
    fn suspended_is_denied() {
        let mut sub = paid_subscription(500.0);
        sub.transition_to(SubscriptionStatus::Suspended);
        let decision = evaluate(&[sub], date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::DeniedSuspended);
        assert_eq!(
            decision.denial_reason.as_deref(),
            Some("Subscription is suspended by admin")
        );
    }

    #[test]
    fn suspended_past_end_reports_expired() {
        // Date check outranks the suspension in the decision order
        let mut sub = paid_subscription(500.0);
        sub.transition_to(SubscriptionStatus::Suspended);
        let decision = evaluate(&[sub], date(2024, 3, 1));

        assert_eq!(decision.result, AccessResult::DeniedExpired);
    }

    #[test]
    fn cancelled_within_range_is_unclassified() {
        let mut sub = paid_subscription(500.0);
        sub.transition_to(SubscriptionStatus::Cancelled);
        let decision = evaluate(&[sub], date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::DeniedFingerprintError);
        assert_eq!(decision.denial_reason.as_deref(), Some("Unknown error occurred"));
    }

    #[test]
    fn not_yet_started_is_unclassified() {
        let subs = vec![paid_subscription(500.0)];
        let decision = evaluate(&subs, date(2023, 12, 15));

        assert_eq!(decision.result, AccessResult::DeniedFingerprintError);
    }

    #[test]
    fn diagnostic_pick_is_latest_end_date() {
        let mut old = Subscription::new("C1", "P1", date(2023, 1, 1), date(2023, 1, 31), 500.0);
        old.expire();
        let mut recent = Subscription::new("C1", "P1", date(2023, 11, 1), date(2023, 11, 30), 500.0);
        recent.expire();
        let recent_id = recent.id.clone();

        let decision = evaluate(&[old, recent], date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::DeniedExpired);
        assert_eq!(decision.subscription_id.as_deref(), Some(recent_id.as_str()));
        assert!(decision.denial_reason.unwrap().contains("2023-11-30"));
    }

    #[test]
    fn current_subscription_wins_over_history() {
        let mut old = Subscription::new("C1", "P1", date(2023, 1, 1), date(2023, 1, 31), 500.0);
        old.expire();
        let current = paid_subscription(100.0);
        let current_id = current.id.clone();

        let decision = evaluate(&[old, current], date(2024, 1, 15));

        assert_eq!(decision.result, AccessResult::Granted);
        assert_eq!(decision.subscription_id.as_deref(), Some(current_id.as_str()));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let subs = vec![paid_subscription(250.0)];
        let on = date(2024, 1, 15);

        let first = evaluate(&subs, on);
        let second = evaluate(&subs, on);

        assert_eq!(first.result, second.result);
        assert_eq!(first.denial_reason, second.denial_reason);
        assert_eq!(first.subscription_id, second.subscription_id);
    }

    #[test]
    fn result_serializes_screaming() {
        let json = serde_json::to_string(&AccessResult::DeniedNoSubscription).unwrap();
        assert_eq!(json, "\"DENIED_NO_SUBSCRIPTION\"");
        assert_eq!(AccessResult::DeniedFingerprintError.as_str(), "DENIED_FINGERPRINT_ERROR");
    }
}
