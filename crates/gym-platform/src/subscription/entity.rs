//! Subscription Entity
//!
//! A client's membership over a date range, sold from a plan. The
//! subscription owns its payment ledger: payments are embedded, append-only,
//! and every append updates the paid/owed amounts in the same document.
//!
//! Invariant: `remaining_balance == total_price - amount_paid` after
//! construction and after every recorded payment. A negative balance means
//! overpayment and is allowed (treated as credit).

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Date-current and usable, provided at least one payment was made
    Active,
    /// Past its end date, or superseded by a renewal
    Expired,
    /// Administratively frozen, reversible
    Suspended,
    /// Manually terminated, terminal
    Cancelled,
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    Card,
    Transfer,
}

/// A single payment transaction, embedded in its subscription.
///
/// Clients can pay a subscription off in several installments; each one is a
/// separate immutable entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// TSID as Crockford Base32 string
    pub id: String,

    /// Amount paid in this specific installment
    pub amount: f64,

    pub method: PaymentMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Staff member who processed this payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    pub fn new(amount: f64, method: PaymentMethod) -> Self {
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            amount,
            method,
            notes: None,
            recorded_by: None,
            payment_date: Utc::now(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_recorded_by(mut self, staff_id: impl Into<String>) -> Self {
        self.recorded_by = Some(staff_id.into());
        self
    }
}

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// Owning client (by reference)
    pub client_id: String,

    /// Plan this subscription was sold from (by reference)
    pub plan_id: String,

    /// First day of coverage
    pub start_date: NaiveDate,

    /// Last day of coverage (inclusive)
    pub end_date: NaiveDate,

    #[serde(default = "default_status")]
    pub status: SubscriptionStatus,

    /// Plan price snapshotted at creation; later plan edits never change it
    pub total_price: f64,

    pub amount_paid: f64,

    pub remaining_balance: f64,

    /// Append-only payment ledger
    #[serde(default)]
    pub payments: Vec<Payment>,

    /// Optimistic concurrency counter, bumped on every mutation
    #[serde(default)]
    pub version: i64,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

fn default_status() -> SubscriptionStatus {
    SubscriptionStatus::Active
}

impl Subscription {
    /// Create a new ACTIVE subscription with a snapshotted price and an
    /// empty ledger.
    pub fn new(
        client_id: impl Into<String>,
        plan_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            client_id: client_id.into(),
            plan_id: plan_id.into(),
            start_date,
            end_date,
            status: SubscriptionStatus::Active,
            total_price,
            amount_paid: 0.0,
            remaining_balance: total_price,
            payments: vec![],
            version: 0,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    /// Append a payment and update the ledger amounts.
    pub fn record_payment(&mut self, payment: Payment) {
        self.amount_paid += payment.amount;
        self.remaining_balance = self.total_price - self.amount_paid;
        self.payments.push(payment);
        self.touch();
    }

    /// Whether the date range covers `on` (both bounds inclusive).
    pub fn covers(&self, on: NaiveDate) -> bool {
        self.start_date <= on && on <= self.end_date
    }

    /// ACTIVE and date-current: the definition of a client's *current
    /// subscription*.
    pub fn is_current(&self, on: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active && self.covers(on)
    }

    /// Eligible for the automatic ACTIVE -> EXPIRED sweep.
    pub fn is_expirable(&self, on: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date < on
    }

    pub fn is_fully_paid(&self) -> bool {
        self.remaining_balance <= 0.0
    }

    /// Share of the total price paid so far, as a percentage. Zero when the
    /// snapshot price is zero.
    pub fn payment_percentage(&self) -> f64 {
        if self.total_price <= 0.0 {
            return 0.0;
        }
        self.amount_paid / self.total_price * 100.0
    }

    /// Permitted administrative status transitions.
    ///
    /// EXPIRED and CANCELLED are terminal; renewal is the only way out of
    /// them (it creates a fresh subscription rather than reviving this one).
    pub fn can_transition(from: SubscriptionStatus, to: SubscriptionStatus) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (from, to),
            (Active, Expired | Suspended | Cancelled) | (Suspended, Active | Expired | Cancelled)
        )
    }

    /// Apply a permitted transition; returns false without mutating when the
    /// pair is disallowed.
    pub fn transition_to(&mut self, to: SubscriptionStatus) -> bool {
        if !Self::can_transition(self.status, to) {
            return false;
        }
        self.status = to;
        self.touch();
        true
    }

    /// Unconditional ACTIVE/any -> EXPIRED mark used by renewal, which
    /// supersedes this subscription with a new one.
    pub fn mark_superseded(&mut self) {
        self.status = SubscriptionStatus::Expired;
        self.touch();
    }

    /// Automatic expiry (date-based). Only ACTIVE subscriptions transition;
    /// repeat sweeps are no-ops.
    pub fn expire(&mut self) -> bool {
        if self.status != SubscriptionStatus::Active {
            return false;
        }
        self.status = SubscriptionStatus::Expired;
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

impl crate::usecase::unit_of_work::HasId for Subscription {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "subscriptions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn subscription() -> Subscription {
        Subscription::new("C1", "P1", date(2024, 1, 1), date(2024, 1, 31), 500.0)
    }

    #[test]
    fn new_subscription_owes_full_price() {
        let sub = subscription();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.amount_paid, 0.0);
        assert_eq!(sub.remaining_balance, 500.0);
        assert!(!sub.is_fully_paid());
    }

    #[test]
    fn balance_invariant_holds_after_each_payment() {
        let mut sub = subscription();

        sub.record_payment(Payment::new(250.0, PaymentMethod::Cash));
        assert_eq!(sub.amount_paid, 250.0);
        assert_eq!(sub.remaining_balance, sub.total_price - sub.amount_paid);
        assert!(!sub.is_fully_paid());

        sub.record_payment(Payment::new(250.0, PaymentMethod::Cheque));
        assert_eq!(sub.amount_paid, 500.0);
        assert_eq!(sub.remaining_balance, 0.0);
        assert!(sub.is_fully_paid());
        assert_eq!(sub.payments.len(), 2);
    }

    #[test]
    fn overpayment_goes_negative() {
        let mut sub = subscription();
        sub.record_payment(Payment::new(600.0, PaymentMethod::Card));

        assert_eq!(sub.remaining_balance, -100.0);
        assert_eq!(sub.remaining_balance, sub.total_price - sub.amount_paid);
        assert!(sub.is_fully_paid());
    }

    #[test]
    fn payment_percentage() {
        let mut sub = subscription();
        sub.record_payment(Payment::new(250.0, PaymentMethod::Cash));
        assert!((sub.payment_percentage() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn payment_percentage_zero_price() {
        let sub = Subscription::new("C1", "P1", date(2024, 1, 1), date(2024, 1, 31), 0.0);
        assert_eq!(sub.payment_percentage(), 0.0);
    }

    #[test]
    fn covers_is_inclusive() {
        let sub = subscription();
        assert!(sub.covers(date(2024, 1, 1)));
        assert!(sub.covers(date(2024, 1, 31)));
        assert!(!sub.covers(date(2023, 12, 31)));
        assert!(!sub.covers(date(2024, 2, 1)));
    }

    #[test]
    fn current_requires_active_status() {
        let mut sub = subscription();
        assert!(sub.is_current(date(2024, 1, 15)));

        sub.transition_to(SubscriptionStatus::Suspended);
        assert!(!sub.is_current(date(2024, 1, 15)));
    }

    #[test]
    fn transition_table() {
        use SubscriptionStatus::*;

        // From ACTIVE
        assert!(Subscription::can_transition(Active, Expired));
        assert!(Subscription::can_transition(Active, Suspended));
        assert!(Subscription::can_transition(Active, Cancelled));

        // SUSPENDED is reversible
        assert!(Subscription::can_transition(Suspended, Active));
        assert!(Subscription::can_transition(Suspended, Cancelled));
        assert!(Subscription::can_transition(Suspended, Expired));

        // Terminal states
        assert!(!Subscription::can_transition(Expired, Active));
        assert!(!Subscription::can_transition(Cancelled, Active));
        assert!(!Subscription::can_transition(Expired, Suspended));
        assert!(!Subscription::can_transition(Cancelled, Expired));

        // Self-transitions are not permitted
        assert!(!Subscription::can_transition(Active, Active));
    }

    #[test]
    fn disallowed_transition_does_not_mutate() {
        let mut sub = subscription();
        sub.transition_to(SubscriptionStatus::Cancelled);
        let version = sub.version;

        assert!(!sub.transition_to(SubscriptionStatus::Active));
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.version, version);
    }

    #[test]
    fn expire_only_touches_active() {
        let mut sub = subscription();
        assert!(sub.is_expirable(date(2024, 2, 1)));
        assert!(sub.expire());
        assert_eq!(sub.status, SubscriptionStatus::Expired);

        // Second sweep is a no-op
        assert!(!sub.is_expirable(date(2024, 2, 1)));
        assert!(!sub.expire());
    }

    #[test]
    fn expire_skips_suspended() {
        let mut sub = subscription();
        sub.transition_to(SubscriptionStatus::Suspended);

        assert!(!sub.is_expirable(date(2024, 2, 1)));
        assert!(!sub.expire());
        assert_eq!(sub.status, SubscriptionStatus::Suspended);
    }

    #[test]
    fn mutations_bump_version() {
        let mut sub = subscription();
        assert_eq!(sub.version, 0);

        sub.record_payment(Payment::new(100.0, PaymentMethod::Cash));
        assert_eq!(sub.version, 1);

        sub.transition_to(SubscriptionStatus::Suspended);
        assert_eq!(sub.version, 2);
    }

    #[test]
    fn status_serializes_screaming() {
        let json = serde_json::to_string(&SubscriptionStatus::Active).unwrap();
        assert_eq!(json, "\"ACTIVE\"");
        let json = serde_json::to_string(&PaymentMethod::Cheque).unwrap();
        assert_eq!(json, "\"CHEQUE\"");
    }
}
