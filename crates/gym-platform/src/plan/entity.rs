//! Subscription Plan Entity

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Months, NaiveDate, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Subscription plan - the catalog entry a subscription is sold from.
///
/// Price and duration edits never touch existing subscriptions: the price is
/// snapshotted onto the subscription at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// Unique catalog name
    pub name: String,

    /// Full plan price
    pub price: f64,

    /// Duration in whole months
    pub duration_months: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Archived plans (active = false) stay referenced by old subscriptions
    /// but cannot be sold
    pub active: bool,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionPlan {
    pub fn new(name: impl Into<String>, price: f64, duration_months: u32) -> Self {
        let now = Utc::now();
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            name: name.into(),
            price,
            duration_months,
            description: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inclusive end date for a subscription starting on `start_date`:
    /// `start + duration_months - 1 day`. `None` only on calendar overflow.
    pub fn calculate_end_date(&self, start_date: NaiveDate) -> Option<NaiveDate> {
        start_date
            .checked_add_months(Months::new(self.duration_months))
            .and_then(|d| d.pred_opt())
    }

    pub fn price_per_month(&self) -> f64 {
        if self.duration_months == 0 {
            return 0.0;
        }
        self.price / self.duration_months as f64
    }

    pub fn display_name(&self) -> String {
        format!("{} - {:.2} MAD", self.name, self.price)
    }

    pub fn is_available(&self) -> bool {
        self.active
    }

    pub fn archive(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }
}

impl crate::usecase::unit_of_work::HasId for SubscriptionPlan {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "subscription_plans"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn one_month_plan_end_date() {
        let plan = SubscriptionPlan::new("Basic", 500.0, 1);
        assert_eq!(
            plan.calculate_end_date(date(2024, 3, 1)),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn three_month_plan_end_date() {
        let plan = SubscriptionPlan::new("Premium", 1200.0, 3);
        assert_eq!(
            plan.calculate_end_date(date(2024, 1, 1)),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn end_date_clamps_short_months() {
        // Jan 31 + 1 month clamps to Feb 29 (leap year), minus a day
        let plan = SubscriptionPlan::new("Basic", 500.0, 1);
        assert_eq!(
            plan.calculate_end_date(date(2024, 1, 31)),
            Some(date(2024, 2, 28))
        );
    }

    #[test]
    fn price_per_month() {
        let plan = SubscriptionPlan::new("Premium", 1200.0, 3);
        assert!((plan.price_per_month() - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn archive_makes_unavailable() {
        let mut plan = SubscriptionPlan::new("Basic", 500.0, 1);
        assert!(plan.is_available());
        plan.archive();
        assert!(!plan.is_available());
    }

    #[test]
    fn display_name_includes_price() {
        let plan = SubscriptionPlan::new("Basic", 500.0, 1);
        assert_eq!(plan.display_name(), "Basic - 500.00 MAD");
    }
}
