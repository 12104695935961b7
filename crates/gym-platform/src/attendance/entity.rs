//! Attendance Entity
//!
//! Immutable audit record of one gym-entry attempt, granted or not. Rows
//! are created by the check-in recorder and never updated or deleted
//! (client deletion cascade aside).

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

use crate::access::engine::AccessResult;

/// Attendance entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub client_id: String,

    /// The subscription the verdict was evaluated against, when one existed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    /// Calendar day of the attempt
    pub date: NaiveDate,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub check_in_time: DateTime<Utc>,

    pub access_result: AccessResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,

    /// Opaque token forwarded by the fingerprint device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_token: Option<String>,
}

impl Attendance {
    pub fn new(client_id: impl Into<String>, access_result: AccessResult) -> Self {
        let now = Utc::now();
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            client_id: client_id.into(),
            subscription_id: None,
            date: now.date_naive(),
            check_in_time: now,
            access_result,
            denial_reason: None,
            device_token: None,
        }
    }

    pub fn with_subscription(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    pub fn with_denial_reason(mut self, reason: impl Into<String>) -> Self {
        self.denial_reason = Some(reason.into());
        self
    }

    pub fn with_device_token(mut self, token: impl Into<String>) -> Self {
        self.device_token = Some(token.into());
        self
    }

    pub fn is_granted(&self) -> bool {
        self.access_result.is_granted()
    }
}

impl crate::usecase::unit_of_work::HasId for Attendance {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection_name() -> &'static str {
        "attendance"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_attendance() {
        let attendance = Attendance::new("C1", AccessResult::Granted)
            .with_subscription("S1")
            .with_device_token("FP-0042");

        assert!(attendance.is_granted());
        assert_eq!(attendance.subscription_id.as_deref(), Some("S1"));
        assert!(attendance.denial_reason.is_none());
        assert_eq!(attendance.date, attendance.check_in_time.date_naive());
    }

    #[test]
    fn denied_attendance_carries_reason() {
        let attendance = Attendance::new("C1", AccessResult::DeniedUnpaid)
            .with_denial_reason("No payment made for subscription");

        assert!(!attendance.is_granted());
        assert_eq!(
            attendance.denial_reason.as_deref(),
            Some("No payment made for subscription")
        );
    }
}
