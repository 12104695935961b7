//! Audit Log Entity
//!
//! One entry per mutating use case, written atomically with the aggregate
//! change by the UnitOfWork.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// Entity type affected (e.g. "Subscription", "Client")
    pub entity_type: String,

    /// Entity ID affected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,

    /// Command struct simple name (e.g. "RecordPaymentCommand")
    pub operation: String,

    /// Full command payload as JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_json: Option<String>,

    /// Principal who performed the action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub performed_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: Option<String>,
        operation: impl Into<String>,
        operation_json: Option<String>,
        principal_id: Option<String>,
    ) -> Self {
        Self {
            id: crate::shared::tsid::TsidGenerator::generate(),
            entity_type: entity_type.into(),
            entity_id,
            operation: operation.into(),
            operation_json,
            principal_id,
            performed_at: Utc::now(),
        }
    }

    pub fn with_performed_at(mut self, time: DateTime<Utc>) -> Self {
        self.performed_at = time;
        self
    }
}
