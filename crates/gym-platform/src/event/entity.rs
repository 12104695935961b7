//! Stored Event Entity
//!
//! Domain events as persisted in the `events` collection by the UnitOfWork.
//! The envelope follows the CloudEvents structure used by the in-memory
//! event types, flattened for storage.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use bson::serde_helpers::chrono_datetime_as_bson_datetime;

/// Persisted event record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event TSID
    #[serde(rename = "_id")]
    pub id: String,

    /// Event type code, e.g. "gym:subscription:created"
    pub event_type: String,

    /// Source system, e.g. "gym:subscription"
    pub source: String,

    /// Qualified aggregate identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// When the event occurred
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub time: DateTime<Utc>,

    /// Event-specific payload
    pub data: serde_json::Value,

    pub data_content_type: String,
    pub spec_version: String,

    /// Ordering group, e.g. "gym:subscription:{id}"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_group: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,

    /// Unique key enforced by index; duplicate commits of the same event
    /// fail instead of double-inserting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduplication_id: Option<String>,

    /// Principal that triggered the originating use case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}
