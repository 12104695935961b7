//! Domain Event Trait
//!
//! Base trait for domain events. Events carry a CloudEvents-style envelope
//! plus tracing fields, and are stored in the event collection by the
//! UnitOfWork.
//!
//! # Naming
//!
//! Events are named in past tense: `SubscriptionCreated`, `PaymentRecorded`,
//! `MemberCheckedIn`. Event type codes follow `{app}:{aggregate}:{action}`,
//! e.g. `gym:subscription:created`. Subjects qualify the aggregate:
//! `gym.subscription.0HZXEQ5Y8JY5Z`. Events in the same message group
//! (`gym:subscription:{id}`) are processed in order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base trait for all domain events.
pub trait DomainEvent: Send + Sync {
    /// Unique identifier for this event (TSID string).
    fn event_id(&self) -> &str;

    /// Event type code, `{app}:{aggregate}:{action}`.
    fn event_type(&self) -> &str;

    /// Schema version of this event type (e.g., "1.0").
    fn spec_version(&self) -> &str;

    /// Source system that generated this event.
    fn source(&self) -> &str;

    /// Qualified aggregate identifier, `{app}.{aggregate}.{id}`.
    fn subject(&self) -> &str;

    /// When the event occurred.
    fn time(&self) -> DateTime<Utc>;

    /// Execution ID for tracking a single use case execution.
    fn execution_id(&self) -> &str;

    /// Correlation ID for distributed tracing.
    fn correlation_id(&self) -> &str;

    /// ID of the event that caused this event (if any).
    fn causation_id(&self) -> Option<&str>;

    /// Principal who initiated the action.
    fn principal_id(&self) -> &str;

    /// Message group for ordering guarantees.
    fn message_group(&self) -> &str;

    /// Serialize the event-specific data payload to JSON.
    fn to_data_json(&self) -> String;
}

/// Common metadata for domain events.
///
/// Event structs embed this (flattened) and delegate the trait methods to it
/// via [`impl_domain_event!`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: String,
    pub event_type: String,
    pub spec_version: String,
    pub source: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub execution_id: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub causation_id: Option<String>,
    pub principal_id: String,
    pub message_group: String,
}

impl EventMetadata {
    /// Build metadata for an event on a given aggregate, copying tracing
    /// fields from the execution context.
    pub fn for_aggregate(
        ctx: &super::ExecutionContext,
        event_type: &str,
        spec_version: &str,
        source: &str,
        aggregate: &str,
        aggregate_id: &str,
    ) -> Self {
        Self {
            event_id: crate::shared::tsid::TsidGenerator::generate(),
            event_type: event_type.to_string(),
            spec_version: spec_version.to_string(),
            source: source.to_string(),
            subject: format!("gym.{}.{}", aggregate, aggregate_id),
            time: Utc::now(),
            execution_id: ctx.execution_id.clone(),
            correlation_id: ctx.correlation_id.clone(),
            causation_id: ctx.causation_id.clone(),
            principal_id: ctx.principal_id.clone(),
            message_group: format!("gym:{}:{}", aggregate, aggregate_id),
        }
    }
}

/// Implements [`DomainEvent`] by delegating to an `EventMetadata` field
/// named `metadata`.
///
/// ```ignore
/// pub struct PaymentRecorded {
///     metadata: EventMetadata,
///     pub subscription_id: String,
///     pub amount: f64,
/// }
///
/// impl_domain_event!(PaymentRecorded);
/// ```
#[macro_export]
macro_rules! impl_domain_event {
    ($event_type:ty) => {
        impl $crate::usecase::DomainEvent for $event_type {
            fn event_id(&self) -> &str {
                &self.metadata.event_id
            }

            fn event_type(&self) -> &str {
                &self.metadata.event_type
            }

            fn spec_version(&self) -> &str {
                &self.metadata.spec_version
            }

            fn source(&self) -> &str {
                &self.metadata.source
            }

            fn subject(&self) -> &str {
                &self.metadata.subject
            }

            fn time(&self) -> chrono::DateTime<chrono::Utc> {
                self.metadata.time
            }

            fn execution_id(&self) -> &str {
                &self.metadata.execution_id
            }

            fn correlation_id(&self) -> &str {
                &self.metadata.correlation_id
            }

            fn causation_id(&self) -> Option<&str> {
                self.metadata.causation_id.as_deref()
            }

            fn principal_id(&self) -> &str {
                &self.metadata.principal_id
            }

            fn message_group(&self) -> &str {
                &self.metadata.message_group
            }

            fn to_data_json(&self) -> String {
                serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::ExecutionContext;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize)]
    struct TestEvent {
        metadata: EventMetadata,
        pub payload: String,
    }

    impl_domain_event!(TestEvent);

    #[test]
    fn metadata_for_aggregate() {
        let ctx = ExecutionContext::create("staff-1");
        let metadata = EventMetadata::for_aggregate(
            &ctx,
            "gym:subscription:created",
            "1.0",
            "gym:subscription",
            "subscription",
            "SUB123",
        );

        let event = TestEvent {
            metadata,
            payload: "hello".to_string(),
        };

        assert_eq!(event.event_type(), "gym:subscription:created");
        assert_eq!(event.subject(), "gym.subscription.SUB123");
        assert_eq!(event.message_group(), "gym:subscription:SUB123");
        assert_eq!(event.principal_id(), "staff-1");
        assert_eq!(event.correlation_id(), ctx.correlation_id);
        assert!(event.causation_id().is_none());
    }

    #[test]
    fn data_json_contains_payload() {
        let ctx = ExecutionContext::create("staff-1");
        let event = TestEvent {
            metadata: EventMetadata::for_aggregate(
                &ctx, "gym:client:registered", "1.0", "gym:client", "client", "C1",
            ),
            payload: "roundtrip".to_string(),
        };

        assert!(event.to_data_json().contains("roundtrip"));
    }
}
