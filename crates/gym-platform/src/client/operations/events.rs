//! Client Domain Events

use serde::{Deserialize, Serialize};
use crate::usecase::{ExecutionContext, EventMetadata};
use crate::impl_domain_event;

/// Event emitted when a new client is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRegistered {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub client_id: String,
    pub full_name: String,
    pub phone: String,
}

impl_domain_event!(ClientRegistered);

impl ClientRegistered {
    const EVENT_TYPE: &'static str = "gym:client:registered";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:client";

    pub fn new(ctx: &ExecutionContext, client_id: &str, full_name: &str, phone: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "client",
                client_id,
            ),
            client_id: client_id.to_string(),
            full_name: full_name.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// Event emitted when a client's details change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub client_id: String,
    /// True when the update (re-)enrolled a fingerprint token
    pub fingerprint_enrolled: bool,
}

impl_domain_event!(ClientUpdated);

impl ClientUpdated {
    const EVENT_TYPE: &'static str = "gym:client:updated";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:client";

    pub fn new(ctx: &ExecutionContext, client_id: &str, fingerprint_enrolled: bool) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "client",
                client_id,
            ),
            client_id: client_id.to_string(),
            fingerprint_enrolled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::DomainEvent;

    #[test]
    fn client_registered_event() {
        let ctx = ExecutionContext::create("staff-1");
        let event = ClientRegistered::new(&ctx, "C1", "Aya Ziyad", "0601010101");

        assert_eq!(event.event_type(), "gym:client:registered");
        assert_eq!(event.subject(), "gym.client.C1");
        assert_eq!(event.phone, "0601010101");
    }
}
