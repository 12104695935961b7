//! Subscription Plan Domain Events

use serde::{Deserialize, Serialize};
use crate::usecase::{ExecutionContext, EventMetadata};
use crate::impl_domain_event;

/// Event emitted when a new plan is added to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCreated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub plan_id: String,
    pub name: String,
    pub price: f64,
    pub duration_months: u32,
}

impl_domain_event!(PlanCreated);

impl PlanCreated {
    const EVENT_TYPE: &'static str = "gym:plan:created";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:plan";

    pub fn new(
        ctx: &ExecutionContext,
        plan_id: &str,
        name: &str,
        price: f64,
        duration_months: u32,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "plan",
                plan_id,
            ),
            plan_id: plan_id.to_string(),
            name: name.to_string(),
            price,
            duration_months,
        }
    }
}

/// Event emitted when a plan's price, duration or description changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdated {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub plan_id: String,
    pub price: f64,
    pub duration_months: u32,
}

impl_domain_event!(PlanUpdated);

impl PlanUpdated {
    const EVENT_TYPE: &'static str = "gym:plan:updated";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:plan";

    pub fn new(ctx: &ExecutionContext, plan_id: &str, price: f64, duration_months: u32) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "plan",
                plan_id,
            ),
            plan_id: plan_id.to_string(),
            price,
            duration_months,
        }
    }
}

/// Event emitted when a plan is withdrawn from sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanArchived {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub plan_id: String,
    pub name: String,
}

impl_domain_event!(PlanArchived);

impl PlanArchived {
    const EVENT_TYPE: &'static str = "gym:plan:archived";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:plan";

    pub fn new(ctx: &ExecutionContext, plan_id: &str, name: &str) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "plan",
                plan_id,
            ),
            plan_id: plan_id.to_string(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::DomainEvent;

    #[test]
    fn plan_created_event() {
        let ctx = ExecutionContext::create("admin-1");
        let event = PlanCreated::new(&ctx, "P1", "Basic", 500.0, 1);

        assert_eq!(event.event_type(), "gym:plan:created");
        assert_eq!(event.message_group(), "gym:plan:P1");
    }
}
