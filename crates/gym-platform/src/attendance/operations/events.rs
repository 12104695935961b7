//! Attendance Domain Events

use serde::{Deserialize, Serialize};
use crate::usecase::{ExecutionContext, EventMetadata};
use crate::impl_domain_event;

/// Event emitted for every check-in attempt, granted or denied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCheckedIn {
    #[serde(flatten)]
    pub metadata: EventMetadata,

    pub attendance_id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    pub access_result: String,
    pub granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial_reason: Option<String>,
}

impl_domain_event!(MemberCheckedIn);

impl MemberCheckedIn {
    const EVENT_TYPE: &'static str = "gym:attendance:checked-in";
    const SPEC_VERSION: &'static str = "1.0";
    const SOURCE: &'static str = "gym:attendance";

    pub fn new(ctx: &ExecutionContext, attendance: &crate::attendance::entity::Attendance) -> Self {
        Self {
            metadata: EventMetadata::for_aggregate(
                ctx,
                Self::EVENT_TYPE,
                Self::SPEC_VERSION,
                Self::SOURCE,
                "attendance",
                &attendance.id,
            ),
            attendance_id: attendance.id.clone(),
            client_id: attendance.client_id.clone(),
            subscription_id: attendance.subscription_id.clone(),
            access_result: attendance.access_result.as_str().to_string(),
            granted: attendance.is_granted(),
            denial_reason: attendance.denial_reason.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::engine::AccessResult;
    use crate::attendance::entity::Attendance;
    use crate::usecase::DomainEvent;

    #[test]
    fn checked_in_event() {
        let ctx = ExecutionContext::create("gate-device");
        let attendance = Attendance::new("C1", AccessResult::Granted).with_subscription("S1");
        let event = MemberCheckedIn::new(&ctx, &attendance);

        assert_eq!(event.event_type(), "gym:attendance:checked-in");
        assert!(event.granted);
        assert_eq!(event.access_result, "GRANTED");
        assert_eq!(event.subscription_id.as_deref(), Some("S1"));
    }
}
