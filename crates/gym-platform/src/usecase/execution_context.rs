//! Execution Context
//!
//! Context for a use case execution. Carries tracing IDs and the acting
//! principal through the execution so domain event metadata and audit logs
//! can be populated consistently.

use chrono::{DateTime, Utc};
use crate::shared::tsid::TsidGenerator;

/// Context for a single use case execution.
///
/// - `correlation_id` ties together everything triggered by one request
/// - `causation_id` points at the parent event when reacting to an event
/// - `principal_id` identifies who acted, for the audit trail
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique ID for this execution (generated)
    pub execution_id: String,
    /// ID for distributed tracing (usually from the original request)
    pub correlation_id: String,
    /// ID of the parent event that caused this execution (if any)
    pub causation_id: Option<String>,
    /// ID of the principal performing the action
    pub principal_id: String,
    /// When the execution was initiated
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a fresh context for an API-initiated request. The correlation
    /// ID starts out equal to the execution ID.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Create a context carrying an upstream correlation ID (e.g. from a
    /// request header).
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: format!("exec-{}", TsidGenerator::generate()),
            correlation_id: correlation_id.into(),
            causation_id: None,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Child context within the same execution, caused by a specific event.
    pub fn with_causation(&self, causing_event_id: impl Into<String>) -> Self {
        Self {
            execution_id: self.execution_id.clone(),
            correlation_id: self.correlation_id.clone(),
            causation_id: Some(causing_event_id.into()),
            principal_id: self.principal_id.clone(),
            initiated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context() {
        let ctx = ExecutionContext::create("staff-7");

        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.correlation_id, ctx.execution_id);
        assert_eq!(ctx.principal_id, "staff-7");
        assert!(ctx.causation_id.is_none());
    }

    #[test]
    fn upstream_correlation() {
        let ctx = ExecutionContext::with_correlation("staff-7", "corr-123");
        assert_eq!(ctx.correlation_id, "corr-123");
        assert_ne!(ctx.execution_id, ctx.correlation_id);
    }

    #[test]
    fn child_context_shares_execution() {
        let ctx = ExecutionContext::create("staff-7");
        let child = ctx.with_causation("evt-9");

        assert_eq!(child.execution_id, ctx.execution_id);
        assert_eq!(child.correlation_id, ctx.correlation_id);
        assert_eq!(child.causation_id.as_deref(), Some("evt-9"));
    }
}
