//! GymGate Platform
//!
//! Membership management core:
//! - Client registration with fingerprint-device enrollment
//! - Subscription plan catalog
//! - Subscription lifecycle (creation, renewal, status transitions, expiry)
//! - Partial-payment ledger with a hard balance invariant
//! - Access authorization engine and check-in audit trail
//! - Use Case pattern with guaranteed domain events and audit logging
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints
//! - `operations` - Use case operations (where applicable)

// Membership aggregates
pub mod client;
pub mod plan;
pub mod subscription;
pub mod attendance;

// Access decision core
pub mod access;

// Event store & audit trail
pub mod event;
pub mod audit;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod usecase;
pub mod seed;

// Re-export common types from shared
pub use shared::error::{GymError, Result};
pub use shared::tsid::TsidGenerator;

// Re-export use case infrastructure
pub use usecase::{
    UseCaseResult, UseCaseError, DomainEvent, ExecutionContext,
    UnitOfWork, MongoUnitOfWork,
};
// Note: impl_domain_event! macro is exported at crate root via #[macro_export]

// Re-export main entity types for convenience
pub use client::entity::{Client, Gender};
pub use plan::entity::SubscriptionPlan;
pub use subscription::entity::{Subscription, SubscriptionStatus, Payment, PaymentMethod};
pub use attendance::entity::Attendance;
pub use access::engine::{AccessDecision, AccessResult};
pub use event::entity::Event;
pub use audit::entity::AuditLog;

// Re-export repositories
pub use client::repository::ClientRepository;
pub use plan::repository::SubscriptionPlanRepository;
pub use subscription::repository::SubscriptionRepository;
pub use attendance::repository::AttendanceRepository;
pub use audit::repository::AuditLogRepository;

// Re-export services
pub use access::service::AccessService;
pub use seed::dev_seeder::DevDataSeeder;
