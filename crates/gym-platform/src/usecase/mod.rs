//! Use Case Infrastructure
//!
//! Foundational patterns shared by every mutating operation:
//! - `UseCaseResult<T>` - sealed result type for use case outcomes
//! - `UseCaseError` - categorized errors for consistent HTTP mapping
//! - `DomainEvent` - trait for domain events with CloudEvents structure
//! - `ExecutionContext` - tracing and principal context
//! - `UnitOfWork` - atomic commit of entity + event + audit log, with
//!   optimistic version checks for mutations of existing aggregates

pub mod result;
pub mod error;
pub mod domain_event;
pub mod execution_context;
pub mod unit_of_work;

pub use result::UseCaseResult;
pub use error::UseCaseError;
pub use domain_event::{DomainEvent, EventMetadata};
pub use execution_context::ExecutionContext;
pub use unit_of_work::{UnitOfWork, MongoUnitOfWork};
