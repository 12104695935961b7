//! Access Authorization
//!
//! The gym-entry decision procedure: a pure engine, an I/O-thin service,
//! and a dry-run API.

pub mod engine;
pub mod service;
pub mod api;

pub use engine::{AccessDecision, AccessResult, evaluate};
pub use service::AccessService;
pub use api::{AccessState, access_router};
