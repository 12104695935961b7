//! Event Store
//!
//! Persistence schema for committed domain events.

pub mod entity;

pub use entity::Event;
