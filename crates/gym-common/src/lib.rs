//! Shared infrastructure for the GymGate services.
//!
//! Currently this crate carries the logging setup used by every binary.
//! Domain types live in `gym-platform`; nothing domain-specific belongs here.

pub mod logging;
