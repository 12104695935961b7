//! Client Use Case Operations

pub mod create;
pub mod update;
pub mod events;

pub use create::{RegisterClientUseCase, RegisterClientCommand};
pub use update::{UpdateClientUseCase, UpdateClientCommand};
pub use events::{ClientRegistered, ClientUpdated};
