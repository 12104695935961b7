//! Subscription Aggregate
//!
//! Membership lifecycle and the embedded payment ledger.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Subscription, SubscriptionStatus, Payment, PaymentMethod};
pub use repository::SubscriptionRepository;
pub use api::{SubscriptionsState, subscriptions_router};
