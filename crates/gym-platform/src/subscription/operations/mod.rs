//! Subscription Use Case Operations

pub mod create;
pub mod renew;
pub mod update_status;
pub mod record_payment;
pub mod expire;
pub mod events;

pub use create::{CreateSubscriptionUseCase, CreateSubscriptionCommand};
pub use renew::{RenewSubscriptionUseCase, RenewSubscriptionCommand};
pub use update_status::{UpdateSubscriptionStatusUseCase, UpdateSubscriptionStatusCommand};
pub use record_payment::{RecordPaymentUseCase, RecordPaymentCommand};
pub use expire::{ExpireSubscriptionsUseCase, ExpireSubscriptionsCommand};
pub use events::{
    SubscriptionCreated, SubscriptionRenewed, SubscriptionStatusChanged,
    SubscriptionExpired, PaymentRecorded,
};
