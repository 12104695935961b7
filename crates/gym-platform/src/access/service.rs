//! Access Service
//!
//! Thin I/O wrapper around the engine: loads the client and its subscription
//! history, then delegates the decision. Performs no writes, so it serves
//! dry-run checks ("can this client enter right now?") as well as the
//! check-in recorder.

use std::sync::Arc;
use chrono::NaiveDate;

use super::engine::{self, AccessDecision};
use crate::client::entity::Client;
use crate::client::repository::ClientRepository;
use crate::subscription::repository::SubscriptionRepository;
use crate::shared::error::{GymError, Result};

pub struct AccessService {
    client_repo: Arc<ClientRepository>,
    subscription_repo: Arc<SubscriptionRepository>,
}

impl AccessService {
    pub fn new(
        client_repo: Arc<ClientRepository>,
        subscription_repo: Arc<SubscriptionRepository>,
    ) -> Self {
        Self {
            client_repo,
            subscription_repo,
        }
    }

    /// Evaluate a client's access as of `on`. Fails with NotFound when the
    /// client does not exist.
    pub async fn evaluate(&self, client_id: &str, on: NaiveDate) -> Result<AccessDecision> {
        let client = self.client_repo.find_by_id(client_id).await?
            .ok_or_else(|| GymError::not_found("Client", client_id))?;

        self.evaluate_for(&client, on).await
    }

    /// Evaluate for an already-loaded client (the fingerprint device path
    /// resolves the client by device token first).
    pub async fn evaluate_for(&self, client: &Client, on: NaiveDate) -> Result<AccessDecision> {
        let subscriptions = self.subscription_repo.find_by_client(&client.id).await?;
        Ok(engine::evaluate(&subscriptions, on))
    }

    /// Resolve a fingerprint device token to a client.
    pub async fn resolve_device_token(&self, device_token: &str) -> Result<Option<Client>> {
        self.client_repo.find_by_fingerprint(device_token).await
    }

    /// Look up a client by id.
    pub async fn client(&self, client_id: &str) -> Result<Option<Client>> {
        self.client_repo.find_by_id(client_id).await
    }
}
