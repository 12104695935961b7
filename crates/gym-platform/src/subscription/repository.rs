//! Subscription Repository
//!
//! Date-range queries compare ISO `YYYY-MM-DD` strings, which order the same
//! as the dates they encode.

use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;
use chrono::NaiveDate;
use super::entity::Subscription;
use crate::shared::error::Result;

pub struct SubscriptionRepository {
    collection: Collection<Subscription>,
}

impl SubscriptionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("subscriptions"),
        }
    }

    pub async fn insert(&self, subscription: &Subscription) -> Result<()> {
        self.collection.insert_one(subscription).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Subscription>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// A client's full subscription history, latest coverage first.
    pub async fn find_by_client(&self, client_id: &str) -> Result<Vec<Subscription>> {
        let cursor = self.collection
            .find(doc! { "clientId": client_id })
            .sort(doc! { "endDate": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// The client's ACTIVE, date-current subscription, if any.
    pub async fn find_current_for_client(
        &self,
        client_id: &str,
        on: NaiveDate,
    ) -> Result<Option<Subscription>> {
        let on = on.to_string();
        Ok(self.collection
            .find_one(doc! {
                "clientId": client_id,
                "status": "ACTIVE",
                "startDate": { "$lte": on.as_str() },
                "endDate": { "$gte": on.as_str() },
            })
            .await?)
    }

    /// ACTIVE subscriptions whose coverage ended before `on` - the expiry
    /// sweep's work list.
    pub async fn find_expirable(&self, on: NaiveDate) -> Result<Vec<Subscription>> {
        let cursor = self.collection
            .find(doc! {
                "status": "ACTIVE",
                "endDate": { "$lt": on.to_string() },
            })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<Subscription>> {
        let cursor = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Number of subscriptions sold from a plan (any status).
    pub async fn count_by_plan(&self, plan_id: &str) -> Result<u64> {
        Ok(self.collection.count_documents(doc! { "planId": plan_id }).await?)
    }

    pub async fn update(&self, subscription: &Subscription) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &subscription.id }, subscription)
            .await?;
        Ok(())
    }

    /// Cascade helper for client deletion. Returns the number removed.
    pub async fn delete_by_client(&self, client_id: &str) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "clientId": client_id })
            .await?;
        Ok(result.deleted_count)
    }
}
