//! Subscription Plan Repository

use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;
use super::entity::SubscriptionPlan;
use crate::shared::error::Result;

pub struct SubscriptionPlanRepository {
    collection: Collection<SubscriptionPlan>,
}

impl SubscriptionPlanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("subscription_plans"),
        }
    }

    pub async fn insert(&self, plan: &SubscriptionPlan) -> Result<()> {
        self.collection.insert_one(plan).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<SubscriptionPlan>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionPlan>> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    pub async fn find_active(&self) -> Result<Vec<SubscriptionPlan>> {
        let cursor = self.collection
            .find(doc! { "active": true })
            .sort(doc! { "price": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_all(&self) -> Result<Vec<SubscriptionPlan>> {
        let cursor = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, plan: &SubscriptionPlan) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &plan.id }, plan)
            .await?;
        Ok(())
    }
}
