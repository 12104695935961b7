//! Client Repository

use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;
use super::entity::Client;
use crate::shared::error::Result;

pub struct ClientRepository {
    collection: Collection<Client>,
}

impl ClientRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("clients"),
        }
    }

    pub async fn insert(&self, client: &Client) -> Result<()> {
        self.collection.insert_one(client).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Client>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Client>> {
        Ok(self.collection.find_one(doc! { "phone": phone }).await?)
    }

    /// Resolve the device token sent by the fingerprint machine.
    pub async fn find_by_fingerprint(&self, device_token: &str) -> Result<Option<Client>> {
        Ok(self.collection.find_one(doc! { "fingerprintId": device_token }).await?)
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<Client>> {
        let cursor = self.collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn update(&self, client: &Client) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &client.id }, client)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
