//! Attendance Repository
//!
//! Read helpers double as idempotence hooks for consumers that want at most
//! one counted check-in per day; the write path itself stays append-only.

use mongodb::{Collection, Database, bson::doc};
use futures::TryStreamExt;
use chrono::NaiveDate;
use super::entity::Attendance;
use crate::shared::error::Result;

pub struct AttendanceRepository {
    collection: Collection<Attendance>,
}

impl AttendanceRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("attendance"),
        }
    }

    pub async fn insert(&self, attendance: &Attendance) -> Result<()> {
        self.collection.insert_one(attendance).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Attendance>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_client(&self, client_id: &str, skip: u64, limit: i64) -> Result<Vec<Attendance>> {
        let cursor = self.collection
            .find(doc! { "clientId": client_id })
            .sort(doc! { "checkInTime": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_on(&self, date: NaiveDate) -> Result<Vec<Attendance>> {
        let cursor = self.collection
            .find(doc! { "date": date.to_string() })
            .sort(doc! { "checkInTime": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn find_all(&self, skip: u64, limit: i64) -> Result<Vec<Attendance>> {
        let cursor = self.collection
            .find(doc! {})
            .sort(doc! { "checkInTime": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// GRANTED check-ins for a client on one day.
    pub async fn count_granted_on(&self, client_id: &str, date: NaiveDate) -> Result<u64> {
        Ok(self.collection
            .count_documents(doc! {
                "clientId": client_id,
                "date": date.to_string(),
                "accessResult": "GRANTED",
            })
            .await?)
    }

    /// Whether the client produced any check-in row today, granted or not.
    pub async fn has_checked_in_on(&self, client_id: &str, date: NaiveDate) -> Result<bool> {
        let count = self.collection
            .count_documents(doc! {
                "clientId": client_id,
                "date": date.to_string(),
            })
            .await?;
        Ok(count > 0)
    }

    /// Cascade helper for client deletion. Returns the number removed.
    pub async fn delete_by_client(&self, client_id: &str) -> Result<u64> {
        let result = self.collection
            .delete_many(doc! { "clientId": client_id })
            .await?;
        Ok(result.deleted_count)
    }
}
