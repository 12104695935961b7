//! Unit of Work
//!
//! Atomic commit of entity state changes, domain events, and audit logs
//! within a single MongoDB transaction.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    Client, ClientSession, Database,
    bson::{doc, Document, to_document},
};
use serde::Serialize;
use tracing::{debug, error};

use super::domain_event::DomainEvent;
use super::error::UseCaseError;
use super::result::UseCaseResult;
use crate::audit::AuditLog;
use crate::event::Event;

/// Unit of Work for atomic membership operations.
///
/// **This is the ONLY way to create a successful `UseCaseResult`.** Every
/// mutating use case goes through a commit here, which guarantees:
/// - the aggregate write, the domain event and the audit log land together
/// - a version-checked commit fails with `ConcurrencyError` instead of
///   silently losing a concurrent writer's update
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Commit an aggregate (insert or replace) with its domain event.
    ///
    /// Use for newly created aggregates; the write is an upsert without a
    /// version check.
    async fn commit<E, T, C>(
        &self,
        aggregate: &T,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Serialize + HasId + Send + Sync,
        C: Serialize + Send + Sync;

    /// Commit a mutation of an existing aggregate, guarded by an optimistic
    /// version check.
    ///
    /// The write only matches a stored document whose `version` equals
    /// `expected_version`; a miss aborts the transaction and surfaces
    /// `ConcurrencyError`. Callers bump the aggregate's version before
    /// committing and pass the pre-bump value here.
    async fn commit_versioned<E, T, C>(
        &self,
        aggregate: &T,
        expected_version: i64,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Serialize + HasId + Send + Sync,
        C: Serialize + Send + Sync;

    /// Commit multiple aggregates with one domain event atomically.
    ///
    /// Used by renewal, which expires the old subscription and creates the
    /// new one in the same transaction.
    async fn commit_all<E, C>(
        &self,
        aggregates: Vec<Box<dyn SerializableAggregate>>,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        C: Serialize + Send + Sync;
}

/// Trait for entities that have an ID and a collection.
pub trait HasId {
    fn id(&self) -> &str;
    fn collection_name() -> &'static str;
}

/// Type-erased aggregate for multi-aggregate commits.
pub trait SerializableAggregate: Send + Sync {
    fn id(&self) -> &str;
    fn collection_name(&self) -> &str;
    /// `Some(v)` guards the write with a version check against `v`.
    fn expected_version(&self) -> Option<i64>;
    fn to_document(&self) -> Result<Document, mongodb::bson::ser::Error>;
}

/// MongoDB implementation of UnitOfWork using multi-document transactions.
///
/// Requires MongoDB 4.0+ deployed as a replica set.
#[derive(Clone)]
pub struct MongoUnitOfWork {
    client: Client,
    database: Database,
}

impl MongoUnitOfWork {
    pub fn new(client: Client, database: Database) -> Self {
        Self { client, database }
    }

    /// Extract aggregate type from a subject like "gym.subscription.0HZX..".
    fn extract_aggregate_type(subject: &str) -> String {
        subject
            .split('.')
            .nth(1)
            .map(|s| {
                let mut chars = s.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn extract_entity_id(subject: &str) -> Option<String> {
        subject.split('.').nth(2).map(String::from)
    }

    fn create_event<E: DomainEvent>(event: &E) -> Event {
        let data: serde_json::Value = serde_json::from_str(&event.to_data_json())
            .unwrap_or(serde_json::json!({}));

        Event {
            id: event.event_id().to_string(),
            event_type: event.event_type().to_string(),
            source: event.source().to_string(),
            subject: Some(event.subject().to_string()),
            time: event.time(),
            data,
            data_content_type: "application/json".to_string(),
            spec_version: event.spec_version().to_string(),
            message_group: Some(event.message_group().to_string()),
            correlation_id: Some(event.correlation_id().to_string()),
            causation_id: event.causation_id().map(String::from),
            deduplication_id: Some(format!("{}-{}", event.event_type(), event.event_id())),
            principal_id: Some(event.principal_id().to_string()),
            created_at: Utc::now(),
        }
    }

    fn create_audit_log<E: DomainEvent, C: Serialize>(event: &E, command: &C) -> AuditLog {
        let command_name = std::any::type_name::<C>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown")
            .to_string();

        AuditLog::new(
            Self::extract_aggregate_type(event.subject()),
            Self::extract_entity_id(event.subject()),
            command_name,
            serde_json::to_string(command).ok(),
            Some(event.principal_id().to_string()),
        )
        .with_performed_at(event.time())
    }

    async fn begin(&self) -> Result<ClientSession, UseCaseError> {
        let mut session = self.client.start_session().await.map_err(|e| {
            error!("Failed to start MongoDB session: {}", e);
            UseCaseError::commit(format!("Failed to start session: {}", e))
        })?;

        session.start_transaction().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            UseCaseError::commit(format!("Failed to start transaction: {}", e))
        })?;

        Ok(session)
    }

    /// Insert the event and audit log, then commit the transaction.
    async fn finish<E: DomainEvent + Serialize, C: Serialize + Send + Sync>(
        &self,
        mut session: ClientSession,
        event: E,
        command: &C,
    ) -> UseCaseResult<E> {
        let mongo_event = Self::create_event(&event);
        let events = self.database.collection::<Event>("events");
        if let Err(e) = events.insert_one(&mongo_event).session(&mut session).await {
            let _ = session.abort_transaction().await;
            error!("Failed to insert event: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("Failed to insert event: {}", e),
            ));
        }

        let audit_log = Self::create_audit_log(&event, command);
        let audit_logs = self.database.collection::<AuditLog>("audit_logs");
        if let Err(e) = audit_logs.insert_one(&audit_log).session(&mut session).await {
            let _ = session.abort_transaction().await;
            error!("Failed to insert audit log: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("Failed to insert audit log: {}", e),
            ));
        }

        if let Err(e) = session.commit_transaction().await {
            error!("Failed to commit transaction: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("Failed to commit transaction: {}", e),
            ));
        }

        debug!(
            event_id = event.event_id(),
            event_type = event.event_type(),
            "Successfully committed transaction"
        );

        UseCaseResult::success(event)
    }
}

#[async_trait]
impl UnitOfWork for MongoUnitOfWork {
    async fn commit<E, T, C>(
        &self,
        aggregate: &T,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Serialize + HasId + Send + Sync,
        C: Serialize + Send + Sync,
    {
        let mut session = match self.begin().await {
            Ok(s) => s,
            Err(e) => return UseCaseResult::failure(e),
        };

        let aggregate_doc = match to_document(aggregate) {
            Ok(d) => d,
            Err(e) => {
                let _ = session.abort_transaction().await;
                return UseCaseResult::failure(UseCaseError::commit(
                    format!("Failed to serialize aggregate: {}", e),
                ));
            }
        };

        let collection = self.database.collection::<Document>(T::collection_name());
        let write = collection
            .update_one(
                doc! { "_id": aggregate.id() },
                doc! { "$set": &aggregate_doc },
            )
            .upsert(true)
            .session(&mut session)
            .await;

        if let Err(e) = write {
            let _ = session.abort_transaction().await;
            error!("Failed to persist aggregate: {}", e);
            return UseCaseResult::failure(UseCaseError::commit(
                format!("Failed to persist aggregate: {}", e),
            ));
        }

        self.finish(session, event, command).await
    }

    async fn commit_versioned<E, T, C>(
        &self,
        aggregate: &T,
        expected_version: i64,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        T: Serialize + HasId + Send + Sync,
        C: Serialize + Send + Sync,
    {
        let mut session = match self.begin().await {
            Ok(s) => s,
            Err(e) => return UseCaseResult::failure(e),
        };

        let aggregate_doc = match to_document(aggregate) {
            Ok(d) => d,
            Err(e) => {
                let _ = session.abort_transaction().await;
                return UseCaseResult::failure(UseCaseError::commit(
                    format!("Failed to serialize aggregate: {}", e),
                ));
            }
        };

        let collection = self.database.collection::<Document>(T::collection_name());
        let write = collection
            .update_one(
                doc! { "_id": aggregate.id(), "version": expected_version },
                doc! { "$set": &aggregate_doc },
            )
            .session(&mut session)
            .await;

        match write {
            Ok(result) if result.matched_count == 0 => {
                let _ = session.abort_transaction().await;
                return UseCaseResult::failure(UseCaseError::concurrency(
                    "VERSION_CONFLICT",
                    format!(
                        "{} '{}' was modified concurrently (expected version {})",
                        T::collection_name(),
                        aggregate.id(),
                        expected_version
                    ),
                ));
            }
            Ok(_) => {}
            Err(e) => {
                let _ = session.abort_transaction().await;
                error!("Failed to persist aggregate: {}", e);
                return UseCaseResult::failure(UseCaseError::commit(
                    format!("Failed to persist aggregate: {}", e),
                ));
            }
        }

        self.finish(session, event, command).await
    }

    async fn commit_all<E, C>(
        &self,
        aggregates: Vec<Box<dyn SerializableAggregate>>,
        event: E,
        command: &C,
    ) -> UseCaseResult<E>
    where
        E: DomainEvent + Serialize + Send + 'static,
        C: Serialize + Send + Sync,
    {
        let mut session = match self.begin().await {
            Ok(s) => s,
            Err(e) => return UseCaseResult::failure(e),
        };

        for aggregate in &aggregates {
            let aggregate_doc = match aggregate.to_document() {
                Ok(d) => d,
                Err(e) => {
                    let _ = session.abort_transaction().await;
                    return UseCaseResult::failure(UseCaseError::commit(
                        format!("Failed to serialize aggregate: {}", e),
                    ));
                }
            };

            let collection = self.database.collection::<Document>(aggregate.collection_name());
            let filter = match aggregate.expected_version() {
                Some(version) => doc! { "_id": aggregate.id(), "version": version },
                None => doc! { "_id": aggregate.id() },
            };
            let guarded = aggregate.expected_version().is_some();

            let write = collection
                .update_one(filter, doc! { "$set": &aggregate_doc })
                .upsert(!guarded)
                .session(&mut session)
                .await;

            match write {
                Ok(result) if guarded && result.matched_count == 0 => {
                    let _ = session.abort_transaction().await;
                    return UseCaseResult::failure(UseCaseError::concurrency(
                        "VERSION_CONFLICT",
                        format!(
                            "{} '{}' was modified concurrently",
                            aggregate.collection_name(),
                            aggregate.id()
                        ),
                    ));
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = session.abort_transaction().await;
                    error!("Failed to persist aggregate: {}", e);
                    return UseCaseResult::failure(UseCaseError::commit(
                        format!("Failed to persist aggregate: {}", e),
                    ));
                }
            }
        }

        self.finish(session, event, command).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_type_from_subject() {
        assert_eq!(
            MongoUnitOfWork::extract_aggregate_type("gym.subscription.0HZX"),
            "Subscription"
        );
        assert_eq!(
            MongoUnitOfWork::extract_aggregate_type("gym.client.abc"),
            "Client"
        );
        assert_eq!(MongoUnitOfWork::extract_aggregate_type(""), "Unknown");
    }

    #[test]
    fn entity_id_from_subject() {
        assert_eq!(
            MongoUnitOfWork::extract_entity_id("gym.client.123"),
            Some("123".to_string())
        );
        assert_eq!(MongoUnitOfWork::extract_entity_id("gym.client"), None);
    }
}
