//! MongoDB Index Initialization
//!
//! Creates indexes for all collections on application startup.

use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};
use tracing::info;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_client_indexes(db).await?;
    create_plan_indexes(db).await?;
    create_subscription_indexes(db).await?;
    create_attendance_indexes(db).await?;
    create_event_indexes(db).await?;
    create_audit_log_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

async fn create_client_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let clients = db.collection::<mongodb::bson::Document>("clients");

    // Phone lookup (unique)
    clients.create_index(
        IndexModel::builder()
            .keys(doc! { "phone": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .background(true)
                .build())
            .build(),
    ).await?;

    // Fingerprint device token lookup (unique, sparse - not every client is enrolled)
    clients.create_index(
        IndexModel::builder()
            .keys(doc! { "fingerprintId": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .background(true)
                .build())
            .build(),
    ).await?;

    info!("Created indexes on clients");
    Ok(())
}

async fn create_plan_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let plans = db.collection::<mongodb::bson::Document>("subscription_plans");

    // Name lookup (unique)
    plans.create_index(
        IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .background(true)
                .build())
            .build(),
    ).await?;

    // Active filtering
    plans.create_index(
        IndexModel::builder()
            .keys(doc! { "active": 1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    info!("Created indexes on subscription_plans");
    Ok(())
}

async fn create_subscription_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let subscriptions = db.collection::<mongodb::bson::Document>("subscriptions");

    // Per-client history, newest coverage first
    subscriptions.create_index(
        IndexModel::builder()
            .keys(doc! { "clientId": 1, "endDate": -1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    // Expiry sweep: ACTIVE subscriptions past their end date
    subscriptions.create_index(
        IndexModel::builder()
            .keys(doc! { "status": 1, "endDate": 1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    // Plan reference guard (archive checks)
    subscriptions.create_index(
        IndexModel::builder()
            .keys(doc! { "planId": 1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    info!("Created indexes on subscriptions");
    Ok(())
}

async fn create_attendance_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let attendance = db.collection::<mongodb::bson::Document>("attendance");

    // Per-client, per-day lookups ("has checked in today")
    attendance.create_index(
        IndexModel::builder()
            .keys(doc! { "clientId": 1, "date": -1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    // Daily listings
    attendance.create_index(
        IndexModel::builder()
            .keys(doc! { "date": -1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    info!("Created indexes on attendance");
    Ok(())
}

async fn create_event_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let events = db.collection::<mongodb::bson::Document>("events");

    // Idempotency - essential for deduplication
    events.create_index(
        IndexModel::builder()
            .keys(doc! { "deduplicationId": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .sparse(true)
                .background(true)
                .build())
            .build(),
    ).await?;

    info!("Created indexes on events");
    Ok(())
}

async fn create_audit_log_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let audit_logs = db.collection::<mongodb::bson::Document>("audit_logs");

    // Entity lookup
    audit_logs.create_index(
        IndexModel::builder()
            .keys(doc! { "entityType": 1, "entityId": 1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    // Time-ordered listing
    audit_logs.create_index(
        IndexModel::builder()
            .keys(doc! { "performedAt": -1 })
            .options(IndexOptions::builder().background(true).build())
            .build(),
    ).await?;

    info!("Created indexes on audit_logs");
    Ok(())
}
