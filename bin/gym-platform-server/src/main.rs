//! GymGate Platform Server
//!
//! Production server for the membership REST APIs:
//! - Admin APIs: clients, plans, subscriptions, audit logs
//! - Gate APIs: check-in, access evaluation
//! - Monitoring: health, readiness, metrics
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GYM_API_PORT` | `8080` | HTTP API port |
//! | `GYM_METRICS_PORT` | `9090` | Metrics/health port |
//! | `GYM_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `GYM_MONGO_DB` | `gymgate` | MongoDB database name |
//! | `GYM_DEV_MODE` | - | Seed sample data when `true`/`1` |
//! | `GYM_EXPIRY_SWEEP_SECS` | `3600` | Expiry sweep interval; `0` disables |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;
use std::time::Duration;
use axum::{
    routing::get,
    response::Json,
    Router,
};
use utoipa_axum::router::OpenApiRouter;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use anyhow::Result;
use tracing::{info, warn};
use tokio::{signal, net::TcpListener};
use utoipa_swagger_ui::SwaggerUi;

use gym_platform::access::{AccessService, AccessState, access_router};
use gym_platform::attendance::{AttendanceState, attendance_router};
use gym_platform::audit::{AuditLogsState, audit_logs_router};
use gym_platform::client::{ClientsState, clients_router};
use gym_platform::plan::{PlansState, plans_router};
use gym_platform::subscription::{SubscriptionsState, subscriptions_router};
use gym_platform::{
    AttendanceRepository, AuditLogRepository, ClientRepository,
    SubscriptionPlanRepository, SubscriptionRepository,
    DevDataSeeder, ExecutionContext, MongoUnitOfWork,
};
use gym_platform::client::operations::{RegisterClientUseCase, UpdateClientUseCase};
use gym_platform::plan::operations::{ArchivePlanUseCase, CreatePlanUseCase, UpdatePlanUseCase};
use gym_platform::subscription::operations::{
    CreateSubscriptionUseCase, ExpireSubscriptionsUseCase, RecordPaymentUseCase,
    RenewSubscriptionUseCase, UpdateSubscriptionStatusUseCase,
};
use gym_platform::attendance::operations::CheckInUseCase;
use gym_platform::shared::indexes::initialize_indexes;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    gym_common::logging::init_logging("gym-platform-server");

    info!("Starting GymGate Platform Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("GYM_API_PORT", 8080);
    let metrics_port: u16 = env_or_parse("GYM_METRICS_PORT", 9090);
    let mongo_url = env_or("GYM_MONGO_URL", "mongodb://localhost:27017");
    let mongo_db = env_or("GYM_MONGO_DB", "gymgate");
    let sweep_secs: u64 = env_or_parse("GYM_EXPIRY_SWEEP_SECS", 3600);

    // Connect to MongoDB
    info!("Connecting to MongoDB: {}/{}", mongo_url, mongo_db);
    let mongo_client = mongodb::Client::with_uri_str(&mongo_url).await?;
    let db = mongo_client.database(&mongo_db);

    initialize_indexes(&db).await?;

    // Seed development data if in dev mode
    let dev_mode = std::env::var("GYM_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        let seeder = DevDataSeeder::new(db.clone());
        if let Err(e) = seeder.seed().await {
            warn!("Dev data seeding skipped (data may already exist): {}", e);
        }
    }

    // Initialize repositories
    let client_repo = Arc::new(ClientRepository::new(&db));
    let plan_repo = Arc::new(SubscriptionPlanRepository::new(&db));
    let subscription_repo = Arc::new(SubscriptionRepository::new(&db));
    let attendance_repo = Arc::new(AttendanceRepository::new(&db));
    let audit_log_repo = Arc::new(AuditLogRepository::new(&db));
    info!("Repositories initialized");

    // Unit of work for atomic commits with events and audit logs
    let unit_of_work = Arc::new(MongoUnitOfWork::new(mongo_client.clone(), db.clone()));

    // Access decision service
    let access_service = Arc::new(AccessService::new(
        client_repo.clone(),
        subscription_repo.clone(),
    ));

    // Client use cases
    let register_client_use_case = Arc::new(RegisterClientUseCase::new(
        client_repo.clone(),
        unit_of_work.clone(),
    ));
    let update_client_use_case = Arc::new(UpdateClientUseCase::new(
        client_repo.clone(),
        unit_of_work.clone(),
    ));

    // Plan use cases
    let create_plan_use_case = Arc::new(CreatePlanUseCase::new(
        plan_repo.clone(),
        unit_of_work.clone(),
    ));
    let update_plan_use_case = Arc::new(UpdatePlanUseCase::new(
        plan_repo.clone(),
        unit_of_work.clone(),
    ));
    let archive_plan_use_case = Arc::new(ArchivePlanUseCase::new(
        plan_repo.clone(),
        unit_of_work.clone(),
    ));

    // Subscription use cases
    let create_subscription_use_case = Arc::new(CreateSubscriptionUseCase::new(
        subscription_repo.clone(),
        client_repo.clone(),
        plan_repo.clone(),
        unit_of_work.clone(),
    ));
    let renew_subscription_use_case = Arc::new(RenewSubscriptionUseCase::new(
        subscription_repo.clone(),
        plan_repo.clone(),
        unit_of_work.clone(),
    ));
    let update_status_use_case = Arc::new(UpdateSubscriptionStatusUseCase::new(
        subscription_repo.clone(),
        unit_of_work.clone(),
    ));
    let record_payment_use_case = Arc::new(RecordPaymentUseCase::new(
        subscription_repo.clone(),
        unit_of_work.clone(),
    ));
    let expire_use_case = Arc::new(ExpireSubscriptionsUseCase::new(
        subscription_repo.clone(),
        unit_of_work.clone(),
    ));

    // Attendance use case
    let check_in_use_case = Arc::new(CheckInUseCase::new(
        access_service.clone(),
        unit_of_work.clone(),
    ));

    // Build API states
    let clients_state = ClientsState {
        client_repo: client_repo.clone(),
        subscription_repo: subscription_repo.clone(),
        attendance_repo: attendance_repo.clone(),
        register_use_case: register_client_use_case,
        update_use_case: update_client_use_case,
    };
    let plans_state = PlansState {
        plan_repo,
        create_use_case: create_plan_use_case,
        update_use_case: update_plan_use_case,
        archive_use_case: archive_plan_use_case,
    };
    let subscriptions_state = SubscriptionsState {
        subscription_repo,
        create_use_case: create_subscription_use_case,
        renew_use_case: renew_subscription_use_case,
        update_status_use_case,
        record_payment_use_case,
        expire_use_case: expire_use_case.clone(),
    };
    let attendance_state = AttendanceState {
        attendance_repo,
        check_in_use_case,
    };
    let access_state = AccessState { access_service };
    let audit_logs_state = AuditLogsState { audit_log_repo };

    // OpenAPI-collected routers
    let (openapi_router, mut openapi) = OpenApiRouter::new()
        .nest("/api/access", access_router(access_state))
        .nest("/api/admin/audit-logs", audit_logs_router(audit_logs_state))
        .split_for_parts();

    openapi.info.title = "GymGate Platform API".to_string();
    openapi.info.version = "1.0.0".to_string();
    openapi.info.description =
        Some("REST APIs for memberships, payments, and check-ins".to_string());

    // Full application router
    let app = Router::new()
        .merge(openapi_router)
        .nest("/api/admin/clients", clients_router(clients_state))
        .nest("/api/admin/plans", plans_router(plans_state))
        .nest("/api/admin/subscriptions", subscriptions_router(subscriptions_state))
        .nest("/api/attendance", attendance_router(attendance_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    // Periodic expiry sweep (the operation itself is idempotent, so the
    // interval only controls how fresh EXPIRED statuses are)
    let sweep_task = if sweep_secs > 0 {
        let expire = expire_use_case;
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(sweep_secs));
            loop {
                interval.tick().await;
                let today = chrono::Utc::now().date_naive();
                let ctx = ExecutionContext::create("scheduler");
                match expire.execute(today, ctx).await {
                    Ok(expired) if expired > 0 => {
                        info!(expired, "Expiry sweep transitioned subscriptions");
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Expiry sweep failed: {}", e),
                }
            }
        }))
    } else {
        None
    };

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(api_listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    // Start metrics server
    let metrics_addr = format!("0.0.0.0:{}", metrics_port);
    info!("Metrics server listening on http://{}/metrics", metrics_addr);

    let metrics_app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler));

    let metrics_listener = TcpListener::bind(&metrics_addr).await?;
    let metrics_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, metrics_app).await {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    info!("GymGate Platform Server started");
    info!("Press Ctrl+C to shutdown");

    shutdown_signal().await;
    info!("Shutdown signal received...");

    if let Some(task) = sweep_task {
        task.abort();
    }
    api_task.abort();
    metrics_task.abort();

    info!("GymGate Platform Server shutdown complete");
    Ok(())
}

async fn metrics_handler() -> &'static str {
    "# HELP gym_platform_up Platform is up\n# TYPE gym_platform_up gauge\ngym_platform_up 1\n"
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "READY"
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
