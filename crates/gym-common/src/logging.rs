//! Structured Logging Setup
//!
//! One entry point, [`init_logging`], shared by all GymGate binaries:
//! - `LOG_FORMAT=json` switches to JSON output for log aggregation
//! - anything else (the default) gives human-readable text for development
//! - `RUST_LOG` controls level filtering (default: info),
//!   e.g. `RUST_LOG=gym_platform=debug,tower_http=info`
//!
//! Use `tracing` macros with structured fields throughout:
//!
//! ```rust,ignore
//! tracing::info!(client_id = %id, "Check-in recorded");
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Initialize the global tracing subscriber for a service.
///
/// Must be called once, before any logging happens. The service name is
/// currently unused but kept in the signature so callers identify themselves
/// at the one place the logging contract is visible.
pub fn init_logging(_service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    #[test]
    fn default_filter_parses() {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));
        drop(filter);
    }
}
