//! Gerbang Lalin Admin - toll-gate traffic dashboard.
//!
//! This binary serves the dashboard on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for server-side rendering
//! - Toll-gate backend over HTTP (login, gates, traffic)
//! - In-memory sessions holding the backend token

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;

use lalin_admin::config::{AdminConfig, LogFormat};
use lalin_admin::state::AppState;
use sentry::integrations::tracing::{self as sentry_tracing, EventFilter};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lalin_admin=info,tower_http=debug";

/// Sentry client options for the dashboard.
fn sentry_options(config: &AdminConfig) -> sentry::ClientOptions {
    sentry::ClientOptions {
        release: sentry::release_name!(),
        environment: config.sentry_environment.clone().map(Cow::Owned),
        sample_rate: config.sentry_sample_rate,
        traces_sample_rate: config.sentry_traces_sample_rate,
        attach_stacktrace: true,
        ..Default::default()
    }
}

/// Warnings and errors become Sentry events, info and debug breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> EventFilter {
    let level = *metadata.level();
    if level <= tracing::Level::WARN {
        EventFilter::Event
    } else if level <= tracing::Level::DEBUG {
        EventFilter::Breadcrumb
    } else {
        EventFilter::Ignore
    }
}

/// Install the subscriber: env filter, text or JSON output, Sentry layer.
fn init_tracing(format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (json, text) = match format {
        LogFormat::Json => (
            Some(tracing_subscriber::fmt::layer().json().flatten_event(true)),
            None,
        ),
        LogFormat::Text => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json)
        .with(text)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Sentry goes first so the tracing layer has a client to report to
    let sentry_guard = config
        .sentry_dsn
        .as_deref()
        .map(|dsn| sentry::init((dsn, sentry_options(&config))));

    init_tracing(config.log_format);
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }
    tracing::info!(backend = %config.api.base_url, "Using toll-gate backend");

    let addr = config.socket_addr();
    let state = AppState::new(config).expect("Failed to create backend client");

    let app = lalin_admin::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("admin listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolve on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Ctrl+C handler failed");
            }
        }
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
