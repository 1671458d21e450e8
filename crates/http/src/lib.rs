//! HTTP server facade for the bookstore service: Axum routing, the error
//! envelope, Basic authentication, and OpenAPI support.

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use bookstore_authz::BasicAuthenticator;
use bookstore_kernel::{settings::Settings, ModuleRegistry};

pub mod auth;
pub mod error;
pub mod fallback;
pub mod router;

pub use error::{ApiError, ErrorBody};
use router::RouterBuilder;

/// Start the HTTP server and serve until ctrl-c or SIGTERM
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings)
        .await
        .context("failed to build HTTP router")?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub async fn build_router(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<Router> {
    let mut router_builder = RouterBuilder::new().route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    let authenticator = Arc::new(BasicAuthenticator::from_settings(&settings.auth));

    // layers last: each one wraps everything registered above it
    Ok(router_builder
        .with_openapi(registry)
        .with_fallback()
        .with_authentication(authenticator)
        .with_timeout(settings.server.request_timeout_ms)
        .with_tracing()
        .with_request_id()
        .with_cors()
        .build())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
