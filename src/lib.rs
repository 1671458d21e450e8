//! Bookstore catalog application: the authors, books and reviews modules and
//! the bootstrap that wires them to the HTTP server.

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;
pub mod utils;

/// Open the catalog, register every module and run their `init` hooks.
pub async fn bootstrap(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let catalog = bookstore_db::init(&settings.database)
        .await
        .context("failed to open the catalog store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, catalog, settings)?;

    registry
        .init_modules(&InitCtx { settings })
        .await
        .context("module initialization failed")?;

    tracing::info!(modules = registry.module_count(), "bookstore bootstrap complete");
    Ok(registry)
}

/// Bootstrap, serve until shutdown, then stop every module.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = bootstrap(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.start_modules(&ctx).await?;
    let served = bookstore_http::start_server(&registry, &settings).await;
    registry.stop_modules().await?;
    served
}
