use anyhow::Context;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "bookstore-app starting"
    );

    bookstore_app::run(settings).await
}
