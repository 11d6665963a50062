use outline_service::config::get_configuration;
use outline_service::services::init_metrics;
use outline_service::startup::Application;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "outline-service",
        &settings.telemetry.log_level,
        settings.telemetry.otlp_endpoint.as_deref(),
    )?;

    init_metrics()?;

    let app = Application::build(settings).await?;
    app.run_until_stopped().await?;

    Ok(())
}
