use anyhow::Context;

use catalog_infra::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let config = ServiceConfig::load().context("failed to load configuration")?;
    let bind_addr = config.bind_addr();
    let service = config.service;
    let backend = if config.database_url.is_some() { "postgres" } else { "memory" };

    let app = catalog_api::app::build_app(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!(
        service = service.service_name(),
        addr = %listener.local_addr()?,
        backend,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
