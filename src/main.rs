use std::sync::Arc;

use anyhow::Result;
use routine_relay::config::GatewayConfig;
use routine_relay::gateway::{DomainGuard, Gateway};
use routine_relay::llm::create_provider;
use routine_relay::routes::configure_routes;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = GatewayConfig::from_env()?;
    let provider = create_provider(&config.upstream)?;
    if provider.is_none() {
        tracing::warn!("no upstream credential configured; relay requests will fail with 500");
    }

    let gateway = Arc::new(Gateway::new(
        DomainGuard::default(),
        config.upstream.generation.clone(),
        provider,
    ));
    let routes = configure_routes(gateway, config.max_body_bytes);

    let address = (config.bind_address, config.port);
    tracing::info!(
        bind_address = ?config.bind_address,
        port = config.port,
        max_body_bytes = config.max_body_bytes,
        model = %config.upstream.generation.model,
        "starting relay gateway"
    );
    warp::serve(routes).run(address).await;

    Ok(())
}
