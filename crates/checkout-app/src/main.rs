use std::time::Duration;

use checkout_hex::application::order_controller::OrderController;
use checkout_hex::config::Config;
use checkout_hex::inbound::http::{HttpServer, HttpServerConfig};
use checkout_payment::{build_gateway, Gateway, GatewayConfig};
use checkout_repo::{build_repo, Repo};
use checkout_types::domain::cpf::ChecksumCpfValidator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / PAYMENT_* when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    let gateway: Gateway = build_gateway(&GatewayConfig {
        url: config.payment_gateway_url.clone(),
        merchant_key: config.payment_merchant_key.clone(),
        timeout: config.payment_timeout_secs.map(Duration::from_secs),
    })?;
    let controller = OrderController::new(repo, ChecksumCpfValidator, gateway);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(controller, server_cfg).await?;
    http.run().await
}
