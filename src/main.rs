//! Binary entry point for flatchain.

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use flatchain::config::{Cli, NodeConfig};
use flatchain::network::server::router;
use flatchain::network::state::NodeState;
use flatchain::wallet::keystore::FileKeystore;
use flatchain::wallet::Wallet;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let _ = env_logger::builder().is_test(false).try_init();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .ok();

    let config = NodeConfig::from_cli(Cli::parse());

    let keystore = FileKeystore::new(&config.data_dir, config.node_id.as_deref());
    let keys = keystore.load_or_generate()?;
    let wallet = Wallet::new(keys);
    log::info!("node public key: {}", wallet.public_key_pem());

    let state = NodeState::new(wallet, config.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    log::info!("listening on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    log::info!("shutdown signal received, exiting");
}
