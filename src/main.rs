// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use sonic_profile_node::{
    api::{start_server, AppState},
    config::NodeConfig,
    registry::RegistryClient,
    storage::GatewayStorjBackend,
};
use std::env;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "sonic-profile-node", about = "Profile verification node")]
struct Args {
    /// Port for the boundary API (overrides API_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    println!("🚀 Starting Sonic Profile Node...\n");

    let mut config = NodeConfig::from_env();
    if let Some(port) = args.port {
        config.api_port = port;
    }

    println!("📋 Registry contract: {}", config.registry.contract_address);
    println!("🌐 RPC endpoint: {}", config.registry.rpc_url);
    println!("📦 Storj bucket: {}", config.storj.bucket);
    if config.registry.deployer_private_key.is_none() {
        println!("⚠️  No DEPLOYER_PRIVATE_KEY set - profile creation disabled, checks only");
    }
    println!();

    let store = GatewayStorjBackend::new(&config.storj)
        .map_err(|e| anyhow::anyhow!("failed to initialize storage backend: {}", e))?;

    let registry = RegistryClient::new(&config.registry)
        .map_err(|e| anyhow::anyhow!("failed to initialize registry client: {}", e))?;

    let state = AppState {
        store: Arc::new(store),
        registry: Arc::new(registry),
        base_url: config.base_url.clone(),
    };

    start_server(state, config.api_port)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
