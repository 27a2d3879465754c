// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node Configuration
//!
//! Environment-driven configuration for the boundary node. A `.env` file is
//! honored when present; every value has a testnet-friendly default except
//! the deployer key, which stays unset unless provided.

use std::env;
use std::time::Duration;

use crate::registry::RegistryConfig;
use crate::storage::StorjConfig;

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub api_port: u16,
    /// Public base URL used when rewriting locators to download links.
    pub base_url: String,
    pub registry: RegistryConfig,
    pub storj: StorjConfig,
}

impl NodeConfig {
    pub fn from_env() -> Self {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let registry = RegistryConfig {
            rpc_url: env::var("SONIC_RPC_URL")
                .unwrap_or_else(|_| "https://rpc.testnet.soniclabs.com".to_string()),
            contract_address: env::var("PROFILE_CONTRACT_ADDRESS")
                .unwrap_or_else(|_| "0x801897c550809C5c28A14cbb8b55aF45733b8524".to_string()),
            chain_id: env::var("CHAIN_ID")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(64165),
            deployer_private_key: env::var("DEPLOYER_PRIVATE_KEY").ok(),
        };

        let storj = StorjConfig {
            gateway_url: env::var("STORJ_ENDPOINT")
                .unwrap_or_else(|_| "https://gateway.storjshare.io".to_string()),
            bucket: env::var("STORJ_BUCKET").unwrap_or_else(|_| "sonic-profile".to_string()),
            timeout: Duration::from_secs(
                env::var("STORAGE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(30),
            ),
        };

        Self {
            api_port,
            base_url,
            registry,
            storj,
        }
    }
}
