// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Profile Registry Contract Client
//!
//! Read/write access to the on-chain ProfileRegistry: the existence check
//! that gates creation, the profile record read, and the `createProfile`
//! transaction the boundary submits after verifying a signature.
//!
//! A registry read that fails does NOT mean "no profile" — existence stays
//! unknown and is reported as such, so a transient RPC outage can never be
//! mistaken for confirmed absence.

use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::prelude::*;
use ethers::signers::{LocalWallet, Signer};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::ProfileError;

abigen!(
    ProfileRegistry,
    r#"[
        function profileExists(address user) view returns (bool)
        function getProfile(address user) view returns (string, bytes32, bool, uint256, uint256)
        function createProfile(string storjUrl, bytes32 legalNameHash, string nickname, bytes signature)
        event ProfileCreated(address indexed user, string storjUrl, uint256 timestamp)
    ]"#
);

/// On-chain profile record, mirroring the registry tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct OnChainProfile {
    pub storj_profile_url: String,
    pub legal_name_hash: String,
    /// Monotonic false→true switch, enforced by the contract.
    pub legal_name_changed: bool,
    pub created_at: u64,
    pub nonce: u64,
}

/// Receipt of a mined `createProfile` transaction.
#[derive(Debug, Clone)]
pub struct CreationReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
}

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub chain_id: u64,
    /// Key of the relayer account that pays for `createProfile` gas.
    pub deployer_private_key: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.testnet.soniclabs.com".to_string(),
            contract_address: String::new(),
            chain_id: 64165,
            deployer_private_key: None,
        }
    }
}

/// Registry boundary used by the API handlers. Mockable for tests.
#[async_trait]
pub trait RegistryClientTrait: Send + Sync {
    /// Confirmed existence answer. A read failure surfaces as
    /// `ExistenceUnknown`, never as `Ok(false)`.
    async fn profile_exists(&self, address: &str) -> Result<bool, ProfileError>;

    async fn get_profile(&self, address: &str) -> Result<OnChainProfile, ProfileError>;

    async fn create_profile(
        &self,
        address: &str,
        storj_url: &str,
        legal_name_hash: &str,
        nickname: &str,
        signature: &str,
    ) -> Result<CreationReceipt, ProfileError>;
}

type RegistryWithSigner = ProfileRegistry<SignerMiddleware<Provider<Http>, LocalWallet>>;

pub struct RegistryClient {
    reader: ProfileRegistry<Provider<Http>>,
    writer: Option<RegistryWithSigner>,
}

impl RegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self, ProfileError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| ProfileError::Registry(format!("invalid RPC url: {}", e)))?;
        let contract_address = Address::from_str(&config.contract_address)
            .map_err(|e| ProfileError::Registry(format!("invalid contract address: {}", e)))?;

        let reader = ProfileRegistry::new(contract_address, Arc::new(provider.clone()));

        let writer = match &config.deployer_private_key {
            Some(key) => {
                let wallet = key
                    .trim_start_matches("0x")
                    .parse::<LocalWallet>()
                    .map_err(|e| ProfileError::Registry(format!("invalid deployer key: {}", e)))?
                    .with_chain_id(config.chain_id);
                let signer = Arc::new(SignerMiddleware::new(provider, wallet));
                Some(ProfileRegistry::new(contract_address, signer))
            }
            None => None,
        };

        Ok(Self { reader, writer })
    }

    fn parse_address(address: &str) -> Result<Address, ProfileError> {
        Address::from_str(address)
            .map_err(|_| ProfileError::Validation(format!("Invalid wallet address: {}", address)))
    }

    fn parse_hash(legal_name_hash: &str) -> Result<[u8; 32], ProfileError> {
        let bytes = hex::decode(legal_name_hash.trim_start_matches("0x")).map_err(|_| {
            ProfileError::Validation(
                "Invalid legal name hash format. Must be 32 bytes hex string.".to_string(),
            )
        })?;
        bytes.try_into().map_err(|_| {
            ProfileError::Validation(
                "Invalid legal name hash format. Must be 32 bytes hex string.".to_string(),
            )
        })
    }

    /// Map a revert reason onto the closed taxonomy; everything else passes
    /// through as a registry error with the original text.
    fn map_revert(reason: String) -> ProfileError {
        let lower = reason.to_lowercase();
        if lower.contains("profile already exists") {
            ProfileError::ProfileAlreadyExists
        } else if lower.contains("nickname") && lower.contains("taken") {
            ProfileError::NicknameTaken
        } else {
            ProfileError::Registry(reason)
        }
    }
}

#[async_trait]
impl RegistryClientTrait for RegistryClient {
    async fn profile_exists(&self, address: &str) -> Result<bool, ProfileError> {
        let user = Self::parse_address(address)?;

        let exists = self
            .reader
            .profile_exists(user)
            .call()
            .await
            .map_err(|e| ProfileError::ExistenceUnknown(e.to_string()))?;

        debug!("profileExists({}) = {}", address, exists);
        Ok(exists)
    }

    async fn get_profile(&self, address: &str) -> Result<OnChainProfile, ProfileError> {
        let user = Self::parse_address(address)?;

        let (storj_profile_url, legal_name_hash, legal_name_changed, created_at, nonce) = self
            .reader
            .get_profile(user)
            .call()
            .await
            .map_err(|e| ProfileError::Registry(e.to_string()))?;

        Ok(OnChainProfile {
            storj_profile_url,
            legal_name_hash: format!("0x{}", hex::encode(legal_name_hash)),
            legal_name_changed,
            created_at: created_at.as_u64(),
            nonce: nonce.as_u64(),
        })
    }

    async fn create_profile(
        &self,
        address: &str,
        storj_url: &str,
        legal_name_hash: &str,
        nickname: &str,
        signature: &str,
    ) -> Result<CreationReceipt, ProfileError> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| ProfileError::Registry("no deployer key configured".to_string()))?;

        let hash_bytes = Self::parse_hash(legal_name_hash)?;
        let signature_bytes = hex::decode(signature.trim_start_matches("0x"))
            .map_err(|e| ProfileError::MalformedSignature(format!("invalid hex: {}", e)))?;

        info!(
            "Submitting createProfile for {} (nickname {}, locator {})",
            address, nickname, storj_url
        );

        let call = writer.create_profile(
            storj_url.to_string(),
            hash_bytes,
            nickname.to_string(),
            Bytes::from(signature_bytes),
        );

        // Simulate first so reverts surface with their reason instead of a
        // burned transaction
        if let Err(e) = call.call().await {
            return Err(Self::map_revert(e.to_string()));
        }

        let pending_tx = call
            .send()
            .await
            .map_err(|e| Self::map_revert(e.to_string()))?;
        let tx_hash = pending_tx.tx_hash();

        let receipt = pending_tx
            .await
            .map_err(|e| ProfileError::Registry(e.to_string()))?
            .ok_or_else(|| ProfileError::Registry("transaction dropped".to_string()))?;

        info!(
            "✅ Profile created for {} in block {:?}",
            address, receipt.block_number
        );

        Ok(CreationReceipt {
            transaction_hash: format!("{:?}", tx_hash),
            block_number: receipt.block_number.map(|b| b.as_u64()).unwrap_or_default(),
            gas_used: receipt.gas_used.map(|g| g.as_u64()).unwrap_or_default(),
        })
    }
}

/// In-memory registry for tests: a single-writer map keyed by lowercased
/// address, plus optional error injection for read-failure paths.
pub struct MockRegistry {
    profiles: Arc<Mutex<HashMap<String, OnChainProfile>>>,
    nicknames: Arc<Mutex<HashMap<String, String>>>,
    read_error: Arc<Mutex<Option<String>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Mutex::new(HashMap::new())),
            nicknames: Arc::new(Mutex::new(HashMap::new())),
            read_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the next reads fail, simulating an RPC outage.
    pub async fn set_read_error(&self, reason: &str) {
        *self.read_error.lock().await = Some(reason.to_string());
    }

    pub async fn clear_read_error(&self) {
        *self.read_error.lock().await = None;
    }

    async fn check_read_error(&self) -> Result<(), String> {
        match self.read_error.lock().await.as_ref() {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClientTrait for MockRegistry {
    async fn profile_exists(&self, address: &str) -> Result<bool, ProfileError> {
        self.check_read_error()
            .await
            .map_err(ProfileError::ExistenceUnknown)?;
        let profiles = self.profiles.lock().await;
        Ok(profiles.contains_key(&address.to_lowercase()))
    }

    async fn get_profile(&self, address: &str) -> Result<OnChainProfile, ProfileError> {
        self.check_read_error()
            .await
            .map_err(ProfileError::Registry)?;
        let profiles = self.profiles.lock().await;
        profiles
            .get(&address.to_lowercase())
            .cloned()
            .ok_or_else(|| ProfileError::Registry(format!("no profile for {}", address)))
    }

    async fn create_profile(
        &self,
        address: &str,
        storj_url: &str,
        legal_name_hash: &str,
        nickname: &str,
        _signature: &str,
    ) -> Result<CreationReceipt, ProfileError> {
        let key = address.to_lowercase();

        let mut profiles = self.profiles.lock().await;
        if profiles.contains_key(&key) {
            return Err(ProfileError::ProfileAlreadyExists);
        }

        let mut nicknames = self.nicknames.lock().await;
        if let Some(owner) = nicknames.get(nickname) {
            if owner != &key {
                return Err(ProfileError::NicknameTaken);
            }
        }

        profiles.insert(
            key.clone(),
            OnChainProfile {
                storj_profile_url: storj_url.to_string(),
                legal_name_hash: legal_name_hash.to_string(),
                legal_name_changed: false,
                created_at: 1_700_000_000,
                nonce: 0,
            },
        );
        nicknames.insert(nickname.to_string(), key);

        Ok(CreationReceipt {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            block_number: 1,
            gas_used: 21_000,
        })
    }
}
