// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wallet Session Capability
//!
//! The orchestrator never touches a wallet directly; it receives a
//! `WalletSession` value carrying the address and a signing capability.
//! A signing request may suspend indefinitely while the user decides, and
//! rejection surfaces as `SigningDenied`.

use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;

use crate::crypto::signature::{address_of, sign_message};
use crate::error::ProfileError;

#[async_trait]
pub trait WalletSession: Send + Sync {
    /// The wallet's Ethereum address (0x-prefixed hex, any casing).
    fn address(&self) -> &str;

    /// Request a `personal_sign` signature over `message`. Unbounded wait
    /// from the caller's perspective; the user may cancel.
    async fn sign_message(&self, message: &str) -> Result<String, ProfileError>;
}

/// In-process wallet backed by a raw secp256k1 key. Used by tests and dev
/// tooling; browser wallets implement the same trait over an RPC bridge.
pub struct LocalWalletSession {
    private_key: [u8; 32],
    address: String,
}

impl LocalWalletSession {
    pub fn new(private_key: [u8; 32]) -> Result<Self, ProfileError> {
        let address = address_of(&private_key)?;
        Ok(Self {
            private_key,
            address,
        })
    }

    /// Fresh random wallet.
    pub fn random() -> Result<Self, ProfileError> {
        let signing_key = SigningKey::random(&mut OsRng);
        let private_key: [u8; 32] = signing_key.to_bytes().into();
        Self::new(private_key)
    }
}

#[async_trait]
impl WalletSession for LocalWalletSession {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, message: &str) -> Result<String, ProfileError> {
        sign_message(&self.private_key, message)
    }
}

/// Wallet whose user rejects every signing request. Exercises the
/// cancellation path.
pub struct DenyingWalletSession {
    address: String,
}

impl DenyingWalletSession {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
        }
    }
}

#[async_trait]
impl WalletSession for DenyingWalletSession {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign_message(&self, _message: &str) -> Result<String, ProfileError> {
        Err(ProfileError::SigningDenied)
    }
}
