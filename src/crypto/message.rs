// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Canonical Message Construction
//!
//! Builds the exact string a wallet signs when creating a profile. The
//! boundary reconstructs the same string independently from the discrete
//! request fields, so field order, the `" - "` separator, and address
//! casing are fixed: any divergence makes signature recovery return a
//! different address and verification fail.

/// Action literal for profile creation.
pub const CREATE_PROFILE_ACTION: &str = "Create Profile";

/// Build the canonical profile message.
///
/// The wallet address is always lower-cased here; nickname and storage
/// locator are used verbatim, including case. Pure function: no I/O, no
/// randomness, same inputs always produce the same output.
pub fn build_profile_message(
    action: &str,
    storage_locator: &str,
    commitment_hash: &str,
    nickname: &str,
    address: &str,
) -> String {
    format!(
        "{} - {} - {} - {} - {}",
        action,
        storage_locator,
        commitment_hash,
        nickname,
        address.to_lowercase()
    )
}
