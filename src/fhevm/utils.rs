// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hex and address helpers shared by the SDK and the HTTP handlers.

use std::str::FromStr;

use alloy::primitives::{Address, U256};

/// Encode bytes as `0x`-prefixed lowercase hex.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", alloy::hex::encode(bytes))
}

/// Decode hex with or without a `0x` prefix.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, alloy::hex::FromHexError> {
    alloy::hex::decode(hex)
}

fn is_hex_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// `0x` followed by exactly 40 hex digits. Checksum casing is not enforced.
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .is_some_and(|rest| rest.len() == 40 && is_hex_digits(rest))
}

/// `0x` followed by at least one hex digit.
pub fn is_valid_hex(hex: &str) -> bool {
    hex.strip_prefix("0x")
        .is_some_and(|rest| !rest.is_empty() && is_hex_digits(rest))
}

/// Parse an address after checking its shape with [`is_valid_address`].
pub fn parse_address(address: &str) -> Option<Address> {
    if is_valid_address(address) {
        Address::from_str(address).ok()
    } else {
        None
    }
}

/// Parse a non-negative integer from decimal or `0x` hex notation.
pub fn parse_uint(raw: &str) -> Option<U256> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("0x") {
        if hex.is_empty() || !is_hex_digits(hex) {
            return None;
        }
        U256::from_str_radix(hex, 16).ok()
    } else if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        U256::from_str_radix(raw, 10).ok()
    } else {
        None
    }
}

/// Shorten long strings (keys, ciphertexts) for display: `0xabcd...7890`.
pub fn mask_data(data: &str, visible_chars: usize) -> String {
    if data.len() <= visible_chars * 2 || !data.is_ascii() {
        return data.to_string();
    }
    format!(
        "{}...{}",
        &data[..visible_chars],
        &data[data.len() - visible_chars..]
    )
}
