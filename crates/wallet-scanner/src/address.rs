//! Wallet Address Validation
//!
//! EVM addresses: `0x` followed by 40 hex digits. Checked locally, before any
//! network call is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScannerError};

const HEX_LEN: usize = 40;

/// A validated wallet address, stored lowercase
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validate raw user text
    pub fn parse(raw: &str) -> Result<Self> {
        let text = raw.trim();
        let hex = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| ScannerError::InvalidFormat(abbreviate(text)))?;

        if hex.len() != HEX_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ScannerError::InvalidFormat(abbreviate(text)));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd`
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }

    /// Case-insensitive comparison against an address reported by an API
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

/// Validate raw user text into a canonical address
pub fn validate(raw: &str) -> Result<WalletAddress> {
    WalletAddress::parse(raw)
}

// Keeps log lines bounded when users paste long text
fn abbreviate(text: &str) -> String {
    match text.char_indices().nth(48) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

impl FromStr for WalletAddress {
    type Err = ScannerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ScannerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_address() {
        let address = validate("0x1234567890123456789012345678901234567890").unwrap();
        assert_eq!(address.as_str(), "0x1234567890123456789012345678901234567890");
        assert_eq!(address.short(), "0x1234...7890");
    }

    #[test]
    fn test_rejects_malformed_input() {
        let cases = [
            "0x123",
            "",
            "   ",
            "1234567890123456789012345678901234567890",
            "0x123456789012345678901234567890123456789g",
            "0x12345678901234567890123456789012345678901",
            "0x 234567890123456789012345678901234567890",
            "hello there",
            "/trending",
        ];
        for case in cases {
            assert!(
                matches!(validate(case), Err(ScannerError::InvalidFormat(_))),
                "accepted {:?}",
                case
            );
        }
    }

    #[test]
    fn test_case_insensitive_canonical_form() {
        let mixed = validate("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();
        let lower = validate("0xd8da6bf26964af9d7eed9e03e53415d37aa96045").unwrap();
        let upper_prefix = validate("0XD8DA6BF26964AF9D7EED9E03E53415D37AA96045").unwrap();

        assert_eq!(mixed, lower);
        assert_eq!(mixed, upper_prefix);
        assert_eq!(validate(mixed.as_str()).unwrap(), mixed);
    }

    #[test]
    fn test_trims_whitespace() {
        let address = validate("  0x1234567890123456789012345678901234567890\n").unwrap();
        assert!(address.matches("0x1234567890123456789012345678901234567890"));
    }

    #[test]
    fn test_matches_ignores_case() {
        let address = validate("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd").unwrap();
        assert!(address.matches("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"));
        assert!(!address.matches("0x0000000000000000000000000000000000000000"));
    }
}
