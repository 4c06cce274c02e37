//! Lowercase-normalised EVM wallet addresses, as persisted by the wallet link
//! service (`^0x[0-9a-f]{40}$`).
//!
//! This is deliberately a distinct type from the checksummed
//! [`alloy_primitives::Address`] used by the chain client/event parser: wallet
//! rows are compared and uniqued by their lowercase string form, not by the
//! 20-byte value, so storing it as a validated string avoids a
//! normalise-on-every-read footgun.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = raw.as_ref();
        let lower = raw.to_ascii_lowercase();

        let body = lower
            .strip_prefix("0x")
            .ok_or_else(|| CoreError::Validation(format!("address '{raw}' missing 0x prefix")))?;

        if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::Validation(format!(
                "address '{raw}' is not 20 bytes of hex"
            )));
        }

        Ok(Self(lower))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_case() {
        let a = WalletAddress::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(WalletAddress::parse("0xabc").is_err());
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(WalletAddress::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
    }
}
