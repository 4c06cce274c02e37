//! CAIP-2 chain identifiers (`namespace:reference`, e.g. `eip155:1`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A validated CAIP-2 chain identifier.
///
/// Only the `eip155` namespace (EVM chains, reference = numeric chain id) is
/// exercised by this workspace, but the type accepts any CAIP-2-shaped string
/// so configuration is not hard-coded to a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
    /// Parse and validate a CAIP-2 string.
    ///
    /// Grammar: `^[a-z0-9]+:[a-zA-Z0-9]+$`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let (namespace, reference) = raw
            .split_once(':')
            .ok_or_else(|| CoreError::Validation(format!("chain id '{raw}' missing ':'")))?;

        let namespace_ok = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let reference_ok = !reference.is_empty() && reference.chars().all(|c| c.is_ascii_alphanumeric());

        if !namespace_ok || !reference_ok {
            return Err(CoreError::Validation(format!(
                "chain id '{raw}' does not match CAIP-2 grammar"
            )));
        }

        Ok(Self(raw))
    }

    /// Convenience constructor for EVM chains identified by numeric chain id.
    pub fn eip155(numeric_chain_id: u64) -> Self {
        Self(format!("eip155:{numeric_chain_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn namespace(&self) -> &str {
        self.0.split_once(':').map(|(ns, _)| ns).unwrap_or(&self.0)
    }

    pub fn reference(&self) -> &str {
        self.0.split_once(':').map(|(_, r)| r).unwrap_or("")
    }

    /// Numeric chain id, when the namespace is `eip155`.
    pub fn eip155_numeric(&self) -> Option<u64> {
        if self.namespace() != "eip155" {
            return None;
        }
        self.reference().parse().ok()
    }

    /// Routing-key-friendly form: `eip155-1` instead of `eip155:1`.
    pub fn routing_fragment(&self) -> String {
        self.0.replace(':', "-")
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ChainId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ChainId> for String {
    fn from(value: ChainId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_mainnet() {
        let id = ChainId::parse("eip155:1").unwrap();
        assert_eq!(id.namespace(), "eip155");
        assert_eq!(id.reference(), "1");
        assert_eq!(id.eip155_numeric(), Some(1));
        assert_eq!(id.routing_fragment(), "eip155-1");
    }

    #[test]
    fn eip155_helper_matches_parse() {
        assert_eq!(ChainId::eip155(137), ChainId::parse("eip155:137").unwrap());
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(ChainId::parse("eip1551").is_err());
    }

    #[test]
    fn rejects_uppercase_namespace() {
        assert!(ChainId::parse("EIP155:1").is_err());
    }

    #[test]
    fn rejects_empty_reference() {
        assert!(ChainId::parse("eip155:").is_err());
    }

    #[test]
    fn accepts_alphanumeric_reference() {
        // e.g. Sepolia-style or non-numeric references some namespaces use.
        assert!(ChainId::parse("eip155:sepolia11155111").is_ok());
    }
}
