//! Identifier types for wallets and the accounts they control.
//!
//! These are newtype wrappers: an [`Address`] and a [`ChainId`] are both
//! "just" a string and a number underneath, but giving them names means a
//! chain id can never be passed where an address is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::WalletError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A wallet address as reported by the connector.
///
/// Addresses are normalized to lowercase on construction. Wallets disagree
/// about checksum casing (`0xAbC…` vs `0xabc…`), and the address is used to
/// derive storage keys, so two spellings of the same account must compare
/// equal and map to the same key.
///
/// `#[serde(transparent)]` serializes this as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address, trimming whitespace and lowercasing it.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    /// Returns the normalized address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ---------------------------------------------------------------------------
// ChainId
// ---------------------------------------------------------------------------

/// An EVM chain identifier.
///
/// Identity sessions are only issued for the canonical chain
/// ([`ChainId::MAINNET`]) unless multichain support is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Ethereum mainnet, the canonical chain for identity sessions.
    pub const MAINNET: ChainId = ChainId(1);

    /// Returns `true` for [`ChainId::MAINNET`].
    pub fn is_mainnet(self) -> bool {
        self == Self::MAINNET
    }

    /// Parses the `0x`-prefixed hex form wallet providers report
    /// (`eth_chainId` returns `"0x1"` for mainnet).
    ///
    /// # Errors
    /// Returns [`WalletError::InvalidChainId`] if the prefix is missing or
    /// the digits are not valid hex.
    pub fn from_hex(raw: &str) -> Result<Self, WalletError> {
        let digits = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .ok_or_else(|| WalletError::InvalidChainId(raw.to_string()))?;
        u64::from_str_radix(digits, 16)
            .map(ChainId)
            .map_err(|_| WalletError::InvalidChainId(raw.to_string()))
    }

    /// Formats the id as `0x`-prefixed hex, the form `wallet_switchEthereumChain` expects.
    pub fn to_hex(self) -> String {
        format!("{:#x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mainnet() {
            write!(f, "mainnet")
        } else {
            write!(f, "eip155:{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// An address on a specific chain, in CAIP-10 form (`eip155:1:0xabc…`).
///
/// This is the pair an identity session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId {
    pub address: Address,
    pub chain: ChainId,
}

impl AccountId {
    pub fn new(address: Address, chain: ChainId) -> Self {
        Self { address, chain }
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "eip155:{}:{}", self.chain.0, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_new_normalizes_case_and_whitespace() {
        let a = Address::new("  0xAbCdEf  ");
        assert_eq!(a.as_str(), "0xabcdef");
        assert_eq!(a, Address::from("0xABCDEF"));
    }

    #[test]
    fn test_address_serializes_as_bare_string() {
        let json = serde_json::to_string(&Address::new("0xAB")).unwrap();
        assert_eq!(json, "\"0xab\"");
    }

    #[test]
    fn test_chain_id_from_hex_parses_provider_format() {
        assert_eq!(ChainId::from_hex("0x1").unwrap(), ChainId::MAINNET);
        assert_eq!(ChainId::from_hex("0xa4b1").unwrap(), ChainId(42161));
    }

    #[test]
    fn test_chain_id_from_hex_rejects_garbage() {
        assert!(matches!(
            ChainId::from_hex("1"),
            Err(WalletError::InvalidChainId(_))
        ));
        assert!(matches!(
            ChainId::from_hex("0xzz"),
            Err(WalletError::InvalidChainId(_))
        ));
    }

    #[test]
    fn test_chain_id_to_hex_round_trips_mainnet() {
        assert_eq!(ChainId::MAINNET.to_hex(), "0x1");
    }

    #[test]
    fn test_chain_id_display() {
        assert_eq!(ChainId::MAINNET.to_string(), "mainnet");
        assert_eq!(ChainId(10).to_string(), "eip155:10");
    }

    #[test]
    fn test_account_id_display_is_caip10() {
        let account = AccountId::new(Address::new("0xABC"), ChainId::MAINNET);
        assert_eq!(account.to_string(), "eip155:1:0xabc");
    }
}
