//! Blockchain wallet address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`WalletAddress`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum WalletAddressError {
    /// The input does not start with `0x`.
    #[error("wallet address must start with 0x")]
    MissingPrefix,
    /// The input is not 20 bytes of hex after the prefix.
    #[error("wallet address must be 40 hex characters, got {got}")]
    BadLength {
        /// Number of characters after the prefix.
        got: usize,
    },
    /// The input contains non-hex characters.
    #[error("wallet address contains non-hex characters")]
    InvalidHex,
}

/// An EVM-style wallet address: `0x` followed by 20 bytes of hex.
///
/// Addresses are normalized to lowercase at parse time, so equality and
/// hashing are case-insensitive with respect to the original input.
/// Mixed-case (EIP-55 checksummed) inputs are accepted; the checksum itself
/// is not verified.
///
/// ## Examples
///
/// ```
/// use datamart_core::WalletAddress;
///
/// let a = WalletAddress::parse("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B").unwrap();
/// let b = WalletAddress::parse("0xab5801a7d398351b8be11c439e05c5b3259aec9b").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse a `WalletAddress` from a string, normalizing to lowercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing the `0x` prefix, is not
    /// exactly 40 characters after the prefix, or contains non-hex digits.
    pub fn parse(s: &str) -> Result<Self, WalletAddressError> {
        let hex_part = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(WalletAddressError::MissingPrefix)?;

        if hex_part.len() != 40 {
            return Err(WalletAddressError::BadLength {
                got: hex_part.len(),
            });
        }

        if !hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(WalletAddressError::InvalidHex);
        }

        Ok(Self(format!("0x{}", hex_part.to_ascii_lowercase())))
    }

    /// Returns the normalized (lowercase) address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the 20 address bytes without the `0x` prefix.
    #[must_use]
    pub fn hex_digits(&self) -> &str {
        self.0.get(2..).unwrap_or("")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for WalletAddress {
    type Err = WalletAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";

    #[test]
    fn test_parse_normalizes_case() {
        let addr = WalletAddress::parse(CHECKSUMMED).unwrap();
        assert_eq!(addr.as_str(), &CHECKSUMMED.to_ascii_lowercase());
    }

    #[test]
    fn test_case_insensitive_equality() {
        let a = WalletAddress::parse(CHECKSUMMED).unwrap();
        let b = WalletAddress::parse(&CHECKSUMMED.to_ascii_uppercase().replace("0X", "0x")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert!(matches!(
            WalletAddress::parse("ab5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(WalletAddressError::MissingPrefix)
        ));
    }

    #[test]
    fn test_parse_bad_length() {
        assert!(matches!(
            WalletAddress::parse("0xabc"),
            Err(WalletAddressError::BadLength { got: 3 })
        ));
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert!(matches!(
            WalletAddress::parse("0xzz5801a7d398351b8be11c439e05c5b3259aec9b"),
            Err(WalletAddressError::InvalidHex)
        ));
    }
}
