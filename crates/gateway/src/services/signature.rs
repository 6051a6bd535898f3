//! Wallet signature verification.
//!
//! The client signs a canonical challenge message (EIP-191 personal message
//! embedding the nonce) with their wallet key. Verification recovers the
//! signer's address from the 65-byte recoverable secp256k1 signature and
//! compares it, lowercased, to the claimed wallet address.
//!
//! These are pure functions: nonce consumption is the caller's job and is
//! ordered strictly before verification to prevent replay. Every malformed
//! input fails closed to `false` - nothing here panics or errors into the
//! caller's control flow.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};

use datamart_core::WalletAddress;

/// Build the canonical challenge text a wallet must sign for a nonce.
#[must_use]
pub fn challenge_message(nonce: &str) -> String {
    format!("Sign this message to authenticate with Datamart.\n\nNonce: {nonce}")
}

/// Check that `signature` is a valid wallet signature over the challenge
/// message for `nonce`, produced by the key behind `wallet`.
#[must_use]
pub fn verify(wallet: &WalletAddress, nonce: &str, signature: &str) -> bool {
    recover_signer(&challenge_message(nonce), signature)
        .is_some_and(|signer| signer == wallet.as_str())
}

/// Recover the lowercase `0x`-prefixed address that signed `message`.
///
/// Accepts 65-byte `r || s || v` hex signatures, with or without a `0x`
/// prefix, and both `v` conventions (0/1 and 27/28). Returns `None` for any
/// malformed encoding.
fn recover_signer(message: &str, signature: &str) -> Option<String> {
    let raw = hex::decode(signature.strip_prefix("0x").unwrap_or(signature)).ok()?;
    if raw.len() != 65 {
        return None;
    }

    let v = *raw.get(64)?;
    let recovery_byte = if v >= 27 { v.wrapping_sub(27) } else { v };
    let recovery_id = RecoveryId::try_from(recovery_byte).ok()?;
    let signature = Signature::from_slice(raw.get(..64)?).ok()?;

    let digest = personal_message_hash(message);
    let key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id).ok()?;

    Some(eth_address(&key))
}

/// Keccak-256 over the EIP-191 personal-message envelope.
fn personal_message_hash(message: &str) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(format!("\x19Ethereum Signed Message:\n{}", message.len()));
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Derive the lowercase address for a public key: last 20 bytes of the
/// keccak-256 of the uncompressed point (without the 0x04 prefix byte).
fn eth_address(key: &VerifyingKey) -> String {
    let point = key.to_encoded_point(false);
    let digest = Keccak256::digest(point.as_bytes().get(1..).unwrap_or_default());
    format!(
        "0x{}",
        hex::encode(digest.get(12..).unwrap_or_default())
    )
}
