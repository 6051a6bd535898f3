//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] datamart_core::EmailError),

    /// Invalid wallet address format.
    #[error("invalid wallet address: {0}")]
    InvalidWallet(#[from] datamart_core::WalletAddressError),

    /// Invalid credentials (wrong password or unknown email).
    /// Deliberately a single variant so callers cannot tell which failed.
    #[error("invalid credentials")]
    InvalidCredential,

    /// An account with this email already exists.
    #[error("account already exists")]
    DuplicateAccount,

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakCredential(String),

    /// Nonce TTL elapsed before consumption.
    #[error("nonce expired")]
    NonceExpired,

    /// No live nonce with the submitted value exists for the wallet.
    #[error("nonce mismatch")]
    NonceMismatch,

    /// The signature does not recover to the claimed wallet.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// Session token past its expiry.
    #[error("token expired")]
    TokenExpired,

    /// Session token malformed or signed with the wrong key.
    #[error("token invalid")]
    TokenInvalid,

    /// Password hashing failure.
    #[error("password hashing error")]
    PasswordHash,

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
