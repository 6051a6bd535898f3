//! Gateway services.
//!
//! Each service wraps store trait objects with the domain rules the HTTP
//! layer relies on: challenge lifecycle, signature checks, credential
//! validation, token minting, and catalog semantics.

pub mod auth;
pub mod catalog;
pub mod nonce;
pub mod signature;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, DatasetCatalog};
pub use nonce::NonceRegistry;
pub use token::TokenIssuer;
