//! Core types for Datamart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod content;
pub mod email;
pub mod id;
pub mod price;
pub mod wallet;

pub use content::{ContentKind, ListingKind, MAX_UPLOAD_BYTES};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{RecordPrice, RecordPriceError};
pub use wallet::{WalletAddress, WalletAddressError};
