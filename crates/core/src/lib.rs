//! Datamart Core - Shared types library.
//!
//! This crate provides common types used across all Datamart components:
//! - `gateway` - The marketplace gateway service (auth + dataset catalog)
//! - `integration-tests` - End-to-end tests over the assembled router
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, wallet
//!   addresses, and content classification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
