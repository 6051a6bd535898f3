//! Datamart Gateway library.
//!
//! This crate provides the marketplace gateway functionality as a library,
//! allowing it to be tested and reused. The binary in `main.rs` wires the
//! router to a TCP listener; everything else lives here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
