//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `client` - Storefront client library (API, storage, services)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, cart and favorites types, the API envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
