//! Clementine Client - Storefront client library.
//!
//! This crate is the state and service layer for the Clementine storefront:
//! a typed REST API client, durable/session key-value storage, and the
//! services a front end composes:
//!
//! - [`services::AuthService`] - session lifecycle against the auth API
//! - [`services::CartService`] - cart state machine with guest/authenticated
//!   reconciliation (optimistic local transitions, full-replace sync)
//! - [`services::FavoriteService`] - optimistic favorites with login-detour
//!   intent replay
//! - [`services::ProductSearch`] - debounced typeahead with stale-response
//!   suppression
//!
//! Everything is wired together by [`state::AppState`], the composition
//! root. Rendering, routing, and markup live elsewhere; this crate only
//! owns state and synchronization.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use state::AppState;
