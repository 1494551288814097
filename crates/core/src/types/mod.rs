//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod envelope;
pub mod favorite;
pub mod id;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartKey, GuestCart};
pub use envelope::ApiEnvelope;
pub use favorite::{FavoriteEntry, FavoritePayload};
pub use id::*;
pub use product::ProductSummary;
pub use user::{AuthSession, Role, User};
