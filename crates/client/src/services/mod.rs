//! Application services.
//!
//! Each service owns one slice of client state and is injected with the
//! collaborators it needs (API client, stores, auth). There are no
//! ambient singletons; [`crate::state::AppState`] is the composition
//! root that wires them together and routes auth transitions.

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod search;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use favorites::{FavoriteError, FavoriteOutcome, FavoriteService};
pub use search::{ProductSearch, SearchResults};
