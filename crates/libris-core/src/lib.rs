//! Client library for the library-management backend.
//!
//! The three pieces that matter for a session:
//!
//! - [`api::ApiClient`]: sends requests with `Authorization: Token <credential>`
//!   taken from persisted storage
//! - [`auth::SessionStore`]: login/logout state over credential and profile
//! - [`router::Router`]: navigation guard redirecting to `Login` when no
//!   credential is persisted
//!
//! Plus typed models and endpoint methods for books, readers, reading
//! rooms, transactions and reports.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{SessionStore, SharedStorage, Storage};
pub use config::Config;
pub use router::{Navigation, Route, Router};
