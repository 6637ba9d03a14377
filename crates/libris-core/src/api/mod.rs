//! REST API client module for the library backend.
//!
//! `ApiClient` sends every request with the session credential read from
//! persisted storage (`Authorization: Token <credential>`). Endpoint
//! methods are split by area: `auth` for account endpoints, `library` for
//! books, readers, rooms, transactions and reports.

pub mod auth;
pub mod client;
pub mod error;
pub mod library;

pub use client::{authorize, ApiClient, AUTH_SCHEME};
pub use error::{is_unauthorized, ApiError};
