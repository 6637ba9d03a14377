//! Session handling: the credential store and its persistence.
//!
//! - `SessionStore`: login/logout state machine over credential and profile
//! - `Storage`: persisted key-value backends (`FileStorage`,
//!   `KeyringStorage`, `MemoryStorage`)
//!
//! The credential is persisted under the `token` key with no expiry; the
//! backend alone decides when a token stops being valid.

pub mod credentials;
pub mod session;
pub mod storage;

pub use credentials::KeyringStorage;
pub use session::SessionStore;
pub use storage::{stored_token, FileStorage, MemoryStorage, SharedStorage, Storage, TOKEN_KEY};
