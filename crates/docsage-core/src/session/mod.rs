//! Session identity module.
//!
//! # Module Structure
//!
//! - `model`: `SessionId`, `SessionContext`, `SessionInfo` and storage keys
//! - `repository`: durable key/value storage trait
//! - `identity`: `SessionIdentityStore`, the single owner of the persisted id

mod identity;
mod model;
mod repository;

pub use identity::SessionIdentityStore;
pub use model::{SESSION_CREATED_AT_KEY, SESSION_ID_KEY, SessionContext, SessionId, SessionInfo};
pub use repository::KeyValueStore;
