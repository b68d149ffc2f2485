//! Session state and persistence.
//!
//! - Session: explicit context owning every collection
//! - CatalogStore: load-once / save-once file access

pub mod session;
pub mod store;

pub use session::{Session, SessionError};
pub use store::CatalogStore;
