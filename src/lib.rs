//! libris - catalog manager for book collections
//!
//! Keeps book records in named collections, searches them, and stores
//! everything in one JSON file between sessions.
//!
//! # Architecture
//!
//! - Records carry an id that is unique within their collection; freed ids
//!   are reused, lowest first
//! - Search sorts matches into priority categories so that records matching
//!   more criteria are listed apart from looser matches
//! - The file format keys each record by a textual label and reads back to
//!   the same collections
//!
//! # Modules
//!
//! - `domain`: Data structures (Record, Collection, search)
//! - `codec`: Labels and the persisted JSON document
//! - `core`: Session state and file storage
//! - `cli`: Command-line interface and interactive menu
//! - `config`: Path and policy resolution
//!
//! # Usage
//!
//! ```bash
//! # Open the interactive menu
//! libris
//!
//! # Search without the menu
//! libris search "Home" --author "Frank Herbert"
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use codec::{decode, encode, Decoded, DecodePolicy};
pub use self::core::{CatalogStore, Session};
pub use domain::{Collection, Record, RecordId, SearchQuery, SearchResults};
