//! Domain types for the catalog.
//!
//! This module contains the core data structures:
//! - Record: one catalog entry with a mutable status
//! - Collection: a named, ordered set of records with id allocation
//! - Search: the stratified multi-field search engine

pub mod collection;
pub mod record;
pub mod search;

// Re-export commonly used types
pub use collection::{Collection, CollectionError};
pub use record::{
    is_affirmative, is_canonical_status, PendingStatus, Record, RecordId, StatusOutcome,
    StatusProposal, ToggleOutcome, STATUS_AVAILABLE, STATUS_CHECKED_OUT,
};
pub use search::{CategoryMatches, MatchCategory, ReportEntry, SearchField, SearchQuery, SearchResults};
