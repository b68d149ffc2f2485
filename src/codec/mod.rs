//! Persisted form of the catalog.
//!
//! The whole working set is stored as one JSON object keyed by collection
//! label, each holding an object of record label → record id:
//!
//! ```text
//! {
//!   "Collection(Home)": {
//!     "Record(Dune, Frank Herbert, 1965, available)": 1
//!   }
//! }
//! ```
//!
//! Collections keep session order, records are written in ascending id
//! order. Anything that would not read back identically is refused at
//! encode time.

pub mod label;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Collection, CollectionError, Record, RecordId};

pub use label::{CollectionLabel, Label, LabelError, RecordLabel, FIELD_SEPARATOR};

/// The persisted document: collection label → (record label → id)
pub type Document = IndexMap<String, IndexMap<String, RecordId>>;

/// Errors raised while encoding or decoding the catalog
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid label {0}")]
    Label(#[from] LabelError),

    #[error("Failed to load collection: {0}")]
    Load(#[from] CollectionError),

    #[error("'{field}' contains the field separator ', '")]
    AmbiguousField { field: String },

    #[error("Collection '{collection}' holds a record with an empty {field}")]
    EmptyField {
        collection: String,
        field: &'static str,
    },

    #[error("Two collections are named '{0}'")]
    DuplicateCollection(String),

    #[error("Collection '{collection}' holds two records labelled '{label}'")]
    DuplicateRecordLabel { collection: String, label: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to do with a label that cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodePolicy {
    /// Abort the whole decode
    #[default]
    Strict,

    /// Skip the label (and a bad collection's records) and report it
    Skip,
}

impl std::fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodePolicy::Strict => write!(f, "strict"),
            DecodePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// A label dropped under [`DecodePolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLabel {
    pub label: String,
    pub error: LabelError,
}

/// Result of a decode
#[derive(Debug, Default)]
pub struct Decoded {
    pub collections: Vec<Collection>,
    pub skipped: Vec<SkippedLabel>,
}

impl Decoded {
    fn reject(&mut self, policy: DecodePolicy, label: &str, error: LabelError) -> Result<(), CodecError> {
        match policy {
            DecodePolicy::Strict => Err(error.into()),
            DecodePolicy::Skip => {
                tracing::warn!("Skipping unreadable label: {}", error);
                self.skipped.push(SkippedLabel {
                    label: label.to_string(),
                    error,
                });
                Ok(())
            }
        }
    }
}

/// Encode collections to the persisted JSON text
pub fn encode(collections: &[Collection]) -> Result<String, CodecError> {
    let document = encode_document(collections)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Build the persisted document
pub fn encode_document(collections: &[Collection]) -> Result<Document, CodecError> {
    let mut document = Document::with_capacity(collections.len());

    for collection in collections {
        ensure_unambiguous(collection.name())?;

        let key = collection.label();
        if document.contains_key(&key) {
            return Err(CodecError::DuplicateCollection(collection.name().to_string()));
        }

        let mut records: Vec<&Record> = collection.records().iter().collect();
        records.sort_by_key(|r| r.id());

        let mut entries = IndexMap::with_capacity(records.len());
        for record in records {
            for (value, field) in [
                (record.title(), "title"),
                (record.author(), "author"),
                (record.status(), "status"),
            ] {
                if value.is_empty() {
                    return Err(CodecError::EmptyField {
                        collection: collection.name().to_string(),
                        field,
                    });
                }
                ensure_unambiguous(value)?;
            }

            let label = record.label();
            if entries.contains_key(&label) {
                return Err(CodecError::DuplicateRecordLabel {
                    collection: collection.name().to_string(),
                    label,
                });
            }
            entries.insert(label, record.id());
        }

        document.insert(key, entries);
    }

    Ok(document)
}

/// Decode the persisted JSON text
pub fn decode(text: &str, policy: DecodePolicy) -> Result<Decoded, CodecError> {
    let document: Document = serde_json::from_str(text)?;
    decode_document(document, policy)
}

/// Rebuild collections from a parsed document.
///
/// Label errors follow `policy`. Duplicate ids inside a collection always
/// abort: that means the file is corrupt.
pub fn decode_document(document: Document, policy: DecodePolicy) -> Result<Decoded, CodecError> {
    let mut decoded = Decoded::default();

    for (collection_label, entries) in document {
        let name = match collection_label.parse::<CollectionLabel>() {
            Ok(parsed) => parsed.name,
            Err(error) => {
                decoded.reject(policy, &collection_label, error)?;
                continue;
            }
        };

        let mut records = Vec::with_capacity(entries.len());
        for (record_label, id) in entries {
            match decode_record(&record_label, id) {
                Ok(record) => records.push(record),
                Err(error) => decoded.reject(policy, &record_label, error)?,
            }
        }
        records.sort_by_key(Record::id);

        let mut collection = Collection::new(name);
        collection.load(records)?;
        decoded.collections.push(collection);
    }

    Ok(decoded)
}

fn decode_record(label: &str, id: RecordId) -> Result<Record, LabelError> {
    if id == 0 {
        return Err(LabelError::ZeroId {
            label: label.to_string(),
        });
    }
    Ok(label.parse::<RecordLabel>()?.into_record(id))
}

fn ensure_unambiguous(field: &str) -> Result<(), CodecError> {
    if field.contains(FIELD_SEPARATOR) {
        return Err(CodecError::AmbiguousField {
            field: field.to_string(),
        });
    }
    Ok(())
}
