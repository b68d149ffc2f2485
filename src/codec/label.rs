//! Textual labels for records and collections.
//!
//! A label is the key under which an entity is persisted:
//!
//! ```text
//! Collection(<name>)
//! Record(<title>, <author>, <year>, <status>)
//! ```
//!
//! Fields are joined with `", "`, so no field may contain that sequence.

use std::str::FromStr;

use thiserror::Error;

use crate::domain::{Collection, Record, RecordId};

/// Separator between fields inside a label
pub const FIELD_SEPARATOR: &str = ", ";

const RECORD_PREFIX: &str = "Record(";
const COLLECTION_PREFIX: &str = "Collection(";
const LABEL_SUFFIX: &str = ")";

/// Errors produced when a label cannot be read back
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("'{label}' is not a {kind} label")]
    WrongShape { label: String, kind: &'static str },

    #[error("'{label}' has {found} field(s), expected {expected}")]
    FieldCount {
        label: String,
        expected: usize,
        found: usize,
    },

    #[error("'{label}' has a non-integer year '{year}'")]
    InvalidYear { label: String, year: String },

    #[error("'{label}' has an empty {field}")]
    EmptyField { label: String, field: &'static str },

    #[error("'{label}' is stored under id 0")]
    ZeroId { label: String },
}

/// Entities that have a persisted label
pub trait Label {
    fn label(&self) -> String;
}

impl Label for Record {
    fn label(&self) -> String {
        format!(
            "{RECORD_PREFIX}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}{LABEL_SUFFIX}",
            self.title(),
            self.author(),
            self.year(),
            self.status()
        )
    }
}

impl Label for Collection {
    fn label(&self) -> String {
        format!("{COLLECTION_PREFIX}{}{LABEL_SUFFIX}", self.name())
    }
}

/// Parsed `Record(...)` label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLabel {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub status: String,
}

impl RecordLabel {
    /// Build the record stored under `id`
    pub fn into_record(self, id: RecordId) -> Record {
        Record::new(id, self.title, self.author, self.year).with_status(self.status)
    }
}

impl FromStr for RecordLabel {
    type Err = LabelError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let fields = inner_fields(label, RECORD_PREFIX, "record")?;
        let [title, author, year, status] = fields[..] else {
            return Err(LabelError::FieldCount {
                label: label.to_string(),
                expected: 4,
                found: fields.len(),
            });
        };

        for (value, field) in [(title, "title"), (author, "author")] {
            if value.is_empty() {
                return Err(LabelError::EmptyField {
                    label: label.to_string(),
                    field,
                });
            }
        }

        let year = year.parse::<i32>().map_err(|_| LabelError::InvalidYear {
            label: label.to_string(),
            year: year.to_string(),
        })?;

        Ok(Self {
            title: title.to_string(),
            author: author.to_string(),
            year,
            status: status.to_string(),
        })
    }
}

/// Parsed `Collection(...)` label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionLabel {
    pub name: String,
}

impl FromStr for CollectionLabel {
    type Err = LabelError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let fields = inner_fields(label, COLLECTION_PREFIX, "collection")?;
        match fields[..] {
            [name] => Ok(Self {
                name: name.to_string(),
            }),
            _ => Err(LabelError::FieldCount {
                label: label.to_string(),
                expected: 1,
                found: fields.len(),
            }),
        }
    }
}

/// Split the text between `prefix` and the closing parenthesis
fn inner_fields<'a>(
    label: &'a str,
    prefix: &str,
    kind: &'static str,
) -> Result<Vec<&'a str>, LabelError> {
    let inner = label
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(LABEL_SUFFIX))
        .ok_or_else(|| LabelError::WrongShape {
            label: label.to_string(),
            kind,
        })?;

    Ok(inner.split(FIELD_SEPARATOR).collect())
}
