//! Parsing of raw menu input.
//!
//! These helpers never prompt; the menu calls them in a loop and
//! re-prompts on error.

use thiserror::Error;

use crate::codec::FIELD_SEPARATOR;

/// Why a line of user input was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Need 3 values separated by ', ' or ','")]
    FieldCount,

    #[error("Title and author must not be empty")]
    EmptyField,

    #[error("Year must be a whole number and come third")]
    Year,

    #[error("Need one whole number")]
    NotANumber,

    #[error("Need a whole number from {min} to {max}")]
    OutOfRange { min: usize, max: usize },

    #[error("Value must not be empty")]
    Empty,

    #[error("Value must not contain ', '")]
    Separator,
}

/// Title, author and year entered for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub author: String,
    pub year: i32,
}

/// Parse `title, author, year`.
///
/// Fields are split on `", "` first and on `","` if that does not yield
/// three values. A single trailing separator is tolerated.
pub fn parse_record_input(line: &str) -> Result<NewRecord, InputError> {
    let mut parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if !(3..=4).contains(&parts.len()) {
        parts = line.split(',').collect();
    }

    let (title, author, year) = match parts[..] {
        [title, author, year] => (title, author, year),
        [title, author, year, rest] if rest.trim().is_empty() => (title, author, year),
        _ => return Err(InputError::FieldCount),
    };

    let (title, author) = (title.trim(), author.trim());
    if title.is_empty() || author.is_empty() {
        return Err(InputError::EmptyField);
    }

    let year = year.trim().parse::<i32>().map_err(|_| InputError::Year)?;

    Ok(NewRecord {
        title: title.to_string(),
        author: author.to_string(),
        year,
    })
}

/// Parse a whole number
pub fn parse_number<T: std::str::FromStr>(line: &str) -> Result<T, InputError> {
    line.trim().parse::<T>().map_err(|_| InputError::NotANumber)
}

/// Parse a 1-based menu choice in `1..=max`
pub fn parse_choice(line: &str, max: usize) -> Result<usize, InputError> {
    let out_of_range = InputError::OutOfRange { min: 1, max };
    let choice: usize = parse_number(line).map_err(|_| out_of_range.clone())?;
    if choice < 1 || choice > max {
        return Err(out_of_range);
    }
    Ok(choice)
}

/// Parse an optional year: blank means "not given"
pub fn parse_optional_year(line: &str) -> Result<Option<i32>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    line.parse::<i32>().map(Some).map_err(|_| InputError::Year)
}

/// Blank input means "not given"
pub fn optional_text(line: &str) -> Option<String> {
    let line = line.trim();
    (!line.is_empty()).then(|| line.to_string())
}

/// A name or status that can be stored
pub fn parse_label_text(line: &str) -> Result<String, InputError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    if text.contains(FIELD_SEPARATOR) {
        return Err(InputError::Separator);
    }
    Ok(text.to_string())
}
