//! Catalog records.
//!
//! A record is immutable once created except for its status, which moves
//! between the two canonical values or is set to a custom value after an
//! explicit confirmation.

use std::fmt;

/// Record identifier, unique within its owning collection. Never zero.
pub type RecordId = u32;

/// Canonical status of a record that is on the shelf
pub const STATUS_AVAILABLE: &str = "available";

/// Canonical status of a record that has been lent out
pub const STATUS_CHECKED_OUT: &str = "checked-out";

/// Whether a status is one of the two built-in values
pub fn is_canonical_status(status: &str) -> bool {
    status == STATUS_AVAILABLE || status == STATUS_CHECKED_OUT
}

/// Whether a confirmation answer counts as "yes".
///
/// An empty answer confirms, as do `y` and `Y`.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "" | "y" | "Y")
}

/// One catalog entry
#[derive(Debug, Clone)]
pub struct Record {
    id: RecordId,
    title: String,
    author: String,
    year: i32,
    status: String,
}

impl Record {
    /// Create a record with the canonical "available" status
    pub fn new(id: RecordId, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
            status: STATUS_AVAILABLE.to_string(),
        }
    }

    /// Replace the status at construction time.
    ///
    /// An empty status falls back to "available".
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        if !status.is_empty() {
            self.status = status;
        }
        self
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Flip between "available" and "checked-out".
    ///
    /// Any other status is left untouched and reported as non-canonical.
    pub fn toggle_status(&mut self) -> ToggleOutcome {
        let next = match self.status.as_str() {
            STATUS_AVAILABLE => STATUS_CHECKED_OUT,
            STATUS_CHECKED_OUT => STATUS_AVAILABLE,
            _ => return ToggleOutcome::NonCanonical,
        };
        self.status = next.to_string();
        ToggleOutcome::Toggled
    }

    /// Start a status change.
    ///
    /// Canonical values are applied immediately. A blank value is refused.
    /// Anything else is staged and only takes effect once the returned
    /// proposal is confirmed.
    pub fn propose_status(&mut self, candidate: impl Into<String>) -> StatusProposal<'_> {
        let candidate = candidate.into();
        if candidate.trim().is_empty() {
            StatusProposal::Blank
        } else if is_canonical_status(&candidate) {
            self.status = candidate;
            StatusProposal::Applied
        } else {
            StatusProposal::NeedsConfirmation(PendingStatus {
                record: self,
                candidate,
            })
        }
    }

    /// Set a status, asking `confirm` for non-canonical values.
    ///
    /// `confirm` receives the candidate and returns whether to commit it.
    pub fn set_status<F>(&mut self, candidate: impl Into<String>, confirm: F) -> StatusOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        match self.propose_status(candidate) {
            StatusProposal::Applied => StatusOutcome::Set,
            StatusProposal::Blank => StatusOutcome::Blank,
            StatusProposal::NeedsConfirmation(pending) => {
                let accepted = confirm(pending.candidate());
                pending.resolve(accepted)
            }
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.author == other.author
            && self.year == other.year
    }
}

impl Eq for Record {}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>5}: '{}' by {}, {}: {}",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

/// Result of [`Record::toggle_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Status moved to the other canonical value
    Toggled,

    /// Status is custom; nothing changed
    NonCanonical,
}

/// Result of [`Record::propose_status`]
#[derive(Debug)]
pub enum StatusProposal<'a> {
    /// Canonical value, already applied
    Applied,

    /// Blank value, refused; status unchanged
    Blank,

    /// Custom value waiting for confirmation
    NeedsConfirmation(PendingStatus<'a>),
}

/// A staged custom status. Dropping it discards the candidate.
#[derive(Debug)]
#[must_use = "a pending status does nothing until confirmed"]
pub struct PendingStatus<'a> {
    record: &'a mut Record,
    candidate: String,
}

impl PendingStatus<'_> {
    /// The staged value
    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    /// Resolve with a raw user answer (see [`is_affirmative`])
    pub fn confirm(self, answer: &str) -> StatusOutcome {
        self.resolve(is_affirmative(answer))
    }

    /// Resolve with an already decided answer
    pub fn resolve(self, accepted: bool) -> StatusOutcome {
        if accepted {
            self.record.status = self.candidate;
            StatusOutcome::Confirmed
        } else {
            StatusOutcome::Declined
        }
    }
}

/// Final result of a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Canonical value set directly
    Set,

    /// Custom value committed after confirmation
    Confirmed,

    /// Custom value rejected; status unchanged
    Declined,

    /// Blank value refused; status unchanged
    Blank,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_available() {
        let record = Record::new(1, "Dune", "Frank Herbert", 1965);
        assert_eq!(record.status(), STATUS_AVAILABLE);

        let record = Record::new(1, "Dune", "Frank Herbert", 1965).with_status("");
        assert_eq!(record.status(), STATUS_AVAILABLE);
    }

    #[test]
    fn test_equality_ignores_status() {
        let a = Record::new(1, "Dune", "Frank Herbert", 1965);
        let b = Record::new(1, "Dune", "Frank Herbert", 1965).with_status("lost");
        let c = Record::new(2, "Dune", "Frank Herbert", 1965);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_toggle_canonical_status() {
        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965);

        assert_eq!(record.toggle_status(), ToggleOutcome::Toggled);
        assert_eq!(record.status(), STATUS_CHECKED_OUT);

        assert_eq!(record.toggle_status(), ToggleOutcome::Toggled);
        assert_eq!(record.status(), STATUS_AVAILABLE);
    }

    #[test]
    fn test_toggle_non_canonical_is_noop() {
        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965).with_status("lost");

        assert_eq!(record.toggle_status(), ToggleOutcome::NonCanonical);
        assert_eq!(record.status(), "lost");
    }

    #[test]
    fn test_custom_status_confirmation() {
        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965);
        let outcome = match record.propose_status("damaged") {
            StatusProposal::NeedsConfirmation(pending) => pending.confirm(""),
            other => panic!("custom status must wait for confirmation: {:?}", other),
        };
        assert_eq!(outcome, StatusOutcome::Confirmed);
        assert_eq!(record.status(), "damaged");

        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965);
        let outcome = record.set_status("damaged", |_| false);
        assert_eq!(outcome, StatusOutcome::Declined);
        assert_eq!(record.status(), STATUS_AVAILABLE);
    }

    #[test]
    fn test_canonical_status_skips_confirmation() {
        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965).with_status("lost");
        let outcome = record.set_status(STATUS_CHECKED_OUT, |_| panic!("not asked"));

        assert_eq!(outcome, StatusOutcome::Set);
        assert_eq!(record.status(), STATUS_CHECKED_OUT);
    }

    #[test]
    fn test_blank_status_is_refused() {
        let mut record = Record::new(1, "Dune", "Frank Herbert", 1965).with_status("lost");

        assert!(matches!(record.propose_status(""), StatusProposal::Blank));
        assert_eq!(record.set_status("  ", |_| panic!("not asked")), StatusOutcome::Blank);
        assert_eq!(record.status(), "lost");
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative(""));
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y\n"));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yes please"));
    }

    #[test]
    fn test_display() {
        let record = Record::new(7, "Dune", "Frank Herbert", 1965);
        assert_eq!(record.to_string(), "    7: 'Dune' by Frank Herbert, 1965: available");
    }
}
