//! The working set of collections.
//!
//! A [`Session`] is created by the entry point, handed to the menu by
//! `&mut`, and given back for saving when the user exits.

use thiserror::Error;

use crate::domain::Collection;

/// Errors raised by session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A collection named '{0}' already exists")]
    DuplicateName(String),

    #[error("Collection name must not be empty")]
    EmptyName,

    #[error("No collection number {index}; there are {count}")]
    OutOfRange { index: usize, count: usize },
}

/// All open collections plus the one currently being worked on
#[derive(Debug, Default)]
pub struct Session {
    collections: Vec<Collection>,
    current: Option<usize>,
}

impl Session {
    /// Open a session over loaded collections; the first one becomes current
    pub fn new(collections: Vec<Collection>) -> Self {
        let current = if collections.is_empty() { None } else { Some(0) };
        Self {
            collections,
            current,
        }
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Index of the current collection
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Collection> {
        self.current.map(|i| &self.collections[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut Collection> {
        match self.current {
            Some(index) => Some(&mut self.collections[index]),
            None => None,
        }
    }

    /// Find a collection by exact name
    pub fn find(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    /// Create an empty collection and make it current
    pub fn create(&mut self, name: impl Into<String>) -> Result<&mut Collection, SessionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if self.find(&name).is_some() {
            return Err(SessionError::DuplicateName(name));
        }

        tracing::debug!(%name, "Collection created");
        self.collections.push(Collection::new(name));
        let index = self.collections.len() - 1;
        self.current = Some(index);
        Ok(&mut self.collections[index])
    }

    /// Make the collection at `index` current
    pub fn switch_to(&mut self, index: usize) -> Result<&Collection, SessionError> {
        self.check_index(index)?;
        self.current = Some(index);
        Ok(&self.collections[index])
    }

    /// Remove the collection at `index` if `confirm` agrees.
    ///
    /// Returns `Ok(None)` when the deletion was declined. If the current
    /// collection is removed, the first remaining one becomes current.
    pub fn delete<F>(&mut self, index: usize, confirm: F) -> Result<Option<Collection>, SessionError>
    where
        F: FnOnce(&Collection) -> bool,
    {
        self.check_index(index)?;
        if !confirm(&self.collections[index]) {
            return Ok(None);
        }

        let removed = self.collections.remove(index);
        self.current = match self.current {
            _ if self.collections.is_empty() => None,
            Some(current) if current == index => Some(0),
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        tracing::debug!(name = %removed.name(), "Collection deleted");
        Ok(Some(removed))
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.collections.len() {
            return Err(SessionError::OutOfRange {
                index: index + 1,
                count: self.collections.len(),
            });
        }
        Ok(())
    }
}
