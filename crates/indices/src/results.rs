//! Shared results keyed by (index, interval).

use std::collections::BTreeMap;

use drought_grid::Field;

use crate::error::IndexError;
use crate::kind::{IndexKind, Interval};

/// Every computed index field, keyed by `(index, interval)`.
///
/// Each key is written exactly once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexResults {
    fields: BTreeMap<(IndexKind, Interval), Field>,
}

impl IndexResults {
    /// Create an empty set of results.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a field.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateResult`] if the key already holds a
    /// field.
    pub fn insert(
        &mut self,
        index: IndexKind,
        interval: Interval,
        field: Field,
    ) -> Result<(), IndexError> {
        if self.fields.contains_key(&(index, interval)) {
            return Err(IndexError::DuplicateResult { index, interval });
        }
        self.fields.insert((index, interval), field);
        Ok(())
    }

    /// The field for a key.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::MissingResult`] if it has not been computed.
    pub fn get(&self, index: IndexKind, interval: Interval) -> Result<&Field, IndexError> {
        self.fields
            .get(&(index, interval))
            .ok_or(IndexError::MissingResult { index, interval })
    }

    /// Whether a key holds a field.
    pub fn contains(&self, index: IndexKind, interval: Interval) -> bool {
        self.fields.contains_key(&(index, interval))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when nothing has been computed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys and fields in `(index, interval)` order.
    pub fn iter(&self) -> impl Iterator<Item = (IndexKind, Interval, &Field)> {
        self.fields.iter().map(|(&(k, i), f)| (k, i, f))
    }

    /// Mutable access to every field, for post-processing in place.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (IndexKind, Interval, &mut Field)> {
        self.fields.iter_mut().map(|(&(k, i), f)| (k, i, f))
    }

    /// Remove and return a field.
    pub(crate) fn take(&mut self, index: IndexKind, interval: Interval) -> Option<Field> {
        self.fields.remove(&(index, interval))
    }
}
