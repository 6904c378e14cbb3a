//! Set of story ids that have already been classified.
//!
//! Persisted as a plain JSON array in first-seen order. Ids are only ever
//! added; the set grows for the lifetime of the install.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet {
    ids: IndexSet<u64>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seen(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `true` if the id was not already present.
    pub fn mark_seen(&mut self, id: u64) -> bool {
        self.ids.insert(id)
    }

    /// Baseline a first run: insert every id without classifying anything.
    pub fn seed_from_batch<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = u64>,
    {
        let before = self.ids.len();
        self.ids.extend(ids);
        self.ids.len() - before
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<u64> for SeenSet {
    fn from_iter<T: IntoIterator<Item = u64>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
