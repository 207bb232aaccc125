//! Row selection bookkeeping for bulk actions.

use crate::domain::RecordKey;
use indexmap::IndexSet;

/// Selected record keys in the order they were checked.
///
/// Order matters to the bulk action executor: exports list rows in the order
/// the admin picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    keys: IndexSet<RecordKey>,
}

impl SelectionSet {
    /// Flips membership of `key`. Returns `true` if it is selected afterwards.
    pub fn toggle(&mut self, key: RecordKey) -> bool {
        if self.keys.shift_remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    /// Returns `true` if the key was newly added.
    pub fn insert(&mut self, key: RecordKey) -> bool {
        self.keys.insert(key)
    }

    /// Returns `true` if the key was present.
    pub fn remove(&mut self, key: &RecordKey) -> bool {
        self.keys.shift_remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &RecordKey) -> bool {
        self.keys.contains(key)
    }

    /// True iff `keys` is non-empty and every one of them is selected.
    #[must_use]
    pub fn contains_all<'a>(&self, keys: impl IntoIterator<Item = &'a RecordKey>) -> bool {
        let mut any = false;
        for key in keys {
            if !self.keys.contains(key) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Keeps only keys for which `keep` returns `true`, preserving order.
    /// Returns how many keys were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&RecordKey) -> bool) -> usize {
        let before = self.keys.len();
        self.keys.retain(|key| keep(key));
        before - self.keys.len()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordKey> {
        self.keys.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<RecordKey> {
        self.keys.iter().cloned().collect()
    }
}
