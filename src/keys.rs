//! Key to storage-position remapping.
//!
//! Keys in `[0, dense_limit)` live at the position equal to the key. Every
//! other key is recorded in an ordered sparse map, together with its inverse
//! for the positions at or past `dense_limit`.

use std::collections::BTreeMap;

/// Correspondence between caller-visible keys and index positions.
///
/// Invariants, checked by [`KeyMap::check_invariants`] in tests:
///
/// - `sparse` and `sparse_keys` both have one entry per position in
///   `dense_limit..len` and agree with each other.
/// - No key in `[0, dense_limit)` is in `sparse`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KeyMap {
    dense_limit: usize,
    sparse: BTreeMap<i64, usize>,
    /// `sparse_keys[i]` is the key stored at position `dense_limit + i`.
    sparse_keys: Vec<i64>,
    available_key: i64,
}

impl KeyMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dense_limit(&self) -> usize {
        self.dense_limit
    }

    pub(crate) fn sparse(&self) -> &BTreeMap<i64, usize> {
        &self.sparse
    }

    pub(crate) fn available_key(&self) -> i64 {
        self.available_key
    }

    pub(crate) fn set_available_key(&mut self, key: i64) {
        self.available_key = key;
    }

    fn is_dense(&self, key: i64) -> bool {
        key >= 0 && (key as u64) < self.dense_limit as u64
    }

    /// Resolves `key` to its storage position.
    pub(crate) fn position(&self, key: i64) -> Option<usize> {
        if self.is_dense(key) {
            Some(key as usize)
        } else {
            self.sparse.get(&key).copied()
        }
    }

    /// Resolves a storage position back to its key.
    pub(crate) fn key(&self, position: usize) -> Option<i64> {
        if position < self.dense_limit {
            Some(position as i64)
        } else {
            self.sparse_keys.get(position - self.dense_limit).copied()
        }
    }

    /// Records a freshly interned symbol stored at `position`, which must be
    /// the last position in the index.
    pub(crate) fn record(&mut self, key: i64, position: usize) {
        debug_assert_eq!(position, self.dense_limit + self.sparse_keys.len());
        if key >= 0 && key as u64 == self.dense_limit as u64 && position == self.dense_limit {
            self.dense_limit += 1;
        } else {
            self.sparse.insert(key, position);
            self.sparse_keys.push(key);
        }
        if key >= self.available_key {
            self.available_key = key.saturating_add(1);
        }
    }

    /// Forgets `key` and shifts every position past the removed one down by
    /// one, matching an erase in the interning index.
    ///
    /// Returns the position `key` occupied, or `None` if it was absent.
    pub(crate) fn remove(&mut self, key: i64) -> Option<usize> {
        let position = self.position(key)?;
        if self.is_dense(key) {
            // The dense range shrinks to [0, key). Keys past the hole keep
            // their values but now sit one position lower.
            let old_limit = self.dense_limit;
            let new_limit = position;
            for value in self.sparse.values_mut() {
                *value -= 1;
            }
            for moved in new_limit + 1..old_limit {
                self.sparse.insert(moved as i64, moved - 1);
            }
            let mut sparse_keys =
                Vec::with_capacity(old_limit - new_limit - 1 + self.sparse_keys.len());
            sparse_keys.extend((new_limit + 1..old_limit).map(|k| k as i64));
            sparse_keys.append(&mut self.sparse_keys);
            self.sparse_keys = sparse_keys;
            self.dense_limit = new_limit;
        } else {
            self.sparse.remove(&key);
            for value in self.sparse.values_mut() {
                if *value > position {
                    *value -= 1;
                }
            }
            self.sparse_keys.remove(position - self.dense_limit);
        }
        if key.checked_add(1) == Some(self.available_key) {
            self.available_key = key;
        }
        Some(position)
    }

    /// Panics if the dense/sparse bookkeeping disagrees with an index of
    /// `len` symbols.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self, len: usize) {
        assert!(self.dense_limit <= len, "dense limit past end of index");
        assert_eq!(self.sparse.len(), len - self.dense_limit, "sparse map size");
        assert_eq!(self.sparse_keys.len(), len - self.dense_limit, "inverse size");
        for (offset, key) in self.sparse_keys.iter().enumerate() {
            assert!(!self.is_dense(*key), "key {key} is both dense and sparse");
            assert_eq!(self.sparse.get(key), Some(&(self.dense_limit + offset)));
        }
    }
}
