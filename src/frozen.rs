//! Read-only symbol table backed by a shared, frozen [`SymbolTable`].

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use std::sync::Arc;

use crate::checksum::CheckSum;
use crate::table::{Iter, SymbolTable, Symbols};

/// Read-only version of [`SymbolTable`].
///
/// Wraps a table that is owned elsewhere behind an [`Arc`]. Building one does
/// not copy any symbols and cloning one is a reference count bump. It
/// implements [`Symbols`] but not [`SymbolsMut`](crate::SymbolsMut), so any
/// attempt to mutate it is rejected at compile time.
///
/// # Usage
///
/// ```
/// # use fst_symbols::{ConstSymbolTable, Symbols, SymbolsMut, SymbolTable};
/// let mut table = SymbolTable::new("frozen");
/// table.add_symbol("a");
/// let frozen = table.freeze();
/// let shared = frozen.clone();
/// assert_eq!(Some("a"), shared.find(0));
/// assert_eq!(frozen.labeled_checksum(), shared.labeled_checksum());
/// ```
#[derive(Debug)]
pub struct ConstSymbolTable<S = RandomState> {
    inner: Arc<SymbolTable<S>>,
}

impl<S> Clone for ConstSymbolTable<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> From<Arc<SymbolTable<S>>> for ConstSymbolTable<S> {
    fn from(inner: Arc<SymbolTable<S>>) -> Self {
        Self { inner }
    }
}

impl<S> From<SymbolTable<S>> for ConstSymbolTable<S> {
    /// Identical to [`SymbolTable::freeze`].
    fn from(table: SymbolTable<S>) -> Self {
        table.freeze()
    }
}

impl<S> SymbolTable<S> {
    /// Makes a table read-only so it can be shared cheaply.
    #[must_use]
    pub fn freeze(mut self) -> ConstSymbolTable<S> {
        self.shrink_to_fit();
        ConstSymbolTable {
            inner: Arc::new(self),
        }
    }
}

impl<S> ConstSymbolTable<S> {
    /// Returns the shared backing table.
    #[must_use]
    pub fn as_arc(&self) -> &Arc<SymbolTable<S>> {
        &self.inner
    }

    /// Returns a mutable copy of the backing table.
    #[must_use]
    pub fn to_mutable(&self) -> SymbolTable<S>
    where
        S: Clone,
    {
        (*self.inner).clone()
    }
}

impl<S> Symbols for ConstSymbolTable<S>
where
    S: BuildHasher,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn available_key(&self) -> i64 {
        self.inner.available_key()
    }

    fn find(&self, key: i64) -> Option<&str> {
        self.inner.find(key)
    }

    fn reverse_find(&self, symbol: &str) -> Option<i64> {
        self.inner.reverse_find(symbol)
    }

    fn nth_key(&self, position: usize) -> Option<i64> {
        self.inner.nth_key(position)
    }

    fn checksum(&self) -> CheckSum {
        self.inner.checksum()
    }

    fn labeled_checksum(&self) -> CheckSum {
        self.inner.labeled_checksum()
    }

    fn iter(&self) -> Iter<'_> {
        self.inner.iter()
    }
}

impl<'a, S> IntoIterator for &'a ConstSymbolTable<S>
where
    S: BuildHasher,
{
    type Item = (i64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
