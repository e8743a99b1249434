//! Open-addressing string interning index.
//!
//! Symbols are stored in a vector in first-insertion order. A power-of-two
//! bucket array holds positions into that vector, addressed by
//! `hash(symbol) & mask` with linear probing.

use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::ops::Deref;
use core::slice;
use std::collections::hash_map::RandomState;

use crate::DEFAULT_BUCKET_COUNT;

/// Marks a bucket that holds no position.
const EMPTY_BUCKET: usize = usize::MAX;

/// An iterator over the symbols of a [`SymbolIndex`] in storage order.
///
/// # Usage
///
/// ```
/// # use fst_symbols::SymbolIndex;
/// let mut index = SymbolIndex::new();
/// index.insert_or_find("abc");
/// index.insert_or_find("xyz");
/// let strings = index.strings();
/// assert_eq!(vec!["abc", "xyz"], strings.collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct Strings<'a>(slice::Iter<'a, Box<str>>);

impl<'a> Iterator for Strings<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Deref::deref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }

    fn count(self) -> usize
    where
        Self: Sized,
    {
        self.0.count()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.0.nth(n).map(Deref::deref)
    }
}

impl<'a> DoubleEndedIterator for Strings<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(Deref::deref)
    }
}

impl<'a> ExactSizeIterator for Strings<'a> {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'a> FusedIterator for Strings<'a> {}

/// String interner that assigns each distinct symbol a stable, compact
/// storage position.
///
/// Positions are handed out in insertion order. [`SymbolIndex::remove`]
/// shifts every later symbol down by one position and rebuilds the bucket
/// array from scratch, so lookups never have to skip tombstones.
///
/// [`SymbolIndex::find`] only reads, so any number of threads may call it
/// while no thread is inserting or removing.
#[derive(Clone)]
pub struct SymbolIndex<S = RandomState> {
    symbols: Vec<Box<str>>,
    buckets: Vec<usize>,
    hash_mask: usize,
    hash_builder: S,
}

impl<S> fmt::Debug for SymbolIndex<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolIndex")
            .field("symbols", &self.symbols)
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

impl Default for SymbolIndex<RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolIndex<RandomState> {
    /// Constructs a new, empty `SymbolIndex` with
    /// [`DEFAULT_BUCKET_COUNT`](crate::DEFAULT_BUCKET_COUNT) buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::SymbolIndex;
    /// let index = SymbolIndex::new();
    /// assert_eq!(0, index.len());
    /// assert_eq!(16, index.bucket_count());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<S> SymbolIndex<S> {
    /// Constructs a new, empty `SymbolIndex` with the given hash builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            symbols: Vec::new(),
            buckets: vec![EMPTY_BUCKET; DEFAULT_BUCKET_COUNT],
            hash_mask: DEFAULT_BUCKET_COUNT - 1,
            hash_builder,
        }
    }

    /// Returns the number of interned symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the index holds no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the current number of hash buckets. Always a power of two.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the symbol stored at `position`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::SymbolIndex;
    /// let mut index = SymbolIndex::new();
    /// let (position, _) = index.insert_or_find("abc");
    /// assert_eq!(Some("abc"), index.get(position));
    /// assert_eq!(None, index.get(position + 1));
    /// ```
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.symbols.get(position).map(Deref::deref)
    }

    /// Returns an iterator over all symbols in storage order.
    pub fn strings(&self) -> Strings<'_> {
        Strings(self.symbols.iter())
    }

    pub(crate) fn as_slice(&self) -> &[Box<str>] {
        &self.symbols
    }

    /// Releases unused symbol storage. Has no observable effect on lookups.
    pub fn shrink_to_fit(&mut self) {
        self.symbols.shrink_to_fit();
    }
}

impl<S> SymbolIndex<S>
where
    S: BuildHasher,
{
    /// Returns the position of `symbol`, inserting it at the end if it is
    /// new. The flag is `true` when the symbol was inserted by this call.
    ///
    /// Grows the bucket array once it is three quarters full.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::SymbolIndex;
    /// let mut index = SymbolIndex::new();
    /// assert_eq!((0, true), index.insert_or_find("abc"));
    /// assert_eq!((1, true), index.insert_or_find("xyz"));
    /// assert_eq!((0, false), index.insert_or_find("abc"));
    /// ```
    pub fn insert_or_find(&mut self, symbol: &str) -> (usize, bool) {
        // Grow at 75% occupancy.
        if self.symbols.len() * 4 >= self.buckets.len() * 3 {
            self.rehash(self.buckets.len() * 2);
        }
        let mut idx = self.bucket_of(symbol);
        while self.buckets[idx] != EMPTY_BUCKET {
            let stored = self.buckets[idx];
            if &*self.symbols[stored] == symbol {
                return (stored, false);
            }
            idx = (idx + 1) & self.hash_mask;
        }
        let next = self.symbols.len();
        self.buckets[idx] = next;
        self.symbols.push(symbol.into());
        (next, true)
    }

    /// Returns the position of `symbol` if it has been interned.
    ///
    /// This method does not modify the index.
    #[must_use]
    pub fn find(&self, symbol: &str) -> Option<usize> {
        let mut idx = self.bucket_of(symbol);
        while self.buckets[idx] != EMPTY_BUCKET {
            let stored = self.buckets[idx];
            if &*self.symbols[stored] == symbol {
                return Some(stored);
            }
            idx = (idx + 1) & self.hash_mask;
        }
        None
    }

    /// Removes the symbol at `position`, shifting every later symbol down by
    /// one position, and rebuilds the buckets.
    ///
    /// Returns the removed symbol, or `None` if `position` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::SymbolIndex;
    /// let mut index = SymbolIndex::new();
    /// index.insert_or_find("a");
    /// index.insert_or_find("b");
    /// index.insert_or_find("c");
    /// assert_eq!(Some("b".into()), index.remove(1));
    /// assert_eq!(Some(1), index.find("c"));
    /// assert_eq!(None, index.find("b"));
    /// ```
    pub fn remove(&mut self, position: usize) -> Option<Box<str>> {
        if position >= self.symbols.len() {
            return None;
        }
        let removed = self.symbols.remove(position);
        self.rehash(self.buckets.len());
        Some(removed)
    }

    fn bucket_of(&self, symbol: &str) -> usize {
        (self.hash_builder.hash_one(symbol) as usize) & self.hash_mask
    }

    fn rehash(&mut self, bucket_count: usize) {
        debug_assert!(bucket_count.is_power_of_two());
        if bucket_count != self.buckets.len() {
            log::trace!(
                "growing symbol index from {} to {} buckets",
                self.buckets.len(),
                bucket_count
            );
        }
        self.buckets.clear();
        self.buckets.resize(bucket_count, EMPTY_BUCKET);
        self.hash_mask = bucket_count - 1;
        for (position, symbol) in self.symbols.iter().enumerate() {
            let mut idx = (self.hash_builder.hash_one(&**symbol) as usize) & self.hash_mask;
            while self.buckets[idx] != EMPTY_BUCKET {
                idx = (idx + 1) & self.hash_mask;
            }
            self.buckets[idx] = position;
        }
    }
}
