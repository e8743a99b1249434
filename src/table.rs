//! Mutable symbol table and the read/write contracts shared by every table.

use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use core::ops::Range;
use std::collections::btree_map;
use std::collections::hash_map::RandomState;

use crate::checksum::{self, CheckSum, CheckSums};
use crate::index::SymbolIndex;
use crate::keys::KeyMap;
use crate::NO_SYMBOL;

/// Read-only access to a symbol table.
///
/// Implemented by both [`SymbolTable`] and
/// [`ConstSymbolTable`](crate::ConstSymbolTable), so code that only looks
/// symbols up can accept either, including as `&dyn Symbols`.
pub trait Symbols {
    /// Returns the table name.
    fn name(&self) -> &str;

    /// Returns the number of symbols in the table.
    fn len(&self) -> usize;

    /// Returns `true` if the table holds no symbols.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the key [`SymbolsMut::add_symbol`] would assign next. Always
    /// greater than every key added so far.
    fn available_key(&self) -> i64;

    /// Returns the symbol bound to `key`.
    ///
    /// Keys in the dense range resolve without a map lookup.
    fn find(&self, key: i64) -> Option<&str>;

    /// Returns the key bound to `symbol`.
    fn reverse_find(&self, symbol: &str) -> Option<i64>;

    /// Returns `true` if `key` names a symbol.
    fn contains_key(&self, key: i64) -> bool {
        self.find(key).is_some()
    }

    /// Returns `true` if `symbol` is in the table.
    fn contains_symbol(&self, symbol: &str) -> bool {
        self.reverse_find(symbol).is_some()
    }

    /// Returns the key of the symbol at storage `position`, where positions
    /// count symbols in insertion order from zero.
    fn nth_key(&self, position: usize) -> Option<i64>;

    /// Checksum over the symbol strings only. Tables holding the same symbols
    /// in the same order agree regardless of their keys.
    fn checksum(&self) -> CheckSum;

    /// Checksum over symbol/key pairs, used to decide whether two tables are
    /// [`compatible`](crate::compatible).
    fn labeled_checksum(&self) -> CheckSum;

    /// Returns an iterator over `(key, symbol)` pairs in ascending key order.
    fn iter(&self) -> Iter<'_>;
}

/// Mutating access to a symbol table.
pub trait SymbolsMut: Symbols {
    /// Adds `symbol` under [`Symbols::available_key`] and returns its key.
    ///
    /// If `symbol` is already present its existing key is returned.
    fn add_symbol(&mut self, symbol: &str) -> i64;

    /// Adds `symbol` under `key` and returns the key the symbol ends up with.
    ///
    /// - If `symbol` is already present, its existing key is returned and
    ///   `key` is ignored. Callers that depend on `key` must compare it with
    ///   the return value.
    /// - If `key` is [`NO_SYMBOL`](crate::NO_SYMBOL) or already names another
    ///   symbol, nothing is added and `NO_SYMBOL` is returned.
    fn add_symbol_with_key(&mut self, symbol: &str, key: i64) -> i64;

    /// Removes the symbol bound to `key`. Returns `false` if there was none.
    fn remove_symbol(&mut self, key: i64) -> bool;

    /// Renames the table.
    fn set_name(&mut self, name: &str);

    /// Adds every symbol of `other`, in its iteration order. Keys are not
    /// carried over: new symbols get keys from this table's
    /// [`available_key`](Symbols::available_key) and symbols already present
    /// keep theirs.
    fn add_table(&mut self, other: &dyn Symbols);
}

/// An iterator over the `(key, symbol)` pairs of a table in ascending key
/// order.
///
/// # Usage
///
/// ```
/// # use fst_symbols::{Symbols, SymbolsMut, SymbolTable};
/// let mut table = SymbolTable::new("");
/// table.add_symbol_with_key("c", 5);
/// table.add_symbol_with_key("a", 0);
/// table.add_symbol_with_key("neg", -7);
/// let pairs = table.iter().collect::<Vec<_>>();
/// assert_eq!(vec![(-7, "neg"), (0, "a"), (5, "c")], pairs);
/// ```
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    symbols: &'a [Box<str>],
    negative: btree_map::Range<'a, i64, usize>,
    dense: Range<usize>,
    upper: btree_map::Range<'a, i64, usize>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new<S>(index: &'a SymbolIndex<S>, keys: &'a KeyMap) -> Self {
        Self {
            symbols: index.as_slice(),
            negative: keys.sparse().range(..0),
            dense: 0..keys.dense_limit(),
            upper: keys.sparse().range(0..),
            remaining: index.len(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (i64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, position) = if let Some((&key, &position)) = self.negative.next() {
            (key, position)
        } else if let Some(position) = self.dense.next() {
            (position as i64, position)
        } else {
            let (&key, &position) = self.upper.next()?;
            (key, position)
        };
        self.remaining -= 1;
        Some((key, &*self.symbols[position]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

/// Mutable bidirectional map between `i64` keys and string symbols.
///
/// # Usage
///
/// ```
/// # use fst_symbols::{Symbols, SymbolsMut, SymbolTable};
/// let mut table = SymbolTable::new("words");
/// let hello = table.add_symbol("hello");
/// assert_eq!(hello, table.add_symbol("hello"));
/// assert_eq!(Some("hello"), table.find(hello));
/// assert_eq!(Some(hello), table.reverse_find("hello"));
///
/// assert!(table.remove_symbol(hello));
/// assert!(table.is_empty());
/// ```
///
/// Lookups and checksum queries take `&self` and may run on any number of
/// threads at once. Mutation takes `&mut self`, so the borrow checker
/// guarantees a single writer with no concurrent readers.
pub struct SymbolTable<S = RandomState> {
    name: String,
    index: SymbolIndex<S>,
    keys: KeyMap,
    checksums: CheckSums,
}

impl<S> fmt::Debug for SymbolTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolTable")
            .field("name", &self.name)
            .field("available_key", &self.keys.available_key())
            .field("dense_key_limit", &self.keys.dense_limit())
            .field("symbols", &self.index.len())
            .finish()
    }
}

impl<S: Clone> Clone for SymbolTable<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            index: self.index.clone(),
            keys: self.keys.clone(),
            checksums: self.checksums.clone(),
        }
    }
}

impl Default for SymbolTable<RandomState> {
    fn default() -> Self {
        Self::new("")
    }
}

impl SymbolTable<RandomState> {
    /// Constructs a new, empty `SymbolTable` called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::{Symbols, SymbolTable};
    /// let table = SymbolTable::new("phones");
    /// assert_eq!("phones", table.name());
    /// assert_eq!(0, table.len());
    /// assert_eq!(0, table.available_key());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_hasher(name, RandomState::new())
    }
}

impl<S> SymbolTable<S> {
    /// Constructs a new, empty `SymbolTable` called `name` that hashes
    /// symbols with `hash_builder`.
    pub fn with_hasher(name: impl Into<String>, hash_builder: S) -> Self {
        Self {
            name: name.into(),
            index: SymbolIndex::with_hasher(hash_builder),
            keys: KeyMap::new(),
            checksums: CheckSums::default(),
        }
    }

    /// Returns the end of the dense key range. Every key in
    /// `0..dense_key_limit()` is present and resolves without a map lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::{SymbolsMut, SymbolTable};
    /// let mut table = SymbolTable::new("");
    /// table.add_symbol("a");
    /// table.add_symbol("b");
    /// table.add_symbol_with_key("z", 25);
    /// assert_eq!(2, table.dense_key_limit());
    /// ```
    #[must_use]
    pub fn dense_key_limit(&self) -> usize {
        self.keys.dense_limit()
    }

    /// Releases unused storage. Has no observable effect on lookups.
    pub fn shrink_to_fit(&mut self) {
        self.index.shrink_to_fit();
    }

    pub(crate) fn index(&self) -> &SymbolIndex<S> {
        &self.index
    }

    pub(crate) fn keys(&self) -> &KeyMap {
        &self.keys
    }

    pub(crate) fn set_available_key(&mut self, key: i64) {
        self.keys.set_available_key(key);
    }

    fn checksum_pair(&self) -> (CheckSum, CheckSum) {
        self.checksums
            .get_or_compute(|| checksum::compute(&self.index, &self.keys))
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.keys.check_invariants(self.index.len());
    }
}

impl<S> Symbols for SymbolTable<S>
where
    S: BuildHasher,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn available_key(&self) -> i64 {
        self.keys.available_key()
    }

    fn find(&self, key: i64) -> Option<&str> {
        let position = self.keys.position(key)?;
        self.index.get(position)
    }

    fn reverse_find(&self, symbol: &str) -> Option<i64> {
        let position = self.index.find(symbol)?;
        self.keys.key(position)
    }

    fn nth_key(&self, position: usize) -> Option<i64> {
        self.keys.key(position)
    }

    fn checksum(&self) -> CheckSum {
        self.checksum_pair().0
    }

    fn labeled_checksum(&self) -> CheckSum {
        self.checksum_pair().1
    }

    fn iter(&self) -> Iter<'_> {
        Iter::new(&self.index, &self.keys)
    }
}

impl<S> SymbolsMut for SymbolTable<S>
where
    S: BuildHasher,
{
    fn add_symbol(&mut self, symbol: &str) -> i64 {
        let key = self.keys.available_key();
        self.add_symbol_with_key(symbol, key)
    }

    fn add_symbol_with_key(&mut self, symbol: &str, key: i64) -> i64 {
        if key == NO_SYMBOL {
            return NO_SYMBOL;
        }
        if let Some(position) = self.index.find(symbol) {
            let existing = self.keys.key(position).unwrap_or(NO_SYMBOL);
            if existing != key {
                log::debug!(
                    "symbol {symbol:?} already has key {existing}, ignoring requested key {key}"
                );
            }
            return existing;
        }
        if let Some(taken) = self.find(key) {
            log::warn!(
                "key {key} already names symbol {taken:?}, not adding symbol {symbol:?} to table {:?}",
                self.name
            );
            return NO_SYMBOL;
        }
        let (position, inserted) = self.index.insert_or_find(symbol);
        debug_assert!(inserted);
        self.keys.record(key, position);
        self.checksums.invalidate();
        key
    }

    fn remove_symbol(&mut self, key: i64) -> bool {
        let Some(position) = self.keys.remove(key) else {
            log::debug!("key {key} not in table {:?}, nothing to remove", self.name);
            return false;
        };
        self.index.remove(position);
        self.checksums.invalidate();
        true
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn add_table(&mut self, other: &dyn Symbols) {
        for (_, symbol) in other.iter() {
            self.add_symbol(symbol);
        }
    }
}

impl<'a, S> IntoIterator for &'a SymbolTable<S>
where
    S: BuildHasher,
{
    type Item = (i64, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::needless_pass_by_value)]
mod tests {
    use std::collections::HashMap;

    use quickcheck_macros::quickcheck;

    use crate::{Symbols, SymbolsMut, SymbolTable, NO_SYMBOL};

    fn table_of(pairs: &[(&str, i64)]) -> SymbolTable {
        let mut table = SymbolTable::new("test");
        for &(symbol, key) in pairs {
            assert_eq!(key, table.add_symbol_with_key(symbol, key));
        }
        table.check_invariants();
        table
    }

    #[test]
    fn alloc_drop_new() {
        let table = SymbolTable::new("");
        drop(table);
    }

    #[test]
    fn sequential_adds_are_dense() {
        let mut table = SymbolTable::new("");
        for i in 0..50_i64 {
            assert_eq!(i, table.add_symbol(&format!("s{i}")));
        }
        table.check_invariants();
        assert_eq!(50, table.dense_key_limit());
        for i in 0..50_i64 {
            assert_eq!(Some(format!("s{i}").as_str()), table.find(i));
            assert_eq!(Some(i), table.nth_key(i as usize));
        }
        assert_eq!(50, table.available_key());
    }

    #[test]
    fn re_adding_symbol_keeps_original_key() {
        let mut table = table_of(&[("a", 0), ("b", 1)]);
        let before = table.labeled_checksum();
        assert_eq!(0, table.add_symbol_with_key("a", 9));
        assert_eq!(2, table.len());
        assert_eq!(None, table.find(9));
        assert_eq!(2, table.available_key());
        assert_eq!(before, table.labeled_checksum());
    }

    #[test]
    fn taken_key_is_rejected() {
        let mut table = table_of(&[("a", 0), ("b", 7)]);
        assert_eq!(NO_SYMBOL, table.add_symbol_with_key("c", 0));
        assert_eq!(NO_SYMBOL, table.add_symbol_with_key("c", 7));
        assert_eq!(2, table.len());
        assert!(!table.contains_symbol("c"));
        table.check_invariants();
    }

    #[test]
    fn no_symbol_key_is_ignored() {
        let mut table = SymbolTable::new("");
        assert_eq!(NO_SYMBOL, table.add_symbol_with_key("a", NO_SYMBOL));
        assert!(table.is_empty());
    }

    #[test]
    fn remove_middle_dense_key() {
        let mut table = table_of(&[("a", 0), ("b", 1), ("c", 2)]);
        assert!(table.remove_symbol(1));
        table.check_invariants();
        assert_eq!(1, table.dense_key_limit());
        assert_eq!(Some("a"), table.find(0));
        assert_eq!(None, table.find(1));
        assert_eq!(Some("c"), table.find(2));
        assert_eq!(Some(2), table.reverse_find("c"));
        assert_eq!(None, table.reverse_find("b"));
        assert_eq!(3, table.available_key());
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut table = table_of(&[("a", 0)]);
        let before = table.checksum();
        assert!(!table.remove_symbol(3));
        assert_eq!(1, table.len());
        assert_eq!(before, table.checksum());
    }

    #[test]
    fn remove_last_key_frees_it() {
        let mut table = table_of(&[("a", 0), ("b", 1)]);
        assert!(table.remove_symbol(1));
        assert_eq!(1, table.available_key());
        assert_eq!(1, table.add_symbol("c"));
        assert_eq!(2, table.dense_key_limit());
    }

    #[test]
    fn mutation_invalidates_checksums() {
        let mut table = table_of(&[("a", 0)]);
        let content = table.checksum();
        let labeled = table.labeled_checksum();
        table.add_symbol("b");
        assert_ne!(content, table.checksum());
        assert_ne!(labeled, table.labeled_checksum());
        table.remove_symbol(1);
        assert_eq!(content, table.checksum());
        assert_eq!(labeled, table.labeled_checksum());
    }

    #[test]
    fn content_checksum_ignores_keys() {
        let left = table_of(&[("a", 0), ("b", 1)]);
        let right = table_of(&[("a", 10), ("b", 20)]);
        assert_eq!(left.checksum(), right.checksum());
        assert_ne!(left.labeled_checksum(), right.labeled_checksum());
    }

    #[test]
    fn labeled_checksum_skips_negative_keys() {
        let plain = table_of(&[("a", 0), ("b", 1)]);
        let with_negative = table_of(&[("a", 0), ("b", 1), ("neg", -5)]);
        assert_eq!(plain.labeled_checksum(), with_negative.labeled_checksum());
        assert_ne!(plain.checksum(), with_negative.checksum());
    }

    #[test]
    fn name_does_not_affect_checksums() {
        let mut table = table_of(&[("a", 0)]);
        let pair = (table.checksum(), table.labeled_checksum());
        table.set_name("renamed");
        assert_eq!("renamed", table.name());
        assert_eq!(pair, (table.checksum(), table.labeled_checksum()));
    }

    #[test]
    fn add_table_merges_by_symbol() {
        let mut dest = table_of(&[("a", 0), ("b", 1)]);
        let source = table_of(&[("b", 5), ("c", 6), ("d", 9)]);
        dest.add_table(&source);
        dest.check_invariants();
        assert_eq!(4, dest.len());
        assert_eq!(Some(1), dest.reverse_find("b"));
        assert_eq!(Some(2), dest.reverse_find("c"));
        assert_eq!(Some(3), dest.reverse_find("d"));
        assert_eq!(4, dest.dense_key_limit());
    }

    #[test]
    fn clone_is_independent() {
        let table = table_of(&[("a", 0), ("b", 4)]);
        let mut copy = table.clone();
        assert_eq!(table.labeled_checksum(), copy.labeled_checksum());
        copy.add_symbol("c");
        assert_eq!(2, table.len());
        assert_eq!(3, copy.len());
    }

    #[test]
    fn iteration_is_ascending_by_key() {
        let table = table_of(&[("x", 4), ("a", 0), ("m", -2), ("b", 1), ("y", 9)]);
        let keys = table.iter().map(|(key, _)| key).collect::<Vec<_>>();
        assert_eq!(vec![-2, 0, 1, 4, 9], keys);
        assert_eq!(5, table.iter().len());
        let pairs = (&table).into_iter().collect::<HashMap<_, _>>();
        assert_eq!(Some(&"m"), pairs.get(&-2));
    }

    #[quickcheck]
    fn add_then_find_roundtrip(symbols: Vec<String>) -> bool {
        let mut table = SymbolTable::new("");
        let keys = symbols
            .iter()
            .map(|s| table.add_symbol(s))
            .collect::<Vec<_>>();
        table.check_invariants();
        symbols
            .iter()
            .zip(keys)
            .all(|(s, key)| table.find(key) == Some(s.as_str()) && table.reverse_find(s) == Some(key))
    }

    #[quickcheck]
    fn remove_keeps_other_keys(keys: Vec<u8>, victim: u8) -> bool {
        let mut table = SymbolTable::new("");
        for key in &keys {
            table.add_symbol_with_key(&format!("s{key}"), i64::from(*key));
        }
        let before = table
            .iter()
            .map(|(k, s)| (k, s.to_string()))
            .collect::<Vec<_>>();
        table.remove_symbol(i64::from(victim));
        table.check_invariants();
        table.find(i64::from(victim)).is_none()
            && before
                .iter()
                .filter(|(k, _)| *k != i64::from(victim))
                .all(|(k, s)| table.find(*k) == Some(s.as_str()))
    }
}
