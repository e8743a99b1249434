//! Lazily computed, cached table checksums.

use core::fmt;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::index::SymbolIndex;
use crate::keys::KeyMap;

/// A SHA-256 digest over the contents of a symbol table.
///
/// Formats as lowercase hex with [`Display`](fmt::Display).
///
/// # Examples
///
/// ```
/// # use fst_symbols::{Symbols, SymbolsMut, SymbolTable};
/// let mut table = SymbolTable::new("digits");
/// table.add_symbol("0");
/// let checksum = table.checksum();
/// assert_eq!(64, checksum.to_string().len());
/// assert_eq!(32, checksum.as_bytes().len());
/// ```
#[derive(Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CheckSum([u8; 32]);

impl CheckSum {
    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CheckSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CheckSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckSum({self})")
    }
}

impl From<[u8; 32]> for CheckSum {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct State {
    valid: bool,
    checksum: CheckSum,
    labeled: CheckSum,
}

/// The `(checksum, labeled checksum)` pair of a table, guarded by a
/// shared/exclusive lock.
///
/// Readers only ever take the shared lock once the pair is valid. After an
/// invalidation the first reader to win the exclusive lock recomputes it and
/// everyone queued behind it reuses the result.
#[derive(Debug, Default)]
pub(crate) struct CheckSums {
    state: RwLock<State>,
}

impl Clone for CheckSums {
    fn clone(&self) -> Self {
        Self {
            state: RwLock::new(*self.state.read()),
        }
    }
}

impl CheckSums {
    /// Marks the cached pair stale. Writers hold `&mut` so no lock is taken.
    pub(crate) fn invalidate(&mut self) {
        self.state.get_mut().valid = false;
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        self.state.read().valid
    }

    /// Returns the cached pair, running `compute` first if it is stale.
    pub(crate) fn get_or_compute<F>(&self, compute: F) -> (CheckSum, CheckSum)
    where
        F: FnOnce() -> (CheckSum, CheckSum),
    {
        {
            let state = self.state.read();
            if state.valid {
                return (state.checksum, state.labeled);
            }
        }
        let mut state = self.state.write();
        // Another thread may have finished the computation while we waited.
        if !state.valid {
            let (checksum, labeled) = compute();
            state.checksum = checksum;
            state.labeled = labeled;
            state.valid = true;
        }
        (state.checksum, state.labeled)
    }
}

/// Computes the content checksum and the labeled checksum of a table.
///
/// The content checksum covers every symbol in storage order, each followed
/// by a NUL byte, and ignores keys. The labeled checksum covers
/// `"{symbol}\t{key}"` for the dense range and then for sparse keys that are
/// not below the dense limit, so negative keys never contribute to it.
pub(crate) fn compute<S>(index: &SymbolIndex<S>, keys: &KeyMap) -> (CheckSum, CheckSum) {
    let mut content = Sha256::new();
    for symbol in index.strings() {
        content.update(symbol.as_bytes());
        content.update([0_u8]);
    }

    let mut labeled = Sha256::new();
    let dense_limit = keys.dense_limit();
    for (position, symbol) in index.strings().take(dense_limit).enumerate() {
        labeled.update(format!("{symbol}\t{position}").as_bytes());
    }
    for (&key, &position) in keys.sparse() {
        if key < dense_limit as i64 {
            continue;
        }
        if let Some(symbol) = index.get(position) {
            labeled.update(format!("{symbol}\t{key}").as_bytes());
        }
    }

    (
        CheckSum(content.finalize().into()),
        CheckSum(labeled.finalize().into()),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{CheckSum, CheckSums};

    #[test]
    fn display_is_lowercase_hex() {
        let mut bytes = [0_u8; 32];
        bytes[0] = 0xAB;
        bytes[31] = 0x01;
        let checksum = CheckSum::from(bytes);
        let hex = checksum.to_string();
        assert_eq!(64, hex.len());
        assert!(hex.starts_with("ab00"));
        assert!(hex.ends_with("01"));
    }

    #[test]
    fn computes_once_until_invalidated() {
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            (CheckSum::from([1; 32]), CheckSum::from([2; 32]))
        };
        let mut sums = CheckSums::default();
        assert!(!sums.is_valid());
        let first = sums.get_or_compute(compute);
        let second = sums.get_or_compute(compute);
        assert_eq!(first, second);
        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert!(sums.is_valid());

        sums.invalidate();
        assert!(!sums.is_valid());
        sums.get_or_compute(compute);
        assert_eq!(2, calls.load(Ordering::SeqCst));
    }

    #[test]
    fn clone_carries_cached_state() {
        let sums = CheckSums::default();
        sums.get_or_compute(|| (CheckSum::from([3; 32]), CheckSum::from([4; 32])));
        let copy = sums.clone();
        assert!(copy.is_valid());
        let pair = copy.get_or_compute(|| unreachable!("cached pair was copied"));
        assert_eq!(CheckSum::from([4; 32]), pair.1);
    }
}
