//! Compatibility check between the symbol tables of two transducers.

use crate::table::Symbols;

/// Controls how [`compatible`] compares tables.
///
/// # Examples
///
/// ```
/// # use fst_symbols::CompatPolicy;
/// let policy = CompatPolicy::default();
/// assert!(policy.check && policy.warn);
///
/// let quiet = CompatPolicy::default().with_warn(false);
/// assert!(quiet.check && !quiet.warn);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompatPolicy {
    /// When `false`, every pair of tables is considered compatible.
    pub check: bool,

    /// Log a warning when two tables are found incompatible.
    pub warn: bool,
}

impl Default for CompatPolicy {
    fn default() -> Self {
        Self {
            check: true,
            warn: true,
        }
    }
}

impl CompatPolicy {
    /// A policy that accepts any pair of tables.
    #[must_use]
    pub const fn unchecked() -> Self {
        Self {
            check: false,
            warn: false,
        }
    }

    /// Sets whether tables are compared at all.
    #[must_use]
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Sets whether a mismatch is logged.
    #[must_use]
    pub fn with_warn(mut self, warn: bool) -> Self {
        self.warn = warn;
        self
    }
}

/// Returns whether two optional symbol tables agree on every symbol/key
/// binding.
///
/// Tables agree when checking is disabled, when either is absent, or when
/// their [labeled checksums](Symbols::labeled_checksum) are equal. Names are
/// not compared.
///
/// # Examples
///
/// ```
/// # use fst_symbols::{compatible, CompatPolicy, Symbols, SymbolsMut, SymbolTable};
/// let mut a = SymbolTable::new("a");
/// a.add_symbol("x");
/// let mut b = SymbolTable::new("b");
/// b.add_symbol("x");
/// let mut c = SymbolTable::new("c");
/// c.add_symbol_with_key("x", 7);
///
/// let policy = CompatPolicy::default();
/// assert!(compatible(Some(&a), Some(&b), &policy));
/// assert!(!compatible(Some(&a), Some(&c), &policy));
/// assert!(compatible(Some(&a), None, &policy));
/// assert!(compatible(Some(&a), Some(&c), &CompatPolicy::unchecked()));
/// ```
#[must_use]
pub fn compatible(a: Option<&dyn Symbols>, b: Option<&dyn Symbols>, policy: &CompatPolicy) -> bool {
    if !policy.check {
        return true;
    }
    let (Some(a), Some(b)) = (a, b) else {
        return true;
    };
    if a.labeled_checksum() == b.labeled_checksum() {
        return true;
    }
    if policy.warn {
        log::warn!(
            "symbol tables {:?} ({} symbols) and {:?} ({} symbols) are incompatible",
            a.name(),
            a.len(),
            b.name(),
            b.len()
        );
    }
    false
}
