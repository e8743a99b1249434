#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(unknown_lints)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused_qualifications)]
#![warn(variant_size_differences)]
#![forbid(unsafe_code)]
// Enable feature callouts in generated documentation:
// https://doc.rust-lang.org/beta/unstable-book/language-features/doc-cfg.html
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Symbol tables for weighted finite-state transducer labels.
//!
//! A symbol table is a bidirectional map between `i64` keys, which label the
//! arcs of a transducer, and the human-readable strings they stand for. Its
//! API is similar to a bimap: a key resolves its symbol and a symbol resolves
//! its key.
//!
//! # Examples
//!
//! ```
//! # use fst_symbols::{Symbols, SymbolsMut, SymbolTable};
//! let mut table = SymbolTable::new("letters");
//! assert_eq!(0, table.add_symbol("<eps>"));
//! assert_eq!(1, table.add_symbol("a"));
//! assert_eq!(7, table.add_symbol_with_key("z", 7));
//!
//! assert_eq!(Some("a"), table.find(1));
//! assert_eq!(Some(7), table.reverse_find("z"));
//! assert_eq!(8, table.available_key());
//! ```
//!
//! # Keys
//!
//! Tables are almost always built by adding symbols in order from key zero.
//! Keys in the prefix `[0, dense_limit)` are stored at the position equal to
//! the key and resolve without any map lookup. Keys outside that prefix,
//! including negative keys, go through an ordered sparse map.
//!
//! A symbol is stored at most once. Adding a symbol that is already present
//! returns the key it already has and ignores the requested key.
//!
//! # Checksums
//!
//! Every table exposes two SHA-256 [`CheckSum`]s: [`Symbols::checksum`] over
//! the symbol strings only and [`Symbols::labeled_checksum`] over
//! symbol/key pairs. They are computed lazily, cached, and recomputed at most
//! once after a mutation no matter how many threads ask for them
//! concurrently. [`compatible`] compares labeled checksums.
//!
//! # Persistence
//!
//! Tables round trip through a binary format ([`SymbolTable::write`],
//! [`SymbolTable::read`]) and a line-oriented text format
//! ([`SymbolTable::write_text`], [`SymbolTable::read_text`]).
//!
//! # Mutability
//!
//! [`SymbolTable`] implements both the read contract [`Symbols`] and the
//! write contract [`SymbolsMut`]. [`ConstSymbolTable`] shares a frozen table
//! behind an [`Arc`](std::sync::Arc) and implements [`Symbols`] only.

#![doc(html_root_url = "https://docs.rs/fst-symbols/0.1.0")]

// Ensure code blocks in README.md compile
#[cfg(doctest)]
#[doc = include_str!("../README.md")]
mod readme {}

mod binary;
mod checksum;
mod compat;
mod error;
mod frozen;
mod index;
mod keys;
mod options;
mod table;
mod text;

pub use crate::checksum::CheckSum;
pub use crate::compat::{compatible, CompatPolicy};
pub use crate::error::{Error, Result};
pub use crate::frozen::ConstSymbolTable;
pub use crate::index::{Strings, SymbolIndex};
pub use crate::options::TextOptions;
pub use crate::table::{Iter, SymbolTable, Symbols, SymbolsMut};

/// Reserved key that never names a symbol.
///
/// Adding a symbol with this key is a no-op that returns `NO_SYMBOL`, and the
/// text reader rejects it.
pub const NO_SYMBOL: i64 = -1;

/// Identifies a byte stream as a binary symbol table written in the native
/// byte order.
pub const MAGIC_NUMBER: i32 = 2_125_658_996;

/// Number of buckets in a freshly constructed [`SymbolIndex`].
pub const DEFAULT_BUCKET_COUNT: usize = 1 << 4;

#[cfg(test)]
mod tests {
    use super::DEFAULT_BUCKET_COUNT;

    #[test]
    fn default_bucket_count_is_power_of_two() {
        assert!(DEFAULT_BUCKET_COUNT.is_power_of_two());
    }
}
