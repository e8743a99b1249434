//! Errors raised while reading or writing symbol tables.
//!
//! Lookups never fail; they return `None`. Only the persistence entry points
//! return these errors, and a failed read never yields a partial table.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Error type for symbol table persistence.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The underlying stream failed or ended early.
    #[error("symbol table I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A file could not be opened, read or written.
    #[error("symbol table file {}: {source}", .path.display())]
    File {
        /// The file that was being accessed.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: Box<Error>,
    },

    /// The stream does not start with [`MAGIC_NUMBER`](crate::MAGIC_NUMBER).
    #[error("bad symbol table magic number {found}")]
    BadMagic {
        /// The value found in place of the magic number.
        found: i32,
    },

    /// A length or count field holds an impossible value.
    #[error("corrupt symbol table: {what} is {value}")]
    Corrupt {
        /// The field that was being decoded.
        what: &'static str,
        /// The value read for it.
        value: i64,
    },

    /// A serialized string is not valid UTF-8.
    #[error("symbol table string is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// A record names a key that is already bound to another symbol.
    #[error("{table}: key {key} for symbol {symbol:?} is already in use")]
    DuplicateKey {
        /// Name of the table or file being read.
        table: String,
        /// The rejected symbol.
        symbol: String,
        /// The key it asked for.
        key: i64,
    },

    /// A text line does not have exactly two fields.
    #[error("{table}, line {line}: bad number of columns ({count})")]
    ColumnCount {
        /// Name of the table or file being read.
        table: String,
        /// One-based line number.
        line: usize,
        /// Number of non-empty fields found.
        count: usize,
    },

    /// A text key is not a valid, permitted integer.
    #[error("{table}, line {line}: bad non-negative integer {value:?}")]
    BadKey {
        /// Name of the table or file being read.
        table: String,
        /// One-based line number.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// The text options carry an empty field separator set.
    #[error("missing required field separator")]
    MissingSeparator,
}

impl Error {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for symbol table persistence.
pub type Result<T, E = Error> = core::result::Result<T, E>;
