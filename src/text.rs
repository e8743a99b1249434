//! Text symbol table format.
//!
//! One entry per line, `symbol<separator>key`, in ascending key order:
//!
//! ```text
//! <eps>	0
//! a	1
//! z	26
//! ```

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::frozen::ConstSymbolTable;
use crate::options::TextOptions;
use crate::table::{SymbolTable, Symbols, SymbolsMut};
use crate::NO_SYMBOL;

fn write_text_to<W: Write>(table: &dyn Symbols, mut writer: W, opts: &TextOptions) -> Result<()> {
    let separator = opts.output_separator().ok_or(Error::MissingSeparator)?;
    let mut warned = false;
    for (key, symbol) in table.iter() {
        if key < 0 && !opts.allow_negative_labels && !warned {
            log::warn!(
                "negative key {key} in symbol table {:?} while negative labels are disallowed",
                table.name()
            );
            warned = true;
        }
        writeln!(writer, "{symbol}{separator}{key}")?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_key(field: &str, opts: &TextOptions) -> Option<i64> {
    let key = field.parse::<i64>().ok()?;
    if key == NO_SYMBOL || (key < 0 && !opts.allow_negative_labels) {
        return None;
    }
    Some(key)
}

impl<S> SymbolTable<S>
where
    S: BuildHasher,
{
    /// Writes the table as text, one `symbol<separator>key` line per entry.
    ///
    /// A negative key is written even when
    /// [`allow_negative_labels`](TextOptions::allow_negative_labels) is off,
    /// but a warning is logged the first time one is seen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSeparator`] if the separator set is empty and
    /// [`Error::Io`] if the writer fails.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::{SymbolsMut, SymbolTable, TextOptions};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = SymbolTable::new("letters");
    /// table.add_symbol("a");
    /// table.add_symbol_with_key("c", 5);
    ///
    /// let mut buf = Vec::new();
    /// table.write_text(&mut buf, &TextOptions::default())?;
    /// assert_eq!("a\t0\nc\t5\n", String::from_utf8(buf)?);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn write_text<W: Write>(&self, writer: W, opts: &TextOptions) -> Result<()> {
        write_text_to(self, writer, opts)
    }

    /// Writes the table as text to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] naming `path` and wrapping the cause.
    pub fn write_text_file<P: AsRef<Path>>(&self, path: P, opts: &TextOptions) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| Error::from(err).in_file(path))?;
        self.write_text(BufWriter::new(file), opts)
            .map_err(|err| err.in_file(path))
    }

    /// Reads a table from text, hashing symbols with `hash_builder`. The
    /// table is named `source`.
    ///
    /// Fields are split on any character of the separator set and on
    /// newlines. Empty fields are dropped and lines without fields are
    /// skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::ColumnCount`] if a line does not hold exactly two fields.
    /// - [`Error::BadKey`] if a key is not a base-10 integer, is
    ///   [`NO_SYMBOL`], or is negative while negative labels are disallowed.
    /// - [`Error::DuplicateKey`] if a key is already bound to another
    ///   symbol.
    /// - [`Error::Io`] if the reader fails or yields invalid UTF-8.
    pub fn read_text_with_hasher<R: BufRead>(
        reader: R,
        source: &str,
        opts: &TextOptions,
        hash_builder: S,
    ) -> Result<Self> {
        let mut table = Self::with_hasher(source, hash_builder);
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let fields = line
                .split(|ch| opts.is_separator(ch))
                .filter(|field| !field.is_empty())
                .collect::<Vec<_>>();
            let (symbol, value) = match fields[..] {
                [] => continue,
                [symbol, value] => (symbol, value),
                _ => {
                    return Err(Error::ColumnCount {
                        table: source.to_string(),
                        line: number + 1,
                        count: fields.len(),
                    })
                }
            };
            let key = parse_key(value, opts).ok_or_else(|| Error::BadKey {
                table: source.to_string(),
                line: number + 1,
                value: value.to_string(),
            })?;
            if table.add_symbol_with_key(symbol, key) == NO_SYMBOL {
                return Err(Error::DuplicateKey {
                    table: source.to_string(),
                    symbol: symbol.to_string(),
                    key,
                });
            }
        }
        table.shrink_to_fit();
        Ok(table)
    }
}

impl SymbolTable<RandomState> {
    /// Reads a table from text. The table is named `source`, which is also
    /// used in error messages.
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::read_text_with_hasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::{Error, Symbols, SymbolTable, TextOptions};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let opts = TextOptions::default();
    /// let table = SymbolTable::read_text("a 0\nb\t1\n\nc  5\n".as_bytes(), "letters", &opts)?;
    /// assert_eq!("letters", table.name());
    /// assert_eq!(Some(5), table.reverse_find("c"));
    ///
    /// let err = SymbolTable::read_text("x\n".as_bytes(), "bad", &opts).unwrap_err();
    /// assert!(matches!(err, Error::ColumnCount { line: 1, count: 1, .. }));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn read_text<R: BufRead>(reader: R, source: &str, opts: &TextOptions) -> Result<Self> {
        Self::read_text_with_hasher(reader, source, opts, RandomState::new())
    }

    /// Reads a table from the text file at `path`. The table is named after
    /// the path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] naming `path` and wrapping the cause.
    pub fn read_text_file<P: AsRef<Path>>(path: P, opts: &TextOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::from(err).in_file(path))?;
        let source = path.display().to_string();
        Self::read_text(BufReader::new(file), &source, opts).map_err(|err| err.in_file(path))
    }
}

impl<S> ConstSymbolTable<S>
where
    S: BuildHasher,
{
    /// Writes the backing table as text. See [`SymbolTable::write_text`].
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::write_text`].
    pub fn write_text<W: Write>(&self, writer: W, opts: &TextOptions) -> Result<()> {
        write_text_to(self, writer, opts)
    }
}
