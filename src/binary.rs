//! Binary symbol table format.
//!
//! All integers are fixed width in the native byte order of the writer, so
//! files do not move between machines of different endianness:
//!
//! ```text
//! magic:i32 | name:string | available_key:i64 | count:i64 | (symbol:string, key:i64){count}
//! ```
//!
//! A string is an `i32` byte length followed by UTF-8 bytes. Records follow
//! storage order, so reading them back replays the original insertions and
//! reproduces both checksums. A table whose keys were all added in order
//! lists its dense range first, then its sparse keys in ascending order.

use core::hash::BuildHasher;
use std::collections::hash_map::RandomState;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::frozen::ConstSymbolTable;
use crate::table::{SymbolTable, Symbols, SymbolsMut};
use crate::{MAGIC_NUMBER, NO_SYMBOL};

fn write_i32<W: Write>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_ne_bytes())
}

fn write_i64<W: Write>(writer: &mut W, value: i64) -> io::Result<()> {
    writer.write_all(&value.to_ne_bytes())
}

fn write_str<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    let len = i32::try_from(value.len()).map_err(|_| Error::Corrupt {
        what: "string length",
        value: value.len() as i64,
    })?;
    write_i32(writer, len)?;
    writer.write_all(value.as_bytes())?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> io::Result<i32> {
    let mut buf = [0; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_ne_bytes(buf))
}

fn read_i64<R: Read>(reader: &mut R) -> io::Result<i64> {
    let mut buf = [0; 8];
    reader.read_exact(&mut buf)?;
    Ok(i64::from_ne_bytes(buf))
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let len = read_i32(reader)?;
    let len = u64::try_from(len).map_err(|_| Error::Corrupt {
        what: "string length",
        value: i64::from(len),
    })?;
    // Read through `take` so a corrupt length cannot force a huge allocation
    // up front.
    let mut buf = Vec::new();
    reader.take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(String::from_utf8(buf)?)
}

impl<S> SymbolTable<S>
where
    S: BuildHasher,
{
    /// Writes the table in the binary format and flushes `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the writer fails and [`Error::Corrupt`] if a
    /// string is too long for its `i32` length prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// # use fst_symbols::{Symbols, SymbolsMut, SymbolTable};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = SymbolTable::new("io");
    /// table.add_symbol("a");
    /// table.add_symbol_with_key("z", 25);
    ///
    /// let mut buf = Vec::new();
    /// table.write(&mut buf)?;
    /// let read = SymbolTable::read(buf.as_slice())?;
    /// assert_eq!("io", read.name());
    /// assert_eq!(table.labeled_checksum(), read.labeled_checksum());
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        let index = self.index();
        let keys = self.keys();
        write_i32(&mut writer, MAGIC_NUMBER)?;
        write_str(&mut writer, self.name())?;
        write_i64(&mut writer, keys.available_key())?;
        write_i64(&mut writer, index.len() as i64)?;
        for (position, symbol) in index.strings().enumerate() {
            let key = keys.key(position).ok_or(Error::Corrupt {
                what: "position",
                value: position as i64,
            })?;
            write_str(&mut writer, symbol)?;
            write_i64(&mut writer, key)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Serializes the table into a byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupt`] if a string is too long to encode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Writes the table to the file at `path`, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] naming `path` if the file cannot be created or
    /// written.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| Error::from(err).in_file(path))?;
        self.write(BufWriter::new(file))
            .map_err(|err| err.in_file(path))
    }
}

impl SymbolTable<RandomState> {
    /// Reads a table in the binary format.
    ///
    /// # Errors
    ///
    /// - [`Error::BadMagic`] if the stream is not a symbol table.
    /// - [`Error::Io`] if the stream fails or ends early.
    /// - [`Error::Corrupt`], [`Error::Utf8`] or [`Error::DuplicateKey`] if a
    ///   record cannot be decoded or replayed.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        Self::read_with_hasher(reader, RandomState::new())
    }

    /// Reads a table from a buffer produced by [`SymbolTable::to_bytes`].
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::read`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read(bytes)
    }

    /// Reads a table in the binary format from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] naming `path` and wrapping the cause.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::from(err).in_file(path))?;
        Self::read(BufReader::new(file)).map_err(|err| err.in_file(path))
    }
}

impl<S> SymbolTable<S>
where
    S: BuildHasher,
{
    /// Reads a table in the binary format, hashing symbols with
    /// `hash_builder`.
    ///
    /// Records are replayed through
    /// [`add_symbol_with_key`](SymbolsMut::add_symbol_with_key), which
    /// rebuilds the dense range exactly as the original insertions did.
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::read`].
    pub fn read_with_hasher<R: Read>(mut reader: R, hash_builder: S) -> Result<Self> {
        let magic = read_i32(&mut reader)?;
        if magic != MAGIC_NUMBER {
            return Err(Error::BadMagic { found: magic });
        }
        let name = read_string(&mut reader)?;
        let mut table = Self::with_hasher(name, hash_builder);
        table.set_available_key(read_i64(&mut reader)?);
        let count = read_i64(&mut reader)?;
        if count < 0 {
            return Err(Error::Corrupt {
                what: "symbol count",
                value: count,
            });
        }
        for _ in 0..count {
            let symbol = read_string(&mut reader)?;
            let key = read_i64(&mut reader)?;
            if key == NO_SYMBOL {
                return Err(Error::Corrupt {
                    what: "key",
                    value: key,
                });
            }
            if table.add_symbol_with_key(&symbol, key) == NO_SYMBOL {
                return Err(Error::DuplicateKey {
                    table: table.name().to_string(),
                    symbol,
                    key,
                });
            }
        }
        table.shrink_to_fit();
        Ok(table)
    }
}

impl<S> ConstSymbolTable<S>
where
    S: BuildHasher,
{
    /// Writes the backing table in the binary format. See
    /// [`SymbolTable::write`].
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::write`].
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        self.as_arc().write(writer)
    }

    /// Serializes the backing table into a byte buffer.
    ///
    /// # Errors
    ///
    /// See [`SymbolTable::to_bytes`].
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.as_arc().to_bytes()
    }
}
