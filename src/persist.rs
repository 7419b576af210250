//! Line-oriented text dumps of a table's live entries.
//!
//! Each entry is written as a `key:value` line. Reading splits every line at
//! its first `:`, so values may contain colons while keys may not.

use std::fmt::Display;
use std::io;
use std::io::BufRead;
use std::io::Write;

use thiserror::Error;

use crate::hash_table::HashTable;

/// Errors produced while dumping or replaying a text table.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The underlying reader or writer failed.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// A non-blank line had no `:` separator.
    #[error("line {line}: expected `key:value`")]
    MalformedLine {
        /// One-based line number.
        line: usize,
    },

    /// A key or value could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// The parser's error message.
        message: String,
    },
}

/// Writes one `key:value` line per live entry of `table`, in iteration order.
///
/// Returns the number of entries written.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use twin_hash::ChainingHashTable;
/// use twin_hash::DefaultHashBuilder;
/// use twin_hash::HashTable;
/// use twin_hash::persist::write_text;
///
/// let mut table: ChainingHashTable<&str, u32, DefaultHashBuilder> = ChainingHashTable::new();
/// table.insert("apple", 3);
///
/// let mut out: Vec<u8> = Vec::new();
/// assert_eq!(write_text(&table, &mut out).unwrap(), 1);
/// assert_eq!(out, b"apple:3\n");
/// # }
/// ```
pub fn write_text<'a, T, K, V, W>(table: &'a T, mut writer: W) -> Result<usize, PersistError>
where
    &'a T: IntoIterator<Item = (&'a K, &'a V)>,
    K: Display + 'a,
    V: Display + 'a,
    W: Write,
{
    let mut written = 0;
    for (key, value) in table {
        writeln!(writer, "{key}:{value}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Replays every `key:value` line of `reader` into `table` with
/// [`HashTable::insert`].
///
/// Blank lines are skipped and a trailing `\r` is ignored. Entries already in
/// `table` are kept unless a line overwrites them. Stops at the first bad
/// line; lines before it have already been inserted.
///
/// Returns the number of lines replayed.
pub fn read_text<T, K, V, R, PK, PV, EK, EV>(
    table: &mut T,
    reader: R,
    mut parse_key: PK,
    mut parse_value: PV,
) -> Result<usize, PersistError>
where
    T: HashTable<K, V> + ?Sized,
    R: BufRead,
    PK: FnMut(&str) -> Result<K, EK>,
    PV: FnMut(&str) -> Result<V, EV>,
    EK: Display,
    EV: Display,
{
    let mut replayed = 0;
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.trim().is_empty() {
            continue;
        }

        let (raw_key, raw_value) = line
            .split_once(':')
            .ok_or(PersistError::MalformedLine { line: line_number })?;
        let key = parse_key(raw_key).map_err(|err| PersistError::Parse {
            line: line_number,
            message: format!("bad key {raw_key:?}: {err}"),
        })?;
        let value = parse_value(raw_value).map_err(|err| PersistError::Parse {
            line: line_number,
            message: format!("bad value {raw_value:?}: {err}"),
        })?;

        table.insert(key, value);
        replayed += 1;
    }
    Ok(replayed)
}
