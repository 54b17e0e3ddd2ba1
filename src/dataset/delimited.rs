//! Semicolon-delimited, ISO-8859-1 text reader
//!
//! The book-crossing exports are Latin-1 encoded, `;`-separated, with a
//! header row and optionally double-quoted fields. Every byte in Latin-1 maps
//! to the Unicode code point of the same value, so decoding is a per-byte
//! widening and can never fail.
//!
//! Row handling mirrors a lenient table loader:
//!
//! | Row shape | Outcome |
//! |-----------|---------|
//! | same field count as header | delivered |
//! | fewer fields than header | delivered, missing trailing fields read as `""` |
//! | more fields than header | skipped and counted |
//! | undecodable record | skipped and counted |
//!
//! A file without a header row is fatal, as is a missing required column.
//! Feeding a comma-separated file through this reader collapses the header
//! into one column, so it surfaces as a missing column rather than silently
//! producing an empty dataset.

use crate::error::{ReportError, Result};
use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const DELIMITER: u8 = b';';

/// Decode ISO-8859-1 bytes into a `String`
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Column names from the first row of a file
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

/// One data row, borrowed from the reader's record buffer
pub struct Row<'r> {
    record: &'r ByteRecord,
}

impl Row<'_> {
    /// Decoded field text, or `""` when the row is shorter than the header
    pub fn text(&self, column: usize) -> String {
        self.record.get(column).map(decode_latin1).unwrap_or_default()
    }

    /// Like [`Row::text`] for columns that may be absent from the header
    pub fn optional(&self, column: Option<usize>) -> String {
        column.map(|c| self.text(c)).unwrap_or_default()
    }
}

pub struct DelimitedReader<R: Read> {
    path: PathBuf,
    header: Header,
    reader: csv::Reader<R>,
}

impl DelimitedReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path)
    }
}

impl<R: Read> DelimitedReader<R> {
    /// Wrap any byte source; `path` is only used in error messages
    pub fn from_reader(source: R, path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let raw = reader.byte_headers().map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.iter().all(|field| field.is_empty()) {
            return Err(ReportError::EmptyInput {
                path: path.to_path_buf(),
            });
        }

        let header = Header {
            names: raw.iter().map(decode_latin1).collect(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            header,
            reader,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of a column the caller cannot work without
    pub fn require(&self, column: &'static str) -> Result<usize> {
        self.header
            .position(column)
            .ok_or_else(|| ReportError::MissingColumn {
                path: self.path.clone(),
                column,
            })
    }

    /// Feed every well-formed row to `visit` and return the number of rows
    /// that were skipped.
    ///
    /// `visit` returns `false` to reject a row it cannot use; rejected rows
    /// are counted as skipped too. I/O failures part-way through the file are
    /// fatal, everything else only skips the offending row.
    pub fn for_each_row<F>(mut self, mut visit: F) -> Result<usize>
    where
        F: FnMut(Row<'_>) -> bool,
    {
        let width = self.header.len();
        let mut record = ByteRecord::new();
        let mut skipped = 0usize;

        loop {
            match self.reader.read_byte_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    if record.len() > width {
                        skipped += 1;
                        continue;
                    }
                    if !visit(Row { record: &record }) {
                        skipped += 1;
                    }
                }
                Err(err) if err.is_io_error() => {
                    return Err(ReportError::Parse {
                        path: self.path,
                        source: err,
                    });
                }
                Err(err) => {
                    log::trace!("{}: skipping row: {}", self.path.display(), err);
                    skipped += 1;
                }
            }
        }

        Ok(skipped)
    }
}
