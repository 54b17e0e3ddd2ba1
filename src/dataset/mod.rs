//! Typed records for the three input tables
//!
//! Each loader pulls only the columns it needs out of a [`DelimitedReader`].
//! Required columns are fatal when absent; optional ones default to empty.
//!
//! - **Users**: `Age` required; `User-ID`, `Location` optional
//! - **Books**: `ISBN`, `Book-Title` required; author/year/publisher optional
//! - **Ratings**: `ISBN`, `Book-Rating` required; `User-ID` optional

pub mod delimited;

pub use delimited::{decode_latin1, DelimitedReader, Header, Row};

use crate::error::Result;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const USER_ID: &str = "User-ID";
pub const AGE: &str = "Age";
pub const LOCATION: &str = "Location";
pub const ISBN: &str = "ISBN";
pub const BOOK_TITLE: &str = "Book-Title";
pub const BOOK_AUTHOR: &str = "Book-Author";
pub const YEAR_OF_PUBLICATION: &str = "Year-Of-Publication";
pub const PUBLISHER: &str = "Publisher";
pub const BOOK_RATING: &str = "Book-Rating";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    /// `None` for blank, `NULL`, or non-numeric source values
    pub age: Option<f64>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub publisher: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub isbn: String,
    pub user_id: String,
    pub value: f64,
}

/// Where the three input files live on disk
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub users: PathBuf,
    pub books: PathBuf,
    pub ratings: PathBuf,
}

impl InputPaths {
    pub fn new(
        users: impl Into<PathBuf>,
        books: impl Into<PathBuf>,
        ratings: impl Into<PathBuf>,
    ) -> Self {
        Self {
            users: users.into(),
            books: books.into(),
            ratings: ratings.into(),
        }
    }
}

/// Rows read and rows dropped for one input table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub loaded: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub users: TableStats,
    pub books: TableStats,
    pub ratings: TableStats,
}

/// All three tables, parsed
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub users: Vec<User>,
    pub books: Vec<Book>,
    pub ratings: Vec<Rating>,
    pub summary: InputSummary,
}

impl Datasets {
    /// Load all three files; any fatal parse failure aborts the whole load
    pub fn load(paths: &InputPaths) -> Result<Self> {
        let (users, user_stats) = load_users(DelimitedReader::open(&paths.users)?)?;
        let (books, book_stats) = load_books(DelimitedReader::open(&paths.books)?)?;
        let (ratings, rating_stats) = load_ratings(DelimitedReader::open(&paths.ratings)?)?;

        Ok(Self {
            users,
            books,
            ratings,
            summary: InputSummary {
                users: user_stats,
                books: book_stats,
                ratings: rating_stats,
            },
        })
    }
}

/// Parse a numeric cell, treating blank, `NULL` and `NaN` as missing
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn log_loaded(path: &Path, what: &str, stats: TableStats) {
    log::info!("Loaded {} {} from {}", stats.loaded, what, path.display());
    if stats.skipped > 0 {
        log::debug!(
            "Skipped {} malformed row(s) in {}",
            stats.skipped,
            path.display()
        );
    }
}

pub fn load_users<R: Read>(reader: DelimitedReader<R>) -> Result<(Vec<User>, TableStats)> {
    let age = reader.require(AGE)?;
    let user_id = reader.header().position(USER_ID);
    let location = reader.header().position(LOCATION);
    let path = reader.path().to_path_buf();

    let mut users = Vec::new();
    let skipped = reader.for_each_row(|row| {
        users.push(User {
            user_id: row.optional(user_id),
            age: parse_number(&row.text(age)),
            location: row.optional(location),
        });
        true
    })?;

    let stats = TableStats {
        loaded: users.len(),
        skipped,
    };
    log_loaded(&path, "users", stats);
    Ok((users, stats))
}

pub fn load_books<R: Read>(reader: DelimitedReader<R>) -> Result<(Vec<Book>, TableStats)> {
    let isbn = reader.require(ISBN)?;
    let title = reader.require(BOOK_TITLE)?;
    let author = reader.header().position(BOOK_AUTHOR);
    let year = reader.header().position(YEAR_OF_PUBLICATION);
    let publisher = reader.header().position(PUBLISHER);
    let path = reader.path().to_path_buf();

    let mut books = Vec::new();
    let skipped = reader.for_each_row(|row| {
        let key = row.text(isbn);
        if key.trim().is_empty() {
            return false;
        }
        books.push(Book {
            isbn: key,
            title: row.text(title),
            author: row.optional(author),
            year: row.optional(year),
            publisher: row.optional(publisher),
        });
        true
    })?;

    let stats = TableStats {
        loaded: books.len(),
        skipped,
    };
    log_loaded(&path, "books", stats);
    Ok((books, stats))
}

pub fn load_ratings<R: Read>(reader: DelimitedReader<R>) -> Result<(Vec<Rating>, TableStats)> {
    let isbn = reader.require(ISBN)?;
    let value = reader.require(BOOK_RATING)?;
    let user_id = reader.header().position(USER_ID);
    let path = reader.path().to_path_buf();

    let mut ratings = Vec::new();
    let skipped = reader.for_each_row(|row| {
        let key = row.text(isbn);
        if key.trim().is_empty() {
            return false;
        }
        let Some(score) = parse_number(&row.text(value)) else {
            return false;
        };
        ratings.push(Rating {
            isbn: key,
            user_id: row.optional(user_id),
            value: score,
        });
        true
    })?;

    let stats = TableStats {
        loaded: ratings.len(),
        skipped,
    };
    log_loaded(&path, "ratings", stats);
    Ok((ratings, stats))
}
