//! Bookstats - summary charts for book rating datasets
//!
//! Bookstats reads the three tables of a Book-Crossing style dump (users,
//! books and ratings), computes a handful of aggregate statistics, and renders
//! them as PNG charts under fixed filenames in an output directory.
//!
//! # Inputs
//!
//! All three files are semicolon-delimited, ISO-8859-1 encoded, with a header
//! row. Only these columns are required:
//!
//! | File | Columns used |
//! |------|--------------|
//! | users | `Age` |
//! | books | `ISBN`, `Book-Title` |
//! | ratings | `ISBN`, `Book-Rating` |
//!
//! A missing file, an empty file or a missing required column aborts the run
//! before anything is written. Individual malformed rows are skipped.
//!
//! # Quick Start
//!
//! ```no_run
//! use bookstats::{InputPaths, ReportConfig, ReportGenerator};
//!
//! let inputs = InputPaths::new("users.csv", "books.csv", "ratings.csv");
//! let generator = ReportGenerator::new(ReportConfig::default());
//! let report = generator.generate(&inputs)?;
//!
//! for (name, file) in &report.charts {
//!     println!("{name}: static/{file}");
//! }
//! # Ok::<(), bookstats::ReportError>(())
//! ```
//!
//! # Charts
//!
//! | Report name | Content |
//! |-------------|---------|
//! | `age_distribution` | user ages, 10 decade bins over [0, 100) |
//! | `rating_distribution` | rating histogram with a density curve |
//! | `top_rated_books` | 10 books with the most ratings |
//! | `top_avg_rated_books` | 10 best mean ratings among books with at least 5 ratings |
//!
//! # Modules
//!
//! - [`dataset`]: delimited Latin-1 parsing into user/book/rating records
//! - [`stats`]: histograms, density estimate and book rankings
//! - [`chart`]: PNG rendering
//! - [`report`]: the pipeline plus JSON/CSV exports

pub mod chart;
pub mod dataset;
pub mod error;
pub mod report;
pub mod stats;

pub use dataset::{Datasets, InputPaths, InputSummary};
pub use error::{ReportError, Result};
pub use report::{ChartKind, Report, ReportConfig, ReportGenerator};
pub use stats::{AggregateOptions, Aggregates};
