//! CSV ranking output
//!
//! One row per ranked book, both rankings in one file:
//!
//! ```text
//! ranking,rank,isbn,title,rating_count,average_rating
//! most_rated,1,0971880107,Wild Animus,2502,
//! best_average,1,0439136350,Harry Potter and the Prisoner of Azkaban,8,9.250
//! ```
//!
//! `average_rating` is left empty for the most-rated ranking, and `title` is
//! empty for rated ISBNs with no matching book.

use crate::error::Result;
use crate::report::Report;
use std::io::Write;

pub const HEADER: [&str; 6] = [
    "ranking",
    "rank",
    "isbn",
    "title",
    "rating_count",
    "average_rating",
];

pub fn write<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    let mut out = ::csv::Writer::from_writer(writer);
    out.write_record(HEADER)?;

    for (i, book) in report.aggregates.top_rated_books.iter().enumerate() {
        let rank = (i + 1).to_string();
        let count = book.count.to_string();
        out.write_record([
            "most_rated",
            rank.as_str(),
            book.isbn.as_str(),
            book.title.as_deref().unwrap_or(""),
            count.as_str(),
            "",
        ])?;
    }

    for (i, book) in report.aggregates.top_avg_rated_books.iter().enumerate() {
        let rank = (i + 1).to_string();
        let count = book.count.to_string();
        let average = format!("{:.3}", book.average);
        out.write_record([
            "best_average",
            rank.as_str(),
            book.isbn.as_str(),
            book.title.as_str(),
            count.as_str(),
            average.as_str(),
        ])?;
    }

    out.flush()?;
    Ok(())
}
