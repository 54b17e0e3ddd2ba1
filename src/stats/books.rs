//! Per-book rating aggregates and top-N rankings
//!
//! Ratings are grouped by ISBN in order of each ISBN's first appearance in
//! the ratings input. Rankings are stable descending sorts over that order,
//! so ties keep first-appearance order. Treat tie order as incidental.
//!
//! The two joins differ on purpose:
//!
//! | Aggregate | Join with books | Unmatched ISBN |
//! |-----------|-----------------|----------------|
//! | ratings per book | left | kept, `title = None` |
//! | average per book | inner | dropped |
//!
//! The average ranking also applies the minimum-support threshold: a book
//! needs at least `min_ratings` ratings to be eligible at all, so a single
//! perfect score cannot top the chart.

use crate::dataset::{Book, Rating};
use serde::Serialize;
use std::collections::HashMap;

/// Ratings needed before a book's mean is ranked
pub const DEFAULT_MIN_RATINGS: usize = 5;

/// Length of each ranking
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookCount {
    pub isbn: String,
    pub title: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookAverage {
    pub isbn: String,
    pub title: String,
    pub average: f64,
    pub count: usize,
}

/// ISBN to title lookup. Book exports repeat ISBNs; the first row wins.
pub struct TitleIndex<'a> {
    titles: HashMap<&'a str, &'a str>,
}

impl<'a> TitleIndex<'a> {
    pub fn new(books: &'a [Book]) -> Self {
        let mut titles = HashMap::with_capacity(books.len());
        for book in books {
            titles
                .entry(book.isbn.as_str())
                .or_insert(book.title.as_str());
        }
        Self { titles }
    }

    pub fn get(&self, isbn: &str) -> Option<&'a str> {
        self.titles.get(isbn).copied()
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

/// Count and sum of ratings for one ISBN
#[derive(Debug, Clone, PartialEq)]
pub struct BookTally<'a> {
    pub isbn: &'a str,
    pub count: usize,
    pub sum: f64,
}

impl BookTally<'_> {
    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Group ratings by ISBN, in order of first appearance
pub fn tally(ratings: &[Rating]) -> Vec<BookTally<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<BookTally<'_>> = Vec::new();

    for rating in ratings {
        let slot = *index.entry(rating.isbn.as_str()).or_insert_with(|| {
            tallies.push(BookTally {
                isbn: rating.isbn.as_str(),
                count: 0,
                sum: 0.0,
            });
            tallies.len() - 1
        });
        let t = &mut tallies[slot];
        t.count += 1;
        t.sum += rating.value;
    }

    tallies
}

/// Rating count per ISBN, left-joined with titles
pub fn ratings_per_book(tallies: &[BookTally<'_>], titles: &TitleIndex<'_>) -> Vec<BookCount> {
    tallies
        .iter()
        .map(|t| BookCount {
            isbn: t.isbn.to_string(),
            title: titles.get(t.isbn).map(str::to_string),
            count: t.count,
        })
        .collect()
}

/// Mean rating per ISBN with at least `min_ratings` ratings, inner-joined
/// with titles
pub fn average_rating_per_book(
    tallies: &[BookTally<'_>],
    titles: &TitleIndex<'_>,
    min_ratings: usize,
) -> Vec<BookAverage> {
    tallies
        .iter()
        .filter(|t| t.count >= min_ratings)
        .filter_map(|t| {
            let title = titles.get(t.isbn)?;
            Some(BookAverage {
                isbn: t.isbn.to_string(),
                title: title.to_string(),
                average: t.mean(),
                count: t.count,
            })
        })
        .collect()
}

pub fn top_by_count(rows: &[BookCount], n: usize) -> Vec<BookCount> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

pub fn top_by_average(rows: &[BookAverage], n: usize) -> Vec<BookAverage> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked.truncate(n);
    ranked
}
