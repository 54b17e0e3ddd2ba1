//! Aggregate statistics behind the four charts
//!
//! | Aggregate | Source | Shape |
//! |-----------|--------|-------|
//! | age histogram | users | 10 bins of 10 years over [0, 100) |
//! | rating distribution | ratings | 10 bins over observed range + density curve |
//! | most rated books | ratings ⟕ books | top N by rating count |
//! | best average books | ratings ⋈ books | top N by mean, min-support filtered |
//!
//! Everything is recomputed from the parsed tables on every run.

pub mod books;
pub mod histogram;
pub mod kde;

pub use books::{
    average_rating_per_book, ratings_per_book, tally, top_by_average, top_by_count, BookAverage,
    BookCount, BookTally, TitleIndex, DEFAULT_MIN_RATINGS, DEFAULT_TOP_N,
};
pub use histogram::{Bin, Histogram};

use crate::dataset::{Datasets, Rating, User};
use serde::Serialize;

pub const AGE_MIN: f64 = 0.0;
pub const AGE_MAX: f64 = 100.0;
pub const AGE_BINS: usize = 10;
pub const DEFAULT_RATING_BINS: usize = 10;

/// Ages of users who have one, binned into decades over [0, 100)
pub fn age_histogram(users: &[User]) -> Histogram {
    Histogram::fixed(users.iter().filter_map(|u| u.age), AGE_MIN, AGE_MAX, AGE_BINS)
}

/// Rating histogram with its count-scaled density overlay
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RatingDistribution {
    pub histogram: Histogram,
    /// `(rating, count)` points; empty when the density is undefined
    pub density: Vec<(f64, f64)>,
}

pub fn rating_distribution(ratings: &[Rating], bins: usize) -> RatingDistribution {
    let values: Vec<f64> = ratings.iter().map(|r| r.value).collect();
    let histogram = Histogram::spanning(&values, bins);
    let density = kde::count_scaled_density(&values, histogram.bin_width());
    RatingDistribution { histogram, density }
}

/// Knobs for [`Aggregates::compute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateOptions {
    pub min_ratings: usize,
    pub top_n: usize,
    pub rating_bins: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            min_ratings: DEFAULT_MIN_RATINGS,
            top_n: DEFAULT_TOP_N,
            rating_bins: DEFAULT_RATING_BINS,
        }
    }
}

/// All four statistics for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregates {
    pub age_histogram: Histogram,
    pub rating_distribution: RatingDistribution,
    pub top_rated_books: Vec<BookCount>,
    pub top_avg_rated_books: Vec<BookAverage>,
    /// Distinct ISBNs that received at least one rating
    pub rated_books: usize,
    /// Of those, how many cleared the minimum-support threshold and matched a title
    pub eligible_books: usize,
}

impl Aggregates {
    pub fn compute(data: &Datasets, options: AggregateOptions) -> Self {
        let titles = TitleIndex::new(&data.books);
        let tallies = tally(&data.ratings);

        if titles.is_empty() && !tallies.is_empty() {
            log::warn!("No book titles loaded; every ranked book will be untitled");
        } else {
            log::debug!("Indexed {} distinct ISBN titles", titles.len());
        }

        let per_book = ratings_per_book(&tallies, &titles);
        let averages = average_rating_per_book(&tallies, &titles, options.min_ratings);

        let unmatched = per_book.iter().filter(|b| b.title.is_none()).count();
        if unmatched > 0 {
            log::debug!(
                "{} of {} rated ISBNs have no matching book",
                unmatched,
                per_book.len()
            );
        }

        Self {
            age_histogram: age_histogram(&data.users),
            rating_distribution: rating_distribution(&data.ratings, options.rating_bins),
            top_rated_books: top_by_count(&per_book, options.top_n),
            top_avg_rated_books: top_by_average(&averages, options.top_n),
            rated_books: per_book.len(),
            eligible_books: averages.len(),
        }
    }
}
