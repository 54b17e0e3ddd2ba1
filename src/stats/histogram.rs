//! Equal-width histograms
//!
//! Two flavours are needed:
//!
//! - [`Histogram::fixed`] takes explicit `[lo, hi)` edges and drops anything
//!   outside them. Used for ages, where the display range is fixed at 0-100.
//! - [`Histogram::spanning`] derives the edges from the data's own min/max
//!   and keeps every value, closing the last bin so the maximum lands in it.
//!   Used for rating values.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// `bins` equal-width half-open bins over `[lo, hi)`.
    /// Values outside the range are ignored.
    pub fn fixed<I>(values: I, lo: f64, hi: f64, bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut hist = Self::empty(lo, hi, bins);
        if bins == 0 || hi <= lo {
            return hist;
        }
        let width = (hi - lo) / bins as f64;

        for v in values {
            if !(lo..hi).contains(&v) {
                continue;
            }
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            hist.bins[idx].count += 1;
        }
        hist
    }

    /// `bins` equal-width bins spanning the observed range of `values`.
    ///
    /// The last bin is closed so the maximum is counted. A degenerate range
    /// (all values equal) is widened by 0.5 either side; no values at all
    /// gives the unit range.
    pub fn spanning(values: &[f64], bins: usize) -> Self {
        let (lo, hi) = match value_range(values) {
            None => (0.0, 1.0),
            Some((min, max)) if min == max => (min - 0.5, max + 0.5),
            Some(range) => range,
        };

        let mut hist = Self::empty(lo, hi, bins);
        if bins == 0 {
            return hist;
        }
        let width = (hi - lo) / bins as f64;

        for &v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            hist.bins[idx].count += 1;
        }
        hist
    }

    fn empty(lo: f64, hi: f64, bins: usize) -> Self {
        let width = if bins == 0 { 0.0 } else { (hi - lo) / bins as f64 };
        let bins = (0..bins)
            .map(|i| Bin {
                start: lo + width * i as f64,
                end: lo + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.count).collect()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Width of the first bin; all bins share it
    pub fn bin_width(&self) -> f64 {
        self.bins.first().map(Bin::width).unwrap_or(0.0)
    }

    /// `(start of first bin, end of last bin)`
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.bins.first()?.start, self.bins.last()?.end))
    }
}

/// Min and max of the finite values, if any
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // FIXED EDGES
    // ==========================================================================

    #[test]
    fn test_fixed_one_value_per_decade() {
        let hist = Histogram::fixed([5.0, 15.0, 25.0, 35.0], 0.0, 100.0, 10);
        assert_eq!(hist.counts(), vec![1, 1, 1, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_fixed_edges_are_half_open() {
        // 10 opens the second bin, 100 is past the end
        let hist = Histogram::fixed([0.0, 9.99, 10.0, 99.9, 100.0], 0.0, 100.0, 10);
        assert_eq!(hist.bins[0].count, 2);
        assert_eq!(hist.bins[1].count, 1);
        assert_eq!(hist.bins[9].count, 1);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn test_fixed_drops_out_of_range() {
        let hist = Histogram::fixed([-1.0, 150.0, 244.0, 50.0], 0.0, 100.0, 10);
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.bins[5].count, 1);
    }

    #[test]
    fn test_fixed_bin_edges() {
        let hist = Histogram::fixed(std::iter::empty(), 0.0, 100.0, 10);
        assert_eq!(hist.bins.len(), 10);
        assert_eq!(hist.bins[3].start, 30.0);
        assert_eq!(hist.bins[3].end, 40.0);
        assert_eq!(hist.range(), Some((0.0, 100.0)));
    }

    // ==========================================================================
    // DATA-DERIVED EDGES
    // ==========================================================================

    #[test]
    fn test_spanning_closes_last_bin() {
        let values: Vec<f64> = (0..=10).map(f64::from).collect();
        let hist = Histogram::spanning(&values, 10);

        assert_eq!(hist.range(), Some((0.0, 10.0)));
        assert_eq!(hist.total(), 11);
        // 9 and 10 share the closed last bin
        assert_eq!(hist.bins[9].count, 2);
    }

    #[test]
    fn test_spanning_constant_values_widens_range() {
        let hist = Histogram::spanning(&[5.0, 5.0, 5.0], 10);
        assert_eq!(hist.range(), Some((4.5, 5.5)));
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.max_count(), 3);
    }

    #[test]
    fn test_spanning_empty_input_uses_unit_range() {
        let hist = Histogram::spanning(&[], 10);
        assert_eq!(hist.range(), Some((0.0, 1.0)));
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.max_count(), 0);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(value_range(&[]), None);
    }
}
