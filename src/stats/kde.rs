//! Gaussian kernel density estimate for the rating histogram overlay
//!
//! # Bandwidth
//!
//! Scott's rule for one dimension: `h = s * n^(-1/5)`, where `s` is the
//! sample standard deviation (n - 1 denominator).
//!
//! # Evaluation
//!
//! The curve is evaluated on [`GRID_SIZE`] evenly spaced points between the
//! smallest and largest observation, without extending past the data. To put
//! it on the same axis as a count histogram, densities are multiplied by
//! `n * bin_width`.
//!
//! Ratings are a handful of distinct integers repeated many times, so the
//! estimate runs over distinct values weighted by multiplicity instead of
//! over every observation.

use super::histogram::value_range;

pub const GRID_SIZE: usize = 200;

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Scott's-rule bandwidth, or `None` with fewer than two values or zero spread
pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std = var.sqrt();
    if std.is_nan() || std <= 0.0 {
        return None;
    }
    Some(std * (n as f64).powf(-0.2))
}

/// Distinct values with their multiplicity, ascending
fn weighted_support(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut support: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match support.last_mut() {
            Some((last, count)) if *last == v => *count += 1,
            _ => support.push((v, 1)),
        }
    }
    support
}

/// Probability density at each grid point, as `(x, density)` pairs
pub fn gaussian_kde(values: &[f64], grid_size: usize) -> Option<Vec<(f64, f64)>> {
    let bandwidth = scott_bandwidth(values)?;
    let (lo, hi) = value_range(values)?;
    if grid_size == 0 {
        return Some(Vec::new());
    }

    let n = values.len() as f64;
    let support = weighted_support(values);
    let step = if grid_size > 1 {
        (hi - lo) / (grid_size - 1) as f64
    } else {
        0.0
    };

    let curve = (0..grid_size)
        .map(|i| {
            let x = lo + step * i as f64;
            let sum: f64 = support
                .iter()
                .map(|&(v, w)| {
                    let z = (x - v) / bandwidth;
                    w as f64 * INV_SQRT_2PI * (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum / (n * bandwidth))
        })
        .collect();

    Some(curve)
}

/// KDE rescaled onto a count histogram with bins of `bin_width`
pub fn count_scaled_density(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    let scale = values.len() as f64 * bin_width;
    gaussian_kde(values, GRID_SIZE)
        .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect())
        .unwrap_or_default()
}
