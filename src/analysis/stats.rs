//! Descriptive statistics for numeric columns.

use crate::analysis::aggregator::{top_n, value_counts};
use crate::models::{ColumnStats, Dataset, Field, Histogram, HistogramBin, ScatterSeries};

/// Numeric columns of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinate {
    Latitude,
    Longitude,
}

/// Collects the non-null values of a coordinate column.
pub fn coordinate_values(dataset: &Dataset, column: Coordinate) -> Vec<f64> {
    dataset
        .iter()
        .filter_map(|r| match column {
            Coordinate::Latitude => r.latitude,
            Coordinate::Longitude => r.longitude,
        })
        .collect()
}

/// Count, mean, sample standard deviation, min, quartiles and max.
pub fn describe(values: &[f64]) -> ColumnStats {
    let count = values.len();
    if count == 0 {
        return ColumnStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance =
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    ColumnStats {
        count,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        p25: Some(percentile(&sorted, 0.25)),
        median: Some(percentile(&sorted, 0.5)),
        p75: Some(percentile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated percentile of an ascending, non-empty slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Equal-width histogram over the range of `values`; the last bin is closed.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram {
        bins: counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count,
            })
            .collect(),
    }
}

/// Histogram of how many locations each brand has.
pub fn brand_frequency(dataset: &Dataset, bins: usize) -> Histogram {
    let counts: Vec<f64> = value_counts(dataset, Field::Name)
        .entries
        .iter()
        .map(|e| e.count as f64)
        .collect();
    histogram(&counts, bins)
}

/// Located points of the `brands` most frequent brands.
///
/// Returns `None` when the dataset has more than `limit` rows.
pub fn scatter_series(dataset: &Dataset, brands: usize, limit: usize) -> Option<Vec<ScatterSeries>> {
    if dataset.len() > limit {
        return None;
    }

    let series = top_n(dataset, Field::Name, brands)
        .entries
        .into_iter()
        .map(|entry| {
            let points = dataset
                .iter()
                .filter(|r| r.name.as_deref() == Some(entry.category.as_str()))
                .filter_map(|r| r.location())
                .collect();
            ScatterSeries {
                brand: entry.category,
                points,
            }
        })
        .collect();

    Some(series)
}
