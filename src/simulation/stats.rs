//! Summary statistics over trial outcomes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("need at least {needed} values, got {got}")]
    NotEnoughData { needed: usize, got: usize },
    #[error("data contains NaN")]
    NotANumber,
}

fn sorted_copy(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(StatsError::NotANumber);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(sorted)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median; even-length data averages the two middle values
pub fn median(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::NotEnoughData { needed: 1, got: 0 });
    }
    let sorted = sorted_copy(values)?;
    Ok(median_of_sorted(&sorted))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// `[lower quartile, median, upper quartile]`.
///
/// The sorted data is split at `n / 2 + 1`: the lower half is
/// `sorted[..n / 2 + 1]` and the upper half the rest, so the middle element
/// of odd-length data lands in the lower half only, and even-length data
/// gets one extra element in its lower half. Each quartile is the median
/// of its half. This matches the published land-drop tables and is not the
/// textbook exclusive-median method.
pub fn quartiles(values: &[f64]) -> Result<[f64; 3], StatsError> {
    // Upper half is empty below three values
    if values.len() < 3 {
        return Err(StatsError::NotEnoughData {
            needed: 3,
            got: values.len(),
        });
    }
    let sorted = sorted_copy(values)?;
    let split = sorted.len() / 2 + 1;
    let (lower, upper) = sorted.split_at(split);
    Ok([
        median_of_sorted(lower),
        median_of_sorted(&sorted),
        median_of_sorted(upper),
    ])
}
