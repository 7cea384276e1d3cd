//! Percentile bucketing shared by every factor score.
//!
//! A breakpoint array of 9 ascending thresholds splits the value axis into
//! 10 buckets. The bucket index is the number of thresholds that are less
//! than or equal to the value, and the score is `10 - index`, so the
//! smallest values earn the highest score.

use crate::domain::model::{Breakpoints, BREAKPOINT_COUNT};
use crate::spatial::raster::ElevationRaster;

pub const MAX_SCORE: u8 = 10;

/// 參數化的分桶函式，三種因子共用
pub fn bucket_score(value: f64, breakpoints: &Breakpoints) -> u8 {
    let index = breakpoints
        .values()
        .iter()
        .take_while(|threshold| **threshold <= value)
        .count();
    MAX_SCORE - index as u8
}

pub fn proximity_to_score(proximity: f64, breakpoints: &Breakpoints) -> u8 {
    bucket_score(proximity, breakpoints)
}

pub fn forest_percentage_to_score(percentage: f64, breakpoints: &Breakpoints) -> u8 {
    bucket_score(percentage, breakpoints)
}

/// Lower elevation earns a higher score, bucketed by the raster's own deciles.
pub fn elevation_to_decile(elevation: f64, raster: &ElevationRaster) -> u8 {
    bucket_score(elevation, raster.deciles())
}

/// Linear-interpolated percentile over values that are already sorted
/// ascending. `q` is in `0..=100`. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// 10th..90th percentiles of the finite values, ready to use as breakpoints.
pub fn deciles(values: &[f64]) -> Option<[f64; BREAKPOINT_COUNT]> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut cuts = [0.0; BREAKPOINT_COUNT];
    for (i, cut) in cuts.iter_mut().enumerate() {
        *cut = percentile(&sorted, (i + 1) as f64 * 10.0)?;
    }
    Some(cuts)
}
