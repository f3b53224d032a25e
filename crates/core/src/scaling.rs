//! Danger-driven stat scaling for bosses.

use crate::config::ScalingFactors;
use crate::types::{Stat, Stats};

/// `round(base * (1 + (danger - 1) * factor))`, never negative.
pub fn scale_stat(base: i32, danger: f64, factor: f64) -> i32 {
    let scaled = (f64::from(base) * (1.0 + (danger - 1.0) * factor)).round();
    (scaled as i32).max(0)
}

pub fn scale_stats(base: &Stats, danger: f64, factors: &ScalingFactors) -> Stats {
    let mut scaled = Stats::default();
    for stat in Stat::ALL {
        *scaled.get_mut(stat) = scale_stat(base.get(stat), danger, factors.factor(stat));
    }
    scaled
}
