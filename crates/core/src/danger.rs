//! Difficulty scalar derived from dungeon position and fight length.

use crate::config::{DangerConfig, TargetingTuning};

pub fn danger(config: &DangerConfig, floor: u32, depth: u32, round: u32) -> f64 {
    let raw = f64::from(floor) * config.floor_weight
        + f64::from(depth) * config.depth_weight
        + f64::from(round) * config.round_weight;
    if floor <= config.tutorial.max_floor {
        raw * (1.0 - config.tutorial.reduction)
    } else {
        raw
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DangerTier {
    Low,
    Medium,
    High,
}

impl DangerTier {
    pub fn classify(danger: f64, tuning: &TargetingTuning) -> Self {
        if danger <= tuning.low_danger_max {
            DangerTier::Low
        } else if danger <= tuning.medium_danger_max {
            DangerTier::Medium
        } else {
            DangerTier::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TutorialEasing;

    fn weights() -> DangerConfig {
        DangerConfig {
            floor_weight: 1.0,
            depth_weight: 0.05,
            round_weight: 0.05,
            tutorial: TutorialEasing { max_floor: 1, reduction: 0.5 },
        }
    }

    #[test]
    fn tutorial_floor_is_halved() {
        assert_eq!(danger(&weights(), 1, 0, 0), 0.5);
    }

    #[test]
    fn floor_only_danger_is_floor_times_weight_above_tutorial() {
        let config = weights();
        for floor in 2..40 {
            assert_eq!(danger(&config, floor, 0, 0), f64::from(floor) * config.floor_weight);
        }
    }

    #[test]
    fn depth_and_rounds_add_linearly() {
        let danger = danger(&weights(), 10, 20, 4);
        assert!((danger - (10.0 + 1.0 + 0.2)).abs() < 1e-9, "got {danger}");
    }

    #[test]
    fn tiers_split_at_configured_bounds() {
        let tuning = TargetingTuning::default();
        assert_eq!(DangerTier::classify(20.0, &tuning), DangerTier::Low);
        assert_eq!(DangerTier::classify(20.5, &tuning), DangerTier::Medium);
        assert_eq!(DangerTier::classify(60.0, &tuning), DangerTier::Medium);
        assert_eq!(DangerTier::classify(61.0, &tuning), DangerTier::High);
    }
}
