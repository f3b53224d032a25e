//! Tunable engine parameters.
//! Every coefficient the simulation uses lives here so callers can supply their own
//! balance tables; `Default` carries the shipped values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::BossClass;
use crate::error::ConfigError;
use crate::types::{Stat, Stats};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub danger: DangerConfig,
    pub scaling: ScalingFactors,
    pub tiers: BaseStatTiers,
    pub combat: CombatTuning,
    pub targeting: TargetingTuning,
    pub economy: ActionEconomy,
    pub effects: EffectDefaults,
    pub lifecycle: LifecycleTuning,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerConfig {
    pub floor_weight: f64,
    pub depth_weight: f64,
    pub round_weight: f64,
    pub tutorial: TutorialEasing,
}

impl Default for DangerConfig {
    fn default() -> Self {
        Self { floor_weight: 1.0, depth_weight: 0.05, round_weight: 0.05, tutorial: TutorialEasing::default() }
    }
}

/// Danger is multiplied by `1 - reduction` on floors at or below `max_floor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialEasing {
    pub max_floor: u32,
    pub reduction: f64,
}

impl Default for TutorialEasing {
    fn default() -> Self {
        Self { max_floor: 1, reduction: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingFactors {
    pub hp: f64,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    pub luck: f64,
}

impl ScalingFactors {
    pub fn factor(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Speed => self.speed,
            Stat::Luck => self.luck,
        }
    }
}

impl Default for ScalingFactors {
    fn default() -> Self {
        Self { hp: 0.15, attack: 0.12, defense: 0.10, speed: 0.05, luck: 0.05 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStatTiers {
    pub floor: Stats,
    pub zone: Stats,
    pub final_boss: Stats,
}

impl BaseStatTiers {
    pub fn for_class(&self, class: BossClass) -> Stats {
        match class {
            BossClass::Floor => self.floor,
            BossClass::Zone => self.zone,
            BossClass::Final => self.final_boss,
        }
    }
}

impl Default for BaseStatTiers {
    fn default() -> Self {
        Self {
            floor: Stats { hp: 300, attack: 30, defense: 15, speed: 10, luck: 10 },
            zone: Stats { hp: 600, attack: 45, defense: 25, speed: 12, luck: 20 },
            final_boss: Stats { hp: 1200, attack: 70, defense: 40, speed: 14, luck: 40 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub default_crit_chance: f64,
    pub max_chance: f64,
    pub luck_divisor: f64,
    pub crit_multiplier: f64,
    pub area_damage_factor: f64,
    /// `K` in `raw * K / (K + defense)`.
    pub defense_constant: f64,
    pub min_damage: i32,
    pub default_multi_targets: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            default_crit_chance: 0.05,
            max_chance: 0.95,
            luck_divisor: 1000.0,
            crit_multiplier: 2.0,
            area_damage_factor: 0.6,
            defense_constant: 100.0,
            min_damage: 1,
            default_multi_targets: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingTuning {
    pub low_danger_max: f64,
    pub medium_danger_max: f64,
    pub support_focus_chance: f64,
}

impl Default for TargetingTuning {
    fn default() -> Self {
        Self { low_danger_max: 20.0, medium_danger_max: 60.0, support_focus_chance: 0.3 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionEconomy {
    pub main_action_cost: f64,
    pub item_cost: f64,
    pub revive_item_cost: f64,
    pub turn_budget: f64,
    pub defend_ratio: f64,
}

impl Default for ActionEconomy {
    fn default() -> Self {
        Self {
            main_action_cost: 1.0,
            item_cost: 0.33,
            revive_item_cost: 1.0,
            turn_budget: 2.0,
            defend_ratio: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDefaults {
    pub buff_duration: u32,
    pub debuff_duration: u32,
    pub defend_duration: u32,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self { buff_duration: 3, debuff_duration: 2, defend_duration: 1 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleTuning {
    pub terminal_delay_ms: u64,
}

impl Default for LifecycleTuning {
    fn default() -> Self {
        Self { terminal_delay_ms: 1500 }
    }
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let danger = &self.danger;
        for (name, weight) in [
            ("danger.floor_weight", danger.floor_weight),
            ("danger.depth_weight", danger.depth_weight),
            ("danger.round_weight", danger.round_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(format!("{name} must be a non-negative number")));
            }
        }
        if !(0.0..=1.0).contains(&danger.tutorial.reduction) {
            return Err(invalid("danger.tutorial.reduction must be within [0, 1]".to_string()));
        }
        if self.combat.luck_divisor <= 0.0 {
            return Err(invalid("combat.luck_divisor must be positive".to_string()));
        }
        if self.combat.defense_constant <= 0.0 {
            return Err(invalid("combat.defense_constant must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.combat.max_chance) {
            return Err(invalid("combat.max_chance must be within [0, 1]".to_string()));
        }
        if self.economy.turn_budget <= 0.0 {
            return Err(invalid("economy.turn_budget must be positive".to_string()));
        }
        if self.targeting.low_danger_max > self.targeting.medium_danger_max {
            return Err(invalid(
                "targeting.low_danger_max must not exceed medium_danger_max".to_string(),
            ));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid { reason }
}
