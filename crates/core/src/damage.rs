//! Strike math shared by boss attack patterns and hero attacks.
//! Crit and dodge chances derive from the luck gap between attacker and defender.

use crate::config::CombatTuning;
use crate::rng::Dice;

pub fn reduce_by_defense(raw: f64, defense: i32, defense_constant: f64) -> i32 {
    let defense = f64::from(defense.max(0));
    (raw.max(0.0) * defense_constant / (defense_constant + defense)).round() as i32
}

pub fn crit_chance(
    base_chance: Option<f64>,
    attacker_luck: i32,
    defender_luck: i32,
    tuning: &CombatTuning,
) -> f64 {
    let edge = f64::from((attacker_luck - defender_luck).max(0)) / tuning.luck_divisor;
    (base_chance.unwrap_or(tuning.default_crit_chance) + edge).clamp(0.0, tuning.max_chance)
}

pub fn dodge_chance(attacker_luck: i32, defender_luck: i32, tuning: &CombatTuning) -> f64 {
    let edge = f64::from((defender_luck - attacker_luck).max(0)) / tuning.luck_divisor;
    edge.clamp(0.0, tuning.max_chance)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub attack: i32,
    pub multiplier: f64,
    pub area: bool,
    pub crit_override: Option<f64>,
    pub attacker_luck: i32,
    pub defender_luck: i32,
    pub defender_defense: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrikeResult {
    pub damage: i32,
    pub crit: bool,
    pub dodged: bool,
}

pub fn resolve_strike(strike: &Strike, tuning: &CombatTuning, dice: &mut Dice) -> StrikeResult {
    let mut raw = f64::from(strike.attack.max(0)) * strike.multiplier;
    if strike.area {
        raw *= tuning.area_damage_factor;
    }

    let crit = dice.chance(crit_chance(
        strike.crit_override,
        strike.attacker_luck,
        strike.defender_luck,
        tuning,
    ));
    if crit {
        raw *= tuning.crit_multiplier;
    }

    if dice.chance(dodge_chance(strike.attacker_luck, strike.defender_luck, tuning)) {
        return StrikeResult { damage: 0, crit, dodged: true };
    }

    let damage = reduce_by_defense(raw, strike.defender_defense, tuning.defense_constant)
        .max(tuning.min_damage);
    StrikeResult { damage, crit, dodged: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crit_chance_adds_luck_edge_and_caps() {
        let tuning = CombatTuning::default();
        assert!((crit_chance(None, 50, 0, &tuning) - 0.10).abs() < 1e-9);
        assert!((crit_chance(None, 0, 50, &tuning) - 0.05).abs() < 1e-9);
        assert_eq!(crit_chance(Some(0.9), 5000, 0, &tuning), 0.95);
    }

    #[test]
    fn dodge_chance_only_favours_the_luckier_defender() {
        let tuning = CombatTuning::default();
        assert_eq!(dodge_chance(100, 20, &tuning), 0.0);
        assert!((dodge_chance(20, 120, &tuning) - 0.1).abs() < 1e-9);
        assert_eq!(dodge_chance(0, 100_000, &tuning), 0.95);
    }

    #[test]
    fn defense_reduction_uses_diminishing_curve() {
        assert_eq!(reduce_by_defense(100.0, 0, 100.0), 100);
        assert_eq!(reduce_by_defense(100.0, 100, 100.0), 50);
        assert_eq!(reduce_by_defense(100.0, -20, 100.0), 100);
    }

    #[test]
    fn strike_never_deals_less_than_minimum_unless_dodged() {
        let tuning = CombatTuning { default_crit_chance: 0.0, ..CombatTuning::default() };
        let mut dice = Dice::seeded(7);
        let strike = Strike {
            attack: 1,
            multiplier: 0.1,
            area: true,
            crit_override: None,
            attacker_luck: 10,
            defender_luck: 10,
            defender_defense: 500,
        };
        for _ in 0..50 {
            let result = resolve_strike(&strike, &tuning, &mut dice);
            assert!(!result.dodged);
            assert_eq!(result.damage, 1);
        }
    }
}
