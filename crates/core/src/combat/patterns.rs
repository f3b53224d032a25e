//! Attack pattern choice and execution for the boss's basic attack.
//! This module exists to filter patterns by their conditions and draw one by weight.
//! It does not own target policy; see `targeting`.

use super::*;
use crate::content::{AttackShape, PatternCondition};
use crate::damage::{Strike, resolve_strike};

impl Encounter {
    pub(super) fn condition_holds(&self, condition: &PatternCondition) -> bool {
        match *condition {
            PatternCondition::BossHpBelow { ratio } => self.boss.hp_ratio() < ratio,
            PatternCondition::BossHpAbove { ratio } => self.boss.hp_ratio() > ratio,
            PatternCondition::MinLivingHeroes { count } => {
                self.party.living_slots().len() >= count
            }
            PatternCondition::MinRound { round } => self.round >= round,
            PatternCondition::Phase { phase } => self.boss.phase == phase,
        }
    }

    /// Picks the pattern for this boss turn. The flag is set when nothing was eligible
    /// and the first configured pattern was used instead.
    pub(super) fn select_pattern(
        &mut self,
    ) -> Result<(AttackPattern, bool), EngineFailureReason> {
        let Some(first) = self.boss.patterns.first().cloned() else {
            return Err(EngineFailureReason::NoAttackPatterns);
        };
        let eligible: Vec<AttackPattern> = self
            .boss
            .patterns
            .iter()
            .filter(|pattern| pattern.condition.as_ref().is_none_or(|c| self.condition_holds(c)))
            .cloned()
            .collect();

        if eligible.is_empty() {
            tracing::warn!(boss = %self.boss.id, pattern = %first.id, "no eligible pattern, using first");
            return Ok((first, true));
        }

        let total: u64 = eligible.iter().map(|pattern| u64::from(pattern.weight)).sum();
        if total == 0 {
            return Ok((eligible[0].clone(), false));
        }
        let mut roll = self.dice.next_u64() % total;
        for pattern in &eligible {
            let weight = u64::from(pattern.weight);
            if roll < weight {
                return Ok((pattern.clone(), false));
            }
            roll -= weight;
        }
        Ok((eligible[0].clone(), false))
    }

    pub(super) fn execute_attack_pattern(&mut self) -> Result<(), EngineFailureReason> {
        let (pattern, fallback) = self.select_pattern()?;
        tracing::debug!(pattern = %pattern.id, fallback, "boss attacks");
        self.log.push(CombatEvent::PatternChosen { pattern: pattern.id.clone(), fallback });

        for slot in self.pattern_targets(&pattern) {
            if !self.party.is_alive(slot) {
                continue;
            }
            let Some(defender) = self.hero_stats(slot) else {
                continue;
            };
            let strike = Strike {
                attack: self.boss.stats.attack,
                multiplier: pattern.multiplier,
                area: pattern.shape == AttackShape::Area,
                crit_override: pattern.crit_chance,
                attacker_luck: self.boss.stats.luck,
                defender_luck: defender.luck,
                defender_defense: defender.defense,
            };
            let result = resolve_strike(&strike, &self.config.combat, &mut self.dice);
            let target = CombatantId::Hero(slot);
            self.log.push(CombatEvent::AttackResolved {
                attacker: CombatantId::Boss,
                target,
                damage: result.damage,
                crit: result.crit,
                dodged: result.dodged,
            });
            if !result.dodged {
                self.apply_damage(target, result.damage);
            }
        }
        Ok(())
    }
}
