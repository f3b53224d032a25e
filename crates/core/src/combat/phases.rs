//! Boss phase transitions.
//! This module exists to move the boss through its HP-gated phases exactly once each.
//! It does not own ability trigger evaluation after the phase has been entered.

use super::*;

impl Encounter {
    /// Enters every phase whose threshold has been crossed, lowest number first.
    /// Phases only move forward; healing above a threshold never reverts one.
    pub(super) fn check_phase_transition(&mut self) {
        let mut index = 0;
        while index < self.boss.phases.len() {
            let phase = &self.boss.phases[index];
            if phase.phase > self.boss.phase && self.boss.hp_ratio() <= phase.hp_threshold {
                let phase = phase.clone();
                self.enter_phase(&phase);
            }
            index += 1;
        }
    }

    fn enter_phase(&mut self, phase: &Phase) {
        let from = self.boss.phase;
        self.boss.phase = phase.phase;
        self.boss.fired_in_phase.clear();
        tracing::info!(boss = %self.boss.id, from, to = phase.phase, "boss phase change");
        self.log.push(CombatEvent::PhaseChanged { from, to: phase.phase });

        for ability in &phase.on_enter {
            self.execute_boss_ability(ability);
        }
        if let Some(change) = &phase.abilities {
            change.apply_to(&mut self.boss.abilities);
        }
        if let Some(change) = &phase.patterns {
            change.apply_to(&mut self.boss.patterns);
        }
        if let Some(deltas) = &phase.stat_deltas {
            self.boss.base = self.boss.base.plus(deltas);
        }
        if let Some(rate) = phase.passive_heal {
            self.boss.passive_heal = rate;
        }
        self.refresh_boss_stats();
    }

    /// Restores `round(max_hp * rate)` on the boss's own turn, clamped to max.
    pub(super) fn apply_passive_heal(&mut self) {
        if self.boss.passive_heal <= 0.0 {
            return;
        }
        let amount = (f64::from(self.boss.max_hp) * self.boss.passive_heal).round() as i32;
        let restored = self.apply_heal(CombatantId::Boss, amount);
        if restored > 0 {
            self.log.push(CombatEvent::PassiveHeal { amount: restored });
        }
    }
}
