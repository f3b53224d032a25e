//! Round-end bookkeeping: status ticks, effect decay, cooldown decay.
//! This module exists to age every timed element of the fight exactly once per round.
//! It does not own terminal checks; `advance` runs those after the round closes.

use super::*;

impl Encounter {
    pub(super) fn end_round(&mut self) {
        self.round += 1;
        self.run_status_ticks();
        self.decay_effects();
        self.cooldowns.decrement_all();
        self.begin_round();
    }

    /// True damage and healing from statuses, bypassing defense.
    fn run_status_ticks(&mut self) {
        let mut ticks: Vec<(CombatantId, String, i32)> = Vec::new();
        if self.boss.is_alive() {
            for effect in &self.boss.effects {
                if let Some(amount) = effect.tick_amount() {
                    ticks.push((CombatantId::Boss, effect.id.clone(), amount));
                }
            }
        }
        for (slot, hero) in self.party.iter() {
            if !hero.alive {
                continue;
            }
            for effect in &hero.effects {
                if let Some(amount) = effect.tick_amount() {
                    ticks.push((CombatantId::Hero(slot), effect.id.clone(), amount));
                }
            }
        }

        for (target, effect, amount) in ticks {
            let applied = if amount < 0 {
                -self.apply_damage(target, -amount)
            } else {
                self.apply_heal(target, amount)
            };
            self.log.push(CombatEvent::StatusTick { target, effect, amount: applied });
        }
    }

    fn decay_effects(&mut self) {
        let mut expired: Vec<(CombatantId, String)> = Vec::new();
        for id in effects::decay(&mut self.boss.effects) {
            expired.push((CombatantId::Boss, id));
        }
        for (slot, hero) in self.party.iter_mut() {
            for id in effects::decay(&mut hero.effects) {
                expired.push((CombatantId::Hero(slot), id));
            }
        }
        for (target, effect) in expired {
            self.log.push(CombatEvent::EffectExpired { target, effect });
        }
    }
}
