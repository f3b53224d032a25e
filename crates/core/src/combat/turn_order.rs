//! Per-round initiative: who acts, and in which order.
//! This module exists to freeze the acting order at round start.
//! It does not own turn execution or skipping of combatants who fall mid-round.

use super::*;

impl Encounter {
    /// Builds the turn order for the current round and resets the cursor.
    pub(super) fn begin_round(&mut self) {
        self.refresh_boss_stats();
        self.turn_order = self.compute_turn_order();
        self.cursor = 0;
        let order: Vec<CombatantId> = self.turn_order.iter().map(|c| c.id).collect();
        tracing::debug!(round = self.round, order = ?order, "round begins");
        self.log.push(CombatEvent::RoundStarted { round: self.round, order });
    }

    /// Living heroes plus the boss, fastest first. Ties break on a seeded roll.
    pub(super) fn compute_turn_order(&mut self) -> Vec<Combatant> {
        let mut rolled: Vec<(Combatant, u64)> = Vec::new();
        for slot in self.party.living_slots() {
            let speed = self.hero_stats(slot).map_or(0, |stats| stats.speed);
            let combatant = Combatant {
                id: CombatantId::Hero(slot),
                kind: CombatantKind::Hero,
                speed,
                alive: true,
            };
            rolled.push((combatant, self.dice.next_u64()));
        }
        let boss = Combatant {
            id: CombatantId::Boss,
            kind: CombatantKind::Boss,
            speed: self.boss.stats.speed,
            alive: self.boss.is_alive(),
        };
        rolled.push((boss, self.dice.next_u64()));

        rolled.sort_by(|(a, a_roll), (b, b_roll)| {
            b.speed.cmp(&a.speed).then_with(|| a_roll.cmp(b_roll))
        });
        rolled.into_iter().map(|(combatant, _)| combatant).filter(|c| c.alive).collect()
    }
}
