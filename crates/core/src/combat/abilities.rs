//! Boss ability triggers.
//! This module exists to decide which boss abilities fire at the start of a boss turn.
//! It does not own effect resolution; see `interpreter`.

use super::*;
use crate::content::AbilityTrigger;
use super::interpreter::BossSide;

impl Encounter {
    pub(super) fn should_trigger(&self, ability: &BossAbility) -> bool {
        match ability.trigger {
            AbilityTrigger::Always | AbilityTrigger::OnTurnStart => true,
            AbilityTrigger::OnHpThreshold { threshold } => {
                ability.last_used.is_none() && self.boss.hp_ratio() <= threshold
            }
            AbilityTrigger::OnPhaseChange { phase } => {
                self.boss.phase == phase && !self.boss.fired_in_phase.contains(&ability.id)
            }
            AbilityTrigger::OnPlayerAction => false,
        }
    }

    /// Fires every ready ability whose trigger holds, in kit order.
    pub(super) fn trigger_boss_abilities(&mut self) {
        let mut index = 0;
        while index < self.boss.abilities.len() {
            if !self.boss.is_alive() || !self.party.any_alive() {
                return;
            }
            let ability = &self.boss.abilities[index];
            if self.cooldowns.is_ready(CombatantId::Boss, &ability.id) && self.should_trigger(ability)
            {
                let ability = ability.clone();
                self.execute_boss_ability(&ability);
                if let Some(entry) = self.boss.abilities.get_mut(index) {
                    entry.last_used = Some(self.round);
                }
            }
            index += 1;
        }
    }

    pub(super) fn execute_boss_ability(&mut self, ability: &BossAbility) {
        tracing::debug!(ability = %ability.id, round = self.round, "boss ability");
        self.log.push(CombatEvent::AbilityUsed {
            actor: CombatantId::Boss,
            ability: ability.id.clone(),
        });
        for effect in &ability.effects {
            self.apply_effect(&BossSide, &ability.id, effect);
        }
        self.cooldowns.start(CombatantId::Boss, &ability.id, ability.cooldown);
        self.boss.fired_in_phase.insert(ability.id.clone());
    }
}
