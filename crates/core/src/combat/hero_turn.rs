//! Hero turn validation and execution.
//! This module exists to accept or refuse a hero's action list as a whole, then resolve it.
//! It does not own cost rules; see `actions::check_economy`.

use std::collections::BTreeMap;

use super::*;
use super::interpreter::HeroSide;
use crate::actions::{
    ActionOutcome, EffectOutcome, HeroAction, RejectionKind, TurnRejection, TurnReport,
    check_economy,
};
use crate::damage::{Strike, resolve_strike};

const DEFEND_EFFECT: &str = "defend";

impl Encounter {
    /// Resolves the pending hero's turn. A rejected list leaves the encounter untouched.
    pub fn submit_hero_turn(
        &mut self,
        slot: usize,
        actions: &[HeroAction],
    ) -> Result<TurnReport, TurnRejection> {
        let cost = self.validate_turn(slot, actions)?;
        let round = self.round;
        tracing::debug!(slot, round, ?actions, "hero turn");

        let outcomes = actions.iter().map(|action| self.resolve_action(slot, action)).collect();

        self.pending_hero = None;
        self.cursor += 1;
        self.next_input_seq += 1;
        let finished = self.check_terminal();
        Ok(TurnReport { slot, round, cost, outcomes, finished })
    }

    /// Runs every check a turn must pass; returns the turn's total cost.
    pub fn validate_turn(&self, slot: usize, actions: &[HeroAction]) -> Result<f64, TurnRejection> {
        if self.finished_outcome.is_some() {
            return Err(TurnRejection::new(RejectionKind::EncounterFinished, "the encounter is over"));
        }
        let Some(expected) = self.pending_hero else {
            return Err(TurnRejection::new(RejectionKind::NoPendingTurn, "no hero turn is pending"));
        };
        if expected != slot {
            return Err(TurnRejection::new(
                RejectionKind::WrongHero,
                format!("hero in slot {expected} is up, not slot {slot}"),
            ));
        }
        let Some(hero) = self.party.get(slot) else {
            return Err(TurnRejection::new(RejectionKind::WrongHero, "no hero in that slot"));
        };
        if !hero.alive {
            return Err(TurnRejection::new(
                RejectionKind::HeroFallen,
                format!("{} has fallen and cannot act", hero.name),
            ));
        }

        let cost = check_economy(
            actions,
            |item_slot| self.inventory.get(item_slot).is_some_and(|stack| stack.item.is_revive()),
            &self.config.economy,
        )?;

        let actor = CombatantId::Hero(slot);
        let mut uses: BTreeMap<usize, u32> = BTreeMap::new();
        let mut uses_by_item: BTreeMap<&str, u32> = BTreeMap::new();
        for (index, action) in actions.iter().enumerate() {
            match action {
                HeroAction::Ability { id } => {
                    if hero.ability(id).is_none() {
                        return Err(TurnRejection::new(
                            RejectionKind::UnknownAbility,
                            format!("{} does not know {id}", hero.name),
                        )
                        .at(index));
                    }
                    let remaining = self.cooldowns.remaining(actor, id);
                    if remaining > 0 {
                        return Err(TurnRejection::new(
                            RejectionKind::AbilityOnCooldown,
                            format!("{id} is on cooldown for {remaining} more rounds"),
                        )
                        .at(index));
                    }
                }
                HeroAction::Item { slot: item_slot } => {
                    let Some(stack) = self.inventory.get(*item_slot) else {
                        return Err(TurnRejection::new(
                            RejectionKind::EmptyItemSlot,
                            format!("inventory slot {item_slot} is empty"),
                        )
                        .at(index));
                    };
                    let used = uses.entry(*item_slot).or_insert(0);
                    *used += 1;
                    if *used > stack.quantity {
                        return Err(TurnRejection::new(
                            RejectionKind::EmptyItemSlot,
                            format!("not enough {} left in slot {item_slot}", stack.item.name),
                        )
                        .at(index));
                    }
                    if !stack.item.combat_usable {
                        return Err(TurnRejection::new(
                            RejectionKind::ItemNotCombatUsable,
                            format!("{} cannot be used in combat", stack.item.name),
                        )
                        .at(index));
                    }
                    let same_item = uses_by_item.entry(stack.item.id.as_str()).or_insert(0);
                    *same_item += 1;
                    let remaining = self.cooldowns.remaining(actor, &stack.item.id);
                    if remaining > 0 || (*same_item > 1 && stack.item.cooldown > 0) {
                        return Err(TurnRejection::new(
                            RejectionKind::ItemOnCooldown,
                            format!("{} is on cooldown", stack.item.name),
                        )
                        .at(index));
                    }
                }
                HeroAction::Attack | HeroAction::Defend | HeroAction::Flee => {}
            }
        }
        Ok(cost)
    }

    fn resolve_action(&mut self, slot: usize, action: &HeroAction) -> ActionOutcome {
        let actor = CombatantId::Hero(slot);
        match action {
            HeroAction::Attack => self.hero_attack(slot),
            HeroAction::Defend => {
                if let Some(effects) = self.effects_of_mut(actor) {
                    effects.retain(|existing| existing.id != DEFEND_EFFECT);
                }
                let defense = self.hero_stats(slot).map_or(0, |stats| stats.defense);
                let bonus = (f64::from(defense) * self.config.economy.defend_ratio).round() as i32;
                let effect = ActiveEffect::buff(
                    DEFEND_EFFECT,
                    Stat::Defense,
                    bonus,
                    self.config.effects.defend_duration,
                )
                .from_source(actor);
                self.push_effect(actor, effect);
                self.log.push(CombatEvent::Defended { hero: actor, bonus });
                ActionOutcome::Defended { bonus }
            }
            HeroAction::Ability { id } => {
                let Some(ability) = self.party.get(slot).and_then(|hero| hero.ability(id)).cloned()
                else {
                    return ActionOutcome::AbilityUsed {
                        ability: id.clone(),
                        effects: vec![EffectOutcome::no_op("unknown ability")],
                    };
                };
                self.log.push(CombatEvent::AbilityUsed { actor, ability: ability.id.clone() });
                let resolver = HeroSide { slot };
                let effects = ability
                    .effects
                    .iter()
                    .map(|effect| self.apply_effect(&resolver, &ability.id, effect))
                    .collect();
                self.cooldowns.start(actor, &ability.id, ability.cooldown);
                let round = self.round;
                if let Some(entry) = self
                    .party
                    .get_mut(slot)
                    .and_then(|hero| hero.abilities.iter_mut().find(|a| a.id == ability.id))
                {
                    entry.last_used = Some(round);
                }
                ActionOutcome::AbilityUsed { ability: ability.id, effects }
            }
            HeroAction::Item { slot: item_slot } => {
                let Some(item) = self.inventory.get(*item_slot).map(|stack| stack.item.clone())
                else {
                    return ActionOutcome::ItemUsed {
                        item: String::new(),
                        remaining: 0,
                        effects: vec![EffectOutcome::no_op("empty inventory slot")],
                    };
                };
                let remaining = self.inventory.consume_one(*item_slot).unwrap_or(0);
                self.log.push(CombatEvent::ItemUsed { hero: actor, item: item.id.clone(), remaining });
                let resolver = HeroSide { slot };
                let effects =
                    item.effects.iter().map(|effect| self.apply_effect(&resolver, &item.id, effect)).collect();
                if item.cooldown > 0 {
                    self.cooldowns.start(actor, &item.id, item.cooldown);
                }
                ActionOutcome::ItemUsed { item: item.id, remaining, effects }
            }
            HeroAction::Flee => {
                self.log.push(CombatEvent::Fled { hero: actor });
                ActionOutcome::Fled
            }
        }
    }

    /// Mirrors the boss strike: hero attack against the boss's dynamic defense.
    fn hero_attack(&mut self, slot: usize) -> ActionOutcome {
        let attacker = CombatantId::Hero(slot);
        if !self.boss.is_alive() {
            self.log.push(CombatEvent::NoEffect {
                actor: attacker,
                reason: "the boss is already down".to_string(),
            });
            return ActionOutcome::Attacked { damage: 0, crit: false, dodged: false };
        }
        let stats = self.hero_stats(slot).unwrap_or_default();
        let strike = Strike {
            attack: stats.attack,
            multiplier: 1.0,
            area: false,
            crit_override: None,
            attacker_luck: stats.luck,
            defender_luck: self.boss.stats.luck,
            defender_defense: self.boss.stats.defense,
        };
        let result = resolve_strike(&strike, &self.config.combat, &mut self.dice);
        self.log.push(CombatEvent::AttackResolved {
            attacker,
            target: CombatantId::Boss,
            damage: result.damage,
            crit: result.crit,
            dodged: result.dodged,
        });
        let dealt = if result.dodged { 0 } else { self.apply_damage(CombatantId::Boss, result.damage) };
        ActionOutcome::Attacked { damage: dealt, crit: result.crit, dodged: result.dodged }
    }
}
