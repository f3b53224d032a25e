//! The one effect interpreter shared by boss abilities, hero abilities and consumables.
//! This module exists so every effect kind resolves the same way whoever casts it.
//! It does not own cooldowns, economy checks or trigger evaluation.

use super::*;
use crate::actions::EffectOutcome;
use crate::content::{EffectSpec, TargetSpec, keys};
use crate::damage::reduce_by_defense;
use crate::effects::StatusTick;

/// Maps target specs onto concrete combatants for one side of the fight.
pub(super) trait TargetResolver {
    fn actor(&self) -> CombatantId;
    /// Targets on the caster's side: heals, buffs, cleanses, heal-over-time.
    fn friendly(&self, encounter: &mut Encounter, spec: TargetSpec) -> Vec<CombatantId>;
    /// Targets on the opposing side: damage, debuffs, damage-over-time.
    fn hostile(&self, encounter: &mut Encounter, spec: TargetSpec) -> Vec<CombatantId>;
}

pub(super) struct BossSide;

impl TargetResolver for BossSide {
    fn actor(&self) -> CombatantId {
        CombatantId::Boss
    }

    fn friendly(&self, encounter: &mut Encounter, _spec: TargetSpec) -> Vec<CombatantId> {
        if encounter.boss.is_alive() { vec![CombatantId::Boss] } else { Vec::new() }
    }

    fn hostile(&self, encounter: &mut Encounter, spec: TargetSpec) -> Vec<CombatantId> {
        let living = encounter.party.living_slots();
        match spec {
            TargetSpec::AllAllies | TargetSpec::AllEnemies => {
                living.into_iter().map(CombatantId::Hero).collect()
            }
            TargetSpec::SelfOnly | TargetSpec::Ally | TargetSpec::SingleEnemy => {
                encounter.dice.pick(&living).map(CombatantId::Hero).into_iter().collect()
            }
        }
    }
}

pub(super) struct HeroSide {
    pub(super) slot: usize,
}

impl TargetResolver for HeroSide {
    fn actor(&self) -> CombatantId {
        CombatantId::Hero(self.slot)
    }

    fn friendly(&self, encounter: &mut Encounter, spec: TargetSpec) -> Vec<CombatantId> {
        let living = encounter.party.living_slots();
        let chosen: Vec<usize> = match spec {
            TargetSpec::AllAllies => living,
            TargetSpec::Ally => living
                .iter()
                .copied()
                .min_by(|a, b| {
                    let ratio = |slot: usize| encounter.party.get(slot).map_or(1.0, |h| h.hp_ratio());
                    ratio(*a).total_cmp(&ratio(*b)).then(a.cmp(b))
                })
                .into_iter()
                .collect(),
            TargetSpec::SelfOnly | TargetSpec::SingleEnemy | TargetSpec::AllEnemies => {
                living.into_iter().filter(|slot| *slot == self.slot).collect()
            }
        };
        chosen.into_iter().map(CombatantId::Hero).collect()
    }

    fn hostile(&self, encounter: &mut Encounter, _spec: TargetSpec) -> Vec<CombatantId> {
        if encounter.boss.is_alive() { vec![CombatantId::Boss] } else { Vec::new() }
    }
}

impl Encounter {
    /// Applies one effect and logs a `NoEffect` event when nothing happened.
    pub(super) fn apply_effect(
        &mut self,
        resolver: &dyn TargetResolver,
        source: &str,
        effect: &EffectSpec,
    ) -> EffectOutcome {
        let outcome = self.resolve_effect(resolver, source, effect);
        if let EffectOutcome::NoOp { reason } = &outcome {
            self.log.push(CombatEvent::NoEffect { actor: resolver.actor(), reason: reason.clone() });
        }
        outcome
    }

    fn resolve_effect(
        &mut self,
        resolver: &dyn TargetResolver,
        source: &str,
        effect: &EffectSpec,
    ) -> EffectOutcome {
        let actor = resolver.actor();
        match effect {
            EffectSpec::Damage { amount, target, scaling } => {
                let targets = resolver.hostile(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets");
                }
                let bonus = scaling.map_or(0, |scaling| {
                    (f64::from(self.stats_of(actor).get(scaling.stat)) * scaling.ratio).round()
                        as i32
                });
                let raw = amount.saturating_add(bonus).max(0);
                for target in targets {
                    let defense = self.stats_of(target).defense;
                    let mut reduced =
                        reduce_by_defense(f64::from(raw), defense, self.config.combat.defense_constant);
                    if raw > 0 {
                        reduced = reduced.max(self.config.combat.min_damage);
                    }
                    let dealt = self.apply_damage(target, reduced);
                    self.log.push(CombatEvent::Damaged { source: actor, target, amount: dealt });
                }
                EffectOutcome::Applied
            }
            EffectSpec::Heal { amount, target } => {
                let targets = resolver.friendly(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets to heal");
                }
                for target in targets {
                    let restored = self.apply_heal(target, *amount);
                    self.log.push(CombatEvent::Healed { target, amount: restored });
                }
                EffectOutcome::Applied
            }
            EffectSpec::Buff { stat, value, duration, target } => {
                let targets = resolver.friendly(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets to empower");
                }
                let rounds = duration.unwrap_or(self.config.effects.buff_duration);
                for target in targets {
                    self.strip_effect(target, source);
                    let delta = if target == CombatantId::Boss
                        && actor == CombatantId::Boss
                        && source == keys::ABILITY_ENRAGE
                        && *stat == Stat::Attack
                    {
                        self.boss.stats.attack
                    } else {
                        *value
                    };
                    let effect = ActiveEffect::buff(source, *stat, delta, rounds).from_source(actor);
                    self.push_effect(target, effect);
                }
                EffectOutcome::Applied
            }
            EffectSpec::Debuff { stat, value, duration, target } => {
                let targets = resolver.hostile(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets to weaken");
                }
                let rounds = duration.unwrap_or(self.config.effects.debuff_duration);
                for target in targets {
                    self.strip_effect(target, source);
                    let effect =
                        ActiveEffect::debuff(source, *stat, *value, rounds).from_source(actor);
                    self.push_effect(target, effect);
                }
                EffectOutcome::Applied
            }
            EffectSpec::DamageOverTime { amount, duration, target } => {
                let targets = resolver.hostile(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets to afflict");
                }
                for target in targets {
                    self.strip_effect(target, source);
                    let effect =
                        ActiveEffect::status(source, StatusTick::DamageOverTime(*amount), *duration)
                            .from_source(actor);
                    self.push_effect(target, effect);
                }
                EffectOutcome::Applied
            }
            EffectSpec::HealOverTime { amount, duration, target } => {
                let targets = resolver.friendly(self, *target);
                if targets.is_empty() {
                    return EffectOutcome::no_op("no living targets to mend");
                }
                for target in targets {
                    self.strip_effect(target, source);
                    let effect =
                        ActiveEffect::status(source, StatusTick::HealOverTime(*amount), *duration)
                            .from_source(actor);
                    self.push_effect(target, effect);
                }
                EffectOutcome::Applied
            }
            EffectSpec::Revive { hp_ratio } => {
                if actor == CombatantId::Boss {
                    return EffectOutcome::no_op("the boss has no fallen allies");
                }
                let Some(slot) = self.party.fallen_slots().first().copied() else {
                    return EffectOutcome::no_op("no fallen heroes to revive");
                };
                let Some(hero) = self.party.get_mut(slot) else {
                    return EffectOutcome::no_op("no fallen heroes to revive");
                };
                let hp = ((f64::from(hero.max_hp) * hp_ratio).round() as i32).clamp(1, hero.max_hp);
                hero.hp = hp;
                hero.alive = true;
                hero.effects.clear();
                tracing::debug!(slot, hp, "hero revived");
                self.log.push(CombatEvent::Revived { target: CombatantId::Hero(slot), hp });
                EffectOutcome::Applied
            }
            EffectSpec::Cleanse { target } => {
                let targets = resolver.friendly(self, *target);
                let mut total = 0;
                for target in targets {
                    let removed = self.effects_of_mut(target).map_or(0, effects::cleanse);
                    if removed > 0 {
                        total += removed;
                        self.log.push(CombatEvent::Cleansed { target, removed });
                        if target == CombatantId::Boss {
                            self.refresh_boss_stats();
                        }
                    }
                }
                if total == 0 {
                    return EffectOutcome::no_op("nothing to cleanse");
                }
                EffectOutcome::Applied
            }
            EffectSpec::Special { description } => {
                self.log.push(CombatEvent::Special { actor, description: description.clone() });
                EffectOutcome::Applied
            }
        }
    }

    /// Re-applying an effect id refreshes it rather than stacking a second copy.
    fn strip_effect(&mut self, target: CombatantId, id: &str) {
        if let Some(effects) = self.effects_of_mut(target) {
            effects.retain(|effect| effect.id != id);
        }
        if target == CombatantId::Boss {
            self.refresh_boss_stats();
        }
    }

    pub(super) fn push_effect(&mut self, target: CombatantId, effect: ActiveEffect) {
        let event = CombatEvent::EffectApplied {
            target,
            effect: effect.id.clone(),
            stat: effect.stat,
            value: effect.tick_amount().unwrap_or(effect.value),
        };
        let Some(effects) = self.effects_of_mut(target) else {
            return;
        };
        effects.push(effect);
        self.log.push(event);
        if target == CombatantId::Boss {
            self.refresh_boss_stats();
        }
    }
}
