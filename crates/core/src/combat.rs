//! One boss fight, from setup until a latched victory or defeat.
//! This file owns the `Encounter` aggregate and wires focused combat submodules together.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::content::{AttackPattern, BossAbility, BossDefinition, KitChange, Phase};
use crate::cooldowns::CooldownBook;
use crate::danger::danger;
use crate::effects::{self, ActiveEffect};
use crate::error::EncounterError;
use crate::inventory::Inventory;
use crate::party::{EquippedStats, Party, StatAggregator};
use crate::rng::Dice;
use crate::scaling::{scale_stat, scale_stats};
use crate::types::*;

mod abilities;
mod advance;
mod autopilot;
mod hash;
mod hero_turn;
mod interpreter;
mod patterns;
mod phases;
mod round_end;
mod snapshot;
mod targeting;
mod turn_order;

#[cfg(test)]
mod test_support;

pub use autopilot::suggest_turn;
pub use snapshot::{BossSnapshot, EncounterSnapshot, HeroSnapshot};

/// Everything needed to start (or replay) an encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterSetup {
    pub seed: u64,
    pub floor: u32,
    #[serde(default)]
    pub depth: u32,
    pub boss: BossDefinition,
    pub party: Party,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Clone, Debug)]
pub struct BossState {
    id: String,
    name: String,
    hp: i32,
    max_hp: i32,
    base: Stats,
    stats: Stats,
    abilities: Vec<BossAbility>,
    patterns: Vec<AttackPattern>,
    phases: Vec<Phase>,
    phase: u8,
    fired_in_phase: BTreeSet<String>,
    passive_heal: f64,
    effects: Vec<ActiveEffect>,
}

impl BossState {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn hp_ratio(&self) -> f64 {
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Base stats including phase deltas, before danger scaling.
    pub fn base_stats(&self) -> Stats {
        self.base
    }

    /// Scaled stats for the current round with active effects applied.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn abilities(&self) -> &[BossAbility] {
        &self.abilities
    }

    pub fn patterns(&self) -> &[AttackPattern] {
        &self.patterns
    }

    pub fn effects(&self) -> &[ActiveEffect] {
        &self.effects
    }

    pub fn passive_heal(&self) -> f64 {
        self.passive_heal
    }
}

pub struct Encounter {
    seed: u64,
    config: EngineConfig,
    floor: u32,
    depth: u32,
    round: u32,
    boss: BossState,
    party: Party,
    inventory: Inventory,
    aggregator: Box<dyn StatAggregator>,
    cooldowns: CooldownBook,
    turn_order: Vec<Combatant>,
    cursor: usize,
    dice: Dice,
    log: Vec<CombatEvent>,
    pending_hero: Option<usize>,
    finished_outcome: Option<RunOutcome>,
    next_input_seq: u64,
}

impl Encounter {
    pub fn new(setup: EncounterSetup) -> Result<Self, EncounterError> {
        Self::with_aggregator(setup, Box::new(EquippedStats))
    }

    pub fn with_aggregator(
        setup: EncounterSetup,
        aggregator: Box<dyn StatAggregator>,
    ) -> Result<Self, EncounterError> {
        let EncounterSetup { seed, floor, depth, boss, mut party, inventory, config } = setup;

        for phase in &boss.phases {
            if let Some(KitChange::Replace(entries)) = &phase.patterns
                && entries.is_empty()
            {
                return Err(EncounterError::NoAttackPatterns {
                    boss: boss.id.clone(),
                    phase: phase.phase,
                });
            }
        }

        party.normalize();
        for (_, hero) in party.iter_mut() {
            hero.effects.clear();
        }

        let base = boss.base_stats(&config.tiers);
        let opening_danger = danger(&config.danger, floor, depth, 0);
        let max_hp = scale_stat(base.hp, opening_danger, config.scaling.hp).max(1);
        let mut phases = boss.phases.clone();
        phases.sort_by_key(|phase| phase.phase);

        let boss_state = BossState {
            id: boss.id.clone(),
            name: boss.name.clone(),
            hp: max_hp,
            max_hp,
            base,
            stats: base,
            abilities: boss.abilities.clone(),
            patterns: boss.attack_patterns(),
            phases,
            phase: 1,
            fired_in_phase: BTreeSet::new(),
            passive_heal: boss.passive_heal.unwrap_or(0.0),
            effects: Vec::new(),
        };

        let mut encounter = Self {
            seed,
            config,
            floor,
            depth,
            round: 0,
            boss: boss_state,
            party,
            inventory,
            aggregator,
            cooldowns: CooldownBook::new(),
            turn_order: Vec::new(),
            cursor: 0,
            dice: Dice::seeded(seed),
            log: Vec::new(),
            pending_hero: None,
            finished_outcome: None,
            next_input_seq: 0,
        };
        tracing::debug!(
            boss = %encounter.boss.id,
            floor,
            depth,
            danger = opening_danger,
            max_hp,
            "encounter created"
        );
        encounter.begin_round();
        Ok(encounter)
    }

    /// Returns the roster and inventory to the caller, stripped of combat effects.
    pub fn into_parts(self) -> (Party, Inventory) {
        let mut party = self.party;
        for (_, hero) in party.iter_mut() {
            hero.effects.clear();
        }
        (party, self.inventory)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Completed rounds in this fight.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current_danger(&self) -> f64 {
        danger(&self.config.danger, self.floor, self.depth, self.round)
    }

    pub fn boss(&self) -> &BossState {
        &self.boss
    }

    pub fn party(&self) -> &Party {
        &self.party
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn cooldowns(&self) -> &CooldownBook {
        &self.cooldowns
    }

    pub fn turn_order(&self) -> &[Combatant] {
        &self.turn_order
    }

    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn pending_hero(&self) -> Option<usize> {
        self.pending_hero
    }

    pub fn finished_outcome(&self) -> Option<RunOutcome> {
        self.finished_outcome
    }

    pub fn next_input_seq(&self) -> u64 {
        self.next_input_seq
    }

    /// Fully-equipped hero stats with active effects, clamped at zero.
    pub fn hero_stats(&self, slot: usize) -> Option<Stats> {
        let hero = self.party.get(slot)?;
        let mut stats = self.aggregator.effective_stats(hero);
        for stat in Stat::ALL {
            let value = stats.get_mut(stat);
            *value = value.saturating_add(effects::stat_delta(&hero.effects, stat));
        }
        Some(stats.clamped_non_negative())
    }

    /// Sets boss HP directly, clamped to `[0, max]`. Max HP never changes.
    pub fn set_boss_hp(&mut self, hp: i32) {
        self.boss.hp = hp.clamp(0, self.boss.max_hp);
    }

    /// Applies an external roster change and repairs HP/alive consistency afterwards.
    pub fn update_roster(&mut self, update: impl FnOnce(&mut Party)) {
        update(&mut self.party);
        self.party.normalize();
    }

    fn is_alive(&self, id: CombatantId) -> bool {
        match id {
            CombatantId::Boss => self.boss.is_alive(),
            CombatantId::Hero(slot) => self.party.is_alive(slot),
        }
    }

    fn stats_of(&self, id: CombatantId) -> Stats {
        match id {
            CombatantId::Boss => self.boss.stats,
            CombatantId::Hero(slot) => self.hero_stats(slot).unwrap_or_default(),
        }
    }

    fn effects_of_mut(&mut self, id: CombatantId) -> Option<&mut Vec<ActiveEffect>> {
        match id {
            CombatantId::Boss => Some(&mut self.boss.effects),
            CombatantId::Hero(slot) => self.party.get_mut(slot).map(|hero| &mut hero.effects),
        }
    }

    /// Rescales boss stats for the current round and folds in active effects.
    fn refresh_boss_stats(&mut self) {
        let mut stats = scale_stats(&self.boss.base, self.current_danger(), &self.config.scaling);
        for stat in Stat::ALL {
            let value = stats.get_mut(stat);
            *value = value.saturating_add(effects::stat_delta(&self.boss.effects, stat));
        }
        stats.hp = self.boss.max_hp;
        self.boss.stats = stats.clamped_non_negative();
    }

    /// Lowers HP, clamped at zero, and flags the target as fallen when it reaches zero.
    fn apply_damage(&mut self, target: CombatantId, amount: i32) -> i32 {
        let amount = amount.max(0);
        match target {
            CombatantId::Boss => {
                if !self.boss.is_alive() {
                    return 0;
                }
                let dealt = amount.min(self.boss.hp);
                self.boss.hp -= dealt;
                if self.boss.hp == 0 {
                    self.log.push(CombatEvent::Fell { combatant: target });
                }
                dealt
            }
            CombatantId::Hero(slot) => {
                let Some(hero) = self.party.get_mut(slot) else {
                    return 0;
                };
                if !hero.alive {
                    return 0;
                }
                let dealt = amount.min(hero.hp);
                hero.hp -= dealt;
                if hero.hp == 0 {
                    hero.alive = false;
                    tracing::debug!(slot, hero = %hero.name, "hero fell");
                    self.log.push(CombatEvent::Fell { combatant: target });
                }
                dealt
            }
        }
    }

    /// Raises HP of a living target, clamped to max. Returns the amount actually restored.
    fn apply_heal(&mut self, target: CombatantId, amount: i32) -> i32 {
        let amount = amount.max(0);
        match target {
            CombatantId::Boss => {
                if !self.boss.is_alive() {
                    return 0;
                }
                let restored = amount.min(self.boss.max_hp - self.boss.hp);
                self.boss.hp += restored;
                restored
            }
            CombatantId::Hero(slot) => match self.party.get_mut(slot) {
                Some(hero) if hero.alive => {
                    let restored = amount.min(hero.max_hp - hero.hp).max(0);
                    hero.hp += restored;
                    restored
                }
                _ => 0,
            },
        }
    }
}
