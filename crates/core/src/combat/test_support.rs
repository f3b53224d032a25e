//! Shared test fixtures for the `combat` submodule test suites.
//! This module exists to avoid repeating roster and boss setup across many tests.
//! It does not own production combat logic.

use super::*;
use crate::content::{AttackShape, BossClass};
use crate::inventory::{Consumable, ConsumableStack};
use crate::party::{Hero, HeroClass};

pub(super) fn hero(name: &str, class: HeroClass, hp: i32, speed: i32) -> Hero {
    Hero::new(name, name, class, Stats { hp, attack: 25, defense: 10, speed, luck: 5 })
}

pub(super) fn standard_party() -> Party {
    Party::from_heroes(vec![
        hero("knight", HeroClass::Warrior, 120, 8),
        hero("thief", HeroClass::Rogue, 90, 14),
        hero("priest", HeroClass::Cleric, 80, 9),
        hero("minstrel", HeroClass::Bard, 85, 11),
    ])
}

/// A boss with a single plain strike, no abilities and no phases.
pub(super) fn plain_boss() -> BossDefinition {
    let mut boss = BossDefinition::new("dummy", "Training Dummy", BossClass::Floor);
    boss.patterns = vec![AttackPattern::new("poke", 1, AttackShape::Single, 1.0)];
    boss
}

pub(super) fn setup_with(boss: BossDefinition, party: Party) -> EncounterSetup {
    EncounterSetup {
        seed: 7,
        floor: 3,
        depth: 0,
        boss,
        party,
        inventory: Inventory::with_capacity(4),
        config: EngineConfig::default(),
    }
}

pub(super) fn encounter_with(boss: BossDefinition, party: Party) -> Encounter {
    Encounter::new(setup_with(boss, party)).expect("fixture encounter should build")
}

pub(super) fn stack(item: Consumable, quantity: u32) -> ConsumableStack {
    ConsumableStack { item, quantity }
}

/// Advances until a hero is up and returns that slot.
pub(super) fn await_hero(encounter: &mut Encounter) -> usize {
    match encounter.advance(64).stop_reason {
        AdvanceStopReason::AwaitingHeroTurn { slot, .. } => slot,
        other => panic!("expected a hero turn, got {other:?}"),
    }
}

/// Forces the acting order to a single hero so tests can submit turns directly.
pub(super) fn force_hero_turn(encounter: &mut Encounter, slot: usize) {
    encounter.pending_hero = Some(slot);
}
