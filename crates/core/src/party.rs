//! Hero records and the fixed-slot party roster.
//! Heroes belong to the caller; the engine reads their effective stats through a
//! [`StatAggregator`] and writes back HP, alive flag, combat effects and ability markers.

use serde::{Deserialize, Serialize};

use crate::content::EffectSpec;
use crate::effects::ActiveEffect;
use crate::types::{FRONTLINE_SLOTS, PARTY_SIZE, Stats};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClass {
    Warrior,
    Paladin,
    Rogue,
    Ranger,
    Mage,
    Cleric,
    Druid,
    Bard,
}

impl HeroClass {
    pub fn is_healer(self) -> bool {
        matches!(self, HeroClass::Cleric | HeroClass::Druid)
    }

    pub fn is_support(self) -> bool {
        matches!(self, HeroClass::Bard | HeroClass::Paladin)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    Frontline,
    Backline,
}

impl Position {
    pub fn for_slot(slot: usize) -> Self {
        if slot < FRONTLINE_SLOTS { Position::Frontline } else { Position::Backline }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroAbility {
    pub id: String,
    pub name: String,
    pub cooldown: u32,
    pub effects: Vec<EffectSpec>,
    /// Out-of-combat cooldown tracked by the caller; combat uses its own book.
    #[serde(default)]
    pub cooldown_remaining: u32,
    #[serde(default)]
    pub last_used: Option<u32>,
}

impl HeroAbility {
    pub fn new(id: &str, name: &str, cooldown: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cooldown,
            effects: Vec::new(),
            cooldown_remaining: 0,
            last_used: None,
        }
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: String,
    pub name: String,
    pub class: HeroClass,
    pub base_stats: Stats,
    #[serde(default)]
    pub gear: Stats,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    #[serde(default)]
    pub effects: Vec<ActiveEffect>,
    #[serde(default)]
    pub abilities: Vec<HeroAbility>,
}

impl Hero {
    pub fn new(id: &str, name: &str, class: HeroClass, base_stats: Stats) -> Self {
        let max_hp = base_stats.hp.max(1);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class,
            base_stats,
            gear: Stats::default(),
            hp: max_hp,
            max_hp,
            alive: true,
            effects: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn with_ability(mut self, ability: HeroAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    pub fn ability(&self, id: &str) -> Option<&HeroAbility> {
        self.abilities.iter().find(|ability| ability.id == id)
    }
}

/// Source of fully-equipped hero stats.
pub trait StatAggregator {
    fn effective_stats(&self, hero: &Hero) -> Stats;
}

/// Base stats plus gear, with HP pinned to the hero's max HP.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquippedStats;

impl StatAggregator for EquippedStats {
    fn effective_stats(&self, hero: &Hero) -> Stats {
        let mut stats = hero.base_stats.plus(&hero.gear);
        stats.hp = hero.max_hp;
        stats
    }
}

impl<F> StatAggregator for F
where
    F: Fn(&Hero) -> Stats,
{
    fn effective_stats(&self, hero: &Hero) -> Stats {
        self(hero)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Party {
    slots: Vec<Option<Hero>>,
}

impl Default for Party {
    fn default() -> Self {
        Self { slots: vec![None; PARTY_SIZE] }
    }
}

impl Party {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills slots in order; heroes past the party size are dropped.
    pub fn from_heroes(heroes: Vec<Hero>) -> Self {
        let mut party = Self::new();
        for (slot, hero) in heroes.into_iter().take(PARTY_SIZE).enumerate() {
            party.slots[slot] = Some(hero);
        }
        party
    }

    /// Pins the roster to the fixed slot count and repairs HP/alive consistency.
    pub(crate) fn normalize(&mut self) {
        self.slots.resize(PARTY_SIZE, None);
        for (_, hero) in self.iter_mut() {
            hero.max_hp = hero.max_hp.max(1);
            hero.hp = hero.hp.clamp(0, hero.max_hp);
            hero.alive &= hero.hp > 0;
        }
    }

    pub fn set(&mut self, slot: usize, hero: Option<Hero>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = hero;
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Hero> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Hero> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Hero)> {
        self.slots.iter().enumerate().filter_map(|(slot, hero)| hero.as_ref().map(|h| (slot, h)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Hero)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(slot, hero)| hero.as_mut().map(|h| (slot, h)))
    }

    pub fn living_slots(&self) -> Vec<usize> {
        self.iter().filter(|(_, hero)| hero.alive).map(|(slot, _)| slot).collect()
    }

    pub fn fallen_slots(&self) -> Vec<usize> {
        self.iter().filter(|(_, hero)| !hero.alive).map(|(slot, _)| slot).collect()
    }

    pub fn any_alive(&self) -> bool {
        self.iter().any(|(_, hero)| hero.alive)
    }

    pub fn is_alive(&self, slot: usize) -> bool {
        self.get(slot).is_some_and(|hero| hero.alive)
    }
}
