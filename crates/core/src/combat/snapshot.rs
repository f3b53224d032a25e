//! Read-only views of encounter state for observers and tooling.

use super::*;
use crate::cooldowns::CooldownKey;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossSnapshot {
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub stats: Stats,
    pub phase: u8,
    pub passive_heal: f64,
    pub effects: Vec<ActiveEffect>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroSnapshot {
    pub slot: usize,
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
    pub stats: Stats,
    pub effects: Vec<ActiveEffect>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub floor: u32,
    pub depth: u32,
    pub round: u32,
    pub danger: f64,
    pub boss: BossSnapshot,
    pub heroes: Vec<HeroSnapshot>,
    pub turn_order: Vec<Combatant>,
    pub cursor: usize,
    pub pending_hero: Option<usize>,
    pub cooldowns: Vec<(CooldownKey, u32)>,
    pub finished: Option<RunOutcome>,
}

impl Encounter {
    pub fn snapshot(&self) -> EncounterSnapshot {
        let boss = BossSnapshot {
            id: self.boss.id.clone(),
            name: self.boss.name.clone(),
            hp: self.boss.hp,
            max_hp: self.boss.max_hp,
            stats: self.boss.stats,
            phase: self.boss.phase,
            passive_heal: self.boss.passive_heal,
            effects: self.boss.effects.clone(),
        };
        let heroes = self
            .party
            .iter()
            .map(|(slot, hero)| HeroSnapshot {
                slot,
                id: hero.id.clone(),
                name: hero.name.clone(),
                hp: hero.hp,
                max_hp: hero.max_hp,
                alive: hero.alive,
                stats: self.hero_stats(slot).unwrap_or_default(),
                effects: hero.effects.clone(),
            })
            .collect();
        EncounterSnapshot {
            floor: self.floor,
            depth: self.depth,
            round: self.round,
            danger: self.current_danger(),
            boss,
            heroes,
            turn_order: self.turn_order.clone(),
            cursor: self.cursor,
            pending_hero: self.pending_hero,
            cooldowns: self.cooldowns.iter().map(|(key, left)| (key.clone(), left)).collect(),
            finished: self.finished_outcome,
        }
    }
}
