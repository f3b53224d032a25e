//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from combat flow code.
//! It does not own replay execution or journal formats.

use std::hash::Hasher;

use super::*;
use crate::effects::{EffectDuration, StatusTick};
use xxhash_rust::xxh3::Xxh3;

impl Encounter {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.round);
        hasher.write_u64(self.next_input_seq);
        hasher.write_usize(self.cursor);
        hasher.write_u8(match self.finished_outcome {
            None => 0,
            Some(RunOutcome::Victory) => 1,
            Some(RunOutcome::Defeat) => 2,
        });

        hasher.write_i32(self.boss.hp);
        hasher.write_i32(self.boss.max_hp);
        hasher.write_u8(self.boss.phase);
        write_stats(&mut hasher, &self.boss.stats);
        write_effects(&mut hasher, &self.boss.effects);

        for (slot, hero) in self.party.iter() {
            hasher.write_usize(slot);
            hasher.write_i32(hero.hp);
            hasher.write_u8(u8::from(hero.alive));
            write_effects(&mut hasher, &hero.effects);
        }
        for combatant in &self.turn_order {
            write_id(&mut hasher, combatant.id);
        }
        for (key, remaining) in self.cooldowns.iter() {
            write_id(&mut hasher, key.owner);
            hasher.write(key.ability.as_bytes());
            hasher.write_u32(remaining);
        }
        for (slot, stack) in self.inventory.iter() {
            hasher.write_usize(slot);
            hasher.write_u32(stack.quantity);
        }
        hasher.finish()
    }
}

fn write_id(hasher: &mut Xxh3, id: CombatantId) {
    match id {
        CombatantId::Boss => hasher.write_u8(0xff),
        CombatantId::Hero(slot) => hasher.write_usize(slot),
    }
}

fn write_stats(hasher: &mut Xxh3, stats: &Stats) {
    for stat in Stat::ALL {
        hasher.write_i32(stats.get(stat));
    }
}

fn write_effects(hasher: &mut Xxh3, effects: &[ActiveEffect]) {
    hasher.write_usize(effects.len());
    for effect in effects {
        hasher.write(effect.id.as_bytes());
        hasher.write_i32(effect.value);
        hasher.write_u32(match effect.duration {
            EffectDuration::Rounds(rounds) => rounds,
            EffectDuration::Permanent => u32::MAX,
        });
        if let Some(StatusTick::DamageOverTime(amount) | StatusTick::HealOverTime(amount)) =
            effect.tick
        {
            hasher.write_i32(amount);
        }
    }
}
