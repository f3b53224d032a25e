//! Timed buffs, debuffs and status effects attached to combatants.
//! This module exists to keep duration bookkeeping in one place for boss and heroes alike.
//! It does not own target selection or event logging.

use serde::{Deserialize, Serialize};

use crate::types::{CombatantId, Stat};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCategory {
    Buff,
    Debuff,
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectDuration {
    Rounds(u32),
    Permanent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTick {
    DamageOverTime(i32),
    HealOverTime(i32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub id: String,
    pub category: EffectCategory,
    pub stat: Option<Stat>,
    pub value: i32,
    pub duration: EffectDuration,
    pub tick: Option<StatusTick>,
    #[serde(default)]
    pub source: Option<CombatantId>,
}

impl ActiveEffect {
    pub fn buff(id: &str, stat: Stat, value: i32, rounds: u32) -> Self {
        Self {
            id: id.to_string(),
            category: EffectCategory::Buff,
            stat: Some(stat),
            value,
            duration: EffectDuration::Rounds(rounds),
            tick: None,
            source: None,
        }
    }

    /// Debuff values are always stored as negative deltas.
    pub fn debuff(id: &str, stat: Stat, value: i32, rounds: u32) -> Self {
        Self {
            id: id.to_string(),
            category: EffectCategory::Debuff,
            stat: Some(stat),
            value: -value.abs(),
            duration: EffectDuration::Rounds(rounds),
            tick: None,
            source: None,
        }
    }

    pub fn status(id: &str, tick: StatusTick, rounds: u32) -> Self {
        Self {
            id: id.to_string(),
            category: EffectCategory::Status,
            stat: None,
            value: 0,
            duration: EffectDuration::Rounds(rounds),
            tick: Some(tick),
            source: None,
        }
    }

    pub fn from_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn permanent(mut self) -> Self {
        self.duration = EffectDuration::Permanent;
        self
    }

    pub fn is_harmful(&self) -> bool {
        match self.category {
            EffectCategory::Debuff => true,
            EffectCategory::Buff => false,
            EffectCategory::Status => matches!(self.tick, Some(StatusTick::DamageOverTime(_))),
        }
    }

    /// Signed per-round HP change: negative for damage-over-time.
    pub fn tick_amount(&self) -> Option<i32> {
        match self.tick? {
            StatusTick::DamageOverTime(amount) => Some(-amount.abs()),
            StatusTick::HealOverTime(amount) => Some(amount.abs()),
        }
    }
}

pub fn stat_delta(effects: &[ActiveEffect], stat: Stat) -> i32 {
    effects
        .iter()
        .filter(|effect| effect.stat == Some(stat))
        .fold(0, |total: i32, effect| total.saturating_add(effect.value))
}

/// Decrements every timed effect once and returns the ids of those that expired.
pub fn decay(effects: &mut Vec<ActiveEffect>) -> Vec<String> {
    let mut expired = Vec::new();
    effects.retain_mut(|effect| match effect.duration {
        EffectDuration::Permanent => true,
        EffectDuration::Rounds(remaining) => {
            let next = remaining.saturating_sub(1);
            effect.duration = EffectDuration::Rounds(next);
            if next == 0 {
                expired.push(effect.id.clone());
                false
            } else {
                true
            }
        }
    });
    expired
}

/// Removes debuffs and damaging statuses, returning how many were stripped.
pub fn cleanse(effects: &mut Vec<ActiveEffect>) -> usize {
    let before = effects.len();
    effects.retain(|effect| !effect.is_harmful());
    before - effects.len()
}
