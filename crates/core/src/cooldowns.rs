//! Combat-scoped cooldowns keyed by owner and ability (or item) id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::CombatantId;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CooldownKey {
    pub owner: CombatantId,
    pub ability: String,
}

impl CooldownKey {
    pub fn new(owner: CombatantId, ability: &str) -> Self {
        Self { owner, ability: ability.to_string() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CooldownBook {
    entries: BTreeMap<CooldownKey, u32>,
}

impl CooldownBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, owner: CombatantId, ability: &str, rounds: u32) {
        if rounds == 0 {
            self.entries.remove(&CooldownKey::new(owner, ability));
            return;
        }
        self.entries.insert(CooldownKey::new(owner, ability), rounds);
    }

    pub fn remaining(&self, owner: CombatantId, ability: &str) -> u32 {
        self.entries.get(&CooldownKey::new(owner, ability)).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, owner: CombatantId, ability: &str) -> bool {
        self.remaining(owner, ability) == 0
    }

    /// One round passes: every positive cooldown drops by one, never below zero.
    pub fn decrement_all(&mut self) {
        for remaining in self.entries.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.entries.retain(|_, remaining| *remaining > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CooldownKey, u32)> {
        self.entries.iter().map(|(key, remaining)| (key, *remaining))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
