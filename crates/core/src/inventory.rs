//! Consumable definitions and the slot-based stock the party carries into a fight.

use serde::{Deserialize, Serialize};

use crate::content::EffectSpec;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: String,
    pub name: String,
    pub effects: Vec<EffectSpec>,
    #[serde(default = "default_combat_usable")]
    pub combat_usable: bool,
    #[serde(default)]
    pub cooldown: u32,
}

fn default_combat_usable() -> bool {
    true
}

impl Consumable {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            effects: Vec::new(),
            combat_usable: true,
            cooldown: 0,
        }
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_cooldown(mut self, rounds: u32) -> Self {
        self.cooldown = rounds;
        self
    }

    pub fn out_of_combat_only(mut self) -> Self {
        self.combat_usable = false;
        self
    }

    pub fn is_revive(&self) -> bool {
        self.effects.iter().any(|effect| matches!(effect, EffectSpec::Revive { .. }))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumableStack {
    pub item: Consumable,
    pub quantity: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ConsumableStack>>,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![None; capacity] }
    }

    pub fn from_stacks(stacks: Vec<ConsumableStack>) -> Self {
        Self { slots: stacks.into_iter().map(Some).collect() }
    }

    pub fn get(&self, slot: usize) -> Option<&ConsumableStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn put(&mut self, slot: usize, stack: ConsumableStack) {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        self.slots[slot] = Some(stack);
    }

    /// Removes one unit; the slot is cleared when the stack runs out.
    pub fn consume_one(&mut self, slot: usize) -> Option<u32> {
        let entry = self.slots.get_mut(slot)?;
        let stack = entry.as_mut()?;
        stack.quantity = stack.quantity.saturating_sub(1);
        let remaining = stack.quantity;
        if remaining == 0 {
            *entry = None;
        }
        Some(remaining)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &ConsumableStack)> {
        self.slots.iter().enumerate().filter_map(|(slot, stack)| stack.as_ref().map(|s| (slot, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentPack, keys};

    #[test]
    fn last_unit_clears_the_slot() {
        let content = ContentPack::build_default();
        let potion = content.consumable(keys::CONSUMABLE_MINOR_POTION).expect("potion").clone();
        let mut inventory =
            Inventory::from_stacks(vec![ConsumableStack { item: potion, quantity: 2 }]);

        assert_eq!(inventory.consume_one(0), Some(1));
        assert!(inventory.get(0).is_some());
        assert_eq!(inventory.consume_one(0), Some(0));
        assert!(inventory.get(0).is_none());
        assert_eq!(inventory.consume_one(0), None);
        assert_eq!(inventory.capacity(), 1);
    }

    #[test]
    fn revive_flag_follows_effect_list() {
        let content = ContentPack::build_default();
        assert!(content.consumable(keys::CONSUMABLE_PHOENIX_FEATHER).expect("feather").is_revive());
        assert!(!content.consumable(keys::CONSUMABLE_MINOR_POTION).expect("potion").is_revive());
    }
}
