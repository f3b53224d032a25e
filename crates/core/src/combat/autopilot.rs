//! A simple hero policy for headless runs.
//! This module exists so tools and tests can drive whole fights without a player.
//! It does not own validation; every suggestion still goes through `submit_hero_turn`.

use super::*;
use crate::actions::HeroAction;
use crate::content::EffectSpec;

const LOW_HP_RATIO: f64 = 0.35;

/// Revive a fallen ally if a feather is at hand, drink a heal when low,
/// then use the first ready ability or fall back to a plain attack.
pub fn suggest_turn(encounter: &Encounter, slot: usize) -> Vec<HeroAction> {
    let Some(hero) = encounter.party().get(slot) else {
        return Vec::new();
    };
    let actor = CombatantId::Hero(slot);
    let mut actions = Vec::new();

    let usable = |wanted: &dyn Fn(&EffectSpec) -> bool| {
        encounter.inventory().iter().find_map(|(item_slot, stack)| {
            let ready = stack.quantity > 0
                && stack.item.combat_usable
                && encounter.cooldowns().is_ready(actor, &stack.item.id);
            (ready && stack.item.effects.iter().any(wanted)).then_some(item_slot)
        })
    };

    if !encounter.party().fallen_slots().is_empty()
        && let Some(item_slot) = usable(&|effect| matches!(effect, EffectSpec::Revive { .. }))
    {
        actions.push(HeroAction::Item { slot: item_slot });
    } else if hero.hp_ratio() < LOW_HP_RATIO
        && let Some(item_slot) = usable(&|effect| {
            matches!(effect, EffectSpec::Heal { .. } | EffectSpec::HealOverTime { .. })
        })
    {
        actions.push(HeroAction::Item { slot: item_slot });
    }

    let ready_ability = hero
        .abilities
        .iter()
        .find(|ability| encounter.cooldowns().is_ready(actor, &ability.id));
    match ready_ability {
        Some(ability) => actions.push(HeroAction::Ability { id: ability.id.clone() }),
        None => actions.push(HeroAction::Attack),
    }
    actions
}
