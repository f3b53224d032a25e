//! Hero selection for boss attack patterns.
//! This module exists to keep positional guard rules and danger-tier focus policy together.
//! It does not own damage resolution.

use super::*;
use crate::content::AttackShape;
use crate::danger::DangerTier;
use crate::party::{HeroClass, Position};

impl Encounter {
    /// Party slots hit by `pattern`. Multi-target picks may repeat a slot.
    pub(super) fn pattern_targets(&mut self, pattern: &AttackPattern) -> Vec<usize> {
        let living = self.party.living_slots();
        if living.is_empty() {
            return Vec::new();
        }
        match pattern.shape {
            AttackShape::Area => living,
            AttackShape::Cleave => {
                let frontline = in_position(&living, Position::Frontline);
                if frontline.is_empty() { living } else { frontline }
            }
            AttackShape::Multi => {
                let count =
                    pattern.target_count.unwrap_or(self.config.combat.default_multi_targets);
                (0..count).filter_map(|_| self.dice.pick(&living)).collect()
            }
            AttackShape::Single => self.single_target(&living).into_iter().collect(),
        }
    }

    fn single_target(&mut self, living: &[usize]) -> Option<usize> {
        let frontline = in_position(living, Position::Frontline);
        let backline = in_position(living, Position::Backline);
        let candidates = if frontline.is_empty() { backline.clone() } else { frontline };
        let tier = DangerTier::classify(self.current_danger(), &self.config.targeting);

        match tier {
            DangerTier::Low => self.dice.pick(&candidates),
            DangerTier::Medium => {
                if backline.is_empty() && self.dice.chance(self.config.targeting.support_focus_chance)
                {
                    let supports = self.filter_class(&candidates, |class| class.is_support());
                    if let Some(slot) = self.lowest_hp(&supports) {
                        return Some(slot);
                    }
                }
                self.lowest_hp(&candidates)
            }
            DangerTier::High => {
                if backline.is_empty() {
                    let healers = self.filter_class(&candidates, |class| class.is_healer());
                    let supports = self.filter_class(&candidates, |class| class.is_support());
                    if let Some(slot) = self.lowest_hp(&healers).or(self.lowest_hp(&supports)) {
                        return Some(slot);
                    }
                }
                self.lowest_hp(&candidates)
            }
        }
    }

    fn filter_class(
        &self,
        slots: &[usize],
        keep: impl Fn(HeroClass) -> bool,
    ) -> Vec<usize> {
        slots
            .iter()
            .copied()
            .filter(|slot| self.party.get(*slot).is_some_and(|hero| keep(hero.class)))
            .collect()
    }

    /// Lowest current HP; ties go to the lower slot.
    fn lowest_hp(&self, slots: &[usize]) -> Option<usize> {
        slots.iter().copied().min_by_key(|slot| {
            (self.party.get(*slot).map_or(i32::MAX, |hero| hero.hp), *slot)
        })
    }
}

fn in_position(slots: &[usize], position: Position) -> Vec<usize> {
    slots.iter().copied().filter(|slot| Position::for_slot(*slot) == position).collect()
}
