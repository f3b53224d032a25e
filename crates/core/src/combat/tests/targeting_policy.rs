//! Tests for positional guard rules and danger-tier focus.

use super::support::*;

fn encounter_on_floor(floor: u32, party: Party) -> Encounter {
    let mut setup = setup_with(plain_boss(), party);
    setup.floor = floor;
    Encounter::new(setup).expect("encounter should build")
}

fn single() -> AttackPattern {
    AttackPattern::new("jab", 1, AttackShape::Single, 1.0)
}

fn kill(encounter: &mut Encounter, slots: &[usize]) {
    encounter.update_roster(|party| {
        for slot in slots {
            if let Some(hero) = party.get_mut(*slot) {
                hero.hp = 0;
            }
        }
    });
}

/// Frontline healer with a lower-HP warrior beside them.
fn exposed_healer_party(with_backline: bool) -> Party {
    let mut heroes = vec![
        hero("abbess", HeroClass::Cleric, 100, 9),
        hero("brute", HeroClass::Warrior, 50, 8),
    ];
    if with_backline {
        heroes.push(hero("archer", HeroClass::Ranger, 90, 12));
        heroes.push(hero("wizard", HeroClass::Mage, 70, 10));
    }
    Party::from_heroes(heroes)
}

#[test]
fn low_danger_single_target_stays_on_the_frontline() {
    let mut encounter = encounter_on_floor(3, standard_party());
    let mut seen = BTreeSet::new();
    for _ in 0..64 {
        let targets = encounter.pattern_targets(&single());
        assert_eq!(targets.len(), 1);
        seen.insert(targets[0]);
    }
    assert_eq!(seen, BTreeSet::from([0, 1]));
}

#[test]
fn fallen_frontline_exposes_the_backline() {
    let mut encounter = encounter_on_floor(3, standard_party());
    kill(&mut encounter, &[0, 1]);
    for _ in 0..32 {
        let targets = encounter.pattern_targets(&single());
        assert!(matches!(targets.as_slice(), [2] | [3]), "got {targets:?}");
    }
}

#[test]
fn medium_danger_focuses_the_weakest_guard() {
    let mut encounter = encounter_on_floor(30, standard_party());
    for _ in 0..16 {
        assert_eq!(encounter.pattern_targets(&single()), vec![1]);
    }
}

#[test]
fn medium_danger_sometimes_hunts_an_exposed_support() {
    let party = Party::from_heroes(vec![
        hero("brute", HeroClass::Warrior, 50, 8),
        hero("lutist", HeroClass::Bard, 100, 11),
    ]);
    let mut encounter = encounter_on_floor(30, party);
    let mut seen = BTreeSet::new();
    for _ in 0..200 {
        seen.extend(encounter.pattern_targets(&single()));
    }
    assert_eq!(seen, BTreeSet::from([0, 1]));
}

#[test]
fn high_danger_goes_for_the_healer_once_the_backline_is_gone() {
    let mut encounter = encounter_on_floor(70, exposed_healer_party(false));
    for _ in 0..16 {
        assert_eq!(encounter.pattern_targets(&single()), vec![0]);
    }
}

#[test]
fn high_danger_with_a_backline_hits_the_lowest_hp_guard() {
    let mut encounter = encounter_on_floor(70, exposed_healer_party(true));
    for _ in 0..16 {
        assert_eq!(encounter.pattern_targets(&single()), vec![1]);
    }
}

#[test]
fn cleave_hits_the_frontline_then_everyone_left() {
    let cleave = AttackPattern::new("sweep", 1, AttackShape::Cleave, 0.8);
    let mut encounter = encounter_on_floor(3, standard_party());
    assert_eq!(encounter.pattern_targets(&cleave), vec![0, 1]);

    kill(&mut encounter, &[0, 1]);
    assert_eq!(encounter.pattern_targets(&cleave), vec![2, 3]);
}

#[test]
fn area_hits_every_living_hero() {
    let area = AttackPattern::new("quake", 1, AttackShape::Area, 0.6);
    let mut encounter = encounter_on_floor(3, standard_party());
    kill(&mut encounter, &[2]);
    assert_eq!(encounter.pattern_targets(&area), vec![0, 1, 3]);
}

#[test]
fn multi_picks_the_requested_number_of_living_targets() {
    let volley = AttackPattern::new("volley", 1, AttackShape::Multi, 0.5).with_targets(3);
    let mut encounter = encounter_on_floor(3, standard_party());
    kill(&mut encounter, &[3]);
    let targets = encounter.pattern_targets(&volley);
    assert_eq!(targets.len(), 3);
    assert!(targets.iter().all(|slot| *slot < 3));
}

#[test]
fn nobody_standing_means_no_targets() {
    let mut encounter = encounter_on_floor(3, standard_party());
    kill(&mut encounter, &[0, 1, 2, 3]);
    assert!(encounter.pattern_targets(&single()).is_empty());
}
