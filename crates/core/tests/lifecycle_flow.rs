use std::time::Duration;

use encounter::content::keys;
use encounter::{
    AdvanceStopReason, ContentPack, Encounter, EncounterManager, EncounterObserver,
    EncounterSetup, EncounterSnapshot, EngineConfig, Hero, HeroClass, Inventory, LogKind, Party,
    RunOutcome, Stats, suggest_turn,
};

#[derive(Default)]
struct Tally {
    victories: u32,
    defeats: u32,
    snapshots: Vec<EncounterSnapshot>,
    outcome_lines: Vec<String>,
}

impl EncounterObserver for Tally {
    fn on_victory(&mut self) {
        self.victories += 1;
    }

    fn on_defeat(&mut self) {
        self.defeats += 1;
    }

    fn on_state_update(&mut self, snapshot: &EncounterSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_log(&mut self, kind: LogKind, message: &str) {
        if kind == LogKind::Outcome {
            self.outcome_lines.push(message.to_string());
        }
    }
}

fn manager(delay_ms: u64) -> EncounterManager<Tally> {
    let content = ContentPack::build_default();
    let mut config = EngineConfig::default();
    config.lifecycle.terminal_delay_ms = delay_ms;
    let stats = Stats { hp: 110, attack: 26, defense: 12, speed: 10, luck: 6 };
    let setup = EncounterSetup {
        seed: 64,
        floor: 5,
        depth: 0,
        boss: content.boss(keys::BOSS_GRAVELORD).expect("gravelord").clone(),
        party: Party::from_heroes(vec![
            Hero::new("a", "Aldo", HeroClass::Paladin, stats),
            Hero::new("b", "Bree", HeroClass::Rogue, stats),
            Hero::new("c", "Cato", HeroClass::Druid, stats),
        ]),
        inventory: Inventory::default(),
        config,
    };
    EncounterManager::new(Encounter::new(setup).expect("setup should build"), Tally::default())
}

#[test]
fn forcing_the_terminal_check_twice_fires_one_victory() {
    let mut manager = manager(1500);
    manager.mutate(|encounter| encounter.set_boss_hp(0));

    assert_eq!(manager.check_terminal(), Some(RunOutcome::Victory));
    assert_eq!(manager.check_terminal(), Some(RunOutcome::Victory));
    for _ in 0..4 {
        manager.tick(Duration::from_millis(500));
    }

    assert_eq!(manager.observer().victories, 1);
    assert_eq!(manager.observer().defeats, 0);
    assert_eq!(manager.observer().outcome_lines.len(), 1);
}

#[test]
fn autopilot_fight_through_the_manager_ends_with_one_callback() {
    let mut manager = manager(0);
    for _ in 0..5_000 {
        if manager.latched().is_some() {
            break;
        }
        if let AdvanceStopReason::AwaitingHeroTurn { slot, .. } = manager.advance(10).stop_reason {
            let actions = suggest_turn(manager.encounter(), slot);
            manager.submit_hero_turn(slot, &actions).expect("autopilot turn should apply");
        }
    }

    let outcome = manager.latched().expect("fight should finish");
    assert_eq!(manager.tick(Duration::ZERO), Some(outcome));
    assert_eq!(manager.tick(Duration::ZERO), None);

    let tally = manager.observer();
    assert_eq!(tally.victories + tally.defeats, 1);
    let last = tally.snapshots.last().expect("state updates were sent");
    assert_eq!(last.finished, Some(outcome));
}

#[test]
fn teardown_before_the_delay_suppresses_the_callback() {
    let mut manager = manager(1500);
    manager.update_roster(|party| {
        for (_, hero) in party.iter_mut() {
            hero.hp = 0;
        }
    });
    assert_eq!(manager.latched(), Some(RunOutcome::Defeat));
    manager.tick(Duration::from_millis(1000));

    let (_, tally) = manager.into_parts();
    assert_eq!(tally.defeats, 0);
}
