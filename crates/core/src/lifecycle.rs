//! Owner-facing wrapper around one `Encounter`.
//! This module exists to give callers a single mutation entry point, narrate the combat log
//! to an observer and deliver the terminal callback after a fixed, cancellable delay.
//! It does not own combat rules; everything it changes goes through `Encounter` methods.

use std::time::Duration;

use crate::actions::{HeroAction, TurnRejection, TurnReport};
use crate::combat::{Encounter, EncounterSnapshot};
use crate::party::Party;
use crate::types::{AdvanceResult, LogKind, RunOutcome};

/// Receives encounter notifications. Every method defaults to doing nothing.
pub trait EncounterObserver {
    fn on_victory(&mut self) {}
    fn on_defeat(&mut self) {}
    fn on_state_update(&mut self, _snapshot: &EncounterSnapshot) {}
    fn on_log(&mut self, _kind: LogKind, _message: &str) {}
}

impl EncounterObserver for () {}

/// Terminal callback waiting out its delay. Dropping it unfired cancels it.
#[derive(Debug)]
struct DeferredCallback {
    outcome: RunOutcome,
    remaining: Duration,
    fired: bool,
}

impl DeferredCallback {
    fn new(outcome: RunOutcome, delay: Duration) -> Self {
        Self { outcome, remaining: delay, fired: false }
    }

    /// Counts `elapsed` off the delay; true once the callback is due.
    fn elapse(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.remaining.is_zero()
    }
}

impl Drop for DeferredCallback {
    fn drop(&mut self) {
        if !self.fired {
            tracing::debug!(outcome = ?self.outcome, "terminal callback cancelled");
        }
    }
}

pub struct EncounterManager<O: EncounterObserver> {
    encounter: Encounter,
    observer: O,
    narrated: usize,
    latched: Option<RunOutcome>,
    pending: Option<DeferredCallback>,
}

impl<O: EncounterObserver> EncounterManager<O> {
    pub fn new(encounter: Encounter, observer: O) -> Self {
        Self { encounter, observer, narrated: 0, latched: None, pending: None }
    }

    pub fn snapshot(&self) -> EncounterSnapshot {
        self.encounter.snapshot()
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Outcome latched by this manager, if any.
    pub fn latched(&self) -> Option<RunOutcome> {
        self.latched
    }

    pub fn callback_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The one way to change the wrapped encounter. Terminal conditions are re-evaluated
    /// and the observer sees the new log lines and a fresh snapshot afterwards.
    pub fn mutate<R>(&mut self, change: impl FnOnce(&mut Encounter) -> R) -> R {
        let result = change(&mut self.encounter);
        self.check_terminal();
        let snapshot = self.encounter.snapshot();
        self.observer.on_state_update(&snapshot);
        result
    }

    pub fn advance(&mut self, max_turns: u32) -> AdvanceResult {
        self.mutate(|encounter| encounter.advance(max_turns))
    }

    pub fn submit_hero_turn(
        &mut self,
        slot: usize,
        actions: &[HeroAction],
    ) -> Result<TurnReport, TurnRejection> {
        self.mutate(|encounter| encounter.submit_hero_turn(slot, actions))
    }

    pub fn update_roster(&mut self, update: impl FnOnce(&mut Party)) {
        self.mutate(|encounter| encounter.update_roster(update));
    }

    /// Latches the outcome the first time the encounter reports one and schedules the
    /// victory or defeat callback. Later calls return the latched outcome unchanged.
    pub fn check_terminal(&mut self) -> Option<RunOutcome> {
        if self.latched.is_none()
            && let Some(outcome) = self.encounter.check_terminal()
        {
            let delay = Duration::from_millis(self.encounter.config().lifecycle.terminal_delay_ms);
            tracing::info!(?outcome, delay_ms = delay.as_millis() as u64, "outcome latched");
            self.latched = Some(outcome);
            self.pending = Some(DeferredCallback::new(outcome, delay));
        }
        self.narrate();
        self.latched
    }

    /// Moves the callback clock forward. Returns the outcome if its callback fired now.
    pub fn tick(&mut self, elapsed: Duration) -> Option<RunOutcome> {
        let due = self.pending.as_mut().is_some_and(|pending| pending.elapse(elapsed));
        if !due {
            return None;
        }
        let mut pending = self.pending.take()?;
        pending.fired = true;
        match pending.outcome {
            RunOutcome::Victory => self.observer.on_victory(),
            RunOutcome::Defeat => self.observer.on_defeat(),
        }
        Some(pending.outcome)
    }

    /// Drops the scheduled callback. Returns whether one was pending.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn into_parts(self) -> (Encounter, O) {
        (self.encounter, self.observer)
    }

    fn narrate(&mut self) {
        let log = self.encounter.log();
        for event in log.iter().skip(self.narrated) {
            self.observer.on_log(event.kind(), &event.to_string());
        }
        self.narrated = log.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::EncounterSetup;
    use crate::config::EngineConfig;
    use crate::content::{AttackPattern, AttackShape, BossClass, BossDefinition};
    use crate::inventory::Inventory;
    use crate::party::{Hero, HeroClass};
    use crate::types::Stats;

    #[derive(Default)]
    struct Recorder {
        victories: u32,
        defeats: u32,
        updates: u32,
        lines: Vec<(LogKind, String)>,
    }

    impl EncounterObserver for Recorder {
        fn on_victory(&mut self) {
            self.victories += 1;
        }

        fn on_defeat(&mut self) {
            self.defeats += 1;
        }

        fn on_state_update(&mut self, _snapshot: &EncounterSnapshot) {
            self.updates += 1;
        }

        fn on_log(&mut self, kind: LogKind, message: &str) {
            self.lines.push((kind, message.to_string()));
        }
    }

    fn manager() -> EncounterManager<Recorder> {
        let mut boss = BossDefinition::new("warden", "Warden", BossClass::Floor);
        boss.patterns = vec![AttackPattern::new("slam", 1, AttackShape::Single, 1.0)];
        let stats = Stats { hp: 100, attack: 20, defense: 5, speed: 10, luck: 5 };
        let party = Party::from_heroes(vec![
            Hero::new("tank", "Tank", HeroClass::Warrior, stats),
            Hero::new("healer", "Healer", HeroClass::Cleric, stats),
        ]);
        let setup = EncounterSetup {
            seed: 11,
            floor: 4,
            depth: 0,
            boss,
            party,
            inventory: Inventory::default(),
            config: EngineConfig::default(),
        };
        let encounter = Encounter::new(setup).expect("encounter should build");
        EncounterManager::new(encounter, Recorder::default())
    }

    #[test]
    fn victory_callback_fires_once_after_the_delay() {
        let mut manager = manager();
        manager.mutate(|encounter| encounter.set_boss_hp(0));
        manager.mutate(|encounter| encounter.set_boss_hp(0));
        assert_eq!(manager.check_terminal(), Some(RunOutcome::Victory));
        assert!(manager.callback_pending());

        assert_eq!(manager.tick(Duration::from_millis(1000)), None);
        assert_eq!(manager.observer().victories, 0);
        assert_eq!(manager.tick(Duration::from_millis(500)), Some(RunOutcome::Victory));
        assert_eq!(manager.tick(Duration::from_secs(10)), None);

        assert_eq!(manager.observer().victories, 1);
        assert_eq!(manager.observer().defeats, 0);
        assert_eq!(manager.latched(), Some(RunOutcome::Victory));
    }

    #[test]
    fn defeat_is_latched_when_the_roster_falls() {
        let mut manager = manager();
        manager.update_roster(|party| {
            for (_, hero) in party.iter_mut() {
                hero.hp = 0;
            }
        });
        assert_eq!(manager.latched(), Some(RunOutcome::Defeat));
        manager.tick(Duration::from_secs(2));
        assert_eq!(manager.observer().defeats, 1);
    }

    #[test]
    fn cancelled_callbacks_never_fire() {
        let mut manager = manager();
        manager.mutate(|encounter| encounter.set_boss_hp(0));
        assert!(manager.cancel_pending());
        assert!(!manager.cancel_pending());
        assert_eq!(manager.tick(Duration::from_secs(5)), None);
        assert_eq!(manager.observer().victories, 0);
    }

    #[test]
    fn dropping_the_manager_drops_the_callback() {
        let mut manager = manager();
        manager.mutate(|encounter| encounter.set_boss_hp(0));
        let (encounter, recorder) = manager.into_parts();
        assert_eq!(encounter.finished_outcome(), Some(RunOutcome::Victory));
        assert_eq!(recorder.victories, 0);
    }

    #[test]
    fn every_mutation_narrates_new_log_lines_once() {
        let mut manager = manager();
        manager.advance(1);
        let after_first = manager.observer().lines.len();
        assert!(after_first > 0);
        assert!(manager.observer().lines.iter().any(|(kind, _)| *kind == LogKind::Round));

        manager.mutate(|_| ());
        assert_eq!(manager.observer().lines.len(), after_first);
        assert_eq!(manager.observer().updates, 2);
    }
}
