//! Turn loop and stop-reason handling for the encounter.

use super::*;

impl Encounter {
    /// Runs boss turns and round ends until a hero must act, the fight ends,
    /// or `max_turns` boss turns have been simulated.
    pub fn advance(&mut self, max_turns: u32) -> AdvanceResult {
        let mut turns = 0;
        if let Some(outcome) = self.finished_outcome {
            return AdvanceResult {
                simulated_turns: 0,
                stop_reason: AdvanceStopReason::Finished(outcome),
            };
        }
        if let Some(outcome) = self.check_terminal() {
            return AdvanceResult {
                simulated_turns: 0,
                stop_reason: AdvanceStopReason::Finished(outcome),
            };
        }
        if let Some(slot) = self.pending_hero {
            if self.party.is_alive(slot) {
                return AdvanceResult {
                    simulated_turns: 0,
                    stop_reason: AdvanceStopReason::AwaitingHeroTurn { slot, round: self.round },
                };
            }
            // Fell or left the roster while their turn was open.
            self.pending_hero = None;
            self.log.push(CombatEvent::TurnSkipped { combatant: CombatantId::Hero(slot) });
            self.cursor += 1;
        }

        while turns < max_turns {
            if self.cursor >= self.turn_order.len() {
                self.end_round();
                if let Some(outcome) = self.check_terminal() {
                    return AdvanceResult {
                        simulated_turns: turns,
                        stop_reason: AdvanceStopReason::Finished(outcome),
                    };
                }
                if self.turn_order.is_empty() {
                    return self.engine_failure(turns, EngineFailureReason::EmptyTurnOrder);
                }
                continue;
            }

            let combatant = self.turn_order[self.cursor];
            if !self.is_alive(combatant.id) {
                self.log.push(CombatEvent::TurnSkipped { combatant: combatant.id });
                self.cursor += 1;
                continue;
            }

            match combatant.id {
                CombatantId::Boss => {
                    if let Err(reason) = self.run_boss_turn() {
                        return self.engine_failure(turns, reason);
                    }
                    self.cursor += 1;
                    turns += 1;
                    if let Some(outcome) = self.check_terminal() {
                        return AdvanceResult {
                            simulated_turns: turns,
                            stop_reason: AdvanceStopReason::Finished(outcome),
                        };
                    }
                }
                CombatantId::Hero(slot) => {
                    self.pending_hero = Some(slot);
                    return AdvanceResult {
                        simulated_turns: turns,
                        stop_reason: AdvanceStopReason::AwaitingHeroTurn {
                            slot,
                            round: self.round,
                        },
                    };
                }
            }
        }
        AdvanceResult { simulated_turns: turns, stop_reason: AdvanceStopReason::BudgetExhausted }
    }

    /// Phase check, passive heal, ability triggers, then the basic attack.
    fn run_boss_turn(&mut self) -> Result<(), EngineFailureReason> {
        self.check_phase_transition();
        self.apply_passive_heal();
        self.trigger_boss_abilities();
        if !self.party.any_alive() {
            return Ok(());
        }
        self.execute_attack_pattern()
    }

    /// Latches victory (checked first) or defeat. Repeated calls return the latched
    /// outcome without logging again.
    pub fn check_terminal(&mut self) -> Option<RunOutcome> {
        if self.finished_outcome.is_some() {
            return self.finished_outcome;
        }
        let outcome = if !self.boss.is_alive() {
            RunOutcome::Victory
        } else if !self.party.any_alive() {
            RunOutcome::Defeat
        } else {
            return None;
        };
        self.finished_outcome = Some(outcome);
        self.pending_hero = None;
        tracing::info!(boss = %self.boss.id, round = self.round, ?outcome, "encounter finished");
        self.log.push(CombatEvent::Finished { outcome });
        Some(outcome)
    }

    fn engine_failure(&self, turns: u32, reason: EngineFailureReason) -> AdvanceResult {
        tracing::warn!(boss = %self.boss.id, ?reason, "encounter cannot continue");
        AdvanceResult { simulated_turns: turns, stop_reason: AdvanceStopReason::EngineFailure(reason) }
    }
}
