use thiserror::Error;

use crate::{
    AdvanceStopReason, EngineFailureReason, RunOutcome,
    actions::TurnRejection,
    combat::{Encounter, EncounterSetup, suggest_turn},
    error::EncounterError,
    journal::TurnJournal,
};

const ADVANCE_BATCH: u32 = 100;

/// Autopilot runs give up once the fight reaches this many rounds.
pub const AUTOPILOT_ROUND_LIMIT: u32 = 500;

#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error("encounter setup rejected")]
    Setup(#[from] EncounterError),
    #[error("journal seed {journal} does not match setup seed {setup}")]
    SeedMismatch { journal: u64, setup: u64 },
    #[error("journal ran out before the encounter finished (next seq {seq})")]
    MissingInput { seq: u64 },
    #[error("input {seq} is out of sequence (expected {expected})")]
    OutOfSequence { seq: u64, expected: u64 },
    #[error("input {seq} is for slot {found} but slot {expected} is up")]
    UnexpectedSlot { seq: u64, expected: usize, found: usize },
    #[error("input {seq} was rejected")]
    RejectedTurn {
        seq: u64,
        #[source]
        rejection: TurnRejection,
    },
    #[error("engine failure: {0:?}")]
    EngineFailure(EngineFailureReason),
    #[error("no outcome after {round} rounds")]
    RoundLimit { round: u32 },
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    pub final_outcome: RunOutcome,
    pub final_snapshot_hash: u64,
    pub final_round: u32,
}

impl ReplayResult {
    fn from_encounter(encounter: &Encounter, outcome: RunOutcome) -> Self {
        Self {
            final_outcome: outcome,
            final_snapshot_hash: encounter.snapshot_hash(),
            final_round: encounter.round(),
        }
    }
}

/// Rebuilds the encounter from `setup` and feeds it the journal's turns in order.
/// Inputs left over once the encounter has finished are ignored.
pub fn replay_to_end(
    setup: &EncounterSetup,
    journal: &TurnJournal,
) -> Result<ReplayResult, ReplayError> {
    if journal.seed != setup.seed {
        return Err(ReplayError::SeedMismatch { journal: journal.seed, setup: setup.seed });
    }
    let mut encounter = Encounter::new(setup.clone())?;
    let mut input_iter = journal.inputs.iter();

    loop {
        let batch = encounter.advance(ADVANCE_BATCH);

        match batch.stop_reason {
            AdvanceStopReason::Finished(outcome) => {
                return Ok(ReplayResult::from_encounter(&encounter, outcome));
            }
            AdvanceStopReason::AwaitingHeroTurn { slot, .. } => {
                let expected_seq = encounter.next_input_seq();
                let Some(record) = input_iter.next() else {
                    return Err(ReplayError::MissingInput { seq: expected_seq });
                };
                if record.seq != expected_seq {
                    return Err(ReplayError::OutOfSequence {
                        seq: record.seq,
                        expected: expected_seq,
                    });
                }
                if record.slot != slot {
                    return Err(ReplayError::UnexpectedSlot {
                        seq: record.seq,
                        expected: slot,
                        found: record.slot,
                    });
                }
                encounter
                    .submit_hero_turn(slot, &record.actions)
                    .map_err(|rejection| ReplayError::RejectedTurn { seq: record.seq, rejection })?;
            }
            AdvanceStopReason::EngineFailure(reason) => {
                return Err(ReplayError::EngineFailure(reason));
            }
            AdvanceStopReason::BudgetExhausted => {}
        }
    }
}

/// Plays a whole encounter with `suggest_turn` driving every hero and journals each turn.
pub fn play_autopilot(
    setup: &EncounterSetup,
) -> Result<(ReplayResult, TurnJournal), ReplayError> {
    let mut encounter = Encounter::new(setup.clone())?;
    let mut journal = TurnJournal::new(setup.seed);

    loop {
        if encounter.round() >= AUTOPILOT_ROUND_LIMIT {
            return Err(ReplayError::RoundLimit { round: encounter.round() });
        }
        match encounter.advance(ADVANCE_BATCH).stop_reason {
            AdvanceStopReason::Finished(outcome) => {
                return Ok((ReplayResult::from_encounter(&encounter, outcome), journal));
            }
            AdvanceStopReason::AwaitingHeroTurn { slot, round } => {
                let seq = encounter.next_input_seq();
                let actions = suggest_turn(&encounter, slot);
                encounter
                    .submit_hero_turn(slot, &actions)
                    .map_err(|rejection| ReplayError::RejectedTurn { seq, rejection })?;
                journal.append(seq, round, slot, &actions);
            }
            AdvanceStopReason::EngineFailure(reason) => {
                return Err(ReplayError::EngineFailure(reason));
            }
            AdvanceStopReason::BudgetExhausted => {}
        }
    }
}
