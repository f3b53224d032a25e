use crate::actions::HeroAction;

use serde::{Deserialize, Serialize};

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

/// Accepted hero turns in submission order; together with the setup this replays a fight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    pub inputs: Vec<TurnRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub seq: u64,
    pub round: u32,
    pub slot: usize,
    pub actions: Vec<HeroAction>,
}

impl TurnJournal {
    pub fn new(seed: u64) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: env!("CARGO_PKG_VERSION").to_string(),
            seed,
            inputs: Vec::new(),
        }
    }

    pub fn append(&mut self, seq: u64, round: u32, slot: usize, actions: &[HeroAction]) {
        self.inputs.push(TurnRecord { seq, round, slot, actions: actions.to_vec() });
    }
}
