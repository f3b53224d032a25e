//! Hero turn vocabulary: intents, the action-cost economy, and structured results.
//! This module exists to validate a turn's shape before anything touches encounter state.
//! It does not own action execution; see `combat::hero_turn`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ActionEconomy;
use crate::types::RunOutcome;

const COST_TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HeroAction {
    Attack,
    Defend,
    Ability { id: String },
    Item { slot: usize },
    Flee,
}

impl HeroAction {
    pub fn is_main(&self) -> bool {
        !matches!(self, HeroAction::Item { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    MultipleMainActions,
    BudgetExceeded,
    FleeNotAlone,
    UnknownAbility,
    AbilityOnCooldown,
    EmptyItemSlot,
    ItemNotCombatUsable,
    ItemOnCooldown,
    NoPendingTurn,
    WrongHero,
    HeroFallen,
    EncounterFinished,
}

/// Why a submitted hero turn was refused. Nothing from the turn has been applied.
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{reason}")]
pub struct TurnRejection {
    pub kind: RejectionKind,
    pub action_index: Option<usize>,
    pub reason: String,
}

impl TurnRejection {
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self { kind, action_index: None, reason: reason.into() }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.action_index = Some(index);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectOutcome {
    Applied,
    NoOp { reason: String },
}

impl EffectOutcome {
    pub fn no_op(reason: impl Into<String>) -> Self {
        EffectOutcome::NoOp { reason: reason.into() }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, EffectOutcome::NoOp { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Attacked { damage: i32, crit: bool, dodged: bool },
    Defended { bonus: i32 },
    AbilityUsed { ability: String, effects: Vec<EffectOutcome> },
    ItemUsed { item: String, remaining: u32, effects: Vec<EffectOutcome> },
    Fled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub slot: usize,
    pub round: u32,
    pub cost: f64,
    pub outcomes: Vec<ActionOutcome>,
    pub finished: Option<RunOutcome>,
}

pub fn action_cost(action: &HeroAction, revive_item: bool, economy: &ActionEconomy) -> f64 {
    match action {
        HeroAction::Item { .. } if revive_item => economy.revive_item_cost,
        HeroAction::Item { .. } => economy.item_cost,
        _ => economy.main_action_cost,
    }
}

/// Checks main-action count, flee exclusivity and the cost budget.
/// `is_revive_item` reports whether the consumable in an inventory slot revives.
/// Returns the total cost of an accepted list.
pub fn check_economy(
    actions: &[HeroAction],
    is_revive_item: impl Fn(usize) -> bool,
    economy: &ActionEconomy,
) -> Result<f64, TurnRejection> {
    if let Some(index) = actions.iter().position(|action| *action == HeroAction::Flee)
        && actions.len() > 1
    {
        return Err(TurnRejection::new(
            RejectionKind::FleeNotAlone,
            "flee must be the only action of the turn",
        )
        .at(index));
    }

    let mut mains = 0;
    let mut total = 0.0;
    for (index, action) in actions.iter().enumerate() {
        if action.is_main() {
            mains += 1;
            if mains > 1 {
                return Err(TurnRejection::new(
                    RejectionKind::MultipleMainActions,
                    "only one attack, defend, ability or flee per turn",
                )
                .at(index));
            }
        }
        let revive = match action {
            HeroAction::Item { slot } => is_revive_item(*slot),
            _ => false,
        };
        total += action_cost(action, revive, economy);
        if total > economy.turn_budget + COST_TOLERANCE {
            return Err(TurnRejection::new(
                RejectionKind::BudgetExceeded,
                format!("turn costs {total:.2}, budget is {:.2}", economy.turn_budget),
            )
            .at(index));
        }
    }
    Ok(total)
}
