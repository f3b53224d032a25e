use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of party slots in a hero roster.
pub const PARTY_SIZE: usize = 4;
/// Party slots below this index fight in the frontline.
pub const FRONTLINE_SLOTS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatantId {
    Boss,
    Hero(usize),
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatantId::Boss => write!(f, "boss"),
            CombatantId::Hero(slot) => write!(f, "hero#{slot}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Hero,
    Boss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub kind: CombatantKind,
    pub speed: i32,
    pub alive: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    Speed,
    Luck,
}

impl Stat {
    pub const ALL: [Stat; 5] = [Stat::Hp, Stat::Attack, Stat::Defense, Stat::Speed, Stat::Luck];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub luck: i32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::Speed => self.speed,
            Stat::Luck => self.luck,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Attack => &mut self.attack,
            Stat::Defense => &mut self.defense,
            Stat::Speed => &mut self.speed,
            Stat::Luck => &mut self.luck,
        }
    }

    pub fn plus(&self, other: &Stats) -> Stats {
        Stats {
            hp: self.hp.saturating_add(other.hp),
            attack: self.attack.saturating_add(other.attack),
            defense: self.defense.saturating_add(other.defense),
            speed: self.speed.saturating_add(other.speed),
            luck: self.luck.saturating_add(other.luck),
        }
    }

    pub fn clamped_non_negative(&self) -> Stats {
        Stats {
            hp: self.hp.max(0),
            attack: self.attack.max(0),
            defense: self.defense.max(0),
            speed: self.speed.max(0),
            luck: self.luck.max(0),
        }
    }
}

/// Partial stat override; `None` keeps the tier default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    pub hp: Option<i32>,
    pub attack: Option<i32>,
    pub defense: Option<i32>,
    pub speed: Option<i32>,
    pub luck: Option<i32>,
}

impl StatOverrides {
    pub fn apply_to(&self, base: Stats) -> Stats {
        Stats {
            hp: self.hp.unwrap_or(base.hp),
            attack: self.attack.unwrap_or(base.attack),
            defense: self.defense.unwrap_or(base.defense),
            speed: self.speed.unwrap_or(base.speed),
            luck: self.luck.unwrap_or(base.luck),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineFailureReason {
    NoAttackPatterns,
    EmptyTurnOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AdvanceStopReason {
    AwaitingHeroTurn { slot: usize, round: u32 },
    Finished(RunOutcome),
    BudgetExhausted,
    EngineFailure(EngineFailureReason),
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdvanceResult {
    pub simulated_turns: u32,
    pub stop_reason: AdvanceStopReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogKind {
    Round,
    Attack,
    Ability,
    Phase,
    Status,
    Item,
    Outcome,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    RoundStarted { round: u32, order: Vec<CombatantId> },
    TurnSkipped { combatant: CombatantId },
    PhaseChanged { from: u8, to: u8 },
    PassiveHeal { amount: i32 },
    AbilityUsed { actor: CombatantId, ability: String },
    PatternChosen { pattern: String, fallback: bool },
    AttackResolved { attacker: CombatantId, target: CombatantId, damage: i32, crit: bool, dodged: bool },
    Damaged { source: CombatantId, target: CombatantId, amount: i32 },
    Healed { target: CombatantId, amount: i32 },
    EffectApplied { target: CombatantId, effect: String, stat: Option<Stat>, value: i32 },
    EffectExpired { target: CombatantId, effect: String },
    StatusTick { target: CombatantId, effect: String, amount: i32 },
    Revived { target: CombatantId, hp: i32 },
    Cleansed { target: CombatantId, removed: usize },
    Defended { hero: CombatantId, bonus: i32 },
    Fled { hero: CombatantId },
    ItemUsed { hero: CombatantId, item: String, remaining: u32 },
    NoEffect { actor: CombatantId, reason: String },
    Special { actor: CombatantId, description: String },
    Fell { combatant: CombatantId },
    Finished { outcome: RunOutcome },
}

impl CombatEvent {
    pub fn kind(&self) -> LogKind {
        match self {
            CombatEvent::RoundStarted { .. } | CombatEvent::TurnSkipped { .. } => LogKind::Round,
            CombatEvent::PatternChosen { .. }
            | CombatEvent::AttackResolved { .. }
            | CombatEvent::Damaged { .. }
            | CombatEvent::Defended { .. }
            | CombatEvent::Fled { .. }
            | CombatEvent::Fell { .. } => LogKind::Attack,
            CombatEvent::AbilityUsed { .. }
            | CombatEvent::Healed { .. }
            | CombatEvent::Revived { .. }
            | CombatEvent::Special { .. }
            | CombatEvent::NoEffect { .. } => LogKind::Ability,
            CombatEvent::PhaseChanged { .. } | CombatEvent::PassiveHeal { .. } => LogKind::Phase,
            CombatEvent::EffectApplied { .. }
            | CombatEvent::EffectExpired { .. }
            | CombatEvent::StatusTick { .. }
            | CombatEvent::Cleansed { .. } => LogKind::Status,
            CombatEvent::ItemUsed { .. } => LogKind::Item,
            CombatEvent::Finished { .. } => LogKind::Outcome,
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombatEvent::RoundStarted { round, order } => {
                write!(f, "round {round} begins with {} combatants", order.len())
            }
            CombatEvent::TurnSkipped { combatant } => write!(f, "{combatant} cannot act"),
            CombatEvent::PhaseChanged { from, to } => write!(f, "boss enters phase {to} (was {from})"),
            CombatEvent::PassiveHeal { amount } => write!(f, "boss regenerates {amount} HP"),
            CombatEvent::AbilityUsed { actor, ability } => write!(f, "{actor} uses {ability}"),
            CombatEvent::PatternChosen { pattern, .. } => write!(f, "boss prepares {pattern}"),
            CombatEvent::AttackResolved { attacker, target, damage, crit, dodged } => {
                if *dodged {
                    write!(f, "{target} dodges {attacker}")
                } else if *crit {
                    write!(f, "{attacker} critically hits {target} for {damage}")
                } else {
                    write!(f, "{attacker} hits {target} for {damage}")
                }
            }
            CombatEvent::Damaged { source, target, amount } => {
                write!(f, "{source} deals {amount} damage to {target}")
            }
            CombatEvent::Healed { target, amount } => write!(f, "{target} recovers {amount} HP"),
            CombatEvent::EffectApplied { target, effect, value, .. } => {
                write!(f, "{target} gains {effect} ({value:+})")
            }
            CombatEvent::EffectExpired { target, effect } => write!(f, "{effect} fades from {target}"),
            CombatEvent::StatusTick { target, effect, amount } => {
                write!(f, "{effect} ticks on {target} ({amount:+})")
            }
            CombatEvent::Revived { target, hp } => write!(f, "{target} is revived with {hp} HP"),
            CombatEvent::Cleansed { target, removed } => {
                write!(f, "{target} is cleansed of {removed} effects")
            }
            CombatEvent::Defended { hero, bonus } => write!(f, "{hero} braces (+{bonus} defense)"),
            CombatEvent::Fled { hero } => write!(f, "{hero} flees the turn"),
            CombatEvent::ItemUsed { hero, item, remaining } => {
                write!(f, "{hero} uses {item} ({remaining} left)")
            }
            CombatEvent::NoEffect { actor, reason } => write!(f, "{actor}: {reason}"),
            CombatEvent::Special { actor, description } => write!(f, "{actor}: {description}"),
            CombatEvent::Fell { combatant } => write!(f, "{combatant} falls"),
            CombatEvent::Finished { outcome } => write!(f, "encounter finished: {outcome:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_deltas_saturate_at_the_integer_limits() {
        let base = Stats { hp: 100, attack: i32::MAX - 1, defense: 10, speed: 5, luck: i32::MIN + 1 };
        let delta = Stats { hp: 5, attack: 10, defense: -20, speed: 0, luck: -10 };
        let sum = base.plus(&delta);
        assert_eq!(sum.attack, i32::MAX);
        assert_eq!(sum.luck, i32::MIN);
        assert_eq!(sum.hp, 105);
        assert_eq!(sum.clamped_non_negative().defense, 0);
    }
}
