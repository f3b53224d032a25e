use serde::{Deserialize, Serialize};

use crate::config::BaseStatTiers;
use crate::inventory::Consumable;
use crate::types::{Stat, StatOverrides, Stats};

pub mod keys {
    pub const PATTERN_STRIKE: &str = "pattern_strike";
    pub const PATTERN_SWEEP: &str = "pattern_sweep";
    pub const PATTERN_FLURRY: &str = "pattern_flurry";

    /// Boss buff whose delta equals the boss's current attack.
    pub const ABILITY_ENRAGE: &str = "enrage";

    pub const BOSS_GRAVELORD: &str = "boss_gravelord";
    pub const BOSS_HOLLOW_MATRIARCH: &str = "boss_hollow_matriarch";
    pub const BOSS_UNMAKER: &str = "boss_unmaker";

    pub const CONSUMABLE_MINOR_POTION: &str = "consumable_minor_potion";
    pub const CONSUMABLE_PHOENIX_FEATHER: &str = "consumable_phoenix_feather";
    pub const CONSUMABLE_ANTIDOTE: &str = "consumable_antidote";
    pub const CONSUMABLE_FIRE_BOMB: &str = "consumable_fire_bomb";
    pub const CONSUMABLE_REGEN_TONIC: &str = "consumable_regen_tonic";
    pub const CONSUMABLE_IRON_DRAUGHT: &str = "consumable_iron_draught";
    pub const CONSUMABLE_HEXING_POWDER: &str = "consumable_hexing_powder";
    pub const CONSUMABLE_TOWN_PORTAL: &str = "consumable_town_portal";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossClass {
    Floor,
    Zone,
    Final,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackShape {
    Single,
    Area,
    Multi,
    Cleave,
}

/// Eligibility predicate for an attack pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum PatternCondition {
    BossHpBelow { ratio: f64 },
    BossHpAbove { ratio: f64 },
    MinLivingHeroes { count: usize },
    MinRound { round: u32 },
    Phase { phase: u8 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackPattern {
    pub id: String,
    pub weight: u32,
    pub shape: AttackShape,
    pub multiplier: f64,
    #[serde(default)]
    pub crit_chance: Option<f64>,
    #[serde(default)]
    pub target_count: Option<u32>,
    #[serde(default)]
    pub condition: Option<PatternCondition>,
}

impl AttackPattern {
    pub fn new(id: &str, weight: u32, shape: AttackShape, multiplier: f64) -> Self {
        Self {
            id: id.to_string(),
            weight,
            shape,
            multiplier,
            crit_chance: None,
            target_count: None,
            condition: None,
        }
    }

    pub fn with_condition(mut self, condition: PatternCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_targets(mut self, count: u32) -> Self {
        self.target_count = Some(count);
        self
    }

    pub fn with_crit(mut self, chance: f64) -> Self {
        self.crit_chance = Some(chance);
        self
    }
}

/// Built-in kit used when a boss definition ships no patterns.
pub fn default_attack_patterns() -> Vec<AttackPattern> {
    vec![
        AttackPattern::new(keys::PATTERN_STRIKE, 50, AttackShape::Single, 1.0),
        AttackPattern::new(keys::PATTERN_SWEEP, 25, AttackShape::Area, 0.8),
        AttackPattern::new(keys::PATTERN_FLURRY, 25, AttackShape::Multi, 0.6).with_targets(3),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "on", rename_all = "snake_case")]
pub enum AbilityTrigger {
    Always,
    OnTurnStart,
    OnHpThreshold { threshold: f64 },
    OnPhaseChange { phase: u8 },
    /// Reserved; never fires.
    OnPlayerAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    SelfOnly,
    Ally,
    AllAllies,
    SingleEnemy,
    AllEnemies,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatScaling {
    pub stat: Stat,
    pub ratio: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSpec {
    Damage {
        amount: i32,
        target: TargetSpec,
        #[serde(default)]
        scaling: Option<StatScaling>,
    },
    Heal {
        amount: i32,
        target: TargetSpec,
    },
    Buff {
        stat: Stat,
        value: i32,
        #[serde(default)]
        duration: Option<u32>,
        target: TargetSpec,
    },
    Debuff {
        stat: Stat,
        value: i32,
        #[serde(default)]
        duration: Option<u32>,
        target: TargetSpec,
    },
    DamageOverTime {
        amount: i32,
        duration: u32,
        target: TargetSpec,
    },
    HealOverTime {
        amount: i32,
        duration: u32,
        target: TargetSpec,
    },
    Revive {
        hp_ratio: f64,
    },
    Cleanse {
        target: TargetSpec,
    },
    Special {
        description: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossAbility {
    pub id: String,
    pub name: String,
    pub cooldown: u32,
    pub trigger: AbilityTrigger,
    pub effects: Vec<EffectSpec>,
    /// Round of the most recent use; `None` until the ability first fires.
    #[serde(skip)]
    pub last_used: Option<u32>,
}

impl BossAbility {
    pub fn new(id: &str, name: &str, cooldown: u32, trigger: AbilityTrigger) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cooldown,
            trigger,
            effects: Vec::new(),
            last_used: None,
        }
    }

    pub fn with_effect(mut self, effect: EffectSpec) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "entries", rename_all = "snake_case")]
pub enum KitChange<T> {
    Replace(Vec<T>),
    Append(Vec<T>),
}

impl<T: Clone> KitChange<T> {
    pub fn apply_to(&self, kit: &mut Vec<T>) {
        match self {
            KitChange::Replace(entries) => *kit = entries.clone(),
            KitChange::Append(entries) => kit.extend(entries.iter().cloned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: u8,
    pub hp_threshold: f64,
    #[serde(default)]
    pub abilities: Option<KitChange<BossAbility>>,
    #[serde(default)]
    pub patterns: Option<KitChange<AttackPattern>>,
    #[serde(default)]
    pub stat_deltas: Option<Stats>,
    #[serde(default)]
    pub on_enter: Vec<BossAbility>,
    #[serde(default)]
    pub passive_heal: Option<f64>,
}

impl Phase {
    pub fn new(phase: u8, hp_threshold: f64) -> Self {
        Self {
            phase,
            hp_threshold,
            abilities: None,
            patterns: None,
            stat_deltas: None,
            on_enter: Vec::new(),
            passive_heal: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossDefinition {
    pub id: String,
    pub name: String,
    pub class: BossClass,
    #[serde(default)]
    pub base_stats: Option<StatOverrides>,
    #[serde(default)]
    pub abilities: Vec<BossAbility>,
    #[serde(default)]
    pub patterns: Vec<AttackPattern>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// Fraction of max HP restored on each boss turn.
    #[serde(default)]
    pub passive_heal: Option<f64>,
}

impl BossDefinition {
    pub fn new(id: &str, name: &str, class: BossClass) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            class,
            base_stats: None,
            abilities: Vec::new(),
            patterns: Vec::new(),
            phases: Vec::new(),
            passive_heal: None,
        }
    }

    pub fn base_stats(&self, tiers: &BaseStatTiers) -> Stats {
        let tier = tiers.for_class(self.class);
        match &self.base_stats {
            Some(overrides) => overrides.apply_to(tier),
            None => tier,
        }
    }

    pub fn attack_patterns(&self) -> Vec<AttackPattern> {
        if self.patterns.is_empty() { default_attack_patterns() } else { self.patterns.clone() }
    }
}

pub struct ContentPack {
    pub bosses: Vec<BossDefinition>,
    pub consumables: Vec<Consumable>,
}

impl ContentPack {
    pub fn build_default() -> Self {
        Self {
            bosses: vec![gravelord(), hollow_matriarch(), unmaker()],
            consumables: vec![
                Consumable::new(keys::CONSUMABLE_MINOR_POTION, "Minor Potion")
                    .with_effect(EffectSpec::Heal { amount: 60, target: TargetSpec::SelfOnly }),
                Consumable::new(keys::CONSUMABLE_PHOENIX_FEATHER, "Phoenix Feather")
                    .with_effect(EffectSpec::Revive { hp_ratio: 0.5 }),
                Consumable::new(keys::CONSUMABLE_ANTIDOTE, "Antidote")
                    .with_effect(EffectSpec::Cleanse { target: TargetSpec::SelfOnly }),
                Consumable::new(keys::CONSUMABLE_FIRE_BOMB, "Fire Bomb")
                    .with_effect(EffectSpec::Damage {
                        amount: 70,
                        target: TargetSpec::AllEnemies,
                        scaling: None,
                    })
                    .with_cooldown(2),
                Consumable::new(keys::CONSUMABLE_REGEN_TONIC, "Regen Tonic").with_effect(
                    EffectSpec::HealOverTime { amount: 15, duration: 3, target: TargetSpec::Ally },
                ),
                Consumable::new(keys::CONSUMABLE_IRON_DRAUGHT, "Iron Draught").with_effect(
                    EffectSpec::Buff {
                        stat: Stat::Defense,
                        value: 10,
                        duration: None,
                        target: TargetSpec::SelfOnly,
                    },
                ),
                Consumable::new(keys::CONSUMABLE_HEXING_POWDER, "Hexing Powder").with_effect(
                    EffectSpec::Debuff {
                        stat: Stat::Attack,
                        value: 8,
                        duration: None,
                        target: TargetSpec::SingleEnemy,
                    },
                ),
                Consumable::new(keys::CONSUMABLE_TOWN_PORTAL, "Town Portal")
                    .with_effect(EffectSpec::Special {
                        description: "a shimmering portal hums uselessly".to_string(),
                    })
                    .out_of_combat_only(),
            ],
        }
    }

    pub fn boss(&self, id: &str) -> Option<&BossDefinition> {
        self.bosses.iter().find(|boss| boss.id == id)
    }

    pub fn consumable(&self, id: &str) -> Option<&Consumable> {
        self.consumables.iter().find(|item| item.id == id)
    }
}

impl Default for ContentPack {
    fn default() -> Self {
        Self::build_default()
    }
}

fn gravelord() -> BossDefinition {
    let mut boss = BossDefinition::new(keys::BOSS_GRAVELORD, "The Gravelord", BossClass::Floor);
    boss.abilities = vec![
        BossAbility::new("bone_shield", "Bone Shield", 4, AbilityTrigger::OnTurnStart).with_effect(
            EffectSpec::Buff { stat: Stat::Defense, value: 8, duration: None, target: TargetSpec::SelfOnly },
        ),
        BossAbility::new("last_rites", "Last Rites", 0, AbilityTrigger::OnHpThreshold { threshold: 0.25 })
            .with_effect(EffectSpec::Heal { amount: 80, target: TargetSpec::SelfOnly }),
    ];
    let mut second = Phase::new(2, 0.5);
    second.abilities = Some(KitChange::Append(vec![
        BossAbility::new(keys::ABILITY_ENRAGE, "Enrage", 5, AbilityTrigger::OnPhaseChange { phase: 2 })
            .with_effect(EffectSpec::Buff {
                stat: Stat::Attack,
                value: 0,
                duration: Some(2),
                target: TargetSpec::SelfOnly,
            }),
    ]));
    second.stat_deltas = Some(Stats { attack: 5, ..Stats::default() });
    second.passive_heal = Some(0.02);
    boss.phases = vec![second];
    boss
}

fn hollow_matriarch() -> BossDefinition {
    let mut boss =
        BossDefinition::new(keys::BOSS_HOLLOW_MATRIARCH, "The Hollow Matriarch", BossClass::Zone);
    boss.patterns = vec![
        AttackPattern::new("lash", 60, AttackShape::Single, 1.1),
        AttackPattern::new("brood_swarm", 30, AttackShape::Multi, 0.5).with_targets(4),
        AttackPattern::new("crushing_coil", 40, AttackShape::Cleave, 1.3)
            .with_condition(PatternCondition::MinLivingHeroes { count: 2 }),
    ];
    boss.abilities = vec![
        BossAbility::new("venom_spray", "Venom Spray", 3, AbilityTrigger::Always).with_effect(
            EffectSpec::DamageOverTime { amount: 8, duration: 3, target: TargetSpec::AllEnemies },
        ),
        BossAbility::new("whisper", "Unsettling Whisper", 0, AbilityTrigger::OnPlayerAction)
            .with_effect(EffectSpec::Special { description: "the hive murmurs".to_string() }),
    ];
    let mut second = Phase::new(2, 0.6);
    second.patterns = Some(KitChange::Append(vec![
        AttackPattern::new("shriek", 40, AttackShape::Area, 1.0).with_crit(0.15),
    ]));
    second.on_enter = vec![
        BossAbility::new("molt", "Molt", 0, AbilityTrigger::OnPhaseChange { phase: 2 })
            .with_effect(EffectSpec::Heal { amount: 60, target: TargetSpec::SelfOnly }),
    ];
    let mut third = Phase::new(3, 0.3);
    third.patterns = Some(KitChange::Replace(vec![
        AttackPattern::new("frenzy", 70, AttackShape::Multi, 0.7).with_targets(3),
        AttackPattern::new("devour", 30, AttackShape::Single, 1.8)
            .with_condition(PatternCondition::BossHpBelow { ratio: 0.2 }),
    ]));
    third.stat_deltas = Some(Stats { attack: 10, speed: 4, defense: -5, ..Stats::default() });
    boss.phases = vec![second, third];
    boss
}

fn unmaker() -> BossDefinition {
    let mut boss = BossDefinition::new(keys::BOSS_UNMAKER, "The Unmaker", BossClass::Final);
    boss.base_stats = Some(StatOverrides { luck: Some(60), ..StatOverrides::default() });
    boss.passive_heal = Some(0.01);
    boss.abilities = vec![
        BossAbility::new("entropy", "Entropy", 2, AbilityTrigger::OnTurnStart).with_effect(
            EffectSpec::Debuff { stat: Stat::Defense, value: 6, duration: None, target: TargetSpec::AllEnemies },
        ),
        BossAbility::new("unmake", "Unmake", 4, AbilityTrigger::Always).with_effect(EffectSpec::Damage {
            amount: 40,
            target: TargetSpec::SingleEnemy,
            scaling: Some(StatScaling { stat: Stat::Attack, ratio: 0.5 }),
        }),
    ];
    let mut second = Phase::new(2, 0.5);
    second.abilities = Some(KitChange::Replace(vec![
        BossAbility::new(keys::ABILITY_ENRAGE, "Enrage", 6, AbilityTrigger::Always).with_effect(
            EffectSpec::Buff { stat: Stat::Attack, value: 0, duration: Some(1), target: TargetSpec::SelfOnly },
        ),
    ]));
    second.passive_heal = Some(0.0);
    boss.phases = vec![second];
    boss
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_list_falls_back_to_three_default_patterns() {
        let boss = BossDefinition::new("plain", "Plain Boss", BossClass::Floor);
        let patterns = boss.attack_patterns();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0].id, keys::PATTERN_STRIKE);
    }

    #[test]
    fn overrides_replace_only_named_stats() {
        let tiers = BaseStatTiers::default();
        let boss = ContentPack::build_default();
        let unmaker = boss.boss(keys::BOSS_UNMAKER).expect("unmaker");
        let stats = unmaker.base_stats(&tiers);
        assert_eq!(stats.luck, 60);
        assert_eq!(stats.attack, tiers.final_boss.attack);
    }

    #[test]
    fn boss_definitions_deserialize_from_authored_json() {
        let json = r#"{
            "id": "slime_king",
            "name": "Slime King",
            "class": "zone",
            "base_stats": { "hp": 900 },
            "patterns": [
                { "id": "splat", "weight": 3, "shape": "area", "multiplier": 0.9,
                  "condition": { "when": "min_round", "round": 2 } }
            ],
            "abilities": [
                { "id": "ooze", "name": "Ooze", "cooldown": 2,
                  "trigger": { "on": "on_hp_threshold", "threshold": 0.4 },
                  "effects": [ { "kind": "heal", "amount": 50, "target": "self_only" } ] }
            ],
            "phases": [
                { "phase": 2, "hp_threshold": 0.5,
                  "patterns": { "mode": "append", "entries": [] } }
            ]
        }"#;
        let boss: BossDefinition = serde_json::from_str(json).expect("boss json should parse");
        assert_eq!(boss.class, BossClass::Zone);
        assert_eq!(boss.base_stats(&BaseStatTiers::default()).hp, 900);
        assert_eq!(
            boss.patterns[0].condition,
            Some(PatternCondition::MinRound { round: 2 })
        );
        assert_eq!(boss.abilities[0].last_used, None);
        assert!(matches!(boss.phases[0].patterns, Some(KitChange::Append(_))));
    }
}
