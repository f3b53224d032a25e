pub mod actions;
pub mod combat;
pub mod config;
pub mod content;
pub mod cooldowns;
pub mod damage;
pub mod danger;
pub mod effects;
pub mod error;
pub mod inventory;
pub mod journal;
pub mod lifecycle;
pub mod party;
pub mod replay;
pub mod rng;
pub mod scaling;
pub mod types;

pub use actions::{
    ActionOutcome, EffectOutcome, HeroAction, RejectionKind, TurnRejection, TurnReport,
};
pub use combat::{Encounter, EncounterSetup, EncounterSnapshot, suggest_turn};
pub use config::EngineConfig;
pub use content::{BossDefinition, ContentPack};
pub use error::{ConfigError, EncounterError};
pub use inventory::{Consumable, ConsumableStack, Inventory};
pub use journal::{TurnJournal, TurnRecord};
pub use lifecycle::{EncounterManager, EncounterObserver};
pub use party::{Hero, HeroClass, Party, StatAggregator};
pub use replay::*;
pub use types::*;
