use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use encounter::content::keys;
use encounter::inventory::ConsumableStack;
use encounter::replay::{play_autopilot, replay_to_end};
use encounter::{
    ContentPack, EncounterSetup, EngineConfig, Hero, HeroClass, Inventory, Party, ReplayResult,
    Stats, TurnJournal,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play an encounter with the built-in hero policy
    Simulate {
        /// Path to the encounter setup JSON file
        #[arg(short, long)]
        setup: PathBuf,
        /// Optional engine config TOML, replacing the setup's config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where to write the journal of hero turns
        #[arg(short, long)]
        journal_out: Option<PathBuf>,
    },
    /// Replay a journal against the setup it was recorded from
    Replay {
        #[arg(short, long)]
        setup: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Path to the journal JSON file to replay
        #[arg(short, long)]
        journal: PathBuf,
    },
    /// Print a starter setup JSON for one of the built-in bosses
    Sample {
        #[arg(short, long, default_value = keys::BOSS_GRAVELORD)]
        boss: String,
        #[arg(short, long, default_value_t = 5)]
        floor: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Args::parse().command {
        Command::Simulate { setup, config, journal_out } => {
            let result = simulate(&setup, config.as_deref(), journal_out.as_deref())?;
            println!("Simulation complete.");
            print_result(&result);
        }
        Command::Replay { setup, config, journal } => {
            let result = replay(&setup, config.as_deref(), &journal)?;
            println!("Replay complete.");
            print_result(&result);
        }
        Command::Sample { boss, floor, seed } => {
            let setup = sample_setup(&boss, floor, seed)?;
            println!("{}", serde_json::to_string_pretty(&setup)?);
        }
    }
    Ok(())
}

fn print_result(result: &ReplayResult) {
    println!("Final Round: {}", result.final_round);
    println!("Outcome: {:?}", result.final_outcome);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);
}

fn load_setup(path: &Path, config: Option<&Path>) -> Result<EncounterSetup> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read setup file: {}", path.display()))?;
    let mut setup: EncounterSetup =
        serde_json::from_str(&text).with_context(|| "Failed to deserialize setup JSON")?;
    if let Some(config_path) = config {
        setup.config = EngineConfig::load(config_path)
            .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    }
    Ok(setup)
}

fn simulate(setup: &Path, config: Option<&Path>, journal_out: Option<&Path>) -> Result<ReplayResult> {
    let setup = load_setup(setup, config)?;
    let (result, journal) = play_autopilot(&setup).context("Simulation failed")?;
    tracing::info!(turns = journal.inputs.len(), outcome = ?result.final_outcome, "simulated");

    if let Some(path) = journal_out {
        let text = serde_json::to_string_pretty(&journal)?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write journal: {}", path.display()))?;
    }
    Ok(result)
}

fn replay(setup: &Path, config: Option<&Path>, journal: &Path) -> Result<ReplayResult> {
    let setup = load_setup(setup, config)?;
    let journal_data = fs::read_to_string(journal)
        .with_context(|| format!("Failed to read journal file: {}", journal.display()))?;
    let journal: TurnJournal = serde_json::from_str(&journal_data)
        .with_context(|| "Failed to deserialize journal JSON")?;

    replay_to_end(&setup, &journal).context("Replay failed during execution")
}

fn sample_setup(boss_id: &str, floor: u32, seed: u64) -> Result<EncounterSetup> {
    let content = ContentPack::build_default();
    let boss = content.boss(boss_id).ok_or_else(|| anyhow!("unknown boss: {boss_id}"))?.clone();
    let hero = |id: &str, class, hp, speed| {
        Hero::new(id, id, class, Stats { hp, attack: 28, defense: 12, speed, luck: 6 })
    };
    let party = Party::from_heroes(vec![
        hero("Garrick", HeroClass::Warrior, 140, 9),
        hero("Nim", HeroClass::Rogue, 95, 15),
        hero("Oriel", HeroClass::Cleric, 85, 10),
        hero("Pell", HeroClass::Mage, 80, 12),
    ]);
    let stacks = [(keys::CONSUMABLE_MINOR_POTION, 3), (keys::CONSUMABLE_PHOENIX_FEATHER, 1)]
        .into_iter()
        .map(|(id, quantity)| {
            let item = content.consumable(id).ok_or_else(|| anyhow!("unknown consumable: {id}"))?;
            Ok(ConsumableStack { item: item.clone(), quantity })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EncounterSetup {
        seed,
        floor,
        depth: 0,
        boss,
        party,
        inventory: Inventory::from_stacks(stacks),
        config: EngineConfig::default(),
    })
}
