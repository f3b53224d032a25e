use anyhow::{Result, bail};
use clap::Parser;
use encounter::inventory::ConsumableStack;
use encounter::{
    AdvanceStopReason, ContentPack, Encounter, EncounterSetup, EngineConfig, Hero, HeroAction,
    HeroClass, Inventory, Party, RunOutcome, Stats, suggest_turn,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of encounters to run, each seeded from the previous one
    #[arg(short, long, default_value_t = 50)]
    runs: u32,
    #[arg(short, long, default_value_t = 5000)]
    turns: u32,
}

const CLASSES: [HeroClass; 8] = [
    HeroClass::Warrior,
    HeroClass::Paladin,
    HeroClass::Rogue,
    HeroClass::Ranger,
    HeroClass::Mage,
    HeroClass::Cleric,
    HeroClass::Druid,
    HeroClass::Bard,
];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn roll(rng: &mut ChaCha8Rng, low: i32, span: u64) -> i32 {
    low + (rng.next_u64() % span) as i32
}

fn random_setup(rng: &mut ChaCha8Rng) -> EncounterSetup {
    let content = ContentPack::build_default();
    let heroes = (0..1 + rng.next_u64() % 4)
        .map(|slot| {
            let id = format!("fuzz{slot}");
            let stats = Stats {
                hp: roll(rng, 30, 150),
                attack: roll(rng, 8, 40),
                defense: roll(rng, 0, 25),
                speed: roll(rng, 1, 25),
                luck: roll(rng, 0, 20),
            };
            Hero::new(&id, &id, choose(rng, &CLASSES), stats)
        })
        .collect();
    let stacks = content
        .consumables
        .iter()
        .filter_map(|item| {
            let quantity = (rng.next_u64() % 5) as u32;
            (quantity > 0).then(|| ConsumableStack { item: item.clone(), quantity })
        })
        .collect();
    EncounterSetup {
        seed: rng.next_u64(),
        floor: 1 + (rng.next_u64() % 100) as u32,
        depth: (rng.next_u64() % 20) as u32,
        boss: choose(rng, &content.bosses),
        party: Party::from_heroes(heroes),
        inventory: Inventory::from_stacks(stacks),
        config: EngineConfig::default(),
    }
}

fn random_turn(rng: &mut ChaCha8Rng, encounter: &Encounter, slot: usize) -> Vec<HeroAction> {
    match rng.next_u64() % 5 {
        0 => vec![HeroAction::Defend],
        1 => vec![HeroAction::Item { slot: (rng.next_u64() % 8) as usize }, HeroAction::Attack],
        2 => vec![HeroAction::Attack, HeroAction::Attack],
        _ => suggest_turn(encounter, slot),
    }
}

fn check_invariants(encounter: &Encounter, max_hp: i32) -> Result<()> {
    let boss = encounter.boss();
    if boss.max_hp() != max_hp {
        bail!("Invariant failed: boss max HP changed from {max_hp} to {}", boss.max_hp());
    }
    if boss.hp() < 0 || boss.hp() > max_hp {
        bail!("Invariant failed: boss HP {} outside [0, {max_hp}]", boss.hp());
    }
    for (slot, hero) in encounter.party().iter() {
        if hero.hp < 0 || hero.hp > hero.max_hp {
            bail!("Invariant failed: hero {slot} HP > Max HP");
        }
        if hero.alive != (hero.hp > 0) {
            bail!("Invariant failed: hero {slot} alive flag disagrees with HP {}", hero.hp);
        }
    }
    Ok(())
}

/// Runs one random encounter; returns its outcome, or `None` if the turn cap was hit first.
fn run_one(rng: &mut ChaCha8Rng, max_turns: u32) -> Result<Option<RunOutcome>> {
    let setup = random_setup(rng);
    let mut encounter = Encounter::new(setup)?;
    let max_hp = encounter.boss().max_hp();

    let mut total_steps = 0;
    while total_steps < max_turns {
        let result = encounter.advance(10);
        total_steps += result.simulated_turns.max(1);

        match result.stop_reason {
            AdvanceStopReason::Finished(outcome) => return Ok(Some(outcome)),
            AdvanceStopReason::AwaitingHeroTurn { slot, .. } => {
                let actions = random_turn(rng, &encounter, slot);
                let before = encounter.snapshot_hash();
                if let Err(rejection) = encounter.submit_hero_turn(slot, &actions) {
                    if encounter.snapshot_hash() != before {
                        bail!("Invariant failed: rejected turn ({rejection}) changed state");
                    }
                    let fallback = suggest_turn(&encounter, slot);
                    encounter.submit_hero_turn(slot, &fallback)?;
                }
            }
            AdvanceStopReason::EngineFailure(reason) => {
                bail!("Invariant failed: engine failure {reason:?}");
            }
            AdvanceStopReason::BudgetExhausted => {}
        }

        check_invariants(&encounter, max_hp)?;
    }
    Ok(None)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let (mut victories, mut defeats, mut capped) = (0, 0, 0);
    for run in 0..args.runs {
        match run_one(&mut rng, args.turns) {
            Ok(Some(RunOutcome::Victory)) => victories += 1,
            Ok(Some(RunOutcome::Defeat)) => defeats += 1,
            Ok(None) => capped += 1,
            Err(err) => bail!("run {run} failed: {err:#}"),
        }
    }

    println!("Fuzzing completed successfully.");
    println!("Victories: {victories}, Defeats: {defeats}, Hit turn cap: {capped}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::{
        arbitrary::any,
        test_runner::{Config as ProptestConfig, TestCaseError, TestRunner},
    };

    #[test]
    fn random_encounters_keep_their_invariants() {
        let mut runner = TestRunner::new(ProptestConfig::with_cases(16));

        runner
            .run(&any::<u64>(), |seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                run_one(&mut rng, 2000).map_err(|err| TestCaseError::fail(format!("{err:#}")))?;
                Ok(())
            })
            .expect("fuzz harness should preserve invariants");
    }
}
