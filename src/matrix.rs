use crate::battle::{simulate_battle, BattleOptions, Side};
use crate::dex::ReferenceData;
use crate::error::{MatchupError, Result};
use crate::model::MatchupResult;
use crate::pokemon::Pokemon;
use crate::pool::WorkerPool;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

#[derive(Clone, Debug)]
pub struct SimulationOptions {
    pub trials: usize,
    pub seed: u64,
    pub workers: usize,
    pub battle: BattleOptions,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: 0,
            workers: 0,
            battle: BattleOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairOutcome {
    pub pokemon_a: String,
    pub pokemon_b: String,
    pub result: Result<MatchupResult>,
}

/// Names from `candidates` that build cleanly and have at least one damaging move.
pub fn usable_roster(dex: &dyn ReferenceData, candidates: &[String]) -> Vec<String> {
    let mut roster = Vec::new();
    for name in candidates {
        match Pokemon::new(name, dex) {
            Ok(pokemon) if pokemon.has_moves() => roster.push(pokemon.name),
            Ok(pokemon) => {
                tracing::warn!(pokemon = %pokemon.name, "no damaging moves, excluded from roster");
            }
            Err(err) => tracing::warn!(pokemon = %name, %err, "excluded from roster"),
        }
    }
    roster
}

/// Every unordered pair of distinct names, each pair sorted, in sorted order.
pub fn matchup_pairs(names: &[String]) -> Vec<(String, String)> {
    let mut pairs = BTreeSet::new();
    for i in names {
        for j in names {
            if i == j {
                continue;
            }
            let pair = if i < j {
                (i.clone(), j.clone())
            } else {
                (j.clone(), i.clone())
            };
            pairs.insert(pair);
        }
    }
    pairs.into_iter().collect()
}

pub fn battle_many(
    dex: &dyn ReferenceData,
    a: &str,
    b: &str,
    options: &SimulationOptions,
    seed: u64,
) -> Result<MatchupResult> {
    let mut pokemon = Pokemon::new(a, dex)?;
    let mut pokemon_b = Pokemon::new(b, dex)?;
    for p in [&pokemon, &pokemon_b] {
        if !p.has_moves() {
            return Err(MatchupError::Unusable(p.name.clone()));
        }
    }
    tracing::info!("{} vs {}", pokemon.name, pokemon_b.name);

    let mut cell_rng = SmallRng::seed_from_u64(seed);
    let mut a_wins = 0u64;
    let mut b_wins = 0u64;
    let mut ties = 0u64;
    let mut total_turns = 0u64;
    for _ in 0..options.trials {
        let mut battle_rng = SmallRng::seed_from_u64(cell_rng.gen());
        let record = simulate_battle(
            &mut pokemon,
            &mut pokemon_b,
            dex,
            &options.battle,
            &mut battle_rng,
        );
        match record.winner() {
            Some(Side::A) => a_wins += 1,
            Some(Side::B) => b_wins += 1,
            None => ties += 1,
        }
        total_turns += u64::from(record.turns);
    }

    let avg_turns = if options.trials == 0 {
        0.0
    } else {
        total_turns as f64 / options.trials as f64
    };
    Ok(MatchupResult {
        pokemon_a: pokemon.name,
        pokemon_b: pokemon_b.name,
        avg_turns,
        a_wins,
        b_wins,
        ties,
    })
}

fn pair_seed(seed: u64, index: usize) -> u64 {
    seed ^ ((index as u64) << 32) ^ (index as u64)
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs every pair of `roster` in parallel. Outcomes come back in pair order.
pub fn simulate_roster(
    dex: &dyn ReferenceData,
    roster: &[String],
    options: &SimulationOptions,
) -> Vec<PairOutcome> {
    let pairs = matchup_pairs(roster);
    let pool = WorkerPool::with_workers(options.workers);
    tracing::info!(
        pairs = pairs.len(),
        workers = pool.current_parallelism(),
        trials = options.trials,
        "simulating roster"
    );
    pool.install(|| {
        pairs
            .par_iter()
            .enumerate()
            .map(|(idx, (a, b))| {
                let seed = pair_seed(options.seed, idx);
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    battle_many(dex, a, b, options, seed)
                }))
                .unwrap_or_else(|payload| Err(MatchupError::Panicked(panic_message(payload))));
                if let Err(err) = &result {
                    tracing::error!(a = %a, b = %b, %err, "matchup failed");
                }
                PairOutcome {
                    pokemon_a: a.clone(),
                    pokemon_b: b.clone(),
                    result,
                }
            })
            .collect()
    })
}

pub fn partition_outcomes(outcomes: Vec<PairOutcome>) -> (Vec<MatchupResult>, Vec<PairOutcome>) {
    let mut results = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(result) => results.push(result),
            Err(_) => failures.push(outcome),
        }
    }
    (results, failures)
}

pub fn write_csv(results: &[MatchupResult], path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}
