pub mod battle;
pub mod damage;
pub mod dex;
pub mod error;
pub mod matrix;
pub mod model;
pub mod pokemon;
pub mod pool;

use crate::dex::{Dex, ReferenceData};
use crate::matrix::{partition_outcomes, simulate_roster, usable_roster, SimulationOptions};
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum DexSource {
    CsvDir(PathBuf),
    Json(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub source: DexSource,
    pub output_path: PathBuf,
    /// Restricts the roster to these names. Empty means every Pokemon in the dex.
    pub pokemon: Vec<String>,
    pub simulation: SimulationOptions,
}

pub fn load_dex(source: &DexSource) -> anyhow::Result<Dex> {
    match source {
        DexSource::CsvDir(dir) => Dex::from_csv_dir(dir)
            .with_context(|| format!("Failed to load reference tables from {}", dir.display())),
        DexSource::Json(path) => Dex::from_json_path(path)
            .with_context(|| format!("Failed to load dex bundle from {}", path.display())),
    }
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.simulation.trials == 0 {
        anyhow::bail!("--trials must be > 0");
    }
    let dex = load_dex(&opts.source)?;
    let candidates = if opts.pokemon.is_empty() {
        dex.names()
    } else {
        opts.pokemon.clone()
    };
    let roster = usable_roster(&dex, &candidates);
    if roster.len() < 2 {
        anyhow::bail!(
            "Need at least 2 usable Pokemon to build matchups, found {}",
            roster.len()
        );
    }

    let outcomes = simulate_roster(&dex, &roster, &opts.simulation);
    let (results, failures) = partition_outcomes(outcomes);
    matrix::write_csv(&results, &opts.output_path)
        .with_context(|| format!("Failed to write results to {}", opts.output_path.display()))?;
    tracing::info!(
        matchups = results.len(),
        failed = failures.len(),
        output = %opts.output_path.display(),
        "simulation finished"
    );
    if !failures.is_empty() {
        for failure in &failures {
            if let Err(err) = &failure.result {
                eprintln!("{} vs {}: {err}", failure.pokemon_a, failure.pokemon_b);
            }
        }
        anyhow::bail!("{} matchups failed", failures.len());
    }
    Ok(())
}
