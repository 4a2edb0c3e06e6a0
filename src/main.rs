use pokemon_matchup_sim::matrix::SimulationOptions;
use pokemon_matchup_sim::{run, CliOptions, DexSource};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-matchup-sim [--data DIR | --dex dex.json] [--trials N] [--seed SEED] \
[--workers N] [--output simulation_stats.csv] [--pokemon a,b,c]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut source = DexSource::CsvDir(PathBuf::from("data/processed"));
    let mut output_path = PathBuf::from("simulation_stats.csv");
    let mut pokemon = Vec::new();
    let mut simulation = SimulationOptions::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => {
                let dir = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--data requires a directory (e.g. --data data/processed)")
                })?;
                source = DexSource::CsvDir(dir);
            }
            "--dex" => {
                let path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--dex requires a path (e.g. --dex dex.json)")
                })?;
                source = DexSource::Json(path);
            }
            "--trials" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--trials requires a number"))?;
                simulation.trials = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                simulation.seed = val.parse()?;
            }
            "--workers" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--workers requires a number"))?;
                simulation.workers = val.parse()?;
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output results.csv)")
                })?;
            }
            "--pokemon" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pokemon requires a comma separated list"))?;
                pokemon = val
                    .split(',')
                    .map(|name| name.trim().to_ascii_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect();
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        source,
        output_path,
        pokemon,
        simulation,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}
