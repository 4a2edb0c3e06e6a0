use crate::model::{MoveRecord, StatsRecord};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const STATS_FILE: &str = "pokemon_stats.csv";
pub const MOVES_FILE: &str = "pokemon_moves_detailed.csv";
pub const TYPE_MODIFIERS_FILE: &str = "type_modifiers.csv";

pub trait ReferenceData: Sync {
    /// Every stats row recorded under `name`. More than one row is a data error.
    fn stats_for(&self, name: &str) -> &[StatsRecord];

    fn moves_for(&self, name: &str) -> &[MoveRecord];

    /// Multiplier for `attacking` hitting `defending`, `None` when the chart has no entry.
    fn type_modifier(&self, attacking: &str, defending: &str) -> Option<f32>;

    fn names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        !self.stats_for(name).is_empty()
    }
}

#[derive(Debug, Error)]
pub enum DexError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("type chart row {row} has no attacking type")]
    MissingAttackType { row: usize },

    #[error("type chart value {value:?} for {attacking} -> {defending} is not a number")]
    BadModifier {
        attacking: String,
        defending: String,
        value: String,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TypeChart {
    entries: BTreeMap<String, BTreeMap<String, f32>>,
}

impl TypeChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attacking: &str, defending: &str, modifier: f32) {
        self.entries
            .entry(attacking.to_ascii_lowercase())
            .or_default()
            .insert(defending.to_ascii_lowercase(), modifier);
    }

    pub fn get(&self, attacking: &str, defending: &str) -> Option<f32> {
        self.entries
            .get(&attacking.to_ascii_lowercase())?
            .get(&defending.to_ascii_lowercase())
            .copied()
    }

    fn normalized(self) -> Self {
        let mut chart = TypeChart::new();
        for (attacking, row) in self.entries {
            for (defending, modifier) in row {
                chart.insert(&attacking, &defending, modifier);
            }
        }
        chart
    }
}

#[derive(Debug, Default)]
pub struct Dex {
    stats: HashMap<String, Vec<StatsRecord>>,
    moves: HashMap<String, Vec<MoveRecord>>,
    type_chart: TypeChart,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DexBundle {
    pokemon: Vec<StatsRecord>,
    moves: Vec<MoveRecord>,
    #[serde(default)]
    type_chart: TypeChart,
}

impl Dex {
    pub fn new(stats: Vec<StatsRecord>, moves: Vec<MoveRecord>, type_chart: TypeChart) -> Self {
        let mut dex = Dex {
            type_chart: type_chart.normalized(),
            ..Dex::default()
        };
        for mut record in stats {
            record.pokemon = record.pokemon.trim().to_ascii_lowercase();
            dex.stats.entry(record.pokemon.clone()).or_default().push(record);
        }
        for mut record in moves {
            record.pokemon = record.pokemon.trim().to_ascii_lowercase();
            let learnset = dex.moves.entry(record.pokemon.clone()).or_default();
            if !learnset.contains(&record) {
                learnset.push(record);
            }
        }
        dex
    }

    pub fn from_csv_dir(dir: &Path) -> Result<Self, DexError> {
        let stats = read_csv_records(&dir.join(STATS_FILE))?;
        let moves = read_csv_records(&dir.join(MOVES_FILE))?;
        let type_chart = read_type_chart(&dir.join(TYPE_MODIFIERS_FILE))?;
        let dex = Dex::new(stats, moves, type_chart);
        tracing::info!(
            pokemon = dex.stats.len(),
            learnsets = dex.moves.len(),
            dir = %dir.display(),
            "loaded reference tables"
        );
        Ok(dex)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DexError> {
        let bundle: DexBundle = serde_json::from_str(raw)?;
        Ok(Dex::new(bundle.pokemon, bundle.moves, bundle.type_chart))
    }

    pub fn from_json_path(path: &Path) -> Result<Self, DexError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }
}

impl ReferenceData for Dex {
    fn stats_for(&self, name: &str) -> &[StatsRecord] {
        self.stats
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn moves_for(&self, name: &str) -> &[MoveRecord] {
        self.moves
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn type_modifier(&self, attacking: &str, defending: &str) -> Option<f32> {
        self.type_chart.get(attacking, defending)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.stats.keys().cloned().collect();
        names.sort();
        names
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, DexError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| DexError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn read_csv_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DexError> {
    let mut reader = open_csv(path)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| DexError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

// Wide layout: an `attack_type` column followed by one column per defending type.
fn read_type_chart(path: &Path) -> Result<TypeChart, DexError> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .map_err(|source| DexError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let mut chart = TypeChart::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DexError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let attacking = match record.get(0) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return Err(DexError::MissingAttackType { row }),
        };
        for (defending, value) in headers.iter().zip(record.iter()).skip(1) {
            if value.is_empty() {
                continue;
            }
            let modifier = value.parse::<f32>().map_err(|_| DexError::BadModifier {
                attacking: attacking.clone(),
                defending: defending.to_string(),
                value: value.to_string(),
            })?;
            chart.insert(&attacking, defending, modifier);
        }
    }
    Ok(chart)
}
