use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatsRecord {
    pub pokemon: String,
    #[serde(deserialize_with = "type_list")]
    pub types: Vec<String>,
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(alias = "special-attack")]
    pub special_attack: u32,
    #[serde(alias = "special-defense")]
    pub special_defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MoveRecord {
    pub pokemon: String,
    #[serde(alias = "move_name")]
    pub name: String,
    #[serde(rename = "type", alias = "move_type")]
    pub move_type: String,
    #[serde(alias = "move_category")]
    pub category: String,
    #[serde(alias = "move_damage_class")]
    pub damage_class: DamageClass,
    #[serde(default, alias = "move_power", deserialize_with = "optional_count")]
    pub power: Option<u32>,
    #[serde(default, alias = "move_crit_rate", deserialize_with = "count_or_zero")]
    pub crit_rate: u8,
    #[serde(alias = "move_pp", deserialize_with = "count_or_zero")]
    pub pp: u32,
    #[serde(default, alias = "move_min_hits", deserialize_with = "optional_count")]
    pub min_hits: Option<u32>,
    #[serde(default, alias = "move_max_hits", deserialize_with = "optional_count")]
    pub max_hits: Option<u32>,
    #[serde(default, alias = "move_url", skip_serializing)]
    pub url: Option<String>,
}

impl MoveRecord {
    /// Categories such as `damage`, `damage+ailment` or `damage+heal` all hit directly.
    pub fn is_damaging(&self) -> bool {
        self.category.contains("damage")
    }

    pub fn elevated_crit(&self) -> bool {
        self.crit_rate == 1
    }

    pub fn hit_range(&self) -> Option<(u32, u32)> {
        match (self.min_hits, self.max_hits) {
            (Some(min), Some(max)) if min > 0 && max >= min => Some((min, max)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl From<&StatsRecord> for Stats {
    fn from(record: &StatsRecord) -> Self {
        Stats {
            hp: record.hp,
            attack: record.attack,
            defense: record.defense,
            special_attack: record.special_attack,
            special_defense: record.special_defense,
            speed: record.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupResult {
    pub pokemon_a: String,
    pub pokemon_b: String,
    pub avg_turns: f64,
    pub a_wins: u64,
    pub b_wins: u64,
    pub ties: u64,
}

// The stats CSV stores types as "fire,flying"; the JSON dex stores a list.
fn type_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TypeList {
        Joined(String),
        List(Vec<String>),
    }

    let raw = match TypeList::deserialize(deserializer)? {
        TypeList::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        TypeList::List(list) => list,
    };
    let types: Vec<String> = raw
        .iter()
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if types.is_empty() {
        return Err(serde::de::Error::custom("a Pokemon needs at least one type"));
    }
    Ok(types)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(u64),
    Float(f64),
    Text(String),
}

// Integer columns with gaps come out of pandas as "40.0", with empty cells for the gaps.
fn optional_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    use serde::de::Error;

    let value = match Option::<RawCount>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawCount::Int(value)) => value as f64,
        Some(RawCount::Float(value)) => value,
        Some(RawCount::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map_err(|_| D::Error::custom(format!("{text:?} is not a count")))?
        }
    };
    if value.is_nan() {
        return Ok(None);
    }
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(D::Error::custom(format!("{value} is not a whole non-negative count")));
    }
    let whole = value as u64;
    T::try_from(whole)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("{whole} is out of range")))
}

fn count_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    optional_count(deserializer).map(Option::unwrap_or_default)
}
