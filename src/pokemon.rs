use crate::dex::ReferenceData;
use crate::error::PokemonError;
use crate::model::{DamageClass, MoveRecord, Stats, StatsRecord};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub name: String,
    pub move_type: String,
    pub category: String,
    pub damage_class: DamageClass,
    pub power: u32,
    pub elevated_crit: bool,
    pub pp: u32,
    pub hits: Option<(u32, u32)>,
    pub current_pp: u32,
}

impl Move {
    pub fn is_damaging(&self) -> bool {
        self.category.contains("damage")
    }

    pub fn has_pp(&self) -> bool {
        self.current_pp >= 1
    }

    pub fn restore_pp(&mut self) {
        self.current_pp = self.pp;
    }

    /// Spends one PP. Multi-hit moves still cost one.
    pub fn spend_pp(&mut self) {
        self.current_pp = self.current_pp.saturating_sub(1);
    }
}

impl From<&MoveRecord> for Move {
    fn from(record: &MoveRecord) -> Self {
        Move {
            name: record.name.trim().to_ascii_lowercase(),
            move_type: record.move_type.trim().to_ascii_lowercase(),
            category: record.category.clone(),
            damage_class: record.damage_class,
            // A missing power column still does chip damage.
            power: record.power.unwrap_or(1),
            elevated_crit: record.elevated_crit(),
            pp: record.pp,
            hits: record.hit_range(),
            current_pp: 0,
        }
    }
}

/// A battle participant. Built once per matchup and reset before every battle.
#[derive(Debug, Clone)]
pub struct Pokemon {
    pub name: String,
    pub types: Vec<String>,
    pub stats: Stats,
    all_moves: Vec<Move>,
    // Indices into `all_moves` for the current loadout.
    selected: Vec<usize>,
    pub current_hp: i32,
    has_moves: bool,
}

impl Pokemon {
    pub fn new(name: &str, dex: &dyn ReferenceData) -> Result<Self, PokemonError> {
        let name = name.trim().to_ascii_lowercase();
        if !dex.contains(&name) {
            return Err(PokemonError::NotFound(name));
        }
        let stats = match dex.stats_for(&name) {
            [record] => record,
            records => {
                return Err(PokemonError::NoStats {
                    name,
                    found: records.len(),
                })
            }
        };
        let moves = dex.moves_for(&name);
        if moves.is_empty() {
            return Err(PokemonError::NoMoves(name));
        }
        Ok(Self::from_records(stats, moves))
    }

    pub fn from_records(stats: &StatsRecord, moves: &[MoveRecord]) -> Self {
        let all_moves: Vec<Move> = moves.iter().map(Move::from).collect();
        let has_moves = all_moves.iter().any(Move::is_damaging);
        Pokemon {
            name: stats.pokemon.trim().to_ascii_lowercase(),
            types: stats.types.clone(),
            stats: Stats::from(stats),
            all_moves,
            selected: Vec::new(),
            current_hp: hp_from(stats.hp),
            has_moves,
        }
    }

    pub fn max_hp(&self) -> i32 {
        hp_from(self.stats.hp)
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.current_hp = self.current_hp.saturating_sub(hp_from(damage));
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp <= 0
    }

    /// False once a loadout roll found nothing damaging to pick.
    pub fn has_moves(&self) -> bool {
        self.has_moves
    }

    pub fn all_moves(&self) -> &[Move] {
        &self.all_moves
    }

    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.selected.iter().map(move |&idx| &self.all_moves[idx])
    }

    pub fn move_count(&self) -> usize {
        self.selected.len()
    }

    pub fn move_at(&self, slot: usize) -> &Move {
        &self.all_moves[self.selected[slot]]
    }

    pub fn move_at_mut(&mut self, slot: usize) -> &mut Move {
        &mut self.all_moves[self.selected[slot]]
    }

    pub fn has_type(&self, move_type: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(move_type))
    }

    pub fn remaining_pp(&self) -> u32 {
        self.moves().map(|mv| mv.current_pp).sum()
    }

    /// Rolls a fresh loadout of up to `max_moves` damaging moves, without replacement.
    pub fn pick_moves<R: Rng + ?Sized>(&mut self, max_moves: usize, rng: &mut R) {
        let damaging: Vec<usize> = self
            .all_moves
            .iter()
            .enumerate()
            .filter(|(_, mv)| mv.is_damaging())
            .map(|(idx, _)| idx)
            .collect();
        let count = max_moves.min(damaging.len());
        self.selected = damaging.choose_multiple(rng, count).copied().collect();
        self.has_moves = !self.selected.is_empty();
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, max_moves: usize, rng: &mut R) {
        self.current_hp = self.max_hp();
        self.pick_moves(max_moves, rng);
        for idx in &self.selected {
            self.all_moves[*idx].restore_pp();
        }
    }
}

fn hp_from(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
