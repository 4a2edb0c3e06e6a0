use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PokemonError {
    #[error("{0} is not available")]
    NotFound(String),

    #[error("{name} expecting 1 result for stats, got {found}")]
    NoStats { name: String, found: usize },

    #[error("{0} has no moves")]
    NoMoves(String),
}

/// Failure of one matchup task. Other pairs are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchupError {
    #[error(transparent)]
    Pokemon(#[from] PokemonError),

    #[error("{0} has no damaging moves")]
    Unusable(String),

    #[error("matchup task panicked: {0}")]
    Panicked(String),
}

pub type Result<T> = std::result::Result<T, MatchupError>;
