use crate::player::{PlayerAction, Side};
use schema::SpeciesId;
use std::fmt;

/// Main error type for the creature arena engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Metadata could not be loaded or is inconsistent
    Catalog(CatalogError),
    /// A mutator was invoked although its legality check fails
    Action(ActionError),
    /// A save game could not be written or read back
    Save(SaveError),
}

/// Configuration errors. These abort startup; there is no degraded mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A record file could not be read
    Io { path: String, reason: String },
    /// A record file is not valid RON for its record type
    Parse { path: String, reason: String },
    /// A record source holds no records at all
    Empty(&'static str),
    /// Two species share the same id
    DuplicateSpecies(SpeciesId),
    /// A species has no level 0 evolution stage
    MissingBaseStage(SpeciesId),
    /// A species has two stages at the same level
    DuplicateStage { species_id: SpeciesId, level: u32 },
    /// A lookup or evolution record names a species that was never loaded
    UnknownSpecies(SpeciesId),
    /// An evolution stage has out-of-range statistics
    InvalidStage { species_id: SpeciesId, level: u32, reason: String },
    /// A difficulty preset is unusable
    InvalidDifficulty(String),
}

/// Caller-contract violations. These indicate a bug in the driving code
/// (human prompt or AI), never a normal game outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The legality predicate for this action is false for the side
    IllegalAction { side: Side, action: PlayerAction },
    /// The creature at this index cannot be sent to the arena
    IllegalSelection { side: Side, index: usize },
    /// Team index is out of bounds
    InvalidCreatureIndex(usize),
    /// A creature was asked to evolve without meeting the requirements
    EvolutionUnavailable(String),
    /// The current enemy team still has creatures standing
    EnemyNotDefeated(usize),
    /// The number of picks does not match the difficulty's team size
    InvalidTeamSize { expected: usize, actual: usize },
    /// Teams must hold at least one creature; games at least one enemy team
    EmptyTeam,
    /// The decision policy had nothing to choose from
    NoLegalAction(Side),
    /// The decision policy found no creature to switch to
    NoReselectionCandidate(Side),
}

/// Errors raised while persisting or restoring a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Save names are plain file stems
    InvalidName(String),
    /// Reading or writing the save file failed
    Io(String),
    /// The save file bytes could not be encoded or decoded
    Encoding(String),
    /// The save refers to metadata the current catalog lacks
    UnknownSpecies(SpeciesId),
    UnknownStage { species_id: SpeciesId, level: u32 },
    UnknownDifficulty(String),
    /// The save decodes but describes an impossible game
    Corrupt(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Catalog(err) => write!(f, "Catalog error: {}", err),
            GameError::Action(err) => write!(f, "Action error: {}", err),
            GameError::Save(err) => write!(f, "Save error: {}", err),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io { path, reason } => write!(f, "Cannot read {}: {}", path, reason),
            CatalogError::Parse { path, reason } => write!(f, "Malformed {}: {}", path, reason),
            CatalogError::Empty(source) => write!(f, "No {} defined", source),
            CatalogError::DuplicateSpecies(id) => write!(f, "Species id {} is defined twice", id),
            CatalogError::MissingBaseStage(id) => {
                write!(f, "Species {} has no initial evolution", id)
            }
            CatalogError::DuplicateStage { species_id, level } => write!(
                f,
                "Species {} has more than one evolution at level {}",
                species_id, level
            ),
            CatalogError::UnknownSpecies(id) => write!(f, "Unknown species id: {}", id),
            CatalogError::InvalidStage { species_id, level, reason } => write!(
                f,
                "Invalid evolution (species {}, level {}): {}",
                species_id, level, reason
            ),
            CatalogError::InvalidDifficulty(details) => write!(f, "Invalid difficulty: {}", details),
        }
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::IllegalAction { side, action } => {
                write!(f, "{} cannot take action '{}' now", side, action)
            }
            ActionError::IllegalSelection { side, index } => {
                write!(f, "{} cannot select creature {}", side, index)
            }
            ActionError::InvalidCreatureIndex(index) => write!(f, "Invalid creature index: {}", index),
            ActionError::EvolutionUnavailable(name) => write!(f, "{} can not evolve", name),
            ActionError::EnemyNotDefeated(index) => write!(
                f,
                "Fighting the next enemy team requires defeating enemy team {}",
                index
            ),
            ActionError::InvalidTeamSize { expected, actual } => {
                write!(f, "Expected {} picks, got {}", expected, actual)
            }
            ActionError::EmptyTeam => write!(f, "Teams cannot be empty"),
            ActionError::NoLegalAction(side) => write!(f, "{} has no legal action", side),
            ActionError::NoReselectionCandidate(side) => {
                write!(f, "{} has no creature to switch to", side)
            }
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::InvalidName(name) => write!(f, "Invalid save name: {:?}", name),
            SaveError::Io(details) => write!(f, "Save file I/O failed: {}", details),
            SaveError::Encoding(details) => write!(f, "Save file encoding failed: {}", details),
            SaveError::UnknownSpecies(id) => write!(f, "Save refers to unknown species {}", id),
            SaveError::UnknownStage { species_id, level } => write!(
                f,
                "Save refers to unknown evolution (species {}, level {})",
                species_id, level
            ),
            SaveError::UnknownDifficulty(name) => {
                write!(f, "Save refers to unknown difficulty {}", name)
            }
            SaveError::Corrupt(details) => write!(f, "Corrupt save: {}", details),
        }
    }
}

impl std::error::Error for GameError {}
impl std::error::Error for CatalogError {}
impl std::error::Error for ActionError {}
impl std::error::Error for SaveError {}

impl From<CatalogError> for GameError {
    fn from(err: CatalogError) -> Self {
        GameError::Catalog(err)
    }
}

impl From<ActionError> for GameError {
    fn from(err: ActionError) -> Self {
        GameError::Action(err)
    }
}

impl From<SaveError> for GameError {
    fn from(err: SaveError) -> Self {
        GameError::Save(err)
    }
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

/// Type alias for Results using SaveError
pub type SaveResult<T> = Result<T, SaveError>;
