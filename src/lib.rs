// In: src/lib.rs

//! Creature Arena
//!
//! A turn-based creature battling game: a player team fights a queue of
//! randomly rolled enemy teams, one round at a time. Creatures attack, dodge
//! by agility, collect experience and evolve through data-defined stages.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod console;
pub mod creature;
pub mod errors;
pub mod player;
pub mod rng;
pub mod save;
pub mod team;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Record types of the data files.
pub use schema::{DifficultyRecord, Element, EvolutionRecord, SpeciesId, SpeciesRecord};

// --- From this crate's modules (`src/`) ---

// Battle state machine, its events and the decision policy.
pub use battle::ai::{Behavior, WeightedRandomAI};
pub use battle::events::{BattleEvent, EventBus, EventLog};
pub use battle::runner::{RoundStatus, TurnCommand};
pub use battle::state::{BattleRules, BattleState, ReselectionPolicy};

// Reference data and the runtime types built from it.
pub use catalog::{Catalog, Difficulty, EvolutionStage, Species};
pub use creature::Creature;
pub use player::{PlayerAction, Side};
pub use rng::GameRng;
pub use team::Team;

pub use config::GameConfig;
pub use save::SaveGame;

// Crate-specific error and result types.
pub use errors::{
    ActionError, ActionResult, CatalogError, CatalogResult, GameError, GameResult, SaveError,
    SaveResult,
};
