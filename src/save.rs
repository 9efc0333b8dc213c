//! Save games: a compact snapshot of a `BattleState` that is encoded with
//! postcard and written to `<save_dir>/<name>.sav`.

use crate::battle::state::{BattleRules, BattleState};
use crate::catalog::Catalog;
use crate::creature::Creature;
use crate::errors::{SaveError, SaveResult};
use crate::team::Team;
use schema::SpeciesId;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SAVE_EXTENSION: &str = "sav";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SavedCreature {
    pub species_id: SpeciesId,
    pub level: u32,
    pub health: f32,
    pub exp: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SavedTeam {
    pub selected_index: usize,
    pub creatures: Vec<SavedCreature>,
}

/// Everything needed to rebuild a game exactly as it was captured.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SaveGame {
    pub difficulty: String,
    pub rules: BattleRules,
    pub turn_index: u32,
    pub is_player_turn: bool,
    pub current_enemy_index: usize,
    pub player_team: SavedTeam,
    pub enemy_teams: Vec<SavedTeam>,
}

impl SaveGame {
    pub fn capture(state: &BattleState) -> Self {
        SaveGame {
            difficulty: state.difficulty().name.clone(),
            rules: *state.rules(),
            turn_index: state.turn_index(),
            is_player_turn: state.is_player_turn(),
            current_enemy_index: state.current_enemy_index(),
            player_team: capture_team(state.player_team()),
            enemy_teams: state.enemy_teams().iter().map(capture_team).collect(),
        }
    }

    /// Rebuild the game against `catalog`. Fails if the save names metadata
    /// the catalog lacks or describes a game that cannot exist.
    pub fn restore(&self, catalog: Arc<Catalog>) -> SaveResult<BattleState> {
        let difficulty = catalog
            .find_difficulty(&self.difficulty)
            .cloned()
            .ok_or_else(|| SaveError::UnknownDifficulty(self.difficulty.clone()))?;

        let player_team = restore_team(&catalog, &self.player_team)?;
        let enemy_teams = self
            .enemy_teams
            .iter()
            .map(|team| restore_team(&catalog, team))
            .collect::<SaveResult<Vec<_>>>()?;

        if self.current_enemy_index >= enemy_teams.len() {
            return Err(SaveError::Corrupt(format!(
                "enemy index {} with {} enemy teams",
                self.current_enemy_index,
                enemy_teams.len()
            )));
        }
        if let Some(index) = enemy_teams[..self.current_enemy_index]
            .iter()
            .position(|team| !team.is_defeated())
        {
            return Err(SaveError::Corrupt(format!(
                "enemy team {} was passed but is not defeated",
                index
            )));
        }

        let mut state = BattleState::from_teams(catalog, difficulty, self.rules, player_team, enemy_teams)
            .map_err(|err| SaveError::Corrupt(err.to_string()))?;
        state.turn_index = self.turn_index;
        state.is_player_turn = self.is_player_turn;
        state.current_enemy_index = self.current_enemy_index;
        Ok(state)
    }

    pub fn to_bytes(&self) -> SaveResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|err| SaveError::Encoding(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> SaveResult<Self> {
        postcard::from_bytes(bytes).map_err(|err| SaveError::Encoding(err.to_string()))
    }

    /// Write the save as `<dir>/<name>.sav`, creating `dir` if needed.
    pub fn write_to(&self, dir: &Path, name: &str) -> SaveResult<PathBuf> {
        let path = save_path(dir, name)?;
        let bytes = self.to_bytes()?;
        fs::create_dir_all(dir).map_err(|err| SaveError::Io(err.to_string()))?;
        fs::write(&path, bytes).map_err(|err| SaveError::Io(err.to_string()))?;
        tracing::info!(path = %path.display(), turn = self.turn_index, "Saved game");
        Ok(path)
    }

    pub fn read_from(dir: &Path, name: &str) -> SaveResult<Self> {
        let path = save_path(dir, name)?;
        let bytes = fs::read(&path).map_err(|err| SaveError::Io(format!("{}: {}", path.display(), err)))?;
        let save = Self::from_bytes(&bytes)?;
        tracing::info!(path = %path.display(), turn = save.turn_index, "Loaded game");
        Ok(save)
    }
}

/// Names of the saves in `dir`, sorted. A missing directory has no saves.
pub fn list_saves(dir: &Path) -> SaveResult<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(SaveError::Io(err.to_string())),
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| SaveError::Io(err.to_string()))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Save names are plain file stems: ASCII letters, digits, `-` and `_`.
pub fn save_path(dir: &Path, name: &str) -> SaveResult<PathBuf> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!("{}.{}", name, SAVE_EXTENSION)))
}

fn capture_team(team: &Team) -> SavedTeam {
    SavedTeam {
        selected_index: team.selected_index(),
        creatures: team
            .creatures()
            .iter()
            .map(|creature| SavedCreature {
                species_id: creature.species().id,
                level: creature.stage().level,
                health: creature.health(),
                exp: creature.exp(),
            })
            .collect(),
    }
}

fn restore_team(catalog: &Catalog, saved: &SavedTeam) -> SaveResult<Team> {
    let creatures = saved
        .creatures
        .iter()
        .map(|creature| restore_creature(catalog, creature))
        .collect::<SaveResult<Vec<_>>>()?;
    let mut team = Team::new(creatures).map_err(|err| SaveError::Corrupt(err.to_string()))?;
    team.set_selected(saved.selected_index)
        .map_err(|err| SaveError::Corrupt(err.to_string()))?;
    Ok(team)
}

fn restore_creature(catalog: &Catalog, saved: &SavedCreature) -> SaveResult<Creature> {
    let species = catalog
        .species(saved.species_id)
        .ok_or(SaveError::UnknownSpecies(saved.species_id))?;
    let stage = catalog
        .find_stage(saved.species_id, saved.level)
        .ok_or(SaveError::UnknownStage {
            species_id: saved.species_id,
            level: saved.level,
        })?;
    Ok(Creature::restore(
        Arc::clone(species),
        Arc::clone(stage),
        saved.health,
        saved.exp,
    ))
}
