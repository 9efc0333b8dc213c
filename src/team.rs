use crate::catalog::Catalog;
use crate::creature::Creature;
use crate::errors::{ActionError, ActionResult, CatalogError, GameResult};
use crate::rng::GameRng;
use schema::SpeciesId;
use std::sync::Arc;

/// An ordered, fixed-size group of creatures with one of them on the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    creatures: Vec<Creature>,
    selected_index: usize,
}

impl Team {
    pub fn new(creatures: Vec<Creature>) -> ActionResult<Self> {
        if creatures.is_empty() {
            return Err(ActionError::EmptyTeam);
        }
        Ok(Team {
            creatures,
            selected_index: 0,
        })
    }

    /// One fresh base-stage creature per pick, in pick order.
    pub fn from_picks(catalog: &Catalog, picks: &[SpeciesId]) -> GameResult<Self> {
        let creatures = picks
            .iter()
            .map(|&id| spawn(catalog, id))
            .collect::<GameResult<Vec<_>>>()?;
        Ok(Team::new(creatures)?)
    }

    /// `size` creatures of independently rolled species; duplicates allowed.
    pub fn random(catalog: &Catalog, size: usize, rng: &mut GameRng) -> GameResult<Self> {
        let mut creatures = Vec::with_capacity(size);
        for _ in 0..size {
            let species_id = catalog.random_species(rng).id;
            creatures.push(spawn(catalog, species_id)?);
        }
        Ok(Team::new(creatures)?)
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creature(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    pub fn creatures_mut(&mut self) -> impl Iterator<Item = &mut Creature> {
        self.creatures.iter_mut()
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected(&self) -> &Creature {
        &self.creatures[self.selected_index]
    }

    pub fn selected_mut(&mut self) -> &mut Creature {
        &mut self.creatures[self.selected_index]
    }

    /// Puts the creature at `index` on the arena. Only bounds are checked here;
    /// whether the switch is allowed is decided by the battle state.
    pub fn set_selected(&mut self, index: usize) -> ActionResult<()> {
        if index >= self.creatures.len() {
            return Err(ActionError::InvalidCreatureIndex(index));
        }
        self.selected_index = index;
        Ok(())
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.creatures
            .get(index)
            .map(Creature::is_alive)
            .unwrap_or(false)
    }

    pub fn selectable_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_alive()).count()
    }

    /// Indices of alive creatures other than the one on the arena.
    pub fn reselection_candidates(&self) -> Vec<usize> {
        (0..self.creatures.len())
            .filter(|&i| i != self.selected_index && self.is_selectable(i))
            .collect()
    }

    pub fn is_defeated(&self) -> bool {
        self.creatures.iter().all(|c| !c.is_alive())
    }
}

fn spawn(catalog: &Catalog, species_id: SpeciesId) -> GameResult<Creature> {
    let species = catalog
        .species(species_id)
        .ok_or(CatalogError::UnknownSpecies(species_id))?;
    let stage = catalog
        .find_base_stage(species_id)
        .ok_or(CatalogError::MissingBaseStage(species_id))?;
    Ok(Creature::new(Arc::clone(species), Arc::clone(stage)))
}
