use crate::battle::state::{BattleRules, BattleState};
use crate::catalog::Catalog;
use crate::creature::Creature;
use crate::errors::ActionResult;
use crate::rng::GameRng;
use crate::team::Team;
use schema::{DifficultyRecord, Element, EvolutionRecord, SpeciesId, SpeciesRecord};
use std::sync::Arc;

/// Water, strength 10, 20 HP, no agility. Has a skill and evolves at 20 exp
/// into "Striker Prime" (strength 14, 40 HP).
pub const STRIKER: SpeciesId = 10;
/// Metal, strength 5, 15 HP, no agility, no skill. Final form.
pub const TARGET: SpeciesId = 11;
/// Air, strength 4, 25 HP, agility 100. Final form.
pub const DODGER: SpeciesId = 12;
/// Earth, strength 8, 30 HP, no skill. Evolves at 50 exp.
pub const MUDLING: SpeciesId = 13;

pub const TEST_DIFFICULTY: &str = "Test";

pub fn difficulty_record(name: &str, enemy_team_count: u32, player_team_size: u32) -> DifficultyRecord {
    DifficultyRecord {
        name: name.to_string(),
        outgoing_damage_multiplier: 1.0,
        incoming_damage_multiplier: 1.0,
        enemy_team_count,
        player_team_size,
    }
}

pub fn species_record(id: SpeciesId, name: &str, element: Element) -> SpeciesRecord {
    SpeciesRecord {
        id,
        name: name.to_string(),
        element,
    }
}

/// A stage with no agility, no skill and a bounty of 10 exp.
pub fn stage_record(
    species_id: SpeciesId,
    level: u32,
    name: &str,
    strength: f32,
    max_health: f32,
    required_exp: f32,
) -> EvolutionRecord {
    EvolutionRecord {
        species_id,
        level,
        name: name.to_string(),
        strength,
        max_health,
        agility: 0.0,
        bounty_exp: 10.0,
        required_exp,
        skill_kind: 0,
        skill_power: 0.0,
    }
}

/// The small catalog most tests run against. Striker is listed first and
/// Mudling last.
pub fn standard_catalog() -> Arc<Catalog> {
    let species = vec![
        species_record(STRIKER, "Striker", Element::Water),
        species_record(TARGET, "Target", Element::Metal),
        species_record(DODGER, "Dodger", Element::Air),
        species_record(MUDLING, "Mudling", Element::Earth),
    ];

    let mut striker = stage_record(STRIKER, 0, "Striker", 10.0, 20.0, 20.0);
    striker.skill_kind = 1;
    striker.skill_power = 6.0;
    let striker_prime = stage_record(STRIKER, 1, "Striker Prime", 14.0, 40.0, 0.0);
    let mut target = stage_record(TARGET, 0, "Target", 5.0, 15.0, 30.0);
    target.bounty_exp = 12.0;
    let mut dodger = stage_record(DODGER, 0, "Dodger", 4.0, 25.0, 0.0);
    dodger.agility = 100.0;
    let mudling = stage_record(MUDLING, 0, "Mudling", 8.0, 30.0, 50.0);
    let mudling_king = stage_record(MUDLING, 1, "Mudling King", 12.0, 50.0, 0.0);

    let catalog = Catalog::from_records(
        vec![
            difficulty_record(TEST_DIFFICULTY, 2, 1),
            difficulty_record("Wide", 1, 3),
        ],
        species,
        vec![striker, striker_prime, target, dodger, mudling, mudling_king],
    );
    match catalog {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("Failed to build the standard test catalog: {}", err),
    }
}

/// A builder for creating test creatures with common defaults.
///
/// # Example
/// ```ignore
/// let striker = TestCreatureBuilder::new(&catalog, STRIKER)
///     .with_health(8.0)
///     .with_exp(20.0)
///     .build();
/// ```
pub struct TestCreatureBuilder<'a> {
    catalog: &'a Catalog,
    species_id: SpeciesId,
    level: u32,
    health: Option<f32>,
    exp: f32,
}

impl<'a> TestCreatureBuilder<'a> {
    /// Creates a new builder for the base stage of a species.
    pub fn new(catalog: &'a Catalog, species_id: SpeciesId) -> Self {
        Self {
            catalog,
            species_id,
            level: 0,
            health: None,
            exp: 0.0,
        }
    }

    /// Uses a later evolution stage instead of the base stage.
    pub fn at_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Sets the current health. If not set, health will be max.
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_exp(mut self, exp: f32) -> Self {
        self.exp = exp;
        self
    }

    pub fn build(self) -> Creature {
        let species = match self.catalog.species(self.species_id) {
            Some(species) => Arc::clone(species),
            None => panic!("Unknown test species {}", self.species_id),
        };
        let stage = match self.catalog.find_stage(self.species_id, self.level) {
            Some(stage) => Arc::clone(stage),
            None => panic!(
                "Species {} has no stage at level {}",
                self.species_id, self.level
            ),
        };
        let health = self.health.unwrap_or(stage.max_health);
        Creature::restore(species, stage, health, self.exp)
    }
}

/// Creates a battle on the "Test" difficulty from prepared creatures, one
/// enemy team per inner vector.
pub fn create_test_battle(
    catalog: &Arc<Catalog>,
    player: Vec<Creature>,
    enemies: Vec<Vec<Creature>>,
) -> BattleState {
    let difficulty = match catalog.find_difficulty(TEST_DIFFICULTY) {
        Some(difficulty) => Arc::clone(difficulty),
        None => panic!("The standard catalog lacks the Test difficulty"),
    };
    let player_team = assert_ok(Team::new(player));
    let enemy_teams = enemies
        .into_iter()
        .map(|creatures| assert_ok(Team::new(creatures)))
        .collect();

    assert_ok(BattleState::from_teams(
        Arc::clone(catalog),
        difficulty,
        BattleRules::default(),
        player_team,
        enemy_teams,
    ))
}

/// Creates a `GameRng` whose draws are all 0.0 (every attack lands, every
/// index pick is the first). A generous buffer prevents exhaustion panics.
pub fn predictable_rng() -> GameRng {
    GameRng::new_for_test(vec![0.0; 100])
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: ActionResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
