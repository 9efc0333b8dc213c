//! Immutable reference data: difficulties, species, evolution stages and the
//! element interaction table. Loaded once at startup and shared by `Arc`.

use crate::errors::{CatalogError, CatalogResult};
use crate::rng::GameRng;
use schema::{DifficultyRecord, Element, EvolutionRecord, SpeciesId, SpeciesRecord};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const DIFFICULTIES_FILE: &str = "difficulties.ron";
pub const CREATURES_FILE: &str = "creatures.ron";
pub const EVOLUTIONS_FILE: &str = "evolutions.ron";

pub const ELEMENT_BUFF: f32 = 1.5;
pub const ELEMENT_NERF: f32 = 1.0 / ELEMENT_BUFF;

/// A difficulty preset.
///
/// The damage multipliers are carried for display and persistence but are not
/// applied by the damage resolution yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub name: String,
    pub outgoing_damage_multiplier: f32,
    pub incoming_damage_multiplier: f32,
    pub enemy_team_count: usize,
    pub player_team_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub element: Element,
}

/// One evolutionary form of a species. Stages of a species form a forward
/// linked chain that is resolved once when the catalog is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionStage {
    pub species_id: SpeciesId,
    pub level: u32,
    pub name: String,
    pub strength: f32,
    pub max_health: f32,
    pub agility: f32,
    pub bounty_exp: f32,
    pub required_exp: f32,
    pub skill_kind: u32,
    pub skill_power: f32,
    next: Option<Arc<EvolutionStage>>,
}

impl EvolutionStage {
    pub fn next_stage(&self) -> Option<&Arc<EvolutionStage>> {
        self.next.as_ref()
    }

    pub fn is_final(&self) -> bool {
        self.next.is_none()
    }

    pub fn has_skill(&self) -> bool {
        self.skill_kind > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInteraction {
    pub attacker: Element,
    pub target: Element,
    pub multiplier: f32,
}

const fn interaction(attacker: Element, target: Element, multiplier: f32) -> ElementInteraction {
    ElementInteraction {
        attacker,
        target,
        multiplier,
    }
}

/// Ordered (attacker, target) pairs with a non-neutral multiplier. Every pair
/// missing here is neutral.
pub const ELEMENT_INTERACTIONS: &[ElementInteraction] = &[
    interaction(Element::Water, Element::Water, ELEMENT_NERF),
    interaction(Element::Water, Element::Earth, ELEMENT_BUFF),
    interaction(Element::Water, Element::Fire, ELEMENT_BUFF),
    interaction(Element::Earth, Element::Air, ELEMENT_NERF),
    interaction(Element::Earth, Element::Fire, ELEMENT_BUFF),
    interaction(Element::Earth, Element::Ice, ELEMENT_BUFF),
    interaction(Element::Earth, Element::Metal, ELEMENT_BUFF),
    interaction(Element::Air, Element::Earth, ELEMENT_NERF),
    interaction(Element::Air, Element::Ice, ELEMENT_BUFF),
    interaction(Element::Air, Element::Metal, ELEMENT_BUFF),
    interaction(Element::Fire, Element::Water, ELEMENT_NERF),
    interaction(Element::Fire, Element::Earth, ELEMENT_BUFF),
    interaction(Element::Fire, Element::Ice, ELEMENT_BUFF),
    interaction(Element::Fire, Element::Metal, ELEMENT_NERF),
    interaction(Element::Ice, Element::Water, ELEMENT_NERF),
    interaction(Element::Ice, Element::Earth, ELEMENT_BUFF),
    interaction(Element::Ice, Element::Fire, ELEMENT_NERF),
    interaction(Element::Ice, Element::Ice, ELEMENT_NERF),
    interaction(Element::Metal, Element::Water, ELEMENT_BUFF),
    interaction(Element::Metal, Element::Air, ELEMENT_BUFF),
    interaction(Element::Metal, Element::Fire, ELEMENT_NERF),
    interaction(Element::Metal, Element::Metal, ELEMENT_NERF),
];

/// Finds the stage of the same species one level above `base`.
pub fn find_next_stage<'a>(
    stages: &'a [Arc<EvolutionStage>],
    base: &EvolutionStage,
) -> Option<&'a Arc<EvolutionStage>> {
    stages
        .iter()
        .find(|stage| stage.species_id == base.species_id && stage.level == base.level + 1)
}

#[derive(Debug, Clone)]
pub struct Catalog {
    difficulties: Vec<Arc<Difficulty>>,
    species: Vec<Arc<Species>>,
    stages: Vec<Arc<EvolutionStage>>,
    element_interactions: Vec<ElementInteraction>,
}

impl Catalog {
    /// Load every record source from `data_path`. Any unreadable or invalid
    /// source fails the whole load.
    pub fn load_all(data_path: &Path) -> CatalogResult<Catalog> {
        let difficulties: Vec<DifficultyRecord> = load_records(&data_path.join(DIFFICULTIES_FILE))?;
        let species: Vec<SpeciesRecord> = load_records(&data_path.join(CREATURES_FILE))?;
        let evolutions: Vec<EvolutionRecord> = load_records(&data_path.join(EVOLUTIONS_FILE))?;

        let catalog = Self::from_records(difficulties, species, evolutions)?;
        tracing::info!(
            difficulties = catalog.difficulties.len(),
            species = catalog.species.len(),
            evolutions = catalog.stages.len(),
            path = %data_path.display(),
            "Loaded creature catalog"
        );
        Ok(catalog)
    }

    /// Validate raw records and link the evolution chains.
    pub fn from_records(
        difficulties: Vec<DifficultyRecord>,
        species: Vec<SpeciesRecord>,
        evolutions: Vec<EvolutionRecord>,
    ) -> CatalogResult<Catalog> {
        if difficulties.is_empty() {
            return Err(CatalogError::Empty("difficulties"));
        }
        if species.is_empty() {
            return Err(CatalogError::Empty("creatures"));
        }

        let difficulties = difficulties
            .into_iter()
            .map(build_difficulty)
            .collect::<CatalogResult<Vec<_>>>()?;

        let mut known_ids = HashSet::new();
        let species: Vec<Arc<Species>> = species
            .into_iter()
            .map(|record| {
                if !known_ids.insert(record.id) {
                    return Err(CatalogError::DuplicateSpecies(record.id));
                }
                Ok(Arc::new(Species {
                    id: record.id,
                    name: record.name,
                    element: record.element,
                }))
            })
            .collect::<CatalogResult<_>>()?;

        let stages = link_stages(&evolutions, &known_ids)?;

        for creature in &species {
            let has_base = stages
                .iter()
                .any(|stage| stage.species_id == creature.id && stage.level == 0);
            if !has_base {
                return Err(CatalogError::MissingBaseStage(creature.id));
            }
        }

        Ok(Catalog {
            difficulties,
            species,
            stages,
            element_interactions: ELEMENT_INTERACTIONS.to_vec(),
        })
    }

    pub fn difficulties(&self) -> &[Arc<Difficulty>] {
        &self.difficulties
    }

    pub fn find_difficulty(&self, name: &str) -> Option<&Arc<Difficulty>> {
        self.difficulties.iter().find(|difficulty| difficulty.name == name)
    }

    pub fn all_species(&self) -> &[Arc<Species>] {
        &self.species
    }

    pub fn species(&self, id: SpeciesId) -> Option<&Arc<Species>> {
        self.species.iter().find(|species| species.id == id)
    }

    pub fn stages(&self) -> &[Arc<EvolutionStage>] {
        &self.stages
    }

    pub fn find_base_stage(&self, id: SpeciesId) -> Option<&Arc<EvolutionStage>> {
        self.find_stage(id, 0)
    }

    pub fn find_stage(&self, id: SpeciesId, level: u32) -> Option<&Arc<EvolutionStage>> {
        self.stages
            .iter()
            .find(|stage| stage.species_id == id && stage.level == level)
    }

    /// Damage multiplier for an attacker of one element hitting a target of another.
    pub fn element_multiplier(&self, attacker: Element, target: Element) -> f32 {
        self.element_interactions
            .iter()
            .find(|entry| entry.attacker == attacker && entry.target == target)
            .map(|entry| entry.multiplier)
            .unwrap_or(1.0)
    }

    /// Uniform pick over all loaded species.
    pub fn random_species(&self, rng: &mut GameRng) -> &Arc<Species> {
        let index = rng.next_index(self.species.len(), "random species");
        &self.species[index]
    }
}

fn load_records<T: DeserializeOwned>(path: &Path) -> CatalogResult<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|err| CatalogError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    ron::from_str(&content).map_err(|err| CatalogError::Parse {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}

fn build_difficulty(record: DifficultyRecord) -> CatalogResult<Arc<Difficulty>> {
    if record.enemy_team_count == 0 || record.player_team_size == 0 {
        return Err(CatalogError::InvalidDifficulty(format!(
            "{} needs at least one enemy team and one player creature",
            record.name
        )));
    }
    let multipliers = [record.outgoing_damage_multiplier, record.incoming_damage_multiplier];
    if multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
        return Err(CatalogError::InvalidDifficulty(format!(
            "{} has a non-positive damage multiplier",
            record.name
        )));
    }
    Ok(Arc::new(Difficulty {
        name: record.name,
        outgoing_damage_multiplier: record.outgoing_damage_multiplier,
        incoming_damage_multiplier: record.incoming_damage_multiplier,
        enemy_team_count: record.enemy_team_count as usize,
        player_team_size: record.player_team_size as usize,
    }))
}

fn validate_stage(record: &EvolutionRecord) -> CatalogResult<()> {
    let invalid = |reason: &str| CatalogError::InvalidStage {
        species_id: record.species_id,
        level: record.level,
        reason: reason.to_string(),
    };
    let stats = [
        record.strength,
        record.max_health,
        record.agility,
        record.bounty_exp,
        record.required_exp,
        record.skill_power,
    ];
    if stats.iter().any(|stat| !stat.is_finite()) {
        return Err(invalid("statistics must be finite"));
    }
    if record.max_health <= 0.0 {
        return Err(invalid("max health must be positive"));
    }
    if !(0.0..=100.0).contains(&record.agility) {
        return Err(invalid("agility must lie within 0..=100"));
    }
    if record.strength < 0.0 || record.bounty_exp < 0.0 || record.required_exp < 0.0 {
        return Err(invalid("strength and experience values cannot be negative"));
    }
    Ok(())
}

/// Builds the stage list with every next-stage link resolved. Stages are built
/// from the highest level down so each link points at an already finished stage.
fn link_stages(
    records: &[EvolutionRecord],
    known_species: &HashSet<SpeciesId>,
) -> CatalogResult<Vec<Arc<EvolutionStage>>> {
    let mut seen = HashSet::new();
    for record in records {
        if !known_species.contains(&record.species_id) {
            return Err(CatalogError::UnknownSpecies(record.species_id));
        }
        if !seen.insert((record.species_id, record.level)) {
            return Err(CatalogError::DuplicateStage {
                species_id: record.species_id,
                level: record.level,
            });
        }
        validate_stage(record)?;
    }

    let mut ordered: Vec<&EvolutionRecord> = records.iter().collect();
    ordered.sort_by(|a, b| (b.species_id, b.level).cmp(&(a.species_id, a.level)));

    let mut linked: Vec<Arc<EvolutionStage>> = Vec::with_capacity(records.len());
    for record in ordered {
        let mut stage = EvolutionStage {
            species_id: record.species_id,
            level: record.level,
            name: record.name.clone(),
            strength: record.strength,
            max_health: record.max_health,
            agility: record.agility,
            bounty_exp: record.bounty_exp,
            required_exp: record.required_exp,
            skill_kind: record.skill_kind,
            skill_power: record.skill_power,
            next: None,
        };
        stage.next = find_next_stage(&linked, &stage).cloned();
        linked.push(Arc::new(stage));
    }

    // Restore file order so listings follow the data files.
    linked.sort_by_key(|stage| {
        records
            .iter()
            .position(|r| r.species_id == stage.species_id && r.level == stage.level)
    });
    Ok(linked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{difficulty_record, species_record, stage_record};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    fn two_stage_records() -> (Vec<SpeciesRecord>, Vec<EvolutionRecord>) {
        let species = vec![
            species_record(1, "Tidepup", Element::Water),
            species_record(2, "Rivetail", Element::Metal),
        ];
        let evolutions = vec![
            stage_record(1, 0, "Tidepup", 6.0, 30.0, 10.0),
            stage_record(2, 0, "Rivetail", 5.0, 36.0, 10.0),
            stage_record(1, 1, "Tidehound", 9.0, 45.0, 20.0),
        ];
        (species, evolutions)
    }

    #[rstest]
    #[case(Element::Water, Element::Earth, ELEMENT_BUFF)]
    #[case(Element::Water, Element::Water, ELEMENT_NERF)]
    #[case(Element::Water, Element::Metal, 1.0)]
    #[case(Element::Fire, Element::Metal, ELEMENT_NERF)]
    #[case(Element::Metal, Element::Air, ELEMENT_BUFF)]
    #[case(Element::Earth, Element::Water, 1.0)]
    #[case(Element::None, Element::Water, 1.0)]
    #[case(Element::Ice, Element::None, 1.0)]
    fn test_element_multiplier(
        #[case] attacker: Element,
        #[case] target: Element,
        #[case] expected: f32,
    ) {
        let (species, evolutions) = two_stage_records();
        let catalog =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions)
                .expect("catalog should build");
        assert_eq!(catalog.element_multiplier(attacker, target), expected);
    }

    #[test]
    fn test_nerf_is_inverse_of_buff() {
        assert!((ELEMENT_BUFF * ELEMENT_NERF - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_next_stage_links_are_resolved_at_build_time() {
        let (species, evolutions) = two_stage_records();
        let catalog =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions)
                .expect("catalog should build");

        let base = catalog.find_base_stage(1).expect("base stage");
        let next = base.next_stage().expect("Tidepup should evolve");
        assert_eq!(next.name, "Tidehound");
        assert_eq!(next.level, 1);
        assert!(next.is_final());

        let rivetail = catalog.find_base_stage(2).expect("base stage");
        assert!(rivetail.is_final());

        let scanned = find_next_stage(catalog.stages(), base).expect("scan finds level 1");
        assert!(Arc::ptr_eq(scanned, next));
    }

    #[test]
    fn test_stage_order_follows_records() {
        let (species, evolutions) = two_stage_records();
        let catalog =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions)
                .expect("catalog should build");
        let names: Vec<&str> = catalog.stages().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Tidepup", "Rivetail", "Tidehound"]);
    }

    #[test]
    fn test_missing_base_stage_is_rejected() {
        let species = vec![species_record(1, "Tidepup", Element::Water)];
        let evolutions = vec![stage_record(1, 1, "Tidehound", 9.0, 45.0, 20.0)];
        let result =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions);
        assert_eq!(result.unwrap_err(), CatalogError::MissingBaseStage(1));
    }

    #[test]
    fn test_duplicate_stage_is_rejected() {
        let species = vec![species_record(1, "Tidepup", Element::Water)];
        let evolutions = vec![
            stage_record(1, 0, "Tidepup", 6.0, 30.0, 10.0),
            stage_record(1, 0, "Tidepup Again", 6.0, 30.0, 10.0),
        ];
        let result =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions);
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateStage {
                species_id: 1,
                level: 0
            }
        );
    }

    #[test]
    fn test_evolution_of_unknown_species_is_rejected() {
        let species = vec![species_record(1, "Tidepup", Element::Water)];
        let evolutions = vec![
            stage_record(1, 0, "Tidepup", 6.0, 30.0, 10.0),
            stage_record(9, 0, "Ghost", 6.0, 30.0, 10.0),
        ];
        let result =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions);
        assert_eq!(result.unwrap_err(), CatalogError::UnknownSpecies(9));
    }

    #[test]
    fn test_out_of_range_agility_is_rejected() {
        let species = vec![species_record(1, "Tidepup", Element::Water)];
        let mut stage = stage_record(1, 0, "Tidepup", 6.0, 30.0, 10.0);
        stage.agility = 140.0;
        let result =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, vec![stage]);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidStage { species_id: 1, level: 0, .. })
        ));
    }

    #[test]
    fn test_difficulty_without_enemies_is_rejected() {
        let (species, evolutions) = two_stage_records();
        let result =
            Catalog::from_records(vec![difficulty_record("Broken", 0, 2)], species, evolutions);
        assert!(matches!(result, Err(CatalogError::InvalidDifficulty(_))));
    }

    #[test]
    fn test_random_species_uses_the_rng() {
        let (species, evolutions) = two_stage_records();
        let catalog =
            Catalog::from_records(vec![difficulty_record("Test", 1, 1)], species, evolutions)
                .expect("catalog should build");
        let mut rng = GameRng::new_for_test(vec![0.0, 0.75]);
        assert_eq!(catalog.random_species(&mut rng).id, 1);
        assert_eq!(catalog.random_species(&mut rng).id, 2);
    }

    #[test]
    fn test_bundled_data_files_load() {
        let data_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
        let catalog = Catalog::load_all(&data_path).expect("bundled data should load");

        assert!(catalog.find_difficulty("Normal").is_some());
        for species in catalog.all_species() {
            assert!(
                catalog.find_base_stage(species.id).is_some(),
                "{} lacks a base stage",
                species.name
            );
        }
        let blinkit = catalog
            .all_species()
            .iter()
            .find(|s| s.name == "Blinkit")
            .expect("Blinkit is bundled");
        assert_eq!(blinkit.element, Element::None);
    }

    #[test]
    fn test_missing_data_directory_fails_loading() {
        let result = Catalog::load_all(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
