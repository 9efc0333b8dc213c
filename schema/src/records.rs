use crate::Element;
use serde::{Deserialize, Serialize};

/// Identifier of a species as written in the metadata files.
pub type SpeciesId = u32;

/// One difficulty preset from `difficulties.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRecord {
    pub name: String,
    pub outgoing_damage_multiplier: f32,
    pub incoming_damage_multiplier: f32,
    pub enemy_team_count: u32,
    pub player_team_size: u32,
}

/// One species from `creatures.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: SpeciesId,
    pub name: String,
    #[serde(default)]
    pub element: Element,
}

/// One evolution stage from `evolutions.ron`. Level 0 is the base form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRecord {
    pub species_id: SpeciesId,
    pub level: u32,
    pub name: String,
    pub strength: f32,
    pub max_health: f32,
    pub agility: f32,   // 0..=100, chance in percent to dodge an attack
    pub bounty_exp: f32, // granted to whoever kills this stage
    pub required_exp: f32,
    #[serde(default)]
    pub skill_kind: u32,
    #[serde(default)]
    pub skill_power: f32,
}
