use crate::catalog::{EvolutionStage, Species};
use crate::errors::{ActionError, ActionResult};
use std::sync::Arc;

/// A creature fighting in a team. Species and stage data are shared with the
/// catalog; only health, experience and the current stage pointer change.
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    species: Arc<Species>,
    stage: Arc<EvolutionStage>,
    health: f32,
    exp: f32,
}

impl Creature {
    /// Create a fresh creature at full health with no experience.
    pub fn new(species: Arc<Species>, stage: Arc<EvolutionStage>) -> Self {
        let health = stage.max_health;
        Creature {
            species,
            stage,
            health,
            exp: 0.0,
        }
    }

    /// Rebuild a creature from persisted values, clamped into the stage bounds.
    pub fn restore(species: Arc<Species>, stage: Arc<EvolutionStage>, health: f32, exp: f32) -> Self {
        let mut creature = Creature::new(species, stage);
        creature.health = clamp_stat(health, creature.stage.max_health);
        creature.exp = clamp_stat(exp, creature.stage.required_exp);
        creature
    }

    pub fn species(&self) -> &Arc<Species> {
        &self.species
    }

    pub fn stage(&self) -> &Arc<EvolutionStage> {
        &self.stage
    }

    pub fn name(&self) -> &str {
        &self.species.name
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.stage.max_health
    }

    pub fn exp(&self) -> f32 {
        self.exp
    }

    pub fn required_exp(&self) -> f32 {
        self.stage.required_exp
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn can_evolve(&self) -> bool {
        self.exp >= self.stage.required_exp && self.stage.next_stage().is_some() && self.is_alive()
    }

    /// Advance to the next stage. Evolving heals half of the damage taken,
    /// measured against the new maximum health.
    pub fn evolve(&mut self) -> ActionResult<()> {
        if !self.can_evolve() {
            return Err(ActionError::EvolutionUnavailable(self.species.name.clone()));
        }
        let next = match self.stage.next_stage() {
            Some(next) => Arc::clone(next),
            None => return Err(ActionError::EvolutionUnavailable(self.species.name.clone())),
        };

        let missing_health = next.max_health - self.health;
        self.health = clamp_stat(next.max_health - missing_health / 2.0, next.max_health);
        self.exp = clamp_stat(self.exp, next.required_exp);
        self.stage = next;
        Ok(())
    }

    /// Subtract `abs(amount)` from health. Returns true if this blow was fatal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.health = clamp_stat(self.health - amount.abs(), self.stage.max_health);
        was_alive && !self.is_alive()
    }

    /// Add `abs(amount)` experience, capped at the current stage requirement.
    pub fn gain_exp(&mut self, amount: f32) {
        self.exp = clamp_stat(self.exp + amount.abs(), self.stage.required_exp);
    }

    pub fn heal_fully(&mut self) {
        self.health = self.stage.max_health;
    }
}

fn clamp_stat(value: f32, max: f32) -> f32 {
    value.clamp(0.0, max.max(0.0))
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::common::{standard_catalog, TestCreatureBuilder, STRIKER, TARGET};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_creature_starts_at_base_stage() {
        let catalog = standard_catalog();
        let striker = TestCreatureBuilder::new(&catalog, STRIKER).build();

        assert_eq!(striker.stage().level, 0);
        assert_eq!(striker.health(), striker.max_health());
        assert_eq!(striker.exp(), 0.0);
        assert!(striker.is_alive());
    }

    #[test]
    fn test_damage_is_clamped_and_sign_insensitive() {
        let catalog = standard_catalog();
        let mut striker = TestCreatureBuilder::new(&catalog, STRIKER).build();

        assert!(!striker.take_damage(-5.0));
        assert_eq!(striker.health(), 15.0);

        assert!(striker.take_damage(100.0));
        assert_eq!(striker.health(), 0.0);
        assert!(!striker.is_alive());

        // Already dead: not fatal a second time.
        assert!(!striker.take_damage(3.0));
        assert_eq!(striker.health(), 0.0);
    }

    #[test]
    fn test_exp_is_capped_at_requirement() {
        let catalog = standard_catalog();
        let mut striker = TestCreatureBuilder::new(&catalog, STRIKER).build();

        striker.gain_exp(7.0);
        assert_eq!(striker.exp(), 7.0);
        striker.gain_exp(-6.0);
        assert_eq!(striker.exp(), 13.0);
        striker.gain_exp(500.0);
        assert_eq!(striker.exp(), striker.required_exp());
    }

    #[test]
    fn test_stats_stay_in_bounds_after_mixed_updates() {
        let catalog = standard_catalog();
        let mut striker = TestCreatureBuilder::new(&catalog, STRIKER).build();

        for step in 0..40 {
            let amount = (step as f32 * 3.7) - 50.0;
            if step % 2 == 0 {
                striker.take_damage(amount);
            } else {
                striker.gain_exp(amount);
            }
            assert!(striker.health() >= 0.0 && striker.health() <= striker.max_health());
            assert!(striker.exp() >= 0.0 && striker.exp() <= striker.required_exp());
        }
    }

    #[test]
    fn test_evolve_heals_half_of_missing_health() {
        let catalog = standard_catalog();
        let mut striker = TestCreatureBuilder::new(&catalog, STRIKER)
            .with_health(8.0)
            .with_exp(20.0)
            .build();
        assert!(striker.can_evolve());

        striker.evolve().expect("evolution should succeed");

        // New max 40: missing 32, half of it stays missing.
        assert_eq!(striker.stage().level, 1);
        assert_eq!(striker.stage().name, "Striker Prime");
        assert_eq!(striker.health(), 24.0);
    }

    #[test]
    fn test_evolve_rejects_without_mutation() {
        let catalog = standard_catalog();

        let mut not_ready = TestCreatureBuilder::new(&catalog, STRIKER)
            .with_exp(19.0)
            .build();
        let before = not_ready.clone();
        assert!(not_ready.evolve().is_err());
        assert_eq!(not_ready, before);

        let mut final_form = TestCreatureBuilder::new(&catalog, TARGET)
            .with_exp(1000.0)
            .build();
        let before = final_form.clone();
        assert!(final_form.evolve().is_err());
        assert_eq!(final_form, before);

        let mut dead = TestCreatureBuilder::new(&catalog, STRIKER)
            .with_exp(20.0)
            .with_health(0.0)
            .build();
        let before = dead.clone();
        assert!(dead.evolve().is_err());
        assert_eq!(dead, before);
    }

    #[test]
    fn test_heal_fully_restores_stage_max() {
        let catalog = standard_catalog();
        let mut striker = TestCreatureBuilder::new(&catalog, STRIKER)
            .with_health(1.0)
            .build();
        striker.heal_fully();
        assert_eq!(striker.health(), 20.0);
    }
}
