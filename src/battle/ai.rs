//! A module for defining AI behaviors for computer-controlled teams.

use crate::battle::state::BattleState;
use crate::errors::{ActionError, ActionResult};
use crate::player::{PlayerAction, Side};
use crate::rng::GameRng;

/// A trait for any system that can decide on a battle action.
/// This provides a common interface for different AI difficulties or strategies.
pub trait Behavior {
    /// Inspects the battle state and decides on the next action for the given side.
    fn decide_action(
        &self,
        side: Side,
        state: &BattleState,
        rng: &mut GameRng,
    ) -> ActionResult<PlayerAction>;

    /// Picks the index of the creature to send to the arena after choosing
    /// `PlayerAction::Reselect`.
    fn decide_reselection(
        &self,
        side: Side,
        state: &BattleState,
        rng: &mut GameRng,
    ) -> ActionResult<usize>;
}

const ATTACK_WEIGHT: usize = 3;
const SKILL_WEIGHT: usize = 2;
const EVOLVE_WEIGHT: usize = 5;
const RESELECT_WEIGHT: usize = 1;

/// Draws uniformly from a weighted list of the legal actions. Evolving is the
/// most likely pick whenever it is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRandomAI;

impl WeightedRandomAI {
    pub fn new() -> Self {
        Self
    }

    /// The flattened candidate list: every action appears once per unit of weight.
    pub fn candidates(&self, side: Side, state: &BattleState) -> Vec<PlayerAction> {
        let mut candidates = Vec::new();
        if state.can_attack(side) {
            candidates.extend([PlayerAction::Attack; ATTACK_WEIGHT]);
        }
        if state.can_use_skill(side) {
            candidates.extend([PlayerAction::UseSkill; SKILL_WEIGHT]);
        }
        if state.can_evolve(side) {
            candidates.extend([PlayerAction::Evolve; EVOLVE_WEIGHT]);
        }
        if state.team(side).selectable_count() > 1 && state.can_select_any(side) {
            candidates.extend([PlayerAction::Reselect; RESELECT_WEIGHT]);
        }
        candidates
    }
}

impl Behavior for WeightedRandomAI {
    fn decide_action(
        &self,
        side: Side,
        state: &BattleState,
        rng: &mut GameRng,
    ) -> ActionResult<PlayerAction> {
        let candidates = self.candidates(side, state);
        if candidates.is_empty() {
            tracing::warn!(?side, "decision policy found no legal action");
            return Err(ActionError::NoLegalAction(side));
        }
        let action = candidates[rng.next_index(candidates.len(), "ai action")];
        tracing::debug!(?side, ?action, options = candidates.len(), "ai chose action");
        Ok(action)
    }

    fn decide_reselection(
        &self,
        side: Side,
        state: &BattleState,
        rng: &mut GameRng,
    ) -> ActionResult<usize> {
        let candidates = state.team(side).reselection_candidates();
        if candidates.is_empty() {
            tracing::warn!(?side, "decision policy found no creature to switch to");
            return Err(ActionError::NoReselectionCandidate(side));
        }
        let index = candidates[rng.next_index(candidates.len(), "ai reselection")];
        tracing::debug!(?side, index, "ai chose reselection");
        Ok(index)
    }
}
