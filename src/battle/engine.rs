//! Mutators of the battle state. Every turn-taking mutator checks its legality
//! predicate first and returns an `ActionError` instead of changing anything
//! when the caller asked for something illegal.

use crate::battle::calculators::AttackOutcome;
use crate::battle::events::{
    BattleEvent, DamageEvent, DeathEvent, EnemyPassEvent, EvolutionEvent, ObligatoryTurnEvent,
    SelectionEvent,
};
use crate::battle::state::BattleState;
use crate::errors::{ActionError, ActionResult};
use crate::player::{PlayerAction, Side};
use crate::rng::GameRng;

impl BattleState {
    /// Send the creature at `index` to the arena for `side`.
    pub fn select_creature(&mut self, side: Side, index: usize) -> ActionResult<()> {
        if !self.can_select(side, index) {
            return Err(reject(ActionError::IllegalSelection { side, index }));
        }

        let team = self.team_mut(side);
        team.set_selected(index)?;
        let creature = team.selected().clone();
        self.turn_index += 1;

        tracing::debug!(?side, index, creature = creature.name(), "creature selected");
        self.events.publish(BattleEvent::Selection(SelectionEvent {
            side,
            index,
            creature,
        }));
        Ok(())
    }

    /// Evolve the creature `side` has on the arena.
    pub fn evolve_selected(&mut self, side: Side) -> ActionResult<()> {
        if !self.can_evolve(side) {
            return Err(reject(ActionError::IllegalAction {
                side,
                action: PlayerAction::Evolve,
            }));
        }

        let creature = self.team_mut(side).selected_mut();
        creature.evolve()?;
        let creature = creature.clone();
        self.turn_index += 1;

        tracing::debug!(?side, stage = %creature.stage().name, "creature evolved");
        self.events
            .publish(BattleEvent::Evolution(EvolutionEvent { side, creature }));
        Ok(())
    }

    /// Default attack from `side`'s creature onto the opposing creature.
    pub fn attack(&mut self, side: Side, rng: &mut GameRng) -> ActionResult<()> {
        if !self.can_attack(side) {
            return Err(reject(ActionError::IllegalAction {
                side,
                action: PlayerAction::Attack,
            }));
        }
        self.resolve_default_attack(side, rng);
        self.turn_index += 1;
        Ok(())
    }

    /// Skill use. The legality check requires a skill on the stage; the
    /// resolution itself goes through `resolve_skill`.
    pub fn use_skill(&mut self, side: Side, rng: &mut GameRng) -> ActionResult<()> {
        if !self.can_use_skill(side) {
            return Err(reject(ActionError::IllegalAction {
                side,
                action: PlayerAction::UseSkill,
            }));
        }
        self.resolve_skill(side, rng);
        self.turn_index += 1;
        Ok(())
    }

    /// Force the only possible replacement onto the arena when `side`'s active
    /// creature died and exactly one creature is left. Returns true if a turn
    /// was made this way and the side should not be asked for an action.
    pub fn try_obligatory_turn(&mut self, side: Side) -> bool {
        let team = self.team(side);
        if team.selected().is_alive() || team.selectable_count() != 1 {
            return false;
        }
        let survivor = match (0..team.len()).find(|&i| team.is_selectable(i)) {
            Some(index) => index,
            None => return false,
        };

        if self.select_creature(side, survivor).is_err() {
            return false;
        }
        self.events
            .publish(BattleEvent::ObligatoryTurn(ObligatoryTurnEvent {
                side,
                action: PlayerAction::Reselect,
            }));
        true
    }

    /// Hand the turn to the other side.
    pub fn swap_turns(&mut self) {
        self.is_player_turn = !self.is_player_turn;
    }

    /// Move on from a defeated enemy team. Returns false when it was the last
    /// one (the player has won), true when the next enemy team is now up. The
    /// player team is healed and rewarded in between.
    pub fn advance_to_next_enemy(&mut self) -> ActionResult<bool> {
        if !self.current_enemy_team().is_defeated() {
            return Err(reject(ActionError::EnemyNotDefeated(self.current_enemy_index)));
        }
        if self.current_enemy_index + 1 >= self.enemy_teams.len() {
            return Ok(false);
        }

        let passed = self.current_enemy_index;
        self.events
            .publish(BattleEvent::EnemyPass(EnemyPassEvent {
                enemy_index: passed,
            }));
        self.current_enemy_index += 1;

        let bonus = self.rules.enemy_pass_exp_bonus;
        for creature in self.player_team.creatures_mut() {
            creature.heal_fully();
            creature.gain_exp(bonus);
        }

        tracing::info!(passed, next = self.current_enemy_index, "enemy team defeated");
        Ok(true)
    }

    /// Skill kinds carry no mechanics of their own yet, so every kind resolves
    /// as a default attack.
    fn resolve_skill(&mut self, side: Side, rng: &mut GameRng) {
        let kind = self.team(side).selected().stage().skill_kind;
        tracing::debug!(?side, kind, "skill resolved as default attack");
        self.resolve_default_attack(side, rng);
    }

    fn resolve_default_attack(&mut self, side: Side, rng: &mut GameRng) {
        let attacker_element = self.team(side).selected().species().element;
        let target_element = self.team(side.opponent()).selected().species().element;
        let element_multiplier = self
            .catalog
            .element_multiplier(attacker_element, target_element);
        let draw = rng.next_unit("dodge roll");

        let enemy_team = &mut self.enemy_teams[self.current_enemy_index];
        let player_team = &mut self.player_team;
        let (attacker, target) = match side {
            Side::Player => (player_team.selected_mut(), enemy_team.selected_mut()),
            Side::Enemy => (enemy_team.selected_mut(), player_team.selected_mut()),
        };

        let outcome = AttackOutcome::resolve(attacker, target, element_multiplier, draw);
        target.take_damage(outcome.damage);
        let fatal = !target.is_alive();
        if fatal {
            attacker.gain_exp(target.stage().bounty_exp);
        }
        let attacker = attacker.clone();
        let target = target.clone();

        tracing::debug!(
            ?side,
            attacker = attacker.name(),
            target = target.name(),
            element_multiplier,
            damage = outcome.damage,
            dodged = outcome.is_dodge(),
            "attack resolved"
        );

        self.events.publish(BattleEvent::Damage(DamageEvent {
            side,
            attacker,
            target: target.clone(),
            value: outcome.damage,
        }));
        if fatal {
            self.events.publish(BattleEvent::Death(DeathEvent {
                side: side.opponent(),
                creature: target,
            }));
        }
    }
}

fn reject(err: ActionError) -> ActionError {
    tracing::warn!(%err, "rejected illegal battle action");
    err
}
