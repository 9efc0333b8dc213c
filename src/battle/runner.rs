//! Turn-level helpers for whatever drives a game: the console loop, an
//! unattended bot-vs-bot game, or a test.

use crate::battle::ai::Behavior;
use crate::battle::state::BattleState;
use crate::errors::ActionResult;
use crate::player::{PlayerAction, Side};
use crate::rng::GameRng;

/// A fully specified turn: the action plus, for a reselection, its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCommand {
    Attack,
    UseSkill,
    Evolve,
    Select(usize),
}

/// Where the game stands after a turn has been closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Ongoing,
    /// The previous enemy team fell and the next one is now up.
    EnemyPassed { next_enemy: usize },
    Finished { winner: Side },
}

/// Invoke the mutator matching `command` for `side`.
pub fn apply_command(
    state: &mut BattleState,
    side: Side,
    command: TurnCommand,
    rng: &mut GameRng,
) -> ActionResult<()> {
    match command {
        TurnCommand::Attack => state.attack(side, rng),
        TurnCommand::UseSkill => state.use_skill(side, rng),
        TurnCommand::Evolve => state.evolve_selected(side),
        TurnCommand::Select(index) => state.select_creature(side, index),
    }
}

/// Let `behavior` play one turn for `side`, unless an obligatory turn
/// already took care of it. Returns the command that was applied, if any.
pub fn take_ai_turn(
    state: &mut BattleState,
    side: Side,
    behavior: &dyn Behavior,
    rng: &mut GameRng,
) -> ActionResult<Option<TurnCommand>> {
    if state.try_obligatory_turn(side) {
        return Ok(None);
    }
    let command = match behavior.decide_action(side, state, rng)? {
        PlayerAction::Attack => TurnCommand::Attack,
        PlayerAction::UseSkill => TurnCommand::UseSkill,
        PlayerAction::Evolve => TurnCommand::Evolve,
        PlayerAction::Reselect => TurnCommand::Select(behavior.decide_reselection(side, state, rng)?),
    };
    apply_command(state, side, command, rng)?;
    Ok(Some(command))
}

/// Close the current turn: hand it to the other side, then settle the round
/// if a team fell.
pub fn end_turn(state: &mut BattleState) -> ActionResult<RoundStatus> {
    state.swap_turns();

    if state.player_team().is_defeated() {
        return Ok(RoundStatus::Finished { winner: Side::Enemy });
    }
    if state.current_enemy_team().is_defeated() {
        return if state.advance_to_next_enemy()? {
            Ok(RoundStatus::EnemyPassed {
                next_enemy: state.current_enemy_index(),
            })
        } else {
            Ok(RoundStatus::Finished { winner: Side::Player })
        };
    }
    Ok(RoundStatus::Ongoing)
}

/// Play the whole game with a behavior on each side. Returns the winner, or
/// None if `max_turns` turns passed without one.
pub fn run_ai_battle(
    state: &mut BattleState,
    player: &dyn Behavior,
    enemy: &dyn Behavior,
    rng: &mut GameRng,
    max_turns: u32,
) -> ActionResult<Option<Side>> {
    for _ in 0..max_turns {
        let side = state.active_side();
        let behavior = if side.is_player() { player } else { enemy };
        take_ai_turn(state, side, behavior, rng)?;

        if let RoundStatus::Finished { winner } = end_turn(state)? {
            tracing::info!(%winner, turns = state.turn_index(), "bot game finished");
            return Ok(Some(winner));
        }
    }
    tracing::warn!(max_turns, "bot game hit the turn limit");
    Ok(None)
}
