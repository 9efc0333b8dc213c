use crate::battle::events::EventBus;
use crate::catalog::{Catalog, Difficulty};
use crate::errors::{ActionError, ActionResult, GameResult};
use crate::player::{PlayerAction, Side};
use crate::rng::GameRng;
use crate::team::Team;
use schema::SpeciesId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// When a side may be offered the option to change its creature on the arena.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReselectionPolicy {
    /// At least one alive creature, even if it is the one already on the arena.
    AnyAlive,
    /// At least one alive creature other than the one on the arena.
    #[default]
    AnotherAlive,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BattleRules {
    pub reselection: ReselectionPolicy,
    /// Experience every player creature gets when an enemy team is passed.
    pub enemy_pass_exp_bonus: f32,
}

impl Default for BattleRules {
    fn default() -> Self {
        Self {
            reselection: ReselectionPolicy::default(),
            enemy_pass_exp_bonus: 5.0,
        }
    }
}

/// The whole game: the player team, the queue of enemy teams and whose turn it is.
///
/// The phase of the game is implied by the fields rather than stored: a round is
/// over once either the player team or the current enemy team is defeated, and
/// the game is over once the player team or every enemy team is defeated.
#[derive(Debug)]
pub struct BattleState {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) difficulty: Arc<Difficulty>,
    pub(crate) rules: BattleRules,
    pub(crate) turn_index: u32,
    pub(crate) is_player_turn: bool,
    pub(crate) player_team: Team,
    pub(crate) enemy_teams: Vec<Team>,
    pub(crate) current_enemy_index: usize,
    pub(crate) events: EventBus,
}

impl BattleState {
    /// Start a new game: the player team from `picks`, and one random enemy
    /// team per difficulty step, each one creature larger than the last.
    pub fn new(
        catalog: Arc<Catalog>,
        difficulty: Arc<Difficulty>,
        picks: &[SpeciesId],
        rules: BattleRules,
        rng: &mut GameRng,
    ) -> GameResult<Self> {
        if picks.len() != difficulty.player_team_size {
            return Err(ActionError::InvalidTeamSize {
                expected: difficulty.player_team_size,
                actual: picks.len(),
            }
            .into());
        }

        let player_team = Team::from_picks(&catalog, picks)?;
        let enemy_teams = (0..difficulty.enemy_team_count)
            .map(|ordinal| Team::random(&catalog, difficulty.player_team_size + ordinal, rng))
            .collect::<GameResult<Vec<_>>>()?;

        tracing::info!(
            difficulty = %difficulty.name,
            player_team_size = player_team.len(),
            enemy_teams = enemy_teams.len(),
            "Started new game"
        );

        Ok(Self::from_teams(catalog, difficulty, rules, player_team, enemy_teams)?)
    }

    /// Assemble a game from prepared teams, starting at the first enemy on the
    /// player's turn.
    pub fn from_teams(
        catalog: Arc<Catalog>,
        difficulty: Arc<Difficulty>,
        rules: BattleRules,
        player_team: Team,
        enemy_teams: Vec<Team>,
    ) -> ActionResult<Self> {
        if enemy_teams.is_empty() {
            return Err(ActionError::EmptyTeam);
        }
        Ok(BattleState {
            catalog,
            difficulty,
            rules,
            turn_index: 0,
            is_player_turn: true,
            player_team,
            enemy_teams,
            current_enemy_index: 0,
            events: EventBus::new(),
        })
    }

    // === Read-only queries ===

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn difficulty(&self) -> &Arc<Difficulty> {
        &self.difficulty
    }

    pub fn rules(&self) -> &BattleRules {
        &self.rules
    }

    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn is_player_turn(&self) -> bool {
        self.is_player_turn
    }

    /// The side whose turn it currently is.
    pub fn active_side(&self) -> Side {
        if self.is_player_turn {
            Side::Player
        } else {
            Side::Enemy
        }
    }

    pub fn player_team(&self) -> &Team {
        &self.player_team
    }

    pub fn enemy_teams(&self) -> &[Team] {
        &self.enemy_teams
    }

    pub fn enemy_team(&self, index: usize) -> Option<&Team> {
        self.enemy_teams.get(index)
    }

    pub fn enemy_teams_count(&self) -> usize {
        self.enemy_teams.len()
    }

    pub fn current_enemy_index(&self) -> usize {
        self.current_enemy_index
    }

    pub fn current_enemy_team(&self) -> &Team {
        &self.enemy_teams[self.current_enemy_index]
    }

    /// The team currently fighting for `side`.
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Player => &self.player_team,
            Side::Enemy => &self.enemy_teams[self.current_enemy_index],
        }
    }

    pub(crate) fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Player => &mut self.player_team,
            Side::Enemy => &mut self.enemy_teams[self.current_enemy_index],
        }
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn are_all_enemy_teams_defeated(&self) -> bool {
        self.enemy_teams.iter().all(Team::is_defeated)
    }

    pub fn is_round_over(&self) -> bool {
        self.player_team.is_defeated() || self.current_enemy_team().is_defeated()
    }

    pub fn is_game_over(&self) -> bool {
        self.player_team.is_defeated() || self.are_all_enemy_teams_defeated()
    }

    /// The winning side once the game is over.
    pub fn winner(&self) -> Option<Side> {
        if self.player_team.is_defeated() {
            Some(Side::Enemy)
        } else if self.are_all_enemy_teams_defeated() {
            Some(Side::Player)
        } else {
            None
        }
    }

    // === Legality predicates ===

    /// Whether `side` may be offered a change of the creature on the arena.
    pub fn can_select_any(&self, side: Side) -> bool {
        let team = self.team(side);
        let selectable = (0..team.len()).filter(|&i| self.can_select(side, i));
        match self.rules.reselection {
            ReselectionPolicy::AnyAlive => selectable.count() > 0,
            ReselectionPolicy::AnotherAlive => {
                selectable.filter(|&i| i != team.selected_index()).count() > 0
            }
        }
    }

    pub fn can_select(&self, side: Side, index: usize) -> bool {
        self.team(side).is_selectable(index)
    }

    pub fn can_evolve(&self, side: Side) -> bool {
        self.team(side).selected().can_evolve()
    }

    pub fn can_attack(&self, side: Side) -> bool {
        self.team(side).selected().is_alive()
    }

    pub fn can_use_skill(&self, side: Side) -> bool {
        let creature = self.team(side).selected();
        creature.is_alive() && creature.stage().has_skill()
    }

    /// Every action `side` may take right now, in menu order.
    pub fn legal_actions(&self, side: Side) -> Vec<PlayerAction> {
        let mut actions = Vec::new();
        if self.can_attack(side) {
            actions.push(PlayerAction::Attack);
        }
        if self.can_use_skill(side) {
            actions.push(PlayerAction::UseSkill);
        }
        if self.can_evolve(side) {
            actions.push(PlayerAction::Evolve);
        }
        if self.can_select_any(side) {
            actions.push(PlayerAction::Reselect);
        }
        actions
    }

    pub fn is_legal(&self, side: Side, action: PlayerAction) -> bool {
        match action {
            PlayerAction::Attack => self.can_attack(side),
            PlayerAction::UseSkill => self.can_use_skill(side),
            PlayerAction::Evolve => self.can_evolve(side),
            PlayerAction::Reselect => self.can_select_any(side),
        }
    }
}
