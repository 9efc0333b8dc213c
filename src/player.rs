use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the arena an action or query concerns.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn is_player(self) -> bool {
        self == Side::Player
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Enemy => write!(f, "Bot"),
        }
    }
}

/// The kinds of turn a side can take with its creature on the arena.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Attack,
    UseSkill,
    Evolve,
    // Sending a different creature to the arena.
    Reselect,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerAction::Attack => "Use attack",
            PlayerAction::UseSkill => "Use skill",
            PlayerAction::Evolve => "Evolution",
            PlayerAction::Reselect => "Change creature on the arena",
        };
        write!(f, "{}", name)
    }
}
