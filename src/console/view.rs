//! Text rendering of the game for the console.

use crate::battle::events::{display_amount, BattleEvent};
use crate::creature::Creature;
use crate::team::Team;

/// Health or experience points per bar segment.
pub const DISPLAY_UNIT: f32 = 5.0;

pub const MAIN_MENU: &str = "===[]==[ MAIN MENU ]==[]===";
pub const MAIN_MENU_OPTIONS: [&str; 4] = ["New game", "Load game", "Watch a bot game", "Exit"];

pub fn bar(value: f32, max: f32, unit: f32, sign: char) -> String {
    let filled = (value.max(0.0) / unit) as usize;
    let total = (max.max(0.0) / unit) as usize;
    let mut bar = String::with_capacity(total + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(sign).take(filled.min(total)));
    bar.extend(std::iter::repeat(' ').take(total.saturating_sub(filled)));
    bar.push(']');
    bar
}

/// "A, B and C will be a great team!"
pub fn team_presentation(names: &[&str]) -> String {
    let mut line = String::new();
    for (index, name) in names.iter().enumerate() {
        if index > 0 {
            line.push_str(if index == names.len() - 1 { " and " } else { ", " });
        }
        line.push_str(name);
    }
    line.push_str(" will be a great team!");
    line
}

fn creature_lines(index: usize, creature: &Creature, on_arena: bool) -> [String; 2] {
    let stage = creature.stage();
    let mut header = format!(
        "{}) {} <{} '{}'>",
        index,
        creature.name(),
        stage.level + 1,
        stage.name
    );
    if on_arena {
        header.push_str(" <--- ON ARENA --->");
    }

    let health = if creature.is_alive() {
        format!(
            "{}/{} HP {}\t\t\t\t",
            display_amount(creature.health()),
            display_amount(creature.max_health()),
            bar(creature.health(), creature.max_health(), DISPLAY_UNIT, '=')
        )
    } else {
        "-- DEAD -- \t\t".to_string()
    };
    let exp = format!(
        "{}/{} EXP {}",
        display_amount(creature.exp()),
        display_amount(creature.required_exp()),
        bar(creature.exp(), creature.required_exp(), DISPLAY_UNIT, '*')
    );

    [header, format!("{}{}", health, exp)]
}

pub fn team_status(team: &Team, player_team: bool) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        if player_team { "---* YOUR TEAM *---" } else { "---* ENEMY TEAM *---" }.to_string(),
    ];
    for (index, creature) in team.creatures().iter().enumerate() {
        lines.extend(creature_lines(index, creature, index == team.selected_index()));
    }
    lines
}

pub fn turn_header(player_turn: bool) -> [&'static str; 2] {
    ["", if player_turn { "---* PLAYER TURN *---" } else { "---* COMPUTER TURN *---" }]
}

pub fn round_winner(player: bool) -> [&'static str; 5] {
    [
        "",
        "--*-- --*-- --*--",
        if player { "PLAYER WINS ROUND!" } else { "COMPUTER WINS ROUND!" },
        "--*-- --*-- --*--",
        "",
    ]
}

pub fn game_winner(player: bool) -> [&'static str; 5] {
    [
        "",
        "==*== ==*== ==*==",
        if player { "PLAYER WINS GAME!" } else { "COMPUTER WINS GAME!" },
        "==*== ==*== ==*==",
        "",
    ]
}

/// Console lines for one event. The enemy pass gets a frame of its own.
pub fn event_lines(event: &BattleEvent) -> Vec<String> {
    let text = event.format();
    match event {
        BattleEvent::EnemyPass(_) => vec![
            "--- *** --- *** ---".to_string(),
            text,
            "--- *** --- *** ---".to_string(),
            String::new(),
        ],
        _ => vec![text],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::events::EnemyPassEvent;
    use crate::battle::tests::common::{standard_catalog, TestCreatureBuilder, STRIKER, TARGET};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(8.0, 20.0, "[=   ]")]
    #[case(20.0, 20.0, "[====]")]
    #[case(0.0, 15.0, "[   ]")]
    #[case(3.0, 0.0, "[]")]
    fn test_bar(#[case] value: f32, #[case] max: f32, #[case] expected: &str) {
        assert_eq!(bar(value, max, DISPLAY_UNIT, '='), expected);
    }

    #[rstest]
    #[case(&["Tidepup"], "Tidepup will be a great team!")]
    #[case(&["Tidepup", "Gustling"], "Tidepup and Gustling will be a great team!")]
    #[case(
        &["Tidepup", "Gustling", "Blinkit"],
        "Tidepup, Gustling and Blinkit will be a great team!"
    )]
    fn test_team_presentation(#[case] names: &[&str], #[case] expected: &str) {
        assert_eq!(team_presentation(names), expected);
    }

    #[test]
    fn test_team_status_marks_arena_and_dead() {
        let catalog = standard_catalog();
        let team = Team::new(vec![
            TestCreatureBuilder::new(&catalog, STRIKER)
                .with_health(10.0)
                .with_exp(5.0)
                .build(),
            TestCreatureBuilder::new(&catalog, TARGET).with_health(0.0).build(),
        ])
        .expect("non-empty team");

        let lines = team_status(&team, true);

        assert_eq!(
            lines,
            vec![
                String::new(),
                "---* YOUR TEAM *---".to_string(),
                "0) Striker <1 'Striker'> <--- ON ARENA --->".to_string(),
                "10/20 HP [==  ]\t\t\t\t5/20 EXP [*   ]".to_string(),
                "1) Target <1 'Target'>".to_string(),
                "-- DEAD -- \t\t0/30 EXP [      ]".to_string(),
            ]
        );
    }

    #[test]
    fn test_enemy_pass_is_framed() {
        let lines = event_lines(&BattleEvent::EnemyPass(EnemyPassEvent { enemy_index: 0 }));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "ENEMY No.0 DEFEATED!!!");
    }
}
