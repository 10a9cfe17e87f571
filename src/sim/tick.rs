//! Engine entry points
//!
//! Round setup, player input, enemy ticks and the round/level state machine.
//! Every function takes the engine state plus the driver-owned stats and
//! appends informational events; nothing here touches a clock or a platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{Outcome, evaluate};
use super::difficulty::{complexity, total_rounds};
use super::movement::step_enemies;
use super::placement::{PlacementError, place_entities};
use super::state::{
    Direction, GameEvent, GameOverReason, GamePhase, GameState, GameStats, RoundSnapshot,
};
use crate::clamp_to_grid;
use crate::consts::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("round setup failed: {0}")]
    Placement(#[from] PlacementError),
}

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    Move(Direction),
    /// Only honoured after a game over
    Restart,
    /// Toggle pause
    Pause,
    /// End the current game
    EndGame,
}

/// Set up a fresh round for `stats.level` / `stats.round`
pub fn initialize_round(
    state: &mut GameState,
    stats: &mut GameStats,
    events: &mut Vec<GameEvent>,
) -> Result<RoundSnapshot, SimError> {
    let config = complexity(stats.level, stats.round);
    let placement = place_entities(&mut state.rng, config)?;

    state.player = START;
    state.last_move = None;
    state.enemies = placement.enemies;
    state.keys = placement.keys;
    state.keys_remaining = config.key_count;
    state.goal_open = false;
    state.advance_in_ms = 0;
    state.phase = GamePhase::Playing;
    state.started = true;
    state.normalize_order();

    let total = total_rounds(stats.level);
    log::info!(
        "Level {} round {}/{}: {} keys, {} enemies",
        stats.level,
        stats.round,
        total,
        config.key_count,
        config.enemy_count
    );
    events.push(GameEvent::RoundStarted {
        level: stats.level,
        round: stats.round,
        total_rounds: total,
        keys: config.key_count,
        enemies: config.enemy_count,
    });

    resolve(state, stats, events);
    Ok(state.round_snapshot())
}

/// Apply one player command
pub fn handle_input(
    state: &mut GameState,
    stats: &mut GameStats,
    input: Input,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    match input {
        Input::Pause => match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                events.push(GameEvent::Resumed);
            }
            // Pending advancement and game over are left alone
            _ => {}
        },

        Input::Move(direction) => {
            if state.phase != GamePhase::Playing || !state.started {
                return Ok(());
            }
            let delta = direction.delta();
            let target = clamp_to_grid(state.player + delta);
            if target != state.player {
                state.player = target;
                state.last_move = Some(delta);
                resolve(state, stats, events);
            }
        }

        Input::Restart => {
            if state.phase == GamePhase::GameOver {
                restart(state, stats, events)?;
            }
        }

        Input::EndGame => end_game(state, events),
    }

    Ok(())
}

/// Advance enemies by one step. No-op unless playing.
pub fn on_tick(state: &mut GameState, stats: &mut GameStats, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing || !state.started {
        return;
    }
    step_enemies(&mut state.enemies);
    resolve(state, stats, events);
}

/// Count down a pending round/level advancement by `elapsed_ms`
pub fn advance(
    state: &mut GameState,
    stats: &mut GameStats,
    elapsed_ms: u32,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    if !matches!(state.phase, GamePhase::RoundComplete | GamePhase::LevelComplete) {
        return Ok(());
    }

    state.advance_in_ms = state.advance_in_ms.saturating_sub(elapsed_ms);
    if state.advance_in_ms > 0 {
        return Ok(());
    }

    if state.phase == GamePhase::LevelComplete {
        stats.level = stats.level.saturating_add(1);
        stats.round = 1;
    } else {
        stats.round = stats.round.saturating_add(1);
    }
    stats.keys_collected = 0;
    initialize_round(state, stats, events)?;
    Ok(())
}

/// Reset progress counters and start over from level 1, round 1
pub fn restart(
    state: &mut GameState,
    stats: &mut GameStats,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    log::info!("Restarting (score was {})", stats.score);
    stats.reset_for_restart();
    initialize_round(state, stats, events)?;
    Ok(())
}

/// End the game on request
pub fn end_game(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            reason: GameOverReason::Manual,
        });
    }
}

/// Evaluate the board and complete the round if the goal was reached
fn resolve(state: &mut GameState, stats: &mut GameStats, events: &mut Vec<GameEvent>) {
    if evaluate(state, stats, events) == Outcome::GoalReached {
        complete_round(state, stats, events);
    }
}

fn complete_round(state: &mut GameState, stats: &mut GameStats, events: &mut Vec<GameEvent>) {
    let level = stats.level;
    let total = total_rounds(level);
    let bonus = ROUND_BONUS * level as u64;

    stats.award(bonus);
    stats.rounds_completed = stats.rounds_completed.saturating_add(1);

    if stats.round >= total {
        state.phase = GamePhase::LevelComplete;
        state.advance_in_ms = state.rules.level_delay_ms;
        log::info!("Level {} complete, score {}", level, stats.score);
        events.push(GameEvent::LevelComplete {
            completed_level: level,
            new_level: level.saturating_add(1),
            total_score: stats.score,
        });
    } else {
        state.phase = GamePhase::RoundComplete;
        state.advance_in_ms = state.rules.round_delay_ms;
        log::info!("Round {}/{} complete, +{} bonus", stats.round, total, bonus);
        events.push(GameEvent::RoundComplete {
            round: stats.round,
            total_rounds: total,
            bonus,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, Rules};
    use glam::IVec2;

    fn new_game(seed: u64) -> (GameState, GameStats, Vec<GameEvent>) {
        let mut state = GameState::new(seed, Rules::default());
        let mut stats = GameStats::default();
        let mut events = Vec::new();
        initialize_round(&mut state, &mut stats, &mut events).unwrap();
        (state, stats, events)
    }

    /// Replace the generated board with a hand-made one
    fn set_board(state: &mut GameState, player: IVec2, enemies: &[IVec2], keys: &[IVec2]) {
        state.player = player;
        state.enemies = enemies
            .iter()
            .enumerate()
            .map(|(i, &pos)| Enemy {
                id: i as u32,
                pos,
                dir: IVec2::new(1, 1),
            })
            .collect();
        state.keys = keys.to_vec();
        state.keys_remaining = keys.len() as u32;
        state.goal_open = keys.is_empty();
    }

    fn walk(
        state: &mut GameState,
        stats: &mut GameStats,
        events: &mut Vec<GameEvent>,
        moves: &[Direction],
    ) {
        for &dir in moves {
            handle_input(state, stats, Input::Move(dir), events).unwrap();
        }
    }

    #[test]
    fn test_initialize_round() {
        let (state, _stats, events) = new_game(5);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player, START);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.keys.len(), 3);
        assert_eq!(state.keys_remaining, 3);
        assert!(!state.goal_open);
        assert_eq!(
            events,
            vec![GameEvent::RoundStarted {
                level: 1,
                round: 1,
                total_rounds: 5,
                keys: 3,
                enemies: 2
            }]
        );
    }

    #[test]
    fn test_move_is_clamped() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, START, &[], &[IVec2::new(5, 5)]);
        walk(&mut state, &mut stats, &mut events, &[Direction::Up, Direction::Left]);
        assert_eq!(state.player, START);
        walk(&mut state, &mut stats, &mut events, &[Direction::Right, Direction::Down]);
        assert_eq!(state.player, IVec2::new(1, 1));
    }

    #[test]
    fn test_caught_moving_onto_enemy() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, IVec2::new(8, 9), &[GOAL], &[]);
        walk(&mut state, &mut stats, &mut events, &[Direction::Right]);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                reason: GameOverReason::Caught
            })
        );
    }

    #[test]
    fn test_caught_by_enemy_tick() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, IVec2::new(3, 3), &[IVec2::new(2, 2)], &[IVec2::new(7, 7)]);
        on_tick(&mut state, &mut stats, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_clear_round_scoring() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(
            &mut state,
            START,
            &[IVec2::new(0, 9)],
            &[IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(3, 0)],
        );
        walk(&mut state, &mut stats, &mut events, &[Direction::Right; 3]);
        assert_eq!(stats.score, 300);
        assert!(state.goal_open);

        walk(&mut state, &mut stats, &mut events, &[Direction::Right; 6]);
        walk(&mut state, &mut stats, &mut events, &[Direction::Down; 9]);
        assert_eq!(state.phase, GamePhase::RoundComplete);
        assert_eq!(stats.score, 800);
        assert_eq!(stats.session_score, 800);
        assert_eq!(stats.rounds_completed, 1);
        assert_eq!(
            events.last(),
            Some(&GameEvent::RoundComplete {
                round: 1,
                total_rounds: 5,
                bonus: 500
            })
        );

        // Input is ignored while the next round is pending
        walk(&mut state, &mut stats, &mut events, &[Direction::Left]);
        assert_eq!(state.player, GOAL);

        advance(&mut state, &mut stats, 1999, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::RoundComplete);
        advance(&mut state, &mut stats, 1, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(stats.round, 2);
        assert_eq!(stats.keys_collected, 0);
        assert_eq!(stats.keys, 3);
        assert_eq!(state.player, START);
    }

    #[test]
    fn test_locked_goal_rejects_move() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, IVec2::new(8, 9), &[], &[IVec2::new(4, 4)]);
        walk(&mut state, &mut stats, &mut events, &[Direction::Right]);
        assert_eq!(state.player, IVec2::new(8, 9));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(events.last(), Some(&GameEvent::GoalLocked { keys_remaining: 1 }));
    }

    #[test]
    fn test_last_round_completes_level() {
        let mut state = GameState::new(11, Rules::default());
        let mut stats = GameStats {
            round: 5,
            score: 2000,
            ..Default::default()
        };
        let mut events = Vec::new();
        initialize_round(&mut state, &mut stats, &mut events).unwrap();
        set_board(&mut state, IVec2::new(9, 8), &[], &[]);

        walk(&mut state, &mut stats, &mut events, &[Direction::Down]);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert_eq!(
            events.last(),
            Some(&GameEvent::LevelComplete {
                completed_level: 1,
                new_level: 2,
                total_score: 2500
            })
        );

        advance(&mut state, &mut stats, 2000, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::LevelComplete);
        advance(&mut state, &mut stats, 2000, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.round, 1);
    }

    #[test]
    fn test_pause_suspends_everything() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, IVec2::new(3, 3), &[IVec2::new(2, 2)], &[IVec2::new(7, 7)]);

        handle_input(&mut state, &mut stats, Input::Pause, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);

        on_tick(&mut state, &mut stats, &mut events);
        walk(&mut state, &mut stats, &mut events, &[Direction::Down]);
        assert_eq!(state.enemies[0].pos, IVec2::new(2, 2));
        assert_eq!(state.player, IVec2::new(3, 3));

        handle_input(&mut state, &mut stats, Input::Pause, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(events[events.len() - 2..], [GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_restart_only_after_game_over() {
        let (mut state, mut stats, mut events) = new_game(5);
        stats.round = 3;
        stats.score = 900;
        stats.keys = 4;
        handle_input(&mut state, &mut stats, Input::Restart, &mut events).unwrap();
        assert_eq!(stats.round, 3);

        handle_input(&mut state, &mut stats, Input::EndGame, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::GameOver);
        handle_input(&mut state, &mut stats, Input::Restart, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(stats.round, 1);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.keys, 4);
    }

    #[test]
    fn test_pause_does_not_cancel_pending_round() {
        let (mut state, mut stats, mut events) = new_game(5);
        set_board(&mut state, IVec2::new(8, 9), &[], &[]);
        walk(&mut state, &mut stats, &mut events, &[Direction::Right]);
        assert_eq!(state.phase, GamePhase::RoundComplete);
        handle_input(&mut state, &mut stats, Input::Pause, &mut events).unwrap();
        assert_eq!(state.phase, GamePhase::RoundComplete);
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs give identical games
        let (mut a, mut stats_a, mut events_a) = new_game(99999);
        let (mut b, mut stats_b, mut events_b) = new_game(99999);
        let moves = [Direction::Right, Direction::Down, Direction::Right, Direction::Down];

        for &dir in &moves {
            handle_input(&mut a, &mut stats_a, Input::Move(dir), &mut events_a).unwrap();
            on_tick(&mut a, &mut stats_a, &mut events_a);
            handle_input(&mut b, &mut stats_b, Input::Move(dir), &mut events_b).unwrap();
            on_tick(&mut b, &mut stats_b, &mut events_b);
        }

        assert_eq!(a.player, b.player);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.keys, b.keys);
        assert_eq!(stats_a, stats_b);
        assert_eq!(events_a, events_b);
    }

    fn direction(n: u8) -> Direction {
        match n % 4 {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }

    proptest::proptest! {
        #[test]
        fn keys_remaining_drops_one_per_pickup(
            seed in proptest::prelude::any::<u64>(),
            moves in proptest::collection::vec(0u8..5, 1..200),
        ) {
            let (mut state, mut stats, mut events) = new_game(seed);
            for n in moves {
                let before = state.keys_remaining;
                let round_before = stats.round;
                let keys_before = stats.keys;
                if n == 4 {
                    on_tick(&mut state, &mut stats, &mut events);
                } else {
                    handle_input(&mut state, &mut stats, Input::Move(direction(n)), &mut events).unwrap();
                }
                if state.phase == GamePhase::GameOver {
                    break;
                }
                proptest::prop_assert_eq!(stats.round, round_before);
                proptest::prop_assert_eq!(state.keys_remaining as usize, state.keys.len());
                let picked = before - state.keys_remaining;
                proptest::prop_assert!(picked <= 1);
                proptest::prop_assert_eq!(stats.keys - keys_before, picked as u64);
                proptest::prop_assert_eq!(state.goal_open, state.keys_remaining == 0);
            }
        }

        #[test]
        fn fresh_round_starts_on_an_empty_cell(seed in proptest::prelude::any::<u64>()) {
            let (state, stats, events) = new_game(seed);
            proptest::prop_assert_eq!(state.phase, GamePhase::Playing);
            proptest::prop_assert!(!state.enemy_at(START));
            proptest::prop_assert!(state.key_index_at(START).is_none());
            proptest::prop_assert_eq!(state.keys.len(), 3);
            proptest::prop_assert_eq!(stats.keys, 0);
            proptest::prop_assert_eq!(events.len(), 1);
        }
    }
}
