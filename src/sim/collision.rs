//! Collision and progress evaluation
//!
//! Run after anything on the board changes. Order matters: an enemy on the
//! player's cell ends the game before keys or the goal are considered.

use glam::IVec2;

use super::state::{GameEvent, GameOverReason, GamePhase, GameState, GameStats};
use crate::consts::*;

/// What the evaluator decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing ended the round
    Continue,
    /// Player was caught
    Caught,
    /// Goal reached with every key collected
    GoalReached,
}

/// Check the player's cell against enemies, keys and the goal.
///
/// Mutates stats for key pickups and handles the locked-goal push-back.
/// Round completion itself is left to the caller.
pub fn evaluate(state: &mut GameState, stats: &mut GameStats, events: &mut Vec<GameEvent>) -> Outcome {
    if !state.started || state.phase != GamePhase::Playing {
        return Outcome::Continue;
    }

    if state.enemy_at(state.player) {
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::GameOver {
            reason: GameOverReason::Caught,
        });
        log::info!(
            "Caught at ({}, {}) on level {} round {}",
            state.player.x,
            state.player.y,
            stats.level,
            stats.round
        );
        return Outcome::Caught;
    }

    if let Some(idx) = state.key_index_at(state.player) {
        state.keys.swap_remove(idx);
        state.keys_remaining = state.keys_remaining.saturating_sub(1);

        let points = KEY_POINTS * stats.level as u64;
        stats.keys = stats.keys.saturating_add(1);
        stats.keys_collected = stats.keys_collected.saturating_add(1);
        stats.total_keys_collected = stats.total_keys_collected.saturating_add(1);
        stats.award(points);

        log::debug!("Key collected, {} remaining", state.keys_remaining);
        events.push(GameEvent::KeyCollected {
            points,
            keys_remaining: state.keys_remaining,
        });

        if state.keys_remaining == 0 {
            state.goal_open = true;
            events.push(GameEvent::AllKeysCollected);
        }
    }

    if state.player == GOAL {
        if state.goal_open {
            return Outcome::GoalReached;
        }
        state.player = push_back_from_goal(state.last_move);
        events.push(GameEvent::GoalLocked {
            keys_remaining: state.keys_remaining,
        });
    }

    Outcome::Continue
}

/// Cell one step back along the axis the player entered the goal on
fn push_back_from_goal(last_move: Option<IVec2>) -> IVec2 {
    match last_move {
        Some(delta) if delta != IVec2::ZERO => crate::clamp_to_grid(GOAL - delta),
        _ => IVec2::new(GRID_SIZE - 2, GRID_SIZE - 1),
    }
}
