//! Difficulty curve
//!
//! Everything here is a pure function of `(level, round)`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Entity counts for one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub enemy_count: u32,
    pub key_count: u32,
}

/// Entity counts for a round. One more enemy every 2 rounds and every 2 levels,
/// one more key every 3 levels and every 4 rounds.
pub fn complexity(level: u32, round: u32) -> RoundConfig {
    let level_steps = level.saturating_sub(1);
    let round_steps = round.saturating_sub(1);

    let enemy_count = (BASE_ENEMIES + round_steps / 2 + level_steps / 2).min(MAX_ENEMIES);
    let key_count = (BASE_KEYS + level_steps / 3 + round_steps / 4).min(MAX_KEYS);

    RoundConfig {
        enemy_count,
        key_count,
    }
}

/// Number of rounds in a level
pub fn total_rounds(level: u32) -> u32 {
    level.max(1).saturating_mul(ROUNDS_PER_LEVEL_FACTOR)
}

/// Enemy tick period (ms), never faster than MIN_ENEMY_INTERVAL_MS
pub fn enemy_interval_ms(level: u32, round: u32) -> u32 {
    let level_speedup = ENEMY_INTERVAL_LEVEL_STEP_MS.saturating_mul(level.saturating_sub(1));
    let round_speedup = ENEMY_INTERVAL_ROUND_STEP_MS.saturating_mul(round.saturating_sub(1));
    let speedup = level_speedup.saturating_add(round_speedup);
    BASE_ENEMY_INTERVAL_MS
        .saturating_sub(speedup)
        .max(MIN_ENEMY_INTERVAL_MS)
}
