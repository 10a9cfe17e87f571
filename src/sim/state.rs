//! Game state and core simulation types
//!
//! `GameState` is everything the engine owns for the current round.
//! `GameStats` is session-scoped and owned by the driver; the engine only
//! mutates it through the `&mut GameStats` it is handed.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Position;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay: enemies tick, input moves the player
    Playing,
    /// Suspended by the player
    Paused,
    /// Caught by an enemy or ended manually
    GameOver,
    /// Round cleared, next round starts after a delay
    RoundComplete,
    /// Last round of the level cleared, next level starts after a delay
    LevelComplete,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Player shared a cell with an enemy
    Caught,
    /// Player ended the game
    Manual,
}

/// Cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta (y grows downward)
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable within a round only (render key)
    pub id: u32,
    pub pos: Position,
    /// Each component is -1 or +1
    pub dir: IVec2,
}

/// Session statistics, owned by the driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub level: u32,
    pub round: u32,
    pub score: u64,
    /// Keys collected over the whole session (inventory)
    pub keys: u64,
    pub high_score: u64,
    /// Keys collected in the current round
    pub keys_collected: u32,
    /// Keys collected since the last progress flush
    pub total_keys_collected: u64,
    /// Points earned since the last progress flush
    pub session_score: u64,
    pub rounds_completed: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            level: 1,
            round: 1,
            score: 0,
            keys: 0,
            high_score: 0,
            keys_collected: 0,
            total_keys_collected: 0,
            session_score: 0,
            rounds_completed: 0,
        }
    }
}

impl GameStats {
    /// Start a session at a level restored by the caller (e.g. from chain data)
    pub fn starting_at(level: u32, high_score: u64) -> Self {
        Self {
            level: level.max(1),
            high_score,
            ..Self::default()
        }
    }

    /// Add points to both the running and the unflushed score
    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.session_score = self.session_score.saturating_add(points);
    }

    /// Restart resets progress counters only.
    ///
    /// `keys`, `high_score`, `session_score` and `total_keys_collected` survive
    /// so unflushed progress is not lost.
    pub fn reset_for_restart(&mut self) {
        self.level = 1;
        self.round = 1;
        self.score = 0;
        self.keys_collected = 0;
        self.rounds_completed = 0;
    }

    /// Clear the per-sync accumulators after a successful flush
    pub fn mark_flushed(&mut self, flushed_session_score: u64) {
        self.total_keys_collected = 0;
        self.session_score = 0;
        self.high_score = self.high_score.max(flushed_session_score);
    }
}

/// Timing rules for delayed transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub round_delay_ms: u32,
    pub level_delay_ms: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            round_delay_ms: ROUND_ADVANCE_DELAY_MS,
            level_delay_ms: LEVEL_ADVANCE_DELAY_MS,
        }
    }
}

/// Informational events for the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted {
        level: u32,
        round: u32,
        total_rounds: u32,
        keys: u32,
        enemies: u32,
    },
    KeyCollected {
        points: u64,
        keys_remaining: u32,
    },
    AllKeysCollected,
    /// Goal reached with keys still on the board; player was pushed back
    GoalLocked {
        keys_remaining: u32,
    },
    RoundComplete {
        round: u32,
        total_rounds: u32,
        bonus: u64,
    },
    LevelComplete {
        completed_level: u32,
        new_level: u32,
        total_score: u64,
    },
    GameOver {
        reason: GameOverReason,
    },
    Paused,
    Resumed,
}

impl GameEvent {
    /// Title and description for a toast-style notice
    pub fn notice(&self) -> (String, String) {
        match self {
            GameEvent::RoundStarted {
                level,
                round,
                total_rounds,
                keys,
                enemies,
            } => (
                format!("Round {round} Started!"),
                format!(
                    "Level {level} - Round {round}/{total_rounds} | {keys} keys, {enemies} enemies"
                ),
            ),
            GameEvent::KeyCollected {
                points,
                keys_remaining,
            } => (
                format!("Key Collected! +{points}"),
                format!("{keys_remaining} remaining"),
            ),
            GameEvent::AllKeysCollected => (
                "All Keys Collected!".to_string(),
                "Reach the spaceship to complete the round!".to_string(),
            ),
            GameEvent::GoalLocked { keys_remaining } => (
                "Collect All Keys First!".to_string(),
                format!(
                    "You need to collect {keys_remaining} more keys before reaching the spaceship"
                ),
            ),
            GameEvent::RoundComplete {
                round,
                total_rounds,
                bonus,
            } => (
                "Round Complete!".to_string(),
                format!("Round {round} of {total_rounds} completed! +{bonus} bonus points"),
            ),
            GameEvent::LevelComplete {
                completed_level,
                new_level,
                ..
            } => (
                "Congratulations!".to_string(),
                format!("Level {completed_level} completed! You are now Level {new_level}!"),
            ),
            GameEvent::GameOver { reason } => (
                "Game Over!".to_string(),
                match reason {
                    GameOverReason::Caught => {
                        "You were caught by an enemy! Your progress will be saved.".to_string()
                    }
                    GameOverReason::Manual => "Game ended.".to_string(),
                },
            ),
            GameEvent::Paused => ("Game Paused".to_string(), String::new()),
            GameEvent::Resumed => ("Game Resumed".to_string(), String::new()),
        }
    }
}

/// Entity layout right after a round is initialised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub player: Position,
    pub enemies: Vec<Enemy>,
    pub keys: Vec<Position>,
}

/// Read-only view for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Position,
    pub enemies: Vec<Enemy>,
    pub keys: Vec<Position>,
    pub keys_remaining: u32,
    pub goal_open: bool,
    pub stats: GameStats,
}

/// Engine state for the current round (deterministic given seed + inputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub rules: Rules,
    pub phase: GamePhase,
    pub player: Position,
    /// Delta of the last accepted move, used to push back off a locked goal
    pub last_move: Option<IVec2>,
    /// Active enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Uncollected keys
    pub keys: Vec<Position>,
    pub keys_remaining: u32,
    /// Set once every key of the round is collected
    pub goal_open: bool,
    /// Countdown for RoundComplete/LevelComplete advancement
    pub advance_in_ms: u32,
    /// False until the first round has been initialised
    pub started: bool,
}

impl GameState {
    /// Create an empty game state; call `initialize_round` before playing
    pub fn new(seed: u64, rules: Rules) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            rules,
            phase: GamePhase::Playing,
            player: START,
            last_move: None,
            enemies: Vec::new(),
            keys: Vec::new(),
            keys_remaining: 0,
            goal_open: false,
            advance_in_ms: 0,
            started: false,
        }
    }

    pub fn enemy_at(&self, pos: Position) -> bool {
        self.enemies.iter().any(|e| e.pos == pos)
    }

    pub fn key_index_at(&self, pos: Position) -> Option<usize> {
        self.keys.iter().position(|&k| k == pos)
    }

    pub fn round_snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            player: self.player,
            enemies: self.enemies.clone(),
            keys: self.keys.clone(),
        }
    }

    pub fn snapshot(&self, stats: &GameStats) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player,
            enemies: self.enemies.clone(),
            keys: self.keys.clone(),
            keys_remaining: self.keys_remaining,
            goal_open: self.goal_open,
            stats: stats.clone(),
        }
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}
