//! Into Stellar - A grid puzzle game: dodge enemies, collect keys, reach the spaceship
//!
//! Core modules:
//! - `sim`: Deterministic game engine (placement, enemy motion, collisions, rounds)
//! - `session`: Driver owning session stats, the enemy clock and the progress reporter
//! - `reporter`: Progress sink consumed by the external sync collaborator
//! - `platform`: Input mapping and browser bindings
//! - `settings`: Driver configuration

pub mod platform;
pub mod reporter;
pub mod session;
pub mod settings;
pub mod sim;

pub use reporter::{LogReporter, NullReporter, ProgressReport, ProgressReporter, ReportError};
pub use session::{Command, Session};
pub use settings::Settings;

use glam::IVec2;

/// A cell on the game grid
pub type Position = IVec2;

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Grid is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 10;
    /// Player start cell
    pub const START: IVec2 = IVec2::new(0, 0);
    /// Spaceship cell - the round goal
    pub const GOAL: IVec2 = IVec2::new(GRID_SIZE - 1, GRID_SIZE - 1);

    /// Difficulty curve
    pub const BASE_ENEMIES: u32 = 2;
    pub const MAX_ENEMIES: u32 = 8;
    pub const BASE_KEYS: u32 = 3;
    pub const MAX_KEYS: u32 = 6;
    /// Rounds per level = level * ROUNDS_PER_LEVEL_FACTOR
    pub const ROUNDS_PER_LEVEL_FACTOR: u32 = 5;

    /// Enemy tick interval (ms)
    pub const BASE_ENEMY_INTERVAL_MS: u32 = 1000;
    pub const MIN_ENEMY_INTERVAL_MS: u32 = 600;
    pub const ENEMY_INTERVAL_LEVEL_STEP_MS: u32 = 30;
    pub const ENEMY_INTERVAL_ROUND_STEP_MS: u32 = 15;
    /// Maximum enemy ticks delivered per update to prevent spiral of death
    pub const MAX_TICKS_PER_UPDATE: u32 = 8;

    /// Scoring (multiplied by current level)
    pub const KEY_POINTS: u64 = 100;
    pub const ROUND_BONUS: u64 = 500;

    /// Delay before the next round/level starts (ms)
    pub const ROUND_ADVANCE_DELAY_MS: u32 = 2000;
    pub const LEVEL_ADVANCE_DELAY_MS: u32 = 4000;
}

/// Check that a position lies on the grid
#[inline]
pub fn in_bounds(pos: Position) -> bool {
    (0..consts::GRID_SIZE).contains(&pos.x) && (0..consts::GRID_SIZE).contains(&pos.y)
}

/// Clamp a position onto the grid, per axis
#[inline]
pub fn clamp_to_grid(pos: Position) -> Position {
    pos.clamp(IVec2::ZERO, IVec2::splat(consts::GRID_SIZE - 1))
}
