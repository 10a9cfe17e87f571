//! Deterministic game engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No clocks, rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod movement;
pub mod placement;
pub mod state;
pub mod tick;

pub use collision::{Outcome, evaluate};
pub use difficulty::{RoundConfig, complexity, enemy_interval_ms, total_rounds};
pub use movement::{step_enemies, step_enemy};
pub use placement::{MAX_PLACEMENT_ATTEMPTS, Placement, PlacementError, place_entities};
pub use state::{
    Direction, Enemy, GameEvent, GameOverReason, GamePhase, GameState, GameStats, RoundSnapshot,
    Rules, Snapshot,
};
pub use tick::{Input, SimError, advance, end_game, handle_input, initialize_round, on_tick, restart};
