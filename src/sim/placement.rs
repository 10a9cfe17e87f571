//! Random entity placement
//!
//! Uniform rejection sampling over the grid. Start and goal cells are
//! reserved; enemies never share a cell; keys avoid reserved cells, enemies
//! and each other.

use glam::IVec2;
use rand::Rng;
use thiserror::Error;

use super::difficulty::RoundConfig;
use super::state::Enemy;
use crate::Position;
use crate::consts::*;

/// Sampling attempts allowed per entity before giving up
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Cells that never receive an entity
pub const RESERVED_CELLS: [IVec2; 2] = [START, GOAL];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("{requested} entities cannot fit in {free} free cells")]
    Overcrowded { requested: u32, free: u32 },
    #[error("no free cell found for {what} after {attempts} attempts")]
    Exhausted { what: &'static str, attempts: u32 },
}

/// Generated layout for one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub enemies: Vec<Enemy>,
    pub keys: Vec<Position>,
}

/// Generate enemies and keys for a round
pub fn place_entities<R: Rng>(rng: &mut R, config: RoundConfig) -> Result<Placement, PlacementError> {
    let free = (GRID_SIZE * GRID_SIZE) as u32 - RESERVED_CELLS.len() as u32;
    let requested = config.enemy_count + config.key_count;
    if requested > free {
        return Err(PlacementError::Overcrowded { requested, free });
    }

    let mut enemies: Vec<Enemy> = Vec::with_capacity(config.enemy_count as usize);
    for id in 0..config.enemy_count {
        let pos = sample_cell(rng, "enemy", |p| enemies.iter().any(|e| e.pos == p))?;
        let dir = IVec2::new(random_sign(rng), random_sign(rng));
        enemies.push(Enemy { id, pos, dir });
    }

    let mut keys: Vec<Position> = Vec::with_capacity(config.key_count as usize);
    for _ in 0..config.key_count {
        let pos = sample_cell(rng, "key", |p| {
            enemies.iter().any(|e| e.pos == p) || keys.contains(&p)
        })?;
        keys.push(pos);
    }

    Ok(Placement { enemies, keys })
}

/// Draw cells until one is neither reserved nor `occupied`
fn sample_cell<R: Rng>(
    rng: &mut R,
    what: &'static str,
    occupied: impl Fn(Position) -> bool,
) -> Result<Position, PlacementError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = IVec2::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if !RESERVED_CELLS.contains(&pos) && !occupied(pos) {
            return Ok(pos);
        }
    }
    Err(PlacementError::Exhausted {
        what,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

fn random_sign<R: Rng>(rng: &mut R) -> i32 {
    if rng.random_bool(0.5) { 1 } else { -1 }
}
