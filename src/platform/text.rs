//! Plain-text board rendering for the terminal front end

use std::fmt::Write;

use glam::IVec2;

use crate::consts::*;
use crate::sim::{GamePhase, Snapshot, total_rounds};

/// Cell glyphs
pub const PLAYER: char = '@';
pub const ENEMY: char = 'X';
pub const KEY: char = 'k';
pub const SHIP: char = 'S';
pub const EMPTY: char = '.';

/// Render the board with a status header
pub fn render(snapshot: &Snapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Level {}  Round {}/{}  Score {}  Keys {}  High {}  Rounds done {}",
        stats.level,
        stats.round,
        total_rounds(stats.level),
        stats.score,
        stats.keys,
        stats.high_score,
        stats.rounds_completed
    );
    let _ = writeln!(out, "{} keys remaining - {}", snapshot.keys_remaining, phase_label(snapshot));

    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            out.push(glyph_at(snapshot, IVec2::new(x, y)));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(snapshot: &Snapshot, cell: IVec2) -> char {
    // Same precedence as the board UI: player, enemy, key, ship
    if snapshot.player == cell {
        PLAYER
    } else if snapshot.enemies.iter().any(|e| e.pos == cell) {
        ENEMY
    } else if snapshot.keys.contains(&cell) {
        KEY
    } else if cell == GOAL {
        SHIP
    } else {
        EMPTY
    }
}

fn phase_label(snapshot: &Snapshot) -> &'static str {
    match snapshot.phase {
        GamePhase::Playing if snapshot.goal_open => "reach the spaceship!",
        GamePhase::Playing => "collect all keys first",
        GamePhase::Paused => "paused (p to resume)",
        GamePhase::GameOver => "game over (r to restart)",
        GamePhase::RoundComplete => "round complete, starting next round...",
        GamePhase::LevelComplete => "level complete, advancing...",
    }
}
