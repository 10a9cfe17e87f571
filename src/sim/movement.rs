//! Enemy motion
//!
//! Enemies travel diagonally and bounce off the grid edges like a ball.

use super::state::Enemy;
use crate::consts::GRID_SIZE;

/// Advance one enemy by its direction, reflecting off the edges.
///
/// An axis that would leave the grid flips its direction and moves one cell
/// the other way from the current position instead.
pub fn step_enemy(enemy: &mut Enemy) {
    let mut next = enemy.pos + enemy.dir;

    if !(0..GRID_SIZE).contains(&next.x) {
        enemy.dir.x = -enemy.dir.x;
        next.x = enemy.pos.x + enemy.dir.x;
    }
    if !(0..GRID_SIZE).contains(&next.y) {
        enemy.dir.y = -enemy.dir.y;
        next.y = enemy.pos.y + enemy.dir.y;
    }

    enemy.pos = next;
}

/// Advance every enemy once
pub fn step_enemies(enemies: &mut [Enemy]) {
    for enemy in enemies.iter_mut() {
        step_enemy(enemy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_bounds;
    use glam::IVec2;

    fn enemy(x: i32, y: i32, dx: i32, dy: i32) -> Enemy {
        Enemy {
            id: 0,
            pos: IVec2::new(x, y),
            dir: IVec2::new(dx, dy),
        }
    }

    #[test]
    fn test_free_diagonal_step() {
        let mut e = enemy(4, 4, 1, -1);
        step_enemy(&mut e);
        assert_eq!(e.pos, IVec2::new(5, 3));
        assert_eq!(e.dir, IVec2::new(1, -1));
    }

    #[test]
    fn test_bounce_off_right_wall() {
        let mut e = enemy(9, 4, 1, 1);
        step_enemy(&mut e);
        assert_eq!(e.pos, IVec2::new(8, 5));
        assert_eq!(e.dir, IVec2::new(-1, 1));
    }

    #[test]
    fn test_bounce_in_corner() {
        let mut e = enemy(0, 0, -1, -1);
        step_enemy(&mut e);
        assert_eq!(e.pos, IVec2::new(1, 1));
        assert_eq!(e.dir, IVec2::new(1, 1));
    }

    #[test]
    fn test_stays_on_grid_forever() {
        let mut e = enemy(3, 8, 1, 1);
        for _ in 0..500 {
            step_enemy(&mut e);
            assert!(in_bounds(e.pos));
        }
    }

    #[test]
    fn test_step_all() {
        let mut enemies = vec![enemy(1, 1, 1, 1), enemy(9, 9, 1, 1)];
        step_enemies(&mut enemies);
        assert_eq!(enemies[0].pos, IVec2::new(2, 2));
        assert_eq!(enemies[1].pos, IVec2::new(8, 8));
    }
}
