//! Collision resolution against the maze grid
//!
//! Movement resolves one axis at a time, horizontal first. The order
//! matters: it produces axis-separated sliding along walls instead of
//! diagonal tunneling. A blocked axis bounces with an inelastic
//! restitution; tile effects (slow, speed, hazard) scan the full footprint
//! of overlapped cells, while the goal probe uses the center point only.

use glam::Vec2;

use super::physics::Tuning;
use super::state::Ball;
use crate::clamped_cell;
use crate::maze::{CellBehavior, Maze};

/// Inclusive cell span covered by `center ± radius` along one axis
#[inline]
fn axis_span(center: f32, radius: f32, cell_size: f32, len: usize) -> (usize, usize) {
    (
        clamped_cell(center - radius, cell_size, len),
        clamped_cell(center + radius, cell_size, len),
    )
}

/// True if any cell of the ball's footprint at `pos` matches `flag`
fn footprint_touches(
    maze: &Maze,
    cell_size: f32,
    radius: f32,
    pos: Vec2,
    flag: impl Fn(CellBehavior) -> bool,
) -> bool {
    let (top, bottom) = axis_span(pos.y, radius, cell_size, maze.rows());
    let (left, right) = axis_span(pos.x, radius, cell_size, maze.cols());
    (top..=bottom).any(|row| (left..=right).any(|col| flag(maze.get(row, col).behavior())))
}

/// Move horizontally, bouncing off walls on the leading edge.
pub fn resolve_horizontal(maze: &Maze, cell_size: f32, tuning: &Tuning, ball: &mut Ball) {
    if ball.vel.x == 0.0 {
        return;
    }
    let tentative = ball.pos.x + ball.vel.x;
    let (top, bottom) = axis_span(ball.pos.y, tuning.ball_radius, cell_size, maze.rows());

    // Leading column in the direction of travel, at the tentative coordinate
    let edge = if ball.vel.x < 0.0 {
        tentative - tuning.ball_radius
    } else {
        tentative + tuning.ball_radius
    };
    let lead_col = clamped_cell(edge, cell_size, maze.cols());

    let blocked =
        (top..=bottom).any(|row| !maze.get(row, lead_col).behavior().allows_movement);

    if blocked {
        ball.vel.x *= tuning.restitution;
    } else {
        ball.pos.x = tentative;
    }
}

/// Move vertically, bouncing off floor/ceiling walls on the leading edge.
pub fn resolve_vertical(maze: &Maze, cell_size: f32, tuning: &Tuning, ball: &mut Ball) {
    if ball.vel.y == 0.0 {
        return;
    }
    let tentative = ball.pos.y + ball.vel.y;
    let (left, right) = axis_span(ball.pos.x, tuning.ball_radius, cell_size, maze.cols());

    let edge = if ball.vel.y < 0.0 {
        tentative - tuning.ball_radius
    } else {
        tentative + tuning.ball_radius
    };
    let lead_row = clamped_cell(edge, cell_size, maze.rows());

    let blocked =
        (left..=right).any(|col| !maze.get(lead_row, col).behavior().allows_movement);

    if blocked {
        ball.vel.y *= tuning.restitution;
    } else {
        ball.pos.y = tentative;
    }
}

/// Halve velocity while the footprint touches a slow zone. Re-applied every
/// overlapping frame; the effect is intentionally level-continuous.
pub fn apply_slow_zone(maze: &Maze, cell_size: f32, tuning: &Tuning, ball: &mut Ball) {
    if footprint_touches(maze, cell_size, tuning.ball_radius, ball.pos, |b| {
        b.in_slow_zone
    }) {
        ball.vel *= 0.5;
    }
}

/// Double velocity while the footprint touches a speed zone.
pub fn apply_speed_zone(maze: &Maze, cell_size: f32, tuning: &Tuning, ball: &mut Ball) {
    if footprint_touches(maze, cell_size, tuning.ball_radius, ball.pos, |b| {
        b.in_speed_zone
    }) {
        ball.vel *= 2.0;
    }
}

/// Teleport the ball to `respawn` if its footprint touches a hazard.
/// Returns true when the respawn fired. The run clock is not touched; this
/// is a soft reset, not a restart.
pub fn resolve_hazard(
    maze: &Maze,
    cell_size: f32,
    tuning: &Tuning,
    ball: &mut Ball,
    respawn: Vec2,
) -> bool {
    if footprint_touches(maze, cell_size, tuning.ball_radius, ball.pos, |b| {
        b.in_hazard
    }) {
        ball.pos = respawn;
        return true;
    }
    false
}

/// True if the cell under the ball's center point is a goal tile. Stricter
/// than the footprint checks: grazing a goal's edge does not finish a run.
pub fn goal_under_center(maze: &Maze, cell_size: f32, pos: Vec2) -> bool {
    let row = clamped_cell(pos.y, cell_size, maze.rows());
    let col = clamped_cell(pos.x, cell_size, maze.cols());
    maze.get(row, col).behavior().reaches_goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Cell;

    const CELL: f32 = 66.0;

    fn bordered(rows: usize, cols: usize) -> Maze {
        let mut maze = Maze::filled(rows, cols, Cell::Empty);
        for c in 0..cols {
            maze.set(0, c, Cell::Wall);
            maze.set(rows - 1, c, Cell::Wall);
        }
        for r in 0..rows {
            maze.set(r, 0, Cell::Wall);
            maze.set(r, cols - 1, Cell::Wall);
        }
        maze
    }

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        Ball {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
        }
    }

    #[test]
    fn test_wall_bounce_reverses_and_damps() {
        let maze = bordered(5, 5);
        let tuning = Tuning::default();
        // Right wall starts at x = 4 * CELL; approach it from the left
        let mut ball = ball_at(4.0 * CELL - tuning.ball_radius - 1.0, 2.5 * CELL, 5.0, 0.0);
        let before = ball.pos;

        resolve_horizontal(&maze, CELL, &tuning, &mut ball);

        assert_eq!(ball.pos, before);
        assert_eq!(ball.vel.x, 5.0 * tuning.restitution);
        // Footprint still clear of the wall cell
        assert!(ball.pos.x + tuning.ball_radius < 4.0 * CELL);
    }

    #[test]
    fn test_free_movement_commits_tentative() {
        let maze = bordered(5, 5);
        let tuning = Tuning::default();
        let mut ball = ball_at(2.5 * CELL, 2.5 * CELL, 4.0, 0.0);

        resolve_horizontal(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.pos.x, 2.5 * CELL + 4.0);
        assert_eq!(ball.vel.x, 4.0);

        resolve_vertical(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.pos.y, 2.5 * CELL);
    }

    #[test]
    fn test_vertical_bounce_against_floor() {
        let maze = bordered(5, 5);
        let tuning = Tuning::default();
        let mut ball = ball_at(2.5 * CELL, 4.0 * CELL - tuning.ball_radius - 1.0, 0.0, 6.0);

        resolve_vertical(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.vel.y, 6.0 * tuning.restitution);
    }

    #[test]
    fn test_slow_zone_halves_velocity() {
        let mut maze = Maze::filled(3, 3, Cell::Empty);
        maze.set(1, 1, Cell::SlowZone);
        let tuning = Tuning::default();
        let mut ball = ball_at(1.5 * CELL, 1.5 * CELL, 8.0, -4.0);

        apply_slow_zone(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.vel, Vec2::new(4.0, -2.0));

        // Still overlapping next frame: applied again, not edge-triggered
        apply_slow_zone(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.vel, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_speed_zone_doubles_velocity() {
        let mut maze = Maze::filled(3, 3, Cell::Empty);
        maze.set(0, 0, Cell::SpeedZone);
        let tuning = Tuning::default();
        // Footprint overlaps the zone tile from the neighboring cell
        let mut ball = ball_at(CELL + 2.0, CELL + 2.0, 1.0, 1.0);

        apply_speed_zone(&maze, CELL, &tuning, &mut ball);
        assert_eq!(ball.vel, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_hazard_respawns_on_footprint_touch() {
        let mut maze = Maze::filled(5, 5, Cell::Empty);
        maze.set(2, 3, Cell::Hazard);
        let tuning = Tuning::default();
        let respawn = Vec2::new(1.5 * CELL, 1.5 * CELL);
        // Center in the neighboring cell, footprint edge inside the hazard
        let mut ball = ball_at(3.0 * CELL - tuning.ball_radius + 1.0, 2.5 * CELL, 0.0, 0.0);

        assert!(resolve_hazard(&maze, CELL, &tuning, &mut ball, respawn));
        assert_eq!(ball.pos, respawn);

        assert!(!resolve_hazard(&maze, CELL, &tuning, &mut ball, respawn));
    }

    #[test]
    fn test_goal_requires_center_not_graze() {
        let mut maze = Maze::filled(3, 3, Cell::Empty);
        maze.set(1, 2, Cell::Goal);

        // Footprint grazes the goal cell but the center is outside
        let grazing = Vec2::new(2.0 * CELL - 2.0, 1.5 * CELL);
        assert!(!goal_under_center(&maze, CELL, grazing));

        let centered = Vec2::new(2.5 * CELL, 1.5 * CELL);
        assert!(goal_under_center(&maze, CELL, centered));
    }
}
