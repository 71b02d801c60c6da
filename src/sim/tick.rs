//! Per-frame simulation step
//!
//! The phase order inside a step is a behavioral contract:
//!
//! 1. integrate tilt into velocity
//! 2. slow/speed zone effects, from the pre-move footprint
//! 3. resolve horizontal movement
//! 4. resolve vertical movement
//! 5. goal probe on the cell under the ball's center
//! 6. hazard probe on the post-move footprint
//!
//! Effects read the pre-move position, collisions use the post-effect
//! velocity, and goal detection sees the post-collision position.
//! Re-ordering changes gameplay feel and must be preserved.

use glam::Vec2;

use super::collision;
use super::physics::integrate;
use super::state::{GameEvent, RunPhase, RunState};
use crate::consts::MAX_RUN_MS;

/// Sampled inputs for one step. Tilt is whatever the sensor reported most
/// recently; a stale sample is acceptable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Horizontal tilt; positive drives the ball rightward
    pub tilt_x: f32,
    /// Vertical tilt; positive drives the ball downward
    pub tilt_y: f32,
}

/// Advance the run by one frame. Returns the step's one-shot events.
///
/// A non-positive `dt` or a run that is not actively playing leaves all
/// state untouched.
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if dt <= 0.0 {
        log::debug!("rejected step with non-positive dt {dt}");
        return events;
    }
    if state.phase != RunPhase::Playing {
        return events;
    }

    // Run ceiling: recoverable timeout, not an error and not a finish
    if state.elapsed_ms() >= MAX_RUN_MS {
        state.timer.pause();
        state.phase = RunPhase::TimedOut;
        events.push(GameEvent::TimedOut);
        return events;
    }

    let maze = &state.maze;
    let cell_size = state.cell_size;
    let tuning = state.tuning;

    state.ball.vel = integrate(
        state.ball.vel,
        Vec2::new(input.tilt_x, input.tilt_y),
        dt,
        &tuning,
    );

    collision::apply_slow_zone(maze, cell_size, &tuning, &mut state.ball);
    collision::apply_speed_zone(maze, cell_size, &tuning, &mut state.ball);

    collision::resolve_horizontal(maze, cell_size, &tuning, &mut state.ball);
    collision::resolve_vertical(maze, cell_size, &tuning, &mut state.ball);

    if collision::goal_under_center(maze, cell_size, state.ball.pos) {
        // Completion latches through the phase machine; only a restart
        // re-arms it, so repeated frames on the goal emit nothing new.
        state.timer.pause();
        state.phase = RunPhase::Complete;
        events.push(GameEvent::GoalReached {
            elapsed_ms: state.elapsed_ms(),
        });
    }

    if collision::resolve_hazard(maze, cell_size, &tuning, &mut state.ball, state.respawn) {
        events.push(GameEvent::HazardRespawn {
            pos: state.ball.pos,
        });
    }

    state.recorder.record(state.elapsed_ms(), state.ball.pos);

    events
}
