//! Tilt integration
//!
//! Converts the latest tilt sample and the elapsed frame time into a new
//! velocity: clamped acceleration, time-scaled friction, and a
//! direction-preserving speed clamp. Velocity is expressed in world units
//! per frame; all time scaling happens here, which keeps the behavior
//! identical at 30 and 120 fps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics tuning knobs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tuning {
    /// Ball radius in world units, used for the collision footprint
    pub ball_radius: f32,
    /// How strongly tilt accelerates the ball (units/s²)
    pub gravity_strength: f32,
    /// Speed retention per second, raised to the frame delta
    pub friction_per_second: f32,
    /// Speed ceiling (units per frame)
    pub max_speed: f32,
    /// Per-axis acceleration ceiling (units/s²)
    pub max_accel: f32,
    /// Velocity multiplier on a blocked axis
    pub restitution: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            gravity_strength: GRAVITY_STRENGTH,
            friction_per_second: FRICTION_PER_SECOND,
            max_speed: MAX_SPEED,
            max_accel: MAX_ACCEL,
            restitution: RESTITUTION,
        }
    }
}

impl Tuning {
    /// Tuning matched to a grid's cell size: the ball radius scales with
    /// the tile so the footprint spans the same fraction of a cell.
    pub fn for_cell_size(cell_size: f32) -> Self {
        Self {
            ball_radius: cell_size / 2.5,
            ..Self::default()
        }
    }
}

/// Integrate one frame of tilt input into a new velocity.
///
/// 1. Raw delta = tilt × gravity_strength × dt per axis
/// 2. Each axis clamped to ± max_accel × dt, so a single sensor spike
///    cannot inject unbounded speed in one frame
/// 3. Friction as `friction_per_second^dt`: cumulative decay over a time
///    span is independent of how that span is partitioned into frames
/// 4. Speed clamped to max_speed by scaling both axes proportionally
pub fn integrate(vel: Vec2, tilt: Vec2, dt: f32, tuning: &Tuning) -> Vec2 {
    let max_dv = tuning.max_accel * dt;
    let dv = (tilt * tuning.gravity_strength * dt).clamp(Vec2::splat(-max_dv), Vec2::splat(max_dv));

    let mut vel = (vel + dv) * tuning.friction_per_second.powf(dt);

    let speed = vel.length();
    if speed > tuning.max_speed {
        vel *= tuning.max_speed / speed;
    }
    vel
}
