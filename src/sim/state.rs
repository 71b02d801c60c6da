//! Run state and simulation events

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::Tuning;
use crate::consts::MAX_RUN_MS;
use crate::maze::Maze;
use crate::replay::ReplayRecorder;
use crate::timer::RunTimer;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Session created, clock not started yet
    Ready,
    /// Active gameplay
    Playing,
    /// Clock frozen, state preserved
    Paused,
    /// Goal reached; completion is latched until the next restart
    Complete,
    /// Run exceeded the trajectory ceiling
    TimedOut,
}

/// The ball: continuous world-space position and per-frame velocity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// One-shot outputs of a simulation step, returned by value instead of
/// fired through shared callbacks so the caller consumes each exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball centered over a goal tile; carries the completion time
    GoalReached { elapsed_ms: u64 },
    /// Footprint touched a hazard tile; ball was moved to the reset position
    HazardRespawn { pos: Vec2 },
    /// The run hit its implicit maximum duration; distinct from finishing
    TimedOut,
    /// The completed run beat the previous best time
    NewRecord { elapsed_ms: u64 },
}

/// Everything a single run owns. Mutated only by the step orchestrator on
/// the thread driving the frame loop.
#[derive(Debug)]
pub struct RunState {
    pub maze: Maze,
    pub cell_size: f32,
    pub tuning: Tuning,
    pub ball: Ball,
    pub phase: RunPhase,
    /// Where hazards send the ball: the Start tile center, or grid center
    pub respawn: Vec2,
    pub timer: RunTimer,
    pub recorder: ReplayRecorder,
}

impl RunState {
    /// Build a run for a maze. The ball starts at the spawn point with the
    /// clock stopped; call [`RunState::restart`] to begin.
    pub fn new(maze: Maze, cell_size: f32) -> Self {
        let respawn = maze.spawn_point(cell_size);
        Self {
            maze,
            cell_size,
            tuning: Tuning::for_cell_size(cell_size),
            ball: Ball {
                pos: respawn,
                vel: Vec2::ZERO,
            },
            phase: RunPhase::Ready,
            respawn,
            timer: RunTimer::new(),
            recorder: ReplayRecorder::new(),
        }
    }

    /// (Re)start the run: ball back to spawn, clock zeroed and running,
    /// a fresh trajectory buffer, and the completion latch cleared. The
    /// loaded best run is kept for ghost playback.
    pub fn restart(&mut self) {
        self.ball = Ball {
            pos: self.respawn,
            vel: Vec2::ZERO,
        };
        self.timer.reset();
        self.timer.resume();
        self.recorder.start_run();
        self.phase = RunPhase::Playing;
    }

    /// Freeze the clock without losing run state.
    pub fn pause(&mut self) {
        if self.phase == RunPhase::Playing {
            self.timer.pause();
            self.phase = RunPhase::Paused;
        }
    }

    /// Resume a paused run.
    pub fn resume(&mut self) {
        if self.phase == RunPhase::Paused {
            self.timer.resume();
            self.phase = RunPhase::Playing;
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.timer.elapsed_ms()
    }

    /// Time left before the run ceiling, for HUD display.
    pub fn remaining_ms(&self) -> u64 {
        MAX_RUN_MS.saturating_sub(self.elapsed_ms())
    }
}
