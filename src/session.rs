//! Level session
//!
//! A front end owns one `LevelSession` per run. It feeds tilt samples and
//! frame deltas in, and reads back ball position, velocity, ghost position,
//! and timing for its HUD. Storage access goes through an injected
//! [`RecordStore`], so persistence failures degrade to "no ghost, no best"
//! instead of blocking gameplay.

use glam::Vec2;

use crate::besttimes::BestTimes;
use crate::maze::Maze;
use crate::persistence::RecordStore;
use crate::sim::{GameEvent, RunPhase, RunState, TickInput, tick};

/// One loaded level plus its run state and record-keeping
pub struct LevelSession {
    state: RunState,
    store: Box<dyn RecordStore>,
    /// Persistence key. None marks a custom/unranked level: records are not
    /// written, but the ghost still works within the session.
    level: Option<u32>,
    best_times: BestTimes,
    /// Best completion known to this session, persisted or in-session
    best_ms: Option<u64>,
}

impl LevelSession {
    /// Load a session for a maze. Fetches the level's best time and best
    /// run from the store; either failing is logged and ignored.
    pub fn new(
        maze: Maze,
        cell_size: f32,
        level: Option<u32>,
        store: Box<dyn RecordStore>,
    ) -> Self {
        let mut state = RunState::new(maze, cell_size);

        let best_times = store.load_best_times().unwrap_or_else(|err| {
            log::warn!("best times unavailable: {err}");
            BestTimes::new()
        });
        let best_ms = level.and_then(|l| best_times.best(l));

        if let Some(level) = level {
            match store.load_best_run(level) {
                Ok(Some(run)) => state.recorder.load_best(run),
                Ok(None) => {}
                Err(err) => log::warn!("best run unavailable for level {level}: {err}"),
            }
        }

        Self {
            state,
            store,
            level,
            best_times,
            best_ms,
        }
    }

    /// (Re)start the run from the spawn point with a zeroed clock.
    pub fn start(&mut self) {
        self.state.restart();
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    /// Advance one frame with the latest tilt sample. Completion
    /// bookkeeping runs here, so a [`GameEvent::NewRecord`] may follow the
    /// goal event in the same batch.
    pub fn step(&mut self, tilt_x: f32, tilt_y: f32, dt: f32) -> Vec<GameEvent> {
        let input = TickInput { tilt_x, tilt_y };
        let mut events = tick(&mut self.state, &input, dt);

        let completed = events.iter().find_map(|event| match event {
            GameEvent::GoalReached { elapsed_ms } => Some(*elapsed_ms),
            _ => None,
        });
        if let Some(elapsed_ms) = completed {
            if self.commit_run(elapsed_ms) {
                events.push(GameEvent::NewRecord { elapsed_ms });
            }
        }

        events
    }

    /// Promote and persist the finished run if it beat the best. Returns
    /// true on a new record. Persistence is fire-and-forget: failures are
    /// logged, never surfaced to the frame loop.
    fn commit_run(&mut self, elapsed_ms: u64) -> bool {
        let Some(run) = self
            .state
            .recorder
            .commit_if_better(elapsed_ms, self.best_ms)
        else {
            return false;
        };
        self.best_ms = Some(elapsed_ms);

        if let Some(level) = self.level {
            self.best_times.record_if_best(level, elapsed_ms);
            if let Err(err) = self.store.save_best_run(level, &run) {
                log::warn!("best run for level {level} not saved: {err}");
            }
            if let Err(err) = self.store.save_best_times(&self.best_times) {
                log::warn!("best times not saved: {err}");
            }
        }
        true
    }

    /// Current ball position, for rendering.
    pub fn ball_position(&self) -> Vec2 {
        self.state.ball.pos
    }

    /// Current ball velocity, for diagnostic display.
    pub fn velocity(&self) -> Vec2 {
        self.state.ball.vel
    }

    /// Best prior run's position at the current elapsed time.
    pub fn ghost_position(&self) -> Option<Vec2> {
        self.state.recorder.ghost_position(self.state.elapsed_ms())
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.state.elapsed_ms()
    }

    pub fn remaining_ms(&self) -> u64 {
        self.state.remaining_ms()
    }

    /// Best completion time known to this session, if any.
    pub fn best_time_ms(&self) -> Option<u64> {
        self.best_ms
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn maze(&self) -> &Maze {
        &self.state.maze
    }

    pub fn cell_size(&self) -> f32 {
        self.state.cell_size
    }
}
