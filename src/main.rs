//! Tilt Maze entry point
//!
//! Headless demo: loads a maze (a JSON level path may be given as the first
//! argument, otherwise a built-in course is used), auto-drives tilt toward
//! the goal, and logs run events. Useful for exercising the simulation
//! without a front end.

use std::time::Duration;

use glam::Vec2;

use tilt_maze::consts::DEFAULT_CELL_SIZE;
use tilt_maze::maze::{Cell, Maze};
use tilt_maze::persistence::JsonFileStore;
use tilt_maze::session::LevelSession;
use tilt_maze::sim::GameEvent;

/// Demo frame rate
const FRAME_DT: f32 = 1.0 / 60.0;
/// Step budget before the demo gives up
const MAX_FRAMES: usize = 20_000;

/// Built-in demo course: bordered grid with a slow patch, a speed lane,
/// a hazard pocket, and the goal in the far corner.
fn demo_maze() -> Maze {
    let rows = 12;
    let cols = 20;
    let mut maze = Maze::filled(rows, cols, Cell::Empty);
    for c in 0..cols {
        maze.set(0, c, Cell::Wall);
        maze.set(rows - 1, c, Cell::Wall);
    }
    for r in 0..rows {
        maze.set(r, 0, Cell::Wall);
        maze.set(r, cols - 1, Cell::Wall);
    }
    maze.set(2, 2, Cell::Start);
    maze.set(5, 8, Cell::SlowZone);
    maze.set(6, 8, Cell::SlowZone);
    maze.set(5, 12, Cell::SpeedZone);
    maze.set(8, 5, Cell::Hazard);
    maze.set(9, 17, Cell::Goal);
    maze
}

fn load_maze() -> Maze {
    if let Some(path) = std::env::args().nth(1) {
        match std::fs::read_to_string(&path)
            .map_err(|err| err.to_string())
            .and_then(|json| Maze::from_json(&json).map_err(|err| err.to_string()))
        {
            Ok(maze) => {
                log::info!("loaded level from {path}");
                return maze;
            }
            Err(err) => log::warn!("{path}: {err}; falling back to the demo course"),
        }
    }
    demo_maze()
}

fn goal_center(maze: &Maze, cell_size: f32) -> Option<Vec2> {
    for row in 0..maze.rows() {
        for col in 0..maze.cols() {
            if maze.get(row, col).behavior().reaches_goal {
                return Some(Vec2::new(
                    (col as f32 + 0.5) * cell_size,
                    (row as f32 + 0.5) * cell_size,
                ));
            }
        }
    }
    None
}

fn main() {
    env_logger::init();

    let maze = load_maze();
    let Some(target) = goal_center(&maze, DEFAULT_CELL_SIZE) else {
        log::error!("maze has no goal tile; nothing to drive toward");
        std::process::exit(1);
    };

    let store = JsonFileStore::new(std::env::temp_dir().join("tilt-maze"));
    let mut session = LevelSession::new(maze, DEFAULT_CELL_SIZE, Some(1), Box::new(store));

    if let Some(best) = session.best_time_ms() {
        log::info!("best time on record: {best} ms");
    }

    session.start();
    for frame in 0..MAX_FRAMES {
        let tilt = (target - session.ball_position()).normalize_or_zero() * 3.0;
        let events = session.step(tilt.x, tilt.y, FRAME_DT);

        for event in &events {
            match event {
                GameEvent::GoalReached { elapsed_ms } => {
                    println!(
                        "goal reached after {frame} frames in {:.2?}",
                        Duration::from_millis(*elapsed_ms)
                    );
                }
                GameEvent::NewRecord { elapsed_ms } => {
                    println!("new best time: {elapsed_ms} ms");
                }
                GameEvent::HazardRespawn { pos } => {
                    log::info!("hazard hit, respawned at ({:.1}, {:.1})", pos.x, pos.y);
                }
                GameEvent::TimedOut => {
                    println!("run timed out");
                }
            }
        }

        if events
            .iter()
            .any(|e| matches!(e, GameEvent::GoalReached { .. } | GameEvent::TimedOut))
        {
            return;
        }
    }

    println!(
        "gave up after {MAX_FRAMES} frames at ({:.1}, {:.1})",
        session.ball_position().x,
        session.ball_position().y
    );
}
