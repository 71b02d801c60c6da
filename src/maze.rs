//! Maze grid and tile behavior
//!
//! A maze is a fixed rows × cols grid of `Cell` tags, row-major, immutable
//! for the duration of a run. Tile behavior is a pure lookup from the tag to
//! a small flag struct, keeping the collision loop free of dispatch and
//! allocation.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One tile of the maze grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Free space; the ball passes through
    #[default]
    Empty,
    /// Solid block; the ball bounces back on contact
    Wall,
    /// Reaching this tile with the ball's center completes the run
    Goal,
    /// Halves the ball's velocity every frame of overlap
    SlowZone,
    /// Doubles the ball's velocity every frame of overlap
    SpeedZone,
    /// Sends the ball back to its respawn point
    Hazard,
    /// Preferred spawn tile; at most one is honored per maze
    Start,
}

/// Passability and side-effect flags for a tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellBehavior {
    /// Whether the ball may move into the tile
    pub allows_movement: bool,
    /// Whether centering on the tile completes the run
    pub reaches_goal: bool,
    pub in_hazard: bool,
    pub in_slow_zone: bool,
    pub in_speed_zone: bool,
}

const INERT: CellBehavior = CellBehavior {
    allows_movement: true,
    reaches_goal: false,
    in_hazard: false,
    in_slow_zone: false,
    in_speed_zone: false,
};

impl Cell {
    /// Behavior lookup; pure function of the tag.
    ///
    /// Callers must clamp grid indices before fetching the cell — an
    /// out-of-range index is a programming error, not a runtime case.
    pub fn behavior(self) -> CellBehavior {
        match self {
            Cell::Empty | Cell::Start => INERT,
            Cell::Wall => CellBehavior {
                allows_movement: false,
                ..INERT
            },
            Cell::Goal => CellBehavior {
                reaches_goal: true,
                ..INERT
            },
            Cell::SlowZone => CellBehavior {
                in_slow_zone: true,
                ..INERT
            },
            Cell::SpeedZone => CellBehavior {
                in_speed_zone: true,
                ..INERT
            },
            Cell::Hazard => CellBehavior {
                in_hazard: true,
                ..INERT
            },
        }
    }
}

/// Errors raised when constructing a maze from external data
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("maze grid is empty")]
    Empty,
    #[error("maze row {row} has {got} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("maze JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rectangular grid of cells, serialized as nested rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Maze {
    /// Build a maze from nested rows, validating rectangularity.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, MazeError> {
        let row_count = rows.len();
        let col_count = rows.first().map_or(0, Vec::len);
        if row_count == 0 || col_count == 0 {
            return Err(MazeError::Empty);
        }
        let mut cells = Vec::with_capacity(row_count * col_count);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != col_count {
                return Err(MazeError::Ragged {
                    row: i,
                    expected: col_count,
                    got: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: row_count,
            cols: col_count,
            cells,
        })
    }

    /// Parse a maze from its JSON form (an array of cell-tag rows).
    pub fn from_json(json: &str) -> Result<Self, MazeError> {
        serde_json::from_str(json).map_err(MazeError::from)
    }

    /// A rows × cols grid filled with a single cell kind.
    pub fn filled(rows: usize, cols: usize, cell: Cell) -> Self {
        Self {
            rows,
            cols,
            cells: vec![cell; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col). Indices must already be in range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    /// Replace the cell at (row, col). Used by level construction, not the
    /// simulation: the grid is immutable while a run is in progress.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col] = cell;
    }

    /// First `Start` tile in row-major order, if any.
    pub fn start_cell(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|&c| c == Cell::Start)
            .map(|i| (i / self.cols, i % self.cols))
    }

    /// World-space spawn point: the center of the `Start` tile if one
    /// exists, otherwise the grid's geometric center.
    pub fn spawn_point(&self, cell_size: f32) -> Vec2 {
        match self.start_cell() {
            Some((row, col)) => Vec2::new(
                (col as f32 + 0.5) * cell_size,
                (row as f32 + 0.5) * cell_size,
            ),
            None => Vec2::new(
                cell_size * (self.cols / 2) as f32,
                cell_size * (self.rows / 2) as f32,
            ),
        }
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Maze {
    type Error = MazeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Maze> for Vec<Vec<Cell>> {
    fn from(maze: Maze) -> Self {
        maze.cells
            .chunks(maze.cols)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_flags() {
        assert!(!Cell::Wall.behavior().allows_movement);
        assert!(Cell::Goal.behavior().reaches_goal);
        assert!(Cell::Goal.behavior().allows_movement);
        assert!(Cell::SlowZone.behavior().in_slow_zone);
        assert!(Cell::SpeedZone.behavior().in_speed_zone);
        assert!(Cell::Hazard.behavior().in_hazard);
        assert_eq!(Cell::Empty.behavior(), Cell::Start.behavior());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![Cell::Empty, Cell::Empty], vec![Cell::Empty]];
        assert!(matches!(
            Maze::from_rows(rows),
            Err(MazeError::Ragged {
                row: 1,
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(matches!(Maze::from_rows(Vec::new()), Err(MazeError::Empty)));
        assert!(matches!(
            Maze::from_rows(vec![Vec::new()]),
            Err(MazeError::Empty)
        ));
    }

    #[test]
    fn test_from_json() {
        let maze = Maze::from_json(r#"[["Wall","Empty"],["Start","Goal"]]"#).unwrap();
        assert_eq!(maze.rows(), 2);
        assert_eq!(maze.cols(), 2);
        assert_eq!(maze.get(0, 0), Cell::Wall);
        assert_eq!(maze.get(1, 1), Cell::Goal);
    }

    #[test]
    fn test_spawn_point_prefers_start_tile() {
        let mut maze = Maze::filled(4, 4, Cell::Empty);
        maze.set(1, 2, Cell::Start);
        let spawn = maze.spawn_point(66.0);
        assert_eq!(spawn, Vec2::new(2.5 * 66.0, 1.5 * 66.0));
    }

    #[test]
    fn test_spawn_point_center_fallback() {
        // Integer cell division, matching the editor's centering rule
        let maze = Maze::filled(5, 9, Cell::Empty);
        let spawn = maze.spawn_point(66.0);
        assert_eq!(spawn, Vec2::new(66.0 * 4.0, 66.0 * 2.0));
    }

    #[test]
    fn test_first_start_in_row_major_order_wins() {
        let mut maze = Maze::filled(3, 3, Cell::Empty);
        maze.set(2, 0, Cell::Start);
        maze.set(0, 2, Cell::Start);
        assert_eq!(maze.start_cell(), Some((0, 2)));
    }
}
