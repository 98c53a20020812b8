use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only picture of a session, for display and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Row-major tile values, `rows[row][column]`.
    pub rows: [[TileValue; GRID_SIZE as usize]; GRID_SIZE as usize],
    pub score: Score,
    pub free_cells: CellCount,
    pub phase: MovePhase,
    pub active_transitions: usize,
}

impl Snapshot {
    pub fn from_engine<R: TileRenderer, L: GameListener>(engine: &GameEngine<R, L>) -> Self {
        let grid = engine.grid();
        Self {
            rows: grid.rows(),
            score: engine.score(),
            free_cells: grid.free_cell_count(),
            phase: engine.phase(),
            active_transitions: engine.active_transitions(),
        }
    }

    pub fn max_tile(&self) -> TileValue {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }
}
