use smallvec::SmallVec;

use crate::*;

/// Whether any direction can still change the board.
///
/// A board with a free cell always has a move; a full board has one only when two cells sharing
/// an edge hold the same value below [`MAX_TILE_VALUE`].
pub fn has_any_move(grid: &GridState) -> bool {
    if grid.free_cell_count() > 0 {
        return true;
    }

    for column in 0..GRID_SIZE {
        for row in 0..GRID_SIZE {
            let value = grid[(column, row)];
            if !can_merge(value) {
                continue;
            }
            if column + 1 < GRID_SIZE && grid[(column + 1, row)] == value {
                return true;
            }
            if row + 1 < GRID_SIZE && grid[(column, row + 1)] == value {
                return true;
            }
        }
    }

    false
}

pub fn available_moves(grid: &GridState) -> SmallVec<[Direction; 4]> {
    Direction::ALL
        .into_iter()
        .filter(|&direction| can_move(grid, direction))
        .collect()
}
