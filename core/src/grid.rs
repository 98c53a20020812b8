use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// Tile values of the board plus the number of empty cells.
///
/// The free-cell count is maintained by [`GridState::set_value`], so the number of occupied cells
/// plus [`GridState::free_cell_count`] is always [`TOTAL_CELLS`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridState {
    cells: Array2<TileValue>,
    free_cells: CellCount,
}

impl GridState {
    pub fn new() -> Self {
        Self {
            cells: Array2::default((GRID_SIZE, GRID_SIZE).to_nd_index()),
            free_cells: TOTAL_CELLS,
        }
    }

    /// Builds a board from a row-major literal, `rows[row][column]`.
    pub fn from_rows(rows: [[TileValue; GRID_SIZE as usize]; GRID_SIZE as usize]) -> Result<Self> {
        let mut grid = Self::new();
        for (row, values) in (0..).zip(rows) {
            for (column, value) in (0..).zip(values) {
                if !is_tile_value(value) {
                    return Err(GameError::InvalidTileValue(value));
                }
                grid.set_value((column, row), value);
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> [[TileValue; GRID_SIZE as usize]; GRID_SIZE as usize] {
        let mut rows = [[0; GRID_SIZE as usize]; GRID_SIZE as usize];
        for ((column, row), &value) in self.cells.indexed_iter() {
            rows[row][column] = value;
        }
        rows
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn value_at(&self, coords: Coord2) -> TileValue {
        self.cells[coords.to_nd_index()]
    }

    pub fn try_value_at(&self, coords: Coord2) -> Result<TileValue> {
        let coords = self.validate_coords(coords)?;
        Ok(self.value_at(coords))
    }

    pub fn set_value(&mut self, coords: Coord2, value: TileValue) {
        debug_assert!(is_tile_value(value), "not a tile value: {value}");

        let cell = &mut self.cells[coords.to_nd_index()];
        match (*cell == 0, value == 0) {
            (true, false) => self.free_cells -= 1,
            (false, true) => self.free_cells += 1,
            _ => {}
        }
        *cell = value;

        debug_assert_eq!(
            self.free_cells,
            self.count_empty(),
            "free-cell count diverged from grid"
        );
    }

    pub fn free_cell_count(&self) -> CellCount {
        self.free_cells
    }

    pub fn occupied_count(&self) -> CellCount {
        TOTAL_CELLS - self.free_cells
    }

    pub fn is_full(&self) -> bool {
        self.free_cells == 0
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
        self.free_cells = TOTAL_CELLS;
    }

    pub fn iter_occupied(&self) -> impl Iterator<Item = (Coord2, TileValue)> + '_ {
        self.iter_cells().filter(|&(_, value)| value != 0)
    }

    pub fn iter_empty(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_cells()
            .filter(|&(_, value)| value == 0)
            .map(|(coords, _)| coords)
    }

    /// Sum of every tile on the board.
    pub fn total_value(&self) -> u64 {
        self.cells.iter().map(|&value| u64::from(value)).sum()
    }

    pub fn max_tile(&self) -> TileValue {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    fn iter_cells(&self) -> impl Iterator<Item = (Coord2, TileValue)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((column, row), &value)| ((column as Ix, row as Ix), value))
    }

    fn count_empty(&self) -> CellCount {
        self.cells.iter().filter(|&&value| value == 0).count() as CellCount
    }
}

impl Default for GridState {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Coord2> for GridState {
    type Output = TileValue;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
