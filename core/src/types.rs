use serde::{Deserialize, Serialize};

/// Single coordinate axis used for columns and rows.
pub type Ix = u8;

/// Count type used for free-cell and occupied-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(column, row)`.
pub type Coord2 = (Ix, Ix);

/// Value carried by a tile, `0` marks an empty cell.
pub type TileValue = u32;

pub type Score = u64;

/// Width and height of the board.
pub const GRID_SIZE: Ix = 4;

pub const TOTAL_CELLS: CellCount = mult(GRID_SIZE, GRID_SIZE);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Ix, b: Ix) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Largest value a cell can hold. Tiles of this value no longer merge.
pub const MAX_TILE_VALUE: TileValue = 1 << (TileValue::BITS - 1);

/// Whether `value` may be stored in a cell: either empty or a power of two of at least 2.
pub const fn is_tile_value(value: TileValue) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Whether two tiles of `value` can combine without leaving the range of tile values.
pub const fn can_merge(value: TileValue) -> bool {
    value != 0 && value < MAX_TILE_VALUE
}

pub const fn in_bounds(coords: Coord2) -> bool {
    coords.0 < GRID_SIZE && coords.1 < GRID_SIZE
}

/// Applies `delta` to `coords`, returning a value only when it remains on the board.
pub fn apply_delta(coords: Coord2, delta: (i8, i8)) -> Option<Coord2> {
    let (column, row) = coords;
    let (dx, dy) = delta;

    let next_column = column.checked_add_signed(dx)?;
    let next_row = row.checked_add_signed(dy)?;
    let next = (next_column, next_row);

    in_bounds(next).then_some(next)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// `(column, row)` delta pointing toward the edge the tiles are pushed against.
    pub const fn step(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Every cell of the board, lines nearest to the target edge first.
    pub fn scan_order(self) -> ScanOrder {
        ScanOrder {
            direction: self,
            index: 0,
        }
    }
}

/// Iterator over the board in the order a move has to resolve it.
///
/// Vertical moves walk whole rows starting at the target edge, columns left to right inside each
/// row. Horizontal moves walk whole columns starting at the target edge, rows top to bottom.
#[derive(Clone, Debug)]
pub struct ScanOrder {
    direction: Direction,
    index: CellCount,
}

impl Iterator for ScanOrder {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= TOTAL_CELLS {
            return None;
        }

        let size = CellCount::from(GRID_SIZE);
        let line = (self.index / size) as Ix;
        let offset = (self.index % size) as Ix;
        let last = GRID_SIZE - 1;
        self.index += 1;

        Some(match self.direction {
            Direction::Up => (offset, line),
            Direction::Down => (offset, last - line),
            Direction::Left => (line, offset),
            Direction::Right => (last - line, offset),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::from(TOTAL_CELLS - self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for ScanOrder {}
