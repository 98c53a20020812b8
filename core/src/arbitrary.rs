use quickcheck::{Arbitrary, Gen};

use crate::*;

/// Board with a mix of empty cells and small tiles, so slides and merges are both likely.
#[derive(Clone, Debug)]
pub struct ArbitraryGrid(pub GridState);

impl Arbitrary for ArbitraryGrid {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut grid = GridState::new();
        for column in 0..GRID_SIZE {
            for row in 0..GRID_SIZE {
                let roll = u8::arbitrary(g) % 7;
                let value = if roll < 3 { 0 } else { 1 << (roll - 2) };
                grid.set_value((column, row), value);
            }
        }
        Self(grid)
    }
}

/// Board without empty cells, for exercising the game-over check.
#[derive(Clone, Debug)]
pub struct FullGrid(pub GridState);

impl Arbitrary for FullGrid {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut grid = GridState::new();
        for column in 0..GRID_SIZE {
            for row in 0..GRID_SIZE {
                let value = 2 << (u8::arbitrary(g) % 10);
                grid.set_value((column, row), value);
            }
        }
        Self(grid)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct ArbitraryDirection(pub Direction);

impl Arbitrary for ArbitraryDirection {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(*g.choose(&Direction::ALL).unwrap())
    }
}
