use hashbrown::HashMap;

use crate::*;

/// Maps occupied cells to the renderer's handle of the tile sitting there.
///
/// Handles are opaque here: they only move between cells and back to the renderer.
#[derive(Clone, Debug)]
pub struct TilePlacement<H> {
    tiles: HashMap<Coord2, H>,
}

impl<H> TilePlacement<H> {
    pub fn new() -> Self {
        Self {
            tiles: HashMap::with_capacity(usize::from(TOTAL_CELLS)),
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&H> {
        self.tiles.get(&coords)
    }

    /// Puts `handle` at `coords`, returning whatever was there before.
    pub fn place(&mut self, coords: Coord2, handle: H) -> Option<H> {
        let displaced = self.tiles.insert(coords, handle);
        debug_assert!(displaced.is_none(), "tile placed over another at {coords:?}");
        displaced
    }

    pub fn remove(&mut self, coords: Coord2) -> Option<H> {
        self.tiles.remove(&coords)
    }

    /// Moves the handle at `from` to `to`, returns `false` if there was nothing to move.
    pub fn relocate(&mut self, from: Coord2, to: Coord2) -> bool {
        match self.tiles.remove(&from) {
            Some(handle) => {
                self.place(to, handle);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (Coord2, H)> + '_ {
        self.tiles.drain()
    }

    /// Whether the placed tiles cover exactly the occupied cells of `grid`.
    pub fn matches_grid(&self, grid: &GridState) -> bool {
        self.len() == usize::from(grid.occupied_count())
            && grid
                .iter_occupied()
                .all(|(coords, _)| self.tiles.contains_key(&coords))
    }
}

impl<H> Default for TilePlacement<H> {
    fn default() -> Self {
        Self::new()
    }
}
