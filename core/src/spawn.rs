use rand::prelude::*;
use rand::rngs::SmallRng;
use smallvec::SmallVec;

use crate::*;

pub type SpawnedCells = SmallVec<[Coord2; 4]>;

/// Places new tiles on empty cells picked uniformly at random.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
    rng: SmallRng,
    value: TileValue,
}

impl SpawnScheduler {
    pub fn new(seed: u64, value: TileValue) -> Self {
        debug_assert!(is_tile_value(value) && value != 0);
        Self {
            rng: SmallRng::seed_from_u64(seed),
            value,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    pub fn value(&self) -> TileValue {
        self.value
    }

    /// Places up to `count` tiles, stopping early once the board is full.
    ///
    /// Each tile takes exactly one draw: the n-th empty cell for a random n below the free-cell
    /// count, so a nearly full board costs no more than an empty one.
    pub fn spawn(&mut self, grid: &mut GridState, count: CellCount) -> SpawnedCells {
        let mut placed = SpawnedCells::new();

        for _ in 0..count {
            let free_cells = grid.free_cell_count();
            if free_cells == 0 {
                log::debug!(
                    "Board full, placed {} of {} requested tiles",
                    placed.len(),
                    count
                );
                break;
            }

            let nth: CellCount = self.rng.random_range(0..free_cells);
            let Some(coords) = grid.iter_empty().nth(usize::from(nth)) else {
                debug_assert!(false, "free-cell count {free_cells} exceeds empty cells");
                break;
            };

            grid.set_value(coords, self.value);
            placed.push(coords);
        }

        log::debug!("Spawned {:?}", placed);
        placed
    }
}
