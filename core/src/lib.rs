#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use animation::*;
pub use engine::*;
pub use error::*;
pub use game_over::*;
pub use grid::*;
pub use placement::*;
pub use resolver::*;
pub use score::*;
pub use snapshot::*;
pub use spawn::*;
pub use types::*;

mod animation;
mod engine;
mod error;
mod game_over;
mod grid;
mod placement;
mod resolver;
mod score;
mod snapshot;
mod spawn;
mod types;

#[cfg(test)]
mod arbitrary;
#[cfg(test)]
mod testing;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tiles placed by a reset.
    pub initial_tile_count: CellCount,
    /// Tiles placed after every move that changed the board.
    pub tiles_per_move: CellCount,
    /// Value of every spawned tile.
    pub spawn_value: TileValue,
    /// Whether the tiles placed by a reset get spawn-in transitions or just appear.
    pub animate_initial_spawn: bool,
}

impl GameConfig {
    pub const fn new_unchecked(
        initial_tile_count: CellCount,
        tiles_per_move: CellCount,
        spawn_value: TileValue,
    ) -> Self {
        Self {
            initial_tile_count,
            tiles_per_move,
            spawn_value,
            animate_initial_spawn: false,
        }
    }

    pub fn new(
        initial_tile_count: CellCount,
        tiles_per_move: CellCount,
        spawn_value: TileValue,
    ) -> Self {
        let initial_tile_count = initial_tile_count.clamp(1, TOTAL_CELLS);
        let tiles_per_move = tiles_per_move.clamp(1, TOTAL_CELLS);
        let spawn_value = spawn_value
            .clamp(2, MAX_TILE_VALUE)
            .next_power_of_two();
        Self::new_unchecked(initial_tile_count, tiles_per_move, spawn_value)
    }

    pub fn with_animated_initial_spawn(mut self, animate: bool) -> Self {
        self.animate_initial_spawn = animate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_tile_count == 0 || self.initial_tile_count > TOTAL_CELLS {
            return Err(GameError::InvalidConfig(
                "initial tile count must be between 1 and 16",
            ));
        }
        if self.tiles_per_move == 0 || self.tiles_per_move > TOTAL_CELLS {
            return Err(GameError::InvalidConfig(
                "tiles per move must be between 1 and 16",
            ));
        }
        if self.spawn_value == 0 || !is_tile_value(self.spawn_value) {
            return Err(GameError::InvalidTileValue(self.spawn_value));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(2, 1, 2)
    }
}

/// Outcome of asking the engine to move
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A previous move is still in flight, input ignored
    Busy,
    /// No tile could move in that direction
    NoChange,
    /// Tiles moved, the rest of the move follows the transition callbacks
    Moved,
    /// The game is over, only a reset is accepted
    Finished,
}

impl MoveOutcome {
    /// Whether the input was consumed by a move
    pub const fn has_update(self) -> bool {
        match self {
            Self::Busy => false,
            Self::NoChange => false,
            Self::Moved => true,
            Self::Finished => false,
        }
    }
}
