use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// What happened to a single tile while resolving a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEvent {
    /// Tile moved into an empty cell, keeping its value.
    Slide {
        from: Coord2,
        to: Coord2,
        value: TileValue,
    },
    /// Tile moved into an equal tile; `value` is the doubled value now stored at `to`.
    Merge {
        from: Coord2,
        to: Coord2,
        value: TileValue,
    },
}

impl MoveEvent {
    pub const fn to(self) -> Coord2 {
        match self {
            Self::Slide { to, .. } | Self::Merge { to, .. } => to,
        }
    }

    pub const fn is_merge(self) -> bool {
        matches!(self, Self::Merge { .. })
    }
}

pub type MoveEvents = SmallVec<[MoveEvent; TOTAL_CELLS as usize]>;

/// Result of resolving one move against a grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Events in scan order, the order in which they were applied to the grid.
    pub events: MoveEvents,
    /// Sum of the values produced by merges.
    pub gained: Score,
}

impl Resolution {
    /// Whether any tile changed position or value.
    pub fn has_update(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn merge_count(&self) -> usize {
        self.events.iter().filter(|event| event.is_merge()).count()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Destination {
    Empty(Coord2),
    Merge(Coord2),
}

type MergedMask = [[bool; GRID_SIZE as usize]; GRID_SIZE as usize];

/// Slides and merges every tile of `grid` toward the edge named by `direction`.
///
/// Tiles closest to the target edge are resolved first, so a tile never passes over one that is
/// still waiting to move. Every tile merges at most once and a cell that received a merge does
/// not accept a second one during the same move.
pub fn resolve_move(grid: &mut GridState, direction: Direction) -> Resolution {
    let mut merged: MergedMask = Default::default();
    let mut resolution = Resolution::default();

    for from in direction.scan_order() {
        let value = grid.value_at(from);
        if value == 0 {
            continue;
        }

        let Some(destination) = find_destination(grid, &merged, from, value, direction) else {
            continue;
        };

        let event = match destination {
            Destination::Empty(to) => {
                grid.set_value(from, 0);
                grid.set_value(to, value);
                MoveEvent::Slide { from, to, value }
            }
            Destination::Merge(to) => {
                let merged_value = value << 1;
                grid.set_value(from, 0);
                grid.set_value(to, merged_value);
                merged[usize::from(to.0)][usize::from(to.1)] = true;
                resolution.gained = resolution.gained.saturating_add(merged_value.into());
                MoveEvent::Merge {
                    from,
                    to,
                    value: merged_value,
                }
            }
        };

        log::trace!("{direction:?}: {event:?}");
        resolution.events.push(event);
    }

    resolution
}

/// Whether resolving `direction` would change `grid`, without touching it.
pub fn can_move(grid: &GridState, direction: Direction) -> bool {
    grid.iter_occupied().any(|(coords, value)| {
        apply_delta(coords, direction.step()).is_some_and(|next| {
            let next_value = grid.value_at(next);
            next_value == 0 || (next_value == value && can_merge(value))
        })
    })
}

/// Walks from `from` toward the target edge looking for the furthest cell the tile can reach.
fn find_destination(
    grid: &GridState,
    merged: &MergedMask,
    from: Coord2,
    value: TileValue,
    direction: Direction,
) -> Option<Destination> {
    let mut destination = None;
    let mut cursor = from;

    while let Some(next) = apply_delta(cursor, direction.step()) {
        match grid.value_at(next) {
            0 => destination = Some(Destination::Empty(next)),
            other
                if other == value
                    && can_merge(value)
                    && !merged[usize::from(next.0)][usize::from(next.1)] =>
            {
                return Some(Destination::Merge(next));
            }
            _ => break,
        }
        cursor = next;
    }

    destination
}
