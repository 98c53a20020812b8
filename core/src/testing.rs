use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::*;

pub type TileId = u32;

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Slide {
        id: TransitionId,
        handle: TileId,
        from: Coord2,
        to: Coord2,
    },
    Merge {
        id: TransitionId,
        moving: TileId,
        stationary: TileId,
        new_value: TileValue,
        to: Coord2,
    },
    SpawnIn {
        id: TransitionId,
        handle: TileId,
        coords: Coord2,
        value: TileValue,
    },
}

impl Request {
    fn id(&self) -> TransitionId {
        match self {
            Self::Slide { id, .. } | Self::Merge { id, .. } | Self::SpawnIn { id, .. } => *id,
        }
    }
}

/// Keeps every request and applies its effect only once the test collects the pending ids.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub requests: Vec<Request>,
    unfinished: Vec<Request>,
    tiles: BTreeMap<TileId, TileValue>,
    next_tile: TileId,
}

impl RecordingRenderer {
    pub fn live_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_live(&self, tile: TileId) -> bool {
        self.tiles.contains_key(&tile)
    }

    pub fn value_of(&self, tile: TileId) -> Option<TileValue> {
        self.tiles.get(&tile).copied()
    }

    /// Finishes the effects of every unfinished request, returning their ids in request order.
    pub fn take_pending(&mut self) -> Vec<TransitionId> {
        let unfinished = core::mem::take(&mut self.unfinished);
        for request in &unfinished {
            if let Request::Merge {
                moving,
                stationary,
                new_value,
                ..
            } = request
            {
                self.tiles.remove(moving);
                self.tiles.insert(*stationary, *new_value);
            }
        }
        unfinished.iter().map(Request::id).collect()
    }

    fn record(&mut self, request: Request) {
        self.requests.push(request.clone());
        self.unfinished.push(request);
    }
}

impl TileRenderer for RecordingRenderer {
    type Handle = TileId;

    fn create_tile(&mut self, _coords: Coord2, value: TileValue) -> Self::Handle {
        let tile = self.next_tile;
        self.next_tile += 1;
        self.tiles.insert(tile, value);
        tile
    }

    fn destroy_tile(&mut self, handle: Self::Handle) {
        self.tiles.remove(&handle);
    }

    fn request_slide(&mut self, id: TransitionId, handle: &Self::Handle, from: Coord2, to: Coord2) {
        self.record(Request::Slide {
            id,
            handle: *handle,
            from,
            to,
        });
    }

    fn request_merge_and_destroy(
        &mut self,
        id: TransitionId,
        moving: Self::Handle,
        stationary: &Self::Handle,
        new_value: TileValue,
        to: Coord2,
    ) {
        self.record(Request::Merge {
            id,
            moving,
            stationary: *stationary,
            new_value,
            to,
        });
    }

    fn request_spawn_in(
        &mut self,
        id: TransitionId,
        handle: &Self::Handle,
        coords: Coord2,
        value: TileValue,
    ) {
        self.record(Request::SpawnIn {
            id,
            handle: *handle,
            coords,
            value,
        });
    }
}

#[derive(Debug, Default)]
pub struct RecordingListener {
    pub scores: Vec<Score>,
    pub game_overs: usize,
}

impl GameListener for RecordingListener {
    fn score_changed(&mut self, score: Score) {
        self.scores.push(score);
    }

    fn game_over(&mut self) {
        self.game_overs += 1;
    }
}

/// Completes every transition requested so far, not the ones those completions trigger.
pub fn finish_pending(engine: &mut GameEngine<RecordingRenderer, RecordingListener>) {
    for id in engine.renderer_mut().take_pending() {
        engine.on_transition_complete(id);
    }
}

/// Completes transitions until the engine stops requesting new ones.
pub fn finish_all(engine: &mut GameEngine<RecordingRenderer, RecordingListener>) {
    loop {
        let ids = engine.renderer_mut().take_pending();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            engine.on_transition_complete(id);
        }
    }
}
