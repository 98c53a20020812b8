use std::collections::BTreeMap;

use twofold_core::*;

pub type TileId = u32;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Sprite {
    coords: Coord2,
    value: TileValue,
    /// Hidden while its spawn-in transition runs.
    grown: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Effect {
    Slide {
        tile: TileId,
        to: Coord2,
    },
    Merge {
        moving: TileId,
        stationary: TileId,
        new_value: TileValue,
        to: Coord2,
    },
    SpawnIn {
        tile: TileId,
    },
}

#[derive(Copy, Clone, Debug)]
struct Animation {
    id: TransitionId,
    frames_left: u32,
    effect: Effect,
}

/// Text renderer that plays every transition over a fixed number of frames.
///
/// The host calls [`FrameRenderer::tick`] once per frame and hands the finished ids back to the
/// engine. What it draws comes from its own sprites, never from the engine's grid, so the board
/// only shows a move once the transitions for it have actually run.
#[derive(Debug)]
pub struct FrameRenderer {
    frames: u32,
    next_tile: TileId,
    sprites: BTreeMap<TileId, Sprite>,
    animations: Vec<Animation>,
}

impl FrameRenderer {
    pub fn new(frames: u32) -> Self {
        Self {
            frames: frames.max(1),
            next_tile: 0,
            sprites: BTreeMap::new(),
            animations: Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn tile_count(&self) -> usize {
        self.sprites.len()
    }

    /// Advances every running animation by one frame, returning the ids that finished.
    pub fn tick(&mut self) -> Vec<TransitionId> {
        let mut finished = Vec::new();
        let mut running = Vec::with_capacity(self.animations.len());

        for mut animation in std::mem::take(&mut self.animations) {
            animation.frames_left = animation.frames_left.saturating_sub(1);
            if animation.frames_left == 0 {
                self.finish(animation.effect);
                finished.push(animation.id);
            } else {
                running.push(animation);
            }
        }

        self.animations = running;
        finished
    }

    /// Draws the board as the player currently sees it.
    pub fn render(&self) -> String {
        let mut cells = [[None; GRID_SIZE as usize]; GRID_SIZE as usize];
        for sprite in self.sprites.values().filter(|sprite| sprite.grown) {
            let (column, row) = sprite.coords;
            cells[usize::from(row)][usize::from(column)] = Some(sprite.value);
        }

        let border = format!("+{}\n", "------+".repeat(GRID_SIZE.into()));
        let mut out = border.clone();
        for row in cells {
            out.push('|');
            for cell in row {
                let text = cell.map_or_else(|| ".".to_string(), |value| value.to_string());
                out.push_str(&format!("{text:^6}|"));
            }
            out.push('\n');
            out.push_str(&border);
        }
        out
    }

    fn start(&mut self, id: TransitionId, effect: Effect) {
        log::trace!("start {id:?}: {effect:?}");
        self.animations.push(Animation {
            id,
            frames_left: self.frames,
            effect,
        });
    }

    fn finish(&mut self, effect: Effect) {
        match effect {
            Effect::Slide { tile, to } => {
                if let Some(sprite) = self.sprites.get_mut(&tile) {
                    sprite.coords = to;
                }
            }
            Effect::Merge {
                moving,
                stationary,
                new_value,
                to,
            } => {
                self.sprites.remove(&moving);
                if let Some(sprite) = self.sprites.get_mut(&stationary) {
                    sprite.coords = to;
                    sprite.value = new_value;
                }
            }
            Effect::SpawnIn { tile } => {
                if let Some(sprite) = self.sprites.get_mut(&tile) {
                    sprite.grown = true;
                }
            }
        }
    }
}

impl TileRenderer for FrameRenderer {
    type Handle = TileId;

    fn create_tile(&mut self, coords: Coord2, value: TileValue) -> TileId {
        let tile = self.next_tile;
        self.next_tile = self.next_tile.wrapping_add(1);
        self.sprites.insert(
            tile,
            Sprite {
                coords,
                value,
                grown: true,
            },
        );
        tile
    }

    fn destroy_tile(&mut self, tile: TileId) {
        self.sprites.remove(&tile);

        // the moving half of a merge already belongs to us and goes with its target
        let mut orphans = Vec::new();
        self.animations.retain(|animation| match animation.effect {
            Effect::Slide { tile: t, .. } | Effect::SpawnIn { tile: t } => t != tile,
            Effect::Merge {
                moving, stationary, ..
            } => {
                if stationary == tile {
                    orphans.push(moving);
                }
                moving != tile && stationary != tile
            }
        });
        for moving in orphans {
            self.sprites.remove(&moving);
        }
    }

    fn request_slide(&mut self, id: TransitionId, tile: &TileId, _from: Coord2, to: Coord2) {
        self.start(id, Effect::Slide { tile: *tile, to });
    }

    fn request_merge_and_destroy(
        &mut self,
        id: TransitionId,
        moving: TileId,
        stationary: &TileId,
        new_value: TileValue,
        to: Coord2,
    ) {
        self.start(
            id,
            Effect::Merge {
                moving,
                stationary: *stationary,
                new_value,
                to,
            },
        );
    }

    fn request_spawn_in(
        &mut self,
        id: TransitionId,
        tile: &TileId,
        _coords: Coord2,
        _value: TileValue,
    ) {
        if let Some(sprite) = self.sprites.get_mut(tile) {
            sprite.grown = false;
        }
        self.start(id, Effect::SpawnIn { tile: *tile });
    }
}

/// Score display and game-over banner state.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    pub score: Score,
    pub best: Score,
    pub game_over: bool,
}

impl GameListener for ScoreBoard {
    fn score_changed(&mut self, score: Score) {
        self.score = score;
        self.best = self.best.max(score);
        if score == 0 {
            self.game_over = false;
        }
    }

    fn game_over(&mut self) {
        self.game_over = true;
    }
}

pub type Engine = GameEngine<FrameRenderer, ScoreBoard>;

/// Runs frames until the renderer has nothing left to play, returns how many it took.
pub fn run_until_idle(engine: &mut Engine) -> u32 {
    let mut frames = 0;
    while !engine.renderer().is_idle() {
        for id in engine.renderer_mut().tick() {
            engine.on_transition_complete(id);
        }
        frames += 1;
    }
    frames
}
