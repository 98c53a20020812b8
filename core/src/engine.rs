use crate::*;

/// The visual side of a session: owns tile handles and runs the transitions the engine asks for.
///
/// Every `request_*` call carries a [`TransitionId`] that has to be passed back to
/// [`GameEngine::on_transition_complete`] once the effect has finished, otherwise input stays
/// blocked.
pub trait TileRenderer {
    type Handle;

    /// Creates a tile showing `value` at `coords`, fully visible.
    fn create_tile(&mut self, coords: Coord2, value: TileValue) -> Self::Handle;

    /// Removes a tile immediately, used on reset.
    fn destroy_tile(&mut self, handle: Self::Handle);

    fn request_slide(&mut self, id: TransitionId, handle: &Self::Handle, from: Coord2, to: Coord2);

    /// Slides `moving` onto `stationary`, then destroys `moving` and shows `new_value` on
    /// `stationary`.
    fn request_merge_and_destroy(
        &mut self,
        id: TransitionId,
        moving: Self::Handle,
        stationary: &Self::Handle,
        new_value: TileValue,
        to: Coord2,
    );

    fn request_spawn_in(
        &mut self,
        id: TransitionId,
        handle: &Self::Handle,
        coords: Coord2,
        value: TileValue,
    );
}

/// Notifications for score displays and other observers.
pub trait GameListener {
    fn score_changed(&mut self, _score: Score) {}

    fn game_over(&mut self) {}
}

impl GameListener for () {}

/// One game session: board, tile handles, score and the transition gate.
pub struct GameEngine<R: TileRenderer, L: GameListener = ()> {
    config: GameConfig,
    grid: GridState,
    placement: TilePlacement<R::Handle>,
    score: ScoreTracker,
    spawner: SpawnScheduler,
    animation: AnimationCoordinator,
    renderer: R,
    listener: L,
}

impl<R: TileRenderer, L: GameListener> GameEngine<R, L> {
    /// Starts a session with the opening tiles already placed.
    pub fn new(config: GameConfig, seed: u64, renderer: R, listener: L) -> Self {
        let mut engine = Self::idle(config, seed, renderer, listener);
        engine.reset();
        engine
    }

    /// Starts a session from a prepared board instead of the opening tiles.
    pub fn with_grid(
        config: GameConfig,
        seed: u64,
        grid: GridState,
        renderer: R,
        listener: L,
    ) -> Self {
        let mut engine = Self::idle(config, seed, renderer, listener);
        for (coords, value) in grid.iter_occupied() {
            let handle = engine.renderer.create_tile(coords, value);
            engine.placement.place(coords, handle);
        }
        engine.grid = grid;
        if !has_any_move(&engine.grid) {
            engine.animation.set_phase(MovePhase::Over);
        }
        engine
    }

    fn idle(config: GameConfig, seed: u64, renderer: R, listener: L) -> Self {
        debug_assert_eq!(config.validate(), Ok(()));
        Self {
            config,
            grid: GridState::new(),
            placement: TilePlacement::new(),
            score: ScoreTracker::new(),
            spawner: SpawnScheduler::new(seed, config.spawn_value),
            animation: AnimationCoordinator::new(),
            renderer,
            listener,
        }
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn placement(&self) -> &TilePlacement<R::Handle> {
        &self.placement
    }

    pub fn score(&self) -> Score {
        self.score.current()
    }

    pub fn phase(&self) -> MovePhase {
        self.animation.phase()
    }

    pub fn active_transitions(&self) -> usize {
        self.animation.active_transitions()
    }

    pub fn accepts_input(&self) -> bool {
        self.animation.accepts_input()
    }

    pub fn is_over(&self) -> bool {
        self.animation.phase().is_over()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(self)
    }

    /// Clears the session and places the opening tiles.
    pub fn reset(&mut self) {
        for (_, handle) in self.placement.drain() {
            self.renderer.destroy_tile(handle);
        }
        self.grid.clear();
        self.score.reset();
        self.animation.reset();
        self.listener.score_changed(self.score.current());

        let placed = self.spawner.spawn(&mut self.grid, self.config.initial_tile_count);
        self.show_spawned(&placed, self.config.animate_initial_spawn);
        log::info!("New game with {} tiles", placed.len());
    }

    pub fn reset_with_seed(&mut self, seed: u64) {
        self.spawner.reseed(seed);
        self.reset();
    }

    /// Resolves a move if no other move is in flight.
    ///
    /// The board, tile placement and score are updated before this returns; spawning the next
    /// tile and the game-over check wait until every requested transition has been reported
    /// through [`Self::on_transition_complete`].
    pub fn resolve_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.animation.phase().is_over() {
            return MoveOutcome::Finished;
        }
        if !self.animation.begin_move() {
            log::trace!(
                "Ignoring {direction:?}, {} transitions running",
                self.animation.active_transitions()
            );
            return MoveOutcome::Busy;
        }

        let resolution = resolve_move(&mut self.grid, direction);
        if !resolution.has_update() {
            self.animation.set_phase(MovePhase::Idle);
            log::debug!("{direction:?} changed nothing");
            return MoveOutcome::NoChange;
        }

        for &event in &resolution.events {
            self.apply_event(event);
        }
        debug_assert!(
            self.placement.matches_grid(&self.grid),
            "tile placement diverged from grid"
        );

        if resolution.gained > 0 {
            self.score.increase(resolution.gained);
            self.listener.score_changed(self.score.current());
        }
        log::debug!(
            "{direction:?}: {} events, {} merges, +{}",
            resolution.events.len(),
            resolution.merge_count(),
            resolution.gained
        );

        self.advance();
        MoveOutcome::Moved
    }

    /// Reports a finished transition, continuing the current move once all of them are done.
    pub fn on_transition_complete(&mut self, id: TransitionId) {
        match self.animation.complete(id) {
            Completion::Unknown => log::warn!("Ignoring completion of unknown transition {id:?}"),
            Completion::Pending => {}
            Completion::Settled => self.advance(),
        }
    }

    fn apply_event(&mut self, event: MoveEvent) {
        match event {
            MoveEvent::Slide { from, to, .. } => {
                let Some(handle) = self.placement.tile_at(from) else {
                    debug_assert!(false, "no tile to slide at {from:?}");
                    return;
                };
                let id = self.animation.begin_transition();
                self.renderer.request_slide(id, handle, from, to);
                self.placement.relocate(from, to);
            }
            MoveEvent::Merge { from, to, value } => {
                let Some(moving) = self.placement.remove(from) else {
                    debug_assert!(false, "no tile to merge at {from:?}");
                    return;
                };
                let Some(stationary) = self.placement.tile_at(to) else {
                    debug_assert!(false, "no tile to merge into at {to:?}");
                    self.renderer.destroy_tile(moving);
                    return;
                };
                let id = self.animation.begin_transition();
                self.renderer
                    .request_merge_and_destroy(id, moving, stationary, value, to);
            }
        }
    }

    /// Moves the current move forward through every phase whose transitions have drained.
    fn advance(&mut self) {
        while self.animation.is_settled() {
            match self.animation.phase() {
                MovePhase::Sliding => {
                    let placed = self.spawner.spawn(&mut self.grid, self.config.tiles_per_move);
                    self.show_spawned(&placed, true);
                    self.animation.set_phase(MovePhase::Spawning);
                }
                MovePhase::Spawning => {
                    self.finish_move();
                    return;
                }
                MovePhase::Idle | MovePhase::Over => return,
            }
        }
    }

    fn finish_move(&mut self) {
        debug_assert!(
            self.placement.matches_grid(&self.grid),
            "tile placement diverged from grid"
        );

        if has_any_move(&self.grid) {
            self.animation.set_phase(MovePhase::Idle);
        } else {
            self.animation.set_phase(MovePhase::Over);
            log::info!("Game over, score {}", self.score.current());
            self.listener.game_over();
        }
    }

    fn show_spawned(&mut self, placed: &[Coord2], animate: bool) {
        let value = self.spawner.value();
        for &coords in placed {
            let handle = self.renderer.create_tile(coords, value);
            if animate {
                let id = self.animation.begin_transition();
                self.renderer.request_spawn_in(id, &handle, coords, value);
            }
            self.placement.place(coords, handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use alloc::vec;

    fn engine_with_rows(
        rows: [[TileValue; 4]; 4],
    ) -> GameEngine<RecordingRenderer, RecordingListener> {
        let grid = GridState::from_rows(rows).unwrap();
        GameEngine::with_grid(
            GameConfig::default(),
            1,
            grid,
            RecordingRenderer::default(),
            RecordingListener::default(),
        )
    }

    fn single_row(values: [TileValue; 4]) -> [[TileValue; 4]; 4] {
        [values, [0; 4], [0; 4], [0; 4]]
    }

    #[test]
    fn reset_places_two_tiles() {
        let engine = GameEngine::new(
            GameConfig::default(),
            5,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );

        assert_eq!(engine.grid().free_cell_count(), 14);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.placement().len(), 2);
        assert_eq!(engine.renderer().live_tiles(), 2);
        assert!(engine.renderer().requests.is_empty());
        assert!(engine.accepts_input());
        assert_eq!(engine.listener().scores, vec![0]);
    }

    #[test]
    fn animated_initial_spawn_blocks_input() {
        let config = GameConfig::default().with_animated_initial_spawn(true);
        let mut engine = GameEngine::new(
            config,
            5,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );

        assert_eq!(engine.active_transitions(), 2);
        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Busy);

        finish_all(&mut engine);
        assert!(engine.accepts_input());
        assert_eq!(engine.phase(), MovePhase::Idle);
    }

    #[test]
    fn merge_left_scores_and_requests_one_merge() {
        let mut engine = engine_with_rows(single_row([2, 2, 0, 0]));

        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Moved);

        assert_eq!(engine.grid().value_at((0, 0)), 4);
        assert_eq!(engine.grid().value_at((1, 0)), 0);
        assert_eq!(engine.score(), 4);
        assert_eq!(engine.grid().free_cell_count(), 15);
        assert_eq!(engine.listener().scores, vec![4]);
        assert_eq!(engine.renderer().requests.len(), 1);
        assert!(matches!(
            engine.renderer().requests[0],
            Request::Merge {
                new_value: 4,
                to: (0, 0),
                ..
            }
        ));
        assert_eq!(engine.phase(), MovePhase::Sliding);
    }

    #[test]
    fn slide_right_requests_two_slides() {
        let mut engine = engine_with_rows(single_row([4, 2, 0, 0]));

        assert_eq!(engine.resolve_move(Direction::Right), MoveOutcome::Moved);

        assert_eq!(engine.grid().rows()[0], [0, 0, 4, 2]);
        assert_eq!(engine.score(), 0);
        assert!(engine.listener().scores.is_empty());
        let requests = &engine.renderer().requests;
        assert_eq!(requests.len(), 2);
        assert!(
            requests
                .iter()
                .all(|request| matches!(request, Request::Slide { .. }))
        );
        assert_eq!(engine.placement().tile_at((3, 0)), Some(&1));
        assert_eq!(engine.placement().tile_at((2, 0)), Some(&0));
    }

    #[test]
    fn blocked_move_reopens_input_without_spawning() {
        let mut engine = engine_with_rows(single_row([2, 4, 8, 16]));

        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::NoChange);

        assert!(engine.accepts_input());
        assert_eq!(engine.grid().free_cell_count(), 12);
        assert!(engine.renderer().requests.is_empty());
    }

    #[test]
    fn input_is_gated_until_move_settles() {
        let mut engine = engine_with_rows(single_row([2, 0, 0, 0]));

        assert_eq!(engine.resolve_move(Direction::Right), MoveOutcome::Moved);
        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Busy);
        assert_eq!(engine.grid().free_cell_count(), 15);

        // slide done, spawn-in requested
        finish_pending(&mut engine);
        assert_eq!(engine.phase(), MovePhase::Spawning);
        assert_eq!(engine.grid().free_cell_count(), 14);
        assert!(matches!(
            engine.renderer().requests.last(),
            Some(Request::SpawnIn { value: 2, .. })
        ));
        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Busy);

        finish_pending(&mut engine);
        assert_eq!(engine.phase(), MovePhase::Idle);
        assert!(engine.accepts_input());
        assert!(engine.placement().matches_grid(engine.grid()));
    }

    #[test]
    fn spawn_waits_for_every_transition() {
        let mut engine = engine_with_rows(single_row([4, 2, 0, 0]));
        engine.resolve_move(Direction::Right);

        let ids = engine.renderer_mut().take_pending();
        assert_eq!(ids.len(), 2);

        engine.on_transition_complete(ids[0]);
        assert_eq!(engine.grid().free_cell_count(), 14);
        assert_eq!(engine.phase(), MovePhase::Sliding);

        engine.on_transition_complete(ids[1]);
        assert_eq!(engine.grid().free_cell_count(), 13);
        assert_eq!(engine.phase(), MovePhase::Spawning);
    }

    #[test]
    fn unknown_completion_is_ignored() {
        let mut engine = engine_with_rows(single_row([2, 0, 0, 0]));
        engine.resolve_move(Direction::Down);
        let ids = engine.renderer_mut().take_pending();

        engine.on_transition_complete(ids[0]);
        engine.on_transition_complete(ids[0]);

        assert_eq!(engine.phase(), MovePhase::Spawning);
        assert_eq!(engine.active_transitions(), 1);
    }

    #[test]
    fn full_board_with_pair_stays_playable() {
        // the two 8s are the only pair on the board
        let mut engine = engine_with_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [16, 8, 8, 32],
        ]);

        assert_eq!(engine.resolve_move(Direction::Right), MoveOutcome::Moved);
        assert_eq!(engine.grid().rows()[3], [0, 16, 16, 32]);

        finish_all(&mut engine);

        assert_eq!(engine.grid().rows()[3], [2, 16, 16, 32]);
        assert!(engine.grid().is_full());
        assert_eq!(engine.phase(), MovePhase::Idle);
        assert_eq!(engine.listener().game_overs, 0);

        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Moved);
        assert_eq!(engine.grid().rows()[3], [2, 32, 32, 0]);
        finish_all(&mut engine);
        assert_eq!(engine.score(), 16 + 32);
    }

    #[test]
    fn locked_board_is_over() {
        let mut engine = engine_with_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 8],
        ]);

        assert!(engine.is_over());
        assert_eq!(engine.resolve_move(Direction::Up), MoveOutcome::Finished);
    }

    #[test]
    fn game_over_reported_after_spawn_fills_board() {
        let mut engine = engine_with_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [32, 8, 8, 64],
        ]);

        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Moved);
        assert_eq!(engine.grid().rows()[3], [32, 16, 64, 0]);
        assert!(!engine.is_over());

        finish_all(&mut engine);

        assert_eq!(engine.grid().rows()[3], [32, 16, 64, 2]);
        assert!(engine.is_over());
        assert_eq!(engine.listener().game_overs, 1);
        assert_eq!(engine.score(), 16);
        assert_eq!(engine.resolve_move(Direction::Left), MoveOutcome::Finished);
        assert!(!engine.accepts_input());
    }

    #[test]
    fn reset_clears_everything() {
        let mut engine = engine_with_rows(single_row([2, 2, 4, 0]));
        engine.resolve_move(Direction::Left);
        assert_eq!(engine.score(), 4);
        let stale = engine.renderer_mut().take_pending();

        engine.reset();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.grid().free_cell_count(), 14);
        assert_eq!(engine.placement().len(), 2);
        assert_eq!(engine.renderer().live_tiles(), 2);
        assert_eq!(engine.phase(), MovePhase::Idle);
        assert_eq!(engine.active_transitions(), 0);

        for id in stale {
            engine.on_transition_complete(id);
        }
        assert_eq!(engine.phase(), MovePhase::Idle);
        assert_eq!(engine.grid().free_cell_count(), 14);
    }

    #[test]
    fn merge_destroys_moving_tile_and_keeps_stationary() {
        let mut engine = engine_with_rows(single_row([0, 2, 0, 2]));
        let left = *engine.placement().tile_at((1, 0)).unwrap();
        let right = *engine.placement().tile_at((3, 0)).unwrap();

        engine.resolve_move(Direction::Left);

        // left tile slides to the edge first, then the right one merges into it
        assert_eq!(engine.placement().tile_at((0, 0)), Some(&left));
        assert_eq!(engine.placement().len(), 1);
        assert!(matches!(
            engine.renderer().requests.as_slice(),
            [
                Request::Slide { handle, to: (0, 0), .. },
                Request::Merge { moving, stationary, new_value: 4, .. },
            ] if *handle == left && *moving == right && *stationary == left
        ));

        finish_all(&mut engine);
        assert!(!engine.renderer().is_live(right));
        assert_eq!(engine.renderer().value_of(left), Some(4));
    }

    #[test]
    fn sessions_are_independent() {
        let mut first = engine_with_rows(single_row([2, 2, 0, 0]));
        let second = engine_with_rows(single_row([2, 2, 0, 0]));

        first.resolve_move(Direction::Left);

        assert_eq!(first.score(), 4);
        assert_eq!(second.score(), 0);
        assert_eq!(second.grid().rows()[0], [2, 2, 0, 0]);
    }

    #[test]
    fn snapshot_reports_state() {
        let mut engine = engine_with_rows(single_row([2, 2, 0, 0]));
        engine.resolve_move(Direction::Left);

        let snapshot = engine.snapshot();

        assert_eq!(snapshot.rows[0], [4, 0, 0, 0]);
        assert_eq!(snapshot.score, 4);
        assert_eq!(snapshot.phase, MovePhase::Sliding);
        assert_eq!(snapshot.active_transitions, 1);
        assert_eq!(snapshot.max_tile(), 4);
    }

    #[test]
    fn largest_spawn_value_fills_board_without_merging() {
        let mut engine = GameEngine::new(
            GameConfig::new(2, 1, TileValue::MAX),
            4,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );

        let mut turn = 0usize;
        while !engine.is_over() {
            let moves = available_moves(engine.grid());
            assert_eq!(engine.resolve_move(moves[turn % moves.len()]), MoveOutcome::Moved);
            finish_all(&mut engine);
            turn += 1;
        }

        assert!(engine.grid().is_full());
        assert_eq!(engine.grid().max_tile(), MAX_TILE_VALUE);
        assert_eq!(engine.score(), 0);
        assert_eq!(turn, 14);
    }

    #[test]
    fn reset_with_seed_replays_opening() {
        let mut first = GameEngine::new(
            GameConfig::default(),
            1,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );
        let mut second = GameEngine::new(
            GameConfig::default(),
            2,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );
        first.resolve_move(available_moves(first.grid())[0]);

        first.reset_with_seed(17);
        second.reset_with_seed(17);

        assert_eq!(first.grid(), second.grid());
        assert_eq!(first.score(), 0);
        assert_eq!(first.active_transitions(), 0);
        assert_eq!(second.active_transitions(), 0);
        assert!(first.accepts_input());
        assert_eq!(first.renderer().live_tiles(), 2);
    }

    #[test]
    fn long_random_session_keeps_invariants() {
        let mut engine = GameEngine::new(
            GameConfig::default(),
            99,
            RecordingRenderer::default(),
            RecordingListener::default(),
        );

        let mut turn = 0usize;
        while !engine.is_over() && turn < 2000 {
            let moves = available_moves(engine.grid());
            let direction = moves[turn % moves.len()];
            assert_eq!(engine.resolve_move(direction), MoveOutcome::Moved);
            finish_all(&mut engine);

            let grid = engine.grid();
            assert_eq!(grid.free_cell_count() + grid.occupied_count(), TOTAL_CELLS);
            assert!(engine.placement().matches_grid(grid));
            assert_eq!(engine.renderer().live_tiles(), engine.placement().len());
            turn += 1;
        }

        assert_eq!(engine.is_over(), !has_any_move(engine.grid()));
        assert_eq!(engine.listener().game_overs, usize::from(engine.is_over()));
    }
}
