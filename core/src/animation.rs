use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};

/// Identifier of a visual transition requested from the renderer.
///
/// Ids keep increasing for the lifetime of a coordinator, including across resets, so a late
/// completion from a previous session can never be mistaken for a current transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(u32);

/// Valid transitions:
/// - Idle -> Sliding
/// - Sliding -> Idle (nothing moved)
/// - Sliding -> Spawning
/// - Spawning -> Idle
/// - Spawning -> Over
/// - any -> Idle (reset)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePhase {
    /// Waiting for input
    #[default]
    Idle,
    /// Move resolved, slide and merge transitions running
    Sliding,
    /// New tiles placed, spawn-in transitions running
    Spawning,
    /// No move left, waiting for a reset
    Over,
}

impl MovePhase {
    pub const fn is_move_in_progress(self) -> bool {
        matches!(self, Self::Sliding | Self::Spawning)
    }

    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over)
    }
}

/// Result of reporting a finished transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Id was not pending, nothing changed
    Unknown,
    /// Other transitions are still running
    Pending,
    /// That was the last running transition
    Settled,
}

/// Gate between input and the board: tracks the move phase and every transition still running.
#[derive(Clone, Debug, Default)]
pub struct AnimationCoordinator {
    phase: MovePhase,
    pending: BTreeSet<TransitionId>,
    next_id: u32,
}

impl AnimationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MovePhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: MovePhase) {
        log::trace!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    pub fn active_transitions(&self) -> usize {
        self.pending.len()
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// New moves are only accepted between moves and with no transition running.
    pub fn accepts_input(&self) -> bool {
        !self.phase.is_move_in_progress() && !self.phase.is_over() && self.pending.is_empty()
    }

    /// Moves into [`MovePhase::Sliding`] when input is accepted, returns whether it was.
    pub fn begin_move(&mut self) -> bool {
        if self.accepts_input() {
            self.set_phase(MovePhase::Sliding);
            true
        } else {
            false
        }
    }

    pub fn begin_transition(&mut self) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.insert(id);
        id
    }

    pub fn complete(&mut self, id: TransitionId) -> Completion {
        if !self.pending.remove(&id) {
            Completion::Unknown
        } else if self.pending.is_empty() {
            Completion::Settled
        } else {
            Completion::Pending
        }
    }

    /// Forgets every running transition and returns to idle.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.set_phase(MovePhase::Idle);
    }
}
