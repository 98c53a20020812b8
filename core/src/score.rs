use serde::{Deserialize, Serialize};

use crate::Score;

/// Points collected during one session, only ever grows until reset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    current: Score,
}

impl ScoreTracker {
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    pub fn increase(&mut self, amount: Score) {
        self.current = self.current.saturating_add(amount);
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub const fn current(&self) -> Score {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_accumulates_and_saturates() {
        let mut score = ScoreTracker::new();
        score.increase(4);
        score.increase(8);
        assert_eq!(score.current(), 12);

        score.increase(Score::MAX);
        assert_eq!(score.current(), Score::MAX);

        score.reset();
        assert_eq!(score.current(), 0);
    }
}
