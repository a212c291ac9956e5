//! The interpreter's output unit.

use crate::movement::Bases;
use crate::result::AtBatResult;
use serde::{Deserialize, Serialize};

/// One interpreted play: the plate-appearance outcome (if the play had one)
/// and every runner's movement.
///
/// `is_out` refers to the batter only; retired base runners are flagged on
/// their own entries in `bases`.
///
/// # Examples
///
/// ```rust
/// use retroscore::{Action, Base, Bases};
/// use retroscore::result;
///
/// let single = Action::with_result(result::hit(Base::First))
///     .with_bases(Bases::batter_to(Base::First));
/// assert!(!single.is_out);
/// assert_eq!(single.bases.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub is_out: bool,
    pub is_sacrifice: bool,
    pub result: Option<AtBatResult>,
    pub bases: Bases,
}

impl Action {
    /// An action that records nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_result(result: AtBatResult) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    pub fn with_bases(mut self, bases: Bases) -> Self {
        self.bases = bases;
        self
    }

    pub fn out(mut self) -> Self {
        self.is_out = true;
        self
    }

    pub fn sacrifice(mut self, is_sacrifice: bool) -> Self {
        self.is_sacrifice = is_sacrifice;
        self
    }

    /// Outs recorded on the play, batter included.
    pub fn outs(&self) -> usize {
        let batter_listed = self
            .bases
            .get(crate::base::Origin::Batter)
            .is_some_and(|b| b.is_retired());
        let runner_outs = self.bases.outs();
        if self.is_out && !batter_listed {
            runner_outs + 1
        } else {
            runner_outs
        }
    }
}

/// Pitch counters that accompany a replayed play. They come from the
/// replay context, never from the play notation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchCounts {
    pub balls: u8,
    pub strikes: u8,
    pub pitch_count: u32,
}

impl PitchCounts {
    pub fn new(balls: u8, strikes: u8, pitch_count: u32) -> Self {
        Self {
            balls,
            strikes,
            pitch_count,
        }
    }
}
