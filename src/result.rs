//! Result generators.
//!
//! Pure constructors for the closed set of outcome descriptors a play can
//! produce. Each generator validates the shape of its arguments and returns
//! `ScoreError::InvalidOutcomeArguments` when they make no sense (an empty
//! fielding sequence, a steal of first base, a fielder outside `1..=9`).

use crate::base::Base;
use crate::error::{format_positions, ScoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered fielding sequence crediting an out. Never empty.
///
/// # Examples
///
/// ```rust
/// use retroscore::result::Putout;
///
/// let double_play = Putout::new(vec![6, 4, 3]).unwrap();
/// assert_eq!(double_play.positions(), &[6, 4, 3]);
/// assert_eq!(double_play.to_string(), "6-4-3");
///
/// assert!(Putout::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Putout {
    positions: Vec<u8>,
}

impl Putout {
    /// Build a fielding sequence, rejecting empty lists and positions
    /// outside `1..=9`.
    pub fn new(positions: Vec<u8>) -> Result<Self, ScoreError> {
        if positions.is_empty() {
            return Err(ScoreError::InvalidOutcomeArguments(
                "a putout requires at least one defensive position".to_string(),
            ));
        }
        for &p in &positions {
            validate_position(p)?;
        }
        Ok(Self { positions })
    }

    /// The fielders in the order they handled the ball.
    pub fn positions(&self) -> &[u8] {
        &self.positions
    }
}

impl fmt::Display for Putout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_positions(&self.positions))
    }
}

/// Outcomes charged to (or credited to) the pitcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitcherResultKind {
    Walk,
    IntentionalWalk,
    Strikeout,
    HitByPitch,
}

impl PitcherResultKind {
    /// Scorecard abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            PitcherResultKind::Walk => "BB",
            PitcherResultKind::IntentionalWalk => "IBB",
            PitcherResultKind::Strikeout => "K",
            PitcherResultKind::HitByPitch => "HBP",
        }
    }

    /// Parse a scorecard abbreviation; `HB` is accepted for hit-by-pitch.
    pub fn from_abbreviation(code: &str) -> Option<Self> {
        match code {
            "BB" => Some(PitcherResultKind::Walk),
            "IBB" => Some(PitcherResultKind::IntentionalWalk),
            "K" => Some(PitcherResultKind::Strikeout),
            "HBP" | "HB" => Some(PitcherResultKind::HitByPitch),
            _ => None,
        }
    }
}

/// The outcome of a plate appearance, or of one runner's movement.
///
/// Immutable once constructed; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AtBatResult {
    /// A base hit; `bases` is the base the hit is worth (`Home` for a home run).
    Hit { bases: Base },
    Putout { putout: Putout },
    FlyOut { position: u8 },
    LineOut { position: u8 },
    /// The batter reached while the defense played on another runner.
    FieldersChoice { putout: Option<Putout> },
    /// A fair-territory error letting the runner reach `base`.
    Error { fielder: u8, base: Base },
    /// An error on a foul ball; nobody advances.
    FoulError { fielder: u8 },
    StolenBase { base: Base },
    PickOff { putout: Putout },
    PitcherResult { kind: PitcherResultKind },
}

impl AtBatResult {
    /// Whether this outcome retires the runner it is attached to.
    pub fn is_out(&self) -> bool {
        match self {
            AtBatResult::Putout { .. }
            | AtBatResult::FlyOut { .. }
            | AtBatResult::LineOut { .. }
            | AtBatResult::PickOff { .. } => true,
            AtBatResult::PitcherResult { kind } => *kind == PitcherResultKind::Strikeout,
            AtBatResult::Hit { .. }
            | AtBatResult::FieldersChoice { .. }
            | AtBatResult::Error { .. }
            | AtBatResult::FoulError { .. }
            | AtBatResult::StolenBase { .. } => false,
        }
    }
}

impl fmt::Display for AtBatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtBatResult::Hit { bases } => match bases {
                Base::Home => write!(f, "HR"),
                other => write!(f, "{}B", other.number()),
            },
            AtBatResult::Putout { putout } => write!(f, "{}", putout),
            AtBatResult::FlyOut { position } => write!(f, "F{}", position),
            AtBatResult::LineOut { position } => write!(f, "L{}", position),
            AtBatResult::FieldersChoice { .. } => write!(f, "FC"),
            AtBatResult::Error { fielder, .. } => write!(f, "E{}", fielder),
            AtBatResult::FoulError { fielder } => write!(f, "FLE{}", fielder),
            AtBatResult::StolenBase { base } => write!(f, "SB{}", base),
            AtBatResult::PickOff { putout } => write!(f, "PO {}", putout),
            AtBatResult::PitcherResult { kind } => write!(f, "{}", kind.abbreviation()),
        }
    }
}

fn validate_position(position: u8) -> Result<u8, ScoreError> {
    if (1..=9).contains(&position) {
        Ok(position)
    } else {
        Err(ScoreError::InvalidOutcomeArguments(format!(
            "defensive position {} is outside 1..=9",
            position
        )))
    }
}

/// A base hit worth `bases`.
///
/// ```rust
/// use retroscore::{result, Base};
///
/// assert_eq!(result::hit(Base::Second).to_string(), "2B");
/// ```
pub fn hit(bases: Base) -> AtBatResult {
    AtBatResult::Hit { bases }
}

/// An out credited to a fielding sequence.
///
/// ```rust
/// use retroscore::result;
///
/// let out = result::putout(&[6, 3]).unwrap();
/// assert_eq!(out.to_string(), "6-3");
/// assert!(result::putout(&[]).is_err());
/// ```
pub fn putout(positions: &[u8]) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::Putout {
        putout: Putout::new(positions.to_vec())?,
    })
}

pub fn fly_out(position: u8) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::FlyOut {
        position: validate_position(position)?,
    })
}

pub fn line_out(position: u8) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::LineOut {
        position: validate_position(position)?,
    })
}

/// A fielder's choice, optionally carrying the putout made on the lead runner.
pub fn fielders_choice(putout: Option<Putout>) -> AtBatResult {
    AtBatResult::FieldersChoice { putout }
}

/// An error by `fielder` that let the runner reach `base`.
pub fn error(fielder: u8, base: Base) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::Error {
        fielder: validate_position(fielder)?,
        base,
    })
}

pub fn foul_error(fielder: u8) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::FoulError {
        fielder: validate_position(fielder)?,
    })
}

/// A stolen base. Only second, third and home can be stolen.
///
/// ```rust
/// use retroscore::{result, Base};
///
/// assert!(result::stolen_base(Base::Third).is_ok());
/// assert!(result::stolen_base(Base::First).is_err());
/// ```
pub fn stolen_base(base: Base) -> Result<AtBatResult, ScoreError> {
    if base == Base::First {
        return Err(ScoreError::InvalidOutcomeArguments(
            "first base cannot be stolen".to_string(),
        ));
    }
    Ok(AtBatResult::StolenBase { base })
}

pub fn pick_off(positions: &[u8]) -> Result<AtBatResult, ScoreError> {
    Ok(AtBatResult::PickOff {
        putout: Putout::new(positions.to_vec())?,
    })
}

pub fn pitcher_result(kind: PitcherResultKind) -> AtBatResult {
    AtBatResult::PitcherResult { kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_structurally_equal() {
        assert_eq!(hit(Base::First), hit(Base::First));
        assert_ne!(hit(Base::First), hit(Base::Second));
        assert_eq!(putout(&[6, 4, 3]).unwrap(), putout(&[6, 4, 3]).unwrap());
        assert_ne!(putout(&[6, 3]).unwrap(), putout(&[4, 3]).unwrap());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            putout(&[]),
            Err(ScoreError::InvalidOutcomeArguments(_))
        ));
        assert!(matches!(
            pick_off(&[]),
            Err(ScoreError::InvalidOutcomeArguments(_))
        ));
        assert!(fly_out(0).is_err());
        assert!(line_out(10).is_err());
        assert!(error(0, Base::First).is_err());
        assert!(stolen_base(Base::First).is_err());
        assert!(stolen_base(Base::Home).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(hit(Base::Home).to_string(), "HR");
        assert_eq!(hit(Base::Third).to_string(), "3B");
        assert_eq!(fly_out(8).unwrap().to_string(), "F8");
        assert_eq!(line_out(7).unwrap().to_string(), "L7");
        assert_eq!(error(6, Base::First).unwrap().to_string(), "E6");
        assert_eq!(foul_error(5).unwrap().to_string(), "FLE5");
        assert_eq!(stolen_base(Base::Home).unwrap().to_string(), "SBH");
        assert_eq!(pick_off(&[1, 3]).unwrap().to_string(), "PO 1-3");
        assert_eq!(fielders_choice(None).to_string(), "FC");
        assert_eq!(
            pitcher_result(PitcherResultKind::IntentionalWalk).to_string(),
            "IBB"
        );
    }

    #[test]
    fn test_is_out() {
        assert!(putout(&[6, 3]).unwrap().is_out());
        assert!(pitcher_result(PitcherResultKind::Strikeout).is_out());
        assert!(!pitcher_result(PitcherResultKind::Walk).is_out());
        assert!(!fielders_choice(None).is_out());
        assert!(!hit(Base::First).is_out());
    }

    #[test]
    fn test_pitcher_abbreviations() {
        assert_eq!(
            PitcherResultKind::from_abbreviation("HB"),
            Some(PitcherResultKind::HitByPitch)
        );
        assert_eq!(PitcherResultKind::from_abbreviation("XX"), None);
    }
}
