//! Error types for play interpretation and gameplay tracking.
//!
//! All errors that can occur while interpreting play notation, building
//! result descriptors, or mutating the game state are represented by the
//! `ScoreError` enum.

use crate::base::{Base, Origin};
use thiserror::Error;

/// Format a fielding sequence the way a scorecard shows it (`6-4-3`).
pub(crate) fn format_positions(positions: &[u8]) -> String {
    if positions.is_empty() {
        return String::from("(no fielders)");
    }
    positions
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Errors raised by the interpreter, the result generators and the
/// gameplay state machine.
///
/// Errors are raised synchronously at the offending call and never leave
/// partially applied state behind.
///
/// # Examples
///
/// ```rust
/// use retroscore::ScoreError;
///
/// let err = ScoreError::UnrecognizedPlayNotation("ZZ9".to_string());
/// assert_eq!(err.to_string(), "Unrecognized play notation: ZZ9");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    /// No grammar entry matched the play string.
    #[error("Unrecognized play notation: {0}")]
    UnrecognizedPlayNotation(String),

    /// An out was recorded without the fielder(s) that made it.
    #[error("Missing defensive position in play: {0}")]
    MissingDefensivePosition(String),

    /// Two fragments of one play claim the same runner.
    #[error("Ambiguous movement for origin {origin} in play: {play}")]
    AmbiguousBaseOrigin { origin: Origin, play: String },

    /// A result descriptor was constructed with arguments of the wrong shape.
    #[error("Invalid outcome arguments: {0}")]
    InvalidOutcomeArguments(String),

    /// A gameplay operation was invoked before the cursor was set.
    #[error("No current at bat: start the game or set the cursor first")]
    NoCurrentAtBat,

    /// A runner operation named a base no runner stands on in the current
    /// half-inning.
    #[error("No runner on base {0}")]
    NoRunnerOnBase(Base),

    /// An event-file record could not be read.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScoreError::MissingDefensivePosition("0/F".to_string());
        assert!(err.to_string().contains("0/F"));
    }

    #[test]
    fn test_ambiguous_origin_display() {
        let err = ScoreError::AmbiguousBaseOrigin {
            origin: Origin::First,
            play: "SB2;SB2".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("origin 1"));
        assert!(display.contains("SB2;SB2"));
    }

    #[test]
    fn test_no_runner_display() {
        let err = ScoreError::NoRunnerOnBase(Base::Second);
        assert!(err.to_string().starts_with("No runner on base"));
    }

    #[test]
    fn test_format_positions() {
        assert_eq!(format_positions(&[6, 4, 3]), "6-4-3");
        assert_eq!(format_positions(&[8]), "8");
        assert_eq!(format_positions(&[]), "(no fielders)");
    }
}
