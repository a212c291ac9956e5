//! Handlers for baserunner-category rules: steals, caught stealing,
//! pickoffs and the advance-only events (`WP`, `PB`, `BK`, ...).
//!
//! These never decide the plate-appearance outcome; they contribute
//! movement entries for the runners already on base.

use crate::action::Action;
use crate::base::Base;
use crate::error::ScoreError;
use crate::movement::{digits_of, Bases, EventBaseResult};
use crate::result::{self, AtBatResult};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FIELDING_ERROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"E(\d)").expect("fielding error regex"));

fn base_of(caps: &Captures<'_>, group: usize, component: &str) -> Result<Base, ScoreError> {
    caps.get(group)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Base::from_notation)
        .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(component.to_string()))
}

fn fielding_error(fielding: &str) -> Option<u8> {
    FIELDING_ERROR
        .captures(fielding)
        .and_then(|c| c[1].parse::<u8>().ok())
}

fn fielders(fielding: &str, component: &str) -> Result<Vec<u8>, ScoreError> {
    let positions = digits_of(fielding);
    if positions.is_empty() {
        return Err(ScoreError::MissingDefensivePosition(component.to_string()));
    }
    Ok(positions)
}

/// `CS2(24)`, `POCS3(1365)`. An error in the fielding group negates the
/// out and the runner is safe at the contested base.
pub(crate) fn caught_stealing(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let base = base_of(caps, 2, component)?;
    let origin = base.runner_origin();
    let fielding = &caps[3];

    let entry = match fielding_error(fielding) {
        Some(fielder) => EventBaseResult::to(base).with_result(result::error(fielder, base)?),
        None => {
            let positions = fielders(fielding, component)?;
            let out: AtBatResult = if caps.get(1).is_some() {
                result::pick_off(&positions)?
            } else {
                result::putout(&positions)?
            };
            EventBaseResult::to(base).with_result(out).out()
        }
    };
    Ok(Action::empty().with_bases(Bases::single(origin, entry)))
}

pub(crate) fn stolen_base(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let base = base_of(caps, 1, component)?;
    let entry = EventBaseResult::to(base).with_result(result::stolen_base(base)?);
    Ok(Action::empty().with_bases(Bases::single(base.runner_origin(), entry)))
}

/// `PO1(13)` retires the runner standing on first. `PO1(E3)` is a wild
/// pickoff throw: the runner takes the next base on the error.
pub(crate) fn pick_off(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let base = base_of(caps, 1, component)?;
    let origin = base
        .as_origin()
        .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(component.to_string()))?;
    let fielding = &caps[2];

    let entry = match fielding_error(fielding) {
        Some(fielder) => {
            let reached = origin.next_base();
            EventBaseResult::to(reached).with_result(result::error(fielder, reached)?)
        }
        None => {
            let mut entry = EventBaseResult::to(base).out();
            entry.on_base_putout = Some(result::pick_off(&fielders(fielding, component)?)?);
            entry
        }
    };
    Ok(Action::empty().with_bases(Bases::single(origin, entry)))
}

/// Wild pitches, passed balls, balks and the like record nothing by
/// themselves; the advance section carries the movement.
pub(crate) fn advance_only(
    _component: &str,
    _caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    Ok(Action::empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Origin;
    use crate::interpreter::PlayInterpreter;

    fn interpret(play: &str) -> Action {
        PlayInterpreter::new().interpret(play).unwrap()
    }

    #[test]
    fn test_stolen_bases() {
        let action = interpret("SBH");
        let runner = action.bases.get(Origin::Third).unwrap();
        assert_eq!(runner.end_base, Base::Home);
        assert_eq!(runner.result, Some(result::stolen_base(Base::Home).unwrap()));
        assert!(!runner.is_out);
    }

    #[test]
    fn test_caught_stealing() {
        let action = interpret("CS2(24)");
        assert_eq!(action.result, None);
        assert!(!action.is_out);
        let runner = action.bases.get(Origin::First).unwrap();
        assert!(runner.is_out);
        assert_eq!(runner.end_base, Base::Second);
        assert_eq!(runner.result, Some(result::putout(&[2, 4]).unwrap()));
    }

    #[test]
    fn test_caught_stealing_with_error() {
        let action = interpret("CS2(2E4).1-3");
        let runner = action.bases.get(Origin::First).unwrap();
        assert!(!runner.is_out);
        assert_eq!(runner.result, Some(result::error(4, Base::Second).unwrap()));
        assert_eq!(runner.final_base(), Base::Third);
    }

    #[test]
    fn test_pickoff_caught_stealing() {
        let action = interpret("POCS2(1361)");
        let runner = action.bases.get(Origin::First).unwrap();
        assert!(runner.is_out);
        assert_eq!(runner.result, Some(result::pick_off(&[1, 3, 6, 1]).unwrap()));
    }

    #[test]
    fn test_caught_stealing_during_strikeout() {
        let action = interpret("K+CS3(25)");
        assert!(action.is_out);
        assert_eq!(action.outs(), 2);
        assert!(action.bases.get(Origin::Second).unwrap().is_out);
    }

    #[test]
    fn test_pickoff() {
        let action = interpret("PO1(13)");
        let runner = action.bases.get(Origin::First).unwrap();
        assert!(runner.is_out);
        assert_eq!(runner.end_base, Base::First);
        assert_eq!(runner.result, None);
        assert_eq!(
            runner.on_base_putout,
            Some(result::pick_off(&[1, 3]).unwrap())
        );
    }

    #[test]
    fn test_pickoff_error() {
        let action = interpret("PO2(E6).2-3");
        let runner = action.bases.get(Origin::Second).unwrap();
        assert!(!runner.is_out);
        assert_eq!(runner.end_base, Base::Third);
        assert_eq!(runner.result, Some(result::error(6, Base::Third).unwrap()));
        assert!(runner.additional_bases.is_empty());
    }

    #[test]
    fn test_advance_only_events() {
        for play in ["WP.3-H", "PB.3-H", "BK.3-H", "OA.3-H"] {
            let action = interpret(play);
            assert_eq!(action.result, None);
            assert_eq!(action.bases.len(), 1);
            assert_eq!(action.bases.get(Origin::Third).unwrap().end_base, Base::Home);
        }
        assert!(interpret("NP").bases.is_empty());
    }

    #[test]
    fn test_defensive_indifference() {
        let action = interpret("DI.1-2");
        assert_eq!(action.bases.get(Origin::First).unwrap().end_base, Base::Second);
    }
}
