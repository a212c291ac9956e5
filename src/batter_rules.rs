//! Handlers for batter-category rules: hits, walks, errors, fielder's
//! choices, strikeouts and outs.

use crate::action::Action;
use crate::base::{Base, Origin};
use crate::error::ScoreError;
use crate::movement::{digits_of, Bases, EventBaseResult, FieldingGroups};
use crate::result::{self, PitcherResultKind, Putout};
use regex::Captures;

/// How a batted ball was put in play, read from the modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutType {
    Ground,
    Line,
    Fly,
}

fn modifiers(component: &str) -> impl Iterator<Item = &str> {
    component.split('/').skip(1)
}

/// Whether `modifier` is the trajectory token `code`, alone or followed by
/// a hit location, a double/triple play marker or `L` for foul territory.
/// `FINT` and `PASS` start like trajectories but are not.
fn is_trajectory(modifier: &str, code: &str) -> bool {
    modifier.strip_prefix(code).is_some_and(|rest| {
        rest.is_empty()
            || rest.starts_with(|c: char| c.is_ascii_digit())
            || rest.starts_with("DP")
            || rest.starts_with("TP")
            || rest == "L"
    })
}

/// Classify the ball in play from the first modifier that names one.
pub(crate) fn out_type(component: &str) -> Option<OutType> {
    modifiers(component).find_map(|m| {
        let m = m.trim_end_matches('#');
        if ["G", "BG"].iter().any(|code| is_trajectory(m, code)) {
            Some(OutType::Ground)
        } else if ["L", "BL"].iter().any(|code| is_trajectory(m, code)) {
            Some(OutType::Line)
        } else if ["F", "P", "BP", "SF"].iter().any(|code| is_trajectory(m, code)) {
            Some(OutType::Fly)
        } else {
            None
        }
    })
}

pub(crate) fn is_sacrifice(component: &str) -> bool {
    modifiers(component).any(|m| m.starts_with("SF") || m.starts_with("SH"))
}

fn hit_base(code: &str) -> Option<Base> {
    match code {
        "S" => Some(Base::First),
        "D" | "DGR" => Some(Base::Second),
        "T" => Some(Base::Third),
        "HR" => Some(Base::Home),
        _ => None,
    }
}

fn first_group<'c>(caps: &'c Captures<'_>, groups: &[usize]) -> Option<&'c str> {
    groups
        .iter()
        .find_map(|&i| caps.get(i))
        .map(|m| m.as_str())
}

fn fielder(caps: &Captures<'_>, group: usize, component: &str) -> Result<u8, ScoreError> {
    caps.get(group)
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .ok_or_else(|| ScoreError::MissingDefensivePosition(component.to_string()))
}

/// Where the batter ended up according to the resolved movement, first
/// base if the movement does not mention the batter.
fn batter_resting_base(movements: &Bases) -> Base {
    movements
        .get(Origin::Batter)
        .map(|m| m.end_base)
        .unwrap_or(Base::First)
}

/// The batter retired by a ball in play. Fly and line outs credit a single
/// fielder; longer sequences are recorded as a putout.
fn batted_out(
    positions: &[u8],
    out_type: Option<OutType>,
    component: &str,
) -> Result<result::AtBatResult, ScoreError> {
    match (positions, out_type) {
        ([], _) => Err(ScoreError::MissingDefensivePosition(component.to_string())),
        ([position], Some(OutType::Fly)) => result::fly_out(*position),
        ([position], Some(OutType::Line)) => result::line_out(*position),
        (positions, _) => result::putout(positions),
    }
}

pub(crate) fn hit(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let base = first_group(caps, &[1, 2, 3, 4])
        .and_then(hit_base)
        .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(component.to_string()))?;
    Ok(Action::with_result(result::hit(base)).with_bases(Bases::batter_to(base)))
}

pub(crate) fn legacy_hit(
    component: &str,
    caps: &Captures<'_>,
    movements: &Bases,
) -> Result<Action, ScoreError> {
    hit(component, caps, movements)
}

pub(crate) fn hit_by_pitch(
    _component: &str,
    _caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    Ok(
        Action::with_result(result::pitcher_result(PitcherResultKind::HitByPitch))
            .with_bases(Bases::batter_to(Base::First)),
    )
}

/// `W`, `IW`, `I` and `W` followed by modifiers. The intentional marker can
/// land in any of the three alternatives.
pub(crate) fn walk(
    _component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let intentional = (1..=3).any(|i| caps.get(i).is_some_and(|m| m.as_str() == "I"));
    let kind = if intentional {
        PitcherResultKind::IntentionalWalk
    } else {
        PitcherResultKind::Walk
    };
    Ok(Action::with_result(result::pitcher_result(kind)).with_bases(Bases::batter_to(Base::First)))
}

pub(crate) fn error(
    component: &str,
    caps: &Captures<'_>,
    movements: &Bases,
) -> Result<Action, ScoreError> {
    let fielder = fielder(caps, 1, component)?;
    let base = batter_resting_base(movements);
    Ok(Action::with_result(result::error(fielder, base)?)
        .with_bases(Bases::batter_to(base))
        .sacrifice(is_sacrifice(component)))
}

pub(crate) fn fielders_choice(
    component: &str,
    caps: &Captures<'_>,
    movements: &Bases,
) -> Result<Action, ScoreError> {
    let positions = caps.get(1).map(|m| digits_of(m.as_str())).unwrap_or_default();
    let putout = if positions.is_empty() {
        None
    } else {
        Some(Putout::new(positions)?)
    };
    let action = Action::with_result(result::fielders_choice(putout))
        .sacrifice(is_sacrifice(component));

    if movements.get(Origin::Batter).is_some_and(|m| m.is_retired()) {
        return Ok(action.out());
    }
    Ok(action.with_bases(Bases::batter_to(batter_resting_base(movements))))
}

pub(crate) fn foul_error(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    Ok(Action::with_result(result::foul_error(fielder(caps, 1, component)?)?))
}

/// A strikeout retires the batter unless the resolved movement shows the
/// batter reaching safely (dropped third strike, wild pitch).
pub(crate) fn strikeout(
    _component: &str,
    _caps: &Captures<'_>,
    movements: &Bases,
) -> Result<Action, ScoreError> {
    let action = Action::with_result(result::pitcher_result(PitcherResultKind::Strikeout));
    match movements.get(Origin::Batter) {
        Some(batter) if !batter.is_retired() => Ok(action),
        _ => Ok(action.out()),
    }
}

/// A single fielding sequence retiring the batter: `63/G`, `8/F`, `9/SF`.
pub(crate) fn simple_out(
    component: &str,
    caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    let positions = digits_of(&caps[1]);
    let result = batted_out(&positions, out_type(component), component)?;
    Ok(Action::with_result(result)
        .out()
        .sacrifice(is_sacrifice(component)))
}

/// Multi-participant outs: double and triple plays, and force outs where
/// the batter reaches on a fielder's choice.
pub(crate) fn multi_out(
    component: &str,
    _caps: &Captures<'_>,
    movements: &Bases,
) -> Result<Action, ScoreError> {
    let batter_action = component.split('/').next().unwrap_or(component);
    let groups = FieldingGroups::parse(batter_action, component)?
        .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(component.to_string()))?;
    let mut bases = groups.runner_bases(component)?;

    let action = if groups.batter_retired() {
        let sequence = groups.sequence_for(Origin::Batter).unwrap_or_default();
        let out_type = if groups.batter_grouped() {
            out_type(component)
        } else {
            Some(OutType::Ground)
        };
        let result = batted_out(&sequence, out_type, component)?;
        bases.insert_unique(
            Origin::Batter,
            EventBaseResult::to(Base::First).out().at_bat_result(),
            component,
        )?;
        Action::with_result(result).out()
    } else {
        let lead = groups.lead_putout()?;
        bases.insert_unique(
            Origin::Batter,
            EventBaseResult::to(batter_resting_base(movements)).at_bat_result(),
            component,
        )?;
        Action::with_result(result::fielders_choice(lead))
    };

    Ok(action
        .with_bases(bases)
        .sacrifice(is_sacrifice(component)))
}

pub(crate) fn unknown(
    _component: &str,
    _caps: &Captures<'_>,
    _movements: &Bases,
) -> Result<Action, ScoreError> {
    Ok(Action::empty())
}
