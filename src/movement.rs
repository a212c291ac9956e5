//! Baserunner movement resolution.
//!
//! A play moves up to four runners: the batter and whoever stood on first,
//! second and third. This module holds the per-runner outcome type
//! (`EventBaseResult`), the origin-keyed map of those outcomes (`Bases`),
//! and the resolvers that build that map from play text:
//!
//! - the explicit advance section (`.1-3;2XH(92);B-2(E7)`)
//! - parenthesised fielding groups (`64(1)3/GDP`), where the fielders for
//!   each retired runner are reconstructed from the relay recorded across
//!   the higher bases
//!
//! Movements from different fragments of one play are merged with
//! [`Bases::merge`], which chains further advances into `additional_bases`
//! and rejects contradictions.

use crate::base::{Base, Origin};
use crate::error::ScoreError;
use crate::result::{self, AtBatResult, Putout};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ADVANCE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([B123])([-X])([123H])(.*)$").expect("advance item regex"));
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*)\)").expect("annotation regex"));
static ERROR_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d*E(\d)").expect("error annotation regex"));
static FIELDING_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\(([B123])\)").expect("fielding group regex"));

/// A further base reached (or attempted) later in the same play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalBase {
    pub base: Base,
    pub result: Option<AtBatResult>,
    pub is_out: bool,
}

/// One runner's fate in a single play.
///
/// # Examples
///
/// ```rust
/// use retroscore::{Base, EventBaseResult};
/// use retroscore::result;
///
/// let steal = EventBaseResult::to(Base::Second)
///     .with_result(result::stolen_base(Base::Second).unwrap());
/// assert!(!steal.is_out);
/// assert_eq!(steal.final_base(), Base::Second);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBaseResult {
    /// Where the runner ended up (or was retired).
    pub end_base: Base,
    /// What caused the movement, when it is not the play's own result.
    pub result: Option<AtBatResult>,
    /// The runner was retired at `end_base`.
    pub is_out: bool,
    /// This is the batter's movement and *is* the play's recorded result.
    pub is_at_bat_result: bool,
    /// A pickoff retiring the runner on the base they occupied.
    pub on_base_putout: Option<AtBatResult>,
    /// Further advances recorded in the same play.
    pub additional_bases: Vec<AdditionalBase>,
}

impl EventBaseResult {
    /// A safe advance to `end_base` with no attached result.
    pub fn to(end_base: Base) -> Self {
        Self {
            end_base,
            result: None,
            is_out: false,
            is_at_bat_result: false,
            on_base_putout: None,
            additional_bases: Vec::new(),
        }
    }

    pub fn with_result(mut self, result: AtBatResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn out(mut self) -> Self {
        self.is_out = true;
        self
    }

    pub fn at_bat_result(mut self) -> Self {
        self.is_at_bat_result = true;
        self
    }

    /// The last base named for this runner, following any chained advances.
    pub fn final_base(&self) -> Base {
        self.additional_bases
            .last()
            .map(|a| a.base)
            .unwrap_or(self.end_base)
    }

    /// Whether the runner was retired anywhere along the way.
    pub fn is_retired(&self) -> bool {
        self.is_out || self.additional_bases.iter().any(|a| a.is_out)
    }

    fn absorbs(&self, other: &EventBaseResult) -> bool {
        self.end_base == other.end_base
            && self.is_out == other.is_out
            && self.additional_bases.is_empty()
            && other.additional_bases.is_empty()
    }
}

/// Per-origin runner outcomes for one play. An absent origin means no
/// runner was there, or the runner did not move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bases {
    slots: [Option<EventBaseResult>; 4],
}

fn slot_index(origin: Origin) -> usize {
    match origin {
        Origin::Batter => 0,
        Origin::First => 1,
        Origin::Second => 2,
        Origin::Third => 3,
    }
}

impl Bases {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding a single runner's outcome.
    pub fn single(origin: Origin, entry: EventBaseResult) -> Self {
        let mut bases = Self::new();
        bases.slots[slot_index(origin)] = Some(entry);
        bases
    }

    /// The batter reaching `end_base` as the play's own result.
    ///
    /// ```rust
    /// use retroscore::{Base, Bases, Origin};
    ///
    /// let bases = Bases::batter_to(Base::First);
    /// assert_eq!(bases.get(Origin::Batter).unwrap().end_base, Base::First);
    /// assert_eq!(bases.len(), 1);
    /// ```
    pub fn batter_to(end_base: Base) -> Self {
        Self::single(Origin::Batter, EventBaseResult::to(end_base).at_bat_result())
    }

    pub fn get(&self, origin: Origin) -> Option<&EventBaseResult> {
        self.slots[slot_index(origin)].as_ref()
    }

    pub fn get_mut(&mut self, origin: Origin) -> Option<&mut EventBaseResult> {
        self.slots[slot_index(origin)].as_mut()
    }

    pub fn remove(&mut self, origin: Origin) -> Option<EventBaseResult> {
        self.slots[slot_index(origin)].take()
    }

    /// Populated origins in order, batter first.
    pub fn iter(&self) -> impl Iterator<Item = (Origin, &EventBaseResult)> {
        Origin::ALL
            .iter()
            .filter_map(move |&origin| self.get(origin).map(|entry| (origin, entry)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of runners retired in this play.
    pub fn outs(&self) -> usize {
        self.iter().filter(|(_, e)| e.is_retired()).count()
    }

    /// Insert an outcome for an origin no other fragment of the same source
    /// has claimed.
    pub fn insert_unique(
        &mut self,
        origin: Origin,
        entry: EventBaseResult,
        play: &str,
    ) -> Result<(), ScoreError> {
        let slot = &mut self.slots[slot_index(origin)];
        if slot.is_some() {
            return Err(ScoreError::AmbiguousBaseOrigin {
                origin,
                play: play.to_string(),
            });
        }
        *slot = Some(entry);
        Ok(())
    }

    /// Merge a later fragment's outcome for `origin` into this map.
    ///
    /// Identical destinations combine; a further destination for a runner
    /// still safe chains into `additional_bases`; anything else contradicts
    /// the earlier fragment.
    pub fn merge(
        &mut self,
        origin: Origin,
        incoming: EventBaseResult,
        play: &str,
    ) -> Result<(), ScoreError> {
        let slot = &mut self.slots[slot_index(origin)];
        let Some(existing) = slot.as_mut() else {
            *slot = Some(incoming);
            return Ok(());
        };

        if existing.absorbs(&incoming) {
            if !existing.is_at_bat_result {
                existing.result = existing.result.take().or(incoming.result);
            }
            existing.is_at_bat_result |= incoming.is_at_bat_result;
            existing.on_base_putout = existing.on_base_putout.take().or(incoming.on_base_putout);
            return Ok(());
        }

        if !existing.is_retired() && incoming.end_base > existing.final_base() {
            existing.additional_bases.push(AdditionalBase {
                base: incoming.end_base,
                result: incoming.result,
                is_out: incoming.is_out,
            });
            existing.additional_bases.extend(incoming.additional_bases);
            return Ok(());
        }

        Err(ScoreError::AmbiguousBaseOrigin {
            origin,
            play: play.to_string(),
        })
    }

    /// Merge every outcome of `later` into this map.
    pub fn merge_all(&mut self, later: Bases, play: &str) -> Result<(), ScoreError> {
        for (origin, slot) in Origin::ALL.into_iter().zip(later.slots) {
            if let Some(entry) = slot {
                self.merge(origin, entry, play)?;
            }
        }
        Ok(())
    }
}

/// Digits of a fielding sequence; zeros are placeholders and dropped.
pub(crate) fn digits_of(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| c.to_digit(10))
        .filter(|&d| d != 0)
        .map(|d| d as u8)
        .collect()
}

/// Resolve the explicit advance section of a play (the text after the
/// first `.`, without the dot).
///
/// ```rust
/// use retroscore::movement::resolve_advances;
/// use retroscore::{Base, Origin};
///
/// let bases = resolve_advances("2-H;1X3(85)", "S8.2-H;1X3(85)").unwrap();
/// assert_eq!(bases.get(Origin::Second).unwrap().end_base, Base::Home);
/// assert!(bases.get(Origin::First).unwrap().is_out);
/// ```
pub fn resolve_advances(section: &str, play: &str) -> Result<Bases, ScoreError> {
    let mut bases = Bases::new();
    for item in section.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let item = item.trim_end_matches(['#', '!', '?']);
        let caps = ADVANCE_ITEM
            .captures(item)
            .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(play.to_string()))?;

        // The regex only admits valid notation characters in these groups.
        let origin = caps[1]
            .chars()
            .next()
            .and_then(Origin::from_notation)
            .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(play.to_string()))?;
        let end_base = caps[3]
            .chars()
            .next()
            .and_then(Base::from_notation)
            .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(play.to_string()))?;
        let thrown_out = &caps[2] == "X";

        let annotations: Vec<&str> = ANNOTATION
            .captures_iter(&caps[4])
            .filter_map(|a| a.get(1).map(|m| m.as_str()))
            .collect();
        let error_fielder = annotations.iter().find_map(|a| {
            ERROR_ANNOTATION
                .captures(a)
                .and_then(|c| c[1].parse::<u8>().ok())
        });

        let entry = match (thrown_out, error_fielder) {
            (_, Some(fielder)) => {
                EventBaseResult::to(end_base).with_result(result::error(fielder, end_base)?)
            }
            (false, None) => EventBaseResult::to(end_base),
            (true, None) => {
                let positions = annotations
                    .iter()
                    .find(|a| a.starts_with(|c: char| c.is_ascii_digit()))
                    .map(|a| {
                        let fielding: String =
                            a.chars().take_while(|c| c.is_ascii_digit()).collect();
                        digits_of(&fielding)
                    })
                    .unwrap_or_default();
                if positions.is_empty() {
                    return Err(ScoreError::MissingDefensivePosition(play.to_string()));
                }
                EventBaseResult::to(end_base)
                    .with_result(result::putout(&positions)?)
                    .out()
            }
        };
        bases.insert_unique(origin, entry, play)?;
    }
    Ok(bases)
}

/// Parenthesised fielding groups of a multi-participant out, such as
/// `64(1)3` or `8(B)84(2)`.
///
/// Each `digits(origin)` group names the fielders who handled the ball on
/// the play retiring the runner from `origin`. Digits after the last group
/// retire the batter at first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldingGroups {
    groups: [Option<Vec<u8>>; 4],
    trailing: Option<Vec<u8>>,
}

impl FieldingGroups {
    /// Parse the batter action (event text before the first `/`).
    ///
    /// Returns `Ok(None)` if the text holds no fielding group.
    pub fn parse(batter_action: &str, play: &str) -> Result<Option<Self>, ScoreError> {
        let mut groups: [Option<Vec<u8>>; 4] = Default::default();
        let mut last_end = None;

        for caps in FIELDING_GROUP.captures_iter(batter_action) {
            let origin = caps[2]
                .chars()
                .next()
                .and_then(Origin::from_notation)
                .ok_or_else(|| ScoreError::UnrecognizedPlayNotation(play.to_string()))?;
            let slot = &mut groups[slot_index(origin)];
            if slot.is_some() {
                return Err(ScoreError::AmbiguousBaseOrigin {
                    origin,
                    play: play.to_string(),
                });
            }
            *slot = Some(digits_of(&caps[1]));
            last_end = caps.get(0).map(|m| m.end());
        }

        let Some(last_end) = last_end else {
            return Ok(None);
        };

        let tail = &batter_action[last_end..];
        let trailing = if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) {
            Some(digits_of(tail))
        } else {
            None
        };

        if trailing.is_some() && groups[slot_index(Origin::Batter)].is_some() {
            return Err(ScoreError::AmbiguousBaseOrigin {
                origin: Origin::Batter,
                play: play.to_string(),
            });
        }

        Ok(Some(Self { groups, trailing }))
    }

    /// The digits recorded directly against `origin`.
    pub fn recorded(&self, origin: Origin) -> Option<&[u8]> {
        self.groups[slot_index(origin)].as_deref()
    }

    /// Whether the batter was retired by this play.
    pub fn batter_retired(&self) -> bool {
        self.trailing.is_some() || self.recorded(Origin::Batter).is_some()
    }

    /// Whether the batter was retired by an explicit `(B)` group.
    pub fn batter_grouped(&self) -> bool {
        self.recorded(Origin::Batter).is_some()
    }

    /// Concatenated relay from third base down to `lowest`.
    fn relay_from_third(&self, lowest: Origin) -> Vec<u8> {
        [Origin::Third, Origin::Second, Origin::First]
            .into_iter()
            .filter(|&o| o >= lowest)
            .filter_map(|o| self.recorded(o))
            .flatten()
            .copied()
            .collect()
    }

    /// The fielding sequence credited for retiring the runner from `origin`.
    ///
    /// For a base runner this is the concatenation of every group recorded
    /// for that base and the bases above it, third base first. For the
    /// batter thrown out at first it is the full relay plus the trailing
    /// digits; a batter retired by an explicit `(B)` group keeps that
    /// group's own digits.
    ///
    /// ```rust
    /// use retroscore::movement::FieldingGroups;
    /// use retroscore::Origin;
    ///
    /// let groups = FieldingGroups::parse("64(1)3", "64(1)3/GDP").unwrap().unwrap();
    /// assert_eq!(groups.sequence_for(Origin::First), Some(vec![6, 4]));
    /// assert_eq!(groups.sequence_for(Origin::Batter), Some(vec![6, 4, 3]));
    /// ```
    pub fn sequence_for(&self, origin: Origin) -> Option<Vec<u8>> {
        match origin {
            Origin::Batter => {
                if let Some(own) = self.recorded(Origin::Batter) {
                    return Some(own.to_vec());
                }
                self.trailing.as_ref().map(|tail| {
                    let mut relay = self.relay_from_third(Origin::First);
                    relay.extend_from_slice(tail);
                    relay
                })
            }
            runner => self
                .recorded(runner)
                .map(|_| self.relay_from_third(runner)),
        }
    }

    /// The putout on the lead runner: the lowest retired base runner's full
    /// relay.
    pub fn lead_putout(&self) -> Result<Option<Putout>, ScoreError> {
        [Origin::First, Origin::Second, Origin::Third]
            .into_iter()
            .find_map(|o| self.sequence_for(o))
            .map(Putout::new)
            .transpose()
    }

    /// Outcomes for the retired base runners. Each is put out at the base
    /// they were forced toward.
    pub fn runner_bases(&self, play: &str) -> Result<Bases, ScoreError> {
        let mut bases = Bases::new();
        for origin in [Origin::First, Origin::Second, Origin::Third] {
            if let Some(sequence) = self.sequence_for(origin) {
                if sequence.is_empty() {
                    return Err(ScoreError::MissingDefensivePosition(play.to_string()));
                }
                let entry = EventBaseResult::to(origin.next_base())
                    .with_result(result::putout(&sequence)?)
                    .out();
                bases.insert_unique(origin, entry, play)?;
            }
        }
        Ok(bases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(action: &str) -> FieldingGroups {
        FieldingGroups::parse(action, action).unwrap().unwrap()
    }

    #[test]
    fn test_merge_identical_destinations_combine() {
        let mut bases = Bases::single(
            Origin::First,
            EventBaseResult::to(Base::Second)
                .with_result(result::putout(&[2, 6]).unwrap())
                .out(),
        );
        let again = EventBaseResult::to(Base::Second).out();
        bases.merge(Origin::First, again, "CS2(26).1X2").unwrap();
        let entry = bases.get(Origin::First).unwrap();
        assert_eq!(entry.result, Some(result::putout(&[2, 6]).unwrap()));
        assert!(entry.additional_bases.is_empty());
    }

    #[test]
    fn test_merge_chains_further_advance() {
        let mut bases = Bases::batter_to(Base::First);
        bases
            .merge(
                Origin::Batter,
                EventBaseResult::to(Base::Second)
                    .with_result(result::error(7, Base::Second).unwrap()),
                "S7.B-2(E7)",
            )
            .unwrap();
        let batter = bases.get(Origin::Batter).unwrap();
        assert_eq!(batter.end_base, Base::First);
        assert_eq!(batter.final_base(), Base::Second);
        assert_eq!(
            batter.additional_bases[0].result,
            Some(result::error(7, Base::Second).unwrap())
        );
    }

    #[test]
    fn test_merge_rejects_backwards_movement() {
        let mut bases = Bases::single(Origin::Second, EventBaseResult::to(Base::Home));
        let err = bases
            .merge(Origin::Second, EventBaseResult::to(Base::Third), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            ScoreError::AmbiguousBaseOrigin {
                origin: Origin::Second,
                ..
            }
        ));
    }

    #[test]
    fn test_merge_rejects_advance_after_out() {
        let mut bases = Bases::single(Origin::First, EventBaseResult::to(Base::Second).out());
        assert!(bases
            .merge(Origin::First, EventBaseResult::to(Base::Third), "x")
            .is_err());
    }

    #[test]
    fn test_advances_safe_and_out() {
        let bases = resolve_advances("3-H(UR)(NR);2XH(92);B-2", "play").unwrap();
        assert_eq!(bases.len(), 3);

        let third = bases.get(Origin::Third).unwrap();
        assert_eq!(third.end_base, Base::Home);
        assert!(!third.is_out);
        assert_eq!(third.result, None);

        let second = bases.get(Origin::Second).unwrap();
        assert!(second.is_out);
        assert_eq!(second.result, Some(result::putout(&[9, 2]).unwrap()));

        assert_eq!(bases.get(Origin::Batter).unwrap().end_base, Base::Second);
    }

    #[test]
    fn test_advance_error_negates_out() {
        let bases = resolve_advances("1X3(6E5)", "play").unwrap();
        let first = bases.get(Origin::First).unwrap();
        assert!(!first.is_out);
        assert_eq!(first.result, Some(result::error(5, Base::Third).unwrap()));
    }

    #[test]
    fn test_advance_safe_on_throwing_error() {
        let bases = resolve_advances("1-3(E5/TH)", "play").unwrap();
        assert_eq!(
            bases.get(Origin::First).unwrap().result,
            Some(result::error(5, Base::Third).unwrap())
        );
    }

    #[test]
    fn test_advance_out_without_fielders() {
        assert_eq!(
            resolve_advances("1X3", "S8.1X3"),
            Err(ScoreError::MissingDefensivePosition("S8.1X3".to_string()))
        );
        assert!(matches!(
            resolve_advances("1X3(UR)", "p"),
            Err(ScoreError::MissingDefensivePosition(_))
        ));
    }

    #[test]
    fn test_advance_duplicate_origin() {
        assert!(matches!(
            resolve_advances("1-2;1-3", "p"),
            Err(ScoreError::AmbiguousBaseOrigin {
                origin: Origin::First,
                ..
            })
        ));
    }

    #[test]
    fn test_advance_garbage() {
        assert!(matches!(
            resolve_advances("4-5", "p"),
            Err(ScoreError::UnrecognizedPlayNotation(_))
        ));
    }

    #[test]
    fn test_groups_double_play_with_trailing_batter() {
        let g = groups("64(1)3");
        assert!(g.batter_retired());
        assert!(!g.batter_grouped());
        assert_eq!(g.sequence_for(Origin::First), Some(vec![6, 4]));
        assert_eq!(g.sequence_for(Origin::Batter), Some(vec![6, 4, 3]));
        assert_eq!(g.sequence_for(Origin::Second), None);
    }

    #[test]
    fn test_groups_force_out_batter_safe() {
        let g = groups("54(1)");
        assert!(!g.batter_retired());
        assert_eq!(g.sequence_for(Origin::First), Some(vec![5, 4]));
        assert_eq!(
            g.lead_putout().unwrap(),
            Some(Putout::new(vec![5, 4]).unwrap())
        );
    }

    #[test]
    fn test_groups_line_drive_double_play() {
        let g = groups("8(B)84(2)");
        assert!(g.batter_grouped());
        assert_eq!(g.sequence_for(Origin::Batter), Some(vec![8]));
        assert_eq!(g.sequence_for(Origin::Second), Some(vec![8, 4]));
    }

    #[test]
    fn test_groups_relay_concatenates_higher_bases() {
        // Triple play: runner from second forced at third (5), runner from
        // first at second (4), batter at first (3).
        let g = groups("5(2)4(1)3");
        assert_eq!(g.sequence_for(Origin::Second), Some(vec![5]));
        assert_eq!(g.sequence_for(Origin::First), Some(vec![5, 4]));
        assert_eq!(g.sequence_for(Origin::Batter), Some(vec![5, 4, 3]));
    }

    #[test]
    fn test_groups_three_bases_relay() {
        let g = groups("2(3)6(2)4(1)3");
        assert_eq!(g.sequence_for(Origin::Third), Some(vec![2]));
        assert_eq!(g.sequence_for(Origin::Second), Some(vec![2, 6]));
        assert_eq!(g.sequence_for(Origin::First), Some(vec![2, 6, 4]));
        assert_eq!(g.sequence_for(Origin::Batter), Some(vec![2, 6, 4, 3]));
    }

    #[test]
    fn test_groups_order_in_text_does_not_matter() {
        let a = groups("4(1)5(2)");
        let b = groups("5(2)4(1)");
        assert_eq!(a.sequence_for(Origin::First), b.sequence_for(Origin::First));
        assert_eq!(a.sequence_for(Origin::First), Some(vec![5, 4]));
    }

    #[test]
    fn test_groups_runner_bases() {
        let g = groups("64(1)3");
        let bases = g.runner_bases("64(1)3/GDP").unwrap();
        assert_eq!(bases.len(), 1);
        let first = bases.get(Origin::First).unwrap();
        assert_eq!(first.end_base, Base::Second);
        assert!(first.is_out);
        assert_eq!(first.result, Some(result::putout(&[6, 4]).unwrap()));
    }

    #[test]
    fn test_groups_absent() {
        assert_eq!(FieldingGroups::parse("63", "63/G").unwrap(), None);
    }

    #[test]
    fn test_groups_duplicate_origin() {
        assert!(matches!(
            FieldingGroups::parse("6(1)4(1)", "p"),
            Err(ScoreError::AmbiguousBaseOrigin {
                origin: Origin::First,
                ..
            })
        ));
    }

    #[test]
    fn test_groups_batter_claimed_twice() {
        assert!(matches!(
            FieldingGroups::parse("3(B)6(1)3", "p"),
            Err(ScoreError::AmbiguousBaseOrigin {
                origin: Origin::Batter,
                ..
            })
        ));
    }

    #[test]
    fn test_groups_placeholder_fielder() {
        let g = groups("0(1)");
        assert!(matches!(
            g.runner_bases("0(1)"),
            Err(ScoreError::MissingDefensivePosition(_))
        ));
    }
}
