//! Gameplay state machine.
//!
//! Holds every plate appearance of a game, per team, per inning and per
//! lineup slot, plus the live cursor pointing at the plate appearance being
//! scored. Two kinds of input mutate it:
//!
//! - live scoring operations (`pitch_ball`, `record_hit`, ...) that act on
//!   the frame under the cursor
//! - [`Gameplay::apply_action`], which merges an interpreted play into the
//!   frame at an explicit target and moves the runners already on base
//!
//! Innings and slots grow on demand. A lineup slot that comes up again in
//! the same inning (batting around) gets a new frame nine positions further
//! on, so an inning's frame list can exceed [`LINEUP_SIZE`].

use crate::action::{Action, PitchCounts};
use crate::base::{Base, Origin};
use crate::error::ScoreError;
use crate::movement::EventBaseResult;
use crate::result::{self, AtBatResult, PitcherResultKind, Putout};
use serde::{Deserialize, Serialize};

/// Batters in a lineup. The cursor's slot wraps at this value and frames
/// for a repeated slot are stored this far apart.
pub const LINEUP_SIZE: usize = 9;

const MAX_BALLS: u8 = 4;
const MAX_STRIKES: u8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    #[default]
    Visiting,
    Home,
}

impl Team {
    /// The team batting in the other half of the inning.
    pub fn opponent(self) -> Team {
        match self {
            Team::Visiting => Team::Home,
            Team::Home => Team::Visiting,
        }
    }
}

/// Which plate appearance is being scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    pub team: Team,
    pub inning: usize,
    pub lineup_spot: usize,
}

impl Cursor {
    pub fn new(team: Team, inning: usize, lineup_spot: usize) -> Self {
        Self {
            team,
            inning,
            lineup_spot,
        }
    }
}

/// A partial cursor; unset fields keep their current value.
///
/// ```rust
/// use retroscore::{CursorUpdate, Team};
///
/// let update = CursorUpdate::new().team(Team::Home).inning(3);
/// assert_eq!(update.lineup_spot, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorUpdate {
    pub team: Option<Team>,
    pub inning: Option<usize>,
    pub lineup_spot: Option<usize>,
}

impl CursorUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    pub fn inning(mut self, inning: usize) -> Self {
        self.inning = Some(inning);
        self
    }

    pub fn lineup_spot(mut self, lineup_spot: usize) -> Self {
        self.lineup_spot = Some(lineup_spot);
        self
    }

    fn apply_to(self, cursor: Cursor) -> Cursor {
        Cursor {
            team: self.team.unwrap_or(cursor.team),
            inning: self.inning.unwrap_or(cursor.inning),
            lineup_spot: self.lineup_spot.unwrap_or(cursor.lineup_spot),
        }
    }
}

impl From<Cursor> for CursorUpdate {
    fn from(cursor: Cursor) -> Self {
        Self {
            team: Some(cursor.team),
            inning: Some(cursor.inning),
            lineup_spot: Some(cursor.lineup_spot),
        }
    }
}

/// One base of a frame's path around the diamond. Index `i` of
/// [`AtBat::bases`] is base `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResult {
    /// The runner reached this base. `false` marks where they were retired.
    pub advanced: bool,
    /// The event that produced the advance (or the out).
    pub result: Option<AtBatResult>,
    /// The advance is the plate appearance's own result.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_at_bat_result: bool,
}

impl BaseResult {
    /// A plain advance with no special event.
    pub fn advanced() -> Self {
        Self {
            advanced: true,
            result: None,
            is_at_bat_result: false,
        }
    }

    pub fn retired(result: Option<AtBatResult>) -> Self {
        Self {
            advanced: false,
            result,
            is_at_bat_result: false,
        }
    }
}

/// A single plate appearance (a frame on the scorecard).
///
/// # Examples
///
/// ```rust
/// use retroscore::AtBat;
///
/// let frame = AtBat::new();
/// assert_eq!(frame.balls, 0);
/// assert!(!frame.is_complete());
/// assert_eq!(frame.occupied_base(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtBat {
    pub balls: u8,
    pub strikes: u8,
    pub pitch_count: u32,
    pub is_out: bool,
    pub is_sacrifice: bool,
    pub result: Option<AtBatResult>,
    pub bases: Vec<BaseResult>,
}

impl AtBat {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plate appearance has an outcome.
    pub fn is_complete(&self) -> bool {
        self.result.is_some() || self.is_out
    }

    /// Four balls or three strikes; further ball and strike events are
    /// ignored.
    pub fn has_terminal_count(&self) -> bool {
        self.balls >= MAX_BALLS || self.strikes >= MAX_STRIKES
    }

    /// The base this frame's runner currently stands on. `None` if they
    /// never reached, were retired, or scored.
    pub fn occupied_base(&self) -> Option<Base> {
        if self.is_out {
            return None;
        }
        let last = self.bases.last()?;
        if !last.advanced {
            return None;
        }
        match Base::from_number(u8::try_from(self.bases.len()).ok()?)? {
            Base::Home => None,
            base => Some(base),
        }
    }

    /// Move the runner to `base`. Entries for earlier bases are kept (or
    /// filled in as plain advances); the entry at `base` is replaced and
    /// anything past it dropped.
    pub fn advance_to(&mut self, base: Base, result: Option<AtBatResult>, is_at_bat_result: bool) {
        let reached = usize::from(base.number());
        self.bases.truncate(reached);
        self.bases.resize_with(reached, BaseResult::advanced);
        self.bases[reached - 1] = BaseResult {
            advanced: true,
            result,
            is_at_bat_result,
        };
    }

    /// Retire the runner trying for `base`.
    pub fn retire_at(&mut self, base: Base, result: Option<AtBatResult>) {
        let attempted = usize::from(base.number());
        self.bases.truncate(attempted);
        self.bases.resize_with(attempted, BaseResult::advanced);
        self.bases[attempted - 1] = BaseResult::retired(result);
        self.is_out = true;
    }

    /// The base past the furthest one recorded, capped at home.
    fn next_base(&self) -> Base {
        u8::try_from(self.bases.len() + 1)
            .ok()
            .and_then(Base::from_number)
            .unwrap_or(Base::Home)
    }

    /// Follow one runner's movement from an interpreted play.
    fn follow(&mut self, entry: &EventBaseResult) {
        if entry.is_out {
            // A pickoff names the base the runner stood on; the out is
            // drawn on the path toward the next one.
            let attempted = entry.end_base.max(self.next_base());
            let result = entry.result.clone().or_else(|| entry.on_base_putout.clone());
            self.retire_at(attempted, result);
        } else {
            self.advance_to(entry.end_base, entry.result.clone(), entry.is_at_bat_result);
        }

        for extra in &entry.additional_bases {
            if self.is_out {
                break;
            }
            if extra.is_out {
                let attempted = extra.base.max(self.next_base());
                self.retire_at(attempted, extra.result.clone());
            } else {
                self.advance_to(extra.base, extra.result.clone(), false);
            }
        }
    }

    fn apply_pitches(&mut self, pitches: &PitchCounts) {
        self.balls = pitches.balls.min(MAX_BALLS);
        self.strikes = pitches.strikes.min(MAX_STRIKES);
        self.pitch_count = pitches.pitch_count;
    }

    /// Record a batted-ball outcome: one more pitch, the result, and the
    /// out flag (never cleared once set).
    fn record_outcome(&mut self, result: AtBatResult, is_out: bool) {
        self.pitch_count += 1;
        self.result = Some(result);
        self.is_out |= is_out;
    }
}

fn check_advance(result: Option<&AtBatResult>) -> Result<(), ScoreError> {
    match result.filter(|r| r.is_out()) {
        Some(r) => Err(ScoreError::InvalidOutcomeArguments(format!(
            "{} is an out, not an advance",
            r
        ))),
        None => Ok(()),
    }
}

fn check_out(result: &AtBatResult) -> Result<(), ScoreError> {
    if result.is_out() {
        Ok(())
    } else {
        Err(ScoreError::InvalidOutcomeArguments(format!(
            "{} does not retire a runner",
            result
        )))
    }
}

/// An inning's frames for one team, indexed by lineup slot plus nine per
/// time through the order. `None` marks a slot with no frame yet.
pub type Inning = Vec<Option<AtBat>>;

/// The play-by-play state of one game.
///
/// # Examples
///
/// ```rust
/// use retroscore::{Gameplay, ScoreError};
/// use retroscore::result::{self, PitcherResultKind};
///
/// let mut gameplay = Gameplay::new();
/// assert_eq!(gameplay.pitch_ball(), Err(ScoreError::NoCurrentAtBat));
///
/// gameplay.start_game();
/// for _ in 0..3 {
///     gameplay.pitch_strike().unwrap();
/// }
/// let frame = gameplay.current_frame().unwrap();
/// assert!(frame.is_out);
/// assert_eq!(frame.result, Some(result::pitcher_result(PitcherResultKind::Strikeout)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gameplay {
    visiting: Vec<Inning>,
    home: Vec<Inning>,
    cursor: Option<Cursor>,
    /// Frame index the cursor resolved to when it last moved.
    frame_index: usize,
}

impl Gameplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    /// Merge `update` into the cursor. Fields left unset default to the
    /// visiting team, inning 0 and slot 0 on the first call. An update that
    /// leaves the cursor where it was keeps the current frame.
    pub fn set_cursor(&mut self, update: CursorUpdate) {
        let cursor = update.apply_to(self.cursor.unwrap_or_default());
        if self.cursor == Some(cursor) {
            return;
        }
        self.frame_index = self.resolve_frame(cursor.team, cursor.inning, cursor.lineup_spot);
        self.cursor = Some(cursor);
    }

    /// Point the cursor at the first batter of the game.
    pub fn start_game(&mut self) {
        self.set_cursor(Cursor::default().into());
    }

    /// Move to the next batter. The slot wraps at [`LINEUP_SIZE`]; a slot
    /// that already batted this inning opens a new frame.
    pub fn next_lineup_spot(&mut self) -> Result<(), ScoreError> {
        let cursor = self.cursor.ok_or(ScoreError::NoCurrentAtBat)?;
        let spot = (cursor.lineup_spot + 1) % LINEUP_SIZE;
        self.set_cursor(CursorUpdate::new().lineup_spot(spot));
        Ok(())
    }

    /// Move to the next inning, keeping team and lineup slot.
    pub fn next_inning(&mut self) -> Result<(), ScoreError> {
        let cursor = self.cursor.ok_or(ScoreError::NoCurrentAtBat)?;
        self.set_cursor(CursorUpdate::new().inning(cursor.inning + 1));
        Ok(())
    }

    pub fn innings(&self, team: Team) -> &[Inning] {
        match team {
            Team::Visiting => &self.visiting,
            Team::Home => &self.home,
        }
    }

    /// The frames of one inning; empty if the inning was never reached.
    pub fn inning(&self, team: Team, inning: usize) -> &[Option<AtBat>] {
        self.innings(team)
            .get(inning)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn frame(&self, team: Team, inning: usize, index: usize) -> Option<&AtBat> {
        self.inning(team, inning).get(index)?.as_ref()
    }

    /// Index within the inning of the frame under the cursor.
    pub fn current_frame_index(&self) -> Option<usize> {
        self.cursor.map(|_| self.frame_index)
    }

    /// The frame under the cursor, if it has been created.
    pub fn current_frame(&self) -> Option<&AtBat> {
        let cursor = self.cursor?;
        self.frame(cursor.team, cursor.inning, self.frame_index)
    }

    fn innings_mut(&mut self, team: Team) -> &mut Vec<Inning> {
        match team {
            Team::Visiting => &mut self.visiting,
            Team::Home => &mut self.home,
        }
    }

    /// Frame index for a lineup slot: the latest frame at `slot + 9k`, or
    /// the next `+9` position if that frame is already complete.
    fn resolve_frame(&self, team: Team, inning: usize, slot: usize) -> usize {
        let latest = self
            .inning(team, inning)
            .iter()
            .enumerate()
            .skip(slot)
            .step_by(LINEUP_SIZE)
            .filter_map(|(index, frame)| frame.as_ref().map(|f| (index, f)))
            .last();
        match latest {
            Some((index, frame)) if frame.is_complete() => index + LINEUP_SIZE,
            Some((index, _)) => index,
            None => slot,
        }
    }

    /// The frame at the given position, created empty (growing the inning
    /// and slot lists as needed) if it does not exist.
    fn frame_entry(&mut self, team: Team, inning: usize, index: usize) -> &mut AtBat {
        let innings = self.innings_mut(team);
        if innings.len() <= inning {
            innings.resize_with(inning + 1, Vec::new);
        }
        let frames = &mut innings[inning];
        if frames.len() <= index {
            frames.resize_with(index + 1, || None);
        }
        frames[index].get_or_insert_with(|| {
            log::debug!("opening frame {:?} inning {} index {}", team, inning, index);
            AtBat::new()
        })
    }

    fn current(&mut self) -> Result<&mut AtBat, ScoreError> {
        let cursor = self.cursor.ok_or(ScoreError::NoCurrentAtBat)?;
        let index = self.frame_index;
        Ok(self.frame_entry(cursor.team, cursor.inning, index))
    }

    /// The latest frame in the half-inning whose runner stands on `base`.
    fn occupant(&self, team: Team, inning: usize, base: Base) -> Option<usize> {
        self.inning(team, inning)
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, frame)| {
                frame
                    .as_ref()
                    .filter(|f| f.occupied_base() == Some(base))
                    .map(|_| index)
            })
    }

    /// A ball. The fourth walks the batter to first.
    pub fn pitch_ball(&mut self) -> Result<(), ScoreError> {
        let frame = self.current()?;
        if frame.has_terminal_count() {
            return Ok(());
        }
        frame.balls += 1;
        frame.pitch_count += 1;
        if frame.balls == MAX_BALLS {
            frame.result = Some(result::pitcher_result(PitcherResultKind::Walk));
            frame.bases = vec![BaseResult::advanced()];
        }
        Ok(())
    }

    /// A strike. The third strikes the batter out.
    pub fn pitch_strike(&mut self) -> Result<(), ScoreError> {
        let frame = self.current()?;
        if frame.has_terminal_count() {
            return Ok(());
        }
        frame.strikes += 1;
        frame.pitch_count += 1;
        if frame.strikes == MAX_STRIKES {
            frame.result = Some(result::pitcher_result(PitcherResultKind::Strikeout));
            frame.is_out = true;
        }
        Ok(())
    }

    /// A foul ball counts as a strike only with fewer than two strikes.
    pub fn foul_ball(&mut self) -> Result<(), ScoreError> {
        let frame = self.current()?;
        frame.pitch_count += 1;
        if frame.strikes < 2 {
            frame.strikes += 1;
        }
        Ok(())
    }

    pub fn record_hit(&mut self, base: Base) -> Result<(), ScoreError> {
        let frame = self.current()?;
        frame.record_outcome(result::hit(base), false);
        frame.advance_to(base, None, false);
        Ok(())
    }

    pub fn record_fly_out(&mut self, position: u8) -> Result<(), ScoreError> {
        let result = result::fly_out(position)?;
        self.current()?.record_outcome(result, true);
        Ok(())
    }

    pub fn record_line_out(&mut self, position: u8) -> Result<(), ScoreError> {
        let result = result::line_out(position)?;
        self.current()?.record_outcome(result, true);
        Ok(())
    }

    pub fn record_putout(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        let result = result::putout(positions)?;
        self.current()?.record_outcome(result, true);
        Ok(())
    }

    pub fn record_sacrifice_fly(&mut self, position: u8) -> Result<(), ScoreError> {
        let result = result::fly_out(position)?;
        let frame = self.current()?;
        frame.record_outcome(result, true);
        frame.is_sacrifice = true;
        Ok(())
    }

    pub fn record_sacrifice_bunt(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        let result = result::putout(positions)?;
        let frame = self.current()?;
        frame.record_outcome(result, true);
        frame.is_sacrifice = true;
        Ok(())
    }

    /// The batter reaches `base` on an error by `fielder`.
    pub fn record_defensive_error(&mut self, fielder: u8, base: Base) -> Result<(), ScoreError> {
        let result = result::error(fielder, base)?;
        let frame = self.current()?;
        frame.record_outcome(result, false);
        frame.advance_to(base, None, false);
        Ok(())
    }

    /// A fielder's choice on the play made by `positions`. Where the batter
    /// ended up is recorded separately with [`Gameplay::advance_runner`].
    pub fn record_fielders_choice(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        let putout = Putout::new(positions.to_vec())?;
        self.current()?
            .record_outcome(result::fielders_choice(Some(putout)), false);
        Ok(())
    }

    /// Move the current frame's runner to `base`.
    ///
    /// # Errors
    ///
    /// `InvalidOutcomeArguments` if `result` is an out; use
    /// [`Gameplay::record_basepath_out`] for those.
    pub fn advance_runner(
        &mut self,
        base: Base,
        result: Option<AtBatResult>,
    ) -> Result<(), ScoreError> {
        check_advance(result.as_ref())?;
        self.current()?.advance_to(base, result, false);
        Ok(())
    }

    /// Retire the current frame's runner trying for `base_attempted`.
    pub fn record_basepath_out(
        &mut self,
        base_attempted: Base,
        result: AtBatResult,
    ) -> Result<(), ScoreError> {
        check_out(&result)?;
        self.current()?.retire_at(base_attempted, Some(result));
        Ok(())
    }

    /// The frame, in the cursor's half-inning, of the runner on `base`.
    fn runner_frame(&self, base: Base) -> Result<(Cursor, usize), ScoreError> {
        let cursor = self.cursor.ok_or(ScoreError::NoCurrentAtBat)?;
        let index = self
            .occupant(cursor.team, cursor.inning, base)
            .ok_or(ScoreError::NoRunnerOnBase(base))?;
        Ok((cursor, index))
    }

    /// Move the runner standing on `from` to `to`. The advance is recorded
    /// on the frame of the batter who became that runner, not on the frame
    /// under the cursor.
    ///
    /// ```rust
    /// use retroscore::{Base, Gameplay, Team};
    ///
    /// let mut gameplay = Gameplay::new();
    /// gameplay.start_game();
    /// gameplay.record_hit(Base::First).unwrap();
    /// gameplay.next_lineup_spot().unwrap();
    /// gameplay.advance_runner_from(Base::First, Base::Second, None).unwrap();
    ///
    /// let leadoff = gameplay.frame(Team::Visiting, 0, 0).unwrap();
    /// assert_eq!(leadoff.occupied_base(), Some(Base::Second));
    /// ```
    ///
    /// # Errors
    ///
    /// * `InvalidOutcomeArguments` - `result` is an out, or `to` is not
    ///   past `from`
    /// * `NoRunnerOnBase` - nobody stands on `from`
    pub fn advance_runner_from(
        &mut self,
        from: Base,
        to: Base,
        result: Option<AtBatResult>,
    ) -> Result<(), ScoreError> {
        check_advance(result.as_ref())?;
        if to <= from {
            return Err(ScoreError::InvalidOutcomeArguments(format!(
                "a runner on {} cannot advance to {}",
                from, to
            )));
        }
        let (cursor, index) = self.runner_frame(from)?;
        self.frame_entry(cursor.team, cursor.inning, index)
            .advance_to(to, result, false);
        Ok(())
    }

    /// Retire the runner standing on `from`, trying for `base_attempted`.
    /// A pickoff names the runner's own base; the out is then drawn on the
    /// path to the next one.
    ///
    /// # Errors
    ///
    /// * `InvalidOutcomeArguments` - `result` does not retire a runner
    /// * `NoRunnerOnBase` - nobody stands on `from`
    pub fn record_runner_out(
        &mut self,
        from: Base,
        base_attempted: Base,
        result: AtBatResult,
    ) -> Result<(), ScoreError> {
        check_out(&result)?;
        let (cursor, index) = self.runner_frame(from)?;
        let frame = self.frame_entry(cursor.team, cursor.inning, index);
        let attempted = base_attempted.max(frame.next_base());
        frame.retire_at(attempted, Some(result));
        Ok(())
    }

    /// Merge an interpreted play into the frame at `target`, and move the
    /// runners on base on the frames they belong to.
    ///
    /// The target slot resolves like a cursor move: an already complete
    /// frame for that slot sends the play to a new frame nine positions
    /// later. `pitches`, when given, replace the frame's counters. Returns
    /// the index of the frame the play was recorded on.
    ///
    /// Runner origins no frame occupies are logged and skipped.
    pub fn apply_action(
        &mut self,
        action: &Action,
        pitches: Option<&PitchCounts>,
        target: Cursor,
    ) -> usize {
        let Cursor {
            team,
            inning,
            lineup_spot,
        } = target;
        let index = self.resolve_frame(team, inning, lineup_spot);

        // Locate every runner before anyone moves.
        let runners: Vec<(usize, &EventBaseResult)> = [Origin::Third, Origin::Second, Origin::First]
            .into_iter()
            .filter_map(|origin| {
                let entry = action.bases.get(origin)?;
                let base = origin.as_base()?;
                let occupant = self.occupant(team, inning, base);
                if occupant.is_none() {
                    log::warn!(
                        "no runner on {} for {:?} inning {}; movement skipped",
                        base,
                        team,
                        inning
                    );
                }
                occupant.map(|frame| (frame, entry))
            })
            .collect();

        let frame = self.frame_entry(team, inning, index);
        if let Some(pitches) = pitches {
            frame.apply_pitches(pitches);
        }
        if let Some(result) = &action.result {
            frame.result = Some(result.clone());
        }
        frame.is_out |= action.is_out;
        frame.is_sacrifice |= action.is_sacrifice;
        if let Some(batter) = action.bases.get(Origin::Batter) {
            if batter.is_out && batter.is_at_bat_result {
                frame.is_out = true;
            } else {
                frame.follow(batter);
            }
        }

        for (runner, entry) in runners {
            self.frame_entry(team, inning, runner).follow(entry);
        }
        index
    }
}
