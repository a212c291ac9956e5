//! Scorekeeper facade.
//!
//! Owns one game's state (gameplay, lineups and metadata) together with a
//! play interpreter, and exposes every live scoring operation plus the
//! interpret-and-apply entry point used when replaying play codes.

use crate::action::{Action, PitchCounts};
use crate::base::Base;
use crate::error::ScoreError;
use crate::game_info::GameInfo;
use crate::gameplay::{Cursor, CursorUpdate, Gameplay, Team};
use crate::interpreter::PlayInterpreter;
use crate::lineup::{LineupEntry, Lineups, Player};
use crate::result::AtBatResult;

/// One game being scored.
///
/// # Examples
///
/// ```rust
/// use retroscore::{Base, Cursor, Scorekeeper, Team};
/// use retroscore::result;
///
/// let mut scorekeeper = Scorekeeper::new();
/// let target = Cursor::new(Team::Visiting, 0, 0);
/// scorekeeper.handle_play("D7/L7D", target, None).unwrap();
///
/// let frame = scorekeeper.gameplay().frame(Team::Visiting, 0, 0).unwrap();
/// assert_eq!(frame.result, Some(result::hit(Base::Second)));
/// assert_eq!(frame.bases.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scorekeeper {
    interpreter: PlayInterpreter,
    gameplay: Gameplay,
    lineups: Lineups,
    game_info: GameInfo,
}

impl Scorekeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scorekeeper for a game whose metadata and starting lineups are
    /// already known.
    pub fn with_game(game_info: GameInfo, lineups: Lineups) -> Self {
        Self {
            game_info,
            lineups,
            ..Self::default()
        }
    }

    /// Use a custom rule table instead of the standard one.
    pub fn with_interpreter(mut self, interpreter: PlayInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn interpreter(&self) -> &PlayInterpreter {
        &self.interpreter
    }

    pub fn gameplay(&self) -> &Gameplay {
        &self.gameplay
    }

    pub fn lineups(&self) -> &Lineups {
        &self.lineups
    }

    pub fn game_info(&self) -> &GameInfo {
        &self.game_info
    }

    pub fn update_game_info(&mut self, partial: GameInfo) {
        self.game_info.merge(partial);
    }

    pub fn set_lineups(&mut self, lineups: Lineups) {
        self.lineups = lineups;
    }

    fn cursor_inning(&self) -> usize {
        self.gameplay.cursor().map_or(0, |c| c.inning)
    }

    /// Put `player` into `slot`, effective from the cursor's inning (the
    /// first inning before the game starts).
    pub fn substitute(&mut self, team: Team, slot: usize, player: Player, position: u8) {
        let inning = self.cursor_inning();
        self.substitute_in_inning(team, slot, player, position, inning);
    }

    /// Put `player` into `slot`, effective from `inning`.
    pub fn substitute_in_inning(
        &mut self,
        team: Team,
        slot: usize,
        player: Player,
        position: u8,
        inning: usize,
    ) {
        self.lineups
            .substitute(team, slot, LineupEntry::new(player, position, inning));
    }

    /// Record a pitcher who holds no batting slot, effective from the
    /// cursor's inning.
    pub fn add_pitcher(&mut self, team: Team, player: Player, position: u8) {
        let inning = self.cursor_inning();
        self.add_pitcher_in_inning(team, player, position, inning);
    }

    pub fn add_pitcher_in_inning(&mut self, team: Team, player: Player, position: u8, inning: usize) {
        self.lineups
            .add_pitcher(team, LineupEntry::new(player, position, inning));
    }

    pub fn start_game(&mut self) {
        self.gameplay.start_game();
    }

    pub fn set_cursor(&mut self, update: CursorUpdate) {
        self.gameplay.set_cursor(update);
    }

    pub fn next_inning(&mut self) -> Result<(), ScoreError> {
        self.gameplay.next_inning()
    }

    pub fn next_lineup_spot(&mut self) -> Result<(), ScoreError> {
        self.gameplay.next_lineup_spot()
    }

    pub fn ball(&mut self) -> Result<(), ScoreError> {
        self.gameplay.pitch_ball()
    }

    pub fn strike(&mut self) -> Result<(), ScoreError> {
        self.gameplay.pitch_strike()
    }

    pub fn foul(&mut self) -> Result<(), ScoreError> {
        self.gameplay.foul_ball()
    }

    pub fn hit(&mut self, base: Base) -> Result<(), ScoreError> {
        self.gameplay.record_hit(base)
    }

    pub fn fly_out(&mut self, position: u8) -> Result<(), ScoreError> {
        self.gameplay.record_fly_out(position)
    }

    pub fn line_out(&mut self, position: u8) -> Result<(), ScoreError> {
        self.gameplay.record_line_out(position)
    }

    pub fn putout(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        self.gameplay.record_putout(positions)
    }

    pub fn sacrifice_fly(&mut self, position: u8) -> Result<(), ScoreError> {
        self.gameplay.record_sacrifice_fly(position)
    }

    pub fn sacrifice_bunt(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        self.gameplay.record_sacrifice_bunt(positions)
    }

    pub fn defensive_error(&mut self, fielder: u8, base: Base) -> Result<(), ScoreError> {
        self.gameplay.record_defensive_error(fielder, base)
    }

    pub fn fielders_choice(&mut self, positions: &[u8]) -> Result<(), ScoreError> {
        self.gameplay.record_fielders_choice(positions)
    }

    pub fn advance_runner(
        &mut self,
        base: Base,
        result: Option<AtBatResult>,
    ) -> Result<(), ScoreError> {
        self.gameplay.advance_runner(base, result)
    }

    pub fn basepath_out(&mut self, base_attempted: Base, result: AtBatResult) -> Result<(), ScoreError> {
        self.gameplay.record_basepath_out(base_attempted, result)
    }

    /// Move the runner on `from` to `to`, on that runner's own frame.
    pub fn advance_runner_from(
        &mut self,
        from: Base,
        to: Base,
        result: Option<AtBatResult>,
    ) -> Result<(), ScoreError> {
        self.gameplay.advance_runner_from(from, to, result)
    }

    pub fn runner_out(
        &mut self,
        from: Base,
        base_attempted: Base,
        result: AtBatResult,
    ) -> Result<(), ScoreError> {
        self.gameplay.record_runner_out(from, base_attempted, result)
    }

    /// Interpret a play code without recording it.
    pub fn interpret(&self, raw: &str) -> Result<Action, ScoreError> {
        self.interpreter.interpret(raw)
    }

    /// Record an already interpreted play at `target`. Returns the frame
    /// index it landed on.
    pub fn handle_action(
        &mut self,
        action: &Action,
        target: Cursor,
        pitches: Option<&PitchCounts>,
    ) -> usize {
        self.gameplay.apply_action(action, pitches, target)
    }

    /// Interpret `raw` and record it at `target`.
    ///
    /// # Errors
    ///
    /// Any interpretation error; the game state is left untouched.
    pub fn handle_play(
        &mut self,
        raw: &str,
        target: Cursor,
        pitches: Option<&PitchCounts>,
    ) -> Result<usize, ScoreError> {
        let action = self.interpreter.interpret(raw)?;
        Ok(self.handle_action(&action, target, pitches))
    }
}
