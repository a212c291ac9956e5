//! Replay of Retrosheet event files.
//!
//! An event file is a sequence of comma-separated records, one per line:
//!
//! ```text
//! id,ATL202008090
//! info,visteam,WAS
//! start,eatoa002,"Adam Eaton",0,1,9
//! play,1,0,eatoa002,32,BCBFBB,W
//! sub,camaj001,"Johan Camargo",1,3,11
//! ```
//!
//! `id` opens a new game; `info` goes to the game's metadata; `start` and
//! `sub` maintain the lineups; `play` is interpreted and recorded on the
//! batter's frame. Other record types (`version`, `com`, `data`, the
//! `*adj` adjustments) are skipped.
//!
//! A record that fails is reported with its line number and the replay
//! moves on to the next line, unless [`ReplayOptions::stop_on_error`] is
//! set.

use crate::action::PitchCounts;
use crate::error::ScoreError;
use crate::game_info::GameInfo;
use crate::gameplay::{Cursor, Team};
use crate::lineup::Player;
use crate::scorekeeper::Scorekeeper;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOptions {
    /// Stop at the first failing record instead of collecting errors.
    pub stop_on_error: bool,
}

/// A record that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    /// 1-based line number in the input.
    pub line: usize,
    pub record: String,
    pub error: ScoreError,
}

/// One game rebuilt from its records.
#[derive(Debug, Clone, Default)]
pub struct ReplayedGame {
    pub id: Option<String>,
    pub scorekeeper: Scorekeeper,
    /// Play records successfully recorded.
    pub plays: usize,
    /// `sub` records waiting for the next play to learn their inning.
    pending: Vec<LineupChange>,
}

/// A parsed `start` or `sub` record.
#[derive(Debug, Clone)]
struct LineupChange {
    team: Team,
    order: usize,
    player: Player,
    position: u8,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayReport {
    pub games: Vec<ReplayedGame>,
    pub errors: Vec<LineError>,
    /// The replay stopped at the first error.
    pub stopped_early: bool,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Split a record on commas outside double quotes, dropping the quotes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn malformed(line: usize, reason: impl Into<String>) -> ScoreError {
    ScoreError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

fn field<'a>(fields: &'a [String], index: usize, line: usize) -> Result<&'a str, ScoreError> {
    fields
        .get(index)
        .map(|f| f.trim())
        .ok_or_else(|| malformed(line, format!("{} record is missing field {}", fields[0], index)))
}

fn parse_number(value: &str, what: &str, line: usize) -> Result<usize, ScoreError> {
    value
        .parse()
        .map_err(|_| malformed(line, format!("{} '{}' is not a number", what, value)))
}

fn parse_team(value: &str, line: usize) -> Result<Team, ScoreError> {
    match value {
        "0" => Ok(Team::Visiting),
        "1" => Ok(Team::Home),
        other => Err(malformed(line, format!("team '{}' is neither 0 nor 1", other))),
    }
}

/// Final counts for a plate appearance from its pitch sequence, falling
/// back to the count field (balls then strikes, `?` for unknown) when no
/// pitches were recorded.
///
/// ```rust
/// use retroscore::replay::pitch_counts;
/// use retroscore::PitchCounts;
///
/// assert_eq!(pitch_counts("32", "BCBFBFB"), PitchCounts::new(4, 2, 7));
/// assert_eq!(pitch_counts("12", "BCFFX"), PitchCounts::new(1, 2, 5));
/// assert_eq!(pitch_counts("21", ""), PitchCounts::new(2, 1, 0));
/// assert_eq!(pitch_counts("??", ""), PitchCounts::default());
/// ```
pub fn pitch_counts(count: &str, sequence: &str) -> PitchCounts {
    let mut counts = PitchCounts::default();
    for pitch in sequence.chars() {
        match pitch {
            'B' | 'I' | 'P' | 'V' => counts.balls += 1,
            'C' | 'S' | 'K' | 'M' | 'Q' | 'T' => counts.strikes += 1,
            'F' | 'R' if counts.strikes < 2 => counts.strikes += 1,
            'L' | 'O' => counts.strikes += 1,
            _ => {}
        }
        if "BCFHIKLMOPQRSTUVXY".contains(pitch) {
            counts.pitch_count += 1;
        }
    }

    if counts.pitch_count == 0 {
        let mut digits = count.chars().map(|c| c.to_digit(10));
        let balls = digits.next().flatten();
        let strikes = digits.next().flatten();
        counts.balls = balls.and_then(|b| u8::try_from(b).ok()).unwrap_or(0);
        counts.strikes = strikes.and_then(|s| u8::try_from(s).ok()).unwrap_or(0);
    }

    counts.balls = counts.balls.min(4);
    counts.strikes = counts.strikes.min(3);
    counts
}

impl ReplayedGame {
    fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    fn apply_record(&mut self, fields: &[String], line: usize) -> Result<(), ScoreError> {
        match fields[0].as_str() {
            "info" => {
                let key = field(fields, 1, line)?;
                let value = field(fields, 2, line)?;
                let mut info = GameInfo::new();
                info.set(key, value);
                self.scorekeeper.update_game_info(info);
                Ok(())
            }
            "start" | "sub" => self.apply_lineup(fields, line),
            "play" => self.apply_play(fields, line),
            other => {
                log::debug!("line {}: skipping {} record", line, other);
                Ok(())
            }
        }
    }

    fn apply_lineup(&mut self, fields: &[String], line: usize) -> Result<(), ScoreError> {
        let id = field(fields, 1, line)?;
        let name = field(fields, 2, line)?;
        let team = parse_team(field(fields, 3, line)?, line)?;
        let order = parse_number(field(fields, 4, line)?, "batting order", line)?;
        let position = parse_number(field(fields, 5, line)?, "position", line)?;
        let position = u8::try_from(position)
            .map_err(|_| malformed(line, format!("position {} is out of range", position)))?;

        let change = LineupChange {
            team,
            order,
            player: Player::new(id, name),
            position,
        };
        if fields[0] == "start" {
            self.change_lineup(change, 0);
        } else {
            // Substitutions are made between plays; they take effect in the
            // inning of the play that follows.
            self.pending.push(change);
        }
        Ok(())
    }

    fn change_lineup(&mut self, change: LineupChange, inning: usize) {
        let LineupChange {
            team,
            order,
            player,
            position,
        } = change;
        if order == 0 {
            // A pitcher who does not bat in a designated-hitter game.
            self.scorekeeper
                .add_pitcher_in_inning(team, player, position, inning);
        } else {
            self.scorekeeper
                .substitute_in_inning(team, order - 1, player, position, inning);
        }
    }

    fn flush_substitutions(&mut self, inning: usize) {
        for change in std::mem::take(&mut self.pending) {
            self.change_lineup(change, inning);
        }
    }

    /// Apply substitutions left after the last play, in the inning the game
    /// ended in.
    fn finish(&mut self) {
        let inning = self.scorekeeper.gameplay().cursor().map_or(0, |c| c.inning);
        self.flush_substitutions(inning);
    }

    fn apply_play(&mut self, fields: &[String], line: usize) -> Result<(), ScoreError> {
        let inning = parse_number(field(fields, 1, line)?, "inning", line)?;
        let inning = inning
            .checked_sub(1)
            .ok_or_else(|| malformed(line, "innings are numbered from 1"))?;
        let team = parse_team(field(fields, 2, line)?, line)?;
        let batter = field(fields, 3, line)?;
        let pitches = pitch_counts(field(fields, 4, line)?, field(fields, 5, line)?);
        let event = field(fields, 6, line)?;

        self.flush_substitutions(inning);
        let slot = self
            .scorekeeper
            .lineups()
            .slot_of(team, batter)
            .ok_or_else(|| malformed(line, format!("batter {} is not in the lineup", batter)))?;
        let target = Cursor::new(team, inning, slot);

        self.scorekeeper.handle_play(event, target, Some(&pitches))?;
        self.scorekeeper.set_cursor(target.into());
        self.plays += 1;
        Ok(())
    }
}

/// Replay every game in `input`.
///
/// # Examples
///
/// ```rust
/// use retroscore::replay::{replay, ReplayOptions};
/// use retroscore::Team;
///
/// let input = "\
/// id,TST202001010
/// start,aaaa001,\"Al A\",0,1,8
/// start,bbbb001,\"Bo B\",0,2,6
/// play,1,0,aaaa001,10,BX,S8/G
/// play,1,0,bbbb001,00,X,64(1)3/GDP
/// ";
/// let report = replay(input, &ReplayOptions::default());
/// assert!(report.is_clean());
///
/// let gameplay = report.games[0].scorekeeper.gameplay();
/// let leadoff = gameplay.frame(Team::Visiting, 0, 0).unwrap();
/// assert!(leadoff.is_out);
/// ```
pub fn replay(input: &str, options: &ReplayOptions) -> ReplayReport {
    let mut report = ReplayReport::default();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let record = raw.trim();
        if record.is_empty() {
            continue;
        }
        let fields = split_record(record);

        if fields[0] == "id" {
            let id = fields.get(1).map(|id| id.trim().to_string());
            log::info!("replaying game {}", id.as_deref().unwrap_or("(unnamed)"));
            if let Some(previous) = report.games.last_mut() {
                previous.finish();
            }
            report.games.push(ReplayedGame::new(id));
            continue;
        }

        if report.games.is_empty() {
            report.games.push(ReplayedGame::new(None));
        }
        let Some(game) = report.games.last_mut() else {
            continue;
        };

        if let Err(error) = game.apply_record(&fields, line) {
            log::warn!("line {}: {}", line, error);
            report.errors.push(LineError {
                line,
                record: record.to_string(),
                error,
            });
            if options.stop_on_error {
                report.stopped_early = true;
                break;
            }
        }
    }

    if let Some(game) = report.games.last_mut() {
        game.finish();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Base;
    use crate::result::{self, PitcherResultKind};

    const GAME: &str = r#"id,ATL202008090
version,2
info,visteam,WAS
info,hometeam,ATL
start,eatoa002,"Adam Eaton",0,1,9
start,turnt001,"Trea Turner",0,2,6
start,sotoj001,"Juan Soto",0,3,7
start,acunr001,"Ronald Acuna",1,1,9
play,1,0,eatoa002,32,BCBFBB,W
play,1,0,turnt001,01,CX,S8/G.1-2
play,1,0,sotoj001,12,BCFX,64(1)3/GDP.2-3
com,"double play"
play,1,1,acunr001,00,X,HR/F78
"#;

    #[test]
    fn test_split_record_respects_quotes() {
        assert_eq!(
            split_record(r#"start,smitj001,"Smith, John",0,1,2"#),
            vec!["start", "smitj001", "Smith, John", "0", "1", "2"]
        );
    }

    #[test]
    fn test_pitch_counts() {
        assert_eq!(pitch_counts("02", "CFFFT"), PitchCounts::new(0, 3, 5));
        assert_eq!(pitch_counts("02", "CCL"), PitchCounts::new(0, 3, 3));
        assert_eq!(pitch_counts("00", ">B.X"), PitchCounts::new(1, 0, 2));
        assert_eq!(pitch_counts("3?", ""), PitchCounts::new(3, 0, 0));
    }

    #[test]
    fn test_replay_game() {
        let report = replay(GAME, &ReplayOptions::default());
        assert!(report.is_clean(), "{:?}", report.errors);
        assert_eq!(report.games.len(), 1);

        let game = &report.games[0];
        assert_eq!(game.id.as_deref(), Some("ATL202008090"));
        assert_eq!(game.plays, 4);
        assert_eq!(game.scorekeeper.game_info().get_str("visteam"), Some("WAS"));

        let gameplay = game.scorekeeper.gameplay();
        let walk = gameplay.frame(Team::Visiting, 0, 0).unwrap();
        assert_eq!(
            walk.result,
            Some(result::pitcher_result(PitcherResultKind::Walk))
        );
        assert_eq!((walk.balls, walk.strikes, walk.pitch_count), (4, 2, 6));
        // Eaton went first to second on the single, then to third on the
        // double play.
        assert_eq!(walk.occupied_base(), Some(Base::Third));

        let single = gameplay.frame(Team::Visiting, 0, 1).unwrap();
        assert!(single.is_out);
        assert_eq!(single.bases.len(), 2);
        assert!(!single.bases[1].advanced);

        let double_play = gameplay.frame(Team::Visiting, 0, 2).unwrap();
        assert!(double_play.is_out);
        assert_eq!(double_play.result, Some(result::putout(&[6, 4, 3]).unwrap()));

        let homer = gameplay.frame(Team::Home, 0, 0).unwrap();
        assert_eq!(homer.result, Some(result::hit(Base::Home)));
        assert_eq!(homer.bases.len(), 4);
    }

    #[test]
    fn test_errors_are_collected_per_line() {
        let input = "\
start,a,\"A\",0,1,8
play,1,0,a,00,X,ZZ
play,1,0,nobody,00,X,S8
play,1,0,a,00,X,S8
";
        let report = replay(input, &ReplayOptions::default());
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].line, 2);
        assert_eq!(
            report.errors[0].error,
            ScoreError::UnrecognizedPlayNotation("ZZ".to_string())
        );
        assert!(matches!(
            report.errors[1].error,
            ScoreError::MalformedRecord { line: 3, .. }
        ));
        assert!(!report.stopped_early);
        assert_eq!(report.games[0].plays, 1);
    }

    #[test]
    fn test_stop_on_error() {
        let input = "\
start,a,\"A\",0,1,8
play,1,0,a,00,X,ZZ
play,1,0,a,00,X,S8
";
        let report = replay(
            input,
            &ReplayOptions {
                stop_on_error: true,
            },
        );
        assert!(report.stopped_early);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.games[0].plays, 0);
    }

    #[test]
    fn test_substitution_keeps_slot() {
        let input = "\
start,a,\"A\",1,4,8
play,3,1,a,00,X,S8
sub,b,\"B\",1,4,12
play,3,1,b,00,X,SB2
";
        let report = replay(input, &ReplayOptions::default());
        assert!(report.is_clean(), "{:?}", report.errors);
        let scorekeeper = &report.games[0].scorekeeper;
        let history = &scorekeeper.lineups().get(Team::Home)[3];
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].inning, 2);
        assert_eq!(history[1].position, 12);
    }

    #[test]
    fn test_substitution_between_innings_takes_next_inning() {
        let input = "\
start,a,\"A\",1,4,8
start,p,\"P\",0,0,1
play,3,1,a,00,X,63/G
sub,r,\"R\",0,0,1
sub,c,\"C\",1,4,11
play,4,1,c,00,X,S8
sub,z,\"Z\",1,4,8
";
        let report = replay(input, &ReplayOptions::default());
        assert!(report.is_clean(), "{:?}", report.errors);
        let lineups = report.games[0].scorekeeper.lineups();

        let history = &lineups.get(Team::Home)[3];
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].player.id, "c");
        assert_eq!(history[1].inning, 3);
        // Nothing follows the last substitution; it keeps the final inning.
        assert_eq!(history[2].inning, 3);

        let pitchers = lineups.pitchers(Team::Visiting);
        assert_eq!(pitchers.len(), 2);
        assert_eq!(pitchers[1].inning, 3);
    }

    #[test]
    fn test_malformed_records() {
        let input = "\
start,a,\"A\",2,1,8
play,0,0,a,00,X,S8
play,1,0
";
        let report = replay(input, &ReplayOptions::default());
        assert_eq!(report.errors.len(), 3);
        assert!(report
            .errors
            .iter()
            .all(|e| matches!(e.error, ScoreError::MalformedRecord { .. })));
    }
}
