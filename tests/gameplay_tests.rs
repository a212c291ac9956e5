use retroscore::replay::{replay, ReplayOptions};
use retroscore::result::{self, PitcherResultKind};
use retroscore::*;

fn at(inning: usize, lineup_spot: usize) -> Cursor {
    Cursor::new(Team::Visiting, inning, lineup_spot)
}

fn at_bat_base() -> BaseResult {
    BaseResult {
        advanced: true,
        result: None,
        is_at_bat_result: true,
    }
}

#[test]
fn test_live_walk() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.start_game();
    for _ in 0..4 {
        scorekeeper.ball().unwrap();
    }
    let frame = scorekeeper.gameplay().frame(Team::Visiting, 0, 0).unwrap();
    assert_eq!(
        frame,
        &AtBat {
            balls: 4,
            strikes: 0,
            pitch_count: 4,
            is_out: false,
            is_sacrifice: false,
            result: Some(result::pitcher_result(PitcherResultKind::Walk)),
            bases: vec![BaseResult::advanced()],
        }
    );
}

#[test]
fn test_live_strikeout_then_next_batter() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.start_game();
    scorekeeper.strike().unwrap();
    scorekeeper.foul().unwrap();
    scorekeeper.foul().unwrap();
    scorekeeper.strike().unwrap();
    scorekeeper.next_lineup_spot().unwrap();
    scorekeeper.ball().unwrap();

    let gameplay = scorekeeper.gameplay();
    let struck_out = gameplay.frame(Team::Visiting, 0, 0).unwrap();
    assert!(struck_out.is_out);
    assert_eq!((struck_out.strikes, struck_out.pitch_count), (3, 4));
    assert_eq!(gameplay.current_frame().unwrap().balls, 1);
    assert_eq!(gameplay.current_frame_index(), Some(1));
}

/// Eleven batters in one inning: the first two slots come up twice.
#[test]
fn test_batting_around_keeps_every_frame() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.start_game();
    for spot in 0..11 {
        if spot > 0 {
            scorekeeper.next_lineup_spot().unwrap();
        }
        scorekeeper.hit(Base::First).unwrap();
    }
    let inning = scorekeeper.gameplay().inning(Team::Visiting, 0);
    assert_eq!(inning.len(), 11);
    assert!(inning.iter().all(|frame| frame
        .as_ref()
        .is_some_and(|f| f.result == Some(result::hit(Base::First)))));
    assert_eq!(scorekeeper.gameplay().cursor(), Some(at(0, 1)));
}

#[test]
fn test_extra_innings_are_sparse() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper
        .handle_play("7/L", at(10, 4), Some(&PitchCounts::new(0, 0, 1)))
        .unwrap();

    let innings = scorekeeper.gameplay().innings(Team::Visiting);
    assert_eq!(innings.len(), 11);
    assert!(innings[..10].iter().all(|inning| inning.is_empty()));
    assert_eq!(innings[10].len(), 5);
    assert!(innings[10][..4].iter().all(Option::is_none));
    let frame = innings[10][4].as_ref().unwrap();
    assert!(frame.is_out);
    assert_eq!(frame.result, Some(result::line_out(7).unwrap()));
}

/// A half-inning with a hit, a walk, a steal, a double that scores two
/// and a runner thrown out trying for third.
#[test]
fn test_runners_carry_their_history() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.handle_play("S8", at(0, 0), None).unwrap();
    scorekeeper
        .handle_play("W.1-2", at(0, 1), Some(&PitchCounts::new(4, 2, 8)))
        .unwrap();
    assert_eq!(scorekeeper.handle_play("SB3", at(0, 2), None), Ok(2));
    assert_eq!(
        scorekeeper.handle_play("D7.1-H;3-H", at(0, 2), Some(&PitchCounts::new(0, 0, 1))),
        Ok(2)
    );
    scorekeeper.handle_play("OA.2X3(15)", at(0, 3), None).unwrap();

    let gameplay = scorekeeper.gameplay();
    let leadoff = gameplay.frame(Team::Visiting, 0, 0).unwrap();
    assert_eq!(
        leadoff.bases,
        vec![
            at_bat_base(),
            BaseResult::advanced(),
            BaseResult {
                advanced: true,
                result: Some(result::stolen_base(Base::Third).unwrap()),
                is_at_bat_result: false,
            },
            BaseResult::advanced(),
        ]
    );
    assert!(!leadoff.is_out);

    let walked = gameplay.frame(Team::Visiting, 0, 1).unwrap();
    assert_eq!((walked.balls, walked.strikes, walked.pitch_count), (4, 2, 8));
    assert_eq!(walked.bases.len(), 4);
    assert_eq!(walked.occupied_base(), None);

    let doubled = gameplay.frame(Team::Visiting, 0, 2).unwrap();
    assert_eq!(doubled.result, Some(result::hit(Base::Second)));
    assert_eq!(doubled.pitch_count, 1);
    assert!(doubled.is_out);
    assert_eq!(
        doubled.bases,
        vec![
            BaseResult::advanced(),
            at_bat_base(),
            BaseResult::retired(Some(result::putout(&[1, 5]).unwrap())),
        ]
    );

    assert_eq!(gameplay.frame(Team::Visiting, 0, 3), Some(&AtBat::new()));
}

#[test]
fn test_double_play_retires_runner_and_batter() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.handle_play("S9/L", at(0, 0), None).unwrap();
    scorekeeper.handle_play("S8.1-2", at(0, 1), None).unwrap();
    scorekeeper
        .handle_play("8(B)84(2)/LDP", at(0, 2), None)
        .unwrap();

    let gameplay = scorekeeper.gameplay();
    let lead = gameplay.frame(Team::Visiting, 0, 0).unwrap();
    assert!(lead.is_out);
    assert_eq!(
        lead.bases.last(),
        Some(&BaseResult::retired(Some(result::putout(&[8, 4]).unwrap())))
    );
    assert_eq!(
        gameplay.frame(Team::Visiting, 0, 1).unwrap().occupied_base(),
        Some(Base::First)
    );
    let batter = gameplay.frame(Team::Visiting, 0, 2).unwrap();
    assert!(batter.is_out);
    assert_eq!(batter.result, Some(result::line_out(8).unwrap()));
    assert!(batter.bases.is_empty());
}

#[test]
fn test_halves_are_kept_apart() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.handle_play("S8", at(0, 0), None).unwrap();
    let home = Cursor::new(Team::Home, 0, 0);
    scorekeeper.handle_play("SB2", home, None).unwrap();

    let gameplay = scorekeeper.gameplay();
    assert_eq!(
        gameplay.frame(Team::Visiting, 0, 0).unwrap().occupied_base(),
        Some(Base::First)
    );
    assert_eq!(gameplay.frame(Team::Home, 0, 0), Some(&AtBat::new()));
}

#[test]
fn test_gameplay_serializes() {
    let mut scorekeeper = Scorekeeper::new();
    scorekeeper.handle_play("HR/F78", at(0, 0), None).unwrap();
    let json = serde_json::to_value(scorekeeper.gameplay()).unwrap();
    let restored: Gameplay = serde_json::from_value(json).unwrap();
    assert_eq!(&restored, scorekeeper.gameplay());
}

#[test]
fn test_replay_two_games() {
    let input = "\
id,NYN202007240
info,visteam,ATL
start,acunr001,\"Ronald Acuna\",0,1,9
start,freef001,\"Freddie Freeman\",0,2,3
play,1,0,acunr001,22,BCBFX,D9/L
play,1,0,freef001,00,X,S7.2-H
id,NYN202007250
start,acunr001,\"Ronald Acuna\",0,1,9
play,1,0,acunr001,02,CSS,K
play,2,0,nobody01,00,X,S8
";
    let report = replay(input, &ReplayOptions::default());
    assert_eq!(report.games.len(), 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line, 10);

    let first = report.games[0].scorekeeper.gameplay();
    let doubled = first.frame(Team::Visiting, 0, 0).unwrap();
    assert_eq!((doubled.balls, doubled.strikes, doubled.pitch_count), (2, 2, 5));
    assert_eq!(doubled.bases.len(), 4);
    assert_eq!(report.games[0].plays, 2);

    let second = &report.games[1];
    assert_eq!(second.plays, 1);
    assert!(second.scorekeeper.game_info().is_empty());
    let struck_out = second.scorekeeper.gameplay().frame(Team::Visiting, 0, 0).unwrap();
    assert!(struck_out.is_out);
    assert_eq!(
        struck_out.result,
        Some(result::pitcher_result(PitcherResultKind::Strikeout))
    );
}
