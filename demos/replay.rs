//! Replay example: Scoring a Retrosheet event file
//!
//! This example demonstrates:
//! - Interpreting individual play codes
//! - Replaying an event file into per-inning frames
//! - Reading each frame's path around the bases
//!
//! Pass a path to an event file to replay it instead of the built-in game.

use retroscore::replay::{replay, ReplayOptions};
use retroscore::*;
use std::env;
use std::fs;

const SAMPLE: &str = r#"id,ATL202008090
version,2
info,visteam,WAS
info,hometeam,ATL
info,site,ATL03
start,eatoa002,"Adam Eaton",0,1,9
start,turnt001,"Trea Turner",0,2,6
start,sotoj001,"Juan Soto",0,3,7
start,kendh001,"Howie Kendrick",0,4,10
start,acunr001,"Ronald Acuna",1,1,9
start,albio001,"Ozzie Albies",1,2,4
start,freef001,"Freddie Freeman",1,3,3
play,1,0,eatoa002,32,BCBFBB,W
play,1,0,turnt001,01,CX,S8/G.1-2
play,1,0,sotoj001,12,BCFX,64(1)3/GDP.2-3
play,1,0,kendh001,22,BCBSS,K
play,1,1,acunr001,00,X,HR/F78
play,1,1,albio001,10,BX,D7/L.B-3(E7/TH)
play,1,1,freef001,11,BCX,8/SF.3-H
"#;

fn describe(frame: &AtBat) -> String {
    let result = frame
        .result
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let path: Vec<String> = frame
        .bases
        .iter()
        .map(|base| {
            let mark = if base.advanced { "+" } else { "x" };
            match &base.result {
                Some(r) => format!("{}{}", mark, r),
                None => mark.to_string(),
            }
        })
        .collect();
    format!(
        "{:<6} {}-{} ({:>2} pitches){} [{}]",
        result,
        frame.balls,
        frame.strikes,
        frame.pitch_count,
        if frame.is_out { " OUT" } else { "" },
        path.join(" ")
    )
}

fn main() -> Result<(), ScoreError> {
    println!("=== Play Interpretation ===\n");

    let interpreter = PlayInterpreter::new();
    for play in ["S8/G.1-3", "64(1)3/GDP", "K+SB2", "FC5/G.3XH(52)"] {
        let action = interpreter.interpret(play)?;
        println!(
            "  {:<14} result={:<6} outs={}",
            play,
            action
                .result
                .as_ref()
                .map_or_else(|| "-".to_string(), ToString::to_string),
            action.outs()
        );
    }

    println!("\n=== Event File Replay ===\n");

    let input = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).map_err(|e| ScoreError::MalformedRecord {
            line: 0,
            reason: format!("cannot read {}: {}", path, e),
        })?,
        None => SAMPLE.to_string(),
    };

    let report = replay(&input, &ReplayOptions::default());
    for game in &report.games {
        println!(
            "Game {} ({} plays)",
            game.id.as_deref().unwrap_or("(unnamed)"),
            game.plays
        );
        let gameplay = game.scorekeeper.gameplay();
        for team in [Team::Visiting, Team::Home] {
            for (inning, frames) in gameplay.innings(team).iter().enumerate() {
                for (index, frame) in frames.iter().enumerate() {
                    if let Some(frame) = frame {
                        println!(
                            "  {:?} inning {} frame {}: {}",
                            team,
                            inning + 1,
                            index,
                            describe(frame)
                        );
                    }
                }
            }
        }
        println!();
    }

    for error in &report.errors {
        println!("  line {}: {} ({})", error.line, error.error, error.record);
    }
    if report.is_clean() {
        println!("  ✓ No errors");
    }

    Ok(())
}
