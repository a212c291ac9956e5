//! # retroscore - Retrosheet Play Notation and Baseball Scorekeeping
//!
//! A scorekeeping core for baseball that provides:
//! - **Interpretation** of the compact Retrosheet play notation
//!   (`S8/G.1-3`, `64(1)3/GDP`, `K+SB2`, ...) into structured actions
//! - **Deterministic** rule matching (an ordered table, first match wins)
//! - **Live scoring** of pitches and batted-ball outcomes
//! - **Replay** of historical event files into a per-inning scorecard
//!
//! ## Core Concepts
//!
//! ### Play Pipeline
//!
//! A play code flows through a short pipeline:
//!
//! ```text
//! [play code] → [PlayInterpreter] → [Action] → [Gameplay] → [AtBat frames]
//! ```
//!
//! 1. The **interpreter** matches each event component against the rule
//!    table and resolves every runner's movement
//! 2. An **Action** carries the plate-appearance result and a `Bases` map
//!    keyed by runner origin
//! 3. **Gameplay** merges the action into the batter's frame and moves the
//!    runners on the frames of the batters who reached earlier
//!
//! ### Key Features
//!
//! - **Closed result type**: every outcome is an [`AtBatResult`] variant
//! - **Relay reconstruction**: fielding sequences for multi-out plays are
//!   rebuilt from the parenthesised groups of the notation
//! - **Batting around**: frames for a repeated lineup slot are stored
//!   nine positions later instead of overwriting the first
//! - **Sparse innings**: innings and slots grow on demand
//!
//! ## Example
//!
//! ```rust
//! use retroscore::*;
//!
//! let interpreter = PlayInterpreter::new();
//! let action = interpreter.interpret("64(1)3/GDP").unwrap();
//! assert!(action.is_out);
//! assert_eq!(action.outs(), 2);
//!
//! let mut gameplay = Gameplay::new();
//! let single = interpreter.interpret("S8/G").unwrap();
//! gameplay.apply_action(&single, None, Cursor::new(Team::Visiting, 0, 0));
//! gameplay.apply_action(&action, None, Cursor::new(Team::Visiting, 0, 1));
//!
//! // The runner from first was forced at second.
//! let leadoff = gameplay.frame(Team::Visiting, 0, 0).unwrap();
//! assert!(leadoff.is_out);
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Bases and runner origins
//! - [`result`] - Result generators
//! - [`movement`] - Runner movement maps and their resolution
//! - [`action`] - The interpreter's output
//! - [`interpreter`] - Ordered rule table and play interpretation
//! - [`gameplay`] - The scoring state machine
//! - [`lineup`] - Lineups and substitutions
//! - [`game_info`] - Game metadata
//! - [`scorekeeper`] - Facade over one game
//! - [`replay`] - Retrosheet event-file replay
//! - [`error`] - Error types

pub mod action;
pub mod base;
mod batter_rules;
pub mod error;
pub mod game_info;
pub mod gameplay;
pub mod interpreter;
pub mod lineup;
pub mod movement;
pub mod replay;
pub mod result;
mod runner_rules;
pub mod scorekeeper;

// Re-export main types for convenience
pub use action::{Action, PitchCounts};
pub use base::{Base, Origin};
pub use error::ScoreError;
pub use game_info::GameInfo;
pub use gameplay::{AtBat, BaseResult, Cursor, CursorUpdate, Gameplay, Team, LINEUP_SIZE};
pub use interpreter::{PlayInterpreter, PlayRule, RuleCategory};
pub use movement::{Bases, EventBaseResult};
pub use result::AtBatResult;
pub use scorekeeper::Scorekeeper;
