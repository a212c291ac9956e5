//! Bases and runner origins.
//!
//! `Base` is a destination a runner can reach; `Origin` is where a runner
//! started the play, which includes the batter's box ("B").

use serde::{Deserialize, Serialize};
use std::fmt;

/// A base a runner can reach, ordered `First < Second < Third < Home`.
///
/// # Examples
///
/// ```rust
/// use retroscore::Base;
///
/// assert!(Base::First < Base::Home);
/// assert_eq!(Base::from_notation('H'), Some(Base::Home));
/// assert_eq!(Base::Second.number(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    First,
    Second,
    Third,
    Home,
}

impl Base {
    /// All bases in running order.
    pub const ALL: [Base; 4] = [Base::First, Base::Second, Base::Third, Base::Home];

    /// The base number, `1` for first through `4` for home.
    pub fn number(self) -> u8 {
        match self {
            Base::First => 1,
            Base::Second => 2,
            Base::Third => 3,
            Base::Home => 4,
        }
    }

    /// Inverse of [`Base::number`].
    pub fn from_number(n: u8) -> Option<Base> {
        match n {
            1 => Some(Base::First),
            2 => Some(Base::Second),
            3 => Some(Base::Third),
            4 => Some(Base::Home),
            _ => None,
        }
    }

    /// Parse the single-character notation (`1`, `2`, `3`, `H`).
    pub fn from_notation(c: char) -> Option<Base> {
        match c {
            '1' => Some(Base::First),
            '2' => Some(Base::Second),
            '3' => Some(Base::Third),
            'H' => Some(Base::Home),
            _ => None,
        }
    }

    /// The next base in running order, `None` past home.
    pub fn next(self) -> Option<Base> {
        Base::from_number(self.number() + 1)
    }

    /// The origin of a runner whose next base is `self`.
    ///
    /// ```rust
    /// use retroscore::{Base, Origin};
    ///
    /// assert_eq!(Base::Second.runner_origin(), Origin::First);
    /// assert_eq!(Base::Home.runner_origin(), Origin::Third);
    /// assert_eq!(Base::First.runner_origin(), Origin::Batter);
    /// ```
    pub fn runner_origin(self) -> Origin {
        match self {
            Base::First => Origin::Batter,
            Base::Second => Origin::First,
            Base::Third => Origin::Second,
            Base::Home => Origin::Third,
        }
    }

    /// The origin a runner standing on this base starts from, `None` for home.
    pub fn as_origin(self) -> Option<Origin> {
        match self {
            Base::First => Some(Origin::First),
            Base::Second => Some(Origin::Second),
            Base::Third => Some(Origin::Third),
            Base::Home => None,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Base::Home => write!(f, "H"),
            other => write!(f, "{}", other.number()),
        }
    }
}

/// Where a runner started a play: the batter's box or an occupied base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    Batter,
    First,
    Second,
    Third,
}

impl Origin {
    /// All origins, batter first.
    pub const ALL: [Origin; 4] = [Origin::Batter, Origin::First, Origin::Second, Origin::Third];

    /// Parse the single-character notation (`B`, `1`, `2`, `3`).
    pub fn from_notation(c: char) -> Option<Origin> {
        match c {
            'B' => Some(Origin::Batter),
            '1' => Some(Origin::First),
            '2' => Some(Origin::Second),
            '3' => Some(Origin::Third),
            _ => None,
        }
    }

    /// The base this runner is standing on, `None` for the batter.
    pub fn as_base(self) -> Option<Base> {
        match self {
            Origin::Batter => None,
            Origin::First => Some(Base::First),
            Origin::Second => Some(Base::Second),
            Origin::Third => Some(Base::Third),
        }
    }

    /// The first base this runner would advance to.
    pub fn next_base(self) -> Base {
        match self {
            Origin::Batter => Base::First,
            Origin::First => Base::Second,
            Origin::Second => Base::Third,
            Origin::Third => Base::Home,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::Batter => "B",
            Origin::First => "1",
            Origin::Second => "2",
            Origin::Third => "3",
        };
        write!(f, "{}", s)
    }
}
