//! Lineup and substitution store.
//!
//! Each team's lineup is a list of batting slots; every slot keeps its full
//! history, one entry for the starter plus one per substitution, tagged with
//! the inning the change took effect. Eligibility is not validated here.

use crate::gameplay::Team;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier, such as a Retrosheet player id.
    pub id: String,
    pub name: String,
    pub number: Option<u32>,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            number: None,
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }
}

/// A player occupying a batting slot from `inning` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub player: Player,
    /// Defensive position `1..=9`; Retrosheet uses `10` for a designated
    /// hitter, `11` for a pinch hitter and `12` for a pinch runner.
    pub position: u8,
    pub inning: usize,
}

impl LineupEntry {
    pub fn new(player: Player, position: u8, inning: usize) -> Self {
        Self {
            player,
            position,
            inning,
        }
    }
}

/// Slot histories for both teams, plus the pitchers who do not hold a
/// batting slot.
///
/// # Examples
///
/// ```rust
/// use retroscore::lineup::{LineupEntry, Lineups, Player};
/// use retroscore::Team;
///
/// let mut lineups = Lineups::new();
/// let starter = LineupEntry::new(Player::new("freef001", "Freddie Freeman"), 3, 0);
/// let sub = LineupEntry::new(Player::new("camaj001", "Johan Camargo"), 3, 7);
/// lineups.substitute(Team::Home, 2, starter);
/// lineups.substitute(Team::Home, 2, sub.clone());
///
/// assert_eq!(lineups.get(Team::Home)[2].len(), 2);
/// assert_eq!(lineups.current(Team::Home, 2), Some(&sub));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineups {
    visiting: Vec<Vec<LineupEntry>>,
    home: Vec<Vec<LineupEntry>>,
    visiting_pitchers: Vec<LineupEntry>,
    home_pitchers: Vec<LineupEntry>,
}

impl Lineups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a team's lineup with `starters`, one per slot in batting
    /// order, all starting in `inning`.
    pub fn set_starters(&mut self, team: Team, starters: Vec<(Player, u8)>, inning: usize) {
        *self.slots_mut(team) = starters
            .into_iter()
            .map(|(player, position)| vec![LineupEntry::new(player, position, inning)])
            .collect();
    }

    /// The slot histories of `team`, in batting order.
    pub fn get(&self, team: Team) -> &[Vec<LineupEntry>] {
        match team {
            Team::Visiting => &self.visiting,
            Team::Home => &self.home,
        }
    }

    fn slots_mut(&mut self, team: Team) -> &mut Vec<Vec<LineupEntry>> {
        match team {
            Team::Visiting => &mut self.visiting,
            Team::Home => &mut self.home,
        }
    }

    /// Append `entry` to a slot's history. Slots past the end are created.
    pub fn substitute(&mut self, team: Team, slot: usize, entry: LineupEntry) {
        let slots = self.slots_mut(team);
        if slots.len() <= slot {
            slots.resize_with(slot + 1, Vec::new);
        }
        slots[slot].push(entry);
    }

    /// Whoever currently holds `slot`.
    pub fn current(&self, team: Team, slot: usize) -> Option<&LineupEntry> {
        self.get(team).get(slot)?.last()
    }

    /// The slot `player_id` currently holds, if any.
    pub fn slot_of(&self, team: Team, player_id: &str) -> Option<usize> {
        self.get(team)
            .iter()
            .position(|history| history.last().is_some_and(|e| e.player.id == player_id))
    }

    pub fn pitchers(&self, team: Team) -> &[LineupEntry] {
        match team {
            Team::Visiting => &self.visiting_pitchers,
            Team::Home => &self.home_pitchers,
        }
    }

    /// Record a pitcher who does not bat (designated-hitter games).
    pub fn add_pitcher(&mut self, team: Team, entry: LineupEntry) {
        match team {
            Team::Visiting => self.visiting_pitchers.push(entry),
            Team::Home => self.home_pitchers.push(entry),
        }
    }
}
