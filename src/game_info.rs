//! Game metadata.
//!
//! `GameInfo` is an opaque key-value store for the facts about a game that
//! scoring never looks at: date, teams, ballpark, start time, umpires. The
//! core does not interpret this data; it is carried alongside the game.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key-value metadata for one game.
///
/// Values are stored as `serde_json::Value`, so anything serializable can
/// be kept and read back as the type it was written with.
///
/// # Examples
///
/// ```rust
/// use retroscore::GameInfo;
///
/// let mut info = GameInfo::new();
/// info.set("home_team", "Atlanta Braves");
/// info.set("attendance", 41_084);
///
/// let attendance: Option<u32> = info.get("attendance");
/// assert_eq!(attendance, Some(41_084));
/// assert_eq!(info.get_str("home_team"), Some("Atlanta Braves"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    data: BTreeMap<String, serde_json::Value>,
}

impl GameInfo {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    ///
    /// The value must be serializable. If serialization fails, the value
    /// is silently not added.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
    }

    /// Get a value.
    ///
    /// Returns `None` if the key doesn't exist or if the value
    /// cannot be deserialized to the requested type.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Borrow a string value without copying it.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Overwrite this store's values with every value in `partial`.
    ///
    /// ```rust
    /// use retroscore::GameInfo;
    ///
    /// let mut info = GameInfo::new();
    /// info.set("start_time", "7:00pm");
    /// info.set("location", "Truist Park");
    ///
    /// let mut update = GameInfo::new();
    /// update.set("start_time", "10:00pm");
    /// info.merge(update);
    ///
    /// assert_eq!(info.get_str("start_time"), Some("10:00pm"));
    /// assert_eq!(info.get_str("location"), Some("Truist Park"));
    /// ```
    pub fn merge(&mut self, partial: GameInfo) {
        self.data.extend(partial.data);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
