//! Craving model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Emotion tags offered by the logging screen's preset chips.
pub const EMOTION_PRESETS: &[&str] = &[
    "hungry", "angry", "lonely", "tired", "stressed", "bored", "sad", "anxious",
];

/// A unique identifier for a craving, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CravingId(Uuid);

impl CravingId {
    /// Create a new unique craving ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for CravingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CravingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CravingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One logged craving event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craving {
    /// Unique identifier, used as a stable list-rendering key
    pub id: CravingId,
    /// Free-text description of the urge
    pub description: String,
    /// Urge strength on the documented 1-10 scale
    pub intensity: f64,
    /// Self-reported confidence to resist, same scale
    pub resistance: f64,
    /// Emotion tags selected from the preset chips, lowercase and deduplicated
    pub emotions: Vec<String>,
    /// Timestamp the craving was logged (Unix ms)
    pub logged_at: i64,
    /// Soft archive flag
    pub is_archived: bool,
}

impl Craving {
    /// Create a new craving logged at the current time
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        intensity: f64,
        resistance: f64,
        emotions: Vec<String>,
    ) -> Self {
        Self {
            id: CravingId::new(),
            description: description.into(),
            intensity,
            resistance,
            emotions: normalize_emotions(emotions),
            logged_at: chrono::Utc::now().timestamp_millis(),
            is_archived: false,
        }
    }

    /// Get first line as a card title, truncated to `max_len` characters
    #[must_use]
    pub fn title_preview(&self, max_len: usize) -> String {
        self.description
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }

    /// Check if the description is empty (whitespace-only counts as empty)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty()
    }
}

/// Lowercase and deduplicate emotion tags, keeping first-selected order.
///
/// Blank entries are dropped. The logging screen only offers
/// [`EMOTION_PRESETS`], but stored rows are normalized again on read so the
/// invariant holds regardless of where the data came from.
#[must_use]
pub fn normalize_emotions(emotions: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for emotion in emotions {
        let normalized = emotion.trim().to_lowercase();
        if !normalized.is_empty() && !seen.contains(&normalized) {
            seen.push(normalized);
        }
    }
    seen
}
