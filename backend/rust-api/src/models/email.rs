use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    Question,
    Hint,
    Solution,
}

impl SendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendMode::Question => "question",
            SendMode::Hint => "hint",
            SendMode::Solution => "solution",
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            SendMode::Question => "🧩 Your Daily Puzzle Challenge",
            SendMode::Hint => "💡 Hints for Today’s Puzzle",
            SendMode::Solution => "✅ Solutions to Today’s Puzzle",
        }
    }

    /// Plain-text body returned by the trigger endpoints.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            SendMode::Question => "✅ Sent question email",
            SendMode::Hint => "✅ Sent hint email",
            SendMode::Solution => "✅ Sent solution email",
        }
    }
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    pub mode: SendMode,
    pub subject: String,
    pub puzzle_ids: Vec<String>,
}
