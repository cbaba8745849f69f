use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry. Field names follow the catalog JSON, which capitalizes
/// the content fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    #[serde(deserialize_with = "deserialize_puzzle_id")]
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Hint", default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "Answer", default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(rename = "Solution", default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

// Catalog ids show up both as strings and as bare integers.
fn deserialize_puzzle_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(number) => number.to_string(),
    })
}
