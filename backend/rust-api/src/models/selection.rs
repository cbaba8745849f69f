use serde::{Deserialize, Serialize};

/// Tracks which puzzles have already been mailed and which pool the next
/// challenge puzzle comes from. Lists keep insertion order but are used as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCounter {
    #[serde(default)]
    pub used_ids: Vec<String>,
    #[serde(default)]
    pub used_titles: Vec<String>,
    #[serde(default)]
    pub alternator: u64,
}
