use std::collections::HashSet;
use std::path::Path;

use crate::error::CatalogError;
use crate::models::puzzle::{Difficulty, Puzzle};

/// Static, ordered puzzle collection loaded once at startup.
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    puzzles: Vec<Puzzle>,
}

impl PuzzleCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let puzzles: Vec<Puzzle> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Loaded {} puzzles from {}", puzzles.len(), path.display());

        Self::from_puzzles(puzzles)
    }

    pub fn from_puzzles(puzzles: Vec<Puzzle>) -> Result<Self, CatalogError> {
        if puzzles.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for puzzle in &puzzles {
            if !seen.insert(puzzle.id.as_str()) {
                tracing::warn!("Duplicate puzzle id in catalog: {}", puzzle.id);
            }
        }

        Ok(Self { puzzles })
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Returns (easy, medium, hard) totals.
    pub fn count_by_difficulty(&self) -> (usize, usize, usize) {
        self.puzzles
            .iter()
            .fold((0, 0, 0), |(easy, medium, hard), p| match p.difficulty {
                Difficulty::Easy => (easy + 1, medium, hard),
                Difficulty::Medium => (easy, medium + 1, hard),
                Difficulty::Hard => (easy, medium, hard + 1),
            })
    }
}
