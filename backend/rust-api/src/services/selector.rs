use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

use crate::error::SelectionError;
use crate::metrics::PUZZLE_SELECTIONS_TOTAL;
use crate::models::puzzle::{Difficulty, Puzzle};
use crate::models::selection::SelectionCounter;

/// Pool the second puzzle is drawn from: hard on even alternator values,
/// medium on odd ones.
pub fn challenge_pool(alternator: u64) -> Difficulty {
    if alternator % 2 == 0 {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    }
}

/// Picks one fresh easy puzzle and one fresh puzzle from the alternating
/// hard/medium pool, then records both in `counter`.
///
/// A puzzle is fresh when neither its id nor its title has been used. On
/// error the counter is left untouched.
pub fn select_diverse<R: Rng + ?Sized>(
    puzzles: &[Puzzle],
    counter: &mut SelectionCounter,
    rng: &mut R,
) -> Result<[Puzzle; 2], SelectionError> {
    let pool = challenge_pool(counter.alternator);

    let (easy_pick, pool_pick) = {
        let used_ids: HashSet<&str> = counter.used_ids.iter().map(String::as_str).collect();
        let used_titles: HashSet<&str> = counter.used_titles.iter().map(String::as_str).collect();

        let fresh = puzzles.iter().filter(|p| {
            !used_ids.contains(p.id.as_str()) && !used_titles.contains(p.title.as_str())
        });

        let mut easy = Vec::new();
        let mut challenge = Vec::new();
        for puzzle in fresh {
            if puzzle.difficulty == Difficulty::Easy {
                easy.push(puzzle);
            } else if puzzle.difficulty == pool {
                challenge.push(puzzle);
            }
        }

        match (easy.choose(rng), challenge.choose(rng)) {
            (Some(e), Some(c)) => ((*e).clone(), (*c).clone()),
            _ => {
                PUZZLE_SELECTIONS_TOTAL
                    .with_label_values(&[pool.as_str(), "exhausted"])
                    .inc();
                return Err(SelectionError::Exhausted {
                    easy_available: easy.len(),
                    pool,
                    pool_available: challenge.len(),
                });
            }
        }
    };

    for puzzle in [&easy_pick, &pool_pick] {
        counter.used_ids.push(puzzle.id.clone());
        counter.used_titles.push(puzzle.title.clone());
    }
    counter.alternator += 1;

    PUZZLE_SELECTIONS_TOTAL
        .with_label_values(&[pool.as_str(), "selected"])
        .inc();

    Ok([easy_pick, pool_pick])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn puzzle(id: &str, title: &str, difficulty: Difficulty) -> Puzzle {
        Puzzle {
            id: id.to_string(),
            title: title.to_string(),
            difficulty,
            question: format!("Question {}", id),
            hint: None,
            answer: None,
            solution: None,
        }
    }

    fn sample_catalog() -> Vec<Puzzle> {
        vec![
            puzzle("e1", "Easy One", Difficulty::Easy),
            puzzle("e2", "Easy Two", Difficulty::Easy),
            puzzle("m1", "Medium One", Difficulty::Medium),
            puzzle("h1", "Hard One", Difficulty::Hard),
        ]
    }

    #[test]
    fn test_even_alternator_draws_hard() {
        let catalog = sample_catalog();
        let mut counter = SelectionCounter::default();
        let mut rng = StdRng::seed_from_u64(7);

        let [easy, challenge] = select_diverse(&catalog, &mut counter, &mut rng).unwrap();

        assert_eq!(easy.difficulty, Difficulty::Easy);
        assert!(easy.id == "e1" || easy.id == "e2");
        assert_eq!(challenge.id, "h1");
        assert_eq!(counter.used_ids.len(), 2);
        assert!(counter.used_ids.contains(&easy.id));
        assert!(counter.used_ids.contains(&"h1".to_string()));
        assert!(counter.used_titles.contains(&easy.title));
        assert!(counter.used_titles.contains(&"Hard One".to_string()));
        assert_eq!(counter.alternator, 1);
    }

    #[test]
    fn test_odd_alternator_draws_medium() {
        let catalog = sample_catalog();
        let mut counter = SelectionCounter {
            alternator: 1,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);

        let [_, challenge] = select_diverse(&catalog, &mut counter, &mut rng).unwrap();

        assert_eq!(challenge.id, "m1");
        assert_eq!(counter.alternator, 2);
    }

    #[test]
    fn test_consecutive_selections_alternate_pools() {
        let catalog = sample_catalog();
        let mut counter = SelectionCounter::default();
        let mut rng = StdRng::seed_from_u64(1);

        let first = select_diverse(&catalog, &mut counter, &mut rng).unwrap();
        let second = select_diverse(&catalog, &mut counter, &mut rng).unwrap();

        assert_eq!(first[1].difficulty, Difficulty::Hard);
        assert_eq!(second[1].difficulty, Difficulty::Medium);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(counter.used_ids.len(), 4);
        assert_eq!(counter.alternator, 2);
    }

    #[test]
    fn test_exhausted_pool_leaves_counter_untouched() {
        let catalog = sample_catalog();
        let mut counter = SelectionCounter {
            used_ids: vec!["e1".into(), "e2".into(), "m1".into(), "h1".into()],
            used_titles: vec![],
            alternator: 4,
        };
        let before = counter.clone();
        let mut rng = StdRng::seed_from_u64(3);

        let err = select_diverse(&catalog, &mut counter, &mut rng).unwrap_err();

        assert_eq!(
            err,
            SelectionError::Exhausted {
                easy_available: 0,
                pool: Difficulty::Hard,
                pool_available: 0,
            }
        );
        assert_eq!(counter, before);
    }

    #[test]
    fn test_missing_challenge_pool_is_exhaustion() {
        let catalog = vec![
            puzzle("e1", "Easy One", Difficulty::Easy),
            puzzle("m1", "Medium One", Difficulty::Medium),
        ];
        let mut counter = SelectionCounter::default();
        let mut rng = StdRng::seed_from_u64(3);

        let err = select_diverse(&catalog, &mut counter, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::Exhausted {
                easy_available: 1,
                pool: Difficulty::Hard,
                pool_available: 0,
            }
        ));
    }

    #[test]
    fn test_used_title_excludes_puzzle_with_new_id() {
        let catalog = vec![
            puzzle("e1", "Shared Title", Difficulty::Easy),
            puzzle("e2", "Fresh Easy", Difficulty::Easy),
            puzzle("h1", "Hard One", Difficulty::Hard),
        ];
        let mut counter = SelectionCounter {
            used_ids: vec!["old".into()],
            used_titles: vec!["Shared Title".into()],
            alternator: 0,
        };

        for seed in 0..16 {
            let mut attempt = counter.clone();
            let mut rng = StdRng::seed_from_u64(seed);
            let [easy, _] = select_diverse(&catalog, &mut attempt, &mut rng).unwrap();
            assert_eq!(easy.id, "e2");
        }

        let mut rng = StdRng::seed_from_u64(0);
        select_diverse(&catalog, &mut counter, &mut rng).unwrap();
        assert_eq!(counter.used_ids, vec!["old", "e2", "h1"]);
    }

    #[test]
    fn test_same_seed_gives_same_draw() {
        let catalog: Vec<Puzzle> = (0..20)
            .map(|i| {
                let difficulty = if i % 2 == 0 {
                    Difficulty::Easy
                } else {
                    Difficulty::Hard
                };
                puzzle(&i.to_string(), &format!("Puzzle {}", i), difficulty)
            })
            .collect();

        let mut first_counter = SelectionCounter::default();
        let mut second_counter = SelectionCounter::default();
        let first = select_diverse(&catalog, &mut first_counter, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let second = select_diverse(&catalog, &mut second_counter, &mut StdRng::seed_from_u64(99))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first_counter, second_counter);
    }

    #[test]
    fn test_challenge_pool_parity() {
        assert_eq!(challenge_pool(0), Difficulty::Hard);
        assert_eq!(challenge_pool(1), Difficulty::Medium);
        assert_eq!(challenge_pool(10), Difficulty::Hard);
    }
}
