use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::Question;

/// Category id meaning "questions from every category".
pub const ALL_CATEGORIES: i64 = 0;

/// Shared random source for quiz selection. Seed it to make selection
/// reproducible.
#[derive(Clone)]
pub struct QuizRng(Arc<Mutex<StdRng>>);

impl QuizRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Arc::new(Mutex::new(StdRng::seed_from_u64(seed))))
    }

    pub fn from_entropy() -> Self {
        Self(Arc::new(Mutex::new(StdRng::from_entropy())))
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    pub fn select_next(&self, candidates: Vec<Question>, previous: &[i64]) -> Option<Question> {
        let mut rng = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        select_next(candidates, previous, &mut *rng)
    }
}

/// Drops every candidate whose id is in `previous` and picks one of the rest
/// uniformly. `None` once all candidates have been seen.
pub fn select_next<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    previous: &[i64],
    rng: &mut R,
) -> Option<Question> {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let mut remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();
    if remaining.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..remaining.len());
    Some(remaining.swap_remove(idx))
}
