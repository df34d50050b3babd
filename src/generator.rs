//! Constrained random pattern generation
//!
//! A pattern picks a small pool of scale degrees (always including the root)
//! and then fills every step with one pitch drawn from that pool.
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::TheoryError;
use crate::theory::Pitch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPattern {
    /// Root first, then the drawn degrees.
    pub pool: Vec<Pitch>,
    /// `(step_index, pitch)` for every step in order.
    pub steps: Vec<(usize, Pitch)>,
}

pub fn generate<R: Rng + ?Sized>(
    degrees: &[Pitch],
    note_count: usize,
    step_count: usize,
    rng: &mut R,
) -> Result<GeneratedPattern, TheoryError> {
    let Some((&root, non_root)) = degrees.split_first() else {
        return Err(TheoryError::InvalidNoteCount {
            requested: note_count,
            available: 0,
        });
    };
    if note_count == 0 || note_count - 1 > non_root.len() {
        return Err(TheoryError::InvalidNoteCount {
            requested: note_count,
            available: degrees.len(),
        });
    }

    let mut pool = Vec::with_capacity(note_count);
    pool.push(root);
    pool.extend(non_root.choose_multiple(rng, note_count - 1).copied());

    // pool always holds the root
    let steps = (0..step_count)
        .map(|step| (step, pool[rng.random_range(0..pool.len())]))
        .collect();

    tracing::debug!(note_count, step_count, ?pool, "generated pattern");
    Ok(GeneratedPattern { pool, steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{build_chromatic, select_degrees, Mode, PitchClass};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    fn c_ionian() -> Vec<Pitch> {
        select_degrees(&build_chromatic(PitchClass::C, 4), Mode::Ionian.steps()).unwrap()
    }

    #[test]
    fn test_pool_of_three() {
        let degrees = c_ionian();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let pattern = generate(&degrees, 3, 16, &mut rng).unwrap();
            let pool: HashSet<Pitch> = pattern.pool.iter().copied().collect();
            assert_eq!(pool.len(), 3);
            assert_eq!(pattern.pool[0], degrees[0]);
            assert!(pattern.pool.iter().all(|p| degrees.contains(p)));

            assert_eq!(pattern.steps.len(), 16);
            for (i, (step, pitch)) in pattern.steps.iter().enumerate() {
                assert_eq!(*step, i);
                assert!(pool.contains(pitch));
            }
        }
    }

    #[test]
    fn test_single_note_is_all_root() {
        let degrees = c_ionian();
        let mut rng = Pcg32::seed_from_u64(1);
        let pattern = generate(&degrees, 1, 16, &mut rng).unwrap();
        assert_eq!(pattern.pool, vec![degrees[0]]);
        assert!(pattern.steps.iter().all(|(_, p)| *p == degrees[0]));
    }

    #[test]
    fn test_full_pool_uses_every_degree() {
        let degrees = c_ionian();
        let mut rng = Pcg32::seed_from_u64(3);
        let pattern = generate(&degrees, 7, 16, &mut rng).unwrap();
        let pool: HashSet<Pitch> = pattern.pool.iter().copied().collect();
        let all: HashSet<Pitch> = degrees.iter().copied().collect();
        assert_eq!(pool, all);
    }

    #[test]
    fn test_steps_draw_from_whole_pool() {
        let degrees = c_ionian();
        let mut rng = Pcg32::seed_from_u64(21);
        let pattern = generate(&degrees, 2, 256, &mut rng).unwrap();
        let used: HashSet<Pitch> = pattern.steps.iter().map(|(_, p)| *p).collect();
        let pool: HashSet<Pitch> = pattern.pool.iter().copied().collect();
        assert_eq!(used, pool);
    }

    #[test]
    fn test_rejects_bad_note_counts() {
        let degrees = c_ionian();
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            generate(&degrees, 8, 16, &mut rng),
            Err(TheoryError::InvalidNoteCount {
                requested: 8,
                available: 7
            })
        );
        assert_eq!(
            generate(&degrees, 0, 16, &mut rng),
            Err(TheoryError::InvalidNoteCount {
                requested: 0,
                available: 7
            })
        );
        assert_eq!(
            generate(&[], 1, 16, &mut rng),
            Err(TheoryError::InvalidNoteCount {
                requested: 1,
                available: 0
            })
        );
    }

    #[test]
    fn test_same_seed_same_pattern() {
        let degrees = c_ionian();
        let a = generate(&degrees, 4, 16, &mut Pcg32::seed_from_u64(42)).unwrap();
        let b = generate(&degrees, 4, 16, &mut Pcg32::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_steps() {
        let degrees = c_ionian();
        let pattern = generate(&degrees, 2, 0, &mut Pcg32::seed_from_u64(5)).unwrap();
        assert_eq!(pattern.pool.len(), 2);
        assert!(pattern.steps.is_empty());
    }
}
