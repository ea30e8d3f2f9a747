use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::maze::Cell;

/// Picks the next chase target from a fixed candidate list.
///
/// Draws are uniform, redrawn whenever they land on the previous pick, so the
/// same candidate never comes up twice in a row.
#[derive(Debug, Clone)]
pub struct GoalPicker {
    candidates: Vec<Cell>,
    last: Option<usize>,
    rng: StdRng,
}

impl GoalPicker {
    /// `seed` makes the sequence reproducible; `None` draws from OS entropy.
    pub fn new(candidates: Vec<Cell>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { candidates, last: None, rng }
    }

    pub fn candidates(&self) -> &[Cell] {
        &self.candidates
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Treat `index` as the previous pick, e.g. for the goal the chase starts with.
    pub fn mark_last(&mut self, index: usize) {
        self.last = Some(index);
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.candidates.iter().position(|c| *c == cell)
    }

    pub fn pick(&mut self) -> Option<(usize, Cell)> {
        self.pick_excluding(&[])
    }

    /// Like [`GoalPicker::pick`], additionally skipping `excluded` indices
    /// (candidates that just turned out to be unreachable).
    ///
    /// `None` when no allowed candidate remains.
    pub fn pick_excluding(&mut self, excluded: &[usize]) -> Option<(usize, Cell)> {
        let allowed = |i: usize| Some(i) != self.last && !excluded.contains(&i);
        if !(0..self.candidates.len()).any(allowed) {
            return None;
        }

        let mut index = self.rng.random_range(0..self.candidates.len());
        while !allowed(index) {
            index = self.rng.random_range(0..self.candidates.len());
        }

        self.last = Some(index);
        Some((index, self.candidates[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candidates() -> Vec<Cell> {
        vec![
            Cell::new(1, 1),
            Cell::new(1, 5),
            Cell::new(1, 8),
            Cell::new(1, 12),
            Cell::new(8, 12),
            Cell::new(8, 8),
            Cell::new(8, 1),
        ]
    }

    #[test]
    fn test_never_repeats_previous_pick() {
        let mut picker = GoalPicker::new(sample_candidates(), Some(7));
        let mut previous = None;
        let mut seen = [0usize; 7];

        for _ in 0..5000 {
            let (index, cell) = picker.pick().unwrap();
            assert_ne!(Some(index), previous, "Picked index {} twice in a row", index);
            assert_eq!(cell, sample_candidates()[index]);
            seen[index] += 1;
            previous = Some(index);
        }

        // Every candidate shows up over many draws.
        assert!(seen.iter().all(|&count| count > 500), "Skewed draws: {:?}", seen);
    }

    #[test]
    fn test_mark_last_excludes_initial_goal() {
        let mut picker = GoalPicker::new(vec![Cell::new(1, 1), Cell::new(2, 2)], Some(1));
        picker.mark_last(1);
        assert_eq!(picker.pick(), Some((0, Cell::new(1, 1))));
        assert_eq!(picker.pick(), Some((1, Cell::new(2, 2))));
        assert_eq!(picker.pick(), Some((0, Cell::new(1, 1))));
    }

    #[test]
    fn test_no_distinct_candidate_returns_none() {
        let mut empty = GoalPicker::new(Vec::new(), Some(3));
        assert_eq!(empty.pick(), None);

        let mut single = GoalPicker::new(vec![Cell::new(4, 4)], Some(3));
        assert_eq!(single.pick(), Some((0, Cell::new(4, 4))));
        assert_eq!(single.pick(), None);
    }

    #[test]
    fn test_excluded_indices_are_skipped() {
        let mut picker = GoalPicker::new(sample_candidates(), Some(11));
        picker.mark_last(0);
        for _ in 0..200 {
            let (index, _) = picker.pick_excluding(&[1, 2, 3, 4, 5]).unwrap();
            // Only index 6 is allowed after 0; only 0 after 6.
            assert!(index == 6 || index == 0);
        }
        picker.mark_last(6);
        assert_eq!(picker.pick_excluding(&[0, 1, 2, 3, 4, 5]), None);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = GoalPicker::new(sample_candidates(), Some(99));
        let mut b = GoalPicker::new(sample_candidates(), Some(99));
        for _ in 0..50 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_index_of_finds_candidate() {
        let picker = GoalPicker::new(sample_candidates(), Some(0));
        assert_eq!(picker.index_of(Cell::new(8, 12)), Some(4));
        assert_eq!(picker.index_of(Cell::new(3, 3)), None);
    }
}
