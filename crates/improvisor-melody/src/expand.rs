//! Pattern expansion: every permutation, octave variant and inversion of a
//! pattern library over one chord.

use std::collections::HashSet;

use improvisor_spec::chord::{ChordSymbol, PitchName, Quality};
use improvisor_spec::pattern::CellPattern;

use crate::cell::{build_cell_in, MelodicCell};
use crate::pitch::Interval;
use crate::scale::Scale;

/// All cells usable over one chord.
///
/// Duplicates are kept unless [`CandidatePool::deduplicate`] is called; a
/// cell that appears twice is twice as likely to be picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidatePool {
    cells: Vec<MelodicCell>,
}

impl CandidatePool {
    pub fn cells(&self) -> &[MelodicCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Removes repeated cells, keeping the first occurrence of each.
    pub fn deduplicate(&mut self) {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.cells.retain(|cell| seen.insert(cell.clone()));
    }
}

/// Index permutations of `0..len` in lexicographic order.
pub fn index_permutations(len: usize) -> Vec<Vec<usize>> {
    let mut current: Vec<usize> = (0..len).collect();
    let mut out = vec![current.clone()];
    if len < 2 {
        return out;
    }
    loop {
        // next lexicographic permutation
        let Some(pivot) = (0..len - 1).rev().find(|&i| current[i] < current[i + 1]) else {
            return out;
        };
        let swap = (pivot + 1..len)
            .rev()
            .find(|&j| current[j] > current[pivot])
            .unwrap_or(pivot + 1);
        current.swap(pivot, swap);
        current[pivot + 1..].reverse();
        out.push(current.clone());
    }
}

/// Expands a pattern library over one root and quality.
///
/// For each pattern, every positional permutation (repeated degrees are not
/// collapsed) yields a cell and the same cell an octave lower. Every such
/// cell is then followed by its inversions. A pattern of length `L`
/// contributes `L! * 2 * L` cells.
pub fn expand(root: PitchName, quality: Quality, patterns: &[CellPattern]) -> CandidatePool {
    let scale = Scale::new(root, quality);

    let mut base_cells = Vec::new();
    for pattern in patterns {
        let degrees = pattern.degrees();
        for order in index_permutations(degrees.len()) {
            let permuted: Vec<i32> = order.iter().map(|&i| degrees[i]).collect();
            let cell = build_cell_in(&permuted, &scale);
            let lower = cell.transpose(Interval::OCTAVE.down());
            base_cells.push(cell);
            base_cells.push(lower);
        }
    }

    let cells = base_cells
        .iter()
        .filter(|cell| !cell.is_empty())
        .flat_map(MelodicCell::inversions)
        .collect();

    CandidatePool { cells }
}

/// Expands the library over a parsed chord symbol.
pub fn expand_chord(chord: &ChordSymbol, patterns: &[CellPattern]) -> CandidatePool {
    expand(chord.root, chord.quality, patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn a() -> PitchName {
        "A".parse().unwrap()
    }

    #[test]
    fn test_index_permutations_order() {
        assert_eq!(
            index_permutations(3),
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
        assert_eq!(index_permutations(4).len(), 24);
        assert_eq!(index_permutations(1), vec![vec![0]]);
    }

    #[test]
    fn test_pool_size() {
        let patterns = [CellPattern::new(vec![1, 2, 3, 5])];
        assert_eq!(expand(a(), Quality::Minor, &patterns).len(), 192);

        let three = [CellPattern::new(vec![1, 3, 5])];
        assert_eq!(expand(a(), Quality::Minor, &three).len(), 36);
    }

    #[test]
    fn test_repeated_degrees_not_collapsed() {
        let patterns = [CellPattern::new(vec![1, 2, 3, 1])];
        let pool = expand(a(), Quality::Minor, &patterns);
        assert_eq!(pool.len(), 192);

        let mut deduped = pool.clone();
        deduped.deduplicate();
        assert!(deduped.len() < pool.len());
    }

    #[test]
    fn test_pool_order() {
        let patterns = [CellPattern::new(vec![1, 2])];
        let pool = expand(a(), Quality::Minor, &patterns);
        let midi: Vec<Vec<i32>> = pool.cells().iter().map(|c| c.midi()).collect();
        assert_eq!(
            midi,
            vec![
                // [1, 2] and its inversion
                vec![69, 71],
                vec![71, 81],
                // an octave lower
                vec![57, 59],
                vec![59, 69],
                // [2, 1]
                vec![71, 69],
                vec![69, 83],
                vec![59, 57],
                vec![57, 71],
            ]
        );
    }

    #[test]
    fn test_library_concatenates_in_order() {
        let patterns = [CellPattern::new(vec![1]), CellPattern::new(vec![5])];
        let pool = expand(a(), Quality::Minor, &patterns);
        let firsts: Vec<i32> = pool.cells().iter().map(|c| c.midi()[0]).collect();
        assert_eq!(firsts, vec![69, 57, 76, 64]);
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let patterns = [CellPattern::new(vec![5, 6, 7, 8]), CellPattern::new(vec![5, 6, 7, 8])];
        let mut pool = expand(a(), Quality::Minor, &patterns);
        assert_eq!(pool.len(), 384);
        let head: Vec<_> = pool.cells()[..10].to_vec();
        pool.deduplicate();
        assert_eq!(pool.len(), 192);
        assert_eq!(&pool.cells()[..10], head.as_slice());
    }
}
