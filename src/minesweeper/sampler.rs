//! Random selection of mine positions.

use mockall::automock;
use rand::{SeedableRng, rngs::StdRng, seq::index};

use crate::minesweeper::Coord;

/// Picks distinct cell coordinates for mine placement.
///
/// Implementations must return exactly `count` distinct coordinates inside a
/// `width` x `height` grid, none of them equal to `excluding`. The caller
/// guarantees `count < width * height`.
#[automock]
pub trait MineSampler: Send {
    fn sample_distinct(
        &mut self,
        width: usize,
        height: usize,
        count: usize,
        excluding: Coord,
    ) -> Vec<Coord>;
}

/// Uniform sampler without replacement backed by [`StdRng`].
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    /// Creates a sampler seeded from the operating system.
    pub fn from_entropy() -> Self {
        RandomSampler {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic sampler.
    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        RandomSampler {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MineSampler for RandomSampler {
    fn sample_distinct(
        &mut self,
        width: usize,
        height: usize,
        count: usize,
        (exclude_row, exclude_col): Coord,
    ) -> Vec<Coord> {
        let area = width * height;
        let excluded = exclude_row * width + exclude_col;
        // Sample over every index but the excluded one, then shift indices past it
        let count = count.min(area.saturating_sub(1));

        index::sample(&mut self.rng, area - 1, count)
            .into_iter()
            .map(|i| if i >= excluded { i + 1 } else { i })
            .map(|i| (i / width, i % width))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_sample_never_contains_excluded_coord() {
        let mut sampler = RandomSampler::seeded(7);
        for seed_round in 0..200 {
            let excluded = (seed_round % 5, (seed_round / 5) % 4);
            let mines = sampler.sample_distinct(4, 5, 19, excluded);
            assert_eq!(mines.len(), 19);
            assert!(!mines.contains(&excluded));
        }
    }

    #[test]
    fn test_sample_is_distinct_and_in_bounds() {
        let mut sampler = RandomSampler::seeded(42);
        let mines = sampler.sample_distinct(8, 8, 10, (3, 3));

        let unique: HashSet<_> = mines.iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(mines.iter().all(|&(row, col)| row < 8 && col < 8));
    }

    #[test]
    fn test_sample_full_board_leaves_only_excluded_cell() {
        let mut sampler = RandomSampler::seeded(1);
        let mines = sampler.sample_distinct(3, 2, 5, (1, 2));

        let expected: HashSet<Coord> = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)].into();
        assert_eq!(mines.into_iter().collect::<HashSet<_>>(), expected);
    }

    #[test]
    fn test_sample_zero_mines() {
        let mut sampler = RandomSampler::seeded(3);
        assert!(sampler.sample_distinct(1, 1, 0, (0, 0)).is_empty());
    }
}
