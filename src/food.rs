use std::collections::HashSet;

use rand::Rng;

use crate::config::GridSize;
use crate::snake::Position;

/// Random draws tried before falling back to a full scan of the grid.
pub const SPAWN_SAMPLE_ATTEMPTS: usize = 256;

/// Places food on cells the snake does not occupy.
#[derive(Debug, Clone, Copy)]
pub struct FoodSpawner {
    bounds: GridSize,
    max_attempts: usize,
}

impl FoodSpawner {
    #[must_use]
    pub fn new(bounds: GridSize) -> Self {
        Self {
            bounds,
            max_attempts: SPAWN_SAMPLE_ATTEMPTS,
        }
    }

    /// Overrides the number of random draws before the scan fallback.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Picks a free cell.
    ///
    /// Draws uniformly until a cell outside `excluded` turns up. After
    /// `max_attempts` misses the grid is scanned row by row and the first free
    /// cell wins. Returns `None` only when every cell is excluded.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        excluded: &HashSet<Position>,
    ) -> Option<Position> {
        if self.bounds.total_cells() == 0 {
            return None;
        }

        for _ in 0..self.max_attempts {
            let candidate = Position {
                x: rng.gen_range(0..i32::from(self.bounds.width)),
                y: rng.gen_range(0..i32::from(self.bounds.height)),
            };
            if !excluded.contains(&candidate) {
                return Some(candidate);
            }
        }

        first_free_cell(self.bounds, excluded)
    }
}

fn first_free_cell(bounds: GridSize, excluded: &HashSet<Position>) -> Option<Position> {
    (0..i32::from(bounds.height))
        .flat_map(|y| (0..i32::from(bounds.width)).map(move |x| Position { x, y }))
        .find(|position| !excluded.contains(position))
}
