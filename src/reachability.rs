use std::collections::{HashSet, VecDeque};

use crate::grid::{Cell, GridBounds};
use crate::snake::ObstacleSet;

/// Counts cells reachable from `start` without entering `obstacles`,
/// stopping early once `depth_budget` cells have been counted.
///
/// `start` itself is always counted. Used as a free-space metric only.
#[must_use]
pub fn reachable_count(
    bounds: GridBounds,
    start: Cell,
    obstacles: &ObstacleSet,
    depth_budget: usize,
) -> usize {
    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut count = 0;

    while let Some(current) = queue.pop_front() {
        count += 1;
        if count >= depth_budget {
            return count;
        }

        for next in bounds.neighbors4(current) {
            if !obstacles.contains(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    count
}

/// [`reachable_count`] with the whole grid area as the budget.
#[must_use]
pub fn reachable_space(bounds: GridBounds, start: Cell, obstacles: &ObstacleSet) -> usize {
    reachable_count(bounds, start, obstacles, bounds.area())
}
