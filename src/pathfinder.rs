use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::config::{HUNT_OPENNESS_WEIGHT_HALF_STEPS, path_budget};
use crate::grid::{Cell, GridBounds};
use crate::snake::ObstacleSet;

/// Heuristic used to order the A* frontier.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Heuristic {
    /// Manhattan distance to the goal.
    Simple,
    /// Manhattan distance plus 1.5 per free neighbour of the candidate cell.
    Hunt,
}

/// Budgeted A* search over the playable interior.
///
/// Costs are kept in half-steps so the 1.5 hunt weight stays integral.
#[derive(Debug, Clone, Copy)]
pub struct Pathfinder {
    bounds: GridBounds,
    step_budget: usize,
}

impl Pathfinder {
    /// Creates a pathfinder with the default budget for `bounds`.
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        Self::with_budget(bounds, path_budget(bounds.area()))
    }

    #[must_use]
    pub fn with_budget(bounds: GridBounds, step_budget: usize) -> Self {
        Self {
            bounds,
            step_budget,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    #[must_use]
    pub fn step_budget(&self) -> usize {
        self.step_budget
    }

    /// Finds a path from `start` to `goal` avoiding `obstacles`.
    ///
    /// The returned cells start one step after `start` and end with `goal`;
    /// `start == goal` yields an empty path. `goal` is enterable even when it
    /// is listed in `obstacles`. Returns `None` when the goal is unreachable
    /// or the expansion budget runs out first.
    #[must_use]
    pub fn find_path(
        &self,
        start: Cell,
        goal: Cell,
        obstacles: &ObstacleSet,
        heuristic: Heuristic,
    ) -> Option<Vec<Cell>> {
        if start == goal {
            return Some(Vec::new());
        }

        let mut frontier = BinaryHeap::new();
        let mut came_from: HashMap<Cell, Cell> = HashMap::new();
        let mut cost_so_far: HashMap<Cell, u32> = HashMap::new();
        let mut sequence: u64 = 0;

        cost_so_far.insert(start, 0);
        frontier.push(Reverse((0_u32, sequence, start)));

        let mut expansions = 0_usize;
        while let Some(Reverse((_, _, current))) = frontier.pop() {
            expansions += 1;
            if expansions > self.step_budget {
                trace!(?start, ?goal, budget = self.step_budget, "path search budget exhausted");
                return None;
            }

            if current == goal {
                return Some(reconstruct_path(&came_from, start, goal));
            }

            let current_cost = cost_so_far.get(&current).copied().unwrap_or(0);
            for next in self.bounds.neighbors4(current) {
                if next != goal && obstacles.contains(next) {
                    continue;
                }

                let new_cost = current_cost + 2;
                let improved = cost_so_far
                    .get(&next)
                    .is_none_or(|&known| new_cost < known);
                if !improved {
                    continue;
                }

                cost_so_far.insert(next, new_cost);
                came_from.insert(next, current);
                sequence += 1;
                let priority = new_cost + self.estimate(next, goal, obstacles, heuristic);
                frontier.push(Reverse((priority, sequence, next)));
            }
        }

        None
    }

    fn estimate(&self, cell: Cell, goal: Cell, obstacles: &ObstacleSet, heuristic: Heuristic) -> u32 {
        let distance = cell.manhattan(goal) * 2;
        match heuristic {
            Heuristic::Simple => distance,
            Heuristic::Hunt => {
                let free = self
                    .bounds
                    .neighbors4(cell)
                    .filter(|neighbor| !obstacles.contains(*neighbor))
                    .count();
                let free = u32::try_from(free).unwrap_or(0);
                distance + free * HUNT_OPENNESS_WEIGHT_HALF_STEPS
            }
        }
    }
}

fn reconstruct_path(came_from: &HashMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        path.push(current);
        match came_from.get(&current) {
            Some(previous) => current = *previous,
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::{Heuristic, Pathfinder};
    use crate::grid::{Cell, GridBounds};
    use crate::snake::ObstacleSet;

    fn bounds(width: i32, height: i32) -> GridBounds {
        GridBounds::with_size(width, height).expect("valid bounds")
    }

    fn assert_connected(start: Cell, path: &[Cell]) {
        let mut previous = start;
        for cell in path {
            assert_eq!(previous.manhattan(*cell), 1, "{previous:?} -> {cell:?}");
            previous = *cell;
        }
    }

    #[test]
    fn open_grid_path_is_shortest() {
        let finder = Pathfinder::new(bounds(10, 10));
        let start = Cell::new(2, 2);
        let goal = Cell::new(7, 5);

        let path = finder
            .find_path(start, goal, &ObstacleSet::default(), Heuristic::Simple)
            .expect("open grid is fully connected");

        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&goal));
        assert!(!path.contains(&start));
        assert_connected(start, &path);
    }

    #[test]
    fn path_detours_around_wall() {
        let finder = Pathfinder::new(bounds(7, 7));
        // Vertical wall in column 4 with a gap at the bottom row.
        let wall: ObstacleSet = (1..=6).map(|row| Cell::new(row, 4)).collect();
        let start = Cell::new(1, 2);
        let goal = Cell::new(1, 6);

        let path = finder
            .find_path(start, goal, &wall, Heuristic::Simple)
            .expect("gap at the bottom keeps the goal reachable");

        assert!(path.iter().all(|cell| !wall.contains(*cell)));
        assert!(path.contains(&Cell::new(7, 4)));
        assert_eq!(path.len(), 16);
        assert_connected(start, &path);
    }

    #[test]
    fn walled_off_goal_has_no_path() {
        let finder = Pathfinder::new(bounds(7, 7));
        let wall: ObstacleSet = (1..=7).map(|row| Cell::new(row, 4)).collect();

        assert!(
            finder
                .find_path(Cell::new(3, 1), Cell::new(3, 7), &wall, Heuristic::Simple)
                .is_none()
        );
    }

    #[test]
    fn goal_listed_as_obstacle_is_still_enterable() {
        let finder = Pathfinder::new(bounds(5, 5));
        let goal = Cell::new(1, 3);
        let obstacles: ObstacleSet = [goal].into_iter().collect();

        let path = finder.find_path(Cell::new(1, 1), goal, &obstacles, Heuristic::Simple);

        assert_eq!(path, Some(vec![Cell::new(1, 2), goal]));
    }

    #[test]
    fn start_equal_to_goal_is_empty_path() {
        let finder = Pathfinder::new(bounds(5, 5));
        let cell = Cell::new(2, 2);

        assert_eq!(
            finder.find_path(cell, cell, &ObstacleSet::default(), Heuristic::Hunt),
            Some(Vec::new())
        );
    }

    #[test]
    fn exhausted_budget_reports_no_path() {
        let finder = Pathfinder::with_budget(bounds(20, 20), 3);

        assert!(
            finder
                .find_path(
                    Cell::new(1, 1),
                    Cell::new(20, 20),
                    &ObstacleSet::default(),
                    Heuristic::Simple
                )
                .is_none()
        );
    }

    #[test]
    fn hunt_heuristic_still_reaches_goal() {
        let finder = Pathfinder::new(bounds(12, 12));
        let obstacles: ObstacleSet = (3..=9).map(|col| Cell::new(6, col)).collect();
        let start = Cell::new(8, 6);
        let goal = Cell::new(3, 6);

        let path = finder
            .find_path(start, goal, &obstacles, Heuristic::Hunt)
            .expect("goal reachable around the bar");

        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|cell| !obstacles.contains(*cell)));
        assert_connected(start, &path);
    }

    #[test]
    fn hunt_estimate_adds_weight_per_free_neighbor() {
        let finder = Pathfinder::new(bounds(5, 5));
        let cell = Cell::new(3, 3);
        let goal = Cell::new(3, 5);
        let open = ObstacleSet::default();
        let one_blocked: ObstacleSet = [Cell::new(2, 3)].into_iter().collect();

        // Half-steps: 2 per step of distance, 3 per free neighbour.
        assert_eq!(finder.estimate(cell, goal, &open, Heuristic::Simple), 4);
        assert_eq!(finder.estimate(cell, goal, &open, Heuristic::Hunt), 16);
        assert_eq!(finder.estimate(cell, goal, &one_blocked, Heuristic::Hunt), 13);
        assert_eq!(
            finder.estimate(Cell::new(1, 1), goal, &open, Heuristic::Hunt),
            12 + 6
        );
    }

    #[test]
    fn default_budget_scales_with_area() {
        assert_eq!(Pathfinder::new(bounds(10, 10)).step_budget(), 4000);
        assert_eq!(Pathfinder::new(bounds(40, 30)).step_budget(), 9600);
    }
}
