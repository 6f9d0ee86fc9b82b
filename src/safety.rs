use crate::grid::Cell;
use crate::pathfinder::{Heuristic, Pathfinder};
use crate::snake::Body;

/// Anti-self-trap checks: a position is safe when its head can still reach
/// its own tail, the one cell guaranteed to vacate.
#[derive(Debug, Clone, Copy)]
pub struct SafetyVerifier<'a> {
    pathfinder: &'a Pathfinder,
    body: &'a Body,
    food: Cell,
}

impl<'a> SafetyVerifier<'a> {
    #[must_use]
    pub fn new(pathfinder: &'a Pathfinder, body: &'a Body, food: Cell) -> Self {
        Self {
            pathfinder,
            body,
            food,
        }
    }

    /// Returns true when moving the head to `candidate` keeps a route from
    /// the new head to the new tail.
    #[must_use]
    pub fn is_single_move_safe(&self, candidate: Cell) -> bool {
        self.can_reach_own_tail(&self.body.simulate([candidate], self.food))
    }

    /// Replays `path` and checks the final position only.
    ///
    /// Intermediate positions along the path are not verified.
    #[must_use]
    pub fn is_full_path_safe(&self, path: &[Cell]) -> bool {
        if path.is_empty() {
            return false;
        }
        self.can_reach_own_tail(&self.body.simulate(path.iter().copied(), self.food))
    }

    fn can_reach_own_tail(&self, virtual_body: &Body) -> bool {
        self.pathfinder
            .find_path(
                virtual_body.head(),
                virtual_body.tail(),
                &virtual_body.obstacles(),
                Heuristic::Simple,
            )
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::SafetyVerifier;
    use crate::grid::{Cell, GridBounds};
    use crate::pathfinder::Pathfinder;
    use crate::snake::Body;

    fn pathfinder(width: i32, height: i32) -> Pathfinder {
        Pathfinder::new(GridBounds::with_size(width, height).expect("valid bounds"))
    }

    #[test]
    fn open_board_moves_are_safe() {
        let finder = pathfinder(10, 10);
        let body = Body::horizontal(Cell::new(5, 5), 4);
        let verifier = SafetyVerifier::new(&finder, &body, Cell::new(1, 1));

        assert!(verifier.is_single_move_safe(Cell::new(4, 5)));
        assert!(verifier.is_single_move_safe(Cell::new(5, 6)));
    }

    #[test]
    fn move_into_sealed_pocket_is_unsafe() {
        // 4 wide, 5 tall. Stepping up from the head leaves it in a
        // two-cell pocket cut off from the tail at (2,4).
        //
        //   row 1: . . X X
        //   row 2: X H X T
        //   row 3: X X X .
        let finder = pathfinder(4, 5);
        let body = Body::from_segments(vec![
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(3, 1),
            Cell::new(3, 2),
            Cell::new(3, 3),
            Cell::new(2, 3),
            Cell::new(1, 3),
            Cell::new(1, 4),
            Cell::new(2, 4),
        ]);
        let verifier = SafetyVerifier::new(&finder, &body, Cell::new(5, 4));

        assert!(!verifier.is_single_move_safe(Cell::new(1, 2)));
    }

    #[test]
    fn empty_path_is_never_safe() {
        let finder = pathfinder(6, 6);
        let body = Body::horizontal(Cell::new(3, 3), 2);
        let verifier = SafetyVerifier::new(&finder, &body, Cell::new(1, 1));

        assert!(!verifier.is_full_path_safe(&[]));
    }

    #[test]
    fn full_path_checks_final_position() {
        let finder = pathfinder(8, 8);
        let body = Body::horizontal(Cell::new(4, 4), 3);
        let food = Cell::new(4, 7);
        let verifier = SafetyVerifier::new(&finder, &body, food);

        let path = [Cell::new(4, 5), Cell::new(4, 6), food];
        assert!(verifier.is_full_path_safe(&path));
    }

    #[test]
    fn full_path_ending_in_dead_end_is_rejected() {
        // 4x4 board. After the path the grown body fills row 2 and the
        // head sits in row 1, cut off from the tail at (4,2):
        //
        //   row 1: H . . .
        //   row 2: X X X X
        //   row 3: . . . X
        //   row 4: . T X X
        let finder = pathfinder(4, 4);
        let body = Body::from_segments(vec![
            Cell::new(2, 3),
            Cell::new(2, 4),
            Cell::new(3, 4),
            Cell::new(4, 4),
            Cell::new(4, 3),
            Cell::new(4, 2),
            Cell::new(4, 1),
            Cell::new(3, 1),
        ]);
        let food = Cell::new(1, 1);
        let verifier = SafetyVerifier::new(&finder, &body, food);

        // Head walks (2,3) -> (2,2) -> (2,1) -> (1,1) eating at the corner.
        let path = [Cell::new(2, 2), Cell::new(2, 1), food];
        assert!(!verifier.is_full_path_safe(&path));
    }
}
