use std::collections::VecDeque;
use std::fmt;

use tracing::trace;

use crate::config::HEAD_HISTORY_CAPACITY;
use crate::grid::{Cell, GridBounds};
use crate::pathfinder::{Heuristic, Pathfinder};
use crate::reachability::reachable_space;
use crate::safety::SafetyVerifier;
use crate::snake::{Body, ObstacleSet};

/// Strategy tier that produced a decision, in priority order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Tier {
    /// No decision made yet this session.
    Ready,
    HuntAggressive,
    HuntDetour,
    Stalling { space: usize },
    Panic,
    AcceptingFate,
}

impl Tier {
    /// Returns true for the tiers that count toward the stall timeout.
    #[must_use]
    pub fn is_stalling(self) -> bool {
        matches!(self, Self::Stalling { .. } | Self::Panic)
    }

    /// Returns true when the tier is the same kind as `other`, ignoring
    /// payloads.
    #[must_use]
    pub fn same_kind(self, other: Tier) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("Ready"),
            Self::HuntAggressive => f.write_str("Hunting (Aggressive)"),
            Self::HuntDetour => f.write_str("Hunting (Detour)"),
            Self::Stalling { space } => write!(f, "Stalling (Space: {space})"),
            Self::Panic => f.write_str("Panic!"),
            Self::AcceptingFate => f.write_str("Accepting Fate"),
        }
    }
}

/// Outcome of one selector run.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decision {
    /// Cell the head should move to; `None` means no free neighbour exists.
    pub next: Option<Cell>,
    pub tier: Tier,
    /// Planned route toward food, for display.
    pub vision_path: Vec<Cell>,
}

impl Decision {
    fn new(next: Option<Cell>, tier: Tier, vision_path: Vec<Cell>) -> Self {
        Self {
            next,
            tier,
            vision_path,
        }
    }
}

/// Layered move policy: hunt, detour-hunt, stall for space, panic, concede.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    pathfinder: Pathfinder,
    // Recorded every decision but not consulted by any tier yet.
    head_history: VecDeque<Cell>,
}

impl MoveSelector {
    #[must_use]
    pub fn new(bounds: GridBounds) -> Self {
        Self::with_pathfinder(Pathfinder::new(bounds))
    }

    #[must_use]
    pub fn with_pathfinder(pathfinder: Pathfinder) -> Self {
        Self {
            pathfinder,
            head_history: VecDeque::with_capacity(HEAD_HISTORY_CAPACITY),
        }
    }

    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        self.pathfinder.bounds()
    }

    /// Most recent head positions, oldest first.
    pub fn recent_heads(&self) -> impl Iterator<Item = &Cell> {
        self.head_history.iter()
    }

    pub fn clear_history(&mut self) {
        self.head_history.clear();
    }

    /// Picks the next head cell for `body` hunting `food`.
    ///
    /// Food lying under the body cannot be eaten, so both hunt tiers are
    /// skipped until it is uncovered or respawned.
    pub fn choose(&mut self, body: &Body, food: Cell) -> Decision {
        let head = body.head();
        self.record_head(head);

        let obstacles = body.obstacles();
        let verifier = SafetyVerifier::new(&self.pathfinder, body, food);
        let huntable = !body.occupies(food);

        if huntable {
            if let Some(path) = self
                .pathfinder
                .find_path(head, food, &obstacles, Heuristic::Hunt)
            {
                if verifier.is_full_path_safe(&path) {
                    return Decision::new(path.first().copied(), Tier::HuntAggressive, path);
                }
            }
        }

        let mut neighbors: Vec<Cell> = self
            .bounds()
            .neighbors4(head)
            .filter(|neighbor| !obstacles.contains(*neighbor))
            .collect();
        neighbors.sort_by_key(|neighbor| neighbor.manhattan(food));

        if huntable {
            if let Some(decision) = self.detour(&neighbors, food, &obstacles, &verifier) {
                return decision;
            }
        }

        if let Some((next, space)) = self.roomiest_safe_move(body, &neighbors, &obstacles, &verifier) {
            return Decision::new(Some(next), Tier::Stalling { space }, Vec::new());
        }

        if let Some(next) = self.roomiest_move(&neighbors, &obstacles) {
            return Decision::new(Some(next), Tier::Panic, Vec::new());
        }

        trace!(?head, "no free neighbour");
        Decision::new(None, Tier::AcceptingFate, Vec::new())
    }

    fn record_head(&mut self, head: Cell) {
        if self.head_history.len() == HEAD_HISTORY_CAPACITY {
            let _ = self.head_history.pop_front();
        }
        self.head_history.push_back(head);
    }

    fn detour(
        &self,
        neighbors: &[Cell],
        food: Cell,
        obstacles: &ObstacleSet,
        verifier: &SafetyVerifier<'_>,
    ) -> Option<Decision> {
        for &neighbor in neighbors {
            let Some(rest) = self
                .pathfinder
                .find_path(neighbor, food, obstacles, Heuristic::Hunt)
            else {
                continue;
            };

            let mut full_detour = Vec::with_capacity(rest.len() + 1);
            full_detour.push(neighbor);
            full_detour.extend(rest);
            if verifier.is_full_path_safe(&full_detour) {
                return Some(Decision::new(Some(neighbor), Tier::HuntDetour, full_detour));
            }
        }
        None
    }

    /// Among individually safe neighbours, the one with the most reachable
    /// space. Ties go to the neighbour farther from the current tail.
    fn roomiest_safe_move(
        &self,
        body: &Body,
        neighbors: &[Cell],
        obstacles: &ObstacleSet,
        verifier: &SafetyVerifier<'_>,
    ) -> Option<(Cell, usize)> {
        let tail = body.tail();
        let mut best: Option<(Cell, usize)> = None;

        for &candidate in neighbors {
            if !verifier.is_single_move_safe(candidate) {
                continue;
            }

            let space = reachable_space(self.bounds(), candidate, obstacles);
            best = match best {
                None => Some((candidate, space)),
                Some((current, best_space))
                    if space > best_space
                        || (space == best_space
                            && candidate.manhattan(tail) > current.manhattan(tail)) =>
                {
                    Some((candidate, space))
                }
                keep => keep,
            };
        }

        best
    }

    /// The neighbour with the most reachable space, first one on ties.
    fn roomiest_move(&self, neighbors: &[Cell], obstacles: &ObstacleSet) -> Option<Cell> {
        let mut best: Option<(Cell, usize)> = None;
        for &candidate in neighbors {
            let space = reachable_space(self.bounds(), candidate, obstacles);
            if best.is_none_or(|(_, best_space)| space > best_space) {
                best = Some((candidate, space));
            }
        }
        best.map(|(cell, _)| cell)
    }
}

#[cfg(test)]
mod tests {
    use super::{MoveSelector, Tier};
    use crate::config::HEAD_HISTORY_CAPACITY;
    use crate::grid::{Cell, GridBounds};
    use crate::snake::Body;

    fn selector(width: i32, height: i32) -> MoveSelector {
        MoveSelector::new(GridBounds::with_size(width, height).expect("valid bounds"))
    }

    #[test]
    fn open_board_hunts_aggressively() {
        let mut selector = selector(20, 20);
        let body = Body::horizontal(Cell::new(11, 11), 10);
        let food = Cell::new(11, 14);

        let decision = selector.choose(&body, food);

        assert_eq!(decision.tier, Tier::HuntAggressive);
        assert_eq!(decision.next, Some(Cell::new(11, 12)));
        assert_eq!(decision.vision_path.last(), Some(&food));
        assert_eq!(decision.tier.to_string(), "Hunting (Aggressive)");
    }

    #[test]
    fn cornered_head_panics_into_only_neighbor() {
        // 4 wide, 5 tall. The only free neighbour leads into a sealed
        // two-cell pocket, so no move is individually safe.
        let mut selector = selector(4, 5);
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

        let decision = selector.choose(&body, Cell::new(5, 4));

        assert_eq!(decision.tier, Tier::Panic);
        assert_eq!(decision.next, Some(Cell::new(1, 2)));
        assert!(decision.tier.is_stalling());
    }

    #[test]
    fn enclosed_head_accepts_fate() {
        let mut selector = selector(5, 5);
        let body = Body::from_segments(vec![
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(1, 3),
            Cell::new(2, 3),
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(3, 1),
        ]);

        let decision = selector.choose(&body, Cell::new(5, 5));

        assert_eq!(decision.tier, Tier::AcceptingFate);
        assert_eq!(decision.next, None);
        assert!(decision.vision_path.is_empty());
    }

    #[test]
    fn unreachable_food_stalls_toward_larger_space() {
        // 6x6 board. Column 4 is solid body, sealing the food off in
        // columns 5..=6. The head at (1,1) has one free neighbour.
        let mut selector = selector(6, 6);
        let body = coiled_body();

        let decision = selector.choose(&body, Cell::new(3, 6));

        assert_eq!(decision.tier, Tier::Stalling { space: 5 });
        assert_eq!(decision.next, Some(Cell::new(2, 1)));
        assert_eq!(decision.tier.to_string(), "Stalling (Space: 5)");
    }

    #[test]
    fn head_history_is_bounded() {
        let mut selector = selector(10, 10);
        let body = Body::horizontal(Cell::new(5, 5), 3);

        for _ in 0..HEAD_HISTORY_CAPACITY + 25 {
            let _ = selector.choose(&body, Cell::new(2, 2));
        }

        assert_eq!(selector.recent_heads().count(), HEAD_HISTORY_CAPACITY);
        selector.clear_history();
        assert_eq!(selector.recent_heads().count(), 0);
    }

    #[test]
    fn tier_kind_ignores_space_payload() {
        assert!(Tier::Stalling { space: 3 }.same_kind(Tier::Stalling { space: 9 }));
        assert!(!Tier::Panic.same_kind(Tier::AcceptingFate));
        assert!(!Tier::HuntDetour.is_stalling());
    }

    #[test]
    fn unsafe_direct_hunt_falls_back_to_detour() {
        // 5x5 board. Going straight left into the corner seals the head
        // behind its own neck. Looping down through row 3 first lets the
        // tail follow, leaving (1,2) open back to it.
        //
        //   row 1: F X X .
        //   row 2: . H T .
        //   row 3: . . . .
        let mut selector = selector(5, 5);
        let body = Body::from_segments(vec![
            Cell::new(2, 2),
            Cell::new(1, 2),
            Cell::new(1, 3),
            Cell::new(2, 3),
        ]);
        let food = Cell::new(1, 1);

        let decision = selector.choose(&body, food);

        assert_eq!(decision.tier, Tier::HuntDetour);
        assert_eq!(decision.next, Some(Cell::new(3, 2)));
        assert_eq!(
            decision.vision_path,
            vec![Cell::new(3, 2), Cell::new(3, 1), Cell::new(2, 1), food]
        );
        assert_eq!(decision.tier.to_string(), "Hunting (Detour)");
    }

    #[test]
    fn equal_space_prefers_neighbor_farther_from_tail() {
        // 5x5 board. The food in the top-right corner is boxed in by the
        // body. Both free neighbours of the head open onto the same 19
        // cells; (1,1) is farther from the tail at (3,5) than (2,2).
        let mut selector = selector(5, 5);
        let body = Body::from_segments(vec![
            Cell::new(1, 2),
            Cell::new(1, 3),
            Cell::new(1, 4),
            Cell::new(2, 4),
            Cell::new(2, 5),
            Cell::new(3, 5),
        ]);

        let decision = selector.choose(&body, Cell::new(1, 5));

        assert_eq!(decision.tier, Tier::Stalling { space: 19 });
        assert_eq!(decision.next, Some(Cell::new(1, 1)));
    }

    #[test]
    fn food_under_body_is_not_hunted() {
        let mut selector = selector(20, 20);
        let body = Body::horizontal(Cell::new(11, 11), 10);

        for food in [body.tail(), Cell::new(11, 6)] {
            let decision = selector.choose(&body, food);

            assert_eq!(decision.tier, Tier::Stalling { space: 391 });
            assert_eq!(decision.next, Some(Cell::new(10, 11)));
            assert!(decision.vision_path.is_empty());
        }
    }

    fn coiled_body() -> Body {
        Body::from_segments(vec![
            Cell::new(1, 1),
            Cell::new(1, 2),
            Cell::new(1, 3),
            Cell::new(1, 4),
            Cell::new(2, 4),
            Cell::new(3, 4),
            Cell::new(4, 4),
            Cell::new(5, 4),
            Cell::new(6, 4),
            Cell::new(6, 3),
            Cell::new(5, 3),
            Cell::new(4, 3),
            Cell::new(3, 3),
            Cell::new(2, 3),
            Cell::new(2, 2),
            Cell::new(3, 2),
            Cell::new(4, 2),
            Cell::new(5, 2),
            Cell::new(6, 2),
            Cell::new(6, 1),
        ])
    }
}
