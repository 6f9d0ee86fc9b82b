use std::collections::{HashSet, VecDeque};

use crate::grid::Cell;

/// Cells a search may not enter.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ObstacleSet {
    cells: HashSet<Cell>,
}

impl ObstacleSet {
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<Cell> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Occupied cells of the snake, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Body {
    segments: VecDeque<Cell>,
}

impl Body {
    /// Creates a horizontal body of `length` cells with the head at `head`,
    /// trailing off to the left.
    #[must_use]
    pub fn horizontal(head: Cell, length: usize) -> Self {
        let length = i32::try_from(length.max(1)).unwrap_or(i32::MAX);
        Self {
            segments: (0..length)
                .map(|offset| Cell::new(head.row, head.col - offset))
                .collect(),
        }
    }

    /// Creates a body from explicit segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Self {
        debug_assert!(!segments.is_empty(), "a body needs at least one segment");
        Self {
            segments: VecDeque::from(segments),
        }
    }

    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .segments
            .front()
            .expect("snake body must always contain at least one segment")
    }

    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .segments
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Segment at `index`, counting from the head.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.segments.get(index).copied()
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Iterates over segments from head to tail.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &Cell> + ExactSizeIterator {
        self.segments.iter()
    }

    /// Blocked cells for searches: every segment except the tail, which
    /// vacates before the head can reach it.
    #[must_use]
    pub fn obstacles(&self) -> ObstacleSet {
        self.segments
            .iter()
            .take(self.segments.len().saturating_sub(1))
            .copied()
            .collect()
    }

    /// Moves the head to `next_head`. The tail is kept when `grow` is set.
    pub fn advance(&mut self, next_head: Cell, grow: bool) {
        self.segments.push_front(next_head);
        if !grow {
            let _ = self.segments.pop_back();
        }
    }

    /// Returns the body after following `steps`, growing on every step that
    /// lands on `food`.
    #[must_use]
    pub fn simulate<I>(&self, steps: I, food: Cell) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut virtual_body = self.clone();
        for step in steps {
            virtual_body.advance(step, step == food);
        }
        virtual_body
    }

    /// Returns true when the head shares a cell with another segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.segments.iter().skip(1).any(|segment| *segment == head)
    }
}
