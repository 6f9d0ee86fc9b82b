use crate::config::MIN_INTERIOR_SIZE;
use crate::error::EngineError;

/// Grid cell in (row, column) coordinates. Rows grow downward.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to `other`.
    #[must_use]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Returns the adjacent cell one step in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

/// Orthogonal step directions, in neighbour enumeration order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Returns the direction leading from `from` to the adjacent cell `to`.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        Self::ALL.into_iter().find(|&direction| from.step(direction) == to)
    }
}

/// Inclusive row and column limits of the playable interior.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridBounds {
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
}

impl GridBounds {
    /// Creates bounds from inclusive limits, rejecting interiors smaller than
    /// the minimum on either axis.
    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Result<Self, EngineError> {
        let width = right - left + 1;
        let height = bottom - top + 1;
        if width < MIN_INTERIOR_SIZE || height < MIN_INTERIOR_SIZE {
            return Err(EngineError::TerminalTooSmall {
                width: width.max(0),
                height: height.max(0),
                min_width: MIN_INTERIOR_SIZE,
                min_height: MIN_INTERIOR_SIZE,
            });
        }

        Ok(Self {
            top,
            bottom,
            left,
            right,
        })
    }

    /// Creates a `width` x `height` interior with its top-left cell at (1, 1).
    pub fn with_size(width: i32, height: i32) -> Result<Self, EngineError> {
        Self::new(1, height, 1, width)
    }

    /// Derives the interior from terminal dimensions.
    ///
    /// Row 0 and the last row are reserved for the status and controls
    /// lines. Every cell is two terminal columns wide, and the outermost
    /// cell column on each side is left as margin.
    pub fn from_terminal(columns: u16, rows: u16) -> Result<Self, EngineError> {
        let max_row = i32::from(rows);
        let max_col = i32::from(columns / 2);
        Self::new(1, max_row - 2, 1, max_col - 2)
    }

    #[must_use]
    pub fn top(self) -> i32 {
        self.top
    }

    #[must_use]
    pub fn bottom(self) -> i32 {
        self.bottom
    }

    #[must_use]
    pub fn left(self) -> i32 {
        self.left
    }

    #[must_use]
    pub fn right(self) -> i32 {
        self.right
    }

    #[must_use]
    pub fn width(self) -> i32 {
        self.right - self.left + 1
    }

    #[must_use]
    pub fn height(self) -> i32 {
        self.bottom - self.top + 1
    }

    /// Total number of playable cells.
    #[must_use]
    pub fn area(self) -> usize {
        usize::try_from(self.width() * self.height()).unwrap_or(0)
    }

    /// Cell at the middle of the interior (rounded toward bottom-right).
    #[must_use]
    pub fn center(self) -> Cell {
        Cell::new(
            self.top + self.height() / 2,
            self.left + self.width() / 2,
        )
    }

    /// Top-left playable cell.
    #[must_use]
    pub fn origin(self) -> Cell {
        Cell::new(self.top, self.left)
    }

    #[must_use]
    pub fn in_bounds(self, cell: Cell) -> bool {
        (self.top..=self.bottom).contains(&cell.row) && (self.left..=self.right).contains(&cell.col)
    }

    /// In-bounds orthogonal neighbours in up, down, left, right order.
    pub fn neighbors4(self, cell: Cell) -> impl Iterator<Item = Cell> {
        Direction::ALL
            .into_iter()
            .map(move |direction| cell.step(direction))
            .filter(move |neighbor| self.in_bounds(*neighbor))
    }

    /// Shrinks the interior by `padding` on every side, or returns `self`
    /// when the result would be degenerate.
    #[must_use]
    pub fn inset(self, padding: i32) -> Self {
        let inset = Self {
            top: self.top + padding,
            bottom: self.bottom - padding,
            left: self.left + padding,
            right: self.right - padding,
        };
        if inset.bottom <= inset.top || inset.right <= inset.left {
            return self;
        }
        inset
    }

    /// Iterates over every cell row by row.
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        (self.top..=self.bottom)
            .flat_map(move |row| (self.left..=self.right).map(move |col| Cell::new(row, col)))
    }
}
