use rand::Rng;

use crate::config::{FOOD_SPAWN_ATTEMPTS, SPARSE_FILL_RATIO, SPARSE_FOOD_PADDING};
use crate::grid::{Cell, GridBounds};
use crate::snake::{Body, ObstacleSet};

/// Picks a new food cell.
///
/// While the body covers less than half the board the spawn region is
/// pulled in from the walls. A candidate must be off the body and have at
/// least one free neighbour. When every attempt fails the top-left
/// interior cell is returned, even if the body currently covers it.
#[must_use]
pub fn spawn_food<R: Rng>(rng: &mut R, bounds: GridBounds, body: &Body) -> Cell {
    let occupied: ObstacleSet = body.segments().copied().collect();
    let region = spawn_region(bounds, body.len());

    for _ in 0..FOOD_SPAWN_ATTEMPTS {
        let candidate = Cell::new(
            rng.gen_range(region.top()..=region.bottom()),
            rng.gen_range(region.left()..=region.right()),
        );
        if occupied.contains(candidate) {
            continue;
        }

        let has_free_neighbor = bounds
            .neighbors4(candidate)
            .any(|neighbor| !occupied.contains(neighbor));
        if has_free_neighbor {
            return candidate;
        }
    }

    bounds.origin()
}

/// Returns the bounds food may spawn in for a body of `body_len` cells.
#[must_use]
pub fn spawn_region(bounds: GridBounds, body_len: usize) -> GridBounds {
    let fill_ratio = body_len as f64 / bounds.area().max(1) as f64;
    if fill_ratio < SPARSE_FILL_RATIO {
        bounds.inset(SPARSE_FOOD_PADDING)
    } else {
        bounds
    }
}
