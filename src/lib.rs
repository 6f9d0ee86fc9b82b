//! Self-playing Snake.
//!
//! The decision engine (`grid`, `snake`, `pathfinder`, `reachability`,
//! `safety`, `selector`, `food`, `game`) is independent of the terminal.
//! `input`, `renderer`, `ui` and `terminal_runtime` form the thin frontend
//! used by the binary.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod pathfinder;
pub mod reachability;
pub mod renderer;
pub mod safety;
pub mod selector;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
