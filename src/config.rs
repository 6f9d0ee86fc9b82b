use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::ConfigError;

const APP_DIR_NAME: &str = "autosnake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Smallest playable interior, in cells, on either axis.
pub const MIN_INTERIOR_SIZE: i32 = 4;

/// Lower bound on A* frontier expansions per search.
pub const PATH_BUDGET_FLOOR: usize = 4000;

/// A* expansions granted per playable cell.
pub const PATH_BUDGET_PER_CELL: usize = 8;

/// Hunt heuristic weight per free neighbour, in half-steps (1.5 steps).
pub const HUNT_OPENNESS_WEIGHT_HALF_STEPS: u32 = 3;

/// Random placements tried before the spawner falls back to a fixed cell.
pub const FOOD_SPAWN_ATTEMPTS: usize = 500;

/// Below this body/area ratio food is kept away from the walls.
pub const SPARSE_FILL_RATIO: f64 = 0.5;

/// Inward padding applied to the spawn region on sparse boards.
pub const SPARSE_FOOD_PADDING: i32 = 2;

/// Capacity of the recent head positions buffer.
pub const HEAD_HISTORY_CAPACITY: usize = 200;

/// Default body length at session start.
pub const DEFAULT_START_LENGTH: usize = 10;

/// Continuous non-hunting time after which the session is reset.
pub const DEFAULT_STALL_TIMEOUT_SECS: u64 = 15;

/// Returns the A* expansion budget for a grid of `area` cells.
#[must_use]
pub fn path_budget(area: usize) -> usize {
    PATH_BUDGET_FLOOR.max(area.saturating_mul(PATH_BUDGET_PER_CELL))
}

/// External pacing tier. Affects only the frontend delay between ticks.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedTier {
    #[default]
    #[value(alias = "n")]
    #[serde(alias = "n")]
    Normal,
    #[value(alias = "f")]
    #[serde(alias = "f")]
    Fast,
    #[value(alias = "i")]
    #[serde(alias = "i")]
    Insane,
    #[value(name = "wtf", alias = "w")]
    #[serde(alias = "w")]
    Wtf,
}

impl SpeedTier {
    const ORDER: [SpeedTier; 4] = [Self::Normal, Self::Fast, Self::Insane, Self::Wtf];

    /// Returns the frontend delay between ticks.
    #[must_use]
    pub fn tick_delay(self) -> Duration {
        match self {
            Self::Normal => Duration::from_millis(50),
            Self::Fast => Duration::from_millis(30),
            Self::Insane => Duration::from_millis(10),
            Self::Wtf => Duration::from_micros(100),
        }
    }

    /// Returns the next faster tier, staying put at the fastest.
    #[must_use]
    pub fn faster(self) -> Self {
        Self::ORDER
            .get(self.index() + 1)
            .copied()
            .unwrap_or(self)
    }

    /// Returns the next slower tier, staying put at the slowest.
    #[must_use]
    pub fn slower(self) -> Self {
        self.index()
            .checked_sub(1)
            .map_or(self, |index| Self::ORDER[index])
    }

    fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Fast => 1,
            Self::Insane => 2,
            Self::Wtf => 3,
        }
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::Insane => "Insane",
            Self::Wtf => "WTF",
        };
        f.write_str(name)
    }
}

/// User settings read from `config.json`; every field is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub start_length: usize,
    pub stall_timeout_secs: u64,
    pub speed: SpeedTier,
    pub vision: bool,
    pub hide_ui: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            start_length: DEFAULT_START_LENGTH,
            stall_timeout_secs: DEFAULT_STALL_TIMEOUT_SECS,
            speed: SpeedTier::Normal,
            vision: false,
            hide_ui: false,
        }
    }
}

impl EngineConfig {
    /// Loads settings from `path`, or from the platform config file when
    /// `path` is `None`.
    ///
    /// A missing platform file yields defaults; an explicitly requested file
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => load_from_path(path),
            None => match load_from_path(&config_path()) {
                Err(ConfigError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
                    Ok(Self::default())
                }
                other => other,
            },
        }
    }

    /// Returns the stall timeout as a duration.
    #[must_use]
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_secs(self.stall_timeout_secs)
    }
}

/// Returns the platform-correct settings file path.
#[must_use]
pub fn config_path() -> PathBuf {
    let mut base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    base
}

fn load_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
