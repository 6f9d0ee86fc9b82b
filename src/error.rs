use std::io;

use thiserror::Error;

/// Failures that prevent a session from being constructed.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum EngineError {
    #[error("terminal too small: playable interior is {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: i32,
        height: i32,
        min_width: i32,
        min_height: i32,
    },
}

/// Failures while loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
