use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Operator commands. None of them steer the snake.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    SpeedUp,
    SpeedDown,
    Pause,
    Reset,
    ToggleVision,
    ToggleUi,
    Quit,
}

/// Maps one key press to a command.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(GameInput::Quit)
        }
        KeyCode::Up => Some(GameInput::SpeedUp),
        KeyCode::Down => Some(GameInput::SpeedDown),
        KeyCode::Char(' ') => Some(GameInput::Pause),
        KeyCode::Esc => Some(GameInput::Quit),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'r' => Some(GameInput::Reset),
            'v' => Some(GameInput::ToggleVision),
            'h' => Some(GameInput::ToggleUi),
            'q' => Some(GameInput::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Returns the next pending command without blocking longer than `timeout`.
/// Non-key events (including resizes) are drained and ignored.
pub fn poll_input(timeout: Duration) -> io::Result<Option<GameInput>> {
    let mut wait = timeout;
    while event::poll(wait)? {
        wait = Duration::ZERO;
        if let Event::Key(key) = event::read()? {
            if let Some(input) = map_key(key) {
                return Ok(Some(input));
            }
        }
    }
    Ok(None)
}
