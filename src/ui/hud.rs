use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::game::{GameState, GameStatus};

/// Key help shown on the bottom row.
pub const CONTROLS_LINE: &str =
    " [▲/▼] Speed  [R] Reset  [SPACE] Pause  [V] Vision  [Q] Quit  [H] Hide UI ";

/// Display toggles owned by the frontend.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ViewOptions {
    pub show_vision: bool,
    pub hide_ui: bool,
}

/// Builds the top-row summary of speed, score and the selector status.
#[must_use]
pub fn stats_line(state: &GameState, view: ViewOptions) -> String {
    let vision = if view.show_vision { "ON" } else { "OFF" };
    let status = match state.status {
        GameStatus::Paused => "Paused".to_owned(),
        GameStatus::Playing | GameStatus::GameOver => state.status_line(),
    };

    format!(
        " Speed: {} | Vision: {vision} | Score: {} / Max: {} Best: {} | {status} ",
        state.speed,
        state.score,
        state.theoretical_max_score(),
        state.high_score,
    )
}

/// Draws the stats and controls rows unless the UI is hidden.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, view: ViewOptions) {
    if view.hide_ui || area.height < 2 {
        return;
    }

    let bold = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
    let plain = Style::new().fg(Color::White);
    let stats = stats_line(state, view);

    print_centered(frame, area, area.y, &stats, bold);
    print_centered(frame, area, area.bottom() - 1, CONTROLS_LINE, plain);
}

fn print_centered(frame: &mut Frame<'_>, area: Rect, y: u16, text: &str, style: Style) {
    let width = usize::from(area.width);
    let fitted = fit_to_width(text, width);
    let offset = width.saturating_sub(fitted.width()) / 2;
    let x = area.x + u16::try_from(offset).unwrap_or(0);

    frame.buffer_mut().set_string(x, y, fitted, style);
}

/// Truncates `text` to at most `width` display columns.
#[must_use]
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut fitted = String::with_capacity(text.len());
    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if used + char_width > width {
            break;
        }
        used += char_width;
        fitted.push(c);
    }
    fitted
}
