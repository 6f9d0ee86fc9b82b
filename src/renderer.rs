use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::game::{GameState, GameStatus};
use crate::grid::{Cell, Direction};
use crate::snake::Body;
use crate::ui::hud::{ViewOptions, render_hud};
use crate::ui::menu::{render_pause_menu, render_too_small_notice};

const GLYPH_FOOD: &str = "● ";
const GLYPH_TAIL: &str = "▪ ";
const GLYPH_VISION: &str = "· ";
const GLYPH_LONE_HEAD: &str = "O ";

/// Renders one frame from immutable state. Cells are two columns wide.
pub fn render(frame: &mut Frame<'_>, state: &GameState, view: ViewOptions, too_small: bool) {
    let area = frame.area();
    if too_small {
        render_too_small_notice(frame, area);
        return;
    }

    if view.show_vision {
        render_vision(frame, area, state);
    }
    render_food(frame, area, state.food);
    render_snake(frame, area, &state.body);
    render_hud(frame, area, state, view);

    if state.status == GameStatus::Paused {
        render_pause_menu(frame, area);
    }
}

fn render_vision(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    let style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    for cell in state.vision_path() {
        if *cell == state.food || state.body.occupies(*cell) {
            continue;
        }
        if let Some((x, y)) = cell_to_terminal(area, *cell) {
            frame.buffer_mut().set_string(x, y, GLYPH_VISION, style);
        }
    }
}

fn render_food(frame: &mut Frame<'_>, area: Rect, food: Cell) {
    let Some((x, y)) = cell_to_terminal(area, food) else {
        return;
    };
    let style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
    frame.buffer_mut().set_string(x, y, GLYPH_FOOD, style);
}

fn render_snake(frame: &mut Frame<'_>, area: Rect, body: &Body) {
    let base = Style::new().fg(Color::White);
    let buffer = frame.buffer_mut();

    for (index, cell) in body.segments().enumerate() {
        let Some((x, y)) = cell_to_terminal(area, *cell) else {
            continue;
        };
        let style = if index == 0 {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };
        buffer.set_string(x, y, segment_glyph(body, index), style);
    }
}

/// Picks the two-column glyph for segment `index`: an arrow for the head,
/// a box-drawing pipe joining both neighbours for the body.
#[must_use]
pub fn segment_glyph(body: &Body, index: usize) -> &'static str {
    let Some(cell) = body.get(index) else {
        return GLYPH_LONE_HEAD;
    };
    let previous = index.checked_sub(1).and_then(|i| body.get(i));
    let next = body.get(index + 1);

    match (previous, next) {
        (None, None) => GLYPH_LONE_HEAD,
        (None, Some(neck)) => head_glyph(Direction::between(cell, neck)),
        (Some(_), None) => GLYPH_TAIL,
        (Some(previous), Some(next)) => pipe_glyph(
            Direction::between(cell, previous),
            Direction::between(cell, next),
        ),
    }
}

/// The head arrow points away from the neck.
fn head_glyph(toward_neck: Option<Direction>) -> &'static str {
    match toward_neck {
        Some(Direction::Up) => "▼ ",
        Some(Direction::Down) => "▲ ",
        Some(Direction::Left) => "▶ ",
        Some(Direction::Right) => "◀ ",
        None => GLYPH_LONE_HEAD,
    }
}

fn pipe_glyph(a: Option<Direction>, b: Option<Direction>) -> &'static str {
    use Direction::{Down, Left, Right, Up};

    match (a, b) {
        (Some(Up), Some(Down)) | (Some(Down), Some(Up)) => "│ ",
        (Some(Left), Some(Right)) | (Some(Right), Some(Left)) => "──",
        (Some(Down), Some(Right)) | (Some(Right), Some(Down)) => "┌─",
        (Some(Down), Some(Left)) | (Some(Left), Some(Down)) => "┐ ",
        (Some(Up), Some(Right)) | (Some(Right), Some(Up)) => "└─",
        (Some(Up), Some(Left)) | (Some(Left), Some(Up)) => "┘ ",
        _ => "  ",
    }
}

fn cell_to_terminal(area: Rect, cell: Cell) -> Option<(u16, u16)> {
    let x_offset = u16::try_from(cell.col.checked_mul(2)?).ok()?;
    let y_offset = u16::try_from(cell.row).ok()?;

    let x = area.x.saturating_add(x_offset);
    let y = area.y.saturating_add(y_offset);
    if x.saturating_add(1) >= area.right() || y >= area.bottom() {
        return None;
    }

    Some((x, y))
}
