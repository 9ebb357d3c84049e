use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::state::{App, Cursor};

pub fn handle_input(app: &mut App, key: KeyCode) {
    if handle_help_toggle(app, key) {
        return;
    }

    match key {
        KeyCode::Char('q') => {
            app.running = false;
        }
        KeyCode::Esc => {
            app.leave();
        }
        KeyCode::Left | KeyCode::Char('h') => app.move_cursor(-1, 0),
        KeyCode::Right | KeyCode::Char('l') => app.move_cursor(1, 0),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(0, -1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(0, 1),
        KeyCode::PageUp => app.page(false),
        KeyCode::PageDown => app.page(true),
        KeyCode::Home => app.move_cursor(isize::MIN, 0),
        KeyCode::End => app.move_cursor(isize::MAX, 0),
        KeyCode::Char('s') => {
            app.export_requested = true;
        }
        _ => {}
    }
}

fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) || key == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if key == KeyCode::Esc {
            app.show_help = false;
        }
        return true;
    }

    false
}

/// Maps a terminal position inside `grid` to the cell underneath it.
pub fn cursor_at(app: &App, grid: Rect, column: u16, row: u16) -> Option<Cursor> {
    if !grid.contains(Position::new(column, row)) {
        return None;
    }

    let year_index = app.year_offset + usize::from(column - grid.x);
    let month_index = usize::from(row - grid.y);
    (year_index < app.years.len() && month_index < 12).then_some(Cursor {
        year_index,
        month_index,
    })
}

/// Pointer movement over the grid enters cells; anywhere else leaves.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, grid: Rect) {
    if app.show_help {
        return;
    }

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
            match cursor_at(app, grid, mouse.column, mouse.row) {
                Some(cursor) if app.cursor != Some(cursor) => app.hover(cursor),
                Some(_) => {}
                None if app.cursor.is_some() => app.leave(),
                None => {}
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => app.page(true),
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => app.page(false),
        MouseEventKind::Up(_) => {}
    }
}
