use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::widgets::Widget;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal_layout[1]
}

/// A `width` x `height` box beside the terminal cell at (`x`, `y`): to the right and
/// one row up, flipped to the left when it would run off `bounds`.
pub fn anchored_rect(x: u16, y: u16, width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);

    let right = x.saturating_add(2);
    let left = if right.saturating_add(width) <= bounds.right() {
        right
    } else {
        x.saturating_sub(width + 1).max(bounds.x)
    };

    let top = y.saturating_sub(1).max(bounds.y);
    let top = if top.saturating_add(height) > bounds.bottom() {
        bounds.bottom().saturating_sub(height)
    } else {
        top
    };

    Rect::new(left, top, width, height)
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}
