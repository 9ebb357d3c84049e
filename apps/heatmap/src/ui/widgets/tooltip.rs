use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::widgets::popup::{anchored_rect, ClearWidget};

/// Draws the tooltip box next to the hovered grid cell. Nothing is drawn while
/// the tooltip is hidden or the cell has scrolled out of `grid`.
pub fn render_tooltip(app: &App, f: &mut Frame<'_>, grid: Rect) {
    let (Some(content), Some(cursor)) = (app.tooltip.content(), app.cursor) else {
        return;
    };
    let Some(column) = cursor.year_index.checked_sub(app.year_offset) else {
        return;
    };
    let (Ok(column), Ok(row)) = (u16::try_from(column), u16::try_from(cursor.month_index)) else {
        return;
    };
    if column >= grid.width || row >= grid.height {
        return;
    }

    let lines = content.lines();
    let widest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
    let width = u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(4);
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = anchored_rect(grid.x + column, grid.y + row, width, height, f.area());

    let accent = app
        .hovered_cell()
        .map_or(Color::Yellow, |cell| Color::from(cell.bucket.color));

    let text = Text::from(vec![
        Line::styled(lines[0], Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Line::styled(lines[1], Style::default().fg(Color::Cyan)),
        Line::styled(lines[2], Style::default().fg(Color::Gray)),
    ]);

    f.render_widget(ClearWidget, area);
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        ),
        area,
    );
}
