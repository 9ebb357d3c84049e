use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use temperature_heatmap::chart::CHART_TITLE;
use temperature_heatmap::HEAT_SCALE;

use crate::app::App;
use crate::ui::widgets::heatmap::{HeatmapGrid, MonthAxis, YearAxis};
use crate::ui::widgets::legend::Legend;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use crate::ui::widgets::tooltip::render_tooltip;

const MONTH_AXIS_WIDTH: u16 = 10;

/// Where each part of the heatmap screen goes for a given frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub months: Rect,
    pub grid: Rect,
    pub years: Rect,
    pub legend: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Title area
            Constraint::Length(12), // One row per month
            Constraint::Length(1),  // Year labels
            Constraint::Length(2),  // Legend
            Constraint::Min(0),
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area.inner(Margin::new(2, 0)));

    let split = |row: Rect| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MONTH_AXIS_WIDTH), Constraint::Min(1)])
            .split(row)
    };
    let grid_row = split(rows[1]);
    let year_row = split(rows[2]);
    let legend_row = split(rows[3]);

    ScreenLayout {
        title: rows[0],
        months: grid_row[0],
        grid: grid_row[1],
        years: year_row[1],
        legend: legend_row[1],
        status: rows[5],
        shortcuts: rows[6],
    }
}

pub fn render_heatmap(app: &App, f: &mut Frame<'_>) {
    let layout = screen_layout(f.area());

    render_title_section(app, f, layout.title);
    f.render_widget(MonthAxis::new(app), layout.months);
    f.render_widget(HeatmapGrid::new(app), layout.grid);
    f.render_widget(YearAxis::new(app), layout.years);
    f.render_widget(
        Legend::new(&HEAT_SCALE).active(app.hovered_cell().map(|cell| cell.bucket.index)),
        layout.legend,
    );
    render_status_section(app, f, layout.status);
    render_shortcuts(f, layout.shortcuts);

    render_tooltip(app, f, layout.grid);

    if app.show_help {
        render_help_popup(f, f.area());
    }
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title(format!("== {CHART_TITLE} =="))
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let scales = &app.chart.scales;
    let description = format!(
        "{} - {}: base temperature {}℃",
        scales.min_year,
        scales.max_year,
        app.dataset.base_temperature()
    );

    let first = app.year_at(app.year_offset);
    let last = app.year_at((app.year_offset + app.visible_years).saturating_sub(1).min(app.years.len().saturating_sub(1)));
    let window = match (first, last) {
        (Some(first), Some(last)) => format!("Showing {first} - {last} of {} years", app.years.len()),
        _ => "No data".to_string(),
    };

    let text = Text::from(vec![
        TextLine::from(Span::styled(description, Style::default().fg(Color::White))),
        TextLine::from(Span::styled(window, Style::default().fg(Color::Gray))),
    ]);
    f.render_widget(Paragraph::new(text).block(title_block), area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if !app.status_message.is_empty() {
        let style = if app.status_message.starts_with("Error") {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Text::from(Span::styled(app.status_message.as_str(), style))
    } else if let Some(cell) = app.hovered_cell() {
        Text::from(Span::styled(
            format!(
                "{} {}: {:.1}℃, bucket {} of {}{}",
                cell.point.month.label(),
                cell.point.year,
                cell.temperature,
                cell.bucket.index + 1,
                HEAT_SCALE.len(),
                if cell.bucket.overflow { " (above scale)" } else { "" }
            ),
            Style::default().fg(Color::White),
        ))
    } else if app.cursor.is_some() {
        Text::from(Span::styled("No reading for this month", Style::default().fg(Color::Gray)))
    } else {
        Text::from(Span::styled(
            "Move over the grid with the arrow keys or the mouse",
            Style::default().fg(Color::Gray),
        ))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let sep = Style::default().fg(Color::Gray);

    let shortcuts = TextLine::from(vec![
        Span::styled("?", key),
        Span::styled(": Help | ", sep),
        Span::styled("←↑↓→", key),
        Span::styled(": Move | ", sep),
        Span::styled("PgUp/PgDn", key),
        Span::styled(": Scroll | ", sep),
        Span::styled("Esc", key),
        Span::styled(": Leave | ", sep),
        Span::styled("s", key),
        Span::styled(": Save | ", sep),
        Span::styled("q", key),
        Span::styled(": Quit", sep),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}

fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let help_lines: Vec<TextLine<'static>> = [
        ("Arrows / h j k l", "Move the pointer one cell"),
        ("Mouse", "Hover a cell to show its reading"),
        ("PgUp / PgDn", "Scroll a screen of years"),
        ("Home / End", "Jump to the first or last year"),
        ("Esc", "Take the pointer off the grid"),
        ("s", "Save the chart as HTML or SVG"),
        ("q", "Quit"),
    ]
    .into_iter()
    .map(|(keys, what)| {
        TextLine::from(vec![
            Span::styled(format!("{keys:<18}"), key),
            Span::styled(what, Style::default().fg(Color::White)),
        ])
    })
    .collect();

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
