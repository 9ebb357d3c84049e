use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use temperature_heatmap::Month;

use crate::app::{App, Cursor};

const EMPTY_CELL: &str = "·";
const POINTER: &str = "◆";
const YEAR_LABEL_EVERY: i32 = 10;

/// One terminal cell per data point: a column per year, a row per month.
pub struct HeatmapGrid<'a> {
    app: &'a App,
}

impl<'a> HeatmapGrid<'a> {
    pub const fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for HeatmapGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let rows = area.height.min(12);

        for column in 0..area.width {
            let year_index = app.year_offset + usize::from(column);
            if year_index >= app.years.len() {
                break;
            }

            for row in 0..rows {
                let month_index = usize::from(row);
                let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) else {
                    continue;
                };

                let hovered = app.cursor
                    == Some(Cursor {
                        year_index,
                        month_index,
                    });

                match app.binding_at(year_index, month_index) {
                    Some(binding) => {
                        let color = binding.bucket.color;
                        let ink = if color.is_light() { Color::Black } else { Color::White };
                        cell.set_bg(Color::from(color));
                        if hovered {
                            cell.set_symbol(POINTER).set_fg(ink);
                        } else {
                            cell.set_symbol(" ");
                        }
                    }
                    None => {
                        let fg = if hovered { Color::Yellow } else { Color::DarkGray };
                        cell.set_symbol(if hovered { POINTER } else { EMPTY_CELL }).set_fg(fg);
                    }
                }
            }
        }
    }
}

/// Month names down the left of the grid, the hovered row highlighted.
pub struct MonthAxis {
    selected: Option<usize>,
}

impl MonthAxis {
    pub fn new(app: &App) -> Self {
        Self {
            selected: app.cursor.map(|cursor| cursor.month_index),
        }
    }
}

impl Widget for MonthAxis {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, month) in Month::ALL.iter().enumerate().take(usize::from(area.height)) {
            let style = if self.selected == Some(row) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let y = area.y + u16::try_from(row).unwrap_or(u16::MAX);
            buf.set_stringn(area.x, y, month.label(), usize::from(area.width.saturating_sub(1)), style);
        }
    }
}

/// Decade labels under the grid, aligned with their columns.
pub struct YearAxis<'a> {
    app: &'a App,
}

impl<'a> YearAxis<'a> {
    pub const fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for YearAxis<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let mut free_from = area.x;

        for column in 0..area.width {
            let Some(year) = app.year_at(app.year_offset + usize::from(column)) else {
                break;
            };
            let x = area.x + column;
            if year % YEAR_LABEL_EVERY != 0 || x < free_from {
                continue;
            }

            let label = year.to_string();
            let room = usize::from(area.right().saturating_sub(x));
            if room < label.len() {
                break;
            }
            buf.set_stringn(x, area.y, &label, room, Style::default().fg(Color::Gray));
            free_from = x + u16::try_from(label.len()).unwrap_or(u16::MAX) + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_heatmap::{ChartRenderer, ColorBucketer, DataPoint, Dataset, Layout, Surface};

    fn app(points: Vec<DataPoint>) -> App {
        let dataset = Dataset::new(8.66, points);
        let mut surface = Surface::new();
        let chart = ChartRenderer::new(Layout::default(), ColorBucketer::default())
            .render_dataset(&dataset, &mut surface)
            .unwrap();
        App::new(dataset, chart, surface, None)
    }

    #[test]
    fn test_grid_paints_bucket_colors_and_gaps() {
        let app = app(vec![
            DataPoint::new(1900, Month::January, -5.0),
            DataPoint::new(1901, Month::March, 5.0),
        ]);
        let area = Rect::new(0, 0, 4, 12);
        let mut buf = Buffer::empty(area);
        HeatmapGrid::new(&app).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].bg, Color::Rgb(0x45, 0x75, 0xb4));
        assert_eq!(buf[(1, 2)].bg, Color::Rgb(0xd7, 0x30, 0x27));
        assert_eq!(buf[(0, 1)].symbol(), EMPTY_CELL);
        // no third year
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].bg, Color::Reset);
    }

    #[test]
    fn test_grid_marks_the_pointer() {
        let mut app = app(vec![DataPoint::new(1900, Month::February, 0.0)]);
        app.hover(Cursor {
            year_index: 0,
            month_index: 1,
        });
        let area = Rect::new(0, 0, 1, 12);
        let mut buf = Buffer::empty(area);
        HeatmapGrid::new(&app).render(area, &mut buf);
        assert_eq!(buf[(0, 1)].symbol(), POINTER);
    }

    #[test]
    fn test_year_axis_labels_decades_without_overlap() {
        let points = (1895..1925).map(|year| DataPoint::new(year, Month::January, 0.0)).collect();
        let app = app(points);
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        YearAxis::new(&app).render(area, &mut buf);

        let line: String = (0..30).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(line.trim_end(), "     1900      1910      1920");
    }
}
