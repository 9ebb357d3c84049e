use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use temperature_heatmap::color::Rgb;

const MAX_SWATCH_WIDTH: u16 = 7;

/// Colour swatches with their upper thresholds underneath. The bucket of the
/// hovered cell gets a bold label.
pub struct Legend<'a> {
    table: &'a [(f64, Rgb)],
    active: Option<usize>,
}

impl<'a> Legend<'a> {
    pub const fn new(table: &'a [(f64, Rgb)]) -> Self {
        Self { table, active: None }
    }

    #[must_use]
    pub const fn active(mut self, bucket: Option<usize>) -> Self {
        self.active = bucket;
        self
    }
}

impl Widget for Legend<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = u16::try_from(self.table.len()).unwrap_or(u16::MAX);
        if count == 0 || area.height == 0 {
            return;
        }
        let swatch = (area.width / count).clamp(1, MAX_SWATCH_WIDTH);

        for (index, (threshold, color)) in self.table.iter().enumerate() {
            let offset = u16::try_from(index).unwrap_or(u16::MAX).saturating_mul(swatch);
            let x = area.x.saturating_add(offset);
            if x.saturating_add(swatch) > area.right() {
                break;
            }

            buf.set_style(Rect::new(x, area.y, swatch, 1), Style::default().bg(Color::from(*color)));

            if area.height > 1 {
                let style = if self.active == Some(index) {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let label = format!("{threshold:.1}");
                let pad = swatch.saturating_sub(u16::try_from(label.len()).unwrap_or(u16::MAX)) / 2;
                buf.set_stringn(x + pad, area.y + 1, &label, usize::from(swatch), style);
            }
        }
    }
}
