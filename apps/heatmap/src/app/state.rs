use std::path::PathBuf;

use color_eyre::Result;
use temperature_heatmap::chart::{CellBinding, CHART_TITLE};
use temperature_heatmap::{Dataset, PointerEvent, RenderedChart, Surface, TooltipController};
use tracing::{debug, info};

use super::helpers::{keep_in_view, step};

pub const DEFAULT_SNAPSHOT: &str = "heatmap.html";

/// Grid position of the pointer: a column into the year list and a zero-based month row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub year_index: usize,
    pub month_index: usize,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub export_requested: bool,
    pub status_message: String,
    pub dataset: Dataset,
    pub chart: RenderedChart,
    pub surface: Surface,
    pub tooltip: TooltipController,
    pub years: Vec<i32>,
    pub cursor: Option<Cursor>,
    pub year_offset: usize,
    pub visible_years: usize,
    pub snapshot_path: PathBuf,
    last_cursor: Cursor,
}

impl App {
    pub fn new(dataset: Dataset, chart: RenderedChart, surface: Surface, snapshot_path: Option<PathBuf>) -> Self {
        let years = dataset.distinct_years();
        let tooltip = TooltipController::new(dataset.base_temperature());
        let visible_years = years.len().max(1);

        Self {
            running: true,
            show_help: false,
            export_requested: false,
            status_message: String::new(),
            dataset,
            chart,
            surface,
            tooltip,
            years,
            cursor: None,
            year_offset: 0,
            visible_years,
            snapshot_path: snapshot_path.unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT)),
            last_cursor: Cursor::default(),
        }
    }

    pub fn year_at(&self, year_index: usize) -> Option<i32> {
        self.years.get(year_index).copied()
    }

    pub fn binding_at(&self, year_index: usize, month_index: usize) -> Option<&CellBinding> {
        let year = self.year_at(year_index)?;
        let cell = self.chart.cell_for(year, month_index)?;
        self.chart.cell(cell)
    }

    pub fn hovered_cell(&self) -> Option<&CellBinding> {
        let cursor = self.cursor?;
        self.binding_at(cursor.year_index, cursor.month_index)
    }

    /// Puts the pointer over a grid position. A position without data hides the tooltip.
    pub fn hover(&mut self, cursor: Cursor) {
        if self.years.is_empty() {
            return;
        }
        let cursor = Cursor {
            year_index: cursor.year_index.min(self.years.len() - 1),
            month_index: cursor.month_index.min(11),
        };

        self.cursor = Some(cursor);
        self.last_cursor = cursor;
        self.year_offset = keep_in_view(self.year_offset, self.visible_years, cursor.year_index, self.years.len());

        let event = self
            .year_at(cursor.year_index)
            .and_then(|year| self.chart.cell_for(year, cursor.month_index))
            .map_or(PointerEvent::Leave, |cell| {
                let (x, y) = self.pointer_for(cell);
                PointerEvent::Enter { cell, x, y }
            });
        debug!(?cursor, ?event, "pointer moved");

        self.chart.dispatch(event, &mut self.tooltip);
        self.sync_tooltip();
    }

    pub fn leave(&mut self) {
        self.cursor = None;
        self.chart.dispatch(PointerEvent::Leave, &mut self.tooltip);
        self.sync_tooltip();
    }

    /// Moves the pointer by whole cells. With no pointer on the grid it re-enters
    /// where it last left.
    pub fn move_cursor(&mut self, years: isize, months: isize) {
        let Some(current) = self.cursor else {
            self.hover(self.last_cursor);
            return;
        };

        self.hover(Cursor {
            year_index: step(current.year_index, years, self.years.len()),
            month_index: step(current.month_index, months, 12),
        });
    }

    /// Scrolls a full window of years; the pointer travels with the page.
    pub fn page(&mut self, forward: bool) {
        let window = isize::try_from(self.visible_years).unwrap_or(isize::MAX);
        let delta = if forward { window } else { -window };

        if self.cursor.is_some() {
            self.move_cursor(delta, 0);
        } else {
            let max_offset = self.years.len().saturating_sub(self.visible_years);
            self.year_offset = step(self.year_offset, delta, max_offset + 1);
        }
    }

    /// Records how many year columns fit on screen and keeps the pointer in view.
    pub fn set_visible_years(&mut self, visible: usize) {
        self.visible_years = visible.max(1);
        let selected = self.cursor.map_or(self.year_offset, |cursor| cursor.year_index);
        self.year_offset = keep_in_view(self.year_offset, self.visible_years, selected, self.years.len());
    }

    /// Writes the surface, tooltip state included, to the snapshot path.
    pub fn save_snapshot(&self) -> Result<PathBuf> {
        self.surface.write_document(&self.snapshot_path, CHART_TITLE)?;
        info!(path = %self.snapshot_path.display(), "snapshot written");
        Ok(self.snapshot_path.clone())
    }

    // Cell centre in chart pixels.
    fn pointer_for(&self, cell: usize) -> (f64, f64) {
        let scales = &self.chart.scales;
        self.chart.cell(cell).map_or((0.0, 0.0), |binding| {
            (
                scales.year_x(binding.point.year) + scales.cell_width / 2.0,
                scales.month_y(binding.point.month_index()) + scales.cell_height / 2.0,
            )
        })
    }

    fn sync_tooltip(&mut self) {
        match self.chart.tooltip_element(&mut self.surface) {
            Ok(element) => self.tooltip.apply(element),
            Err(e) => self.status_message = format!("Error: {e}"),
        }
    }
}
