use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bucket::{Bucket, ColorBucketer};
use crate::dataset::Dataset;
use crate::domain::{without_negative_zero, DataPoint, Month};
use crate::scale::{Layout, ScaleError, Scales, MONTH_BANDS};
use crate::surface::{Element, ElementPath, Surface};

pub const CHART_TITLE: &str = "Monthly Global Land-Surface Temperature";

const YEAR_TICK_EVERY: i32 = 10;
const TICK_SIZE: f64 = 6.0;
const LEGEND_GAP: f64 = 24.0;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error("rendered chart has no element at {0:?}")]
    MissingElement(ElementPath),
}

/// Pointer events delivered to a [`HoverHandler`], carrying the cell index
/// and pointer position in chart pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Enter { cell: usize, x: f64, y: f64 },
    Leave,
}

/// Receiver for hover events with the hovered point as payload.
pub trait HoverHandler {
    fn on_enter(&mut self, point: &DataPoint, pointer: (f64, f64));
    fn on_leave(&mut self);
}

/// One drawn cell and the data it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBinding {
    pub path: ElementPath,
    pub point: DataPoint,
    pub temperature: f64,
    pub bucket: Bucket,
}

/// Handles into a chart that has been appended to a [`Surface`].
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub svg: ElementPath,
    pub tooltip: ElementPath,
    pub scales: Scales,
    cells: Vec<CellBinding>,
    by_position: HashMap<(i32, usize), usize>,
}

impl RenderedChart {
    pub fn cells(&self) -> &[CellBinding] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&CellBinding> {
        self.cells.get(index)
    }

    /// Cell index for a year and zero-based month index.
    pub fn cell_for(&self, year: i32, month_index: usize) -> Option<usize> {
        self.by_position.get(&(year, month_index)).copied()
    }

    /// Cell index under a chart pixel.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<usize> {
        let (year, month_index) = self.scales.locate(x, y)?;
        self.cell_for(year, month_index)
    }

    pub fn overflow_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.bucket.overflow).count()
    }

    /// Delivers an event to the handler. Returns false for an unknown cell.
    pub fn dispatch<H: HoverHandler + ?Sized>(&self, event: PointerEvent, handler: &mut H) -> bool {
        match event {
            PointerEvent::Enter { cell, x, y } => match self.cells.get(cell) {
                Some(binding) => {
                    handler.on_enter(&binding.point, (x, y));
                    true
                }
                None => false,
            },
            PointerEvent::Leave => {
                handler.on_leave();
                true
            }
        }
    }

    pub fn tooltip_element<'s>(&self, surface: &'s mut Surface) -> Result<&'s mut Element, ChartError> {
        surface
            .get_mut(&self.tooltip)
            .ok_or_else(|| ChartError::MissingElement(self.tooltip.clone()))
    }
}

/// Draws the heatmap into a surface: title, axes, one rect per point, legend and tooltip.
#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer<'a> {
    layout: Layout,
    bucketer: ColorBucketer<'a>,
}

impl<'a> ChartRenderer<'a> {
    pub const fn new(layout: Layout, bucketer: ColorBucketer<'a>) -> Self {
        Self { layout, bucketer }
    }

    /// Builds scales from the dataset and renders in one go.
    pub fn render_dataset(&self, dataset: &Dataset, surface: &mut Surface) -> Result<RenderedChart, ChartError> {
        let scales = Scales::from_dataset(dataset, &self.layout)?;
        Ok(self.render(dataset, &scales, surface))
    }

    /// Appends the chart and its tooltip to the surface. Calling this twice
    /// appends a second copy.
    pub fn render(&self, dataset: &Dataset, scales: &Scales, surface: &mut Surface) -> RenderedChart {
        let layout = &self.layout;
        let legend_top = layout.height - layout.padding + LEGEND_GAP + layout.padding / 2.0;
        let svg_height = legend_top + layout.legend_height * 2.0 + LEGEND_GAP;

        let mut svg = Element::new("svg")
            .id("chart")
            .attr("width", px(layout.width))
            .attr("height", px(svg_height));

        svg.push(
            Element::new("text")
                .id("title")
                .attr("x", px(layout.width / 2.0))
                .attr("y", px(layout.padding / 3.0))
                .attr("text-anchor", "middle")
                .text(CHART_TITLE),
        );
        svg.push(
            Element::new("text")
                .id("description")
                .attr("x", px(layout.width / 2.0))
                .attr("y", px(layout.padding * 2.0 / 3.0))
                .attr("text-anchor", "middle")
                .text(format!(
                    "{} - {}: base temperature {}℃",
                    scales.min_year,
                    scales.max_year,
                    dataset.base_temperature()
                )),
        );
        svg.push(self.x_axis(scales));
        svg.push(self.y_axis(scales));

        // Cells go into their own group so their paths are stable.
        let mut cells_group = Element::new("g").class("cells");
        let mut cells = Vec::with_capacity(dataset.len());
        let mut by_position = HashMap::with_capacity(dataset.len());
        for point in dataset.points() {
            let temperature = dataset.temperature(point);
            let bucket = self.bucketer.classify(temperature);
            let index = cells_group.push(self.cell(point, temperature, &bucket, scales));
            by_position.insert((point.year, point.month_index()), cells.len());
            cells.push(CellBinding {
                path: vec![index],
                point: *point,
                temperature,
                bucket,
            });
        }
        let cells_index = svg.push(cells_group);
        svg.push(self.legend(legend_top));

        let svg_path = surface.append(svg);
        for cell in &mut cells {
            let mut path = svg_path.clone();
            path.push(cells_index);
            path.append(&mut cell.path);
            cell.path = path;
        }

        let tooltip = surface.append(
            Element::new("div")
                .id("tooltip")
                .attr("style", "opacity: 0; left: 0px; top: 0px;"),
        );

        let rendered = RenderedChart {
            svg: svg_path,
            tooltip,
            scales: *scales,
            cells,
            by_position,
        };

        let overflow = rendered.overflow_count();
        if overflow > 0 {
            warn!(
                overflow,
                hottest = self.bucketer.table().last().map_or(f64::NAN, |(threshold, _)| *threshold),
                "cells hotter than the last bucket were clamped"
            );
        }
        info!(
            cells = rendered.cells.len(),
            min_year = scales.min_year,
            max_year = scales.max_year,
            "chart rendered"
        );
        rendered
    }

    fn cell(&self, point: &DataPoint, temperature: f64, bucket: &Bucket, scales: &Scales) -> Element {
        Element::new("rect")
            .class("cell")
            .attr("x", px(scales.year_x(point.year)))
            .attr("y", px(scales.month_y(point.month_index())))
            .attr("width", px(scales.cell_width))
            .attr("height", px(scales.cell_height))
            .attr("fill", bucket.color)
            .attr("data-year", point.year)
            .attr("data-month", point.month_index())
            .attr("data-temp", format!("{:.1}", without_negative_zero(temperature)))
    }

    fn x_axis(&self, scales: &Scales) -> Element {
        let (x0, x1) = scales.x.range();
        let mut axis = Element::new("g")
            .id("x-axis")
            .attr("transform", format!("translate(0,{})", px(self.layout.height - self.layout.padding)))
            .attr("text-anchor", "middle")
            .child(
                Element::new("path")
                    .class("domain")
                    .attr("stroke", "currentColor")
                    .attr("d", format!("M{},0H{}", px(x0), px(x1 + scales.cell_width))),
            );

        // No tick when the next round year does not fit in an i32.
        let offset = (YEAR_TICK_EVERY - scales.min_year.rem_euclid(YEAR_TICK_EVERY)) % YEAR_TICK_EVERY;
        let ticks: Vec<i32> = scales.min_year.checked_add(offset).map_or_else(Vec::new, |first| {
            (first..=scales.max_year)
                .step_by(YEAR_TICK_EVERY.unsigned_abs() as usize)
                .collect()
        });
        debug!(ticks = ticks.len(), "x axis ticks");

        for year in ticks {
            axis.push(
                Element::new("g")
                    .class("tick")
                    .attr("data-value", year)
                    .attr("transform", format!("translate({},0)", px(scales.year_x(year))))
                    .child(Element::new("line").attr("stroke", "currentColor").attr("y2", px(TICK_SIZE)))
                    .child(
                        Element::new("text")
                            .attr("fill", "currentColor")
                            .attr("y", px(TICK_SIZE + 3.0))
                            .attr("dy", "0.71em")
                            .text(year.to_string()),
                    ),
            );
        }
        axis
    }

    fn y_axis(&self, scales: &Scales) -> Element {
        let (y0, y1) = scales.y.range();
        let mut axis = Element::new("g")
            .id("y-axis")
            .attr("transform", format!("translate({},0)", px(self.layout.padding)))
            .attr("text-anchor", "end")
            .child(
                Element::new("path")
                    .class("domain")
                    .attr("stroke", "currentColor")
                    .attr("d", format!("M0,{}V{}", px(y0), px(y1))),
            );

        for month in Month::ALL.iter().take(MONTH_BANDS) {
            let centre = scales.month_y(month.index()) + scales.cell_height / 2.0;
            axis.push(
                Element::new("g")
                    .class("tick")
                    .attr("data-value", month.index())
                    .attr("transform", format!("translate(0,{})", px(centre)))
                    .child(Element::new("line").attr("stroke", "currentColor").attr("x2", px(-TICK_SIZE)))
                    .child(
                        Element::new("text")
                            .attr("fill", "currentColor")
                            .attr("x", px(-(TICK_SIZE + 3.0)))
                            .attr("dy", "0.32em")
                            .text(month.label()),
                    ),
            );
        }
        axis
    }

    fn legend(&self, top: f64) -> Element {
        let table = self.bucketer.table();
        #[allow(clippy::cast_precision_loss)]
        let swatch_width = self.layout.legend_width / table.len() as f64;
        let mut legend = Element::new("g")
            .id("legend")
            .attr("transform", format!("translate({},{})", px(self.layout.padding), px(top)));

        for (index, (threshold, color)) in table.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = swatch_width * index as f64;
            legend.push(
                Element::new("rect")
                    .class("legend-scale-cell")
                    .attr("x", px(x))
                    .attr("y", 0)
                    .attr("width", px(swatch_width))
                    .attr("height", px(self.layout.legend_height))
                    .attr("fill", color)
                    .attr("data-threshold", format!("{threshold:.1}")),
            );
            legend.push(
                Element::new("text")
                    .class("legend-label")
                    .attr("x", px(x + swatch_width / 2.0))
                    .attr("y", px(self.layout.legend_height + 14.0))
                    .attr("text-anchor", "middle")
                    .text(format!("{threshold:.1}")),
            );
        }
        legend
    }
}

/// Pixel values with at most three decimals and no trailing zeros.
fn px(value: f64) -> String {
    let formatted = format!("{value:.3}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
