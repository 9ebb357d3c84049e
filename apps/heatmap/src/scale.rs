use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Dataset;

/// Months on the vertical axis. Month index `i` occupies the band `[y(i), y(i + 1))`.
pub const MONTH_BANDS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScaleError {
    #[error("cannot build scales for an empty dataset")]
    EmptyDataset,

    #[error("layout {width}x{height} with padding {padding} leaves no room to plot")]
    DegenerateLayout {
        width: f64,
        height: f64,
        padding: f64,
    },
}

/// Pixel geometry of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub legend_width: f64,
    pub legend_height: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 540.0,
            padding: 60.0,
            legend_width: 400.0,
            legend_height: 20.0,
        }
    }
}

impl Layout {
    pub fn usable_width(&self) -> f64 {
        2.0f64.mul_add(-self.padding, self.width)
    }

    pub fn usable_height(&self) -> f64 {
        2.0f64.mul_add(-self.padding, self.height)
    }

    pub fn validate(&self) -> Result<(), ScaleError> {
        if self.usable_width() > 0.0 && self.usable_height() > 0.0 && self.padding >= 0.0 {
            Ok(())
        } else {
            Err(ScaleError::DegenerateLayout {
                width: self.width,
                height: self.height,
                padding: self.padding,
            })
        }
    }
}

/// Linear map from a domain interval onto a pixel interval, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return r0;
        }
        let t = ((value - d0) / (d1 - d0)).clamp(0.0, 1.0);
        // lerp written so t = 0 and t = 1 land exactly on the range ends
        r0.mul_add(1.0 - t, r1 * t)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        let t = ((pixel - r0) / (r1 - r0)).clamp(0.0, 1.0);
        d0.mul_add(1.0 - t, d1 * t)
    }
}

/// Year → x. `min_year` lands on the range start, `max_year` on the range end.
pub fn build_x_scale(min_year: i32, max_year: i32, range: (f64, f64)) -> LinearScale {
    LinearScale::new((f64::from(min_year), f64::from(max_year)), range)
}

/// Month index → y, January at the top.
#[allow(clippy::cast_precision_loss)]
pub fn build_y_scale(range: (f64, f64)) -> LinearScale {
    LinearScale::new((0.0, MONTH_BANDS as f64), range)
}

/// Both axes plus cell size, derived once from the loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub x: LinearScale,
    pub y: LinearScale,
    pub cell_width: f64,
    pub cell_height: f64,
    pub min_year: i32,
    pub max_year: i32,
}

impl Scales {
    pub fn from_dataset(dataset: &Dataset, layout: &Layout) -> Result<Self, ScaleError> {
        layout.validate()?;
        let (min_year, max_year) = dataset.year_bounds().ok_or(ScaleError::EmptyDataset)?;
        let years = dataset.distinct_years().len();

        let x = build_x_scale(
            min_year,
            max_year,
            (layout.padding, layout.width - layout.padding),
        );
        let y = build_y_scale((layout.padding, layout.height - layout.padding));

        #[allow(clippy::cast_precision_loss)]
        let cell_width = layout.usable_width() / years as f64;
        #[allow(clippy::cast_precision_loss)]
        let cell_height = layout.usable_height() / MONTH_BANDS as f64;

        Ok(Self {
            x,
            y,
            cell_width,
            cell_height,
            min_year,
            max_year,
        })
    }

    pub fn year_x(&self, year: i32) -> f64 {
        self.x.map(f64::from(year))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn month_y(&self, month_index: usize) -> f64 {
        self.y.map(month_index as f64)
    }

    /// Year and month index whose cell covers the pixel, if any.
    pub fn locate(&self, px: f64, py: f64) -> Option<(i32, usize)> {
        let (x0, x1) = self.x.range();
        let (y0, y1) = self.y.range();
        if px < x0 || px >= x1 + self.cell_width || py < y0 || py >= y1 {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let year = (self.x.invert(px) + 1e-9).floor() as i32;
        if px >= self.year_x(year) + self.cell_width {
            // between two narrow cells
            return None;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let month_index = (self.y.invert(py).floor() as usize).min(MONTH_BANDS - 1);
        Some((year, month_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataPoint, Month};

    fn dataset(years: std::ops::RangeInclusive<i32>) -> Dataset {
        let points = years
            .flat_map(|year| Month::ALL.iter().map(move |month| DataPoint::new(year, *month, 0.0)))
            .collect();
        Dataset::new(8.66, points)
    }

    #[test]
    fn test_x_scale_hits_padding_at_both_ends() {
        let layout = Layout::default();
        let scale = build_x_scale(1753, 2015, (layout.padding, layout.width - layout.padding));

        assert!((scale.map(1753.0) - layout.padding).abs() < f64::EPSILON);
        assert!((scale.map(2015.0) - (layout.width - layout.padding)).abs() < f64::EPSILON);
        assert!(scale.map(1800.0) < scale.map(1801.0));
    }

    #[test]
    fn test_x_scale_clamps_outside_domain() {
        let scale = build_x_scale(1900, 2000, (60.0, 1140.0));
        assert!((scale.map(1800.0) - 60.0).abs() < f64::EPSILON);
        assert!((scale.map(2100.0) - 1140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invert_undoes_map_on_the_domain() {
        let scale = build_x_scale(1753, 2015, (60.0, 1140.0));
        for year in [1753, 1800, 1901, 2015] {
            let pixel = scale.map(f64::from(year));
            assert!((scale.invert(pixel) - f64::from(year)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_single_year_maps_to_range_start() {
        let scale = build_x_scale(1900, 1900, (60.0, 1140.0));
        assert!((scale.map(1900.0) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_y_scale_puts_january_on_top() {
        let scale = build_y_scale((60.0, 480.0));
        assert!((scale.map(0.0) - 60.0).abs() < f64::EPSILON);
        assert!((scale.map(12.0) - 480.0).abs() < f64::EPSILON);
        assert!(scale.map(0.0) < scale.map(11.0));
    }

    #[test]
    fn test_scales_from_dataset_use_actual_bounds() -> Result<(), ScaleError> {
        let layout = Layout::default();
        let scales = Scales::from_dataset(&dataset(1900..=1909), &layout)?;

        assert_eq!((scales.min_year, scales.max_year), (1900, 1909));
        assert!((scales.cell_width - layout.usable_width() / 10.0).abs() < 1e-9);
        assert!((scales.cell_height - layout.usable_height() / 12.0).abs() < 1e-9);
        assert!((scales.month_y(1) - scales.month_y(0) - scales.cell_height).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_empty_dataset_and_degenerate_layout_are_errors() {
        let layout = Layout::default();
        assert_eq!(
            Scales::from_dataset(&Dataset::new(8.66, Vec::new()), &layout),
            Err(ScaleError::EmptyDataset)
        );

        let cramped = Layout {
            width: 100.0,
            padding: 60.0,
            ..Layout::default()
        };
        assert!(matches!(
            Scales::from_dataset(&dataset(1900..=1901), &cramped),
            Err(ScaleError::DegenerateLayout { .. })
        ));
    }

    #[test]
    fn test_locate_finds_the_covering_cell() -> Result<(), ScaleError> {
        let scales = Scales::from_dataset(&dataset(1900..=1909), &Layout::default())?;

        let x = scales.year_x(1903) + scales.cell_width / 2.0;
        let y = scales.month_y(4) + scales.cell_height / 2.0;
        assert_eq!(scales.locate(x, y), Some((1903, 4)));

        assert_eq!(scales.locate(0.0, y), None);
        assert_eq!(scales.locate(x, 0.0), None);
        Ok(())
    }
}
