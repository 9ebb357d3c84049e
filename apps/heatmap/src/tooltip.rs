use std::fmt;

use tracing::debug;

use crate::chart::HoverHandler;
use crate::domain::{round1, without_negative_zero, DataPoint};
use crate::surface::Element;

/// Pixel offset between the pointer and the tooltip's top-left corner.
pub const POINTER_OFFSET: (f64, f64) = (12.0, -28.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipState {
    Hidden,
    Visible { point: DataPoint, x: f64, y: f64 },
}

impl fmt::Display for TooltipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => write!(f, "Hidden"),
            Self::Visible { point, .. } => {
                write!(f, "Visible({} {})", point.month.label(), point.year)
            }
        }
    }
}

/// Text shown for one hovered point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub date: String,
    pub temperature: String,
    pub variance: String,
}

impl TooltipContent {
    pub fn for_point(base_temperature: f64, point: &DataPoint) -> Self {
        Self {
            date: format!("{} {}", point.month.label(), point.year),
            temperature: format!("{:.1}℃", without_negative_zero(round1(base_temperature + point.variance))),
            variance: format!("{}℃", format_variance(point.variance)),
        }
    }

    pub fn lines(&self) -> [&str; 3] {
        [&self.date, &self.temperature, &self.variance]
    }
}

/// Variance to one decimal, with `+` only for strictly positive values.
pub fn format_variance(variance: f64) -> String {
    let rounded = without_negative_zero(round1(variance));
    if rounded > 0.0 {
        format!("+{rounded:.1}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Shows and hides the single tooltip. Moving straight from one cell to
/// another overwrites the visible point without passing through `Hidden`.
#[derive(Debug, Clone)]
pub struct TooltipController {
    base_temperature: f64,
    state: TooltipState,
}

impl TooltipController {
    pub const fn new(base_temperature: f64) -> Self {
        Self {
            base_temperature,
            state: TooltipState::Hidden,
        }
    }

    pub const fn state(&self) -> &TooltipState {
        &self.state
    }

    pub const fn is_visible(&self) -> bool {
        matches!(self.state, TooltipState::Visible { .. })
    }

    pub const fn point(&self) -> Option<&DataPoint> {
        match &self.state {
            TooltipState::Visible { point, .. } => Some(point),
            TooltipState::Hidden => None,
        }
    }

    pub fn content(&self) -> Option<TooltipContent> {
        self.point()
            .map(|point| TooltipContent::for_point(self.base_temperature, point))
    }

    /// Rewrites the tooltip element to match the current state.
    pub fn apply(&self, element: &mut Element) {
        element.clear_children();
        match &self.state {
            TooltipState::Hidden => {
                element.set_attr("style", "opacity: 0; left: 0px; top: 0px;");
                element.remove_attr("data-year");
            }
            TooltipState::Visible { point, x, y } => {
                let left = x + POINTER_OFFSET.0;
                let top = y + POINTER_OFFSET.1;
                element.set_attr("style", format!("opacity: 0.9; left: {left}px; top: {top}px;"));
                element.set_attr("data-year", point.year);
                let content = TooltipContent::for_point(self.base_temperature, point);
                for line in content.lines() {
                    element.push(Element::new("div").text(line));
                }
            }
        }
    }
}

impl HoverHandler for TooltipController {
    fn on_enter(&mut self, point: &DataPoint, pointer: (f64, f64)) {
        self.state = TooltipState::Visible {
            point: *point,
            x: pointer.0,
            y: pointer.1,
        };
        debug!(state = %self.state, "tooltip shown");
    }

    fn on_leave(&mut self) {
        if self.is_visible() {
            debug!(state = %self.state, "tooltip hidden");
        }
        self.state = TooltipState::Hidden;
    }
}
