pub mod heatmap;
pub mod legend;
pub mod popup;
pub mod tooltip;
