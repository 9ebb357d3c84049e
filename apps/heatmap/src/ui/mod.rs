// UI module for the heatmap viewer
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub use screens::heatmap::screen_layout;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::heatmap::render_heatmap(app, f);
}
