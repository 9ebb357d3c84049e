// App module for the heatmap viewer
// Holds viewer state and maps keys and mouse movement onto hover events

pub mod helpers;
pub mod input;
pub mod state;

pub use input::{handle_input, handle_mouse};
pub use state::{App, Cursor};
