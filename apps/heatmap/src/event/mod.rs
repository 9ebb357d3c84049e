// Event handling: the interactive loop and the headless report

mod loop_handler;

pub use loop_handler::{run, run_headless};
