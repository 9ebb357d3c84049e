mod setup;

use color_eyre::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;

pub fn setup() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    setup::setup_terminal()
}

pub fn cleanup(raw_mode: bool, alternate_screen: bool) {
    setup::cleanup_terminal_state(raw_mode, alternate_screen);
}
