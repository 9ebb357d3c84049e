use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;
use temperature_heatmap::summary::DatasetSummary;
use temperature_heatmap::{ColorBucketer, Dataset};
use tracing::{debug, warn};

use crate::app::{handle_input, handle_mouse, App};
use crate::ui;

// States for writing a snapshot of the chart
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ExportState {
    Idle,
    Writing,
    Saved,
    Failed,
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Writing => write!(f, "Writing"),
            Self::Saved => write!(f, "Saved"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Clone, Debug)]
enum ExportEvent {
    Start,
    Saved(PathBuf),
    Failed(String),
    Reset,
}

impl fmt::Display for ExportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Saved(path) => write!(f, "Saved({path})", path = path.display()),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: ExportState,
    event: ExportEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

struct ExportMachine {
    state: ExportState,
}

impl ExportMachine {
    const fn new() -> Self {
        Self {
            state: ExportState::Idle,
        }
    }

    const fn state(&self) -> ExportState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &ExportEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }

    /// Runs one full export cycle for a pending request.
    fn export(&mut self, app: &mut App) {
        app.export_requested = false;
        if let Err(e) = self.process_event(&ExportEvent::Start, app) {
            warn!(error = %e, "export already in progress");
            return;
        }

        let outcome = match app.save_snapshot() {
            Ok(path) => ExportEvent::Saved(path),
            Err(e) => ExportEvent::Failed(e.to_string()),
        };

        for event in [outcome, ExportEvent::Reset] {
            if let Err(e) = self.process_event(&event, app) {
                warn!(error = %e, "export state machine rejected event");
            }
        }
    }
}

struct NextState(ExportState);

impl TryFrom<(ExportState, &ExportEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (ExportState, &ExportEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (ExportState::Idle, ExportEvent::Start) => {
                app.status_message = format!("Saving {}...", app.snapshot_path.display());
                Ok(Self(ExportState::Writing))
            }
            (ExportState::Writing, ExportEvent::Saved(path)) => {
                app.status_message = format!("Saved chart to {}", path.display());
                Ok(Self(ExportState::Saved))
            }
            (ExportState::Writing, ExportEvent::Failed(error)) => {
                app.status_message = format!("Error: {error}");
                Ok(Self(ExportState::Failed))
            }
            (ExportState::Saved | ExportState::Failed, ExportEvent::Reset) => {
                Ok(Self(ExportState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// Print the dataset summary and exit (no UI)
pub fn run_headless(dataset: &Dataset, json: bool) -> Result<()> {
    let summary = DatasetSummary::build(dataset, &ColorBucketer::default());

    if json {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{json}");
    } else {
        print!("{summary}");
    }

    Ok(())
}

/// Run the main application event loop
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut export_machine = ExportMachine::new();

    while app.running {
        let size = terminal.size()?;
        let layout = ui::screen_layout(Rect::new(0, 0, size.width, size.height));
        app.set_visible_years(usize::from(layout.grid.width));

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    app.status_message.clear();
                    handle_input(app, key.code);
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse, layout.grid),
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read terminal event");
                }
            }
        }

        if app.export_requested && export_machine.state() == ExportState::Idle {
            export_machine.export(app);
        }
    }

    Ok(())
}
