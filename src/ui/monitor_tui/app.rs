use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::MonitorConfig;
use crate::core::monitor::{CycleSnapshot, MonitorRuntime, SnapshotHistory};

use super::event_handler::DashboardEvent;
use super::net_render::render_net_ui;
use super::render::render_ui;

/// Which dashboard is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Security,
    Network,
}

/// Dashboard application state
pub struct DashboardApp {
    pub snapshot: Arc<CycleSnapshot>,
    pub history: SnapshotHistory,
    pub should_quit: bool,
    pub show_help: bool,
    pub view: DashboardView,
    pub interval_ms: u64,
}

impl DashboardApp {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            snapshot: Arc::new(CycleSnapshot::default()),
            history: SnapshotHistory::with_capacity(config.history_size),
            should_quit: false,
            show_help: false,
            view: config.view,
            interval_ms: config.interval_ms,
        }
    }

    /// Take a freshly published snapshot and fold it into history
    pub fn update_snapshot(&mut self, snapshot: Arc<CycleSnapshot>) {
        self.history.push(snapshot.system.clone());
        self.snapshot = snapshot;
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Quit => self.should_quit = true,
            DashboardEvent::ToggleHelp => self.show_help = !self.show_help,
            DashboardEvent::NextView | DashboardEvent::PrevView => {
                self.view = match self.view {
                    DashboardView::Security => DashboardView::Network,
                    DashboardView::Network => DashboardView::Security,
                };
            }
            DashboardEvent::None => {}
        }
    }
}

/// Configuration for the dashboard app
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub interval_ms: u64,
    pub history_size: usize,
    pub report: Option<PathBuf>,
    pub view: DashboardView,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            history_size: crate::core::monitor::DEFAULT_HISTORY_SIZE,
            report: None,
            view: DashboardView::Security,
        }
    }
}

/// Run the dashboard TUI application
pub fn run_dashboard(config: MonitorConfig, app_config: DashboardConfig) -> Result<()> {
    let interval = Duration::from_millis(app_config.interval_ms);
    let runtime = MonitorRuntime::new(config, interval, app_config.report.clone())
        .context("Failed to start collection runtime")?;
    let mut snapshot_rx = runtime.snapshot_rx.clone();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = DashboardApp::new(&app_config);
    // Redraw faster than the collection interval so keys stay responsive
    let tick_rate = Duration::from_millis(app.interval_ms.min(500));
    let mut last_tick = Instant::now();

    // Main loop
    loop {
        // Pick up the latest published snapshot, if any
        if snapshot_rx.has_changed().unwrap_or(false) {
            let snapshot = snapshot_rx.borrow_and_update().clone();
            app.update_snapshot(snapshot);
        }

        // Draw UI
        terminal.draw(|frame| match app.view {
            DashboardView::Security => render_ui(frame, &app),
            DashboardView::Network => render_net_ui(frame, &app),
        })?;

        // Handle events with timeout
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    let dashboard_event = match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => DashboardEvent::Quit,
                        KeyCode::Char('?') | KeyCode::Char('h') => DashboardEvent::ToggleHelp,
                        KeyCode::Tab => DashboardEvent::NextView,
                        KeyCode::BackTab => DashboardEvent::PrevView,
                        KeyCode::Char('n') => DashboardEvent::NextView,
                        _ => DashboardEvent::None,
                    };
                    app.handle_event(dashboard_event);
                }
            }
        }

        if app.should_quit {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    runtime.shutdown();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}
