//! Network monitor command handler.
//!
//! Opens the dashboard directly on the connections/traffic view, refreshed
//! on its own (faster) interval.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::MonitorConfig;
use crate::ui::monitor_tui::{run_dashboard, DashboardConfig, DashboardView};

/// Execute the net command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;

    let interval = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(config.net_interval_ms);

    if let Some(window) = matches.get_one::<usize>("window").copied() {
        config.log_window = window;
    }

    let app_config = DashboardConfig {
        interval_ms: interval,
        history_size: config.history_size,
        report: None,
        view: DashboardView::Network,
    };

    run_dashboard(config, app_config).context("Failed to run network monitor")
}
