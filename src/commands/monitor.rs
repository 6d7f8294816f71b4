//! Security monitor command handler.
//!
//! Runs the periodic collection cycle behind a TUI dashboard, or streams
//! snapshots as JSON lines for scripting.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::MonitorConfig;
use crate::core::monitor::{write_report, CycleCollector, CycleSnapshot};
use crate::ui::monitor_tui::{run_dashboard, DashboardConfig, DashboardView};

/// Floor on the inter-cycle sleep so a slow cycle cannot busy-loop.
const MIN_CYCLE_SLEEP: Duration = Duration::from_millis(100);

/// Execute the monitor command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = MonitorConfig::load()?;

    let interval = matches
        .get_one::<u64>("interval")
        .copied()
        .unwrap_or(config.interval_ms);

    if let Some(window) = matches.get_one::<usize>("window").copied() {
        config.log_window = window;
    }

    let report = matches.get_one::<String>("report").map(PathBuf::from);

    if matches.get_flag("json") {
        return run_json_output(config, interval, report);
    }

    let app_config = DashboardConfig {
        interval_ms: interval,
        history_size: config.history_size,
        report,
        view: DashboardView::Security,
    };

    run_dashboard(config, app_config).context("Failed to run security monitor")
}

/// Run in JSON output mode (for scripting)
///
/// A failing cycle (unwritable report path, serialization error) is logged
/// and followed by an extended backoff; only Ctrl-C stops the stream.
fn run_json_output(
    config: MonitorConfig,
    interval_ms: u64,
    report: Option<PathBuf>,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = running.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(false, Ordering::SeqCst);
    })
    .context("Failed to install Ctrl-C handler")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut collector = CycleCollector::new(config)?;
    let interval = Duration::from_millis(interval_ms);

    runtime.block_on(async {
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

        while running.load(Ordering::SeqCst) {
            let started = Instant::now();
            let snapshot = collector.collect().await;

            let outcome = emit_snapshot(&snapshot, report.as_deref());
            if let Err(ref err) = outcome {
                log::error!("cycle failed: {err}; backing off");
            }

            let delay = stream_delay(outcome.is_ok(), interval, started.elapsed());
            tokio::time::sleep(delay).await;
        }
    });

    Ok(())
}

fn emit_snapshot(snapshot: &CycleSnapshot, report: Option<&Path>) -> Result<()> {
    println!("{}", serde_json::to_string(snapshot)?);

    if let Some(path) = report {
        write_report(path, snapshot)?;
    }

    Ok(())
}

/// Sleep for the remainder of the interval after a good cycle, or twice
/// the interval after a failed one.
fn stream_delay(cycle_ok: bool, interval: Duration, elapsed: Duration) -> Duration {
    if cycle_ok {
        interval.saturating_sub(elapsed).max(MIN_CYCLE_SLEEP)
    } else {
        interval * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_delay_subtracts_elapsed() {
        let delay = stream_delay(
            true,
            Duration::from_secs(5),
            Duration::from_secs(2),
        );
        assert_eq!(delay, Duration::from_secs(3));
    }

    #[test]
    fn test_stream_delay_floors_at_minimum() {
        let delay = stream_delay(true, Duration::from_secs(5), Duration::from_secs(60));
        assert_eq!(delay, MIN_CYCLE_SLEEP);
    }

    #[test]
    fn test_failed_cycle_doubles_the_interval() {
        let delay = stream_delay(false, Duration::from_secs(5), Duration::ZERO);
        assert_eq!(delay, Duration::from_secs(10));
    }

    #[test]
    fn test_unwritable_report_path_backs_off_instead_of_propagating() {
        let snapshot = CycleSnapshot::default();
        let bad_path = Path::new("/nonexistent-dir/vigil-report.json");

        let outcome = emit_snapshot(&snapshot, Some(bad_path));
        assert!(outcome.is_err());

        // The stream maps the failure to a backoff, not a process exit.
        let delay = stream_delay(outcome.is_ok(), Duration::from_secs(5), Duration::ZERO);
        assert_eq!(delay, Duration::from_secs(10));
    }
}
