//! Terminal dashboard for the security monitor.
//!
//! Provides a real-time view over the collection runtime using ratatui.

mod app;
mod event_handler;
mod net_render;
mod render;
mod widgets;

pub use app::{run_dashboard, DashboardApp, DashboardConfig, DashboardView};
pub use event_handler::DashboardEvent;
