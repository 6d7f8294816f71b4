/// Events that can occur in the dashboard TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Switch to the next view
    NextView,
    /// Switch to the previous view
    PrevView,
    /// No action
    None,
}
