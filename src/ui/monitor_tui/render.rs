use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
};

use chrono::{Local, TimeZone};

use crate::core::monitor::{AlertSeverity, ServiceStatus};
use crate::ui::formatters::{format_duration, format_latency, format_size};

use super::app::DashboardApp;
use super::widgets::{colored_gauge, severity_style};

/// Main render function for the security view
pub fn render_ui(frame: &mut Frame, app: &DashboardApp) {
    let area = frame.area();

    let has_alerts = !app.snapshot.alerts.is_empty();
    let alert_height = if has_alerts {
        // 1 line per alert + 2 for borders
        (app.snapshot.alerts.len().min(3) + 2) as u16
    } else {
        0
    };

    let constraints = if has_alerts {
        vec![
            Constraint::Length(3),            // Header
            Constraint::Length(alert_height), // Alerts banner
            Constraint::Percentage(30),       // System gauges + CPU trend
            Constraint::Percentage(25),       // Security panel + suspicious IPs
            Constraint::Percentage(20),       // Services table
            Constraint::Min(4),               // Recent matches
            Constraint::Length(1),            // Footer
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Min(4),
            Constraint::Length(1),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    if has_alerts {
        render_header(frame, chunks[0], app);
        render_alerts_banner(frame, chunks[1], app);
        render_system_section(frame, chunks[2], app);
        render_security_section(frame, chunks[3], app);
        render_services_section(frame, chunks[4], app);
        render_matches_section(frame, chunks[5], app);
        render_footer(frame, chunks[6]);
    } else {
        render_header(frame, chunks[0], app);
        render_system_section(frame, chunks[1], app);
        render_security_section(frame, chunks[2], app);
        render_services_section(frame, chunks[3], app);
        render_matches_section(frame, chunks[4], app);
        render_footer(frame, chunks[5]);
    }

    if app.show_help {
        render_help_overlay(frame, area);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let snapshot = &app.snapshot;
    let load = snapshot.system.load_average;

    let completeness = if snapshot.security.complete {
        ""
    } else {
        " │ DEGRADED: some sources unavailable"
    };

    let title = format!(
        " Security Monitor │ {} │ Uptime: {} │ Load: {:.2} {:.2} {:.2} │ Refresh: {}ms{} ",
        format_timestamp(snapshot.timestamp),
        format_duration(snapshot.system.uptime_secs),
        load.0,
        load.1,
        load.2,
        app.interval_ms,
        completeness
    );

    let border_color = if snapshot.security.complete {
        Color::Cyan
    } else {
        Color::Yellow
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(block, area);
}

/// Render alerts banner with the most severe alerts first
fn render_alerts_banner(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let block = Block::default()
        .title(" ⚠ ALERTS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut alerts_to_show: Vec<_> = app.snapshot.alerts.iter().collect();
    alerts_to_show.sort_by_key(|a| match a.severity {
        AlertSeverity::Critical => 0,
        AlertSeverity::Warning => 1,
        AlertSeverity::Info => 2,
    });
    alerts_to_show.truncate(3);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); alerts_to_show.len()])
        .split(inner);

    for (i, alert) in alerts_to_show.iter().enumerate() {
        let (icon, color) = severity_style(alert.severity);
        let text = Paragraph::new(format!("{} {}", icon, alert.message))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        frame.render_widget(text, layout[i]);
    }
}

fn render_system_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let system = &app.snapshot.system;

    let block = Block::default()
        .title(format!(
            " System │ Net in: {} out: {} ",
            format_size(system.network_in_bytes),
            format_size(system.network_out_bytes)
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(inner);

    let gauges = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(columns[0]);

    frame.render_widget(
        colored_gauge(system.cpu_percent, &format!("CPU {:.1}%", system.cpu_percent)),
        gauges[0],
    );
    frame.render_widget(
        colored_gauge(
            system.memory_percent,
            &format!("MEM {:.1}%", system.memory_percent),
        ),
        gauges[1],
    );
    frame.render_widget(
        colored_gauge(
            system.disk_percent,
            &format!("DISK {:.1}%", system.disk_percent),
        ),
        gauges[2],
    );

    render_cpu_trend(frame, columns[1], app);
}

/// CPU history bar chart. Values are scaled x10 so sub-percent changes
/// still move the bars.
fn render_cpu_trend(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    if area.width < 10 || area.height < 2 {
        return;
    }

    let series = app.history.cpu_series();
    if series.is_empty() {
        let para =
            Paragraph::new(" collecting... ").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, area);
        return;
    }

    // Keep only the bars that fit
    let visible = (area.width / 2) as usize;
    let start = series.len().saturating_sub(visible);
    let data: Vec<(&str, u64)> = series[start..].iter().map(|v| ("", *v)).collect();

    let chart = BarChart::default()
        .block(Block::default().title(" CPU trend ").borders(Borders::ALL))
        .data(&data)
        .bar_width(1)
        .bar_gap(1)
        .max(1000)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    frame.render_widget(chart, area);
}

fn render_security_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let security = &app.snapshot.security;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let ssl_text = if security.ssl_checked {
        format!("{} days", security.ssl_days_remaining)
    } else {
        "not checked".to_string()
    };

    let lines = vec![
        Line::from(format!("Failed logins (401): {}", security.failed_login_count)),
        Line::from(format!("Rate-limit hits:     {}", security.rate_limit_hit_count)),
        Line::from(format!("SSL certificate:     {}", ssl_text)),
    ];

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(" Security ")
            .borders(Borders::ALL),
    );
    frame.render_widget(para, columns[0]);

    let items: Vec<ListItem> = if security.suspicious_ips.is_empty() {
        vec![ListItem::new("none").style(Style::default().fg(Color::DarkGray))]
    } else {
        security
            .suspicious_ips
            .iter()
            .map(|ip| ListItem::new(ip.as_str()).style(Style::default().fg(Color::LightRed)))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(
                " Suspicious IPs ({}) ",
                security.suspicious_ips.len()
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, columns[1]);
}

fn render_services_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let block = Block::default().title(" Services ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let header = Row::new(vec![
        Cell::from("Service").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Status").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Response").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    let rows: Vec<Row> = app
        .snapshot
        .services
        .services
        .iter()
        .map(|entry| {
            let status_color = match entry.status {
                ServiceStatus::Healthy => Color::Green,
                ServiceStatus::Unhealthy => Color::Red,
                ServiceStatus::Unknown => Color::DarkGray,
            };

            let response = if entry.response_time_seconds > 0.0 {
                format_latency(entry.response_time_seconds)
            } else {
                "-".to_string()
            };

            Row::new(vec![
                Cell::from(entry.name.clone()),
                Cell::from(entry.status.label()).style(Style::default().fg(status_color)),
                Cell::from(response),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_matches_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let matches = &app.snapshot.matches;

    let items: Vec<ListItem> = if matches.is_empty() {
        vec![ListItem::new("no suspicious requests in window")
            .style(Style::default().fg(Color::DarkGray))]
    } else {
        matches
            .iter()
            .rev()
            .map(|m| {
                let text = format!("{} [{}] {}", m.ip, m.signature.label(), m.raw_line);
                ListItem::new(text).style(Style::default().fg(Color::LightYellow))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Recent attack patterns ({}) ", matches.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ ?: Help │ Tab: Network view ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}

pub(super) fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = r#"
    Vigil Security Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ? / h       Toggle this help screen
    Tab         Switch security/network view

    Press ? again to close this help
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(paragraph, popup_area);
}

/// Render a snapshot unix timestamp as local wall-clock time
pub(super) fn format_timestamp(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "-".to_string(),
    }
}

/// Helper function to create a centered rect
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
