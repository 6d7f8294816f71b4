use ratatui::{
    prelude::*,
    widgets::{BarChart, Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
};

use super::app::DashboardApp;

/// Main render function for the network view
pub fn render_net_ui(frame: &mut Frame, app: &DashboardApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Header
            Constraint::Percentage(40), // Connections
            Constraint::Percentage(40), // Traffic
            Constraint::Min(3),         // Suspicious IPs
            Constraint::Length(1),      // Footer
        ])
        .split(area);

    render_net_header(frame, chunks[0], app);
    render_connections_section(frame, chunks[1], app);
    render_traffic_section(frame, chunks[2], app);
    render_suspicious_section(frame, chunks[3], app);
    render_net_footer(frame, chunks[4]);

    if app.show_help {
        super::render::render_help_overlay(frame, area);
    }
}

fn render_net_header(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let connections = &app.snapshot.connections;

    let completeness = if connections.complete {
        ""
    } else {
        " │ DEGRADED: connection table unavailable"
    };

    let title = format!(
        " Network Monitor │ {} │ Refresh: {}ms{} ",
        super::render::format_timestamp(app.snapshot.timestamp),
        app.interval_ms,
        completeness
    );

    let border_color = if connections.complete {
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

fn render_connections_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let connections = &app.snapshot.connections;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let lines = vec![
        Line::from(format!("Total:       {}", connections.total)),
        Line::from(format!("Established: {}", connections.established)),
        Line::from(format!("Time-wait:   {}", connections.time_wait)),
        Line::from(format!("Listening:   {}", connections.listen)),
    ];

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(" TCP connections ")
            .borders(Borders::ALL),
    );
    frame.render_widget(para, columns[0]);

    render_port_chart(frame, columns[1], app);
}

fn render_port_chart(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let top = app.snapshot.connections.top_ports(8);
    if top.is_empty() {
        let para = Paragraph::new(" no connections ")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Ports ").borders(Borders::ALL));
        frame.render_widget(para, area);
        return;
    }

    let labels: Vec<String> = top.iter().map(|(port, _)| port.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(top.iter())
        .map(|(label, (_, count))| (label.as_str(), *count))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" Connections per port ")
                .borders(Borders::ALL),
        )
        .data(&data)
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::LightYellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::LightYellow));

    frame.render_widget(chart, area);
}

fn render_traffic_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let traffic = &app.snapshot.traffic;

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let lines = vec![
        Line::from(format!("Requests in window: {}", traffic.total_requests)),
        Line::from(format!("Unique clients:     {}", traffic.unique_ips)),
    ];

    let para = Paragraph::new(lines).block(
        Block::default()
            .title(" Proxy traffic ")
            .borders(Borders::ALL),
    );
    frame.render_widget(para, columns[0]);

    let block = Block::default()
        .title(" Status codes ")
        .borders(Borders::ALL);
    let inner = block.inner(columns[1]);
    frame.render_widget(block, columns[1]);

    if inner.height < 2 {
        return;
    }

    let header = Row::new(vec![
        Cell::from("Code").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Count").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    let rows: Vec<Row> = traffic
        .status_codes
        .iter()
        .map(|(code, count)| {
            let color = match code {
                200..=299 => Color::Green,
                300..=399 => Color::Cyan,
                400..=499 => Color::LightYellow,
                _ => Color::Red,
            };
            Row::new(vec![
                Cell::from(code.to_string()).style(Style::default().fg(color)),
                Cell::from(count.to_string()),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(8), Constraint::Length(10)]).header(header);
    frame.render_widget(table, inner);
}

fn render_suspicious_section(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let ips = &app.snapshot.security.suspicious_ips;

    let items: Vec<ListItem> = if ips.is_empty() {
        vec![ListItem::new("none").style(Style::default().fg(Color::DarkGray))]
    } else {
        ips.iter()
            .map(|ip| ListItem::new(ip.as_str()).style(Style::default().fg(Color::LightRed)))
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Suspicious IPs ({}) ", ips.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, area);
}

fn render_net_footer(frame: &mut Frame, area: Rect) {
    let help = " q: Quit │ ?: Help │ Tab: Security view ";
    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
