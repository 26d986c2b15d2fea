use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unlocktree::app::Details;
use unlocktree::interaction::HoldState;

/// What the sidebar needs from the app for one frame.
pub struct SidebarInfo<'a> {
    pub level: u32,
    pub unlocked: usize,
    pub total: usize,
    pub hold: HoldState,
    pub details: &'a Details,
}

pub fn draw_sidebar(frame: &mut Frame, area: Rect, info: &SidebarInfo) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Level
            Constraint::Min(6),    // Details
            Constraint::Length(9), // Controls
        ])
        .split(area);

    draw_level(frame, chunks[0], info);
    draw_details(frame, chunks[1], info.details);
    draw_controls(frame, chunks[2]);
}

fn draw_level(frame: &mut Frame, area: Rect, info: &SidebarInfo) {
    let status = match info.hold {
        HoldState::Idle => Span::styled("Idle", Style::default().fg(Color::DarkGray)),
        HoldState::Holding { .. } => Span::styled("Holding...", Style::default().fg(Color::Cyan)),
        HoldState::Animating { .. } => {
            Span::styled("Unlocking!", Style::default().fg(Color::Yellow))
        }
    };
    let lines = vec![
        Line::from(vec![
            Span::raw("Level: "),
            Span::styled(
                info.level.to_string(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(format!("Unlocked: {}/{}", info.unlocked, info.total)),
        Line::from(status),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Progress ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_details(frame: &mut Frame, area: Rect, details: &Details) {
    let title_style = match details {
        Details::Nothing => Style::default().fg(Color::DarkGray),
        Details::Achievement { .. } => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    };
    let mut lines = vec![
        Line::from(Span::styled(details.title().to_string(), title_style)),
        Line::from(""),
        Line::from(details.body().to_string()),
    ];
    if let Some(level_line) = details.level_line() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            level_line,
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_controls(frame: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
    let lines = vec![
        Line::from(vec![key("Hold click"), Span::raw("  unlock")]),
        Line::from(vec![key("Arrows/hjkl"), Span::raw(" pan")]),
        Line::from(vec![key("+/- wheel"), Span::raw("   zoom")]),
        Line::from(vec![key("0"), Span::raw("           recenter")]),
        Line::from(vec![key("R"), Span::raw("           reset progress")]),
        Line::from(vec![key("Q"), Span::raw("           quit")]),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Controls ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}
