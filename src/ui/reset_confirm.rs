use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Draws the reset confirmation dialog as an overlay
pub fn draw_reset_confirm(frame: &mut Frame, level: u32, unlocked: usize) {
    let size = frame.size();

    let dialog_width = 44.min(size.width.saturating_sub(4));
    let dialog_height = 11.min(size.height.saturating_sub(4));

    let x = (size.width.saturating_sub(dialog_width)) / 2;
    let y = (size.height.saturating_sub(dialog_height)) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let title = Line::from(vec![Span::styled(
        " Reset Progress ",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )]);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "This will lock every achievement again:",
            Style::default().fg(Color::Red),
        )),
        Line::from(format!("  - {} unlocked achievements", unlocked)),
        Line::from(format!("  - Level {}", level)),
        Line::from(""),
        Line::from("Saved progress is cleared as well."),
        Line::from(""),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                "[Y] Yes, Reset",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled(
                "[N] Cancel",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, dialog_area);
}
