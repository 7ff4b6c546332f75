use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn draw_header(f: &mut Frame<'_>, area: Rect, title: &str, connected: bool) {
    let (state, state_color) = if connected {
        ("● connected", Color::LightGreen)
    } else {
        ("○ disconnected", Color::Red)
    };

    let header = Line::from(vec![
        Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(state_color)),
    ]);

    f.render_widget(Paragraph::new(header).alignment(Alignment::Left), area);
}
