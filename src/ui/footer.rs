use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

const INSTRUCTIONS: &str = "Enter send · PgUp/PgDn scroll · Esc quit";

pub fn draw_footer(f: &mut Frame<'_>, area: Rect) {
    let footer = Paragraph::new(INSTRUCTIONS)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}
