use crate::app::App;
use crate::bridge::BackendSink;
use crate::outbound::InputControl;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw_transcript<S: BackendSink>(f: &mut Frame<'_>, area: Rect, app: &mut App<S>) {
    let Some(view) = app.transcript_mut() else {
        let missing = Paragraph::new("Transcript unavailable")
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(missing, area);
        return;
    };

    view.set_viewport(area.width, area.height);
    f.render_widget(Paragraph::new(view.visible_lines()), area);
}

pub fn draw_input<S: BackendSink>(f: &mut Frame<'_>, area: Rect, app: &App<S>) {
    let input = app.input();
    let prefix = "→ ";
    let before_cursor: String = input.value().chars().take(input.cursor()).collect();
    let cursor_col = (prefix.width() + before_cursor.width()) as u16;

    let inner_width = area.width.saturating_sub(2);
    let scroll_offset = cursor_col.saturating_sub(inner_width.saturating_sub(1));

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::DarkGray)),
        Span::styled(input.value().to_string(), Style::default().fg(Color::White)),
    ]);

    let border_color = if app.connected {
        Color::DarkGray
    } else {
        Color::Red
    };

    f.render_widget(
        Paragraph::new(line)
            .scroll((0, scroll_offset))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(" Message "),
            ),
        area,
    );

    f.set_cursor_position((area.x + 1 + cursor_col - scroll_offset, area.y + 1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::BridgeError;
    use crate::message::Message;
    use ratatui::{backend::TestBackend, Terminal};

    struct NullSink;

    impl BackendSink for NullSink {
        fn send_to_backend(&self, _text: &str) -> Result<(), BridgeError> {
            Ok(())
        }

        fn request_initial_data(&self) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    #[test]
    fn huge_message_tail_reaches_the_screen() {
        let mut app = App::new(&Config::default(), NullSink);
        let body: Vec<String> = (0..70_000).map(|i| format!("row {}", i)).collect();
        app.renderer.receive(Message::new(body.join("\n"), "llm"));

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_transcript(f, area, &mut app)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let rows: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect();
        assert!(rows[10].contains("row 69999"), "{:?}", rows);
        assert!(rows[11].contains("╰─"), "{:?}", rows);
    }
}
