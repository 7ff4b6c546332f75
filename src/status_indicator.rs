use crate::constants::{FAULT_COLOR, SPINNER_FRAMES};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// One-line status strip above the input box. Shows a spinner while a sent
/// message has not been answered yet, and the most recent non-fatal fault.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    awaiting_reply: bool,
    notice: Option<String>,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_awaiting_reply(&mut self, awaiting: bool) {
        self.awaiting_reply = awaiting;
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn update_spinner(&mut self) {
        if self.awaiting_reply {
            self.spinner_idx = self.spinner_idx.wrapping_add(1);
        }
    }

    pub fn line(&self) -> Line<'static> {
        let spinner = if self.awaiting_reply {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        };

        let (text, color) = match (&self.notice, self.awaiting_reply) {
            (Some(notice), _) => (notice.clone(), FAULT_COLOR),
            (None, true) => ("Waiting for backend...".to_string(), Color::DarkGray),
            (None, false) => (String::new(), Color::DarkGray),
        };

        Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(text, Style::default().fg(color)),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_wins_over_spinner_text() {
        let mut status = StatusIndicator::new();
        status.set_awaiting_reply(true);
        assert_eq!(status.line().spans[2].content, "Waiting for backend...");

        status.set_notice("send failed");
        assert_eq!(status.line().spans[2].content, "send failed");

        status.clear_notice();
        status.set_awaiting_reply(false);
        assert_eq!(status.line().spans[2].content, "");
    }

    #[test]
    fn spinner_only_turns_while_waiting() {
        let mut status = StatusIndicator::new();
        status.update_spinner();
        assert_eq!(status.spinner_idx, 0);
        status.set_awaiting_reply(true);
        status.update_spinner();
        assert_eq!(status.spinner_idx, 1);
    }
}
