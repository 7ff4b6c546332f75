use crate::constants::{BUBBLE_CHROME_ROWS, BUBBLE_GUTTER};
use crate::render::{Alignment, Turn};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use textwrap::wrap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const MIN_BUBBLE_WIDTH: u16 = 8;
/// Header chrome around the label: "┌─ " before, " HH:MM" after.
const HEADER_CHROME_COLS: u16 = 9;

/// Terminal layout of one turn as a chat bubble.
pub struct Bubble<'a> {
    turn: &'a Turn,
    pane_width: u16,
}

impl<'a> Bubble<'a> {
    pub fn new(turn: &'a Turn, pane_width: u16) -> Self {
        Self { turn, pane_width }
    }

    pub fn width(&self) -> u16 {
        let wanted = (self.pane_width as u32 * self.turn.style.width_percent as u32 / 100) as u16;
        wanted.max(MIN_BUBBLE_WIDTH).min(self.pane_width)
    }

    fn indent(&self) -> String {
        match self.turn.style.alignment {
            Alignment::Left => String::new(),
            Alignment::Right => " ".repeat(self.pane_width.saturating_sub(self.width()) as usize),
        }
    }

    fn body_rows(&self) -> Vec<String> {
        let text_width = self.width().saturating_sub(BUBBLE_GUTTER).max(1) as usize;
        self.turn
            .body
            .iter()
            .flat_map(|line| {
                wrap(line, text_width)
                    .into_iter()
                    .map(|row| row.into_owned())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Rows the bubble occupies, chrome included.
    pub fn height(&self) -> usize {
        self.body_rows().len() + BUBBLE_CHROME_ROWS
    }

    fn header_label(&self) -> String {
        let budget = self.width().saturating_sub(HEADER_CHROME_COLS).max(1) as usize;
        truncate_to_width(&self.turn.label, budget)
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let style = Style::default().fg(self.turn.style.color);
        let indent = self.indent();
        let mut lines = Vec::new();

        let timestamp = self.turn.received_at.format("%H:%M").to_string();
        lines.push(Line::from(vec![
            Span::styled(indent.clone(), style),
            Span::styled("┌─ ".to_string(), style),
            Span::styled(self.header_label(), style.add_modifier(Modifier::BOLD)),
            Span::styled(" ".to_string(), style),
            Span::styled(timestamp, style.add_modifier(Modifier::DIM)),
        ]));

        for row in self.body_rows() {
            lines.push(Line::from(vec![
                Span::styled(indent.clone(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(row, style),
            ]));
        }

        lines.push(Line::from(vec![
            Span::styled(indent, style),
            Span::styled("╰─".to_string(), style),
        ]));

        lines
    }
}

/// Cuts `text` to at most `max_width` columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
