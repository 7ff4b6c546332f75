// src/transcript.rs

use crate::chat_message::Bubble;
use crate::constants::TURN_SPACING;
use crate::errors::RenderFault;
use crate::render::Turn;
use ratatui::text::Line;

/// The surface the inbound renderer writes into.
pub trait TranscriptHost {
    /// Appends `turn` after every existing turn.
    fn append_turn(&mut self, turn: Turn) -> Result<(), RenderFault>;

    /// Moves the scroll offset to its maximum so the last turn is visible.
    fn scroll_to_end(&mut self);

    fn turn_count(&self) -> usize;
}

/// Append-only transcript with follow-the-tail scrolling.
///
/// Bubble heights are cached for the current width, so an append wraps only
/// the new turn and a draw wraps only the turns inside the viewport.
#[derive(Debug, Default)]
pub struct TranscriptView {
    turns: Vec<Turn>,
    heights: Vec<usize>,
    total_rows: usize,
    offset: usize,
    viewport_width: u16,
    viewport_height: u16,
    follow_bottom: bool,
}

impl TranscriptView {
    pub fn new() -> Self {
        Self {
            follow_bottom: true,
            ..Self::default()
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following_bottom(&self) -> bool {
        self.follow_bottom
    }

    /// Called on every draw. Keeps the tail in view when following, and keeps
    /// the offset in range otherwise.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        if width != self.viewport_width {
            self.viewport_width = width;
            self.rewrap();
        }
        self.viewport_height = height;
        if self.follow_bottom {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.viewport_width, self.viewport_height)
    }

    fn rewrap(&mut self) {
        let width = self.viewport_width;
        self.heights = self
            .turns
            .iter()
            .map(|turn| Bubble::new(turn, width).height())
            .collect();
        self.total_rows = self.heights.iter().sum::<usize>()
            + self.heights.len().saturating_sub(1) * TURN_SPACING;
    }

    /// Total rows of all bubbles at the current width, spacing included.
    pub fn content_height(&self) -> usize {
        self.total_rows
    }

    pub fn max_offset(&self) -> usize {
        self.total_rows
            .saturating_sub(self.viewport_height as usize)
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.offset = self.offset.saturating_sub(rows as usize);
        if self.offset < self.max_offset() {
            self.follow_bottom = false;
        }
    }

    pub fn scroll_down(&mut self, rows: u16) {
        let max = self.max_offset();
        self.offset = self.offset.saturating_add(rows as usize).min(max);
        // Reaching the tail by hand resumes follow mode.
        if self.offset == max {
            self.follow_bottom = true;
        }
    }

    /// The rows inside the viewport at the current offset. Only turns that
    /// overlap the window are laid out.
    pub fn visible_lines(&self) -> Vec<Line<'static>> {
        let start = self.offset;
        let end = start + self.viewport_height as usize;
        let mut lines = Vec::new();
        let mut row = 0;

        for (idx, turn) in self.turns.iter().enumerate() {
            if row >= end {
                break;
            }
            if idx > 0 {
                for _ in 0..TURN_SPACING {
                    if row >= start && row < end {
                        lines.push(Line::from(""));
                    }
                    row += 1;
                }
            }

            let height = self.heights[idx];
            if row + height > start && row < end {
                let skip = start.saturating_sub(row);
                let take = end - row.max(start);
                lines.extend(
                    Bubble::new(turn, self.viewport_width)
                        .lines()
                        .into_iter()
                        .skip(skip)
                        .take(take),
                );
            }
            row += height;
        }

        lines
    }
}

impl TranscriptHost for TranscriptView {
    fn append_turn(&mut self, turn: Turn) -> Result<(), RenderFault> {
        // Not laid out yet; the first `set_viewport` wraps everything.
        let height = if self.viewport_width == 0 {
            0
        } else {
            Bubble::new(&turn, self.viewport_width).height()
        };
        if !self.turns.is_empty() {
            self.total_rows += TURN_SPACING;
        }
        self.total_rows += height;
        self.heights.push(height);
        self.turns.push(turn);
        Ok(())
    }

    fn scroll_to_end(&mut self) {
        self.follow_bottom = true;
        self.offset = self.max_offset();
    }

    fn turn_count(&self) -> usize {
        self.turns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::render::{render, RenderCommand, RenderOptions};

    fn turn(data: &str) -> Turn {
        let RenderCommand::AppendTurn(turn) =
            render(&Message::new(data, "llm"), &RenderOptions::default());
        turn
    }

    fn filled(count: usize) -> TranscriptView {
        let mut view = TranscriptView::new();
        view.set_viewport(40, 10);
        for i in 0..count {
            view.append_turn(turn(&format!("message {}", i))).unwrap();
        }
        view.scroll_to_end();
        view
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn content_height_includes_spacing() {
        let view = filled(3);
        // Three single-row bubbles of three rows each plus two gaps.
        assert_eq!(view.content_height(), 11);
        assert_eq!(view.max_offset(), 1);
        assert_eq!(view.offset(), 1);
    }

    #[test]
    fn short_transcript_does_not_scroll() {
        let view = filled(1);
        assert_eq!(view.max_offset(), 0);
        assert_eq!(view.offset(), 0);
        assert_eq!(view.visible_lines().len(), 3);
    }

    #[test]
    fn manual_scroll_pauses_and_resumes_follow() {
        let mut view = filled(6);
        let max = view.max_offset();
        assert!(max > 3);

        view.scroll_up(3);
        assert!(!view.is_following_bottom());
        assert_eq!(view.offset(), max - 3);

        view.set_viewport(40, 10);
        assert_eq!(view.offset(), max - 3);

        view.scroll_down(10);
        assert!(view.is_following_bottom());
        assert_eq!(view.offset(), max);
    }

    #[test]
    fn resize_while_following_keeps_tail_visible() {
        let mut view = filled(6);
        view.set_viewport(40, 4);
        assert_eq!(view.offset(), view.max_offset());
    }

    #[test]
    fn resize_rewraps_cached_heights() {
        let mut view = TranscriptView::new();
        view.set_viewport(80, 10);
        view.append_turn(turn(&"word ".repeat(20))).unwrap();
        let wide = view.content_height();

        view.set_viewport(30, 10);
        assert!(view.content_height() > wide);

        view.set_viewport(80, 10);
        assert_eq!(view.content_height(), wide);
    }

    #[test]
    fn window_shows_the_tail_of_the_last_turn() {
        let view = filled(6);
        let lines = view.visible_lines();
        assert_eq!(lines.len(), 10);
        assert!(text(&lines[8]).contains("message 5"));
        assert!(text(&lines[9]).contains("╰─"));
    }

    #[test]
    fn tail_is_visible_past_u16_rows() {
        let body: Vec<String> = (0..70_000).map(|i| format!("row {}", i)).collect();
        let mut view = TranscriptView::new();
        view.set_viewport(40, 10);
        view.append_turn(turn(&body.join("\n"))).unwrap();
        view.scroll_to_end();

        assert!(view.content_height() > u16::MAX as usize);
        assert_eq!(view.offset(), view.max_offset());

        let lines = view.visible_lines();
        assert_eq!(lines.len(), 10);
        assert!(text(&lines[8]).contains("row 69999"));
        assert!(text(&lines[9]).contains("╰─"));
    }
}
