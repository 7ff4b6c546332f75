//! Pure translation of a backend [`Message`] into a transcript turn.
//!
//! Nothing here touches the terminal; [`crate::inbound::InboundRenderer`]
//! applies the resulting [`RenderCommand`] to a transcript host.

use crate::config::Config;
use crate::constants::{SYSTEM_BUBBLE_COLOR, TAB_WIDTH, USER_BUBBLE_COLOR};
use crate::message::{Message, Speaker};
use chrono::{DateTime, Local};
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnStyle {
    pub alignment: Alignment,
    /// Bubble width as a share of the transcript pane.
    pub width_percent: u16,
    pub color: Color,
}

/// One rendered message unit. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub label: String,
    pub speaker: Speaker,
    pub body: Vec<String>,
    pub style: TurnStyle,
    pub received_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    AppendTurn(Turn),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub system_sources: Vec<String>,
    pub bubble_width_percent: u16,
    pub escape_control: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            system_sources: config.system_sources.clone(),
            bubble_width_percent: config.bubble_width_percent,
            escape_control: config.escape_control,
        }
    }
}

impl RenderOptions {
    pub fn classify(&self, message: &Message) -> Speaker {
        match message.source.as_deref() {
            Some(source) if self.system_sources.iter().any(|s| s == source) => Speaker::System,
            _ => Speaker::User,
        }
    }
}

pub fn render(message: &Message, options: &RenderOptions) -> RenderCommand {
    render_at(message, options, Local::now())
}

pub fn render_at(
    message: &Message,
    options: &RenderOptions,
    received_at: DateTime<Local>,
) -> RenderCommand {
    let speaker = options.classify(message);
    let source = message.source_name();

    // System speaks from the left, the user from the right.
    let (label, alignment, color) = match speaker {
        Speaker::System => (
            format!("System ({})", source),
            Alignment::Left,
            SYSTEM_BUBBLE_COLOR,
        ),
        Speaker::User => (
            format!("User ({})", source),
            Alignment::Right,
            USER_BUBBLE_COLOR,
        ),
    };

    RenderCommand::AppendTurn(Turn {
        label,
        speaker,
        body: normalize_text(&message.data, options.escape_control),
        style: TurnStyle {
            alignment,
            width_percent: options.bubble_width_percent,
            color,
        },
        received_at,
    })
}

/// Splits `text` into display lines on `\n` and `\r\n`.
///
/// With `escape_control` set, tabs expand to spaces and every other control
/// character becomes U+FFFD so raw escape sequences never reach the terminal.
pub fn normalize_text(text: &str, escape_control: bool) -> Vec<String> {
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if escape_control {
                escape_line(line)
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn escape_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn turn_for(message: &Message) -> Turn {
        let RenderCommand::AppendTurn(turn) = render(message, &RenderOptions::default());
        turn
    }

    #[test]
    fn system_source_gets_system_label() {
        let turn = turn_for(&Message::new("Hi there", "llm"));
        assert_eq!(turn.label, "System (llm)");
        assert_eq!(turn.speaker, Speaker::System);
        assert_eq!(turn.style.alignment, Alignment::Left);
        assert_eq!(turn.body, vec!["Hi there".to_string()]);
    }

    #[test]
    fn other_sources_get_user_label() {
        for source in ["user", "frontend", "gui", "LLM"] {
            let turn = turn_for(&Message::new("x", source));
            assert_eq!(turn.label, format!("User ({})", source));
            assert_eq!(turn.style.alignment, Alignment::Right);
        }
    }

    #[test]
    fn configured_system_sources_are_honoured() {
        let options = RenderOptions {
            system_sources: vec!["gui".to_string(), "llm".to_string()],
            ..RenderOptions::default()
        };
        assert_eq!(options.classify(&Message::new("x", "gui")), Speaker::System);
        assert_eq!(options.classify(&Message::new("x", "user")), Speaker::User);
    }

    #[test]
    fn missing_source_falls_back_to_user() {
        let message: Message = serde_json::from_str(r#"{"data":"orphan"}"#).unwrap();
        let turn = turn_for(&message);
        assert_eq!(turn.speaker, Speaker::User);
        assert_eq!(turn.label, "User (unknown)");
    }

    #[test]
    fn newline_becomes_line_break() {
        assert_eq!(normalize_text("a\nb", true), vec!["a", "b"]);
        assert_eq!(normalize_text("a\r\nb", true), vec!["a", "b"]);
        assert_eq!(normalize_text("plain text", true), vec!["plain text"]);
        assert_eq!(normalize_text("", true), vec![""]);
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(
            normalize_text("\u{1b}[31mred\tx", true),
            vec!["\u{fffd}[31mred    x"]
        );
        assert_eq!(normalize_text("\u{1b}[31m", false), vec!["\u{1b}[31m"]);
    }

    #[test]
    fn width_comes_from_options() {
        let options = RenderOptions {
            bubble_width_percent: 80,
            ..RenderOptions::default()
        };
        let RenderCommand::AppendTurn(turn) = render(&Message::new("x", "llm"), &options);
        assert_eq!(turn.style.width_percent, 80);
    }
}
