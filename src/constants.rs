use ratatui::style::Color;

// UI Constants
pub const SYSTEM_BUBBLE_COLOR: Color = Color::Rgb(144, 238, 144);
pub const USER_BUBBLE_COLOR: Color = Color::Rgb(255, 223, 128);
pub const FAULT_COLOR: Color = Color::Rgb(255, 110, 110);

pub const TAB_WIDTH: usize = 4;
/// Blank lines between two bubbles.
pub const TURN_SPACING: usize = 1;
/// Bubble chrome: header and footer rows.
pub const BUBBLE_CHROME_ROWS: usize = 2;
/// Bubble chrome: left border plus padding, per body row.
pub const BUBBLE_GUTTER: u16 = 2;
pub const SCROLL_STEP: u16 = 3;

pub const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

// Bridge Constants
pub const LOOPBACK_USER_SOURCE: &str = "user";
pub const LOOPBACK_REPLY_SOURCE: &str = "llm";
