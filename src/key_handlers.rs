use crate::app::App;
use crate::bridge::BackendSink;
use crate::constants::SCROLL_STEP;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_chat_input<S: BackendSink>(key: KeyEvent, app: &mut App<S>) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Enter => app.submit(),
        KeyCode::PageUp => scroll_up(app, page(app)),
        KeyCode::PageDown => scroll_down(app, page(app)),
        KeyCode::Up => scroll_up(app, 1),
        KeyCode::Down => scroll_down(app, 1),
        KeyCode::Backspace => app.input_mut().backspace(),
        KeyCode::Delete => app.input_mut().delete(),
        KeyCode::Left => app.input_mut().move_left(),
        KeyCode::Right => app.input_mut().move_right(),
        KeyCode::Home => app.input_mut().move_home(),
        KeyCode::End => app.input_mut().move_end(),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.quit(),
                    'u' => scroll_up(app, SCROLL_STEP),
                    'd' => scroll_down(app, SCROLL_STEP),
                    _ => {}
                }
            } else {
                app.input_mut().insert(c);
            }
        }
        _ => {}
    }
}

fn page<S: BackendSink>(app: &App<S>) -> u16 {
    app.transcript()
        .map(|view| view.viewport().1.saturating_sub(1).max(1))
        .unwrap_or(SCROLL_STEP)
}

fn scroll_up<S: BackendSink>(app: &mut App<S>, rows: u16) {
    if let Some(view) = app.transcript_mut() {
        view.scroll_up(rows);
    }
}

fn scroll_down<S: BackendSink>(app: &mut App<S>, rows: u16) {
    if let Some(view) = app.transcript_mut() {
        view.scroll_down(rows);
    }
}
