// src/ui.rs

pub mod chat;
pub mod footer;
pub mod header;

use crate::app::App;
use crate::bridge::{BackendSink, BridgeEvent};
use crate::key_handlers::handle_chat_input;
use crossterm::{
    event::{Event as CEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tokio::sync::mpsc::UnboundedReceiver;

/// Takes over the terminal and runs the chat until the user quits.
pub async fn run_ui<S: BackendSink>(
    app: &mut App<S>,
    bridge_events: UnboundedReceiver<BridgeEvent>,
    tick_rate: Duration,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, bridge_events, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Main loop. Terminal input, bridge events and ticks are handled one at a
/// time on this task, so the app state needs no locking.
pub async fn run_app<B: Backend, S: BackendSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    mut bridge_events: UnboundedReceiver<BridgeEvent>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut input_events = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);
    let mut bridge_open = true;

    loop {
        terminal.draw(|f| draw(f, app))?;

        tokio::select! {
            maybe_event = input_events.next() => match maybe_event {
                Some(Ok(CEvent::Key(key))) => handle_chat_input(key, app),
                Some(Ok(_)) => {}
                Some(Err(e)) => warn!("terminal event error: {}", e),
                None => app.quit(),
            },
            event = bridge_events.recv(), if bridge_open => match event {
                Some(event) => app.handle_bridge_event(event),
                None => {
                    bridge_open = false;
                    app.handle_bridge_event(BridgeEvent::Closed {
                        reason: "bridge dropped".to_string(),
                    });
                }
            },
            _ = ticker.tick() => app.status_indicator.update_spinner(),
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

pub fn draw<S: BackendSink>(f: &mut Frame<'_>, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(1), // Header
                Constraint::Min(1),    // Transcript
                Constraint::Length(1), // Status
                Constraint::Length(3), // Input
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.area());

    header::draw_header(f, chunks[0], &app.title, app.connected);
    chat::draw_transcript(f, chunks[1], app);
    app.status_indicator.render(f, chunks[2]);
    chat::draw_input(f, chunks[3], app);
    footer::draw_footer(f, chunks[4]);
}
