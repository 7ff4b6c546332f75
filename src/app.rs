use crate::bridge::{BackendSink, BridgeEvent};
use crate::config::Config;
use crate::inbound::InboundRenderer;
use crate::outbound::{DispatchOutcome, InputBox, InputControl, OutboundDispatcher};
use crate::render::RenderOptions;
use crate::status_indicator::StatusIndicator;
use crate::transcript::TranscriptView;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Chat,
    Quit,
}

pub struct App<S: BackendSink> {
    pub state: AppState,
    pub title: String,
    pub connected: bool,
    pub renderer: InboundRenderer<TranscriptView>,
    pub dispatcher: OutboundDispatcher<InputBox, S>,
    pub status_indicator: StatusIndicator,
}

impl<S: BackendSink> App<S> {
    pub fn new(config: &Config, sink: S) -> Self {
        Self {
            state: AppState::Chat,
            title: config.title.clone(),
            connected: true,
            renderer: InboundRenderer::new(TranscriptView::new(), RenderOptions::from(config)),
            dispatcher: OutboundDispatcher::new(InputBox::new(), sink, config.ignore_blank_input),
            status_indicator: StatusIndicator::new(),
        }
    }

    pub fn transcript(&self) -> Option<&TranscriptView> {
        self.renderer.host()
    }

    pub fn transcript_mut(&mut self) -> Option<&mut TranscriptView> {
        self.renderer.host_mut()
    }

    pub fn input(&self) -> &InputBox {
        self.dispatcher.input()
    }

    pub fn input_mut(&mut self) -> &mut InputBox {
        self.dispatcher.input_mut()
    }

    pub fn request_initial_data(&mut self) {
        if let Err(e) = self.dispatcher.sink().request_initial_data() {
            warn!("initial data request failed: {}", e);
            self.status_indicator
                .set_notice(format!("Could not load history: {}", e));
        }
    }

    pub fn submit(&mut self) {
        match self.dispatcher.dispatch() {
            DispatchOutcome::Sent => {
                self.status_indicator.clear_notice();
                self.status_indicator.set_awaiting_reply(true);
            }
            DispatchOutcome::Skipped => {}
            DispatchOutcome::Failed(fault) => {
                self.status_indicator
                    .set_notice(format!("Not sent, press Enter to retry ({})", fault.source));
            }
        }
    }

    pub fn handle_bridge_event(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Receive(message) => {
                self.status_indicator.set_awaiting_reply(false);
                self.renderer.receive(message);
            }
            BridgeEvent::SendFailed { text, reason } => {
                self.status_indicator.set_awaiting_reply(false);
                // Never clobber something the user started typing since.
                if self.input().value().is_empty() {
                    self.input_mut().set_value(text);
                }
                self.status_indicator
                    .set_notice(format!("Not delivered, press Enter to retry ({})", reason));
            }
            BridgeEvent::Closed { reason } => {
                info!("bridge closed: {}", reason);
                self.connected = false;
                self.status_indicator.set_awaiting_reply(false);
                self.status_indicator
                    .set_notice(format!("Backend disconnected: {}", reason));
            }
        }
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quit;
    }

    pub fn should_quit(&self) -> bool {
        self.state == AppState::Quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BridgeError;
    use crate::message::Message;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeSink {
        sent: RefCell<Vec<String>>,
        initial_requests: Cell<usize>,
    }

    impl BackendSink for FakeSink {
        fn send_to_backend(&self, text: &str) -> Result<(), BridgeError> {
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn request_initial_data(&self) -> Result<(), BridgeError> {
            self.initial_requests.set(self.initial_requests.get() + 1);
            Ok(())
        }
    }

    fn app() -> App<FakeSink> {
        App::new(&Config::default(), FakeSink::default())
    }

    #[test]
    fn send_failure_restores_only_into_empty_input() {
        let mut app = app();
        app.handle_bridge_event(BridgeEvent::SendFailed {
            text: "lost".to_string(),
            reason: "broken pipe".to_string(),
        });
        assert_eq!(app.input().value(), "lost");
        assert!(app.status_indicator.notice().is_some());

        app.input_mut().set_value("newer".to_string());
        app.handle_bridge_event(BridgeEvent::SendFailed {
            text: "older".to_string(),
            reason: "broken pipe".to_string(),
        });
        assert_eq!(app.input().value(), "newer");
    }

    #[test]
    fn submit_waits_for_reply_without_adding_turns() {
        let mut app = app();
        app.input_mut().set_value("Hello".to_string());
        app.submit();

        assert!(app.status_indicator.is_awaiting_reply());
        assert_eq!(app.transcript().unwrap().turns().len(), 0);

        app.handle_bridge_event(BridgeEvent::Receive(Message::new("Hi", "llm")));
        assert!(!app.status_indicator.is_awaiting_reply());
        assert_eq!(app.transcript().unwrap().turns().len(), 1);
    }

    #[test]
    fn closed_bridge_marks_disconnected() {
        let mut app = app();
        app.handle_bridge_event(BridgeEvent::Closed {
            reason: "eof".to_string(),
        });
        assert!(!app.connected);
    }

    #[test]
    fn initial_data_request_goes_to_sink() {
        let mut app = app();
        app.request_initial_data();
        assert_eq!(app.dispatcher.sink().initial_requests.get(), 1);
    }
}
