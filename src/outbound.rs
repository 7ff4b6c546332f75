use crate::bridge::BackendSink;
use crate::errors::DispatchFault;
use log::{debug, warn};

/// The text box the dispatcher reads from and clears.
pub trait InputControl {
    fn value(&self) -> &str;
    fn set_value(&mut self, value: String);

    fn clear(&mut self) {
        self.set_value(String::new());
    }
}

/// Single-line input buffer with a character cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBox {
    text: String,
    cursor: usize,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }
}

impl InputControl for InputBox {
    fn value(&self) -> &str {
        &self.text
    }

    fn set_value(&mut self, value: String) {
        self.text = value;
        self.cursor = self.char_len();
    }
}

#[derive(Debug)]
pub enum DispatchOutcome {
    /// Handed to the bridge; the input box was cleared.
    Sent,
    /// Blank input with blank filtering enabled. Nothing happened.
    Skipped,
    /// The bridge refused the call. The input box still holds the text.
    Failed(DispatchFault),
}

/// Forwards the input box to the backend on a user action.
pub struct OutboundDispatcher<I: InputControl, S: BackendSink> {
    input: I,
    sink: S,
    ignore_blank: bool,
}

impl<I: InputControl, S: BackendSink> OutboundDispatcher<I, S> {
    pub fn new(input: I, sink: S, ignore_blank: bool) -> Self {
        Self {
            input,
            sink,
            ignore_blank,
        }
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Sends the current input verbatim without waiting for a reply. Replies
    /// arrive later as separate inbound messages.
    pub fn dispatch(&mut self) -> DispatchOutcome {
        let text = self.input.value().to_string();

        if self.ignore_blank && text.trim().is_empty() {
            return DispatchOutcome::Skipped;
        }

        match self.sink.send_to_backend(&text) {
            Ok(()) => {
                debug!("dispatched {} bytes to backend", text.len());
                self.input.clear();
                DispatchOutcome::Sent
            }
            Err(err) => {
                let fault = DispatchFault::from(err);
                warn!("{}; input kept for retry", fault);
                DispatchOutcome::Failed(fault)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BridgeError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        sent: RefCell<Vec<String>>,
        closed: bool,
    }

    impl BackendSink for RecordingSink {
        fn send_to_backend(&self, text: &str) -> Result<(), BridgeError> {
            if self.closed {
                return Err(BridgeError::Closed);
            }
            self.sent.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn request_initial_data(&self) -> Result<(), BridgeError> {
            Ok(())
        }
    }

    fn dispatcher_with(text: &str, sink: RecordingSink) -> OutboundDispatcher<InputBox, RecordingSink> {
        let mut input = InputBox::new();
        input.set_value(text.to_string());
        OutboundDispatcher::new(input, sink, false)
    }

    #[test]
    fn dispatch_sends_once_and_clears() {
        let mut dispatcher = dispatcher_with("hello", RecordingSink::default());

        assert!(matches!(dispatcher.dispatch(), DispatchOutcome::Sent));
        assert_eq!(dispatcher.input().value(), "");
        assert_eq!(*dispatcher.sink().sent.borrow(), vec!["hello".to_string()]);
    }

    #[test]
    fn whitespace_is_forwarded_verbatim() {
        let mut dispatcher = dispatcher_with("  padded \t", RecordingSink::default());
        dispatcher.dispatch();
        assert_eq!(
            *dispatcher.sink().sent.borrow(),
            vec!["  padded \t".to_string()]
        );
    }

    #[test]
    fn blank_input_can_be_ignored() {
        let mut input = InputBox::new();
        input.set_value("   ".to_string());
        let mut dispatcher = OutboundDispatcher::new(input, RecordingSink::default(), true);

        assert!(matches!(dispatcher.dispatch(), DispatchOutcome::Skipped));
        assert!(dispatcher.sink().sent.borrow().is_empty());
        assert_eq!(dispatcher.input().value(), "   ");
    }

    #[test]
    fn failed_send_keeps_input() {
        let sink = RecordingSink {
            closed: true,
            ..RecordingSink::default()
        };
        let mut dispatcher = dispatcher_with("keep me", sink);

        assert!(matches!(dispatcher.dispatch(), DispatchOutcome::Failed(_)));
        assert_eq!(dispatcher.input().value(), "keep me");
    }

    #[test]
    fn input_box_edits_at_cursor() {
        let mut input = InputBox::new();
        for c in "hllo".chars() {
            input.insert(c);
        }
        input.move_home();
        input.move_right();
        input.insert('e');
        assert_eq!(input.value(), "hello");

        input.move_end();
        input.backspace();
        assert_eq!(input.value(), "hell");

        input.move_home();
        input.delete();
        assert_eq!(input.value(), "ell");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn input_box_handles_multibyte() {
        let mut input = InputBox::new();
        input.set_value("héllo".to_string());
        input.move_left();
        input.backspace();
        assert_eq!(input.value(), "hélo");
    }
}
