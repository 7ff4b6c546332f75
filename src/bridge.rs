//! The call boundary between the UI and its backend.
//!
//! Both directions are fire-and-forget. Outbound calls are queued on a channel
//! and written by a helper task; inbound messages are delivered to the UI loop
//! as [`BridgeEvent`]s. Nothing correlates a reply with the call that caused it.

use crate::errors::BridgeError;
use crate::message::Message;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Operations the UI invokes on the backend.
pub trait BackendSink {
    /// Queues `text` for the backend and returns without waiting for a reply.
    fn send_to_backend(&self, text: &str) -> Result<(), BridgeError>;

    /// Asks the backend to replay any conversation it already holds.
    fn request_initial_data(&self) -> Result<(), BridgeError>;
}

/// Calls from the UI to the backend, one JSON object per line on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum OutboundCall {
    SendToBackend { text: String },
    RequestInitialData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Receive(Message),
    /// A queued send could not be delivered.
    SendFailed { text: String, reason: String },
    Closed { reason: String },
}

/// Cloneable UI-side end of a bridge.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    calls: UnboundedSender<OutboundCall>,
}

impl BridgeHandle {
    pub fn new(calls: UnboundedSender<OutboundCall>) -> Self {
        Self { calls }
    }

    fn queue(&self, call: OutboundCall) -> Result<(), BridgeError> {
        self.calls.send(call).map_err(|_| BridgeError::Closed)
    }
}

impl BackendSink for BridgeHandle {
    fn send_to_backend(&self, text: &str) -> Result<(), BridgeError> {
        self.queue(OutboundCall::SendToBackend {
            text: text.to_string(),
        })
    }

    fn request_initial_data(&self) -> Result<(), BridgeError> {
        self.queue(OutboundCall::RequestInitialData)
    }
}

/// Parses one line of backend output. Blank and malformed lines yield `None`.
pub fn decode_line(line: &str) -> Option<Message> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<Message>(line) {
        Ok(message) => Some(message),
        Err(e) => {
            warn!("skipping malformed backend line: {}", e);
            None
        }
    }
}

pub fn encode_call(call: &OutboundCall) -> Result<String, BridgeError> {
    let mut line = serde_json::to_string(call)?;
    line.push('\n');
    Ok(line)
}

/// A backend running as a child process, speaking JSON lines on stdio.
pub struct ProcessBridge;

impl ProcessBridge {
    pub fn spawn(
        command: &[String],
    ) -> Result<(BridgeHandle, UnboundedReceiver<BridgeEvent>), BridgeError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| BridgeError::Spawn("empty backend command".to_string()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BridgeError::Spawn(format!("{}: {}", program, e)))?;

        info!("started backend {} (pid {:?})", program, child.id());

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BridgeError::Spawn("backend stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Spawn("backend stdout unavailable".to_string()))?;
        let stderr = child.stderr.take();

        let (call_tx, call_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(write_calls(stdin, call_rx, event_tx.clone()));

        let reader_tx = event_tx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            let reason = loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if let Some(message) = decode_line(&line) {
                            if reader_tx.send(BridgeEvent::Receive(message)).is_err() {
                                return;
                            }
                        }
                    }
                    Ok(None) => break "backend closed its output".to_string(),
                    Err(e) => break format!("reading backend output failed: {}", e),
                }
            };
            let _ = reader_tx.send(BridgeEvent::Closed { reason });
        });

        if let Some(stderr) = stderr {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!("backend: {}", line);
                }
            });
        }

        tokio::spawn(reap(child));

        Ok((BridgeHandle::new(call_tx), event_rx))
    }
}

async fn write_calls(
    mut stdin: ChildStdin,
    mut calls: UnboundedReceiver<OutboundCall>,
    events: UnboundedSender<BridgeEvent>,
) {
    while let Some(call) = calls.recv().await {
        let result = match encode_call(&call) {
            Ok(line) => match stdin.write_all(line.as_bytes()).await {
                Ok(()) => stdin.flush().await.map_err(BridgeError::from),
                Err(e) => Err(BridgeError::from(e)),
            },
            Err(e) => Err(e),
        };

        if let Err(err) = result {
            warn!("could not deliver {:?}: {}", call, err);
            if let OutboundCall::SendToBackend { text } = call {
                let _ = events.send(BridgeEvent::SendFailed {
                    text,
                    reason: err.to_string(),
                });
            }
        }
    }
}

async fn reap(mut child: Child) {
    match child.wait().await {
        Ok(status) => info!("backend exited with {}", status),
        Err(e) => warn!("waiting for backend failed: {}", e),
    }
}

/// In-process backend used when no backend command is configured.
///
/// Echoes user text back as a `user_source` message, answers it as
/// `reply_source`, and replays everything it has emitted on
/// `request_initial_data`.
pub struct LoopbackBackend {
    history: Vec<Message>,
    user_source: String,
    reply_source: String,
}

impl LoopbackBackend {
    pub fn new(user_source: impl Into<String>, reply_source: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            user_source: user_source.into(),
            reply_source: reply_source.into(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Messages produced in answer to `call`, in delivery order.
    pub fn handle(&mut self, call: OutboundCall) -> Vec<Message> {
        match call {
            OutboundCall::SendToBackend { text } => {
                let echo = Message::new(text.clone(), self.user_source.clone());
                let reply = Message::new(
                    format!("Received {} characters:\n{}", text.chars().count(), text),
                    self.reply_source.clone(),
                );
                self.history.push(echo.clone());
                self.history.push(reply.clone());
                vec![echo, reply]
            }
            OutboundCall::RequestInitialData => self.history.clone(),
        }
    }

    pub fn spawn(mut self) -> (BridgeHandle, UnboundedReceiver<BridgeEvent>) {
        let (call_tx, mut call_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(call) = call_rx.recv().await {
                for message in self.handle(call) {
                    if event_tx.send(BridgeEvent::Receive(message)).is_err() {
                        return;
                    }
                }
            }
            let _ = event_tx.send(BridgeEvent::Closed {
                reason: "loopback stopped".to_string(),
            });
        });

        (BridgeHandle::new(call_tx), event_rx)
    }
}
