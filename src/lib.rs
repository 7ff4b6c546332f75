// src/lib.rs

pub mod app;
pub mod bridge;
pub mod chat_message;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inbound;
pub mod key_handlers;
pub mod logging;
pub mod message;
pub mod outbound;
pub mod render;
pub mod status_indicator;
pub mod transcript;
pub mod ui;

pub use app::App;
pub use bridge::{BackendSink, BridgeEvent, BridgeHandle, LoopbackBackend, ProcessBridge};
pub use inbound::InboundRenderer;
pub use message::{Message, Speaker};
pub use outbound::{InputBox, InputControl, OutboundDispatcher};
pub use render::{render, RenderCommand, RenderOptions, Turn};
pub use transcript::{TranscriptHost, TranscriptView};
