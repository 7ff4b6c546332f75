use crate::errors::RenderFault;
use crate::message::Message;
use crate::render::{render, RenderCommand, RenderOptions};
use crate::transcript::TranscriptHost;
use log::{debug, warn};

/// Applies backend messages to a transcript host.
///
/// `receive` never fails towards its caller: a fault drops the turn and is
/// logged, and the bridge keeps delivering.
pub struct InboundRenderer<H: TranscriptHost> {
    host: Option<H>,
    options: RenderOptions,
}

impl<H: TranscriptHost> InboundRenderer<H> {
    pub fn new(host: H, options: RenderOptions) -> Self {
        Self {
            host: Some(host),
            options,
        }
    }

    /// A renderer with no transcript attached. Every message is dropped.
    pub fn detached(options: RenderOptions) -> Self {
        Self { host: None, options }
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    pub fn receive(&mut self, message: Message) {
        debug!(
            "received message from {:?} ({} bytes)",
            message.source,
            message.data.len()
        );

        if message.source.is_none() {
            warn!("message without a source; rendering as user");
        }

        if let Err(fault) = self.apply(render(&message, &self.options)) {
            warn!("dropped turn from {}: {}", message.source_name(), fault);
        }
    }

    fn apply(&mut self, command: RenderCommand) -> Result<(), RenderFault> {
        let host = self.host.as_mut().ok_or(RenderFault::MissingContainer)?;
        match command {
            RenderCommand::AppendTurn(turn) => {
                host.append_turn(turn)?;
                // After the insert, so the new bubble counts towards the extent.
                host.scroll_to_end();
            }
        }
        Ok(())
    }
}
