// src/errors.rs

use std::io;
use thiserror::Error;

/// Start-up and configuration failures. Runtime faults on the message path are
/// handled where they occur and never reach this type.
#[derive(Debug, Error)]
pub enum DuetError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("logging error: {0}")]
    Logging(String),
}

impl DuetError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        DuetError::Config(msg.into())
    }
}

pub type DuetResult<T> = Result<T, DuetError>;

/// Failure of a call across the bridge boundary.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("backend channel is closed")]
    Closed,

    #[error("backend i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode call: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not start backend: {0}")]
    Spawn(String),
}

/// Rendering failed; the turn is dropped and the bridge keeps running.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderFault {
    #[error("transcript container is not attached")]
    MissingContainer,

    #[error("transcript rejected the turn: {0}")]
    InsertRejected(String),
}

/// Sending user input failed; the input is kept so the user can retry.
#[derive(Debug, Error)]
#[error("dispatch failed: {source}")]
pub struct DispatchFault {
    #[from]
    pub source: BridgeError,
}
