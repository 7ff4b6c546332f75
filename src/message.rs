// src/message.rs

use serde::{Deserialize, Deserializer, Serialize};

/// A message pushed by the backend. Either field may be absent on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Message {
    pub fn new(data: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            source: Some(source.into()),
        }
    }

    /// Source as shown in labels; an absent source reads as `unknown`.
    pub fn source_name(&self) -> &str {
        match self.source.as_deref() {
            Some(source) if !source.is_empty() => source,
            _ => "unknown",
        }
    }
}

/// Backends written in dynamic languages send `null` for "no text".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    System,
    User,
}
