use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{PUBLISH_FLAG_IMMEDIATE, PUBLISH_FLAG_MANDATORY};

/// Opaque outbound publish unit handed to the channel layer.
///
/// The payload is never interpreted here; wire encoding (method/header/body
/// framing) belongs to the channel implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishFrame {
    /// Destination exchange name.
    pub destination: String,
    /// Routing key within the destination.
    pub routing_key: String,
    /// Opaque message body.
    pub payload: Bytes,
    /// Raw publish-flag bits (`PUBLISH_FLAG_*`).
    pub flags: u16,
}

impl PublishFrame {
    /// Creates a frame with no flag bits set.
    pub fn new(
        destination: impl Into<String>,
        routing_key: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        Self {
            destination: destination.into(),
            routing_key: routing_key.into(),
            payload: payload.into(),
            flags: 0,
        }
    }

    /// Returns the frame with the given raw flag bits.
    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Whether the mandatory-routing bit is set.
    pub fn is_mandatory(&self) -> bool {
        (self.flags & PUBLISH_FLAG_MANDATORY) != 0
    }

    /// Whether the immediate-delivery bit is set.
    pub fn is_immediate(&self) -> bool {
        (self.flags & PUBLISH_FLAG_IMMEDIATE) != 0
    }
}
