use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonically increasing per-publish identifier, allocated from 1.
///
/// One id is handed out per publish call whether the message is sent
/// immediately or queued; ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub u64);

/// Broker-assigned identifier for a sent-but-unconfirmed frame.
///
/// Tags are issued by the channel in send order; a confirm with the
/// `multiple` flag covers this tag and every lower outstanding tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeliveryTag(pub u64);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for DeliveryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Ask the broker to return the message if it cannot be routed.
pub const PUBLISH_FLAG_MANDATORY: u16 = 0x0001;
/// Ask the broker to return the message if it cannot be delivered at once.
pub const PUBLISH_FLAG_IMMEDIATE: u16 = 0x0002;

#[cfg(test)]
mod tests {
    use super::{DeliveryTag, SequenceId, PUBLISH_FLAG_IMMEDIATE, PUBLISH_FLAG_MANDATORY};

    #[test]
    fn ids_order_by_inner_value() {
        assert!(SequenceId(1) < SequenceId(2));
        assert!(DeliveryTag(9) < DeliveryTag(10));
        assert_eq!(DeliveryTag(7), DeliveryTag(7));
    }

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(SequenceId(12).to_string(), "12");
        assert_eq!(DeliveryTag(7).to_string(), "7");
    }

    #[test]
    fn publish_flag_bits_are_distinct() {
        assert_eq!(PUBLISH_FLAG_MANDATORY & PUBLISH_FLAG_IMMEDIATE, 0);
    }
}
