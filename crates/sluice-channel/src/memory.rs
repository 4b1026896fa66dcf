use std::collections::VecDeque;

use sluice_core::{DeliveryTag, PublishFrame};

use crate::link::{ChannelError, ChannelEvent, ChannelLink, Confirm, ConfirmKind};

/// In-memory channel for tests and simulations.
///
/// Assigns delivery tags sequentially from 1, records accepted frames for
/// inspection, and lets callers script send rejection and inbound
/// confirm/error events.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    sent: Vec<(DeliveryTag, PublishFrame)>,
    events: VecDeque<ChannelEvent>,
    next_tag: u64,
    reject_sends: bool,
    closed: bool,
    sent_ok: u64,
    sent_err: u64,
    close_calls: u64,
}

impl InMemoryChannel {
    /// Creates an open channel with no scripted behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// If enabled, subsequent sends are rejected until disabled again.
    pub fn set_reject_sends(&mut self, reject_sends: bool) {
        self.reject_sends = reject_sends;
    }

    /// Queues a positive confirm event for `tag`.
    pub fn push_ack(&mut self, tag: DeliveryTag, multiple: bool) {
        self.events.push_back(ChannelEvent::Confirm(Confirm {
            delivery_tag: tag,
            multiple,
            kind: ConfirmKind::Ack,
        }));
    }

    /// Queues a negative confirm event for `tag`.
    pub fn push_nack(&mut self, tag: DeliveryTag, multiple: bool) {
        self.events.push_back(ChannelEvent::Confirm(Confirm {
            delivery_tag: tag,
            multiple,
            kind: ConfirmKind::Nack,
        }));
    }

    /// Queues a channel-level error notification.
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.events.push_back(ChannelEvent::Error(message.into()));
    }

    /// Drains and returns all accepted frames captured so far.
    pub fn take_sent(&mut self) -> Vec<(DeliveryTag, PublishFrame)> {
        std::mem::take(&mut self.sent)
    }

    /// Tag that will be assigned to the next accepted frame.
    pub fn next_tag(&self) -> DeliveryTag {
        DeliveryTag(self.next_tag + 1)
    }

    /// Whether `close_link` has been observed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of `close_link` calls observed.
    pub fn close_calls(&self) -> u64 {
        self.close_calls
    }

    /// Accepted-send counter.
    pub fn sent_ok(&self) -> u64 {
        self.sent_ok
    }

    /// Rejected-send counter.
    pub fn sent_err(&self) -> u64 {
        self.sent_err
    }
}

impl ChannelLink for InMemoryChannel {
    fn send_frame(&mut self, frame: &PublishFrame) -> Result<DeliveryTag, ChannelError> {
        if self.closed {
            self.sent_err += 1;
            return Err(ChannelError::Closed);
        }
        if self.reject_sends {
            self.sent_err += 1;
            return Err(ChannelError::Rejected("scripted rejection"));
        }
        self.next_tag += 1;
        let tag = DeliveryTag(self.next_tag);
        self.sent.push((tag, frame.clone()));
        self.sent_ok += 1;
        Ok(tag)
    }

    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events.pop_front()
    }

    fn close_link(&mut self) -> Result<(), ChannelError> {
        self.close_calls += 1;
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sluice_core::{DeliveryTag, PublishFrame};

    use super::InMemoryChannel;
    use crate::link::{ChannelError, ChannelEvent, ChannelLink, ConfirmKind};

    fn frame(body: &str) -> PublishFrame {
        PublishFrame::new("orders", "eu.west", body.as_bytes().to_vec())
    }

    #[test]
    fn sends_assign_sequential_tags_and_record_frames() {
        let mut channel = InMemoryChannel::new();
        let first = channel
            .send_frame(&frame("a"))
            .expect("first send should be accepted");
        let second = channel
            .send_frame(&frame("b"))
            .expect("second send should be accepted");

        assert_eq!(first, DeliveryTag(1));
        assert_eq!(second, DeliveryTag(2));
        assert_eq!(channel.sent_ok(), 2);

        let sent = channel.take_sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, DeliveryTag(1));
        assert_eq!(sent[1].1.payload.as_ref(), b"b");
        assert!(channel.take_sent().is_empty());
    }

    #[test]
    fn scripted_rejection_fails_sends_without_consuming_tags() {
        let mut channel = InMemoryChannel::new();
        channel.set_reject_sends(true);
        let err = channel
            .send_frame(&frame("a"))
            .expect_err("scripted rejection should fail the send");
        assert_eq!(err, ChannelError::Rejected("scripted rejection"));
        assert_eq!(channel.sent_err(), 1);
        // A rejected send must not burn a tag.
        assert_eq!(channel.next_tag(), DeliveryTag(1));

        channel.set_reject_sends(false);
        let tag = channel
            .send_frame(&frame("a"))
            .expect("send should succeed after rejection is disabled");
        assert_eq!(tag, DeliveryTag(1));
        assert_eq!(channel.next_tag(), DeliveryTag(2));
    }

    #[test]
    fn events_drain_in_push_order() {
        let mut channel = InMemoryChannel::new();
        channel.push_ack(DeliveryTag(3), true);
        channel.push_nack(DeliveryTag(4), false);
        channel.push_error("connection reset");

        match channel.poll_event() {
            Some(ChannelEvent::Confirm(confirm)) => {
                assert_eq!(confirm.delivery_tag, DeliveryTag(3));
                assert!(confirm.multiple);
                assert_eq!(confirm.kind, ConfirmKind::Ack);
            }
            other => panic!("expected ack confirm, got {other:?}"),
        }
        match channel.poll_event() {
            Some(ChannelEvent::Confirm(confirm)) => {
                assert_eq!(confirm.kind, ConfirmKind::Nack);
                assert!(!confirm.multiple);
            }
            other => panic!("expected nack confirm, got {other:?}"),
        }
        assert_eq!(
            channel.poll_event(),
            Some(ChannelEvent::Error("connection reset".to_string()))
        );
        assert_eq!(channel.poll_event(), None);
    }

    #[test]
    fn close_is_observed_once_and_rejects_further_use() {
        let mut channel = InMemoryChannel::new();
        channel.close_link().expect("first close should succeed");
        assert!(channel.is_closed());
        assert_eq!(channel.close_calls(), 1);

        let err = channel
            .close_link()
            .expect_err("second close should be rejected");
        assert_eq!(err, ChannelError::Closed);
        assert_eq!(channel.close_calls(), 2);

        let err = channel
            .send_frame(&frame("late"))
            .expect_err("send on a closed link should fail");
        assert_eq!(err, ChannelError::Closed);
    }
}
