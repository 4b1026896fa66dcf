use bytes::Bytes;
use tracing::{debug, info, warn};

use sluice_channel::{ChannelEvent, ChannelLink, Confirm, ConfirmKind};
use sluice_core::{PublishFrame, PUBLISH_FLAG_IMMEDIATE, PUBLISH_FLAG_MANDATORY};

use crate::closing::{CloseCoordinator, CloseError, CloseHandle};
use crate::queue::PendingQueue;
use crate::sequence::SequenceAllocator;
use crate::sink::{ErrorSink, ThrottleError};
use crate::stats::ThrottleStats;
use crate::tracker::ConfirmTracker;

/// Typed publish flag options to avoid manual bitfield management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishOptions {
    pub mandatory: bool,
    pub immediate: bool,
    /// Additional raw flag bits (advanced/experimental).
    pub extra_flags: u16,
}

impl PublishOptions {
    pub fn mandatory() -> Self {
        Self {
            mandatory: true,
            ..Self::default()
        }
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn with_extra_flags(mut self, extra_flags: u16) -> Self {
        self.extra_flags = extra_flags;
        self
    }

    pub fn to_flags(self) -> u16 {
        let mut flags = self.extra_flags;
        if self.mandatory {
            flags |= PUBLISH_FLAG_MANDATORY;
        }
        if self.immediate {
            flags |= PUBLISH_FLAG_IMMEDIATE;
        }
        flags
    }
}

/// Flow-controlled publisher over one exclusively owned channel.
///
/// Publishes more messages as soon as confirms free up capacity: at most
/// `throttle()` frames are in flight, later publishes queue in FIFO order
/// and drain as confirms arrive. The channel must not be driven by any
/// other publisher; delivery-tag accounting assumes this instance is the
/// sole source of outbound frames on it.
#[derive(Debug)]
pub struct Throttle<C: ChannelLink> {
    channel: C,
    sequence: SequenceAllocator,
    /// Highest sequence id actually handed to the channel; 0 before any send.
    last_sent: u64,
    limit: usize,
    queue: PendingQueue,
    outstanding: ConfirmTracker,
    close: CloseCoordinator,
    sink: ErrorSink,
    stats: ThrottleStats,
}

impl<C: ChannelLink> Throttle<C> {
    /// Takes exclusive ownership of `channel`, bounding in-flight frames to
    /// `limit`.
    pub fn new(channel: C, limit: usize) -> Self {
        Self {
            channel,
            sequence: SequenceAllocator::default(),
            last_sent: 0,
            limit,
            queue: PendingQueue::default(),
            outstanding: ConfirmTracker::default(),
            close: CloseCoordinator::default(),
            sink: ErrorSink::default(),
            stats: ThrottleStats::default(),
        }
    }

    /// Publishes a message, queueing it when the confirm window is full.
    ///
    /// Returns false on hard rejection only: a close is pending, or the
    /// immediate send attempt failed (the message then stays queued for the
    /// next capacity-driven retry).
    pub fn publish(
        &mut self,
        destination: &str,
        routing_key: &str,
        payload: impl Into<Bytes>,
        options: PublishOptions,
    ) -> bool {
        if self.close.is_requested() {
            return false;
        }
        let sequence = self.sequence.allocate();
        let frame =
            PublishFrame::new(destination, routing_key, payload).with_flags(options.to_flags());
        self.queue.push_back(sequence, frame);
        self.stats.published += 1;

        // FIFO is mandatory: capacity sends the queue head, which is only
        // the message just published when nothing older is waiting.
        if self.outstanding.len() < self.limit {
            return self.try_send_head();
        }
        debug!("confirm window full, queued sequence {}", sequence);
        true
    }

    /// Sends up to `max` queued messages (`0` = all) ignoring the throttle
    /// limit, stopping at the first failed send. Returns the number sent.
    pub fn flush(&mut self, max: usize) -> usize {
        let mut sent = 0;
        while !self.queue.is_empty() && (max == 0 || sent < max) {
            if !self.try_send_head() {
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Current throttle limit.
    pub fn throttle(&self) -> usize {
        self.limit
    }

    /// Replaces the throttle limit. The new value is evaluated at the next
    /// capacity check (next confirm or publish); lowering it never cancels
    /// already-sent messages.
    pub fn set_throttle(&mut self, limit: usize) {
        self.limit = limit;
    }

    /// Messages allocated but not yet handed to the channel.
    pub fn waiting(&self) -> usize {
        let waiting = self.sequence.next_id() - self.last_sent - 1;
        debug_assert_eq!(waiting as usize, self.queue.len());
        waiting as usize
    }

    /// Messages sent but not yet confirmed.
    pub fn unacknowledged(&self) -> usize {
        self.outstanding.len()
    }

    /// Whether nothing is queued or awaiting a confirm.
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty() && self.outstanding.is_empty()
    }

    /// Operational counters.
    pub fn stats(&self) -> ThrottleStats {
        self.stats
    }

    /// Installs the error callback, replacing any previous one.
    pub fn on_error(&mut self, callback: impl FnMut(&ThrottleError) + 'static) {
        self.sink.install(callback);
    }

    /// Drains pending channel events, handling confirms and channel errors.
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.channel.poll_event() {
            match event {
                ChannelEvent::Confirm(confirm) => self.handle_confirm(confirm),
                ChannelEvent::Error(message) => self.handle_channel_error(message),
            }
            handled += 1;
        }
        handled
    }

    /// Applies one confirm: updates the outstanding set, refills capacity
    /// from the queue, and completes a pending close once drained.
    ///
    /// Negative confirms follow the identical bookkeeping path; they are
    /// only distinguished in the stats counters.
    pub fn handle_confirm(&mut self, confirm: Confirm) {
        let removed = if confirm.multiple {
            self.outstanding.remove_up_to(confirm.delivery_tag)
        } else if self.outstanding.remove(confirm.delivery_tag) {
            1
        } else {
            self.stats.unexpected_confirms += 1;
            self.sink
                .report(&ThrottleError::UnexpectedConfirm(confirm.delivery_tag));
            0
        };
        match confirm.kind {
            ConfirmKind::Ack => self.stats.acked += removed as u64,
            ConfirmKind::Nack => self.stats.nacked += removed as u64,
        }
        self.refill();
        self.finish_close_if_drained();
    }

    /// Requests drain-then-close. The handle resolves once the queue and
    /// the outstanding set are empty and the channel close has been issued,
    /// or rejects if the channel errors first. At most one close per
    /// publisher; publishes are rejected from this call on.
    pub fn close(&mut self) -> Result<CloseHandle, CloseError> {
        let handle = self.close.begin()?;
        self.finish_close_if_drained();
        Ok(handle)
    }

    /// The underlying channel, e.g. for driving its I/O.
    ///
    /// The link still belongs exclusively to this publisher: sending frames
    /// on it out-of-band corrupts delivery-tag accounting.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Attempts to send the queue head. On success the head is consumed and
    /// its delivery tag recorded; on failure the head stays put for a later
    /// capacity-driven retry.
    fn try_send_head(&mut self) -> bool {
        let Some(message) = self.queue.head() else {
            return false;
        };
        let sequence = message.sequence;
        match self.channel.send_frame(&message.frame) {
            Ok(tag) => {
                self.queue.pop_head();
                self.last_sent = sequence.0;
                let inserted = self.outstanding.insert(tag);
                debug_assert!(inserted, "channel reissued delivery tag {tag}");
                self.stats.sent += 1;
                true
            }
            Err(reason) => {
                self.stats.send_failures += 1;
                self.sink
                    .report(&ThrottleError::SendRejected { sequence, reason });
                false
            }
        }
    }

    /// Sends queued messages while the confirm window has room.
    fn refill(&mut self) {
        while self.outstanding.len() < self.limit && !self.queue.is_empty() {
            if !self.try_send_head() {
                break;
            }
        }
    }

    fn handle_channel_error(&mut self, message: String) {
        self.stats.channel_errors += 1;
        if self.close.is_awaiting() {
            self.close.resolve_err(message.clone());
        }
        self.sink.report(&ThrottleError::Channel(message));
    }

    fn finish_close_if_drained(&mut self) {
        if !self.close.is_awaiting() || !self.is_drained() {
            return;
        }
        match self.channel.close_link() {
            Ok(()) => {
                info!("publisher drained, channel closed");
                self.close.resolve_ok();
            }
            Err(error) => {
                warn!("channel close failed after drain: {}", error);
                self.close.resolve_err(error.to_string());
            }
        }
    }
}
