use thiserror::Error;

use sluice_core::{DeliveryTag, PublishFrame};

/// Errors surfaced by a channel link for sends and shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The link declined to accept the frame right now.
    #[error("send rejected: {0}")]
    Rejected(&'static str),
    /// The link is no longer usable.
    #[error("link unavailable: {0}")]
    Unavailable(&'static str),
    /// The link was already closed.
    #[error("link closed")]
    Closed,
}

/// Whether a confirm reports broker acceptance or rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    Ack,
    Nack,
}

/// One broker confirm covering a delivery tag, optionally with everything
/// below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirm {
    /// Tag assigned by the channel when the frame was accepted for sending.
    pub delivery_tag: DeliveryTag,
    /// Covers every outstanding tag `<= delivery_tag` when set.
    pub multiple: bool,
    /// Positive or negative acknowledgment.
    pub kind: ConfirmKind,
}

/// Inbound channel-layer event delivered into the publisher's event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Broker confirm for one or more sent frames.
    Confirm(Confirm),
    /// Channel-level error notification.
    Error(String),
}

/// Frame-oriented channel contract used by the sluice publisher.
///
/// A link is exclusively owned by one publisher for its lifetime: delivery
/// tag accounting assumes the publisher is the sole source of outbound
/// frames on the channel. The handle is move-only for that reason.
pub trait ChannelLink {
    /// Synchronously accepts or rejects one outbound frame.
    ///
    /// On acceptance the channel returns the delivery tag it assigned; tags
    /// are issued in send order.
    fn send_frame(&mut self, frame: &PublishFrame) -> Result<DeliveryTag, ChannelError>;

    /// Returns the next pending inbound event, if any.
    fn poll_event(&mut self) -> Option<ChannelEvent>;

    /// Initiates channel shutdown.
    fn close_link(&mut self) -> Result<(), ChannelError>;
}
