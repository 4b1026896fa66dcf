use std::fmt;

use thiserror::Error;
use tracing::warn;

use sluice_channel::ChannelError;
use sluice_core::{DeliveryTag, SequenceId};

/// Non-fatal errors reported while publishing and processing confirms.
///
/// None of these unwind publisher state; a rejected send leaves its message
/// queued for the next capacity-driven retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleError {
    /// The channel declined the frame for sequence id `sequence`.
    #[error("channel rejected frame for sequence {sequence}: {reason}")]
    SendRejected {
        sequence: SequenceId,
        reason: ChannelError,
    },
    /// A confirm arrived for a tag that was not outstanding.
    #[error("unexpected confirm for delivery tag {0}")]
    UnexpectedConfirm(DeliveryTag),
    /// Error notification forwarded from the underlying channel.
    #[error("channel error: {0}")]
    Channel(String),
}

type ErrorCallback = Box<dyn FnMut(&ThrottleError)>;

/// Single installable error callback.
///
/// Every reported error is logged before the callback runs, so errors are
/// observable even when no callback is installed.
#[derive(Default)]
pub struct ErrorSink {
    callback: Option<ErrorCallback>,
}

impl ErrorSink {
    /// Installs the callback, replacing any previous one.
    pub fn install(&mut self, callback: impl FnMut(&ThrottleError) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    /// Reports one error through the log and the installed callback.
    pub fn report(&mut self, error: &ThrottleError) {
        warn!("publisher error: {}", error);
        if let Some(callback) = &mut self.callback {
            callback(error);
        }
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink")
            .field("installed", &self.callback.is_some())
            .finish()
    }
}
