use serde::{Deserialize, Serialize};

/// Operational counters for one publisher instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottleStats {
    /// Publish calls accepted into the system (enqueued and/or sent).
    pub published: u64,
    /// Frames accepted by the channel.
    pub sent: u64,
    /// Outstanding tags removed by positive confirms.
    pub acked: u64,
    /// Outstanding tags removed by negative confirms.
    pub nacked: u64,
    /// Sends declined by the channel (message kept queued).
    pub send_failures: u64,
    /// Confirms for tags that were not outstanding.
    pub unexpected_confirms: u64,
    /// Error notifications forwarded from the channel.
    pub channel_errors: u64,
}

impl ThrottleStats {
    /// Total tags removed by confirms, positive or negative.
    pub fn confirmed(&self) -> u64 {
        self.acked + self.nacked
    }
}
