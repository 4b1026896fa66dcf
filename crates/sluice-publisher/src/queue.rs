use std::collections::VecDeque;

use sluice_core::{PublishFrame, SequenceId};

/// One allocated-but-unsent message awaiting channel capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    /// Sequence id allocated at publish time.
    pub sequence: SequenceId,
    /// Frame owned by the queue until the channel accepts it.
    pub frame: PublishFrame,
}

/// FIFO queue of messages waiting to be sent.
///
/// Messages must leave in allocation order, so only the head is ever
/// offered to the channel.
#[derive(Debug, Default)]
pub struct PendingQueue {
    items: VecDeque<PendingMessage>,
}

impl PendingQueue {
    /// Appends a newly allocated message.
    pub fn push_back(&mut self, sequence: SequenceId, frame: PublishFrame) {
        self.items.push_back(PendingMessage { sequence, frame });
    }

    /// Next message in allocation order, if any.
    pub fn head(&self) -> Option<&PendingMessage> {
        self.items.front()
    }

    /// Removes and returns the head message.
    pub fn pop_head(&mut self) -> Option<PendingMessage> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use sluice_core::{PublishFrame, SequenceId};

    use super::PendingQueue;

    fn frame(body: &str) -> PublishFrame {
        PublishFrame::new("orders", "eu.west", body.as_bytes().to_vec())
    }

    #[test]
    fn queue_preserves_allocation_order() {
        let mut queue = PendingQueue::default();
        queue.push_back(SequenceId(1), frame("a"));
        queue.push_back(SequenceId(2), frame("b"));
        assert_eq!(queue.len(), 2);

        let head = queue.head().expect("head should be present");
        assert_eq!(head.sequence, SequenceId(1));

        let popped = queue.pop_head().expect("pop should yield the head");
        assert_eq!(popped.sequence, SequenceId(1));
        assert_eq!(popped.frame.payload.as_ref(), b"a");

        let popped = queue.pop_head().expect("pop should yield the next message");
        assert_eq!(popped.sequence, SequenceId(2));
        assert!(queue.is_empty());
        assert!(queue.pop_head().is_none());
    }

    #[test]
    fn head_does_not_consume() {
        let mut queue = PendingQueue::default();
        queue.push_back(SequenceId(1), frame("a"));
        assert!(queue.head().is_some());
        assert!(queue.head().is_some());
        assert_eq!(queue.len(), 1);
    }
}
