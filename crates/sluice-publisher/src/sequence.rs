use sluice_core::SequenceId;

/// Issues strictly increasing sequence ids, starting at 1.
#[derive(Debug)]
pub struct SequenceAllocator {
    next: u64,
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SequenceAllocator {
    /// Allocates and returns the next sequence id.
    pub fn allocate(&mut self) -> SequenceId {
        let id = SequenceId(self.next);
        self.next += 1;
        id
    }

    /// Value the next allocation will use.
    pub fn next_id(&self) -> u64 {
        self.next
    }
}
