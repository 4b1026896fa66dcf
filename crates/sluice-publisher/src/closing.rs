use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

/// Errors for requesting and completing a drain-then-close shutdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloseError {
    /// A close was already requested on this publisher.
    #[error("close already pending")]
    AlreadyPending,
    /// The channel reported an error before draining completed.
    #[error("channel error before drain completed: {0}")]
    Channel(String),
}

type CloseSlot = Rc<RefCell<Option<Result<(), CloseError>>>>;

/// One-shot completion handle for a requested close.
///
/// Single-threaded by design: the handle shares a slot with the coordinator
/// and observes the outcome once whichever code path first satisfies the
/// resolution condition writes it.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    slot: CloseSlot,
}

impl CloseHandle {
    /// Outcome of the close, or `None` while draining is still in progress.
    pub fn outcome(&self) -> Option<Result<(), CloseError>> {
        self.slot.borrow().clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

/// Tracks the at-most-one outstanding close request and resolves it exactly
/// once.
#[derive(Debug, Default)]
pub struct CloseCoordinator {
    slot: Option<CloseSlot>,
}

impl CloseCoordinator {
    /// Registers the close request, handing back its completion handle.
    pub fn begin(&mut self) -> Result<CloseHandle, CloseError> {
        if self.slot.is_some() {
            return Err(CloseError::AlreadyPending);
        }
        let slot: CloseSlot = Rc::new(RefCell::new(None));
        self.slot = Some(Rc::clone(&slot));
        Ok(CloseHandle { slot })
    }

    /// Whether a close has ever been requested (resolved or not). Publishes
    /// are rejected from this point on.
    pub fn is_requested(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether a close is requested and still unresolved.
    pub fn is_awaiting(&self) -> bool {
        matches!(&self.slot, Some(slot) if slot.borrow().is_none())
    }

    /// Resolves the pending close as successful. No-op once resolved.
    pub fn resolve_ok(&mut self) {
        self.resolve(Ok(()));
    }

    /// Rejects the pending close with a channel error. No-op once resolved.
    pub fn resolve_err(&mut self, message: String) {
        self.resolve(Err(CloseError::Channel(message)));
    }

    fn resolve(&mut self, outcome: Result<(), CloseError>) {
        let Some(slot) = &self.slot else { return };
        let mut current = slot.borrow_mut();
        if current.is_none() {
            *current = Some(outcome);
        }
    }
}
