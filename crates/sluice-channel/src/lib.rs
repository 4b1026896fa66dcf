//! Channel abstractions for sluice.
//!
//! The publisher only depends on the frame-oriented link trait and event
//! types defined in this crate.

pub mod link;
pub mod memory;

pub use link::{ChannelError, ChannelEvent, ChannelLink, Confirm, ConfirmKind};
pub use memory::InMemoryChannel;
