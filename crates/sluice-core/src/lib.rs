//! Core sluice primitives shared across crates.
//!
//! Includes the sequence/delivery identifier types, publish-flag bits, and
//! the opaque outbound frame handed to the channel layer.

pub mod frame;
pub mod types;

pub use frame::PublishFrame;
pub use types::{DeliveryTag, SequenceId, PUBLISH_FLAG_IMMEDIATE, PUBLISH_FLAG_MANDATORY};
