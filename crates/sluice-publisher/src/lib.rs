//! Flow-controlled publishing on top of a confirm-capable channel.
//!
//! This crate wires together sequence allocation, a FIFO pending queue,
//! outstanding-confirm tracking, and drain-then-close shutdown behind one
//! throttle controller that bounds the number of in-flight frames.

pub mod closing;
pub mod queue;
pub mod sequence;
pub mod sink;
pub mod stats;
pub mod throttle;
pub mod tracker;
