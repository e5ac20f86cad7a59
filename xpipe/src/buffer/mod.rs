//! Buffer management for the channel.
//!
//! This module provides the fixed-capacity ring buffer backing
//! the channel's in-flight bytes.

mod ring;

pub use ring::RingBuffer;
