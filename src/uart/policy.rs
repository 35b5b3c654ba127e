//! Flush policy for the outbound coalescer
//!
//! Decides when buffered bytes are pushed to the transport. This is the
//! tuning point of the bridge: it trades notification rate against the
//! latency and staleness of buffered output.

use crate::config::uart::LINE_TERMINATOR;

/// Returns true if the send buffer should be flushed after appending a byte.
///
/// `fill` counts the buffered bytes including `last_byte`. Flush fires when
/// the buffer is full or the appended byte terminates a line.
pub fn should_flush(fill: usize, capacity: usize, last_byte: u8) -> bool {
    fill == capacity || last_byte == LINE_TERMINATOR
}
