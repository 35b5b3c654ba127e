//! Notification transport trait for abstraction and testability
//!
//! This trait defines the interface the bridge consumes from the BLE
//! stack, allowing the real GATT glue to be swapped with a mock for
//! testing.

/// Abstract notification transport consumed by the bridge.
///
/// Implementations are fire-and-forget: `send_notification` surfaces no
/// delivery confirmation and must never block, since the caller may be
/// running in the main loop between interrupt callbacks.
pub trait UartTransport {
    /// Whether a peer is currently connected.
    fn is_connected(&self) -> bool;

    /// Push one payload to the peer as a single notification on the given
    /// attribute handle. Payloads longer than one notification unit are
    /// rejected whole by the implementation.
    fn send_notification(&mut self, handle: u16, payload: &[u8]);
}
