//! Configuration constants for the BLE UART bridge

/// ATT transport constants
pub mod ble {
    /// Default negotiated ATT MTU
    pub const ATT_MTU: usize = 23;

    /// Bytes of ATT header overhead per notification (opcode + handle)
    pub const ATT_HEADER_LEN: usize = 3;

    /// Maximum payload bytes deliverable in one notification.
    /// Must be renegotiated if the link MTU changes.
    pub const UART_PAYLOAD_MAX: usize = ATT_MTU - ATT_HEADER_LEN;

    /// Device name prefix for advertising (suffixed with the chip id)
    pub const DEVICE_NAME_PREFIX: &str = "BlueArt-";
}

/// UART bridge constants
pub mod uart {
    /// Byte that triggers an outbound flush in addition to buffer-full
    pub const LINE_TERMINATOR: u8 = b'\n';

    /// Depth of the outbound notification queue. The BLE stack can only
    /// keep a small number of notifications in flight, so there is no
    /// point queueing many more than that.
    pub const OUTBOUND_QUEUE_DEPTH: usize = 4;
}

/// Application task constants
pub mod app {
    /// Interval between heartbeat lines sent over the bridge
    pub const HEARTBEAT_INTERVAL_MS: u64 = 5_000;

    /// Polling interval for draining captured inbound bytes
    pub const RX_POLL_INTERVAL_MS: u64 = 20;
}
