//! Nordic UART Service (NUS) definition
//!
//! Standard NUS layout for BLE serial communication:
//! - Service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E
//! - RX Characteristic: 6E400002-... (write, write without response)
//! - TX Characteristic: 6E400003-... (notify)

use trouble_host::prelude::*;

use crate::config::ble::UART_PAYLOAD_MAX;

/// UART service for the bridge
///
/// Characteristic sizes match the payload ceiling of one notification
/// (ATT MTU minus the 3-byte ATT header), so no value ever needs to be
/// split across transport units.
#[gatt_service(uuid = "6e400001-b5a3-f393-e0a9-e50e24dcca9e")]
pub struct UartService {
    /// RX Characteristic - peer writes inbound fragments here
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response, value = [0u8; 20])]
    pub rx: [u8; UART_PAYLOAD_MAX],

    /// TX Characteristic - buffered bytes are flushed here as notifications
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify, value = [0u8; 20])]
    pub tx: [u8; UART_PAYLOAD_MAX],
}
