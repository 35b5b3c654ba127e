//! Application task: the byte-stream side of the bridge
//!
//! Single writer into the coalescer. Echoes captured inbound bytes back
//! to the peer and emits a periodic heartbeat line through the formatted
//! writer.

use core::fmt::Write;

use embassy_time::{Duration, Instant, Timer};

use crate::config::app::{HEARTBEAT_INTERVAL_MS, RX_POLL_INTERVAL_MS};
use crate::config::ble::UART_PAYLOAD_MAX;
use crate::uart::transport::{self, NotifyQueueTransport, UART_TX_HANDLE};
use crate::uart::tx::{TxCoalescer, TxWriter};

/// Task that drives the application end of the bridge
pub async fn app_task() {
    // The coalescer needs the notify handle, published once the GATT
    // server is up
    let tx_handle = UART_TX_HANDLE.wait().await;

    let mut coalescer: TxCoalescer<UART_PAYLOAD_MAX> = TxCoalescer::new(tx_handle);
    let mut bridge = NotifyQueueTransport::shared();

    let mut beat: u32 = 0;
    let mut next_heartbeat = Instant::now() + Duration::from_millis(HEARTBEAT_INTERVAL_MS);

    loop {
        // Echo captured bytes back to the peer
        while let Some(byte) = transport::read_captured_byte() {
            coalescer.put_char(&mut bridge, byte);
        }

        if Instant::now() >= next_heartbeat {
            beat = beat.wrapping_add(1);
            let mut writer = TxWriter::new(&mut coalescer, &mut bridge);
            let _ = writeln!(writer, "beat {}", beat);
            next_heartbeat += Duration::from_millis(HEARTBEAT_INTERVAL_MS);
        }

        Timer::after(Duration::from_millis(RX_POLL_INTERVAL_MS)).await;
    }
}
