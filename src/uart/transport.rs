//! Queue-backed transport and shared bridge state
//!
//! Glue between the synchronous bridge core and the async BLE task.
//! Flushed payloads go into a bounded channel the BLE task drains into
//! GATT notifications; link state is a flag the BLE task maintains. The
//! inbound capture lives in a critical-section cell so the GATT write
//! path and the application reader can both reach it.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_sync::signal::Signal;
use heapless::Vec;

use crate::config::ble::UART_PAYLOAD_MAX;
use crate::config::uart::OUTBOUND_QUEUE_DEPTH;
use crate::uart::rx::RxCapture;
use crate::uart::traits::UartTransport;

/// One flushed payload queued for notification
pub type TxPayload = Vec<u8, UART_PAYLOAD_MAX>;

/// Outbound notification queue, drained by the BLE task
pub static OUTBOUND_QUEUE: Channel<CriticalSectionRawMutex, TxPayload, OUTBOUND_QUEUE_DEPTH> =
    Channel::new();

/// Whether a central is currently connected (maintained by the BLE task)
pub static LINK_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Signals the notify characteristic handle once the GATT server is built
pub static UART_TX_HANDLE: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Inbound capture cell: written from the GATT write path, read by the
/// application. Each side takes the critical section only for the few
/// instructions that move the cursor and buffer together.
static RX_CAPTURE: Mutex<CriticalSectionRawMutex, RefCell<RxCapture<UART_PAYLOAD_MAX>>> =
    Mutex::new(RefCell::new(RxCapture::new()));

/// Register the inbound write characteristic with the shared capture.
pub fn register_inbound_handle(handle: u16) {
    RX_CAPTURE.lock(|cell| cell.borrow_mut().register(handle));
}

/// Feed one inbound fragment into the shared capture.
pub fn capture_fragment(handle: u16, data: &[u8]) {
    RX_CAPTURE.lock(|cell| cell.borrow_mut().capture(handle, data));
}

/// Read the next captured byte, or `None` at end of the fragment.
pub fn read_captured_byte() -> Option<u8> {
    RX_CAPTURE.lock(|cell| cell.borrow_mut().read_byte())
}

/// Discard any queued outbound payloads.
///
/// Called on disconnect so payloads flushed for one peer are never
/// notified to the next one.
pub fn drain_outbound_queue() {
    while OUTBOUND_QUEUE.try_receive().is_ok() {}
}

/// Production [`UartTransport`]: forwards flushes into a notification
/// queue and reports the link flag.
///
/// `send_notification` is non-blocking; when the queue is full the
/// payload is dropped, matching the fire-and-forget contract.
pub struct NotifyQueueTransport<'a> {
    sender: Sender<'a, CriticalSectionRawMutex, TxPayload, OUTBOUND_QUEUE_DEPTH>,
    connected: &'a AtomicBool,
}

impl<'a> NotifyQueueTransport<'a> {
    /// Build a transport over an explicit queue and link flag.
    pub fn new(
        sender: Sender<'a, CriticalSectionRawMutex, TxPayload, OUTBOUND_QUEUE_DEPTH>,
        connected: &'a AtomicBool,
    ) -> Self {
        Self { sender, connected }
    }

    /// Transport wired to the firmware's global queue and link flag.
    pub fn shared() -> NotifyQueueTransport<'static> {
        NotifyQueueTransport::new(OUTBOUND_QUEUE.sender(), &LINK_CONNECTED)
    }
}

impl UartTransport for NotifyQueueTransport<'_> {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    fn send_notification(&mut self, _handle: u16, payload: &[u8]) {
        let mut queued = TxPayload::new();
        if queued.extend_from_slice(payload).is_err() {
            // Larger than one notification unit: reject whole, never
            // let it overflow the fixed payload size
            return;
        }
        let _ = self.sender.try_send(queued);
    }
}
