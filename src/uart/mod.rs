//! Buffered UART-over-BLE bridge
//!
//! Turns the fragmented, MTU-constrained notification channel into a
//! byte-oriented stream: outbound bytes are coalesced and flushed on a
//! line boundary or a full buffer, inbound writes are captured for
//! byte-at-a-time reads.

pub mod policy;
pub mod rx;
pub mod traits;
pub mod transport;
pub mod tx;

pub use rx::RxCapture;
pub use traits::UartTransport;
pub use transport::{NotifyQueueTransport, TxPayload};
pub use tx::{TxCoalescer, TxWriter};
