//! Outbound coalescer: buffers bytes and flushes on a line boundary or a
//! full buffer
//!
//! Updates made in quick succession to a notification-generating
//! characteristic pile up inside the BLE stack, which can only keep a
//! handful of notifications in flight. Coalescing bytes into a send
//! buffer amortises that rate, while the flush policy keeps a completed
//! line from going stale in the buffer.

use core::fmt;

use crate::uart::policy;
use crate::uart::traits::UartTransport;

/// Fixed-capacity outbound coalescer.
///
/// `N` is the payload ceiling of one notification. The buffer is owned
/// exclusively by the single writing context; no locking happens here.
pub struct TxCoalescer<const N: usize> {
    buf: [u8; N],
    fill: usize,
    /// Attribute handle of the notify characteristic
    handle: u16,
}

impl<const N: usize> TxCoalescer<N> {
    /// Create an empty coalescer bound to the notify characteristic handle.
    pub const fn new(handle: u16) -> Self {
        Self {
            buf: [0; N],
            fill: 0,
            handle,
        }
    }

    /// Append bytes, flushing to the transport whenever the policy fires.
    ///
    /// Always reports the full input length as accepted. While no peer is
    /// connected the input is consumed and silently dropped; this channel
    /// is best-effort by contract and never fails a write.
    pub fn write<T: UartTransport>(&mut self, transport: &mut T, data: &[u8]) -> usize {
        if !transport.is_connected() {
            return data.len();
        }

        let mut input = data;
        while !input.is_empty() {
            let take = input.len().min(N - self.fill);
            self.buf[self.fill..self.fill + take].copy_from_slice(&input[..take]);
            self.fill += take;
            input = &input[take..];

            if policy::should_flush(self.fill, N, self.buf[self.fill - 1]) {
                transport.send_notification(self.handle, &self.buf[..self.fill]);
                self.fill = 0;
            }
        }

        data.len()
    }

    /// Write a single byte. Equivalent to `write` with a one-byte slice.
    pub fn put_char<T: UartTransport>(&mut self, transport: &mut T, byte: u8) -> usize {
        self.write(transport, &[byte])
    }

    /// Force out any buffered remainder as one notification.
    ///
    /// The buffer is emptied even while disconnected, so stale bytes never
    /// leak into a later connection.
    pub fn flush<T: UartTransport>(&mut self, transport: &mut T) {
        if self.fill == 0 {
            return;
        }
        if transport.is_connected() {
            transport.send_notification(self.handle, &self.buf[..self.fill]);
        }
        self.fill = 0;
    }

    /// Number of bytes currently buffered.
    pub fn fill(&self) -> usize {
        self.fill
    }

    /// True if no bytes are waiting for a flush.
    pub fn is_empty(&self) -> bool {
        self.fill == 0
    }
}

/// Adapter that redirects `core::fmt` output into a coalescer, so
/// `write!`/`writeln!` formatted output flows over the bridge.
pub struct TxWriter<'a, T: UartTransport, const N: usize> {
    coalescer: &'a mut TxCoalescer<N>,
    transport: &'a mut T,
}

impl<'a, T: UartTransport, const N: usize> TxWriter<'a, T, N> {
    /// Borrow a coalescer and its transport as a formatted-output sink.
    pub fn new(coalescer: &'a mut TxCoalescer<N>, transport: &'a mut T) -> Self {
        Self {
            coalescer,
            transport,
        }
    }
}

impl<T: UartTransport, const N: usize> fmt::Write for TxWriter<'_, T, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // write() accepts everything by contract, so this never errors
        self.coalescer.write(self.transport, s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uart::traits::mock::MockTransport;
    use core::fmt::Write;

    const TX_HANDLE: u16 = 0x0012;

    fn coalescer() -> TxCoalescer<20> {
        TxCoalescer::new(TX_HANDLE)
    }

    #[test]
    fn test_line_flushes_immediately() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        let accepted = tx.write(&mut transport, b"hello\n");
        assert_eq!(accepted, 6);

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, TX_HANDLE);
        assert_eq!(sent[0].1.as_slice(), b"hello\n");
        assert!(tx.is_empty());
    }

    #[test]
    fn test_bytes_held_below_capacity() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"hello");
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(tx.fill(), 5);
    }

    #[test]
    fn test_full_buffer_flushes_remainder_held() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        // 22 bytes without terminator: one 20-byte flush, 2 bytes held
        let accepted = tx.write(&mut transport, b"0123456789012345678901");
        assert_eq!(accepted, 22);

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.as_slice(), b"01234567890123456789");
        assert_eq!(tx.fill(), 2);
    }

    #[test]
    fn test_exact_capacity_single_flush() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"01234567890123456789");

        assert_eq!(transport.sent_count(), 1);
        assert!(tx.is_empty());
    }

    #[test]
    fn test_embedded_terminator_flushes_at_chunk_end() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        // The flush condition is checked once per copied chunk, on its
        // last byte: a mid-chunk terminator does not split the payload
        tx.write(&mut transport, b"ab\ncd\n");

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.as_slice(), b"ab\ncd\n");
        assert!(tx.is_empty());
    }

    #[test]
    fn test_one_line_per_write_call() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"ab\n");
        tx.write(&mut transport, b"cd\n");

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.as_slice(), b"ab\n");
        assert_eq!(sent[1].1.as_slice(), b"cd\n");
    }

    #[test]
    fn test_zero_length_write_is_noop() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"abc");
        let accepted = tx.write(&mut transport, b"");

        assert_eq!(accepted, 0);
        assert_eq!(transport.sent_count(), 0);
        assert_eq!(tx.fill(), 3);
    }

    #[test]
    fn test_disconnected_write_accepts_and_drops() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();
        transport.set_connected(false);

        let accepted = tx.write(&mut transport, b"dropped\n");

        assert_eq!(accepted, 8);
        assert_eq!(transport.sent_count(), 0);
        assert!(tx.is_empty());
    }

    #[test]
    fn test_put_char_buffers_and_flushes() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        assert_eq!(tx.put_char(&mut transport, b'x'), 1);
        assert_eq!(transport.sent_count(), 0);

        tx.put_char(&mut transport, b'\n');
        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.as_slice(), b"x\n");
    }

    #[test]
    fn test_forced_flush() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"partial");
        tx.flush(&mut transport);

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.as_slice(), b"partial");
        assert!(tx.is_empty());

        // Flushing an empty buffer sends nothing
        tx.flush(&mut transport);
        assert_eq!(transport.sent_count(), 1);
    }

    #[test]
    fn test_flush_while_disconnected_discards() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        tx.write(&mut transport, b"stale");
        transport.set_connected(false);
        tx.flush(&mut transport);

        assert_eq!(transport.sent_count(), 0);
        assert!(tx.is_empty());
    }

    #[test]
    fn test_long_input_splits_into_capacity_payloads() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        let data = [b'a'; 45];
        tx.write(&mut transport, &data);

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.len(), 20);
        assert_eq!(sent[1].1.len(), 20);
        assert_eq!(tx.fill(), 5);
    }

    #[test]
    fn test_fmt_writer_redirects_formatted_output() {
        let mut tx = coalescer();
        let mut transport = MockTransport::new();

        let mut writer = TxWriter::new(&mut tx, &mut transport);
        writeln!(writer, "v={}", 7).unwrap();

        let sent = transport.sent_payloads();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.as_slice(), b"v=7\n");
    }
}
