//! Inbound capture: latches one written fragment for sequential reads
//!
//! Capture runs from the stack's write callback, which may interleave
//! with normal execution at any point. It touches only this buffer and
//! its cursors, which are never shared with the outbound path.

/// Fixed-capacity capture buffer for inbound GATT writes.
///
/// Last-write-wins: a new fragment unconditionally replaces the buffer
/// contents, discarding any unread remainder of the previous fragment.
/// This data-loss policy is deliberate; the bridge carries no inbound
/// queue. `N` is the payload ceiling of one fragment.
pub struct RxCapture<const N: usize> {
    buf: [u8; N],
    /// Count of valid bytes from the most recent fragment
    received: usize,
    /// Next byte handed out by read_byte()
    cursor: usize,
    /// Attribute handle of the inbound write characteristic, once known
    handle: Option<u16>,
}

impl<const N: usize> RxCapture<N> {
    /// Create an empty capture with no registered attribute handle.
    /// Fragments are ignored until `register` is called.
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            received: 0,
            cursor: 0,
            handle: None,
        }
    }

    /// Register the attribute handle whose writes this capture accepts.
    pub fn register(&mut self, handle: u16) {
        self.handle = Some(handle);
    }

    /// Latch one inbound fragment.
    ///
    /// Writes to other handles are ignored. Fragments longer than `N` are
    /// dropped whole, never partially copied. Otherwise the fragment
    /// replaces the buffer and the read cursor rewinds to its start.
    pub fn capture(&mut self, handle: u16, data: &[u8]) {
        if self.handle != Some(handle) {
            return;
        }
        if data.len() > N {
            return;
        }

        self.buf[..data.len()].copy_from_slice(data);
        self.received = data.len();
        self.cursor = 0;
    }

    /// Read the next captured byte, or `None` once the fragment is
    /// exhausted. Never blocks; `None` is the expected terminal state
    /// until a new fragment arrives.
    pub fn read_byte(&mut self) -> Option<u8> {
        if self.cursor == self.received {
            return None;
        }

        let byte = self.buf[self.cursor];
        self.cursor += 1;
        Some(byte)
    }

    /// Number of captured bytes not yet read.
    pub fn available(&self) -> usize {
        self.received - self.cursor
    }
}

impl<const N: usize> Default for RxCapture<N> {
    fn default() -> Self {
        Self::new()
    }
}
