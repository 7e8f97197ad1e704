/// RAM-backed mock terminal for testing.
///
/// Captures every transmitted byte and serves received bytes from a
/// scripted queue, so the line editor can be exercised without a UART.
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use spin::Mutex;

use super::device::TerminalDevice;

pub struct MockTerminal {
    input: Mutex<VecDeque<u8>>,
    output: Mutex<Vec<u8>>,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(VecDeque::new()),
            output: Mutex::new(Vec::new()),
        }
    }

    /// Queue bytes for `get_byte_blocking` (escape-sequence tails).
    pub fn push_input(&self, bytes: &[u8]) {
        self.input.lock().extend(bytes.iter().copied());
    }

    /// Everything transmitted so far.
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().clone()
    }

    /// Drain the captured output.
    pub fn take_output(&self) -> Vec<u8> {
        core::mem::take(&mut *self.output.lock())
    }
}

impl TerminalDevice for MockTerminal {
    fn put_byte(&self, byte: u8) {
        self.output.lock().push(byte);
    }

    /// An exhausted script reads as NUL instead of hanging the test.
    fn get_byte_blocking(&self) -> u8 {
        self.input.lock().pop_front().unwrap_or(0)
    }
}
