/// TerminalDevice trait: abstracts the character device behind the console.
///
/// The COM1 UART and an in-memory mock both implement this trait. The line
/// editor echoes through it and pulls escape-sequence bytes from it directly.
use core::fmt;

/// Raw byte transmit/receive.
pub trait TerminalDevice: Sync {
    /// Transmit one byte. Must not sleep; called from interrupt context.
    fn put_byte(&self, byte: u8);

    /// Receive one byte, spinning until the device has one.
    fn get_byte_blocking(&self) -> u8;
}

/// `fmt::Write` adapter that sends formatted text straight to a device.
pub struct TermWriter<'a>(pub &'a dyn TerminalDevice);

impl fmt::Write for TermWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.0.put_byte(byte);
        }
        Ok(())
    }
}
