/// Serial port driver (COM1, 0x3F8) — bidirectional, interrupt-driven input.
///
/// Output: debug logging via serial_println!, console echo and writes
/// Input: received-data interrupts on IRQ4, drained by `try_read_byte`
use core::fmt;
use spin::Mutex;

use bitflags::bitflags;

const COM1: u16 = 0x3F8;

// Register offsets from the base port.
const REG_DATA: u16 = 0;
const REG_IER: u16 = 1;
const REG_FCR: u16 = 2;
const REG_LCR: u16 = 3;
const REG_MCR: u16 = 4;
const REG_LSR: u16 = 5;

pub static SERIAL: Mutex<Serial> = Mutex::new(Serial::new(COM1));

bitflags! {
    /// Line status register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineStatus: u8 {
        const DATA_READY = 0x01;
        const OVERRUN = 0x02;
        const THR_EMPTY = 0x20;
    }

    /// Interrupt enable register.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqEnable: u8 {
        const RX_AVAILABLE = 0x01;
        const TX_EMPTY = 0x02;
    }
}

pub struct Serial {
    port: u16,
}

impl Serial {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }

    /// Initialize the serial port (8N1, 115200 baud), interrupts off.
    pub fn init(&self) {
        super::outb(self.port + REG_IER, IrqEnable::empty().bits());
        super::outb(self.port + REG_LCR, 0x80); // DLAB on
        super::outb(self.port + REG_DATA, 0x01); // divisor 1 = 115200 baud
        super::outb(self.port + REG_IER, 0x00); // (divisor high byte)
        super::outb(self.port + REG_LCR, 0x03); // DLAB off, 8 bits, no parity, 1 stop
        super::outb(self.port + REG_FCR, 0xC7); // FIFO on, cleared, 14-byte threshold
        super::outb(self.port + REG_MCR, 0x0B); // OUT2 (IRQ line), RTS, DTR
    }

    /// Raise IRQ4 whenever a byte arrives.
    pub fn enable_rx_interrupts(&self) {
        super::outb(self.port + REG_IER, IrqEnable::RX_AVAILABLE.bits());
    }

    fn status(&self) -> LineStatus {
        LineStatus::from_bits_truncate(super::inb(self.port + REG_LSR))
    }

    // ---- Output ----

    /// Write a single byte, waiting for the transmit buffer.
    pub fn write_byte(&self, byte: u8) {
        while !self.status().contains(LineStatus::THR_EMPTY) {
            core::hint::spin_loop();
        }
        super::outb(self.port + REG_DATA, byte);
    }

    /// Write a byte, expanding `\n` to `\r\n` for the terminal.
    pub fn put_byte(&self, byte: u8) {
        if byte == b'\n' {
            self.write_byte(b'\r');
        }
        self.write_byte(byte);
    }

    // ---- Input ----

    /// Read a byte, blocking until one is available.
    pub fn read_byte(&self) -> u8 {
        while !self.status().contains(LineStatus::DATA_READY) {
            core::hint::spin_loop();
        }
        super::inb(self.port + REG_DATA)
    }

    /// Try to read a byte without blocking. Returns None if no data available.
    pub fn try_read_byte(&self) -> Option<u8> {
        if self.status().contains(LineStatus::DATA_READY) {
            Some(super::inb(self.port + REG_DATA))
        } else {
            None
        }
    }
}

impl fmt::Write for Serial {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.put_byte(byte);
        }
        Ok(())
    }
}

/// Print to serial console.
///
/// Interrupts stay off while the port is locked: the COM1 handler echoes
/// through the same lock.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::without_interrupts(|| {
            use core::fmt::Write;
            let mut serial = $crate::arch::x86_64::serial::SERIAL.lock();
            let _ = write!(serial, $($arg)*);
        })
    };
}

/// Print to serial console with a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => {
        $crate::serial_print!("{}\n", format_args!($($arg)*))
    };
}
