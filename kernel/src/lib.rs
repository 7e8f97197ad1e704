#![no_std]
#![feature(abi_x86_interrupt)]
#![allow(dead_code)]

#[cfg(test)]
extern crate alloc;

// Hardware-dependent modules — only compiled for kernel target, not host-target tests
#[cfg(not(test))]
pub mod arch;
#[cfg(not(test))]
pub mod platform;

pub mod console;
pub mod error;
pub mod proc;
pub mod shell;
pub mod sync;
pub mod syscall;
pub mod uaccess;

// --- Test stubs for the serial logging macros ---
// When running `cargo test --target x86_64-unknown-linux-gnu`, there is no
// COM1 to write to, so the logging macros used by the console and shell
// swallow their arguments instead.

#[cfg(test)]
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(test)]
#[macro_export]
macro_rules! serial_println {
    () => {};
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}
