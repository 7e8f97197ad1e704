/// RecallOS interactive shell over the console.
///
/// The shell is an ordinary console reader: it blocks in `sys_read` while
/// the UART interrupt handler edits the line, so history recall and erase
/// work before the line ever reaches it. Output goes through `sys_write`.
mod commands;

use core::fmt::Write;

use crate::console::{ConsoleContext, INPUT_BUF_SIZE};
use crate::syscall::sys_read;
use crate::uaccess::KernelSlice;

pub use commands::dispatch;

const PROMPT: &str = "recall$ ";

/// Block for the next command line. `None` at end-of-file or when the
/// read was interrupted.
pub fn read_command<'b>(
    console: &ConsoleContext<'_>,
    buf: &'b mut [u8; INPUT_BUF_SIZE],
) -> Option<&'b str> {
    let n = sys_read(console, &mut KernelSlice(&mut buf[..]), INPUT_BUF_SIZE);
    if n <= 0 {
        return None;
    }
    let buf: &'b [u8] = buf;
    let line = core::str::from_utf8(&buf[..n as usize]).unwrap_or("");
    Some(line.trim())
}

/// Run the interactive shell. This function never returns.
pub fn run(console: &ConsoleContext<'_>) -> ! {
    crate::serial_println!("[shell] ready, type 'help' for commands");

    let mut buf = [0u8; INPUT_BUF_SIZE];
    loop {
        let mut out = console.writer();
        let _ = out.write_str(PROMPT);

        match read_command(console, &mut buf) {
            Some(line) => {
                if !line.is_empty() {
                    let _ = dispatch(line, console, &mut out);
                }
            }
            None => {
                // Ctrl-D on an empty line; nothing to exit to.
                let _ = writeln!(out);
            }
        }
    }
}
