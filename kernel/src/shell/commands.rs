/// Built-in shell commands.
///
/// Every command talks to the kernel through the console system calls,
/// the same way a user program would, and prints to `out`.
use core::fmt::{self, Write};

use crate::console::{ConsoleContext, INPUT_BUF_SIZE, MAX_HISTORY};
use crate::proc::{self, ProcSnapshot};
use crate::syscall::{sys_history, sys_top};
use crate::uaccess::KernelSlice;

/// Dispatch a command line to the appropriate handler.
pub fn dispatch(line: &str, console: &ConsoleContext<'_>, out: &mut dyn Write) -> fmt::Result {
    let mut parts = line.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => return Ok(()),
    };

    match cmd {
        "help" | "?" => cmd_help(out),
        "history" => {
            // Exactly one argument, like `history <n>`.
            let index = parts.next();
            if parts.next().is_some() {
                return writeln!(out, "Invalid index");
            }
            cmd_history(console, out, index)
        }
        "top" => cmd_top(console, out),
        "uptime" => {
            let mut snap = ProcSnapshot::empty();
            sys_top(console, &mut snap);
            writeln!(out, "up {} seconds", snap.uptime_secs)
        }
        "echo" => {
            let mut first = true;
            for word in parts {
                if !first {
                    out.write_char(' ')?;
                }
                out.write_str(word)?;
                first = false;
            }
            writeln!(out)
        }
        // ANSI escape: clear screen + move cursor to top-left
        "clear" => out.write_str("\x1b[2J\x1b[H"),
        _ => {
            writeln!(out, "unknown command: {}", cmd)?;
            writeln!(out, "type 'help' for available commands")
        }
    }
}

fn cmd_help(out: &mut dyn Write) -> fmt::Result {
    writeln!(out, "RecallOS shell commands:")?;
    writeln!(out)?;
    writeln!(out, "  help          show this help")?;
    writeln!(out, "  history <n>   list command history, then entry n")?;
    writeln!(out, "  top           process summary")?;
    writeln!(out, "  uptime        system uptime")?;
    writeln!(out, "  echo <text>   print text")?;
    writeln!(out, "  clear         clear screen")?;
    writeln!(out)?;
    writeln!(out, "Line editing:")?;
    writeln!(out, "  Backspace     delete character")?;
    writeln!(out, "  Ctrl-U        clear line")?;
    writeln!(out, "  Ctrl-D        end of file")?;
    writeln!(out, "  Ctrl-P        print process list")?;
    writeln!(out, "  Up / Down     recall history")
}

/// List every stored entry, oldest first, then the requested one.
fn cmd_history(console: &ConsoleContext<'_>, out: &mut dyn Write, arg: Option<&str>) -> fmt::Result {
    let Some(index) = arg.and_then(|a| a.parse::<isize>().ok()) else {
        return writeln!(out, "Invalid index");
    };

    let mut requested = [0u8; INPUT_BUF_SIZE];
    if sys_history(console, &mut KernelSlice(&mut requested), index) != 0 {
        return writeln!(out, "Invalid index");
    }

    let mut slot = [0u8; INPUT_BUF_SIZE];
    for i in 0..MAX_HISTORY as isize {
        if sys_history(console, &mut KernelSlice(&mut slot), i) != 0 {
            break;
        }
        writeln!(out, "{}", slot_text(&slot))?;
    }
    writeln!(out, "requested command: {}", slot_text(&requested))
}

fn cmd_top(console: &ConsoleContext<'_>, out: &mut dyn Write) -> fmt::Result {
    let mut snap = ProcSnapshot::empty();
    sys_top(console, &mut snap);
    proc::render_top(out, &snap)
}

/// Text of a zero-padded history slot.
fn slot_text(slot: &[u8]) -> &str {
    let len = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
    core::str::from_utf8(&slot[..len]).unwrap_or("?")
}
