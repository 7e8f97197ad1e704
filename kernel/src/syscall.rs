/// Console system calls.
///
/// Thin status-code wrappers over `ConsoleContext`: non-negative results are
/// byte counts (or 0 for success), -1 is failure. Argument fetching is done
/// by the trap layer, which passes caller memory in as a `UserBuffer`.
use crate::console::{ConsoleContext, INPUT_BUF_SIZE};
use crate::proc::ProcSnapshot;
use crate::uaccess::UserBuffer;

/// Read up to one line. 0 at end-of-file, -1 if the caller was killed
/// while waiting.
pub fn sys_read(console: &ConsoleContext<'_>, dst: &mut dyn UserBuffer, n: usize) -> isize {
    match console.read(dst, n) {
        Ok(count) => count as isize,
        Err(_) => -1,
    }
}

/// Write `n` bytes to the terminal. Returns the count actually sent.
pub fn sys_write(console: &ConsoleContext<'_>, src: &dyn UserBuffer, n: usize) -> isize {
    console.write(src, n) as isize
}

/// Copy history entry `index` into `dst` as a full zero-padded slot.
pub fn sys_history(console: &ConsoleContext<'_>, dst: &mut dyn UserBuffer, index: isize) -> isize {
    let Ok(index) = usize::try_from(index) else {
        return -1;
    };

    let mut slot = [0u8; INPUT_BUF_SIZE];
    if console.history_entry(index, &mut slot).is_err() {
        return -1;
    }
    match dst.copy_out(0, &slot) {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

/// Fill `dst` with the current process snapshot.
pub fn sys_top(console: &ConsoleContext<'_>, dst: &mut ProcSnapshot) -> isize {
    *dst = console.snapshot();
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::mock_terminal::MockTerminal;
    use crate::proc::FixedTable;
    use crate::sync::mock_sched::MockScheduler;
    use crate::uaccess::{KernelBytes, KernelSlice};

    #[test]
    fn status_codes() {
        let term = MockTerminal::new();
        let sched = MockScheduler::new();
        let procs = FixedTable::sample();
        let console = ConsoleContext::new(&term, &sched, &procs);

        for &b in b"ls -l\n" {
            console.interrupt(b);
        }

        let mut line = [0u8; 16];
        assert_eq!(sys_read(&console, &mut KernelSlice(&mut line), 16), 6);

        let mut slot = [0xFFu8; INPUT_BUF_SIZE];
        assert_eq!(sys_history(&console, &mut KernelSlice(&mut slot), 0), 0);
        assert_eq!(&slot[..6], b"ls -l\0");
        assert!(slot[5..].iter().all(|&b| b == 0));

        assert_eq!(sys_history(&console, &mut KernelSlice(&mut slot), 1), -1);
        assert_eq!(sys_history(&console, &mut KernelSlice(&mut slot), -1), -1);

        // Destination smaller than a slot.
        let mut short = [0u8; 8];
        assert_eq!(sys_history(&console, &mut KernelSlice(&mut short), 0), -1);

        assert_eq!(sys_write(&console, &KernelBytes(b"ok"), 2), 2);

        let mut snap = ProcSnapshot::empty();
        assert_eq!(sys_top(&console, &mut snap), 0);
        assert_eq!(snap.uptime_secs, 42);
        assert_eq!(snap.total(), 2);

        sched.kill();
        assert_eq!(sys_read(&console, &mut KernelSlice(&mut line), 16), -1);
    }
}
