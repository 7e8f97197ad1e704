/// Console input: interrupt-driven line buffering with history recall.
///
/// The UART interrupt handler feeds received bytes to `ConsoleContext::interrupt`,
/// which runs the line editor over the input ring and wakes blocked readers
/// once a whole line (or end-of-file) has arrived. Readers call
/// `ConsoleContext::read`, which sleeps on the commit wait channel until
/// committed input exists, then copies out at most one line.
///
/// One lock guards both the ring and the history. The interrupt path holds
/// it for a whole dispatch and never sleeps; readers drop it while parked.
use core::fmt;

use spin::Mutex;

use crate::error::ConsoleError;
use crate::proc::{ProcSnapshot, ProcessTable};
use crate::sync::{IrqOff, Scheduler, WaitChannel};
use crate::uaccess::{KernelBytes, UserBuffer};

pub mod device;
pub mod editor;
pub mod history;
pub mod ring;

#[cfg(test)]
pub mod mock_terminal;

pub use device::{TermWriter, TerminalDevice};
pub use editor::{EscapeKey, InputEvent, LineEditor};
pub use history::{HistoryEntry, HistoryStore, MAX_HISTORY};
pub use ring::{DrainStop, RingChannel};

/// Size of the input ring, and of every history slot.
pub const INPUT_BUF_SIZE: usize = 128;

/// Control-x.
pub const fn ctrl(x: u8) -> u8 {
    x - b'@'
}

pub const CTRL_D: u8 = ctrl(b'D');
pub const CTRL_H: u8 = ctrl(b'H');
pub const CTRL_P: u8 = ctrl(b'P');
pub const CTRL_U: u8 = ctrl(b'U');
pub const DEL: u8 = 0x7F;
pub const ESC: u8 = 0x1B;

/// Everything the console lock protects.
pub struct ConsoleState {
    pub(crate) ring: RingChannel,
    pub(crate) history: HistoryStore,
}

impl ConsoleState {
    pub const fn new() -> Self {
        Self {
            ring: RingChannel::new(),
            history: HistoryStore::new(),
        }
    }

    pub fn ring(&self) -> &RingChannel {
        &self.ring
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}

/// The console: input state plus the collaborators it talks to.
pub struct ConsoleContext<'a> {
    state: Mutex<ConsoleState>,
    committed: WaitChannel,
    term: &'a dyn TerminalDevice,
    sched: &'a dyn Scheduler,
    procs: &'a dyn ProcessTable,
}

impl<'a> ConsoleContext<'a> {
    pub fn new(
        term: &'a dyn TerminalDevice,
        sched: &'a dyn Scheduler,
        procs: &'a dyn ProcessTable,
    ) -> Self {
        Self {
            state: Mutex::new(ConsoleState::new()),
            committed: WaitChannel::new(),
            term,
            sched,
            procs,
        }
    }

    /// Console input interrupt: one received byte.
    ///
    /// Does erase/kill processing, appends to the ring, and wakes `read`
    /// if a whole line has arrived. Must be called with interrupts off.
    pub fn interrupt(&self, byte: u8) {
        let mut state = self.state.lock();
        let committed = LineEditor::new(&mut state, self.term, self.procs).handle(byte);
        if committed {
            self.committed.notify(self.sched);
        }
    }

    /// Copy up to one line of input into `dst`, blocking until one exists.
    ///
    /// Stops after a newline, after `n` bytes, or at end-of-file. Returns
    /// the number of bytes produced (zero means end-of-file). If caller
    /// memory faults the partial count is returned.
    ///
    /// # Errors
    /// `ConsoleError::Interrupted` if the caller is killed while waiting.
    pub fn read(&self, dst: &mut dyn UserBuffer, n: usize) -> Result<usize, ConsoleError> {
        let mut done = 0;
        while done < n {
            let irq = IrqOff::new(self.sched);
            let mut state = self.state.lock();

            // wait until the interrupt handler has committed some input.
            if !state.ring.has_committed() {
                if self.sched.killed() {
                    drop(state);
                    drop(irq);
                    crate::serial_println!("[console] read aborted: caller killed");
                    return Err(ConsoleError::Interrupted);
                }
                let seen = self.committed.generation();
                drop(state);
                drop(irq);
                self.committed.wait(seen, self.sched);
                continue;
            }

            match state.ring.drain(dst, &mut done, n) {
                // a buffer-full commit without newline; keep reading.
                DrainStop::Empty => continue,
                DrainStop::Newline | DrainStop::Eof | DrainStop::Limit | DrainStop::Fault => break,
            }
        }
        Ok(done)
    }

    /// Pass `n` bytes from `src` straight to the terminal. No echo, no
    /// editing. Returns how many bytes were sent before a copy fault.
    pub fn write(&self, src: &dyn UserBuffer, n: usize) -> usize {
        let mut byte = [0u8; 1];
        for i in 0..n {
            if src.copy_in(i, &mut byte).is_err() {
                return i;
            }
            let _irq = IrqOff::new(self.sched);
            self.term.put_byte(byte[0]);
        }
        n
    }

    /// Copy history entry `index` (zero padded) into `dst`.
    ///
    /// # Errors
    /// `ConsoleError::InvalidIndex` unless `index < history_len()`.
    pub fn history_entry(
        &self,
        index: usize,
        dst: &mut [u8; INPUT_BUF_SIZE],
    ) -> Result<(), ConsoleError> {
        self.with_state(|state| {
            let entry = state.history.entry_at(index)?;
            dst.copy_from_slice(entry.padded());
            Ok(())
        })
    }

    pub fn history_len(&self) -> usize {
        self.with_state(|state| state.history.len())
    }

    /// Forward the process table's snapshot.
    pub fn snapshot(&self) -> ProcSnapshot {
        self.procs.snapshot()
    }

    /// Run `f` against the locked state, with interrupts off.
    pub fn with_state<R>(&self, f: impl FnOnce(&ConsoleState) -> R) -> R {
        let _irq = IrqOff::new(self.sched);
        let state = self.state.lock();
        f(&state)
    }

    /// Formatted output through the console write path.
    pub fn writer(&self) -> ConsoleWriter<'_, 'a> {
        ConsoleWriter(self)
    }
}

/// `fmt::Write` over `ConsoleContext::write`.
pub struct ConsoleWriter<'c, 'a>(&'c ConsoleContext<'a>);

impl fmt::Write for ConsoleWriter<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.0.write(&KernelBytes(bytes), bytes.len()) == bytes.len() {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
