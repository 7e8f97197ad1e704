/// Console line discipline.
///
/// Every received byte is classified into an `InputEvent` and applied to
/// the input ring and history under the console lock:
/// - Newline / CR — submit line
/// - Ctrl-D — end of file (submits whatever is pending)
/// - Backspace / DEL (0x08 / 0x7F) — delete character before cursor
/// - Ctrl-U — kill line
/// - Ctrl-P — print process list
/// - ESC [ A / ESC [ B — previous / next history entry
///
/// Runs in interrupt context: nothing here may sleep.
use super::device::{TermWriter, TerminalDevice};
use super::{ConsoleState, CTRL_D, CTRL_H, CTRL_P, CTRL_U, DEL, ESC, INPUT_BUF_SIZE};
use crate::proc::{self, ProcessTable};

/// What a received byte means to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ProcDump,
    KillLine,
    Erase,
    Escape,
    Ignore,
    Input(u8),
}

impl InputEvent {
    pub const fn classify(byte: u8) -> Self {
        match byte {
            CTRL_P => InputEvent::ProcDump,
            CTRL_U => InputEvent::KillLine,
            CTRL_H | DEL => InputEvent::Erase,
            ESC => InputEvent::Escape,
            0 => InputEvent::Ignore,
            b'\r' => InputEvent::Input(b'\n'),
            other => InputEvent::Input(other),
        }
    }
}

/// Keys recognised after ESC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKey {
    HistoryUp,
    HistoryDown,
}

impl EscapeKey {
    /// Pull the rest of an escape sequence straight from the device.
    /// Anything other than `[A` / `[B` is swallowed.
    pub fn read(term: &dyn TerminalDevice) -> Option<Self> {
        if term.get_byte_blocking() != b'[' {
            return None;
        }
        match term.get_byte_blocking() {
            b'A' => Some(EscapeKey::HistoryUp),
            b'B' => Some(EscapeKey::HistoryDown),
            _ => None,
        }
    }
}

/// One dispatch worth of editor state, borrowed from the locked console.
pub struct LineEditor<'s, 'a> {
    state: &'s mut ConsoleState,
    term: &'a dyn TerminalDevice,
    procs: &'a dyn ProcessTable,
}

impl<'s, 'a> LineEditor<'s, 'a> {
    pub fn new(
        state: &'s mut ConsoleState,
        term: &'a dyn TerminalDevice,
        procs: &'a dyn ProcessTable,
    ) -> Self {
        Self { state, term, procs }
    }

    /// Apply one received byte. Returns true when a line was committed and
    /// readers should be woken.
    pub fn handle(&mut self, byte: u8) -> bool {
        match InputEvent::classify(byte) {
            InputEvent::ProcDump => {
                let snap = self.procs.snapshot();
                let _ = proc::dump(&mut TermWriter(self.term), &snap);
                false
            }
            InputEvent::KillLine => {
                while self.state.ring.last_edit_byte().map_or(false, |b| b != b'\n') {
                    self.state.ring.retreat();
                    self.erase_glyph();
                }
                false
            }
            InputEvent::Erase => {
                if self.state.ring.retreat().is_some() {
                    self.erase_glyph();
                }
                false
            }
            InputEvent::Escape => {
                match EscapeKey::read(self.term) {
                    Some(EscapeKey::HistoryUp) => self.recall_older(),
                    Some(EscapeKey::HistoryDown) => self.recall_newer(),
                    None => {}
                }
                false
            }
            InputEvent::Ignore => false,
            InputEvent::Input(c) => self.input(c),
        }
    }

    fn input(&mut self, c: u8) -> bool {
        if self.state.ring.is_full() {
            return false;
        }
        self.echo(c);
        self.state.ring.append(c);

        if c == b'\n' || c == CTRL_D || self.state.ring.is_full() {
            self.finish_line();
            return true;
        }
        false
    }

    /// Record the edited line in history and hand it to readers.
    fn finish_line(&mut self) {
        let mut line = [0u8; INPUT_BUF_SIZE];
        let mut len = 0;
        for b in self.state.ring.pending_line() {
            line[len] = b;
            len += 1;
        }
        if let Some(b'\n' | CTRL_D) = line[..len].last().copied() {
            len -= 1;
        }

        self.state.history.record(&line[..len]);
        self.state.ring.commit_line();
    }

    fn recall_older(&mut self) {
        if let Some(entry) = self.state.history.step_older().copied() {
            self.replace_line(entry.as_bytes());
        }
    }

    fn recall_newer(&mut self) {
        if let Some(entry) = self.state.history.step_newer().copied() {
            self.replace_line(entry.as_bytes());
        }
    }

    /// Wipe the visible input and retype `text` as the uncommitted line.
    fn replace_line(&mut self, text: &[u8]) {
        for _ in 0..self.state.ring.reset_edit() {
            self.erase_glyph();
        }
        for &c in text {
            if !self.state.ring.append(c) {
                break;
            }
            self.echo(c);
        }
    }

    fn echo(&self, c: u8) {
        self.term.put_byte(c);
    }

    /// Backspace over one glyph: back, overwrite with a space, back again.
    fn erase_glyph(&self) {
        self.term.put_byte(CTRL_H);
        self.term.put_byte(b' ');
        self.term.put_byte(CTRL_H);
    }
}
