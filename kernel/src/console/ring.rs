/// Input ring shared by the console interrupt handler and blocked readers.
///
/// Three free-running `u32` indices partition the ring:
///
/// ```text
///   r ........ w ........ e
///   | committed | editing  |
/// ```
///
/// `[r, w)` is committed input a reader may consume, `[w, e)` is the line
/// still being edited. Indices only move forward (apart from erase and the
/// EOF push-back) and are reduced modulo the capacity when touching `buf`.
/// Because the capacity divides 2^32 the wraparound of the indices
/// themselves is seamless; all comparisons go through `distance`.
use super::{CTRL_D, INPUT_BUF_SIZE};
use crate::uaccess::UserBuffer;

const CAPACITY: u32 = INPUT_BUF_SIZE as u32;

static_assertions::const_assert!(INPUT_BUF_SIZE.is_power_of_two());
static_assertions::const_assert!(INPUT_BUF_SIZE <= u32::MAX as usize);

/// Why `drain` stopped handing out bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStop {
    /// Copied a newline; the line is complete.
    Newline,
    /// Reached the end-of-file marker.
    Eof,
    /// Produced the requested number of bytes.
    Limit,
    /// Ran out of committed bytes before any of the above.
    Empty,
    /// Caller memory rejected the copy; the byte stays in the ring.
    Fault,
}

pub struct RingChannel {
    buf: [u8; INPUT_BUF_SIZE],
    r: u32, // Read index
    w: u32, // Commit index
    e: u32, // Edit index
}

impl RingChannel {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; INPUT_BUF_SIZE],
            r: 0,
            w: 0,
            e: 0,
        }
    }

    /// Bytes from `from` forward to `to`, wraparound-safe.
    #[inline]
    pub const fn distance(from: u32, to: u32) -> u32 {
        to.wrapping_sub(from)
    }

    #[inline]
    const fn slot(idx: u32) -> usize {
        (idx % CAPACITY) as usize
    }

    pub fn read_idx(&self) -> u32 {
        self.r
    }

    pub fn commit_idx(&self) -> u32 {
        self.w
    }

    pub fn edit_idx(&self) -> u32 {
        self.e
    }

    /// Bytes held in the ring, committed or not.
    pub fn len(&self) -> usize {
        Self::distance(self.r, self.e) as usize
    }

    pub fn is_full(&self) -> bool {
        Self::distance(self.r, self.e) == CAPACITY
    }

    /// A reader has something to consume.
    pub fn has_committed(&self) -> bool {
        self.r != self.w
    }

    /// The line being edited is non-empty.
    pub fn is_editing(&self) -> bool {
        self.e != self.w
    }

    /// `r <= w <= e` and `e - r <= C`.
    pub fn invariants_hold(&self) -> bool {
        let committed = Self::distance(self.r, self.w);
        let total = Self::distance(self.r, self.e);
        committed <= total && total <= CAPACITY
    }

    /// Store `byte` at the edit index. Returns false, dropping the byte,
    /// when the ring is full.
    pub fn append(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[Self::slot(self.e)] = byte;
        self.e = self.e.wrapping_add(1);
        true
    }

    /// Last byte of the line being edited.
    pub fn last_edit_byte(&self) -> Option<u8> {
        if self.is_editing() {
            Some(self.buf[Self::slot(self.e.wrapping_sub(1))])
        } else {
            None
        }
    }

    /// Remove the last uncommitted byte.
    pub fn retreat(&mut self) -> Option<u8> {
        let byte = self.last_edit_byte()?;
        self.e = self.e.wrapping_sub(1);
        Some(byte)
    }

    /// Rewind the edit index to the commit point. Returns the number of
    /// bytes from the read index to the old edit index, which is what the
    /// terminal has to erase to clear the visible input.
    pub fn reset_edit(&mut self) -> u32 {
        let visible = Self::distance(self.r, self.e);
        self.e = self.w;
        visible
    }

    /// Make the edited line available to readers.
    pub fn commit_line(&mut self) {
        self.w = self.e;
    }

    /// Bytes of the line being edited, oldest first.
    pub fn pending_line(&self) -> impl Iterator<Item = u8> + '_ {
        (0..Self::distance(self.w, self.e))
            .map(move |i| self.buf[Self::slot(self.w.wrapping_add(i))])
    }

    /// Consume one committed byte.
    pub fn pop(&mut self) -> Option<u8> {
        if !self.has_committed() {
            return None;
        }
        let byte = self.buf[Self::slot(self.r)];
        self.r = self.r.wrapping_add(1);
        Some(byte)
    }

    /// Hand the last popped byte back to the next reader.
    fn unpop(&mut self) {
        self.r = self.r.wrapping_sub(1);
    }

    /// Copy committed bytes into `dst` at offset `*done`, advancing `*done`,
    /// until `n` bytes were produced, a newline was copied, the EOF marker
    /// was reached, or committed input ran out.
    ///
    /// The EOF marker is never copied. If the read already produced bytes
    /// (`*done > 0`) it is pushed back, so the next read returns zero.
    pub fn drain(&mut self, dst: &mut dyn UserBuffer, done: &mut usize, n: usize) -> DrainStop {
        while *done < n {
            let Some(c) = self.pop() else {
                return DrainStop::Empty;
            };

            if c == CTRL_D {
                if *done > 0 {
                    self.unpop();
                }
                return DrainStop::Eof;
            }

            if dst.copy_out(*done, &[c]).is_err() {
                self.unpop();
                return DrainStop::Fault;
            }
            *done += 1;

            if c == b'\n' {
                return DrainStop::Newline;
            }
        }
        DrainStop::Limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uaccess::KernelSlice;

    fn ring_at(start: u32) -> RingChannel {
        let mut ring = RingChannel::new();
        ring.r = start;
        ring.w = start;
        ring.e = start;
        ring
    }

    #[test]
    fn append_until_full_then_drop() {
        let mut ring = RingChannel::new();
        for i in 0..INPUT_BUF_SIZE {
            assert!(ring.append(i as u8));
        }
        assert!(ring.is_full());
        assert!(!ring.append(b'x'));
        assert_eq!(ring.len(), INPUT_BUF_SIZE);
        assert!(ring.invariants_hold());
    }

    #[test]
    fn retreat_stops_at_commit_point() {
        let mut ring = RingChannel::new();
        ring.append(b'a');
        ring.commit_line();
        ring.append(b'b');
        assert_eq!(ring.retreat(), Some(b'b'));
        assert_eq!(ring.retreat(), None);
        assert_eq!(ring.edit_idx(), ring.commit_idx());
    }

    #[test]
    fn indices_wrap_around_u32() {
        let mut ring = ring_at(u32::MAX - 2);
        for &b in b"wrap\n" {
            assert!(ring.append(b));
        }
        ring.commit_line();
        assert!(ring.invariants_hold());
        assert_eq!(ring.pending_line().count(), 0);

        let mut out = [0u8; 8];
        let mut done = 0;
        let stop = ring.drain(&mut KernelSlice(&mut out), &mut done, 8);
        assert_eq!(stop, DrainStop::Newline);
        assert_eq!(&out[..done], b"wrap\n");
        assert_eq!(ring.read_idx(), 2);
    }

    #[test]
    fn drain_pushes_back_eof_after_data() {
        let mut ring = RingChannel::new();
        for &b in &[b'o', b'k', CTRL_D] {
            ring.append(b);
        }
        ring.commit_line();

        let mut out = [0u8; 8];
        let mut done = 0;
        assert_eq!(ring.drain(&mut KernelSlice(&mut out), &mut done, 8), DrainStop::Eof);
        assert_eq!(done, 2);
        assert!(ring.has_committed());

        let mut done = 0;
        assert_eq!(ring.drain(&mut KernelSlice(&mut out), &mut done, 8), DrainStop::Eof);
        assert_eq!(done, 0);
        assert!(!ring.has_committed());
    }

    #[test]
    fn drain_fault_keeps_byte() {
        let mut ring = RingChannel::new();
        for &b in b"abc\n" {
            ring.append(b);
        }
        ring.commit_line();

        let mut small = [0u8; 2];
        let mut done = 0;
        assert_eq!(ring.drain(&mut KernelSlice(&mut small), &mut done, 10), DrainStop::Fault);
        assert_eq!(done, 2);
        assert_eq!(ring.pop(), Some(b'c'));
    }

    #[test]
    fn reset_edit_reports_visible_span() {
        let mut ring = RingChannel::new();
        for &b in b"x\n" {
            ring.append(b);
        }
        ring.commit_line();
        ring.append(b'y');
        ring.append(b'z');
        assert_eq!(ring.reset_edit(), 4);
        assert!(!ring.is_editing());
        assert_eq!(ring.len(), 2);
    }
}
