/// Command history: the last `MAX_HISTORY` submitted lines.
///
/// Entries are kept oldest-first in a fixed array. Once full, recording a
/// new line shifts everything one slot toward the front, evicting the
/// oldest. The navigation cursor always points at a stored entry (or is
/// `None` while nothing has been recorded).
use super::INPUT_BUF_SIZE;
use crate::error::ConsoleError;

/// Maximum number of remembered lines.
pub const MAX_HISTORY: usize = 16;

/// Longest storable line (one byte shorter than the input ring).
pub const MAX_ENTRY_LEN: usize = INPUT_BUF_SIZE - 1;

/// The history-inspection command is not recorded into its own log.
const INSPECT_COMMAND: &[u8] = b"history";

/// A single remembered line, zero padded to the ring size.
#[derive(Clone, Copy)]
pub struct HistoryEntry {
    text: [u8; INPUT_BUF_SIZE],
    len: usize,
}

impl HistoryEntry {
    pub const fn empty() -> Self {
        Self {
            text: [0u8; INPUT_BUF_SIZE],
            len: 0,
        }
    }

    fn set(&mut self, text: &[u8]) {
        let len = text.len().min(MAX_ENTRY_LEN);
        self.text = [0u8; INPUT_BUF_SIZE];
        self.text[..len].copy_from_slice(&text[..len]);
        self.len = len;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text[..self.len]
    }

    /// Whole slot including the zero padding, as handed to callers of the
    /// inspection interface.
    pub fn padded(&self) -> &[u8; INPUT_BUF_SIZE] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct HistoryStore {
    slots: [HistoryEntry; MAX_HISTORY],
    len: usize,
    total_recorded: u64,
    cursor: Option<usize>,
}

impl HistoryStore {
    pub const fn new() -> Self {
        Self {
            slots: [HistoryEntry::empty(); MAX_HISTORY],
            len: 0,
            total_recorded: 0,
            cursor: None,
        }
    }

    /// `history` alone or with arguments.
    pub fn is_inspect_command(text: &[u8]) -> bool {
        match text.strip_prefix(INSPECT_COMMAND) {
            Some(rest) => rest.first().map_or(true, |b| b.is_ascii_whitespace()),
            None => false,
        }
    }

    /// Remember a submitted line and point the cursor at it.
    ///
    /// Returns false when the line was the inspection command and was skipped.
    pub fn record(&mut self, text: &[u8]) -> bool {
        if Self::is_inspect_command(text) {
            return false;
        }

        if self.len < MAX_HISTORY {
            self.slots[self.len].set(text);
            self.len += 1;
        } else {
            self.slots.copy_within(1.., 0);
            self.slots[MAX_HISTORY - 1].set(text);
        }

        self.total_recorded += 1;
        self.cursor = Some(self.len - 1);
        true
    }

    pub fn entry_at(&self, index: usize) -> Result<&HistoryEntry, ConsoleError> {
        if index >= self.len {
            return Err(ConsoleError::InvalidIndex {
                index,
                len: self.len,
            });
        }
        Ok(&self.slots[index])
    }

    /// Entry under the cursor, then move the cursor one step older.
    pub fn step_older(&mut self) -> Option<&HistoryEntry> {
        let idx = self.cursor?;
        if idx > 0 {
            self.cursor = Some(idx - 1);
        }
        Some(&self.slots[idx])
    }

    /// Entry under the cursor, then move the cursor one step newer.
    pub fn step_newer(&mut self) -> Option<&HistoryEntry> {
        let idx = self.cursor?;
        if idx + 1 < self.len {
            self.cursor = Some(idx + 1);
        }
        Some(&self.slots[idx])
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lines recorded since boot, evicted ones included.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Stored entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.slots[..self.len].iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    fn filled(n: usize) -> HistoryStore {
        let mut store = HistoryStore::new();
        for i in 0..n {
            assert!(store.record(format!("c{}", i).as_bytes()));
        }
        store
    }

    #[test]
    fn eviction_drops_oldest() {
        let store = filled(MAX_HISTORY + 1);
        assert_eq!(store.len(), MAX_HISTORY);
        assert_eq!(store.total_recorded(), 17);
        assert_eq!(store.entry_at(0).unwrap().as_bytes(), b"c1");
        assert_eq!(store.entry_at(15).unwrap().as_bytes(), b"c16");
    }

    #[test]
    fn cursor_clamped_after_eviction() {
        let mut store = filled(MAX_HISTORY + 3);
        assert_eq!(store.cursor(), Some(MAX_HISTORY - 1));

        // Newest entry first, and no step past it.
        assert_eq!(store.step_newer().unwrap().as_bytes(), b"c18");
        assert_eq!(store.cursor(), Some(MAX_HISTORY - 1));
    }

    #[test]
    fn step_older_clamps_at_oldest() {
        let mut store = filled(2);
        assert_eq!(store.step_older().unwrap().as_bytes(), b"c1");
        assert_eq!(store.step_older().unwrap().as_bytes(), b"c0");
        assert_eq!(store.step_older().unwrap().as_bytes(), b"c0");
        assert_eq!(store.cursor(), Some(0));
    }

    #[test]
    fn empty_store_has_no_cursor() {
        let mut store = HistoryStore::new();
        assert!(store.is_empty());
        assert!(store.step_older().is_none());
        assert!(store.step_newer().is_none());
        assert_eq!(
            store.entry_at(0).err(),
            Some(ConsoleError::InvalidIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn inspect_command_skipped() {
        let mut store = HistoryStore::new();
        assert!(!store.record(b"history"));
        assert!(!store.record(b"history 3"));
        assert!(store.is_empty());
        assert_eq!(store.total_recorded(), 0);

        // Only the command word counts.
        assert!(store.record(b"historyx"));
        assert!(store.record(b"echo history"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn long_lines_truncated() {
        let mut store = HistoryStore::new();
        store.record(&[b'y'; INPUT_BUF_SIZE + 10]);
        let entry = store.entry_at(0).unwrap();
        assert_eq!(entry.len(), MAX_ENTRY_LEN);
        assert_eq!(entry.padded()[MAX_ENTRY_LEN], 0);
    }

    #[test]
    fn shorter_entry_overwrites_padding() {
        let mut store = filled(MAX_HISTORY);
        store.record(b"z");
        let newest = store.entry_at(MAX_HISTORY - 1).unwrap();
        assert_eq!(newest.as_bytes(), b"z");
        assert!(newest.padded()[1..].iter().all(|&b| b == 0));
    }
}
