//! Console scrollback: plain text coalesced into logical lines.
//!
//! Text is consumed one character at a time into a pending line. The pending line is
//! flushed on a newline, or once it grows past the configured line length (long lines are
//! split into partial lines). A flushed line identical to the newest entry bumps that
//! entry's repeat count instead of adding a new one. The entry list is capped; the oldest
//! entry is evicted first.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// One logical line, possibly observed several times in a row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConsoleEntry {
    /// Line text without its terminating newline.
    pub text: String,
    /// Consecutive arrivals of this exact text.
    pub repeat_count: u32,
}

impl ConsoleEntry {
    fn new(text: String) -> Self {
        Self {
            text,
            repeat_count: 1,
        }
    }

    /// Counter shown next to a collapsed entry; `None` until the line repeats.
    pub fn counter_label(&self) -> Option<String> {
        (self.repeat_count > 1).then(|| self.repeat_count.to_string())
    }
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.counter_label() {
            Some(count) => write!(f, "[{count}] {}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

/// Owned, versioned copy of the entry list.
///
/// `version` increases with every flush, so a renderer can skip redraws for a snapshot it
/// has already shown.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConsoleSnapshot {
    /// Bumped on every change to the entry list.
    pub version: u64,
    /// Oldest first.
    pub entries: Vec<ConsoleEntry>,
}

impl ConsoleSnapshot {
    /// Newest entry.
    pub fn last(&self) -> Option<&ConsoleEntry> {
        self.entries.last()
    }
}

/// Bounded, run-length collapsing console log.
#[derive(Debug, Clone)]
pub struct ConsoleAggregator {
    entries: VecDeque<ConsoleEntry>,
    pending: String,
    pending_len: usize,
    max_line_length: usize,
    max_entries: usize,
    version: u64,
}

impl ConsoleAggregator {
    /// Empty aggregator; both limits are clamped to at least 1.
    pub fn new(max_line_length: usize, max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: VecDeque::with_capacity(max_entries + 1),
            pending: String::new(),
            pending_len: 0,
            max_line_length,
            max_entries,
            version: 0,
        }
    }

    /// Feeds a chunk of text. Returns true if at least one line was flushed.
    pub fn feed(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.chars() {
            self.pending.push(ch);
            self.pending_len += 1;
            if ch == '\n' || self.pending_len > self.max_line_length {
                self.flush();
                changed = true;
            }
        }
        changed
    }

    fn flush(&mut self) {
        let mut line = std::mem::take(&mut self.pending);
        self.pending_len = 0;
        if line.ends_with('\n') {
            line.pop();
        }

        match self.entries.back_mut() {
            Some(last) if last.text == line => {
                last.repeat_count = last.repeat_count.saturating_add(1);
            }
            _ => {
                self.entries.push_back(ConsoleEntry::new(line));
                // Entries grow by at most one per flush.
                if self.entries.len() > self.max_entries {
                    self.entries.pop_front();
                }
            }
        }
        self.version += 1;
    }

    /// The partial line not yet flushed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> + '_ {
        self.entries.iter()
    }

    /// Newest entry.
    pub fn last(&self) -> Option<&ConsoleEntry> {
        self.entries.back()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entry has been flushed since the last clear.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry cap.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Current snapshot version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Owned copy of the entries.
    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            version: self.version,
            entries: self.entries.iter().cloned().collect(),
        }
    }

    /// Drops all entries and the pending line.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
        self.pending_len = 0;
        self.version += 1;
    }
}
