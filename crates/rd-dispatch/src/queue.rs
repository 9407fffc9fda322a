//! `PendingQueue` — tasks admitted to a robot but not yet dispatched.
//!
//! Entries are a queue-local projection of a task: its urgency (the sort key)
//! and its index in the robot's `TaskStream`.  An entry is pushed exactly once
//! when the clock passes the task's arrival time and removed exactly once when
//! it is committed to a batch.

use std::cmp::Ordering;

/// One pending task.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PendingEntry {
    pub urgency: f64,
    /// Index into the owning robot's `TaskStream`.
    pub task:    usize,
}

impl PendingEntry {
    #[inline]
    pub fn new(urgency: f64, task: usize) -> Self {
        Self { urgency, task }
    }
}

/// Total dispatch order: urgency descending, then stream index ascending.
///
/// Stream index follows arrival order, so among equally urgent tasks the
/// oldest goes first.
#[inline]
pub fn dispatch_order(a: &PendingEntry, b: &PendingEntry) -> Ordering {
    b.urgency
        .total_cmp(&a.urgency)
        .then_with(|| a.task.cmp(&b.task))
}

// ── Batch ─────────────────────────────────────────────────────────────────────

/// Entries committed to one routing pass, highest urgency first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    pub entries: Vec<PendingEntry>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PendingEntry> {
        self.entries.iter()
    }

    pub fn total_urgency(&self) -> f64 {
        self.entries.iter().map(|e| e.urgency).sum()
    }
}

// ── PendingQueue ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PendingQueue {
    entries: Vec<PendingEntry>,
    /// `true` while `entries` is known to be in dispatch order.
    sorted:  bool,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self { entries: Vec::new(), sorted: true }
    }

    pub fn admit(&mut self, entry: PendingEntry) {
        self.entries.push(entry);
        self.sorted = self.entries.len() <= 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current entries, in whatever order they are stored.
    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    pub fn contains(&self, task: usize) -> bool {
        self.entries.iter().any(|e| e.task == task)
    }

    pub fn max_urgency(&self) -> Option<f64> {
        self.entries.iter().map(|e| e.urgency).max_by(f64::total_cmp)
    }

    /// Sort into dispatch order and return the sorted view.
    pub fn sort_by_urgency(&mut self) -> &[PendingEntry] {
        if !self.sorted {
            self.entries.sort_by(dispatch_order);
            self.sorted = true;
        }
        &self.entries
    }

    /// Remove the first `n` entries (after sorting) as a batch.
    ///
    /// `n` larger than the queue takes everything.
    pub fn take_front(&mut self, n: usize) -> Batch {
        self.sort_by_urgency();
        let n = n.min(self.entries.len());
        Batch { entries: self.entries.drain(..n).collect() }
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}
