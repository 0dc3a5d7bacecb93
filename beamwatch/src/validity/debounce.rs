//! Debounce window over validity samples.

use std::collections::VecDeque;

/// Fixed-capacity sliding window of validity samples.
///
/// The window confirms only once it is completely full of valid samples:
/// a run of `capacity` consecutive `true` observations. Any invalid sample
/// clears the whole window, so confirmation drops on the very next tick
/// after a glitch and takes a full fresh run to return.
///
/// Once full, the window stays full (append-and-drop-oldest) for as long as
/// every subsequent sample is valid, so the confirmed signal is level, not a
/// single edge.
///
/// The window is in-memory only; a controller restart starts from empty.
#[derive(Debug)]
pub struct DebounceWindow {
    samples: VecDeque<bool>,
    capacity: usize,
}

impl DebounceWindow {
    /// Create an empty window.
    ///
    /// A capacity of zero is rounded up to one; an empty window can never
    /// represent "confirmed".
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one validity sample and return the confirmed decision.
    ///
    /// Invalid clears the window and returns `false` immediately. Valid
    /// appends (dropping the oldest sample once at capacity) and returns
    /// `true` iff the window is now full.
    pub fn observe(&mut self, valid: bool) -> bool {
        if !valid {
            self.samples.clear();
            return false;
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(true);
        self.is_confirmed()
    }

    /// Whether the window currently holds a full run of valid samples.
    pub fn is_confirmed(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
