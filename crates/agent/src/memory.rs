//! Short-term query memory. A bounded, insertion-ordered ring of recent
//! user questions, used only as extra context text.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of queries retained.
pub const DEFAULT_CAPACITY: usize = 10;

/// FIFO buffer of the most recent raw queries. Pushing past capacity evicts
/// the oldest entry. Operations never fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMemory {
    capacity: usize,
    entries: VecDeque<String>,
}

impl QueryMemory {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push_back(text.into());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Current contents, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QueryMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
