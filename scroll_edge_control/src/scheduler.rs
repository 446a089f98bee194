// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-delay deferred work on the host's clock.

use alloc::vec::Vec;

/// A single-threaded queue of tasks due at a given time.
///
/// Nothing runs on its own: the host pops due tasks from its `tick`. Tasks due at
/// the same time come out in scheduling order.
#[derive(Debug)]
pub(crate) struct Scheduler<T> {
    /// Sorted by `(due_ms, seq)`.
    queue: Vec<Scheduled<T>>,
    seq: u64,
}

#[derive(Debug)]
struct Scheduled<T> {
    due_ms: u64,
    seq: u64,
    task: T,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            queue: Vec::new(),
            seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub(crate) fn schedule(&mut self, due_ms: u64, task: T) {
        self.seq += 1;
        let seq = self.seq;
        let at = self
            .queue
            .partition_point(|s| (s.due_ms, s.seq) <= (due_ms, seq));
        self.queue.insert(at, Scheduled { due_ms, seq, task });
    }

    /// Removes and returns the earliest task due at or before `now_ms`.
    pub(crate) fn pop_due(&mut self, now_ms: u64) -> Option<T> {
        if self.queue.first()?.due_ms > now_ms {
            return None;
        }
        Some(self.queue.remove(0).task)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
