// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State shared by every component attached to one container.

use kurbo::{Insets, Point};

use crate::container::ScrollContainer;
use crate::ledger::InsetLedger;
use crate::observe::{Changes, ObservationToken, Observations};
use crate::scheduler::Scheduler;
use crate::scroll_lock::ScrollLock;
use crate::slots::{ComponentId, ControlId};

/// Deferred work addressed to a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    /// Tell the control's observers that a pull activated it.
    NotifyDidActivate(ControlId),
}

/// The container plus everything attached components share about it.
///
/// All writes that components make to the container go through here so that the
/// scroll lock sees every offset change and observers are notified.
#[derive(Debug)]
pub(crate) struct HostContext<C> {
    pub(crate) container: C,
    pub(crate) ledger: InsetLedger<ComponentId>,
    pub(crate) lock: ScrollLock,
    pub(crate) observations: Observations,
    pub(crate) scheduler: Scheduler<Task>,
    pub(crate) now_ms: u64,
}

impl<C: ScrollContainer> HostContext<C> {
    pub(crate) fn new(container: C) -> Self {
        let user = container.content_inset();
        Self {
            container,
            ledger: InsetLedger::new(user),
            lock: ScrollLock::new(),
            observations: Observations::default(),
            scheduler: Scheduler::default(),
            now_ms: 0,
        }
    }

    pub(crate) fn observe(&mut self, observer: ComponentId, mask: Changes) -> ObservationToken {
        self.observations.observe(observer, mask)
    }

    pub(crate) fn invalidate(&mut self, token: ObservationToken) {
        self.observations.invalidate(token);
    }

    pub(crate) fn schedule_after(&mut self, delay_ms: u64, task: Task) {
        let due = self.now_ms.saturating_add(delay_ms);
        self.scheduler.schedule(due, task);
    }

    /// Moves the viewport, subject to the scroll lock.
    pub(crate) fn set_offset(&mut self, offset: Point) {
        let old = self.container.content_offset();
        self.container.set_content_offset(offset);
        self.offset_did_change(old);
    }

    /// Reports that the offset may have moved away from `old`.
    ///
    /// While locked, the change is reverted once; the revert is itself observed
    /// and recognized by the lock, which ends the loop.
    pub(crate) fn offset_did_change(&mut self, mut old: Point) {
        loop {
            let new = self.container.content_offset();
            if new == old {
                return;
            }
            self.observations.emit(Changes::OFFSET);
            let Some(revert) = self.lock.observe(old, new) else {
                return;
            };
            tracing::trace!(?new, ?revert, "scroll lock reverted offset change");
            self.container.set_content_offset(revert);
            old = new;
        }
    }

    /// Writes the raw container inset, following any offset side effect.
    pub(crate) fn write_raw_inset(&mut self, inset: Insets) {
        if self.container.content_inset() == inset {
            return;
        }
        let before = self.container.content_offset();
        self.container.set_content_inset(inset);
        self.observations.emit(Changes::INSET);
        self.offset_did_change(before);
    }

    /// Applies `user + local` from the ledger to the container.
    pub(crate) fn recompose(&mut self) {
        let effective = self.ledger.effective_inset();
        self.write_raw_inset(effective);
    }
}
