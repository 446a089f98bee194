// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change observation: subscriptions, tokens, and the pending notification queue.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::slots::ComponentId;

bitflags::bitflags! {
    /// Container properties whose changes components can observe.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Changes: u8 {
        /// Content offset moved.
        const OFFSET       = 0b0000_0001;
        /// Raw content inset changed.
        const INSET        = 0b0000_0010;
        /// Safe-area insets changed.
        const SAFE_AREA    = 0b0000_0100;
        /// Content size changed.
        const CONTENT_SIZE = 0b0000_1000;
        /// Viewport size changed.
        const BOUNDS       = 0b0001_0000;
        /// Tracking (dragging) started or ended.
        const TRACKING     = 0b0010_0000;
    }
}

/// A live subscription. The component that registered it owns it and must hand it
/// back to be invalidated.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ObservationToken(u64);

#[derive(Clone, Copy, Debug)]
struct Subscription {
    token: u64,
    observer: ComponentId,
    mask: Changes,
}

/// A change addressed to one observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Notification {
    pub(crate) observer: ComponentId,
    pub(crate) changes: Changes,
}

/// Subscription registry plus the FIFO of notifications awaiting delivery.
///
/// Recipients are resolved when a change is emitted, so a component that stopped
/// observing before a write never hears about it, even if delivery happens later.
#[derive(Debug, Default)]
pub(crate) struct Observations {
    subscriptions: Vec<Subscription>,
    next_token: u64,
    pending: VecDeque<Notification>,
}

impl Observations {
    pub(crate) fn observe(&mut self, observer: ComponentId, mask: Changes) -> ObservationToken {
        self.next_token += 1;
        let token = self.next_token;
        self.subscriptions.push(Subscription {
            token,
            observer,
            mask,
        });
        ObservationToken(token)
    }

    pub(crate) fn invalidate(&mut self, token: ObservationToken) {
        self.subscriptions.retain(|s| s.token != token.0);
    }

    pub(crate) fn emit(&mut self, changes: Changes) {
        if changes.is_empty() {
            return;
        }
        let recipients: SmallVec<[Notification; 4]> = self
            .subscriptions
            .iter()
            .filter(|s| s.mask.intersects(changes))
            .map(|s| Notification {
                observer: s.observer,
                changes: s.mask & changes,
            })
            .collect();
        self.pending.extend(recipients);
    }

    pub(crate) fn next_pending(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub(crate) fn clear_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
