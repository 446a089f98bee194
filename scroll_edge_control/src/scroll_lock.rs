// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporary suppression of content-offset jumps.

use kurbo::Point;

/// Reverts offset changes observed while locked.
///
/// The owner feeds every observed offset change through [`ScrollLock::observe`]
/// and writes back the value it returns. While locked, each change it did not cause
/// is reverted once (there is no continuous clamping). The value overwritten by the
/// last reversion is remembered, so the change produced by writing the reversion
/// back is recognized and ignored instead of bouncing forever.
///
/// ```rust
/// use kurbo::Point;
/// use scroll_edge_control::ScrollLock;
///
/// let mut lock = ScrollLock::new();
/// let rest = Point::new(0.0, -80.0);
/// let jumped = Point::new(0.0, -30.0);
///
/// // Unlocked: nothing to revert.
/// assert_eq!(lock.observe(rest, jumped), None);
///
/// lock.lock();
/// assert_eq!(lock.observe(rest, jumped), Some(rest));
/// // Writing `rest` back is itself observed as `jumped -> rest` and ignored.
/// assert_eq!(lock.observe(jumped, rest), None);
/// lock.unlock();
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    locked: bool,
    previous: Option<Point>,
}

impl ScrollLock {
    /// Creates an unlocked controller.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: false,
            previous: None,
        }
    }

    /// Starts reverting observed offset changes.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Stops reverting offset changes.
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Returns `true` while locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Reports an offset change from `old` to `new`.
    ///
    /// Returns the offset to write back, if the change must be reverted.
    pub fn observe(&mut self, old: Point, new: Point) -> Option<Point> {
        if !self.locked || new == old || Some(old) == self.previous {
            return None;
        }
        self.previous = Some(new);
        Some(old)
    }
}
