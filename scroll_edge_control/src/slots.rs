// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational storage and the handles used to address attached components.

use alloc::vec::Vec;

/// Handle of an [`EdgeControl`](crate::EdgeControl) attached to a
/// [`ScrollHost`](crate::ScrollHost).
///
/// Handles are generational: once the control is removed, the handle never
/// resolves again, even if its slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ControlId(u32, u32);

/// Handle of a [`StickyHeader`](crate::StickyHeader) attached to a
/// [`ScrollHost`](crate::ScrollHost).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HeaderId(u32, u32);

/// Any component attached to a host. Used as the contributor key of the host's
/// [`InsetLedger`](crate::InsetLedger) and as the recipient of change notifications.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ComponentId {
    /// An edge control.
    Control(ControlId),
    /// A sticky header.
    Header(HeaderId),
}

impl From<ControlId> for ComponentId {
    fn from(id: ControlId) -> Self {
        Self::Control(id)
    }
}

impl From<HeaderId> for ComponentId {
    fn from(id: HeaderId) -> Self {
        Self::Header(id)
    }
}

pub(crate) trait SlotKey: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn idx(self) -> usize;
    fn generation(self) -> u32;
}

macro_rules! impl_slot_key {
    ($ty:ident) => {
        impl SlotKey for $ty {
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self(idx, generation)
            }

            fn idx(self) -> usize {
                self.0 as usize
            }

            fn generation(self) -> u32 {
                self.1
            }
        }
    };
}

impl_slot_key!(ControlId);
impl_slot_key!(HeaderId);

/// Slot vector with generation counters that persist across frees.
#[derive(Debug)]
pub(crate) struct Slots<T> {
    entries: Vec<Option<T>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }
}

impl<T> Slots<T> {
    pub(crate) fn insert<K: SlotKey>(&mut self, value: T) -> K {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(value);
            (idx, generation)
        } else {
            self.entries.push(Some(value));
            self.generations.push(1);
            (self.entries.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Handles use 32-bit indices."
        )]
        let idx = idx as u32;
        K::from_parts(idx, generation)
    }

    pub(crate) fn get<K: SlotKey>(&self, key: K) -> Option<&T> {
        if self.generations.get(key.idx()) != Some(&key.generation()) {
            return None;
        }
        self.entries.get(key.idx())?.as_ref()
    }

    pub(crate) fn get_mut<K: SlotKey>(&mut self, key: K) -> Option<&mut T> {
        if self.generations.get(key.idx()) != Some(&key.generation()) {
            return None;
        }
        self.entries.get_mut(key.idx())?.as_mut()
    }

    pub(crate) fn remove<K: SlotKey>(&mut self, key: K) -> Option<T> {
        if self.generations.get(key.idx()) != Some(&key.generation()) {
            return None;
        }
        let value = self.entries.get_mut(key.idx())?.take()?;
        self.free_list.push(key.idx());
        Some(value)
    }

    /// Keys of all live entries, in slot order.
    pub(crate) fn keys<K: SlotKey>(&self) -> Vec<K> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(idx, _)| {
                let generation = self.generations[idx];
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Handles use 32-bit indices."
                )]
                let idx = idx as u32;
                K::from_parts(idx, generation)
            })
            .collect()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlId, Slots};

    #[test]
    fn stale_handles_do_not_resolve() {
        let mut slots: Slots<&str> = Slots::default();
        let a: ControlId = slots.insert("a");
        assert_eq!(slots.get(a), Some(&"a"));
        assert_eq!(slots.remove(a), Some("a"));
        assert_eq!(slots.get(a), None);

        // Slot is reused with a new generation.
        let b: ControlId = slots.insert("b");
        assert_ne!(a, b);
        assert_eq!(slots.get(a), None);
        assert_eq!(slots.get(b), Some(&"b"));
        assert_eq!(slots.remove(a), None);
        assert_eq!(slots.keys::<ControlId>(), [b]);
    }
}
