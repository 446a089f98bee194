// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composition of the application's inset with control contributions.

use kurbo::Insets;
use smallvec::SmallVec;

use crate::edge::{Edge, add_insets};

/// Per-container record of who contributed which part of the content inset.
///
/// The ledger keeps three quantities:
/// - the *user* inset, which is what the application set,
/// - the *local* inset, the per-edge sum of every contributor's share,
/// - the *effective* inset, `user + local`, which is what the container applies.
///
/// Contributors are identified by a small copyable key `K` and contribute at most
/// one scalar per edge. Setting a contribution never touches other contributors or
/// the user inset, so several controls sharing one container cannot overwrite each
/// other.
///
/// ```rust
/// use kurbo::Insets;
/// use scroll_edge_control::{Edge, InsetLedger};
///
/// let mut ledger: InsetLedger<u32> = InsetLedger::new(Insets::new(0.0, 10.0, 0.0, 0.0));
/// ledger.set_local_inset(1, Edge::Top, 50.0);
/// ledger.set_local_inset(2, Edge::Bottom, 50.0);
/// assert_eq!(ledger.effective_inset(), Insets::new(0.0, 60.0, 0.0, 50.0));
///
/// // The application only ever changes its own part.
/// ledger.set_user_inset(Insets::ZERO);
/// assert_eq!(ledger.effective_inset(), Insets::new(0.0, 50.0, 0.0, 50.0));
/// ```
#[derive(Clone, Debug)]
pub struct InsetLedger<K> {
    user: Insets,
    contributions: SmallVec<[Contribution<K>; 4]>,
}

#[derive(Clone, Copy, Debug)]
struct Contribution<K> {
    key: K,
    edge: Edge,
    value: f64,
}

impl<K: Copy + Eq> InsetLedger<K> {
    /// Creates a ledger whose user inset is `user` and with no contributions.
    #[must_use]
    pub fn new(user: Insets) -> Self {
        Self {
            user,
            contributions: SmallVec::new(),
        }
    }

    /// The inset the application set.
    #[must_use]
    pub const fn user_inset(&self) -> Insets {
        self.user
    }

    /// Replaces the application's inset. Contributions are left untouched.
    pub fn set_user_inset(&mut self, inset: Insets) {
        self.user = inset;
    }

    /// Per-edge sum of all contributions.
    #[must_use]
    pub fn local_inset(&self) -> Insets {
        let mut local = Insets::ZERO;
        for c in &self.contributions {
            *c.edge.inset_mut(&mut local) += c.value;
        }
        local
    }

    /// Sum of all contributions on one edge.
    #[must_use]
    pub fn local_inset_on(&self, edge: Edge) -> f64 {
        self.contributions
            .iter()
            .filter(|c| c.edge == edge)
            .map(|c| c.value)
            .sum()
    }

    /// Contribution of `key` on `edge`, or `0` if it has none.
    #[must_use]
    pub fn local_inset_for(&self, key: K, edge: Edge) -> f64 {
        self.position(key, edge)
            .map_or(0.0, |i| self.contributions[i].value)
    }

    /// Sets the contribution of `key` on `edge`. A value of zero removes it.
    pub fn set_local_inset(&mut self, key: K, edge: Edge, value: f64) {
        match (self.position(key, edge), value == 0.0) {
            (Some(i), true) => {
                self.contributions.remove(i);
            }
            (Some(i), false) => self.contributions[i].value = value,
            (None, true) => {}
            (None, false) => self.contributions.push(Contribution { key, edge, value }),
        }
    }

    /// Drops every contribution made by `key`.
    pub fn remove_contributor(&mut self, key: K) {
        self.contributions.retain(|c| c.key != key);
    }

    /// `user + local`: the inset the container should apply.
    #[must_use]
    pub fn effective_inset(&self) -> Insets {
        add_insets(self.user, self.local_inset())
    }

    fn position(&self, key: K, edge: Edge) -> Option<usize> {
        self.contributions
            .iter()
            .position(|c| c.key == key && c.edge == edge)
    }
}

impl<K: Copy + Eq> Default for InsetLedger<K> {
    fn default() -> Self {
        Self::new(Insets::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::InsetLedger;
    use crate::Edge;
    use crate::edge::add_insets;
    use kurbo::Insets;
    use proptest::prelude::*;

    #[test]
    fn contributions_compose_per_edge() {
        let mut ledger: InsetLedger<u8> = InsetLedger::default();
        ledger.set_local_inset(1, Edge::Top, 50.0);
        ledger.set_local_inset(2, Edge::Top, 44.0);
        ledger.set_local_inset(3, Edge::Right, 50.0);
        assert_eq!(ledger.local_inset_on(Edge::Top), 94.0);
        assert_eq!(ledger.local_inset(), Insets::new(0.0, 94.0, 50.0, 0.0));
        assert_eq!(ledger.local_inset_for(2, Edge::Top), 44.0);
        assert_eq!(ledger.local_inset_for(2, Edge::Bottom), 0.0);
    }

    #[test]
    fn zero_removes_and_remove_contributor_clears_all_edges() {
        let mut ledger: InsetLedger<u8> = InsetLedger::default();
        ledger.set_local_inset(1, Edge::Top, 50.0);
        ledger.set_local_inset(1, Edge::Left, 20.0);
        ledger.set_local_inset(2, Edge::Left, 5.0);

        ledger.set_local_inset(1, Edge::Top, 0.0);
        assert_eq!(ledger.local_inset_for(1, Edge::Top), 0.0);
        assert_eq!(ledger.local_inset(), Insets::new(25.0, 0.0, 0.0, 0.0));

        ledger.remove_contributor(1);
        assert_eq!(ledger.local_inset(), Insets::new(5.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn user_inset_is_independent() {
        let mut ledger: InsetLedger<u8> = InsetLedger::new(Insets::uniform(8.0));
        ledger.set_local_inset(7, Edge::Bottom, 50.0);
        assert_eq!(ledger.user_inset(), Insets::uniform(8.0));
        ledger.set_user_inset(Insets::ZERO);
        assert_eq!(ledger.local_inset_for(7, Edge::Bottom), 50.0);
        assert_eq!(ledger.effective_inset(), Insets::new(0.0, 0.0, 0.0, 50.0));
    }

    #[derive(Clone, Debug)]
    enum Op {
        User(Insets),
        Local(u8, Edge, f64),
        Remove(u8),
    }

    fn edge() -> impl Strategy<Value = Edge> {
        prop_oneof![
            Just(Edge::Top),
            Just(Edge::Bottom),
            Just(Edge::Left),
            Just(Edge::Right)
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0..100.0_f64, 0.0..100.0_f64, 0.0..100.0_f64, 0.0..100.0_f64)
                .prop_map(|(a, b, c, d)| Op::User(Insets::new(a, b, c, d))),
            (0_u8..4, edge(), 0.0..80.0_f64).prop_map(|(k, e, v)| Op::Local(k, e, v)),
            (0_u8..4).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn effective_is_always_user_plus_local(ops in proptest::collection::vec(op(), 0..64)) {
            let mut ledger: InsetLedger<u8> = InsetLedger::default();
            let mut user = Insets::ZERO;
            // Reference model: one slot per (key, edge).
            let mut model = [[0.0_f64; 4]; 4];
            for op in ops {
                match op {
                    Op::User(i) => {
                        ledger.set_user_inset(i);
                        user = i;
                    }
                    Op::Local(k, e, v) => {
                        ledger.set_local_inset(k, e, v);
                        let slot = Edge::ALL.iter().position(|x| *x == e).unwrap();
                        model[usize::from(k)][slot] = v;
                    }
                    Op::Remove(k) => {
                        ledger.remove_contributor(k);
                        model[usize::from(k)] = [0.0; 4];
                    }
                }
                let mut local = Insets::ZERO;
                for per_key in &model {
                    for (slot, v) in per_key.iter().enumerate() {
                        *Edge::ALL[slot].inset_mut(&mut local) += v;
                    }
                }
                prop_assert_eq!(ledger.user_inset(), user);
                let effective = ledger.effective_inset();
                let expected = add_insets(user, local);
                for e in Edge::ALL {
                    prop_assert!((e.inset_of(&effective) - e.inset_of(&expected)).abs() < 1e-9);
                }
            }
        }
    }
}
