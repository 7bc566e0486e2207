// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Router: turns a target into a capture → target → bubble sequence.
//!
//! ## Pointer routing
//!
//! The target is whatever the host picked under the pointer, unless a grab
//! is active, in which case the grabbing node wins. Ancestors that are not
//! reactive are left out of the sequence; the root always stays in.
//!
//! ## Key routing
//!
//! Key events go to the focused node. Every ancestor takes part, reactive
//! or not.
//!
//! The router holds only the grab and focus. Tree structure comes from a
//! [`ParentLookup`] passed to each call, so the tree can change between
//! events.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::types::{Dispatch, ParentLookup, Phase};

/// Longest path the router walks before giving up on a parent chain.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Deterministic responder chain router.
#[derive(Clone, Debug)]
pub struct Router<K> {
    grab: Option<K>,
    focus: Option<K>,
    max_depth: usize,
}

impl<K: Copy + Eq> Default for Router<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> Router<K> {
    /// A router with no grab and no focus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grab: None,
            focus: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound the parent walk. Longer chains are cut with an error log.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
    }

    /// Route all pointer events to `node` until released with `None`.
    pub fn capture(&mut self, node: Option<K>) {
        self.grab = node;
    }

    /// The node holding the pointer grab.
    #[must_use]
    pub fn captured(&self) -> Option<K> {
        self.grab
    }

    /// Set the node that receives key events.
    pub fn set_focus(&mut self, node: Option<K>) {
        self.focus = node;
    }

    /// The node receiving key events.
    #[must_use]
    pub fn focus(&self) -> Option<K> {
        self.focus
    }

    /// Sequence for a pointer event whose picked target is `picked`.
    ///
    /// An active grab overrides `picked`.
    pub fn route_pointer(&self, lookup: &impl ParentLookup<K>, picked: K) -> Vec<Dispatch<K>> {
        self.pointer_path(lookup, self.grab.unwrap_or(picked))
    }

    /// Sequence for a pointer event delivered to `target` directly.
    ///
    /// Ignores the grab. The target itself is always included.
    pub fn pointer_path(&self, lookup: &impl ParentLookup<K>, target: K) -> Vec<Dispatch<K>> {
        let path = self.reconstruct_path(lookup, target, true);
        emit_path(&path)
    }

    /// Sequence for a key event, or empty when nothing has focus.
    pub fn route_key(&self, lookup: &impl ParentLookup<K>) -> Vec<Dispatch<K>> {
        let Some(target) = self.focus else {
            return Vec::new();
        };
        let path = self.reconstruct_path(lookup, target, false);
        emit_path(&path)
    }

    fn reconstruct_path(
        &self,
        lookup: &impl ParentLookup<K>,
        target: K,
        reactive_only: bool,
    ) -> SmallVec<[K; 16]> {
        let mut out: SmallVec<[K; 16]> = SmallVec::new();
        out.push(target);
        let mut cur = target;
        let mut walked = 1;
        while let Some(parent) = lookup.parent_of(&cur) {
            if walked == self.max_depth {
                log::error!("parent chain longer than {} nodes; truncating", self.max_depth);
                break;
            }
            walked += 1;
            let is_root = lookup.parent_of(&parent).is_none();
            if !reactive_only || is_root || lookup.is_reactive(&parent) {
                out.push(parent);
            }
            cur = parent;
        }
        out.reverse();
        out
    }
}

fn emit_path<K: Copy>(path: &[K]) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(ancestors.len() * 2 + 1);
    out.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
    out.push(Dispatch::target(target));
    out.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    debug_assert!(out.iter().filter(|d| d.phase == Phase::Target).count() == 1);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoParent;

    /// 1 ← 2 ← 3 ← 4; node 3 is not reactive.
    struct Chain;
    impl ParentLookup<u32> for Chain {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            (2..=4).contains(node).then(|| node - 1)
        }
        fn is_reactive(&self, node: &u32) -> bool {
            *node != 3
        }
    }

    fn phases(seq: &[Dispatch<u32>]) -> Vec<(Phase, u32)> {
        seq.iter().map(|d| (d.phase, d.node)).collect()
    }

    #[test]
    fn pointer_route_skips_non_reactive_ancestors() {
        let router = Router::new();
        assert_eq!(
            phases(&router.route_pointer(&Chain, 4)),
            [
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 4),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn root_is_kept_even_when_not_reactive() {
        struct NothingReactive;
        impl ParentLookup<u32> for NothingReactive {
            fn parent_of(&self, node: &u32) -> Option<u32> {
                (*node == 2).then_some(1)
            }
            fn is_reactive(&self, _: &u32) -> bool {
                false
            }
        }
        let router = Router::new();
        assert_eq!(
            phases(&router.route_pointer(&NothingReactive, 2)),
            [(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]
        );
    }

    #[test]
    fn key_route_keeps_every_ancestor() {
        let mut router = Router::new();
        assert!(router.route_key(&Chain).is_empty());
        router.set_focus(Some(4));
        let seq = router.route_key(&Chain);
        assert_eq!(seq.len(), 7);
        assert_eq!(seq[2], Dispatch::capture(3));
        assert_eq!(seq[3], Dispatch::target(4));
    }

    #[test]
    fn grab_overrides_the_picked_node() {
        let mut router = Router::new();
        router.capture(Some(2));
        let seq = router.route_pointer(&Chain, 4);
        assert_eq!(
            phases(&seq),
            [(Phase::Capture, 1), (Phase::Target, 2), (Phase::Bubble, 1)]
        );
        router.capture(None);
        assert_eq!(router.route_pointer(&Chain, 4)[2], Dispatch::target(4));
    }

    #[test]
    fn flat_lookup_yields_a_lone_target() {
        let router = Router::new();
        assert_eq!(router.route_pointer(&NoParent, 9_u32), [Dispatch::target(9)]);
    }

    #[test]
    fn cyclic_chains_are_cut() {
        struct Loop;
        impl ParentLookup<u32> for Loop {
            fn parent_of(&self, node: &u32) -> Option<u32> {
                Some(node ^ 1)
            }
        }
        let mut router = Router::new();
        router.set_max_depth(8);
        router.set_focus(Some(0));
        assert_eq!(router.route_key(&Loop).len(), 15);
    }
}
