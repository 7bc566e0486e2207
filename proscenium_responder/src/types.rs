// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types shared by the router, the dispatcher and the adapters.

/// Propagation phase of one dispatch entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, ancestors only.
    Capture,
    /// The target itself.
    Target,
    /// Target → root, ancestors only.
    Bubble,
}

/// What a handler wants the dispatcher to do next.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep walking the sequence.
    Continue,
    /// Abort propagation immediately.
    Stop,
}

/// One step of a responder sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node visited by this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase entry.
    pub const fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target entry.
    pub const fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase entry.
    pub const fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Tree structure the router walks to build paths.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` at a root or for an unknown node.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Whether `node` takes part in pointer routing.
    ///
    /// Non-reactive nodes are left out of pointer paths but do not cut them:
    /// their ancestors are still visited.
    fn is_reactive(&self, node: &K) -> bool {
        let _ = node;
        true
    }
}

/// A lookup for flat sets of nodes: every node is a root and reactive.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoParent;

impl<K> ParentLookup<K> for NoParent {
    fn parent_of(&self, _: &K) -> Option<K> {
        None
    }
}
