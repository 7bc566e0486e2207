// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/leave tracking for the node under the pointer.
//!
//! [`HoverState`] remembers the last node the pointer was over. Feeding it
//! the newly picked node yields the crossings to deliver: a leave for the
//! old node first, then an enter for the new one.
//!
//! ```rust
//! use proscenium_responder::hover::{HoverEvent, HoverState};
//!
//! let mut hover = HoverState::new();
//! assert_eq!(hover.update(Some(1)).as_slice(), &[HoverEvent::Enter(1)]);
//! assert!(hover.update(Some(1)).is_empty());
//! assert_eq!(
//!     hover.update(Some(2)).as_slice(),
//!     &[HoverEvent::Leave(1), HoverEvent::Enter(2)]
//! );
//! ```

use smallvec::SmallVec;

/// One crossing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HoverEvent<K> {
    /// The pointer entered this node.
    Enter(K),
    /// The pointer left this node.
    Leave(K),
}

/// The node currently under the pointer.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    current: Option<K>,
}

impl<K: Copy + Eq> Default for HoverState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Nothing hovered.
    #[must_use]
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The hovered node, if any.
    #[must_use]
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Move the pointer over `next` and report the crossings.
    pub fn update(&mut self, next: Option<K>) -> SmallVec<[HoverEvent<K>; 2]> {
        let mut out = SmallVec::new();
        if self.current == next {
            return out;
        }
        if let Some(old) = self.current {
            out.push(HoverEvent::Leave(old));
        }
        if let Some(new) = next {
            out.push(HoverEvent::Enter(new));
        }
        self.current = next;
        out
    }

    /// Forget the hovered node without reporting a leave.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaving_everything_reports_only_leave() {
        let mut h = HoverState::new();
        h.update(Some(3_u8));
        assert_eq!(h.update(None).as_slice(), &[HoverEvent::Leave(3)]);
        assert_eq!(h.current(), None);
        assert!(h.update(None).is_empty());
    }

    #[test]
    fn clear_is_silent() {
        let mut h = HoverState::new();
        h.update(Some(1_u8));
        h.clear();
        assert_eq!(h.update(Some(1)).as_slice(), &[HoverEvent::Enter(1)]);
    }
}
