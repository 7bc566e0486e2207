// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node handler lists.
//!
//! Handlers are registered per `(node, signal)` and run in connection order.
//! A handler returns `true` when it handled the event; the first `true`
//! skips the rest of that emission.
//!
//! ```rust
//! use proscenium_responder::event::{ButtonEvent, Event, Signal};
//! use proscenium_responder::handlers::Handlers;
//!
//! let mut handlers: Handlers<u32> = Handlers::new();
//! handlers.connect(1, Signal::Event, |_, _| false);
//! let id = handlers.connect(1, Signal::ButtonPress, |_, _| true);
//!
//! let press = Event::ButtonPress(ButtonEvent::default());
//! assert!(handlers.emit(1, &press, false));
//! assert!(!handlers.emit(1, &press, true));
//!
//! handlers.disconnect(id);
//! assert!(!handlers.emit(1, &press, false));
//! ```

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::event::{Event, Signal};

/// A boxed event handler. It receives the node it is connected to.
pub type Handler<K> = Box<dyn FnMut(K, &Event) -> bool>;

/// Identifies one connection, for [`Handlers::disconnect`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Handler lists for every node and channel.
pub struct Handlers<K> {
    next_id: u64,
    lists: HashMap<(K, Signal), SmallVec<[(HandlerId, Handler<K>); 2]>>,
}

impl<K> fmt::Debug for Handlers<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("channels", &self.lists.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> Default for Handlers<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> Handlers<K> {
    /// No handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            lists: HashMap::new(),
        }
    }

    /// Append `handler` to `node`'s `signal` list.
    pub fn connect(
        &mut self,
        node: K,
        signal: Signal,
        handler: impl FnMut(K, &Event) -> bool + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.lists
            .entry((node, signal))
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove one connection. Returns `false` if it was already gone.
    pub fn disconnect(&mut self, id: HandlerId) -> bool {
        let mut found = false;
        self.lists.retain(|_, list| {
            if let Some(pos) = list.iter().position(|(h, _)| *h == id) {
                list.remove(pos);
                found = true;
            }
            !list.is_empty()
        });
        found
    }

    /// Remove every handler connected to `node`, on every channel.
    pub fn disconnect_all(&mut self, node: K) {
        self.lists.retain(|(n, _), _| *n != node);
    }

    /// Number of handlers on `node`'s `signal` list.
    #[must_use]
    pub fn count(&self, node: K, signal: Signal) -> usize {
        self.lists.get(&(node, signal)).map_or(0, SmallVec::len)
    }

    /// Emit `event` on `node`.
    ///
    /// In the capture phase only [`Signal::Captured`] runs. Otherwise the
    /// general [`Signal::Event`] list runs first and, if it did not handle
    /// the event, the list for the event's own channel.
    pub fn emit(&mut self, node: K, event: &Event, capture: bool) -> bool {
        if capture {
            return self.run(node, Signal::Captured, event);
        }
        if self.run(node, Signal::Event, event) {
            return true;
        }
        event
            .kind()
            .signal()
            .is_some_and(|signal| self.run(node, signal, event))
    }

    fn run(&mut self, node: K, signal: Signal, event: &Event) -> bool {
        let Some(list) = self.lists.get_mut(&(node, signal)) else {
            return false;
        };
        // `any` stops at the first handler that returns true.
        list.iter_mut().any(|(_, h)| h(node, event))
    }
}
