// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walk a responder sequence and run handlers.
//!
//! [`run`] is the generic walker: it calls a closure for every entry in order
//! and stops as soon as the closure returns [`Outcome::Stop`]. [`deliver`]
//! builds event delivery on top of it:
//!
//! - capture entries emit on the node's captured handlers;
//! - the target entry emits captured handlers, then the general and
//!   type-specific ones;
//! - bubble entries emit the general and type-specific handlers.
//!
//! The first emission that reports the event handled ends the whole
//! delivery. Ancestors further along the sequence are not notified.
//!
//! ```rust
//! use proscenium_responder::dispatcher;
//! use proscenium_responder::event::{ButtonEvent, Event, Signal};
//! use proscenium_responder::handlers::Handlers;
//! use proscenium_responder::types::Dispatch;
//!
//! let seq = [
//!     Dispatch::capture(1_u32),
//!     Dispatch::target(2),
//!     Dispatch::bubble(1),
//! ];
//! let mut handlers = Handlers::new();
//! handlers.connect(2, Signal::ButtonPress, |_, _| true);
//!
//! let press = Event::ButtonPress(ButtonEvent::default());
//! assert!(dispatcher::deliver(&seq, &mut handlers, &press));
//! ```

use core::hash::Hash;

use crate::event::Event;
use crate::handlers::Handlers;
use crate::types::{Dispatch, Outcome, Phase};

/// Run `handler` over `seq` in order.
///
/// `event` is a payload threaded through every call; the caller owns its
/// shape. Returns the entry at which a handler returned [`Outcome::Stop`],
/// or `None` if the whole sequence was visited.
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    seq.iter()
        .find(|d| handler(d, event) == Outcome::Stop)
}

/// Deliver `event` along `seq`, emitting on `handlers`.
///
/// Returns `true` if some handler handled the event. The caller decides
/// what an unhandled event falls back to.
pub fn deliver<K: Copy + Eq + Hash>(
    seq: &[Dispatch<K>],
    handlers: &mut Handlers<K>,
    event: &Event,
) -> bool {
    let stopped = run(seq, handlers, |d, h| {
        let handled = match d.phase {
            Phase::Capture => h.emit(d.node, event, true),
            Phase::Target => h.emit(d.node, event, true) || h.emit(d.node, event, false),
            Phase::Bubble => h.emit(d.node, event, false),
        };
        if handled {
            Outcome::Stop
        } else {
            Outcome::Continue
        }
    });
    if let Some(d) = stopped {
        log::trace!("{:?} handled at {:?}", event.kind(), d.phase);
    }
    stopped.is_some()
}
