// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=proscenium_responder --heading-base-level=0

//! Proscenium Responder: typed input events delivered capture → target → bubble.
//!
//! ## Overview
//!
//! This crate turns a target node into a responder sequence and runs
//! per-node handlers over it. It does not hit test. Pointer targets come
//! from the host (for a Proscenium stage, from color picking), and key
//! targets from the focus.
//!
//! ## Pieces
//!
//! - [`event`]: the [`Event`](event::Event) enum, its kinds, and the
//!   [`Signal`](event::Signal) channels handlers connect to.
//! - [`handlers`]: per-node handler lists with general-then-specific emission.
//! - [`router`]: builds capture → target → bubble sequences. Pointer routes
//!   skip non-reactive ancestors; key routes keep every ancestor; a pointer
//!   grab overrides the picked target.
//! - [`dispatcher`]: walks a sequence and stops at the first handled
//!   emission.
//! - [`hover`]: enter/leave crossings as the node under the pointer changes.
//! - [`adapters`]: end-to-end delivery for a Proscenium stage.
//!
//! ## Short-circuiting
//!
//! A handler that returns `true` ends delivery. Handlers later on the same
//! list, and every node later in the sequence, are skipped:
//!
//! ```rust
//! use proscenium_responder::dispatcher;
//! use proscenium_responder::event::{ButtonEvent, Event, Signal};
//! use proscenium_responder::handlers::Handlers;
//! use proscenium_responder::router::Router;
//! use proscenium_responder::types::ParentLookup;
//!
//! struct Chain;
//! impl ParentLookup<u32> for Chain {
//!     fn parent_of(&self, node: &u32) -> Option<u32> {
//!         (*node > 1).then(|| node - 1)
//!     }
//! }
//!
//! let mut handlers = Handlers::new();
//! handlers.connect(2, Signal::ButtonPress, |_, _| true);
//! handlers.connect(1, Signal::ButtonPress, |_, _| panic!("never reached"));
//!
//! let seq = Router::new().route_pointer(&Chain, 3);
//! let press = Event::ButtonPress(ButtonEvent::default());
//! assert!(dispatcher::deliver(&seq, &mut handlers, &press));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod adapters;
pub mod dispatcher;
pub mod event;
pub mod handlers;
pub mod hover;
pub mod router;
pub mod types;
