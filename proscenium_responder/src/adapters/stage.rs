// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Proscenium Stage.
//!
//! ## Feature
//!
//! Enable with `stage_adapter`.
//!
//! ## Notes
//!
//! Pointer events are resolved with [`Stage::actor_at_pos`], so only mapped,
//! reactive actors can be targets; everything else falls through to the
//! toplevel. Motion also updates hover and delivers leave/enter crossings
//! before the motion itself. Key events go to [`Stage::key_focus`].

use proscenium_stage::{ActorId, Renderer, Stage};

use crate::dispatcher;
use crate::event::{CrossingEvent, Event};
use crate::handlers::Handlers;
use crate::hover::{HoverEvent, HoverState};
use crate::router::Router;
use crate::types::ParentLookup;

impl ParentLookup<ActorId> for Stage {
    fn parent_of(&self, node: &ActorId) -> Option<ActorId> {
        self.parent(*node)
    }

    fn is_reactive(&self, node: &ActorId) -> bool {
        Self::is_reactive(self, *node)
    }
}

/// Input state for one stage: routing, handler lists and hover.
#[derive(Debug, Default)]
pub struct StageInput {
    router: Router<ActorId>,
    handlers: Handlers<ActorId>,
    hover: HoverState<ActorId>,
}

impl StageInput {
    /// Empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab and focus controls.
    pub fn router_mut(&mut self) -> &mut Router<ActorId> {
        &mut self.router
    }

    /// Per-actor handler lists.
    pub fn handlers_mut(&mut self) -> &mut Handlers<ActorId> {
        &mut self.handlers
    }

    /// The actor the pointer was last over.
    #[must_use]
    pub fn hovered(&self) -> Option<ActorId> {
        self.hover.current()
    }

    /// Drop handlers, hover and grab state for an actor that is going away.
    pub fn forget(&mut self, actor: ActorId) {
        self.handlers.disconnect_all(actor);
        if self.hover.current() == Some(actor) {
            self.hover.clear();
        }
        if self.router.captured() == Some(actor) {
            self.router.capture(None);
        }
    }

    /// Pick, route and deliver a pointer event. Returns whether it was handled.
    pub fn deliver_pointer<R: Renderer + ?Sized>(
        &mut self,
        stage: &mut Stage,
        renderer: &mut R,
        event: &Event,
    ) -> bool {
        let Some((x, y)) = event.coords().filter(|_| event.kind().is_pointer()) else {
            log::warn!("deliver_pointer: {:?} is not a pointer event", event.kind());
            return false;
        };
        let picked = stage
            .actor_at_pos(renderer, x, y)
            .unwrap_or_else(|| stage.root());

        if let Event::Motion(m) = event {
            let crossing = CrossingEvent {
                time: m.time,
                x,
                y,
            };
            for change in self.hover.update(Some(picked)) {
                let (node, ev) = match change {
                    HoverEvent::Leave(node) => (node, Event::Leave(crossing)),
                    HoverEvent::Enter(node) => (node, Event::Enter(crossing)),
                };
                if !stage.is_alive(node) {
                    continue;
                }
                let seq = self.router.pointer_path(&*stage, node);
                dispatcher::deliver(&seq, &mut self.handlers, &ev);
            }
        }

        let seq = self.router.route_pointer(&*stage, picked);
        dispatcher::deliver(&seq, &mut self.handlers, event)
    }

    /// Route a key event to the focused actor and deliver it.
    pub fn deliver_key(&mut self, stage: &Stage, event: &Event) -> bool {
        if !event.kind().is_key() {
            log::warn!("deliver_key: {:?} is not a key event", event.kind());
            return false;
        }
        self.router.set_focus(Some(stage.key_focus()));
        let seq = self.router.route_key(stage);
        dispatcher::deliver(&seq, &mut self.handlers, event)
    }
}
