// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The actor arena: identity, tree linkage, lifecycle, and container operations.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use hashbrown::HashMap;
use proscenium_fixed::Fixed;
use smallvec::SmallVec;

use crate::config::StageConfig;
use crate::kind::ActorKind;
use crate::pick::PickMode;
use crate::redraw::{IdleHook, RedrawScheduler};
use crate::render::ResourceHook;
use crate::types::{ActorBox, ActorFlags, ActorId, Geometry, PrivateFlags, Rotation};

/// Process-wide actor identifiers; zero is never handed out.
static NEXT_GID: AtomicU32 = AtomicU32::new(1);

fn next_gid() -> u32 {
    NEXT_GID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug)]
pub(crate) struct Actor {
    pub(crate) generation: u32,
    pub(crate) gid: u32,
    pub(crate) kind: ActorKind,
    pub(crate) flags: ActorFlags,
    pub(crate) private_flags: PrivateFlags,
    pub(crate) coords: ActorBox,
    pub(crate) depth: i32,
    /// Indexed X, Y, Z.
    pub(crate) rotation: [Rotation; 3],
    pub(crate) scale: (Fixed, Fixed),
    pub(crate) anchor: (Fixed, Fixed),
    pub(crate) clip: Option<Geometry>,
    pub(crate) opacity: u8,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<ActorId>,
    /// Paint order, bottom first.
    pub(crate) children: Vec<ActorId>,
}

impl Actor {
    fn new(generation: u32, kind: ActorKind) -> Self {
        Self {
            generation,
            gid: next_gid(),
            kind,
            flags: ActorFlags::empty(),
            private_flags: PrivateFlags::empty(),
            coords: ActorBox::default(),
            depth: 0,
            rotation: [Rotation::default(); 3],
            scale: (Fixed::ONE, Fixed::ONE),
            anchor: (Fixed::ZERO, Fixed::ZERO),
            clip: None,
            opacity: 0xff,
            name: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A scene: the arena owning every actor plus the toplevel actor at its root.
///
/// Actors are created detached and attached to a [`ActorKind::Group`] with
/// [`Stage::add_child`]. Every operation takes an [`ActorId`]; stale or
/// foreign handles are ignored (setters) or answered with `None` (getters).
/// Misuse such as parenting an already parented actor or destroying the
/// toplevel is reported through `log::warn!` and otherwise has no effect.
///
/// ## Example
///
/// ```rust
/// use proscenium_stage::{ActorKind, Color, RectangleStyle, Stage, StageConfig};
///
/// let mut stage = Stage::new(StageConfig::default());
/// let root = stage.root();
/// let rect = stage.create_actor(ActorKind::Rectangle(RectangleStyle::solid(Color::WHITE)));
/// stage.set_size(rect, 100, 50);
/// stage.add_child(root, rect);
/// stage.show(root);
/// stage.show(rect);
///
/// assert!(stage.is_visible(rect));
/// assert_eq!(stage.parent(rect), Some(root));
/// assert!(stage.needs_redraw());
/// ```
pub struct Stage {
    /// slots
    actors: Vec<Option<Actor>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: ActorId,
    registry: HashMap<u32, ActorId>,
    pub(crate) config: StageConfig,
    pub(crate) pick_mode: PickMode,
    key_focus: Option<ActorId>,
    pub(crate) redraw: RedrawScheduler,
    resource_hook: Option<Box<dyn ResourceHook>>,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.actors.len();
        let alive = self.actors.iter().filter(|a| a.is_some()).count();
        f.debug_struct("Stage")
            .field("actors_total", &total)
            .field("actors_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .field("registered", &self.registry.len())
            .field("config", &self.config)
            .field("redraw", &self.redraw)
            .finish_non_exhaustive()
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

impl Stage {
    /// Create a stage whose toplevel group covers `config.width × config.height`.
    ///
    /// The toplevel starts hidden; call [`Stage::show`] on [`Stage::root`].
    pub fn new(config: StageConfig) -> Self {
        let (width, height) = (config.width, config.height);
        let mut stage = Self {
            actors: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: ActorId::new(0, 0),
            registry: HashMap::new(),
            config,
            pick_mode: PickMode::None,
            key_focus: None,
            redraw: RedrawScheduler::new(),
            resource_hook: None,
        };
        let root = stage.create_actor(ActorKind::Group);
        if let Some(a) = stage.actor_mut(root) {
            a.private_flags.insert(PrivateFlags::TOPLEVEL);
            a.coords = ActorBox::from_pixels(0, 0, width, height);
            let gid = a.gid;
            stage.registry.insert(gid, root);
        }
        stage.root = root;
        stage
    }

    /// The toplevel actor. It has no parent and cannot be destroyed.
    #[must_use]
    pub fn root(&self) -> ActorId {
        self.root
    }

    /// The settings this stage was built with.
    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Create a detached actor.
    ///
    /// It has a fresh gid, a zero box at the origin, full opacity, unit scale,
    /// no clip and no flags set.
    pub fn create_actor(&mut self, kind: ActorKind) -> ActorId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.actors[idx] = Some(Actor::new(generation, kind));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ActorId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.actors.push(Some(Actor::new(generation, kind)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ActorId uses 32-bit indices by design."
            )]
            ((self.actors.len() - 1) as u32, generation)
        };
        ActorId::new(idx, generation)
    }

    /// Whether `id` refers to an actor that has not been destroyed.
    #[must_use]
    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actor(id).is_some()
    }

    pub(crate) fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|a| a.generation == id.1)
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors
            .get_mut(id.idx())
            .and_then(Option::as_mut)
            .filter(|a| a.generation == id.1)
    }

    /// The actor's process-unique identifier.
    #[must_use]
    pub fn gid(&self, id: ActorId) -> Option<u32> {
        self.actor(id).map(|a| a.gid)
    }

    /// Look up an attached actor by gid.
    ///
    /// Only the toplevel and actors currently inside a container are listed.
    #[must_use]
    pub fn actor_by_gid(&self, gid: u32) -> Option<ActorId> {
        self.registry.get(&gid).copied().filter(|&id| self.is_alive(id))
    }

    /// The actor's variant.
    #[must_use]
    pub fn kind(&self, id: ActorId) -> Option<&ActorKind> {
        self.actor(id).map(|a| &a.kind)
    }

    /// The containing group, if any.
    #[must_use]
    pub fn parent(&self, id: ActorId) -> Option<ActorId> {
        self.actor(id).and_then(|a| a.parent)
    }

    /// Children in paint order (bottom first); empty for stale ids and non-groups.
    #[must_use]
    pub fn children(&self, id: ActorId) -> &[ActorId] {
        self.actor(id)
            .map(|a| a.children.as_slice())
            .unwrap_or_default()
    }

    /// Public state bits.
    #[must_use]
    pub fn flags(&self, id: ActorId) -> Option<ActorFlags> {
        self.actor(id).map(|a| a.flags)
    }

    /// Backend resources are allocated.
    #[must_use]
    pub fn is_realized(&self, id: ActorId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ActorFlags::REALIZED))
    }

    /// Included in the rendered set.
    #[must_use]
    pub fn is_mapped(&self, id: ActorId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(ActorFlags::MAPPED))
    }

    /// Realized and mapped.
    #[must_use]
    pub fn is_visible(&self, id: ActorId) -> bool {
        self.flags(id).is_some_and(ActorFlags::is_visible)
    }

    pub(crate) fn is_toplevel(&self, id: ActorId) -> bool {
        self.actor(id)
            .is_some_and(|a| a.private_flags.contains(PrivateFlags::TOPLEVEL))
    }

    /// Root-first chain of live actors ending at `id`.
    ///
    /// Truncated at [`StageConfig::max_ancestor_depth`] entries, keeping the
    /// part nearest to `id`.
    pub(crate) fn ancestry(&self, id: ActorId) -> SmallVec<[ActorId; 16]> {
        let mut chain: SmallVec<[ActorId; 16]> = SmallVec::new();
        let mut cur = Some(id);
        while let Some(a) = cur {
            let Some(actor) = self.actor(a) else {
                break;
            };
            if chain.len() == self.config.max_ancestor_depth {
                log::error!(
                    "ancestor chain of {id:?} is longer than {} actors; truncating",
                    self.config.max_ancestor_depth
                );
                break;
            }
            chain.push(a);
            cur = actor.parent;
        }
        chain.reverse();
        chain
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: ActorId, id: ActorId) -> bool {
        self.ancestry(id).contains(&ancestor)
    }

    /// Install the hook that allocates backend resources on realization.
    pub fn set_resource_hook(&mut self, hook: Option<Box<dyn ResourceHook>>) {
        self.resource_hook = hook;
    }

    /// Install the host's idle hook; see [`RedrawScheduler`].
    pub fn set_idle_hook(&mut self, hook: Option<IdleHook>) {
        self.redraw.set_hook(hook);
    }

    /// Request a repaint of the stage. Requests coalesce until [`Stage::redraw`].
    pub fn queue_redraw(&mut self, id: ActorId) {
        if self.is_alive(id) && self.redraw.queue() {
            log::trace!("redraw queued by {id:?}");
        }
    }

    /// Whether a repaint is pending.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.redraw.is_pending()
    }

    pub(crate) fn redraw_if_visible(&mut self, id: ActorId) {
        if self.is_visible(id) {
            self.queue_redraw(id);
        }
    }

    /// The actor receiving key events; the toplevel when nothing else has focus.
    #[must_use]
    pub fn key_focus(&self) -> ActorId {
        self.key_focus
            .filter(|&id| self.is_alive(id))
            .unwrap_or(self.root)
    }

    /// Give `id` key focus, or return it to the toplevel with `None`.
    pub fn set_key_focus(&mut self, id: Option<ActorId>) {
        if let Some(a) = id
            && !self.is_alive(a)
        {
            log::warn!("set_key_focus: {a:?} is not a live actor");
            return;
        }
        self.key_focus = id;
    }

    /// Current pick mode; [`PickMode::None`] outside of a pick pass.
    #[must_use]
    pub fn pick_mode(&self) -> PickMode {
        self.pick_mode
    }

    /// Allocate backend resources.
    ///
    /// Groups realize their children too. On failure the actor stays
    /// unrealized and the error is logged; a later paint or show retries.
    pub fn realize(&mut self, id: ActorId) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        if actor.flags.contains(ActorFlags::REALIZED) {
            return;
        }
        let gid = actor.gid;
        let children = actor.children.clone();
        if let Some(hook) = self.resource_hook.as_mut()
            && let Err(err) = hook.realize(gid)
        {
            log::debug!("{err}");
            return;
        }
        if let Some(a) = self.actor_mut(id) {
            a.flags.insert(ActorFlags::REALIZED);
        }
        for child in children {
            self.realize(child);
        }
    }

    /// Release backend resources. Groups unrealize their children too.
    pub fn unrealize(&mut self, id: ActorId) {
        let Some(a) = self.actor_mut(id) else {
            return;
        };
        if !a.flags.contains(ActorFlags::REALIZED) {
            return;
        }
        a.flags.remove(ActorFlags::REALIZED);
        let gid = a.gid;
        let children = a.children.clone();
        if let Some(hook) = self.resource_hook.as_mut() {
            hook.unrealize(gid);
        }
        for child in children {
            self.unrealize(child);
        }
    }

    /// Realize if needed, map, and queue a redraw.
    pub fn show(&mut self, id: ActorId) {
        if self.is_visible(id) || !self.is_alive(id) {
            return;
        }
        if !self.is_realized(id) {
            self.realize(id);
        }
        if let Some(a) = self.actor_mut(id) {
            a.flags.insert(ActorFlags::MAPPED);
        }
        self.redraw_if_visible(id);
    }

    /// Unmap and queue a redraw. Realization is kept.
    pub fn hide(&mut self, id: ActorId) {
        if !self.is_visible(id) {
            return;
        }
        if let Some(a) = self.actor_mut(id) {
            a.flags.remove(ActorFlags::MAPPED);
        }
        self.queue_redraw(id);
    }

    /// Show a group's direct children and then the group; other kinds just show.
    pub fn show_all(&mut self, id: ActorId) {
        let children = match self.kind(id) {
            Some(ActorKind::Group) => self.children(id).to_vec(),
            Some(_) => Vec::new(),
            None => return,
        };
        for child in children {
            self.show(child);
        }
        self.show(id);
    }

    /// Hide a group and then its direct children; other kinds just hide.
    pub fn hide_all(&mut self, id: ActorId) {
        let children = match self.kind(id) {
            Some(ActorKind::Group) => self.children(id).to_vec(),
            Some(_) => Vec::new(),
            None => return,
        };
        self.hide(id);
        for child in children {
            self.hide(child);
        }
    }

    /// Link `id` under `parent` without touching the child list.
    fn set_parent(&mut self, id: ActorId, parent: ActorId) -> bool {
        if id == parent {
            log::warn!("cannot make {id:?} its own parent");
            return false;
        }
        let Some(actor) = self.actor(id) else {
            log::warn!("set_parent: {id:?} is not a live actor");
            return false;
        };
        if !self.is_alive(parent) {
            log::warn!("set_parent: parent {parent:?} is not a live actor");
            return false;
        }
        if actor.parent.is_some() {
            log::warn!("cannot set a parent on {id:?}, which already has one; remove it first");
            return false;
        }
        if actor.private_flags.contains(PrivateFlags::TOPLEVEL) {
            log::warn!("cannot set a parent on the toplevel actor");
            return false;
        }
        if self.is_ancestor(id, parent) {
            log::warn!("cannot parent {id:?} under its own descendant {parent:?}");
            return false;
        }
        let gid = actor.gid;
        self.registry.insert(gid, id);
        if let Some(a) = self.actor_mut(id) {
            a.parent = Some(parent);
        }
        if self.is_realized(parent) {
            self.realize(id);
        }
        if self.is_visible(parent) && self.is_visible(id) {
            self.queue_redraw(id);
        }
        true
    }

    /// Clear the parent link, unregister the gid, and release resources.
    ///
    /// While reparenting between realized groups the actor is only hidden.
    fn unparent(&mut self, id: ActorId) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        if actor.parent.is_none() {
            return;
        }
        let reparenting = actor.private_flags.contains(PrivateFlags::IN_REPARENT);
        if actor.flags.contains(ActorFlags::REALIZED) {
            if reparenting {
                self.hide(id);
            } else {
                self.unrealize(id);
            }
        }
        if let Some(a) = self.actor_mut(id) {
            a.parent = None;
            let gid = a.gid;
            self.registry.remove(&gid);
        }
    }

    /// Append `child` to `group`, then restore depth order.
    ///
    /// The child is realized if the group is, and a redraw is queued if both
    /// are visible.
    pub fn add_child(&mut self, group: ActorId, child: ActorId) {
        match self.kind(group) {
            Some(ActorKind::Group) => {}
            Some(_) => {
                log::warn!("add_child: {group:?} is not a group");
                return;
            }
            None => {
                log::warn!("add_child: {group:?} is not a live actor");
                return;
            }
        }
        if !self.set_parent(child, group) {
            return;
        }
        if let Some(g) = self.actor_mut(group) {
            g.children.push(child);
        }
        self.sort_depth_order(group);
    }

    /// Detach `child` from `group`. The child stays alive, unrealized and detached.
    pub fn remove_child(&mut self, group: ActorId, child: ActorId) {
        if self.parent(child) != Some(group) {
            log::warn!("remove_child: {child:?} is not a child of {group:?}");
            return;
        }
        if let Some(g) = self.actor_mut(group) {
            g.children.retain(|&c| c != child);
        }
        self.unparent(child);
        self.redraw_if_visible(group);
    }

    /// Move `id` into `new_parent`, keeping it realized when both are realized.
    ///
    /// A mapped actor moved between realized groups stays mapped.
    pub fn reparent(&mut self, id: ActorId, new_parent: ActorId) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        if actor.private_flags.contains(PrivateFlags::TOPLEVEL) {
            log::warn!("cannot set a parent on the toplevel actor");
            return;
        }
        let old_parent = actor.parent;
        if old_parent == Some(new_parent) {
            return;
        }
        if !self.kind(new_parent).is_some_and(ActorKind::is_group) {
            log::warn!("reparent: {new_parent:?} is not a live group");
            return;
        }
        if self.is_ancestor(id, new_parent) {
            log::warn!("cannot reparent {id:?} under its own descendant {new_parent:?}");
            return;
        }
        let was_mapped = self.is_mapped(id);
        let reparenting = self.is_realized(id) && self.is_realized(new_parent);
        if reparenting && let Some(a) = self.actor_mut(id) {
            a.private_flags.insert(PrivateFlags::IN_REPARENT);
        }
        if let Some(old) = old_parent {
            self.remove_child(old, id);
        }
        self.add_child(new_parent, id);
        if reparenting {
            if let Some(a) = self.actor_mut(id) {
                a.private_flags.remove(PrivateFlags::IN_REPARENT);
            }
            if was_mapped {
                self.show(id);
            }
            self.queue_redraw(id);
        }
    }

    fn sibling_parent(&self, id: ActorId, sibling: Option<ActorId>, op: &str) -> Option<ActorId> {
        let Some(parent) = self.parent(id) else {
            log::warn!("{op}: {id:?} is not inside a container");
            return None;
        };
        if let Some(s) = sibling
            && self.parent(s) != Some(parent)
        {
            log::warn!("{op}: {id:?} and {s:?} are not in the same container");
            return None;
        }
        Some(parent)
    }

    /// Move `id` just above `below` in paint order, or to the top with `None`.
    ///
    /// The actor takes the sibling's depth so depth sorting keeps it there.
    pub fn raise(&mut self, id: ActorId, below: Option<ActorId>) {
        let Some(parent) = self.sibling_parent(id, below, "raise") else {
            return;
        };
        if below == Some(id) {
            return;
        }
        let Some(group) = self.actor_mut(parent) else {
            return;
        };
        group.children.retain(|&c| c != id);
        let sibling = match below {
            None => {
                let last = group.children.last().copied();
                group.children.push(id);
                last
            }
            Some(s) => {
                let pos = group
                    .children
                    .iter()
                    .position(|&c| c == s)
                    .map_or(group.children.len(), |p| p + 1);
                group.children.insert(pos, id);
                Some(s)
            }
        };
        self.restack(id, sibling);
    }

    /// Move `id` just below `above` in paint order, or to the bottom with `None`.
    pub fn lower(&mut self, id: ActorId, above: Option<ActorId>) {
        let Some(parent) = self.sibling_parent(id, above, "lower") else {
            return;
        };
        if above == Some(id) {
            return;
        }
        let Some(group) = self.actor_mut(parent) else {
            return;
        };
        group.children.retain(|&c| c != id);
        let sibling = match above {
            None => {
                let first = group.children.first().copied();
                group.children.insert(0, id);
                first
            }
            Some(s) => {
                let pos = group.children.iter().position(|&c| c == s).unwrap_or(0);
                group.children.insert(pos, id);
                Some(s)
            }
        };
        self.restack(id, sibling);
    }

    fn restack(&mut self, id: ActorId, sibling: Option<ActorId>) {
        if let Some(s) = sibling
            && let Some(depth) = self.actor(s).map(|a| a.depth)
        {
            self.set_depth(id, depth);
        }
        self.redraw_if_visible(id);
    }

    /// Move `id` to the top of its container.
    pub fn raise_top(&mut self, id: ActorId) {
        self.raise(id, None);
    }

    /// Move `id` to the bottom of its container.
    pub fn lower_bottom(&mut self, id: ActorId) {
        self.lower(id, None);
    }

    /// Stable sort of a group's children by ascending depth.
    pub fn sort_depth_order(&mut self, group: ActorId) {
        let Some(g) = self.actor_mut(group) else {
            return;
        };
        let mut children = core::mem::take(&mut g.children);
        children.sort_by_key(|&c| self.actor(c).map_or(0, |a| a.depth));
        if let Some(g) = self.actor_mut(group) {
            g.children = children;
        }
    }

    /// Destroy `id` and everything it contains.
    ///
    /// The actor leaves its container, is unrealized, drops out of the gid
    /// table, and its handle becomes stale. Destroying a stale handle does
    /// nothing; destroying the toplevel is refused.
    pub fn destroy(&mut self, id: ActorId) {
        let Some(actor) = self.actor(id) else {
            return;
        };
        if actor.private_flags.contains(PrivateFlags::TOPLEVEL) {
            log::warn!("cannot destroy the toplevel actor; this is usually an application bug");
            return;
        }
        if actor.private_flags.contains(PrivateFlags::IN_DESTRUCTION) {
            return;
        }
        let parent = actor.parent;
        if let Some(a) = self.actor_mut(id) {
            a.private_flags.insert(PrivateFlags::IN_DESTRUCTION);
        }
        if let Some(p) = parent {
            self.remove_child(p, id);
        }
        self.unrealize(id);
        for child in self.children(id).to_vec() {
            self.destroy(child);
        }
        if self.key_focus == Some(id) {
            self.key_focus = None;
        }
        if let Some(a) = self.actors[id.idx()].take() {
            self.registry.remove(&a.gid);
        }
        self.free_list.push(id.idx());
        log::trace!("destroyed {id:?}");
    }
}
