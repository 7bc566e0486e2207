// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting, pick passes, and the redraw entry point.
//!
//! A paint visits the tree depth first from the actor it starts at. Each
//! actor wraps itself in a `push_matrix`/`pop_matrix` pair, applies its own
//! transform, and draws according to the stage's [`PickMode`]: its kind's
//! visuals normally, or a flat silhouette in its encoded gid during a pick
//! pass. Groups draw their mapped children in list order, so later siblings
//! land on top.

use smallvec::SmallVec;

use crate::kind::{ActorKind, RectangleStyle};
use crate::pick::{PickMode, decode, try_encode};
use crate::render::Renderer;
use crate::stage::Stage;
use crate::types::{ActorFlags, ActorId, Color};

fn paint_rectangle<R: Renderer + ?Sized>(r: &mut R, style: RectangleStyle, w: u32, h: u32, opacity: u8) {
    let fill = style.color.with_opacity(opacity);
    let Some(border) = style.border.filter(|b| b.width > 0 && b.color != style.color) else {
        r.set_color(fill);
        r.fill_rectangle(0, 0, w, h);
        return;
    };

    let bw = border.width.min(w / 2).min(h / 2);
    let (x_in, y_in) = (coord(bw), coord(bw));
    r.set_color(fill);
    r.fill_rectangle(x_in, y_in, w - 2 * bw, h - 2 * bw);

    r.set_color(border.color.with_opacity(opacity));
    // Top, right, bottom, left; each strip stops where the next begins.
    r.fill_rectangle(x_in, 0, w - bw, bw);
    r.fill_rectangle(coord(w - bw), y_in, bw, h - bw);
    r.fill_rectangle(0, coord(h - bw), w - bw, bw);
    r.fill_rectangle(0, 0, bw, h - bw);
}

fn coord(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

impl Stage {
    /// Paint `id` and its subtree.
    ///
    /// An unrealized actor is realized first; if that fails it is skipped
    /// for this frame.
    pub fn paint<R: Renderer + ?Sized>(&mut self, r: &mut R, id: ActorId) {
        if !self.is_alive(id) {
            return;
        }
        if !self.is_realized(id) {
            self.realize(id);
            if !self.is_realized(id) {
                log::trace!("skipping paint of unrealized {id:?}");
                return;
            }
        }

        r.push_matrix();
        let clipped = self.apply_modelview_transform(r, id);
        if self.pick_mode == PickMode::None {
            self.paint_kind(r, id);
        } else {
            self.pick(r, id);
        }
        if clipped {
            r.pop_clip();
        }
        r.pop_matrix();
    }

    fn paint_kind<R: Renderer + ?Sized>(&mut self, r: &mut R, id: ActorId) {
        let Some(kind) = self.kind(id).cloned() else {
            return;
        };
        match kind {
            ActorKind::Basic => {}
            ActorKind::Rectangle(style) => {
                let (w, h) = self.size(id).unwrap_or_default();
                let opacity = self.opacity(id).unwrap_or(0xff);
                paint_rectangle(r, style, w, h, opacity);
            }
            ActorKind::Group => self.paint_children(r, id),
        }
    }

    fn paint_children<R: Renderer + ?Sized>(&mut self, r: &mut R, id: ActorId) {
        // Realizing a child can reach hooks that reenter the stage; walk a copy.
        let children: SmallVec<[ActorId; 16]> = self.children(id).iter().copied().collect();
        for child in children {
            if self.is_mapped(child) {
                self.paint(r, child);
            }
        }
    }

    fn pick<R: Renderer + ?Sized>(&mut self, r: &mut R, id: ActorId) {
        if self.should_pick_paint(id)
            && let Some(gid) = self.gid(id)
        {
            if let Some(color) = try_encode(gid, r.color_depth()) {
                let (w, h) = self.size(id).unwrap_or_default();
                r.set_color(color);
                r.fill_rectangle(0, 0, w, h);
            } else {
                log::debug!("gid {gid} of {id:?} does not fit the pick depth; not pickable");
            }
        }
        if self.kind(id).is_some_and(ActorKind::is_group) {
            self.paint_children(r, id);
        }
    }

    /// Whether `id` draws a silhouette in the current pick pass.
    ///
    /// Mapped actors qualify when every actor is being picked, or when they
    /// are reactive.
    #[must_use]
    pub fn should_pick_paint(&self, id: ActorId) -> bool {
        let Some(flags) = self.flags(id) else {
            return false;
        };
        flags.contains(ActorFlags::MAPPED)
            && (self.pick_mode == PickMode::All || flags.contains(ActorFlags::REACTIVE))
    }

    /// The topmost pickable actor under device pixel `(x, y)`.
    ///
    /// Runs a pick pass over the whole stage, then reads the pixel back.
    /// Background (white at the target's depth), and any color that does not
    /// decode to a live gid, resolve to the toplevel. Returns `None` only when
    /// the pixel is outside the render target.
    pub fn actor_at_pos<R: Renderer + ?Sized>(&mut self, r: &mut R, x: i32, y: i32) -> Option<ActorId> {
        let saved = self.pick_mode;
        self.pick_mode = if self.config.pick_all {
            PickMode::All
        } else {
            PickMode::Reactive
        };
        r.clear(Color::WHITE);
        let root = self.root();
        self.paint(r, root);
        self.pick_mode = saved;

        let pixel = r.read_pixel(x, y)?;
        let depth = r.color_depth();
        let gid = decode(pixel, depth);
        if gid == decode(Color::WHITE, depth) {
            return Some(root);
        }
        Some(self.actor_by_gid(gid).unwrap_or_else(|| {
            log::debug!("pick at ({x}, {y}) decoded unknown gid {gid}");
            root
        }))
    }

    /// Repaint the whole stage and clear any pending redraw request.
    pub fn redraw<R: Renderer + ?Sized>(&mut self, r: &mut R) {
        let was_pending = self.redraw.take();
        log::trace!("redraw (pending: {was_pending})");
        self.pick_mode = PickMode::None;
        r.clear(self.config.background);
        let root = self.root();
        self.paint(r, root);
    }
}
