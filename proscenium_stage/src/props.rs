// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actor properties: geometry, depth, scale, rotation, anchor, clip, opacity.
//!
//! Setters are idempotent: writing the value an actor already has does not
//! queue a redraw. A changed value queues one when the actor is visible.
//! None of these touch the realized or mapped flags.

use alloc::string::String;

use proscenium_fixed::Fixed;

use crate::kind::{ActorKind, Border};
use crate::stage::Stage;
use crate::types::{
    ActorBox, ActorFlags, ActorId, Color, Geometry, Gravity, PrivateFlags, RotateAxis, Rotation,
    mul_u8,
};

const fn axis_index(axis: RotateAxis) -> usize {
    match axis {
        RotateAxis::X => 0,
        RotateAxis::Y => 1,
        RotateAxis::Z => 2,
    }
}

fn to_extent(v: Fixed) -> u32 {
    u32::try_from(v.to_int()).unwrap_or(0)
}

impl Stage {
    /// The actor's untransformed box, relative to its parent.
    ///
    /// A group (other than the toplevel) reports its stored origin with an
    /// extent reaching the furthest right and bottom edge of its mapped
    /// children.
    #[must_use]
    pub fn query_coords(&self, id: ActorId) -> Option<ActorBox> {
        let a = self.actor(id)?;
        if !a.kind.is_group() || a.private_flags.contains(PrivateFlags::TOPLEVEL) {
            return Some(a.coords);
        }
        let (mut w, mut h) = (Fixed::ZERO, Fixed::ZERO);
        for &c in &a.children {
            if !self.is_mapped(c) {
                continue;
            }
            if let Some(cb) = self.query_coords(c) {
                w = w.max(cb.x2);
                h = h.max(cb.y2);
            }
        }
        let (x1, y1) = (a.coords.x1, a.coords.y1);
        Some(ActorBox::new(x1, y1, x1 + w, y1 + h))
    }

    /// Store a new box.
    ///
    /// Nothing happens when origin and extent are unchanged. Inverted boxes
    /// are clamped to zero extent.
    pub fn request_coords(&mut self, id: ActorId, mut b: ActorBox) {
        if b.x2 < b.x1 || b.y2 < b.y1 {
            log::warn!("request_coords: inverted box {b:?} for {id:?}; clamping to zero size");
            b.x2 = b.x2.max(b.x1);
            b.y2 = b.y2.max(b.y1);
        }
        if let Some(a) = self.actor_mut(id) {
            let cur = a.coords;
            if cur.x1 == b.x1
                && cur.y1 == b.y1
                && cur.width() == b.width()
                && cur.height() == b.height()
            {
                return;
            }
            a.coords = b;
            self.redraw_if_visible(id);
        }
    }

    /// Set the box from integer pixels.
    pub fn set_geometry(&mut self, id: ActorId, g: Geometry) {
        let b = ActorBox::new(
            Fixed::from_int(g.x),
            Fixed::from_int(g.y),
            Fixed::from_int(g.x.saturating_add_unsigned(g.width)),
            Fixed::from_int(g.y.saturating_add_unsigned(g.height)),
        );
        self.request_coords(id, b);
    }

    /// The box in integer pixels.
    #[must_use]
    pub fn geometry(&self, id: ActorId) -> Option<Geometry> {
        let b = self.query_coords(id)?;
        Some(Geometry::new(
            b.x1.to_int(),
            b.y1.to_int(),
            to_extent(b.width()),
            to_extent(b.height()),
        ))
    }

    /// Move the box origin, keeping its extent.
    pub fn set_position(&mut self, id: ActorId, x: i32, y: i32) {
        let Some(mut b) = self.query_coords(id) else {
            return;
        };
        let (x, y) = (Fixed::from_int(x), Fixed::from_int(y));
        b.x2 += x - b.x1;
        b.y2 += y - b.y1;
        b.x1 = x;
        b.y1 = y;
        self.request_coords(id, b);
    }

    /// Origin in pixels.
    #[must_use]
    pub fn position(&self, id: ActorId) -> Option<(i32, i32)> {
        self.query_coords(id).map(|b| (b.x1.to_int(), b.y1.to_int()))
    }

    /// Set the left edge.
    pub fn set_x(&mut self, id: ActorId, x: i32) {
        if let Some((_, y)) = self.position(id) {
            self.set_position(id, x, y);
        }
    }

    /// Set the top edge.
    pub fn set_y(&mut self, id: ActorId, y: i32) {
        if let Some((x, _)) = self.position(id) {
            self.set_position(id, x, y);
        }
    }

    /// Left edge in pixels.
    #[must_use]
    pub fn x(&self, id: ActorId) -> Option<i32> {
        self.position(id).map(|(x, _)| x)
    }

    /// Top edge in pixels.
    #[must_use]
    pub fn y(&self, id: ActorId) -> Option<i32> {
        self.position(id).map(|(_, y)| y)
    }

    /// Shift the box by `(dx, dy)` pixels.
    pub fn move_by(&mut self, id: ActorId, dx: i32, dy: i32) {
        let Some(mut b) = self.query_coords(id) else {
            return;
        };
        let (dx, dy) = (Fixed::from_int(dx), Fixed::from_int(dy));
        b.x1 += dx;
        b.x2 += dx;
        b.y1 += dy;
        b.y2 += dy;
        self.request_coords(id, b);
    }

    /// Resize from the origin. Non-positive values leave that axis alone.
    pub fn set_size(&mut self, id: ActorId, width: i32, height: i32) {
        let Some(mut b) = self.query_coords(id) else {
            return;
        };
        if width > 0 {
            b.x2 = b.x1 + Fixed::from_int(width);
        }
        if height > 0 {
            b.y2 = b.y1 + Fixed::from_int(height);
        }
        self.request_coords(id, b);
    }

    /// Set the width, keeping the height.
    pub fn set_width(&mut self, id: ActorId, width: u32) {
        self.set_size(id, i32::try_from(width).unwrap_or(i32::MAX), -1);
    }

    /// Set the height, keeping the width.
    pub fn set_height(&mut self, id: ActorId, height: u32) {
        self.set_size(id, -1, i32::try_from(height).unwrap_or(i32::MAX));
    }

    /// Untransformed size in pixels.
    #[must_use]
    pub fn size(&self, id: ActorId) -> Option<(u32, u32)> {
        self.query_coords(id)
            .map(|b| (to_extent(b.width()), to_extent(b.height())))
    }

    /// Untransformed width in pixels.
    #[must_use]
    pub fn width(&self, id: ActorId) -> Option<u32> {
        self.size(id).map(|(w, _)| w)
    }

    /// Untransformed height in pixels.
    #[must_use]
    pub fn height(&self, id: ActorId) -> Option<u32> {
        self.size(id).map(|(_, h)| h)
    }

    /// Set the Z offset. A parented actor's container re-sorts its children.
    pub fn set_depth(&mut self, id: ActorId, depth: i32) {
        if let Some(a) = self.actor_mut(id)
            && a.depth != depth
        {
            a.depth = depth;
            let parent = a.parent;
            if let Some(parent) = parent {
                self.sort_depth_order(parent);
            }
            self.redraw_if_visible(id);
        }
    }

    /// Z offset.
    #[must_use]
    pub fn depth(&self, id: ActorId) -> Option<i32> {
        self.actor(id).map(|a| a.depth)
    }

    /// Set the scale factors.
    pub fn set_scale_fixed(&mut self, id: ActorId, scale_x: Fixed, scale_y: Fixed) {
        if let Some(a) = self.actor_mut(id)
            && a.scale != (scale_x, scale_y)
        {
            a.scale = (scale_x, scale_y);
            self.redraw_if_visible(id);
        }
    }

    /// Set the scale factors from floating point.
    pub fn set_scale(&mut self, id: ActorId, scale_x: f64, scale_y: f64) {
        self.set_scale_fixed(id, Fixed::from_f64(scale_x), Fixed::from_f64(scale_y));
    }

    /// Scale factors.
    #[must_use]
    pub fn scale_fixed(&self, id: ActorId) -> Option<(Fixed, Fixed)> {
        self.actor(id).map(|a| a.scale)
    }

    /// Scale factors as floating point.
    #[must_use]
    pub fn scale(&self, id: ActorId) -> Option<(f64, f64)> {
        self.scale_fixed(id).map(|(x, y)| (x.to_f64(), y.to_f64()))
    }

    /// Rotate about `axis` by `angle` degrees around the pivot `(x, y, z)`.
    ///
    /// The pivot component along `axis` is ignored. For the X and Y axes the
    /// pivot Z is relative to the actor's depth.
    pub fn set_rotation_fixed(
        &mut self,
        id: ActorId,
        axis: RotateAxis,
        angle: Fixed,
        x: i32,
        y: i32,
        z: i32,
    ) {
        let r = Rotation::for_axis(axis, angle, x, y, z);
        if let Some(a) = self.actor_mut(id)
            && a.rotation[axis_index(axis)] != r
        {
            a.rotation[axis_index(axis)] = r;
            self.redraw_if_visible(id);
        }
    }

    /// [`Stage::set_rotation_fixed`] with the angle in floating point.
    pub fn set_rotation(&mut self, id: ActorId, axis: RotateAxis, angle: f64, x: i32, y: i32, z: i32) {
        self.set_rotation_fixed(id, axis, Fixed::from_f64(angle), x, y, z);
    }

    /// Angle and pivot for one axis.
    #[must_use]
    pub fn rotation(&self, id: ActorId, axis: RotateAxis) -> Option<Rotation> {
        self.actor(id).map(|a| a.rotation[axis_index(axis)])
    }

    /// Rotation angle about `axis` in degrees.
    #[must_use]
    pub fn rotation_angle(&self, id: ActorId, axis: RotateAxis) -> Option<f64> {
        self.rotation(id, axis).map(|r| r.angle.to_f64())
    }

    /// Set the anchor point in units.
    pub fn set_anchor_point_units(&mut self, id: ActorId, x: Fixed, y: Fixed) {
        if let Some(a) = self.actor_mut(id)
            && a.anchor != (x, y)
        {
            a.anchor = (x, y);
            self.redraw_if_visible(id);
        }
    }

    /// Set the anchor point in pixels.
    pub fn set_anchor_point(&mut self, id: ActorId, x: i32, y: i32) {
        self.set_anchor_point_units(id, Fixed::from_int(x), Fixed::from_int(y));
    }

    /// Anchor point in units.
    #[must_use]
    pub fn anchor_point_units(&self, id: ActorId) -> Option<(Fixed, Fixed)> {
        self.actor(id).map(|a| a.anchor)
    }

    /// Anchor point in pixels.
    #[must_use]
    pub fn anchor_point(&self, id: ActorId) -> Option<(i32, i32)> {
        self.anchor_point_units(id)
            .map(|(x, y)| (x.to_int(), y.to_int()))
    }

    /// Place the anchor on an edge, corner or center of the current box.
    pub fn set_anchor_point_from_gravity(&mut self, id: ActorId, gravity: Gravity) {
        let Some(b) = self.query_coords(id) else {
            return;
        };
        let (w, h) = (b.width(), b.height());
        let (x, y) = match gravity {
            Gravity::North => (w >> 1, Fixed::ZERO),
            Gravity::South => (w >> 1, h),
            Gravity::East => (w, h >> 1),
            Gravity::NorthEast => (w, Fixed::ZERO),
            Gravity::SouthEast => (w, h),
            Gravity::SouthWest => (Fixed::ZERO, h),
            Gravity::West => (Fixed::ZERO, h >> 1),
            Gravity::Center => (w >> 1, h >> 1),
            Gravity::None | Gravity::NorthWest => (Fixed::ZERO, Fixed::ZERO),
        };
        self.set_anchor_point_units(id, x, y);
    }

    /// Restrict the actor and its subtree to `clip`, in local pixels.
    pub fn set_clip(&mut self, id: ActorId, clip: Geometry) {
        if let Some(a) = self.actor_mut(id)
            && a.clip != Some(clip)
        {
            a.clip = Some(clip);
            self.redraw_if_visible(id);
        }
    }

    /// Drop the clip.
    pub fn remove_clip(&mut self, id: ActorId) {
        if let Some(a) = self.actor_mut(id)
            && a.clip.is_some()
        {
            a.clip = None;
            self.redraw_if_visible(id);
        }
    }

    /// Whether a clip is set.
    #[must_use]
    pub fn has_clip(&self, id: ActorId) -> bool {
        self.clip(id).is_some()
    }

    /// The clip rectangle, if any.
    #[must_use]
    pub fn clip(&self, id: ActorId) -> Option<Geometry> {
        self.actor(id).and_then(|a| a.clip)
    }

    /// Set the actor's own opacity.
    pub fn set_opacity(&mut self, id: ActorId, opacity: u8) {
        if let Some(a) = self.actor_mut(id)
            && a.opacity != opacity
        {
            a.opacity = opacity;
            self.redraw_if_visible(id);
        }
    }

    /// The actor's own opacity, ignoring ancestors.
    #[must_use]
    pub fn own_opacity(&self, id: ActorId) -> Option<u8> {
        self.actor(id).map(|a| a.opacity)
    }

    /// Effective opacity: the product of the actor's own opacity and every
    /// ancestor's, each step normalized to `0..=255`.
    ///
    /// Recomputed from the live parent chain on every call.
    #[must_use]
    pub fn opacity(&self, id: ActorId) -> Option<u8> {
        self.actor(id)?;
        Some(
            self.ancestry(id)
                .iter()
                .filter_map(|&a| self.own_opacity(a))
                .fold(0xff, mul_u8),
        )
    }

    /// Set or clear (with `""`) the label.
    pub fn set_name(&mut self, id: ActorId, name: &str) {
        if let Some(a) = self.actor_mut(id) {
            a.name = (!name.is_empty()).then(|| String::from(name));
        }
    }

    /// The label, if any.
    #[must_use]
    pub fn name(&self, id: ActorId) -> Option<&str> {
        self.actor(id).and_then(|a| a.name.as_deref())
    }

    /// Let the actor receive pointer events and paint a pick silhouette.
    pub fn set_reactive(&mut self, id: ActorId, reactive: bool) {
        if let Some(a) = self.actor_mut(id) {
            a.flags.set(ActorFlags::REACTIVE, reactive);
        }
    }

    /// Whether the actor is reactive.
    #[must_use]
    pub fn is_reactive(&self, id: ActorId) -> bool {
        self.flags(id)
            .is_some_and(|f| f.contains(ActorFlags::REACTIVE))
    }

    /// Set a rectangle's fill color. Ignored for other kinds.
    pub fn set_rectangle_color(&mut self, id: ActorId, color: Color) {
        if let Some(a) = self.actor_mut(id)
            && let ActorKind::Rectangle(style) = &mut a.kind
            && style.color != color
        {
            style.color = color;
            self.redraw_if_visible(id);
        }
    }

    /// Set or remove a rectangle's border. Ignored for other kinds.
    pub fn set_rectangle_border(&mut self, id: ActorId, border: Option<Border>) {
        if let Some(a) = self.actor_mut(id)
            && let ActorKind::Rectangle(style) = &mut a.kind
            && style.border != border
        {
            style.border = border;
            self.redraw_if_visible(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use crate::kind::RectangleStyle;
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn visible_rect(stage: &mut Stage) -> ActorId {
        let root = stage.root();
        let r = stage.create_actor(ActorKind::Rectangle(RectangleStyle::solid(Color::WHITE)));
        stage.add_child(root, r);
        stage.show(r);
        r
    }

    fn counting_stage() -> (Stage, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let mut stage = Stage::default();
        let f = fired.clone();
        stage.set_idle_hook(Some(Box::new(move || f.set(f.get() + 1))));
        let root = stage.root();
        stage.show(root);
        (stage, fired)
    }

    #[test]
    fn position_and_size_edit_the_box() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.set_size(r, 100, 50);
        stage.set_position(r, 10, 20);
        assert_eq!(stage.geometry(r), Some(Geometry::new(10, 20, 100, 50)));
        stage.move_by(r, -5, 5);
        assert_eq!(stage.position(r), Some((5, 25)));
        assert_eq!(stage.size(r), Some((100, 50)));
        stage.set_x(r, 0);
        stage.set_height(r, 7);
        assert_eq!(stage.geometry(r), Some(Geometry::new(0, 25, 100, 7)));
    }

    #[test]
    fn non_positive_sizes_are_ignored() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.set_size(r, 30, 40);
        stage.set_size(r, 0, -3);
        assert_eq!(stage.size(r), Some((30, 40)));
        stage.set_size(r, 10, 0);
        assert_eq!(stage.size(r), Some((10, 40)));
    }

    #[test]
    fn inverted_boxes_are_clamped() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.request_coords(r, ActorBox::from_pixels(10, 10, 5, 20));
        let b = stage.query_coords(r).unwrap();
        assert_eq!(b.width(), Fixed::ZERO);
        assert_eq!(b.height(), Fixed::from_int(10));
    }

    #[test]
    fn group_extent_covers_mapped_children() {
        let mut stage = Stage::default();
        let root = stage.root();
        let g = stage.create_actor(ActorKind::Group);
        stage.add_child(root, g);
        stage.set_position(g, 5, 5);
        let a = stage.create_actor(ActorKind::Basic);
        let b = stage.create_actor(ActorKind::Basic);
        stage.add_child(g, a);
        stage.add_child(g, b);
        stage.set_geometry(a, Geometry::new(0, 0, 40, 10));
        stage.set_geometry(b, Geometry::new(10, 10, 10, 60));
        stage.show(a);
        assert_eq!(stage.geometry(g), Some(Geometry::new(5, 5, 40, 10)));
        stage.show(b);
        assert_eq!(stage.geometry(g), Some(Geometry::new(5, 5, 40, 70)));
        // The toplevel reports its stored size.
        assert_eq!(stage.size(root), Some((640, 480)));
    }

    #[test]
    fn opacity_multiplies_down_the_chain() {
        let mut stage = Stage::default();
        let root = stage.root();
        let middle = stage.create_actor(ActorKind::Group);
        let leaf = stage.create_actor(ActorKind::Basic);
        stage.add_child(root, middle);
        stage.add_child(middle, leaf);
        stage.set_opacity(middle, 128);
        assert_eq!(stage.opacity(root), Some(255));
        assert_eq!(stage.opacity(middle), Some(128));
        assert_eq!(stage.opacity(leaf), Some(128));
        assert_eq!(stage.own_opacity(leaf), Some(255));
        stage.set_opacity(leaf, 128);
        assert_eq!(stage.opacity(leaf), Some(64));
        stage.set_opacity(root, 0);
        assert_eq!(stage.opacity(leaf), Some(0));
    }

    #[test]
    fn gravity_places_the_anchor() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.set_size(r, 100, 50);
        let cases = [
            (Gravity::None, (0, 0)),
            (Gravity::NorthWest, (0, 0)),
            (Gravity::North, (50, 0)),
            (Gravity::NorthEast, (100, 0)),
            (Gravity::East, (100, 25)),
            (Gravity::SouthEast, (100, 50)),
            (Gravity::South, (50, 50)),
            (Gravity::SouthWest, (0, 50)),
            (Gravity::West, (0, 25)),
            (Gravity::Center, (50, 25)),
        ];
        for (gravity, expected) in cases {
            stage.set_anchor_point_from_gravity(r, gravity);
            assert_eq!(stage.anchor_point(r), Some(expected), "{gravity:?}");
        }
    }

    #[test]
    fn rotation_round_trips_per_axis() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.set_rotation(r, RotateAxis::Y, 30.0, 5, 6, 7);
        let rot = stage.rotation(r, RotateAxis::Y).unwrap();
        assert_eq!((rot.x, rot.y, rot.z), (5, 0, 7));
        assert_eq!(stage.rotation_angle(r, RotateAxis::Y), Some(30.0));
        assert_eq!(stage.rotation_angle(r, RotateAxis::X), Some(0.0));
    }

    #[test]
    fn clip_and_name_and_reactive() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        assert!(!stage.has_clip(r));
        stage.set_clip(r, Geometry::new(1, 2, 3, 4));
        assert_eq!(stage.clip(r), Some(Geometry::new(1, 2, 3, 4)));
        stage.remove_clip(r);
        assert!(!stage.has_clip(r));

        stage.set_name(r, "button");
        assert_eq!(stage.name(r), Some("button"));
        stage.set_name(r, "");
        assert_eq!(stage.name(r), None);

        stage.set_reactive(r, true);
        assert!(stage.is_reactive(r));
        stage.set_reactive(r, false);
        assert!(!stage.is_reactive(r));
    }

    #[test]
    fn setters_leave_visibility_alone() {
        let mut stage = Stage::default();
        let root = stage.root();
        stage.show(root);
        let r = visible_rect(&mut stage);
        let before = stage.flags(r);
        stage.set_geometry(r, Geometry::new(1, 1, 9, 9));
        stage.set_scale(r, 2.0, 0.0);
        stage.set_rotation(r, RotateAxis::Z, 45.0, 0, 0, 0);
        stage.set_depth(r, -4);
        stage.set_clip(r, Geometry::new(0, 0, 1, 1));
        assert_eq!(stage.flags(r), before);
    }

    #[test]
    fn unchanged_values_do_not_schedule_redraws() {
        let (mut stage, fired) = counting_stage();
        let r = visible_rect(&mut stage);
        stage.set_size(r, 10, 10);
        assert_eq!(fired.get(), 1);
        stage.redraw.take();

        stage.set_size(r, 10, 10);
        stage.set_opacity(r, 255);
        stage.set_depth(r, 0);
        stage.set_scale(r, 1.0, 1.0);
        stage.set_anchor_point(r, 0, 0);
        stage.set_rectangle_color(r, Color::WHITE);
        assert!(!stage.needs_redraw());
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn mutations_on_five_actors_coalesce_into_one_redraw() {
        let (mut stage, fired) = counting_stage();
        let actors: [ActorId; 5] = core::array::from_fn(|_| visible_rect(&mut stage));
        stage.redraw.take();
        let before = fired.get();

        stage.set_position(actors[0], 3, 4);
        stage.set_opacity(actors[1], 10);
        stage.set_depth(actors[2], 2);
        stage.set_scale(actors[3], 0.5, 0.5);
        stage.set_rotation(actors[4], RotateAxis::Z, 90.0, 0, 0, 0);

        assert_eq!(fired.get() - before, 1);
        assert!(stage.needs_redraw());
    }

    #[test]
    fn hidden_actors_do_not_schedule_redraws() {
        let (mut stage, fired) = counting_stage();
        let r = visible_rect(&mut stage);
        stage.hide(r);
        stage.redraw.take();
        let before = fired.get();
        stage.set_opacity(r, 3);
        stage.set_position(r, 8, 8);
        assert_eq!(fired.get(), before);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut stage = Stage::default();
        let r = stage.create_actor(ActorKind::Basic);
        stage.destroy(r);
        stage.set_position(r, 1, 1);
        stage.set_opacity(r, 1);
        assert_eq!(stage.position(r), None);
        assert_eq!(stage.opacity(r), None);
        assert_eq!(stage.depth(r), None);
        assert!(!stage.is_reactive(r));
    }
}
