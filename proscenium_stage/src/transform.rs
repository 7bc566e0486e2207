// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-actor transforms, their accumulation down the tree, and the
//! coordinate queries built on top.
//!
//! ## Composition order
//!
//! One actor's local transform post-multiplies the renderer's modelview in
//! this order:
//!
//! 1. translate to the box origin `(x1, y1)`, unless the actor has no parent;
//! 2. scale, when either factor differs from one;
//! 3. translate by the negated anchor point, when parented and non-zero;
//! 4. rotate about Z around `(rzx, rzy, 0)`;
//! 5. rotate about Y around `(ryx, 0, depth + ryz)`;
//! 6. rotate about X around `(0, rxy, depth + rxz)`;
//! 7. translate by `(0, 0, depth)`;
//! 8. push the clip rectangle, if any, in the resulting frame.
//!
//! Rotations with a zero angle are skipped. Scale comes before rotation so
//! pivots are expressed in scaled units; the depth translation comes last so
//! X and Y pivots can refer to the actor's own depth.
//!
//! Nothing is cached. Every query recomposes the whole ancestor chain from
//! the toplevel down, so a change anywhere above an actor is always seen.

use proscenium_fixed::Fixed;

use crate::matrix::project;
use crate::render::Renderer;
use crate::stage::Stage;
use crate::types::{ActorId, RotateAxis, Vertex};

fn pivot_rotate<R: Renderer + ?Sized>(r: &mut R, angle: Fixed, axis: RotateAxis, pivot: Vertex) {
    r.translate(pivot.x, pivot.y, pivot.z);
    r.rotate(angle, axis);
    r.translate(-pivot.x, -pivot.y, -pivot.z);
}

fn project_current<R: Renderer + ?Sized>(r: &R, point: Vertex) -> Vertex {
    project(
        &r.modelview_matrix(),
        &r.projection_matrix(),
        &r.viewport(),
        point,
    )
}

impl Stage {
    /// Apply one actor's local transform to the renderer.
    ///
    /// Returns `true` if a clip was pushed; the caller pops it once the actor
    /// and its subtree are done.
    pub fn apply_modelview_transform<R: Renderer + ?Sized>(&self, r: &mut R, id: ActorId) -> bool {
        let Some(a) = self.actor(id) else {
            return false;
        };
        let parented = a.parent.is_some();
        if parented {
            r.translate(a.coords.x1, a.coords.y1, Fixed::ZERO);
        }
        let (sx, sy) = a.scale;
        if sx != Fixed::ONE || sy != Fixed::ONE {
            r.scale(sx, sy);
        }
        let (ax, ay) = a.anchor;
        if parented && (!ax.is_zero() || !ay.is_zero()) {
            r.translate(-ax, -ay, Fixed::ZERO);
        }

        let depth = Fixed::from_int(a.depth);
        let [rx, ry, rz] = a.rotation;
        if !rz.angle.is_zero() {
            let pivot = Vertex::new(Fixed::from_int(rz.x), Fixed::from_int(rz.y), Fixed::ZERO);
            pivot_rotate(r, rz.angle, RotateAxis::Z, pivot);
        }
        if !ry.angle.is_zero() {
            let pivot = Vertex::new(Fixed::from_int(ry.x), Fixed::ZERO, depth + Fixed::from_int(ry.z));
            pivot_rotate(r, ry.angle, RotateAxis::Y, pivot);
        }
        if !rx.angle.is_zero() {
            let pivot = Vertex::new(Fixed::ZERO, Fixed::from_int(rx.y), depth + Fixed::from_int(rx.z));
            pivot_rotate(r, rx.angle, RotateAxis::X, pivot);
        }
        if !depth.is_zero() {
            r.translate(Fixed::ZERO, Fixed::ZERO, depth);
        }

        if let Some(clip) = a.clip {
            r.push_clip(clip);
            true
        } else {
            false
        }
    }

    /// Apply every transform from the toplevel down to and including `id`.
    ///
    /// Returns how many clips were pushed along the way.
    pub fn apply_modelview_transform_recursive<R: Renderer + ?Sized>(
        &self,
        r: &mut R,
        id: ActorId,
    ) -> usize {
        self.ancestry(id)
            .iter()
            .filter(|&&a| self.apply_modelview_transform(r, a))
            .count()
    }

    /// Run `f` with the full modelview for `id` applied, then restore the renderer.
    fn with_modelview<R: Renderer + ?Sized, T>(
        &self,
        r: &mut R,
        id: ActorId,
        f: impl FnOnce(&R) -> T,
    ) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        r.push_matrix();
        let clips = self.apply_modelview_transform_recursive(r, id);
        let out = f(&*r);
        for _ in 0..clips {
            r.pop_clip();
        }
        r.pop_matrix();
        Some(out)
    }

    /// Map a point in the actor's local space to device pixels.
    ///
    /// The point goes through the accumulated modelview, then the projection
    /// (with `w` starting at one), then the viewport rescale.
    pub fn apply_transform_to_point<R: Renderer + ?Sized>(
        &self,
        r: &mut R,
        id: ActorId,
        point: Vertex,
    ) -> Option<Vertex> {
        self.with_modelview(r, id, |r| project_current(r, point))
    }

    /// Device-space corners of the actor box: top-left, top-right,
    /// bottom-left, bottom-right.
    pub fn vertices<R: Renderer + ?Sized>(&self, r: &mut R, id: ActorId) -> Option<[Vertex; 4]> {
        let b = self.query_coords(id)?;
        let (w, h) = (b.width(), b.height());
        let o = Fixed::ZERO;
        self.with_modelview(r, id, |r| {
            [(o, o), (w, o), (o, h), (w, h)].map(|(x, y)| project_current(r, Vertex::new(x, y, o)))
        })
    }

    /// Extent of the axis-aligned device-space bounding box of
    /// [`Stage::vertices`].
    ///
    /// Under X or Y rotation this is larger than the visible quadrilateral.
    pub fn abs_size_units<R: Renderer + ?Sized>(&self, r: &mut R, id: ActorId) -> Option<(Fixed, Fixed)> {
        let v = self.vertices(r, id)?;
        let (mut min_x, mut max_x) = (v[0].x, v[0].x);
        let (mut min_y, mut max_y) = (v[0].y, v[0].y);
        for p in &v[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some((max_x - min_x, max_y - min_y))
    }

    /// [`Stage::abs_size_units`] truncated to whole pixels.
    pub fn abs_size<R: Renderer + ?Sized>(&self, r: &mut R, id: ActorId) -> Option<(u32, u32)> {
        let (w, h) = self.abs_size_units(r, id)?;
        let px = |v: Fixed| u32::try_from(v.to_int()).unwrap_or(0);
        Some((px(w), px(h)))
    }

    /// Device position of the actor's local origin.
    ///
    /// This is where `(0, 0, 0)` lands, not the bounding box minimum.
    pub fn abs_position_units<R: Renderer + ?Sized>(
        &self,
        r: &mut R,
        id: ActorId,
    ) -> Option<(Fixed, Fixed)> {
        self.apply_transform_to_point(r, id, Vertex::default())
            .map(|v| (v.x, v.y))
    }

    /// [`Stage::abs_position_units`] truncated to whole pixels.
    pub fn abs_position<R: Renderer + ?Sized>(&self, r: &mut R, id: ActorId) -> Option<(i32, i32)> {
        self.abs_position_units(r, id)
            .map(|(x, y)| (x.to_int(), y.to_int()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ActorKind;
    use crate::matrix::Matrix;
    use crate::software::{DEFAULT_FOVY, SoftwareRenderer};
    use crate::types::Geometry;

    fn fx(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    fn px(x: i32, y: i32) -> (Fixed, Fixed) {
        (fx(x), fx(y))
    }

    fn xy(v: Vertex) -> (Fixed, Fixed) {
        (v.x, v.y)
    }

    fn stage_with_child(g: Geometry) -> (Stage, ActorId) {
        let mut stage = Stage::default();
        let root = stage.root();
        let a = stage.create_actor(ActorKind::Basic);
        stage.add_child(root, a);
        stage.set_geometry(a, g);
        (stage, a)
    }

    #[test]
    fn vertices_follow_reading_order() {
        let (stage, a) = stage_with_child(Geometry::new(0, 0, 100, 50));
        let mut r = SoftwareRenderer::new(512, 512);
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[0]), px(0, 0));
        assert_eq!(xy(v[1]), px(100, 0));
        assert_eq!(xy(v[2]), px(0, 50));
        assert_eq!(xy(v[3]), px(100, 50));
        assert_eq!((v[1].x - v[0].x, v[1].y - v[0].y), px(100, 0));
        assert_eq!((v[2].x - v[0].x, v[2].y - v[0].y), px(0, 50));
        assert_eq!((v[3].x - v[0].x, v[3].y - v[0].y), px(100, 50));
        assert_eq!(stage.abs_size(&mut r, a), Some((100, 50)));
    }

    #[test]
    fn queries_are_exact_on_a_640_by_480_target() {
        let (stage, a) = stage_with_child(Geometry::new(10, 10, 100, 50));
        let mut r = SoftwareRenderer::new(640, 480);
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[0]), px(10, 10));
        assert_eq!(xy(v[1]), px(110, 10));
        assert_eq!(xy(v[2]), px(10, 60));
        assert_eq!(xy(v[3]), px(110, 60));
        assert_eq!(stage.abs_size_units(&mut r, a), Some(px(100, 50)));
        assert_eq!(stage.abs_size(&mut r, a), Some((100, 50)));
        assert_eq!(stage.abs_position_units(&mut r, a), Some(px(10, 10)));
        assert_eq!(stage.abs_position(&mut r, a), Some((10, 10)));
        let p = stage
            .apply_transform_to_point(&mut r, a, Vertex::from_pixels(1, 1, 0))
            .unwrap();
        assert_eq!(xy(p), px(11, 11));
    }

    #[test]
    fn y_rotation_pivots_at_the_actor_depth() {
        let (mut stage, a) = stage_with_child(Geometry::new(100, 100, 100, 50));
        stage.set_depth(a, 20);
        stage.set_rotation(a, RotateAxis::Y, 90.0, 50, 0, 10);
        let mut r = SoftwareRenderer::new(640, 480);
        // Edge-on: every corner lands at x1 + pivot x - pivot z.
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[0]), px(140, 100));
        assert_eq!(xy(v[1]), px(140, 100));
        assert_eq!(xy(v[2]), px(140, 150));
        assert_eq!(xy(v[3]), px(140, 150));
        assert_eq!(stage.abs_size(&mut r, a), Some((0, 50)));
    }

    #[test]
    fn x_rotation_pivots_at_the_actor_depth() {
        let (mut stage, a) = stage_with_child(Geometry::new(100, 100, 100, 50));
        stage.set_depth(a, 20);
        stage.set_rotation(a, RotateAxis::X, 90.0, 0, 25, 10);
        let mut r = SoftwareRenderer::new(640, 480);
        // Edge-on: every corner lands at y1 + pivot y + pivot z.
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[0]), px(100, 135));
        assert_eq!(xy(v[3]), px(200, 135));
        assert_eq!(stage.abs_size(&mut r, a), Some((100, 0)));
    }

    #[test]
    fn ancestors_accumulate() {
        let mut stage = Stage::default();
        let root = stage.root();
        let g = stage.create_actor(ActorKind::Group);
        let leaf = stage.create_actor(ActorKind::Basic);
        stage.add_child(root, g);
        stage.add_child(g, leaf);
        stage.set_position(g, 10, 10);
        stage.set_geometry(leaf, Geometry::new(5, 7, 20, 20));
        let mut r = SoftwareRenderer::new(512, 512);
        assert_eq!(stage.abs_position(&mut r, leaf), Some((15, 17)));
        stage.set_scale(g, 2.0, 2.0);
        assert_eq!(stage.abs_position(&mut r, leaf), Some((20, 24)));
        assert_eq!(stage.abs_size(&mut r, leaf), Some((40, 40)));
    }

    #[test]
    fn composition_order_is_fixed() {
        let (mut stage, a) = stage_with_child(Geometry::new(100, 100, 40, 40));
        stage.set_scale(a, 2.0, 1.0);
        stage.set_rotation(a, RotateAxis::Z, 90.0, 0, 0, 0);
        stage.set_depth(a, 10);
        let mut r = SoftwareRenderer::new(512, 512);

        let local = Vertex::from_pixels(10, 0, 0);
        let got = stage.apply_transform_to_point(&mut r, a, local).unwrap();

        let step = |m: Matrix, next: Matrix| m * next;
        let ordered = [
            Matrix::translation(fx(100), fx(100), Fixed::ZERO),
            Matrix::scaling(fx(2), Fixed::ONE, Fixed::ONE),
            Matrix::rotation(fx(90), RotateAxis::Z),
            Matrix::translation(Fixed::ZERO, Fixed::ZERO, fx(10)),
        ]
        .into_iter()
        .fold(r.modelview_matrix(), step);
        let want = project(&ordered, &r.projection_matrix(), &r.viewport(), local);
        assert_eq!(got, want);
        // (10, 0) rotates to (0, 10) and the X scale no longer touches it.
        assert_eq!(xy(got), px(100, 110));

        let swapped = [
            Matrix::translation(fx(100), fx(100), Fixed::ZERO),
            Matrix::rotation(fx(90), RotateAxis::Z),
            Matrix::scaling(fx(2), Fixed::ONE, Fixed::ONE),
            Matrix::translation(Fixed::ZERO, Fixed::ZERO, fx(10)),
        ]
        .into_iter()
        .fold(r.modelview_matrix(), step);
        let other = project(&swapped, &r.projection_matrix(), &r.viewport(), local);
        assert_ne!(xy(got), xy(other));
        assert_eq!(xy(other), px(100, 120));
    }

    #[test]
    fn rotation_uses_its_pivot() {
        let (mut stage, a) = stage_with_child(Geometry::new(0, 0, 100, 50));
        stage.set_rotation(a, RotateAxis::Z, 180.0, 50, 25, 0);
        let mut r = SoftwareRenderer::new(512, 512);
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[0]), px(100, 50));
        assert_eq!(xy(v[3]), px(0, 0));
        assert_eq!(stage.abs_position(&mut r, a), Some((100, 50)));
    }

    #[test]
    fn quarter_turn_swaps_the_bounding_box() {
        let (mut stage, a) = stage_with_child(Geometry::new(200, 200, 100, 50));
        stage.set_rotation(a, RotateAxis::Z, 90.0, 0, 0, 0);
        let mut r = SoftwareRenderer::new(512, 512);
        assert_eq!(stage.abs_size(&mut r, a), Some((50, 100)));
        // The origin stays put while the box extends to its left.
        assert_eq!(stage.abs_position(&mut r, a), Some((200, 200)));
        let v = stage.vertices(&mut r, a).unwrap();
        assert_eq!(xy(v[3]), px(150, 300));
    }

    #[test]
    fn anchor_only_applies_to_parented_actors() {
        let mut stage = Stage::default();
        let root = stage.root();
        let mut r = SoftwareRenderer::new(512, 512);
        let before = stage.vertices(&mut r, root).unwrap();
        stage.set_anchor_point(root, 30, 40);
        assert_eq!(stage.vertices(&mut r, root).unwrap(), before);

        let (mut stage, a) = stage_with_child(Geometry::new(100, 100, 10, 10));
        stage.set_anchor_point(a, 30, 40);
        assert_eq!(stage.abs_position(&mut r, a), Some((70, 60)));
    }

    #[test]
    fn root_ignores_its_own_origin() {
        let mut stage = Stage::default();
        let root = stage.root();
        stage.set_position(root, 50, 50);
        let mut r = SoftwareRenderer::new(512, 512);
        assert_eq!(stage.abs_position(&mut r, root), Some((0, 0)));
    }

    #[test]
    fn queries_leave_the_renderer_balanced() {
        let mut stage = Stage::default();
        let root = stage.root();
        let g = stage.create_actor(ActorKind::Group);
        let leaf = stage.create_actor(ActorKind::Basic);
        stage.add_child(root, g);
        stage.add_child(g, leaf);
        stage.set_clip(g, Geometry::new(0, 0, 10, 10));
        stage.set_clip(leaf, Geometry::new(0, 0, 5, 5));
        let mut r = SoftwareRenderer::new(64, 64);
        let before = r.modelview_matrix();
        let _ = stage.vertices(&mut r, leaf);
        assert_eq!(r.matrix_depth(), 0);
        assert_eq!(r.clip_depth(), 0);
        assert_eq!(r.modelview_matrix(), before);
    }

    #[test]
    fn stale_actors_have_no_coordinates() {
        let (mut stage, a) = stage_with_child(Geometry::new(0, 0, 1, 1));
        stage.destroy(a);
        let mut r = SoftwareRenderer::new(64, 64);
        assert_eq!(stage.vertices(&mut r, a), None);
        assert_eq!(stage.abs_position(&mut r, a), None);
        assert_eq!(r.matrix_depth(), 0);
    }

    #[test]
    fn perspective_foreshortens_y_rotation_and_depth() {
        let (mut stage, a) = stage_with_child(Geometry::new(200, 200, 100, 100));
        let mut r = SoftwareRenderer::with_perspective(512, 512, DEFAULT_FOVY);
        let (w, h) = stage.abs_size(&mut r, a).unwrap();
        assert!((99..=101).contains(&w) && (99..=101).contains(&h), "{w}x{h}");

        stage.set_rotation(a, RotateAxis::Y, 60.0, 50, 0, 0);
        let (w, _) = stage.abs_size(&mut r, a).unwrap();
        assert!((30..90).contains(&w), "rotated width {w}");

        stage.set_rotation(a, RotateAxis::Y, 0.0, 0, 0, 0);
        stage.set_depth(a, 100);
        let (w, _) = stage.abs_size(&mut r, a).unwrap();
        assert!(w > 110, "nearer width {w}");
    }
}
