// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reference [`Renderer`] that records draws instead of rasterizing.
//!
//! [`SoftwareRenderer`] keeps a real matrix stack, projects every filled
//! rectangle to a device-space quad, and snapshots the active clip polygons
//! alongside it. [`Renderer::read_pixel`] answers by hit-testing the recorded
//! quads topmost-first, which is all color picking needs. It is useful for
//! headless hosts and tests.
//!
//! ```rust
//! use proscenium_stage::software::SoftwareRenderer;
//! use proscenium_stage::{Color, Renderer};
//!
//! let mut r = SoftwareRenderer::new(64, 64);
//! r.clear(Color::WHITE);
//! r.set_color(Color::rgba(10, 20, 30, 0xff));
//! r.fill_rectangle(8, 8, 16, 16);
//! assert_eq!(r.read_pixel(10, 10), Some(Color::rgba(10, 20, 30, 0xff)));
//! assert_eq!(r.read_pixel(40, 40), Some(Color::WHITE));
//! ```

use alloc::vec::Vec;

use kurbo::{BezPath, Point, Shape};
use proscenium_fixed::Fixed;
use smallvec::SmallVec;

use crate::matrix::{Matrix, Viewport, project};
use crate::pick::ColorDepth;
use crate::render::Renderer;
use crate::types::{Color, Geometry, RotateAxis, Vertex};

/// Field of view used by [`SoftwareRenderer::with_perspective`] callers that
/// have no better value.
pub const DEFAULT_FOVY: Fixed = Fixed::from_int(60);

/// One recorded rectangle.
#[derive(Clone, Debug)]
pub struct DrawCommand {
    quad: [Vertex; 4],
    color: Color,
    clips: SmallVec<[BezPath; 2]>,
}

impl DrawCommand {
    /// Device-space corners: top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn quad(&self) -> [Vertex; 4] {
        self.quad
    }

    /// Color the rectangle was filled with.
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of clip regions active when the rectangle was drawn.
    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Whether the device point is covered by this draw, clips included.
    #[must_use]
    pub fn covers(&self, x: f64, y: f64) -> bool {
        let p = Point::new(x, y);
        quad_path(&self.quad).contains(p) && self.clips.iter().all(|c| c.contains(p))
    }
}

/// Recording renderer with an orthographic or perspective camera.
#[derive(Clone, Debug)]
pub struct SoftwareRenderer {
    modelview: Matrix,
    stack: Vec<Matrix>,
    projection: Matrix,
    viewport: Viewport,
    clips: Vec<BezPath>,
    color: Color,
    background: Color,
    depth: ColorDepth,
    commands: Vec<DrawCommand>,
}

impl SoftwareRenderer {
    /// A `width × height` target with a pixel-exact orthographic camera.
    ///
    /// Local pixel `(x, y)` of an untransformed root maps to device pixel
    /// `(x, y)` with no rounding for common target sizes, 640×480 and
    /// 1920×1080 included (see [`Matrix::ortho`]). Depth only affects the
    /// device Z coordinate.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let w = Fixed::from_int(width);
        let h = Fixed::from_int(height);
        let range = Fixed::from_int(width.max(height));
        Self::with_camera(
            width,
            height,
            Matrix::ortho(Fixed::ZERO, w, h, Fixed::ZERO, -range, range),
            Matrix::IDENTITY,
        )
    }

    /// A `width × height` target with a perspective camera.
    ///
    /// The eye sits at `0.5 / tan(fovy / 2)` target widths from the `z = 0`
    /// plane, so unrotated actors at depth zero still map one-to-one onto
    /// pixels while depth and X/Y rotation produce visible foreshortening.
    #[must_use]
    pub fn with_perspective(width: i32, height: i32, fovy: Fixed) -> Self {
        let w = Fixed::from_int(width);
        let h = Fixed::from_int(height);
        let projection =
            Matrix::perspective(fovy, Fixed::ONE, Fixed::from_f64(0.1), Fixed::from_int(100));
        let z_camera = Fixed::HALF / (fovy >> 1).tan_deg();
        let camera = Matrix::translation(-Fixed::HALF, -Fixed::HALF, -z_camera)
            * Matrix::scaling(Fixed::ONE / w, -Fixed::ONE / h, Fixed::ONE / w)
            * Matrix::translation(Fixed::ZERO, -h, Fixed::ZERO);
        Self::with_camera(width, height, projection, camera)
    }

    /// A target with explicit projection and base modelview matrices.
    #[must_use]
    pub fn with_camera(width: i32, height: i32, projection: Matrix, camera: Matrix) -> Self {
        Self {
            modelview: camera,
            stack: Vec::new(),
            projection,
            viewport: Viewport::new(0, 0, width, height),
            clips: Vec::new(),
            color: Color::BLACK,
            background: Color::BLACK,
            depth: ColorDepth::RGB888,
            commands: Vec::new(),
        }
    }

    /// Simulate a surface with fewer bits per channel.
    #[must_use]
    pub fn with_color_depth(mut self, depth: ColorDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Everything drawn since the last [`Renderer::clear`], in draw order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Depth of the matrix stack; zero when pushes and pops balance.
    #[must_use]
    pub fn matrix_depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of clip regions currently pushed.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    fn device_quad(&self, x: i32, y: i32, width: u32, height: u32) -> [Vertex; 4] {
        let x2 = x.saturating_add_unsigned(width);
        let y2 = y.saturating_add_unsigned(height);
        [(x, y), (x2, y), (x, y2), (x2, y2)].map(|(px, py)| {
            project(
                &self.modelview,
                &self.projection,
                &self.viewport,
                Vertex::from_pixels(px, py, 0),
            )
        })
    }

    fn quantize(&self, c: Color) -> Color {
        let mask = |bits: u8| 0xff_u8 << (8 - bits);
        Color::rgba(
            c.red & mask(self.depth.red),
            c.green & mask(self.depth.green),
            c.blue & mask(self.depth.blue),
            c.alpha,
        )
    }
}

fn quad_path(quad: &[Vertex; 4]) -> BezPath {
    let pt = |v: &Vertex| Point::new(v.x.to_f64(), v.y.to_f64());
    let mut path = BezPath::new();
    // Corners are stored in reading order; walk them around the perimeter.
    path.move_to(pt(&quad[0]));
    path.line_to(pt(&quad[1]));
    path.line_to(pt(&quad[3]));
    path.line_to(pt(&quad[2]));
    path.close_path();
    path
}

impl Renderer for SoftwareRenderer {
    fn push_matrix(&mut self) {
        self.stack.push(self.modelview);
    }

    fn pop_matrix(&mut self) {
        match self.stack.pop() {
            Some(m) => self.modelview = m,
            None => log::warn!("pop_matrix on an empty matrix stack"),
        }
    }

    fn translate(&mut self, x: Fixed, y: Fixed, z: Fixed) {
        self.modelview = self.modelview * Matrix::translation(x, y, z);
    }

    fn scale(&mut self, x: Fixed, y: Fixed) {
        self.modelview = self.modelview * Matrix::scaling(x, y, Fixed::ONE);
    }

    fn rotate(&mut self, angle: Fixed, axis: RotateAxis) {
        self.modelview = self.modelview * Matrix::rotation(angle, axis);
    }

    fn modelview_matrix(&self) -> Matrix {
        self.modelview
    }

    fn projection_matrix(&self) -> Matrix {
        self.projection
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn push_clip(&mut self, clip: Geometry) {
        let quad = self.device_quad(clip.x, clip.y, clip.width, clip.height);
        self.clips.push(quad_path(&quad));
    }

    fn pop_clip(&mut self) {
        if self.clips.pop().is_none() {
            log::warn!("pop_clip without a matching push_clip");
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_rectangle(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let quad = self.device_quad(x, y, width, height);
        log::trace!("fill_rectangle {width}x{height} -> {:?}", quad[0]);
        self.commands.push(DrawCommand {
            quad,
            color: self.color,
            clips: self.clips.iter().cloned().collect(),
        });
    }

    fn clear(&mut self, color: Color) {
        self.background = color;
        self.commands.clear();
    }

    fn color_depth(&self) -> ColorDepth {
        self.depth
    }

    fn read_pixel(&self, x: i32, y: i32) -> Option<Color> {
        let vp = self.viewport;
        if x < vp.x || y < vp.y || x >= vp.x + vp.width || y >= vp.y + vp.height {
            return None;
        }
        let (px, py) = (f64::from(x) + 0.5, f64::from(y) + 0.5);
        let color = self
            .commands
            .iter()
            .rev()
            .find(|cmd| cmd.covers(px, py))
            .map_or(self.background, |cmd| cmd.color);
        Some(self.quantize(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    #[test]
    fn later_draws_cover_earlier_ones() {
        let mut r = SoftwareRenderer::new(100, 100);
        r.clear(Color::WHITE);
        r.set_color(Color::rgba(1, 0, 0, 0xff));
        r.fill_rectangle(0, 0, 50, 50);
        r.set_color(Color::rgba(2, 0, 0, 0xff));
        r.fill_rectangle(25, 25, 50, 50);
        assert_eq!(r.read_pixel(10, 10).map(|c| c.red), Some(1));
        assert_eq!(r.read_pixel(30, 30).map(|c| c.red), Some(2));
        assert_eq!(r.read_pixel(90, 90), Some(Color::WHITE));
        assert_eq!(r.read_pixel(100, 0), None);
        assert_eq!(r.read_pixel(-1, 0), None);
    }

    #[test]
    fn matrix_stack_restores_state() {
        let mut r = SoftwareRenderer::new(100, 100);
        let before = r.modelview_matrix();
        r.push_matrix();
        r.translate(fx(10), fx(20), Fixed::ZERO);
        r.rotate(fx(45), RotateAxis::Z);
        assert_ne!(r.modelview_matrix(), before);
        r.pop_matrix();
        assert_eq!(r.modelview_matrix(), before);
        assert_eq!(r.matrix_depth(), 0);
        // Unbalanced pops are ignored.
        r.pop_matrix();
        assert_eq!(r.modelview_matrix(), before);
    }

    #[test]
    fn translated_rectangles_land_in_device_space() {
        let mut r = SoftwareRenderer::new(256, 256);
        r.translate(fx(30), fx(40), Fixed::ZERO);
        r.fill_rectangle(0, 0, 10, 10);
        let q = r.commands()[0].quad();
        assert_eq!((q[0].x, q[0].y), (fx(30), fx(40)));
        assert_eq!((q[3].x, q[3].y), (fx(40), fx(50)));
    }

    #[test]
    fn clips_restrict_coverage() {
        let mut r = SoftwareRenderer::new(128, 128);
        r.clear(Color::WHITE);
        r.push_clip(Geometry::new(0, 0, 20, 20));
        r.set_color(Color::BLACK);
        r.fill_rectangle(0, 0, 100, 100);
        r.pop_clip();
        assert_eq!(r.commands()[0].clip_count(), 1);
        assert_eq!(r.read_pixel(10, 10), Some(Color::BLACK));
        assert_eq!(r.read_pixel(50, 50), Some(Color::WHITE));
        assert_eq!(r.clip_depth(), 0);
    }

    #[test]
    fn read_back_is_quantized_to_the_surface_depth() {
        let mut r = SoftwareRenderer::new(16, 16).with_color_depth(ColorDepth::RGB565);
        r.set_color(Color::rgba(0xff, 0xff, 0xff, 0xff));
        r.fill_rectangle(0, 0, 16, 16);
        assert_eq!(r.read_pixel(1, 1), Some(Color::rgba(0xf8, 0xfc, 0xf8, 0xff)));
    }

    #[test]
    fn perspective_camera_is_near_identity_at_depth_zero() {
        let mut r = SoftwareRenderer::with_perspective(512, 512, DEFAULT_FOVY);
        r.fill_rectangle(100, 100, 100, 100);
        let q = r.commands()[0].quad();
        for (v, (x, y)) in q.iter().zip([(100, 100), (200, 100), (100, 200), (200, 200)]) {
            assert!((v.x.to_f64() - f64::from(x)).abs() < 1.0, "x {:?} vs {x}", v.x);
            assert!((v.y.to_f64() - f64::from(y)).abs() < 1.0, "y {:?} vs {y}", v.y);
        }
    }
}
