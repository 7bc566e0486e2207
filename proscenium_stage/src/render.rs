// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode backend seam.
//!
//! The stage never rasterizes anything itself. Painting, picking, and every
//! coordinate query drive a [`Renderer`]: a matrix stack with
//! translate/scale/rotate primitives, a clip stack, flat-colored rectangles,
//! and pixel read-back for picking.
//!
//! Backend resource allocation is a separate concern, exposed through
//! [`ResourceHook`] so realizing an actor does not need a renderer at hand.

use core::fmt;

use proscenium_fixed::Fixed;

use crate::matrix::{Matrix, Viewport};
use crate::pick::ColorDepth;
use crate::types::{Color, Geometry, RotateAxis};

/// An immediate-mode rendering backend.
///
/// Matrix operations post-multiply the current modelview matrix, like a
/// classic fixed-function pipeline.
pub trait Renderer {
    /// Save the current modelview matrix.
    fn push_matrix(&mut self);
    /// Restore the most recently saved modelview matrix.
    fn pop_matrix(&mut self);
    /// Post-multiply a translation.
    fn translate(&mut self, x: Fixed, y: Fixed, z: Fixed);
    /// Post-multiply a scale in X and Y.
    fn scale(&mut self, x: Fixed, y: Fixed);
    /// Post-multiply a rotation of `angle` degrees about `axis`.
    fn rotate(&mut self, angle: Fixed, axis: RotateAxis);
    /// Current modelview matrix.
    fn modelview_matrix(&self) -> Matrix;
    /// Current projection matrix.
    fn projection_matrix(&self) -> Matrix;
    /// Current viewport.
    fn viewport(&self) -> Viewport;

    /// Restrict drawing to `clip`, given in the current modelview frame.
    fn push_clip(&mut self, clip: Geometry);
    /// Undo the most recent [`Renderer::push_clip`].
    fn pop_clip(&mut self);

    /// Set the flat color used by [`Renderer::fill_rectangle`].
    fn set_color(&mut self, color: Color);
    /// Fill a rectangle in the current modelview frame.
    fn fill_rectangle(&mut self, x: i32, y: i32, width: u32, height: u32);
    /// Discard everything drawn and fill the target with `color`.
    fn clear(&mut self, color: Color);

    /// Bits per color channel of the target surface.
    fn color_depth(&self) -> ColorDepth;
    /// Read back one device pixel; `None` outside the target.
    fn read_pixel(&self, x: i32, y: i32) -> Option<Color>;
}

/// Backend resource creation failed; the actor stays unrealized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RealizeError {
    /// Identifier of the actor that failed to realize.
    pub gid: u32,
    /// Backend supplied reason.
    pub reason: &'static str,
}

impl fmt::Display for RealizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to realize actor {}: {}", self.gid, self.reason)
    }
}

impl core::error::Error for RealizeError {}

/// Allocates and frees backend resources for actors.
///
/// Installed with [`Stage::set_resource_hook`](crate::Stage::set_resource_hook).
/// Without a hook every realization succeeds.
pub trait ResourceHook {
    /// Allocate resources for the actor with identifier `gid`.
    fn realize(&mut self, gid: u32) -> Result<(), RealizeError>;
    /// Release resources for the actor with identifier `gid`.
    fn unrealize(&mut self, gid: u32) {
        let _ = gid;
    }
}
