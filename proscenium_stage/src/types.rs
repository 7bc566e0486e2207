// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the stage: actor identifiers, flags, boxes, and colors.

use proscenium_fixed::Fixed;

/// Identifier for an actor in a [`Stage`](crate::Stage) (generational).
///
/// Handles to destroyed actors become stale; every stage operation checks
/// liveness and treats stale handles as absent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActorId(pub(crate) u32, pub(crate) u32);

impl ActorId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Public actor state bits.
    ///
    /// These are independent: an actor is *visible* when it is both
    /// [`REALIZED`](Self::REALIZED) and [`MAPPED`](Self::MAPPED).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ActorFlags: u8 {
        /// Backend resources are allocated.
        const REALIZED = 0b0000_0001;
        /// Included in the rendered set.
        const MAPPED   = 0b0000_0010;
        /// Receives pointer events and paints a pick silhouette.
        const REACTIVE = 0b0000_0100;
    }
}

impl ActorFlags {
    /// Realized and mapped.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.contains(Self::REALIZED.union(Self::MAPPED))
    }
}

bitflags::bitflags! {
    /// Bookkeeping bits that callers never set directly.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub(crate) struct PrivateFlags: u8 {
        /// The stage root. Cannot be parented or destroyed.
        const TOPLEVEL       = 0b0000_0001;
        /// Set for the duration of `destroy`.
        const IN_DESTRUCTION = 0b0000_0010;
        /// Set while moving between two realized parents; unparenting hides instead of unrealizing.
        const IN_REPARENT    = 0b0000_0100;
    }
}

/// Untransformed actor box in parent-relative fixed-point units.
///
/// `x2 >= x1` and `y2 >= y1` always hold for boxes stored on an actor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActorBox {
    /// Left edge.
    pub x1: Fixed,
    /// Top edge.
    pub y1: Fixed,
    /// Right edge.
    pub x2: Fixed,
    /// Bottom edge.
    pub y2: Fixed,
}

impl ActorBox {
    /// Construct from edges.
    #[must_use]
    pub const fn new(x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Construct from integer pixel edges.
    #[must_use]
    pub const fn from_pixels(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(
            Fixed::from_int(x1),
            Fixed::from_int(y1),
            Fixed::from_int(x2),
            Fixed::from_int(y2),
        )
    }

    /// `x2 - x1`
    #[must_use]
    pub fn width(&self) -> Fixed {
        self.x2 - self.x1
    }

    /// `y2 - y1`
    #[must_use]
    pub fn height(&self) -> Fixed {
        self.y2 - self.y1
    }
}

/// Integer rectangle in pixels: an actor's geometry or clip.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Geometry {
    /// Construct a geometry.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A point in 3D. Used for actor-local input points and device-space output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vertex {
    /// X.
    pub x: Fixed,
    /// Y.
    pub y: Fixed,
    /// Z.
    pub z: Fixed,
}

impl Vertex {
    /// Construct a vertex.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    /// Construct a vertex from integer pixels.
    #[must_use]
    pub const fn from_pixels(x: i32, y: i32, z: i32) -> Self {
        Self::new(Fixed::from_int(x), Fixed::from_int(y), Fixed::from_int(z))
    }
}

/// 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub red: u8,
    /// Green.
    pub green: u8,
    /// Blue.
    pub blue: u8,
    /// Alpha.
    pub alpha: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 0xff);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(0xff, 0xff, 0xff, 0xff);

    /// Construct a color.
    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// The same color with alpha scaled by `opacity / 255`.
    #[must_use]
    pub const fn with_opacity(self, opacity: u8) -> Self {
        Self {
            alpha: mul_u8(self.alpha, opacity),
            ..self
        }
    }
}

/// `a * b / 255` in integer arithmetic.
#[allow(
    clippy::cast_possible_truncation,
    reason = "the product of two bytes divided by 255 fits in a byte"
)]
pub(crate) const fn mul_u8(a: u8, b: u8) -> u8 {
    (a as u16 * b as u16 / 0xff) as u8
}

/// Rotation axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RotateAxis {
    /// Around X; pivot uses Y and Z.
    X,
    /// Around Y; pivot uses X and Z.
    Y,
    /// Around Z; pivot uses X and Y.
    Z,
}

/// One axis of actor rotation: an angle in degrees and an integer pivot.
///
/// Only the two pivot components perpendicular to the axis are meaningful;
/// the component along the axis is always zero. An angle of zero disables the
/// rotation entirely.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rotation {
    /// Angle in degrees.
    pub angle: Fixed,
    /// Pivot X (Y and Z axes).
    pub x: i32,
    /// Pivot Y (X and Z axes).
    pub y: i32,
    /// Pivot Z (X and Y axes), relative to the actor's depth.
    pub z: i32,
}

impl Rotation {
    pub(crate) fn for_axis(axis: RotateAxis, angle: Fixed, x: i32, y: i32, z: i32) -> Self {
        match axis {
            RotateAxis::X => Self { angle, x: 0, y, z },
            RotateAxis::Y => Self { angle, x, y: 0, z },
            RotateAxis::Z => Self { angle, x, y, z: 0 },
        }
    }
}

/// Where the anchor point sits relative to the actor box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gravity {
    /// No gravity; anchor at the top-left.
    #[default]
    None,
    /// Top edge, horizontally centered.
    North,
    /// Top-right corner.
    NorthEast,
    /// Right edge, vertically centered.
    East,
    /// Bottom-right corner.
    SouthEast,
    /// Bottom edge, horizontally centered.
    South,
    /// Bottom-left corner.
    SouthWest,
    /// Left edge, vertically centered.
    West,
    /// Top-left corner.
    NorthWest,
    /// Center of the box.
    Center,
}
