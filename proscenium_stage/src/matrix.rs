// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-point 4×4 matrices and the clip-space to device-space rescale.
//!
//! Matrices are column-major: element `(row, col)` lives at `col * 4 + row`,
//! which is the layout immediate-mode backends hand back from their matrix
//! stacks. `a * b` post-multiplies, so the resulting transform applies `b`
//! first and then `a`.
//!
//! ```rust
//! use proscenium_fixed::Fixed;
//! use proscenium_stage::matrix::Matrix;
//!
//! let one = Fixed::ONE;
//! let m = Matrix::translation(Fixed::from_int(10), Fixed::ZERO, Fixed::ZERO)
//!     * Matrix::scaling(Fixed::from_int(2), one, one);
//! let (x, _, _, w) = m.transform_point(Fixed::from_int(3), Fixed::ZERO, Fixed::ZERO, one);
//! assert_eq!(x, Fixed::from_int(16));
//! assert_eq!(w, one);
//! ```

use core::ops::Mul;

use proscenium_fixed::Fixed;

use crate::types::{RotateAxis, Vertex};

/// Column-major 4×4 matrix of [`Fixed`] values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Matrix {
    m: [Fixed; 16],
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

const O: Fixed = Fixed::ZERO;
const I: Fixed = Fixed::ONE;

impl Matrix {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [I, O, O, O, O, I, O, O, O, O, I, O, O, O, O, I],
    };

    /// Build from sixteen column-major elements.
    #[must_use]
    pub const fn from_cols_array(m: [Fixed; 16]) -> Self {
        Self { m }
    }

    /// The sixteen column-major elements.
    #[must_use]
    pub const fn to_cols_array(&self) -> [Fixed; 16] {
        self.m
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 4 or more.
    #[must_use]
    pub const fn get(&self, row: usize, col: usize) -> Fixed {
        self.m[col * 4 + row]
    }

    const fn set(&mut self, row: usize, col: usize, v: Fixed) {
        self.m[col * 4 + row] = v;
    }

    /// Translation by `(x, y, z)`.
    #[must_use]
    pub const fn translation(x: Fixed, y: Fixed, z: Fixed) -> Self {
        let mut out = Self::IDENTITY;
        out.set(0, 3, x);
        out.set(1, 3, y);
        out.set(2, 3, z);
        out
    }

    /// Non-uniform scale.
    #[must_use]
    pub const fn scaling(x: Fixed, y: Fixed, z: Fixed) -> Self {
        let mut out = Self::IDENTITY;
        out.set(0, 0, x);
        out.set(1, 1, y);
        out.set(2, 2, z);
        out
    }

    /// Right-handed rotation of `angle` degrees about a principal axis.
    #[must_use]
    pub fn rotation(angle: Fixed, axis: RotateAxis) -> Self {
        let s = angle.sin_deg();
        let c = angle.cos_deg();
        let mut out = Self::IDENTITY;
        let (a, b) = match axis {
            RotateAxis::X => (1, 2),
            RotateAxis::Y => (2, 0),
            RotateAxis::Z => (0, 1),
        };
        out.set(a, a, c);
        out.set(b, a, s);
        out.set(a, b, -s);
        out.set(b, b, c);
        out
    }

    /// Orthographic projection of the box `[left, right] × [bottom, top] × [-near, -far]`.
    ///
    /// The matrix is scaled homogeneously, with the factor carried in `w`.
    /// When both extents are whole numbers the factor is chosen so the X and
    /// Y entries are whole too: whole pixels then reach clip space without
    /// rounding and the device rescale gives them back exactly. Extents with
    /// no small enough factor round each entry to nearest, which keeps
    /// targets a few thousand pixels wide within a hundredth of a pixel.
    #[must_use]
    pub fn ortho(left: Fixed, right: Fixed, bottom: Fixed, top: Fixed, near: Fixed, far: Fixed) -> Self {
        let (width, height) = (right - left, top - bottom);
        let k = exact_ortho_scale(width, height);
        let sx = ratio(k << 1, width);
        let sy = ratio(k << 1, height);
        let sz = -ratio(k << 1, far - near);
        let mut out = Self::IDENTITY;
        out.set(0, 0, sx);
        out.set(1, 1, sy);
        out.set(2, 2, sz);
        out.set(0, 3, -((sx * (right + left)) >> 1));
        out.set(1, 3, -((sy * (top + bottom)) >> 1));
        out.set(2, 3, (sz * (far + near)) >> 1);
        out.set(3, 3, k);
        out
    }

    /// Symmetric perspective projection; `fovy` in degrees.
    #[must_use]
    pub fn perspective(fovy: Fixed, aspect: Fixed, near: Fixed, far: Fixed) -> Self {
        let half = fovy >> 1;
        let f = half.cos_deg() / half.sin_deg();
        let mut out = Self::from_cols_array([O; 16]);
        out.set(0, 0, f / aspect);
        out.set(1, 1, f);
        out.set(2, 2, (far + near) / (near - far));
        out.set(2, 3, (Fixed::from_int(2) * far * near) / (near - far));
        out.set(3, 2, -I);
        out
    }

    /// Multiply the homogeneous point `(x, y, z, w)` by this matrix.
    ///
    /// Every term uses the quality multiply.
    #[must_use]
    pub fn transform_point(&self, x: Fixed, y: Fixed, z: Fixed, w: Fixed) -> (Fixed, Fixed, Fixed, Fixed) {
        let row = |r: usize| {
            self.get(r, 0) * x + self.get(r, 1) * y + self.get(r, 2) * z + self.get(r, 3) * w
        };
        (row(0), row(1), row(2), row(3))
    }
}

impl Mul for Matrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::from_cols_array([O; 16]);
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = O;
                for k in 0..4 {
                    acc += self.get(row, k) * rhs.get(k, col);
                }
                out.set(row, col, acc);
            }
        }
        out
    }
}

/// The device rectangle clip space maps onto, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl Viewport {
    /// Construct a viewport.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Largest homogeneous factor [`Matrix::ortho`] uses. Clip coordinates grow
/// with the factor; at this size points more than one extent off screen on
/// either side still fit in 16.16.
const MAX_ORTHO_SCALE: i32 = 9600;

/// Smallest `k` that makes `2k / width` and `2k / height` whole numbers.
///
/// Without one within [`MAX_ORTHO_SCALE`], the largest factor keeps the
/// rounding in the entries smallest. Extents under one pixel get no factor.
fn exact_ortho_scale(width: Fixed, height: Fixed) -> Fixed {
    let (width, height) = (width.abs(), height.abs());
    if width < Fixed::ONE || height < Fixed::ONE {
        return I;
    }
    let largest = Fixed::from_int(MAX_ORTHO_SCALE);
    let whole = |v: Fixed| (Fixed::from_int(v.to_int()) == v).then(|| i64::from(v.to_int()));
    let (Some(w), Some(h)) = (whole(width), whole(height)) else {
        return largest;
    };
    let lcm = w / gcd(w, h) * h;
    let k = if lcm % 2 == 0 { lcm / 2 } else { lcm };
    if k > i64::from(MAX_ORTHO_SCALE) {
        return largest;
    }
    i32::try_from(k).map_or(largest, Fixed::from_int)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `num / den` rounded to nearest, saturated to `i32`.
fn div_round(num: i128, den: i128) -> i32 {
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    let q = (num + den / 2).div_euclid(den);
    i32::try_from(q).unwrap_or(if q < 0 { i32::MIN } else { i32::MAX })
}

/// `n / d` rounded to nearest; saturates like `/` when `d` is zero.
fn ratio(n: Fixed, d: Fixed) -> Fixed {
    if d.is_zero() {
        return n / d;
    }
    let num = i128::from(n.raw()) << Fixed::FRAC_BITS;
    Fixed::from_raw(div_round(num, i128::from(d.raw())))
}

/// `((c / w + 1) >> 1) * extent`, evaluated as the single quotient
/// `(c + w) * extent / 2w` and rounded once.
fn half_span(c: Fixed, w: Fixed, extent: Fixed) -> Fixed {
    if w.is_zero() {
        return (((c / w) + I) >> 1) * extent;
    }
    let num = (i128::from(c.raw()) + i128::from(w.raw())) * i128::from(extent.raw());
    Fixed::from_raw(div_round(num, 2 * i128::from(w.raw())))
}

/// Map clip-space X to device pixels: `((x / w + 1) >> 1) * extent + origin`.
///
/// The perspective divide and the rescale share one rounding step, so a
/// homogeneous scale carried in `w` costs no precision.
#[must_use]
pub fn device_rescale_x(x: Fixed, w: Fixed, extent: Fixed, origin: Fixed) -> Fixed {
    half_span(x, w, extent) + origin
}

/// Map clip-space Y to device pixels with the axis flipped:
/// `extent - ((y / w + 1) >> 1) * extent + origin`.
///
/// Clip-space Y grows upward while device Y grows downward.
#[must_use]
pub fn device_rescale_y(y: Fixed, w: Fixed, extent: Fixed, origin: Fixed) -> Fixed {
    extent - half_span(y, w, extent) + origin
}

/// Map clip-space Z using the horizontal extent, like X.
#[must_use]
pub fn device_rescale_z(z: Fixed, w: Fixed, extent: Fixed, origin: Fixed) -> Fixed {
    device_rescale_x(z, w, extent, origin)
}

/// Push a local point through modelview, projection, and the viewport.
///
/// `w` starts at one and is carried through both multiplies; the perspective
/// divide happens inside the rescale.
#[must_use]
pub fn project(modelview: &Matrix, projection: &Matrix, viewport: &Viewport, point: Vertex) -> Vertex {
    let (x, y, z, w) = modelview.transform_point(point.x, point.y, point.z, I);
    let (x, y, z, w) = projection.transform_point(x, y, z, w);
    let vw = Fixed::from_int(viewport.width);
    let vh = Fixed::from_int(viewport.height);
    let vx = Fixed::from_int(viewport.x);
    let vy = Fixed::from_int(viewport.y);
    Vertex::new(
        device_rescale_x(x, w, vw, vx),
        device_rescale_y(y, w, vh, vy),
        device_rescale_z(z, w, vw, vx),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Matrix::IDENTITY.transform_point(fx(3), fx(-4), fx(5), I);
        assert_eq!(p, (fx(3), fx(-4), fx(5), I));
        assert_eq!(Matrix::IDENTITY * Matrix::IDENTITY, Matrix::IDENTITY);
        assert_eq!(Matrix::default(), Matrix::IDENTITY);
    }

    #[test]
    fn column_major_layout() {
        let m = Matrix::translation(fx(7), fx(8), fx(9));
        let raw = m.to_cols_array();
        assert_eq!(raw[12], fx(7));
        assert_eq!(raw[13], fx(8));
        assert_eq!(raw[14], fx(9));
        assert_eq!(m.get(0, 3), fx(7));
    }

    #[test]
    fn multiplication_applies_right_operand_first() {
        let t = Matrix::translation(fx(10), O, O);
        let s = Matrix::scaling(fx(2), I, I);
        let (x, ..) = (t * s).transform_point(I, O, O, I);
        assert_eq!(x, fx(12));
        let (x, ..) = (s * t).transform_point(I, O, O, I);
        assert_eq!(x, fx(22));
    }

    #[test]
    fn quarter_turns_are_exact() {
        let z = Matrix::rotation(fx(90), RotateAxis::Z);
        assert_eq!(z.transform_point(I, O, O, I), (O, I, O, I));
        let x = Matrix::rotation(fx(90), RotateAxis::X);
        assert_eq!(x.transform_point(O, I, O, I), (O, O, I, I));
        let y = Matrix::rotation(fx(90), RotateAxis::Y);
        assert_eq!(y.transform_point(O, O, I, I), (I, O, O, I));
    }

    #[test]
    fn rescale_flips_y_only() {
        let extent = fx(200);
        let origin = fx(10);
        // Clip-space +1 lands on the far edge for X but the near edge for Y.
        assert_eq!(device_rescale_x(I, I, extent, origin), fx(210));
        assert_eq!(device_rescale_y(I, I, extent, origin), fx(10));
        assert_eq!(device_rescale_x(-I, I, extent, origin), fx(10));
        assert_eq!(device_rescale_y(-I, I, extent, origin), fx(210));
        assert_eq!(device_rescale_z(O, I, extent, origin), fx(110));
        // w divides before the rescale.
        assert_eq!(device_rescale_x(fx(2), fx(2), extent, origin), fx(210));
    }

    #[test]
    fn ortho_projection_round_trips_pixels() {
        let proj = Matrix::ortho(O, fx(512), fx(512), O, fx(-512), fx(512));
        let vp = Viewport::new(0, 0, 512, 512);
        for (x, y) in [(0, 0), (100, 50), (511, 3), (256, 400)] {
            let out = project(&Matrix::IDENTITY, &proj, &vp, Vertex::from_pixels(x, y, 0));
            assert_eq!((out.x, out.y), (fx(x), fx(y)), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn ortho_is_exact_off_powers_of_two() {
        for (w, h) in [(640, 480), (800, 600), (1920, 1080), (333, 111)] {
            let proj = Matrix::ortho(O, fx(w), fx(h), O, fx(-w), fx(w));
            let vp = Viewport::new(0, 0, w, h);
            for (x, y) in [(0, 0), (1, 1), (10, 10), (110, 60), (w - 1, h - 1), (w, h)] {
                let out = project(&Matrix::IDENTITY, &proj, &vp, Vertex::from_pixels(x, y, 0));
                assert_eq!((out.x, out.y), (fx(x), fx(y)), "{w}x{h} pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn ortho_without_an_exact_factor_stays_sub_pixel() {
        // lcm(1366, 767) / 2 is far past any usable factor.
        let proj = Matrix::ortho(O, fx(1366), fx(767), O, fx(-1366), fx(1366));
        let vp = Viewport::new(0, 0, 1366, 767);
        for (x, y) in [(1, 1), (683, 383), (1365, 766)] {
            let out = project(&Matrix::IDENTITY, &proj, &vp, Vertex::from_pixels(x, y, 0));
            assert!((out.x.to_f64() - f64::from(x)).abs() < 0.01, "x {:?} vs {x}", out.x);
            assert!((out.y.to_f64() - f64::from(y)).abs() < 0.01, "y {:?} vs {y}", out.y);
        }
    }

    #[test]
    fn rescale_divides_by_a_scaled_w_without_rounding() {
        // 1/320 has no exact 16.16 form, but the rescale never forms it.
        let extent = fx(640);
        assert_eq!(device_rescale_x(fx(-957), fx(960), extent, O), I);
        assert_eq!(device_rescale_x(fx(-930), fx(960), extent, O), fx(10));
        assert_eq!(device_rescale_y(fx(956), fx(960), fx(480), O), I);
    }

    #[test]
    fn perspective_pulls_near_points_apart() {
        let proj = Matrix::perspective(fx(60), I, Fixed::from_f64(0.1), fx(100));
        assert_eq!(proj.get(3, 2), -I);
        assert_eq!(proj.get(3, 3), O);
        // Same x offset, nearer point projects further from center.
        let (xn, _, _, wn) = proj.transform_point(fx(1), O, fx(-2), I);
        let (xf, _, _, wf) = proj.transform_point(fx(1), O, fx(-4), I);
        assert!(xn / wn > xf / wf);
    }
}
