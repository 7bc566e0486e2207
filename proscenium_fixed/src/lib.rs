// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proscenium Fixed: a deterministic 16.16 fixed-point scalar.
//!
//! ## Overview
//!
//! [`Fixed`] stores a real number as a two's-complement `i32` with 16 fractional
//! bits. All geometry in the Proscenium scene graph (actor boxes, scale factors,
//! rotation angles, matrix elements) is expressed in this type so layout and
//! projection produce bit-identical results on every platform.
//!
//! ## Multiplication
//!
//! Two multiplies are provided:
//!
//! - [`Fixed::quality_mul`] (also the `*` operator) is the *quality* multiply. The
//!   product is formed in a 64-bit intermediate and rounded to nearest before
//!   it is narrowed back to 16.16. Long matrix chains use this form so rounding
//!   error does not compound.
//! - [`Fixed::fast_mul`] drops the low 8 bits of both operands before
//!   multiplying. It is cheaper and loses up to 8 bits of precision.
//!
//! ## Angles
//!
//! [`Fixed::sin_deg`] and [`Fixed::cos_deg`] take angles in degrees and are
//! computed entirely in integer arithmetic. Multiples of 90° are exact.
//!
//! ```rust
//! use proscenium_fixed::Fixed;
//!
//! let half = Fixed::from_f64(0.5);
//! let three = Fixed::from_int(3);
//! assert_eq!((half * three).to_f64(), 1.5);
//! assert_eq!(Fixed::from_int(90).sin_deg(), Fixed::ONE);
//! assert_eq!(Fixed::from_int(7).to_int(), 7);
//! ```
//!
//! This crate is `no_std` and has no dependencies.

#![no_std]

mod trig;

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Shl, Shr, Sub, SubAssign};

/// A 16.16 fixed-point number.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;
    /// `0.0`
    pub const ZERO: Self = Self(0);
    /// `1.0`
    pub const ONE: Self = Self(1 << 16);
    /// `0.5`
    pub const HALF: Self = Self(1 << 15);
    /// Largest representable value (just under 32768).
    pub const MAX: Self = Self(i32::MAX);
    /// Smallest representable value (-32768).
    pub const MIN: Self = Self(i32::MIN);
    /// Smallest positive increment, `1 / 65536`.
    pub const EPSILON: Self = Self(1);

    /// Wrap a raw 16.16 bit pattern.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw 16.16 bit pattern.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert an integer pixel count.
    ///
    /// Values outside `-32768..32768` wrap.
    #[inline]
    #[must_use]
    pub const fn from_int(v: i32) -> Self {
        Self(v << Self::FRAC_BITS)
    }

    /// Integer part, rounded toward negative infinity.
    #[inline]
    #[must_use]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Nearest integer, ties rounded up.
    #[inline]
    #[must_use]
    pub const fn round_to_int(self) -> i32 {
        narrow((self.0 as i64 + (1 << 15)) >> Self::FRAC_BITS)
    }

    /// Convert from `f64`, rounding to the nearest representable value.
    ///
    /// Out-of-range inputs saturate; `NaN` maps to zero.
    #[must_use]
    pub fn from_f64(v: f64) -> Self {
        let scaled = v * 65536.0;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "float to int casts saturate, which is the documented behavior"
        )]
        Self(rounded as i32)
    }

    /// Convert to `f64`. Exact.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 65536.0
    }

    /// Convert from `f32`, rounding to nearest.
    #[must_use]
    pub fn from_f32(v: f32) -> Self {
        Self::from_f64(f64::from(v))
    }

    /// Convert to `f32`. May lose the lowest fractional bits.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "narrowing to f32 is the point of this conversion"
        )]
        let v = self.to_f64() as f32;
        v
    }

    /// Quality multiply: full 64-bit intermediate, rounded to nearest.
    #[inline]
    #[must_use]
    pub const fn quality_mul(self, rhs: Self) -> Self {
        let wide = self.0 as i64 * rhs.0 as i64;
        Self(narrow((wide + (1 << 15)) >> Self::FRAC_BITS))
    }

    /// Low-precision multiply: `(a >> 8) * (b >> 8)`.
    #[inline]
    #[must_use]
    pub const fn fast_mul(self, rhs: Self) -> Self {
        Self((self.0 >> 8).wrapping_mul(rhs.0 >> 8))
    }

    /// Full-precision divide.
    ///
    /// Division by zero saturates toward the sign of `self`. Use
    /// [`Fixed::checked_div`] to detect it.
    #[must_use]
    pub const fn saturating_div(self, rhs: Self) -> Self {
        match self.checked_div(rhs) {
            Some(v) => v,
            None if self.0 < 0 => Self::MIN,
            None => Self::MAX,
        }
    }

    /// Full-precision divide, `None` when `rhs` is zero.
    #[must_use]
    pub const fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Self(narrow(((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64)))
    }

    /// Absolute value (saturating at [`Fixed::MAX`]).
    #[inline]
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Sine of an angle given in degrees.
    #[must_use]
    pub fn sin_deg(self) -> Self {
        trig::sin_deg(self)
    }

    /// Cosine of an angle given in degrees.
    #[must_use]
    pub fn cos_deg(self) -> Self {
        trig::sin_deg(self.wrapping_add(Self::from_int(90)))
    }

    /// Tangent of an angle given in degrees; saturates at odd multiples of 90°.
    #[must_use]
    pub fn tan_deg(self) -> Self {
        self.sin_deg().saturating_div(self.cos_deg())
    }

    /// True when the value is exactly zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn wrapping_add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "16.16 results wrap like the integer arithmetic they model"
)]
#[inline]
const fn narrow(wide: i64) -> i32 {
    wide as i32
}

impl From<i32> for Fixed {
    fn from(v: i32) -> Self {
        Self::from_int(v)
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.quality_mul(rhs)
    }
}

impl Div for Fixed {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.saturating_div(rhs)
    }
}

/// Arithmetic shift of the raw bits; `>> 1` halves.
impl Shr<u32> for Fixed {
    type Output = Self;
    #[inline]
    fn shr(self, rhs: u32) -> Self {
        Self(self.0 >> rhs)
    }
}

/// Shift of the raw bits; `<< 1` doubles.
impl Shl<u32> for Fixed {
    type Output = Self;
    #[inline]
    fn shl(self, rhs: u32) -> Self {
        Self(self.0 << rhs)
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn int_round_trip_and_floor() {
        assert_eq!(Fixed::from_int(42).to_int(), 42);
        assert_eq!(Fixed::from_int(-3).to_int(), -3);
        // Floor, not truncation.
        assert_eq!(Fixed::from_f64(-0.5).to_int(), -1);
        assert_eq!(Fixed::from_f64(2.75).to_int(), 2);
        assert_eq!(Fixed::from_f64(2.5).round_to_int(), 3);
        assert_eq!(Fixed::from_f64(2.49).round_to_int(), 2);
    }

    #[test]
    fn float_conversion_rounds_to_nearest() {
        assert_eq!(Fixed::from_f64(1.0), Fixed::ONE);
        assert_eq!(Fixed::from_f64(0.5), Fixed::HALF);
        // 1/3 is 21845.33 raw.
        assert_eq!(Fixed::from_f64(1.0 / 3.0).raw(), 21845);
        assert_eq!(Fixed::from_f64(-1.0 / 3.0).raw(), -21845);
        assert_eq!(Fixed::from_f64(f64::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f64(1.0e9), Fixed::MAX);
    }

    #[test]
    fn quality_multiply_keeps_low_bits() {
        let a = Fixed::from_raw(0x0000_00ff);
        let b = Fixed::from_int(100);
        // 255/65536 * 100 = 25500/65536 exactly.
        assert_eq!(a.quality_mul(b).raw(), 25500);
        // The fast multiply throws the operand's low byte away.
        assert_eq!(a.fast_mul(b).raw(), 0);
        let x = Fixed::from_f64(1.5);
        let y = Fixed::from_f64(-2.25);
        assert_eq!((x * y).to_f64(), -3.375);
        assert_eq!(x.fast_mul(y).to_f64(), -3.375);
    }

    #[test]
    fn divide_and_divide_by_zero() {
        let a = Fixed::from_int(3);
        let b = Fixed::from_int(4);
        assert_eq!((a / b).to_f64(), 0.75);
        assert_eq!(a.checked_div(Fixed::ZERO), None);
        assert_eq!(a / Fixed::ZERO, Fixed::MAX);
        assert_eq!(-a / Fixed::ZERO, Fixed::MIN);
    }

    #[test]
    fn arithmetic_operators() {
        let mut v = Fixed::from_int(5);
        v += Fixed::HALF;
        assert_eq!(v.to_f64(), 5.5);
        v -= Fixed::ONE;
        assert_eq!(v.to_f64(), 4.5);
        assert_eq!((-v).to_f64(), -4.5);
        assert_eq!((-v).abs(), v);
        assert_eq!((v >> 1).to_f64(), 2.25);
        assert_eq!((v << 1).to_f64(), 9.0);
        assert!(Fixed::ZERO.is_zero());
    }

    #[test]
    fn trig_is_exact_on_quadrants() {
        for (deg, s, c) in [
            (0, 0, 1),
            (90, 1, 0),
            (180, 0, -1),
            (270, -1, 0),
            (360, 0, 1),
            (-90, -1, 0),
            (450, 1, 0),
        ] {
            let a = Fixed::from_int(deg);
            assert_eq!(a.sin_deg(), Fixed::from_int(s), "sin({deg})");
            assert_eq!(a.cos_deg(), Fixed::from_int(c), "cos({deg})");
        }
    }

    #[test]
    fn trig_matches_float_within_two_ulps() {
        let mut deg = -720.0_f64;
        while deg <= 720.0 {
            let a = Fixed::from_f64(deg);
            let rad = a.to_f64().to_radians();
            let s = (a.sin_deg().to_f64() - rad.sin()).abs();
            let c = (a.cos_deg().to_f64() - rad.cos()).abs();
            assert!(s <= 2.0 / 65536.0, "sin({deg}) off by {s}");
            assert!(c <= 2.0 / 65536.0, "cos({deg}) off by {c}");
            deg += 7.25;
        }
        let t = Fixed::from_int(45).tan_deg().to_f64();
        assert!((t - 1.0).abs() <= 4.0 / 65536.0, "tan(45) = {t}");
    }
}
