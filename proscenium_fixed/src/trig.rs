// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer-only sine in degrees.
//!
//! The angle is reduced to the first quadrant, converted to radians in a
//! 32.32 intermediate, and fed through a Taylor series that is accurate to
//! well under one 16.16 ulp on `[0, π/2]`.

use crate::{Fixed, narrow};

const FULL_TURN: i64 = 360 << 16;
const QUARTER_TURN: i64 = 90 << 16;

/// `π / 180` in 32.32.
const DEG_TO_RAD_Q32: i64 = 74_961_321;

pub(crate) fn sin_deg(angle: Fixed) -> Fixed {
    let a = i64::from(angle.raw()).rem_euclid(FULL_TURN);

    if a % QUARTER_TURN == 0 {
        return match a / QUARTER_TURN {
            1 => Fixed::ONE,
            3 => -Fixed::ONE,
            _ => Fixed::ZERO,
        };
    }

    let (reduced, negate) = match a / QUARTER_TURN {
        0 => (a, false),
        1 => (2 * QUARTER_TURN - a, false),
        2 => (a - 2 * QUARTER_TURN, true),
        _ => (FULL_TURN - a, true),
    };

    let s = sin_q32(q32_mul(reduced << 16, DEG_TO_RAD_Q32));
    let v = Fixed::from_raw(narrow((s + (1 << 15)) >> 16));
    if negate { -v } else { v }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "operands stay within ±2π in 32.32, so the product fits"
)]
fn q32_mul(a: i64, b: i64) -> i64 {
    ((i128::from(a) * i128::from(b)) >> 32) as i64
}

/// Sine of `x` radians, `x` in `[0, π/2]`, both in 32.32.
fn sin_q32(x: i64) -> i64 {
    let x2 = q32_mul(x, x);
    let mut term = x;
    let mut sum = x;
    for k in 1..=6_i64 {
        term = -q32_mul(term, x2) / ((2 * k) * (2 * k + 1));
        sum += term;
    }
    sum
}
