// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking: actor identifiers encoded as flat render colors.
//!
//! In pick mode every eligible actor paints a silhouette in a color derived
//! from its gid. Reading back the pixel under the pointer and decoding it
//! yields the topmost actor at that position.
//!
//! The identifier's bits are spread over the three channels in proportion to
//! the surface's channel depths, each chunk shifted into the channel's most
//! significant bits so it survives quantization. Encoding and decoding must
//! agree on the depth:
//!
//! ```rust
//! use proscenium_stage::pick::{decode, encode, ColorDepth};
//!
//! let depth = ColorDepth::RGB565;
//! let color = encode(1234, depth);
//! assert_eq!(decode(color, depth), 1234);
//! ```

use crate::types::Color;

/// Bits per color channel of a render target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorDepth {
    /// Red bits.
    pub red: u8,
    /// Green bits.
    pub green: u8,
    /// Blue bits.
    pub blue: u8,
}

impl Default for ColorDepth {
    fn default() -> Self {
        Self::RGB888
    }
}

impl ColorDepth {
    /// 8 bits per channel.
    pub const RGB888: Self = Self::new(8, 8, 8);
    /// 16-bit surfaces.
    pub const RGB565: Self = Self::new(5, 6, 5);

    /// Construct a depth; each channel is clamped to `1..=8` bits.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: clamp_bits(red),
            green: clamp_bits(green),
            blue: clamp_bits(blue),
        }
    }

    /// Total bits available for an identifier.
    #[must_use]
    pub const fn total_bits(self) -> u32 {
        self.red as u32 + self.green as u32 + self.blue as u32
    }

    /// Largest identifier that survives an encode/decode round trip.
    ///
    /// Only identifiers below this are pickable. Higher ones would lose
    /// their top bits and alias a smaller identifier, and `max_id` itself
    /// encodes as white, the color a pick pass clears to. Gids are never
    /// reused, so a process that creates more than `max_id - 1` actors runs
    /// out of pickable ids on that surface (65 534 at [`ColorDepth::RGB565`]).
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "at most 24 bits are set"
    )]
    pub const fn max_id(self) -> u32 {
        ((1_u64 << self.total_bits()) - 1) as u32
    }
}

const fn clamp_bits(bits: u8) -> u8 {
    if bits == 0 {
        1
    } else if bits > 8 {
        8
    } else {
        bits
    }
}

/// Encode `id` as an opaque color for a surface of the given depth.
///
/// Bits above [`ColorDepth::max_id`] are discarded.
#[must_use]
pub fn encode(id: u32, depth: ColorDepth) -> Color {
    let (r, g, b) = (
        u32::from(depth.red),
        u32::from(depth.green),
        u32::from(depth.blue),
    );
    Color::rgba(
        channel((id >> (g + b)) & (0xff >> (8 - r)), r),
        channel((id >> b) & (0xff >> (8 - g)), g),
        channel(id & (0xff >> (8 - b)), b),
        0xff,
    )
}

/// Encode `id` if a pick pass at this depth can tell it apart from every
/// other identifier and from the background.
///
/// ```rust
/// use proscenium_stage::pick::{try_encode, ColorDepth};
///
/// let depth = ColorDepth::RGB565;
/// assert!(try_encode(depth.max_id() - 1, depth).is_some());
/// assert!(try_encode(depth.max_id(), depth).is_none());
/// ```
#[must_use]
pub fn try_encode(id: u32, depth: ColorDepth) -> Option<Color> {
    (id < depth.max_id()).then(|| encode(id, depth))
}

/// Recover the identifier from a color produced by [`encode`] at the same depth.
#[must_use]
pub fn decode(color: Color, depth: ColorDepth) -> u32 {
    let (r, g, b) = (
        u32::from(depth.red),
        u32::from(depth.green),
        u32::from(depth.blue),
    );
    let red = u32::from(color.red) >> (8 - r);
    let green = u32::from(color.green) >> (8 - g);
    let blue = u32::from(color.blue) >> (8 - b);
    (red << (g + b)) | (green << b) | blue
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "the value is masked to `bits` bits and shifted into the top of a byte"
)]
fn channel(value: u32, bits: u32) -> u8 {
    (value << (8 - bits)) as u8
}

/// Which actors paint a silhouette during a pick pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PickMode {
    /// Normal painting.
    #[default]
    None,
    /// Only mapped, reactive actors.
    Reactive,
    /// Every mapped actor.
    All,
}
