// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of actor variants and what each one draws.

use crate::types::Color;

/// What an actor is, and therefore how it paints, picks and reports its box.
///
/// | kind        | paint                 | pick                              | box                         |
/// |-------------|-----------------------|-----------------------------------|-----------------------------|
/// | `Basic`     | nothing               | silhouette                        | stored                      |
/// | `Rectangle` | fill and border       | silhouette                        | stored                      |
/// | `Group`     | mapped children       | silhouette, then children         | origin + child extents      |
///
/// Only groups can hold children. `show_all`/`hide_all` on a group reach its
/// direct children; on other kinds they act on the actor alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActorKind {
    /// Invisible, but still positioned and pickable.
    #[default]
    Basic,
    /// A flat colored rectangle covering the actor box.
    Rectangle(RectangleStyle),
    /// A container painting its children in order.
    Group,
}

impl ActorKind {
    /// Whether actors of this kind can hold children.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group)
    }
}

/// Fill and border of a [`ActorKind::Rectangle`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RectangleStyle {
    /// Interior color.
    pub color: Color,
    /// Optional border drawn inside the box edge.
    pub border: Option<Border>,
}

impl RectangleStyle {
    /// A borderless rectangle.
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            border: None,
        }
    }
}

/// Rectangle border.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Border {
    /// Border color.
    pub color: Color,
    /// Border width in pixels.
    pub width: u32,
}
