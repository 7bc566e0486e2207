// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=proscenium_stage --heading-base-level=0

//! Proscenium Stage: a retained-mode tree of 2D actors placed in 3D space.
//!
//! Each actor has a box relative to its parent, a depth, per-axis rotations
//! with their own pivots, a scale, an anchor point, an optional clip and an
//! opacity. The stage composes those into transforms with 16.16 fixed-point
//! arithmetic ([`proscenium_fixed::Fixed`]), answers coordinate queries
//! against any [`Renderer`], paints the tree, and finds the actor under a
//! pixel by painting gid-encoded silhouettes and reading the pixel back.
//!
//! ## Actor lifecycle
//!
//! Actors move through three flags:
//!
//! - [`ActorFlags::REALIZED`]: backend resources exist. Realization goes
//!   through an optional [`ResourceHook`] and may fail, in which case the actor
//!   stays unrealized and is skipped when painting.
//! - [`ActorFlags::MAPPED`]: the actor is shown. Showing realizes first.
//! - [`ActorFlags::REACTIVE`]: the actor takes pointer events and pick passes.
//!
//! Parenting and unparenting propagate realization; hiding and destroying
//! propagate down the tree. See [`Stage::add_child`], [`Stage::reparent`] and
//! [`Stage::destroy`].
//!
//! ## Transforms
//!
//! [`Stage::apply_modelview_transform`] applies one actor's transform in a
//! fixed order (origin, scale, anchor, Z/Y/X rotations about their pivots,
//! depth, clip). Queries such as [`Stage::vertices`],
//! [`Stage::abs_position`] and [`Stage::abs_size`] accumulate that over the
//! whole ancestor chain each time, leaving the renderer as they found it.
//!
//! ## Redraws
//!
//! Property changes on visible actors request a repaint through a
//! [`RedrawScheduler`]. Requests coalesce: the host's idle hook runs once per
//! burst, and [`Stage::redraw`] clears the request.
//!
//! ## Example
//!
//! ```rust
//! use proscenium_stage::software::SoftwareRenderer;
//! use proscenium_stage::{ActorKind, Color, Geometry, RectangleStyle, Stage, StageConfig};
//!
//! let mut stage = Stage::new(StageConfig::default());
//! let root = stage.root();
//! stage.show(root);
//!
//! let rect = stage.create_actor(ActorKind::Rectangle(RectangleStyle::solid(Color::WHITE)));
//! stage.add_child(root, rect);
//! stage.set_geometry(rect, Geometry::new(10, 10, 100, 50));
//! stage.set_reactive(rect, true);
//! stage.show(rect);
//!
//! let mut renderer = SoftwareRenderer::new(640, 480);
//! assert_eq!(stage.abs_size(&mut renderer, rect), Some((100, 50)));
//! assert_eq!(stage.actor_at_pos(&mut renderer, 20, 20), Some(rect));
//! assert_eq!(stage.actor_at_pos(&mut renderer, 300, 300), Some(root));
//!
//! assert!(stage.needs_redraw());
//! stage.redraw(&mut renderer);
//! assert!(!stage.needs_redraw());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod config;
mod kind;
pub mod matrix;
mod paint;
pub mod pick;
mod props;
mod redraw;
mod render;
pub mod software;
mod stage;
mod transform;
mod types;

pub use config::StageConfig;
pub use kind::{ActorKind, Border, RectangleStyle};
pub use matrix::{Matrix, Viewport};
pub use pick::{ColorDepth, PickMode};
pub use redraw::{IdleHook, RedrawScheduler};
pub use render::{RealizeError, Renderer, ResourceHook};
pub use stage::Stage;
pub use types::{ActorBox, ActorFlags, ActorId, Color, Geometry, Gravity, RotateAxis, Rotation, Vertex};

pub use proscenium_fixed::Fixed;
