// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to drive the responder from other Proscenium crates.
//!
//! Each adapter is gated behind a feature flag so the core stays free of
//! scene-graph dependencies.
//!
//! ## Available Adapters
//!
//! - [`stage`] (`stage_adapter` feature): parent and reactivity lookup for a
//!   [`proscenium_stage::Stage`], plus [`stage::StageInput`], which picks,
//!   routes and delivers pointer and key events end to end.

#[cfg(feature = "stage_adapter")]
pub mod stage;
