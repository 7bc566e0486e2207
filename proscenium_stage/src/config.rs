// Copyright 2025 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime stage settings.

use crate::types::Color;

/// Settings fixed when a [`Stage`](crate::Stage) is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageConfig {
    /// Initial width of the toplevel actor, in pixels.
    pub width: i32,
    /// Initial height of the toplevel actor, in pixels.
    pub height: i32,
    /// Color the target is cleared to before a normal paint.
    pub background: Color,
    /// Longest ancestor chain walked by transforms, opacity and routing.
    ///
    /// Deeper chains are truncated with an error log instead of recursing
    /// forever on a corrupted tree.
    pub max_ancestor_depth: usize,
    /// Pick every mapped actor, not just reactive ones.
    pub pick_all: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: Color::BLACK,
            max_ancestor_depth: 256,
            pick_all: false,
        }
    }
}
